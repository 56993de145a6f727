//! Partner configuration models.

use serde::{Deserialize, Serialize};

/// Unique identifier for a partner (tenant).
///
/// Partner ids namespace all durable mailbox state: two partners may hold
/// messages with the same message id without ever sharing state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerId(pub String);

impl PartnerId {
    /// Create a new partner ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Theme token applied to a partner's UI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Blue accent palette (default).
    #[default]
    Blue,
    /// Green accent palette.
    Green,
}

impl Theme {
    /// Get the theme token as used in persisted partner records.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }
}

/// Feature toggles that vary the UI surface per partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerFeatures {
    /// Whether the bulk action toolbar is shown above the list.
    pub bulk_toolbar: bool,
    /// Whether the bulk "mark as spam" action is offered.
    pub mark_as_spam: bool,
    /// Whether message snippets are previewed in the list.
    pub preview_snippet: bool,
}

/// Immutable configuration record for one partner.
///
/// Constructed once at process start from static configuration and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerConfig {
    /// Partner identifier.
    pub id: PartnerId,
    /// Display name.
    pub name: String,
    /// Theme token.
    pub theme: Theme,
    /// Feature toggles.
    pub features: PartnerFeatures,
}
