//! Partner registry: static partner-id to configuration mapping.

use super::model::{PartnerConfig, PartnerFeatures, PartnerId, Theme};

/// Registry of all known partners.
///
/// Pure and synchronous: lookups have no side effects, and unknown ids fall
/// back to the default (first) partner rather than failing.
#[derive(Debug, Clone)]
pub struct PartnerRegistry {
    partners: Vec<PartnerConfig>,
}

impl PartnerRegistry {
    /// Build the registry from the built-in partner configurations.
    #[must_use]
    pub fn new() -> Self {
        let partners = vec![
            PartnerConfig {
                id: PartnerId::new("partnerA"),
                name: "Acme Mail".to_string(),
                theme: Theme::Blue,
                features: PartnerFeatures {
                    bulk_toolbar: true,
                    mark_as_spam: false,
                    preview_snippet: true,
                },
            },
            PartnerConfig {
                id: PartnerId::new("partnerB"),
                name: "Blue Harbor".to_string(),
                theme: Theme::Green,
                features: PartnerFeatures {
                    bulk_toolbar: true,
                    mark_as_spam: true,
                    preview_snippet: false,
                },
            },
        ];
        Self { partners }
    }

    /// List all partners in registration order.
    #[must_use]
    pub fn list(&self) -> &[PartnerConfig] {
        &self.partners
    }

    /// The default partner (the first registered one).
    #[must_use]
    pub fn default_partner(&self) -> &PartnerConfig {
        // The registry is never constructed empty.
        &self.partners[0]
    }

    /// Look up a partner by id, falling back to the default partner when the
    /// id is unknown.
    #[must_use]
    pub fn get(&self, id: &PartnerId) -> &PartnerConfig {
        self.partners
            .iter()
            .find(|p| &p.id == id)
            .unwrap_or_else(|| self.default_partner())
    }
}

impl Default for PartnerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
