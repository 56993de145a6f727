//! Partner (tenant) configuration and registry.
//!
//! Each partner gets its own feature toggles, theme token, and a disjoint
//! mailbox namespace in the durable store.

mod model;
mod registry;

pub use model::{PartnerConfig, PartnerFeatures, PartnerId, Theme};
pub use registry::PartnerRegistry;
