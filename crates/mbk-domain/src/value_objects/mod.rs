//! Value objects shared across layers

pub mod ads;
pub mod analytics;
pub mod auth;
pub mod capability;
pub mod lifecycle;
pub mod offerwall;
pub mod provider_key;

pub use ads::{
    AdFormat, AdRevenue, AdUnitSpec, BannerPlacement, BannerPosition, BannerSize, PrimarySignal,
    ResourceClass,
};
pub use analytics::AnalyticsParameter;
pub use auth::AuthState;
pub use capability::CapabilityKind;
pub use lifecycle::{InitState, LoadOutcome, ResourceState};
pub use offerwall::Participation;
pub use provider_key::ProviderKey;
