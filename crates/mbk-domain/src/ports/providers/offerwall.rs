//! Offerwall Port

use crate::error::Result;
use crate::value_objects::{Participation, ProviderKey};
use async_trait::async_trait;

/// Reward participation (offerwall) contract
#[async_trait]
pub trait BackendOfferwall: Send + Sync {
    /// Key this implementation is registered under
    fn provider_key(&self) -> &ProviderKey;

    /// Open the offerwall UI for a user
    fn start_offerwall(&self, user_id: &str) -> Result<()>;

    /// Fetch the user's participation rewards
    async fn rewards(&self, user_id: &str) -> Result<Participation>;
}
