//! Simulated offerwall
//!
//! Every opened offerwall session credits a fixed number of points to the
//! user; `rewards` reports the accumulated points and resets them.

use crate::constants::SIMULATED_OFFERWALL_REWARD_POINTS;
use async_trait::async_trait;
use dashmap::DashMap;
use mbk_domain::error::{Error, Result};
use mbk_domain::ports::providers::BackendOfferwall;
use mbk_domain::value_objects::{Participation, ProviderKey};
use serde_json::json;
use tracing::info;

/// Offerwall returning canned participation results
#[derive(Debug)]
pub struct SimulatedOfferwall {
    key: ProviderKey,
    pending_points: DashMap<String, u32>,
}

impl SimulatedOfferwall {
    /// Create an offerwall registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        Self {
            key,
            pending_points: DashMap::new(),
        }
    }
}

#[async_trait]
impl BackendOfferwall for SimulatedOfferwall {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn start_offerwall(&self, user_id: &str) -> Result<()> {
        if user_id.is_empty() {
            return Err(Error::invalid_argument("user id must not be empty"));
        }
        *self.pending_points.entry(user_id.to_owned()).or_insert(0) +=
            SIMULATED_OFFERWALL_REWARD_POINTS;
        info!(provider = %self.key, user_id, "Offerwall opened");
        Ok(())
    }

    async fn rewards(&self, user_id: &str) -> Result<Participation> {
        if user_id.is_empty() {
            return Err(Error::invalid_argument("user id must not be empty"));
        }
        let points = self
            .pending_points
            .remove(user_id)
            .map_or(0, |(_, points)| points);
        let data = json!({ "user_id": user_id, "points": points });
        Ok(Participation::new(0, data.to_string()))
    }
}
