//! Authentication value objects

use serde::{Deserialize, Serialize};

/// Snapshot of the current authentication state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuthState {
    /// Signed-in user, if any
    pub user_id: Option<String>,
    /// Whether a user is signed in
    pub signed_in: bool,
}

impl AuthState {
    /// State for a signed-in user
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            signed_in: true,
        }
    }

    /// State with nobody signed in
    pub fn signed_out() -> Self {
        Self::default()
    }
}
