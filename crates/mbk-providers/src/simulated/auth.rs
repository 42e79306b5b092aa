//! Simulated authentication
//!
//! Accounts live in memory for the lifetime of the backend. User ids are
//! random v4 UUIDs; platform tokens map to a stable user per token.

use crate::constants::SIMULATED_MIN_PASSWORD_LEN;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mbk_domain::error::{Error, Result};
use mbk_domain::ports::providers::BackendAuth;
use mbk_domain::value_objects::{AuthState, ProviderKey};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: String,
}

/// In-memory auth with anonymous, email and platform sign-in
#[derive(Debug)]
pub struct SimulatedAuth {
    key: ProviderKey,
    accounts: DashMap<String, Account>,
    platform_users: DashMap<String, String>,
    state: watch::Sender<AuthState>,
}

impl SimulatedAuth {
    /// Create an auth registered under `key` with no accounts
    pub fn new(key: ProviderKey) -> Self {
        let (state, _) = watch::channel(AuthState::signed_out());
        Self {
            key,
            accounts: DashMap::new(),
            platform_users: DashMap::new(),
            state,
        }
    }

    /// Number of email accounts
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn sign_in_as(&self, user_id: String, method: &str) {
        info!(provider = %self.key, user_id = %user_id, method, "Signed in");
        self.state.send_replace(AuthState::signed_in(user_id));
    }
}

fn new_user_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Error::invalid_argument(format!("invalid email '{email}'")));
    }
    if password.is_empty() {
        return Err(Error::invalid_argument("password must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl BackendAuth for SimulatedAuth {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn is_signed_in(&self) -> bool {
        self.state.borrow().signed_in
    }

    fn user_id(&self) -> Option<String> {
        self.state.borrow().user_id.clone()
    }

    async fn sign_in_anonymously(&self) -> Result<bool> {
        self.sign_in_as(new_user_id(), "anonymous");
        Ok(true)
    }

    async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<bool> {
        validate_credentials(email, password)?;
        let user_id = match self.accounts.get(email) {
            Some(account) if account.password == password => account.user_id.clone(),
            _ => {
                warn!(provider = %self.key, email, "Sign-in declined");
                return Ok(false);
            }
        };
        self.sign_in_as(user_id, "email");
        Ok(true)
    }

    async fn sign_up_with_email(&self, email: &str, password: &str) -> Result<bool> {
        validate_credentials(email, password)?;
        if password.len() < SIMULATED_MIN_PASSWORD_LEN {
            warn!(provider = %self.key, email, "Sign-up declined: password too short");
            return Ok(false);
        }
        let user_id = match self.accounts.entry(email.to_owned()) {
            Entry::Occupied(_) => {
                warn!(provider = %self.key, email, "Sign-up declined: account exists");
                return Ok(false);
            }
            Entry::Vacant(slot) => {
                let user_id = new_user_id();
                slot.insert(Account {
                    user_id: user_id.clone(),
                    password: password.to_owned(),
                });
                user_id
            }
        };
        self.sign_in_as(user_id, "email_sign_up");
        Ok(true)
    }

    async fn sign_in_with_platform(&self, token: &str) -> Result<bool> {
        if token.is_empty() {
            return Err(Error::authentication("platform token is empty"));
        }
        let user_id = self
            .platform_users
            .entry(token.to_owned())
            .or_insert_with(new_user_id)
            .value()
            .clone();
        self.sign_in_as(user_id, "platform");
        Ok(true)
    }

    async fn sign_out(&self) -> Result<()> {
        if self.is_signed_in() {
            info!(provider = %self.key, "Signed out");
        }
        self.state.send_replace(AuthState::signed_out());
        Ok(())
    }

    fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
