//! Authentication Port

use crate::error::Result;
use crate::value_objects::{AuthState, ProviderKey};
use async_trait::async_trait;
use tokio::sync::watch;

/// Backend authentication contract
///
/// Sign-in operations return `Ok(true)` when a user is signed in afterwards
/// and `Ok(false)` when the backend declined the credentials.
#[async_trait]
pub trait BackendAuth: Send + Sync {
    /// Key this implementation is registered under
    fn provider_key(&self) -> &ProviderKey;

    /// Whether a user is currently signed in
    fn is_signed_in(&self) -> bool;

    /// Current user id, if signed in
    fn user_id(&self) -> Option<String>;

    /// Anonymous sign-in
    async fn sign_in_anonymously(&self) -> Result<bool>;

    /// Email/password sign-in
    async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<bool>;

    /// Email/password sign-up
    async fn sign_up_with_email(&self, email: &str, password: &str) -> Result<bool>;

    /// Sign-in with a platform token (Play Games auth code, Game Center id token)
    async fn sign_in_with_platform(&self, token: &str) -> Result<bool>;

    /// Sign out the current user
    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to authentication state changes
    fn auth_state(&self) -> watch::Receiver<AuthState>;
}
