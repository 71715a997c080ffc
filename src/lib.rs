//! Client-side session gate and API plumbing for the StudentLearn platform.
//!
//! Views never talk to the backend or touch the credential directly; they go
//! through the pieces assembled here:
//!
//! - [`auth::TokenStore`]: persistence for the opaque bearer credential
//! - [`auth::SessionVerifier`]: credential verification with a freshness
//!   window, distinguishing a rejected token from an unreachable backend
//! - [`auth::AuthGateway`]: login, registration, and logout, with write
//!   sequencing so a logout always beats an in-flight login
//! - [`guard::RouteGuard`]: allow/redirect decisions for navigations
//! - [`provider::CurrentUserProvider`]: reactive read access to the resolved
//!   identity
//!
//! ```no_run
//! use std::sync::Arc;
//! use studentlearn_client::{build_session_gate, Config, Decision, MemoryTokenStore};
//!
//! # async fn run() -> Result<(), studentlearn_client::ApiError> {
//! let config = Config::from_env();
//! let (gateway, guard) = build_session_gate(&config, Arc::new(MemoryTokenStore::new()))?;
//!
//! gateway.login("student@example.com", "correct-horse").await?;
//! match guard.authorize("/my-courses").await {
//!     Decision::Allow => { /* render */ }
//!     Decision::RedirectTo(path) => { /* navigate */ let _ = path; }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod provider;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use chrono::Duration;

pub use api::{ApiClient, ApiError, AuthApi, TokenResponse};
pub use auth::{
    AuthGateway, AuthState, FileTokenStore, KeyringTokenStore, MemoryTokenStore, Session,
    SessionVerifier, TokenStore, Verification,
};
pub use config::Config;
pub use guard::{Decision, PathClass, RouteGuard};
pub use models::{Course, Enrollment, Identity, PracticeQuestion};
pub use provider::CurrentUserProvider;

/// Wire the full session gate from configuration and a chosen token store.
pub fn build_session_gate(
    config: &Config,
    store: Arc<dyn TokenStore>,
) -> Result<(Arc<AuthGateway>, RouteGuard), ApiError> {
    let api: Arc<dyn AuthApi> = Arc::new(ApiClient::new(config.api_base_url.clone())?);
    let verifier = Arc::new(SessionVerifier::new(
        api.clone(),
        Duration::seconds(config.freshness_secs),
    ));
    let gateway = Arc::new(AuthGateway::new(api, store, verifier.clone()));
    let guard = RouteGuard::new(gateway.clone(), verifier);
    Ok((gateway, guard))
}
