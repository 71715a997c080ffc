//! Login, registration, and logout orchestration.
//!
//! The gateway owns all writes to the token store and broadcasts every state
//! transition through a watch channel. Writes are sequenced with a monotonic
//! operation epoch so that a logout issued while a login is still in flight
//! always wins: the login's token is discarded instead of resurrecting the
//! session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::api::{ApiError, AuthApi};
use crate::models::Identity;

use super::{SessionVerifier, TokenStore};

/// Authentication state broadcast to subscribers.
///
/// `loading` is set for the duration of a login/registration; `user` is
/// `Some` only while a verified session exists.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<Identity>,
    pub loading: bool,
}

#[derive(Debug, Validate)]
struct CredentialsInput {
    #[validate(email(message = "email address is malformed"))]
    email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
}

#[derive(Debug, Validate)]
struct RegistrationInput {
    #[validate(email(message = "email address is malformed"))]
    email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
    #[validate(length(min = 1, message = "full name must not be empty"))]
    full_name: String,
}

pub struct AuthGateway {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    verifier: Arc<SessionVerifier>,
    /// Monotonic operation counter. A login commits only if the epoch has not
    /// moved since it began; logout bumps it.
    epoch: AtomicU64,
    /// Serializes epoch checks with store writes and state broadcasts, so a
    /// superseded login cannot sneak its token in after a logout's clear.
    write_lock: Mutex<()>,
    state_tx: watch::Sender<AuthState>,
}

impl AuthGateway {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn TokenStore>,
        verifier: Arc<SessionVerifier>,
    ) -> Self {
        let (state_tx, _) = watch::channel(AuthState::default());
        Self {
            api,
            store,
            verifier,
            epoch: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            state_tx,
        }
    }

    // ===== State access =====

    /// Subscribe to authentication state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.state_tx.borrow().clone()
    }

    /// Reactive read access for consuming views.
    pub fn current_user(&self) -> crate::provider::CurrentUserProvider {
        crate::provider::CurrentUserProvider::new(self.subscribe())
    }

    /// Credential currently in the store. An unavailable store reads as "no
    /// credential".
    pub fn stored_token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "Token store unavailable");
                None
            }
        }
    }

    // ===== Operations =====

    /// Authenticate with the backend and establish a session.
    ///
    /// Input is validated locally first (`ApiError::Validation`); a 401 from
    /// the backend surfaces as `InvalidCredentials` with the token store left
    /// untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        CredentialsInput {
            email: email.to_string(),
            password: password.to_string(),
        }
        .validate()
        .map_err(validation_error)?;

        let op = self.begin_op();
        self.state_tx.send_modify(|s| s.loading = true);

        let result = self.login_inner(email, password, op).await;
        if result.is_err() {
            self.state_tx.send_modify(|s| s.loading = false);
        }
        result
    }

    async fn login_inner(
        &self,
        email: &str,
        password: &str,
        op: u64,
    ) -> Result<Identity, ApiError> {
        let token = self.api.login(email, password).await?.access_token;

        if !self.is_current(op) {
            debug!("Login superseded before verification, discarding token");
            return Err(ApiError::Superseded);
        }

        let verification = self.verifier.verify(&token).await?;
        if !verification.valid {
            // The backend issued a token it will not honor.
            return Err(ApiError::Unauthorized);
        }
        let identity = verification.identity.ok_or_else(|| {
            ApiError::InvalidResponse("verification succeeded without an identity".to_string())
        })?;

        if !self.commit_session(op, &token, &identity) {
            debug!("Login superseded after verification, discarding token");
            self.verifier.invalidate().await;
            return Err(ApiError::Superseded);
        }

        info!(email = %identity.email, "Login succeeded");
        Ok(identity)
    }

    /// Create an account and log in with the same credentials.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Identity, ApiError> {
        RegistrationInput {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.trim().to_string(),
        }
        .validate()
        .map_err(validation_error)?;

        self.api.register(email, password, full_name).await?;

        // The backend returns the created profile without a token; a normal
        // login completes the session.
        self.login(email, password).await
    }

    /// End the session. Locally authoritative: the credential is discarded
    /// even if the backend is unreachable.
    pub async fn logout(&self) {
        self.invalidate().await;
        info!("Logged out");
    }

    /// Discard the credential and broadcast Anonymous. Used by `logout` and
    /// by the route guard when the backend rejects the stored credential.
    pub async fn invalidate(&self) {
        {
            let _guard = self.write_guard();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear token store");
            }
            self.state_tx.send_replace(AuthState::default());
        }
        self.verifier.invalidate().await;
    }

    /// Resume a previously persisted session, if any. A stored credential the
    /// backend rejects is cleared; a transient failure leaves it in place and
    /// surfaces as an error.
    pub async fn restore(&self) -> Result<Option<Identity>, ApiError> {
        let Some(token) = self.stored_token() else {
            return Ok(None);
        };

        let op = self.epoch.load(Ordering::SeqCst);
        match self.verifier.verify(&token).await {
            Ok(v) if v.valid => {
                let identity = v.identity.ok_or_else(|| {
                    ApiError::InvalidResponse(
                        "verification succeeded without an identity".to_string(),
                    )
                })?;
                let _guard = self.write_guard();
                if self.epoch.load(Ordering::SeqCst) == op {
                    self.state_tx.send_replace(AuthState {
                        user: Some(identity.clone()),
                        loading: false,
                    });
                }
                Ok(Some(identity))
            }
            Ok(_) => {
                debug!("Stored credential rejected, clearing");
                self.invalidate().await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ===== Sequencing =====

    fn begin_op(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, op: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == op
    }

    fn write_guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Persist the token and broadcast the session, unless a newer operation
    /// started since `op` began.
    fn commit_session(&self, op: u64, token: &str, identity: &Identity) -> bool {
        let _guard = self.write_guard();
        if self.epoch.load(Ordering::SeqCst) != op {
            return false;
        }
        if let Err(e) = self.store.save(token) {
            // Best-effort persistence: the session still works for this run.
            warn!(error = %e, "Failed to persist token");
        }
        self.state_tx.send_replace(AuthState {
            user: Some(identity.clone()),
            loading: false,
        });
        true
    }
}

fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    ApiError::Validation(errors.to_string())
}
