//! Credential verification against the backend identity endpoint.
//!
//! A rejected credential (401/403 from `/auth/me`) and an unreachable
//! backend are different outcomes: the first invalidates the session, the
//! second must not. Callers get `Ok(Verification { valid: false, .. })` for
//! the former and `Err(ApiError::Network(_))` / `Err(ApiError::Server(_))`
//! for the latter.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::{ApiError, AuthApi};
use crate::models::Identity;

use super::Session;

/// Outcome of checking a credential against `/auth/me`.
#[derive(Debug, Clone)]
pub struct Verification {
    pub valid: bool,
    pub identity: Option<Identity>,
}

impl Verification {
    fn valid(identity: Identity) -> Self {
        Self {
            valid: true,
            identity: Some(identity),
        }
    }

    fn invalid() -> Self {
        Self {
            valid: false,
            identity: None,
        }
    }
}

pub struct SessionVerifier {
    api: Arc<dyn AuthApi>,
    freshness: Duration,
    /// Last successful verification. The tokio mutex doubles as the
    /// single-flight guard: it is held across the backend call, so at most
    /// one verification is in flight and late acquirers see the fresh result.
    last: Mutex<Option<Session>>,
}

impl SessionVerifier {
    pub fn new(api: Arc<dyn AuthApi>, freshness: Duration) -> Self {
        Self {
            api,
            freshness,
            last: Mutex::new(None),
        }
    }

    /// Verify a credential, reusing the last successful verification when it
    /// is still within the freshness window for the same token.
    pub async fn verify(&self, token: &str) -> Result<Verification, ApiError> {
        let mut last = self.last.lock().await;

        if let Some(session) = last.as_ref() {
            if session.token == token && session.is_fresh(self.freshness) {
                debug!(
                    age_secs = session.age().num_seconds(),
                    "Reusing fresh verification"
                );
                return Ok(Verification::valid(session.identity.clone()));
            }
        }

        match self.api.me(token).await {
            Ok(identity) => {
                *last = Some(Session::new(token.to_string(), identity.clone()));
                Ok(Verification::valid(identity))
            }
            Err(ApiError::Unauthorized) => {
                // The backend rejected the credential outright.
                *last = None;
                Ok(Verification::invalid())
            }
            Err(e) => {
                // Transport or server failure: not an authentication verdict,
                // keep any cached session intact.
                warn!(error = %e, "Verification request failed");
                Err(e)
            }
        }
    }

    /// Drop the cached verification (logout, forced invalidation).
    pub async fn invalidate(&self) {
        *self.last.lock().await = None;
    }

    /// The last successful verification, if any. Staleness is the caller's
    /// concern; `verify` is the only path that consults the window.
    pub async fn cached_session(&self) -> Option<Session> {
        self.last.lock().await.clone()
    }
}
