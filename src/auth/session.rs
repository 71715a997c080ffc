//! Ephemeral session state.
//!
//! A `Session` pairs a verified credential with the identity it resolved to.
//! It is never persisted; it exists only between verifications and is
//! recomputed whenever the freshness window lapses.

use chrono::{DateTime, Duration, Utc};

use crate::models::Identity;

/// A credential that passed verification, with the identity it resolved to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
    pub verified_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, identity: Identity) -> Self {
        Self {
            token,
            identity,
            verified_at: Utc::now(),
        }
    }

    /// Whether the last verification is recent enough to trust without
    /// another round-trip.
    pub fn is_fresh(&self, window: Duration) -> bool {
        Utc::now() - self.verified_at < window
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.verified_at
    }
}
