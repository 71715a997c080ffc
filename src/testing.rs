//! Shared test doubles for the session gate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::{ApiError, AuthApi, TokenResponse};
use crate::models::Identity;

/// Initialize the tracing subscriber for test logging.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
/// Safe to call from every test; only the first call installs it.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Build a real reqwest transport error by dialing a port nothing listens on.
pub async fn network_error() -> ApiError {
    let err = reqwest::Client::new()
        .get("http://127.0.0.1:1")
        .send()
        .await
        .expect_err("connecting to a closed port should fail");
    ApiError::Network(err)
}

pub fn identity_for(email: &str) -> Identity {
    Identity {
        id: 7,
        email: email.to_string(),
        full_name: "Test User".to_string(),
        is_active: true,
        is_admin: email.starts_with("admin"),
        created_at: None,
    }
}

/// Forced behavior of `me`, independent of the account table.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MeBehavior {
    Normal,
    RejectAll,
    NetworkFail,
    ServerFail,
}

/// In-memory stand-in for the backend. Tokens are `tok-<email>` so `me` can
/// map them back to accounts.
pub struct FakeApi {
    accounts: Mutex<HashMap<String, String>>,
    me_behavior: Mutex<MeBehavior>,
    pub me_calls: AtomicUsize,
    /// When set, `login` blocks until the notify fires (for race tests).
    pub login_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            me_behavior: Mutex::new(MeBehavior::Normal),
            me_calls: AtomicUsize::new(0),
            login_gate: Mutex::new(None),
        }
    }

    pub fn with_account(email: &str, password: &str) -> Arc<Self> {
        let api = Self::new();
        api.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        Arc::new(api)
    }

    pub fn add_account(&self, email: &str, password: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
    }

    pub fn set_me_behavior(&self, behavior: MeBehavior) {
        *self.me_behavior.lock().unwrap() = behavior;
    }

    pub fn token_for(email: &str) -> String {
        format!("tok-{}", email)
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let gate = self.login_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let accepted = self
            .accounts
            .lock()
            .unwrap()
            .get(email)
            .is_some_and(|stored| stored.as_str() == password);
        if accepted {
            Ok(TokenResponse {
                access_token: Self::token_for(email),
                token_type: "bearer".to_string(),
            })
        } else {
            Err(ApiError::InvalidCredentials)
        }
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        _full_name: &str,
    ) -> Result<Identity, ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(ApiError::DuplicateAccount(
                "Email already registered".to_string(),
            ));
        }
        accounts.insert(email.to_string(), password.to_string());
        Ok(identity_for(email))
    }

    async fn me(&self, token: &str) -> Result<Identity, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);

        let behavior = *self.me_behavior.lock().unwrap();
        match behavior {
            MeBehavior::Normal => {}
            MeBehavior::RejectAll => return Err(ApiError::Unauthorized),
            MeBehavior::NetworkFail => return Err(network_error().await),
            MeBehavior::ServerFail => return Err(ApiError::Server("internal error".to_string())),
        }

        let email = token.strip_prefix("tok-").unwrap_or_default();
        if self.accounts.lock().unwrap().contains_key(email) {
            Ok(identity_for(email))
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}
