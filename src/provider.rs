//! Read-side view of the authenticated user.
//!
//! Consuming views (navigation, dashboards, profile pages) read the resolved
//! identity through this provider instead of calling the backend themselves.
//! Updates arrive through a watch subscription on every gateway transition;
//! there is no interval polling.

use tokio::sync::watch;

use crate::auth::AuthState;
use crate::models::Identity;

/// Reactive view of the authenticated user.
#[derive(Clone)]
pub struct CurrentUserProvider {
    state: watch::Receiver<AuthState>,
}

impl CurrentUserProvider {
    pub fn new(state: watch::Receiver<AuthState>) -> Self {
        Self { state }
    }

    /// The resolved identity, or `None` while anonymous or authenticating.
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    /// Whether a login or registration is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// A receiver that yields on every login, logout, and forced
    /// invalidation.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.clone()
    }

    /// Wait for the next state transition.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.state.changed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthGateway, MemoryTokenStore, SessionVerifier};
    use crate::testing::{init_tracing, FakeApi};
    use chrono::Duration;
    use std::sync::Arc;
    use tokio::sync::Notify;

    const EMAIL: &str = "student@example.com";
    const PASSWORD: &str = "hunter22pass";

    fn gateway(api: Arc<FakeApi>) -> Arc<AuthGateway> {
        init_tracing();
        let store = Arc::new(MemoryTokenStore::new());
        let verifier = Arc::new(SessionVerifier::new(api.clone(), Duration::seconds(60)));
        Arc::new(AuthGateway::new(api, store, verifier))
    }

    #[tokio::test]
    async fn test_current_follows_login_and_logout() {
        let api = FakeApi::with_account(EMAIL, PASSWORD);
        let gateway = gateway(api);
        let provider = CurrentUserProvider::new(gateway.subscribe());

        assert!(provider.current().is_none());
        assert!(!provider.is_authenticated());

        gateway.login(EMAIL, PASSWORD).await.unwrap();
        assert_eq!(provider.current().unwrap().email, EMAIL);
        assert!(provider.is_authenticated());

        gateway.logout().await;
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn test_subscription_sees_loading_then_authenticated() {
        let api = FakeApi::with_account(EMAIL, PASSWORD);
        let gateway = gateway(api.clone());
        let mut rx = gateway.subscribe();

        // Hold the login inside the backend call so the loading state is
        // observable.
        let gate_signal = Arc::new(Notify::new());
        *api.login_gate.lock().unwrap() = Some(gate_signal.clone());

        let login_gateway = gateway.clone();
        let login_task =
            tokio::spawn(async move { login_gateway.login(EMAIL, PASSWORD).await });

        rx.changed().await.unwrap();
        {
            let state = rx.borrow_and_update();
            assert!(state.loading);
            assert!(state.user.is_none());
        }

        gate_signal.notify_one();
        login_task.await.unwrap().unwrap();

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update();
        assert!(!state.loading);
        assert_eq!(state.user.as_ref().unwrap().email, EMAIL);
    }

    #[tokio::test]
    async fn test_changed_fires_on_logout() {
        let api = FakeApi::with_account(EMAIL, PASSWORD);
        let gateway = gateway(api);
        gateway.login(EMAIL, PASSWORD).await.unwrap();

        let mut provider = CurrentUserProvider::new(gateway.subscribe());
        gateway.logout().await;
        provider.changed().await.unwrap();
        assert!(provider.current().is_none());
    }
}
