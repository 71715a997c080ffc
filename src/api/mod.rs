//! REST client module for the StudentLearn backend.
//!
//! This module provides the `ApiClient` for talking to the backend, the
//! `ApiError` taxonomy shared by the whole crate, and the `AuthApi` trait
//! the session gate is written against.
//!
//! All authenticated calls attach the bearer token in the `Authorization`
//! header; non-2xx responses carry a FastAPI-style `detail` message.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::Identity;

pub use client::{ApiClient, TokenResponse};
pub use error::ApiError;

/// Backend operations the session gate depends on.
///
/// `ApiClient` is the production implementation; tests inject fakes so the
/// gateway, verifier, and guard can be exercised without a backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError>;

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Identity, ApiError>;

    async fn me(&self, token: &str) -> Result<Identity, ApiError>;
}
