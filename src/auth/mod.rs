//! Session gate: token storage, verification, and login orchestration.
//!
//! This module provides:
//! - `TokenStore`: pluggable credential persistence (keychain, file, memory)
//! - `SessionVerifier`: backend verification with a freshness window
//! - `AuthGateway`: login/register/logout with logout-wins write sequencing
//! - `Session`: the ephemeral credential/identity pairing
//!
//! The credential is an opaque bearer token; the client never decodes it.

pub mod gateway;
pub mod session;
pub mod store;
pub mod verifier;

pub use gateway::{AuthGateway, AuthState};
pub use session::Session;
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use verifier::{SessionVerifier, Verification};
