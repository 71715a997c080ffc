//! Navigation gating for protected and admin routes.
//!
//! Before a guarded view renders, `RouteGuard::authorize` decides whether the
//! navigation proceeds or redirects. A credential the backend rejects is
//! cleared before redirecting so the login page never bounces straight back
//! into a guarded route; a transient verification failure allows the request
//! through optimistically instead of destroying a possibly valid session.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{AuthGateway, SessionVerifier};

/// Route prefixes that require a valid credential
const PROTECTED_PREFIXES: &[&str] = &["/home", "/dashboard", "/profile", "/my-courses"];

/// Route prefixes that additionally require the admin flag
const ADMIN_PREFIXES: &[&str] = &["/admin"];

/// Where unauthenticated requests are sent
const LOGIN_PATH: &str = "/auth";

/// Landing page for authenticated users
const HOME_PATH: &str = "/home";

/// Access class of a route. Anything not protected or admin is public,
/// including `/`, `/auth`, `/library`, and `/practice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Protected,
    Admin,
}

impl PathClass {
    pub fn classify(path: &str) -> Self {
        if matches_prefix(path, ADMIN_PREFIXES) {
            PathClass::Admin
        } else if matches_prefix(path, PROTECTED_PREFIXES) {
            PathClass::Protected
        } else {
            PathClass::Public
        }
    }
}

fn matches_prefix(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn is_login_path(path: &str) -> bool {
    path == LOGIN_PATH || path.starts_with("/auth/") || path.starts_with("/auth?")
}

/// Outcome of authorizing a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

pub struct RouteGuard {
    gateway: Arc<AuthGateway>,
    verifier: Arc<SessionVerifier>,
}

impl RouteGuard {
    pub fn new(gateway: Arc<AuthGateway>, verifier: Arc<SessionVerifier>) -> Self {
        Self { gateway, verifier }
    }

    fn login_redirect(path: &str) -> Decision {
        // The requested path may itself carry a query string; encode it so
        // the callback survives as a single parameter value.
        Decision::RedirectTo(format!(
            "{}?callbackUrl={}",
            LOGIN_PATH,
            urlencoding::encode(path)
        ))
    }

    /// Decide whether a navigation may proceed.
    pub async fn authorize(&self, path: &str) -> Decision {
        let class = PathClass::classify(path);
        let token = self.gateway.stored_token();

        if class == PathClass::Public {
            // An authenticated user has no business on the login page.
            if is_login_path(path) {
                if let Some(token) = token {
                    match self.verifier.verify(&token).await {
                        Ok(v) if v.valid => {
                            return Decision::RedirectTo(HOME_PATH.to_string());
                        }
                        Ok(_) => self.gateway.invalidate().await,
                        Err(_) => {}
                    }
                }
            }
            return Decision::Allow;
        }

        let Some(token) = token else {
            debug!(path, "No credential, redirecting to login");
            return Self::login_redirect(path);
        };

        match self.verifier.verify(&token).await {
            Ok(v) if v.valid => {
                let is_admin = v.identity.as_ref().is_some_and(|i| i.is_admin);
                if class == PathClass::Admin && !is_admin {
                    debug!(path, "Non-admin blocked from admin route");
                    return Decision::RedirectTo(HOME_PATH.to_string());
                }
                Decision::Allow
            }
            Ok(_) => {
                // Rejected credential: clear before redirecting to avoid a
                // redirect loop through the login page.
                self.gateway.invalidate().await;
                Self::login_redirect(path)
            }
            Err(e) if e.is_transient() => {
                warn!(path, error = %e, "Verification unavailable, allowing optimistically");
                Decision::Allow
            }
            Err(e) => {
                warn!(path, error = %e, "Unexpected verification error, allowing optimistically");
                Decision::Allow
            }
        }
    }
}
