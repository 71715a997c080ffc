use serde::{Deserialize, Serialize};

/// Resolved user profile from `GET /auth/me` (the backend's `UserResponse`).
/// Valid only as long as the credential that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: Option<String>,
}

impl Identity {
    /// Name shown in navigation and headers, falling back to the email
    /// when the profile has no name set.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}
