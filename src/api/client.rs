//! API client for the StudentLearn REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests: the auth endpoints plus the course, enrollment, practice, and
//! admin collaborators every view goes through.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Course, Enrollment, Identity, PracticeQuestion};

use super::{ApiError, AuthApi};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response from `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
}

/// Wrapper shape of `GET /practice/subjects`
#[derive(Debug, Deserialize)]
struct SubjectsResponse {
    subjects: Vec<Course>,
}

/// Wrapper shape of `GET /practice/questions/{subject_id}`
#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    questions: Vec<PracticeQuestion>,
}

/// API client for the StudentLearn backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning a taxonomy error with the
    /// backend's `detail` message if not.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        debug!(path, "GET");
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = Self::check(request.send().await?).await?;
        Self::decode(response, path).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = Self::check(request.send().await?).await?;
        Self::decode(response, path).await
    }

    // ===== Collaborator endpoints (courses, practice, admin) =====

    /// All active courses for the library page (public endpoint).
    pub async fn library_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get_json("/library/courses", None).await
    }

    /// All subjects, as an authenticated user.
    pub async fn subjects(&self, token: &str) -> Result<Vec<Course>, ApiError> {
        self.get_json("/subjects", Some(token)).await
    }

    /// Practice subjects (public fallback for the library).
    pub async fn practice_subjects(&self) -> Result<Vec<Course>, ApiError> {
        let response: SubjectsResponse = self.get_json("/practice/subjects", None).await?;
        Ok(response.subjects)
    }

    /// Practice questions for a subject, capped at `limit`.
    pub async fn practice_questions(
        &self,
        subject_id: i64,
        limit: usize,
    ) -> Result<Vec<PracticeQuestion>, ApiError> {
        let path = format!("/practice/questions/{}?limit={}", subject_id, limit);
        let response: QuestionsResponse = self.get_json(&path, None).await?;
        Ok(response.questions)
    }

    /// Courses the authenticated user is enrolled in.
    pub async fn my_courses(&self, token: &str) -> Result<Vec<Course>, ApiError> {
        self.get_json("/my-courses", Some(token)).await
    }

    /// Enroll the authenticated user in a course.
    pub async fn enroll(&self, token: &str, course_id: i64) -> Result<Enrollment, ApiError> {
        let path = format!("/enrollments/{}", course_id);
        self.post_json(&path, Some(token), &serde_json::json!({}))
            .await
    }

    /// Drop the authenticated user's enrollment in a course.
    pub async fn unenroll(&self, token: &str, course_id: i64) -> Result<(), ApiError> {
        let path = format!("/enrollments/{}", course_id);
        debug!(path = %path, "DELETE");
        let response = self
            .client
            .delete(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// All registered users. The backend rejects non-admin callers with 403.
    pub async fn list_users(&self, token: &str) -> Result<Vec<Identity>, ApiError> {
        self.get_json("/users", Some(token)).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    /// Exchange credentials for a bearer token. 401 maps to
    /// `InvalidCredentials` rather than the generic `Unauthorized`.
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::InvalidCredentials);
        }
        let response = Self::check(response).await?;
        Self::decode(response, "/auth/login").await
    }

    /// Create an account. The backend answers 400 ("Email already
    /// registered") or 409 for duplicates; both map to `DuplicateAccount`.
    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Identity, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                email,
                password,
                full_name,
            })
            .send()
            .await?;

        if matches!(response.status().as_u16(), 400 | 409) {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::DuplicateAccount(ApiError::detail_message(&body)));
        }
        let response = Self::check(response).await?;
        Self::decode(response, "/auth/register").await
    }

    /// Resolve the identity behind a bearer token via `GET /auth/me`.
    async fn me(&self, token: &str) -> Result<Identity, ApiError> {
        self.get_json("/auth/me", Some(token)).await
    }
}
