use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::session::SessionUser;

/// Errors crossing the backend boundary. The backend's own message text is
/// preserved so it can be shown to the operator verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("backend error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(reqwest::Error),
}

/// Item shape of `GET /users`. The list endpoint calls the role list
/// `roles`; the detail endpoint calls it `role`. Both shapes are real.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    phone_number: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    users: Vec<UserSummary>,
}

/// Field names `userId` and `role` match the backend's role-assignment
/// endpoint exactly; the payload replaces the stored role set wholesale.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRolesRequest<'a> {
    user_id: &'a str,
    role: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_in(&self, phone_number: &str, password: &str)
        -> Result<SessionUser, ApiError>;
    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError>;
    async fn fetch_user(&self, id: &str) -> Result<UserDetail, ApiError>;
    async fn assign_roles(&self, user_id: &str, roles: &[String]) -> Result<(), ApiError>;
}

pub struct HttpBackend {
    base_url: String,
    timeout_seconds: u64,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.request_timeout_seconds,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn wire(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout_seconds)
        } else {
            ApiError::Transport(err)
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.map_err(|e| self.wire(e))?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn sign_in(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<SessionUser, ApiError> {
        let url = self.url("/signin");
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&SignInRequest {
                phone_number,
                password,
            })
            .send()
            .await
            .map_err(|e| self.wire(e))?;

        let response = self.check(response).await?;
        let body: SignInResponse = response.json().await.map_err(|e| self.wire(e))?;
        Ok(body.user)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let url = self.url("/users");
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| self.wire(e))?;
        let response = self.check(response).await?;
        let body: UsersResponse = response.json().await.map_err(|e| self.wire(e))?;
        Ok(body.users)
    }

    async fn fetch_user(&self, id: &str) -> Result<UserDetail, ApiError> {
        let url = self.url(&format!("/users/{}", id));
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| self.wire(e))?;
        let response = self.check(response).await?;
        response.json().await.map_err(|e| self.wire(e))
    }

    async fn assign_roles(&self, user_id: &str, roles: &[String]) -> Result<(), ApiError> {
        let url = self.url("/assign-roles");
        tracing::debug!("POST {} for user {}", url, user_id);

        let response = self
            .client
            .post(&url)
            .json(&AssignRolesRequest {
                user_id,
                role: roles,
            })
            .send()
            .await
            .map_err(|e| self.wire(e))?;

        self.check(response).await?;
        Ok(())
    }
}
