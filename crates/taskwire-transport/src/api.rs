//! HTTP API client.
//!
//! The concrete [`ApiGateway`] over the task tracker's REST boundary.
//! Every authenticated call carries the current bearer credential; the
//! response status decides which error class a failure surfaces as.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use taskwire_core::activity::ActivityLogEntry;
use taskwire_core::error::{Result, TaskwireError};
use taskwire_core::filter::TaskFilter;
use taskwire_core::gateway::ApiGateway;
use taskwire_core::notification::Notification;
use taskwire_core::session::{Credentials, RegisterPayload, Session};
use taskwire_core::task::{Task, TaskDraft};
use taskwire_core::user::User;
use tokio::sync::RwLock;

/// REST client for the Taskwire API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a client against the given base URL (e.g.
    /// `http://localhost:5000/api`). No credential is attached until
    /// [`ApiGateway::set_token`] provides one.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request with the current credential attached and maps
    /// failures into the error taxonomy.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let builder = match self.token.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|err| TaskwireError::transient(format!("request failed: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, path, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| TaskwireError::internal(format!("unexpected response shape: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.http.get(self.url(path)), path).await?;
        Self::decode(response).await
    }
}

/// Maps a non-success HTTP status to the error taxonomy.
///
/// 401-class responses are fatal to the session; 4xx payload rejections
/// surface inline; everything else is transient and retryable.
fn map_status(status: StatusCode, path: &str, body: &str) -> TaskwireError {
    let message = extract_message(body).unwrap_or_else(|| format!("{status} on {path}"));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TaskwireError::auth(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            TaskwireError::validation(message)
        }
        StatusCode::NOT_FOUND => TaskwireError::not_found("endpoint", path.to_string()),
        _ => TaskwireError::transient(message),
    }
}

/// Pulls the human-readable `message` field out of an error body, if the
/// server sent one.
fn extract_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|e| e.message)
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            user: response.user,
            token: response.token,
        }
    }
}

#[async_trait]
impl ApiGateway for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self
            .send(
                self.http.post(self.url("/auth/login")).json(credentials),
                "/auth/login",
            )
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        Ok(auth.into())
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<Session> {
        let response = self
            .send(
                self.http.post(self.url("/auth/register")).json(payload),
                "/auth/register",
            )
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        Ok(auth.into())
    }

    async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users").await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let path = "/tasks";
        let response = self
            .send(
                self.http.get(self.url(path)).query(&filter.query_pairs()),
                path,
            )
            .await?;
        Self::decode(response).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        let response = self
            .send(self.http.post(self.url("/tasks")).json(draft), "/tasks")
            .await?;
        Self::decode(response).await
    }

    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<Task> {
        let path = format!("/tasks/{id}");
        let response = self
            .send(self.http.put(self.url(&path)).json(draft), &path)
            .await?;
        Self::decode(response).await
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let path = format!("/tasks/{id}");
        self.send(self.http.delete(self.url(&path)), &path).await?;
        Ok(())
    }

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.get_json(&format!("/users/{user_id}/notifications"))
            .await
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        let path = format!("/notifications/{id}/read");
        self.send(self.http.put(self.url(&path)), &path).await?;
        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<()> {
        let path = format!("/users/{user_id}/notifications/read");
        self.send(self.http.put(self.url(&path)), &path).await?;
        Ok(())
    }

    async fn list_logs(&self, task_id: &str) -> Result<Vec<ActivityLogEntry>> {
        self.get_json(&format!("/tasks/{task_id}/logs")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_auth_error() {
        let err = map_status(StatusCode::UNAUTHORIZED, "/tasks", "");
        assert!(err.is_auth());
    }

    #[test]
    fn test_rejected_payload_maps_to_validation_error() {
        let err = map_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "/tasks",
            r#"{"message":"title is required"}"#,
        );
        assert!(err.is_validation());
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_server_failure_maps_to_transient_error() {
        let err = map_status(StatusCode::INTERNAL_SERVER_ERROR, "/tasks", "");
        assert!(err.is_transient());
    }

    #[test]
    fn test_message_extraction_tolerates_non_json_bodies() {
        assert_eq!(extract_message("<html>oops</html>"), None);
        assert_eq!(
            extract_message(r#"{"message":"nope"}"#),
            Some("nope".to_string())
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.url("/tasks"), "http://localhost:5000/api/tasks");
    }
}
