/// HTTP client for the todo API
///
/// # Example
///
/// ```no_run
/// use todo_client::{types::NewTodo, TodoClient};
///
/// # async fn example() -> Result<(), todo_client::ClientError> {
/// let auth = TodoClient::new("http://localhost:8080")
///     .login("ada@example.com", "correct-horse-1")
///     .await?;
///
/// let client = TodoClient::new("http://localhost:8080").with_token(&auth.token);
/// let todo = client
///     .create(&NewTodo { title: "Buy milk".to_string(), description: None })
///     .await?;
/// println!("created #{}", todo.id);
/// # Ok(())
/// # }
/// ```

use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::ClientError,
    types::{AuthResponse, ErrorBody, NewTodo, Todo, TodoPatch, User},
};

/// Client for one server, optionally carrying a Bearer token
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl TodoClient {
    /// Creates an unauthenticated client; a trailing `/` is ignored
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            token: None,
        }
    }

    /// Returns a client that sends `token` with every request
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(Arc::from(token));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }

    /// Creates an account
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "password": password, "name": name });
        let response = self.http.post(self.url("/auth/register")).json(&body).send().await?;
        decode(response).await
    }

    /// Exchanges credentials for a token
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        let response = self.http.post(self.url("/auth/login")).json(&body).send().await?;
        decode(response).await
    }

    /// The account the token belongs to
    pub async fn me(&self) -> Result<User, ClientError> {
        let request = self.authorized(self.http.get(self.url("/auth/me")))?;
        decode(request.send().await?).await
    }

    /// The caller's todos, newest first
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let request = self.authorized(self.http.get(self.url("/todos")))?;
        decode(request.send().await?).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, todo: &NewTodo) -> Result<Todo, ClientError> {
        self.send_json(self.http.post(self.url("/todos")), todo).await
    }

    /// Partial update; only the fields set in `patch` change
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ClientError> {
        self.send_json(self.http.put(self.url(&format!("/todos/{}", id))), patch)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let request = self.authorized(self.http.delete(self.url(&format!("/todos/{}", id))))?;
        let response = request.send().await?;
        check(response).await?;
        Ok(())
    }

    async fn send_json<B, T>(&self, request: RequestBuilder, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.authorized(request)?.json(body).send().await?;
        decode(response).await
    }
}

/// Turns a non-2xx response into `ClientError::Api`
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let (error, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("error").to_string(),
            text,
        ),
    };

    tracing::debug!(status = status.as_u16(), %error, "Request failed");

    Err(ClientError::Api {
        status: status.as_u16(),
        error,
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_ignored() {
        let client = TodoClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/todos"), "http://localhost:8080/todos");
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_sending() {
        // nothing listens here; the error must come from the token check
        let client = TodoClient::new("http://127.0.0.1:9");

        assert!(matches!(client.list().await, Err(ClientError::MissingToken)));
        assert!(matches!(client.delete(1).await, Err(ClientError::MissingToken)));
    }
}
