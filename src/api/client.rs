//! Configured HTTP client for the pet health backend.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::session::{LogNavigator, LogoutGuard, Navigator, SessionStore};

/// Thin wrapper over `reqwest::Client` that attaches the bearer token and
/// routes 401 responses through the [`LogoutGuard`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    guard: Arc<LogoutGuard>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self::with_navigator(base_url, session, Arc::new(LogNavigator))
    }

    pub fn with_navigator(
        base_url: &str,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_guard(base_url, session, Arc::new(LogoutGuard::new(navigator)))
    }

    pub fn with_guard(base_url: &str, session: Arc<SessionStore>, guard: Arc<LogoutGuard>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            guard,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(path, builder).await?;
        decode(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(path, builder).await?;
        decode(response).await
    }

    /// POST whose response body is ignored.
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        self.send(path, builder).await?;
        Ok(())
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.send(path, builder).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path);
        self.send(path, builder).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.send(path, builder).await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn send(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        // Token is read at send time so a refresh between requests is picked up
        let token = self.session.access_token();
        let builder = match &token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        tracing::debug!(path, authenticated = token.is_some(), "sending request");
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.guard
                .handle_unauthorized(&self.session, path, token.is_some());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(path, status = status.as_u16(), "request failed");
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    // Endpoints that answer 204 still need to decode into `()` or `Value`
    if bytes.is_empty() {
        return serde_json::from_str("null").map_err(ApiError::from);
    }
    serde_json::from_slice(&bytes).map_err(ApiError::from)
}
