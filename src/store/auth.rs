//! Authentication state and the `/auth` endpoints.
//!
//! Tokens and the user live in the shared [`SessionStore`], which the HTTP
//! client reads on every request. This store only adds the transient
//! loading/error flags on top.

use std::sync::Arc;

use tokio::sync::watch;

use super::notify::Notifier;
use super::StoreError;
use crate::api::{call_api, ApiClient, SessionStore};
use crate::models::{
    Credentials, LoginResponse, MessageResponse, PasswordResetRequest, RefreshRequest,
    ResetPasswordRequest, TokenRequest, TokenResponse, User, UserProfile,
};

const AUTH_ENDPOINT: &str = "/auth";

/// Transient flags of the auth flow; the persisted part is the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub loading: bool,
    pub error: Option<String>,
}

pub struct AuthStore {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            client,
            notifier,
            state,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.client.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.session().snapshot().user
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Creates an account. The backend sends a verification email; no
    /// session is opened.
    pub async fn register(&self, credentials: &Credentials) -> Result<User, StoreError> {
        self.begin();
        let path = format!("{}/register", AUTH_ENDPOINT);
        let result = call_api(|| self.client.post::<_, UserProfile>(&path, credentials)).await;
        match result.into_result() {
            Ok(profile) => {
                self.finish();
                self.notifier
                    .success("Registration successful. Check your email to verify your account");
                Ok(User::from(profile))
            }
            Err(message) => Err(self.fail("register", message)),
        }
    }

    /// Exchanges credentials for a token pair and marks the session authenticated.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.begin();
        let path = format!("{}/login", AUTH_ENDPOINT);
        let result = call_api(|| self.client.post::<_, LoginResponse>(&path, credentials)).await;
        match result.into_result() {
            Ok(tokens) => {
                self.session()
                    .set_tokens(tokens.access_token, tokens.refresh_token);
                self.finish();
                tracing::info!(email = %credentials.email, "logged in");
                self.notifier.success("Signed in successfully");
                Ok(())
            }
            Err(message) => {
                self.session().clear();
                Err(self.fail("login", message))
            }
        }
    }

    /// Ends the session. The server call is best effort; local state is
    /// always cleared.
    pub async fn logout(&self) {
        self.begin();
        if self.session().access_token().is_some() {
            let path = format!("{}/logout", AUTH_ENDPOINT);
            let body = serde_json::json!({});
            let result = call_api(|| self.client.post_unit(&path, &body)).await;
            if let Some(error) = result.error {
                tracing::warn!(%error, "server logout failed, ignoring");
            }
        }
        self.clear_auth();
        self.notifier.success("Signed out successfully");
    }

    /// Trades the refresh token for a new pair. Logs out on failure.
    pub async fn refresh_tokens(&self) -> bool {
        let Some(refresh_token) = self.session().refresh_token() else {
            tracing::warn!("no refresh token available");
            return false;
        };

        let path = format!("{}/refresh", AUTH_ENDPOINT);
        let body = RefreshRequest { refresh_token };
        let result = call_api(|| self.client.post::<_, TokenResponse>(&path, &body)).await;
        match result.into_result() {
            Ok(tokens) => {
                self.session()
                    .set_tokens(tokens.access_token, tokens.refresh_token);
                true
            }
            Err(message) => {
                tracing::error!(error = %message, "token refresh failed");
                self.logout().await;
                false
            }
        }
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), StoreError> {
        self.begin();
        let path = format!("{}/verify-email", AUTH_ENDPOINT);
        let body = TokenRequest {
            token: token.to_string(),
        };
        let result = call_api(|| self.client.post_unit(&path, &body)).await;
        match result.into_result() {
            Ok(()) => {
                self.finish();
                self.notifier.success("Email verified successfully");
                Ok(())
            }
            Err(message) => Err(self.fail("verify email", message)),
        }
    }

    /// Loads `/auth/me` into the session.
    pub async fn get_user_data(&self) -> Result<User, StoreError> {
        self.begin();
        let path = format!("{}/me", AUTH_ENDPOINT);
        let result = call_api(|| self.client.get::<UserProfile>(&path)).await;
        match result.into_result() {
            Ok(profile) => {
                let user = User::from(profile);
                self.session().set_user(Some(user.clone()));
                self.finish();
                Ok(user)
            }
            Err(message) => {
                tracing::error!(error = %message, "failed to load user data");
                Err(self.fail("get user", message))
            }
        }
    }

    /// Asks the backend to email a reset link. Returns the backend's message.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, StoreError> {
        self.begin();
        let path = format!("{}/request-password-reset", AUTH_ENDPOINT);
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        let result = call_api(|| self.client.post::<_, MessageResponse>(&path, &body)).await;
        match result.into_result() {
            Ok(response) => {
                self.finish();
                let message = response.message.or(response.detail);
                self.notifier.success(
                    message
                        .as_deref()
                        .unwrap_or("If the email exists, a reset link has been sent"),
                );
                Ok(message)
            }
            Err(message) => Err(self.fail("request password reset", message)),
        }
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), StoreError> {
        self.begin();
        let path = format!("{}/reset-password", AUTH_ENDPOINT);
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let result = call_api(|| self.client.post_unit(&path, &body)).await;
        match result.into_result() {
            Ok(()) => {
                self.finish();
                self.notifier.success("Password updated successfully");
                Ok(())
            }
            Err(message) => Err(self.fail("reset password", message)),
        }
    }

    /// Drops tokens and user, in memory and on disk.
    pub fn clear_auth(&self) {
        self.session().clear();
        self.session().clear_persisted();
        self.state.send_replace(AuthState::default());
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    fn begin(&self) {
        self.state.send_replace(AuthState {
            loading: true,
            error: None,
        });
    }

    fn finish(&self) {
        self.state.send_replace(AuthState::default());
    }

    fn fail(&self, operation: &str, message: String) -> StoreError {
        tracing::warn!(operation, error = %message, "auth request failed");
        self.notifier.error(&message);
        self.state.send_replace(AuthState {
            loading: false,
            error: Some(message.clone()),
        });
        StoreError { message }
    }
}
