//! Uniform `{data, error}` wrapper around backend calls.

use std::future::Future;

use super::error::ApiError;

/// Outcome of a wrapped call. Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CallResult<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, with the error message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(super::error::FALLBACK_MESSAGE.to_string()),
        }
    }
}

/// Awaits `op` and folds its result into a [`CallResult`].
///
/// Never fails: every error becomes a display message via
/// [`ApiError::user_message`].
pub async fn call_api<T, F, Fut>(op: F) -> CallResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match op().await {
        Ok(data) => CallResult {
            data: Some(data),
            error: None,
        },
        Err(e) => CallResult {
            data: None,
            error: Some(e.user_message()),
        },
    }
}
