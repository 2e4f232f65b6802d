//! HTTP access to the pet health backend.

pub mod call;
pub mod client;
pub mod error;
pub mod photos;
pub mod session;

pub use call::{call_api, CallResult};
pub use client::ApiClient;
pub use error::ApiError;
pub use photos::{ImageFile, ImageUploadResponse, PhotoItem, PhotoService, UploadError};
pub use session::{
    LogNavigator, LogoutGuard, Navigator, Session, SessionError, SessionStorage, SessionStore,
};
