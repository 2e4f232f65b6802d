//! Client library for the pet health records backend.
//!
//! Layers, leaf first: [`api`] (HTTP client, session, call helper, photo
//! uploads), [`models`] (wire and view types with their adapters),
//! [`store`] (cached collections per resource), [`hooks`] and [`forms`]
//! (the controllers a front end drives).

pub mod api;
pub mod config;
pub mod dates;
pub mod forms;
pub mod hooks;
pub mod models;
pub mod patch;
pub mod resource;
pub mod store;

pub use api::{ApiClient, ApiError, CallResult, SessionStore};
pub use patch::Patch;
pub use resource::{ListFilter, Resource};
pub use store::{EntityStore, StoreError, StoreState};

/// Returns the version of petcare
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
