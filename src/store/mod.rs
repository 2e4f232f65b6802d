//! Client-side state for every remote collection.
//!
//! One [`EntityStore`] per resource holds the cached collection, a selected
//! item and the loading/error flags. Each operation moves the state through
//! `loading = true` and back, and splices successful results into `items`.

mod auth;
mod backend;
mod notify;
mod offline;

pub use auth::{AuthState, AuthStore};
pub use backend::{Backend, RemoteBackend};
pub use notify::{LogNotifier, Notifier, SilentNotifier};
pub use offline::{OfflineBackend, OFFLINE_OWNER};

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{call_api, ApiClient, ApiError, ImageFile, PhotoService};
use crate::models::{Pet, Reminder, ReminderUpdate};
use crate::resource::{ListFilter, Resource};

/// Snapshot of one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<R> {
    pub items: Vec<R>,
    pub selected: Option<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

/// A failed create or update, carrying the message already shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

pub struct EntityStore<R: Resource> {
    backend: Arc<dyn Backend<R>>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<StoreState<R>>,
}

impl<R: Resource> EntityStore<R> {
    pub fn new(backend: Arc<dyn Backend<R>>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            backend,
            notifier,
            state,
        }
    }

    /// Store talking to the REST backend through `client`.
    pub fn remote(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(Arc::new(RemoteBackend::<R>::new(client)), notifier)
    }

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<R>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> StoreState<R> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    pub fn selected(&self) -> Option<R> {
        self.state.borrow().selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Looks an item up in the cached collection only.
    pub fn get_by_id(&self, id: &str) -> Option<R> {
        self.state.borrow().items.iter().find(|i| i.id() == id).cloned()
    }

    pub fn set_selected(&self, item: Option<R>) {
        self.state.send_modify(|s| s.selected = item);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Replaces the collection with the backend's list. Returns whether it succeeded.
    pub async fn fetch_all(&self, filter: &ListFilter) -> bool {
        self.begin();
        let result = call_api(|| self.backend.list(filter)).await;
        match result.into_result() {
            Ok(wires) => {
                let items: Vec<R> = wires
                    .into_iter()
                    .map(R::from_wire)
                    .filter(|item| filter.matches(item))
                    .collect();
                tracing::debug!(resource = R::LABEL, count = items.len(), "fetched");
                self.state.send_modify(|s| {
                    s.items = items;
                    s.loading = false;
                    s.error = None;
                });
                true
            }
            Err(message) => {
                self.fail("fetch", message);
                false
            }
        }
    }

    /// Loads one item into `selected`.
    pub async fn fetch_by_id(&self, id: &str) -> Option<R> {
        self.begin();
        let result = call_api(|| self.backend.get(id)).await;
        match result.into_result() {
            Ok(wire) => {
                let item = R::from_wire(wire);
                self.state.send_modify(|s| {
                    s.selected = Some(item.clone());
                    s.loading = false;
                    s.error = None;
                });
                Some(item)
            }
            Err(message) => {
                self.fail("fetch", message);
                None
            }
        }
    }

    /// Creates an item and appends it. `parent_id` is the owning pet for
    /// pet-scoped resources; without one nothing is sent.
    pub async fn create(&self, input: &R::Input, parent_id: Option<&str>) -> Result<R, StoreError> {
        self.begin();
        if R::REQUIRES_PET && parent_id.map_or(true, |id| id.trim().is_empty()) {
            let error = ApiError::Rejected(format!("{} must belong to a pet", R::LABEL));
            return Err(self.fail("create", error.user_message()));
        }
        let request = R::create_request(input, parent_id);
        let result = call_api(|| self.backend.create(&request)).await;
        match result.into_result() {
            Ok(wire) => {
                let item = R::from_wire(wire);
                self.state.send_modify(|s| {
                    s.items.push(item.clone());
                    s.loading = false;
                    s.error = None;
                });
                self.notifier
                    .success(&format!("{} created successfully", R::LABEL));
                Ok(item)
            }
            Err(message) => Err(self.fail("create", message)),
        }
    }

    /// Sends a partial update and replaces the cached item with the result.
    pub async fn update(&self, id: &str, update: &R::Update) -> Result<R, StoreError> {
        self.begin();
        let request = R::update_request(update);
        let result = call_api(|| self.backend.update(id, &request)).await;
        match result.into_result() {
            Ok(wire) => {
                let item = R::from_wire(wire);
                self.replace(id, &item);
                self.notifier
                    .success(&format!("{} updated successfully", R::LABEL));
                Ok(item)
            }
            Err(message) => Err(self.fail("update", message)),
        }
    }

    /// Deletes an item and removes it from the cache. Returns whether it succeeded.
    pub async fn delete(&self, id: &str) -> bool {
        self.begin();
        let result = call_api(|| self.backend.delete(id)).await;
        match result.into_result() {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.items.retain(|i| i.id() != id);
                    if s.selected.as_ref().is_some_and(|sel| sel.id() == id) {
                        s.selected = None;
                    }
                    s.loading = false;
                    s.error = None;
                });
                self.notifier
                    .success(&format!("{} deleted successfully", R::LABEL));
                true
            }
            Err(message) => {
                self.fail("delete", message);
                false
            }
        }
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn replace(&self, id: &str, item: &R) {
        self.state.send_modify(|s| {
            for existing in s.items.iter_mut().filter(|i| i.id() == id) {
                *existing = item.clone();
            }
            if s.selected.as_ref().is_some_and(|sel| sel.id() == id) {
                s.selected = Some(item.clone());
            }
            s.loading = false;
            s.error = None;
        });
    }

    fn fail(&self, operation: &str, message: String) -> StoreError {
        tracing::warn!(resource = R::LABEL, operation, error = %message, "store operation failed");
        self.notifier.error(&message);
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message.clone());
        });
        StoreError { message }
    }
}

impl EntityStore<Pet> {
    /// Uploads a profile photo and points the cached pet at the new URL.
    pub async fn upload_photo(&self, photos: &PhotoService, pet_id: &str, file: ImageFile) -> bool {
        self.begin();
        let result = call_api(|| photos.upload_profile(pet_id, file)).await;
        match result.into_result() {
            Ok(upload) => {
                let url = upload.url;
                self.state.send_modify(|s| {
                    for pet in s.items.iter_mut().filter(|p| p.id == pet_id) {
                        pet.photo_url = Some(url.clone());
                    }
                    if let Some(selected) = s.selected.as_mut().filter(|p| p.id == pet_id) {
                        selected.photo_url = Some(url.clone());
                    }
                    s.loading = false;
                    s.error = None;
                });
                self.notifier.success("Profile photo updated successfully");
                true
            }
            Err(message) => {
                self.fail("upload photo", message);
                false
            }
        }
    }
}

impl EntityStore<Reminder> {
    /// Flips the active flag; the payload carries only `is_active`.
    pub async fn toggle_active(&self, id: &str, is_active: bool) -> Result<Reminder, StoreError> {
        self.update(id, &ReminderUpdate::active(is_active)).await
    }
}
