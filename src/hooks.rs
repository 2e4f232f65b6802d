//! Per-view controllers over the entity stores.
//!
//! A [`CrudHook`] binds a store to the pet (and filter) a screen shows,
//! loads the list when mounted, and swallows store errors after logging
//! them; the store has already recorded and notified them.

use std::sync::Arc;

use crate::models::Reminder;
use crate::resource::{ListFilter, Resource};
use crate::store::{EntityStore, StoreState};

pub struct CrudHook<R: Resource> {
    store: Arc<EntityStore<R>>,
    filter: ListFilter,
    auto_fetch: bool,
    refresh_after_write: bool,
}

impl<R: Resource> CrudHook<R> {
    pub fn new(store: Arc<EntityStore<R>>, filter: ListFilter) -> Self {
        Self {
            store,
            filter,
            auto_fetch: true,
            refresh_after_write: false,
        }
    }

    /// Hook for the records of one pet.
    pub fn for_pet(store: Arc<EntityStore<R>>, pet_id: impl Into<String>) -> Self {
        Self::new(store, ListFilter::for_pet(pet_id))
    }

    /// Skip the initial load in [`mount`](Self::mount).
    pub fn without_auto_fetch(mut self) -> Self {
        self.auto_fetch = false;
        self
    }

    /// Reload the list after every create or update.
    pub fn refresh_after_write(mut self) -> Self {
        self.refresh_after_write = true;
        self
    }

    pub fn store(&self) -> &Arc<EntityStore<R>> {
        &self.store
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn state(&self) -> StoreState<R> {
        self.store.state()
    }

    /// Loads the list unless auto-fetch is off, or the hook is pet-scoped
    /// and has no pet.
    pub async fn mount(&self) {
        if !self.auto_fetch {
            return;
        }
        if R::PET_SCOPED && self.filter.pet_id.as_deref().map_or(false, str::is_empty) {
            return;
        }
        self.refresh().await;
    }

    pub async fn refresh(&self) -> bool {
        self.store.fetch_all(&self.filter).await
    }

    pub async fn handle_create(&self, input: &R::Input) -> Option<R> {
        match self.store.create(input, self.filter.pet_id.as_deref()).await {
            Ok(item) => {
                if self.refresh_after_write {
                    self.refresh().await;
                }
                Some(item)
            }
            Err(e) => {
                tracing::error!(resource = R::LABEL, error = %e, "create failed");
                None
            }
        }
    }

    pub async fn handle_update(&self, id: &str, update: &R::Update) -> Option<R> {
        match self.store.update(id, update).await {
            Ok(item) => {
                if self.refresh_after_write {
                    self.refresh().await;
                }
                Some(item)
            }
            Err(e) => {
                tracing::error!(resource = R::LABEL, id, error = %e, "update failed");
                None
            }
        }
    }

    pub async fn handle_delete(&self, id: &str) -> bool {
        let deleted = self.store.delete(id).await;
        if !deleted {
            tracing::error!(resource = R::LABEL, id, "delete failed");
        }
        deleted
    }

    /// Selects from the cache, falling back to the backend.
    pub async fn select(&self, id: &str) -> Option<R> {
        match self.store.get_by_id(id) {
            Some(existing) => {
                self.store.set_selected(Some(existing.clone()));
                Some(existing)
            }
            None => self.store.fetch_by_id(id).await,
        }
    }
}

impl CrudHook<Reminder> {
    /// Reminders listed for an optional pet and active flag. Lists refresh
    /// after each write.
    pub fn reminders(
        store: Arc<EntityStore<Reminder>>,
        pet_id: Option<String>,
        is_active: Option<bool>,
    ) -> Self {
        let filter = ListFilter { pet_id, is_active };
        Self::new(store, filter).refresh_after_write()
    }

    /// Flips `current` and reloads the list.
    pub async fn toggle(&self, id: &str, current: bool) -> Option<Reminder> {
        match self.store.toggle_active(id, !current).await {
            Ok(reminder) => {
                self.refresh().await;
                Some(reminder)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "toggle failed");
                None
            }
        }
    }
}
