use std::marker::PhantomData;

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError};
use crate::resource::{item_path, ListFilter, Resource};

/// Where an [`EntityStore`](super::EntityStore) reads and writes its records.
///
/// Backends speak the wire schema; the store applies the adapters.
#[async_trait]
pub trait Backend<R: Resource>: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<R::Wire>, ApiError>;
    async fn get(&self, id: &str) -> Result<R::Wire, ApiError>;
    async fn create(&self, request: &R::CreateRequest) -> Result<R::Wire, ApiError>;
    async fn update(&self, id: &str, request: &R::UpdateRequest) -> Result<R::Wire, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// The REST backend: one collection endpoint per resource.
pub struct RemoteBackend<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> RemoteBackend<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> Backend<R> for RemoteBackend<R> {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<R::Wire>, ApiError> {
        self.client
            .get_with_query(R::PATH, &filter.query_pairs())
            .await
    }

    async fn get(&self, id: &str) -> Result<R::Wire, ApiError> {
        self.client.get(&item_path::<R>(id)).await
    }

    async fn create(&self, request: &R::CreateRequest) -> Result<R::Wire, ApiError> {
        self.client.post(R::PATH, request).await
    }

    async fn update(&self, id: &str, request: &R::UpdateRequest) -> Result<R::Wire, ApiError> {
        self.client.put(&item_path::<R>(id), request).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&item_path::<R>(id)).await
    }
}
