//! The generic remote-collection description shared by every entity.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// One backend collection: its endpoint, wire schemas and adapters.
///
/// `Self` is the view model. The adapter functions are pure; all I/O lives
/// in the store backends.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Response body for one entity (snake_case)
    type Wire: Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Validated form input for a create
    type Input: Send + Sync;
    type CreateRequest: Serialize + Send + Sync;
    /// Partial update; unset fields are left out of the payload
    type Update: Send + Sync;
    type UpdateRequest: Serialize + Send + Sync;

    /// Collection endpoint, e.g. `/pets`
    const PATH: &'static str;
    /// Human name used in notifications, e.g. `Pet`
    const LABEL: &'static str;
    /// Whether list filters on `pet_id` apply to this collection
    const PET_SCOPED: bool = true;
    /// Whether a create must name the owning pet
    const REQUIRES_PET: bool = Self::PET_SCOPED;

    fn from_wire(wire: Self::Wire) -> Self;
    fn to_wire(&self) -> Self::Wire;
    fn create_request(input: &Self::Input, parent_id: Option<&str>) -> Self::CreateRequest;
    fn update_request(update: &Self::Update) -> Self::UpdateRequest;

    fn id(&self) -> &str;

    fn pet_id(&self) -> Option<&str> {
        None
    }

    fn is_active(&self) -> Option<bool> {
        None
    }
}

/// Query filters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub pet_id: Option<String>,
    pub is_active: Option<bool>,
}

impl ListFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_pet(pet_id: impl Into<String>) -> Self {
        Self {
            pet_id: Some(pet_id.into()),
            is_active: None,
        }
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(pet_id) = &self.pet_id {
            pairs.push(("pet_id", pet_id.clone()));
        }
        if let Some(is_active) = self.is_active {
            pairs.push(("is_active", is_active.to_string()));
        }
        pairs
    }

    /// Client-side check, for backends that ignore the query.
    pub fn matches<R: Resource>(&self, item: &R) -> bool {
        if R::PET_SCOPED {
            if let Some(pet_id) = &self.pet_id {
                if item.pet_id() != Some(pet_id.as_str()) {
                    return false;
                }
            }
        }
        match (self.is_active, item.is_active()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

/// Path of one entity inside a collection.
pub fn item_path<R: Resource>(id: &str) -> String {
    format!("{}/{}", R::PATH, urlencoding::encode(id))
}
