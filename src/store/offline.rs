//! In-memory backend for offline and demo use.
//!
//! Records are kept as wire JSON objects. Creates get a fresh UUID and
//! timestamps; nothing touches the network.

use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::backend::Backend;
use crate::api::ApiError;
use crate::dates::now_iso;
use crate::models::Pet;
use crate::resource::{ListFilter, Resource};

/// Owner assigned to records created offline
pub const OFFLINE_OWNER: &str = "offline-user";

pub struct OfflineBackend<R> {
    records: Mutex<Vec<Map<String, Value>>>,
    owner_id: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> OfflineBackend<R> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            owner_id: OFFLINE_OWNER.to_string(),
            _resource: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Map<String, Value>>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn decode(record: Map<String, Value>) -> Result<R::Wire, ApiError> {
        serde_json::from_value(Value::Object(record)).map_err(ApiError::from)
    }

    fn matches(&self, record: &Map<String, Value>, filter: &ListFilter) -> bool {
        if R::PET_SCOPED {
            if let Some(pet_id) = &filter.pet_id {
                if record.get("pet_id").and_then(Value::as_str) != Some(pet_id.as_str()) {
                    return false;
                }
            }
        }
        match (filter.is_active, record.get("is_active").and_then(Value::as_bool)) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

impl<R: Resource> Default for OfflineBackend<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl OfflineBackend<Pet> {
    /// Two sample pets for trying the client without a backend.
    pub fn demo() -> Self {
        let backend = Self::new();
        let now = now_iso();
        let samples = [
            ("demo-pet-1", "Toby", "Dog", "Golden Retriever", "2021-03-15", 3, "28", "Male"),
            ("demo-pet-2", "Iggy", "Iguana", "Green Iguana", "2022-06-10", 2, "1.5", "Female"),
        ];
        {
            let mut records = backend.lock();
            for (id, name, species, breed, birth_date, age, weight, sex) in samples {
                let value = serde_json::json!({
                    "id": id,
                    "name": name,
                    "species": species,
                    "breed": breed,
                    "birth_date": birth_date,
                    "age_years": age,
                    "weight_kg": weight,
                    "sex": sex,
                    "photo_url": null,
                    "notes": null,
                    "owner_id": OFFLINE_OWNER,
                    "created_at": now,
                    "updated_at": now,
                });
                if let Value::Object(map) = value {
                    records.push(map);
                }
            }
        }
        backend
    }
}

fn to_object<T: serde::Serialize>(value: &T) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Decode(format!("expected an object, got {}", other))),
    }
}

#[async_trait]
impl<R: Resource> Backend<R> for OfflineBackend<R> {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<R::Wire>, ApiError> {
        let records = self.lock();
        records
            .iter()
            .filter(|r| self.matches(r, filter))
            .cloned()
            .map(Self::decode)
            .collect()
    }

    async fn get(&self, id: &str) -> Result<R::Wire, ApiError> {
        let records = self.lock();
        let record = records
            .iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(R::LABEL))?;
        Self::decode(record)
    }

    async fn create(&self, request: &R::CreateRequest) -> Result<R::Wire, ApiError> {
        let mut record = to_object(request)?;
        let now = now_iso();
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        record
            .entry("owner_id".to_string())
            .or_insert_with(|| Value::String(self.owner_id.clone()));
        record.insert("created_at".to_string(), Value::String(now.clone()));
        record.insert("updated_at".to_string(), Value::String(now));

        // Normalize through the wire type so stored records carry every field
        let wire = Self::decode(record)?;
        let stored = to_object(&wire)?;
        self.lock().push(stored);
        Ok(wire)
    }

    async fn update(&self, id: &str, request: &R::UpdateRequest) -> Result<R::Wire, ApiError> {
        let changes = to_object(request)?;
        let mut records = self.lock();
        let record = records
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| ApiError::not_found(R::LABEL))?;

        let mut merged = record.clone();
        merged.extend(changes);
        merged.insert("updated_at".to_string(), Value::String(now_iso()));

        let wire = Self::decode(merged)?;
        *record = to_object(&wire)?;
        Ok(wire)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.get("id").and_then(Value::as_str) != Some(id));
        if records.len() == before {
            return Err(ApiError::not_found(R::LABEL));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PetInput, Reminder, ReminderInput, ReminderUpdate, Vaccine, VaccineInput};
    use crate::patch::Patch;

    #[tokio::test]
    async fn test_create_fabricates_id_and_timestamps() {
        let backend = OfflineBackend::<Pet>::new();
        let request = Pet::create_request(&PetInput::new("Luna", "Cat"), None);

        let wire = backend.create(&request).await.unwrap();
        assert!(Uuid::parse_str(&wire.id).is_ok());
        assert_eq!(wire.owner_id, OFFLINE_OWNER);
        assert!(!wire.created_at.is_empty());
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn test_create_missing_required_field_is_rejected() {
        let backend = OfflineBackend::<Pet>::new();
        let request = Pet::create_request(&PetInput::default(), None);

        let result = backend.create(&request).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_clears() {
        let backend = OfflineBackend::<Pet>::demo();
        let update = PetInput {
            notes: Patch::Value("Needs a bath".to_string()),
            breed: Patch::Null,
            ..Default::default()
        };

        let wire = backend
            .update("demo-pet-1", &Pet::update_request(&update))
            .await
            .unwrap();
        assert_eq!(wire.notes.as_deref(), Some("Needs a bath"));
        assert!(wire.breed.is_none());
        assert_eq!(wire.name, "Toby");
    }

    #[tokio::test]
    async fn test_list_filters_by_pet_and_active() {
        let backend = OfflineBackend::<Reminder>::new();
        for (pet, title) in [("pet-1", "A"), ("pet-1", "B"), ("pet-2", "C")] {
            let input = ReminderInput {
                title: title.to_string(),
                event_time: "2025-06-01T08:00:00.000Z".to_string(),
                ..Default::default()
            };
            backend
                .create(&Reminder::create_request(&input, Some(pet)))
                .await
                .unwrap();
        }
        let all = backend.list(&ListFilter::for_pet("pet-1")).await.unwrap();
        assert_eq!(all.len(), 2);

        let first = all[0].id.clone();
        backend
            .update(&first, &Reminder::update_request(&ReminderUpdate::active(false)))
            .await
            .unwrap();

        let active = backend
            .list(&ListFilter::for_pet("pet-1").active(true))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "B");
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let backend = OfflineBackend::<Vaccine>::new();
        let err = backend.delete("nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        let input = VaccineInput {
            vaccine_name: "Rabia".to_string(),
            date_administered: "2025-01-01".to_string(),
            ..Default::default()
        };
        let created = backend
            .create(&Vaccine::create_request(&input, Some("pet-1")))
            .await
            .unwrap();
        assert!(backend.get(&created.id).await.is_ok());
        backend.delete(&created.id).await.unwrap();
        assert!(backend.get(&created.id).await.is_err());
    }
}
