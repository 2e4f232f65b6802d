use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patch::Patch;
use crate::resource::Resource;

/// Deworming record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DewormingResponse {
    pub id: String,
    pub pet_id: String,
    #[serde(default)]
    pub medication: Option<String>,
    pub date_administered: String,
    #[serde(default)]
    pub next_due: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deworming {
    pub id: String,
    pub pet_id: String,
    pub medication: Option<String>,
    pub date_administered: String,
    pub next_due: Option<String>,
    pub veterinarian: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DewormingInput {
    pub medication: Option<String>,
    pub date_administered: String,
    pub next_due: Option<String>,
    pub veterinarian: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DewormingUpdate {
    pub medication: Patch<String>,
    pub date_administered: Patch<String>,
    pub next_due: Patch<String>,
    pub veterinarian: Patch<String>,
    pub notes: Patch<String>,
}

impl From<DewormingInput> for DewormingUpdate {
    fn from(input: DewormingInput) -> Self {
        Self {
            medication: input.medication.into(),
            date_administered: Patch::Value(input.date_administered),
            next_due: input.next_due.into(),
            veterinarian: input.veterinarian.into(),
            notes: input.notes.into(),
        }
    }
}

/// Body of `POST /dewormings`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DewormingCreateRequest {
    pub pet_id: String,
    pub date_administered: String,
    pub medication: Option<String>,
    pub next_due: Option<String>,
    pub veterinarian: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PUT /dewormings/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DewormingUpdateRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub medication: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub date_administered: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub next_due: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub veterinarian: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notes: Patch<String>,
}

impl Resource for Deworming {
    type Wire = DewormingResponse;
    type Input = DewormingInput;
    type CreateRequest = DewormingCreateRequest;
    type Update = DewormingUpdate;
    type UpdateRequest = DewormingUpdateRequest;

    const PATH: &'static str = "/dewormings";
    const LABEL: &'static str = "Deworming";

    fn from_wire(wire: DewormingResponse) -> Self {
        Self {
            id: wire.id,
            pet_id: wire.pet_id,
            medication: wire.medication,
            date_administered: wire.date_administered,
            next_due: wire.next_due,
            veterinarian: wire.veterinarian,
            notes: wire.notes,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn to_wire(&self) -> DewormingResponse {
        DewormingResponse {
            id: self.id.clone(),
            pet_id: self.pet_id.clone(),
            medication: self.medication.clone(),
            date_administered: self.date_administered.clone(),
            next_due: self.next_due.clone(),
            veterinarian: self.veterinarian.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn create_request(input: &DewormingInput, parent_id: Option<&str>) -> DewormingCreateRequest {
        DewormingCreateRequest {
            pet_id: parent_id.unwrap_or_default().to_string(),
            date_administered: input.date_administered.clone(),
            medication: input.medication.clone(),
            next_due: input.next_due.clone(),
            veterinarian: input.veterinarian.clone(),
            notes: input.notes.clone(),
        }
    }

    fn update_request(update: &DewormingUpdate) -> DewormingUpdateRequest {
        DewormingUpdateRequest {
            medication: update.medication.clone(),
            date_administered: update.date_administered.clone(),
            next_due: update.next_due.clone(),
            veterinarian: update.veterinarian.clone(),
            notes: update.notes.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> Option<&str> {
        Some(&self.pet_id)
    }
}

impl fmt::Display for Deworming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            crate::dates::date_only(&self.date_administered),
            self.medication.as_deref().unwrap_or("(unnamed)")
        )?;
        if let Some(next_due) = &self.next_due {
            write!(f, "  (next: {})", crate::dates::date_only(next_due))?;
        }
        write!(f, "  {}", self.id)
    }
}
