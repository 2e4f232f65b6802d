use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patch::Patch;
use crate::resource::Resource;

/// Pet as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetResponse {
    pub id: String,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub age_years: Option<i32>,
    #[serde(default)]
    pub weight_kg: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A pet owned by the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<String>,
    pub age_years: Option<i32>,
    /// Decimal kept as the backend sends it
    pub weight_kg: Option<String>,
    pub sex: Option<String>,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    /// Not provided by the backend yet
    pub health_status: Option<String>,
}

/// Pet form data. The same shape serves create and partial update: an
/// `Unset` field is left alone, a blank string clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetInput {
    pub name: Patch<String>,
    pub species: Patch<String>,
    pub breed: Patch<String>,
    pub birth_date: Patch<String>,
    pub age_years: Patch<i32>,
    pub weight_kg: Patch<String>,
    pub sex: Patch<String>,
    pub photo_url: Patch<String>,
    pub notes: Patch<String>,
}

impl PetInput {
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            name: Patch::Value(name.into()),
            species: Patch::Value(species.into()),
            ..Default::default()
        }
    }
}

/// Body of `POST /pets` and `PUT /pets/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PetRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub species: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub breed: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub birth_date: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub age_years: Patch<i32>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub weight_kg: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub sex: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub photo_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notes: Patch<String>,
}

impl From<&PetInput> for PetRequest {
    fn from(input: &PetInput) -> Self {
        Self {
            name: input.name.trimmed_or_null(),
            species: input.species.trimmed_or_null(),
            breed: input.breed.trimmed_or_null(),
            birth_date: input.birth_date.trimmed_or_null(),
            age_years: input.age_years.clone(),
            weight_kg: input.weight_kg.trimmed_or_null(),
            sex: input.sex.trimmed_or_null(),
            photo_url: input.photo_url.trimmed_or_null(),
            notes: input.notes.trimmed_or_null(),
        }
    }
}

impl Resource for Pet {
    type Wire = PetResponse;
    type Input = PetInput;
    type CreateRequest = PetRequest;
    type Update = PetInput;
    type UpdateRequest = PetRequest;

    const PATH: &'static str = "/pets";
    const LABEL: &'static str = "Pet";
    const PET_SCOPED: bool = false;

    fn from_wire(wire: PetResponse) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            species: wire.species,
            breed: wire.breed,
            birth_date: wire.birth_date,
            age_years: wire.age_years,
            weight_kg: wire.weight_kg,
            sex: wire.sex,
            photo_url: wire.photo_url,
            notes: wire.notes,
            owner_id: wire.owner_id,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            health_status: None,
        }
    }

    fn to_wire(&self) -> PetResponse {
        PetResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            species: self.species.clone(),
            breed: self.breed.clone(),
            birth_date: self.birth_date.clone(),
            age_years: self.age_years,
            weight_kg: self.weight_kg.clone(),
            sex: self.sex.clone(),
            photo_url: self.photo_url.clone(),
            notes: self.notes.clone(),
            owner_id: self.owner_id.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn create_request(input: &PetInput, _parent_id: Option<&str>) -> PetRequest {
        PetRequest::from(input)
    }

    fn update_request(update: &PetInput) -> PetRequest {
        PetRequest::from(update)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.species)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "ID: {}", self.id)?;
        if let Some(breed) = &self.breed {
            writeln!(f, "Breed: {}", breed)?;
        }
        if let Some(sex) = &self.sex {
            writeln!(f, "Sex: {}", sex)?;
        }
        if let Some(birth_date) = &self.birth_date {
            writeln!(f, "Born: {}", crate::dates::format_date(birth_date))?;
        }
        if let Some(age) = self.age_years {
            writeln!(f, "Age: {} years", age)?;
        }
        if let Some(weight) = &self.weight_kg {
            writeln!(f, "Weight: {} kg", weight)?;
        }
        if let Some(photo) = &self.photo_url {
            writeln!(f, "Photo: {}", photo)?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f, "\nNotes: {}", notes)?;
        }
        Ok(())
    }
}
