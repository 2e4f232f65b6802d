use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patch::Patch;
use crate::resource::Resource;

/// Vaccination record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationResponse {
    pub id: String,
    pub pet_id: String,
    pub vaccine_name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub lot_number: Option<String>,
    pub date_administered: String,
    #[serde(default)]
    pub next_due: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub proof_document_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    pub id: String,
    pub pet_id: String,
    pub vaccine_name: String,
    pub manufacturer: Option<String>,
    pub lot_number: Option<String>,
    pub date_administered: String,
    pub next_due: Option<String>,
    pub veterinarian: Option<String>,
    pub notes: Option<String>,
    pub proof_document_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccineInput {
    pub vaccine_name: String,
    pub date_administered: String,
    pub next_due: Option<String>,
    pub veterinarian: Option<String>,
    pub manufacturer: Option<String>,
    pub lot_number: Option<String>,
    pub notes: Option<String>,
    pub proof_document_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccineUpdate {
    pub vaccine_name: Patch<String>,
    pub date_administered: Patch<String>,
    pub next_due: Patch<String>,
    pub veterinarian: Patch<String>,
    pub manufacturer: Patch<String>,
    pub lot_number: Patch<String>,
    pub notes: Patch<String>,
    pub proof_document_id: Patch<String>,
}

/// Editing a record from a form sets every field.
impl From<VaccineInput> for VaccineUpdate {
    fn from(input: VaccineInput) -> Self {
        Self {
            vaccine_name: Patch::Value(input.vaccine_name),
            date_administered: Patch::Value(input.date_administered),
            next_due: input.next_due.into(),
            veterinarian: input.veterinarian.into(),
            manufacturer: input.manufacturer.into(),
            lot_number: input.lot_number.into(),
            notes: input.notes.into(),
            proof_document_id: input.proof_document_id.into(),
        }
    }
}

/// Body of `POST /vaccinations`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccinationCreateRequest {
    pub pet_id: String,
    pub vaccine_name: String,
    pub date_administered: String,
    pub next_due: Option<String>,
    pub veterinarian: Option<String>,
    pub manufacturer: Option<String>,
    pub lot_number: Option<String>,
    pub notes: Option<String>,
    pub proof_document_id: Option<String>,
}

/// Body of `PUT /vaccinations/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VaccinationUpdateRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub vaccine_name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub date_administered: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub next_due: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub veterinarian: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub manufacturer: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub lot_number: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notes: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub proof_document_id: Patch<String>,
}

impl Resource for Vaccine {
    type Wire = VaccinationResponse;
    type Input = VaccineInput;
    type CreateRequest = VaccinationCreateRequest;
    type Update = VaccineUpdate;
    type UpdateRequest = VaccinationUpdateRequest;

    const PATH: &'static str = "/vaccinations";
    const LABEL: &'static str = "Vaccine";

    fn from_wire(wire: VaccinationResponse) -> Self {
        Self {
            id: wire.id,
            pet_id: wire.pet_id,
            vaccine_name: wire.vaccine_name,
            manufacturer: wire.manufacturer,
            lot_number: wire.lot_number,
            date_administered: wire.date_administered,
            next_due: wire.next_due,
            veterinarian: wire.veterinarian,
            notes: wire.notes,
            proof_document_id: wire.proof_document_id,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn to_wire(&self) -> VaccinationResponse {
        VaccinationResponse {
            id: self.id.clone(),
            pet_id: self.pet_id.clone(),
            vaccine_name: self.vaccine_name.clone(),
            manufacturer: self.manufacturer.clone(),
            lot_number: self.lot_number.clone(),
            date_administered: self.date_administered.clone(),
            next_due: self.next_due.clone(),
            veterinarian: self.veterinarian.clone(),
            notes: self.notes.clone(),
            proof_document_id: self.proof_document_id.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn create_request(input: &VaccineInput, parent_id: Option<&str>) -> VaccinationCreateRequest {
        VaccinationCreateRequest {
            pet_id: parent_id.unwrap_or_default().to_string(),
            vaccine_name: input.vaccine_name.clone(),
            date_administered: input.date_administered.clone(),
            next_due: input.next_due.clone(),
            veterinarian: input.veterinarian.clone(),
            manufacturer: input.manufacturer.clone(),
            lot_number: input.lot_number.clone(),
            notes: input.notes.clone(),
            proof_document_id: input.proof_document_id.clone(),
        }
    }

    fn update_request(update: &VaccineUpdate) -> VaccinationUpdateRequest {
        VaccinationUpdateRequest {
            vaccine_name: update.vaccine_name.clone(),
            date_administered: update.date_administered.clone(),
            next_due: update.next_due.clone(),
            veterinarian: update.veterinarian.clone(),
            manufacturer: update.manufacturer.clone(),
            lot_number: update.lot_number.clone(),
            notes: update.notes.clone(),
            proof_document_id: update.proof_document_id.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> Option<&str> {
        Some(&self.pet_id)
    }
}

impl fmt::Display for Vaccine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            crate::dates::date_only(&self.date_administered),
            self.vaccine_name
        )?;
        if let Some(next_due) = &self.next_due {
            write!(f, "  (next: {})", crate::dates::date_only(next_due))?;
        }
        if let Some(vet) = &self.veterinarian {
            write!(f, "  [{}]", vet)?;
        }
        write!(f, "  {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vaccine {
        Vaccine {
            id: "vac-1".to_string(),
            pet_id: "pet-1".to_string(),
            vaccine_name: "Rabia".to_string(),
            manufacturer: Some("Zoetis".to_string()),
            lot_number: None,
            date_administered: "2025-01-01".to_string(),
            next_due: Some("2026-01-01".to_string()),
            veterinarian: None,
            notes: None,
            proof_document_id: None,
            created_at: "2025-01-01T10:00:00Z".to_string(),
            updated_at: "2025-01-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_round_trip_through_wire() {
        let vaccine = sample();
        assert_eq!(Vaccine::from_wire(vaccine.to_wire()), vaccine);
    }

    #[test]
    fn test_create_request_nulls_missing_optionals() {
        let input = VaccineInput {
            vaccine_name: "Rabia".to_string(),
            date_administered: "2025-01-01".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(Vaccine::create_request(&input, Some("pet-1"))).unwrap();
        assert_eq!(body["pet_id"], "pet-1");
        assert_eq!(body["vaccine_name"], "Rabia");
        assert_eq!(body["next_due"], serde_json::Value::Null);
        assert!(body.as_object().unwrap().contains_key("veterinarian"));
    }

    #[test]
    fn test_update_includes_only_present_keys() {
        let update = VaccineUpdate {
            next_due: Patch::Null,
            notes: Patch::Value(String::new()),
            ..Default::default()
        };
        let body = serde_json::to_value(Vaccine::update_request(&update)).unwrap();
        assert_eq!(body, json!({"next_due": null, "notes": ""}));
    }

    #[test]
    fn test_full_update_from_input_sets_every_key() {
        let input = VaccineInput {
            vaccine_name: "Rabia".to_string(),
            date_administered: "2025-01-01".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(Vaccine::update_request(&input.into())).unwrap();
        assert_eq!(body.as_object().unwrap().len(), 8);
        assert_eq!(body["manufacturer"], serde_json::Value::Null);
    }
}
