use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patch::Patch;
use crate::resource::Resource;

/// Vet visit as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetVisitResponse {
    pub id: String,
    pub pet_id: String,
    pub visit_date: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub documents_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VetVisit {
    pub id: String,
    pub pet_id: String,
    /// ISO date-time in UTC
    pub visit_date: String,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub follow_up_date: Option<String>,
    pub veterinarian: Option<String>,
    pub documents_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Visit input; dates are already combined into ISO strings by the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VetVisitInput {
    pub visit_date: String,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub follow_up_date: Option<String>,
    pub veterinarian: Option<String>,
    pub documents_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VetVisitUpdate {
    pub visit_date: Patch<String>,
    pub reason: Patch<String>,
    pub diagnosis: Patch<String>,
    pub treatment: Patch<String>,
    pub follow_up_date: Patch<String>,
    pub veterinarian: Patch<String>,
    pub documents_id: Patch<String>,
}

impl From<VetVisitInput> for VetVisitUpdate {
    fn from(input: VetVisitInput) -> Self {
        Self {
            visit_date: Patch::Value(input.visit_date),
            reason: input.reason.into(),
            diagnosis: input.diagnosis.into(),
            treatment: input.treatment.into(),
            follow_up_date: input.follow_up_date.into(),
            veterinarian: input.veterinarian.into(),
            documents_id: input.documents_id.into(),
        }
    }
}

/// Body of `POST /vet-visits`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VetVisitCreateRequest {
    pub pet_id: String,
    pub visit_date: String,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub follow_up_date: Option<String>,
    pub veterinarian: Option<String>,
    pub documents_id: Option<String>,
}

/// Body of `PUT /vet-visits/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VetVisitUpdateRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visit_date: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub reason: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub diagnosis: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub treatment: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub follow_up_date: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub veterinarian: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub documents_id: Patch<String>,
}

/// Blank date strings are sent as null.
fn blank_as_null(value: &Patch<String>) -> Patch<String> {
    match value {
        Patch::Value(v) if v.is_empty() => Patch::Null,
        other => other.clone(),
    }
}

impl Resource for VetVisit {
    type Wire = VetVisitResponse;
    type Input = VetVisitInput;
    type CreateRequest = VetVisitCreateRequest;
    type Update = VetVisitUpdate;
    type UpdateRequest = VetVisitUpdateRequest;

    const PATH: &'static str = "/vet-visits";
    const LABEL: &'static str = "Vet visit";

    fn from_wire(wire: VetVisitResponse) -> Self {
        Self {
            id: wire.id,
            pet_id: wire.pet_id,
            visit_date: wire.visit_date,
            reason: wire.reason,
            diagnosis: wire.diagnosis,
            treatment: wire.treatment,
            follow_up_date: wire.follow_up_date,
            veterinarian: wire.veterinarian,
            documents_id: wire.documents_id,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn to_wire(&self) -> VetVisitResponse {
        VetVisitResponse {
            id: self.id.clone(),
            pet_id: self.pet_id.clone(),
            visit_date: self.visit_date.clone(),
            reason: self.reason.clone(),
            diagnosis: self.diagnosis.clone(),
            treatment: self.treatment.clone(),
            follow_up_date: self.follow_up_date.clone(),
            veterinarian: self.veterinarian.clone(),
            documents_id: self.documents_id.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// A blank visit date means "now".
    fn create_request(input: &VetVisitInput, parent_id: Option<&str>) -> VetVisitCreateRequest {
        let visit_date = if input.visit_date.is_empty() {
            crate::dates::now_iso()
        } else {
            input.visit_date.clone()
        };

        VetVisitCreateRequest {
            pet_id: parent_id.unwrap_or_default().to_string(),
            visit_date,
            reason: input.reason.clone(),
            diagnosis: input.diagnosis.clone(),
            treatment: input.treatment.clone(),
            follow_up_date: input.follow_up_date.clone().filter(|d| !d.is_empty()),
            veterinarian: input.veterinarian.clone(),
            documents_id: input.documents_id.clone(),
        }
    }

    fn update_request(update: &VetVisitUpdate) -> VetVisitUpdateRequest {
        VetVisitUpdateRequest {
            visit_date: blank_as_null(&update.visit_date),
            reason: update.reason.clone(),
            diagnosis: update.diagnosis.clone(),
            treatment: update.treatment.clone(),
            follow_up_date: blank_as_null(&update.follow_up_date),
            veterinarian: update.veterinarian.clone(),
            documents_id: update.documents_id.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> Option<&str> {
        Some(&self.pet_id)
    }
}

impl fmt::Display for VetVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::dates::format_date_time(&self.visit_date))?;
        if let Some(reason) = &self.reason {
            write!(f, "  {}", reason)?;
        }
        if let Some(vet) = &self.veterinarian {
            write!(f, "  [{}]", vet)?;
        }
        if let Some(follow_up) = &self.follow_up_date {
            write!(f, "  (follow-up: {})", crate::dates::date_only(follow_up))?;
        }
        write!(f, "  {}", self.id)
    }
}
