use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patch::Patch;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Read,
    Replied,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactStatus::Pending => write!(f, "pending"),
            ContactStatus::Read => write!(f, "read"),
            ContactStatus::Replied => write!(f, "replied"),
        }
    }
}

/// Contact form submission as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub accept_terms: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub email: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub subject: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub message: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub accept_terms: Patch<bool>,
}

impl Resource for ContactSubmission {
    type Wire = ContactResponse;
    type Input = ContactInput;
    // The contact endpoint takes the form fields as they are
    type CreateRequest = ContactInput;
    type Update = ContactUpdate;
    type UpdateRequest = ContactUpdate;

    const PATH: &'static str = "/contact";
    const LABEL: &'static str = "Contact form";
    const PET_SCOPED: bool = false;

    fn from_wire(wire: ContactResponse) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            subject: wire.subject,
            message: wire.message,
            status: wire.status,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn to_wire(&self) -> ContactResponse {
        ContactResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            status: self.status,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn create_request(input: &ContactInput, _parent_id: Option<&str>) -> ContactInput {
        input.clone()
    }

    fn update_request(update: &ContactUpdate) -> ContactUpdate {
        update.clone()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ContactSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} <{}>: {}  {}",
            self.status, self.name, self.email, self.subject, self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_through_wire() {
        let wire: ContactResponse = serde_json::from_value(json!({
            "id": "c-1",
            "name": "Ana",
            "email": "ana@example.com",
            "subject": "Hola",
            "message": "Consulta",
            "status": "replied",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let submission = ContactSubmission::from_wire(wire.clone());
        assert_eq!(submission.status, ContactStatus::Replied);
        assert_eq!(submission.to_wire(), wire);
    }

    #[test]
    fn test_create_body_keeps_accept_terms() {
        let input = ContactInput {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            subject: "Hola".to_string(),
            message: "Consulta".to_string(),
            accept_terms: true,
        };
        let body = serde_json::to_value(ContactSubmission::create_request(&input, None)).unwrap();
        assert_eq!(body["acceptTerms"], true);
    }

    #[test]
    fn test_update_includes_only_present_keys() {
        let update = ContactUpdate {
            subject: Patch::Value("Nuevo".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(ContactSubmission::update_request(&update)).unwrap();
        assert_eq!(body, json!({"subject": "Nuevo"}));
    }
}
