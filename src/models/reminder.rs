use serde::{Deserialize, Serialize};
use std::fmt;

use super::frequency::Frequency;
use crate::patch::Patch;
use crate::resource::Resource;

/// Reminder as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderResponse {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub pet_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_time: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub rrule: Option<String>,
    pub is_active: bool,
    pub notify_by_email: bool,
    pub notify_in_app: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub owner_id: String,
    pub pet_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// ISO date-time in UTC
    pub event_time: String,
    pub timezone: Option<String>,
    pub frequency: Frequency,
    pub rrule: Option<String>,
    pub is_active: bool,
    pub notify_by_email: bool,
    pub notify_in_app: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderInput {
    pub title: String,
    pub event_time: String,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub frequency: Option<Frequency>,
    pub rrule: Option<String>,
    pub is_active: Option<bool>,
    pub notify_by_email: Option<bool>,
    pub notify_in_app: Option<bool>,
    pub pet_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderUpdate {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub event_time: Patch<String>,
    pub timezone: Patch<String>,
    pub frequency: Patch<Frequency>,
    pub rrule: Patch<String>,
    pub is_active: Patch<bool>,
    pub notify_by_email: Patch<bool>,
    pub notify_in_app: Patch<bool>,
    pub pet_id: Patch<String>,
}

impl ReminderUpdate {
    /// Update touching only the active flag.
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Patch::Value(is_active),
            ..Default::default()
        }
    }
}

/// Editing from a form rewrites what the form shows; the pet and the
/// recurrence rule are only sent when given.
impl From<ReminderInput> for ReminderUpdate {
    fn from(input: ReminderInput) -> Self {
        Self {
            title: Patch::Value(input.title),
            description: input.description.into(),
            event_time: Patch::Value(input.event_time),
            timezone: input.timezone.into(),
            frequency: Patch::Value(input.frequency.unwrap_or_default()),
            rrule: input.rrule.map_or(Patch::Unset, Patch::Value),
            is_active: Patch::Value(input.is_active.unwrap_or(true)),
            notify_by_email: Patch::Value(input.notify_by_email.unwrap_or(true)),
            notify_in_app: Patch::Value(input.notify_in_app.unwrap_or(true)),
            pet_id: input.pet_id.map_or(Patch::Unset, Patch::Value),
        }
    }
}

/// Body of `POST /reminders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderCreateRequest {
    pub title: String,
    pub event_time: String,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub frequency: Frequency,
    pub rrule: Option<String>,
    pub is_active: bool,
    pub notify_by_email: bool,
    pub notify_in_app: bool,
    pub pet_id: Option<String>,
}

/// Body of `PUT /reminders/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReminderUpdateRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub title: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub event_time: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub timezone: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub frequency: Patch<Frequency>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub rrule: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub is_active: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notify_by_email: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notify_in_app: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub pet_id: Patch<String>,
}

impl Resource for Reminder {
    type Wire = ReminderResponse;
    type Input = ReminderInput;
    type CreateRequest = ReminderCreateRequest;
    type Update = ReminderUpdate;
    type UpdateRequest = ReminderUpdateRequest;

    const PATH: &'static str = "/reminders";
    const LABEL: &'static str = "Reminder";
    const REQUIRES_PET: bool = false;

    fn from_wire(wire: ReminderResponse) -> Self {
        Self {
            id: wire.id,
            owner_id: wire.owner_id,
            pet_id: wire.pet_id,
            title: wire.title,
            description: wire.description,
            event_time: wire.event_time,
            timezone: wire.timezone,
            frequency: wire.frequency,
            rrule: wire.rrule,
            is_active: wire.is_active,
            notify_by_email: wire.notify_by_email,
            notify_in_app: wire.notify_in_app,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn to_wire(&self) -> ReminderResponse {
        ReminderResponse {
            id: self.id.clone(),
            owner_id: self.owner_id.clone(),
            pet_id: self.pet_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            event_time: self.event_time.clone(),
            timezone: self.timezone.clone(),
            frequency: self.frequency,
            rrule: self.rrule.clone(),
            is_active: self.is_active,
            notify_by_email: self.notify_by_email,
            notify_in_app: self.notify_in_app,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// `parent_id` wins over the input's own pet reference when given.
    fn create_request(input: &ReminderInput, parent_id: Option<&str>) -> ReminderCreateRequest {
        ReminderCreateRequest {
            title: input.title.clone(),
            event_time: input.event_time.clone(),
            description: input.description.clone(),
            timezone: input.timezone.clone(),
            frequency: input.frequency.unwrap_or_default(),
            rrule: input.rrule.clone(),
            is_active: input.is_active.unwrap_or(true),
            notify_by_email: input.notify_by_email.unwrap_or(true),
            notify_in_app: input.notify_in_app.unwrap_or(true),
            pet_id: parent_id
                .map(str::to_string)
                .or_else(|| input.pet_id.clone()),
        }
    }

    fn update_request(update: &ReminderUpdate) -> ReminderUpdateRequest {
        ReminderUpdateRequest {
            title: update.title.clone(),
            description: update.description.clone(),
            event_time: update.event_time.clone(),
            timezone: update.timezone.clone(),
            frequency: update.frequency.clone(),
            rrule: update.rrule.clone(),
            is_active: update.is_active.clone(),
            notify_by_email: update.notify_by_email.clone(),
            notify_in_app: update.notify_in_app.clone(),
            pet_id: update.pet_id.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> Option<&str> {
        self.pet_id.as_deref()
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_active { "on " } else { "off" };
        write!(
            f,
            "[{}] {}  {} ({})",
            status,
            crate::dates::format_date_time(&self.event_time),
            self.title,
            self.frequency
        )?;
        let mut channels = Vec::new();
        if self.notify_by_email {
            channels.push("email");
        }
        if self.notify_in_app {
            channels.push("app");
        }
        if !channels.is_empty() {
            write!(f, " via {}", channels.join("+"))?;
        }
        write!(f, "  {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Reminder {
        Reminder {
            id: "rem-1".to_string(),
            owner_id: "user-1".to_string(),
            pet_id: Some("pet-1".to_string()),
            title: "Vacuna anual".to_string(),
            description: None,
            event_time: "2025-06-01T12:00:00.000Z".to_string(),
            timezone: Some("Europe/Madrid".to_string()),
            frequency: Frequency::Yearly,
            rrule: None,
            is_active: true,
            notify_by_email: true,
            notify_in_app: false,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_round_trip_through_wire() {
        let reminder = sample();
        assert_eq!(Reminder::from_wire(reminder.to_wire()), reminder);
    }

    #[test]
    fn test_create_defaults() {
        let input = ReminderInput {
            title: "Pastilla".to_string(),
            event_time: "2025-06-01T08:00:00.000Z".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(Reminder::create_request(&input, None)).unwrap();
        assert_eq!(body["frequency"], "once");
        assert_eq!(body["is_active"], true);
        assert_eq!(body["notify_by_email"], true);
        assert_eq!(body["notify_in_app"], true);
        assert_eq!(body["pet_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_parent_id_overrides_input_pet() {
        let input = ReminderInput {
            pet_id: Some("pet-a".to_string()),
            ..Default::default()
        };
        let request = Reminder::create_request(&input, Some("pet-b"));
        assert_eq!(request.pet_id.as_deref(), Some("pet-b"));
    }

    #[test]
    fn test_toggle_payload_contains_only_is_active() {
        let body = serde_json::to_value(Reminder::update_request(&ReminderUpdate::active(false)))
            .unwrap();
        assert_eq!(body, json!({"is_active": false}));
    }

    #[test]
    fn test_missing_frequency_decodes_as_once() {
        let mut wire = serde_json::to_value(sample().to_wire()).unwrap();
        wire.as_object_mut().unwrap().remove("frequency");
        let parsed: ReminderResponse = serde_json::from_value(wire).unwrap();
        assert_eq!(parsed.frequency, Frequency::Once);
    }
}
