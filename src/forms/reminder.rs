use super::validate::{FormErrors, Validator};
use super::{optional, FormModel};
use crate::config::DEFAULT_TIMEZONE;
use crate::dates::{combine_date_and_time_to_iso, parse_date, parse_time, split_local};
use crate::models::{Frequency, Reminder, ReminderInput};

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderForm {
    pub title: String,
    pub description: String,
    /// Local `YYYY-MM-DD`
    pub event_date: String,
    /// Local `HH:MM`
    pub event_hour: String,
    pub timezone: String,
    pub frequency: Frequency,
    pub is_active: bool,
    pub notify_by_email: bool,
    pub notify_in_app: bool,
}

impl Default for ReminderForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            event_date: String::new(),
            event_hour: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            frequency: Frequency::Once,
            is_active: true,
            notify_by_email: true,
            notify_in_app: true,
        }
    }
}

impl ReminderForm {
    /// Blank form for the configured timezone.
    pub fn with_timezone(timezone: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
            ..Default::default()
        }
    }

    /// Pre-fills date and hour from a suggested ISO time.
    pub fn suggested_at(mut self, event_time: &str) -> Self {
        if let Some((date, hour)) = split_local(event_time) {
            self.event_date = date;
            self.event_hour = hour;
        }
        self
    }
}

impl FormModel for ReminderForm {
    type Entity = Reminder;
    type Output = ReminderInput;

    fn from_entity(reminder: &Reminder) -> Self {
        let (event_date, event_hour) = split_local(&reminder.event_time).unwrap_or_default();
        Self {
            title: reminder.title.clone(),
            description: reminder.description.clone().unwrap_or_default(),
            event_date,
            event_hour,
            timezone: reminder
                .timezone
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            frequency: reminder.frequency,
            is_active: reminder.is_active,
            notify_by_email: reminder.notify_by_email,
            notify_in_app: reminder.notify_in_app,
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("title", &self.title)
            .required("Title is required")
            .min_length(1, "Title is required")
            .max_length(200, "Title cannot exceed 200 characters");
        v.field("event_date", &self.event_date)
            .required("Date is required")
            .satisfies(|d| parse_date(d).is_some(), "Invalid date");
        v.field("event_hour", &self.event_hour)
            .required("Hour is required")
            .satisfies(|h| parse_time(h).is_some(), "Invalid hour");
        v.finish()
    }

    fn to_output(&self) -> ReminderInput {
        let event_time =
            combine_date_and_time_to_iso(self.event_date.trim(), Some(self.event_hour.trim()))
                .unwrap_or_default();
        ReminderInput {
            title: self.title.trim().to_string(),
            event_time,
            description: optional(&self.description),
            timezone: Some(optional(&self.timezone).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())),
            frequency: Some(self.frequency),
            rrule: None,
            is_active: Some(self.is_active),
            notify_by_email: Some(self.notify_by_email),
            notify_in_app: Some(self.notify_in_app),
            pet_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form = ReminderForm::default();
        assert_eq!(form.timezone, "UTC");
        assert_eq!(form.frequency, Frequency::Once);
        assert!(form.is_active && form.notify_by_email && form.notify_in_app);
    }

    #[test]
    fn test_requires_title_date_and_hour() {
        let errors = ReminderForm::default().validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert!(errors.contains("event_date"));
        assert!(errors.contains("event_hour"));
    }

    #[test]
    fn test_output_combines_date_and_hour() {
        let form = ReminderForm {
            title: "Deworming".to_string(),
            event_date: "2025-06-01".to_string(),
            event_hour: "08:00".to_string(),
            timezone: "  ".to_string(),
            frequency: Frequency::Monthly,
            notify_by_email: false,
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        let input = form.to_output();
        assert!(input.event_time.starts_with("2025-0"));
        assert!(input.event_time.ends_with(":00.000Z"));
        assert_eq!(input.timezone.as_deref(), Some("UTC"));
        assert_eq!(input.frequency, Some(Frequency::Monthly));
        assert_eq!(input.notify_by_email, Some(false));
        assert!(input.description.is_none());
    }

    #[test]
    fn test_with_timezone() {
        let form = ReminderForm::with_timezone("Europe/Madrid");
        assert_eq!(form.timezone, "Europe/Madrid");
        assert!(form.title.is_empty());
    }
}
