use super::validate::{FormErrors, Validator};
use super::{optional, FormModel};
use crate::dates::{combine_date_and_time_to_iso, date_only, parse_date, parse_time, split_local};
use crate::models::{Deworming, DewormingInput, Vaccine, VaccineInput, VetVisit, VetVisitInput};

const NEXT_DUE_AFTER: &str = "Next due date must be after the administered date";
const INVALID_DATE: &str = "Invalid date";

/// Flags `later` unless it is strictly after `earlier`. Unparseable dates are
/// left to their own field rules.
fn check_after(v: &mut Validator, field: &'static str, earlier: &str, later: &str, message: &str) {
    if let (Some(earlier), Some(later)) = (parse_date(earlier), parse_date(later)) {
        v.check(field, later > earlier, message);
    }
}

fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccineForm {
    pub vaccine_name: String,
    pub date_administered: String,
    pub next_due: String,
    pub veterinarian: String,
    pub manufacturer: String,
    pub lot_number: String,
    pub notes: String,
}

impl FormModel for VaccineForm {
    type Entity = Vaccine;
    type Output = VaccineInput;

    fn from_entity(vaccine: &Vaccine) -> Self {
        Self {
            vaccine_name: vaccine.vaccine_name.clone(),
            date_administered: date_only(&vaccine.date_administered).to_string(),
            next_due: vaccine
                .next_due
                .as_deref()
                .map(|d| date_only(d).to_string())
                .unwrap_or_default(),
            veterinarian: vaccine.veterinarian.clone().unwrap_or_default(),
            manufacturer: vaccine.manufacturer.clone().unwrap_or_default(),
            lot_number: vaccine.lot_number.clone().unwrap_or_default(),
            notes: vaccine.notes.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("vaccine_name", &self.vaccine_name)
            .required("Vaccine name is required")
            .min_length(1, "Vaccine name is required")
            .max_length(200, "Vaccine name cannot exceed 200 characters");
        v.field("date_administered", &self.date_administered)
            .required("Date administered is required")
            .satisfies(is_date, INVALID_DATE);
        v.field("next_due", &self.next_due)
            .satisfies(is_date, INVALID_DATE);
        check_after(
            &mut v,
            "next_due",
            &self.date_administered,
            &self.next_due,
            NEXT_DUE_AFTER,
        );
        v.field("veterinarian", &self.veterinarian)
            .max_length(200, "Veterinarian cannot exceed 200 characters");
        v.field("manufacturer", &self.manufacturer)
            .max_length(200, "Manufacturer cannot exceed 200 characters");
        v.field("lot_number", &self.lot_number)
            .max_length(100, "Lot number cannot exceed 100 characters");
        v.finish()
    }

    fn to_output(&self) -> VaccineInput {
        VaccineInput {
            vaccine_name: self.vaccine_name.trim().to_string(),
            date_administered: self.date_administered.trim().to_string(),
            next_due: optional(&self.next_due),
            veterinarian: optional(&self.veterinarian),
            manufacturer: optional(&self.manufacturer),
            lot_number: optional(&self.lot_number),
            notes: optional(&self.notes),
            proof_document_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DewormingForm {
    pub medication: String,
    pub date_administered: String,
    pub next_due: String,
    pub veterinarian: String,
    pub notes: String,
}

impl FormModel for DewormingForm {
    type Entity = Deworming;
    type Output = DewormingInput;

    fn from_entity(deworming: &Deworming) -> Self {
        Self {
            medication: deworming.medication.clone().unwrap_or_default(),
            date_administered: date_only(&deworming.date_administered).to_string(),
            next_due: deworming
                .next_due
                .as_deref()
                .map(|d| date_only(d).to_string())
                .unwrap_or_default(),
            veterinarian: deworming.veterinarian.clone().unwrap_or_default(),
            notes: deworming.notes.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("medication", &self.medication)
            .max_length(200, "Medication cannot exceed 200 characters");
        v.field("date_administered", &self.date_administered)
            .required("Date administered is required")
            .satisfies(is_date, INVALID_DATE);
        v.field("next_due", &self.next_due)
            .satisfies(is_date, INVALID_DATE);
        check_after(
            &mut v,
            "next_due",
            &self.date_administered,
            &self.next_due,
            NEXT_DUE_AFTER,
        );
        v.field("veterinarian", &self.veterinarian)
            .max_length(200, "Veterinarian cannot exceed 200 characters");
        v.finish()
    }

    fn to_output(&self) -> DewormingInput {
        DewormingInput {
            medication: optional(&self.medication),
            date_administered: self.date_administered.trim().to_string(),
            next_due: optional(&self.next_due),
            veterinarian: optional(&self.veterinarian),
            notes: optional(&self.notes),
        }
    }
}

/// Visit dates are edited as a local date plus an `HH:MM` hour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VetVisitForm {
    pub visit_date: String,
    pub visit_hour: String,
    pub reason: String,
    pub diagnosis: String,
    pub treatment: String,
    pub follow_up_date: String,
    pub follow_up_hour: String,
    pub veterinarian: String,
}

impl FormModel for VetVisitForm {
    type Entity = VetVisit;
    type Output = VetVisitInput;

    fn from_entity(visit: &VetVisit) -> Self {
        let (visit_date, visit_hour) = split_local(&visit.visit_date).unwrap_or_default();
        let (follow_up_date, follow_up_hour) = visit
            .follow_up_date
            .as_deref()
            .and_then(split_local)
            .unwrap_or_default();
        Self {
            visit_date,
            visit_hour,
            reason: visit.reason.clone().unwrap_or_default(),
            diagnosis: visit.diagnosis.clone().unwrap_or_default(),
            treatment: visit.treatment.clone().unwrap_or_default(),
            follow_up_date,
            follow_up_hour,
            veterinarian: visit.veterinarian.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("visit_date", &self.visit_date)
            .required("Visit date is required")
            .satisfies(is_date, INVALID_DATE);
        v.field("visit_hour", &self.visit_hour)
            .required("Visit hour is required")
            .satisfies(|h| parse_time(h).is_some(), "Invalid hour");
        v.field("follow_up_date", &self.follow_up_date)
            .satisfies(is_date, INVALID_DATE);
        v.field("follow_up_hour", &self.follow_up_hour)
            .satisfies(|h| parse_time(h).is_some(), "Invalid hour");
        check_after(
            &mut v,
            "follow_up_date",
            &self.visit_date,
            &self.follow_up_date,
            "Follow-up date must be after the visit date",
        );
        v.field("veterinarian", &self.veterinarian)
            .max_length(200, "Veterinarian cannot exceed 200 characters");
        v.finish()
    }

    fn to_output(&self) -> VetVisitInput {
        let visit_date =
            combine_date_and_time_to_iso(self.visit_date.trim(), Some(self.visit_hour.trim()))
                .unwrap_or_default();
        let follow_up_date = optional(&self.follow_up_date).and_then(|date| {
            let hour = optional(&self.follow_up_hour);
            combine_date_and_time_to_iso(&date, hour.as_deref())
        });
        VetVisitInput {
            visit_date,
            reason: optional(&self.reason),
            diagnosis: optional(&self.diagnosis),
            treatment: optional(&self.treatment),
            follow_up_date,
            veterinarian: optional(&self.veterinarian),
            documents_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vaccine_next_due_must_follow_administered() {
        let form = VaccineForm {
            vaccine_name: "Rabia".to_string(),
            date_administered: "2025-01-01".to_string(),
            next_due: "2025-01-01".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("next_due"), Some(NEXT_DUE_AFTER));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_vaccine_required_fields() {
        let errors = VaccineForm::default().validate().unwrap_err();
        assert!(errors.contains("vaccine_name"));
        assert!(errors.contains("date_administered"));
        assert!(!errors.contains("next_due"));
    }

    #[test]
    fn test_vaccine_output_blank_to_none() {
        let form = VaccineForm {
            vaccine_name: " Rabia ".to_string(),
            date_administered: "2025-01-01".to_string(),
            veterinarian: "   ".to_string(),
            lot_number: "A12".to_string(),
            ..Default::default()
        };
        let input = form.to_output();
        assert_eq!(input.vaccine_name, "Rabia");
        assert_eq!(input.veterinarian, None);
        assert_eq!(input.lot_number.as_deref(), Some("A12"));
    }

    #[test]
    fn test_deworming_rules() {
        let form = DewormingForm {
            medication: "x".repeat(201),
            date_administered: "2025-03-01".to_string(),
            next_due: "2025-02-01".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains("medication"));
        assert_eq!(errors.get("next_due"), Some(NEXT_DUE_AFTER));
    }

    #[test]
    fn test_vet_visit_requires_hour() {
        let form = VetVisitForm {
            visit_date: "2025-03-01".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("visit_hour"), Some("Visit hour is required"));
    }

    #[test]
    fn test_vet_visit_output_is_iso() {
        let form = VetVisitForm {
            visit_date: "2025-03-01".to_string(),
            visit_hour: "09:30".to_string(),
            follow_up_date: "2025-03-15".to_string(),
            reason: "Checkup".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        let input = form.to_output();
        assert!(input.visit_date.ends_with('Z'));
        assert!(input.follow_up_date.is_some_and(|d| d.ends_with('Z')));
        assert_eq!(input.reason.as_deref(), Some("Checkup"));
        assert!(input.diagnosis.is_none());
    }

    #[test]
    fn test_vet_visit_follow_up_before_visit() {
        let form = VetVisitForm {
            visit_date: "2025-03-01".to_string(),
            visit_hour: "09:30".to_string(),
            follow_up_date: "2025-02-01".to_string(),
            ..Default::default()
        };
        assert!(form.validate().unwrap_err().contains("follow_up_date"));
    }
}
