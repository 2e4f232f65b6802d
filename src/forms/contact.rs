use super::validate::{FormErrors, Validator, EMAIL};
use super::FormModel;
use crate::models::{ContactInput, ContactSubmission};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub accept_terms: bool,
}

impl FormModel for ContactForm {
    type Entity = ContactSubmission;
    type Output = ContactInput;

    fn from_entity(submission: &ContactSubmission) -> Self {
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
            accept_terms: true,
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("name", &self.name)
            .required("Name is required")
            .min_length(2, "Name must be at least 2 characters")
            .max_length(50, "Name cannot exceed 50 characters");
        v.field("email", &self.email)
            .required("Email is required")
            .pattern(&EMAIL, "Invalid email");
        v.field("subject", &self.subject)
            .required("Subject is required")
            .min_length(5, "Subject must be at least 5 characters");
        v.field("message", &self.message)
            .required("Message is required")
            .min_length(10, "Message must be at least 10 characters")
            .max_length(500, "Message cannot exceed 500 characters");
        v.check(
            "accept_terms",
            self.accept_terms,
            "You must accept the terms and conditions",
        );
        v.finish()
    }

    fn to_output(&self) -> ContactInput {
        ContactInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            accept_terms: self.accept_terms,
        }
    }
}
