//! Sign-in, registration and password recovery forms.
//!
//! These forms have no edit mode; their entity type is `()`.

use super::validate::{FormErrors, Validator, EMAIL, HAS_DIGIT, HAS_LOWERCASE, HAS_UPPERCASE};
use super::FormModel;
use crate::models::{Credentials, ResetPasswordRequest};

const EMAIL_REQUIRED: &str = "Email is required";
const INVALID_EMAIL: &str = "Invalid email";
const PASSWORD_REQUIRED: &str = "Password is required";
const WEAK_PASSWORD: &str =
    "At least 8 characters, with one lowercase letter, one uppercase letter and one number";
const PASSWORD_MISMATCH: &str = "Passwords do not match";

fn check_email(v: &mut Validator, email: &str) {
    v.field("email", email)
        .required(EMAIL_REQUIRED)
        .pattern(&EMAIL, INVALID_EMAIL);
}

/// Password strength and confirmation rules for new passwords.
fn check_new_password(v: &mut Validator, password: &str, confirm: &str) {
    v.field("password", password)
        .required(PASSWORD_REQUIRED)
        .min_length(8, WEAK_PASSWORD)
        .pattern(&HAS_LOWERCASE, WEAK_PASSWORD)
        .pattern(&HAS_UPPERCASE, WEAK_PASSWORD)
        .pattern(&HAS_DIGIT, WEAK_PASSWORD);
    v.field("confirm_password", confirm)
        .required("Please confirm the password");
    if !confirm.is_empty() {
        v.check("confirm_password", password == confirm, PASSWORD_MISMATCH);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FormModel for LoginForm {
    type Entity = ();
    type Output = Credentials;

    fn from_entity(_: &()) -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        check_email(&mut v, &self.email);
        v.field("password", &self.password)
            .required(PASSWORD_REQUIRED)
            .min_length(6, "Password must be at least 6 characters");
        v.finish()
    }

    fn to_output(&self) -> Credentials {
        Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormModel for RegisterForm {
    type Entity = ();
    type Output = Credentials;

    fn from_entity(_: &()) -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        check_email(&mut v, &self.email);
        check_new_password(&mut v, &self.password, &self.confirm_password);
        v.finish()
    }

    fn to_output(&self) -> Credentials {
        Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl FormModel for ForgotPasswordForm {
    type Entity = ();
    /// The email to send the reset link to
    type Output = String;

    fn from_entity(_: &()) -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        check_email(&mut v, &self.email);
        v.finish()
    }

    fn to_output(&self) -> String {
        self.email.trim().to_string()
    }
}

/// New password form reached from the emailed link; `token` comes from the link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormModel for ResetPasswordForm {
    type Entity = ();
    type Output = ResetPasswordRequest;

    fn from_entity(_: &()) -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("token", &self.token)
            .required("The reset link is invalid or incomplete");
        check_new_password(&mut v, &self.password, &self.confirm_password);
        v.finish()
    }

    fn to_output(&self) -> ResetPasswordRequest {
        ResetPasswordRequest {
            token: self.token.trim().to_string(),
            new_password: self.password.clone(),
        }
    }
}
