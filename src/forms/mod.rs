//! Form controllers: create/edit modes, validation and submission.
//!
//! Each entity form is a plain struct of string fields implementing
//! [`FormModel`]. [`Form`] wraps it with the create/edit state machine and
//! the submit path: validate, shape into the store's input type, save, then
//! reset on success or keep the values on failure.

mod auth;
mod contact;
mod health;
mod meal;
mod pet;
mod reminder;
mod validate;

pub use auth::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
pub use contact::ContactForm;
pub use health::{DewormingForm, VaccineForm, VetVisitForm};
pub use meal::MealForm;
pub use pet::PetForm;
pub use reminder::ReminderForm;
pub use validate::{FieldCheck, FormErrors, Pattern, Validator, EMAIL};

use std::fmt;
use std::future::Future;

/// Values of one form.
pub trait FormModel: Default + Clone {
    /// Entity an edit form is seeded from
    type Entity;
    /// What a valid form turns into
    type Output;

    fn from_entity(entity: &Self::Entity) -> Self;
    fn validate(&self) -> Result<(), FormErrors>;
    /// Shapes already validated values; blank optional strings become `None`.
    fn to_output(&self) -> Self::Output;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Why a submit did not go through.
#[derive(Debug)]
pub enum SubmitError<E> {
    /// Validation failed; nothing was sent
    Invalid(FormErrors),
    /// The save callback failed
    Save(E),
}

impl<E: fmt::Display> fmt::Display for SubmitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Invalid(errors) => write!(f, "Invalid input: {}", errors),
            SubmitError::Save(e) => write!(f, "{}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for SubmitError<E> {}

type SuccessCallback = Box<dyn FnMut() + Send>;

pub struct Form<M: FormModel> {
    values: M,
    defaults: M,
    mode: FormMode,
    errors: FormErrors,
    on_success: Option<SuccessCallback>,
}

impl<M: FormModel> Default for Form<M> {
    fn default() -> Self {
        Self::create()
    }
}

impl<M: FormModel> Form<M> {
    /// Blank create form.
    pub fn create() -> Self {
        Self::with_defaults(M::default())
    }

    /// Create form whose blank state is `defaults`.
    pub fn with_defaults(defaults: M) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            mode: FormMode::Create,
            errors: FormErrors::new(),
            on_success: None,
        }
    }

    /// Edit form seeded from `entity`.
    pub fn edit(entity: &M::Entity) -> Self {
        let mut form = Self::create();
        form.load(Some(entity));
        form
    }

    /// Runs after each successful submit.
    pub fn on_success<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Switches to editing `entity`, or back to a blank create form.
    pub fn load(&mut self, entity: Option<&M::Entity>) {
        match entity {
            Some(entity) => {
                self.values = M::from_entity(entity);
                self.mode = FormMode::Edit;
                self.errors.clear();
            }
            None => {
                self.mode = FormMode::Create;
                self.reset();
            }
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn values(&self) -> &M {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut M {
        &mut self.values
    }

    pub fn set_values(&mut self, values: M) {
        self.values = values;
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.values.validate().is_ok()
    }

    /// Restores the defaults and clears errors. The mode is kept.
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
    }

    /// Validates and shapes the current values without saving.
    pub fn validated(&mut self) -> Result<M::Output, FormErrors> {
        match self.values.validate() {
            Ok(()) => {
                self.errors.clear();
                Ok(self.values.to_output())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate, shape, save. On success the form resets and the success
    /// callback runs; on failure the values stay as they were.
    pub async fn submit<T, E, F, Fut>(&mut self, save: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(M::Output) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let output = self.validated().map_err(SubmitError::Invalid)?;
        match save(output).await {
            Ok(saved) => {
                self.reset();
                if let Some(callback) = self.on_success.as_mut() {
                    callback();
                }
                Ok(saved)
            }
            Err(e) => Err(SubmitError::Save(e)),
        }
    }

    /// Abandons the form: same as a reset followed by the success callback.
    pub fn cancel(&mut self) {
        self.reset();
        if let Some(callback) = self.on_success.as_mut() {
            callback();
        }
    }
}

/// `None` for blank input, the trimmed text otherwise.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Vaccine, VaccineInput};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn rabia() -> VaccineForm {
        VaccineForm {
            vaccine_name: "Rabia".to_string(),
            date_administered: "2025-01-01".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_save() {
        let mut form = Form::<VaccineForm>::create();
        form.set_values(VaccineForm {
            next_due: "2024-12-31".to_string(),
            ..rabia()
        });

        let calls = AtomicUsize::new(0);
        let result = form
            .submit(|_input: VaccineInput| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(())
            })
            .await;

        assert!(matches!(result, Err(SubmitError::Invalid(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            form.errors().get("next_due"),
            Some("Next due date must be after the administered date")
        );
    }

    #[tokio::test]
    async fn test_successful_submit_resets_and_calls_back() {
        let called = Arc::new(AtomicUsize::new(0));
        let counter = called.clone();
        let mut form = Form::<VaccineForm>::create().on_success(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        form.set_values(rabia());

        let saved = form
            .submit(|input: VaccineInput| async move { Ok::<_, String>(input.vaccine_name) })
            .await
            .unwrap();

        assert_eq!(saved, "Rabia");
        assert_eq!(form.values(), &VaccineForm::default());
        assert_eq!(called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_values() {
        let mut form = Form::<VaccineForm>::create();
        form.set_values(rabia());

        let result = form
            .submit(|_input: VaccineInput| async { Err::<(), _>("backend down".to_string()) })
            .await;

        assert!(matches!(result, Err(SubmitError::Save(ref m)) if m == "backend down"));
        assert_eq!(form.values().vaccine_name, "Rabia");
    }

    #[test]
    fn test_load_switches_modes() {
        let vaccine = Vaccine {
            id: "v1".to_string(),
            pet_id: "p1".to_string(),
            vaccine_name: "Parvo".to_string(),
            manufacturer: None,
            lot_number: Some("L-9".to_string()),
            date_administered: "2025-02-01T00:00:00Z".to_string(),
            next_due: None,
            veterinarian: None,
            notes: None,
            proof_document_id: None,
            created_at: "2025-02-01T00:00:00Z".to_string(),
            updated_at: "2025-02-01T00:00:00Z".to_string(),
        };

        let mut form = Form::<VaccineForm>::edit(&vaccine);
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.values().date_administered, "2025-02-01");
        assert_eq!(form.values().lot_number, "L-9");

        form.load(None);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.values(), &VaccineForm::default());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" x "), Some("x".to_string()));
    }
}
