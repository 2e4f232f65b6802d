//! Declarative field validation.
//!
//! Rules are chained per field and stop at the first failure, so each field
//! reports at most one message. Length and pattern rules only run on
//! non-blank values; blank values are the business of `required`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless the field already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// A regex compiled on first use.
pub struct Pattern {
    source: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl Pattern {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    pub fn is_match(&self, value: &str) -> bool {
        let compiled = self.compiled.get_or_init(|| match Regex::new(self.source) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = self.source, error = %e, "invalid validation pattern");
                None
            }
        });
        compiled.as_ref().map_or(false, |re| re.is_match(value))
    }
}

pub static EMAIL: Pattern = Pattern::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
pub static HAS_LOWERCASE: Pattern = Pattern::new(r"[a-z]");
pub static HAS_UPPERCASE: Pattern = Pattern::new(r"[A-Z]");
pub static HAS_DIGIT: Pattern = Pattern::new(r"\d");

/// Collects errors across fields.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FormErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a rule chain for one field.
    pub fn field<'a>(&'a mut self, name: &'static str, value: &'a str) -> FieldCheck<'a> {
        FieldCheck {
            errors: &mut self.errors,
            name,
            value,
            failed: false,
        }
    }

    /// Cross-field or custom rule: records `message` on `name` unless `ok`.
    pub fn check(&mut self, name: &'static str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.add(name, message);
        }
        self
    }

    pub fn finish(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub struct FieldCheck<'a> {
    errors: &'a mut FormErrors,
    name: &'static str,
    value: &'a str,
    failed: bool,
}

impl FieldCheck<'_> {
    pub fn required(self, message: &str) -> Self {
        let blank = self.value.trim().is_empty();
        self.rule(blank, message)
    }

    pub fn min_length(self, min: usize, message: &str) -> Self {
        let short = !self.is_blank() && self.value.chars().count() < min;
        self.rule(short, message)
    }

    pub fn max_length(self, max: usize, message: &str) -> Self {
        let long = !self.is_blank() && self.value.chars().count() > max;
        self.rule(long, message)
    }

    pub fn pattern(self, pattern: &Pattern, message: &str) -> Self {
        let mismatch = !self.is_blank() && !pattern.is_match(self.value.trim());
        self.rule(mismatch, message)
    }

    /// Arbitrary predicate on a non-blank value.
    pub fn satisfies<F: FnOnce(&str) -> bool>(self, predicate: F, message: &str) -> Self {
        let invalid = !self.is_blank() && !predicate(self.value.trim());
        self.rule(invalid, message)
    }

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn rule(mut self, violated: bool, message: &str) -> Self {
        if violated && !self.failed {
            self.errors.add(self.name, message);
            self.failed = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_per_field_wins() {
        let mut v = Validator::new();
        v.field("name", "")
            .required("Name is required")
            .max_length(3, "Too long");
        v.field("code", "abcdef")
            .min_length(2, "Too short")
            .max_length(3, "Too long")
            .pattern(&HAS_DIGIT, "Needs a digit");

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("code"), Some("Too long"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_optional_rules_skip_blank_values() {
        let mut v = Validator::new();
        v.field("breed", "  ")
            .min_length(2, "Too short")
            .pattern(&EMAIL, "Invalid");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_pattern_ignores_surrounding_whitespace() {
        let mut v = Validator::new();
        v.field("email", " ana@example.com ")
            .required("Email is required")
            .pattern(&EMAIL, "Invalid email");
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.field("email", " ana @example.com").pattern(&EMAIL, "Invalid email");
        assert_eq!(v.finish().unwrap_err().get("email"), Some("Invalid email"));
    }

    #[test]
    fn test_length_counts_characters() {
        let mut v = Validator::new();
        v.field("name", "Ñandú").max_length(5, "Too long");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL.is_match("ana@example.com"));
        assert!(!EMAIL.is_match("ana@example"));
        assert!(!EMAIL.is_match("ana example@x.com"));
    }

    #[test]
    fn test_cross_field_check() {
        let (password, confirm) = ("Secret123", "Secret124");
        let mut v = Validator::new();
        v.check("confirm", password == confirm, "Passwords do not match");
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.to_string(), "confirm: Passwords do not match");
    }
}
