//! Tri-state field values for partial updates.
//!
//! A partial update has to tell apart three cases for every field: the caller
//! did not mention it, the caller wants it cleared, or the caller wants a new
//! value. `Option<T>` only covers two of those, so update inputs and update
//! payloads use `Patch<T>` instead.
//!
//! On the wire an `Unset` field is omitted entirely (pair the field with
//! `#[serde(default, skip_serializing_if = "Patch::is_unset")]`), `Null`
//! becomes JSON `null` and `Value(v)` serializes as `v`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not supplied; leave it untouched.
    Unset,
    /// Field supplied as null; clear it.
    Null,
    /// Field supplied with a value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Returns the value if one was supplied.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl Patch<String> {
    /// Trims a supplied string and turns a blank one into `Null`.
    ///
    /// `Unset` stays `Unset`: an absent key never becomes a clear.
    pub fn trimmed_or_null(&self) -> Patch<String> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(v) if v.trim().is_empty() => Patch::Null,
            Patch::Value(v) => Patch::Value(v.trim().to_string()),
        }
    }
}

/// A supplied optional value: `Some` becomes `Value`, `None` becomes `Null`.
impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => v.serialize(serializer),
            Patch::Unset | Patch::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    struct Sample {
        #[serde(default, skip_serializing_if = "Patch::is_unset")]
        name: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_unset")]
        count: Patch<i32>,
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let json = serde_json::to_value(Sample::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_null_and_value_are_serialized() {
        let sample = Sample {
            name: Patch::Null,
            count: Patch::Value(3),
        };
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json, serde_json::json!({"name": null, "count": 3}));
    }

    #[test]
    fn test_deserialize_distinguishes_missing_from_null() {
        let sample: Sample = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(sample.name, Patch::Null);
        assert_eq!(sample.count, Patch::Unset);
    }

    #[test]
    fn test_trimmed_or_null() {
        assert_eq!(
            Patch::Value("  Luna ".to_string()).trimmed_or_null(),
            Patch::Value("Luna".to_string())
        );
        assert_eq!(Patch::Value("   ".to_string()).trimmed_or_null(), Patch::Null);
        assert_eq!(Patch::<String>::Unset.trimmed_or_null(), Patch::Unset);
    }
}
