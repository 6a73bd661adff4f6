//! Server-side form handling: decoding submissions, schema validation and the
//! form object handed back to the admin UI.

pub mod content;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decoded `application/x-www-form-urlencoded` fields, in submission order.
///
/// Repeated keys are kept, which is how multi-select inputs arrive.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn parse(body: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value submitted for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted for `name`.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Status message shown above the form after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMessage {
    pub success: bool,
    pub text: String,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}

/// A form's data model and its validation rules.
pub trait FormSchema: Sized {
    /// Coerce submitted fields into the data model.
    ///
    /// Fields that cannot be coerced fall back to a default value and are
    /// reported in the returned errors, together with rule violations.
    fn parse(fields: &FormFields) -> (Self, FieldErrors);

    /// Check the data model against the schema rules.
    fn validate(&self) -> FieldErrors;
}

/// Form object rendered by the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedForm<T> {
    pub valid: bool,
    /// Whether the data came from a submission rather than pre-population.
    pub posted: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<FormMessage>,
}

impl<T: FormSchema> ValidatedForm<T> {
    /// Wrap pre-populated data. Validity is computed, but errors are not
    /// reported until the user submits.
    pub fn from_data(data: T) -> Self {
        let valid = data.validate().is_empty();
        Self {
            valid,
            posted: false,
            data,
            errors: FieldErrors::default(),
            message: None,
        }
    }

    pub fn from_submission(fields: &FormFields) -> Self {
        let (data, errors) = T::parse(fields);
        Self {
            valid: errors.is_empty(),
            posted: true,
            data,
            errors,
            message: None,
        }
    }
}

impl<T> ValidatedForm<T> {
    pub fn with_message(mut self, message: FormMessage) -> Self {
        self.message = Some(message);
        self
    }
}
