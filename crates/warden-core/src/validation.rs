//! Field-level request validation.
//!
//! Request bodies implement [`Validate`]; failures are collected per field into
//! [`FieldErrors`] and rendered by the service as a 422 response.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::password::MIN_PASSWORD_LENGTH;

/// Validation messages keyed by field name (wire name, e.g. `confirmPassword`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry error, e.g. for a body that failed to parse at all.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_valid_email(value) {
            self.add(field, format!("{field} must be an email"));
        }
        self
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        if value.chars().count() < MIN_PASSWORD_LENGTH {
            self.add(
                field,
                format!("{field} must be longer than or equal to {MIN_PASSWORD_LENGTH} characters"),
            );
        }
        self
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.add(
                field,
                format!("{field} must be between {min} and {max} characters"),
            );
        }
        self
    }

    pub fn matches(&mut self, field: &str, value: &str, other_field: &str, other: &str) -> &mut Self {
        if value != other {
            self.add(field, format!("{field} must match {other_field}"));
        }
        self
    }
}

/// Implemented by request bodies that carry field rules.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Pragmatic address check: `local@domain.tld`, no whitespace, non-empty labels.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
