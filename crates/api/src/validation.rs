//! Request field validation.
//!
//! Collects per-field failures into the `{"errors": [...]}` shape clients
//! already consume, instead of stopping at the first bad field.

use alderwood_core::Email;
use serde::Serialize;

/// A single failed validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Human-readable message, e.g. "Please enter your first name."
    pub msg: String,
    /// The offending request field, e.g. "firstName".
    pub param: String,
}

impl FieldError {
    #[must_use]
    pub fn new(param: &str, msg: &str) -> Self {
        Self {
            msg: msg.to_owned(),
            param: param.to_owned(),
        }
    }
}

/// Accumulates field checks for one request body.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `param` directly.
    pub fn fail(&mut self, param: &str, msg: &str) {
        self.errors.push(FieldError::new(param, msg));
    }

    /// The field must be present and non-empty (after trimming).
    pub fn require(&mut self, value: &str, param: &str, msg: &str) {
        if value.trim().is_empty() {
            self.fail(param, msg);
        }
    }

    /// The field must parse as an email address.
    pub fn require_email(&mut self, value: &str, param: &str, msg: &str) {
        if Email::parse(value).is_err() {
            self.fail(param, msg);
        }
    }

    /// The field must be at least `min` characters long.
    pub fn require_min_len(&mut self, value: &str, min: usize, param: &str, msg: &str) {
        if value.chars().count() < min {
            self.fail(param, msg);
        }
    }

    /// The slice must contain at least one element.
    pub fn require_non_empty<T>(&mut self, items: &[T], param: &str, msg: &str) {
        if items.is_empty() {
            self.fail(param, msg);
        }
    }

    /// Returns `Err` with the collected failures, if any.
    ///
    /// # Errors
    ///
    /// Returns every recorded `FieldError`, in check order.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
