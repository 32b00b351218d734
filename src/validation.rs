// ABOUTME: Per-field request validation producing structured field-error maps
// ABOUTME: Rules cover the per-endpoint constraints (required/email/length/enum/min)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Field-level request validation
//!
//! Validation runs before any mutation; a failed run yields a 422 with a
//! field → messages map and no partial write. The `Validator` collects
//! failures across all fields instead of stopping at the first.

use crate::errors::{AppError, FieldErrorMap};
use std::sync::OnceLock;

/// Practical email format check; full RFC 5322 is out of scope
fn email_regex() -> &'static regex::Regex {
    static EMAIL: OnceLock<regex::Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|e| {
            // The pattern is a compile-time constant; this cannot fail at runtime
            unreachable!("invalid email regex: {e}")
        })
    })
}

/// Collects per-field validation failures for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrorMap,
}

impl Validator {
    /// Create an empty validator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure message for a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Required string with a maximum length. Returns the owned value when valid.
    pub fn required_string(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        match value {
            None | Some("") => {
                self.add(field, format!("The {field} field is required."));
                None
            }
            Some(s) if s.chars().count() > max_len => {
                self.add(
                    field,
                    format!("The {field} may not be greater than {max_len} characters."),
                );
                None
            }
            Some(s) => Some(s.to_owned()),
        }
    }

    /// Optional string with a maximum length. Empty strings collapse to `None`.
    pub fn optional_string(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        match value {
            None | Some("") => None,
            Some(s) if s.chars().count() > max_len => {
                self.add(
                    field,
                    format!("The {field} may not be greater than {max_len} characters."),
                );
                None
            }
            Some(s) => Some(s.to_owned()),
        }
    }

    /// Required, well-formed email address with a maximum length
    pub fn required_email(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        let s = self.required_string(field, value, max_len)?;
        if email_regex().is_match(&s) {
            Some(s)
        } else {
            self.add(field, format!("The {field} must be a valid email address."));
            None
        }
    }

    /// Required value drawn from a closed set, parsed with `parse`
    pub fn required_one_of<T>(
        &mut self,
        field: &str,
        value: Option<&str>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        match value {
            None | Some("") => {
                self.add(field, format!("The {field} field is required."));
                None
            }
            Some(s) => match parse(s) {
                Some(v) => Some(v),
                None => {
                    self.add(field, format!("The selected {field} is invalid."));
                    None
                }
            },
        }
    }

    /// Optional value drawn from a closed set, parsed with `parse`
    pub fn optional_one_of<T>(
        &mut self,
        field: &str,
        value: Option<&str>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        match value {
            None | Some("") => None,
            Some(s) => match parse(s) {
                Some(v) => Some(v),
                None => {
                    self.add(field, format!("The selected {field} is invalid."));
                    None
                }
            },
        }
    }

    /// Required non-negative number
    pub fn required_non_negative(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            None => {
                self.add(field, format!("The {field} field is required."));
                None
            }
            Some(v) if v < 0.0 => {
                self.add(field, format!("The {field} must be at least 0."));
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Optional non-negative number
    pub fn optional_non_negative(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            None => None,
            Some(v) if v < 0.0 => {
                self.add(field, format!("The {field} must be at least 0."));
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Whether any rule failed so far
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finish validation; `Err` carries the 422 field-error map
    ///
    /// # Errors
    ///
    /// Returns `AppError::validation` when any rule failed
    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_required_string() {
        let mut v = Validator::new();
        assert_eq!(v.required_string("nom", Some("Ali"), 255).as_deref(), Some("Ali"));
        assert!(v.required_string("objet", None, 255).is_none());
        assert!(v.required_string("message", Some(""), 255).is_none());
        let err = v.finish().unwrap_err();
        let fields = err.field_errors.unwrap();
        assert!(fields.contains_key("objet"));
        assert!(fields.contains_key("message"));
        assert!(!fields.contains_key("nom"));
    }

    #[test]
    fn test_max_length() {
        let mut v = Validator::new();
        let long = "x".repeat(21);
        assert!(v.optional_string("telephone", Some(&long), 20).is_none());
        assert!(v.has_errors());
    }

    #[test]
    fn test_email_format() {
        let mut v = Validator::new();
        assert!(v.required_email("email", Some("ali@x.com"), 255).is_some());
        assert!(v.required_email("email", Some("not-an-email"), 255).is_none());
        assert!(v.required_email("email", Some("a@b"), 255).is_none());
        let err = v.finish().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.field_errors.unwrap()["email"].len(), 2);
    }

    #[test]
    fn test_one_of() {
        use crate::models::DevisType;

        let mut v = Validator::new();
        assert_eq!(
            v.required_one_of("type_devis", Some("product"), DevisType::parse),
            Some(DevisType::Product)
        );
        assert!(v
            .required_one_of("type_devis", Some("rental"), DevisType::parse)
            .is_none());
        assert!(v.has_errors());
    }

    #[test]
    fn test_non_negative() {
        let mut v = Validator::new();
        assert_eq!(v.required_non_negative("prix", Some(0.0)), Some(0.0));
        assert!(v.required_non_negative("prix", Some(-1.5)).is_none());
        assert!(v.optional_non_negative("prix", None).is_none());
        assert!(v.has_errors());
    }
}
