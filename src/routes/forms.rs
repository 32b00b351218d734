// ABOUTME: Multipart form-data parsing for catalog endpoints that accept image uploads
// ABOUTME: Collects text fields into a map and the image part into an ImageUpload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use crate::errors::{AppError, AppResult};
use crate::storage::ImageUpload;
use crate::validation::Validator;
use axum::extract::Multipart;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A parsed multipart/form-data request: text fields plus an optional image
#[derive(Debug, Default)]
pub struct FormData {
    fields: BTreeMap<String, String>,
    /// The `image` part, when one was uploaded
    pub image: Option<ImageUpload>,
}

impl FormData {
    /// Drain a multipart stream into text fields and the optional image part
    ///
    /// # Errors
    ///
    /// Returns 400 when the stream is malformed or a part cannot be read
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid_input(format!("Failed to read image: {e}")))?;
                // An empty file input submits a part with no filename; skip it
                if !file_name.is_empty() {
                    form.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::invalid_input(format!("Failed to read {name}: {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Text field value, if present
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parse a numeric field, recording a validation failure on bad input.
    /// Absent or empty fields yield `None` without an error; required-ness
    /// is the caller's rule.
    pub fn number(&self, name: &str, validator: &mut Validator) -> Option<f64> {
        match self.text(name) {
            None | Some("") => None,
            Some(raw) => match raw.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    validator.add(name, format!("The {name} must be a number."));
                    None
                }
            },
        }
    }

    /// Parse a UUID reference field, recording a validation failure on bad input
    pub fn uuid(&self, name: &str, validator: &mut Validator) -> Option<Uuid> {
        match self.text(name) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(v) => Some(v),
                Err(_) => {
                    validator.add(name, format!("The selected {name} is invalid."));
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(pairs: &[(&str, &str)]) -> FormData {
        let mut form = FormData::default();
        for (k, v) in pairs {
            form.fields.insert((*k).to_owned(), (*v).to_owned());
        }
        form
    }

    #[test]
    fn test_number_parsing() {
        let form = form_with(&[("prix", "149.99"), ("bad", "abc"), ("empty", "")]);
        let mut v = Validator::new();

        assert_eq!(form.number("prix", &mut v), Some(149.99));
        assert_eq!(form.number("empty", &mut v), None);
        assert_eq!(form.number("missing", &mut v), None);
        assert!(!v.has_errors());

        assert_eq!(form.number("bad", &mut v), None);
        assert!(v.has_errors());
    }

    #[test]
    fn test_uuid_parsing() {
        let id = Uuid::new_v4();
        let form = form_with(&[("categorie_id", &id.to_string()), ("bad", "not-a-uuid")]);
        let mut v = Validator::new();

        assert_eq!(form.uuid("categorie_id", &mut v), Some(id));
        assert_eq!(form.uuid("bad", &mut v), None);
        assert!(v.has_errors());
    }
}
