// ABOUTME: Contact message entity with its flat three-value status enum
// ABOUTME: Structurally a sibling of Devis but with an independent table and workflow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Triage status of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Freshly submitted
    #[default]
    New,
    /// Being handled
    InProgress,
    /// Handled to completion
    Resolved,
}

impl ContactStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    /// Parse from the wire/database representation, rejecting unknown values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Accepted wire values, for validation messages
    pub const VALUES: [&'static str; 3] = ["new", "in_progress", "resolved"];
}

/// A visitor contact message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier
    pub id: Uuid,
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Subject line
    pub subject: String,
    /// Free-form message body
    pub message: String,
    /// Triage status
    pub status: ContactStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for value in ContactStatus::VALUES {
            assert_eq!(ContactStatus::parse(value).unwrap().as_str(), value);
        }
        assert!(ContactStatus::parse("closed").is_none());
    }

    #[test]
    fn test_default_status_is_new() {
        assert_eq!(ContactStatus::default(), ContactStatus::New);
    }
}
