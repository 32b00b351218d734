// ABOUTME: Quote request (devis) entity with its status workflow and request type enums
// ABOUTME: Status transitions are permissive by default with an optional strict adjacency graph
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the visitor is requesting a quote for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevisType {
    /// Quote for a service
    Service,
    /// Quote for a product
    Product,
    /// Quote covering both
    Both,
}

impl DevisType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Product => "product",
            Self::Both => "both",
        }
    }

    /// Parse from the wire/database representation, rejecting unknown values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "service" => Some(Self::Service),
            "product" => Some(Self::Product),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Accepted wire values, for validation messages
    pub const VALUES: [&'static str; 3] = ["service", "product", "both"];
}

/// Lifecycle stage of a quote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DevisStatus {
    /// Freshly submitted, not yet triaged
    #[default]
    Nouveau,
    /// Being handled by an admin
    EnCours,
    /// Handled to completion
    Traite,
    /// Cancelled; excluded from the dashboard breakdown
    Annule,
}

impl DevisStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nouveau => "nouveau",
            Self::EnCours => "en_cours",
            Self::Traite => "traite",
            Self::Annule => "annule",
        }
    }

    /// Parse from the wire/database representation, rejecting unknown values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nouveau" => Some(Self::Nouveau),
            "en_cours" => Some(Self::EnCours),
            "traite" => Some(Self::Traite),
            "annule" => Some(Self::Annule),
            _ => None,
        }
    }

    /// Accepted wire values, for validation messages
    pub const VALUES: [&'static str; 4] = ["nouveau", "en_cours", "traite", "annule"];

    /// Whether `next` is reachable from `self` under the strict transition
    /// graph. The default server configuration does not enforce this and
    /// accepts any-to-any updates.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Nouveau => matches!(next, Self::EnCours | Self::Traite | Self::Annule),
            Self::EnCours => matches!(next, Self::Traite | Self::Annule),
            // traite and annule are terminal in strict mode
            Self::Traite | Self::Annule => false,
        }
    }
}

/// A customer-submitted quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Devis {
    /// Unique identifier
    pub id: Uuid,
    /// Submitter name
    pub nom: String,
    /// Submitter email
    pub email: String,
    /// Optional phone number
    pub telephone: Option<String>,
    /// Subject line
    pub objet: String,
    /// Free-form request body
    pub message: String,
    /// What kind of quote is requested
    pub type_devis: DevisType,
    /// Current lifecycle stage
    pub statut: DevisStatus,
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
        for value in DevisStatus::VALUES {
            let status = DevisStatus::parse(value).unwrap();
            assert_eq!(status.as_str(), value);
        }
        assert!(DevisStatus::parse("archived").is_none());
        assert!(DevisStatus::parse("").is_none());
    }

    #[test]
    fn test_type_roundtrip() {
        for value in DevisType::VALUES {
            let ty = DevisType::parse(value).unwrap();
            assert_eq!(ty.as_str(), value);
        }
        assert!(DevisType::parse("subscription").is_none());
    }

    #[test]
    fn test_default_status_is_nouveau() {
        assert_eq!(DevisStatus::default(), DevisStatus::Nouveau);
    }

    #[test]
    fn test_strict_transition_graph() {
        use DevisStatus::{Annule, EnCours, Nouveau, Traite};

        assert!(Nouveau.can_transition_to(EnCours));
        assert!(Nouveau.can_transition_to(Traite));
        assert!(Nouveau.can_transition_to(Annule));
        assert!(EnCours.can_transition_to(Traite));
        assert!(!EnCours.can_transition_to(Nouveau));
        assert!(!Traite.can_transition_to(Nouveau));
        assert!(!Annule.can_transition_to(EnCours));
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&DevisStatus::EnCours).unwrap(),
            "\"en_cours\""
        );
        assert_eq!(
            serde_json::to_string(&DevisType::Both).unwrap(),
            "\"both\""
        );
    }
}
