// ABOUTME: Central authorization policy - one (resource, action) table instead of per-route checks
// ABOUTME: Public submissions and catalog reads stay open; triage and catalog writes need admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Authorization policy
//!
//! A single policy table consulted by every handler: the access level
//! required for each (resource, action) pair. Keeping the table in one
//! place means no route can forget its guard.

/// API resources subject to the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Quote requests
    Devis,
    /// Contact messages
    Contact,
    /// Catalog products
    Produit,
    /// Catalog services
    Service,
    /// Product categories
    Categorie,
    /// Service types
    ServiceType,
}

/// Operations on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new record
    Create,
    /// List all records
    List,
    /// Read one record
    Show,
    /// Update a record
    Update,
    /// Delete a record
    Delete,
    /// Aggregate counts
    Statistics,
}

/// Access level required for an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials required
    Public,
    /// Valid bearer token with an admin-role user
    Admin,
}

/// Required access for a (resource, action) pair
#[must_use]
pub const fn required_access(resource: Resource, action: Action) -> Access {
    match (resource, action) {
        // Public submission endpoints
        (Resource::Devis | Resource::Contact, Action::Create) => Access::Public,

        // Catalog reads are the public storefront
        (
            Resource::Produit | Resource::Service | Resource::Categorie | Resource::ServiceType,
            Action::List | Action::Show,
        ) => Access::Public,

        // Everything else: triage, statistics, catalog writes
        _ => Access::Admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_endpoints() {
        assert_eq!(
            required_access(Resource::Devis, Action::Create),
            Access::Public
        );
        assert_eq!(
            required_access(Resource::Contact, Action::Create),
            Access::Public
        );
        assert_eq!(
            required_access(Resource::Produit, Action::List),
            Access::Public
        );
        assert_eq!(
            required_access(Resource::ServiceType, Action::Show),
            Access::Public
        );
    }

    #[test]
    fn test_admin_endpoints() {
        assert_eq!(
            required_access(Resource::Devis, Action::List),
            Access::Admin
        );
        assert_eq!(
            required_access(Resource::Devis, Action::Statistics),
            Access::Admin
        );
        assert_eq!(
            required_access(Resource::Contact, Action::Delete),
            Access::Admin
        );
        assert_eq!(
            required_access(Resource::Produit, Action::Create),
            Access::Admin
        );
        assert_eq!(
            required_access(Resource::Categorie, Action::Update),
            Access::Admin
        );
        assert_eq!(
            required_access(Resource::ServiceType, Action::Delete),
            Access::Admin
        );
    }
}
