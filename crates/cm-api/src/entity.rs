//! Entity kinds served by the management API.
//!
//! Every entity is exposed under `/api/{segment}/` with the same four
//! endpoints: `list-all/`, `create-new/`, `edit/`, and `delete/`. Edit
//! identifies its target with a `{singular}_id` query parameter; delete
//! takes a JSON body of the form `{"element_ids": [..]}`.

use std::fmt;
use std::str::FromStr;

/// Kinds of records the console can manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customers,
    Payments,
    Contacts,
    Occupants,
    Niches,
    Users,
    Audit,
}

/// All entity kinds, in sidebar order.
pub const ALL_KINDS: &[EntityKind] = &[
    EntityKind::Customers,
    EntityKind::Payments,
    EntityKind::Contacts,
    EntityKind::Occupants,
    EntityKind::Niches,
    EntityKind::Users,
    EntityKind::Audit,
];

impl EntityKind {
    /// URL path segment under `/api/`.
    pub fn segment(&self) -> &'static str {
        match self {
            EntityKind::Customers => "customers",
            EntityKind::Payments => "payments",
            EntityKind::Contacts => "contacts",
            EntityKind::Occupants => "occupants",
            EntityKind::Niches => "niches",
            EntityKind::Users => "users",
            EntityKind::Audit => "audit",
        }
    }

    /// Singular form, used for the edit query parameter (`customer_id=N`).
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Customers => "customer",
            EntityKind::Payments => "payment",
            EntityKind::Contacts => "contact",
            EntityKind::Occupants => "occupant",
            EntityKind::Niches => "niche",
            EntityKind::Users => "user",
            EntityKind::Audit => "audit",
        }
    }

    /// Human-readable tab title.
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Customers => "Customers",
            EntityKind::Payments => "Payments",
            EntityKind::Contacts => "Contacts",
            EntityKind::Occupants => "Occupants",
            EntityKind::Niches => "Niches",
            EntityKind::Users => "User Management",
            EntityKind::Audit => "Audit Logs",
        }
    }

    /// Whether records of this kind can be created, edited, or deleted.
    ///
    /// Audit logs are append-only on the server and read-only here.
    pub fn is_mutable(&self) -> bool {
        !matches!(self, EntityKind::Audit)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment())
    }
}

impl FromStr for EntityKind {
    type Err = cm_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customers" | "customer" => Ok(EntityKind::Customers),
            "payments" | "payment" => Ok(EntityKind::Payments),
            "contacts" | "contact" => Ok(EntityKind::Contacts),
            "occupants" | "occupant" => Ok(EntityKind::Occupants),
            "niches" | "niche" => Ok(EntityKind::Niches),
            "users" | "user" => Ok(EntityKind::Users),
            "audit" => Ok(EntityKind::Audit),
            other => Err(cm_common::Error::UnknownEntity(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_matches_singular() {
        // Plural segments drop a trailing "s" to form the edit parameter
        for kind in ALL_KINDS {
            if *kind == EntityKind::Audit {
                continue;
            }
            assert_eq!(format!("{}s", kind.singular()), kind.segment());
        }
    }

    #[test]
    fn test_from_str_accepts_both_forms() {
        assert_eq!("customers".parse::<EntityKind>().unwrap(), EntityKind::Customers);
        assert_eq!("customer".parse::<EntityKind>().unwrap(), EntityKind::Customers);
        assert_eq!("Niches".parse::<EntityKind>().unwrap(), EntityKind::Niches);
        assert!("widgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_audit_is_read_only() {
        assert!(!EntityKind::Audit.is_mutable());
        assert!(EntityKind::Customers.is_mutable());
    }
}
