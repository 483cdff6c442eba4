//! Role Model
//!
//! Roles map to a fixed capability set. Views check capabilities, never role names.

use serde::{Deserialize, Serialize};

/// Platform role of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    NpoAdmin,
    EventCoordinator,
    Staff,
    Donor,
}

/// Seating capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewSeating,
    AssignSeats,
    EditTables,
}

const FULL_ACCESS: &[Capability] = &[
    Capability::ViewSeating,
    Capability::AssignSeats,
    Capability::EditTables,
];
const SEAT_ONLY: &[Capability] = &[Capability::ViewSeating, Capability::AssignSeats];
const NONE: &[Capability] = &[];

impl Role {
    /// Capability lookup table
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::SuperAdmin | Role::NpoAdmin | Role::EventCoordinator => FULL_ACCESS,
            Role::Staff => SEAT_ONLY,
            Role::Donor => NONE,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::SuperAdmin => "super_admin",
            Role::NpoAdmin => "npo_admin",
            Role::EventCoordinator => "event_coordinator",
            Role::Staff => "staff",
            Role::Donor => "donor",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_roles_have_full_access() {
        for role in [Role::SuperAdmin, Role::NpoAdmin, Role::EventCoordinator] {
            assert!(role.can(Capability::ViewSeating));
            assert!(role.can(Capability::AssignSeats));
            assert!(role.can(Capability::EditTables));
        }
    }

    #[test]
    fn test_staff_cannot_edit_tables() {
        assert!(Role::Staff.can(Capability::AssignSeats));
        assert!(!Role::Staff.can(Capability::EditTables));
    }

    #[test]
    fn test_donor_has_no_seating_access() {
        assert!(Role::Donor.capabilities().is_empty());
        assert!(!Role::Donor.can(Capability::ViewSeating));
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::EventCoordinator).unwrap();
        assert_eq!(json, "\"event_coordinator\"");
        assert_eq!(Role::NpoAdmin.to_string(), "npo_admin");
    }
}
