//! Seat Assignment DTOs

use serde::{Deserialize, Serialize};

use super::guest::Guest;

/// Assign (or unassign with `None`) a guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignmentRequest {
    pub table_number: Option<u32>,
}

/// Authoritative result of an assignment mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub guest: Guest,
    /// Table whose captain reference was cleared because the guest left it
    #[serde(default)]
    pub cleared_captain_table: Option<u32>,
    /// Server timestamp (Unix millis)
    pub updated_at: i64,
}
