//! Event Seating Model

use serde::{Deserialize, Serialize};

/// Event-level seating layout, fixed at event setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSeating {
    pub event_id: i64,
    /// Tables are numbered densely from 1
    pub table_count: u32,
    /// Default capacity of every table without an override
    pub max_guests_per_table: u32,
}
