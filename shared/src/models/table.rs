//! Table Customization Model

use serde::{Deserialize, Serialize};

/// Per-table overrides of the event-wide seating defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCustomization {
    pub table_number: u32,
    /// Overrides the event default capacity (1..=20)
    pub custom_capacity: Option<u32>,
    pub table_name: Option<String>,
    /// Guest id of the table captain; must be seated at this table
    pub captain_id: Option<i64>,
}

impl TableCustomization {
    /// Customization with nothing overridden
    pub fn empty(table_number: u32) -> Self {
        Self {
            table_number,
            custom_capacity: None,
            table_name: None,
            captain_id: None,
        }
    }

    /// True when no field overrides the defaults
    pub fn is_empty(&self) -> bool {
        self.custom_capacity.is_none() && self.table_name.is_none() && self.captain_id.is_none()
    }
}

/// Update table customization payload
///
/// Full replacement: `None` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCustomizationUpdate {
    pub custom_capacity: Option<u32>,
    pub table_name: Option<String>,
    pub captain_id: Option<i64>,
}

impl TableCustomizationUpdate {
    pub fn into_customization(self, table_number: u32) -> TableCustomization {
        TableCustomization {
            table_number,
            custom_capacity: self.custom_capacity,
            table_name: self.table_name,
            captain_id: self.captain_id,
        }
    }
}

impl From<&TableCustomization> for TableCustomizationUpdate {
    fn from(c: &TableCustomization) -> Self {
        Self {
            custom_capacity: c.custom_capacity,
            table_name: c.table_name.clone(),
            captain_id: c.captain_id,
        }
    }
}
