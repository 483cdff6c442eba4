//! Guest Model

use serde::{Deserialize, Serialize};

/// Event guest as seen by the seating board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    /// Auction paddle number, assigned at check-in
    pub bidder_number: Option<i32>,
    /// Seated table, `None` while in the unassigned pool
    pub table_number: Option<u32>,
}

impl Guest {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bidder_number: None,
            table_number: None,
        }
    }

    pub fn with_bidder_number(mut self, bidder_number: i32) -> Self {
        self.bidder_number = Some(bidder_number);
        self
    }

    pub fn seated_at(mut self, table_number: u32) -> Self {
        self.table_number = Some(table_number);
        self
    }

    /// Card label: name plus paddle number when known
    pub fn display_label(&self) -> String {
        match self.bidder_number {
            Some(n) => format!("{} (#{})", self.name, n),
            None => self.name.clone(),
        }
    }
}
