//! Manual assignment modal
//!
//! Keyboard-accessible alternative to dragging. Submitting goes through
//! [`SeatingBoard::assign_guest_to_table`], the same path a drop takes.

use gala_client::SeatingApi;
use serde::Serialize;
use shared::models::Guest;

use crate::board::{OperationReport, SeatingBoard};
use crate::error::{SeatingError, SeatingResult};
use crate::state::SeatingState;

/// One entry of the table selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOption {
    pub table_number: u32,
    pub label: String,
    pub occupancy: usize,
    pub capacity: u32,
    /// Guest already sits here
    pub is_current: bool,
    pub disabled: bool,
}

impl TableOption {
    /// "Sponsors (6/8)"
    pub fn display(&self) -> String {
        format!("{} ({}/{})", self.label, self.occupancy, self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualAssignment {
    guest: Guest,
    options: Vec<TableOption>,
    selected: Option<u32>,
}

impl ManualAssignment {
    /// Build the selector from live occupancy
    pub fn open(state: &SeatingState, guest_id: i64) -> SeatingResult<Self> {
        let guest = state
            .find_guest(guest_id)
            .cloned()
            .ok_or(SeatingError::GuestNotFound(guest_id))?;

        let options = state
            .table_summaries()
            .into_iter()
            .map(|t| {
                let is_current = guest.table_number == Some(t.table_number);
                TableOption {
                    table_number: t.table_number,
                    label: t.label,
                    occupancy: t.occupancy,
                    capacity: t.capacity,
                    is_current,
                    disabled: is_current || t.is_full,
                }
            })
            .collect();

        Ok(Self {
            guest,
            options,
            selected: None,
        })
    }

    pub fn guest(&self) -> &Guest {
        &self.guest
    }

    pub fn options(&self) -> &[TableOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// First enabled table, for a default focus
    pub fn first_available(&self) -> Option<u32> {
        self.options
            .iter()
            .find(|o| !o.disabled)
            .map(|o| o.table_number)
    }

    /// Pick a table; full tables are refused, the current table clears the selection
    pub fn select(&mut self, table_number: u32) -> SeatingResult<()> {
        let option = self
            .options
            .iter()
            .find(|o| o.table_number == table_number)
            .ok_or(SeatingError::TableNotFound(table_number))?;

        if option.is_current {
            self.selected = None;
            return Ok(());
        }
        if option.disabled {
            return Err(SeatingError::CapacityExceeded {
                table_number,
                capacity: option.capacity,
            });
        }
        self.selected = Some(table_number);
        Ok(())
    }

    /// Assign to the selected table; `None` when nothing is selected
    pub async fn submit<A: SeatingApi>(
        &self,
        board: &SeatingBoard<A>,
    ) -> SeatingResult<Option<OperationReport>> {
        match self.selected {
            Some(table_number) => board
                .assign_guest_to_table(self.guest.id, table_number)
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}
