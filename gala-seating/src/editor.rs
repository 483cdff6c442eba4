//! Table detail editor
//!
//! Side-panel form for one table. Inputs are kept as typed so the form can
//! show what the user entered; [`TableDetailEditor::validate`] reports every
//! field problem at once before anything is sent.

use gala_client::SeatingApi;
use serde::Serialize;
use shared::error::ErrorCode;
use shared::models::TableCustomizationUpdate;
use shared::validation::{normalize_table_name, validate_custom_capacity, validate_table_name};

use crate::board::{OperationReport, SeatingBoard};
use crate::error::{SeatingError, SeatingResult};
use crate::state::SeatingState;

/// Inline message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

impl From<FieldError> for SeatingError {
    fn from(e: FieldError) -> Self {
        SeatingError::validation(e.code, e.field, e.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptainOption {
    pub guest_id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDetailEditor {
    table_number: u32,
    occupancy: usize,
    default_capacity: u32,
    captain_options: Vec<CaptainOption>,
    initial: TableCustomizationUpdate,
    capacity_input: String,
    name_input: String,
    captain_id: Option<i64>,
}

impl TableDetailEditor {
    /// Seed the form from the table's current customization
    pub fn open(state: &SeatingState, table_number: u32) -> SeatingResult<Self> {
        let guests = state
            .guests_at(table_number)
            .ok_or(SeatingError::TableNotFound(table_number))?;
        let captain_options = guests
            .iter()
            .map(|g| CaptainOption {
                guest_id: g.id,
                label: g.display_label(),
            })
            .collect();
        let initial = state
            .customization(table_number)
            .map(TableCustomizationUpdate::from)
            .unwrap_or_default();

        let mut editor = Self {
            table_number,
            occupancy: guests.len(),
            default_capacity: state.default_capacity(),
            captain_options,
            initial,
            capacity_input: String::new(),
            name_input: String::new(),
            captain_id: None,
        };
        editor.reset();
        Ok(editor)
    }

    pub fn table_number(&self) -> u32 {
        self.table_number
    }

    /// Placeholder for the capacity input
    pub fn default_capacity(&self) -> u32 {
        self.default_capacity
    }

    pub fn capacity_input(&self) -> &str {
        &self.capacity_input
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn captain_id(&self) -> Option<i64> {
        self.captain_id
    }

    /// Guests seated at this table
    pub fn captain_options(&self) -> &[CaptainOption] {
        &self.captain_options
    }

    /// Blank means "use the event default"
    pub fn set_capacity(&mut self, input: impl Into<String>) {
        self.capacity_input = input.into();
    }

    pub fn set_name(&mut self, input: impl Into<String>) {
        self.name_input = input.into();
    }

    pub fn set_captain(&mut self, guest_id: Option<i64>) {
        self.captain_id = guest_id;
    }

    pub fn clear_captain(&mut self) {
        self.captain_id = None;
    }

    /// Discard edits
    pub fn reset(&mut self) {
        self.capacity_input = self
            .initial
            .custom_capacity
            .map(|c| c.to_string())
            .unwrap_or_default();
        self.name_input = self.initial.table_name.clone().unwrap_or_default();
        self.captain_id = self.initial.captain_id;
    }

    /// Check every field, returning the payload or all field errors
    pub fn validate(&self) -> Result<TableCustomizationUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let raw = self.capacity_input.trim();
        let custom_capacity = if raw.is_empty() {
            None
        } else {
            match raw.parse::<u32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push(FieldError::new(
                        "custom_capacity",
                        ErrorCode::ValidationFailed,
                        "capacity must be a whole number",
                    ));
                    None
                }
            }
        };
        if let Err(e) = validate_custom_capacity(custom_capacity) {
            errors.push(FieldError::new("custom_capacity", e.code, e.message));
        } else if let Some(capacity) = custom_capacity
            && (capacity as usize) < self.occupancy
        {
            errors.push(FieldError::new(
                "custom_capacity",
                ErrorCode::CapacityBelowOccupancy,
                format!(
                    "{} guests are seated, capacity cannot be {}",
                    self.occupancy, capacity
                ),
            ));
        }

        let table_name = normalize_table_name(Some(self.name_input.clone()));
        if let Err(e) = validate_table_name(table_name.as_deref()) {
            errors.push(FieldError::new("table_name", e.code, e.message));
        }

        if let Some(captain) = self.captain_id
            && !self.captain_options.iter().any(|o| o.guest_id == captain)
        {
            errors.push(FieldError::new(
                "captain_id",
                ErrorCode::CaptainNotSeated,
                "captain must be seated at this table",
            ));
        }

        if errors.is_empty() {
            Ok(TableCustomizationUpdate {
                custom_capacity,
                table_name,
                captain_id: self.captain_id,
            })
        } else {
            Err(errors)
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self.validate() {
            Ok(update) => update != self.initial,
            Err(_) => true,
        }
    }

    /// Validate and submit through the board
    ///
    /// The first field error is returned as a validation error and nothing is sent.
    pub async fn submit<A: SeatingApi>(
        &self,
        board: &SeatingBoard<A>,
    ) -> SeatingResult<OperationReport> {
        let update = self.validate().map_err(|mut errors| {
            SeatingError::from(errors.remove(0))
        })?;
        board
            .update_table_customization(self.table_number, update)
            .await
    }
}
