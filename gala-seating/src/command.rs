//! Seating commands
//!
//! A command is one user intent. Running it on the board follows a fixed
//! sequence:
//!
//! ```text
//! apply(state)        local validation + optimistic mutation -> Undo
//! commit(api)         remote call                            -> Confirmation
//!   ├─ Ok  -> Confirmation::reconcile(state)   (Committed)
//!   └─ Err -> Undo::rollback(state)            (RolledBack)
//! ```
//!
//! Undo records only cover what the command touched, so rolling back one
//! command never reverts another command that overlapped it.

use gala_client::{ClientResult, SeatingApi};
use serde::Serialize;
use shared::models::{
    Capability, SeatAssignment, TableCustomization, TableCustomizationUpdate,
};

use crate::error::SeatingResult;
use crate::state::{MoveRecord, SeatingState};

/// Operation identifier
pub type OperationId = uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatingCommand {
    Assign { guest_id: i64, table_number: u32 },
    Unassign { guest_id: i64 },
    Customize {
        table_number: u32,
        update: TableCustomizationUpdate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Assign,
    Unassign,
    Customize,
}

/// Per-operation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationPhase {
    /// Nothing to do (guest already there)
    Idle,
    /// Applied locally, awaiting the server
    Optimistic,
    Committed,
    RolledBack,
    /// The view was reset while the request was in flight; result ignored
    Discarded,
}

/// Busy key an operation holds while in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    Guest(i64),
    Table(u32),
}

/// Inverse of an applied command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Undo {
    Move(MoveRecord),
    Customization {
        table_number: u32,
        previous: Option<TableCustomization>,
    },
}

impl Undo {
    pub fn rollback(&self, state: &mut SeatingState) {
        match self {
            Undo::Move(record) => state.undo_move(record),
            Undo::Customization {
                table_number,
                previous,
            } => {
                state.set_customization(*table_number, previous.clone());
            }
        }
    }
}

/// Authoritative server answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Assignment(SeatAssignment),
    Table(TableCustomization),
}

impl Confirmation {
    pub fn reconcile(self, state: &mut SeatingState) {
        match self {
            Confirmation::Assignment(assignment) => {
                let guest_id = assignment.guest.id;
                state.reconcile_guest(assignment.guest);
                if let Some(n) = assignment.cleared_captain_table {
                    state.clear_captain_if(n, guest_id);
                }
            }
            Confirmation::Table(table) => {
                let n = table.table_number;
                state.set_customization(n, Some(table));
            }
        }
    }
}

impl SeatingCommand {
    pub fn kind(&self) -> OperationKind {
        match self {
            SeatingCommand::Assign { .. } => OperationKind::Assign,
            SeatingCommand::Unassign { .. } => OperationKind::Unassign,
            SeatingCommand::Customize { .. } => OperationKind::Customize,
        }
    }

    pub fn required_capability(&self) -> Capability {
        match self {
            SeatingCommand::Assign { .. } | SeatingCommand::Unassign { .. } => {
                Capability::AssignSeats
            }
            SeatingCommand::Customize { .. } => Capability::EditTables,
        }
    }

    pub fn lock_key(&self) -> LockKey {
        match self {
            SeatingCommand::Assign { guest_id, .. } | SeatingCommand::Unassign { guest_id } => {
                LockKey::Guest(*guest_id)
            }
            SeatingCommand::Customize { table_number, .. } => LockKey::Table(*table_number),
        }
    }

    /// Validate against `state` and mutate it optimistically
    ///
    /// `Ok(None)` means the command is a no-op. On `Err` the state is untouched.
    pub fn apply(&mut self, state: &mut SeatingState) -> SeatingResult<Option<Undo>> {
        match self {
            SeatingCommand::Assign {
                guest_id,
                table_number,
            } => {
                if state.check_assign(*guest_id, *table_number)?.is_none() {
                    return Ok(None);
                }
                let record = state.move_guest(*guest_id, Some(*table_number))?;
                Ok(Some(Undo::Move(record)))
            }
            SeatingCommand::Unassign { guest_id } => {
                let location = state
                    .locate(*guest_id)
                    .ok_or(crate::SeatingError::GuestNotFound(*guest_id))?;
                if location.table_number().is_none() {
                    return Ok(None);
                }
                let record = state.move_guest(*guest_id, None)?;
                Ok(Some(Undo::Move(record)))
            }
            SeatingCommand::Customize {
                table_number,
                update,
            } => {
                let normalized = state.check_customization(*table_number, update.clone())?;
                let next = normalized.clone().into_customization(*table_number);
                let previous = state.set_customization(*table_number, Some(next));
                *update = normalized;
                Ok(Some(Undo::Customization {
                    table_number: *table_number,
                    previous,
                }))
            }
        }
    }

    /// Send the command to the server
    pub async fn commit<A: SeatingApi + ?Sized>(
        &self,
        api: &A,
        event_id: i64,
    ) -> ClientResult<Confirmation> {
        match self {
            SeatingCommand::Assign {
                guest_id,
                table_number,
            } => api
                .assign_guest(event_id, *guest_id, Some(*table_number))
                .await
                .map(Confirmation::Assignment),
            SeatingCommand::Unassign { guest_id } => api
                .assign_guest(event_id, *guest_id, None)
                .await
                .map(Confirmation::Assignment),
            SeatingCommand::Customize {
                table_number,
                update,
            } => api
                .update_table_customization(event_id, *table_number, update)
                .await
                .map(Confirmation::Table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeatingError;
    use shared::models::Guest;

    fn state() -> SeatingState {
        let mut state = SeatingState::new();
        state.initialize(1, 3, 2).unwrap();
        state.populate(
            vec![
                Guest::new(1, "A").seated_at(1),
                Guest::new(2, "B").seated_at(1),
                Guest::new(3, "C"),
            ],
            Vec::new(),
        );
        state
    }

    #[test]
    fn test_assign_apply_and_rollback() {
        let mut state = state();
        let before = state.clone();

        let mut cmd = SeatingCommand::Assign {
            guest_id: 3,
            table_number: 2,
        };
        let undo = cmd.apply(&mut state).unwrap().unwrap();
        assert!(state.is_seated_at(3, 2));

        undo.rollback(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_assign_to_full_table_leaves_state() {
        let mut state = state();
        let before = state.clone();
        let mut cmd = SeatingCommand::Assign {
            guest_id: 3,
            table_number: 1,
        };
        assert!(matches!(
            cmd.apply(&mut state),
            Err(SeatingError::CapacityExceeded { .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_noops() {
        let mut state = state();
        let mut same_table = SeatingCommand::Assign {
            guest_id: 1,
            table_number: 1,
        };
        assert!(same_table.apply(&mut state).unwrap().is_none());

        let mut pooled = SeatingCommand::Unassign { guest_id: 3 };
        assert!(pooled.apply(&mut state).unwrap().is_none());
    }

    #[test]
    fn test_customize_normalizes_payload() {
        let mut state = state();
        let mut cmd = SeatingCommand::Customize {
            table_number: 2,
            update: TableCustomizationUpdate {
                custom_capacity: Some(6),
                table_name: Some("  Board  ".into()),
                captain_id: None,
            },
        };
        let undo = cmd.apply(&mut state).unwrap().unwrap();
        assert_eq!(state.table_label(2), "Board");
        match &cmd {
            SeatingCommand::Customize { update, .. } => {
                assert_eq!(update.table_name.as_deref(), Some("Board"))
            }
            _ => unreachable!(),
        }

        undo.rollback(&mut state);
        assert!(state.customization(2).is_none());
    }

    #[test]
    fn test_reconcile_applies_server_cleared_captain() {
        let mut state = state();
        state.set_customization(
            1,
            Some(TableCustomization {
                table_number: 1,
                custom_capacity: None,
                table_name: Some("Head".into()),
                captain_id: Some(1),
            }),
        );

        Confirmation::Assignment(SeatAssignment {
            guest: Guest::new(1, "A").seated_at(1),
            cleared_captain_table: Some(1),
            updated_at: 0,
        })
        .reconcile(&mut state);

        let custom = state.customization(1).unwrap();
        assert_eq!(custom.captain_id, None);
        assert_eq!(custom.table_name.as_deref(), Some("Head"));
    }

    #[test]
    fn test_late_table_confirmation_drops_moved_captain() {
        let mut state = state();
        state.move_guest(2, Some(3)).unwrap();

        Confirmation::Table(TableCustomization {
            table_number: 1,
            custom_capacity: Some(4),
            table_name: None,
            captain_id: Some(2),
        })
        .reconcile(&mut state);

        let custom = state.customization(1).unwrap();
        assert_eq!(custom.custom_capacity, Some(4));
        assert_eq!(custom.captain_id, None);
        assert!(state.invariant_violations().is_empty());
    }

    #[test]
    fn test_capabilities_and_locks() {
        let assign = SeatingCommand::Assign {
            guest_id: 9,
            table_number: 1,
        };
        assert_eq!(assign.required_capability(), Capability::AssignSeats);
        assert_eq!(assign.lock_key(), LockKey::Guest(9));

        let customize = SeatingCommand::Customize {
            table_number: 4,
            update: TableCustomizationUpdate::default(),
        };
        assert_eq!(customize.required_capability(), Capability::EditTables);
        assert_eq!(customize.lock_key(), LockKey::Table(4));
        assert_eq!(customize.kind(), OperationKind::Customize);
    }
}
