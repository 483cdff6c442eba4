//! Drag-and-drop gesture translation
//!
//! `DragController` turns raw pointer input into a [`DropOutcome`]. It never
//! touches seating state itself; the board executes the outcome through the
//! same operations the modal uses.
//!
//! ```text
//! Idle ──down──▶ Pressed ──move ≥ threshold──▶ Dragging ──up──▶ Idle
//!                   │                             │
//!                   └──up (click)──▶ Idle         └──cancel──▶ Idle
//! ```

use serde::Serialize;
use shared::models::Guest;

use crate::command::SeatingCommand;
use crate::state::SeatingState;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Registered drop target under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "zone", content = "table_number", rename_all = "snake_case")]
pub enum DropZone {
    Table(u32),
    UnassignedPool,
}

/// Lookup used when a drag starts
pub trait DragSource {
    /// Find a guest, scanning the pool before the tables
    fn find_guest(&self, guest_id: i64) -> Option<Guest>;

    /// Whether the guest may be picked up right now
    fn is_draggable(&self, guest_id: i64) -> bool;
}

impl DragSource for SeatingState {
    fn find_guest(&self, guest_id: i64) -> Option<Guest> {
        SeatingState::find_guest(self, guest_id).cloned()
    }

    fn is_draggable(&self, guest_id: i64) -> bool {
        self.locate(guest_id).is_some()
    }
}

/// Copy of the dragged guest that follows the pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragGhost {
    pub guest: Guest,
    /// Table the guest was picked up from
    pub origin: Option<u32>,
    pub pointer: Point,
}

/// Semantic result of a released gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Assign { guest_id: i64, table_number: u32 },
    Unassign { guest_id: i64 },
    /// Guest returns to where it was
    SnapBack { guest_id: i64 },
    /// Pointer released before the drag activated
    Click { guest_id: i64 },
}

impl DropOutcome {
    /// The command this outcome stands for, if any
    pub fn into_command(self) -> Option<SeatingCommand> {
        match self {
            DropOutcome::Assign {
                guest_id,
                table_number,
            } => Some(SeatingCommand::Assign {
                guest_id,
                table_number,
            }),
            DropOutcome::Unassign { guest_id } => Some(SeatingCommand::Unassign { guest_id }),
            DropOutcome::SnapBack { .. } | DropOutcome::Click { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Pressed { guest_id: i64, origin: Point },
    Dragging(DragGhost),
}

#[derive(Debug, Clone)]
pub struct DragController {
    activation_distance: f32,
    phase: Phase,
}

impl DragController {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            phase: Phase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn ghost(&self) -> Option<&DragGhost> {
        match &self.phase {
            Phase::Dragging(ghost) => Some(ghost),
            _ => None,
        }
    }

    /// Press on a guest card; ignored while another gesture is active
    pub fn pointer_down(&mut self, guest_id: i64, at: Point) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = Phase::Pressed {
            guest_id,
            origin: at,
        };
        true
    }

    /// Track the pointer, activating the drag once it travelled far enough
    ///
    /// A press on a guest that is busy or gone is dropped without a drag.
    pub fn pointer_move<S: DragSource + ?Sized>(
        &mut self,
        source: &S,
        at: Point,
    ) -> Option<&DragGhost> {
        match &mut self.phase {
            Phase::Idle => return None,
            Phase::Dragging(ghost) => ghost.pointer = at,
            Phase::Pressed { guest_id, origin } => {
                if origin.distance_to(at) < self.activation_distance {
                    return None;
                }
                let guest_id = *guest_id;
                let guest = source
                    .is_draggable(guest_id)
                    .then(|| source.find_guest(guest_id))
                    .flatten();
                match guest {
                    Some(guest) => {
                        tracing::debug!(guest_id, "Drag started");
                        self.phase = Phase::Dragging(DragGhost {
                            origin: guest.table_number,
                            guest,
                            pointer: at,
                        });
                    }
                    None => {
                        tracing::debug!(guest_id, "Drag refused, guest not draggable");
                        self.phase = Phase::Idle;
                    }
                }
            }
        }
        self.ghost()
    }

    /// Release over `zone` (or over nothing) and resolve the gesture
    pub fn pointer_up(&mut self, zone: Option<DropZone>) -> Option<DropOutcome> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => None,
            Phase::Pressed { guest_id, .. } => Some(DropOutcome::Click { guest_id }),
            Phase::Dragging(ghost) => {
                let guest_id = ghost.guest.id;
                let outcome = match (zone, ghost.origin) {
                    (Some(DropZone::Table(n)), Some(origin)) if n == origin => {
                        DropOutcome::SnapBack { guest_id }
                    }
                    (Some(DropZone::Table(table_number)), _) => DropOutcome::Assign {
                        guest_id,
                        table_number,
                    },
                    (Some(DropZone::UnassignedPool), Some(_)) => DropOutcome::Unassign { guest_id },
                    (Some(DropZone::UnassignedPool), None) | (None, _) => {
                        DropOutcome::SnapBack { guest_id }
                    }
                };
                tracing::debug!(guest_id, ?zone, ?outcome, "Drag released");
                Some(outcome)
            }
        }
    }

    /// Abort the gesture (escape key, lost pointer capture)
    pub fn cancel(&mut self) -> Option<i64> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => None,
            Phase::Pressed { guest_id, .. } => Some(guest_id),
            Phase::Dragging(ghost) => Some(ghost.guest.id),
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(crate::SeatingConfig::DEFAULT_DRAG_ACTIVATION_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SeatingState {
        let mut state = SeatingState::new();
        state.initialize(1, 3, 8).unwrap();
        state.populate(
            vec![Guest::new(1, "Seated").seated_at(2), Guest::new(2, "Pooled")],
            Vec::new(),
        );
        state
    }

    fn drag(controller: &mut DragController, state: &SeatingState, guest_id: i64) {
        assert!(controller.pointer_down(guest_id, Point::new(0.0, 0.0)));
        controller.pointer_move(state, Point::new(20.0, 0.0));
        assert!(controller.is_dragging());
    }

    #[test]
    fn test_activation_threshold() {
        let state = state();
        let mut controller = DragController::default();
        controller.pointer_down(2, Point::new(10.0, 10.0));

        assert!(controller.pointer_move(&state, Point::new(14.0, 14.0)).is_none());
        assert!(!controller.is_dragging());

        let ghost = controller
            .pointer_move(&state, Point::new(16.0, 16.0))
            .unwrap();
        assert_eq!(ghost.guest.id, 2);
        assert_eq!(ghost.origin, None);
        assert_eq!(ghost.pointer, Point::new(16.0, 16.0));
    }

    #[test]
    fn test_click_without_movement() {
        let state = state();
        let mut controller = DragController::default();
        controller.pointer_down(1, Point::default());
        controller.pointer_move(&state, Point::new(3.0, 0.0));
        assert_eq!(
            controller.pointer_up(Some(DropZone::Table(3))),
            Some(DropOutcome::Click { guest_id: 1 })
        );
        assert!(controller.is_idle());
    }

    #[test]
    fn test_drop_resolution() {
        let state = state();
        let mut controller = DragController::default();

        drag(&mut controller, &state, 2);
        assert_eq!(
            controller.pointer_up(Some(DropZone::Table(3))),
            Some(DropOutcome::Assign {
                guest_id: 2,
                table_number: 3
            })
        );

        drag(&mut controller, &state, 1);
        assert_eq!(
            controller.pointer_up(Some(DropZone::UnassignedPool)),
            Some(DropOutcome::Unassign { guest_id: 1 })
        );

        drag(&mut controller, &state, 1);
        assert_eq!(
            controller.pointer_up(Some(DropZone::Table(2))),
            Some(DropOutcome::SnapBack { guest_id: 1 })
        );

        drag(&mut controller, &state, 2);
        assert_eq!(
            controller.pointer_up(Some(DropZone::UnassignedPool)),
            Some(DropOutcome::SnapBack { guest_id: 2 })
        );

        drag(&mut controller, &state, 2);
        assert_eq!(
            controller.pointer_up(None),
            Some(DropOutcome::SnapBack { guest_id: 2 })
        );
    }

    #[test]
    fn test_cancel_and_unknown_guest() {
        let state = state();
        let mut controller = DragController::default();

        drag(&mut controller, &state, 1);
        assert_eq!(controller.cancel(), Some(1));
        assert!(controller.is_idle());
        assert_eq!(controller.pointer_up(Some(DropZone::Table(1))), None);

        controller.pointer_down(99, Point::default());
        assert!(controller.pointer_move(&state, Point::new(50.0, 0.0)).is_none());
        assert!(controller.is_idle());
    }

    #[test]
    fn test_second_press_ignored_while_dragging() {
        let state = state();
        let mut controller = DragController::default();
        drag(&mut controller, &state, 1);
        assert!(!controller.pointer_down(2, Point::default()));
        assert_eq!(controller.ghost().unwrap().guest.id, 1);
    }

    #[test]
    fn test_outcome_commands() {
        assert_eq!(
            DropOutcome::Unassign { guest_id: 4 }.into_command(),
            Some(SeatingCommand::Unassign { guest_id: 4 })
        );
        assert!(DropOutcome::SnapBack { guest_id: 4 }.into_command().is_none());
    }
}
