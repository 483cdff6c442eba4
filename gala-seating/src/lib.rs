//! Gala Seating - interactive seating board for event guests
//!
//! # Overview
//!
//! A [`SeatingBoard`] owns the in-memory [`SeatingState`] of one event and
//! runs every change as an optimistic [`SeatingCommand`]: validated and
//! applied locally first, then committed to the seating API and either kept
//! or rolled back. Three front ends drive the same operations:
//!
//! - [`DragController`]: pointer gestures resolved to a [`DropOutcome`]
//! - [`ManualAssignment`]: table selector with live occupancy
//! - [`TableDetailEditor`]: capacity, name and captain form
//!
//! # Module layout
//!
//! ```text
//! gala-seating/src/
//! ├── state.rs    # SeatingState container and invariants
//! ├── command.rs  # Optimistic commands, undo records
//! ├── board.rs    # SeatingBoard: lifecycle, operations, busy tracking
//! ├── drag.rs     # Drag-and-drop gesture state machine
//! ├── modal.rs    # Manual assignment modal
//! ├── editor.rs   # Table detail editor
//! ├── events.rs   # BoardEvent notifications
//! ├── config.rs   # SeatingConfig from environment
//! ├── logger.rs   # tracing setup
//! └── error.rs    # SeatingError
//! ```

pub mod board;
pub mod command;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod events;
pub mod logger;
pub mod modal;
pub mod state;

pub use board::{OperationReport, SeatingBoard};
pub use command::{OperationKind, OperationPhase, SeatingCommand};
pub use config::{SeatingConfig, setup_environment};
pub use drag::{DragController, DragGhost, DragSource, DropOutcome, DropZone, Point};
pub use editor::{FieldError, TableDetailEditor};
pub use error::{SeatingError, SeatingResult};
pub use events::BoardEvent;
pub use logger::{init_logger, init_logger_with_file};
pub use modal::{ManualAssignment, TableOption};
pub use state::{GuestLocation, SeatingState, TableSummary};
