//! SeatingBoard - the single owner of a seating view
//!
//! Drag controller, manual assignment modal and table editor all go through
//! this type. It owns the [`SeatingState`], runs commands optimistically and
//! publishes [`BoardEvent`]s.
//!
//! # Concurrency
//!
//! The state sits behind a `parking_lot::Mutex` that is only held for
//! synchronous work, never across a network call. While an operation is in
//! flight its guest (or table) is marked busy and further operations on it are
//! refused. Operations on different guests or tables overlap freely.
//!
//! Every initialize, load and teardown bumps an epoch counter. A response
//! that arrives for an older epoch is discarded without touching state.

use gala_client::{ClientResult, SeatingApi};
use parking_lot::Mutex;
use serde::Serialize;
use shared::models::{Capability, EventSeating, Role, TableCustomizationUpdate};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

use crate::command::{
    Confirmation, LockKey, OperationId, OperationKind, OperationPhase, SeatingCommand,
};
use crate::config::SeatingConfig;
use crate::drag::{DragSource, DropOutcome};
use crate::editor::TableDetailEditor;
use crate::error::{SeatingError, SeatingResult};
use crate::events::BoardEvent;
use crate::modal::ManualAssignment;
use crate::state::{SeatingState, TableSummary};

/// Outcome of one board operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub id: OperationId,
    pub kind: OperationKind,
    pub phase: OperationPhase,
    #[serde(skip)]
    pub elapsed: Duration,
    /// Slow-update warning was raised while waiting
    pub slow: bool,
}

impl OperationReport {
    fn new(id: OperationId, kind: OperationKind, phase: OperationPhase) -> Self {
        Self {
            id,
            kind,
            phase,
            elapsed: Duration::ZERO,
            slow: false,
        }
    }
}

#[derive(Debug, Default)]
struct BoardInner {
    state: SeatingState,
    epoch: u64,
    busy_guests: HashSet<i64>,
    busy_tables: HashSet<u32>,
}

impl BoardInner {
    fn is_busy(&self, key: LockKey) -> bool {
        match key {
            LockKey::Guest(id) => self.busy_guests.contains(&id),
            LockKey::Table(n) => self.busy_tables.contains(&n),
        }
    }

    fn acquire(&mut self, key: LockKey) {
        match key {
            LockKey::Guest(id) => self.busy_guests.insert(id),
            LockKey::Table(n) => self.busy_tables.insert(n),
        };
    }

    fn release(&mut self, key: LockKey) {
        match key {
            LockKey::Guest(id) => self.busy_guests.remove(&id),
            LockKey::Table(n) => self.busy_tables.remove(&n),
        };
    }

    /// Start a new epoch, orphaning every in-flight operation
    fn reset_epoch(&mut self) {
        self.epoch += 1;
        self.busy_guests.clear();
        self.busy_tables.clear();
    }
}

pub struct SeatingBoard<A: SeatingApi> {
    api: Arc<A>,
    role: Role,
    config: SeatingConfig,
    inner: Mutex<BoardInner>,
    events: broadcast::Sender<BoardEvent>,
}

impl<A: SeatingApi> SeatingBoard<A> {
    pub fn new(api: Arc<A>, role: Role, config: SeatingConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));
        Self {
            api,
            role,
            config,
            inner: Mutex::new(BoardInner::default()),
            events,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &SeatingConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: BoardEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn require(&self, capability: Capability) -> SeatingResult<()> {
        if self.role.can(capability) {
            Ok(())
        } else {
            Err(SeatingError::PermissionDenied {
                role: self.role,
                capability,
            })
        }
    }

    // ========== Lifecycle ==========

    /// Reset to `table_count` empty tables for `event_id`
    ///
    /// Also used when switching events; anything still in flight for the
    /// previous event is discarded.
    pub fn initialize(
        &self,
        event_id: i64,
        table_count: u32,
        default_capacity: u32,
    ) -> SeatingResult<()> {
        self.require(Capability::ViewSeating)?;
        {
            let mut inner = self.inner.lock();
            inner
                .state
                .initialize(event_id, table_count, default_capacity)?;
            inner.reset_epoch();
        }
        tracing::info!(event_id, table_count, default_capacity, "Seating board initialized");
        self.publish(BoardEvent::Initialized {
            event_id,
            table_count,
        });
        Ok(())
    }

    /// Fetch guests and table customizations and replace local data
    ///
    /// On failure the previous state stays on screen. Returns the number of
    /// guests loaded, or `None` when the board was reset during the fetch.
    pub async fn load_guests(&self) -> SeatingResult<Option<usize>> {
        self.require(Capability::ViewSeating)?;
        let (event_id, epoch) = {
            let inner = self.inner.lock();
            let event_id = inner.state.event_id().ok_or(SeatingError::NotInitialized)?;
            (event_id, inner.epoch)
        };

        let fetched = tokio::try_join!(
            self.api.fetch_guests(event_id),
            self.api.fetch_table_customizations(event_id),
        );
        let (guests, tables) = match fetched {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(event_id, error = %e, "Failed to load seating");
                let err = SeatingError::Load(e);
                self.publish(BoardEvent::LoadFailed {
                    event_id,
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        let guest_count = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch || inner.state.event_id() != Some(event_id) {
                tracing::debug!(event_id, "Board reset during load, response discarded");
                return Ok(None);
            }
            inner.state.populate(guests, tables);
            // Server data supersedes any optimistic change still in flight
            inner.reset_epoch();
            inner.state.guest_count()
        };

        tracing::info!(event_id, guest_count, "Seating loaded");
        self.publish(BoardEvent::Loaded {
            event_id,
            guest_count,
        });
        Ok(Some(guest_count))
    }

    /// Fetch the event's table layout, initialize and load
    pub async fn open_event(&self, event_id: i64) -> SeatingResult<EventSeating> {
        self.require(Capability::ViewSeating)?;
        let seating = self
            .api
            .fetch_event_seating(event_id)
            .await
            .map_err(|e| {
                self.publish(BoardEvent::LoadFailed {
                    event_id,
                    message: e.to_string(),
                });
                SeatingError::Load(e)
            })?;
        self.initialize(
            seating.event_id,
            seating.table_count,
            seating.max_guests_per_table,
        )?;
        self.load_guests().await?;
        Ok(seating)
    }

    /// Discard the view; pending responses become no-ops
    pub fn teardown(&self) {
        let mut inner = self.inner.lock();
        let event_id = inner.state.event_id();
        inner.state.clear();
        inner.reset_epoch();
        tracing::debug!(?event_id, "Seating board torn down");
    }

    // ========== Operations ==========

    /// Seat a guest, moving it from the pool or another table
    pub async fn assign_guest_to_table(
        &self,
        guest_id: i64,
        table_number: u32,
    ) -> SeatingResult<OperationReport> {
        self.execute(SeatingCommand::Assign {
            guest_id,
            table_number,
        })
        .await
    }

    /// Move a seated guest back to the unassigned pool
    pub async fn remove_guest_from_table(&self, guest_id: i64) -> SeatingResult<OperationReport> {
        self.execute(SeatingCommand::Unassign { guest_id }).await
    }

    /// Replace a table's capacity override, name and captain
    pub async fn update_table_customization(
        &self,
        table_number: u32,
        update: TableCustomizationUpdate,
    ) -> SeatingResult<OperationReport> {
        self.execute(SeatingCommand::Customize {
            table_number,
            update,
        })
        .await
    }

    /// Run whatever a finished drag gesture resolved to
    ///
    /// Snap-backs and clicks change nothing and return `None`.
    pub async fn handle_drop(
        &self,
        outcome: DropOutcome,
    ) -> SeatingResult<Option<OperationReport>> {
        match outcome.into_command() {
            Some(command) => self.execute(command).await.map(Some),
            None => Ok(None),
        }
    }

    async fn execute(&self, mut command: SeatingCommand) -> SeatingResult<OperationReport> {
        let kind = command.kind();
        let key = command.lock_key();
        let id = Uuid::new_v4();

        let prepared = self.require(command.required_capability()).and_then(|_| {
            let mut inner = self.inner.lock();
            let event_id = inner.state.event_id().ok_or(SeatingError::NotInitialized)?;
            if inner.is_busy(key) {
                return Err(match key {
                    LockKey::Guest(g) => SeatingError::GuestBusy(g),
                    LockKey::Table(t) => SeatingError::TableBusy(t),
                });
            }
            let undo = command.apply(&mut inner.state)?;
            if undo.is_some() {
                inner.acquire(key);
            }
            Ok((event_id, inner.epoch, undo))
        });

        let (event_id, epoch, undo) = match prepared {
            Ok((_, _, None)) => {
                tracing::debug!(?kind, "Operation is a no-op");
                return Ok(OperationReport::new(id, kind, OperationPhase::Idle));
            }
            Ok((event_id, epoch, Some(undo))) => (event_id, epoch, undo),
            Err(err) => {
                tracing::info!(?kind, error = %err, "Operation rejected locally");
                self.publish(BoardEvent::OperationRejected {
                    kind,
                    code: err.code(),
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        tracing::debug!(%id, ?kind, event_id, "Optimistic change applied");
        self.publish(BoardEvent::OperationApplied { id, kind });

        let started = Instant::now();
        let (result, slow) = self.commit_with_advisory(&command, event_id, id).await;
        let elapsed = started.elapsed();
        let mut report = OperationReport {
            id,
            kind,
            phase: OperationPhase::Optimistic,
            elapsed,
            slow,
        };

        let result = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                tracing::debug!(%id, ?kind, "View reset while in flight, response discarded");
                report.phase = OperationPhase::Discarded;
                return Ok(report);
            }
            inner.release(key);
            match result {
                Ok(confirmation) => {
                    confirmation.reconcile(&mut inner.state);
                    Ok(())
                }
                Err(e) => {
                    undo.rollback(&mut inner.state);
                    Err(SeatingError::from_commit(e))
                }
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(%id, ?kind, elapsed_ms = elapsed.as_millis() as u64, "Operation committed");
                report.phase = OperationPhase::Committed;
                self.publish(BoardEvent::OperationCommitted { id, kind });
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(%id, ?kind, error = %err, "Operation rolled back");
                self.publish(BoardEvent::OperationRolledBack {
                    id,
                    kind,
                    code: err.code(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Await the commit, warning once if it outlasts the slow threshold
    async fn commit_with_advisory(
        &self,
        command: &SeatingCommand,
        event_id: i64,
        id: OperationId,
    ) -> (ClientResult<Confirmation>, bool) {
        let threshold = self.config.slow_update_threshold;
        let commit = command.commit(self.api.as_ref(), event_id);
        tokio::pin!(commit);

        tokio::select! {
            result = &mut commit => (result, false),
            _ = tokio::time::sleep(threshold) => {
                tracing::warn!(
                    %id,
                    threshold_ms = threshold.as_millis() as u64,
                    "Seating update is slow, it may not have persisted"
                );
                self.publish(BoardEvent::SlowUpdate {
                    id,
                    kind: command.kind(),
                    elapsed: threshold,
                });
                (commit.await, true)
            }
        }
    }

    // ========== Views ==========

    /// Modal model for seating one guest
    pub fn manual_assignment(&self, guest_id: i64) -> SeatingResult<ManualAssignment> {
        self.require(Capability::AssignSeats)?;
        let inner = self.inner.lock();
        if inner.busy_guests.contains(&guest_id) {
            return Err(SeatingError::GuestBusy(guest_id));
        }
        ManualAssignment::open(&inner.state, guest_id)
    }

    /// Editor model for one table
    pub fn table_editor(&self, table_number: u32) -> SeatingResult<TableDetailEditor> {
        self.require(Capability::EditTables)?;
        let inner = self.inner.lock();
        if inner.busy_tables.contains(&table_number) {
            return Err(SeatingError::TableBusy(table_number));
        }
        TableDetailEditor::open(&inner.state, table_number)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SeatingState {
        self.inner.lock().state.clone()
    }

    /// Read the state without copying it
    pub fn with_state<R>(&self, f: impl FnOnce(&SeatingState) -> R) -> R {
        f(&self.inner.lock().state)
    }

    pub fn table_summaries(&self) -> Vec<TableSummary> {
        self.inner.lock().state.table_summaries()
    }

    pub fn is_guest_busy(&self, guest_id: i64) -> bool {
        self.inner.lock().busy_guests.contains(&guest_id)
    }

    pub fn is_table_busy(&self, table_number: u32) -> bool {
        self.inner.lock().busy_tables.contains(&table_number)
    }
}

impl<A: SeatingApi> DragSource for SeatingBoard<A> {
    fn find_guest(&self, guest_id: i64) -> Option<shared::models::Guest> {
        self.inner.lock().state.find_guest(guest_id).cloned()
    }

    fn is_draggable(&self, guest_id: i64) -> bool {
        if !self.role.can(Capability::AssignSeats) {
            return false;
        }
        let inner = self.inner.lock();
        inner.state.locate(guest_id).is_some() && !inner.busy_guests.contains(&guest_id)
    }
}
