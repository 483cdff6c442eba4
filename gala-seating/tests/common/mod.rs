//! In-process seating API used by the board tests
//!
//! Keeps guests and tables in memory, applies assignments without capacity
//! checks, and fails or delays calls on demand.

#![allow(dead_code)]

use async_trait::async_trait;
use gala_client::{ClientError, ClientResult, SeatingApi};
use gala_seating::{BoardEvent, SeatingBoard, SeatingConfig};
use parking_lot::Mutex;
use shared::models::{
    EventSeating, Guest, Role, SeatAssignment, TableCustomization, TableCustomizationUpdate,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

/// Which call a fault applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Guest(i64),
    Table(u32),
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Server answers 409
    Conflict,
    /// Request never completes
    Network,
    /// Server answers 500
    Server,
}

impl Fault {
    fn into_error(self) -> ClientError {
        match self {
            Fault::Conflict => ClientError::Conflict("seating changed".into()),
            Fault::Server => ClientError::Internal("injected".into()),
            Fault::Network => ClientError::Http(transport_error()),
        }
    }
}

/// A real reqwest error without touching the network
fn transport_error() -> reqwest::Error {
    match reqwest::Client::new().get("not a url").build() {
        Err(e) => e,
        Ok(_) => panic!("invalid URL unexpectedly accepted"),
    }
}

#[derive(Default)]
pub struct FakeApi {
    seating: Mutex<Option<EventSeating>>,
    guests: Mutex<Vec<Guest>>,
    tables: Mutex<HashMap<u32, TableCustomization>>,
    faults: Mutex<HashMap<Target, Fault>>,
    delays: Mutex<HashMap<Target, Duration>>,
    pub mutations: AtomicUsize,
}

impl FakeApi {
    pub fn new(table_count: u32, capacity: u32, guests: Vec<Guest>) -> Self {
        let api = Self::default();
        *api.seating.lock() = Some(EventSeating {
            event_id: 1,
            table_count,
            max_guests_per_table: capacity,
        });
        *api.guests.lock() = guests;
        api
    }

    pub fn with_table(self, table: TableCustomization) -> Self {
        self.tables.lock().insert(table.table_number, table);
        self
    }

    /// Fail the next call for `target`
    pub fn fail(&self, target: Target, fault: Fault) {
        self.faults.lock().insert(target, fault);
    }

    /// Delay every call for `target`
    pub fn delay(&self, target: Target, delay: Duration) {
        self.delays.lock().insert(target, delay);
    }

    pub fn server_guest(&self, guest_id: i64) -> Option<Guest> {
        self.guests.lock().iter().find(|g| g.id == guest_id).cloned()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    async fn gate(&self, target: Target) -> ClientResult<()> {
        let delay = self.delays.lock().get(&target).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.faults.lock().remove(&target) {
            Some(fault) => Err(fault.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SeatingApi for FakeApi {
    async fn fetch_event_seating(&self, _event_id: i64) -> ClientResult<EventSeating> {
        self.gate(Target::Load).await?;
        let seating = *self.seating.lock();
        seating.ok_or_else(|| ClientError::NotFound("event".into()))
    }

    async fn fetch_guests(&self, _event_id: i64) -> ClientResult<Vec<Guest>> {
        self.gate(Target::Load).await?;
        Ok(self.guests.lock().clone())
    }

    async fn fetch_table_customizations(
        &self,
        _event_id: i64,
    ) -> ClientResult<Vec<TableCustomization>> {
        Ok(self.tables.lock().values().cloned().collect())
    }

    async fn assign_guest(
        &self,
        _event_id: i64,
        guest_id: i64,
        table_number: Option<u32>,
    ) -> ClientResult<SeatAssignment> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.gate(Target::Guest(guest_id)).await?;

        let mut guests = self.guests.lock();
        let guest = guests
            .iter_mut()
            .find(|g| g.id == guest_id)
            .ok_or_else(|| ClientError::NotFound("guest".into()))?;
        let previous = guest.table_number;
        guest.table_number = table_number;
        let guest = guest.clone();

        let mut cleared_captain_table = None;
        if let Some(prev) = previous
            && previous != table_number
        {
            let mut tables = self.tables.lock();
            if let Some(t) = tables.get_mut(&prev)
                && t.captain_id == Some(guest_id)
            {
                t.captain_id = None;
                cleared_captain_table = Some(prev);
            }
        }

        Ok(SeatAssignment {
            guest,
            cleared_captain_table,
            updated_at: 0,
        })
    }

    async fn update_table_customization(
        &self,
        _event_id: i64,
        table_number: u32,
        update: &TableCustomizationUpdate,
    ) -> ClientResult<TableCustomization> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.gate(Target::Table(table_number)).await?;
        let table = update.clone().into_customization(table_number);
        self.tables.lock().insert(table_number, table.clone());
        Ok(table)
    }
}

pub fn board(api: Arc<FakeApi>, role: Role) -> SeatingBoard<FakeApi> {
    SeatingBoard::new(api, role, SeatingConfig::default())
}

/// Board with the fake's event opened
pub async fn opened(api: FakeApi) -> (Arc<FakeApi>, SeatingBoard<FakeApi>) {
    let api = Arc::new(api);
    let board = board(api.clone(), Role::EventCoordinator);
    board.open_event(1).await.unwrap();
    (api, board)
}

/// Everything published so far
pub fn drain(rx: &mut broadcast::Receiver<BoardEvent>) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn guests(seated: &[(i64, Option<u32>)]) -> Vec<Guest> {
    seated
        .iter()
        .map(|(id, table)| {
            let guest = Guest::new(*id, format!("Guest {id}"));
            match table {
                Some(n) => guest.seated_at(*n),
                None => guest,
            }
        })
        .collect()
}
