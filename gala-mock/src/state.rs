//! Mock server state
//!
//! `SeatingStore` holds every event in memory and owns the authoritative
//! seating rules; handlers only translate HTTP to store calls.

use chrono::Utc;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    EventSeating, Guest, SeatAssignment, TableCustomization, TableCustomizationUpdate,
};
use shared::validation::{normalize_table_name, validate_customization_fields};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Injected failure for the next mutation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Answer 409 without touching state
    Conflict,
    /// Answer 500 without touching state
    ServerError,
    /// Sleep before handling the request normally
    Delay(Duration),
}

#[derive(Debug, Clone)]
struct EventRecord {
    seating: EventSeating,
    guests: Vec<Guest>,
    tables: BTreeMap<u32, TableCustomization>,
}

impl EventRecord {
    fn guest_mut(&mut self, guest_id: i64) -> AppResult<&mut Guest> {
        self.guests
            .iter_mut()
            .find(|g| g.id == guest_id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::GuestNotFound).with_detail("guest_id", guest_id)
            })
    }

    fn check_table(&self, table_number: u32) -> AppResult<()> {
        if table_number == 0 || table_number > self.seating.table_count {
            return Err(AppError::new(ErrorCode::TableNotFound)
                .with_detail("table_number", table_number));
        }
        Ok(())
    }

    fn occupancy(&self, table_number: u32) -> usize {
        self.guests
            .iter()
            .filter(|g| g.table_number == Some(table_number))
            .count()
    }

    fn capacity(&self, table_number: u32) -> u32 {
        self.tables
            .get(&table_number)
            .and_then(|t| t.custom_capacity)
            .unwrap_or(self.seating.max_guests_per_table)
    }
}

/// All events served by the mock
#[derive(Debug, Default)]
pub struct SeatingStore {
    events: HashMap<i64, EventRecord>,
}

impl SeatingStore {
    pub fn insert_event(
        &mut self,
        seating: EventSeating,
        guests: Vec<Guest>,
        tables: Vec<TableCustomization>,
    ) {
        let tables = tables.into_iter().map(|t| (t.table_number, t)).collect();
        self.events.insert(
            seating.event_id,
            EventRecord {
                seating,
                guests,
                tables,
            },
        );
    }

    fn event(&self, event_id: i64) -> AppResult<&EventRecord> {
        self.events
            .get(&event_id)
            .ok_or_else(|| AppError::not_found(format!("Event {}", event_id)))
    }

    fn event_mut(&mut self, event_id: i64) -> AppResult<&mut EventRecord> {
        self.events
            .get_mut(&event_id)
            .ok_or_else(|| AppError::not_found(format!("Event {}", event_id)))
    }

    pub fn event_seating(&self, event_id: i64) -> AppResult<EventSeating> {
        Ok(self.event(event_id)?.seating)
    }

    pub fn guests(&self, event_id: i64) -> AppResult<Vec<Guest>> {
        Ok(self.event(event_id)?.guests.clone())
    }

    pub fn tables(&self, event_id: i64) -> AppResult<Vec<TableCustomization>> {
        Ok(self.event(event_id)?.tables.values().cloned().collect())
    }

    /// Seat or unassign a guest, enforcing capacity and clearing a departing captain
    pub fn assign(
        &mut self,
        event_id: i64,
        guest_id: i64,
        table_number: Option<u32>,
    ) -> AppResult<SeatAssignment> {
        let event = self.event_mut(event_id)?;
        if let Some(target) = table_number {
            event.check_table(target)?;
        }

        let previous = event.guest_mut(guest_id)?.table_number;
        if let Some(target) = table_number
            && previous != Some(target)
        {
            let capacity = event.capacity(target);
            if event.occupancy(target) >= capacity as usize {
                return Err(AppError::new(ErrorCode::TableFull)
                    .with_detail("table_number", target)
                    .with_detail("capacity", capacity));
            }
        }

        let mut cleared_captain_table = None;
        if let Some(prev) = previous
            && previous != table_number
            && let Some(custom) = event.tables.get_mut(&prev)
            && custom.captain_id == Some(guest_id)
        {
            custom.captain_id = None;
            cleared_captain_table = Some(prev);
            if custom.is_empty() {
                event.tables.remove(&prev);
            }
        }

        let guest = event.guest_mut(guest_id)?;
        guest.table_number = table_number;
        let guest = guest.clone();

        tracing::info!(
            event_id,
            guest_id,
            from = ?previous,
            to = ?table_number,
            "Guest seating updated"
        );

        Ok(SeatAssignment {
            guest,
            cleared_captain_table,
            updated_at: Utc::now().timestamp_millis(),
        })
    }

    /// Replace a table customization after validating it against current seating
    pub fn customize(
        &mut self,
        event_id: i64,
        table_number: u32,
        mut update: TableCustomizationUpdate,
    ) -> AppResult<TableCustomization> {
        let event = self.event_mut(event_id)?;
        event.check_table(table_number)?;

        update.table_name = normalize_table_name(update.table_name);
        validate_customization_fields(&update)?;

        if let Some(capacity) = update.custom_capacity {
            let occupancy = event.occupancy(table_number);
            if (capacity as usize) < occupancy {
                return Err(AppError::new(ErrorCode::CapacityBelowOccupancy)
                    .with_detail("occupancy", occupancy)
                    .with_detail("capacity", capacity));
            }
        }

        if let Some(captain_id) = update.captain_id {
            let seated = event
                .guests
                .iter()
                .any(|g| g.id == captain_id && g.table_number == Some(table_number));
            if !seated {
                return Err(AppError::new(ErrorCode::CaptainNotSeated)
                    .with_detail("captain_id", captain_id));
            }
        }

        let customization = update.into_customization(table_number);
        if customization.is_empty() {
            event.tables.remove(&table_number);
        } else {
            event.tables.insert(table_number, customization.clone());
        }
        Ok(customization)
    }
}

/// Shared handler state
#[derive(Debug, Default)]
pub struct AppState {
    pub store: RwLock<SeatingStore>,
    faults: Mutex<VecDeque<Fault>>,
}

impl AppState {
    pub fn new(store: SeatingStore) -> Self {
        Self {
            store: RwLock::new(store),
            faults: Mutex::new(VecDeque::new()),
        }
    }

    /// Single event, everyone unassigned
    pub fn demo(table_count: u32, capacity: u32, guest_count: u32) -> Self {
        let mut store = SeatingStore::default();
        let guests = (1..=guest_count as i64)
            .map(|id| Guest::new(id, format!("Guest {}", id)).with_bidder_number(100 + id as i32))
            .collect();
        store.insert_event(
            EventSeating {
                event_id: 1,
                table_count,
                max_guests_per_table: capacity,
            },
            guests,
            Vec::new(),
        );
        Self::new(store)
    }

    /// Queue a fault for an upcoming mutation request
    pub async fn inject_fault(&self, fault: Fault) {
        self.faults.lock().await.push_back(fault);
    }

    pub(crate) async fn next_fault(&self) -> Option<Fault> {
        self.faults.lock().await.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SeatingStore {
        let mut store = SeatingStore::default();
        store.insert_event(
            EventSeating {
                event_id: 1,
                table_count: 3,
                max_guests_per_table: 2,
            },
            vec![
                Guest::new(1, "A").seated_at(1),
                Guest::new(2, "B").seated_at(1),
                Guest::new(3, "C"),
            ],
            vec![TableCustomization {
                table_number: 1,
                custom_capacity: None,
                table_name: None,
                captain_id: Some(1),
            }],
        );
        store
    }

    #[test]
    fn test_assign_rejects_full_table() {
        let mut store = store();
        let err = store.assign(1, 3, Some(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::TableFull);
    }

    #[test]
    fn test_moving_captain_clears_reference() {
        let mut store = store();
        let result = store.assign(1, 1, Some(2)).unwrap();
        assert_eq!(result.cleared_captain_table, Some(1));
        assert_eq!(result.guest.table_number, Some(2));
        assert!(store.tables(1).unwrap().is_empty());
    }

    #[test]
    fn test_customize_validates_against_seating() {
        let mut store = store();
        let err = store
            .customize(
                1,
                1,
                TableCustomizationUpdate {
                    custom_capacity: Some(1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityBelowOccupancy);

        let err = store
            .customize(
                1,
                2,
                TableCustomizationUpdate {
                    captain_id: Some(3),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CaptainNotSeated);

        let ok = store
            .customize(
                1,
                1,
                TableCustomizationUpdate {
                    custom_capacity: Some(4),
                    table_name: Some("  Sponsors  ".into()),
                    captain_id: Some(2),
                },
            )
            .unwrap();
        assert_eq!(ok.table_name.as_deref(), Some("Sponsors"));
    }

    #[test]
    fn test_unknown_table() {
        let mut store = store();
        let err = store.assign(1, 3, Some(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }
}
