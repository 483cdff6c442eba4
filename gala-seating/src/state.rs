//! SeatingState - in-memory seating snapshot for one event
//!
//! Tables are numbered `1..=table_count` and always present, even when empty.
//! Every guest lives in exactly one place: the unassigned pool or one table's
//! list. All mutation goes through the methods below; callers never reach into
//! the collections directly.

use shared::error::ErrorCode;
use shared::models::{Guest, TableCustomization, TableCustomizationUpdate};
use shared::validation::{normalize_table_name, validate_customization_fields};
use std::collections::BTreeMap;

use crate::error::{SeatingError, SeatingResult};

/// Where a guest currently sits, with its position in that list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestLocation {
    Unassigned { index: usize },
    Table { table_number: u32, index: usize },
}

impl GuestLocation {
    pub fn table_number(&self) -> Option<u32> {
        match self {
            GuestLocation::Unassigned { .. } => None,
            GuestLocation::Table { table_number, .. } => Some(*table_number),
        }
    }
}

/// Undo record of a single guest move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub guest_id: i64,
    pub from: GuestLocation,
    /// Table whose captain reference was cleared by this move
    pub cleared_captain: Option<u32>,
}

/// Read-only view of one table for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub table_number: u32,
    pub label: String,
    pub occupancy: usize,
    pub capacity: u32,
    pub is_full: bool,
    pub captain_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatingState {
    event_id: Option<i64>,
    default_capacity: u32,
    tables: BTreeMap<u32, Vec<Guest>>,
    unassigned: Vec<Guest>,
    customizations: BTreeMap<u32, TableCustomization>,
}

impl SeatingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to `table_count` empty tables, dropping any previous event
    pub fn initialize(
        &mut self,
        event_id: i64,
        table_count: u32,
        default_capacity: u32,
    ) -> SeatingResult<()> {
        if table_count == 0 {
            return Err(SeatingError::validation(
                ErrorCode::ValueOutOfRange,
                "table_count",
                "event must have at least one table",
            ));
        }
        if default_capacity == 0 {
            return Err(SeatingError::validation(
                ErrorCode::ValueOutOfRange,
                "default_capacity",
                "default capacity must be at least 1",
            ));
        }

        *self = Self {
            event_id: Some(event_id),
            default_capacity,
            tables: (1..=table_count).map(|n| (n, Vec::new())).collect(),
            unassigned: Vec::new(),
            customizations: BTreeMap::new(),
        };
        Ok(())
    }

    /// Drop everything (view teardown)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace guests and customizations with freshly loaded data
    ///
    /// Guests pointing at tables that do not exist go to the pool.
    /// Customizations for unknown tables and captains not seated at their
    /// table are discarded.
    pub fn populate(&mut self, guests: Vec<Guest>, customizations: Vec<TableCustomization>) {
        for list in self.tables.values_mut() {
            list.clear();
        }
        self.unassigned.clear();
        self.customizations.clear();

        for mut guest in guests {
            let table = guest.table_number;
            match table {
                Some(n) if self.tables.contains_key(&n) => {
                    if let Some(list) = self.tables.get_mut(&n) {
                        list.push(guest);
                    }
                }
                Some(n) => {
                    tracing::warn!(guest_id = guest.id, table_number = n, "Guest seated at unknown table, moved to pool");
                    guest.table_number = None;
                    self.unassigned.push(guest);
                }
                None => self.unassigned.push(guest),
            }
        }

        for mut custom in customizations {
            let n = custom.table_number;
            if !self.tables.contains_key(&n) {
                tracing::warn!(table_number = n, "Customization for unknown table ignored");
                continue;
            }
            if let Some(captain) = custom.captain_id
                && !self.is_seated_at(captain, n)
            {
                tracing::warn!(table_number = n, captain_id = captain, "Captain not seated at table, reference dropped");
                custom.captain_id = None;
            }
            if !custom.is_empty() {
                self.customizations.insert(n, custom);
            }
        }
    }

    // ========== Queries ==========

    pub fn event_id(&self) -> Option<i64> {
        self.event_id
    }

    pub fn is_initialized(&self) -> bool {
        self.event_id.is_some()
    }

    pub fn table_count(&self) -> u32 {
        self.tables.len() as u32
    }

    pub fn default_capacity(&self) -> u32 {
        self.default_capacity
    }

    pub fn table_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.tables.keys().copied()
    }

    pub fn has_table(&self, table_number: u32) -> bool {
        self.tables.contains_key(&table_number)
    }

    pub fn guests_at(&self, table_number: u32) -> Option<&[Guest]> {
        self.tables.get(&table_number).map(Vec::as_slice)
    }

    pub fn unassigned(&self) -> &[Guest] {
        &self.unassigned
    }

    pub fn customization(&self, table_number: u32) -> Option<&TableCustomization> {
        self.customizations.get(&table_number)
    }

    pub fn guest_count(&self) -> usize {
        self.unassigned.len() + self.tables.values().map(Vec::len).sum::<usize>()
    }

    pub fn occupancy(&self, table_number: u32) -> usize {
        self.tables.get(&table_number).map_or(0, Vec::len)
    }

    /// Custom capacity if set, otherwise the event default
    pub fn effective_capacity(&self, table_number: u32) -> u32 {
        self.customizations
            .get(&table_number)
            .and_then(|c| c.custom_capacity)
            .unwrap_or(self.default_capacity)
    }

    pub fn is_full(&self, table_number: u32) -> bool {
        self.occupancy(table_number) >= self.effective_capacity(table_number) as usize
    }

    /// Custom name, or "Table N"
    pub fn table_label(&self, table_number: u32) -> String {
        self.customizations
            .get(&table_number)
            .and_then(|c| c.table_name.clone())
            .unwrap_or_else(|| format!("Table {}", table_number))
    }

    pub fn captain_of(&self, table_number: u32) -> Option<&Guest> {
        let captain_id = self.customizations.get(&table_number)?.captain_id?;
        self.guests_at(table_number)?
            .iter()
            .find(|g| g.id == captain_id)
    }

    pub fn locate(&self, guest_id: i64) -> Option<GuestLocation> {
        if let Some(index) = self.unassigned.iter().position(|g| g.id == guest_id) {
            return Some(GuestLocation::Unassigned { index });
        }
        self.tables.iter().find_map(|(n, list)| {
            list.iter()
                .position(|g| g.id == guest_id)
                .map(|index| GuestLocation::Table {
                    table_number: *n,
                    index,
                })
        })
    }

    /// Scan the pool first, then each table in ascending order
    pub fn find_guest(&self, guest_id: i64) -> Option<&Guest> {
        self.unassigned
            .iter()
            .chain(self.tables.values().flatten())
            .find(|g| g.id == guest_id)
    }

    pub fn is_seated_at(&self, guest_id: i64, table_number: u32) -> bool {
        self.guests_at(table_number)
            .is_some_and(|list| list.iter().any(|g| g.id == guest_id))
    }

    pub fn table_summaries(&self) -> Vec<TableSummary> {
        self.table_numbers()
            .map(|n| TableSummary {
                table_number: n,
                label: self.table_label(n),
                occupancy: self.occupancy(n),
                capacity: self.effective_capacity(n),
                is_full: self.is_full(n),
                captain_id: self.customizations.get(&n).and_then(|c| c.captain_id),
            })
            .collect()
    }

    // ========== Validation ==========

    /// Local pre-check for seating `guest_id` at `table_number`
    ///
    /// Returns the guest's current location, or `None` when the guest already
    /// sits there and the assignment is a no-op.
    pub fn check_assign(
        &self,
        guest_id: i64,
        table_number: u32,
    ) -> SeatingResult<Option<GuestLocation>> {
        if !self.has_table(table_number) {
            return Err(SeatingError::TableNotFound(table_number));
        }
        let location = self
            .locate(guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;
        if location.table_number() == Some(table_number) {
            return Ok(None);
        }
        if self.is_full(table_number) {
            return Err(SeatingError::CapacityExceeded {
                table_number,
                capacity: self.effective_capacity(table_number),
            });
        }
        Ok(Some(location))
    }

    /// Validate a customization against current seating; returns the normalised update
    pub fn check_customization(
        &self,
        table_number: u32,
        mut update: TableCustomizationUpdate,
    ) -> SeatingResult<TableCustomizationUpdate> {
        if !self.has_table(table_number) {
            return Err(SeatingError::TableNotFound(table_number));
        }
        update.table_name = normalize_table_name(update.table_name);
        validate_customization_fields(&update)?;

        if let Some(capacity) = update.custom_capacity {
            let occupancy = self.occupancy(table_number);
            if (capacity as usize) < occupancy {
                return Err(SeatingError::validation(
                    ErrorCode::CapacityBelowOccupancy,
                    "custom_capacity",
                    format!("{occupancy} guests are seated, capacity cannot be {capacity}"),
                ));
            }
        }

        if let Some(captain_id) = update.captain_id
            && !self.is_seated_at(captain_id, table_number)
        {
            return Err(SeatingError::validation(
                ErrorCode::CaptainNotSeated,
                "captain_id",
                format!("guest {captain_id} is not seated at table {table_number}"),
            ));
        }

        Ok(update)
    }

    // ========== Mutation ==========

    fn take_guest(&mut self, location: GuestLocation) -> Option<Guest> {
        match location {
            GuestLocation::Unassigned { index } => {
                (index < self.unassigned.len()).then(|| self.unassigned.remove(index))
            }
            GuestLocation::Table {
                table_number,
                index,
            } => {
                let list = self.tables.get_mut(&table_number)?;
                (index < list.len()).then(|| list.remove(index))
            }
        }
    }

    fn put_guest(&mut self, mut guest: Guest, table_number: Option<u32>, index: Option<usize>) {
        guest.table_number = table_number;
        let list = match table_number.and_then(|n| self.tables.get_mut(&n)) {
            Some(list) => list,
            None => {
                guest.table_number = None;
                &mut self.unassigned
            }
        };
        match index {
            Some(i) => list.insert(i.min(list.len()), guest),
            None => list.push(guest),
        }
    }

    /// Move a guest to the end of `target` (a table, or the pool for `None`)
    ///
    /// No capacity check: callers validate first. A captain leaving their
    /// table loses the captain role.
    pub fn move_guest(&mut self, guest_id: i64, target: Option<u32>) -> SeatingResult<MoveRecord> {
        if let Some(n) = target
            && !self.has_table(n)
        {
            return Err(SeatingError::TableNotFound(n));
        }
        let from = self
            .locate(guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;
        let guest = self
            .take_guest(from)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;

        let cleared_captain = match from.table_number() {
            Some(prev) if Some(prev) != target => self.clear_captain_if(prev, guest_id),
            _ => None,
        };

        self.put_guest(guest, target, None);
        Ok(MoveRecord {
            guest_id,
            from,
            cleared_captain,
        })
    }

    /// Put a guest back exactly where a move found it
    pub fn undo_move(&mut self, record: &MoveRecord) {
        if let Some(current) = self.locate(record.guest_id)
            && let Some(guest) = self.take_guest(current)
        {
            let (table, index) = match record.from {
                GuestLocation::Unassigned { index } => (None, index),
                GuestLocation::Table {
                    table_number,
                    index,
                } => (Some(table_number), index),
            };
            self.put_guest(guest, table, Some(index));
        }

        if let Some(n) = record.cleared_captain
            && self.is_seated_at(record.guest_id, n)
        {
            self.customizations
                .entry(n)
                .or_insert_with(|| TableCustomization::empty(n))
                .captain_id = Some(record.guest_id);
        }
    }

    /// Clear the table's captain when it is `guest_id`
    pub fn clear_captain_if(&mut self, table_number: u32, guest_id: i64) -> Option<u32> {
        let custom = self.customizations.get_mut(&table_number)?;
        if custom.captain_id != Some(guest_id) {
            return None;
        }
        custom.captain_id = None;
        if custom.is_empty() {
            self.customizations.remove(&table_number);
        }
        Some(table_number)
    }

    /// Replace a table's customization, returning the previous record
    ///
    /// A captain who is no longer seated at the table is dropped.
    pub fn set_customization(
        &mut self,
        table_number: u32,
        customization: Option<TableCustomization>,
    ) -> Option<TableCustomization> {
        let customization = customization.map(|mut c| {
            if let Some(captain) = c.captain_id
                && !self.is_seated_at(captain, table_number)
            {
                tracing::warn!(table_number, captain_id = captain, "Captain no longer seated, reference dropped");
                c.captain_id = None;
            }
            c
        });
        match customization.filter(|c| !c.is_empty()) {
            Some(c) => self.customizations.insert(table_number, c),
            None => self.customizations.remove(&table_number),
        }
    }

    /// Adopt the server's record of a guest
    ///
    /// Keeps the guest's position when the server agrees with the local
    /// table, otherwise moves it to where the server placed it.
    pub fn reconcile_guest(&mut self, server: Guest) {
        let Some(location) = self.locate(server.id) else {
            tracing::warn!(guest_id = server.id, "Confirmed guest missing locally, added to pool");
            let target = server.table_number;
            self.put_guest(server, target, None);
            return;
        };

        if location.table_number() == server.table_number {
            let slot = match location {
                GuestLocation::Unassigned { index } => self.unassigned.get_mut(index),
                GuestLocation::Table {
                    table_number,
                    index,
                } => self
                    .tables
                    .get_mut(&table_number)
                    .and_then(|list| list.get_mut(index)),
            };
            if let Some(slot) = slot {
                *slot = server;
            }
            return;
        }

        tracing::info!(
            guest_id = server.id,
            local = ?location.table_number(),
            server = ?server.table_number,
            "Server placed guest elsewhere, following server"
        );
        if let Some(prev) = location.table_number() {
            self.clear_captain_if(prev, server.id);
        }
        if self.take_guest(location).is_some() {
            let target = server.table_number;
            self.put_guest(server, target, None);
        }
    }

    /// Every violated invariant, as readable messages (empty when consistent)
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for guest in &self.unassigned {
            if !seen.insert(guest.id) {
                problems.push(format!("guest {} appears more than once", guest.id));
            }
            if guest.table_number.is_some() {
                problems.push(format!("pooled guest {} has a table number", guest.id));
            }
        }
        for (n, list) in &self.tables {
            for guest in list {
                if !seen.insert(guest.id) {
                    problems.push(format!("guest {} appears more than once", guest.id));
                }
                if guest.table_number != Some(*n) {
                    problems.push(format!("guest {} listed at table {} but records {:?}", guest.id, n, guest.table_number));
                }
            }
            if list.len() > self.effective_capacity(*n) as usize {
                problems.push(format!("table {} over capacity", n));
            }
        }
        for (n, custom) in &self.customizations {
            if let Some(captain) = custom.captain_id
                && !self.is_seated_at(captain, *n)
            {
                problems.push(format!("captain {} not seated at table {}", captain, n));
            }
        }
        problems
    }
}
