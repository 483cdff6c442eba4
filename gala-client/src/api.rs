//! Seating API abstraction
//!
//! The seating board only talks to the remote system through this trait, so it
//! can run against [`HttpClient`](crate::HttpClient) or an in-process fake.

use async_trait::async_trait;
use shared::models::{
    EventSeating, Guest, SeatAssignment, TableCustomization, TableCustomizationUpdate,
};

use crate::ClientResult;

/// Remote operations consumed by the seating board
#[async_trait]
pub trait SeatingApi: Send + Sync {
    /// Event-level seating layout (table count, default capacity)
    async fn fetch_event_seating(&self, event_id: i64) -> ClientResult<EventSeating>;

    /// All guests of the event with their current table
    async fn fetch_guests(&self, event_id: i64) -> ClientResult<Vec<Guest>>;

    /// Customization records for tables that have any
    async fn fetch_table_customizations(
        &self,
        event_id: i64,
    ) -> ClientResult<Vec<TableCustomization>>;

    /// Seat a guest at `table_number`, or unassign with `None`
    async fn assign_guest(
        &self,
        event_id: i64,
        guest_id: i64,
        table_number: Option<u32>,
    ) -> ClientResult<SeatAssignment>;

    /// Replace a table's customization
    async fn update_table_customization(
        &self,
        event_id: i64,
        table_number: u32,
        update: &TableCustomizationUpdate,
    ) -> ClientResult<TableCustomization>;
}
