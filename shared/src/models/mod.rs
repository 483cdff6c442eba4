//! Data models
//!
//! Shared between the seating board, the HTTP client and the mock API.
//! Guest and event IDs are `i64`; tables are addressed by their 1-based number.

pub mod assignment;
pub mod event;
pub mod guest;
pub mod role;
pub mod table;

// Re-exports
pub use assignment::*;
pub use event::*;
pub use guest::*;
pub use role::*;
pub use table::*;
