//! Shared types for the Gala platform
//!
//! Domain models, error codes, the API response envelope and validation
//! limits used by the seating board, the HTTP client and the mock API.

pub mod error;
pub mod models;
pub mod validation;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
