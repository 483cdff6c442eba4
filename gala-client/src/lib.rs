//! Gala Client - HTTP client for the seating API
//!
//! Provides network-based calls to the event seating endpoints and the
//! [`SeatingApi`] trait the seating board is written against.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::SeatingApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
