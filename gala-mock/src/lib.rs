//! In-memory seating API
//!
//! Serves the event seating endpoints from memory, applying the same
//! authoritative checks a production server would (capacity, captain, field
//! limits). Faults can be injected to exercise client rollback paths.

pub mod api;
pub mod config;
pub mod state;

pub use config::MockConfig;
pub use state::{AppState, Fault, SeatingStore};

use std::net::SocketAddr;
use std::sync::Arc;

/// Bind an ephemeral local port and serve in the background
pub async fn spawn(state: Arc<AppState>) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = api::router(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock server error: {}", e);
        }
    });
    Ok(addr)
}
