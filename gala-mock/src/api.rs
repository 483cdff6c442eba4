use crate::state::{AppState, Fault};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{
    EventSeating, Guest, SeatAssignment, SeatAssignmentRequest, TableCustomization,
    TableCustomizationUpdate,
};
use std::sync::Arc;

/// Apply a queued fault, if any, before a mutation
async fn apply_fault(state: &AppState) -> AppResult<()> {
    match state.next_fault().await {
        Some(Fault::Conflict) => Err(AppError::conflict("Seating changed concurrently")),
        Some(Fault::ServerError) => Err(AppError::internal("Injected failure")),
        Some(Fault::Delay(d)) => {
            tokio::time::sleep(d).await;
            Ok(())
        }
        None => Ok(()),
    }
}

/// GET /api/events/{event_id}/seating
async fn get_event_seating(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<ApiResponse<EventSeating>> {
    let store = state.store.read().await;
    Ok(ApiResponse::success(store.event_seating(event_id)?))
}

/// GET /api/events/{event_id}/seating/guests
async fn list_guests(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Guest>>> {
    let store = state.store.read().await;
    Ok(ApiResponse::success(store.guests(event_id)?))
}

/// GET /api/events/{event_id}/tables
async fn list_tables(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<TableCustomization>>> {
    let store = state.store.read().await;
    Ok(ApiResponse::success(store.tables(event_id)?))
}

/// PATCH /api/events/{event_id}/seating/guests/{guest_id}
async fn assign_guest(
    State(state): State<Arc<AppState>>,
    Path((event_id, guest_id)): Path<(i64, i64)>,
    Json(req): Json<SeatAssignmentRequest>,
) -> AppResult<ApiResponse<SeatAssignment>> {
    apply_fault(&state).await?;
    let mut store = state.store.write().await;
    let assignment = store.assign(event_id, guest_id, req.table_number)?;
    Ok(ApiResponse::success(assignment))
}

/// PATCH /api/events/{event_id}/tables/{table_number}
async fn update_table(
    State(state): State<Arc<AppState>>,
    Path((event_id, table_number)): Path<(i64, u32)>,
    Json(update): Json<TableCustomizationUpdate>,
) -> AppResult<ApiResponse<TableCustomization>> {
    apply_fault(&state).await?;
    let mut store = state.store.write().await;
    let table = store.customize(event_id, table_number, update)?;
    tracing::info!(event_id, table_number, "Table customization updated");
    Ok(ApiResponse::success(table))
}

pub fn router(state: Arc<AppState>) -> Router {
    use tower::limit::ConcurrencyLimitLayer;
    use tower_http::trace::TraceLayer;

    let concurrency_limit = ConcurrencyLimitLayer::new(100);

    Router::new()
        .route("/api/events/{event_id}/seating", get(get_event_seating))
        .route("/api/events/{event_id}/seating/guests", get(list_guests))
        .route(
            "/api/events/{event_id}/seating/guests/{guest_id}",
            patch(assign_guest),
        )
        .route("/api/events/{event_id}/tables", get(list_tables))
        .route(
            "/api/events/{event_id}/tables/{table_number}",
            patch(update_table),
        )
        .layer(TraceLayer::new_for_http())
        .layer(concurrency_limit)
        .with_state(state)
}
