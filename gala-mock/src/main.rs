use gala_mock::{AppState, MockConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gala_mock=info,tower_http=info".into()),
        )
        .init();

    let config = MockConfig::from_env();
    let state = Arc::new(AppState::demo(
        config.demo_tables,
        config.demo_table_capacity,
        config.demo_guests,
    ));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Mock seating API listening");

    axum::serve(listener, gala_mock::api::router(state)).await?;
    Ok(())
}
