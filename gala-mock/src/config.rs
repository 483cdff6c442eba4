//! Mock server configuration

/// Mock seating API configuration
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | GALA_MOCK_PORT | 8080 | HTTP port |
/// | GALA_MOCK_TABLES | 10 | Tables in the demo event |
/// | GALA_MOCK_TABLE_CAPACITY | 8 | Default capacity of the demo event |
/// | GALA_MOCK_GUESTS | 40 | Guests in the demo event |
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub http_port: u16,
    pub demo_tables: u32,
    pub demo_table_capacity: u32,
    pub demo_guests: u32,
}

impl MockConfig {
    pub fn from_env() -> Self {
        Self {
            http_port: env_or("GALA_MOCK_PORT", 8080),
            demo_tables: env_or("GALA_MOCK_TABLES", 10),
            demo_table_capacity: env_or("GALA_MOCK_TABLE_CAPACITY", 8),
            demo_guests: env_or("GALA_MOCK_GUESTS", 40),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
