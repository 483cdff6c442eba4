//! Board configuration

use std::time::Duration;

/// Seating board configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | GALA_DRAG_ACTIVATION_PX | 8 | Pointer travel before a press becomes a drag |
/// | GALA_SLOW_UPDATE_MS | 500 | Round-trip time that triggers the slow-update warning |
/// | GALA_EVENT_CHANNEL_CAPACITY | 256 | Board event broadcast buffer |
/// | GALA_LOG_LEVEL | info | Log level |
/// | GALA_LOG_DIR | - | Directory for daily rolling log files |
#[derive(Debug, Clone)]
pub struct SeatingConfig {
    /// Minimum pointer travel in pixels
    pub drag_activation_distance: f32,
    pub slow_update_threshold: Duration,
    pub event_channel_capacity: usize,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl SeatingConfig {
    pub const DEFAULT_DRAG_ACTIVATION_PX: f32 = 8.0;
    pub const DEFAULT_SLOW_UPDATE_MS: u64 = 500;
    pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            drag_activation_distance: env_or(
                "GALA_DRAG_ACTIVATION_PX",
                Self::DEFAULT_DRAG_ACTIVATION_PX,
            ),
            slow_update_threshold: Duration::from_millis(env_or(
                "GALA_SLOW_UPDATE_MS",
                Self::DEFAULT_SLOW_UPDATE_MS,
            )),
            event_channel_capacity: env_or(
                "GALA_EVENT_CHANNEL_CAPACITY",
                Self::DEFAULT_EVENT_CHANNEL_CAPACITY,
            )
            .max(1),
            log_level: std::env::var("GALA_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("GALA_LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    pub fn with_slow_update_threshold(mut self, threshold: Duration) -> Self {
        self.slow_update_threshold = threshold;
        self
    }

    pub fn with_drag_activation_distance(mut self, pixels: f32) -> Self {
        self.drag_activation_distance = pixels;
        self
    }
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            drag_activation_distance: Self::DEFAULT_DRAG_ACTIVATION_PX,
            slow_update_threshold: Duration::from_millis(Self::DEFAULT_SLOW_UPDATE_MS),
            event_channel_capacity: Self::DEFAULT_EVENT_CHANNEL_CAPACITY,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> SeatingConfig {
    dotenv::dotenv().ok();
    let config = SeatingConfig::from_env();
    crate::logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SeatingConfig::default();
        assert_eq!(config.drag_activation_distance, 8.0);
        assert_eq!(config.slow_update_threshold, Duration::from_millis(500));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_builders() {
        let config = SeatingConfig::default()
            .with_slow_update_threshold(Duration::from_millis(50))
            .with_drag_activation_distance(3.0);
        assert_eq!(config.slow_update_threshold, Duration::from_millis(50));
        assert_eq!(config.drag_activation_distance, 3.0);
    }
}
