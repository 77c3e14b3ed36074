//! Database configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the database connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait when acquiring a connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl DbConfig {
    /// Creates a config for a URL with default pool settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_on_partial_input() {
        let config: DbConfig =
            serde_json::from_str(r#"{"url":"postgres://localhost/cartograph"}"#).unwrap();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_secs, 30);
    }
}
