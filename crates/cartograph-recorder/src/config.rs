//! Recorder configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a recorder session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Maximum rows per insert statement; larger add batches are chunked.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Whether to rebuild denormalized projections at the end of a pass.
    #[serde(default = "default_projections_enabled")]
    pub projections_enabled: bool,
}

fn default_batch_size() -> usize {
    1000
}

fn default_projections_enabled() -> bool {
    true
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            projections_enabled: default_projections_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_config_default() {
        let config = RecorderConfig::default();
        assert_eq!(config.batch_size, 1000);
        assert!(config.projections_enabled);
    }
}
