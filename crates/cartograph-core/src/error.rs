//! Error Types
//!
//! Standardized error types shared across cartograph crates.

use thiserror::Error;

/// Result alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by core types.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// The declared resource dependency graph contains a cycle.
    ///
    /// The graph is static data; a cycle is a programming error surfaced
    /// at pass construction, never mid-pass.
    #[error("resource dependency cycle involving: {nodes}")]
    DependencyCycle {
        /// The resource types that could not be ordered.
        nodes: String,
    },

    /// A scope was constructed with an empty domain identifier.
    #[error("scope domain must not be empty")]
    EmptyDomain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_names_nodes() {
        let err = CoreError::DependencyCycle {
            nodes: "az, region".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "resource dependency cycle involving: az, region"
        );
    }
}
