//! Stable External Identifiers
//!
//! Every resource instance carries a stable, content-derived identifier
//! that is identical across collector snapshots, the store and the cache.
//! Store-assigned surrogate keys never appear in snapshots; the logical ID
//! is the only identifier a snapshot is permitted to reference.
//!
//! # Example
//!
//! ```
//! use cartograph_core::LogicalId;
//!
//! let id = LogicalId::new("c1a9e2f0-vpc-prod");
//! assert_eq!(id.as_str(), "c1a9e2f0-vpc-prod");
//! assert!(!id.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

/// Stable external identifier for a resource instance.
///
/// Logical IDs are opaque strings, unique within resource type and scope.
/// An empty logical ID marks a malformed snapshot item and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Creates a logical ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// True for the empty identifier, which only malformed items carry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for LogicalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LogicalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LogicalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for LogicalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_logical_id_roundtrip() {
        let id = LogicalId::new("az-1");
        assert_eq!(id.to_string(), "az-1");
        assert_eq!(id.clone().into_string(), "az-1");
    }

    #[test]
    fn test_logical_id_empty() {
        assert!(LogicalId::default().is_empty());
        assert!(!LogicalId::new("x").is_empty());
    }

    #[test]
    fn test_logical_id_borrow_lookup() {
        let mut map: HashMap<LogicalId, i32> = HashMap::new();
        map.insert(LogicalId::new("net-1"), 7);
        assert_eq!(map.get("net-1"), Some(&7));
    }

    #[test]
    fn test_logical_id_serde_transparent() {
        let id = LogicalId::new("vm-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"vm-1\"");
        let back: LogicalId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
