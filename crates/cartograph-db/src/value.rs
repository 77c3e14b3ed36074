//! Field-level update values.
//!
//! An update diff is the subset of mutable columns whose values changed
//! between the cached diff base and the current snapshot item. The diff is
//! ordered so generated SQL is deterministic.

use std::fmt::{Display, Formatter};

/// A single column value in an update diff.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
    Bool(bool),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// An ordered set of column changes for one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    changes: Vec<(&'static str, FieldValue)>,
}

impl FieldChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a changed column. Column names are static SQL identifiers,
    /// never user input.
    pub fn set(&mut self, column: &'static str, value: impl Into<FieldValue>) -> &mut Self {
        self.changes.push((column, value.into()));
        self
    }

    /// True when no column changed; no write is issued for an empty diff.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterates changes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, FieldValue)> {
        self.changes.iter()
    }

    /// The changed column names, for logging.
    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        self.changes.iter().map(|(c, _)| *c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diff_means_no_write() {
        let changes = FieldChanges::new();
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
    }

    #[test]
    fn test_changes_keep_insertion_order() {
        let mut changes = FieldChanges::new();
        changes.set("name", "az-1-new").set("pod_num", 3);
        assert_eq!(changes.columns(), vec!["name", "pod_num"]);
        assert_eq!(
            changes.iter().next(),
            Some(&("name", FieldValue::Text("az-1-new".to_string())))
        );
    }
}
