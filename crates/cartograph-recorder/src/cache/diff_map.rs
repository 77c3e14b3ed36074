//! Generic per-type diff-base map.
//!
//! Each resource type owns one `DiffMap`: the in-memory mirror of its
//! store rows used as the known-state side of every diff. The map is read
//! concurrently by external readers, so every batch mutation is applied
//! inside a single write-lock critical section; no lock is ever held
//! across I/O.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use cartograph_core::LogicalId;

/// The diff-base map for one resource type.
#[derive(Debug, Default)]
pub struct DiffMap<B> {
    inner: RwLock<HashMap<LogicalId, B>>,
}

impl<B: Clone> DiffMap<B> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a clone of the diff base for a logical ID.
    pub fn get_cloned(&self, id: &LogicalId) -> Option<B> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(id).cloned()
    }

    /// True when a diff base exists for the logical ID.
    pub fn contains(&self, id: &LogicalId) -> bool {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(id)
    }

    /// Inserts a batch of diff bases as one critical section.
    pub fn insert_batch(&self, entries: Vec<(LogicalId, B)>) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        for (id, base) in entries {
            map.insert(id, base);
        }
    }

    /// Mutates the diff base for a logical ID in place. Returns whether
    /// the entry existed.
    pub fn update_with(&self, id: &LogicalId, f: impl FnOnce(&mut B)) -> bool {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match map.get_mut(id) {
            Some(base) => {
                f(base);
                true
            }
            None => false,
        }
    }

    /// Removes a batch of diff bases as one critical section.
    pub fn remove_batch(&self, ids: &[LogicalId]) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        for id in ids {
            map.remove(id);
        }
    }

    /// The logical IDs cached here but absent from the current snapshot:
    /// the deletion candidates of this pass.
    pub fn ids_missing_from(&self, present: &HashSet<LogicalId>) -> Vec<LogicalId> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.keys()
            .filter(|id| !present.contains(*id))
            .cloned()
            .collect()
    }

    /// Number of cached diff bases.
    pub fn len(&self) -> usize {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.len()
    }

    /// True when no diff bases are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let map: DiffMap<String> = DiffMap::new();
        map.insert_batch(vec![
            (LogicalId::new("a"), "one".to_string()),
            (LogicalId::new("b"), "two".to_string()),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_cloned(&LogicalId::new("a")).as_deref(), Some("one"));

        map.remove_batch(&[LogicalId::new("a")]);
        assert!(!map.contains(&LogicalId::new("a")));
        assert!(map.contains(&LogicalId::new("b")));
    }

    #[test]
    fn test_update_with_missing_entry() {
        let map: DiffMap<i32> = DiffMap::new();
        assert!(!map.update_with(&LogicalId::new("x"), |v| *v += 1));
    }

    #[test]
    fn test_ids_missing_from_snapshot() {
        let map: DiffMap<i32> = DiffMap::new();
        map.insert_batch(vec![
            (LogicalId::new("keep"), 1),
            (LogicalId::new("stale"), 2),
        ]);
        let present: HashSet<LogicalId> = [LogicalId::new("keep")].into_iter().collect();
        assert_eq!(map.ids_missing_from(&present), vec![LogicalId::new("stale")]);
    }
}
