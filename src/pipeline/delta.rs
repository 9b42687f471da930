// src/pipeline/delta.rs

//! Seen-set bookkeeping and delta computation.
//!
//! The seen-set is an explicit value threaded through load → delta → save;
//! there is no in-process global. Membership is permanent: an animal that
//! disappears from the listings and later reappears is still "seen" and is
//! not re-alerted.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::AnimalRecord;

/// Persisted mapping from store key to previously observed animal ids.
///
/// BTree containers keep the serialized document stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    entries: BTreeMap<String, BTreeSet<u64>>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any ids are recorded under the given key.
    pub fn is_empty(&self, key: &str) -> bool {
        self.entries.get(key).is_none_or(BTreeSet::is_empty)
    }

    pub fn contains(&self, key: &str, id: u64) -> bool {
        self.entries.get(key).is_some_and(|ids| ids.contains(&id))
    }

    /// The ids recorded under the given key.
    pub fn ids(&self, key: &str) -> impl Iterator<Item = u64> + '_ {
        self.entries.get(key).into_iter().flatten().copied()
    }

    pub fn insert(&mut self, key: &str, id: u64) {
        self.entries.entry(key.to_string()).or_default().insert(id);
    }

    /// Compute the newly-appeared records for a scan and mark the whole scan
    /// as seen.
    ///
    /// Returns the subsequence of `records` whose id is not yet in the set,
    /// in the same relative order as produced by the pager. Afterwards every
    /// scanned id (new or not) is recorded, so a second identical scan
    /// yields an empty delta.
    pub fn delta(&mut self, key: &str, records: &[AnimalRecord]) -> Vec<AnimalRecord> {
        let new_records: Vec<AnimalRecord> = records
            .iter()
            .filter(|r| !self.contains(key, r.id))
            .cloned()
            .collect();

        let ids = self.entries.entry(key.to_string()).or_default();
        ids.extend(records.iter().map(|r| r.id));

        new_records
    }
}
