//! Dedup & Collection Store


use std::collections::HashSet;

use crate::tools::assemble::Record;
use crate::tools::types::Fingerprint;

/// Append-only, fingerprint-keyed record collection for one invocation.
///
/// Holds at most `limit` records and never two with the same fingerprint;
/// insertion order is output order.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    seen: HashSet<Fingerprint>,
    records: Vec<Record>,
    limit: usize,
}

impl CollectionStore {
    pub fn new(limit: usize) -> Self {
        Self {
            seen: HashSet::new(),
            records: Vec::new(),
            limit,
        }
    }

    /// Insert unless the fingerprint was already seen or the store is full.
    pub fn try_insert(&mut self, record: Record) -> bool {
        if self.is_full() || self.seen.contains(record.fingerprint()) {
            return false;
        }
        self.seen.insert(record.fingerprint().clone());
        self.records.push(record);
        true
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.records.len())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
