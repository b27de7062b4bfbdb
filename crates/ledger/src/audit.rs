use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use stockledger_core::{ChangeId, ProductId};

use crate::change::ChangeRecord;

/// Append-only audit trail.
///
/// Entries are stored in append order and never mutated or removed once
/// in, even after the product they describe has been deleted. There is no
/// compaction or retention policy: the log grows for the lifetime of the
/// process and is treated as the permanent record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    records: Vec<ChangeRecord>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a log from previously stored records (startup load or
    /// seed data). Entry ids are taken as-is.
    pub fn from_records(records: Vec<ChangeRecord>) -> Self {
        Self { records }
    }

    /// Append one entry, assigning a fresh id when the entry arrives as a
    /// draft (nil id). Prior entries are never touched.
    pub fn append(&mut self, mut entry: ChangeRecord) -> ChangeId {
        if entry.id.is_nil() {
            entry.id = ChangeId::new();
        }
        let id = entry.id;
        self.records.push(entry);
        id
    }

    /// All entries for one product, most recent first.
    ///
    /// Sorted by timestamp descending; equal timestamps keep append order
    /// (the sort is stable), so two entries written in the same instant
    /// still read back in the order they happened.
    pub fn for_product(&self, product_id: ProductId) -> Vec<ChangeRecord> {
        let mut entries: Vec<ChangeRecord> = self
            .records
            .iter()
            .filter(|record| record.product_id == product_id)
            .cloned()
            .collect();
        entries.sort_by_key(|record| Reverse(record.timestamp));
        entries
    }

    /// Full log in append order, for whole-snapshot persistence.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
