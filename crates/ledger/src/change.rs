use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{ChangeId, FieldValue, ProductId};

/// Classification of one audit entry.
///
/// `Updated` is the default; the diff engine upgrades it when one of the
/// specially tracked fields (price, stock, image URL) is among the changed
/// fields. Deletion markers reuse `Updated`; there is no dedicated
/// deleted classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Created,
    Updated,
    PriceChanged,
    StockChanged,
    ImageUpdated,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Created => "created",
            ChangeType::Updated => "updated",
            ChangeType::PriceChanged => "price_changed",
            ChangeType::StockChanged => "stock_changed",
            ChangeType::ImageUpdated => "image_updated",
        }
    }
}

impl core::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after value pair for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDelta {
    pub before: FieldValue,
    pub after: FieldValue,
}

impl FieldDelta {
    pub fn new(before: FieldValue, after: FieldValue) -> Self {
        Self { before, after }
    }
}

/// One immutable audit entry capturing a single state transition.
///
/// `product_id` is a back-reference only: the record survives deletion of
/// the product it describes. Once appended to the log a record is never
/// mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Unique entry id. Nil while the record is a draft; the audit log
    /// assigns a real id at append time.
    pub id: ChangeId,
    pub product_id: ProductId,
    pub timestamp: DateTime<Utc>,
    pub change_type: ChangeType,
    /// Field name → before/after pair. May be empty (a no-op update still
    /// produces an entry).
    pub changes: BTreeMap<String, FieldDelta>,
    /// Attribution string from the caller's identity; recorded verbatim.
    pub changed_by: String,
}

impl ChangeRecord {
    /// Build a draft entry with a nil id, to be assigned by the log.
    pub fn draft(
        product_id: ProductId,
        timestamp: DateTime<Utc>,
        change_type: ChangeType,
        changes: BTreeMap<String, FieldDelta>,
        changed_by: impl Into<String>,
    ) -> Self {
        Self {
            id: ChangeId::nil(),
            product_id,
            timestamp,
            change_type,
            changes,
            changed_by: changed_by.into(),
        }
    }
}
