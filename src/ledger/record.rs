//! Raw transaction records as delivered by the bank.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The field holding the nested card payload on card purchases.
pub const CARD_DETAILS_FIELD: &str = "cardDetails";

/// A single transaction exactly as the provider sent it.
///
/// Field order is preserved so that the transactions table lists columns in
/// the order the provider uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    /// Get the value of `field`, if the record has it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the record has a value, including `null`, for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The field names in provider order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Remove `field` from the record, returning the old value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        // `shift_remove` keeps the remaining fields in their original order.
        self.0.shift_remove(field)
    }

    /// The number of fields in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for TransactionRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Remove `field` from every record in `records`.
///
/// All other fields and the order of the records are left untouched. Records
/// that do not have `field` are not an error.
pub fn sanitize(mut records: Vec<TransactionRecord>, field: &str) -> Vec<TransactionRecord> {
    for record in &mut records {
        record.remove(field);
    }

    records
}
