//! Grouping transactions by their transaction type.

use std::collections::HashMap;

use crate::{Error, ledger::transaction::Transaction};

/// Transactions grouped by transaction type.
///
/// Categories are kept in the order they were first seen, and the
/// transactions in each category keep their input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBucket {
    categories: Vec<(String, Vec<Transaction>)>,
    positions: HashMap<String, usize>,
}

impl CategoryBucket {
    /// Append `transaction` to the category `label`, creating it if needed.
    fn push(&mut self, label: &str, transaction: Transaction) {
        match self.positions.get(label) {
            Some(&position) => self.categories[position].1.push(transaction),
            None => {
                self.positions
                    .insert(label.to_owned(), self.categories.len());
                self.categories.push((label.to_owned(), vec![transaction]));
            }
        }
    }

    /// The transactions for `label`, if there are any.
    pub fn get(&self, label: &str) -> Option<&[Transaction]> {
        self.positions
            .get(label)
            .map(|&position| self.categories[position].1.as_slice())
    }

    /// Iterate over the categories in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Transaction])> {
        self.categories
            .iter()
            .map(|(label, transactions)| (label.as_str(), transactions.as_slice()))
    }

    /// The category labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(label, _)| label.as_str())
    }

    /// The number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Group `transactions` by their transaction type.
///
/// Labels are compared exactly, so "Transfer" and "transfer" are two
/// categories.
///
/// # Errors
/// Returns [Error::MalformedRecord] for the first transaction without a
/// transaction type. No partial bucket is returned.
pub fn categorize(transactions: &[Transaction]) -> Result<CategoryBucket, Error> {
    let mut bucket = CategoryBucket::default();

    for (index, transaction) in transactions.iter().enumerate() {
        let label = transaction
            .transaction_type
            .as_deref()
            .ok_or_else(|| Error::MalformedRecord {
                index,
                reason: "missing transactionType".to_owned(),
            })?;

        bucket.push(label, transaction.clone());
    }

    Ok(bucket)
}
