//! A provider that reads transactions from a JSON file instead of the bank.

use std::{fs, path::Path};

use crate::{
    Error,
    account::{Account, STANDARD_ACCOUNT_TYPE},
    ledger::{ACCOUNTING_DATE_FIELD, TransactionRecord, parse_accounting_date},
    provider::TransactionQuery,
};

/// The account ID reported for fixture data.
pub const FIXTURE_ACCOUNT_ID: &str = "fixture";

/// Transactions loaded from a file containing a JSON array of transaction
/// objects, in the same shape the Sbanken API returns them.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    records: Vec<TransactionRecord>,
}

impl FixtureProvider {
    /// Load the transactions in the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [Error::FixtureError] if the file cannot be read or does not
    /// contain a JSON array of objects.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|error| {
            Error::FixtureError(format!("could not read {}: {error}", path.display()))
        })?;

        let records: Vec<TransactionRecord> = serde_json::from_str(&text).map_err(|error| {
            Error::FixtureError(format!(
                "{} is not a JSON array of transactions: {error}",
                path.display()
            ))
        })?;

        tracing::info!(
            "Loaded {} fixture transactions from {}",
            records.len(),
            path.display()
        );

        Ok(Self::from_records(records))
    }

    /// Serve `records` directly, e.g. in tests.
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// A single standard account so that account selection works offline.
    pub fn accounts(&self) -> Vec<Account> {
        vec![Account {
            account_id: FIXTURE_ACCOUNT_ID.to_owned(),
            account_type: STANDARD_ACCOUNT_TYPE.to_owned(),
            name: Some("Fixture".to_owned()),
            account_number: None,
            available: None,
            balance: None,
        }]
    }

    /// The records posted within the query's date range.
    ///
    /// Records without a readable date are kept.
    pub fn transactions(&self, query: &TransactionQuery) -> Vec<TransactionRecord> {
        let range = query.start_date..=query.end_date;

        self.records
            .iter()
            .filter(|record| {
                record
                    .get(ACCOUNTING_DATE_FIELD)
                    .and_then(|value| value.as_str())
                    .and_then(parse_accounting_date)
                    .is_none_or(|date| range.contains(&date))
            })
            .cloned()
            .collect()
    }
}
