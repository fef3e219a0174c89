//! Where transactions and accounts come from.
//!
//! The dashboard talks to the Sbanken API in production and to a JSON
//! fixture file for local testing. Both are wrapped by [BankProvider], which
//! is handed to the request handlers through the app state.

mod fixture;
mod models;
mod sbanken;

#[cfg(test)]
pub use fixture::FIXTURE_ACCOUNT_ID;
pub use fixture::FixtureProvider;
pub use models::Customer;
pub use sbanken::{Credentials, DEFAULT_API_URL, DEFAULT_TOKEN_URL, SbankenClient};

use time::Date;

use crate::{Error, account::Account, ledger::TransactionRecord};

/// The account and date range to fetch transactions for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// The customer who owns the account.
    pub customer_id: String,
    /// The account to read transactions from.
    pub account_id: String,
    /// The first day to include.
    pub start_date: Date,
    /// The last day to include.
    pub end_date: Date,
}

/// A source of bank data.
#[derive(Debug)]
pub enum BankProvider {
    /// The Sbanken REST API.
    Sbanken(SbankenClient),
    /// Transactions read from a JSON file.
    Fixture(FixtureProvider),
}

impl BankProvider {
    /// Fetch the raw transaction records for `query`.
    ///
    /// # Errors
    /// Errors from the provider are passed through as they are.
    pub async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, Error> {
        match self {
            BankProvider::Sbanken(client) => client.get_transactions(query).await,
            BankProvider::Fixture(fixture) => Ok(fixture.transactions(query)),
        }
    }

    /// List the accounts belonging to `customer_id`.
    pub async fn list_accounts(&self, customer_id: &str) -> Result<Vec<Account>, Error> {
        match self {
            BankProvider::Sbanken(client) => client.get_accounts(customer_id).await,
            BankProvider::Fixture(fixture) => Ok(fixture.accounts()),
        }
    }

    /// Get the customer's details, `None` when using fixture data.
    pub async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, Error> {
        match self {
            BankProvider::Sbanken(client) => client.get_customer(customer_id).await.map(Some),
            BankProvider::Fixture(_) => Ok(None),
        }
    }
}
