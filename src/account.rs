//! Bank accounts and choosing which one to show.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The account type the dashboard reads transactions from.
pub const STANDARD_ACCOUNT_TYPE: &str = "Standard account";

/// A bank account as listed by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The ID used in API requests for this account.
    pub account_id: String,
    /// E.g. "Standard account".
    pub account_type: String,
    /// The name the customer gave the account.
    #[serde(default)]
    pub name: Option<String>,
    /// The bank account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// The amount that can be spent.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub available: Option<Decimal>,
    /// The booked balance.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
}

/// Get the ID of the first account whose type is [STANDARD_ACCOUNT_TYPE].
///
/// # Errors
/// Returns [Error::NotFound] if there is no standard account.
pub fn select_standard_account(accounts: &[Account]) -> Result<&str, Error> {
    accounts
        .iter()
        .find(|account| account.account_type == STANDARD_ACCOUNT_TYPE)
        .map(|account| account.account_id.as_str())
        .ok_or(Error::NotFound)
}
