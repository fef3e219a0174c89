//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::provider::BankProvider;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where the transactions come from.
    pub provider: Arc<BankProvider>,

    /// The customer whose transactions are shown.
    pub customer_id: String,

    /// The standard account selected at startup.
    pub account_id: String,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Oslo".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Oslo".
    pub fn new(
        provider: BankProvider,
        customer_id: &str,
        account_id: &str,
        local_timezone: &str,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            customer_id: customer_id.to_owned(),
            account_id: account_id.to_owned(),
            local_timezone: local_timezone.to_owned(),
        }
    }
}
