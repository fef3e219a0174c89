//! Sbanken Dashboard is a web app for seeing where your money goes.
//!
//! It fetches the transactions of your standard Sbanken account for a date
//! range, groups them by transaction type and shows the income and expenses
//! per type as pie charts and tables.
//!
//! This library provides the transaction pipeline, the bank clients and a web
//! server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod dashboard;
mod dates;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod ledger;
mod navigation;
mod not_found;
mod provider;
mod routing;
#[cfg(test)]
mod test_utils;

pub use account::{Account, STANDARD_ACCOUNT_TYPE, select_standard_account};
pub use app_state::AppState;
pub use dates::get_local_offset;
pub use error::Error;
pub use ledger::{
    CARD_DETAILS_FIELD, CategoryBucket, CategorySums, DashboardSummary, Transaction,
    TransactionRecord, build_summary, categorize, sanitize, sum_expense, sum_income, summarize,
    total,
};
pub use provider::{
    BankProvider, Credentials, Customer, DEFAULT_API_URL, DEFAULT_TOKEN_URL, FixtureProvider,
    SbankenClient, TransactionQuery,
};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
