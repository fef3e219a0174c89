//! Dashboard module
//!
//! Provides the overview tab with income and expense charts, and the
//! transactions tab with a sortable, filterable table.

mod charts;
mod handlers;
mod query;
mod tables;

pub use handlers::{get_dashboard_page, get_transactions_page};
pub use query::DashboardQuery;
