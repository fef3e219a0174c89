//! The endpoint URIs.
//!
//! For endpoints that take dashboard options, use [format_endpoint].

use crate::dashboard::DashboardQuery;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard overview with the income and expense charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The dashboard tab with the transactions table.
pub const TRANSACTIONS_VIEW: &str = "/dashboard/transactions";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Append the query string for `query` to `endpoint_path`.
///
/// Returns `endpoint_path` unchanged if the query is empty or cannot be
/// encoded.
pub fn format_endpoint(endpoint_path: &str, query: &DashboardQuery) -> String {
    match query.to_query_string() {
        Ok(query_string) if !query_string.is_empty() => format!("{endpoint_path}?{query_string}"),
        Ok(_) => endpoint_path.to_owned(),
        Err(error) => {
            tracing::error!("Could not encode dashboard query {query:?}: {error}");
            endpoint_path.to_owned()
        }
    }
}
