//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the overview and transactions tabs
//! - HTML view functions for rendering the dashboard UI
//! - State used by the handlers

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{
        charts::{
            DashboardChart, charts_inline_script, charts_script, charts_view, expenses_chart,
            income_chart,
        },
        query::DashboardQuery,
        tables::{category_sums_table, totals_table, transactions_table},
    },
    dates::{DateRange, MIN_DATE, format_iso_date, get_local_offset, today},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    ledger::{DashboardSummary, build_summary},
    navigation::NavBar,
    provider::{BankProvider, TransactionQuery},
};

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Where the transactions come from.
    pub provider: Arc<BankProvider>,
    /// The customer whose transactions are shown.
    pub customer_id: String,
    /// The account to show transactions for.
    pub account_id: String,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Oslo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            provider: state.provider.clone(),
            customer_id: state.customer_id.clone(),
            account_id: state.account_id.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashboardTab {
    Overview,
    Transactions,
}

impl DashboardTab {
    fn endpoint(self) -> &'static str {
        match self {
            DashboardTab::Overview => endpoints::DASHBOARD_VIEW,
            DashboardTab::Transactions => endpoints::TRANSACTIONS_VIEW,
        }
    }
}

/// Holds all the data needed to render a dashboard tab.
struct DashboardData {
    range: DateRange,
    today: Date,
    summary: DashboardSummary,
}

/// The rendered tab content with the charts that still need initializing.
struct DashboardContent {
    markup: Markup,
    charts: Vec<DashboardChart>,
}

/// Display the income and expense overview for the selected date range.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    render_tab(DashboardTab::Overview, &state, is_htmx, &query).await
}

/// Display the transactions table for the selected date range.
pub async fn get_transactions_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    render_tab(DashboardTab::Transactions, &state, is_htmx, &query).await
}

/// Render the full page, or only the tab content for HTMX requests.
///
/// HTMX requests get errors as an alert so the current content stays in place.
async fn render_tab(
    tab: DashboardTab,
    state: &DashboardState,
    is_htmx: bool,
    query: &DashboardQuery,
) -> Response {
    let data = match build_dashboard_data(state, query).await {
        Ok(data) => data,
        Err(error) if is_htmx => return error.into_alert_response(),
        Err(error) => return error.into_response(),
    };

    let content = dashboard_content(tab, query, &data);

    if is_htmx {
        dashboard_content_partial(content).into_response()
    } else {
        dashboard_view(content).into_response()
    }
}

/// Resolves the date range and runs the transaction pipeline for it.
///
/// # Errors
/// Returns error if the timezone or date range is invalid, or if the
/// transactions cannot be fetched or summarized.
async fn build_dashboard_data(
    state: &DashboardState,
    query: &DashboardQuery,
) -> Result<DashboardData, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let today = today(local_offset);
    let range = DateRange::from_picker(query.start_date, query.end_date, today)?;

    let transaction_query = TransactionQuery {
        customer_id: state.customer_id.clone(),
        account_id: state.account_id.clone(),
        start_date: range.start,
        end_date: range.end,
    };

    let summary = build_summary(&state.provider, &transaction_query)
        .await
        .inspect_err(|error| {
            tracing::error!(
                "Could not summarize transactions from {} to {}: {error}",
                range.start,
                range.end
            )
        })?;

    Ok(DashboardData {
        range,
        today,
        summary,
    })
}

/// Renders the dashboard page around the tab content.
fn dashboard_view(content: DashboardContent) -> Markup {
    let page = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-3xl font-bold tracking-tight" { "Sbanken Dashboard" }

            div id="dashboard-content" class="w-full"
            {
                (content.markup)
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&content.charts),
    ];

    base("Dashboard", &scripts, &page)
}

/// Renders the updated tab content for HTMX requests.
///
/// The chart script is included inline since the head is not swapped.
fn dashboard_content_partial(content: DashboardContent) -> Markup {
    html!(
        (content.markup)

        @if !content.charts.is_empty() {
            (charts_inline_script(&content.charts))
        }
    )
}

fn dashboard_content(
    tab: DashboardTab,
    query: &DashboardQuery,
    data: &DashboardData,
) -> DashboardContent {
    let nav_bar = NavBar::new(tab.endpoint()).into_html(&query.normalized());
    let options_form = options_form(tab, query, data);

    let (results, charts) = match tab {
        DashboardTab::Overview => overview_tab(&data.summary),
        DashboardTab::Transactions => (
            transactions_table(&data.summary.records, query, tab.endpoint()),
            Vec::new(),
        ),
    };

    let markup = html!(
        (nav_bar)

        (options_form)

        @if data.summary.records.is_empty() {
            p id="no-transactions" class="mb-4 text-gray-600 dark:text-gray-400"
            {
                "No transactions between " (format_iso_date(data.range.start))
                " and " (format_iso_date(data.range.end)) "."
            }
        }

        (results)
    );

    DashboardContent { markup, charts }
}

fn overview_tab(summary: &DashboardSummary) -> (Markup, Vec<DashboardChart>) {
    let charts = vec![
        DashboardChart {
            id: "income-chart",
            options: income_chart(&summary.income).to_string(),
        },
        DashboardChart {
            id: "expenses-chart",
            options: expenses_chart(&summary.expenses).to_string(),
        },
    ];

    let markup = html!(
        (charts_view(&charts))

        div class="grid grid-cols-1 xl:grid-cols-2 gap-4 mb-4"
        {
            (category_sums_table("Income", &summary.income, summary.total_income))
            (category_sums_table("Expenses", &summary.expenses, summary.total_expenses))
        }

        (totals_table(summary))
    );

    (markup, charts)
}

/// Renders the date range picker, and on the transactions tab the table switches.
///
/// Options that the tab does not show are kept as hidden inputs so that
/// switching tabs does not lose them.
fn options_form(tab: DashboardTab, query: &DashboardQuery, data: &DashboardData) -> Markup {
    let normalized = query.normalized();
    let min_date = format_iso_date(MIN_DATE);
    let max_date = format_iso_date(data.today);

    html!(
        form
            id="dashboard-options"
            hx-get=(tab.endpoint())
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-trigger="change"
            hx-push-url="true"
            hx-indicator="#indicator"
            class="w-full flex flex-wrap items-end gap-4 my-4 p-4 rounded-lg bg-white dark:bg-gray-800 shadow"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }
                input
                    type="date"
                    id="start_date"
                    name="start_date"
                    value=(format_iso_date(data.range.start))
                    min=(min_date)
                    max=(max_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "End date" }
                input
                    type="date"
                    id="end_date"
                    name="end_date"
                    value=(format_iso_date(data.range.end))
                    min=(min_date)
                    max=(max_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(sort) = &normalized.sort {
                input type="hidden" name="sort" value=(sort);
            }
            @if let Some(order) = normalized.order {
                input type="hidden" name="order" value=(order.as_query_value());
            }

            @match tab {
                DashboardTab::Transactions => {
                    input type="hidden" name="from_form" value="true";

                    label class="inline-flex items-center gap-2 cursor-pointer"
                    {
                        input
                            type="checkbox"
                            name="sorting"
                            value="true"
                            checked[query.sorting_enabled()];
                        span class="text-sm font-medium" { "Enable Sorting" }
                    }

                    label class="inline-flex items-center gap-2 cursor-pointer"
                    {
                        input
                            type="checkbox"
                            name="filtering"
                            value="true"
                            checked[query.filtering_enabled()];
                        span class="text-sm font-medium" { "Enable Filtering" }
                    }

                    div class="grow"
                    {
                        label for="filter" class=(FORM_LABEL_STYLE) { "Filter" }
                        input
                            type="search"
                            id="filter"
                            name="filter"
                            placeholder="Filter transactions"
                            value=[query.filter.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }
                DashboardTab::Overview => {
                    @if let Some(filter) = &normalized.filter {
                        input type="hidden" name="filter" value=(filter);
                    }
                    input type="hidden" name="sorting" value=(query.sorting_enabled().to_string());
                    input type="hidden" name="filtering" value=(query.filtering_enabled().to_string());
                }
            }

            span id="indicator" class="htmx-indicator" { (loading_spinner()) }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use axum_htmx::HxRequest;
    use scraper::{Html, Selector};
    use serde_json::json;
    use time::{Duration, OffsetDateTime};

    use crate::{
        dashboard::{handlers::DashboardState, query::DashboardQuery},
        dates::format_iso_date,
        ledger::TransactionRecord,
        provider::{BankProvider, FIXTURE_ACCOUNT_ID, FixtureProvider},
        test_utils::{assert_valid_html, parse_html_document, parse_html_fragment},
    };

    use super::{get_dashboard_page, get_transactions_page};

    fn get_test_state() -> DashboardState {
        let today = OffsetDateTime::now_utc().date();
        let days_ago = |days: i64| format!("{}T00:00:00", today - Duration::days(days));

        let records: Vec<TransactionRecord> = serde_json::from_value(json!([
            {
                "accountingDate": days_ago(1),
                "amount": 100,
                "text": "Lønn",
                "transactionType": "A",
                "cardDetails": { "cardNumber": "*1234" }
            },
            {
                "accountingDate": days_ago(2),
                "amount": -30,
                "text": "KIWI",
                "transactionType": "A"
            },
            {
                "accountingDate": days_ago(3),
                "amount": -20,
                "text": "Vinmonopolet",
                "transactionType": "B"
            }
        ]))
        .unwrap();

        DashboardState {
            provider: Arc::new(BankProvider::Fixture(FixtureProvider::from_records(
                records,
            ))),
            customer_id: "12345678901".to_owned(),
            account_id: FIXTURE_ACCOUNT_ID.to_owned(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{chart_id}")).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Could not find chart with id {chart_id}"
        );
    }

    fn element_text(html: &Html, selector: &str) -> String {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector:?}"))
            .text()
            .collect()
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let response = get_dashboard_page(
            State(get_test_state()),
            HxRequest(false),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert!(element_text(&html, "h1").contains("Sbanken Dashboard"));
        assert_chart_exists(&html, "income-chart");
        assert_chart_exists(&html, "expenses-chart");

        let totals = element_text(&html, "#totals");
        assert!(totals.contains("kr 100.00"), "got {totals}");
        assert!(totals.contains("kr 50.00"), "got {totals}");
    }

    #[tokio::test]
    async fn date_picker_defaults_to_last_year() {
        let today = OffsetDateTime::now_utc().date();

        let response = get_dashboard_page(
            State(get_test_state()),
            HxRequest(false),
            Query(DashboardQuery::default()),
        )
        .await;

        let html = parse_html_document(response).await;
        let start = html
            .select(&Selector::parse("input[name=start_date]").unwrap())
            .next()
            .expect("No start date input");
        assert_eq!(
            start.value().attr("value"),
            Some(format_iso_date(today - Duration::days(365)).as_str())
        );
        assert_eq!(start.value().attr("min"), Some("2012-01-01"));
        assert_eq!(
            start.value().attr("max"),
            Some(format_iso_date(today).as_str())
        );
    }

    #[tokio::test]
    async fn transactions_page_shows_sanitized_table() {
        let response = get_transactions_page(
            State(get_test_state()),
            HxRequest(false),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let rows = html
            .select(&Selector::parse("#transactions-table tbody tr").unwrap())
            .count();
        assert_eq!(rows, 3);

        let headers: Vec<_> = html
            .select(&Selector::parse("#transactions-table th").unwrap())
            .filter_map(|header| header.value().attr("data-column"))
            .collect();
        assert!(!headers.contains(&"cardDetails"), "got {headers:?}");

        let sorting = html
            .select(&Selector::parse("input[name=sorting]").unwrap())
            .next()
            .expect("No sorting switch");
        assert!(sorting.value().attr("checked").is_some());
        let filtering = html
            .select(&Selector::parse("input[name=filtering]").unwrap())
            .next()
            .expect("No filtering switch");
        assert!(filtering.value().attr("checked").is_none());
    }

    #[tokio::test]
    async fn htmx_request_gets_fragment() {
        let response = get_transactions_page(
            State(get_test_state()),
            HxRequest(true),
            Query(DashboardQuery {
                filter: Some("kiwi".to_owned()),
                filtering: Some(true),
                from_form: true,
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;

        assert_eq!(html.select(&Selector::parse("h1").unwrap()).count(), 0);
        let rows = html
            .select(&Selector::parse("#transactions-table tbody tr").unwrap())
            .count();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn start_after_end_gives_alert() {
        let today = OffsetDateTime::now_utc().date();

        let response = get_dashboard_page(
            State(get_test_state()),
            HxRequest(true),
            Query(DashboardQuery {
                start_date: Some(today - Duration::days(1)),
                end_date: Some(today - Duration::days(10)),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let alert = element_text(&html, "[role=alert]");
        assert!(alert.contains("Invalid date range"), "got {alert}");
    }

    #[tokio::test]
    async fn invalid_timezone_gives_error_page() {
        let state = DashboardState {
            local_timezone: "Not/AZone".to_owned(),
            ..get_test_state()
        };

        let response =
            get_dashboard_page(State(state), HxRequest(false), Query(DashboardQuery::default()))
                .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn malformed_transaction_gives_error_page() {
        let today = OffsetDateTime::now_utc().date();
        let records: Vec<TransactionRecord> = serde_json::from_value(json!([
            { "accountingDate": format!("{today}T00:00:00"), "amount": 1, "text": "?" }
        ]))
        .unwrap();
        let state = DashboardState {
            provider: Arc::new(BankProvider::Fixture(FixtureProvider::from_records(
                records,
            ))),
            ..get_test_state()
        };

        let response =
            get_dashboard_page(State(state), HxRequest(false), Query(DashboardQuery::default()))
                .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn empty_range_shows_message() {
        let response = get_dashboard_page(
            State(get_test_state()),
            HxRequest(false),
            Query(DashboardQuery {
                start_date: Some(time::macros::date!(2012 - 01 - 01)),
                end_date: Some(time::macros::date!(2012 - 01 - 31)),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert!(element_text(&html, "#no-transactions").contains("No transactions"));
    }
}
