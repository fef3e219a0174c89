//! Table views for dashboard data display.
//!
//! Provides the transactions table, with optional sorting and filtering, and
//! the per-category summary tables shown next to the charts.

use std::cmp::Ordering;

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    dashboard::query::{DashboardQuery, SortOrder},
    endpoints::format_endpoint,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    ledger::{
        ACCOUNTING_DATE_FIELD, AMOUNT_FIELD, CategorySums, DashboardSummary, TEXT_FIELD,
        TRANSACTION_TYPE_FIELD, TransactionRecord, parse_amount,
    },
};

/// The columns shown by default, every other column is hidden.
const VISIBLE_COLUMNS: [&str; 4] = [
    ACCOUNTING_DATE_FIELD,
    AMOUNT_FIELD,
    TEXT_FIELD,
    TRANSACTION_TYPE_FIELD,
];

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        TABLE_CELL_RED_STYLE
    } else {
        TABLE_CELL_GREEN_STYLE
    }
}

/// A column of the transactions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Column {
    pub name: String,
    pub hidden: bool,
}

/// The union of the record fields in the order they are first seen.
pub(super) fn table_columns(records: &[TransactionRecord]) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();

    for name in records.iter().flat_map(TransactionRecord::field_names) {
        if columns.iter().any(|column| column.name == name) {
            continue;
        }

        columns.push(Column {
            name: name.to_owned(),
            hidden: !VISIBLE_COLUMNS.contains(&name),
        });
    }

    columns
}

/// The text shown in a table cell.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
    }
}

/// Keep the records where any visible column contains `filter`, ignoring case.
pub(super) fn filter_records<'a>(
    records: Vec<&'a TransactionRecord>,
    columns: &[Column],
    filter: &str,
) -> Vec<&'a TransactionRecord> {
    let filter = filter.to_lowercase();

    records
        .into_iter()
        .filter(|record| {
            columns.iter().filter(|column| !column.hidden).any(|column| {
                cell_text(record.get(&column.name))
                    .to_lowercase()
                    .contains(&filter)
            })
        })
        .collect()
}

/// Sort the records by `column`.
///
/// Numbers compare by value and everything else as text. Records without a
/// value for the column always come last.
pub(super) fn sort_records(records: &mut [&TransactionRecord], column: &str, order: SortOrder) {
    records.sort_by(|a, b| {
        let a = a.get(column).filter(|value| !value.is_null());
        let b = b.get(column).filter(|value| !value.is_null());

        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = compare_values(a, b);

                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            }
        }
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (parse_amount(a), parse_amount(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        // Numbers before text
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => cell_text(Some(a)).cmp(&cell_text(Some(b))),
    }
}

/// Renders the transactions table with the filter and sort from `query` applied.
pub(super) fn transactions_table(
    records: &[TransactionRecord],
    query: &DashboardQuery,
    endpoint: &str,
) -> Markup {
    let columns = table_columns(records);
    let mut rows: Vec<&TransactionRecord> = records.iter().collect();

    if let Some(filter) = query.active_filter() {
        rows = filter_records(rows, &columns, filter);
    }

    let active_sort = query.active_sort();
    if let Some((column, order)) = active_sort {
        sort_records(&mut rows, column, order);
    }

    html! {
        div class="w-full overflow-x-auto rounded-lg shadow" {
            table id="transactions-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        @for column in &columns {
                            th
                                scope="col"
                                class=(with_hidden("px-6 py-3", column.hidden))
                                data-column=(column.name)
                            {
                                @if query.sorting_enabled() {
                                    @let href = format_endpoint(endpoint, &query.sorted_by(&column.name));
                                    a
                                        href=(href)
                                        hx-get=(href)
                                        hx-target="#dashboard-content"
                                        hx-target-error="#alert-container"
                                        hx-push-url="true"
                                        class="hover:underline"
                                    {
                                        (column.name)
                                        (sort_arrow(active_sort, &column.name))
                                    }
                                } @else {
                                    (column.name)
                                }
                            }
                        }
                    }
                }
                tbody {
                    @for record in &rows {
                        tr class=(TABLE_ROW_STYLE) {
                            @for column in &columns {
                                td class=(with_hidden(TABLE_CELL_STYLE, column.hidden)) {
                                    (record_cell(record, &column.name))
                                }
                            }
                        }
                    }

                    @if rows.is_empty() {
                        tr class=(TABLE_ROW_STYLE) {
                            td class=(TABLE_CELL_STYLE) colspan=(columns.len().max(1)) {
                                "No transactions match."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn with_hidden(style: &str, hidden: bool) -> String {
    if hidden {
        format!("{style} hidden")
    } else {
        style.to_owned()
    }
}

fn sort_arrow(active_sort: Option<(&str, SortOrder)>, column: &str) -> &'static str {
    match active_sort {
        Some((sorted, SortOrder::Asc)) if sorted == column => " ▲",
        Some((sorted, SortOrder::Desc)) if sorted == column => " ▼",
        _ => "",
    }
}

fn record_cell(record: &TransactionRecord, column: &str) -> Markup {
    let value = record.get(column);

    if column == AMOUNT_FIELD
        && let Some(amount) = value.and_then(parse_amount)
    {
        return html! {
            span class=(amount_color_class(amount)) { (format_currency(amount)) }
        };
    }

    html! { (cell_text(value)) }
}

/// Renders the amount per transaction type with a total row.
pub(super) fn category_sums_table(title: &str, sums: &CategorySums, total: Decimal) -> Markup {
    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { (title) }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class="px-6 py-3" { "Transaction Type" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        }
                    }
                    tbody {
                        @for (label, amount) in sums.iter() {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                    (label)
                                }
                                td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} {
                                    (format_currency(amount))
                                }
                            }
                        }

                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class={(TABLE_CELL_STYLE) " font-bold text-gray-900 dark:text-white"} {
                                "Total"
                            }
                            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap font-bold"} {
                                (format_currency(total))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the total income, total expenses and the net amount.
pub(super) fn totals_table(summary: &DashboardSummary) -> Markup {
    let net = summary.net();

    html! {
        div id="totals" class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Totals" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Income" }
                            td class={(TABLE_CELL_STYLE) " text-right " (TABLE_CELL_GREEN_STYLE)} {
                                (format_currency(summary.total_income))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Expenses" }
                            td class={(TABLE_CELL_STYLE) " text-right " (TABLE_CELL_RED_STYLE)} {
                                (format_currency(summary.total_expenses))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class={(TABLE_CELL_STYLE) " font-bold"} { "Net" }
                            td class={(TABLE_CELL_STYLE) " text-right font-bold " (amount_color_class(net))} {
                                (format_currency(net))
                            }
                        }
                    }
                }
            }
        }
    }
}
