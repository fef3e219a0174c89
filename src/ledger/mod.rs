//! Transaction records and the pipeline that turns them into per-category sums.

mod aggregation;
mod categorize;
mod record;
mod summary;
mod transaction;

pub use aggregation::{CategorySums, sum_expense, sum_income, total};
pub use categorize::{CategoryBucket, categorize};
pub use record::{CARD_DETAILS_FIELD, TransactionRecord, sanitize};
pub use summary::{DashboardSummary, build_summary, summarize};
pub use transaction::{
    ACCOUNTING_DATE_FIELD, AMOUNT_FIELD, TEXT_FIELD, TRANSACTION_TYPE_FIELD, Transaction,
    parse_accounting_date, parse_amount,
};
