//! The fetch, sanitize, categorize and summarize pipeline.

use rust_decimal::Decimal;

use crate::{
    Error,
    ledger::{
        aggregation::{CategorySums, sum_expense, sum_income, total},
        categorize::categorize,
        record::{CARD_DETAILS_FIELD, TransactionRecord, sanitize},
        transaction::parse_records,
    },
    provider::{BankProvider, TransactionQuery},
};

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    /// The sanitized records, for the transactions table.
    pub records: Vec<TransactionRecord>,
    /// Income per transaction type.
    pub income: CategorySums,
    /// Expenses per transaction type, as positive amounts.
    pub expenses: CategorySums,
    /// The sum of [DashboardSummary::income].
    pub total_income: Decimal,
    /// The sum of [DashboardSummary::expenses], as a positive amount.
    pub total_expenses: Decimal,
}

impl DashboardSummary {
    /// Income minus expenses.
    pub fn net(&self) -> Decimal {
        self.total_income - self.total_expenses
    }
}

/// Summarize `records` fetched from the bank.
///
/// The card details are stripped before anything else sees the records.
///
/// # Errors
/// Returns [Error::MalformedRecord] if any record cannot be read as a
/// transaction or has no transaction type.
pub fn summarize(records: Vec<TransactionRecord>) -> Result<DashboardSummary, Error> {
    let records = sanitize(records, CARD_DETAILS_FIELD);

    let transactions = parse_records(&records)?;
    let bucket = categorize(&transactions)?;

    let income = sum_income(&bucket);
    let expenses = sum_expense(&bucket);
    let total_income = total(&income);
    let total_expenses = total(&expenses);

    Ok(DashboardSummary {
        records,
        income,
        expenses,
        total_income,
        total_expenses,
    })
}

/// Fetch the transactions described by `query` and summarize them.
///
/// # Errors
/// Provider errors are returned unchanged, as are the errors from [summarize].
pub async fn build_summary(
    provider: &BankProvider,
    query: &TransactionQuery,
) -> Result<DashboardSummary, Error> {
    let records = provider.fetch_transactions(query).await?;

    tracing::debug!(
        "fetched {} transactions between {} and {}",
        records.len(),
        query.start_date,
        query.end_date
    );

    summarize(records)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        Error,
        ledger::{record::TransactionRecord, summary::summarize},
        provider::{BankProvider, FixtureProvider, TransactionQuery},
    };

    use super::build_summary;

    fn records(value: Value) -> Vec<TransactionRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn scenario() -> Vec<TransactionRecord> {
        records(json!([
            {
                "accountingDate": "2019-06-03T00:00:00",
                "amount": 100,
                "text": "Salary",
                "transactionType": "A"
            },
            {
                "accountingDate": "2019-06-04T00:00:00",
                "amount": -30,
                "text": "Groceries",
                "transactionType": "A",
                "cardDetails": { "cardNumber": "*1234" }
            },
            {
                "accountingDate": "2019-06-05T00:00:00",
                "amount": -20,
                "text": "Bus",
                "transactionType": "B"
            }
        ]))
    }

    #[test]
    fn summarizes_scenario() {
        let summary = summarize(scenario()).unwrap();

        assert_eq!(summary.records.len(), 3);
        assert!(summary.records.iter().all(|r| !r.contains("cardDetails")));
        assert_eq!(summary.income.get("A"), Some(Decimal::from(100)));
        assert_eq!(summary.income.len(), 1);
        assert_eq!(summary.expenses.get("A"), Some(Decimal::from(30)));
        assert_eq!(summary.expenses.get("B"), Some(Decimal::from(20)));
        assert_eq!(summary.total_income, Decimal::from(100));
        assert_eq!(summary.total_expenses, Decimal::from(50));
        assert_eq!(summary.net(), Decimal::from(50));
    }

    #[test]
    fn records_only_need_amount_and_type() {
        let input = records(json!([
            { "transactionType": "A", "amount": 100 },
            { "transactionType": "A", "amount": -30 },
            { "transactionType": "B", "amount": -20, "accountingDate": "03.06.2019" }
        ]));

        let summary = summarize(input).unwrap();

        assert_eq!(summary.income.get("A"), Some(Decimal::from(100)));
        assert_eq!(summary.expenses.get("A"), Some(Decimal::from(30)));
        assert_eq!(summary.expenses.get("B"), Some(Decimal::from(20)));
        assert_eq!(summary.total_expenses, Decimal::from(50));
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        let summary = summarize(Vec::new()).unwrap();

        assert_eq!(summary, Default::default());
    }

    #[test]
    fn malformed_record_fails_whole_summary() {
        let mut input = scenario();
        input[2].remove("transactionType");

        let got = summarize(input);

        assert!(matches!(got, Err(Error::MalformedRecord { index: 2, .. })));
    }

    #[tokio::test]
    async fn builds_summary_from_provider() {
        let provider = BankProvider::Fixture(FixtureProvider::from_records(scenario()));
        let query = TransactionQuery {
            customer_id: "12345678901".to_owned(),
            account_id: "ABC".to_owned(),
            start_date: date!(2019 - 06 - 01),
            end_date: date!(2019 - 06 - 30),
        };

        let summary = build_summary(&provider, &query).await.unwrap();

        assert_eq!(summary.total_expenses, Decimal::from(50));
    }
}
