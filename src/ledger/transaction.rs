//! The typed transaction used for categorizing and summing.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, ledger::record::TransactionRecord};

pub const ACCOUNTING_DATE_FIELD: &str = "accountingDate";
pub const AMOUNT_FIELD: &str = "amount";
pub const TEXT_FIELD: &str = "text";
pub const TRANSACTION_TYPE_FIELD: &str = "transactionType";

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// One ledger entry, reduced to what categorizing and summing need.
///
/// A positive amount is income and a negative amount is an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The signed amount.
    pub amount: Decimal,
    /// The category label, `None` if the provider left it out or sent `null`.
    pub transaction_type: Option<String>,
}

impl Transaction {
    /// Create a transaction with a category.
    pub fn new(amount: Decimal, transaction_type: &str) -> Self {
        Self {
            amount,
            transaction_type: Some(transaction_type.to_owned()),
        }
    }

    /// Build a typed transaction from the record at position `index`.
    ///
    /// Only `amount` and `transactionType` are read, the other fields are
    /// left for the transactions table. `transactionType` may be missing
    /// here; the categorizer decides what to do with untyped transactions.
    ///
    /// # Errors
    /// Returns [Error::MalformedRecord] if the amount is missing or not a
    /// number, or if `transactionType` is not a string.
    pub fn from_record(index: usize, record: &TransactionRecord) -> Result<Self, Error> {
        let malformed = |reason: String| Error::MalformedRecord { index, reason };

        let amount = match record.get(AMOUNT_FIELD) {
            Some(value) => parse_amount(value)
                .ok_or_else(|| malformed(format!("{AMOUNT_FIELD} {value} is not a number")))?,
            None => return Err(malformed(format!("missing {AMOUNT_FIELD}"))),
        };

        let transaction_type = match record.get(TRANSACTION_TYPE_FIELD) {
            Some(Value::String(label)) => Some(label.clone()),
            None | Some(Value::Null) => None,
            Some(_) => {
                return Err(malformed(format!(
                    "{TRANSACTION_TYPE_FIELD} is not a string"
                )));
            }
        };

        Ok(Self {
            amount,
            transaction_type,
        })
    }
}

/// Parse every record into a [Transaction], failing on the first bad record.
pub fn parse_records(records: &[TransactionRecord]) -> Result<Vec<Transaction>, Error> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| Transaction::from_record(index, record))
        .collect()
}

/// Read the date part of a provider timestamp such as `2019-06-03T00:00:00`.
pub fn parse_accounting_date(text: &str) -> Option<Date> {
    let date_part = text.split_once('T').map_or(text, |(date, _time)| date);

    Date::parse(date_part, DATE_FORMAT).ok()
}

/// Convert a JSON number to a [Decimal] via its decimal text.
///
/// Going through the text avoids the rounding error of converting the parsed
/// `f64`, so `0.1` becomes exactly `0.1`.
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };

    let text = number.to_string();

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        Error,
        ledger::{
            record::TransactionRecord,
            transaction::{Transaction, parse_accounting_date, parse_amount, parse_records},
        },
    };

    fn record(value: Value) -> TransactionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_provider_record() {
        let record = record(json!({
            "accountingDate": "2019-06-03T00:00:00",
            "interestDate": "2019-06-03T00:00:00",
            "amount": -129.9,
            "text": "Kiwi Majorstuen",
            "transactionType": "Varekjøp",
            "isReservation": false
        }));

        let got = Transaction::from_record(0, &record).unwrap();

        assert_eq!(got, Transaction::new(Decimal::new(-1299, 1), "Varekjøp"));
    }

    #[test]
    fn null_type_is_kept_as_none() {
        let record = record(json!({ "amount": 1, "transactionType": null }));

        let got = Transaction::from_record(0, &record).unwrap();

        assert_eq!(got.transaction_type, None);
    }

    #[test]
    fn missing_amount_is_malformed() {
        let records = vec![
            record(json!({ "amount": 1, "transactionType": "A" })),
            record(json!({ "text": "no amount", "transactionType": "A" })),
        ];

        let got = parse_records(&records);

        assert!(
            matches!(got, Err(Error::MalformedRecord { index: 1, .. })),
            "got {got:?}"
        );
    }

    #[test]
    fn string_amount_is_malformed() {
        let records = vec![record(json!({ "amount": "12", "transactionType": "A" }))];

        let got = parse_records(&records);

        assert!(matches!(got, Err(Error::MalformedRecord { index: 0, .. })));
    }

    #[test]
    fn date_and_text_are_not_required() {
        let records = vec![
            record(json!({ "amount": 1, "transactionType": "A" })),
            record(json!({ "accountingDate": "03.06.2019", "amount": 2, "transactionType": "A" })),
            record(json!({ "amount": 3, "text": 42, "transactionType": "B" })),
        ];

        let got = parse_records(&records).unwrap();

        assert_eq!(
            got,
            vec![
                Transaction::new(Decimal::from(1), "A"),
                Transaction::new(Decimal::from(2), "A"),
                Transaction::new(Decimal::from(3), "B"),
            ]
        );
    }

    #[test]
    fn parses_date_with_and_without_time() {
        assert_eq!(
            parse_accounting_date("2024-02-29T00:00:00"),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(parse_accounting_date("2024-02-29"), Some(date!(2024 - 02 - 29)));
        assert_eq!(parse_accounting_date("2023-02-29"), None);
    }

    #[test]
    fn amounts_are_exact() {
        assert_eq!(parse_amount(&json!(0.1)), Some(Decimal::new(1, 1)));
        assert_eq!(parse_amount(&json!(-30)), Some(Decimal::from(-30)));
        assert_eq!(parse_amount(&json!(1e-5)), Some(Decimal::new(1, 5)));
        assert_eq!(parse_amount(&json!(null)), None);
    }
}
