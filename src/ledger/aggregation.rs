//! Per-category income and expense sums.
//!
//! Income and expenses are summed independently from the same
//! [CategoryBucket]; a transaction contributes to at most one of them, and a
//! zero amount contributes to neither.

use rust_decimal::Decimal;

use crate::ledger::{categorize::CategoryBucket, transaction::Transaction};

/// Sums keyed by category, in the order of the bucket they came from.
///
/// Expense sums are stored as positive magnitudes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySums(Vec<(String, Decimal)>);

impl CategorySums {
    /// The sum for `label`, if the category has one.
    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(category, _)| category == label)
            .map(|(_, sum)| *sum)
    }

    /// Iterate over the categories and their sums.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(label, sum)| (label.as_str(), *sum))
    }

    /// The number of categories with a sum.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category has a sum.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for CategorySums {
    fn from_iter<T: IntoIterator<Item = (String, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Sum the positive amounts in each category.
///
/// Categories without any income are left out rather than given a zero sum.
pub fn sum_income(bucket: &CategoryBucket) -> CategorySums {
    sum_by_category(bucket, |amount| amount > Decimal::ZERO)
}

/// Sum the magnitudes of the negative amounts in each category.
///
/// Categories without any expenses are left out rather than given a zero sum.
pub fn sum_expense(bucket: &CategoryBucket) -> CategorySums {
    sum_by_category(bucket, |amount| amount < Decimal::ZERO)
}

/// The sum of every category in `sums`, zero if there are none.
pub fn total(sums: &CategorySums) -> Decimal {
    sums.iter().map(|(_, sum)| sum).sum()
}

fn sum_by_category(bucket: &CategoryBucket, include: impl Fn(Decimal) -> bool) -> CategorySums {
    bucket
        .iter()
        .filter_map(|(label, transactions)| {
            sum_matching(transactions, &include).map(|sum| (label.to_owned(), sum))
        })
        .collect()
}

/// Sum the absolute amounts of the matching transactions, `None` if nothing matched.
fn sum_matching(
    transactions: &[Transaction],
    include: &impl Fn(Decimal) -> bool,
) -> Option<Decimal> {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .filter(|&amount| include(amount))
        .map(|amount| amount.abs())
        .reduce(|sum, amount| sum + amount)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::ledger::{
        aggregation::{CategorySums, sum_expense, sum_income, total},
        categorize::categorize,
        transaction::Transaction,
    };

    fn create_test_transaction(amount: Decimal, transaction_type: &str) -> Transaction {
        Transaction::new(amount, transaction_type)
    }

    fn whole(amount: i64, transaction_type: &str) -> Transaction {
        create_test_transaction(Decimal::from(amount), transaction_type)
    }

    #[test]
    fn sums_scenario() {
        let transactions = vec![whole(100, "A"), whole(-30, "A"), whole(-20, "B")];
        let bucket = categorize(&transactions).unwrap();

        let income = sum_income(&bucket);
        let expenses = sum_expense(&bucket);

        assert_eq!(income, CategorySums(vec![("A".to_owned(), Decimal::from(100))]));
        assert_eq!(
            expenses,
            CategorySums(vec![
                ("A".to_owned(), Decimal::from(30)),
                ("B".to_owned(), Decimal::from(20)),
            ])
        );
        assert_eq!(total(&expenses), Decimal::from(50));
    }

    #[test]
    fn sums_every_transaction_in_a_category() {
        let transactions = vec![
            whole(100, "Lønn"),
            whole(250, "Lønn"),
            whole(-40, "Varekjøp"),
            whole(-60, "Varekjøp"),
            whole(-1, "Varekjøp"),
        ];
        let bucket = categorize(&transactions).unwrap();

        assert_eq!(sum_income(&bucket).get("Lønn"), Some(Decimal::from(350)));
        assert_eq!(sum_expense(&bucket).get("Varekjøp"), Some(Decimal::from(101)));
    }

    #[test]
    fn omits_categories_without_matching_sign() {
        let transactions = vec![whole(10, "Income only"), whole(-10, "Expense only")];
        let bucket = categorize(&transactions).unwrap();

        let income = sum_income(&bucket);
        let expenses = sum_expense(&bucket);

        assert_eq!(income.get("Expense only"), None);
        assert_eq!(expenses.get("Income only"), None);
        assert_eq!(income.len(), 1);
        assert_eq!(expenses.len(), 1);
    }

    #[test]
    fn zero_amounts_count_towards_neither() {
        let transactions = vec![whole(0, "Fee"), whole(0, "Fee")];
        let bucket = categorize(&transactions).unwrap();

        assert!(sum_income(&bucket).is_empty());
        assert!(sum_expense(&bucket).is_empty());
    }

    #[test]
    fn sums_are_positive() {
        let transactions: Vec<_> = (-20..20)
            .map(|i| whole(i * 7 - 3, ["A", "B", "C", "D"][(i.rem_euclid(4)) as usize]))
            .collect();
        let bucket = categorize(&transactions).unwrap();

        for (_, sum) in sum_income(&bucket).iter() {
            assert!(sum > Decimal::ZERO);
        }
        for (_, sum) in sum_expense(&bucket).iter() {
            assert!(sum > Decimal::ZERO);
        }
    }

    #[test]
    fn total_income_is_sum_of_positive_amounts() {
        let transactions: Vec<_> = (-20..20)
            .map(|i| whole(i * 13 + 5, ["A", "B", "C"][(i.rem_euclid(3)) as usize]))
            .collect();
        let want: Decimal = transactions
            .iter()
            .map(|t| t.amount)
            .filter(|amount| *amount > Decimal::ZERO)
            .sum();
        let want_expenses: Decimal = transactions
            .iter()
            .map(|t| t.amount)
            .filter(|amount| *amount < Decimal::ZERO)
            .map(|amount| amount.abs())
            .sum();

        let bucket = categorize(&transactions).unwrap();

        assert_eq!(total(&sum_income(&bucket)), want);
        assert_eq!(total(&sum_expense(&bucket)), want_expenses);
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let transactions = vec![
            create_test_transaction(Decimal::new(1, 1), "A"),
            create_test_transaction(Decimal::new(2, 1), "A"),
        ];
        let bucket = categorize(&transactions).unwrap();

        assert_eq!(sum_income(&bucket).get("A"), Some(Decimal::new(3, 1)));
    }

    #[test]
    fn empty_bucket_gives_empty_sums() {
        let bucket = categorize(&[]).unwrap();

        assert!(sum_income(&bucket).is_empty());
        assert!(sum_expense(&bucket).is_empty());
        assert_eq!(total(&sum_income(&bucket)), Decimal::ZERO);
    }

    #[test]
    fn sums_are_idempotent() {
        let transactions = vec![whole(10, "A"), whole(-4, "B"), whole(-6, "A")];

        let first = categorize(&transactions).unwrap();
        let second = categorize(&transactions).unwrap();

        assert_eq!(sum_income(&first), sum_income(&second));
        assert_eq!(sum_expense(&first), sum_expense(&second));
    }
}
