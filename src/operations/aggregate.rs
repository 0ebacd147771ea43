//! Derived dashboard metrics over a transaction snapshot.
//!
//! Every function here is pure: it reads the slice it is given and builds a
//! fresh result. Amounts are plain `f64`; a `NaN` amount in the input shows up
//! as `NaN` in the sums rather than being rejected, so validation stays with
//! whoever creates transactions.

use crate::models::transaction::{Transaction, TransactionType};
use chrono::{DateTime, Datelike, Utc};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Whether monthly buckets also match on the reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearScope {
    /// Bucket by month-of-year only; the same month of different years merges.
    #[default]
    AnyYear,
    ReferenceYear,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    totals_of(transactions.iter())
}

fn totals_of<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Totals {
    let mut income = 0.0;
    let mut expense = 0.0;
    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expense += transaction.amount,
        }
    }
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Expense totals per category, in the order each category first appears.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut breakdown: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        match breakdown.iter_mut().find(|c| c.name == transaction.category) {
            Some(entry) => entry.value += transaction.amount,
            None => breakdown.push(CategoryTotal {
                name: transaction.category.clone(),
                value: transaction.amount,
            }),
        }
    }
    breakdown
}

/// Year-to-date series: one point per month from January through the month
/// of `reference`, month-of-year bucketing.
pub fn monthly_series(
    transactions: &[Transaction],
    reference: DateTime<Utc>,
) -> Vec<MonthlyPoint> {
    monthly_series_scoped(transactions, reference, YearScope::AnyYear)
}

pub fn monthly_series_scoped(
    transactions: &[Transaction],
    reference: DateTime<Utc>,
    scope: YearScope,
) -> Vec<MonthlyPoint> {
    let year = reference.year();
    (1..=reference.month())
        .map(|month| {
            let bucket = transactions.iter().filter(|t| {
                t.date.month() == month
                    && (scope == YearScope::AnyYear || t.date.year() == year)
            });
            let Totals {
                income,
                expense,
                balance,
            } = totals_of(bucket);
            MonthlyPoint {
                month: MONTH_LABELS[month as usize - 1].to_string(),
                income,
                expense,
                balance,
            }
        })
        .collect()
}
