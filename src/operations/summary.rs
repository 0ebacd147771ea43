use crate::models::template::{DashboardTemplate, Panel};
use crate::models::transaction::Transaction;
use crate::operations::aggregate::{self, CategoryTotal, YearScope};
use chrono::{DateTime, Utc};
use std::fmt;

pub const RECENT_ACTIVITY_LIMIT: usize = 5;

pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn signed_amount(transaction: &Transaction) -> String {
    let sign = if transaction.is_income() { '+' } else { '-' };
    format!("{}{}", sign, format_money(transaction.amount))
}

/// The first `limit` transactions, in the order they were appended.
pub fn recent_activity(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    transactions.iter().take(limit).collect()
}

/// Whole-number share of each category in the total, as shown on the pie.
pub fn category_shares(breakdown: &[CategoryTotal]) -> Vec<(String, f64, u32)> {
    let total: f64 = breakdown.iter().map(|c| c.value).sum();
    breakdown
        .iter()
        .map(|c| {
            let percent = if total > 0.0 {
                (c.value / total * 100.0).round() as u32
            } else {
                0
            };
            (c.name.clone(), c.value, percent)
        })
        .collect()
}

pub fn transaction_line(transaction: &Transaction) -> String {
    let description = if transaction.description.is_empty() {
        "No description"
    } else {
        transaction.description.as_str()
    };
    format!(
        "{}  {:<15} {:<24} {:>12}",
        transaction.date.format("%Y-%m-%d"),
        transaction.category,
        description,
        signed_amount(transaction)
    )
}

/// Plain-text dashboard for the panels `template` selects.
pub fn render_summary(
    template: DashboardTemplate,
    transactions: &[Transaction],
    reference: DateTime<Utc>,
    scope: YearScope,
) -> String {
    SummaryView {
        template,
        transactions,
        reference,
        scope,
    }
    .to_string()
}

struct SummaryView<'a> {
    template: DashboardTemplate,
    transactions: &'a [Transaction],
    reference: DateTime<Utc>,
    scope: YearScope,
}

impl SummaryView<'_> {
    fn write_panel(&self, f: &mut fmt::Formatter<'_>, panel: Panel) -> fmt::Result {
        let transactions = self.transactions;
        match panel {
            Panel::SummaryCards => {
                let totals = aggregate::totals(transactions);
                writeln!(f, "Balance   {:>14}", format_money(totals.balance))?;
                writeln!(f, "Income    {:>14}", format_money(totals.income))?;
                writeln!(f, "Expenses  {:>14}", format_money(totals.expense))?;
            }
            Panel::CategoryBreakdown => {
                writeln!(f, "\nExpense by Category")?;
                let breakdown = aggregate::category_breakdown(transactions);
                if breakdown.is_empty() {
                    writeln!(f, "  No expense data available")?;
                }
                for (name, value, percent) in category_shares(&breakdown) {
                    writeln!(f, "  {:<15} {:>12} {:>4}%", name, format_money(value), percent)?;
                }
            }
            Panel::MonthlyTrend => {
                writeln!(f, "\nMonthly Trend ({})", self.reference.format("%Y"))?;
                writeln!(
                    f,
                    "  {:<5} {:>12} {:>12} {:>12}",
                    "Month", "Income", "Expenses", "Balance"
                )?;
                let series =
                    aggregate::monthly_series_scoped(transactions, self.reference, self.scope);
                for point in series {
                    writeln!(
                        f,
                        "  {:<5} {:>12} {:>12} {:>12}",
                        point.month,
                        format_money(point.income),
                        format_money(point.expense),
                        format_money(point.balance)
                    )?;
                }
            }
            Panel::RecentActivity => {
                writeln!(f, "\nRecent Activity")?;
                if transactions.is_empty() {
                    writeln!(f, "  No transactions yet")?;
                }
                for transaction in recent_activity(transactions, RECENT_ACTIVITY_LIMIT) {
                    writeln!(f, "  {}", transaction_line(transaction))?;
                }
            }
            Panel::AllTransactions => {
                writeln!(f, "\nAll Transactions")?;
                if transactions.is_empty() {
                    writeln!(f, "  No transactions yet")?;
                }
                for transaction in transactions {
                    writeln!(f, "  {}", transaction_line(transaction))?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for panel in self.template.panels() {
            self.write_panel(f, *panel)?;
        }
        Ok(())
    }
}
