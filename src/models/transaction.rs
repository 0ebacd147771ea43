use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Food",
    "Transportation",
    "Housing",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Education",
    "Travel",
    "Other",
];

pub const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Freelance", "Investments", "Gifts", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Categories a transaction of this type may be filed under.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense event. Never mutated once appended to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    pub fn new(
        id: String,
        amount: f64,
        category: String,
        description: String,
        date: DateTime<Utc>,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            id,
            amount,
            category,
            description,
            date,
            transaction_type,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

// Stored amounts are not trusted: numbers pass through, numeric strings are
// parsed, anything else becomes NaN and propagates through the sums.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    if amount.is_nan() {
        log::warn!("stored transaction amount is not numeric; treating it as NaN");
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_browser_shape() {
        let json = r#"{"id":"1718000000000","amount":50,"category":"Food","description":"","date":"2025-01-10T09:30:00.000Z","type":"expense"}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.id, "1718000000000");
        assert_eq!(transaction.amount, 50.0);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(
            transaction.date,
            Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let json = r#"{"id":"a","amount":10,"category":"Salary","date":"2025-03-01T00:00:00Z","type":"income"}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.description, "");
        assert!(transaction.is_income());
    }

    #[test]
    fn test_non_numeric_amount_becomes_nan() {
        let json = r#"{"id":"a","amount":"abc","category":"Food","date":"2025-03-01T00:00:00Z","type":"expense"}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert!(transaction.amount.is_nan());
    }

    #[test]
    fn test_numeric_string_amount_is_parsed() {
        let json = r#"{"id":"a","amount":"12.5","category":"Food","date":"2025-03-01T00:00:00Z","type":"expense"}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.amount, 12.5);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"id":"a","amount":1,"category":"Food","date":"2025-03-01T00:00:00Z","type":"transfer"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_serializes_type_field_lowercase() {
        let transaction = Transaction::new(
            "x".to_string(),
            3.5,
            "Gifts".to_string(),
            String::new(),
            Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            TransactionType::Income,
        );
        let json = serde_json::to_string(&transaction).unwrap();
        assert!(json.contains(r#""type":"income""#));
        assert!(!json.contains("transaction_type"));
    }

    #[test]
    fn test_category_lists_per_type() {
        assert!(TransactionType::Expense.categories().contains(&"Food"));
        assert!(!TransactionType::Income.categories().contains(&"Food"));
        assert!(TransactionType::Income.categories().contains(&"Other"));
    }
}
