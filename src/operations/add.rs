use crate::db::repository::TransactionRepository;
use crate::error::{AppError, FormError};
use crate::models::transaction::{Transaction, TransactionType};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TransactionInput {
    pub amount: String,
    pub transaction_type: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub date: Option<String>,
}

pub fn add_transaction_to_store(
    repo: &impl TransactionRepository,
    input: &TransactionInput,
    now: DateTime<Utc>,
) -> Result<Transaction, AppError> {
    let transaction = create_transaction(input, now)?;
    repo.append(transaction.clone())?;
    log::info!(
        "recorded {} {} in {}",
        transaction.transaction_type,
        transaction.amount,
        transaction.category
    );
    Ok(transaction)
}

/// Validates the form and builds a new transaction. `now` is the default date.
pub fn create_transaction(
    input: &TransactionInput,
    now: DateTime<Utc>,
) -> Result<Transaction, FormError> {
    let amount = parse_amount(&input.amount)?;

    let transaction_type = match input.transaction_type.as_deref() {
        None => TransactionType::Expense,
        Some(raw) => parse_type(raw)?,
    };

    let category = resolve_category(&input.category, transaction_type)?;

    let date = match input.date.as_deref().map(str::trim) {
        None | Some("") => now,
        Some(raw) => parse_date(raw)?,
    };

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Ok(Transaction::new(
        Uuid::new_v4().to_string(),
        amount,
        category,
        description,
        date,
        transaction_type,
    ))
}

/// Parses the interactive one-line format:
/// `amount, type, category[, description[, date]]`.
///
/// The description may contain commas. A trailing field is only taken as the
/// date when it parses as one.
pub fn parse_details(details: &str) -> Result<TransactionInput, FormError> {
    let parts: Vec<&str> = details.splitn(4, ',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(FormError::WrongFieldCount(parts.len()));
    }

    let (description, date) = match parts.get(3) {
        None => (None, None),
        Some(rest) => match rest.rsplit_once(',') {
            Some((description, date)) if parse_date(date.trim()).is_ok() => {
                (Some(description.trim()), Some(date.trim()))
            }
            _ => (Some(*rest), None),
        },
    };

    Ok(TransactionInput {
        amount: parts[0].to_string(),
        transaction_type: Some(parts[1].to_string()),
        category: parts[2].to_string(),
        description: description.map(str::to_string),
        date: date.map(str::to_string),
    })
}

// Decimal syntax rejects "NaN" and "inf", which f64 parsing would accept.
fn parse_amount(raw: &str) -> Result<f64, FormError> {
    let raw = raw.trim();
    let invalid = || FormError::InvalidAmount(raw.to_string());

    let amount = raw
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| invalid())?;
    if amount <= Decimal::ZERO {
        return Err(invalid());
    }
    amount.to_f64().ok_or_else(invalid)
}

pub fn parse_type(raw: &str) -> Result<TransactionType, FormError> {
    match raw.trim().to_lowercase().as_str() {
        "income" => Ok(TransactionType::Income),
        "expense" => Ok(TransactionType::Expense),
        _ => Err(FormError::InvalidType(raw.to_string())),
    }
}

fn resolve_category(raw: &str, transaction_type: TransactionType) -> Result<String, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::CategoryRequired);
    }

    let allowed = transaction_type.categories();
    allowed
        .iter()
        .find(|c| c.eq_ignore_ascii_case(raw))
        .map(|c| c.to_string())
        .ok_or_else(|| FormError::UnknownCategory {
            category: raw.to_string(),
            kind: transaction_type.to_string(),
            allowed: allowed.join(", "),
        })
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, FormError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|d| d.and_utc())
            .ok_or_else(|| FormError::InvalidDate(raw.to_string()));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| FormError::InvalidDate(raw.to_string()))
}
