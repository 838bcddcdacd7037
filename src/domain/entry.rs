use chrono::NaiveDate;
use thiserror::Error;

use super::{parse_cents, Cents, ParseCentsError, Transaction, TransactionKind, MAX_AMOUNT_CENTS};

/// Raw user input for a new transaction, before validation.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub date: Option<String>,
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub amount: String,
    pub note: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Date is required")]
    MissingDate,

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Category is required")]
    MissingCategory,

    #[error("Amount must be a number greater than 0 (got '{0}')")]
    InvalidAmount(String),

    #[error("Amount can have at most two decimal places (got '{0}')")]
    TooManyDecimals(String),

    #[error("Amount cannot exceed 1000000000000.00 (got '{0}')")]
    AmountTooLarge(String),
}

impl EntryDraft {
    pub fn new(kind: TransactionKind, amount: impl Into<String>) -> Self {
        Self {
            date: None,
            kind,
            category: None,
            amount: amount.into(),
            note: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Check the draft and turn it into a new transaction with a fresh id.
    /// Rules are checked in order: date, category, amount. The first failure wins.
    pub fn validate(self) -> Result<Transaction, ValidationError> {
        let date_str = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingDate)?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_str.to_string()))?;

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingCategory)?;

        let amount_cents = validate_amount(&self.amount)?;

        let mut transaction = Transaction::new(date, self.kind, category, amount_cents);
        if let Some(note) = self.note {
            transaction = transaction.with_note(note);
        }
        Ok(transaction)
    }
}

fn validate_amount(input: &str) -> Result<Cents, ValidationError> {
    let raw = || input.trim().to_string();
    match parse_cents(input) {
        Ok(cents) if cents > MAX_AMOUNT_CENTS => Err(ValidationError::AmountTooLarge(raw())),
        Ok(cents) if cents > 0 => Ok(cents),
        Ok(_) | Err(ParseCentsError::InvalidFormat) => Err(ValidationError::InvalidAmount(raw())),
        Err(ParseCentsError::TooManyDecimals) => Err(ValidationError::TooManyDecimals(raw())),
        Err(ParseCentsError::Overflow) => Err(ValidationError::AmountTooLarge(raw())),
    }
}
