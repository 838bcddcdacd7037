use thiserror::Error;

use crate::domain::{DenialReason, Feature, TransactionId, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Transaction already exists: {0}")]
    DuplicateTransaction(TransactionId),

    #[error("{feature} is not available: {reason}")]
    PermissionDenied {
        feature: Feature,
        reason: DenialReason,
    },

    #[error("You must be signed in to do that")]
    SignInRequired,

    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// True when the caller should be offered an upgrade instead of an error.
    pub fn is_upgrade_prompt(&self) -> bool {
        matches!(
            self,
            AppError::PermissionDenied {
                reason: DenialReason::UpgradeRequired,
                ..
            }
        )
    }
}
