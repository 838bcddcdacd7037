// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use std::time::Duration;
use tallybook::application::{FinanceService, Settings};
use tallybook::domain::{EntryDraft, LoginProvider, MonthPeriod, TransactionKind};
use tempfile::TempDir;

/// Settings pointing at a database inside `dir`, with an instant sync.
pub fn test_settings(dir: &TempDir) -> Settings {
    let db_path = dir.path().join("test.db");
    Settings::default()
        .with_database(db_path.to_str().unwrap())
        .with_sync_delay(Duration::ZERO)
}

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(FinanceService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = FinanceService::open(test_settings(&temp_dir)).await?;
    Ok((service, temp_dir))
}

/// Open a second service on the same database, as a fresh process would.
pub async fn reopen(temp_dir: &TempDir) -> Result<FinanceService> {
    Ok(FinanceService::open(test_settings(temp_dir)).await?)
}

/// Helper to create a test service signed in as a PRO user
pub async fn pro_service() -> Result<(FinanceService, TempDir)> {
    let (service, temp_dir) = test_service().await?;
    service.login(LoginProvider::Google).await?;
    service.subscribe().await?;
    Ok((service, temp_dir))
}

pub fn draft(kind: TransactionKind, date: &str, category: &str, amount: &str) -> EntryDraft {
    EntryDraft::new(kind, amount)
        .with_date(date)
        .with_category(category)
}

pub fn expense(date: &str, category: &str, amount: &str) -> EntryDraft {
    draft(TransactionKind::Expense, date, category, amount)
}

pub fn income(date: &str, category: &str, amount: &str) -> EntryDraft {
    draft(TransactionKind::Income, date, category, amount)
}

pub fn march_2024() -> MonthPeriod {
    MonthPeriod::new(2, 2024).unwrap()
}

/// Test fixture: the three records used throughout the docs
pub struct MarchFixture;

impl MarchFixture {
    pub async fn create(service: &FinanceService) -> Result<()> {
        service
            .add_transaction(expense("2024-03-01", "Food", "50"))
            .await?;
        service
            .add_transaction(income("2024-03-02", "Salary", "1000"))
            .await?;
        service
            .add_transaction(expense("2024-04-01", "Food", "20"))
            .await?;
        Ok(())
    }
}
