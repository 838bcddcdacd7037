use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    category_breakdown, check_access, filter_by_month, summarize, Access, CategoryShare,
    EntryDraft, Feature, LoginProvider, MonthPeriod, Summary, Transaction, TransactionId, User,
};
use crate::io::{export_filename, render_csv, CsvExport, NoteQuoting};
use crate::storage::Repository;

use super::{AppError, Settings, TransactionStore};

/// Application service providing high-level operations for the tracker.
/// This is the primary interface for any client (CLI, TUI, etc.).
pub struct FinanceService {
    repo: Repository,
    store: TransactionStore,
    session: RwLock<Option<User>>,
    settings: Settings,
    /// Serialises snapshot-and-save so an older snapshot never overwrites a newer one.
    persist_lock: Mutex<()>,
}

/// Everything shown for one month.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub period: MonthPeriod,
    /// Transactions in the month, most recent first
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
    pub breakdown: Vec<CategoryShare>,
}

/// Outcome of a simulated cloud sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub synced: usize,
    pub completed_at: DateTime<Utc>,
}

impl FinanceService {
    /// Open the database named in `settings` and load the saved state.
    pub async fn open(settings: Settings) -> Result<Self, AppError> {
        let repo = Repository::open(&settings.database).await?;
        Ok(Self::with_repository(repo, settings).await)
    }

    /// Build the service on top of an existing repository.
    /// Unreadable saved data is replaced by an empty state.
    pub async fn with_repository(repo: Repository, settings: Settings) -> Self {
        let records = repo.load_transactions().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load saved transactions, starting empty");
            Vec::new()
        });
        let user = repo.load_user().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load saved session, signing out");
            None
        });
        tracing::debug!(count = records.len(), "Loaded transactions");

        Self {
            repo,
            store: TransactionStore::from_records(records),
            session: RwLock::new(user),
            settings,
            persist_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ========================
    // Transaction operations
    // ========================

    /// Validate a draft and record it.
    pub async fn add_transaction(&self, draft: EntryDraft) -> Result<Transaction, AppError> {
        let transaction = draft.validate()?;
        self.store.append(transaction.clone()).await?;
        tracing::info!(
            id = %transaction.id,
            kind = %transaction.kind,
            category = %transaction.category,
            amount_cents = transaction.amount_cents,
            "Recorded transaction"
        );
        self.persist().await;
        Ok(transaction)
    }

    /// Record already validated transactions as one mutation with a single save.
    pub async fn add_transactions(&self, batch: Vec<Transaction>) -> Result<usize, AppError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let count = batch.len();
        self.store.append_all(batch).await?;
        tracing::info!(count, "Recorded transactions");
        self.persist().await;
        Ok(count)
    }

    /// Delete a transaction by id.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        let removed = self.store.remove(id).await?;
        tracing::info!(id = %id, "Deleted transaction");
        self.persist().await;
        Ok(removed)
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.store
            .get(id)
            .await
            .ok_or(AppError::TransactionNotFound(id))
    }

    /// All transactions, newest entry first.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.store.all().await
    }

    /// Filtered transactions, totals and spending breakdown for a month.
    pub async fn monthly_report(&self, period: MonthPeriod) -> MonthlyReport {
        let all = self.store.all().await;
        let transactions = filter_by_month(&all, period);
        let summary = summarize(&transactions);
        let breakdown = category_breakdown(&transactions, summary.total_expense);
        tracing::debug!(%period, count = transactions.len(), "Built monthly report");

        MonthlyReport {
            period,
            transactions,
            summary,
            breakdown,
        }
    }

    /// Save the whole collection. Failures are logged, never returned.
    async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.store.all().await;
        if let Err(e) = self.repo.save_transactions(&snapshot).await {
            tracing::error!(error = %e, "Failed to save transactions");
        }
    }

    // ========================
    // Premium features
    // ========================

    async fn require(&self, feature: Feature) -> Result<(), AppError> {
        let session = self.session.read().await;
        match check_access(session.as_ref(), feature) {
            Access::Allowed => Ok(()),
            Access::Denied(reason) => {
                tracing::info!(%feature, %reason, "Feature denied");
                Err(AppError::PermissionDenied { feature, reason })
            }
        }
    }

    /// Render the month's report as CSV. Requires a PRO account.
    pub async fn export_csv(
        &self,
        period: MonthPeriod,
        quoting: NoteQuoting,
    ) -> Result<CsvExport, AppError> {
        self.require(Feature::CsvExport).await?;

        let report = self.monthly_report(period).await;
        let content = render_csv(&report.transactions, quoting)?;
        let export = CsvExport {
            filename: export_filename(&self.settings.report_prefix, period),
            content,
            rows: report.transactions.len(),
        };
        tracing::info!(filename = %export.filename, rows = export.rows, "Exported CSV");
        Ok(export)
    }

    /// Pretend to upload everything to the cloud. Requires a PRO account.
    pub async fn sync(&self) -> Result<SyncReport, AppError> {
        self.require(Feature::CloudSync).await?;

        let synced = self.store.len().await;
        tracing::info!(records = synced, "Sync started");
        tokio::time::sleep(self.settings.sync_delay).await;
        tracing::info!(records = synced, "Sync finished");

        Ok(SyncReport {
            synced,
            completed_at: Utc::now(),
        })
    }

    // ========================
    // Session
    // ========================

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.clone()
    }

    /// Sign in with the mock account for `provider`.
    pub async fn login(&self, provider: LoginProvider) -> Result<User, AppError> {
        let user = User::mock(provider);
        self.repo.save_user(&user).await?;
        *self.session.write().await = Some(user.clone());
        tracing::info!(email = %user.email, "Signed in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.repo.clear_user().await?;
        *self.session.write().await = None;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Upgrade the signed-in user to PRO.
    pub async fn subscribe(&self) -> Result<User, AppError> {
        let mut session = self.session.write().await;
        let mut user = session.clone().ok_or(AppError::SignInRequired)?;
        user.is_pro = true;
        self.repo.save_user(&user).await?;
        *session = Some(user.clone());
        tracing::info!(email = %user.email, "Upgraded to PRO");
        Ok(user)
    }
}
