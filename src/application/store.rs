use std::collections::HashSet;

use tokio::sync::RwLock;

use crate::domain::{Transaction, TransactionId};

use super::AppError;

/// In-memory owner of the transaction collection.
///
/// Mutations take the write lock, reads take the read lock, so a reader never
/// observes a half-applied append or removal. Newest entries sit at the front.
pub struct TransactionStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore {
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(Vec::new()),
        }
    }

    /// Build a store from previously persisted records.
    /// Records repeating an earlier id are dropped.
    pub fn from_records(records: Vec<Transaction>) -> Self {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let transactions: Vec<Transaction> = records
            .into_iter()
            .filter(|t| seen.insert(t.id))
            .collect();

        if transactions.len() != total {
            tracing::warn!(
                dropped = total - transactions.len(),
                "Dropped transactions with duplicate ids"
            );
        }

        Self {
            transactions: RwLock::new(transactions),
        }
    }

    /// Insert a transaction at the front of the collection.
    pub async fn append(&self, transaction: Transaction) -> Result<(), AppError> {
        let mut transactions = self.transactions.write().await;
        if transactions.iter().any(|t| t.id == transaction.id) {
            return Err(AppError::DuplicateTransaction(transaction.id));
        }
        transactions.insert(0, transaction);
        Ok(())
    }

    /// Insert a batch under a single write lock, leaving the collection as
    /// appending each one in turn would. Nothing is inserted if any id is taken.
    pub async fn append_all(&self, batch: Vec<Transaction>) -> Result<(), AppError> {
        let mut transactions = self.transactions.write().await;
        let mut seen: HashSet<TransactionId> = transactions.iter().map(|t| t.id).collect();
        if let Some(duplicate) = batch.iter().find(|t| !seen.insert(t.id)) {
            return Err(AppError::DuplicateTransaction(duplicate.id));
        }
        transactions.splice(0..0, batch.into_iter().rev());
        Ok(())
    }

    /// Remove a transaction by id, returning it.
    pub async fn remove(&self, id: TransactionId) -> Result<Transaction, AppError> {
        let mut transactions = self.transactions.write().await;
        let index = transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(AppError::TransactionNotFound(id))?;
        Ok(transactions.remove(index))
    }

    /// Snapshot of the whole collection in display order.
    pub async fn all(&self) -> Vec<Transaction> {
        self.transactions.read().await.clone()
    }

    pub async fn get(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn sample(amount: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            TransactionKind::Expense,
            "Food",
            amount,
        )
    }

    #[tokio::test]
    async fn test_append_puts_newest_first() {
        let store = TransactionStore::new();
        let first = sample(100);
        let second = sample(200);
        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let all = store.all().await;
        assert_eq!(all, vec![second, first]);
    }

    #[tokio::test]
    async fn test_append_rejects_duplicate_id() {
        let store = TransactionStore::new();
        let tx = sample(100);
        store.append(tx.clone()).await.unwrap();
        let err = store.append(tx.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateTransaction(id) if id == tx.id));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = TransactionStore::new();
        let keep = sample(100);
        let gone = sample(200);
        store.append(keep.clone()).await.unwrap();
        store.append(gone.clone()).await.unwrap();

        let removed = store.remove(gone.id).await.unwrap();
        assert_eq!(removed.id, gone.id);
        assert_eq!(store.all().await, vec![keep]);
        assert!(store.get(gone.id).await.is_none());

        let err = store.remove(gone.id).await.unwrap_err();
        assert!(matches!(err, AppError::TransactionNotFound(_)));
    }

    #[tokio::test]
    async fn test_append_all_matches_one_by_one() {
        let existing = sample(1);
        let batch = vec![sample(100), sample(200), sample(300)];

        let store = TransactionStore::from_records(vec![existing.clone()]);
        store.append_all(batch.clone()).await.unwrap();

        let one_by_one = TransactionStore::from_records(vec![existing]);
        for tx in batch {
            one_by_one.append(tx).await.unwrap();
        }
        assert_eq!(store.all().await, one_by_one.all().await);
    }

    #[tokio::test]
    async fn test_append_all_is_all_or_nothing() {
        let existing = sample(1);
        let store = TransactionStore::from_records(vec![existing.clone()]);

        let err = store
            .append_all(vec![sample(100), existing.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTransaction(id) if id == existing.id));

        let repeated = sample(200);
        let err = store
            .append_all(vec![repeated.clone(), repeated.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTransaction(id) if id == repeated.id));

        assert_eq!(store.all().await, vec![existing]);
    }

    #[tokio::test]
    async fn test_from_records_drops_duplicates() {
        let a = sample(100);
        let b = sample(200);
        let store = TransactionStore::from_records(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(store.all().await, vec![a, b]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends() {
        let store = Arc::new(TransactionStore::new());
        let mut handles = Vec::new();
        for i in 1..=50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.append(sample(i)).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all = store.all().await;
        assert_eq!(all.len(), 50);
        let ids: HashSet<_> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 50);
    }
}
