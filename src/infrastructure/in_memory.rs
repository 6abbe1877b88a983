use crate::domain::ports::TransactionStore;
use crate::domain::transaction::PaymentTransaction;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payment transactions.
///
/// Records are keyed by their store id, so two records may share a reference.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<u32, PaymentTransaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn store(&self, tx: PaymentTransaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Vec<PaymentTransaction>> {
        let transactions = self.transactions.read().await;
        let mut found: Vec<PaymentTransaction> = transactions
            .values()
            .filter(|tx| tx.reference == reference)
            .cloned()
            .collect();
        found.sort_by_key(|tx| tx.id);
        Ok(found)
    }
}
