use super::transaction::PaymentTransaction;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn store(&self, tx: PaymentTransaction) -> Result<()>;
    /// Returns every transaction carrying `reference`, so callers can tell
    /// a missing reference from a duplicated one.
    async fn find_by_reference(&self, reference: &str) -> Result<Vec<PaymentTransaction>>;
}

pub type TransactionStoreBox = Box<dyn TransactionStore>;
