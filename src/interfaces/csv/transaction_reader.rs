use crate::domain::transaction::PaymentTransaction;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::io::Read;

/// Reads the transactions a callback may settle from a CSV export.
///
/// Expected header: `id, reference, amount`, optionally followed by
/// `currency`, `state` and `acquirer_reference`. Whitespace is trimmed
/// around every field. A row without a reference or with a non-positive
/// amount is reported as an error: no callback could ever match it.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one result per row, in file order.
    pub fn transactions(self) -> impl Iterator<Item = Result<PaymentTransaction>> {
        self.reader
            .into_deserialize()
            .map(|row| row.map_err(PaymentError::from).and_then(settleable))
    }
}

fn settleable(tx: PaymentTransaction) -> Result<PaymentTransaction> {
    if tx.reference.is_empty() {
        return Err(PaymentError::MissingField("reference"));
    }
    if tx.amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidParameters {
            reference: tx.reference,
            details: format!("amount must be positive, got {}", tx.amount),
        });
    }
    Ok(tx)
}
