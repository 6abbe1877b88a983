use crate::config::MerchantConfig;
use crate::domain::field_map::{FieldMap, format_amount};
use crate::domain::ports::TransactionStoreBox;
use crate::domain::signature::{self, HASH_FIELD};
use crate::domain::transaction::{PaymentTransaction, TransactionState};
use crate::error::{PaymentError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

pub const REFERENCE_FIELD: &str = "oid";
pub const AMOUNT_FIELD: &str = "amount";
pub const RETURN_CODE_FIELD: &str = "ProcReturnCode";

/// Literal answers the gateway expects from the callback endpoint.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResponseToken {
    /// Approved; the gateway captures the pre-authorization right away.
    PostAuth,
    /// Callback accepted without requesting a capture.
    Approved,
    Failure,
}

impl ResponseToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostAuth => "ACTION=POSTAUTH",
            Self::Approved => "APPROVED",
            Self::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for ResponseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a callback that passed verification.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackOutcome {
    pub transaction: PaymentTransaction,
    pub token: ResponseToken,
}

/// Verifies gateway callbacks and applies them to stored transactions.
///
/// A callback is checked in order: required fields, signature, reference
/// lookup, amount. Only a callback passing every check updates the store.
pub struct CallbackProcessor {
    config: MerchantConfig,
    transaction_store: TransactionStoreBox,
}

impl CallbackProcessor {
    pub fn new(config: MerchantConfig, transaction_store: TransactionStoreBox) -> Self {
        Self {
            config,
            transaction_store,
        }
    }

    pub fn config(&self) -> &MerchantConfig {
        &self.config
    }

    pub async fn process(&self, fields: &FieldMap) -> Result<CallbackOutcome> {
        let reference = fields
            .get(REFERENCE_FIELD)
            .filter(|r| !r.is_empty())
            .ok_or(PaymentError::MissingField(REFERENCE_FIELD))?;
        let claimed = fields
            .get(HASH_FIELD)
            .filter(|h| !h.is_empty())
            .ok_or(PaymentError::MissingField(HASH_FIELD))?;

        if !signature::verify(fields, self.config.merchant_key(), claimed) {
            tracing::warn!(reference, "callback signature mismatch");
            return Err(PaymentError::IntegrityFailure {
                reference: reference.to_string(),
            });
        }
        tracing::info!(reference, "validated callback data");

        let mut tx = self.find_unique(reference).await?;
        check_parameters(&tx, fields, reference)?;

        tx.apply_return_code(reference, fields.get(RETURN_CODE_FIELD));
        self.transaction_store.store(tx.clone()).await?;

        let token = match tx.state {
            TransactionState::Done if self.config.auto_confirm => ResponseToken::PostAuth,
            _ => ResponseToken::Approved,
        };
        tracing::info!(reference, state = ?tx.state, %token, "callback applied");

        Ok(CallbackOutcome {
            transaction: tx,
            token,
        })
    }

    /// Like [`process`](Self::process), but answers with a token on every path.
    pub async fn respond(&self, fields: &FieldMap) -> ResponseToken {
        match self.process(fields).await {
            Ok(outcome) => outcome.token,
            Err(e) => {
                tracing::warn!(error = %e, "callback rejected");
                ResponseToken::Failure
            }
        }
    }

    async fn find_unique(&self, reference: &str) -> Result<PaymentTransaction> {
        let mut matches = self.transaction_store.find_by_reference(reference).await?;
        match matches.len() {
            0 => Err(PaymentError::TransactionNotFound(reference.to_string())),
            1 => Ok(matches.remove(0)),
            count => Err(PaymentError::AmbiguousReference {
                reference: reference.to_string(),
                count,
            }),
        }
    }
}

fn check_parameters(tx: &PaymentTransaction, fields: &FieldMap, reference: &str) -> Result<()> {
    let mut invalid = Vec::new();

    if let Some(acquirer_reference) = &tx.acquirer_reference
        && acquirer_reference != reference
    {
        invalid.push(format!(
            "transaction id: received {reference}, expected {acquirer_reference}"
        ));
    }

    let received = fields.get(AMOUNT_FIELD).unwrap_or("0.0");
    let matches_amount = received
        .trim()
        .parse::<Decimal>()
        .map(|amount| {
            (amount - tx.amount)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .is_zero()
        })
        .unwrap_or(false);
    if !matches_amount {
        invalid.push(format!(
            "amount: received {received}, expected {}",
            format_amount(tx.amount)
        ));
    }

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(PaymentError::InvalidParameters {
            reference: reference.to_string(),
            details: invalid.join("; "),
        })
    }
}
