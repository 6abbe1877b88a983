use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Return code the gateway posts for an approved payment.
pub const SUCCESS_RETURN_CODE: &str = "00";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Draft,
    #[default]
    Pending,
    Done,
    Cancel,
    Error,
}

/// A payment transaction awaiting (or having received) a gateway callback.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentTransaction {
    /// Store identifier, unique per record.
    pub id: u32,
    /// Reference sent to the gateway as `oid`.
    pub reference: String,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub state: TransactionState,
    /// Reference reported back by the gateway, set on the first valid callback.
    #[serde(default)]
    pub acquirer_reference: Option<String>,
    #[serde(skip)]
    pub validated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "MAD".to_string()
}

impl PaymentTransaction {
    pub fn new(id: u32, reference: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id,
            reference: reference.into(),
            amount,
            currency: default_currency(),
            state: TransactionState::Pending,
            acquirer_reference: None,
            validated_at: None,
        }
    }

    /// Applies the gateway return code and records the acquirer reference.
    pub fn apply_return_code(&mut self, acquirer_reference: &str, return_code: Option<&str>) {
        self.acquirer_reference = Some(acquirer_reference.to_string());
        self.validated_at = Some(Utc::now());
        self.state = if return_code == Some(SUCCESS_RETURN_CODE) {
            TransactionState::Done
        } else {
            TransactionState::Cancel
        };
    }
}
