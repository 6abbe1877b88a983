use crate::error::{PaymentError, Result};
use std::fmt;

/// Credentials and settings of one merchant account on the gateway.
#[derive(Clone)]
pub struct MerchantConfig {
    pub merchant_id: String,
    merchant_key: String,
    /// Hosted payment page the redirect form posts to.
    pub gateway_url: String,
    /// Ask the gateway to capture approved payments immediately.
    pub auto_confirm: bool,
}

impl MerchantConfig {
    /// Builds a merchant configuration, refusing an empty store key.
    ///
    /// An empty key would still sign, but with a value anyone can guess.
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
        gateway_url: impl Into<String>,
        auto_confirm: bool,
    ) -> Result<Self> {
        let merchant_id = merchant_id.into();
        let merchant_key = merchant_key.into();
        let gateway_url = gateway_url.into();

        if merchant_id.trim().is_empty() {
            return Err(PaymentError::Configuration(
                "merchant id must not be empty".to_string(),
            ));
        }
        if merchant_key.is_empty() {
            return Err(PaymentError::Configuration(
                "merchant store key must not be empty".to_string(),
            ));
        }
        url::Url::parse(&gateway_url).map_err(|e| {
            PaymentError::Configuration(format!("invalid gateway url `{gateway_url}`: {e}"))
        })?;

        Ok(Self {
            merchant_id,
            merchant_key,
            gateway_url,
            auto_confirm,
        })
    }

    /// The shared secret used to sign both directions.
    pub fn merchant_key(&self) -> &str {
        &self.merchant_key
    }
}

// The store key never appears in logs.
impl fmt::Debug for MerchantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantConfig")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_key", &"***")
            .field("gateway_url", &self.gateway_url)
            .field("auto_confirm", &self.auto_confirm)
            .finish()
    }
}
