use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Billing details of the customer paying an order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct BillingPartner {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub commercial_company_name: String,
    #[serde(default)]
    pub country_name: String,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub state_code: String,
    /// Locale such as `fr_FR` or `en_US`.
    #[serde(default)]
    pub lang: String,
}

/// An order to be paid on the hosted payment page.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRequest {
    pub reference: String,
    pub amount: Decimal,
    pub partner: BillingPartner,
}

/// Languages offered by the hosted payment page.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PageLanguage {
    Fr,
    Ar,
    En,
}

impl PageLanguage {
    pub fn from_locale(locale: &str) -> Self {
        let locale = locale.trim().to_lowercase();
        if locale.contains("fr") {
            Self::Fr
        } else if locale.contains("ar") {
            Self::Ar
        } else {
            Self::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
            Self::En => "en",
        }
    }
}

static NON_ALPHANUMERIC: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9 ]+")
        .map_err(|err| tracing::error!(?err, "invalid billing field pattern"))
        .ok()
});

static NON_PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"[^0-9 -]+")
        .map_err(|err| tracing::error!(?err, "invalid phone pattern"))
        .ok()
});

// An unusable pattern yields an empty value rather than unsanitised input.
fn replace_runs(pattern: &LazyLock<Option<Regex>>, value: &str, replacement: &str) -> String {
    match pattern.as_ref() {
        Some(regex) => regex.replace_all(value, replacement).trim().to_string(),
        None => String::new(),
    }
}

/// Keeps ASCII letters, digits and spaces.
pub fn alphanumeric(value: &str) -> String {
    replace_runs(&NON_ALPHANUMERIC, value, "")
}

/// Replaces each run of characters other than ASCII letters, digits and
/// spaces with a single space.
pub fn street(value: &str) -> String {
    replace_runs(&NON_ALPHANUMERIC, value, " ")
}

/// Replaces each run of characters other than digits, spaces and dashes with
/// a single space.
pub fn phone(value: &str) -> String {
    replace_runs(&NON_PHONE, value, " ")
}

impl BillingPartner {
    /// State sent to the gateway: the code for US addresses, the name otherwise.
    pub fn billing_state(&self) -> &str {
        if self.country_code.eq_ignore_ascii_case("US") {
            &self.state_code
        } else {
            &self.state_name
        }
    }
}
