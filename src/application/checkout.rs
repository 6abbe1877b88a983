use crate::config::MerchantConfig;
use crate::domain::field_map::{FieldMap, format_amount};
use crate::domain::order::{self, PageLanguage, PaymentRequest};
use crate::domain::signature::{self, OUTBOUND_HASH_FIELD};
use crate::error::{PaymentError, Result};
use maud::{DOCTYPE, Markup, html};
use rand::Rng;
use url::Url;

/// ISO 4217 numeric code of the Moroccan dirham.
pub const CURRENCY_MAD: &str = "504";
pub const TRAN_TYPE: &str = "PreAuth";
pub const STORE_TYPE: &str = "3D_PAY_HOSTING";
pub const HASH_ALGORITHM: &str = "ver3";
pub const REFRESH_TIME: &str = "5";
pub const ENCODING: &str = "UTF-8";

pub const CALLBACK_PATH: &str = "/payment/cmi/callback";
pub const RETURN_PATH: &str = "/payment/cmi/return";
pub const CANCEL_PATH: &str = "/payment/cmi/cancel";
pub const ERROR_PATH: &str = "/payment/cmi/error";

/// A signed form ready to be posted to the hosted payment page.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectForm {
    pub action_url: String,
    pub fields: FieldMap,
}

/// Random nonce sent as `rnd`.
pub fn generate_rnd() -> String {
    rand::thread_rng()
        .gen_range(100_000_000u32..1_000_000_000)
        .to_string()
}

fn join(base: &Url, path: &str) -> Result<String> {
    base.join(path)
        .map(String::from)
        .map_err(|e| PaymentError::Configuration(format!("cannot join `{path}` to base url: {e}")))
}

/// Builds the signed field map for the redirect to the payment page.
///
/// `base_url` is the public address of the shop; the gateway calls back and
/// returns the customer under it.
pub fn build_redirect_fields(
    config: &MerchantConfig,
    request: &PaymentRequest,
    base_url: &str,
    rnd: &str,
) -> Result<FieldMap> {
    let base_url = base_url.trim();
    let base = Url::parse(base_url)
        .map_err(|e| PaymentError::Configuration(format!("invalid base url `{base_url}`: {e}")))?;
    let partner = &request.partner;

    let mut fields = FieldMap::new();
    fields.insert("clientid", config.merchant_id.as_str());
    fields.insert("oid", request.reference.as_str());
    fields.insert("amount", format_amount(request.amount));
    fields.insert("currency", CURRENCY_MAD);
    fields.insert("TranType", TRAN_TYPE);
    fields.insert("storetype", STORE_TYPE);
    fields.insert("hashAlgorithm", HASH_ALGORITHM);
    fields.insert("rnd", rnd);
    fields.insert("lang", PageLanguage::from_locale(&partner.lang).code());
    fields.insert("refreshtime", REFRESH_TIME);
    fields.insert("encoding", ENCODING);
    fields.insert("BillToName", order::alphanumeric(&partner.name));
    fields.insert("email", partner.email.trim());
    fields.insert("tel", order::phone(&partner.phone));
    fields.insert("BillToStreet1", order::street(&partner.address));
    fields.insert("BillToCity", order::alphanumeric(&partner.city));
    fields.insert("BillToPostalCode", order::alphanumeric(&partner.zip));
    fields.insert(
        "BillToCompany",
        order::alphanumeric(&partner.commercial_company_name),
    );
    fields.insert("BillToCountry", order::alphanumeric(&partner.country_name));
    fields.insert(
        "BillToStateProv",
        order::alphanumeric(partner.billing_state()),
    );
    fields.insert("shopurl", base_url);
    fields.insert("failUrl", join(&base, ERROR_PATH)?);
    fields.insert("okUrl", join(&base, RETURN_PATH)?);
    fields.insert("callbackUrl", join(&base, CALLBACK_PATH)?);

    let hash = signature::sign_outbound(&fields, config.merchant_key());
    fields.insert(OUTBOUND_HASH_FIELD, String::from(hash));

    tracing::debug!(reference = %request.reference, "built redirect form fields");
    Ok(fields)
}

/// Builds the redirect form with a fresh nonce.
pub fn redirect_form(
    config: &MerchantConfig,
    request: &PaymentRequest,
    base_url: &str,
) -> Result<RedirectForm> {
    let fields = build_redirect_fields(config, request, base_url, &generate_rnd())?;
    Ok(RedirectForm {
        action_url: config.gateway_url.clone(),
        fields,
    })
}

impl RedirectForm {
    /// Renders a page that posts the form to the gateway as soon as it loads.
    pub fn render_html(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                body onload="document.forms[0].submit()" {
                    form method="post" action=(self.action_url) {
                        @for (name, value) in self.fields.iter() {
                            input type="hidden" name=(name) value=(value);
                        }
                        noscript {
                            button type="submit" { "Pay" }
                        }
                    }
                }
            }
        }
    }
}
