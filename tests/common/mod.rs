#![allow(dead_code)]

use cmi_payment::config::MerchantConfig;
use cmi_payment::domain::field_map::FieldMap;

pub const SECRET: &str = "topsecret";
pub const GATEWAY_URL: &str = "https://testpayment.cmi.co.ma/fim/est3Dgate";
pub const BASE_URL: &str = "https://shop.example.com";

/// Outbound signature of [`outbound_fields`] under [`SECRET`].
pub const OUTBOUND_GOLDEN: &str =
    "9TLzXYmmBwoy4NvtzMGR98Gu/gJ5HyqV01L8LOxEn32ForECN8uSkKiuTRDDnkFP3LQpkZsxVBMuS+mCF/5weA==";
/// Outbound signature of [`outbound_fields`] under an empty secret.
pub const OUTBOUND_EMPTY_SECRET_GOLDEN: &str =
    "P+bp163X25xsYRbY3QIu8DP+gzcgkVSMN1UDhxq92T/71Fxvune1CyczWBaxuSRF1rdYuXqzyMZdMd3Ejxa55A==";
/// Signature posted by the gateway in [`callback_fields`].
pub const CALLBACK_GOLDEN: &str =
    "WyNGTnuc0ZV/y1OgyXi+ycOJAgQLpTPn9Um4EBTxDKM/pBcM8+6h+AFzEtktGAQSsOsvm4ohMOSvGyAI5EoiUA==";

pub fn merchant(auto_confirm: bool) -> MerchantConfig {
    MerchantConfig::new("M1", SECRET, GATEWAY_URL, auto_confirm).unwrap()
}

pub fn outbound_fields() -> FieldMap {
    [
        ("clientid", "M1"),
        ("oid", "REF123"),
        ("amount", "10.00"),
        ("currency", "504"),
        ("TranType", "PreAuth"),
        ("storetype", "3D_PAY_HOSTING"),
        ("hashAlgorithm", "ver3"),
        ("rnd", "197328465"),
        ("lang", "fr"),
        ("refreshtime", "5"),
        ("encoding", "UTF-8"),
        ("BillToName", "Jane Doe"),
        ("email", "jane@example.com"),
        ("tel", "0600000000"),
        ("BillToStreet1", "1 Rue Test"),
        ("BillToCity", "Casablanca"),
        ("BillToPostalCode", "20000"),
        ("BillToCompany", ""),
        ("BillToCountry", "Morocco"),
        ("BillToStateProv", ""),
        ("shopurl", "https://shop.example.com"),
        ("failUrl", "https://shop.example.com/payment/cmi/error"),
        ("okUrl", "https://shop.example.com/payment/cmi/return"),
        ("callbackUrl", "https://shop.example.com/payment/cmi/callback"),
    ]
    .into_iter()
    .collect()
}

/// An approved callback for `REF123`, signed with [`SECRET`].
pub fn callback_fields() -> FieldMap {
    let raw = std::fs::read_to_string("tests/fixtures/callback.txt").unwrap();
    serde_urlencoded::from_str(raw.trim()).unwrap()
}
