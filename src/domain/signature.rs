//! Canonical signing of gateway payloads.
//!
//! Both directions concatenate escaped field values, each followed by `|`,
//! append the escaped store key, hash the result with SHA-512 and encode the
//! digest as base64. They differ only in which fields take part: outbound
//! requests use a fixed list, inbound callbacks use every posted field.

use super::field_map::FieldMap;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha512};
use std::fmt;
use subtle::ConstantTimeEq;

/// Fields signed on the outbound redirect, in gateway contract order.
pub const OUTBOUND_FIELDS: [&str; 23] = [
    "amount",
    "BillToCity",
    "BillToCompany",
    "BillToCountry",
    "BillToName",
    "BillToPostalCode",
    "BillToStateProv",
    "BillToStreet1",
    "callbackUrl",
    "clientid",
    "currency",
    "email",
    "failUrl",
    "hashAlgorithm",
    "lang",
    "oid",
    "okUrl",
    "refreshtime",
    "rnd",
    "shopurl",
    "storetype",
    "tel",
    "TranType",
];

/// Transport encoding declaration, never signed.
pub const ENCODING_FIELD: &str = "encoding";
/// Signature field posted back by the gateway.
pub const HASH_FIELD: &str = "HASH";
/// Signature field sent on the outbound redirect.
pub const OUTBOUND_HASH_FIELD: &str = "hash";

const DELIMITER: char = '|';
const ESCAPE: char = '\\';

/// A base64-encoded SHA-512 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a claimed signature, ignoring ASCII case, in constant time.
    pub fn matches(&self, claimed: &str) -> bool {
        let expected = self.0.to_ascii_uppercase();
        let claimed = claimed.trim().to_ascii_uppercase();
        expected.as_bytes().ct_eq(claimed.as_bytes()).into()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}

/// Escapes the escape character first so the escapes added for `|` stay single.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ESCAPE || c == DELIMITER {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the string that gets hashed for the given ordered keys.
pub fn canonicalize<'a>(
    fields: &FieldMap,
    keys: impl IntoIterator<Item = &'a str>,
    secret: &str,
) -> String {
    let mut canonical = String::new();
    for key in keys {
        canonical.push_str(&escape(fields.value_or_missing(key)));
        canonical.push(DELIMITER);
    }
    canonical.push_str(&escape(secret));
    canonical
}

/// Keys taking part in an inbound signature, sorted case-insensitively.
///
/// Keys are folded with Unicode simple lowercasing (`str::to_lowercase`), not
/// full case folding, so `ß` and `SS` sort apart. Gateway keys are ASCII,
/// where both rules agree. The sort is stable, so keys equal after folding
/// keep their posted order.
pub fn inbound_keys(fields: &FieldMap) -> Vec<&str> {
    let mut keys: Vec<&str> = fields
        .keys()
        .filter(|k| *k != ENCODING_FIELD && *k != HASH_FIELD)
        .collect();
    keys.sort_by_cached_key(|k| k.to_lowercase());
    keys
}

fn digest(canonical: &str) -> Signature {
    let hash = Sha512::digest(canonical.as_bytes());
    Signature(STANDARD.encode(hash))
}

/// Signs an outbound redirect payload.
pub fn sign_outbound(fields: &FieldMap, secret: &str) -> Signature {
    digest(&canonicalize(fields, OUTBOUND_FIELDS, secret))
}

/// Signs an inbound callback payload.
pub fn sign_inbound(fields: &FieldMap, secret: &str) -> Signature {
    digest(&canonicalize(fields, inbound_keys(fields), secret))
}

/// Checks a callback signature claimed by the gateway.
pub fn verify(fields: &FieldMap, secret: &str, claimed: &str) -> bool {
    sign_inbound(fields, secret).matches(claimed)
}
