//! Application layer orchestrating the gateway flows.
//!
//! `checkout` builds the signed redirect to the hosted payment page and
//! `callback` verifies the gateway's answer before updating the transaction
//! it refers to.

pub mod callback;
pub mod checkout;
