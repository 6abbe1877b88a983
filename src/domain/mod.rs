//! Gateway-independent types: field maps, signatures, orders and transactions.

pub mod field_map;
pub mod order;
pub mod ports;
pub mod signature;
pub mod transaction;
