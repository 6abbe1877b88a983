pub mod csv {
    pub mod transaction_reader;
}
pub mod http;
