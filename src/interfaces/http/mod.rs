//! HTTP endpoints the gateway and the customer's browser talk to.
//!
//! - `POST /payment/cmi/callback` answers the gateway with a response token.
//! - `/payment/cmi/return`, `/cancel` and `/error` apply the posted result and
//!   send the customer on to the payment processing page.
//! - `POST /payment/cmi/redirect` renders the auto-submitting form that takes
//!   the customer to the hosted payment page.

pub mod handlers;

use crate::application::callback::CallbackProcessor;
use crate::application::checkout::{CALLBACK_PATH, CANCEL_PATH, ERROR_PATH, RETURN_PATH};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Page the customer lands on after returning from the gateway.
pub const DEFAULT_PROCESS_PAGE: &str = "/payment/process";
pub const REDIRECT_PATH: &str = "/payment/cmi/redirect";

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<CallbackProcessor>,
    /// Public address of the shop, used to build gateway return urls.
    pub base_url: String,
    pub process_page: String,
}

impl AppState {
    pub fn new(processor: CallbackProcessor, base_url: impl Into<String>) -> Self {
        Self {
            processor: Arc::new(processor),
            base_url: base_url.into(),
            process_page: DEFAULT_PROCESS_PAGE.to_string(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(CALLBACK_PATH, post(handlers::callback))
        .route(
            RETURN_PATH,
            get(handlers::customer_return).post(handlers::customer_return),
        )
        .route(
            CANCEL_PATH,
            get(handlers::customer_return).post(handlers::customer_return),
        )
        .route(
            ERROR_PATH,
            get(handlers::customer_return).post(handlers::customer_return),
        )
        .route(REDIRECT_PATH, post(handlers::redirect_form))
        .with_state(state)
}
