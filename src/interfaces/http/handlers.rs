use super::AppState;
use crate::application::callback::ResponseToken;
use crate::application::checkout;
use crate::domain::field_map::FieldMap;
use crate::domain::order::PaymentRequest;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

fn parse_fields(raw: &[u8]) -> Option<FieldMap> {
    match serde_urlencoded::from_bytes::<FieldMap>(raw) {
        Ok(fields) => Some(fields),
        Err(e) => {
            tracing::warn!(error = %e, "undecodable form payload");
            None
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Server-to-server notification from the gateway.
pub async fn callback(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let token = match parse_fields(&body) {
        Some(fields) if !fields.is_empty() => state.processor.respond(&fields).await,
        Some(_) => {
            tracing::info!("received empty notification; skip");
            ResponseToken::Failure
        }
        None => ResponseToken::Failure,
    };
    (StatusCode::OK, token.as_str())
}

/// Customer coming back from the payment page, by GET or POST.
pub async fn customer_return(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Redirect {
    let raw = if body.is_empty() {
        query.unwrap_or_default().into_bytes()
    } else {
        body.to_vec()
    };
    if let Some(fields) = parse_fields(&raw)
        && !fields.is_empty()
        && let Err(e) = state.processor.process(&fields).await
    {
        tracing::info!(error = %e, "return payload not applied");
    }
    Redirect::to(&state.process_page)
}

/// Renders the form that carries the customer to the hosted payment page.
pub async fn redirect_form(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Response {
    match checkout::redirect_form(state.processor.config(), &request, &state.base_url) {
        Ok(form) => Html(form.render_html().into_string()).into_response(),
        Err(e) => {
            tracing::error!(reference = %request.reference, error = %e, "cannot build redirect form");
            (StatusCode::INTERNAL_SERVER_ERROR, "cannot build redirect form").into_response()
        }
    }
}
