use crate::relay::Relay;
use crate::relay::error::{ FieldViolation, RelayError };
use std::any::Any;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Router,
    Json,
    extract::{ rejection::BytesRejection, State },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any as AnyOrigin, CorsLayer };
use log::{ error, warn };

pub const CHAT_ROUTE: &str = "/api/chat";

#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
}

pub fn router(relay: Arc<Relay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route(CHAT_ROUTE, post(chat_handler))
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(AppState { relay })
}

// The body is taken raw so malformed JSON is reported through the same
// violation list as field errors.
async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection_response(rejection),
    };
    match state.relay.handle_body(&body).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Keeps the rejection's status (e.g. 413 over the body limit) with the usual JSON error body.
fn body_rejection_response(rejection: BytesRejection) -> Response {
    warn!("Rejected chat request body: {}", rejection.body_text());
    let status = rejection.status();
    let err = RelayError::Validation(vec![FieldViolation::new("body", rejection.body_text())]);
    (status, Json(err.to_body())).into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Chat handler panicked: {}", detail);
    RelayError::Unknown(detail.to_string()).into_response()
}
