use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, routes::AppState};

/// HTTP header carrying the pre-shared API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose API key does not match the configured one
///
/// Plain equality against the single pre-shared key. Missing header and
/// wrong key are indistinguishable to the caller.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match presented {
        Some(key) if key == state.api_key => next.run(request).await,
        _ => AppError::Unauthorized.into_response(),
    }
}
