use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    middleware::{make_span_with_request_id, request_id_middleware, require_api_key},
    services::Recommender,
};

pub mod books;
pub mod recommendations;
pub mod users;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub recommender: Arc<Recommender>,
    pub api_key: String,
}

/// Pagination window for list endpoints
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

fn default_page_size() -> i64 {
    100
}

/// Creates the application router with all routes
///
/// Everything except `/health` sits behind the API-key check. The request-id
/// middleware runs outside the trace layer so the per-request span can pick
/// the id up from extensions.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/books", post(books::create).get(books::list))
        .route(
            "/books/:id",
            get(books::get_one).patch(books::update).delete(books::remove),
        )
        .route("/users", post(users::create).get(users::list))
        .route("/users/:id", get(users::get_one))
        .route(
            "/users/:id/ratings",
            post(users::rate_book).get(users::list_ratings),
        )
        .route(
            "/recommendations/traditional/:book_id",
            get(recommendations::traditional),
        )
        .route("/recommendations/ai/:book_id", get(recommendations::ai))
        .route(
            "/recommendations/hybrid/:book_id",
            get(recommendations::hybrid),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
