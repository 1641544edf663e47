use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

use super::AppState;

/// Upper bound on books fetched as the scoring pool
const CANDIDATE_POOL_LIMIT: i64 = 1000;

const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    limit: Option<usize>,
}

impl RecommendationQuery {
    fn limit(&self) -> AppResult<usize> {
        match self.limit {
            Some(0) => Err(AppError::InvalidInput(
                "limit must be at least 1".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(DEFAULT_LIMIT),
        }
    }
}

/// Hybrid payload; on partial failure the failed side carries an error
/// message instead of data
#[derive(Debug, Serialize)]
pub struct HybridResponse {
    pub traditional: Option<Vec<Book>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional_error: Option<String>,
    pub ai_enhanced: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_enhanced_error: Option<String>,
}

async fn load_target(state: &AppState, book_id: i64) -> AppResult<Book> {
    state
        .store
        .get_book(book_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
}

async fn load_pool(state: &AppState) -> AppResult<Vec<Book>> {
    state.store.list_books(0, CANDIDATE_POOL_LIMIT).await
}

/// Recommendations from TF-IDF cosine similarity over the catalog
pub async fn traditional(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let limit = query.limit()?;
    let target = load_target(&state, book_id).await?;
    let pool = load_pool(&state).await?;

    let results = state.recommender.traditional(&target, &pool, limit)?;
    Ok(Json(results))
}

/// Recommendations from the AI provider, as "Title by Author" lines
pub async fn ai(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<String>>> {
    let limit = query.limit()?;
    let target = load_target(&state, book_id).await?;

    let suggestions = state.recommender.ai(&target, limit).await?;
    Ok(Json(suggestions))
}

/// Both strategies at once; one side failing still returns the other
pub async fn hybrid(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<HybridResponse>> {
    let limit = query.limit()?;
    let target = load_target(&state, book_id).await?;
    let pool = load_pool(&state).await?;

    let outcome = state.recommender.hybrid(&target, &pool, limit).await;

    if let (Err(t), Err(a)) = (&outcome.traditional, &outcome.ai_enhanced) {
        return Err(AppError::ExternalApi(format!(
            "both strategies failed: {t}; {a}"
        )));
    }

    let (traditional, traditional_error) = split(outcome.traditional);
    let (ai_enhanced, ai_enhanced_error) = split(outcome.ai_enhanced);

    Ok(Json(HybridResponse {
        traditional,
        traditional_error,
        ai_enhanced,
        ai_enhanced_error,
    }))
}

fn split<T>(result: AppResult<T>) -> (Option<T>, Option<String>) {
    match result {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(e.to_string())),
    }
}
