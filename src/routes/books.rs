use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookPatch, NewBook},
};

use super::{AppState, Pagination};

/// Creates a new book
pub async fn create(
    State(state): State<AppState>,
    Json(new_book): Json<NewBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    new_book.validate().map_err(AppError::InvalidInput)?;

    let book = state.store.create_book(new_book).await?;
    tracing::info!(book_id = book.id, title = %book.title, "Book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// Lists books with pagination
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.store.list_books(page.skip, page.limit).await?;
    Ok(Json(books))
}

/// Fetches a single book by id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state
        .store
        .get_book(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Json(book))
}

/// Applies a partial update; absent fields are left untouched
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BookPatch>,
) -> AppResult<Json<Book>> {
    let book = state
        .store
        .update_book(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    tracing::info!(book_id = book.id, "Book updated");
    Ok(Json(book))
}

/// Deletes a book
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.store.delete_book(id).await? {
        return Err(AppError::NotFound("Book not found".to_string()));
    }

    tracing::info!(book_id = id, "Book deleted");
    Ok(Json(json!({ "ok": true })))
}
