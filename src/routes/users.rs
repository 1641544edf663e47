use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{NewRating, NewUser, Rating, User},
};

use super::{AppState, Pagination};

/// Creates a new user
pub async fn create(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    new_user.validate().map_err(AppError::InvalidInput)?;

    let user = state.store.create_user(new_user).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Lists users with pagination
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list_users(page.skip, page.limit).await?;
    Ok(Json(users))
}

/// Fetches a single user by id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Records the user's rating for a book
///
/// A user holds at most one rating per book; rating the same book again
/// replaces the stars.
pub async fn rate_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new_rating): Json<NewRating>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    new_rating.validate().map_err(AppError::InvalidInput)?;

    state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    state
        .store
        .get_book(new_rating.book_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    let rating = state
        .store
        .upsert_rating(id, new_rating.book_id, new_rating.rating)
        .await?;
    tracing::info!(
        user_id = id,
        book_id = rating.book_id,
        stars = ?rating.rating,
        "Rating recorded"
    );

    Ok((StatusCode::CREATED, Json(rating)))
}

/// Lists the user's ratings
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Rating>>> {
    state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let ratings = state.store.list_ratings(id).await?;
    Ok(Json(ratings))
}
