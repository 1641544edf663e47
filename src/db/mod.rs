pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{create_pool, init_schema, PgStore};

/// Storage layer abstraction
///
/// `Store` is the persistence seam: handlers talk to it through a trait
/// object, so the Postgres implementation and the in-memory implementation
/// used by tests are interchangeable.
use crate::{
    error::AppResult,
    models::{Book, BookPatch, NewBook, NewUser, Rating, User},
};

/// Persistence operations for books, users, and ratings
///
/// Listing operations page with `skip`/`limit` and order by id, so the
/// candidate pool handed to the recommendation engine is stable across
/// identical calls.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn create_book(&self, new_book: NewBook) -> AppResult<Book>;
    async fn list_books(&self, skip: i64, limit: i64) -> AppResult<Vec<Book>>;
    async fn get_book(&self, id: i64) -> AppResult<Option<Book>>;
    async fn update_book(&self, id: i64, patch: BookPatch) -> AppResult<Option<Book>>;
    async fn delete_book(&self, id: i64) -> AppResult<bool>;

    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;
    async fn list_users(&self, skip: i64, limit: i64) -> AppResult<Vec<User>>;
    async fn get_user(&self, id: i64) -> AppResult<Option<User>>;

    /// Inserts or updates the one rating a user holds for a book
    async fn upsert_rating(
        &self,
        user_id: i64,
        book_id: i64,
        rating: Option<i32>,
    ) -> AppResult<Rating>;
    async fn list_ratings(&self, user_id: i64) -> AppResult<Vec<Rating>>;
}
