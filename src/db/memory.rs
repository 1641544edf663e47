use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{Book, BookPatch, NewBook, NewUser, Rating, User},
};

/// In-memory store backed by hash maps
///
/// Backs the integration tests in place of a live database. Ids come from
/// per-table counters so they behave like BIGSERIAL columns.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    books: HashMap<i64, Book>,
    users: HashMap<i64, User>,
    ratings: HashMap<i64, Rating>,
    next_book_id: i64,
    next_user_id: i64,
    next_rating_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                books: HashMap::new(),
                users: HashMap::new(),
                ratings: HashMap::new(),
                next_book_id: 1,
                next_user_id: 1,
                next_rating_id: 1,
            })),
        }
    }
}

fn page<T: Clone>(mut rows: Vec<&T>, key: impl Fn(&T) -> i64, skip: i64, limit: i64) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows.into_iter()
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn create_book(&self, new_book: NewBook) -> AppResult<Book> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let book = Book {
            id: inner.next_book_id,
            title: new_book.title,
            author: new_book.author,
            description: new_book.description,
            isbn: new_book.isbn,
            genres: new_book.genres,
            created_at: now,
            updated_at: now,
        };
        inner.next_book_id += 1;
        inner.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn list_books(&self, skip: i64, limit: i64) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;
        Ok(page(inner.books.values().collect(), |b| b.id, skip, limit))
    }

    async fn get_book(&self, id: i64) -> AppResult<Option<Book>> {
        let inner = self.inner.read().await;
        Ok(inner.books.get(&id).cloned())
    }

    async fn update_book(&self, id: i64, patch: BookPatch) -> AppResult<Option<Book>> {
        let mut inner = self.inner.write().await;
        let Some(book) = inner.books.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(book);
        Ok(Some(book.clone()))
    }

    async fn delete_book(&self, id: i64) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.books.remove(&id).is_some();
        if removed {
            // Mirrors the ON DELETE CASCADE on user_books
            inner.ratings.retain(|_, r| r.book_id != id);
        }
        Ok(removed)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email);
        if taken {
            return Err(AppError::InvalidInput(
                "username or email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: new_user.username,
            email: new_user.email,
            created_at: now,
            updated_at: now,
        };
        inner.next_user_id += 1;
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self, skip: i64, limit: i64) -> AppResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(page(inner.users.values().collect(), |u| u.id, skip, limit))
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn upsert_rating(
        &self,
        user_id: i64,
        book_id: i64,
        rating: Option<i32>,
    ) -> AppResult<Rating> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .ratings
            .values_mut()
            .find(|r| r.user_id == user_id && r.book_id == book_id)
        {
            existing.rating = rating;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let row = Rating {
            id: inner.next_rating_id,
            user_id,
            book_id,
            rating,
            created_at: now,
            updated_at: now,
        };
        inner.next_rating_id += 1;
        inner.ratings.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_ratings(&self, user_id: i64) -> AppResult<Vec<Rating>> {
        let inner = self.inner.read().await;
        let rows: Vec<&Rating> = inner
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .collect();
        Ok(page(rows, |r| r.id, 0, i64::MAX))
    }
}
