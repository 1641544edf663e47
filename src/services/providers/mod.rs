/// Suggestion provider abstraction
///
/// Pluggable architecture for external AI text-generation services. A
/// provider turns one book into free-text "Title by Author" suggestions; the
/// strings are advisory display text and are not guaranteed to resolve to
/// books in the store.
use crate::{error::AppResult, models::Book};

pub mod openai;

pub use openai::OpenAiProvider;

/// Trait for AI suggestion providers
///
/// A call suspends until the remote service replies. Providers must report
/// failures (including timeouts) as errors; returning an empty list on
/// failure would be indistinguishable from a genuine "no suggestions" reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Request up to `limit` books similar to `book`, one per line
    async fn suggest_similar(&self, book: &Book, limit: usize) -> AppResult<Vec<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
