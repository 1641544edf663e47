/// Recommendation orchestrator
///
/// Combines the two strategies behind one seam: the pure TF-IDF similarity
/// engine and the AI suggestion provider. The hybrid path fans out to both
/// concurrently and reports each outcome separately, so a provider outage
/// never hides the similarity results (and vice versa).
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Book,
    services::{providers::SuggestionProvider, similarity},
};

/// Per-strategy outcomes of a hybrid fan-out
pub struct HybridRecommendations {
    pub traditional: AppResult<Vec<Book>>,
    pub ai_enhanced: AppResult<Vec<String>>,
}

pub struct Recommender {
    provider: Arc<dyn SuggestionProvider>,
}

impl Recommender {
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self { provider }
    }

    /// TF-IDF cosine similarity over the candidate pool
    ///
    /// The target is located in the pool by id. A target missing from the
    /// pool (it exists but fell outside the pool window) yields an empty
    /// result rather than an error.
    pub fn traditional(&self, target: &Book, pool: &[Book], limit: usize) -> AppResult<Vec<Book>> {
        let Some(index) = pool.iter().position(|book| book.id == target.id) else {
            tracing::warn!(
                book_id = target.id,
                pool_size = pool.len(),
                "Target book absent from candidate pool"
            );
            return Ok(vec![]);
        };

        similarity::recommend(pool, index, limit)
    }

    /// Delegates to the configured AI suggestion provider
    pub async fn ai(&self, target: &Book, limit: usize) -> AppResult<Vec<String>> {
        self.provider.suggest_similar(target, limit).await
    }

    /// Runs both strategies concurrently
    ///
    /// Partial success is the contract: callers receive both results and
    /// decide what a double failure means.
    pub async fn hybrid(
        &self,
        target: &Book,
        pool: &[Book],
        limit: usize,
    ) -> HybridRecommendations {
        let (traditional, ai_enhanced) = tokio::join!(
            async { self.traditional(target, pool, limit) },
            self.ai(target, limit),
        );

        if let Err(e) = &traditional {
            tracing::warn!(
                book_id = target.id,
                error = %e,
                "Traditional recommendations failed"
            );
        }
        if let Err(e) = &ai_enhanced {
            tracing::warn!(
                book_id = target.id,
                provider = self.provider.name(),
                error = %e,
                "AI recommendations failed"
            );
        }

        HybridRecommendations {
            traditional,
            ai_enhanced,
        }
    }
}
