pub mod providers;
pub mod recommender;
pub mod similarity;

pub use providers::{OpenAiProvider, SuggestionProvider};
pub use recommender::{HybridRecommendations, Recommender};
