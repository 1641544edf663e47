use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Content similarity over a candidate pool of books
///
/// Each book is reduced to a single document (title, description, and genre
/// tags), vectorized with TF-IDF over the pool's own vocabulary, and scored
/// against the target with cosine similarity. The index is a value built
/// fresh for every call; nothing is shared across requests.
use crate::error::{AppError, AppResult};
use crate::models::Book;

/// Common English function words excluded from the vocabulary
static ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "against", "all", "along", "also", "am",
    "among", "an", "and", "another", "any", "are", "around", "as", "at", "back", "be", "because",
    "been", "before", "behind", "being", "below", "beneath", "beside", "between", "beyond", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "even",
    "ever", "every", "few", "for", "from", "get", "give", "go", "got", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if",
    "in", "inside", "into", "is", "it", "its", "itself", "just", "made", "make", "may", "me",
    "might", "more", "most", "much", "must", "my", "myself", "near", "neither", "no", "none",
    "not", "now", "of", "off", "on", "only", "onto", "or", "other", "ought", "our", "ours",
    "ourselves", "out", "outside", "over", "own", "same", "say", "see", "several", "shall", "she",
    "should", "since", "so", "some", "such", "take", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "though", "through",
    "throughout", "to", "too", "toward", "under", "underneath", "unless", "until", "up", "upon",
    "very", "was", "way", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "you", "your", "yours",
    "yourself", "yourselves",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// TF-IDF vectors for one pool of documents, L2-normalized
///
/// Vocabulary and IDF weights are derived solely from the documents given to
/// [`TfidfIndex::build`]; indices into the pool are positional.
pub struct TfidfIndex {
    vectors: Vec<HashMap<String, f64>>,
}

impl TfidfIndex {
    /// Builds the index over the documents
    ///
    /// Fails with `InvalidInput` when the documents yield no vocabulary at
    /// all, with every token filtered as a stopword or too short. An empty
    /// vocabulary never degrades to all-zero scores.
    pub fn build(documents: &[String]) -> AppResult<Self> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(AppError::InvalidInput(
                "empty vocabulary: book records contain no indexable text".to_string(),
            ));
        }

        let n_docs = documents.len() as f64;
        let mut vectors = Vec::with_capacity(tokenized.len());
        for tokens in &tokenized {
            let mut weights: HashMap<String, f64> = HashMap::new();
            for token in tokens {
                *weights.entry(token.clone()).or_insert(0.0) += 1.0;
            }

            // Smoothed IDF: ln((1 + N) / (1 + df)) + 1
            for (term, weight) in weights.iter_mut() {
                let df = document_frequency[term.as_str()] as f64;
                *weight *= ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
            }

            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in weights.values_mut() {
                    *weight /= norm;
                }
            }
            vectors.push(weights);
        }

        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Cosine similarity between two documents, in [0, 1]
    ///
    /// Vectors are already L2-normalized, so this is a sparse dot product. A
    /// document with no vocabulary overlap (or no tokens at all) scores 0.0.
    /// Both indices must be within bounds.
    pub fn similarity(&self, a: usize, b: usize) -> f64 {
        let (small, large) = if self.vectors[a].len() <= self.vectors[b].len() {
            (&self.vectors[a], &self.vectors[b])
        } else {
            (&self.vectors[b], &self.vectors[a])
        };

        let dot: f64 = small
            .iter()
            .filter_map(|(term, wa)| large.get(term).map(|wb| wa * wb))
            .sum();

        dot.clamp(0.0, 1.0)
    }
}

/// Ranks pool entries by similarity to the target and returns up to `limit`
/// books, most similar first
///
/// The target itself is excluded by index, so a distinct book with identical
/// text is still a valid candidate. Ties keep their pool order. An empty
/// pool, or a target index outside the pool, yields an empty result.
pub fn recommend(pool: &[Book], target: usize, limit: usize) -> AppResult<Vec<Book>> {
    if pool.is_empty() || target >= pool.len() {
        return Ok(Vec::new());
    }

    let documents: Vec<String> = pool.iter().map(document_text).collect();
    let index = TfidfIndex::build(&documents)?;

    let mut scored: Vec<(usize, f64)> = (0..pool.len())
        .filter(|&i| i != target)
        .map(|i| (i, index.similarity(target, i)))
        .collect();

    // Stable sort: equal scores preserve pool order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    tracing::debug!(
        pool_size = pool.len(),
        target_index = target,
        limit,
        "Scored candidate pool"
    );

    Ok(scored
        .into_iter()
        .take(limit)
        .map(|(i, _)| pool[i].clone())
        .collect())
}

/// Document string for one book: title, description, space-joined genres
fn document_text(book: &Book) -> String {
    format!(
        "{} {} {}",
        book.title,
        book.description,
        book.genres.join(" ")
    )
}

/// Lowercased alphanumeric tokens of length >= 2, stopwords removed
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !stop_words().contains(token))
        .map(str::to_string)
        .collect()
}
