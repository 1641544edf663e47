use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as stored and returned to clients
///
/// The recommendation engine treats books as read-only input; identifiers
/// are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: Option<String>,
    /// Ordered genre tags, e.g. ["sci-fi", "space opera"]
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a book
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl NewBook {
    /// Checks the required text fields; returns a client-facing message on failure
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.author.trim().is_empty() {
            return Err("author must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        Ok(())
    }
}

/// Partial update for a book; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub genres: Option<Vec<String>>,
}

impl BookPatch {
    /// Applies the patch in place, bumping `updated_at`
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = Some(isbn);
        }
        if let Some(genres) = self.genres {
            book.genres = genres;
        }
        book.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book() -> NewBook {
        NewBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: "Politics and prophecy on a desert planet".to_string(),
            isbn: Some("9780441172719".to_string()),
            genres: vec!["sci-fi".to_string()],
        }
    }

    #[test]
    fn test_new_book_validates() {
        assert!(new_book().validate().is_ok());
    }

    #[test]
    fn test_new_book_rejects_blank_title() {
        let mut book = new_book();
        book.title = "   ".to_string();
        assert_eq!(book.validate(), Err("title must not be empty".to_string()));
    }

    #[test]
    fn test_new_book_rejects_empty_description() {
        let mut book = new_book();
        book.description = String::new();
        assert!(book.validate().is_err());
    }

    #[test]
    fn test_new_book_deserializes_with_defaults() {
        let json = r#"{
            "title": "Dune",
            "author": "Frank Herbert",
            "description": "Politics and prophecy on a desert planet"
        }"#;

        let book: NewBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.isbn, None);
        assert!(book.genres.is_empty());
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: "Desert planet".to_string(),
            isbn: None,
            genres: vec!["sci-fi".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let before = book.updated_at;

        let patch = BookPatch {
            description: Some("Politics and prophecy on a desert planet".to_string()),
            ..Default::default()
        };
        patch.apply(&mut book);

        assert_eq!(book.title, "Dune");
        assert_eq!(
            book.description,
            "Politics and prophecy on a desert planet"
        );
        assert!(book.updated_at >= before);
    }

    #[test]
    fn test_patch_deserializes_from_partial_json() {
        let patch: BookPatch = serde_json::from_str(r#"{"genres": ["classic"]}"#).unwrap();
        assert_eq!(patch.genres, Some(vec!["classic".to_string()]));
        assert_eq!(patch.title, None);
    }
}
