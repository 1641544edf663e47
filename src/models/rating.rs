use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-book interaction, optionally carrying a star rating
///
/// One row per (user, book) pair; re-rating a book updates the row rather
/// than recording a second interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    /// 1-5 stars; absent for a shelved-but-unrated book
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for rating (or shelving) a book
#[derive(Debug, Clone, Deserialize)]
pub struct NewRating {
    pub book_id: i64,
    #[serde(default)]
    pub rating: Option<i32>,
}

impl NewRating {
    pub fn validate(&self) -> Result<(), String> {
        match self.rating {
            Some(stars) if !(1..=5).contains(&stars) => {
                Err("rating must be between 1 and 5".to_string())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_in_range_validates() {
        for stars in 1..=5 {
            let payload = NewRating {
                book_id: 1,
                rating: Some(stars),
            };
            assert!(payload.validate().is_ok());
        }
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        for stars in [0, 6, -1] {
            let payload = NewRating {
                book_id: 1,
                rating: Some(stars),
            };
            assert!(payload.validate().is_err());
        }
    }

    #[test]
    fn test_unrated_shelving_is_valid() {
        let payload = NewRating {
            book_id: 1,
            rating: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_new_rating_deserializes_without_rating_field() {
        let payload: NewRating = serde_json::from_str(r#"{"book_id": 7}"#).unwrap();
        assert_eq!(payload.book_id, 7);
        assert_eq!(payload.rating, None);
    }
}
