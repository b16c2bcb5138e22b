use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub isbn: String,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Review joined with its author's username, as listed on a book page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
    pub user_id: i32,
    pub username: String,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, FromRow)]
pub struct RatingStats {
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

impl RatingStats {
    /// Average rounded to two decimals, `None` without reviews.
    pub fn rounded_average(&self) -> Option<f64> {
        if self.review_count == 0 {
            return None;
        }
        self.average_rating.map(|avg| (avg * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rounds_to_two_places() {
        let stats = RatingStats {
            review_count: 3,
            average_rating: Some(11.0 / 3.0),
        };
        assert_eq!(stats.rounded_average(), Some(3.67));
    }

    #[test]
    fn no_reviews_no_average() {
        assert_eq!(RatingStats::default().rounded_average(), None);
    }
}
