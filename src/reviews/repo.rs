use sqlx::PgPool;

use super::repo_types::{RatingStats, Review, ReviewWithAuthor};

impl Review {
    pub async fn exists_for_user(db: &PgPool, user_id: i32, isbn: &str) -> anyhow::Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reviews WHERE user_id = $1 AND isbn = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(isbn)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }

    pub async fn create(
        db: &PgPool,
        user_id: i32,
        isbn: &str,
        rating: i32,
        review: Option<&str>,
    ) -> anyhow::Result<Review> {
        let row = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, isbn, rating, review)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, isbn, rating, review, created_at
            "#,
        )
        .bind(user_id)
        .bind(isbn)
        .bind(rating)
        .bind(review)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Newest first.
    pub async fn list_for_book(db: &PgPool, isbn: &str) -> anyhow::Result<Vec<ReviewWithAuthor>> {
        let rows = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.user_id, u.username, r.rating, r.review, r.created_at
              FROM reviews r
              JOIN users u ON u.id = r.user_id
             WHERE r.isbn = $1
             ORDER BY r.created_at DESC
            "#,
        )
        .bind(isbn)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl RatingStats {
    pub async fn for_book(db: &PgPool, isbn: &str) -> anyhow::Result<RatingStats> {
        let stats = sqlx::query_as::<_, RatingStats>(
            r#"
            SELECT COUNT(*) AS review_count,
                   AVG(rating)::FLOAT8 AS average_rating
              FROM reviews
             WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_one(db)
        .await?;
        Ok(stats)
    }
}
