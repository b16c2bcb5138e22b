use axum::response::{IntoResponse, Redirect, Response};
use sqlx::PgPool;
use tracing::{info, warn};

use super::repo_types::Review;
use crate::books::{book_path, repo_types::Book};

pub const MISSING_ISBN: &str = "Missing ISBN";
pub const INVALID_RATING: &str = "Rating must be a whole number from 1 to 5";
pub const BOOK_NOT_FOUND: &str = "Book not found";
pub const ALREADY_REVIEWED: &str = "You have already reviewed this book";

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { isbn: String },
    Rejected(&'static str),
}

impl IntoResponse for SubmitOutcome {
    fn into_response(self) -> Response {
        match self {
            SubmitOutcome::Created { isbn } => Redirect::to(&book_path(&isbn)).into_response(),
            SubmitOutcome::Rejected(msg) => msg.into_response(),
        }
    }
}

pub fn parse_rating(raw: Option<&str>) -> Result<i32, &'static str> {
    let rating = raw
        .map(str::trim)
        .and_then(|r| r.parse::<i32>().ok())
        .ok_or(INVALID_RATING)?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(INVALID_RATING);
    }
    Ok(rating)
}

fn normalize_text(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|t| !t.is_empty())
}

/// Store one review per user per book.
///
/// The existence check and the insert are separate statements, so two
/// simultaneous submissions by the same user can both pass the check.
pub async fn submit_review(
    db: &PgPool,
    user_id: i32,
    isbn: &str,
    rating: Option<&str>,
    text: Option<&str>,
) -> anyhow::Result<SubmitOutcome> {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return Ok(SubmitOutcome::Rejected(MISSING_ISBN));
    }
    let rating = match parse_rating(rating) {
        Ok(r) => r,
        Err(msg) => {
            warn!(user_id, %isbn, "rejected review rating");
            return Ok(SubmitOutcome::Rejected(msg));
        }
    };

    if Book::find_by_isbn(db, isbn).await?.is_none() {
        return Ok(SubmitOutcome::Rejected(BOOK_NOT_FOUND));
    }
    if Review::exists_for_user(db, user_id, isbn).await? {
        warn!(user_id, %isbn, "duplicate review");
        return Ok(SubmitOutcome::Rejected(ALREADY_REVIEWED));
    }

    let review = Review::create(db, user_id, isbn, rating, normalize_text(text)).await?;
    info!(review_id = review.id, user_id, isbn = %review.isbn, rating, "review created");
    Ok(SubmitOutcome::Created { isbn: review.isbn })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn rating_must_be_integer_in_range() {
        assert_eq!(parse_rating(Some("1")), Ok(1));
        assert_eq!(parse_rating(Some(" 5 ")), Ok(5));
        assert_eq!(parse_rating(Some("0")), Err(INVALID_RATING));
        assert_eq!(parse_rating(Some("6")), Err(INVALID_RATING));
        assert_eq!(parse_rating(Some("4.5")), Err(INVALID_RATING));
        assert_eq!(parse_rating(Some("")), Err(INVALID_RATING));
        assert_eq!(parse_rating(None), Err(INVALID_RATING));
    }

    #[test]
    fn blank_review_text_is_stored_as_null() {
        assert_eq!(normalize_text(Some("  ")), None);
        assert_eq!(normalize_text(None), None);
        assert_eq!(normalize_text(Some(" Great read ")), Some("Great read"));
    }

    #[test]
    fn created_redirects_to_book_page() {
        let res = SubmitOutcome::Created {
            isbn: "0380795272".into(),
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/book/0380795272");
    }

    #[test]
    fn redirect_survives_odd_isbns() {
        let res = SubmitOutcome::Created {
            isbn: "12 3?x".into(),
        }
        .into_response();
        assert_eq!(res.headers()[header::LOCATION], "/book/12%203%3Fx");
    }

    #[test]
    fn rejection_is_plain_text_ok() {
        let res = SubmitOutcome::Rejected(ALREADY_REVIEWED).into_response();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn validation_happens_before_any_query() {
        // lazy pool: reaching SQL would fail the test with a connection error
        let state = crate::state::AppState::fake();
        let out = submit_review(&state.db, 1, "  ", Some("3"), None).await.unwrap();
        assert_eq!(out, SubmitOutcome::Rejected(MISSING_ISBN));
        let out = submit_review(&state.db, 1, "123", Some("9"), None).await.unwrap();
        assert_eq!(out, SubmitOutcome::Rejected(INVALID_RATING));
    }
}
