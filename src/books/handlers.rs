use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use tracing::{debug, instrument};

use super::{
    dto::{ApiError, SearchForm},
    repo::SEARCH_LIMIT,
    repo_types::Book,
    services::{build_api_book, enrich},
};
use crate::{
    auth::AuthUser,
    error::AppError,
    reviews::{
        dto::ReviewForm,
        repo_types::{RatingStats, Review},
        services::{submit_review, SubmitOutcome},
    },
    state::AppState,
    views::{self, BookView},
};

pub const EMPTY_QUERY: &str = "Please enter a search query";

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_form).post(search))
        .route("/book/:isbn", get(book_page).post(review_book))
        .route("/api/:isbn", get(api_book))
}

pub async fn search_form(AuthUser(_user_id): AuthUser) -> Html<String> {
    Html(views::search_page(None, None))
}

#[instrument(skip(state, form))]
pub async fn search(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let Some(query) = form.query() else {
        return Ok(EMPTY_QUERY.into_response());
    };
    let books = Book::search(&state.db, query, SEARCH_LIMIT).await?;
    debug!(user_id, %query, hits = books.len(), "search");
    Ok(Html(views::search_page(Some(query), Some(books.as_slice()))).into_response())
}

#[instrument(skip(state))]
pub async fn book_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(isbn): Path<String>,
) -> Result<Html<String>, AppError> {
    let book = Book::find_by_isbn(&state.db, &isbn)
        .await?
        .ok_or(AppError::BookNotFound)?;
    let reviews = Review::list_for_book(&state.db, &book.isbn).await?;
    let stats = RatingStats::for_book(&state.db, &book.isbn).await?;
    let enrichment = enrich(
        state.books_api.as_ref(),
        state.summarizer.as_ref(),
        &book.isbn,
    )
    .await;

    let can_review = !reviews.iter().any(|r| r.user_id == user_id);
    Ok(Html(views::book_page(&BookView {
        book: &book,
        reviews: &reviews,
        stats: &stats,
        enrichment: &enrichment,
        can_review,
    })))
}

#[instrument(skip(state, form))]
pub async fn review_book(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(isbn): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<SubmitOutcome, AppError> {
    let outcome = submit_review(
        &state.db,
        user_id,
        &isbn,
        form.rating.as_deref(),
        form.review.as_deref(),
    )
    .await?;
    Ok(outcome)
}

#[instrument(skip(state))]
pub async fn api_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Response, AppError> {
    let Some(book) = Book::find_by_isbn(&state.db, &isbn).await? else {
        let body = ApiError {
            error: "Book not found",
        };
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };
    let stats = RatingStats::for_book(&state.db, &book.isbn).await?;
    let enrichment = enrich(
        state.books_api.as_ref(),
        state.summarizer.as_ref(),
        &book.isbn,
    )
    .await;
    Ok(Json(build_api_book(&book, &stats, &enrichment)).into_response())
}
