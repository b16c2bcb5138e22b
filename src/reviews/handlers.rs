use axum::{extract::State, routing::post, Form, Router};
use tracing::instrument;

use super::{
    dto::ReviewForm,
    services::{submit_review, SubmitOutcome},
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn review_routes() -> Router<AppState> {
    Router::new().route("/review", post(create_review))
}

#[instrument(skip(state, form))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<ReviewForm>,
) -> Result<SubmitOutcome, AppError> {
    let isbn = form.isbn.unwrap_or_default();
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
