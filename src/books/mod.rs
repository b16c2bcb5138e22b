pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::book_routes())
}

/// Path of a book's page. The ISBN is a single percent-encoded segment.
pub fn book_path(isbn: &str) -> String {
    format!("/book/{}", urlencoding::encode(isbn))
}
