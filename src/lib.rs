//! Book review site: accounts, catalog search, one review per user per book,
//! and a JSON endpoint per ISBN, with metadata from Google Books and a
//! Gemini-written summary of each description.

pub mod app;
pub mod auth;
pub mod books;
pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod import;
pub mod reviews;
pub mod session;
pub mod state;
pub mod views;

pub use app::{build_app, serve};
pub use state::AppState;
