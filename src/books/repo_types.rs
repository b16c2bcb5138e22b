use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry. Written by the importer only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}
