use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub query: Option<String>,
}

impl SearchForm {
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Body of `GET /api/<isbn>`.
#[derive(Debug, Serialize, PartialEq)]
pub struct ApiBook {
    pub title: String,
    pub author: String,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    #[serde(rename = "ISBN_10")]
    pub isbn_10: Option<String>,
    #[serde(rename = "ISBN_13")]
    pub isbn_13: Option<String>,
    #[serde(rename = "reviewCount")]
    pub review_count: i64,
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f64>,
    #[serde(rename = "summarizedDescription")]
    pub summarized_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
}
