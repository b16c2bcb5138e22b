use serde::Deserialize;

/// Review form. `isbn` is only sent to `POST /review`; the book page takes it
/// from the path.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub isbn: Option<String>,
    pub rating: Option<String>,
    pub review: Option<String>,
}
