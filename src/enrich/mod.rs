//! Third-party lookups shown next to a catalog entry: Google Books volume
//! metadata and a Gemini summary of the volume description.
//!
//! Both sit behind traits so handlers can be exercised with fakes. Neither
//! retries nor caches; callers treat an error as "no data".

use async_trait::async_trait;

pub mod gemini;
pub mod google_books;

pub use gemini::GeminiClient;
pub use google_books::{GoogleBooksClient, IndustryIdentifier, VolumeInfo};

const USER_AGENT: &str = concat!("bookreview/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait BookMetadataClient: Send + Sync {
    /// First volume matching `isbn`, or `None` when the service knows no such book.
    async fn lookup_isbn(&self, isbn: &str) -> anyhow::Result<Option<VolumeInfo>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short summary of `text`, or `None` when summarization is disabled.
    async fn summarize(&self, text: &str) -> anyhow::Result<Option<String>>;
}

fn http_client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}
