use tracing::warn;

use super::{dto::ApiBook, repo_types::Book};
use crate::enrich::{BookMetadataClient, Summarizer, VolumeInfo};
use crate::reviews::repo_types::RatingStats;

/// Third-party data for one book. Either half may be missing.
#[derive(Debug, Default)]
pub struct Enrichment {
    pub volume: Option<VolumeInfo>,
    pub summary: Option<String>,
}

/// Look the book up on the metadata service, then summarize its description.
/// Failures are logged and leave the corresponding field empty.
pub async fn enrich(
    books_api: &dyn BookMetadataClient,
    summarizer: &dyn Summarizer,
    isbn: &str,
) -> Enrichment {
    let volume = match books_api.lookup_isbn(isbn).await {
        Ok(volume) => volume,
        Err(e) => {
            let error = format!("{e:#}");
            warn!(%error, %isbn, "book metadata lookup failed");
            None
        }
    };

    let description = volume
        .as_ref()
        .and_then(|v| v.description.as_deref())
        .filter(|d| !d.trim().is_empty());

    let summary = match description {
        Some(text) => match summarizer.summarize(text).await {
            Ok(summary) => summary,
            Err(e) => {
                let error = format!("{e:#}");
                warn!(%error, %isbn, "description summary failed");
                None
            }
        },
        None => None,
    };

    Enrichment { volume, summary }
}

fn isbn_of_len(isbn: &str, len: usize) -> Option<String> {
    (isbn.len() == len).then(|| isbn.to_string())
}

pub fn build_api_book(book: &Book, stats: &RatingStats, enrichment: &Enrichment) -> ApiBook {
    let volume = enrichment.volume.as_ref();
    ApiBook {
        title: book.title.clone(),
        author: book.author.clone(),
        published_date: volume
            .and_then(|v| v.published_date.clone())
            .or_else(|| Some(book.year.to_string())),
        isbn_10: volume
            .and_then(|v| v.identifier("ISBN_10"))
            .map(str::to_string)
            .or_else(|| isbn_of_len(&book.isbn, 10)),
        isbn_13: volume
            .and_then(|v| v.identifier("ISBN_13"))
            .map(str::to_string)
            .or_else(|| isbn_of_len(&book.isbn, 13)),
        review_count: stats.review_count,
        average_rating: stats.rounded_average(),
        summarized_description: enrichment.summary.clone(),
    }
}
