use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BookMetadataClient;

/// `volumeInfo` block of a Google Books volume. Only the fields the book page
/// and the JSON API use are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

impl VolumeInfo {
    /// Identifier of the given kind, e.g. `ISBN_10` or `ISBN_13`.
    pub fn identifier(&self, kind: &str) -> Option<&str> {
        self.industry_identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.as_str())
    }

    pub fn thumbnail(&self) -> Option<&str> {
        let links = self.image_links.as_ref()?;
        links
            .thumbnail
            .as_deref()
            .or(links.small_thumbnail.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

impl VolumesResponse {
    fn into_first(self) -> Option<VolumeInfo> {
        self.items.into_iter().next().map(|v| v.volume_info)
    }
}

pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleBooksClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: super::http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BookMetadataClient for GoogleBooksClient {
    async fn lookup_isbn(&self, isbn: &str) -> anyhow::Result<Option<VolumeInfo>> {
        let url = format!("{}/volumes", self.base_url);
        debug!(%isbn, %url, "querying google books");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", format!("isbn:{isbn}"))])
            .send()
            .await
            .context("google books request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("google books returned {status}: {body}");
        }

        let body: VolumesResponse = response
            .json()
            .await
            .context("decode google books response")?;
        Ok(body.into_first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 1,
        "items": [{
            "id": "abc",
            "volumeInfo": {
                "title": "The Dark Is Rising",
                "authors": ["Susan Cooper"],
                "publishedDate": "1973",
                "description": "Will Stanton discovers he is the last of the Old Ones.",
                "industryIdentifiers": [
                    {"type": "ISBN_10", "identifier": "0689829833"},
                    {"type": "ISBN_13", "identifier": "9780689829833"}
                ],
                "averageRating": 4.5,
                "ratingsCount": 12,
                "imageLinks": {"smallThumbnail": "http://img/small", "thumbnail": "http://img/t"}
            }
        }]
    }"#;

    #[test]
    fn parses_first_volume() {
        let body: VolumesResponse = serde_json::from_str(SAMPLE).unwrap();
        let info = body.into_first().expect("one volume");
        assert_eq!(info.title.as_deref(), Some("The Dark Is Rising"));
        assert_eq!(info.authors, vec!["Susan Cooper".to_string()]);
        assert_eq!(info.published_date.as_deref(), Some("1973"));
        assert_eq!(info.identifier("ISBN_10"), Some("0689829833"));
        assert_eq!(info.identifier("ISBN_13"), Some("9780689829833"));
        assert_eq!(info.ratings_count, Some(12));
        assert_eq!(info.thumbnail(), Some("http://img/t"));
    }

    #[test]
    fn no_items_means_unknown_book() {
        let body: VolumesResponse =
            serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
        assert!(body.into_first().is_none());
    }

    #[test]
    fn sparse_volume_info_still_parses() {
        let body: VolumesResponse =
            serde_json::from_str(r#"{"items":[{"volumeInfo":{"title":"Untitled"}}]}"#).unwrap();
        let info = body.into_first().unwrap();
        assert!(info.authors.is_empty());
        assert_eq!(info.identifier("ISBN_13"), None);
        assert_eq!(info.thumbnail(), None);
    }
}
