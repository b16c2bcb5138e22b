use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Summarizer;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

fn prompt(description: &str) -> String {
    format!(
        "Summarize the following book description in no more than 50 words. \
         Reply with the summary only.\n\n{description}"
    )
}

pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: super::http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, text: &str) -> anyhow::Result<Option<String>> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("GEMINI_API_KEY not set; skipping summary");
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        // the key travels as a query parameter, keep it out of logs
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(%url, model = %self.model, "requesting summary");

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt(text) }],
            }],
        };
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("gemini request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("gemini returned {status}: {body}");
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("decode gemini response")?;
        Ok(parsed.first_text())
    }
}
