//! Guardian content API source.
//!
//! Fetches `/search` results as JSON and converts them into [`NewsItem`]s.
//! Parsing is split out into [`GuardianSource::parse_response`] so tests can
//! exercise it without the network.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::{NewsItem, NewsSource, Query};

#[derive(Debug, Deserialize)]
struct Envelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    results: Vec<ContentResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentResult {
    id: String,
    #[serde(default)]
    section_name: Option<String>,
    web_publication_date: String,
    web_title: String,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default)]
    fields: Fields,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Default, Deserialize)]
struct Fields {
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    headline: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tag {
    #[serde(rename = "type")]
    kind: String,
    web_title: String,
}

/// The Guardian `/search` endpoint.
pub struct GuardianSource {
    client: reqwest::blocking::Client,
    label: String,
}

impl GuardianSource {
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            label: label.into(),
        })
    }

    /// Parse a `/search` response body.
    ///
    /// Order is preserved.  The headline falls back to `webTitle` when the
    /// `headline` field was not returned, and the author is the first
    /// contributor tag.
    pub fn parse_response(body: &str) -> Result<Vec<NewsItem>> {
        let envelope: Envelope =
            serde_json::from_str(body).context("malformed search response")?;
        let response = envelope.response;

        if response.status != "ok" {
            bail!(
                "search failed: {}",
                response.message.as_deref().unwrap_or(&response.status)
            );
        }

        let items = response
            .results
            .into_iter()
            .map(|result| {
                let author = result
                    .tags
                    .into_iter()
                    .find(|tag| tag.kind == "contributor")
                    .map(|tag| tag.web_title);

                let headline = result.fields.headline.unwrap_or(result.web_title);
                NewsItem {
                    section: result.section_name,
                    thumbnail: result.fields.thumbnail,
                    author,
                    url: result.web_url,
                    ..NewsItem::new(result.id, headline, result.web_publication_date)
                }
            })
            .collect();

        Ok(items)
    }
}

impl NewsSource for GuardianSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self, query: &Query) -> Result<Vec<NewsItem>> {
        let body = self
            .client
            .get(query.as_str())
            .send()?
            .error_for_status()?
            .text()?;
        Self::parse_response(&body)
    }
}
