// src/content/source.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::title::ArticleRef;

/// Rendered-HTML payload for one page, as the content API's parse
/// envelope delivers it. `page_id` is the canonical numeric identifier
/// engagement signals are keyed by.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedPage {
    pub title: String,
    #[serde(rename = "pageid", default)]
    pub page_id: Option<i64>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ParseEnvelope {
    parse: ParsedPage,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the rendered HTML body for a page. A non-success status or a
    /// transport/parse failure is a hard error for that load; there is no
    /// retry and no partial result.
    async fn fetch_page(&self, page: &ArticleRef) -> Result<ParsedPage>;
    fn name(&self) -> &'static str;
}

/// Live source backed by the Wikipedia action API.
pub struct WikipediaSource {
    api_url: String,
    client: reqwest::Client,
}

impl WikipediaSource {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentSource for WikipediaSource {
    async fn fetch_page(&self, page: &ArticleRef) -> Result<ParsedPage> {
        let rsp = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "parse"),
                ("format", "json"),
                ("page", page.wire()),
                ("prop", "text"),
                ("formatversion", "2"),
                ("origin", "*"),
            ])
            .send()
            .await
            .context("content api request")?
            .error_for_status()
            .context("content api non-2xx")?;

        let envelope: ParseEnvelope = rsp.json().await.context("content api JSON")?;
        Ok(envelope.parse)
    }

    fn name(&self) -> &'static str {
        "wikipedia"
    }
}

/// Source that serves a canned parse envelope (JSON fixture). Used by
/// tests and the demo when offline.
pub struct FixtureSource {
    envelope_json: String,
}

impl FixtureSource {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            envelope_json: content.to_string(),
        }
    }
}

#[async_trait]
impl ContentSource for FixtureSource {
    async fn fetch_page(&self, _page: &ArticleRef) -> Result<ParsedPage> {
        let envelope: ParseEnvelope =
            serde_json::from_str(&self.envelope_json).context("parsing fixture envelope")?;
        Ok(envelope.parse)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
