// src/content/mod.rs
pub mod links;
pub mod sanitize;
pub mod source;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::title::ArticleRef;
pub use links::{classify_href, Anchor, ContentRegion, LinkIntent};
pub use sanitize::sanitize_fragment;
pub use source::{ContentSource, FixtureSource, ParsedPage, WikipediaSource};

/// One-time metrics registration (so series show up for any installed recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("content_loads_total", "Articles fetched, sanitized and indexed.");
        describe_counter!(
            "content_load_failures_total",
            "Article loads that failed at the fetch stage."
        );
        describe_histogram!(
            "content_sanitize_ms",
            "Sanitize + anchor-index time in milliseconds."
        );
    });
}

/// A loaded, navigable article: sanitized body plus the anchor index the
/// click handler consults. `page_id` comes from the parse envelope and
/// keys engagement signals.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDocument {
    pub page: ArticleRef,
    pub page_id: Option<i64>,
    pub body_html: String,
    pub region: ContentRegion,
}

/// Fetch, sanitize and index one article.
///
/// Any fetch-stage failure (non-success status, transport error, parse
/// error) is terminal for this load: no HTML is produced, and the caller
/// is expected to sit in its error/loading state until the user
/// re-navigates. There is no retry.
pub async fn load_article(
    source: &dyn ContentSource,
    page: &ArticleRef,
) -> anyhow::Result<ArticleDocument> {
    ensure_metrics_described();

    let parsed = match source.fetch_page(page).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = ?e, source = source.name(), page = page.wire(), "content load failed");
            counter!("content_load_failures_total").increment(1);
            return Err(e);
        }
    };

    let t0 = std::time::Instant::now();
    let body_html = sanitize_fragment(&parsed.text);
    let region = ContentRegion::index(&body_html);
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("content_sanitize_ms").record(ms);
    counter!("content_loads_total").increment(1);

    Ok(ArticleDocument {
        page: page.clone(),
        page_id: parsed.page_id,
        body_html,
        region,
    })
}
