//! # Link interception
//!
//! The article body is rebuilt on every navigation, so clicks are
//! handled at the container level: one classification point over a
//! virtual anchor index instead of per-link handlers. A click resolves
//! to an intent: stay in the app (internal wiki link) or fall through
//! to whatever the embedder does with ordinary links.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::title::ArticleRef;

/// What a click on an anchor should do.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkIntent {
    /// Internal wiki link: default navigation is prevented and the app
    /// routes to this article.
    Open(ArticleRef),
    /// Anything else keeps the default navigation, href unmodified.
    PassThrough(String),
    /// No href at all; nothing happens.
    Inert,
}

const WIKI_PREFIX: &str = "/wiki/";

/// Strip a trailing fragment, then a trailing query, from a decoded page
/// name. Fragment first: a `?` that precedes the `#` is part of the page
/// name and survives, so `Some_Page#History?x=1` resolves to `Some_Page`
/// while `Some_Page?x=1#History` resolves to `Some_Page?x=1`.
fn strip_fragment_then_query(name: &str) -> &str {
    match name.split_once('#') {
        Some((before, _)) => before,
        None => name.split_once('?').map_or(name, |(before, _)| before),
    }
}

/// Classify one href. Path-relative `/wiki/<pagename>` links are
/// intercepted; external links, fragment-only anchors, and everything
/// else pass through untouched. Namespace-prefixed targets
/// (`Category:`, `File:`, ...) are treated like ordinary articles.
pub fn classify_href(href: &str) -> LinkIntent {
    let Some(rest) = href.strip_prefix(WIKI_PREFIX) else {
        return LinkIntent::PassThrough(href.to_string());
    };

    let decoded = match urlencoding::decode(rest) {
        Ok(cow) => cow.into_owned(),
        // Undecodable percent sequences: leave the link to the default
        // navigation rather than guessing at a page name.
        Err(_) => return LinkIntent::PassThrough(href.to_string()),
    };

    let name = strip_fragment_then_query(&decoded);
    if name.is_empty() {
        return LinkIntent::PassThrough(href.to_string());
    }
    LinkIntent::Open(ArticleRef::from_wire(name))
}

fn re_anchor() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<a\b((?:"[^"]*"|'[^']*'|[^>"'])*)>"#).unwrap())
}

fn re_href() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
    })
}

/// One anchor in the rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
}

/// Virtual anchor-node index over a sanitized body fragment; the
/// delegation analog of a single container click handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentRegion {
    anchors: Vec<Anchor>,
}

impl ContentRegion {
    /// Index every anchor start tag in document order. Hrefs are read
    /// back entity-decoded, as a DOM `getAttribute` would deliver them.
    pub fn index(html: &str) -> Self {
        let anchors = re_anchor()
            .captures_iter(html)
            .map(|caps| {
                let blob = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let href = re_href().captures(blob).map(|h| {
                    let raw = h
                        .get(1)
                        .or_else(|| h.get(2))
                        .or_else(|| h.get(3))
                        .map(|m| m.as_str())
                        .unwrap_or_default();
                    html_escape::decode_html_entities(raw).into_owned()
                });
                Anchor { href }
            })
            .collect();
        Self { anchors }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Classify a click on the `index`-th anchor. Out-of-range clicks
    /// and anchors without an href are inert, never an error.
    pub fn click(&self, index: usize) -> LinkIntent {
        match self.anchors.get(index) {
            Some(Anchor { href: Some(href) }) => classify_href(href),
            Some(Anchor { href: None }) => LinkIntent::Inert,
            None => LinkIntent::Inert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(name: &str) -> LinkIntent {
        LinkIntent::Open(ArticleRef::from_wire(name))
    }

    #[test]
    fn plain_wiki_link_is_intercepted() {
        assert_eq!(classify_href("/wiki/Ada_Lovelace"), open("Ada_Lovelace"));
    }

    #[test]
    fn fragment_is_stripped_before_query() {
        assert_eq!(
            classify_href("/wiki/Some_Page#History?x=1"),
            open("Some_Page")
        );
    }

    #[test]
    fn query_ahead_of_fragment_stays_in_the_name() {
        // Specified, surprising: the '?' precedes the fragment, so it is
        // part of the extracted page name.
        assert_eq!(
            classify_href("/wiki/Some_Page?x=1#History"),
            open("Some_Page?x=1")
        );
    }

    #[test]
    fn bare_query_is_stripped() {
        assert_eq!(classify_href("/wiki/Some_Page?action=edit"), open("Some_Page"));
    }

    #[test]
    fn percent_encoded_names_are_decoded() {
        assert_eq!(
            classify_href("/wiki/Caf%C3%A9_au_lait"),
            open("Café_au_lait")
        );
    }

    #[test]
    fn namespace_links_route_like_articles() {
        assert_eq!(
            classify_href("/wiki/Category:Physics"),
            open("Category:Physics")
        );
        assert_eq!(classify_href("/wiki/File:Sun.jpg"), open("File:Sun.jpg"));
    }

    #[test]
    fn external_and_fragment_links_pass_through() {
        for href in [
            "https://example.org/wiki/Nope",
            "//en.wikipedia.org/wiki/Nope",
            "#cite_note-3",
            "/w/index.php?title=X",
        ] {
            assert_eq!(
                classify_href(href),
                LinkIntent::PassThrough(href.to_string())
            );
        }
    }

    #[test]
    fn empty_page_name_passes_through() {
        assert_eq!(
            classify_href("/wiki/"),
            LinkIntent::PassThrough("/wiki/".to_string())
        );
        assert_eq!(
            classify_href("/wiki/#top"),
            LinkIntent::PassThrough("/wiki/#top".to_string())
        );
    }

    #[test]
    fn region_indexes_anchors_in_document_order() {
        let html = concat!(
            r#"<p><a href="/wiki/First">1</a>"#,
            r#"<a name="x">no href</a>"#,
            r#"<a href="https://example.org">ext</a></p>"#,
        );
        let region = ContentRegion::index(html);
        assert_eq!(region.len(), 3);
        assert_eq!(region.click(0), open("First"));
        assert_eq!(region.click(1), LinkIntent::Inert);
        assert_eq!(
            region.click(2),
            LinkIntent::PassThrough("https://example.org".to_string())
        );
    }

    #[test]
    fn out_of_range_click_is_inert() {
        let region = ContentRegion::index("<p>no links</p>");
        assert_eq!(region.click(0), LinkIntent::Inert);
    }

    #[test]
    fn entity_encoded_href_is_decoded_before_classification() {
        let html = r#"<a href="/wiki/Tom_&amp;_Jerry">toon</a>"#;
        let region = ContentRegion::index(html);
        assert_eq!(region.click(0), open("Tom_&_Jerry"));
    }
}
