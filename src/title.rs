//! # Article titles
//!
//! Wikipedia page titles carry underscores on the wire (routes, API
//! parameters) and spaces for display. The two substitutions are applied
//! independently at each boundary; neither is derived from the other.
//!
//! - Wire form: `Some_Page`, the routing and content-lookup key.
//! - Display form: `Some Page`, anywhere a title is shown to the user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized page-title key. Holds the wire form (underscores).
///
/// Join key between feed cards, bookmarks, and the content pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleRef {
    title: String,
}

impl ArticleRef {
    /// Build from a wire-form name (underscores), e.g. a decoded route
    /// segment or a `/wiki/` link target. Stored as given.
    pub fn from_wire(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Build from a display-form name (spaces).
    pub fn from_display(title: &str) -> Self {
        Self {
            title: title.replace(' ', "_"),
        }
    }

    /// The wire form, underscores intact.
    pub fn wire(&self) -> &str {
        &self.title
    }

    /// The display form: underscores rendered as spaces.
    pub fn display(&self) -> String {
        self.title.replace('_', " ")
    }

    /// The wire form percent-encoded as a single path segment.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.title).into_owned()
    }

    /// Canonical page URL on Wikipedia itself ("view on Wikipedia").
    pub fn canonical_url(&self) -> String {
        format!("https://en.wikipedia.org/wiki/{}", self.title.replace(' ', "_"))
    }

    /// News search URL for the article's subject.
    pub fn news_search_url(&self) -> String {
        format!(
            "https://www.google.com/search?q={}&tbm=nws",
            urlencoding::encode(&self.title)
        )
    }
}

impl fmt::Display for ArticleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_underscores_as_spaces() {
        let r = ArticleRef::from_wire("Abraham_Lincoln");
        assert_eq!(r.display(), "Abraham Lincoln");
        assert_eq!(r.wire(), "Abraham_Lincoln");
    }

    #[test]
    fn each_direction_is_idempotent() {
        // A title containing both spaces and underscores: applying the
        // display transform twice equals applying it once, same for wire.
        let mixed = "Foo_Bar Baz";
        let disp = mixed.replace('_', " ");
        assert_eq!(disp.replace('_', " "), disp);
        let wire = mixed.replace(' ', "_");
        assert_eq!(wire.replace(' ', "_"), wire);
    }

    #[test]
    fn round_trip_resolves_to_same_ref() {
        let original = ArticleRef::from_wire("War_of_1812");
        let through_display = ArticleRef::from_display(&original.display());
        assert_eq!(original, through_display);
    }

    #[test]
    fn encoded_is_a_single_path_segment() {
        let r = ArticleRef::from_wire("AC/DC");
        assert_eq!(r.encoded(), "AC%2FDC");
    }

    #[test]
    fn canonical_url_uses_wire_form() {
        let r = ArticleRef::from_display("Ada Lovelace");
        assert_eq!(
            r.canonical_url(),
            "https://en.wikipedia.org/wiki/Ada_Lovelace"
        );
    }

    #[test]
    fn news_search_url_is_percent_encoded() {
        let r = ArticleRef::from_wire("C++");
        assert_eq!(
            r.news_search_url(),
            "https://www.google.com/search?q=C%2B%2B&tbm=nws"
        );
    }
}
