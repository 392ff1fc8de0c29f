//! # Allowlist sanitizer
//!
//! The content API returns a rendered HTML fragment that the original
//! client injected verbatim into a trusted render tree. There is no
//! equivalent "trusted raw HTML" primitive here, so this pass is the one
//! place externally-sourced markup is filtered before it can reach an
//! embedder's render tree.
//!
//! Policy: tags outside the allowlist are unwrapped (dropped, text
//! kept), except containers whose text is code or styling; those lose
//! their entire content. Attributes outside the allowlist are dropped;
//! kept values are re-emitted double-quoted and entity-escaped. Comments
//! and declarations are removed.

use once_cell::sync::OnceCell;
use regex::Regex;

pub const ALLOWED_TAGS: &[&str] = &[
    "p", "h2", "h3", "h4", "ul", "ol", "li", "table", "thead", "tbody", "tr", "td", "th", "img",
    "blockquote", "a", "b", "i", "em", "strong", "sup", "sub", "span", "div",
];

pub const ALLOWED_ATTRS: &[&str] = &["href", "src", "alt", "title", "class", "colspan", "rowspan"];

/// Containers whose inner text must not survive tag removal.
const DROP_CONTENT_TAGS: &[&str] = &["script", "style", "iframe", "noscript"];

fn re_comment() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn re_declaration() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?s)<![^>]*>").unwrap())
}

fn re_tag() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    // Quoted sections may contain '>'; the blob alternation keeps them whole.
    RE.get_or_init(|| Regex::new(r#"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>"#).unwrap())
}

fn re_attr() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z][a-zA-Z0-9:-]*)\s*(?:=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+)))?"#)
            .unwrap()
    })
}

/// Reject URL values whose scheme executes. The check runs on the
/// entity-decoded value with whitespace removed, so split-scheme tricks
/// (`java\nscript:`) don't slip through.
fn url_value_is_safe(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !(compact.starts_with("javascript:")
        || compact.starts_with("vbscript:")
        || compact.starts_with("data:"))
}

/// Rebuild an opening tag from its raw attribute blob, keeping only
/// allowlisted attributes.
fn rebuild_open_tag(name: &str, raw_attrs: &str, self_closing: bool, out: &mut String) {
    out.push('<');
    out.push_str(name);
    for caps in re_attr().captures_iter(raw_attrs) {
        let attr_name = caps[1].to_ascii_lowercase();
        if !ALLOWED_ATTRS.contains(&attr_name.as_str()) {
            continue;
        }
        let raw_value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let decoded = html_escape::decode_html_entities(raw_value);
        if matches!(attr_name.as_str(), "href" | "src") && !url_value_is_safe(&decoded) {
            continue;
        }
        out.push(' ');
        out.push_str(&attr_name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(&decoded));
        out.push('"');
    }
    if self_closing {
        out.push_str(" />");
    } else {
        out.push('>');
    }
}

/// Filter an HTML fragment down to the allowlist. Text content between
/// tags passes through verbatim (it is already entity-encoded by the
/// source).
pub fn sanitize_fragment(html: &str) -> String {
    let stripped = re_comment().replace_all(html, "");
    let stripped = re_declaration().replace_all(&stripped, "");

    let mut out = String::with_capacity(stripped.len());
    let mut cursor = 0usize;
    // While set, we are inside a dropped container and emit nothing
    // until its matching close tag name.
    let mut drop_until: Option<String> = None;

    for caps in re_tag().captures_iter(&stripped) {
        let whole = caps.get(0).unwrap();
        if drop_until.is_none() {
            out.push_str(&stripped[cursor..whole.start()]);
        }
        cursor = whole.end();

        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();
        let raw_attrs = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        let self_closing = raw_attrs.trim_end().ends_with('/');

        if let Some(until) = &drop_until {
            if closing && name == *until {
                drop_until = None;
            }
            continue;
        }

        if DROP_CONTENT_TAGS.contains(&name.as_str()) {
            if !closing && !self_closing {
                drop_until = Some(name);
            }
            continue;
        }

        if !ALLOWED_TAGS.contains(&name.as_str()) {
            // Unwrap: the tag goes, its text stays.
            continue;
        }

        if closing {
            out.push_str("</");
            out.push_str(&name);
            out.push('>');
        } else {
            rebuild_open_tag(&name, raw_attrs, self_closing, &mut out);
        }
    }

    if drop_until.is_none() {
        out.push_str(&stripped[cursor..]);
    }
    out
}
