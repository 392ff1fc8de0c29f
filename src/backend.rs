//! # Personalization backend client
//!
//! Typed client for the opaque backend: login/signup, the feed, and the
//! bookmark list. Engagement POSTs live in [`crate::engagement`] because
//! their best-effort contract is different.
//!
//! Login/signup rejections carry the backend's error text verbatim; the
//! caller shows it to the user as-is. Everything else returns
//! `anyhow::Result` and the screens decide how to absorb failures.

use std::fmt;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::session::Identity;

/// Card produced by the feed endpoint. Immutable on the client; the list
/// is replaced wholesale on refetch, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCard {
    pub page_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub source: CardSource,
}

/// Which half of the ranking produced a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSource {
    Taste,
    Explore,
}

/// One saved article, scoped to an identity. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub page_id: i64,
    pub title: String,
}

/// Login/signup outcome the screen must distinguish: a structured
/// rejection (shown verbatim) vs transport noise (absorbed).
#[derive(Debug)]
pub enum CredentialError {
    /// Backend returned non-2xx with an error body; text is user-visible.
    Rejected(String),
    /// Network/parse failure; never shown as a backend message.
    Transport(anyhow::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Rejected(msg) => write!(f, "rejected: {msg}"),
            CredentialError::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl std::error::Error for CredentialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CredentialError::Rejected(_) => None,
            CredentialError::Transport(e) => e.source(),
        }
    }
}

#[derive(Deserialize)]
struct AuthOk {
    user_id: i64,
}

/// Pull the user-visible message out of a rejection body. A body without
/// an `error` field falls back to a generic line.
fn rejection_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrBody {
        #[serde(default)]
        error: Option<String>,
    }
    serde_json::from_str::<ErrBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "Something went wrong".to_string())
}

#[derive(Debug, Clone)]
pub struct PoolClient {
    base_url: String,
    client: Client,
}

impl PoolClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub async fn login(&self, username: &str, dob: &str) -> Result<Identity, CredentialError> {
        self.authenticate("login", username, dob).await
    }

    pub async fn signup(&self, username: &str, dob: &str) -> Result<Identity, CredentialError> {
        self.authenticate("signup", username, dob).await
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        dob: &str,
    ) -> Result<Identity, CredentialError> {
        let url = format!("{}/{}", self.base_url, path);
        let body = serde_json::json!({ "username": username, "dob": dob });

        let rsp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CredentialError::Transport(anyhow::Error::new(e).context("auth post")))?;

        let status = rsp.status();
        let text = rsp
            .text()
            .await
            .map_err(|e| CredentialError::Transport(anyhow::Error::new(e).context("auth body")))?;

        if !status.is_success() {
            return Err(CredentialError::Rejected(rejection_message(&text)));
        }

        let ok: AuthOk = serde_json::from_str(&text).map_err(|e| {
            CredentialError::Transport(anyhow::Error::new(e).context("parse auth JSON"))
        })?;
        Ok(Identity {
            user_id: ok.user_id,
            username: username.to_string(),
        })
    }

    pub async fn feed(&self, user_id: i64) -> Result<Vec<FeedCard>> {
        let url = format!("{}/feed?user_id={}", self.base_url, user_id);
        let rsp = self
            .client
            .get(&url)
            .send()
            .await
            .context("fetch feed")?
            .error_for_status()
            .context("feed non-2xx")?;
        rsp.json().await.context("parse feed JSON")
    }

    pub async fn bookmarks(&self, user_id: i64) -> Result<Vec<Bookmark>> {
        let url = format!("{}/bookmarks?user_id={}", self.base_url, user_id);
        let rsp = self
            .client
            .get(&url)
            .send()
            .await
            .context("fetch bookmarks")?
            .error_for_status()
            .context("bookmarks non-2xx")?;
        rsp.json().await.context("parse bookmarks JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_card_parses_with_optional_fields_missing() {
        let json = r#"{"page_id": 3, "title": "Ada_Lovelace", "source": "taste"}"#;
        let card: FeedCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.page_id, 3);
        assert_eq!(card.source, CardSource::Taste);
        assert_eq!(card.summary, None);
    }

    #[test]
    fn feed_card_parses_fully_populated() {
        let json = r#"{
            "page_id": 9,
            "title": "Rust_(programming_language)",
            "display_title": "Rust (programming language)",
            "summary": "A systems language.",
            "image": "https://example.org/rust.png",
            "link": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "source": "explore"
        }"#;
        let card: FeedCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.source, CardSource::Explore);
        assert_eq!(card.display_title.as_deref(), Some("Rust (programming language)"));
    }

    #[test]
    fn bookmark_list_parses() {
        let json = r#"[{"page_id": 1, "title": "A"}, {"page_id": 2, "title": "B"}]"#;
        let list: Vec<Bookmark> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].title, "B");
    }

    #[test]
    fn rejection_message_is_verbatim() {
        assert_eq!(
            rejection_message(r#"{"error": "username taken"}"#),
            "username taken"
        );
    }

    #[test]
    fn rejection_without_error_field_falls_back() {
        assert_eq!(rejection_message(r#"{}"#), "Something went wrong");
        assert_eq!(rejection_message("not json"), "Something went wrong");
    }
}
