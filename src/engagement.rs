//! # Engagement signals
//!
//! One-way seen/like/bookmark dispatches to the personalization backend.
//! Declared best-effort: the caller never awaits success, nothing is
//! retried, and a failed dispatch is dropped after a debug log. These are
//! preference/telemetry signals, not transactional state the UI depends
//! on. No client-side dedup either: repeated clicks produce repeated
//! calls; idempotency, if wanted, belongs to the backend.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

use crate::session::Identity;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "engagement_sent_total",
            "Engagement dispatches acknowledged by the backend."
        );
        describe_counter!(
            "engagement_dropped_total",
            "Engagement dispatches that failed and were dropped."
        );
        describe_counter!(
            "engagement_skipped_total",
            "Engagement calls skipped because no identity was resident."
        );
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Seen,
    Like,
    Bookmark,
}

impl Signal {
    /// Backend path segment for this signal.
    pub fn path(self) -> &'static str {
        match self {
            Signal::Seen => "seen",
            Signal::Like => "like",
            Signal::Bookmark => "bookmark",
        }
    }
}

/// Fire-and-forget dispatcher tied to the current identity.
///
/// Dispatches run as detached tasks; several may be in flight at once
/// with no ordering guarantee between them. Must be used from within a
/// Tokio runtime.
#[derive(Debug, Clone)]
pub struct EngagementClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl EngagementClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn mark_seen(&self, identity: Option<&Identity>, page_id: i64) {
        self.dispatch(Signal::Seen, identity, page_id);
    }

    pub fn like(&self, identity: Option<&Identity>, page_id: i64) {
        self.dispatch(Signal::Like, identity, page_id);
    }

    pub fn bookmark(&self, identity: Option<&Identity>, page_id: i64) {
        self.dispatch(Signal::Bookmark, identity, page_id);
    }

    /// No-op without a resident identity; otherwise launch and forget.
    pub fn dispatch(&self, signal: Signal, identity: Option<&Identity>, page_id: i64) {
        ensure_metrics_described();

        let Some(user) = identity else {
            tracing::debug!(signal = signal.path(), "engagement skipped (no identity)");
            counter!("engagement_skipped_total").increment(1);
            return;
        };

        let url = format!("{}/{}", self.base_url, signal.path());
        let body = serde_json::json!({
            "user_id": user.user_id,
            "page_id": page_id,
        });
        let client = self.client.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let res = client
                .post(&url)
                .timeout(timeout)
                .json(&body)
                .send()
                .await;
            match res {
                Ok(rsp) if rsp.status().is_success() => {
                    counter!("engagement_sent_total").increment(1);
                }
                Ok(rsp) => {
                    tracing::debug!(status = %rsp.status(), url = %url, "engagement dropped");
                    counter!("engagement_dropped_total").increment(1);
                }
                Err(e) => {
                    tracing::debug!(error = %e, url = %url, "engagement dropped");
                    counter!("engagement_dropped_total").increment(1);
                }
            }
        });
    }
}
