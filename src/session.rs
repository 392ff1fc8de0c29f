//! # Session store
//!
//! Single-slot persisted identity record. Every screen except login gates
//! on it at mount; its absence is the canonical logged-out state.
//!
//! Trust boundary, not a security mechanism: there is no server-enforced
//! session, so possession of a readable identity record is sufficient to
//! act as that user. The backend is trusted to have validated credentials
//! at login/signup time.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fixed well-known file name for the persisted record.
pub const SESSION_FILE: &str = "user.json";

/// Minimal authenticated-user record held client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Reads/writes/clears the one persisted [`Identity`] slot.
///
/// All access happens on the driving thread; the slot has a single writer
/// (login/signup) and a single clearer (logout), so no locking is needed.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Deserialize the persisted record. Missing or malformed input is
    /// treated as absent; this never raises to the caller.
    pub fn load(&self) -> Option<Identity> {
        match fs::read_to_string(&self.path) {
            Ok(s) => serde_json::from_str(&s).ok(),
            Err(_) => None,
        }
    }

    /// Serialize and persist, overwriting any prior value.
    pub fn save(&self, identity: &Identity) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating state dir {}", dir.display()))?;
        }
        let body = serde_json::to_vec_pretty(identity).context("serializing identity")?;
        fs::write(&self.path, body)
            .with_context(|| format!("writing session to {}", self.path.display()))
    }

    /// Remove the persisted value unconditionally. A failed removal is
    /// logged and swallowed; the next `load` decides what's resident.
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, "clearing session failed");
            }
        }
    }

    /// Per-screen guard: returns the resident identity, or invokes
    /// `on_missing` (navigate to login) and returns `None`. Callers must
    /// render nothing further (and issue no screen-tied network calls)
    /// until an identity exists.
    pub fn require_or_redirect<F: FnOnce()>(&self, on_missing: F) -> Option<Identity> {
        match self.load() {
            Some(identity) => Some(identity),
            None => {
                on_missing();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        (dir, store)
    }

    fn ada() -> Identity {
        Identity {
            user_id: 7,
            username: "ada".into(),
        }
    }

    #[test]
    fn load_missing_is_absent() {
        let (_dir, s) = store();
        assert_eq!(s.load(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, s) = store();
        s.save(&ada()).unwrap();
        assert_eq!(s.load(), Some(ada()));
    }

    #[test]
    fn save_overwrites_prior_value() {
        let (_dir, s) = store();
        s.save(&ada()).unwrap();
        let grace = Identity {
            user_id: 8,
            username: "grace".into(),
        };
        s.save(&grace).unwrap();
        assert_eq!(s.load(), Some(grace));
    }

    #[test]
    fn malformed_record_is_absent() {
        let (dir, s) = store();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert_eq!(s.load(), None);
    }

    #[test]
    fn clear_removes_slot_and_tolerates_absence() {
        let (_dir, s) = store();
        s.save(&ada()).unwrap();
        s.clear();
        assert_eq!(s.load(), None);
        s.clear(); // already gone: no-op
    }

    #[test]
    fn guard_redirects_when_absent() {
        let (_dir, s) = store();
        let mut redirected = false;
        let got = s.require_or_redirect(|| redirected = true);
        assert!(got.is_none());
        assert!(redirected);
    }

    #[test]
    fn guard_passes_identity_through_without_redirect() {
        let (_dir, s) = store();
        s.save(&ada()).unwrap();
        let mut redirected = false;
        let got = s.require_or_redirect(|| redirected = true);
        assert_eq!(got, Some(ada()));
        assert!(!redirected);
    }
}
