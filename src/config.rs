// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_BACKEND_URL: &str = "POOL_BACKEND_URL";
pub const ENV_WIKI_API_URL: &str = "POOL_WIKI_API_URL";
pub const ENV_STATE_DIR: &str = "POOL_STATE_DIR";

const DEFAULT_BACKEND_URL: &str = "https://thecodeworks.in/pool";
const DEFAULT_WIKI_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_STATE_DIR: &str = "state";

/// External endpoints and the local state directory.
///
/// Resolution order per field: environment variable, then
/// `config/endpoints.toml`, then `config/endpoints.json`, then the
/// built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_wiki_api_url() -> String {
    DEFAULT_WIKI_API_URL.to_string()
}

fn default_state_dir() -> String {
    DEFAULT_STATE_DIR.to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            wiki_api_url: default_wiki_api_url(),
            state_dir: default_state_dir(),
        }
    }
}

impl Endpoints {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading endpoints from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_endpoints(&content, ext.as_str())
    }

    /// Load using file fallbacks, then apply env overrides on top:
    /// 1) config/endpoints.toml
    /// 2) config/endpoints.json
    /// 3) built-in defaults
    pub fn load_default() -> Self {
        let base = [
            PathBuf::from("config/endpoints.toml"),
            PathBuf::from("config/endpoints.json"),
        ]
        .iter()
        .find(|p| p.exists())
        .and_then(|p| Self::load_from(p).ok())
        .unwrap_or_default();
        base.apply_env()
    }

    fn apply_env(mut self) -> Self {
        if let Ok(v) = std::env::var(ENV_BACKEND_URL) {
            if !v.trim().is_empty() {
                self.backend_url = v;
            }
        }
        if let Ok(v) = std::env::var(ENV_WIKI_API_URL) {
            if !v.trim().is_empty() {
                self.wiki_api_url = v;
            }
        }
        if let Ok(v) = std::env::var(ENV_STATE_DIR) {
            if !v.trim().is_empty() {
                self.state_dir = v;
            }
        }
        self
    }
}

fn parse_endpoints(s: &str, hint_ext: &str) -> Result<Endpoints> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("backend_url =");
    if try_toml {
        if let Ok(v) = toml::from_str::<Endpoints>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<Endpoints>(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<Endpoints>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported endpoints format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let toml = r#"backend_url = "http://127.0.0.1:8000/pool""#;
        let e = parse_endpoints(toml, "toml").unwrap();
        assert_eq!(e.backend_url, "http://127.0.0.1:8000/pool");
        assert_eq!(e.wiki_api_url, DEFAULT_WIKI_API_URL);
        assert_eq!(e.state_dir, DEFAULT_STATE_DIR);
    }

    #[test]
    fn both_formats_parse() {
        let toml = r#"
backend_url = "http://a/pool"
state_dir = "tmp-state"
"#;
        let json = r#"{"wiki_api_url": "http://b/w/api.php"}"#;
        let t = parse_endpoints(toml, "toml").unwrap();
        assert_eq!(t.backend_url, "http://a/pool");
        assert_eq!(t.state_dir, "tmp-state");
        let j = parse_endpoints(json, "json").unwrap();
        assert_eq!(j.wiki_api_url, "http://b/w/api.php");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_endpoints("][ nope", "cfg").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_win_over_files() {
        // Isolate CWD so a real config/ in the repo can't interfere.
        let old = std::env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        std::env::remove_var(ENV_BACKEND_URL);
        std::env::remove_var(ENV_WIKI_API_URL);
        std::env::remove_var(ENV_STATE_DIR);

        // No files, no env: built-in defaults.
        let e = Endpoints::load_default();
        assert_eq!(e, Endpoints::default());

        // File provides a base...
        fs::create_dir_all("config").unwrap();
        fs::write(
            "config/endpoints.json",
            r#"{"backend_url": "http://file/pool"}"#,
        )
        .unwrap();
        let e = Endpoints::load_default();
        assert_eq!(e.backend_url, "http://file/pool");

        // ...and env wins on top of it.
        std::env::set_var(ENV_BACKEND_URL, "http://env/pool");
        let e = Endpoints::load_default();
        assert_eq!(e.backend_url, "http://env/pool");
        std::env::remove_var(ENV_BACKEND_URL);

        std::env::set_current_dir(&old).unwrap();
    }
}
