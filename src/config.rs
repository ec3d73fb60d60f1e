// src/config.rs
//! Relay configuration: the remote endpoint and transport parameters, the
//! cache TTL, and (Standalone mode) the host content-store seam.
//!
//! File loading supports TOML or JSON; resolution order is
//! `$NOTICE_RELAY_CONFIG_PATH`, then `config/notice_relay.toml`, then
//! `config/notice_relay.json`, then built-in defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use crate::source::native::ContentStore;

const ENV_PATH: &str = "NOTICE_RELAY_CONFIG_PATH";

pub const DEFAULT_TIMEOUT_MS: u64 = 4_000;
pub const DEFAULT_TTL_SECONDS: u64 = 3_600;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_CONTENT_TYPE: &str = "marketing_message";

#[derive(Clone, serde::Deserialize)]
pub struct RelayConfig {
    /// Remote endpoint; empty disables remote fetching.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Host content type holding natively authored messages.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Wired by the host in code, never from a file.
    #[serde(skip)]
    pub content_store: Option<Arc<dyn ContentStore>>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}
fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            content_type: default_content_type(),
            content_store: None,
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("url", &self.url)
            .field("timeout_ms", &self.timeout_ms)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("max_retries", &self.max_retries)
            .field("content_type", &self.content_type)
            .field("content_store", &self.content_store.is_some())
            .finish()
    }
}

impl RelayConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading relay config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
    }

    /// Load using env var + fallbacks:
    /// 1) $NOTICE_RELAY_CONFIG_PATH
    /// 2) config/notice_relay.toml
    /// 3) config/notice_relay.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("NOTICE_RELAY_CONFIG_PATH points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from("config/notice_relay.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/notice_relay.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    /// Wire the host storage seam (Standalone mode).
    pub fn with_content_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.content_store = Some(store);
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<RelayConfig> {
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported relay config format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_parse_with_defaults() {
        let toml_cfg: RelayConfig =
            parse_config(r#"url = "https://example.test/messages""#, "toml").unwrap();
        assert_eq!(toml_cfg.url, "https://example.test/messages");
        assert_eq!(toml_cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(toml_cfg.max_retries, DEFAULT_MAX_RETRIES);

        let json_cfg: RelayConfig =
            parse_config(r#"{"url":"https://example.test/m","ttl_seconds":60}"#, "json").unwrap();
        assert_eq!(json_cfg.ttl_seconds, 60);
        assert_eq!(json_cfg.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("]][[ not a config", "toml").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_chain_prefers_env_path() {
        let old = std::env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        std::env::remove_var(ENV_PATH);

        // No files anywhere: built-in defaults.
        let v = RelayConfig::load_default().unwrap();
        assert!(v.url.is_empty());
        assert_eq!(v.ttl_seconds, DEFAULT_TTL_SECONDS);

        // Env path wins over fallbacks.
        let p = tmp.path().join("relay.toml");
        fs::write(&p, r#"url = "https://env.test/messages""#).unwrap();
        std::env::set_var(ENV_PATH, p.display().to_string());
        let v2 = RelayConfig::load_default().unwrap();
        assert_eq!(v2.url, "https://env.test/messages");
        std::env::remove_var(ENV_PATH);

        std::env::set_current_dir(&old).unwrap();
    }
}
