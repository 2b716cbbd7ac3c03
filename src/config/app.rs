// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sources::SourceKey;

pub const ENV_PATH: &str = "PLAYERINFO_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/playerinfo.toml";
pub const DEFAULT_JSON_PATH: &str = "config/playerinfo.json";

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}
fn default_card_set() -> String {
    "ECL".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source order used when the caller gives none. Earlier sources win conflicts.
    pub priority: Vec<SourceKey>,
    pub http: HttpConfig,
    pub sources: SourcesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            priority: SourceKey::DEFAULT_ORDER.to_vec(),
            http: HttpConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub unity: SiteConfig,
    pub mtgelo: SiteConfig,
    pub melee: SiteConfig,
    pub topdeck: SiteConfig,
    pub untapped: UntappedConfig,
}

/// Per-site override; `None` keeps the adapter's public base URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UntappedConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_card_set")]
    pub card_set: String,
}

impl Default for UntappedConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_url: None,
            card_set: default_card_set(),
        }
    }
}

impl AppConfig {
    fn sanitize(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.priority.len());
        self.priority.retain(|k| {
            if seen.contains(k) {
                false
            } else {
                seen.push(*k);
                true
            }
        });
        if self.priority.is_empty() {
            self.priority = SourceKey::DEFAULT_ORDER.to_vec();
        }
        if self.http.timeout_secs == 0 {
            self.http.timeout_secs = default_timeout_secs();
        }
        if self.http.user_agent.trim().is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.sources.untapped.card_set.trim().is_empty() {
            self.sources.untapped.card_set = default_card_set();
        }
        self
    }
}

/// Load configuration from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing config {}", path.display()))
}

/// Load configuration using explicit path + env var + fallbacks:
/// 1) `explicit` (e.g. `--config`)
/// 2) $PLAYERINFO_CONFIG_PATH
/// 3) config/playerinfo.toml
/// 4) config/playerinfo.json
/// 5) built-in defaults
pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(p) = explicit {
        return load_from(p);
    }
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_JSON_PATH);
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(AppConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(v) = toml::from_str::<AppConfig>(s) {
            return Ok(v.sanitize());
        }
    }
    if let Ok(v) = serde_json::from_str::<AppConfig>(s) {
        return Ok(v.sanitize());
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<AppConfig>(s) {
            return Ok(v.sanitize());
        }
    }
    Err(anyhow!("unsupported config format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_documents_yield_defaults() {
        assert_eq!(parse_config("", "toml").unwrap(), AppConfig::default());
        assert_eq!(parse_config("{}", "json").unwrap(), AppConfig::default());
    }

    #[test]
    fn priority_is_deduplicated() {
        let cfg = parse_config(r#"priority = ["melee", "unity", "melee"]"#, "toml").unwrap();
        assert_eq!(cfg.priority, vec![SourceKey::Melee, SourceKey::Unity]);
    }

    #[test]
    fn nested_overrides_parse() {
        let json = r#"{
            "http": { "timeout_secs": 0, "max_redirects": 2 },
            "sources": { "topdeck": { "base_url": "http://localhost:9" },
                         "untapped": { "card_set": "DSK" } }
        }"#;
        let cfg = parse_config(json, "json").unwrap();
        assert_eq!(cfg.http.timeout_secs, 30);
        assert_eq!(cfg.http.max_redirects, 2);
        assert_eq!(
            cfg.sources.topdeck.base_url.as_deref(),
            Some("http://localhost:9")
        );
        assert_eq!(cfg.sources.untapped.card_set, "DSK");
        assert_eq!(cfg.priority, SourceKey::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn unknown_source_key_is_rejected() {
        assert!(parse_config(r#"priority = ["nope"]"#, "toml").is_err());
    }
}
