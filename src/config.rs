use std::path::PathBuf;
use std::time::Duration;

use crate::identity::ID_LEN;
use crate::slug::MIN_SLUG_LEN;

pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "zettel";
pub const DEFAULT_COLLECTION: &str = "0_reviews";

/// Smallest basename that still fits an identity, a hyphen and a minimum slug.
pub const MIN_BASENAME_LEN: usize = ID_LEN + 1 + MIN_SLUG_LEN;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{flag} must be greater than zero")]
    Zero { flag: &'static str },
    #[error("--max-file must be at least {min} (got {0})", min = MIN_BASENAME_LEN)]
    BasenameTooShort(usize),
    #[error("invalid duration `{0}` (use e.g. 30s, 500ms, 2m)")]
    Duration(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub root: PathBuf,
    pub base_dir: Option<String>,
    pub model: String,
    pub host: String,
    pub max_slug: usize,
    pub max_basename: usize,
    pub excerpt_chars: usize,
    pub timeout: Duration,
    pub apply: bool,
    pub only_readme: bool,
    pub readme_any: bool,
    pub collection: String,
    pub offline: bool,
    pub use_git: bool,
    pub plain: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            base_dir: None,
            model: DEFAULT_MODEL.to_string(),
            host: DEFAULT_HOST.to_string(),
            max_slug: 60,
            max_basename: 90,
            excerpt_chars: 2500,
            timeout: Duration::from_secs(30),
            apply: false,
            only_readme: false,
            readme_any: false,
            collection: DEFAULT_COLLECTION.to_string(),
            offline: false,
            use_git: true,
            plain: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with `ZET_ROOT`, `ZET_MODEL`, `OLLAMA_HOST` and
    /// `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(root) = set("ZET_ROOT") {
            config.root = PathBuf::from(root);
        }
        if let Some(model) = set("ZET_MODEL") {
            config.model = model;
        }
        if let Some(host) = set("OLLAMA_HOST") {
            config.host = normalize_host(&host);
        }
        config.plain = lookup("NO_COLOR").is_some();
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slug == 0 {
            return Err(ConfigError::Zero { flag: "--max-slug" });
        }
        if self.excerpt_chars == 0 {
            return Err(ConfigError::Zero { flag: "--excerpt" });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Zero { flag: "--timeout" });
        }
        if self.max_basename < MIN_BASENAME_LEN {
            return Err(ConfigError::BasenameTooShort(self.max_basename));
        }
        Ok(())
    }

    /// Directory notes are collected from and renamed into.
    pub fn work_root(&self) -> PathBuf {
        match self.base_dir.as_deref().filter(|d| !d.is_empty()) {
            Some(sub) => self.root.join(sub),
            None => self.root.clone(),
        }
    }

    /// Whether this run targets the review collection, where notes are named
    /// after their directory.
    pub fn in_review_collection(&self) -> bool {
        self.readme_any && self.base_dir.as_deref() == Some(self.collection.as_str())
    }
}

/// `OLLAMA_HOST` is often given as a bare `host:port`.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Parse `30s`, `500ms`, `2m` or bare seconds.
pub fn parse_duration(text: &str) -> Result<Duration, ConfigError> {
    let t = text.trim();
    let bad = || ConfigError::Duration(text.to_string());
    let (num, unit) = match t.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => t.split_at(idx),
        None => (t, "s"),
    };
    let n: u64 = num.parse().map_err(|_| bad())?;
    match unit {
        "ms" => Ok(Duration::from_millis(n)),
        "s" => Ok(Duration::from_secs(n)),
        "m" => Ok(Duration::from_secs(n.checked_mul(60).ok_or_else(bad)?)),
        _ => Err(bad()),
    }
}
