//! Layered configuration for the dashboard.
//!
//! Settings come from a TOML file (default `trackdash.toml`), with
//! environment overrides for the tracker credentials and CLI flag overrides
//! for the listen address. A `.env` file is honored for the credentials.
//!
//! # Configuration file format
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1"
//! port = 3720
//!
//! [tracker]
//! base_url = "http://tracker.example:9000"
//! user = "reporter"
//! page_size = 1000
//! epic_link_field = "customfield_10008"
//! target_version_field = "customfield_10007"
//!
//! [cache]
//! capacity = 256
//! ttl_secs = 300
//!
//! [report]
//! done_status = "Done"
//! epic_completion = "story-completion"
//! board_filter = "SDK board"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), port: default_port() }
    }
}

/// Upstream tracker connection settings. Credentials normally come from the
/// `TRACKER_URL` / `TRACKER_USER` / `TRACKER_TOKEN` environment variables
/// rather than the file.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub token: String,
    /// Result-count ceiling per query.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Site-specific custom field carrying the epic link on stories.
    #[serde(default = "default_epic_link_field")]
    pub epic_link_field: String,
    /// Site-specific custom field carrying the target version on epics.
    #[serde(default = "default_target_version_field")]
    pub target_version_field: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user: String::new(),
            token: String::new(),
            page_size: default_page_size(),
            epic_link_field: default_epic_link_field(),
            target_version_field: default_target_version_field(),
        }
    }
}

/// Query cache bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Entries older than this are refetched. Absent means entries never
    /// expire within the process lifetime.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: default_cache_capacity(), ttl_secs: None }
    }
}

/// When an epic counts as completed in the epic statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EpicCompletionPolicy {
    /// Completed when every linked story is done (an epic with zero linked
    /// stories is incomplete).
    #[default]
    StoryCompletion,
    /// Completed when the epic's own status equals the done status.
    EpicStatus,
}

impl std::str::FromStr for EpicCompletionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "story-completion" => Ok(EpicCompletionPolicy::StoryCompletion),
            "epic-status" => Ok(EpicCompletionPolicy::EpicStatus),
            _ => anyhow::bail!(
                "Invalid epic completion policy '{}'. Valid values: story-completion, epic-status",
                s
            ),
        }
    }
}

/// Report semantics.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Status name that marks a story or epic as done.
    #[serde(default = "default_done_status")]
    pub done_status: String,
    #[serde(default)]
    pub epic_completion: EpicCompletionPolicy,
    /// Substring used to pick the project's board by name containment.
    /// Unset means the project name itself is used.
    #[serde(default)]
    pub board_filter: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            done_status: default_done_status(),
            epic_completion: EpicCompletionPolicy::default(),
            board_filter: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load from a TOML file if it exists, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Environment wins over the file for the tracker connection.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("TRACKER_URL") {
            self.tracker.base_url = url;
        }
        if let Ok(user) = std::env::var("TRACKER_USER") {
            self.tracker.user = user;
        }
        if let Ok(token) = std::env::var("TRACKER_TOKEN") {
            self.tracker.token = token;
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3720
}

fn default_page_size() -> u32 {
    1000
}

fn default_epic_link_field() -> String {
    "customfield_10008".to_string()
}

fn default_target_version_field() -> String {
    "customfield_10007".to_string()
}

fn default_cache_capacity() -> usize {
    256
}

fn default_done_status() -> String {
    "Done".to_string()
}
