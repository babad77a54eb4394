use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::{FetchOptions, RedirectPolicy};

/// Hosts trusted to serve profile images when no config overrides them.
pub const DEFAULT_ALLOWED_HOSTS: [&str; 4] = [
    "imgur.com",
    "i.imgur.com",
    "images.unsplash.com",
    "cdn.pixabay.com",
];

/// Probe pattern that marks an SSRF-challenge solve attempt.
pub const DEFAULT_PROBE_PATTERN: &str = "solve/challenges/server-side";

/// Outbound fetch parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connect timeout in seconds. None leaves libcurl's default in place.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Whole-transfer timeout in seconds. None means no limit.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Follow 3xx responses, re-validating every hop against the allowlist.
    /// When false any redirect is a fetch failure.
    #[serde(default)]
    pub follow_redirects: bool,
    /// Maximum number of redirect hops when `follow_redirects` is set.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    /// Body chunks buffered between the transfer thread and the writer.
    #[serde(default = "default_chunk_buffer")]
    pub chunk_buffer: usize,
}

fn default_max_redirects() -> u32 {
    5
}

fn default_chunk_buffer() -> usize {
    16
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: None,
            timeout_secs: None,
            follow_redirects: false,
            max_redirects: default_max_redirects(),
            chunk_buffer: default_chunk_buffer(),
        }
    }
}

impl FetchConfig {
    pub fn to_options(&self) -> FetchOptions {
        let redirects = if self.follow_redirects {
            RedirectPolicy::Revalidate {
                max_hops: self.max_redirects,
            }
        } else {
            RedirectPolicy::Refuse
        };
        FetchOptions {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            timeout: self.timeout_secs.map(Duration::from_secs),
            redirects,
            chunk_buffer: self.chunk_buffer.max(1),
        }
    }
}

/// Global configuration loaded from `~/.config/avatar/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// Exact hostnames an image URL may point at.
    pub allowed_hosts: Vec<String>,
    /// Filesystem root for public assets; uploads land in `<assets_root>/uploads`.
    pub assets_root: PathBuf,
    /// Public URL prefix matching `assets_root`, stored on the profile.
    pub public_base: String,
    /// Prefix for the profile redirect (`<base_path>/profile`).
    #[serde(default)]
    pub base_path: String,
    /// Regex flagging SSRF-challenge probes in submitted URLs.
    #[serde(default = "default_probe_pattern")]
    pub probe_pattern: String,
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_probe_pattern() -> String {
    DEFAULT_PROBE_PATTERN.to_string()
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect(),
            assets_root: PathBuf::from("frontend/dist/frontend/assets/public/images"),
            public_base: "/assets/public/images".to_string(),
            base_path: String::new(),
            probe_pattern: default_probe_pattern(),
            fetch: FetchConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("avatar")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AvatarConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Same as `load_or_init` but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<AvatarConfig> {
    if !path.exists() {
        let default_cfg = AvatarConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: AvatarConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
