use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public directory index the tool scrapes.
pub const DEFAULT_BASE_URL: &str = "https://opensource.apple.com/tarballs/";

/// Where users are pointed when the listing page stops looking like a listing.
pub const DEFAULT_SUPPORT_URL: &str = "https://github.com/mythkiven/mkAppleOpenSourceDownload";

/// Global configuration loaded from `~/.config/aosd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AosdConfig {
    /// Top-level directory listing URL. Resource listings live at `base_url + name + "/"`.
    pub base_url: String,
    /// Seconds a GET may go without receiving data before it is abandoned.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Ceiling on a single transfer, however steadily it is progressing.
    #[serde(default = "default_max_transfer_secs")]
    pub max_transfer_secs: u64,
    /// Listing bodies shorter than this are treated as a failed fetch.
    pub min_listing_body_len: usize,
    /// Support channel included in every failure message.
    pub support_url: String,
    /// Destination used when `download` is given no path (None = current directory).
    #[serde(default)]
    pub default_output_dir: Option<String>,
    /// Optional User-Agent header; None leaves libcurl's default.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Keyword rewrites applied before matching. Keys are lower-case.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
}

fn default_max_transfer_secs() -> u64 {
    3600
}

fn default_aliases() -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    aliases.insert("corefoundation".to_string(), "CF".to_string());
    aliases
}

impl Default for AosdConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
            connect_timeout_secs: 30,
            max_transfer_secs: default_max_transfer_secs(),
            min_listing_body_len: 100,
            support_url: DEFAULT_SUPPORT_URL.to_string(),
            default_output_dir: None,
            user_agent: None,
            aliases: default_aliases(),
        }
    }
}

impl AosdConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn max_transfer(&self) -> Duration {
        Duration::from_secs(self.max_transfer_secs)
    }

    /// Checks `base_url` parses as http(s) and makes sure it ends in `/`,
    /// since resource URLs are built by plain concatenation.
    pub fn validate(mut self) -> Result<Self> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url '{}'", self.base_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("base_url must be http or https, got '{}'", self.base_url);
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        self.aliases = self
            .aliases
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(self)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("aosd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AosdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AosdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file (e.g. `--config`).
pub fn load_from_path(path: &Path) -> Result<AosdConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: AosdConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    cfg.validate()
}
