use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// One week, the freshness window of a cached favicon.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 604_800;

/// Global configuration loaded from `~/.config/ficon/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiconConfig {
    /// Address the HTTP endpoint binds to.
    pub listen_addr: String,
    /// Page requests without a `url` parameter are redirected to.
    pub info_url: String,
    /// Seconds a stored favicon stays fresh before it is served as stale.
    pub cache_ttl_secs: u64,
    /// Connect timeout per fetch, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per fetch (one redirect hop), in seconds.
    pub request_timeout_secs: u64,
    /// Maximum redirect hops followed for a single candidate.
    pub max_redirects: u32,
    /// Responses larger than this are abandoned.
    pub max_body_bytes: usize,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Optional database location; defaults to `~/.local/state/ficon/icons.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for FiconConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8787".to_string(),
            info_url: "https://github.com/ficon-rs/ficon".to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            connect_timeout_secs: 10,
            request_timeout_secs: 20,
            max_redirects: 10,
            max_body_bytes: 5 * 1024 * 1024,
            user_agent: concat!("ficon/", env!("CARGO_PKG_VERSION")).to_string(),
            database_path: None,
        }
    }
}

impl FiconConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ficon")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FiconConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FiconConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FiconConfig = toml::from_str(&data)?;
    Ok(cfg)
}
