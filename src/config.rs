//! Optional config file loading. Search order: ./oriencoop-scrape.toml, then
//! $XDG_CONFIG_HOME/oriencoop-scrape/config.toml (or ~/.config/oriencoop-scrape/config.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Listing page holding the branch navigation menu.
pub const DEFAULT_LISTING_URL: &str = "https://oriencoop.cl/sucursales.htm";
/// Prefix joined to every relative submenu link.
pub const DEFAULT_ORIGIN: &str = "https://oriencoop.cl";

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Listing page to enumerate branch links from.
    pub listing_url: Option<String>,
    /// Origin prefixed to each submenu href.
    pub origin: Option<String>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Maximum detail pages fetched at once (default 8).
    pub concurrency: Option<usize>,
    /// Directory for task1.json / task1.csv. Paths are relative to CWD.
    pub output_dir: Option<PathBuf>,
}

/// Search order: (1) ./oriencoop-scrape.toml, (2) $XDG_CONFIG_HOME/oriencoop-scrape/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    load_first_existing(&search_paths(&cwd, dirs::config_dir().as_deref()))
}

/// Candidate config files in priority order.
pub fn search_paths(cwd: &Path, config_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join("oriencoop-scrape.toml")];
    if let Some(d) = config_dir {
        paths.push(d.join("oriencoop-scrape").join("config.toml"));
    }
    paths
}

/// Load the first path that exists; later paths are not read.
pub fn load_first_existing(paths: &[PathBuf]) -> Result<Option<Config>, String> {
    for path in paths {
        if path.exists() {
            let config = load_config_file(path)?;
            log::debug!("Loaded config from {}", path.display());
            return Ok(Some(config));
        }
    }
    Ok(None)
}

/// Read and parse one config file.
pub fn load_config_file(path: &Path) -> Result<Config, String> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}
