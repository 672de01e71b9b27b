//! Client configuration — where the WOPR service lives and the key sent
//! with each request.
//!
//! # Loading precedence
//! 1. Defaults (empty values)
//! 2. JSON file at `~/.wopr/config.json`
//! 3. Environment variables `WOPR_KEY` / `WOPR_API_URL` (override the file)
//!
//! Nothing is validated here; an empty key or URL simply makes the first
//! request fail at the transport.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Root configuration for the client.
///
/// JSON on disk uses camelCase keys (`apiKey`, `apiUrl`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Value of the `X-API-Key` request header.
    pub api_key: String,
    /// Endpoint URL each message is POSTed to.
    pub api_url: String,
}

/// The WOPR data directory (`~/.wopr/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".wopr")
}

/// Default config file path (`~/.wopr/config.json`).
pub fn get_config_path() -> PathBuf {
    get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// - `WOPR_KEY` → `api_key`
/// - `WOPR_API_URL` → `api_url`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("WOPR_KEY") {
        config.api_key = val;
    }
    if let Ok(val) = std::env::var("WOPR_API_URL") {
        config.api_url = val;
    }
    config
}

/// Helper to get the home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
