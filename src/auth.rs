use std::path::PathBuf;

use crate::config::Config;
use crate::error::{ReelError, Result};

/// Resolve the TMDB API key: the configured environment variable first,
/// then a key file under the config directory.
pub fn resolve_api_key(config: &Config) -> Result<String> {
    if let Ok(key) = std::env::var(&config.api_key_env) {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    if let Some(key) = load_stored_key() {
        return Ok(key);
    }

    Err(ReelError::Auth(format!(
        "no API key found; set {} or write the key to {}",
        config.api_key_env,
        key_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/reel/api_key".to_string())
    )))
}

/// Stored key location: ~/.config/reel/api_key
fn key_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("reel").join("api_key"))
}

fn load_stored_key() -> Option<String> {
    let path = key_path()?;
    let key = std::fs::read_to_string(path).ok()?;
    let key = key.trim().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
