use serde::Deserialize;
use std::path::PathBuf;

/// Display identity shown in the header. There are no real accounts; this
/// is injected configuration, nothing more.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Profile {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment variable holding the TMDB API key.
    pub api_key_env: String,
    /// Request language passed to every catalog call.
    pub language: String,
    /// Poster size segment for image URLs (w185, w342, w500, original).
    pub poster_size: String,
    /// Quiet window for search-as-you-type, in milliseconds.
    pub debounce_ms: u64,
    pub profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_env: "TMDB_API_KEY".to_string(),
            language: "en-US".to_string(),
            poster_size: "w500".to_string(),
            debounce_ms: 400,
            profile: Profile::default(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("reel").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        toml::from_str::<Config>(&content).unwrap_or_default()
    }
}
