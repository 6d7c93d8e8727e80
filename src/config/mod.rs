//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

use crate::game::{MatchMode, PlayerClass};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Stats backend URL; unset means fully offline play
    pub stats_api_url: Option<String>,
    /// Stats backend service key
    pub stats_api_key: Option<String>,
    /// Local progression cache file
    pub stats_cache_path: PathBuf,

    /// Display name for the local actor
    pub player_name: String,
    /// Match mode code, e.g. "1v1", "5v5", "1v5", "1v1-local"
    pub match_mode: MatchMode,
    /// Combat role for the local actor
    pub player_class: PlayerClass,
    /// Equipped cosmetic skin id
    pub equipped_skin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let match_mode = env::var("MATCH_MODE")
            .unwrap_or_else(|_| "1v1".to_string())
            .parse()
            .map_err(ConfigError::Mode)?;
        let player_class = env::var("PLAYER_CLASS")
            .unwrap_or_else(|_| "assault".to_string())
            .parse()
            .map_err(ConfigError::Class)?;

        let stats_api_url = env::var("STATS_API_URL").ok();
        let stats_api_key = env::var("STATS_API_KEY").ok();
        if stats_api_url.is_some() && stats_api_key.is_none() {
            return Err(ConfigError::Missing("STATS_API_KEY"));
        }

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            stats_api_url,
            stats_api_key,
            stats_cache_path: env::var("STATS_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("pixel_arena_stats.json")),
            player_name: env::var("PLAYER_NAME").unwrap_or_else(|_| "ShadowWalker".to_string()),
            match_mode,
            player_class,
            equipped_skin: env::var("EQUIPPED_SKIN").ok(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Mode(crate::game::ParseModeError),

    #[error(transparent)]
    Class(crate::game::ParseClassError),
}
