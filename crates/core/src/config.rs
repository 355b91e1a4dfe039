use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.aredl.net/v2/api/aredl/levels";
pub const DEFAULT_THUMBNAIL_BASE: &str =
    "https://raw.githubusercontent.com/All-Rated-Extreme-Demon-List/Thumbnails/main/levels/full";
pub const DEFAULT_HIGH_SCORE_KEY: &str = "gdHighScore";
pub const DEFAULT_MAX_NEXT_ATTEMPTS: u32 = 20;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub api_url: String,
    pub thumbnail_base: String,
    pub fetch_timeout_ms: u64,
    /// Draws allowed when looking for a `next` item whose name differs from `current`.
    pub max_next_attempts: u32,
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            thumbnail_base: DEFAULT_THUMBNAIL_BASE.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_next_attempts: DEFAULT_MAX_NEXT_ATTEMPTS,
            high_score_key: DEFAULT_HIGH_SCORE_KEY.to_string(),
        }
    }
}

impl GameConfig {
    /// At least one draw is always made, even if configured to zero.
    pub fn next_attempts(&self) -> u32 {
        self.max_next_attempts.max(1)
    }
}
