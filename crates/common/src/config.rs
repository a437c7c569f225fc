//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Platform credentials are
//! optional: publishers validate their own credentials at publish time
//! and report a descriptive failure instead of crashing.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default embedded database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/stakazo.db?mode=rwc";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (embedded SQLite)
    pub database_url: String,

    /// When set, every platform publisher is replaced by a dummy that
    /// records a canned success. No real publications happen.
    pub dummy_mode: bool,

    /// Creative providers
    pub copy_provider: String,
    pub video_provider: String,
    pub video_output_dir: String,
    pub openai_api_key: Option<String>,

    /// Platform credentials
    pub meta_access_token: Option<String>,
    pub meta_page_id: Option<String>,
    pub meta_ig_user_id: Option<String>,
    pub tiktok_access_token: Option<String>,
    pub youtube_access_token: Option<String>,

    /// Runtime configuration
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),

            dummy_mode: env::var("DUMMY_MODE")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            copy_provider: env::var("COPY_PROVIDER").unwrap_or_else(|_| "template".to_string()),
            video_provider: env::var("VIDEO_PROVIDER")
                .unwrap_or_else(|_| "placeholder".to_string()),
            video_output_dir: env::var("VIDEO_OUTPUT_DIR")
                .unwrap_or_else(|_| "data/videos".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),

            meta_access_token: env::var("META_ACCESS_TOKEN").ok(),
            meta_page_id: env::var("META_PAGE_ID").ok(),
            meta_ig_user_id: env::var("META_IG_USER_ID").ok(),
            tiktok_access_token: env::var("TIKTOK_ACCESS_TOKEN").ok(),
            youtube_access_token: env::var("YOUTUBE_ACCESS_TOKEN").ok(),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(config)
    }
}

/// Parse an environment flag the permissive way: "true", "1" and "t"
/// (any casing) are on, everything else is off.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_truthy_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag("t"));
        assert!(parse_flag(" True "));
    }

    #[test]
    fn test_parse_flag_falsy_values() {
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("yes"));
    }
}
