//! Platform publishers for Stakazo
//!
//! One [`PlatformPublisher`] per target platform, looked up by name in a
//! [`PublisherRegistry`]. Publishers validate their own credentials and
//! asset requirements and fail with a typed [`PublishError`] instead of
//! panicking; the launcher turns every outcome — success or failure — into
//! a per-platform [`PublishResult`].
//!
//! In dummy mode the registry wires a [`dummy::DummyPublisher`] for every
//! platform, so no real publications happen.

pub mod dummy;
pub mod meta;
pub mod tiktok;
pub mod youtube;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Missing credentials for {platform}: {detail}")]
    MissingCredentials { platform: String, detail: String },

    #[error("No publishable asset for {0}")]
    NoAsset(String),

    #[error("Publish request error: {0}")]
    Request(String),

    #[error("Publish response error: {0}")]
    Response(String),

    #[error("Unsupported platform: {0}")]
    Unsupported(String),
}

/// Outcome status of one publication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Success,
    Failed,
}

/// Per-platform publication outcome, persisted into campaign metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResult {
    pub fn success(post_id: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Success,
            post_id: Some(post_id.into()),
            error: None,
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            status: PublishStatus::Failed,
            post_id: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PublishStatus::Success
    }
}

/// Publisher contract, one implementation per platform
#[async_trait::async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Canonical lowercase platform name this publisher serves.
    fn platform(&self) -> &str;

    /// Whether this platform needs a video asset. Caption-only platforms
    /// override this to accept posts without one.
    fn requires_asset(&self) -> bool {
        true
    }

    /// Publish the asset + caption and return the platform-assigned post id.
    async fn publish(&self, video_url: Option<&str>, caption: &str)
        -> Result<String, PublishError>;
}

/// Publisher wiring configuration
#[derive(Debug, Clone, Default)]
pub struct PublishConfig {
    pub dummy_mode: bool,
    pub meta_access_token: Option<String>,
    pub meta_page_id: Option<String>,
    pub meta_ig_user_id: Option<String>,
    pub tiktok_access_token: Option<String>,
    pub youtube_access_token: Option<String>,
}

/// Case-insensitive platform-name lookup over the wired publishers
#[derive(Clone, Default)]
pub struct PublisherRegistry {
    publishers: HashMap<String, Arc<dyn PlatformPublisher>>,
}

/// The platforms a default deployment knows how to publish to.
pub const KNOWN_PLATFORMS: &[&str] = &["instagram", "facebook", "tiktok", "youtube"];

impl PublisherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publisher under its canonical platform name. Re-registering
    /// a name replaces the previous publisher.
    pub fn register(&mut self, publisher: Arc<dyn PlatformPublisher>) {
        self.publishers
            .insert(publisher.platform().to_lowercase(), publisher);
    }

    /// Look up the publisher for a platform name, case-insensitively.
    pub fn get(&self, platform: &str) -> Option<Arc<dyn PlatformPublisher>> {
        self.publishers.get(&platform.to_lowercase()).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    /// Wire publishers for every known platform from configuration.
    pub fn from_config(config: &PublishConfig) -> Self {
        let mut registry = Self::new();

        if config.dummy_mode {
            tracing::warn!(
                "Publisher registry operating in DUMMY_MODE, no real publications will happen"
            );
            for platform in KNOWN_PLATFORMS {
                registry.register(Arc::new(dummy::DummyPublisher::new(*platform)));
            }
            return registry;
        }

        registry.register(Arc::new(meta::MetaPublisher::instagram(
            config.meta_access_token.clone(),
            config.meta_ig_user_id.clone(),
        )));
        registry.register(Arc::new(meta::MetaPublisher::facebook(
            config.meta_access_token.clone(),
            config.meta_page_id.clone(),
        )));
        registry.register(Arc::new(tiktok::TikTokPublisher::new(
            config.tiktok_access_token.clone(),
        )));
        registry.register(Arc::new(youtube::YouTubePublisher::new(
            config.youtube_access_token.clone(),
        )));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_result_success_shape() {
        let result = PublishResult::success("post_123");
        assert!(result.is_success());
        assert_eq!(result.post_id.as_deref(), Some("post_123"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_publish_result_failure_shape() {
        let result = PublishResult::failure(PublishError::NoAsset("tiktok".to_string()));
        assert!(!result.is_success());
        assert!(result.post_id.is_none());
        assert_eq!(
            result.error.as_deref(),
            Some("No publishable asset for tiktok")
        );
    }

    #[test]
    fn test_publish_result_serialization_skips_empty_fields() {
        let json = serde_json::to_value(PublishResult::success("p1")).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["post_id"], "p1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let registry = PublisherRegistry::from_config(&PublishConfig {
            dummy_mode: true,
            ..Default::default()
        });
        assert!(registry.get("TikTok").is_some());
        assert!(registry.get("tiktok").is_some());
        assert!(registry.get("YOUTUBE").is_some());
        assert!(registry.get("myspace").is_none());
    }

    #[test]
    fn test_dummy_registry_covers_known_platforms() {
        let registry = PublisherRegistry::from_config(&PublishConfig {
            dummy_mode: true,
            ..Default::default()
        });
        for platform in KNOWN_PLATFORMS {
            assert!(registry.get(platform).is_some(), "missing {}", platform);
        }
    }

    #[test]
    fn test_real_registry_constructs_without_credentials() {
        // Credentials are validated at publish time, not at wiring time.
        let registry = PublisherRegistry::from_config(&PublishConfig::default());
        assert!(registry.get("instagram").is_some());
        assert!(registry.get("facebook").is_some());
        assert!(registry.get("tiktok").is_some());
        assert!(registry.get("youtube").is_some());
    }
}
