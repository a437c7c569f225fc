//! Dummy Publisher Implementation
//!
//! Used when `DUMMY_MODE` is on: accepts any publish call and returns a
//! canned post id without touching the network.

use crate::{PlatformPublisher, PublishError};

/// Dummy publisher for offline deployments and tests
#[derive(Debug, Clone)]
pub struct DummyPublisher {
    platform: String,
}

impl DummyPublisher {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into().to_lowercase(),
        }
    }
}

#[async_trait::async_trait]
impl PlatformPublisher for DummyPublisher {
    fn platform(&self) -> &str {
        &self.platform
    }

    async fn publish(
        &self,
        video_url: Option<&str>,
        caption: &str,
    ) -> Result<String, PublishError> {
        if video_url.is_none() && self.requires_asset() {
            return Err(PublishError::NoAsset(self.platform.clone()));
        }

        let post_id = format!(
            "dummy_{}_{}",
            self.platform,
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        );
        tracing::info!(
            platform = %self.platform,
            post_id = %post_id,
            caption = %caption.chars().take(30).collect::<String>(),
            "[DUMMY] Published"
        );
        Ok(post_id)
    }
}
