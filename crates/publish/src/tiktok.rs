//! TikTok Content Posting API Publisher Implementation
//!
//! Initiates a PULL_FROM_URL video post via the Content Posting API
//! (https://open.tiktokapis.com/v2/post/publish/video/init/) using reqwest
//! HTTP client. TikTok fetches the video itself; the returned publish id is
//! the post reference.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{PlatformPublisher, PublishError};

const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com";

#[derive(Debug, Serialize)]
struct InitRequest<'a> {
    post_info: PostInfo<'a>,
    source_info: SourceInfo<'a>,
}

#[derive(Debug, Serialize)]
struct PostInfo<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct SourceInfo<'a> {
    source: &'a str,
    video_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct InitResponse {
    data: InitData,
}

#[derive(Debug, Deserialize)]
struct InitData {
    publish_id: String,
}

/// Content Posting API publisher
pub struct TikTokPublisher {
    access_token: Option<String>,
    client: Client,
    base_url: String,
}

impl TikTokPublisher {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token,
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (testing against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl PlatformPublisher for TikTokPublisher {
    fn platform(&self) -> &str {
        "tiktok"
    }

    async fn publish(
        &self,
        video_url: Option<&str>,
        caption: &str,
    ) -> Result<String, PublishError> {
        let token =
            self.access_token
                .as_deref()
                .ok_or_else(|| PublishError::MissingCredentials {
                    platform: "tiktok".to_string(),
                    detail: "TIKTOK_ACCESS_TOKEN not configured".to_string(),
                })?;
        let video_url = video_url.ok_or_else(|| PublishError::NoAsset("tiktok".to_string()))?;

        let body = InitRequest {
            post_info: PostInfo { title: caption },
            source_info: SourceInfo {
                source: "PULL_FROM_URL",
                video_url,
            },
        };

        let url = format!("{}/v2/post/publish/video/init/", self.base_url);

        tracing::info!(platform = "tiktok", "Publishing via Content Posting API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(PublishError::Response(format!(
                "TikTok API returned {}: {}",
                status, error_body
            )));
        }

        let body: InitResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Response(format!("Failed to parse response: {}", e)))?;
        Ok(body.data.publish_id)
    }
}
