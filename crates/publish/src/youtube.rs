//! YouTube Data API Publisher Implementation
//!
//! Simple upload (uploadType=media) to the videos endpoint
//! (https://www.googleapis.com/upload/youtube/v3/videos) using reqwest HTTP
//! client. The asset reference may be a local path or an http(s) URL; URLs
//! are fetched first since the simple upload wants raw bytes.

use reqwest::Client;
use serde::Deserialize;

use crate::{PlatformPublisher, PublishError};

const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com";

#[derive(Debug, Deserialize)]
struct VideoResponse {
    id: String,
}

/// Data API publisher for Shorts-style uploads
pub struct YouTubePublisher {
    access_token: Option<String>,
    client: Client,
    base_url: String,
}

impl YouTubePublisher {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token,
            client: Client::new(),
            base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (testing against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load the asset bytes: fetch http(s) references, read local paths.
    async fn load_asset(&self, video_url: &str) -> Result<Vec<u8>, PublishError> {
        if video_url.starts_with("http://") || video_url.starts_with("https://") {
            let response = self
                .client
                .get(video_url)
                .send()
                .await
                .map_err(|e| PublishError::Request(format!("Asset fetch failed: {}", e)))?;
            if !response.status().is_success() {
                return Err(PublishError::Request(format!(
                    "Asset fetch returned {}",
                    response.status()
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| PublishError::Request(format!("Asset fetch failed: {}", e)))?;
            Ok(bytes.to_vec())
        } else {
            tokio::fs::read(video_url)
                .await
                .map_err(|e| PublishError::Request(format!("Asset read failed: {}", e)))
        }
    }
}

#[async_trait::async_trait]
impl PlatformPublisher for YouTubePublisher {
    fn platform(&self) -> &str {
        "youtube"
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
                    platform: "youtube".to_string(),
                    detail: "YOUTUBE_ACCESS_TOKEN not configured".to_string(),
                })?;
        let video_url = video_url.ok_or_else(|| PublishError::NoAsset("youtube".to_string()))?;

        let bytes = self.load_asset(video_url).await?;

        let url = format!(
            "{}/upload/youtube/v3/videos?uploadType=media&part=id",
            self.base_url
        );

        tracing::info!(
            platform = "youtube",
            size_bytes = bytes.len(),
            caption = %caption.chars().take(30).collect::<String>(),
            "Uploading via Data API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("content-type", "video/mp4")
            .body(bytes)
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
                "YouTube API returned {}: {}",
                status, error_body
            )));
        }

        let body: VideoResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Response(format!("Failed to parse response: {}", e)))?;
        Ok(body.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let publisher = YouTubePublisher::new(None);
        let result = publisher
            .publish(Some("https://cdn.example.com/clip.mp4"), "caption")
            .await;
        match result {
            Err(PublishError::MissingCredentials { platform, detail }) => {
                assert_eq!(platform, "youtube");
                assert!(detail.contains("YOUTUBE_ACCESS_TOKEN"));
            }
            other => panic!("Expected MissingCredentials, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_missing_asset_fails_cleanly() {
        let publisher = YouTubePublisher::new(Some("token".to_string()));
        let result = publisher.publish(None, "caption").await;
        assert!(matches!(result, Err(PublishError::NoAsset(_))));
    }

    #[tokio::test]
    async fn test_unreadable_local_asset_is_a_request_error() {
        let publisher = YouTubePublisher::new(Some("token".to_string()));
        let result = publisher
            .publish(Some("/nonexistent/clip.mp4"), "caption")
            .await;
        match result {
            Err(PublishError::Request(detail)) => assert!(detail.contains("Asset read failed")),
            other => panic!("Expected Request error, got {:?}", other.err()),
        }
    }
}
