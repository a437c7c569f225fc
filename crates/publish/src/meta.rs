//! Meta Graph API Publisher Implementation
//!
//! Publishes Reels to Instagram (two-step: create media container, then
//! publish it) and videos to Facebook pages, via the Graph API
//! (https://graph.facebook.com) using reqwest HTTP client.

use reqwest::Client;
use serde::Deserialize;

use crate::{PlatformPublisher, PublishError};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
const API_VERSION: &str = "v21.0";

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

/// Which Meta surface this publisher posts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaSurface {
    Instagram,
    Facebook,
}

/// Graph API publisher for Instagram Reels and Facebook page videos
pub struct MetaPublisher {
    surface: MetaSurface,
    access_token: Option<String>,
    /// IG user id for Instagram, page id for Facebook.
    account_id: Option<String>,
    client: Client,
    base_url: String,
}

impl MetaPublisher {
    pub fn instagram(access_token: Option<String>, ig_user_id: Option<String>) -> Self {
        Self::new(MetaSurface::Instagram, access_token, ig_user_id)
    }

    pub fn facebook(access_token: Option<String>, page_id: Option<String>) -> Self {
        Self::new(MetaSurface::Facebook, access_token, page_id)
    }

    fn new(
        surface: MetaSurface,
        access_token: Option<String>,
        account_id: Option<String>,
    ) -> Self {
        Self {
            surface,
            access_token,
            account_id,
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (testing against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn credentials(&self) -> Result<(&str, &str), PublishError> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            PublishError::MissingCredentials {
                platform: self.platform().to_string(),
                detail: "META_ACCESS_TOKEN not configured".to_string(),
            }
        })?;
        let account_id =
            self.account_id
                .as_deref()
                .ok_or_else(|| PublishError::MissingCredentials {
                    platform: self.platform().to_string(),
                    detail: match self.surface {
                        MetaSurface::Instagram => "META_IG_USER_ID not configured".to_string(),
                        MetaSurface::Facebook => "META_PAGE_ID not configured".to_string(),
                    },
                })?;
        Ok((token, account_id))
    }

    async fn post_for_id(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let response = self
            .client
            .post(url)
            .form(params)
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
                "Graph API returned {}: {}",
                status, error_body
            )));
        }

        let body: IdResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Response(format!("Failed to parse response: {}", e)))?;
        Ok(body.id)
    }

    /// Instagram Reels: create a media container, then publish it.
    async fn publish_reel(
        &self,
        token: &str,
        ig_user_id: &str,
        video_url: &str,
        caption: &str,
    ) -> Result<String, PublishError> {
        let container_url = format!("{}/{}/{}/media", self.base_url, API_VERSION, ig_user_id);
        let container_id = self
            .post_for_id(
                &container_url,
                &[
                    ("media_type", "REELS"),
                    ("video_url", video_url),
                    ("caption", caption),
                    ("access_token", token),
                ],
            )
            .await?;

        let publish_url = format!(
            "{}/{}/{}/media_publish",
            self.base_url, API_VERSION, ig_user_id
        );
        self.post_for_id(
            &publish_url,
            &[("creation_id", &container_id), ("access_token", token)],
        )
        .await
    }

    /// Facebook page video: single upload-by-URL call.
    async fn publish_page_video(
        &self,
        token: &str,
        page_id: &str,
        video_url: &str,
        caption: &str,
    ) -> Result<String, PublishError> {
        let url = format!("{}/{}/{}/videos", self.base_url, API_VERSION, page_id);
        self.post_for_id(
            &url,
            &[
                ("file_url", video_url),
                ("description", caption),
                ("access_token", token),
            ],
        )
        .await
    }
}

#[async_trait::async_trait]
impl PlatformPublisher for MetaPublisher {
    fn platform(&self) -> &str {
        match self.surface {
            MetaSurface::Instagram => "instagram",
            MetaSurface::Facebook => "facebook",
        }
    }

    async fn publish(
        &self,
        video_url: Option<&str>,
        caption: &str,
    ) -> Result<String, PublishError> {
        let (token, account_id) = self.credentials()?;
        let video_url =
            video_url.ok_or_else(|| PublishError::NoAsset(self.platform().to_string()))?;

        tracing::info!(platform = %self.platform(), "Publishing via Graph API");

        match self.surface {
            MetaSurface::Instagram => {
                self.publish_reel(token, account_id, video_url, caption).await
            }
            MetaSurface::Facebook => {
                self.publish_page_video(token, account_id, video_url, caption)
                    .await
            }
        }
    }
}
