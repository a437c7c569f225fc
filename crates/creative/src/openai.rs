//! OpenAI Copy Service Implementation
//!
//! Calls the OpenAI Chat Completions API (https://api.openai.com/v1/chat/completions)
//! using reqwest HTTP client. Any failure — missing key, transport error,
//! unusable completion — degrades to the deterministic template service so
//! the caption contract ("never empty") holds.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::template::TemplateCopyService;
use crate::{CopyService, GenerationError, TrackBrief};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat Completions API request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat Completions API response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-backed copy service with template fallback
pub struct OpenAiCopyService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    fallback: TemplateCopyService,
}

impl OpenAiCopyService {
    /// Create a new OpenAI copy service. A missing key is tolerated: the
    /// service then answers from templates.
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, copy service will use template fallback");
        }
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            fallback: TemplateCopyService::new(),
        }
    }

    /// Override the API base URL (testing against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn complete(&self, system: &str, user: String) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let body = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            max_tokens: 300,
            temperature: 0.9,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(model = DEFAULT_MODEL, "Sending OpenAI API request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(GenerationError::Response(format!(
                "OpenAI API returned {}: {}",
                status, error_body
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Response(format!("Failed to parse response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::Response("Completion had no content".to_string()))
    }

    /// Split a completion into trimmed, non-empty lines, capped at `count`.
    fn split_lines(completion: &str, count: usize) -> Vec<String> {
        completion
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .take(count)
            .collect()
    }
}

#[async_trait::async_trait]
impl CopyService for OpenAiCopyService {
    async fn generate_captions(&self, brief: &TrackBrief, count: usize) -> Vec<String> {
        let prompt = format!(
            "Genera {} captions virales cortos promocionando '{}' de {} \
             (género: {}, mood: {}). Un caption por línea, sin numerar.",
            count, brief.track, brief.artist, brief.genre, brief.mood
        );

        match self
            .complete("Eres experto en marketing musical viral.", prompt)
            .await
        {
            Ok(completion) => {
                let captions = Self::split_lines(&completion, count);
                if captions.is_empty() {
                    self.fallback.generate_captions(brief, count).await
                } else {
                    captions
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Caption generation failed, using template fallback");
                self.fallback.generate_captions(brief, count).await
            }
        }
    }

    async fn generate_hashtags(&self, brief: &TrackBrief, count: usize) -> Vec<String> {
        let prompt = format!(
            "{} hashtags virales para música {} con mood {}. \
             Solo hashtags, separados por comas.",
            count, brief.genre, brief.mood
        );

        match self
            .complete("Eres experto en marketing musical viral.", prompt)
            .await
        {
            Ok(completion) => {
                let tags: Vec<String> = completion
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(|tag| {
                        if tag.starts_with('#') {
                            tag.to_string()
                        } else {
                            format!("#{}", tag)
                        }
                    })
                    .take(count)
                    .collect();
                if tags.is_empty() {
                    self.fallback.generate_hashtags(brief, count).await
                } else {
                    tags
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Hashtag generation failed, using template fallback");
                self.fallback.generate_hashtags(brief, count).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> TrackBrief {
        TrackBrief {
            track: "Neon Nights".to_string(),
            artist: "La Sombra".to_string(),
            genre: "trap".to_string(),
            mood: "dark".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_templates() {
        let service = OpenAiCopyService::new(None);
        let captions = service.generate_captions(&brief(), 3).await;

        let template = TemplateCopyService::new();
        assert_eq!(captions, template.generate_captions(&brief(), 3).await);
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back_to_templates() {
        // Connection refused on a port nothing listens on.
        let service = OpenAiCopyService::new(Some("sk-test".to_string()))
            .with_base_url("http://127.0.0.1:9");
        let captions = service.generate_captions(&brief(), 3).await;
        assert!(!captions.is_empty());

        let tags = service.generate_hashtags(&brief(), 5).await;
        assert!(!tags.is_empty());
    }

    #[test]
    fn test_split_lines_filters_blanks() {
        let completion = "first\n\n  second  \n\nthird\nfourth";
        let lines = OpenAiCopyService::split_lines(completion, 3);
        assert_eq!(lines, vec!["first", "second", "third"]);
    }
}
