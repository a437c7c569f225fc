//! Creative asset services for Stakazo
//!
//! Two collaborator contracts consumed by the campaign launcher:
//! - [`CopyService`] produces captions and hashtags for a track. It never
//!   returns an empty caption list: the OpenAI-backed implementation falls
//!   back to deterministic templates on any API failure.
//! - [`VideoService`] produces a reference to a rendered video for a prompt,
//!   or a [`GenerationError`] the launcher treats as "video unavailable".
//!
//! Implementations are selected at construction time via the factories,
//! never by runtime probing.

pub mod openai;
pub mod template;
pub mod video;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation configuration error: {0}")]
    Configuration(String),

    #[error("Generation request error: {0}")]
    Request(String),

    #[error("Generation response error: {0}")]
    Response(String),

    #[error("Generation I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Descriptive fields of the track a campaign promotes, as the copy
/// services consume them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackBrief {
    pub track: String,
    pub artist: String,
    pub genre: String,
    pub mood: String,
}

/// Caption and hashtag generation.
#[async_trait::async_trait]
pub trait CopyService: Send + Sync {
    /// Generate up to `count` short promotional captions. Never empty:
    /// implementations fall back to canned copy on internal failure.
    async fn generate_captions(&self, brief: &TrackBrief, count: usize) -> Vec<String>;

    /// Generate up to `count` hashtags for the track's genre and mood.
    async fn generate_hashtags(&self, brief: &TrackBrief, count: usize) -> Vec<String>;
}

/// Video generation from a free-text prompt.
#[async_trait::async_trait]
pub trait VideoService: Send + Sync {
    /// Render a video for the prompt and return a reference to it
    /// (a local path or URL).
    async fn generate_video(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Copy service configuration
#[derive(Debug, Clone)]
pub struct CopyConfig {
    pub provider: String,
    pub openai_api_key: Option<String>,
}

/// Video service configuration
#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub provider: String,
    pub output_dir: String,
}

/// Factory for creating CopyService implementations
pub struct CopyServiceFactory;

impl CopyServiceFactory {
    pub fn create(config: CopyConfig) -> Result<Box<dyn CopyService>, GenerationError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!("Creating OpenAI copy service");
                Ok(Box::new(openai::OpenAiCopyService::new(
                    config.openai_api_key,
                )))
            }
            "template" => {
                tracing::info!("Creating template copy service");
                Ok(Box::new(template::TemplateCopyService::new()))
            }
            provider => Err(GenerationError::Configuration(format!(
                "Unknown copy provider: {}. Supported providers: openai, template",
                provider
            ))),
        }
    }
}

/// Factory for creating VideoService implementations
pub struct VideoServiceFactory;

impl VideoServiceFactory {
    pub fn create(config: VideoConfig) -> Result<Box<dyn VideoService>, GenerationError> {
        match config.provider.as_str() {
            "longcat" => {
                // The LongCat-Video backend is planned but not wired up yet.
                Err(GenerationError::Configuration(
                    "LongCat provider not yet implemented. Use 'placeholder'.".to_string(),
                ))
            }
            "placeholder" => {
                tracing::info!("Creating placeholder video service");
                Ok(Box::new(video::PlaceholderVideoService::new(
                    config.output_dir,
                )))
            }
            provider => Err(GenerationError::Configuration(format!(
                "Unknown video provider: {}. Supported providers: longcat, placeholder",
                provider
            ))),
        }
    }
}
