//! Placeholder Video Service Implementation
//!
//! Stands in for a real render backend: writes a stub clip file into the
//! output directory and returns its path. The launcher only cares about
//! receiving a usable asset reference.

use std::path::Path;

use crate::{GenerationError, VideoService};

/// Placeholder renderer writing stub files
#[derive(Debug, Clone)]
pub struct PlaceholderVideoService {
    output_dir: String,
}

impl PlaceholderVideoService {
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait::async_trait]
impl VideoService for PlaceholderVideoService {
    async fn generate_video(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::Request(
                "Video prompt is empty".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let filename = format!("video_{}.mp4", uuid::Uuid::new_v4().simple());
        let video_path = Path::new(&self.output_dir).join(filename);

        tracing::info!(prompt = %prompt, path = %video_path.display(), "Rendering placeholder video");

        tokio::fs::write(
            &video_path,
            format!("Placeholder clip for prompt: {}", prompt),
        )
        .await?;

        Ok(video_path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_a_file_and_returns_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let service = PlaceholderVideoService::new(dir.path().to_string_lossy());

        let path = service.generate_video("neon lights").await.unwrap();
        assert!(path.ends_with(".mp4"));

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("neon lights"));
    }

    #[tokio::test]
    async fn test_distinct_paths_per_render() {
        let dir = tempfile::tempdir().unwrap();
        let service = PlaceholderVideoService::new(dir.path().to_string_lossy());

        let first = service.generate_video("a").await.unwrap();
        let second = service.generate_video("a").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = PlaceholderVideoService::new(dir.path().to_string_lossy());

        let result = service.generate_video("   ").await;
        assert!(matches!(result, Err(GenerationError::Request(_))));
    }
}
