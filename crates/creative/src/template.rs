//! Template Copy Service Implementation
//!
//! Deterministic canned copy built from the track brief. Used directly in
//! deployments without an OpenAI key and as the fallback inside
//! [`crate::openai::OpenAiCopyService`], so the caption pipeline can always
//! proceed.

use crate::{CopyService, TrackBrief};

/// Deterministic template-based copy service
#[derive(Debug, Clone, Default)]
pub struct TemplateCopyService;

impl TemplateCopyService {
    pub fn new() -> Self {
        Self
    }

    fn caption_lines(brief: &TrackBrief) -> Vec<String> {
        vec![
            format!(
                "🔥 {} - {} #viral #music",
                brief.track, brief.artist
            ),
            format!("Este tema está 🔥 | {}", brief.track),
            format!("📢 NUEVO | {} - {}", brief.artist, brief.track),
        ]
    }

    fn hashtag_pool(brief: &TrackBrief) -> Vec<String> {
        let genre_tag = brief.genre.to_lowercase().replace(' ', "");
        let mood_tag = brief.mood.to_lowercase().replace(' ', "");
        vec![
            "#music".to_string(),
            "#newmusic".to_string(),
            format!("#{}", genre_tag),
            format!("#{}", mood_tag),
            "#viral".to_string(),
            "#fyp".to_string(),
        ]
    }
}

#[async_trait::async_trait]
impl CopyService for TemplateCopyService {
    async fn generate_captions(&self, brief: &TrackBrief, count: usize) -> Vec<String> {
        let mut captions = Self::caption_lines(brief);
        captions.truncate(count.max(1));
        captions
    }

    async fn generate_hashtags(&self, brief: &TrackBrief, count: usize) -> Vec<String> {
        let mut tags = Self::hashtag_pool(brief);
        tags.dedup();
        tags.truncate(count.max(1));
        tags
    }
}
