//! Campaign domain entities for Stakazo
//!
//! The campaign is the sole persisted unit of work: one promotional push
//! for one track across one or more platforms. All lifecycle changes go
//! through the state machine in [`crate::domain::state`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use stakazo_common::{Error, Result};
use stakazo_creative::TrackBrief;
use stakazo_publish::PublishResult;

use crate::domain::state::{CampaignEvent, CampaignState, CampaignStateMachine, StateError};

/// Campaign status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Pending,
    Queued,
    GeneratingCaptions,
    GeneratingVideo,
    Distributing,
    Completed,
    Failed,
}

impl CampaignStatus {
    /// Check if status is terminal for the current launch attempt
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    /// Convert to state machine state
    pub fn to_state(&self) -> CampaignState {
        match self {
            CampaignStatus::Pending => CampaignState::Pending,
            CampaignStatus::Queued => CampaignState::Queued,
            CampaignStatus::GeneratingCaptions => CampaignState::GeneratingCaptions,
            CampaignStatus::GeneratingVideo => CampaignState::GeneratingVideo,
            CampaignStatus::Distributing => CampaignState::Distributing,
            CampaignStatus::Completed => CampaignState::Completed,
            CampaignStatus::Failed => CampaignState::Failed,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: CampaignState) -> Self {
        match state {
            CampaignState::Pending => CampaignStatus::Pending,
            CampaignState::Queued => CampaignStatus::Queued,
            CampaignState::GeneratingCaptions => CampaignStatus::GeneratingCaptions,
            CampaignState::GeneratingVideo => CampaignStatus::GeneratingVideo,
            CampaignState::Distributing => CampaignStatus::Distributing,
            CampaignState::Completed => CampaignStatus::Completed,
            CampaignState::Failed => CampaignStatus::Failed,
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_state())
    }
}

/// Payload for creating a campaign
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCampaign {
    pub artist: String,
    pub track: String,
    pub genre: String,
    pub mood: String,
    pub platforms: Vec<String>,
    pub budget: f64,
    pub duration: i64,
    pub video_prompt: Option<String>,
}

/// Campaign entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    pub id: String,
    pub artist: String,
    pub track: String,
    pub genre: String,
    pub mood: String,
    pub platforms: Json<Vec<String>>,
    pub budget: f64,
    pub duration: i64,
    pub video_url: Option<String>,
    pub video_prompt: Option<String>,
    pub captions: Json<Vec<String>>,
    pub hashtags: Json<Vec<String>>,
    pub status: CampaignStatus,
    pub metrics: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Create a new campaign with validation
    pub fn new(new: NewCampaign) -> Result<Self> {
        if new.artist.trim().is_empty() {
            return Err(Error::Validation("Artist is required".to_string()));
        }
        if new.track.trim().is_empty() {
            return Err(Error::Validation("Track is required".to_string()));
        }
        if new.budget < 0.0 {
            return Err(Error::Validation(
                "Budget cannot be negative".to_string(),
            ));
        }
        if new.duration < 0 {
            return Err(Error::Validation(
                "Duration cannot be negative".to_string(),
            ));
        }

        // Platforms form an ordered set: first occurrence wins, casing kept.
        let mut seen = std::collections::HashSet::new();
        let platforms: Vec<String> = new
            .platforms
            .into_iter()
            .filter(|p| !p.trim().is_empty() && seen.insert(p.to_lowercase()))
            .collect();

        let now = Utc::now();
        Ok(Campaign {
            id: generate_campaign_id(),
            artist: new.artist,
            track: new.track,
            genre: new.genre,
            mood: new.mood,
            platforms: Json(platforms),
            budget: new.budget,
            duration: new.duration,
            video_url: None,
            video_prompt: new.video_prompt.filter(|p| !p.trim().is_empty()),
            captions: Json(Vec::new()),
            hashtags: Json(Vec::new()),
            status: CampaignStatus::default(),
            metrics: Json(serde_json::Value::Object(serde_json::Map::new())),
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if campaign is terminal for the current launch attempt
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the caption stage still has work to do
    pub fn needs_captions(&self) -> bool {
        self.captions.0.is_empty()
    }

    /// Whether the hashtag side of the caption stage still has work to do
    pub fn needs_hashtags(&self) -> bool {
        self.hashtags.0.is_empty()
    }

    /// Whether the video stage still has work to do
    pub fn needs_video(&self) -> bool {
        self.video_prompt.is_some() && self.video_url.is_none()
    }

    /// The track brief consumed by the copy services
    pub fn brief(&self) -> TrackBrief {
        TrackBrief {
            track: self.track.clone(),
            artist: self.artist.clone(),
            genre: self.genre.clone(),
            mood: self.mood.clone(),
        }
    }

    /// Accept a launch attempt
    pub fn enqueue(&mut self) -> Result<()> {
        self.apply(CampaignEvent::Enqueue)
    }

    /// Enter the caption generation stage
    pub fn begin_captions(&mut self) -> Result<()> {
        self.apply(CampaignEvent::StartCaptions)
    }

    /// Enter the video generation stage
    pub fn begin_video(&mut self) -> Result<()> {
        self.apply(CampaignEvent::StartVideo)
    }

    /// Enter the distribution stage
    pub fn begin_distribution(&mut self) -> Result<()> {
        self.apply(CampaignEvent::StartDistribution)
    }

    /// Finish the attempt successfully
    pub fn complete(&mut self) -> Result<()> {
        self.apply(CampaignEvent::Succeed)
    }

    /// Finish the attempt as failed
    pub fn fail(&mut self) -> Result<()> {
        self.apply(CampaignEvent::Fail)
    }

    /// Apply a state transition using the state machine
    pub fn apply(&mut self, event: CampaignEvent) -> Result<()> {
        let current = self.status.to_state();
        let next = CampaignStateMachine::transition(current, event).map_err(|e| match e {
            StateError::InvalidTransition { from, event } => Error::Validation(format!(
                "Invalid campaign transition: cannot apply '{}' event in '{}' state",
                event, from
            )),
            StateError::TerminalState(state) => Error::Validation(format!(
                "Campaign is in terminal state '{}' and only accepts a re-enqueue",
                state
            )),
        })?;
        self.status = CampaignStatus::from_state(next);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Store generated captions. Once non-empty they are never overwritten:
    /// generation is idempotent per campaign.
    pub fn set_captions(&mut self, captions: Vec<String>) {
        if self.captions.0.is_empty() && !captions.is_empty() {
            self.captions = Json(captions);
            self.updated_at = Utc::now();
        }
    }

    /// Store generated hashtags, with the same write-once rule as captions.
    pub fn set_hashtags(&mut self, hashtags: Vec<String>) {
        if self.hashtags.0.is_empty() && !hashtags.is_empty() {
            self.hashtags = Json(hashtags);
            self.updated_at = Utc::now();
        }
    }

    /// Store the generated video reference, write-once.
    pub fn set_video_url(&mut self, video_url: String) {
        if self.video_url.is_none() {
            self.video_url = Some(video_url);
            self.updated_at = Utc::now();
        }
    }

    /// The caption handed to publishers: the first one, or empty.
    pub fn primary_caption(&self) -> String {
        self.captions.0.first().cloned().unwrap_or_default()
    }

    /// Record the per-platform outcome map for this launch attempt under
    /// `metrics.publication_results`, replacing any previous attempt's map.
    pub fn record_publication_results(
        &mut self,
        results: &BTreeMap<String, PublishResult>,
    ) -> Result<()> {
        let value = serde_json::to_value(results)?;
        if let Some(metrics) = self.metrics.0.as_object_mut() {
            metrics.insert("publication_results".to_string(), value);
        } else {
            let mut metrics = serde_json::Map::new();
            metrics.insert("publication_results".to_string(), value);
            self.metrics = Json(serde_json::Value::Object(metrics));
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The per-platform outcomes of the latest launch attempt, if any.
    pub fn publication_results(&self) -> Option<BTreeMap<String, PublishResult>> {
        self.metrics
            .0
            .get("publication_results")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        if self.artist.trim().is_empty() || self.track.trim().is_empty() {
            return Err(Error::Validation(
                "Artist and track are required".to_string(),
            ));
        }
        if self.budget < 0.0 {
            return Err(Error::Validation(
                "Budget cannot be negative".to_string(),
            ));
        }
        if self.duration < 0 {
            return Err(Error::Validation(
                "Duration cannot be negative".to_string(),
            ));
        }

        // One result per targeted platform, no strays
        if let Some(results) = self.publication_results() {
            for platform in results.keys() {
                if !self.platforms.0.contains(platform) {
                    return Err(Error::Validation(format!(
                        "Publication result for untargeted platform '{}'",
                        platform
                    )));
                }
            }
        }

        Ok(())
    }
}

fn generate_campaign_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("CAMP_{}", hex[..10].to_uppercase())
}

/// Per-status counts over the whole campaigns table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub total: i64,
    pub pending: i64,
    pub queued: i64,
    pub generating_captions: i64,
    pub generating_video: i64,
    pub distributing: i64,
    pub completed: i64,
    pub failed: i64,
}

impl CampaignStats {
    /// Campaigns currently inside a launch attempt
    pub fn active(&self) -> i64 {
        self.queued + self.generating_captions + self.generating_video + self.distributing
    }
}

/// One row of the campaign transition journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CampaignEventRecord {
    pub id: i64,
    pub campaign_id: String,
    pub status: CampaignStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Performance numbers observed for a campaign after launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSample {
    pub views: i64,
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
    pub reach: i64,
    pub engagement_rate: f64,
}

/// A persisted performance snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MetricsSnapshot {
    pub id: i64,
    pub campaign_id: String,
    pub views: i64,
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
    pub reach: i64,
    pub engagement_rate: f64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewCampaign {
        NewCampaign {
            artist: "La Sombra".to_string(),
            track: "Neon Nights".to_string(),
            genre: "trap".to_string(),
            mood: "dark".to_string(),
            platforms: vec!["TikTok".to_string(), "YouTube".to_string()],
            budget: 150.0,
            duration: 30,
            video_prompt: Some("neon lights".to_string()),
        }
    }

    #[test]
    fn test_campaign_creation() {
        let campaign = Campaign::new(draft()).unwrap();

        assert!(campaign.id.starts_with("CAMP_"));
        assert_eq!(campaign.id.len(), "CAMP_".len() + 10);
        assert_eq!(campaign.status, CampaignStatus::Pending);
        assert_eq!(campaign.platforms.0, vec!["TikTok", "YouTube"]);
        assert!(campaign.captions.0.is_empty());
        assert!(campaign.hashtags.0.is_empty());
        assert!(campaign.video_url.is_none());
        assert!(campaign.publication_results().is_none());
        assert!(!campaign.is_terminal());
        assert!(campaign.validate().is_ok());
    }

    #[test]
    fn test_campaign_ids_are_unique() {
        let a = Campaign::new(draft()).unwrap();
        let b = Campaign::new(draft()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_creation_validation() {
        let mut missing_artist = draft();
        missing_artist.artist = "  ".to_string();
        assert!(Campaign::new(missing_artist).is_err());

        let mut missing_track = draft();
        missing_track.track = String::new();
        assert!(Campaign::new(missing_track).is_err());

        let mut negative_budget = draft();
        negative_budget.budget = -1.0;
        assert!(Campaign::new(negative_budget).is_err());
    }

    #[test]
    fn test_platform_duplicates_are_ignored() {
        let mut new = draft();
        new.platforms = vec![
            "TikTok".to_string(),
            "tiktok".to_string(),
            "YouTube".to_string(),
            "TikTok".to_string(),
            "".to_string(),
        ];
        let campaign = Campaign::new(new).unwrap();
        // First occurrence wins and keeps its casing.
        assert_eq!(campaign.platforms.0, vec!["TikTok", "YouTube"]);
    }

    #[test]
    fn test_blank_video_prompt_is_dropped() {
        let mut new = draft();
        new.video_prompt = Some("   ".to_string());
        let campaign = Campaign::new(new).unwrap();
        assert!(campaign.video_prompt.is_none());
        assert!(!campaign.needs_video());
    }

    #[test]
    fn test_launch_attempt_transitions() {
        let mut campaign = Campaign::new(draft()).unwrap();

        campaign.enqueue().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Queued);

        campaign.begin_captions().unwrap();
        assert_eq!(campaign.status, CampaignStatus::GeneratingCaptions);

        campaign.begin_video().unwrap();
        assert_eq!(campaign.status, CampaignStatus::GeneratingVideo);

        campaign.begin_distribution().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Distributing);

        campaign.complete().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert!(campaign.is_terminal());

        // Terminal campaigns can only be re-enqueued.
        assert!(campaign.complete().is_err());
        campaign.enqueue().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Queued);
    }

    #[test]
    fn test_invalid_transition_is_a_validation_error() {
        let mut campaign = Campaign::new(draft()).unwrap();
        let err = campaign.complete().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_captions_are_write_once() {
        let mut campaign = Campaign::new(draft()).unwrap();
        assert!(campaign.needs_captions());

        campaign.set_captions(vec!["first".to_string()]);
        assert!(!campaign.needs_captions());

        campaign.set_captions(vec!["overwrite attempt".to_string()]);
        assert_eq!(campaign.captions.0, vec!["first"]);
    }

    #[test]
    fn test_empty_caption_list_does_not_mark_generated() {
        let mut campaign = Campaign::new(draft()).unwrap();
        campaign.set_captions(Vec::new());
        assert!(campaign.needs_captions());
    }

    #[test]
    fn test_video_url_is_write_once() {
        let mut campaign = Campaign::new(draft()).unwrap();
        assert!(campaign.needs_video());

        campaign.set_video_url("data/videos/a.mp4".to_string());
        assert!(!campaign.needs_video());

        campaign.set_video_url("data/videos/b.mp4".to_string());
        assert_eq!(campaign.video_url.as_deref(), Some("data/videos/a.mp4"));
    }

    #[test]
    fn test_primary_caption_falls_back_to_empty() {
        let mut campaign = Campaign::new(draft()).unwrap();
        assert_eq!(campaign.primary_caption(), "");

        campaign.set_captions(vec!["lead".to_string(), "second".to_string()]);
        assert_eq!(campaign.primary_caption(), "lead");
    }

    #[test]
    fn test_publication_results_round_trip() {
        let mut campaign = Campaign::new(draft()).unwrap();

        let mut results = BTreeMap::new();
        results.insert("TikTok".to_string(), PublishResult::success("post_1"));
        results.insert(
            "YouTube".to_string(),
            PublishResult::failure("quota exceeded"),
        );
        campaign.record_publication_results(&results).unwrap();

        let stored = campaign.publication_results().unwrap();
        assert_eq!(stored, results);
        assert!(campaign.validate().is_ok());
    }

    #[test]
    fn test_publication_results_replaced_per_attempt() {
        let mut campaign = Campaign::new(draft()).unwrap();

        let mut first = BTreeMap::new();
        first.insert("TikTok".to_string(), PublishResult::failure("down"));
        first.insert("YouTube".to_string(), PublishResult::failure("down"));
        campaign.record_publication_results(&first).unwrap();

        let mut second = BTreeMap::new();
        second.insert("TikTok".to_string(), PublishResult::success("post_9"));
        second.insert("YouTube".to_string(), PublishResult::success("vid_3"));
        campaign.record_publication_results(&second).unwrap();

        assert_eq!(campaign.publication_results().unwrap(), second);
    }

    #[test]
    fn test_validate_rejects_untargeted_result_platform() {
        let mut campaign = Campaign::new(draft()).unwrap();
        let mut results = BTreeMap::new();
        results.insert("myspace".to_string(), PublishResult::success("post"));
        campaign.record_publication_results(&results).unwrap();
        assert!(campaign.validate().is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!CampaignStatus::Pending.is_terminal());
        assert!(!CampaignStatus::Distributing.is_terminal());
        assert!(CampaignStatus::Completed.is_terminal());
        assert!(CampaignStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serialization_matches_persisted_form() {
        let json = serde_json::to_string(&CampaignStatus::GeneratingCaptions).unwrap();
        assert_eq!(json, "\"GENERATING_CAPTIONS\"");
    }

    #[test]
    fn test_stats_active_aggregate() {
        let stats = CampaignStats {
            total: 10,
            pending: 2,
            queued: 1,
            generating_captions: 1,
            generating_video: 0,
            distributing: 2,
            completed: 3,
            failed: 1,
        };
        assert_eq!(stats.active(), 4);
    }
}
