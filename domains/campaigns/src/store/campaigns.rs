//! Campaign store

use chrono::Utc;
use sqlx::SqlitePool;

use stakazo_common::{Error, Result};

use crate::domain::entities::{Campaign, CampaignStats, CampaignStatus};

const CAMPAIGN_COLUMNS: &str = "id, artist, track, genre, mood, platforms, budget, duration, \
     video_url, video_prompt, captions, hashtags, status, metrics, created_at, updated_at";

#[derive(Clone)]
pub struct CampaignStore {
    pool: SqlitePool,
}

impl CampaignStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a campaign by id
    pub async fn get(&self, id: &str) -> Result<Campaign> {
        let row = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {} FROM campaigns WHERE id = ?",
            CAMPAIGN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound(format!("campaign {}", id)))
    }

    /// Insert or replace a campaign, keyed by id. `updated_at` is always
    /// stamped fresh; `created_at` keeps its insert-time value.
    pub async fn save(&self, campaign: &Campaign) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (id, artist, track, genre, mood, platforms, budget, duration,
                                   video_url, video_prompt, captions, hashtags, status, metrics,
                                   created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                artist = excluded.artist,
                track = excluded.track,
                genre = excluded.genre,
                mood = excluded.mood,
                platforms = excluded.platforms,
                budget = excluded.budget,
                duration = excluded.duration,
                video_url = excluded.video_url,
                video_prompt = excluded.video_prompt,
                captions = excluded.captions,
                hashtags = excluded.hashtags,
                status = excluded.status,
                metrics = excluded.metrics,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&campaign.id)
        .bind(&campaign.artist)
        .bind(&campaign.track)
        .bind(&campaign.genre)
        .bind(&campaign.mood)
        .bind(&campaign.platforms)
        .bind(campaign.budget)
        .bind(campaign.duration)
        .bind(&campaign.video_url)
        .bind(&campaign.video_prompt)
        .bind(&campaign.captions)
        .bind(&campaign.hashtags)
        .bind(campaign.status)
        .bind(&campaign.metrics)
        .bind(campaign.created_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Update only the status and `updated_at`. Returns false when no such
    /// campaign exists.
    pub async fn set_status(&self, id: &str, status: CampaignStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE campaigns SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List campaigns, optionally filtered by status, newest first
    pub async fn list(&self, status_filter: Option<CampaignStatus>) -> Result<Vec<Campaign>> {
        let mut query = format!("SELECT {} FROM campaigns", CAMPAIGN_COLUMNS);
        if status_filter.is_some() {
            query.push_str(" WHERE status = ?");
        }
        query.push_str(" ORDER BY created_at DESC");

        if let Some(status) = status_filter {
            let rows = sqlx::query_as::<_, Campaign>(&query)
                .bind(status)
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        } else {
            let rows = sqlx::query_as::<_, Campaign>(&query)
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }
    }

    /// Per-status counts from a full scan
    pub async fn stats(&self) -> Result<CampaignStats> {
        let rows = sqlx::query_as::<_, (CampaignStatus, i64)>(
            "SELECT status, COUNT(*) FROM campaigns GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = CampaignStats::default();
        for (status, count) in rows {
            stats.total += count;
            match status {
                CampaignStatus::Pending => stats.pending = count,
                CampaignStatus::Queued => stats.queued = count,
                CampaignStatus::GeneratingCaptions => stats.generating_captions = count,
                CampaignStatus::GeneratingVideo => stats.generating_video = count,
                CampaignStatus::Distributing => stats.distributing = count,
                CampaignStatus::Completed => stats.completed = count,
                CampaignStatus::Failed => stats.failed = count,
            }
        }
        Ok(stats)
    }
}
