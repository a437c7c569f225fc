//! Campaign event journal store
//!
//! Append-only record of status checkpoints written by the launcher, so an
//! operator can reconstruct how a campaign reached its current state.

use chrono::Utc;
use sqlx::SqlitePool;

use stakazo_common::Result;

use crate::domain::entities::{CampaignEventRecord, CampaignStatus};

#[derive(Clone)]
pub struct CampaignEventStore {
    pool: SqlitePool,
}

impl CampaignEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a journal entry for a status checkpoint
    pub async fn record(
        &self,
        campaign_id: &str,
        status: CampaignStatus,
        message: &str,
    ) -> Result<CampaignEventRecord> {
        let row = sqlx::query_as::<_, CampaignEventRecord>(
            r#"
            INSERT INTO campaign_events (campaign_id, status, message, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, campaign_id, status, message, created_at
            "#,
        )
        .bind(campaign_id)
        .bind(status)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List a campaign's journal in append order
    pub async fn list(&self, campaign_id: &str) -> Result<Vec<CampaignEventRecord>> {
        let rows = sqlx::query_as::<_, CampaignEventRecord>(
            r#"
            SELECT id, campaign_id, status, message, created_at
            FROM campaign_events
            WHERE campaign_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
