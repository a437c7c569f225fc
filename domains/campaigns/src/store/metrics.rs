//! Campaign performance metrics store
//!
//! Snapshots of post-launch performance numbers, appended by the reporting
//! side of the system and read back newest first.

use chrono::Utc;
use sqlx::SqlitePool;

use stakazo_common::Result;

use crate::domain::entities::{MetricsSample, MetricsSnapshot};

#[derive(Clone)]
pub struct MetricsStore {
    pool: SqlitePool,
}

impl MetricsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a performance snapshot for a campaign
    pub async fn record(&self, campaign_id: &str, sample: &MetricsSample) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO campaign_metrics
                (campaign_id, views, likes, shares, comments, reach, engagement_rate, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(campaign_id)
        .bind(sample.views)
        .bind(sample.likes)
        .bind(sample.shares)
        .bind(sample.comments)
        .bind(sample.reach)
        .bind(sample.engagement_rate)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// A campaign's snapshot history, most recent first
    pub async fn history(&self, campaign_id: &str) -> Result<Vec<MetricsSnapshot>> {
        let rows = sqlx::query_as::<_, MetricsSnapshot>(
            r#"
            SELECT id, campaign_id, views, likes, shares, comments, reach, engagement_rate, created_at
            FROM campaign_metrics
            WHERE campaign_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
