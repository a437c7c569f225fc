//! Store implementations for the Campaigns domain
//!
//! Durable persistence over embedded SQLite. The schema is created on
//! connect, so a fresh deployment needs no migration step.

pub mod campaigns;
pub mod events;
pub mod metrics;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use stakazo_common::Result;

pub use campaigns::CampaignStore;
pub use events::CampaignEventStore;
pub use metrics::MetricsStore;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS campaigns (
        id TEXT PRIMARY KEY,
        artist TEXT NOT NULL,
        track TEXT NOT NULL,
        genre TEXT NOT NULL DEFAULT '',
        mood TEXT NOT NULL DEFAULT '',
        platforms TEXT NOT NULL DEFAULT '[]',
        budget REAL NOT NULL DEFAULT 0,
        duration INTEGER NOT NULL DEFAULT 0,
        video_url TEXT,
        video_prompt TEXT,
        captions TEXT NOT NULL DEFAULT '[]',
        hashtags TEXT NOT NULL DEFAULT '[]',
        status TEXT NOT NULL DEFAULT 'PENDING',
        metrics TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS campaign_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        campaign_id TEXT NOT NULL REFERENCES campaigns(id),
        status TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS campaign_metrics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        campaign_id TEXT NOT NULL REFERENCES campaigns(id),
        views INTEGER NOT NULL DEFAULT 0,
        likes INTEGER NOT NULL DEFAULT 0,
        shares INTEGER NOT NULL DEFAULT 0,
        comments INTEGER NOT NULL DEFAULT 0,
        reach INTEGER NOT NULL DEFAULT 0,
        engagement_rate REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )",
];

/// Combined store access for the Campaigns domain
#[derive(Clone)]
pub struct Stores {
    pool: SqlitePool,
    pub campaigns: CampaignStore,
    pub events: CampaignEventStore,
    pub metrics: MetricsStore,
}

impl Stores {
    /// Open (and create if missing) the database at `database_url` and
    /// ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::initialize(pool).await
    }

    /// In-memory database for tests. A single connection keeps every
    /// handle on the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::initialize(pool).await
    }

    async fn initialize(pool: SqlitePool) -> Result<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self {
            campaigns: CampaignStore::new(pool.clone()),
            events: CampaignEventStore::new(pool.clone()),
            metrics: MetricsStore::new(pool.clone()),
            pool,
        })
    }

    /// Get a reference to the underlying database pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
