// Stakazo - campaign launch worker
//
// Composition root: constructs the store, creative services and publisher
// registry once, wires them into a single CampaignLauncher, then drains
// every pending campaign sequentially.

use std::sync::Arc;

use tracing::{error, info, warn};

use stakazo_campaigns::{CampaignLauncher, CampaignStatus, Stores};
use stakazo_common::Config;
use stakazo_creative::{CopyConfig, CopyServiceFactory, VideoConfig, VideoServiceFactory};
use stakazo_publish::{PublishConfig, PublisherRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .pretty()
        .init();

    info!("Starting Stakazo campaign launch worker");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if config.dummy_mode {
        warn!("DUMMY_MODE is on, no real publications will happen");
    }

    // The default database and render output live under data/.
    std::fs::create_dir_all("data").ok();

    let stores = Stores::connect(&config.database_url).await.map_err(|e| {
        error!("Failed to open database: {}", e);
        anyhow::anyhow!("Database connection failed: {}", e)
    })?;

    info!(database_url = %config.database_url, "Database ready");

    let copy = CopyServiceFactory::create(CopyConfig {
        provider: config.copy_provider.clone(),
        openai_api_key: config.openai_api_key.clone(),
    })?;
    let video = VideoServiceFactory::create(VideoConfig {
        provider: config.video_provider.clone(),
        output_dir: config.video_output_dir.clone(),
    })?;
    let publishers = PublisherRegistry::from_config(&PublishConfig {
        dummy_mode: config.dummy_mode,
        meta_access_token: config.meta_access_token.clone(),
        meta_page_id: config.meta_page_id.clone(),
        meta_ig_user_id: config.meta_ig_user_id.clone(),
        tiktok_access_token: config.tiktok_access_token.clone(),
        youtube_access_token: config.youtube_access_token.clone(),
    });

    let launcher = CampaignLauncher::new(
        stores.clone(),
        Arc::from(copy),
        Arc::from(video),
        publishers,
    );

    let pending = stores.campaigns.list(Some(CampaignStatus::Pending)).await?;
    info!(count = pending.len(), "Draining pending campaigns");

    let mut launched = 0usize;
    for campaign in pending {
        if launcher.launch(&campaign.id).await {
            launched += 1;
        } else {
            warn!(campaign_id = %campaign.id, "Launch finished with FAILED status");
        }
    }

    let stats = stores.campaigns.stats().await?;
    info!(
        launched,
        total = stats.total,
        active = stats.active(),
        completed = stats.completed,
        failed = stats.failed,
        "Worker run complete"
    );

    Ok(())
}
