//! Campaign launcher
//!
//! Drives one campaign through its launch lifecycle: accept the attempt,
//! generate creative assets that do not exist yet, fan out to every targeted
//! platform, and persist a final verdict. The central property is failure
//! isolation: one platform failing never prevents the remaining platforms
//! from being attempted, and every platform ends up with exactly one entry
//! in `metrics.publication_results`.
//!
//! Status checkpoints are persisted before each stage so a supervisor can
//! tell where a crashed launch stopped. A failed checkpoint write is logged
//! and skipped: losing a status update is preferable to losing the launch.
//!
//! Concurrent launches of different campaigns are safe. Launches of the
//! *same* campaign id are not coordinated here; callers must serialize them
//! (duplicate posts on concurrent or retried launches are an accepted,
//! documented risk).

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use stakazo_common::Result;
use stakazo_creative::{CopyService, VideoService};
use stakazo_publish::{PublishError, PublishResult, PublisherRegistry};

use crate::domain::entities::{Campaign, CampaignStatus};
use crate::domain::state::CampaignEvent;
use crate::store::Stores;

const CAPTION_COUNT: usize = 3;
const HASHTAG_COUNT: usize = 5;

/// Orchestrates campaign launches end to end
pub struct CampaignLauncher {
    stores: Stores,
    copy: Arc<dyn CopyService>,
    video: Arc<dyn VideoService>,
    publishers: PublisherRegistry,
}

impl CampaignLauncher {
    pub fn new(
        stores: Stores,
        copy: Arc<dyn CopyService>,
        video: Arc<dyn VideoService>,
        publishers: PublisherRegistry,
    ) -> Self {
        Self {
            stores,
            copy,
            video,
            publishers,
        }
    }

    /// Execute the full launch flow for an existing campaign.
    ///
    /// Returns true when the final status is not FAILED. An unknown id
    /// returns false without touching the store.
    pub async fn launch(&self, campaign_id: &str) -> bool {
        info!(campaign_id, "Launching campaign");

        let mut campaign = match self.stores.campaigns.get(campaign_id).await {
            Ok(campaign) => campaign,
            Err(err) if err.is_not_found() => {
                error!(campaign_id, "Campaign not found, aborting launch");
                return false;
            }
            Err(err) => {
                error!(campaign_id, error = %err, "Failed to load campaign, aborting launch");
                return false;
            }
        };

        // Crash-recovery checkpoint: QUEUED means the launch was accepted
        // but not yet started.
        if let Err(err) = self
            .checkpoint(&mut campaign, CampaignEvent::Enqueue, "Launch accepted")
            .await
        {
            error!(campaign_id, error = %err, "Failed to enqueue campaign");
            self.force_fail(&mut campaign).await;
            return false;
        }

        match self.run_stages(&mut campaign).await {
            Ok(succeeded) => {
                info!(
                    campaign_id,
                    status = %campaign.status,
                    "Campaign launch finished"
                );
                succeeded
            }
            Err(err) => {
                error!(campaign_id, error = %err, "Campaign launch failed unexpectedly");
                self.force_fail(&mut campaign).await;
                false
            }
        }
    }

    /// Stages 3-7 of the launch flow. Only unexpected errors bubble out of
    /// here; expected failure kinds become data along the way.
    async fn run_stages(&self, campaign: &mut Campaign) -> Result<bool> {
        self.generate_assets(campaign).await?;

        let results = self.distribute(campaign).await?;

        campaign.record_publication_results(&results)?;
        if let Err(err) = self.stores.campaigns.save(campaign).await {
            warn!(
                campaign_id = %campaign.id,
                error = %err,
                "Failed to persist publication results, continuing"
            );
        }

        // At least one successful platform completes the campaign.
        let succeeded = results.values().any(|result| result.is_success());
        let (event, message) = if succeeded {
            (CampaignEvent::Succeed, "Launch completed")
        } else {
            (CampaignEvent::Fail, "No platform publication succeeded")
        };
        self.checkpoint(campaign, event, message).await?;

        Ok(succeeded)
    }

    /// Creative stage: captions, hashtags and video, each generated only
    /// when missing so a re-launch never regenerates existing assets.
    async fn generate_assets(&self, campaign: &mut Campaign) -> Result<()> {
        if campaign.needs_captions() || campaign.needs_hashtags() {
            self.checkpoint(
                campaign,
                CampaignEvent::StartCaptions,
                "Generating captions",
            )
            .await?;

            let brief = campaign.brief();
            if campaign.needs_captions() {
                let captions = self.copy.generate_captions(&brief, CAPTION_COUNT).await;
                info!(campaign_id = %campaign.id, count = captions.len(), "Captions generated");
                campaign.set_captions(captions);
            }
            if campaign.needs_hashtags() {
                let hashtags = self.copy.generate_hashtags(&brief, HASHTAG_COUNT).await;
                campaign.set_hashtags(hashtags);
            }

            if let Err(err) = self.stores.campaigns.save(campaign).await {
                warn!(
                    campaign_id = %campaign.id,
                    error = %err,
                    "Failed to persist generated copy, continuing"
                );
            }
        }

        if campaign.needs_video() {
            self.checkpoint(campaign, CampaignEvent::StartVideo, "Generating video")
                .await?;

            let prompt = campaign.video_prompt.clone().unwrap_or_default();
            match self.video.generate_video(&prompt).await {
                Ok(video_url) => {
                    info!(campaign_id = %campaign.id, video_url = %video_url, "Video generated");
                    campaign.set_video_url(video_url);
                    if let Err(err) = self.stores.campaigns.save(campaign).await {
                        warn!(
                            campaign_id = %campaign.id,
                            error = %err,
                            "Failed to persist video reference, continuing"
                        );
                    }
                }
                Err(err) => {
                    // Video absence is not fatal; distribution records a
                    // per-platform failure for platforms that need one.
                    warn!(
                        campaign_id = %campaign.id,
                        error = %err,
                        "Video generation failed, continuing without an asset"
                    );
                }
            }
        }

        Ok(())
    }

    /// Distribution stage: sequential fan-out over the targeted platforms,
    /// in listed order, capturing exactly one outcome per platform.
    async fn distribute(
        &self,
        campaign: &mut Campaign,
    ) -> Result<BTreeMap<String, PublishResult>> {
        self.checkpoint(
            campaign,
            CampaignEvent::StartDistribution,
            "Distributing to platforms",
        )
        .await?;

        let caption = campaign.primary_caption();
        let mut results = BTreeMap::new();

        for platform in &campaign.platforms.0 {
            info!(campaign_id = %campaign.id, platform = %platform, "Distributing");

            let result = match self.publishers.get(platform) {
                None => {
                    warn!(platform = %platform, "No publisher wired for platform");
                    PublishResult::failure(PublishError::Unsupported(platform.clone()))
                }
                Some(publisher) => {
                    if campaign.video_url.is_none() && publisher.requires_asset() {
                        PublishResult::failure(PublishError::NoAsset(platform.clone()))
                    } else {
                        match publisher
                            .publish(campaign.video_url.as_deref(), &caption)
                            .await
                        {
                            Ok(post_id) => {
                                info!(platform = %platform, post_id = %post_id, "Published");
                                PublishResult::success(post_id)
                            }
                            Err(err) => {
                                warn!(platform = %platform, error = %err, "Publish failed");
                                PublishResult::failure(err)
                            }
                        }
                    }
                }
            };

            results.insert(platform.clone(), result);
        }

        Ok(results)
    }

    /// Apply a transition, then best-effort persist the new status and a
    /// journal entry. Only the transition itself can error.
    async fn checkpoint(
        &self,
        campaign: &mut Campaign,
        event: CampaignEvent,
        message: &str,
    ) -> Result<()> {
        campaign.apply(event)?;

        match self
            .stores
            .campaigns
            .set_status(&campaign.id, campaign.status)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    campaign_id = %campaign.id,
                    status = %campaign.status,
                    "Status checkpoint found no campaign row"
                );
            }
            Err(err) => {
                warn!(
                    campaign_id = %campaign.id,
                    status = %campaign.status,
                    error = %err,
                    "Failed to persist status checkpoint, continuing"
                );
            }
        }

        if let Err(err) = self
            .stores
            .events
            .record(&campaign.id, campaign.status, message)
            .await
        {
            warn!(
                campaign_id = %campaign.id,
                error = %err,
                "Failed to record campaign event, continuing"
            );
        }

        Ok(())
    }

    /// Escalation path for unexpected errors: best-effort force the
    /// campaign into FAILED.
    async fn force_fail(&self, campaign: &mut Campaign) {
        if !campaign.status.is_terminal() {
            if let Err(err) = campaign.apply(CampaignEvent::Fail) {
                warn!(campaign_id = %campaign.id, error = %err, "Could not apply failure transition");
            }
        }
        if let Err(err) = self
            .stores
            .campaigns
            .set_status(&campaign.id, CampaignStatus::Failed)
            .await
        {
            warn!(
                campaign_id = %campaign.id,
                error = %err,
                "Failed to persist FAILED status"
            );
        }
        if let Err(err) = self
            .stores
            .events
            .record(&campaign.id, CampaignStatus::Failed, "Launch failed")
            .await
        {
            warn!(campaign_id = %campaign.id, error = %err, "Failed to record failure event");
        }
    }
}
