//! Campaigns domain: campaign records, launch state machine, stores, launcher

pub mod domain;
pub mod launcher;
pub mod store;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{CampaignEvent, CampaignState, CampaignStateMachine, StateError};
pub use launcher::CampaignLauncher;
pub use store::{CampaignEventStore, CampaignStore, MetricsStore, Stores};
