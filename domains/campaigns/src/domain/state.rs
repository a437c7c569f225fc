//! State machine for the campaign launch lifecycle
//!
//! A launch attempt moves a campaign forward through
//! `QUEUED → GENERATING_CAPTIONS → GENERATING_VIDEO → DISTRIBUTING` to a
//! terminal `COMPLETED` or `FAILED`. Creative stages are skipped when their
//! assets already exist, so the machine allows jumping past them. Failure is
//! reachable from every non-terminal state. Re-enqueueing starts a fresh
//! attempt and is valid from every state, including terminal ones.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot apply {event} in state {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} only accepts a re-enqueue")]
    TerminalState(String),
}

/// Campaign lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignState {
    Pending,
    Queued,
    GeneratingCaptions,
    GeneratingVideo,
    Distributing,
    Completed,
    Failed,
}

impl CampaignState {
    /// Check if this state is terminal for a launch attempt. Terminal
    /// campaigns can still be re-enqueued for a new attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Get all valid next states from the current state. Self-loops
    /// (re-enqueueing an already queued campaign) are omitted.
    pub fn valid_transitions(&self) -> &'static [CampaignState] {
        match self {
            Self::Pending => &[Self::Queued, Self::Failed],
            Self::Queued => &[
                Self::GeneratingCaptions,
                Self::GeneratingVideo,
                Self::Distributing,
                Self::Failed,
            ],
            Self::GeneratingCaptions => &[
                Self::Queued,
                Self::GeneratingVideo,
                Self::Distributing,
                Self::Failed,
            ],
            Self::GeneratingVideo => &[Self::Queued, Self::Distributing, Self::Failed],
            Self::Distributing => &[Self::Queued, Self::Completed, Self::Failed],
            Self::Completed => &[Self::Queued],
            Self::Failed => &[Self::Queued],
        }
    }
}

impl std::fmt::Display for CampaignState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Queued => write!(f, "QUEUED"),
            Self::GeneratingCaptions => write!(f, "GENERATING_CAPTIONS"),
            Self::GeneratingVideo => write!(f, "GENERATING_VIDEO"),
            Self::Distributing => write!(f, "DISTRIBUTING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Events that trigger campaign state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignEvent {
    /// A launch attempt is accepted (initial launch, re-launch, recovery)
    Enqueue,
    /// Caption generation begins
    StartCaptions,
    /// Video generation begins
    StartVideo,
    /// Platform fan-out begins
    StartDistribution,
    /// At least one platform publication succeeded
    Succeed,
    /// The attempt failed
    Fail,
}

impl std::fmt::Display for CampaignEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enqueue => write!(f, "enqueue"),
            Self::StartCaptions => write!(f, "start_captions"),
            Self::StartVideo => write!(f, "start_video"),
            Self::StartDistribution => write!(f, "start_distribution"),
            Self::Succeed => write!(f, "succeed"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Campaign state machine
pub struct CampaignStateMachine;

impl CampaignStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error otherwise.
    pub fn transition(
        current: CampaignState,
        event: CampaignEvent,
    ) -> Result<CampaignState, StateError> {
        // Re-enqueueing begins a fresh attempt from any state.
        if event == CampaignEvent::Enqueue {
            return Ok(CampaignState::Queued);
        }

        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            // Creative stages, each skippable when its asset already exists
            (CampaignState::Queued, CampaignEvent::StartCaptions) => {
                CampaignState::GeneratingCaptions
            }
            (
                CampaignState::Queued | CampaignState::GeneratingCaptions,
                CampaignEvent::StartVideo,
            ) => CampaignState::GeneratingVideo,
            (
                CampaignState::Queued
                | CampaignState::GeneratingCaptions
                | CampaignState::GeneratingVideo,
                CampaignEvent::StartDistribution,
            ) => CampaignState::Distributing,

            // Completion only out of distribution
            (CampaignState::Distributing, CampaignEvent::Succeed) => CampaignState::Completed,

            // Failure from any non-terminal state
            (_, CampaignEvent::Fail) => CampaignState::Failed,

            // Invalid transitions
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: CampaignState, event: CampaignEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod campaign_state_machine {
        use super::*;

        #[test]
        fn test_enqueue_from_pending() {
            let result =
                CampaignStateMachine::transition(CampaignState::Pending, CampaignEvent::Enqueue);
            assert_eq!(result, Ok(CampaignState::Queued));
        }

        #[test]
        fn test_enqueue_is_valid_from_every_state() {
            let all = [
                CampaignState::Pending,
                CampaignState::Queued,
                CampaignState::GeneratingCaptions,
                CampaignState::GeneratingVideo,
                CampaignState::Distributing,
                CampaignState::Completed,
                CampaignState::Failed,
            ];
            for state in all {
                assert_eq!(
                    CampaignStateMachine::transition(state, CampaignEvent::Enqueue),
                    Ok(CampaignState::Queued),
                    "enqueue from {}",
                    state
                );
            }
        }

        #[test]
        fn test_full_creative_pipeline_order() {
            let result = CampaignStateMachine::transition(
                CampaignState::Queued,
                CampaignEvent::StartCaptions,
            );
            assert_eq!(result, Ok(CampaignState::GeneratingCaptions));

            let result = CampaignStateMachine::transition(
                CampaignState::GeneratingCaptions,
                CampaignEvent::StartVideo,
            );
            assert_eq!(result, Ok(CampaignState::GeneratingVideo));

            let result = CampaignStateMachine::transition(
                CampaignState::GeneratingVideo,
                CampaignEvent::StartDistribution,
            );
            assert_eq!(result, Ok(CampaignState::Distributing));

            let result = CampaignStateMachine::transition(
                CampaignState::Distributing,
                CampaignEvent::Succeed,
            );
            assert_eq!(result, Ok(CampaignState::Completed));
        }

        #[test]
        fn test_caption_stage_can_be_skipped() {
            let result =
                CampaignStateMachine::transition(CampaignState::Queued, CampaignEvent::StartVideo);
            assert_eq!(result, Ok(CampaignState::GeneratingVideo));
        }

        #[test]
        fn test_both_creative_stages_can_be_skipped() {
            let result = CampaignStateMachine::transition(
                CampaignState::Queued,
                CampaignEvent::StartDistribution,
            );
            assert_eq!(result, Ok(CampaignState::Distributing));
        }

        #[test]
        fn test_fail_from_every_non_terminal_state() {
            let non_terminal = [
                CampaignState::Pending,
                CampaignState::Queued,
                CampaignState::GeneratingCaptions,
                CampaignState::GeneratingVideo,
                CampaignState::Distributing,
            ];
            for state in non_terminal {
                assert_eq!(
                    CampaignStateMachine::transition(state, CampaignEvent::Fail),
                    Ok(CampaignState::Failed),
                    "fail from {}",
                    state
                );
            }
        }

        #[test]
        fn test_no_backwards_creative_transition() {
            let result = CampaignStateMachine::transition(
                CampaignState::GeneratingVideo,
                CampaignEvent::StartCaptions,
            );
            assert!(matches!(result, Err(StateError::InvalidTransition { .. })));
        }

        #[test]
        fn test_cannot_succeed_before_distributing() {
            let result =
                CampaignStateMachine::transition(CampaignState::Queued, CampaignEvent::Succeed);
            assert!(matches!(result, Err(StateError::InvalidTransition { .. })));
        }

        #[test]
        fn test_terminal_states_reject_everything_but_enqueue() {
            for state in [CampaignState::Completed, CampaignState::Failed] {
                let result = CampaignStateMachine::transition(state, CampaignEvent::Fail);
                assert!(matches!(result, Err(StateError::TerminalState(_))));

                let result = CampaignStateMachine::transition(state, CampaignEvent::Succeed);
                assert!(matches!(result, Err(StateError::TerminalState(_))));
            }
        }

        #[test]
        fn test_is_terminal() {
            assert!(!CampaignState::Pending.is_terminal());
            assert!(!CampaignState::Queued.is_terminal());
            assert!(!CampaignState::Distributing.is_terminal());
            assert!(CampaignState::Completed.is_terminal());
            assert!(CampaignState::Failed.is_terminal());
        }

        #[test]
        fn test_can_transition() {
            assert!(CampaignStateMachine::can_transition(
                CampaignState::Queued,
                CampaignEvent::StartCaptions
            ));
            assert!(!CampaignStateMachine::can_transition(
                CampaignState::Completed,
                CampaignEvent::Succeed
            ));
        }

        #[test]
        fn test_valid_transitions_from_distributing() {
            let transitions = CampaignState::Distributing.valid_transitions();
            assert!(transitions.contains(&CampaignState::Completed));
            assert!(transitions.contains(&CampaignState::Failed));
            assert!(transitions.contains(&CampaignState::Queued));
            assert_eq!(transitions.len(), 3);
        }

        #[test]
        fn test_terminal_states_can_only_requeue() {
            assert_eq!(
                CampaignState::Completed.valid_transitions(),
                &[CampaignState::Queued]
            );
            assert_eq!(
                CampaignState::Failed.valid_transitions(),
                &[CampaignState::Queued]
            );
        }

        #[test]
        fn test_display_matches_persisted_representation() {
            assert_eq!(
                CampaignState::GeneratingCaptions.to_string(),
                "GENERATING_CAPTIONS"
            );
            assert_eq!(CampaignState::Completed.to_string(), "COMPLETED");
        }
    }
}
