//! UI state machine shared by the orchestrator and the renderer.

use std::{fmt, sync::Mutex};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl UiState {
    /// Whether a new submission may start from this state.
    pub fn accepts_submit(self) -> bool {
        matches!(self, UiState::Idle | UiState::Error)
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Success => "success",
            UiState::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    SubmitAccepted,
    SubmitInvalid,
    ResponseSucceeded,
    ResponseFailed,
    BannerExpired,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event {event:?} is not allowed in state {state}")]
pub struct TransitionError {
    pub state: UiState,
    pub event: UiEvent,
}

/// Pure transition table. `BannerExpired` outside `Error` leaves the state alone
/// because a newer submission already moved on.
pub fn next_state(state: UiState, event: UiEvent) -> Result<UiState, TransitionError> {
    match (state, event) {
        (UiState::Idle | UiState::Error, UiEvent::SubmitAccepted) => Ok(UiState::Loading),
        (UiState::Idle | UiState::Error, UiEvent::SubmitInvalid) => Ok(UiState::Error),
        (UiState::Loading, UiEvent::ResponseSucceeded) => Ok(UiState::Success),
        (UiState::Loading, UiEvent::ResponseFailed) => Ok(UiState::Error),
        (UiState::Error, UiEvent::BannerExpired) => Ok(UiState::Idle),
        (other, UiEvent::BannerExpired) => Ok(other),
        (UiState::Idle | UiState::Success | UiState::Error, UiEvent::Reset) => Ok(UiState::Idle),
        (state, event) => Err(TransitionError { state, event }),
    }
}

#[derive(Debug, Default)]
pub struct StateCell {
    inner: Mutex<UiState>,
}

impl StateCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> UiState {
        *self.lock()
    }

    pub fn apply(&self, event: UiEvent) -> Result<UiState, TransitionError> {
        let mut guard = self.lock();
        let from = *guard;
        let to = next_state(from, event)?;
        if from != to {
            debug!(%from, %to, ?event, "ui state transition");
        }
        *guard = to;
        Ok(to)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, UiState> {
        // A poisoned lock still holds a valid enum value.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authoritative_transitions_hold() {
        assert_eq!(next_state(UiState::Idle, UiEvent::SubmitAccepted), Ok(UiState::Loading));
        assert_eq!(next_state(UiState::Loading, UiEvent::ResponseSucceeded), Ok(UiState::Success));
        assert_eq!(next_state(UiState::Loading, UiEvent::ResponseFailed), Ok(UiState::Error));
        assert_eq!(next_state(UiState::Error, UiEvent::BannerExpired), Ok(UiState::Idle));
        assert_eq!(next_state(UiState::Error, UiEvent::SubmitAccepted), Ok(UiState::Loading));
        assert_eq!(next_state(UiState::Success, UiEvent::Reset), Ok(UiState::Idle));
        assert_eq!(next_state(UiState::Idle, UiEvent::SubmitInvalid), Ok(UiState::Error));
    }

    #[test]
    fn submit_is_rejected_while_loading_or_after_success() {
        for state in [UiState::Loading, UiState::Success] {
            assert!(!state.accepts_submit());
            assert!(next_state(state, UiEvent::SubmitAccepted).is_err());
        }
    }

    #[test]
    fn reset_is_idempotent_outside_loading() {
        for state in [UiState::Idle, UiState::Success, UiState::Error] {
            assert_eq!(next_state(state, UiEvent::Reset), Ok(UiState::Idle));
        }
        assert!(next_state(UiState::Loading, UiEvent::Reset).is_err());
    }

    #[test]
    fn late_banner_expiry_does_not_disturb_newer_state() {
        assert_eq!(next_state(UiState::Loading, UiEvent::BannerExpired), Ok(UiState::Loading));
        assert_eq!(next_state(UiState::Success, UiEvent::BannerExpired), Ok(UiState::Success));
    }

    #[test]
    fn rejected_event_leaves_cell_untouched() {
        let cell = StateCell::new();
        cell.apply(UiEvent::SubmitAccepted).expect("submit");
        let err = cell.apply(UiEvent::Reset).expect_err("reset while loading");
        assert_eq!(err.state, UiState::Loading);
        assert_eq!(cell.current(), UiState::Loading);
    }
}
