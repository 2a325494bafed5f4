use thiserror::Error;

use crate::state::{TransitionError, UiState};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("submission form element is missing; nothing was wired up")]
    MissingForm,
}

/// Why a submit or reset event did not run.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("submission ignored while {0}")]
    Busy(UiState),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
