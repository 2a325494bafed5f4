use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure body the prediction service attaches to rejected requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown gender value: {0:?}")]
pub struct ParseGenderError(pub String);
