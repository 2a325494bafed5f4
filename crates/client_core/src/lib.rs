//! Client core for the trunk fat risk form: validation, request orchestration
//! and result rendering over an injected UI surface.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod renderer;
pub mod service;
pub mod state;
pub mod surface;
mod timer;
pub mod validator;

pub use config::{load_settings, Settings};
pub use error::{SessionError, SetupError};
pub use orchestrator::{Orchestrator, SubmitOutcome};
pub use renderer::{Renderer, LOW_RISK_LABEL};
pub use service::{HttpPredictionClient, Prediction, PredictionService, SubmitError};
pub use state::UiState;
pub use surface::{MemorySurface, Region, RiskBadge, ScrollTarget, TextSlot, UiSurface};
pub use validator::{validate, FormInput, ValidatedInput, ValidationError};
