//! Drives one submission from field snapshot to rendered outcome.

use std::{sync::Arc, time::Duration};

use shared::domain::FormField;
use tracing::{error, info, warn};

use crate::{
    error::{SessionError, SetupError},
    renderer::Renderer,
    service::{Prediction, PredictionService, SubmitError},
    state::{StateCell, UiEvent, UiState},
    surface::{Region, UiSurface},
    validator::{validate, FormInput, ValidationError},
};

/// How an accepted submit event ended. Every variant has already been rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(Prediction),
    Rejected(ValidationError),
    Failed(SubmitError),
}

pub struct Orchestrator<S: UiSurface + 'static, P: PredictionService> {
    surface: Arc<S>,
    service: P,
    state: Arc<StateCell>,
    renderer: Renderer<S>,
}

impl<S: UiSurface + 'static, P: PredictionService> Orchestrator<S, P> {
    /// Wires the core to a surface. Without a form there is nothing to drive.
    pub fn attach(surface: Arc<S>, service: P, banner_delay: Duration) -> Result<Self, SetupError> {
        if !surface.has_form() {
            error!("submission form not found on surface; skipping setup");
            return Err(SetupError::MissingForm);
        }

        surface.hide(Region::Result);
        surface.hide(Region::ErrorBanner);
        surface.set_submit_busy(false);

        let state = Arc::new(StateCell::new());
        let renderer = Renderer::new(Arc::clone(&surface), Arc::clone(&state), banner_delay);
        info!(banner_ms = banner_delay.as_millis() as u64, "prediction form attached");
        Ok(Self {
            surface,
            service,
            state,
            renderer,
        })
    }

    pub fn state(&self) -> UiState {
        self.state.current()
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let current = self.state.current();
        if !current.accepts_submit() {
            warn!(state = %current, "submit ignored");
            return Err(SessionError::Busy(current));
        }

        let form = FormInput::from_surface(self.surface.as_ref());
        let validated = match validate(&form) {
            Ok(validated) => validated,
            Err(err) => {
                self.state
                    .apply(UiEvent::SubmitInvalid)
                    .map_err(|rejected| SessionError::Busy(rejected.state))?;
                info!(fields = ?err.fields(), error = %err, "form rejected by validation");
                self.renderer.mark_invalid(&err.fields());
                self.renderer.render_error(&err.to_string());
                return Ok(SubmitOutcome::Rejected(err));
            }
        };

        self.state
            .apply(UiEvent::SubmitAccepted)
            .map_err(|rejected| SessionError::Busy(rejected.state))?;
        self.renderer.mark_invalid(&[]);
        self.renderer.dismiss_error();
        self.renderer.hide_result();

        let guard = LoadingGuard::engage(&self.state, self.surface.as_ref());
        let result = self.service.predict(&validated).await;
        guard.settle(if result.is_ok() {
            UiEvent::ResponseSucceeded
        } else {
            UiEvent::ResponseFailed
        });

        match result {
            Ok(prediction) => {
                self.renderer.render_success(&prediction);
                Ok(SubmitOutcome::Succeeded(prediction))
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "prediction failed");
                self.renderer.render_error(&err.to_string());
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        self.renderer.reset()?;
        info!("form reset");
        Ok(())
    }

    pub fn field_edited(&self, field: FormField) {
        self.renderer.field_edited(field);
    }
}

/// Keeps the submit control disabled while a request is in flight and makes
/// sure `Loading` is left even if the request future is dropped.
struct LoadingGuard<'a, S: UiSurface> {
    state: &'a StateCell,
    surface: &'a S,
    settled: bool,
}

impl<'a, S: UiSurface> LoadingGuard<'a, S> {
    fn engage(state: &'a StateCell, surface: &'a S) -> Self {
        surface.set_submit_busy(true);
        Self {
            state,
            surface,
            settled: false,
        }
    }

    fn settle(mut self, event: UiEvent) {
        if let Err(err) = self.state.apply(event) {
            warn!(error = %err, "settling submission");
        }
        self.settled = true;
    }
}

impl<S: UiSurface> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_submit_busy(false);
        if !self.settled && self.state.current() == UiState::Loading {
            warn!("submission abandoned before the reply settled");
            let _ = self.state.apply(UiEvent::ResponseFailed);
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
