//! Projects outcomes onto the [`UiSurface`] and owns the error-banner timer.

use std::{sync::Arc, time::Duration};

use shared::domain::FormField;
use tracing::{debug, warn};

use crate::{
    service::Prediction,
    state::{StateCell, TransitionError, UiEvent},
    surface::{Region, RiskBadge, ScrollTarget, TextSlot, UiSurface},
    timer::DismissTimer,
};

/// `risk_level` value the service uses for the low-risk category.
pub const LOW_RISK_LABEL: &str = "较低";

pub const DEFAULT_BANNER_DELAY: Duration = Duration::from_secs(5);

pub fn format_percentage(value: f64) -> String {
    format!("{value}%")
}

pub fn badge_for(risk_level: &str) -> RiskBadge {
    if risk_level == LOW_RISK_LABEL {
        RiskBadge::Low
    } else {
        RiskBadge::Elevated
    }
}

pub struct Renderer<S: UiSurface + 'static> {
    surface: Arc<S>,
    state: Arc<StateCell>,
    banner_timer: DismissTimer,
}

impl<S: UiSurface + 'static> Renderer<S> {
    pub fn new(surface: Arc<S>, state: Arc<StateCell>, banner_delay: Duration) -> Self {
        Self {
            surface,
            state,
            banner_timer: DismissTimer::new(banner_delay),
        }
    }

    pub fn render_success(&self, prediction: &Prediction) {
        let surface = &self.surface;
        let interpretation = &prediction.interpretation;

        surface.set_text(
            TextSlot::Percentage,
            &format_percentage(prediction.trunk_fat_percentage),
        );
        surface.set_badge(&interpretation.risk_level, badge_for(&interpretation.risk_level));
        surface.set_text(TextSlot::Advice, &interpretation.advice);
        surface.set_text(TextSlot::DetailedAdvice, &interpretation.detailed_advice);
        surface.set_text(TextSlot::CutoffNote, &interpretation.cutoff_note);

        if interpretation.recommendation.is_empty() {
            surface.set_recommendations(&[]);
            surface.hide(Region::Recommendations);
        } else {
            surface.set_recommendations(&interpretation.recommendation);
            surface.show(Region::Recommendations);
        }

        surface.show(Region::Result);
        surface.scroll_to(ScrollTarget::Region(Region::Result));
    }

    /// Shows the banner and (re)arms its dismissal. Does not touch the state.
    pub fn render_error(&self, message: &str) {
        self.surface.set_text(TextSlot::ErrorMessage, message);
        self.surface.show(Region::ErrorBanner);

        let surface = Arc::clone(&self.surface);
        let state = Arc::clone(&self.state);
        self.banner_timer.schedule(async move {
            surface.hide(Region::ErrorBanner);
            match state.apply(UiEvent::BannerExpired) {
                Ok(now) => debug!(state = %now, "error banner dismissed"),
                Err(err) => warn!(error = %err, "banner expiry rejected"),
            }
        });
    }

    /// Hides the banner right away and drops its pending dismissal.
    pub fn dismiss_error(&self) {
        self.banner_timer.cancel();
        self.surface.hide(Region::ErrorBanner);
    }

    /// Marks exactly `fields` as invalid and clears every other marker.
    pub fn mark_invalid(&self, fields: &[FormField]) {
        for field in FormField::ALL {
            self.surface.set_field_invalid(field, fields.contains(&field));
        }
    }

    pub fn field_edited(&self, field: FormField) {
        self.surface.set_field_invalid(field, false);
    }

    pub fn hide_result(&self) {
        self.surface.hide(Region::Result);
    }

    pub fn reset(&self) -> Result<(), TransitionError> {
        self.state.apply(UiEvent::Reset)?;
        self.banner_timer.cancel();

        let surface = &self.surface;
        surface.clear_fields();
        for field in FormField::ALL {
            surface.set_field_invalid(field, false);
        }
        surface.hide(Region::Result);
        surface.hide(Region::ErrorBanner);
        surface.set_submit_busy(false);
        surface.scroll_to(ScrollTarget::Top);
        Ok(())
    }

    pub fn banner_pending(&self) -> bool {
        self.banner_timer.is_pending()
    }
}

#[cfg(test)]
#[path = "tests/renderer_tests.rs"]
mod tests;
