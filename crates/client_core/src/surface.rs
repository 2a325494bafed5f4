//! Port the core renders through, plus an in-memory adapter.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use shared::domain::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Form,
    Result,
    ErrorBanner,
    Recommendations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Percentage,
    Advice,
    DetailedAdvice,
    CutoffNote,
    ErrorMessage,
}

/// Visual class of the risk badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBadge {
    Low,
    Elevated,
}

impl RiskBadge {
    pub fn css_class(self) -> &'static str {
        match self {
            RiskBadge::Low => "risk-low",
            RiskBadge::Elevated => "risk-high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    Region(Region),
}

/// Named regions and controls the core needs from whatever draws the page.
///
/// Implementations use interior mutability; the banner timer calls back into
/// the surface from a spawned task.
pub trait UiSurface: Send + Sync {
    fn has_form(&self) -> bool;

    /// Raw text of a numeric input. `FormField::Gender` is read through
    /// [`UiSurface::selected_gender`] instead.
    fn field_value(&self, field: FormField) -> String;
    fn selected_gender(&self) -> Option<String>;
    fn clear_fields(&self);
    fn set_field_invalid(&self, field: FormField, invalid: bool);

    fn set_text(&self, slot: TextSlot, text: &str);
    fn set_badge(&self, label: &str, badge: RiskBadge);
    fn set_recommendations(&self, items: &[String]);

    fn show(&self, region: Region);
    fn hide(&self, region: Region);

    /// Enables or disables the submit control and swaps its label for the spinner.
    fn set_submit_busy(&self, busy: bool);

    fn scroll_to(&self, target: ScrollTarget);
}

#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    pub has_form: bool,
    pub fields: HashMap<FormField, String>,
    pub gender: Option<String>,
    pub invalid: HashSet<FormField>,
    pub texts: HashMap<TextSlot, String>,
    pub badge: Option<(String, RiskBadge)>,
    pub recommendations: Vec<String>,
    pub visible: HashSet<Region>,
    pub submit_busy: bool,
    pub scrolls: Vec<ScrollTarget>,
}

impl Default for MemorySnapshot {
    fn default() -> Self {
        Self {
            has_form: true,
            fields: HashMap::new(),
            gender: None,
            invalid: HashSet::new(),
            texts: HashMap::new(),
            badge: None,
            recommendations: Vec::new(),
            visible: HashSet::from([Region::Form]),
            submit_busy: false,
            scrolls: Vec::new(),
        }
    }
}

impl MemorySnapshot {
    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.contains(&region)
    }

    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }
}

/// Headless surface holding every element in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    inner: Mutex<MemorySnapshot>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_form() -> Self {
        let surface = Self::default();
        surface.lock().has_form = false;
        surface
    }

    /// Simulates the user typing into a field.
    pub fn input(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let mut state = self.lock();
        if field == FormField::Gender {
            state.gender = if value.is_empty() { None } else { Some(value) };
        } else {
            state.fields.insert(field, value);
        }
    }

    pub fn fill(&self, gender: &str, waist: &str, height: &str, weight: &str, age: &str) {
        self.input(FormField::Gender, gender);
        self.input(FormField::Waist, waist);
        self.input(FormField::Height, height);
        self.input(FormField::Weight, weight);
        self.input(FormField::Age, age);
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemorySnapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UiSurface for MemorySurface {
    fn has_form(&self) -> bool {
        self.lock().has_form
    }

    fn field_value(&self, field: FormField) -> String {
        self.lock().fields.get(&field).cloned().unwrap_or_default()
    }

    fn selected_gender(&self) -> Option<String> {
        self.lock().gender.clone()
    }

    fn clear_fields(&self) {
        let mut state = self.lock();
        state.fields.clear();
        state.gender = None;
        state.invalid.clear();
    }

    fn set_field_invalid(&self, field: FormField, invalid: bool) {
        let mut state = self.lock();
        if invalid {
            state.invalid.insert(field);
        } else {
            state.invalid.remove(&field);
        }
    }

    fn set_text(&self, slot: TextSlot, text: &str) {
        self.lock().texts.insert(slot, text.to_string());
    }

    fn set_badge(&self, label: &str, badge: RiskBadge) {
        self.lock().badge = Some((label.to_string(), badge));
    }

    fn set_recommendations(&self, items: &[String]) {
        self.lock().recommendations = items.to_vec();
    }

    fn show(&self, region: Region) {
        self.lock().visible.insert(region);
    }

    fn hide(&self, region: Region) {
        self.lock().visible.remove(&region);
    }

    fn set_submit_busy(&self, busy: bool) {
        self.lock().submit_busy = busy;
    }

    fn scroll_to(&self, target: ScrollTarget) {
        self.lock().scrolls.push(target);
    }
}
