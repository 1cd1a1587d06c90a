//! Knob and page definitions.

use super::KnobId;
use super::value::KnobValue;

/// Describes a knob before it is added to a `KnobSet`.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobDefinition {
    /// Internal stable name, used for serialization and scripting lookup.
    pub name: String,
    /// Display label (e.g. "Optional")
    pub label: String,
    pub tooltip: String,
    pub default_value: KnobValue,
    /// Whether the knob may hold a time-varying value.
    pub animation_enabled: bool,
}

impl KnobDefinition {
    pub fn new(name: &str, label: &str, default_value: KnobValue) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            tooltip: String::new(),
            default_value,
            animation_enabled: true,
        }
    }

    pub fn boolean(name: &str, label: &str) -> Self {
        Self::new(name, label, KnobValue::Bool(false))
    }

    pub fn with_tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = tooltip.to_string();
        self
    }

    pub fn with_animation(mut self, enabled: bool) -> Self {
        self.animation_enabled = enabled;
        self
    }
}

/// Identifies a page inside a `KnobSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub(crate) usize);

/// A named grouping of knobs (a tab in the settings panel).
#[derive(Debug, Clone, PartialEq)]
pub struct KnobPage {
    pub name: String,
    pub label: String,
    pub knobs: Vec<KnobId>,
}
