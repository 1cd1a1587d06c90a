//! Change notification types emitted by the knob framework.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::KnobId;
use super::value::KnobValue;

/// Why a knob value changed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueChangedReason {
    /// Edited by the user in the interface
    #[default]
    UserEdited,
    /// Edited by the node itself
    PluginEdited,
    /// Edited by the host (e.g. project load)
    InternalEdited,
    /// The timeline moved
    TimeChanged,
    RestoreDefault,
}

/// Which views a change applies to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewSetSpec {
    #[default]
    All,
    Current,
    View(u32),
}

/// Time at which a change happened, in frames.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct TimeValue(pub OrderedFloat<f64>);

impl TimeValue {
    pub fn new(frame: f64) -> Self {
        Self(OrderedFloat(frame))
    }

    pub fn frame(&self) -> f64 {
        self.0.into_inner()
    }
}

/// Emitted by `KnobSet::set_value` and handed to `NodeBehavior::knob_changed`.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobChangeEvent {
    pub knob: KnobId,
    /// Internal name of the changed knob
    pub name: String,
    pub value: KnobValue,
    pub reason: ValueChangedReason,
    pub view: ViewSetSpec,
    pub time: TimeValue,
}
