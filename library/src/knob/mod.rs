//! Knob (parameter) framework.

pub mod definition;
pub mod event;
pub mod set;
pub mod value;

pub use definition::{KnobDefinition, KnobPage, PageId};
pub use event::{KnobChangeEvent, TimeValue, ValueChangedReason, ViewSetSpec};
pub use set::{Knob, KnobSet};
pub use value::{KnobValue, TryGetKnob};

/// Non-owning handle to a knob inside a `KnobSet`.
///
/// The set stays the only owner; a handle is resolved again on every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KnobId(pub(crate) usize);
