//! Node instances.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LibraryError;
use crate::knob::{KnobChangeEvent, KnobSet, KnobValue, ValueChangedReason};
use crate::plugin::node_types::RenderSafety;
use crate::plugin::traits::{NodeBehavior, NodeContext};
use crate::project::group::GroupNotifier;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node instance: plugin behavior plus the knobs it owns.
///
/// The `type_id` references a plugin registered in the `PluginManager`.
pub struct Node {
    id: NodeId,
    type_id: String,
    label: String,
    knobs: KnobSet,
    behavior: Box<dyn NodeBehavior>,
}

impl Node {
    pub fn new(
        type_id: &str,
        label: &str,
        behavior: Box<dyn NodeBehavior>,
    ) -> Result<Self, LibraryError> {
        Self::new_with_id(NodeId::new(), type_id, label, behavior)
    }

    pub fn new_with_id(
        id: NodeId,
        type_id: &str,
        label: &str,
        mut behavior: Box<dyn NodeBehavior>,
    ) -> Result<Self, LibraryError> {
        let mut knobs = KnobSet::new();
        behavior.initialize_knobs(&mut knobs)?;
        Ok(Self {
            id,
            type_id: type_id.to_string(),
            label: label.to_string(),
            knobs,
            behavior,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn knobs(&self) -> &KnobSet {
        &self.knobs
    }

    pub(crate) fn knobs_mut(&mut self) -> &mut KnobSet {
        &mut self.knobs
    }

    pub fn is_group_input(&self) -> bool {
        self.behavior.is_group_input()
    }

    /// Set a knob by internal name and dispatch the change to the behavior.
    ///
    /// Returns the event and whether the behavior handled it.
    pub fn set_knob_value(
        &mut self,
        name: &str,
        value: KnobValue,
        reason: ValueChangedReason,
        group: Option<&mut dyn GroupNotifier>,
    ) -> Result<(KnobChangeEvent, bool), LibraryError> {
        let knob = self.knobs.find(name).ok_or_else(|| {
            LibraryError::knob(format!("Node '{}' has no knob '{}'", self.label, name))
        })?;
        let event = self.knobs.set_value(knob, value, reason)?;
        let handled = self.dispatch(&event, group);
        Ok((event, handled))
    }

    /// Hand an already-applied change to the behavior.
    pub fn dispatch(
        &mut self,
        event: &KnobChangeEvent,
        group: Option<&mut dyn GroupNotifier>,
    ) -> bool {
        let mut ctx = NodeContext::new(self.id, &mut self.knobs, group);
        self.behavior.knob_changed(event, &mut ctx)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("type_id", &self.type_id)
            .field("label", &self.label)
            .field("knobs", &self.knobs.values())
            .finish()
    }
}

/// Lightweight per-evaluation copy of a node.
///
/// Holds its own behavior and knobs, frozen at the values the source node
/// had when the clone was made.
pub struct RenderClone {
    source: NodeId,
    type_id: String,
    render_safety: RenderSafety,
    knobs: KnobSet,
    behavior: Box<dyn NodeBehavior>,
}

impl RenderClone {
    pub(crate) fn new(
        node: &Node,
        render_safety: RenderSafety,
        mut behavior: Box<dyn NodeBehavior>,
    ) -> Result<Self, LibraryError> {
        let mut knobs = KnobSet::new();
        behavior.initialize_knobs(&mut knobs)?;
        for (name, value) in node.knobs.values() {
            knobs.restore(&name, value)?;
        }
        Ok(Self {
            source: node.id,
            type_id: node.type_id.clone(),
            render_safety,
            knobs,
            behavior,
        })
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn render_safety(&self) -> RenderSafety {
        self.render_safety
    }

    pub fn knobs(&self) -> &KnobSet {
        &self.knobs
    }

    pub fn is_group_input(&self) -> bool {
        self.behavior.is_group_input()
    }
}
