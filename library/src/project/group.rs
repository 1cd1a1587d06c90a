//! Group container: owns a subgraph and advertises one input port per
//! group input node inside it.

use std::collections::HashSet;

use log::{debug, trace};
use serde::Serialize;

use crate::error::LibraryError;
use crate::knob::{KnobChangeEvent, KnobValue, ValueChangedReason};
use crate::project::node::{Node, NodeId};

/// Internal name of the group input "Optional" knob. Persisted in project files.
pub const GROUP_INPUT_OPTIONAL_KNOB: &str = "optional";
/// Internal name of the group input "Mask" knob. Persisted in project files.
pub const GROUP_INPUT_MASK_KNOB: &str = "isMask";

/// Entry points a node uses to tell its owning group about port changes.
pub trait GroupNotifier {
    fn notify_input_optional_state_changed(&mut self, node: NodeId);
    fn notify_input_mask_state_changed(&mut self, node: NodeId);
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupNotification {
    InputOptionalChanged(NodeId),
    InputMaskChanged(NodeId),
}

/// Collects notifications while the emitting node is mutably borrowed.
#[derive(Debug, Default)]
pub struct PendingNotifications(pub Vec<GroupNotification>);

impl GroupNotifier for PendingNotifications {
    fn notify_input_optional_state_changed(&mut self, node: NodeId) {
        self.0.push(GroupNotification::InputOptionalChanged(node));
    }

    fn notify_input_mask_state_changed(&mut self, node: NodeId) {
        self.0.push(GroupNotification::InputMaskChanged(node));
    }
}

/// An input arrow of the group, as seen from outside.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InputPort {
    pub index: usize,
    pub node_id: NodeId,
    pub label: String,
    pub optional: bool,
    pub mask: bool,
}

/// Result of `NodeGroup::set_knob_value`.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobChangeOutcome {
    pub event: KnobChangeEvent,
    pub handled: bool,
    pub notifications: Vec<GroupNotification>,
}

impl KnobChangeOutcome {
    pub fn optional_notifications(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| matches!(n, GroupNotification::InputOptionalChanged(_)))
            .count()
    }

    pub fn mask_notifications(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| matches!(n, GroupNotification::InputMaskChanged(_)))
            .count()
    }
}

#[derive(Debug)]
pub struct NodeGroup {
    name: String,
    nodes: Vec<Node>,
    input_ports: Vec<InputPort>,
    ports_revision: u64,
}

impl NodeGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            input_ports: Vec::new(),
            ports_revision: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        let is_input = node.is_group_input();
        debug!("NodeGroup '{}': adding node '{}'", self.name, node.label());
        self.nodes.push(node);
        if is_input {
            self.recompute_input_ports();
        }
        id
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id() == id)?;
        let node = self.nodes.remove(index);
        debug!("NodeGroup '{}': removed node '{}'", self.name, node.label());
        if node.is_group_input() {
            self.recompute_input_ports();
        }
        Some(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn input_ports(&self) -> &[InputPort] {
        &self.input_ports
    }

    pub fn input_port(&self, index: usize) -> Option<&InputPort> {
        self.input_ports.get(index)
    }

    /// Bumped every time the advertised ports are re-evaluated.
    pub fn ports_revision(&self) -> u64 {
        self.ports_revision
    }

    /// Set a knob on a contained node, dispatch the change, then apply
    /// whatever notifications the node emitted.
    pub fn set_knob_value(
        &mut self,
        node_id: NodeId,
        knob: &str,
        value: KnobValue,
        reason: ValueChangedReason,
    ) -> Result<KnobChangeOutcome, LibraryError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id() == node_id)
            .ok_or_else(|| {
                LibraryError::project(format!(
                    "Node {} not found in group '{}'",
                    node_id, self.name
                ))
            })?;

        let mut pending = PendingNotifications::default();
        let (event, handled) = node.set_knob_value(knob, value, reason, Some(&mut pending))?;
        if !handled {
            trace!(
                "NodeGroup '{}': knob '{}' not handled by node, default handling",
                self.name, event.name
            );
        }

        for notification in &pending.0 {
            match *notification {
                GroupNotification::InputOptionalChanged(id) => {
                    self.notify_input_optional_state_changed(id)
                }
                GroupNotification::InputMaskChanged(id) => self.notify_input_mask_state_changed(id),
            }
        }

        Ok(KnobChangeOutcome {
            event,
            handled,
            notifications: pending.0,
        })
    }

    /// Fail when a required input is not in `connected`. Mask inputs are
    /// never required, whatever their optional flag says.
    pub fn validate_inputs(&self, connected: &HashSet<usize>) -> Result<(), LibraryError> {
        let missing: Vec<&str> = self
            .input_ports
            .iter()
            .filter(|p| !(p.optional || p.mask) && !connected.contains(&p.index))
            .map(|p| p.label.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LibraryError::validation(format!(
                "Group '{}' requires inputs: {}",
                self.name,
                missing.join(", ")
            )))
        }
    }

    fn recompute_input_ports(&mut self) {
        self.input_ports = self
            .nodes
            .iter()
            .filter(|n| n.is_group_input())
            .enumerate()
            .map(|(index, n)| InputPort {
                index,
                node_id: n.id(),
                label: n.label().to_string(),
                optional: n
                    .knobs()
                    .get_bool_by_name(GROUP_INPUT_OPTIONAL_KNOB)
                    .unwrap_or(false),
                mask: n
                    .knobs()
                    .get_bool_by_name(GROUP_INPUT_MASK_KNOB)
                    .unwrap_or(false),
            })
            .collect();
        self.ports_revision += 1;
    }
}

impl GroupNotifier for NodeGroup {
    fn notify_input_optional_state_changed(&mut self, node: NodeId) {
        debug!("NodeGroup '{}': input {} optional state changed", self.name, node);
        self.recompute_input_ports();
    }

    fn notify_input_mask_state_changed(&mut self, node: NodeId) {
        debug!("NodeGroup '{}': input {} mask state changed", self.name, node);
        self.recompute_input_ports();
    }
}
