//! JSON persistence for groups.
//!
//! Knob values are keyed by their internal names, so those names are part of
//! the file format and must not change between versions.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::LibraryError;
use crate::knob::KnobValue;
use crate::plugin::PluginManager;
use crate::project::group::NodeGroup;
use crate::project::node::{Node, NodeId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupSnapshot {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub type_id: String,
    pub label: String,
    #[serde(default)]
    pub knobs: BTreeMap<String, KnobValue>,
}

impl From<&NodeGroup> for GroupSnapshot {
    fn from(group: &NodeGroup) -> Self {
        Self {
            name: group.name().to_string(),
            nodes: group
                .nodes()
                .iter()
                .map(|n| NodeSnapshot {
                    id: n.id(),
                    type_id: n.type_id().to_string(),
                    label: n.label().to_string(),
                    knobs: n.knobs().values(),
                })
                .collect(),
        }
    }
}

impl GroupSnapshot {
    /// Rebuild a live group, instantiating every node through the registry.
    pub fn instantiate(&self, plugins: &PluginManager) -> Result<NodeGroup, LibraryError> {
        let mut group = NodeGroup::new(&self.name);
        for snapshot in &self.nodes {
            let plugin = plugins.get_node_plugin(&snapshot.type_id).ok_or_else(|| {
                LibraryError::Plugin(format!(
                    "Node '{}' uses unknown type '{}'",
                    snapshot.label, snapshot.type_id
                ))
            })?;
            let mut node = Node::new_with_id(
                snapshot.id,
                &snapshot.type_id,
                &snapshot.label,
                plugin.create_instance(),
            )?;
            for (name, value) in &snapshot.knobs {
                if let Err(e) = node.knobs_mut().restore(name, value.clone()) {
                    warn!("Skipping knob '{}' of node '{}': {}", name, snapshot.label, e);
                }
            }
            group.add_node(node);
        }
        Ok(group)
    }
}

impl NodeGroup {
    pub fn save(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string_pretty(&GroupSnapshot::from(self))?)
    }

    pub fn load(json_str: &str, plugins: &PluginManager) -> Result<Self, LibraryError> {
        let snapshot: GroupSnapshot = serde_json::from_str(json_str)?;
        snapshot.instantiate(plugins)
    }
}
