//! Plugin manager: the registration table node types are instantiated from.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};

use crate::error::LibraryError;
use crate::plugin::node_types::{PluginDescriptor, RenderSafety};
use crate::plugin::repository::PluginRegistry;
use crate::plugin::traits::NodePlugin;
use crate::project::node::{Node, RenderClone};

/// Main plugin manager.
///
/// Built explicitly at startup (see `create_plugin_manager`) and passed to
/// whoever needs to instantiate nodes.
pub struct PluginManager {
    inner: RwLock<PluginRegistry>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PluginRegistry::default()),
        }
    }

    // Listings and registration recover from a poisoned lock: registry writes
    // are single inserts, so the data stays consistent.
    fn read(&self) -> RwLockReadGuard<'_, PluginRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PluginRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plugin lookup for instantiation, where a poisoned lock is an error.
    fn plugin_for(&self, type_id: &str) -> Result<Arc<dyn NodePlugin>, LibraryError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LibraryError::Runtime("Plugin registry lock poisoned".to_string()))?;
        inner.node_plugins.get(type_id).cloned().ok_or_else(|| {
            LibraryError::Plugin(format!("Node type '{}' is not registered", type_id))
        })
    }

    pub fn register_node_plugin(&self, plugin: Arc<dyn NodePlugin>) {
        let id = plugin.id();
        let mut inner = self.write();
        if inner.node_plugins.register(plugin).is_some() {
            warn!("PluginManager: node plugin '{}' registered twice, replacing", id);
        } else {
            debug!("PluginManager: registered node plugin '{}'", id);
        }
    }

    pub fn get_node_plugin(&self, type_id: &str) -> Option<Arc<dyn NodePlugin>> {
        self.read().node_plugins.get(type_id).cloned()
    }

    pub fn get_descriptor(&self, type_id: &str) -> Option<PluginDescriptor> {
        self.read().node_plugins.get(type_id).map(|p| p.descriptor())
    }

    pub fn is_registered(&self, type_id: &str) -> bool {
        self.read().node_plugins.get(type_id).is_some()
    }

    /// (id, name, category) of every node type, sorted by id.
    pub fn get_available_nodes(&self) -> Vec<(String, String, String)> {
        let inner = self.read();
        let mut nodes: Vec<_> = inner
            .node_plugins
            .values()
            .map(|p| (p.id().to_string(), p.name(), p.category().to_string()))
            .collect();
        nodes.sort();
        nodes
    }

    pub fn get_all_plugins(&self) -> Vec<PluginInfo> {
        let inner = self.read();
        let mut plugins: Vec<PluginInfo> = inner
            .node_plugins
            .values()
            .map(|p| PluginInfo {
                id: p.id().to_string(),
                name: p.name(),
                category: p.category().to_string(),
                version: p.descriptor().version_string(),
                render_safety: p.render_safety(),
                impl_type: p.impl_type(),
            })
            .collect();

        plugins.sort_by(|a, b| a.id.cmp(&b.id));
        plugins
    }

    /// Instantiate a node of the given type and let it build its knobs.
    pub fn create_node(&self, type_id: &str, label: &str) -> Result<Node, LibraryError> {
        let plugin = self.plugin_for(type_id)?;
        debug!("PluginManager: creating '{}' node '{}'", type_id, label);
        Node::new(type_id, label, plugin.create_instance())
    }

    /// Build a per-evaluation copy of `node`, carrying its current knob values.
    pub fn create_render_clone(&self, node: &Node) -> Result<RenderClone, LibraryError> {
        let plugin = self.plugin_for(node.type_id())?;
        let safety = plugin.render_safety();
        if !safety.allows_render_clones() {
            return Err(LibraryError::Plugin(format!(
                "Node type '{}' is not render safe, clones are not allowed",
                node.type_id()
            )));
        }
        RenderClone::new(node, safety, plugin.create_render_clone())
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a registered plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub category: String,
    pub version: String,
    pub render_safety: RenderSafety,
    pub impl_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knob::{KnobChangeEvent, KnobDefinition, KnobSet};
    use crate::plugin::node_types::NodeCategory;
    use crate::plugin::traits::{NodeBehavior, NodeContext, Plugin};

    struct DotBehavior;

    impl NodeBehavior for DotBehavior {
        fn initialize_knobs(&mut self, knobs: &mut KnobSet) -> Result<(), LibraryError> {
            let page = knobs.create_page("node", "Node");
            knobs.add_knob(page, KnobDefinition::boolean("disable", "Disable"))?;
            Ok(())
        }

        fn knob_changed(&self, _event: &KnobChangeEvent, _ctx: &mut NodeContext<'_, '_>) -> bool {
            false
        }
    }

    struct DotPlugin {
        safety: RenderSafety,
    }

    impl Plugin for DotPlugin {
        fn id(&self) -> &'static str {
            "test.dot"
        }
        fn name(&self) -> String {
            "Dot".to_string()
        }
        fn category(&self) -> NodeCategory {
            NodeCategory::Other
        }
        fn version(&self) -> (u32, u32) {
            (2, 1)
        }
    }

    impl NodePlugin for DotPlugin {
        fn description(&self) -> String {
            "Routes a connection".to_string()
        }
        fn render_safety(&self) -> RenderSafety {
            self.safety
        }
        fn create_instance(&self) -> Box<dyn NodeBehavior> {
            Box::new(DotBehavior)
        }
    }

    fn manager_with(safety: RenderSafety) -> PluginManager {
        let manager = PluginManager::new();
        manager.register_node_plugin(Arc::new(DotPlugin { safety }));
        manager
    }

    #[test]
    fn test_descriptor_from_plugin() {
        let manager = manager_with(RenderSafety::FullySafe);
        let desc = manager.get_descriptor("test.dot").unwrap();
        assert_eq!(desc.label, "Dot");
        assert_eq!(desc.version, (2, 1));
        assert_eq!(desc.version_string(), "2.1");
        assert_eq!(desc.description, "Routes a connection");
        assert_eq!(desc.icon_path, None);
        assert_eq!(desc.render_safety, RenderSafety::FullySafe);
    }

    #[test]
    fn test_create_node_unknown_type() {
        let manager = PluginManager::new();
        let result = manager.create_node("test.missing", "Missing1");
        assert!(matches!(result, Err(LibraryError::Plugin(_))));
    }

    #[test]
    fn test_create_node_initializes_knobs() {
        let manager = manager_with(RenderSafety::FullySafe);
        let node = manager.create_node("test.dot", "Dot1").unwrap();
        assert_eq!(node.type_id(), "test.dot");
        assert_eq!(node.label(), "Dot1");
        assert_eq!(node.knobs().get_bool_by_name("disable"), Some(false));
    }

    #[test]
    fn test_register_twice_replaces() {
        let manager = manager_with(RenderSafety::Unsafe);
        manager.register_node_plugin(Arc::new(DotPlugin {
            safety: RenderSafety::InstanceSafe,
        }));
        let plugins = manager.get_all_plugins();
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].render_safety, RenderSafety::InstanceSafe);
        assert_eq!(plugins[0].version, "2.1");
        assert_eq!(
            manager.get_available_nodes(),
            vec![(
                "test.dot".to_string(),
                "Dot".to_string(),
                "Other".to_string()
            )]
        );
    }

    #[test]
    fn test_render_clone_requires_safety() {
        let manager = manager_with(RenderSafety::Unsafe);
        let node = manager.create_node("test.dot", "Dot1").unwrap();
        assert!(manager.create_render_clone(&node).is_err());

        let manager = manager_with(RenderSafety::InstanceSafe);
        let node = manager.create_node("test.dot", "Dot1").unwrap();
        let clone = manager.create_render_clone(&node).unwrap();
        assert_eq!(clone.source(), node.id());
        assert_eq!(clone.knobs().get_bool_by_name("disable"), Some(false));
    }

    #[test]
    fn test_poisoned_registry_fails_instantiation() {
        let manager = Arc::new(manager_with(RenderSafety::FullySafe));
        let node = manager.create_node("test.dot", "Dot1").unwrap();

        let poisoner = Arc::clone(&manager);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("writer died holding the registry lock");
        })
        .join();
        assert!(manager.inner.is_poisoned());

        assert!(matches!(
            manager.create_node("test.dot", "Dot2"),
            Err(LibraryError::Runtime(_))
        ));
        assert!(matches!(
            manager.create_render_clone(&node),
            Err(LibraryError::Runtime(_))
        ));
        // Listings still answer.
        assert!(manager.is_registered("test.dot"));
        assert_eq!(manager.get_all_plugins().len(), 1);
    }
}
