//! Built-in node plugins.

pub mod group_input;

use std::sync::Arc;

use log::warn;

use crate::plugin::{NodePlugin, PluginManager};

pub use group_input::{GROUP_INPUT_PLUGIN_ID, GroupInput, GroupInputPlugin};

/// Every node type shipped with the engine.
pub fn builtin_node_plugins() -> Vec<Arc<dyn NodePlugin>> {
    vec![Arc::new(GroupInputPlugin)]
}

/// Register the built-in node types, skipping the ids in `disabled`.
pub(crate) fn register_builtin_plugins(manager: &PluginManager, disabled: &[String]) {
    for plugin in builtin_node_plugins() {
        if disabled.iter().any(|id| id == plugin.id()) {
            warn!("Built-in plugin '{}' disabled by configuration", plugin.id());
            continue;
        }
        manager.register_node_plugin(plugin);
    }
}
