//! Core plugin traits.

use crate::error::LibraryError;
use crate::knob::{KnobChangeEvent, KnobSet};
use crate::plugin::node_types::{NodeCategory, PluginDescriptor, RenderSafety};
use crate::project::group::GroupNotifier;
use crate::project::node::NodeId;

/// Base trait for all plugins.
pub trait Plugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> String;
    fn category(&self) -> NodeCategory;
    fn version(&self) -> (u32, u32);
    fn impl_type(&self) -> String {
        "Native".to_string()
    }
}

/// Plugin trait for node types. Acts as the factory the registry calls back into.
pub trait NodePlugin: Plugin {
    fn description(&self) -> String;

    fn icon_path(&self) -> Option<String> {
        None
    }

    fn render_safety(&self) -> RenderSafety;

    /// Create the main instance of a node.
    fn create_instance(&self) -> Box<dyn NodeBehavior>;

    /// Create a lightweight per-evaluation copy.
    fn create_render_clone(&self) -> Box<dyn NodeBehavior> {
        self.create_instance()
    }

    fn descriptor(&self) -> PluginDescriptor {
        let desc = PluginDescriptor::new(self.id(), &self.name(), self.version(), self.category())
            .with_description(&self.description())
            .with_render_safety(self.render_safety());
        match self.icon_path() {
            Some(path) => desc.with_icon(&path),
            None => desc,
        }
    }
}

/// Per-instance node logic.
pub trait NodeBehavior: Send + Sync {
    /// Create the node's pages and knobs. Called once, right after instantiation.
    fn initialize_knobs(&mut self, knobs: &mut KnobSet) -> Result<(), LibraryError>;

    /// React to a knob change. Returns `true` when the event was handled;
    /// unhandled events fall through to the host's default handling.
    fn knob_changed(&self, event: &KnobChangeEvent, ctx: &mut NodeContext<'_, '_>) -> bool;

    /// Whether this node adds an input arrow to its owning group.
    fn is_group_input(&self) -> bool {
        false
    }
}

/// What a node may touch while handling a knob change.
pub struct NodeContext<'k, 'g> {
    pub node_id: NodeId,
    pub knobs: &'k mut KnobSet,
    group: Option<&'g mut dyn GroupNotifier>,
}

impl<'k, 'g> NodeContext<'k, 'g> {
    pub fn new(
        node_id: NodeId,
        knobs: &'k mut KnobSet,
        group: Option<&'g mut dyn GroupNotifier>,
    ) -> Self {
        Self {
            node_id,
            knobs,
            group,
        }
    }

    /// The owning group, if the node lives in one.
    pub fn group(&mut self) -> Option<&mut (dyn GroupNotifier + 'g)> {
        self.group.as_deref_mut()
    }
}
