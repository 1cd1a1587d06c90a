pub mod manager;
pub mod node_types;
pub mod repository;
pub mod traits;

pub use manager::{PluginInfo, PluginManager};
pub use node_types::{NodeCategory, PluginDescriptor, RenderSafety};
pub use repository::PluginRepository;
pub use traits::{NodeBehavior, NodeContext, NodePlugin, Plugin};
