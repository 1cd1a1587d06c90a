//! Node plugin descriptors.

use serde::{Deserialize, Serialize};

/// Category of a node type, used for grouping in menus.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Readers and generators
    Image,
    /// Paint and shape drawing
    Draw,
    /// Time remapping (retime, frame hold)
    Time,
    /// Channel shuffling and copying
    Channel,
    /// Color correction
    Color,
    /// Blur, sharpen and other filters
    Filter,
    /// Keyers
    Keyer,
    /// Merges and masks
    Merge,
    /// Transforms and distortions
    Transform,
    /// Structural nodes (group inputs, dots, backdrops)
    Other,
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeCategory::Image => "Image",
            NodeCategory::Draw => "Draw",
            NodeCategory::Time => "Time",
            NodeCategory::Channel => "Channel",
            NodeCategory::Color => "Color",
            NodeCategory::Filter => "Filter",
            NodeCategory::Keyer => "Keyer",
            NodeCategory::Merge => "Merge",
            NodeCategory::Transform => "Transform",
            NodeCategory::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

/// How instances of a node type may be evaluated by concurrent render threads.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderSafety {
    /// Only one render at a time, across all instances.
    #[default]
    Unsafe,
    /// One render at a time per instance.
    InstanceSafe,
    /// Any number of concurrent renders.
    FullySafe,
    /// Fully safe, and may also be split per frame by the host.
    FullySafeFrame,
}

impl RenderSafety {
    /// Whether the host may create per-evaluation render clones.
    pub fn allows_render_clones(&self) -> bool {
        !matches!(self, RenderSafety::Unsafe)
    }
}

/// Everything the registry advertises about a node type.
///
/// Built by `NodePlugin::descriptor`; node instances reference it through
/// their `type_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginDescriptor {
    /// Unique type identifier (e.g. "fr.inria.built-in.Input")
    pub id: String,
    /// Human-readable label (e.g. "Input")
    pub label: String,
    /// (major, minor)
    pub version: (u32, u32),
    pub category: NodeCategory,
    /// Description shown in tooltips and documentation
    pub description: String,
    /// Icon resource path, relative to the resources directory
    pub icon_path: Option<String>,
    pub render_safety: RenderSafety,
}

impl PluginDescriptor {
    pub fn new(id: &str, label: &str, version: (u32, u32), category: NodeCategory) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            version,
            category,
            description: String::new(),
            icon_path: None,
            render_safety: RenderSafety::default(),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_icon(mut self, path: &str) -> Self {
        self.icon_path = Some(path.to_string());
        self
    }

    pub fn with_render_safety(mut self, safety: RenderSafety) -> Self {
        self.render_safety = safety;
        self
    }

    pub fn version_string(&self) -> String {
        format!("{}.{}", self.version.0, self.version.1)
    }
}
