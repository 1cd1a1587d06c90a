pub mod group;
pub mod node;
pub mod snapshot;

pub use group::{
    GROUP_INPUT_MASK_KNOB, GROUP_INPUT_OPTIONAL_KNOB, GroupNotification, GroupNotifier, InputPort,
    KnobChangeOutcome, NodeGroup, PendingNotifications,
};
pub use node::{Node, NodeId, RenderClone};
pub use snapshot::{GroupSnapshot, NodeSnapshot};
