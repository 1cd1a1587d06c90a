//! Group input node: adds an input arrow to the group it lives in.

use log::warn;

use crate::error::LibraryError;
use crate::knob::{KnobChangeEvent, KnobDefinition, KnobId, KnobSet};
use crate::plugin::node_types::{NodeCategory, RenderSafety};
use crate::plugin::traits::{NodeBehavior, NodeContext, NodePlugin, Plugin};
use crate::project::group::{GROUP_INPUT_MASK_KNOB, GROUP_INPUT_OPTIONAL_KNOB};

pub const GROUP_INPUT_PLUGIN_ID: &str = "fr.inria.built-in.Input";

pub struct GroupInputPlugin;

impl Plugin for GroupInputPlugin {
    fn id(&self) -> &'static str {
        GROUP_INPUT_PLUGIN_ID
    }

    fn name(&self) -> String {
        "Input".to_string()
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Other
    }

    fn version(&self) -> (u32, u32) {
        (1, 0)
    }
}

impl NodePlugin for GroupInputPlugin {
    fn description(&self) -> String {
        "This node can only be used within a Group. It adds an input arrow to the group."
            .to_string()
    }

    fn icon_path(&self) -> Option<String> {
        Some("Images/input_icon.png".to_string())
    }

    fn render_safety(&self) -> RenderSafety {
        RenderSafety::FullySafe
    }

    fn create_instance(&self) -> Box<dyn NodeBehavior> {
        Box::new(GroupInput::default())
    }
}

/// Which of our knobs an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupInputKnob {
    Optional,
    Mask,
}

/// Holds handles to its two knobs; the node's `KnobSet` owns them.
#[derive(Debug, Default)]
pub struct GroupInput {
    optional: Option<KnobId>,
    mask: Option<KnobId>,
}

impl GroupInput {
    fn classify(&self, knob: KnobId) -> Option<GroupInputKnob> {
        if self.optional == Some(knob) {
            Some(GroupInputKnob::Optional)
        } else if self.mask == Some(knob) {
            Some(GroupInputKnob::Mask)
        } else {
            None
        }
    }
}

impl NodeBehavior for GroupInput {
    fn initialize_knobs(&mut self, knobs: &mut KnobSet) -> Result<(), LibraryError> {
        let page = knobs.create_page("controls", "Controls");

        let optional = knobs.add_knob(
            page,
            KnobDefinition::boolean(GROUP_INPUT_OPTIONAL_KNOB, "Optional")
                .with_tooltip(
                    "When checked, this input of the group will be optional, i.e it will not be \
                     required that it is connected for the render to work.",
                )
                .with_animation(false),
        )?;
        self.optional = Some(optional);

        let mask = knobs.add_knob(
            page,
            KnobDefinition::boolean(GROUP_INPUT_MASK_KNOB, "Mask")
                .with_tooltip(
                    "When checked, this input of the group will be considered as a mask. \
                     A mask is always optional.",
                )
                .with_animation(false),
        )?;
        self.mask = Some(mask);

        Ok(())
    }

    fn knob_changed(&self, event: &KnobChangeEvent, ctx: &mut NodeContext<'_, '_>) -> bool {
        let node_id = ctx.node_id;
        match self.classify(event.knob) {
            Some(GroupInputKnob::Optional) => {
                match ctx.group() {
                    Some(group) => group.notify_input_optional_state_changed(node_id),
                    None => warn!("GroupInput {}: not inside a group", node_id),
                }
                true
            }
            Some(GroupInputKnob::Mask) => {
                let is_mask = self.mask.and_then(|id| ctx.knobs.get_bool(id));
                // Mask overrides optional in both directions.
                let stored = match (is_mask, self.optional) {
                    (Some(is_mask), Some(optional)) => ctx.knobs.set_bool(optional, is_mask),
                    _ => None,
                };
                if stored.is_none() {
                    warn!("GroupInput {}: mask/optional knobs unavailable", node_id);
                }
                match ctx.group() {
                    Some(group) => group.notify_input_mask_state_changed(node_id),
                    None => warn!("GroupInput {}: not inside a group", node_id),
                }
                true
            }
            None => false,
        }
    }

    fn is_group_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knob::{KnobValue, ValueChangedReason};
    use crate::plugin::PluginManager;
    use crate::project::group::{GroupNotification, NodeGroup, PendingNotifications};
    use crate::project::node::Node;
    use std::sync::Arc;

    fn setup() -> Node {
        let manager = PluginManager::new();
        manager.register_node_plugin(Arc::new(GroupInputPlugin));
        manager.create_node(GROUP_INPUT_PLUGIN_ID, "Input1").unwrap()
    }

    fn set(node: &mut Node, name: &str, value: bool) -> (bool, Vec<GroupNotification>) {
        let mut pending = PendingNotifications::default();
        let (_, handled) = node
            .set_knob_value(
                name,
                KnobValue::Bool(value),
                ValueChangedReason::UserEdited,
                Some(&mut pending),
            )
            .unwrap();
        (handled, pending.0)
    }

    #[test]
    fn test_knob_setup() {
        let node = setup();
        let knobs = node.knobs();

        assert_eq!(knobs.pages().len(), 1);
        assert_eq!(knobs.pages()[0].name, "controls");
        assert_eq!(knobs.pages()[0].label, "Controls");
        assert_eq!(knobs.pages()[0].knobs.len(), 2);

        let optional = knobs.get(knobs.find("optional").unwrap()).unwrap();
        assert_eq!(optional.definition.label, "Optional");
        assert!(!optional.definition.animation_enabled);
        assert!(optional.definition.tooltip.contains("optional"));

        let mask = knobs.get(knobs.find("isMask").unwrap()).unwrap();
        assert_eq!(mask.definition.label, "Mask");
        assert!(!mask.definition.animation_enabled);
        assert!(mask.definition.tooltip.contains("always optional"));

        assert_eq!(knobs.get_bool_by_name("optional"), Some(false));
        assert_eq!(knobs.get_bool_by_name("isMask"), Some(false));
        assert!(node.is_group_input());
    }

    #[test]
    fn test_mask_true_forces_optional() {
        let mut node = setup();
        let (handled, notifications) = set(&mut node, "isMask", true);

        assert!(handled);
        assert_eq!(node.knobs().get_bool_by_name("optional"), Some(true));
        assert_eq!(
            notifications,
            vec![GroupNotification::InputMaskChanged(node.id())]
        );
    }

    #[test]
    fn test_mask_false_clears_optional() {
        let mut node = setup();
        set(&mut node, "optional", true);
        let (handled, notifications) = set(&mut node, "isMask", false);

        assert!(handled);
        assert_eq!(node.knobs().get_bool_by_name("optional"), Some(false));
        assert_eq!(
            notifications,
            vec![GroupNotification::InputMaskChanged(node.id())]
        );
    }

    #[test]
    fn test_optional_does_not_touch_mask() {
        let mut node = setup();
        set(&mut node, "isMask", true);
        let (handled, notifications) = set(&mut node, "optional", false);

        assert!(handled);
        assert_eq!(node.knobs().get_bool_by_name("isMask"), Some(true));
        assert_eq!(node.knobs().get_bool_by_name("optional"), Some(false));
        assert_eq!(
            notifications,
            vec![GroupNotification::InputOptionalChanged(node.id())]
        );
    }

    #[test]
    fn test_host_knob_falls_through() {
        let mut node = setup();
        let page = node.knobs_mut().create_page("node", "Node");
        node.knobs_mut()
            .add_knob(page, KnobDefinition::boolean("disable", "Disable"))
            .unwrap();

        let mut group = NodeGroup::new("Group1");
        let id = group.add_node(node);
        let revision = group.ports_revision();

        let outcome = group
            .set_knob_value(
                id,
                "disable",
                KnobValue::Bool(true),
                ValueChangedReason::UserEdited,
            )
            .unwrap();
        assert!(!outcome.handled);
        assert!(outcome.notifications.is_empty());
        assert_eq!(group.ports_revision(), revision);
        assert_eq!(
            group.node(id).unwrap().knobs().get_bool_by_name("disable"),
            Some(true)
        );
    }

    #[test]
    fn test_stale_knob_handle_not_handled() {
        let mut node = setup();
        let foreign = KnobChangeEvent {
            knob: KnobId(99),
            name: "label".to_string(),
            value: KnobValue::from("x"),
            reason: ValueChangedReason::UserEdited,
            view: Default::default(),
            time: Default::default(),
        };
        let mut pending = PendingNotifications::default();
        assert!(!node.dispatch(&foreign, Some(&mut pending)));
        assert!(pending.0.is_empty());
    }

    #[test]
    fn test_without_group_still_handled() {
        let mut node = setup();
        let (_, handled) = node
            .set_knob_value(
                "isMask",
                KnobValue::Bool(true),
                ValueChangedReason::UserEdited,
                None,
            )
            .unwrap();
        assert!(handled);
        assert_eq!(node.knobs().get_bool_by_name("optional"), Some(true));
    }

    #[test]
    fn test_descriptor() {
        let desc = GroupInputPlugin.descriptor();
        assert_eq!(desc.id, "fr.inria.built-in.Input");
        assert_eq!(desc.label, "Input");
        assert_eq!(desc.version, (1, 0));
        assert_eq!(desc.category, NodeCategory::Other);
        assert_eq!(desc.icon_path.as_deref(), Some("Images/input_icon.png"));
        assert_eq!(desc.render_safety, RenderSafety::FullySafe);
        assert!(desc.description.starts_with("This node can only be used within a Group"));
    }
}
