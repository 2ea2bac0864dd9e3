//! Event plumbing from the rendered controls back into the state store.
//!
//! Backends translate raw input into a [`ControlEvent`] aimed at a node
//! id; [`dispatch_event`] writes the new value through the control's
//! binding and fires its declared action. The caller then checks the
//! store generation to decide whether a rebuild is due.

use joist_schema::{ActionHandler, StateStore, StateValue};
use tracing::{debug, trace};

use crate::node::{ControlPrimitive, RenderKind, RenderNode};

/// A user gesture on one control, already decoded by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Tapped,
    Toggled(bool),
    ValueChanged(f64),
    IndexSelected(usize),
    TextEdited(String),
    /// Return key on a single-line field; carries the final text.
    Submitted(String),
}

/// Routes an event to the node with the given id.
///
/// Returns `false` when the id is unknown, the node is not a control,
/// the control is disabled, or the event shape does not fit it; the
/// store is untouched in every such case.
pub fn dispatch_event(
    tree: &RenderNode,
    id: &str,
    event: ControlEvent,
    store: &mut StateStore,
    actions: &dyn ActionHandler,
) -> bool {
    let Some(node) = tree.find(id) else {
        debug!(id, "event aimed at an id that is not in the tree");
        return false;
    };
    if !node.is_enabled() {
        trace!(id, "dropping event for disabled control");
        return false;
    }
    match &node.kind {
        RenderKind::Control(control) => apply(control, id, event, store, actions),
        RenderKind::Stack(stack) => {
            // Containers only answer taps, via their tap action.
            match (&event, &stack.tap_action) {
                (ControlEvent::Tapped, Some(action)) => {
                    store.dispatch(action, actions);
                    true
                }
                _ => false,
            }
        }
        _ => false,
    }
}

fn apply(
    control: &ControlPrimitive,
    id: &str,
    event: ControlEvent,
    store: &mut StateStore,
    actions: &dyn ActionHandler,
) -> bool {
    match (control, event) {
        (ControlPrimitive::Button { action, .. }, ControlEvent::Tapped) => {
            if let Some(action) = action {
                store.dispatch(action, actions);
            }
            true
        }
        (
            ControlPrimitive::Toggle { binding, on_change, .. }
            | ControlPrimitive::Checkbox { binding, on_change, .. }
            | ControlPrimitive::Radio { binding, on_change, .. },
            ControlEvent::Toggled(value),
        ) => {
            if let Some(binding) = binding {
                binding.write(store, StateValue::Bool(value));
            }
            fire(on_change, store, actions);
            true
        }
        (
            ControlPrimitive::Slider { binding, min, max, on_change, .. },
            ControlEvent::ValueChanged(value),
        ) => {
            if let Some(binding) = binding {
                binding.write(store, StateValue::Number(value.clamp(*min, *max)));
            }
            fire(on_change, store, actions);
            true
        }
        (
            ControlPrimitive::TextField { binding, on_change, .. }
            | ControlPrimitive::TextView { binding, on_change, .. },
            ControlEvent::TextEdited(text),
        ) => {
            if let Some(binding) = binding {
                binding.write(store, StateValue::Text(text));
            }
            fire(on_change, store, actions);
            true
        }
        (
            ControlPrimitive::TextField { binding, on_submit, .. },
            ControlEvent::Submitted(text),
        ) => {
            if let Some(binding) = binding {
                binding.write(store, StateValue::Text(text));
            }
            fire(on_submit, store, actions);
            true
        }
        (
            ControlPrimitive::Select { binding, items, on_change, .. },
            ControlEvent::IndexSelected(index),
        ) => {
            if index >= items.len() && !items.is_empty() {
                debug!(id, index, "selection index out of range");
                return false;
            }
            if let Some(binding) = binding {
                binding.write(store, StateValue::Number(index as f64));
            }
            fire(on_change, store, actions);
            true
        }
        (
            ControlPrimitive::Tab { binding, titles, .. },
            ControlEvent::IndexSelected(index),
        ) => {
            if index >= titles.len() {
                debug!(id, index, "tab index out of range");
                return false;
            }
            match binding {
                Some(binding) => binding.write(store, StateValue::Number(index as f64)),
                // Tabs still have to switch pages without a declared
                // binding, so fall back to the bare id key.
                None => store.set(id.to_string(), StateValue::Number(index as f64)),
            }
            true
        }
        (control, event) => {
            trace!(id, ?event, ?control, "event does not fit this control");
            false
        }
    }
}

fn fire(action: &Option<String>, store: &mut StateStore, actions: &dyn ActionHandler) {
    if let Some(action) = action {
        store.dispatch(action, actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildContext, build_node};
    use joist_schema::{LogActions, decode_root};
    use serde_json::json;

    fn scene(layout: serde_json::Value, store: &StateStore) -> RenderNode {
        let component = decode_root(&layout).expect("layout decodes");
        build_node(&component, &BuildContext::new(store))
    }

    #[test]
    fn test_toggle_event_writes_through_binding() {
        let mut store = StateStore::new();
        store.set("powerIsOn", StateValue::Bool(false));
        let tree = scene(json!({ "type": "Switch", "id": "power" }), &store);

        let handled =
            dispatch_event(&tree, "power", ControlEvent::Toggled(true), &mut store, &LogActions);
        assert!(handled);
        assert_eq!(store.get("powerIsOn"), Some(&StateValue::Bool(true)));
    }

    #[test]
    fn test_slider_event_clamps_to_declared_range() {
        let mut store = StateStore::new();
        store.set("volumeValue", StateValue::Number(0.5));
        let tree = scene(
            json!({ "type": "Slider", "id": "volume", "minimum": 0, "maximum": 1 }),
            &store,
        );

        dispatch_event(&tree, "volume", ControlEvent::ValueChanged(3.0), &mut store, &LogActions);
        assert_eq!(store.get("volumeValue"), Some(&StateValue::Number(1.0)));
    }

    #[test]
    fn test_text_edit_bumps_generation() {
        let mut store = StateStore::new();
        store.set("nameValue", StateValue::Text("a".to_string()));
        let tree = scene(json!({ "type": "TextField", "id": "name" }), &store);

        let before = store.generation();
        dispatch_event(
            &tree,
            "name",
            ControlEvent::TextEdited("ab".to_string()),
            &mut store,
            &LogActions,
        );
        assert!(store.generation() > before);
        assert_eq!(store.get("nameValue"), Some(&StateValue::Text("ab".to_string())));
    }

    #[test]
    fn test_submit_writes_text_and_fires_its_own_action() {
        use std::rc::Rc;

        let mut store = StateStore::new();
        store.set("queryValue", StateValue::Text(String::new()));
        store.register_action(
            "search",
            Rc::new(|s: &mut StateStore| {
                s.set("searched", StateValue::Bool(true));
            }),
        );
        let tree = scene(
            json!({ "type": "TextField", "id": "query", "onSubmit": "search" }),
            &store,
        );

        let handled = dispatch_event(
            &tree,
            "query",
            ControlEvent::Submitted("joists".to_string()),
            &mut store,
            &LogActions,
        );
        assert!(handled);
        assert_eq!(store.get("queryValue"), Some(&StateValue::Text("joists".to_string())));
        assert_eq!(store.get("searched"), Some(&StateValue::Bool(true)));
    }

    #[test]
    fn test_disabled_controls_swallow_events() {
        let mut store = StateStore::new();
        store.set("powerIsOn", StateValue::Bool(false));
        let tree = scene(
            json!({ "type": "Switch", "id": "power", "enabled": false }),
            &store,
        );

        let handled =
            dispatch_event(&tree, "power", ControlEvent::Toggled(true), &mut store, &LogActions);
        assert!(!handled);
        assert_eq!(store.get("powerIsOn"), Some(&StateValue::Bool(false)));
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let mut store = StateStore::new();
        let tree = scene(json!({ "type": "Label", "text": "x" }), &store);
        assert!(!dispatch_event(
            &tree,
            "missing",
            ControlEvent::Tapped,
            &mut store,
            &LogActions
        ));
    }

    #[test]
    fn test_button_tap_fires_registered_action() {
        use std::rc::Rc;

        let mut store = StateStore::new();
        store.set("count", StateValue::Number(0.0));
        store.register_action(
            "increment",
            Rc::new(|s: &mut StateStore| {
                let next = s.get("count").and_then(StateValue::as_f64).unwrap_or(0.0) + 1.0;
                s.set("count", StateValue::Number(next));
            }),
        );
        let tree = scene(
            json!({ "type": "Button", "id": "plus", "text": "+", "onclick": "increment" }),
            &store,
        );

        dispatch_event(&tree, "plus", ControlEvent::Tapped, &mut store, &LogActions);
        assert_eq!(store.get("count"), Some(&StateValue::Number(1.0)));
    }

    #[test]
    fn test_tab_selection_without_binding_uses_the_id_key() {
        let mut store = StateStore::new();
        let tree = scene(
            json!({
                "type": "Tab",
                "id": "pages",
                "child": [
                    { "type": "Label", "text": "one", "tabTitle": "One" },
                    { "type": "Label", "text": "two", "tabTitle": "Two" }
                ]
            }),
            &store,
        );

        let handled =
            dispatch_event(&tree, "pages", ControlEvent::IndexSelected(1), &mut store, &LogActions);
        assert!(handled);
        assert_eq!(store.get("pages"), Some(&StateValue::Number(1.0)));
    }
}
