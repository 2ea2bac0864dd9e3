use anyhow::Result;
use joist_scene::{
    BuildContext, ControlPrimitive, HeuristicMeasurer, LayoutDiagnostic, Modifier, RenderKind,
    Size, build_node, display_list, layout,
};
use joist_schema::{
    DocumentSource, Resolver, StateStore, StateValue, StyleCache, decode_root,
};
use serde_json::json;

const PHONE: Size = Size { width: 390.0, height: 844.0 };

fn build(layout_json: serde_json::Value, store: &StateStore) -> joist_scene::RenderNode {
    let component = decode_root(&layout_json).expect("layout decodes");
    build_node(&component, &BuildContext::new(store))
}

#[test]
fn weighted_rows_fill_a_phone_screen() -> Result<()> {
    let store = StateStore::new();
    let tree = build(
        json!({
            "type": "View",
            "orientation": "vertical",
            "width": "matchParent",
            "height": "matchParent",
            "child": [
                { "type": "View", "id": "header", "width": "matchParent", "height": 64 },
                { "type": "View", "id": "content", "width": "matchParent", "weight": 1 },
                { "type": "View", "id": "footer", "width": "matchParent", "height": 48 }
            ]
        }),
        &store,
    );
    let result = layout(&tree, PHONE, &HeuristicMeasurer);
    assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);

    let header = result.root.find("header").expect("header frame");
    let content = result.root.find("content").expect("content frame");
    let footer = result.root.find("footer").expect("footer frame");

    assert_eq!(header.rect.y, 0.0);
    assert_eq!(header.rect.height, 64.0);
    assert_eq!(content.rect.y, 64.0);
    assert_eq!(content.rect.height, 844.0 - 64.0 - 48.0);
    assert_eq!(footer.rect.y, 844.0 - 48.0);
    assert_eq!(footer.rect.width, 390.0);
    Ok(())
}

#[test]
fn visibility_states_differ_in_footprint_and_paint() -> Result<()> {
    let store = StateStore::new();
    let tree = build(
        json!({
            "type": "View",
            "orientation": "vertical",
            "width": 300,
            "height": 300,
            "child": [
                { "type": "View", "id": "a", "width": 100, "height": 40 },
                { "type": "View", "id": "b", "width": 100, "height": 40, "visibility": "invisible" },
                { "type": "View", "id": "c", "width": 100, "height": 40, "visibility": "gone" },
                { "type": "View", "id": "d", "width": 100, "height": 40 }
            ]
        }),
        &store,
    );
    let result = layout(&tree, PHONE, &HeuristicMeasurer);

    // The frame tree mirrors the render tree even for gone children.
    assert_eq!(result.root.children.len(), 4);

    let b = result.root.find("b").expect("invisible frame");
    assert_eq!(b.rect.height, 40.0, "invisible keeps its footprint");
    assert_eq!(b.opacity, 0.0, "invisible does not paint");

    let c = result.root.find("c").expect("gone frame");
    assert_eq!((c.rect.width, c.rect.height), (0.0, 0.0), "gone loses its footprint");

    let d = result.root.find("d").expect("frame after the gone row");
    assert_eq!(d.rect.y, 80.0, "rows below a gone child close the gap");

    let painted = display_list(&result.root);
    assert!(painted.items.iter().all(|item| item.id.as_deref() != Some("b")));
    assert!(painted.items.iter().any(|item| item.id.as_deref() == Some("d")));
    Ok(())
}

#[test]
fn relative_container_pins_corners_and_centers() -> Result<()> {
    let store = StateStore::new();
    let tree = build(
        json!({
            "type": "View",
            "width": 200,
            "height": 200,
            "child": [
                { "type": "View", "id": "badge", "width": 40, "height": 20,
                  "alignRight": true, "alignBottom": true },
                { "type": "View", "id": "middle", "width": 50, "height": 50,
                  "centerInParent": true }
            ]
        }),
        &store,
    );
    let result = layout(&tree, PHONE, &HeuristicMeasurer);

    let badge = result.root.find("badge").expect("badge frame");
    assert_eq!((badge.rect.x, badge.rect.y), (160.0, 180.0));

    let middle = result.root.find("middle").expect("centered frame");
    assert_eq!((middle.rect.x, middle.rect.y), (75.0, 75.0));
    assert_eq!(middle.rect.width, 50.0, "centering must not inflate the child");
    Ok(())
}

#[test]
fn sibling_anchor_cycle_is_reported_not_fatal() -> Result<()> {
    let store = StateStore::new();
    let tree = build(
        json!({
            "type": "View",
            "width": 100,
            "height": 100,
            "child": [
                { "type": "View", "id": "a", "width": 10, "height": 10, "rightOf": "b" },
                { "type": "View", "id": "b", "width": 10, "height": 10, "rightOf": "a" }
            ]
        }),
        &store,
    );
    let result = layout(&tree, PHONE, &HeuristicMeasurer);

    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, LayoutDiagnostic::ConstraintCycle { .. })));
    // Both frames still exist at their fallback positions.
    assert!(result.root.find("a").is_some());
    assert!(result.root.find("b").is_some());
    Ok(())
}

#[test]
fn modifier_order_survives_decoding() -> Result<()> {
    let store = StateStore::new();
    let tree = build(
        json!({
            "type": "View",
            "width": 100,
            "height": 50,
            "padding": 8,
            "background": "#FF0000",
            "cornerRadius": 4,
            "borderWidth": 1,
            "borderColor": "#000000",
            "topMargin": 5,
            "alpha": 0.5
        }),
        &store,
    );

    let position = |pred: fn(&Modifier) -> bool| {
        tree.modifiers.iter().position(pred).expect("modifier present")
    };
    let padding = position(|m| matches!(m, Modifier::Padding(_)));
    let frame = position(|m| matches!(m, Modifier::Frame(_)));
    let background = position(|m| matches!(m, Modifier::Background(_)));
    let corner = position(|m| matches!(m, Modifier::CornerRadius { .. }));
    let border = position(|m| matches!(m, Modifier::Border { .. }));
    let margin = position(|m| matches!(m, Modifier::Margin(_)));
    let opacity = position(|m| matches!(m, Modifier::Opacity(_)));

    assert!(padding < frame);
    assert!(frame < background);
    assert!(background < corner);
    assert!(corner < border);
    assert!(border < margin);
    assert!(margin < opacity);
    Ok(())
}

#[test]
fn buttons_apply_their_padding_exactly_once() -> Result<()> {
    let store = StateStore::new();

    let custom = build(json!({ "type": "Button", "text": "Go", "padding": 12 }), &store);
    let paddings: Vec<_> = custom
        .modifiers
        .iter()
        .filter_map(|m| match m {
            Modifier::Padding(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(paddings.len(), 1, "declared padding must replace the default, not stack");
    assert_eq!(paddings[0].top, 12.0);

    let default = build(json!({ "type": "Button", "text": "Go" }), &store);
    let paddings: Vec<_> = default
        .modifiers
        .iter()
        .filter_map(|m| match m {
            Modifier::Padding(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(paddings.len(), 1);
    assert_eq!((paddings[0].top, paddings[0].left), (10.0, 20.0));
    Ok(())
}

#[test]
fn labels_interpolate_state_into_text() -> Result<()> {
    let mut store = StateStore::new();
    store.set("user", StateValue::Text("Ada".to_string()));
    let tree = build(json!({ "type": "Label", "text": "Hello @{user}!" }), &store);

    match &tree.kind {
        RenderKind::Text(t) => assert_eq!(t.text, "Hello Ada!"),
        other => panic!("expected text, got {other:?}"),
    }
    Ok(())
}

#[test]
fn cross_axis_gravity_positions_stack_children() -> Result<()> {
    let store = StateStore::new();
    let tree = build(
        json!({
            "type": "View",
            "orientation": "vertical",
            "width": 300,
            "height": 300,
            "child": [
                { "type": "View", "id": "end", "width": 100, "height": 40, "gravity": "right" }
            ]
        }),
        &store,
    );
    let result = layout(&tree, PHONE, &HeuristicMeasurer);
    let end = result.root.find("end").expect("end frame");
    assert_eq!(end.rect.x, 200.0);
    Ok(())
}

#[test]
fn scroll_content_overflows_its_viewport() -> Result<()> {
    let store = StateStore::new();
    let rows: Vec<serde_json::Value> = (0..10)
        .map(|i| json!({ "type": "View", "id": format!("row{i}"), "width": 80, "height": 50 }))
        .collect();
    let tree = build(
        json!({ "type": "Scroll", "width": 100, "height": 200, "child": rows }),
        &store,
    );
    let result = layout(&tree, PHONE, &HeuristicMeasurer);

    assert_eq!(result.root.rect.height, 200.0, "the scroll keeps its declared extent");
    let last = result.root.find("row9").expect("last row");
    assert_eq!(last.rect.y, 450.0, "content keeps flowing past the viewport");
    Ok(())
}

#[test]
fn tab_shows_only_the_selected_page() -> Result<()> {
    let mut store = StateStore::new();
    store.set("pagesSelectedIndex", StateValue::Number(1.0));
    let tree = build(
        json!({
            "type": "Tab",
            "id": "pages",
            "child": [
                { "type": "Label", "id": "one", "text": "first", "tabTitle": "One" },
                { "type": "Label", "id": "two", "text": "second", "tabTitle": "Two" }
            ]
        }),
        &store,
    );

    assert!(tree.find("one").is_none(), "unselected pages stay out of the tree");
    assert!(tree.find("two").is_some());
    let bar = tree
        .children()
        .iter()
        .find_map(|child| match &child.kind {
            RenderKind::Control(ControlPrimitive::Tab { titles, selected, .. }) => {
                Some((titles.clone(), *selected))
            }
            _ => None,
        })
        .expect("tab bar");
    assert_eq!(bar.0, vec!["One".to_string(), "Two".to_string()]);
    assert_eq!(bar.1, 1);
    Ok(())
}

struct MemorySource {
    styles: Vec<(&'static str, &'static str)>,
}

impl DocumentSource for MemorySource {
    fn load_layout(&self, _name: &str) -> Option<String> {
        None
    }

    fn load_style(&self, name: &str) -> Option<String> {
        self.styles
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, body)| (*body).to_string())
    }
}

#[test]
fn styled_layout_builds_with_merged_attributes() -> Result<()> {
    let source = MemorySource {
        styles: vec![("card", r##"{ "background": "#FFFFFF", "cornerRadius": 8 }"##)],
    };
    let mut styles = StyleCache::new(false);
    let mut resolver = Resolver::new(&source, &mut styles);
    let store = StateStore::new();

    let raw = json!({ "type": "View", "style": "card", "width": 100, "height": 100 });
    let resolved = resolver.resolve(&raw, &store);
    let tree = build(resolved, &store);

    assert!(tree.modifiers.iter().any(|m| matches!(m, Modifier::Background(_))));
    assert!(tree
        .modifiers
        .iter()
        .any(|m| matches!(m, Modifier::CornerRadius { radius, .. } if *radius == 8.0)));
    Ok(())
}
