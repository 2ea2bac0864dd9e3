use std::collections::HashMap;
use std::time::SystemTime;

use anyhow::Result;
use joist_schema::{
    Component, Decoded, DocumentSource, Gravity, HAlign, Orientation, Resolver, SizeSpec,
    StateStore, StateValue, StyleCache, VAlign, Visibility, decode_root, parse_document,
};

#[derive(Default)]
struct MemorySource {
    layouts: HashMap<String, String>,
    styles: HashMap<String, String>,
}

impl DocumentSource for MemorySource {
    fn load_layout(&self, name: &str) -> Option<String> {
        self.layouts.get(name).cloned()
    }

    fn load_style(&self, name: &str) -> Option<String> {
        self.styles.get(name).cloned()
    }

    fn layout_stamp(&self, _name: &str) -> Option<SystemTime> {
        None
    }
}

fn decode(source: &MemorySource, text: &str) -> Result<Component> {
    let raw = parse_document(text)?;
    let mut styles = StyleCache::new(false);
    let state = StateStore::new();
    let resolved = Resolver::new(source, &mut styles).resolve(&raw, &state);
    Ok(decode_root(&resolved)?)
}

#[test]
fn decodes_a_complete_screen_document() -> Result<()> {
    let text = r##"{
        "type": "View",
        "id": "screen",
        "width": "matchParent",
        "height": "matchParent",
        "orientation": "vertical",
        "padding": [16],
        "background": "#FFFFFF",
        "child": [
            {
                "type": "Label",
                "id": "title",
                "text": "Welcome",
                "fontSize": 24,
                "gravity": "centerHorizontal"
            },
            {
                "type": "TextField",
                "id": "name",
                "hint": "Your name",
                "height": 44,
                "topMargin": 12
            },
            {
                "type": "Button",
                "id": "submit",
                "text": "Go",
                "onClick": "submitForm",
                "width": "matchParent",
                "weight": 0
            }
        ]
    }"##;
    let root = decode(&MemorySource::default(), text)?;

    assert_eq!(root.kind, "View");
    assert_eq!(root.id.as_deref(), Some("screen"));
    assert!(root.width.is_match_parent());
    assert_eq!(root.orientation, Some(Orientation::Vertical));
    assert_eq!(root.padding.left, 16.0);
    assert_eq!(root.background.as_deref(), Some("#FFFFFF"));
    assert_eq!(root.children.len(), 3);

    let title = &root.children[0];
    assert_eq!(title.kind, "Label");
    assert_eq!(title.attr_str(&["text"]), Some("Welcome"));
    assert_eq!(title.attr_f64(&["fontSize", "font_size"]), Some(24.0));
    assert_eq!(title.gravity.horizontal, Some(HAlign::Center));
    assert_eq!(title.gravity.vertical, None);

    let field = &root.children[1];
    assert_eq!(field.height, SizeSpec::Fixed(44.0));
    assert_eq!(field.margin.top, 12.0);
    assert_eq!(field.attr_str(&["hint"]), Some("Your name"));

    let button = &root.children[2];
    assert_eq!(button.events.on_click.as_deref(), Some("submitForm"));
    assert_eq!(button.weight, 0.0);
    Ok(())
}

#[test]
fn styles_and_includes_compose_through_the_pipeline() -> Result<()> {
    let mut source = MemorySource::default();
    source.styles.insert(
        "card".to_string(),
        r##"{"background": "#F5F5F5", "cornerRadius": 10, "padding": [12, 16]}"##.to_string(),
    );
    source.layouts.insert(
        "user_row".to_string(),
        r#"{
            "type": "View",
            "style": "card",
            "orientation": "horizontal",
            "child": [
                {"type": "Label", "text": "@{name}"},
                {"type": "Label", "text": "(@{role})"}
            ]
        }"#
        .to_string(),
    );

    let text = r#"{
        "type": "View",
        "orientation": "vertical",
        "child": [
            {"include": "user_row", "data": {"name": "Ada", "role": "admin"}}
        ]
    }"#;
    let root = decode(&source, text)?;

    let row = &root.children[0];
    assert_eq!(row.kind, "View");
    assert_eq!(row.orientation, Some(Orientation::Horizontal));
    assert_eq!(row.background.as_deref(), Some("#F5F5F5"));
    assert_eq!(row.corner_radius, 10.0);
    assert_eq!(row.padding.top, 12.0);
    assert_eq!(row.padding.left, 16.0);
    assert_eq!(row.children[0].attr_str(&["text"]), Some("Ada"));
    assert_eq!(row.children[1].attr_str(&["text"]), Some("(admin)"));
    Ok(())
}

#[test]
fn include_can_leave_references_for_render_time_state() -> Result<()> {
    let mut source = MemorySource::default();
    source.layouts.insert(
        "status".to_string(),
        r#"{"type": "Label", "id": "status", "text": "@{statusText}"}"#.to_string(),
    );

    let text = r#"{"type": "View", "child": [{"include": "status"}]}"#;
    let root = decode(&source, text)?;
    let label = &root.children[0];
    // No include variable matched, so interpolation happens later
    // against the screen's state store.
    assert_eq!(label.attr_str(&["text"]), Some("@{statusText}"));

    let mut state = StateStore::new();
    state.set("statusText", StateValue::Text("Ready".to_string()));
    let rendered = joist_schema::interpolate(label.attr_str(&["text"]).unwrap(), None, &state);
    assert_eq!(rendered, "Ready");
    Ok(())
}

#[test]
fn visibility_and_gravity_survive_decode() -> Result<()> {
    let text = r#"{
        "type": "View",
        "child": [
            {"type": "Label", "text": "a", "visibility": "gone"},
            {"type": "Label", "text": "b", "visibility": "invisible"},
            {"type": "Label", "text": "c", "gravity": ["bottom", "right"]}
        ]
    }"#;
    let root = decode(&MemorySource::default(), text)?;
    assert_eq!(root.children[0].visibility, Visibility::Gone);
    assert!(!root.children[0].visibility.occupies_space());
    assert_eq!(root.children[1].visibility, Visibility::Invisible);
    assert!(root.children[1].visibility.occupies_space());
    assert_eq!(
        root.children[2].gravity,
        Gravity { horizontal: Some(HAlign::Right), vertical: Some(VAlign::Bottom) }
    );
    Ok(())
}

#[test]
fn malformed_document_reports_a_parse_error() {
    let err = parse_document("{not json").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("not valid JSON"), "unexpected message: {text}");
}

#[test]
fn typeless_root_is_rejected_loudly() {
    let raw = parse_document(r#"{"id": "orphan"}"#).unwrap();
    let err = decode_root(&raw).unwrap_err();
    assert!(err.to_string().contains("type"), "unexpected message: {err}");
}

#[test]
fn decode_is_stable_across_repeated_runs() -> Result<()> {
    let mut source = MemorySource::default();
    source.styles.insert("pad".to_string(), r#"{"padding": [8]}"#.to_string());
    let text = r#"{
        "type": "View",
        "style": "pad",
        "child": [{"type": "Label", "text": "same"}, "skipped"]
    }"#;

    let first = decode(&source, text)?;
    let second = decode(&source, text)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn non_object_nodes_decode_to_nothing() {
    let raw = parse_document(r#""just a string""#).unwrap();
    assert!(matches!(joist_schema::decode_node(&raw), Decoded::NonRendering));
}
