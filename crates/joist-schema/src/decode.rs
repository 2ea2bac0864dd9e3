//! Lenient JSON-to-component decoding.
//!
//! Decoding never fails below the document root: an unreadable attribute
//! falls back to its default and an unreadable child is dropped, so one
//! malformed fragment degrades instead of taking the whole screen down.
//! The only loud outcome is a root that produces no component at all.

use serde_json::{Map, Value};
use tracing::debug;

use crate::component::{AnchorSpec, Component, Decoded, EventHandlers, GradientSpec, Orientation, ZOrderHint};
use crate::error::{preview_of, DocumentError};
use crate::gravity::Gravity;
use crate::insets::EdgeInsets;
use crate::shadow::ShadowSpec;
use crate::size::SizeSpec;
use crate::visibility::Visibility;

/// Reads a JSON number, or a string that parses as one.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a JSON bool, or the strings `"true"` / `"false"`.
pub fn bool_of(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parses raw layout text into JSON, the first of the two loud failures.
pub fn parse_document(text: &str) -> Result<Value, DocumentError> {
    serde_json::from_str(text).map_err(|e| DocumentError::Parse {
        message: e.to_string(),
        preview: preview_of(text),
    })
}

/// Decodes the document root. Unlike child decoding this is fallible:
/// a root that yields no component is a whole-document failure.
pub fn decode_root(value: &Value) -> Result<Component, DocumentError> {
    match decode_node(value) {
        Decoded::Component(c) => Ok(c),
        Decoded::NonRendering => Err(DocumentError::Root {
            message: "root node has no usable \"type\"".to_string(),
            preview: preview_of(&value.to_string()),
        }),
    }
}

/// Decodes one node. Nodes that are not objects, or objects without a
/// non-empty `type`, are classified [`Decoded::NonRendering`].
pub fn decode_node(value: &Value) -> Decoded {
    let Some(map) = value.as_object() else {
        return Decoded::NonRendering;
    };
    let kind = map
        .get("type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let Some(kind) = kind else {
        return Decoded::NonRendering;
    };

    let mut c = Component::new(kind);
    c.id = str_keys(map, &["id"]);
    c.width = map.get("width").map(SizeSpec::parse).unwrap_or_default();
    c.height = map.get("height").map(SizeSpec::parse).unwrap_or_default();
    c.min_width = f64_keys(map, &["minWidth", "min_width"]);
    c.min_height = f64_keys(map, &["minHeight", "min_height"]);
    c.max_width = f64_keys(map, &["maxWidth", "max_width"]);
    c.max_height = f64_keys(map, &["maxHeight", "max_height"]);
    c.ideal_width = f64_keys(map, &["idealWidth", "ideal_width"]);
    c.ideal_height = f64_keys(map, &["idealHeight", "ideal_height"]);
    c.aspect_width = f64_keys(map, &["aspectWidth", "aspect_width"]);
    c.aspect_height = f64_keys(map, &["aspectHeight", "aspect_height"]);
    c.weight = f64_keys(map, &["weight"]).unwrap_or(0.0).max(0.0);
    c.padding = padding_of(map);
    c.margin = insets_of(map, "margin", &MARGIN_EDGES);
    c.background = str_keys(map, &["background", "backgroundColor", "background_color"]);
    c.gradient = GradientSpec::read(map);
    c.corner_radius = f64_keys(map, &["cornerRadius", "corner_radius"]).unwrap_or(0.0).max(0.0);
    c.border_width = f64_keys(map, &["borderWidth", "border_width"]);
    c.border_color = str_keys(map, &["borderColor", "border_color"]);
    c.shadow = map.get("shadow").and_then(ShadowSpec::parse);
    c.opacity = f64_keys(map, &["opacity", "alpha"]).map(|v| v.clamp(0.0, 1.0));
    c.clip_to_bounds = bool_keys(map, &["clipToBounds", "clip_to_bounds"]).unwrap_or(false);
    c.visibility = map.get("visibility").map(Visibility::parse).unwrap_or_default();
    c.hidden = bool_keys(map, &["hidden"]).unwrap_or(false);
    c.enabled = bool_keys(map, &["enabled"]).unwrap_or(true);
    c.gravity = map.get("gravity").map(Gravity::parse).unwrap_or_default();
    c.anchors = AnchorSpec::read(map);
    c.orientation = map.get("orientation").and_then(Orientation::parse);
    c.spacing = f64_keys(map, &["spacing"]).unwrap_or(0.0).max(0.0);
    c.z_order = ZOrderHint::read(map);
    c.events = EventHandlers::read(map);

    decode_children(map, &mut c);

    for (key, val) in map {
        if !is_consumed(key) {
            c.attrs.insert(key.clone(), val.clone());
        }
    }
    Decoded::Component(c)
}

/// Children come from `child`, as a single object or an array. Elements
/// that decode to nothing are dropped; surviving order is preserved, and
/// an empty result is the same as no `child` key at all.
fn decode_children(map: &Map<String, Value>, parent: &mut Component) {
    match map.get("child") {
        Some(Value::Array(items)) => {
            for item in items {
                match decode_node(item) {
                    Decoded::Component(child) => parent.children.push(child),
                    Decoded::NonRendering => {
                        debug!(parent = %parent.kind, "dropping non-rendering child element");
                    }
                }
            }
        }
        Some(single @ Value::Object(_)) => {
            if let Decoded::Component(child) = decode_node(single) {
                parent.children.push(child);
            } else {
                debug!(parent = %parent.kind, "dropping non-rendering child element");
            }
        }
        Some(_) => {
            debug!(parent = %parent.kind, "ignoring non-object child payload");
        }
        None => {}
    }
}

/// Padding resolution: base scalar/array form, per-edge overrides, then
/// the additive `insets` (all edges) and `insetHorizontal` (left/right)
/// terms on top.
fn padding_of(map: &Map<String, Value>) -> EdgeInsets {
    let mut padding = insets_of(map, "padding", &PADDING_EDGES);
    if let Some(extra) = f64_keys(map, &["insets"]) {
        padding.top += extra;
        padding.right += extra;
        padding.bottom += extra;
        padding.left += extra;
    }
    if let Some(extra) = f64_keys(map, &["insetHorizontal", "inset_horizontal"]) {
        padding.left += extra;
        padding.right += extra;
    }
    padding
}

fn insets_of(map: &Map<String, Value>, base: &str, edges: &EdgeKeys) -> EdgeInsets {
    let mut insets = map.get(base).map(EdgeInsets::parse).unwrap_or_default();
    // Named per-edge keys always win over the array/scalar form.
    if let Some(v) = f64_keys(map, edges.top) {
        insets.top = v;
    }
    if let Some(v) = f64_keys(map, edges.right) {
        insets.right = v;
    }
    if let Some(v) = f64_keys(map, edges.bottom) {
        insets.bottom = v;
    }
    if let Some(v) = f64_keys(map, edges.left) {
        insets.left = v;
    }
    insets
}

struct EdgeKeys {
    top: &'static [&'static str],
    right: &'static [&'static str],
    bottom: &'static [&'static str],
    left: &'static [&'static str],
}

impl EdgeKeys {
    fn contains(&self, key: &str) -> bool {
        self.top.contains(&key)
            || self.right.contains(&key)
            || self.bottom.contains(&key)
            || self.left.contains(&key)
    }
}

const PADDING_EDGES: EdgeKeys = EdgeKeys {
    top: &["paddingTop", "padding_top", "topPadding", "top_padding"],
    right: &["paddingRight", "padding_right", "rightPadding", "right_padding"],
    bottom: &["paddingBottom", "padding_bottom", "bottomPadding", "bottom_padding"],
    left: &["paddingLeft", "padding_left", "leftPadding", "left_padding"],
};

const MARGIN_EDGES: EdgeKeys = EdgeKeys {
    top: &["topMargin", "top_margin", "marginTop", "margin_top"],
    right: &["rightMargin", "right_margin", "marginRight", "margin_right"],
    bottom: &["bottomMargin", "bottom_margin", "marginBottom", "margin_bottom"],
    left: &["leftMargin", "left_margin", "marginLeft", "margin_left"],
};

/// Keys the decoder (or the resolver ahead of it) consumes; everything
/// else stays in `attrs` for the converters.
const CONSUMED_KEYS: &[&str] = &[
    "type", "id", "width", "height",
    "minWidth", "min_width", "minHeight", "min_height",
    "maxWidth", "max_width", "maxHeight", "max_height",
    "idealWidth", "ideal_width", "idealHeight", "ideal_height",
    "aspectWidth", "aspect_width", "aspectHeight", "aspect_height",
    "weight", "padding", "margin", "insets", "insetHorizontal", "inset_horizontal",
    "background", "backgroundColor", "background_color",
    "gradient", "gradientDirection", "gradient_direction",
    "cornerRadius", "corner_radius",
    "borderWidth", "border_width", "borderColor", "border_color",
    "shadow", "opacity", "alpha", "clipToBounds", "clip_to_bounds",
    "visibility", "hidden", "enabled", "gravity",
    "alignTop", "align_top", "alignBottom", "align_bottom",
    "alignLeft", "align_left", "alignRight", "align_right",
    "centerHorizontal", "center_horizontal", "centerVertical", "center_vertical",
    "centerInParent", "center_in_parent",
    "above", "below", "leftOf", "left_of", "rightOf", "right_of",
    "orientation", "spacing",
    "zAbove", "z_above", "zBelow", "z_below",
    "onClick", "onclick", "on_click", "onChange", "on_change", "onSubmit", "on_submit",
    "child", "style", "include", "data", "shared_data", "sharedData", "variables",
];

fn is_consumed(key: &str) -> bool {
    CONSUMED_KEYS.contains(&key) || PADDING_EDGES.contains(key) || MARGIN_EDGES.contains(key)
}

fn str_keys(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

fn f64_keys(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| map.get(*k).and_then(number_of))
}

fn bool_keys(map: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| map.get(*k).and_then(bool_of))
}
