//! The strongly-typed component tree produced by the decoder.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::decode::{bool_of, number_of};
use crate::gravity::Gravity;
use crate::insets::EdgeInsets;
use crate::shadow::ShadowSpec;
use crate::size::SizeSpec;
use crate::visibility::Visibility;

/// Stack direction for container components. Absent means the container
/// positions children by relative constraints instead of stacking them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn parse(value: &Value) -> Option<Orientation> {
        match value.as_str().map(str::trim) {
            Some("horizontal") => Some(Orientation::Horizontal),
            Some("vertical") => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

/// Parent-edge, centering, and sibling-relative position declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AnchorSpec {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub center_horizontal: bool,
    pub center_vertical: bool,
    pub center_in_parent: bool,
    pub above: Option<String>,
    pub below: Option<String>,
    pub left_of: Option<String>,
    pub right_of: Option<String>,
}

impl AnchorSpec {
    pub(crate) fn read(map: &Map<String, Value>) -> AnchorSpec {
        let flag = |keys: &[&str]| {
            keys.iter().any(|k| map.get(*k).and_then(bool_of).unwrap_or(false))
        };
        let target = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        AnchorSpec {
            top: flag(&["alignTop", "align_top"]),
            bottom: flag(&["alignBottom", "align_bottom"]),
            left: flag(&["alignLeft", "align_left"]),
            right: flag(&["alignRight", "align_right"]),
            center_horizontal: flag(&["centerHorizontal", "center_horizontal"]),
            center_vertical: flag(&["centerVertical", "center_vertical"]),
            center_in_parent: flag(&["centerInParent", "center_in_parent"]),
            above: target(&["above"]),
            below: target(&["below"]),
            left_of: target(&["leftOf", "left_of"]),
            right_of: target(&["rightOf", "right_of"]),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.top
            && !self.bottom
            && !self.left
            && !self.right
            && !self.center_horizontal
            && !self.center_vertical
            && !self.center_in_parent
            && self.above.is_none()
            && self.below.is_none()
            && self.left_of.is_none()
            && self.right_of.is_none()
    }

    /// Whether this spec asks for explicit vertical placement.
    pub fn wants_vertical(&self) -> bool {
        self.top
            || self.bottom
            || self.center_vertical
            || self.center_in_parent
            || self.above.is_some()
            || self.below.is_some()
    }

    /// Whether this spec asks for explicit horizontal placement.
    pub fn wants_horizontal(&self) -> bool {
        self.left
            || self.right
            || self.center_horizontal
            || self.center_in_parent
            || self.left_of.is_some()
            || self.right_of.is_some()
    }

    /// Sibling ids this spec positions against.
    pub fn sibling_targets(&self) -> impl Iterator<Item = &str> {
        [&self.above, &self.below, &self.left_of, &self.right_of]
            .into_iter()
            .filter_map(|t| t.as_deref())
    }
}

/// Linear gradient background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientSpec {
    pub colors: Vec<String>,
    pub direction: GradientDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    #[default]
    Vertical,
    Horizontal,
}

impl GradientSpec {
    pub(crate) fn read(map: &Map<String, Value>) -> Option<GradientSpec> {
        let colors: Vec<String> = map
            .get("gradient")?
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        if colors.len() < 2 {
            return None;
        }
        let direction = map
            .get("gradientDirection")
            .or_else(|| map.get("gradient_direction"))
            .and_then(Value::as_str);
        let direction = match direction {
            Some("horizontal") => GradientDirection::Horizontal,
            _ => GradientDirection::Vertical,
        };
        Some(GradientSpec { colors, direction })
    }
}

/// Sibling-relative paint order hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ZOrderHint {
    /// Paint over the named sibling.
    Above(String),
    /// Paint under the named sibling.
    Below(String),
}

impl ZOrderHint {
    pub(crate) fn read(map: &Map<String, Value>) -> Option<ZOrderHint> {
        let target = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        if let Some(id) = target(&["zAbove", "z_above"]) {
            return Some(ZOrderHint::Above(id));
        }
        target(&["zBelow", "z_below"]).map(ZOrderHint::Below)
    }

    pub fn target(&self) -> &str {
        match self {
            ZOrderHint::Above(id) | ZOrderHint::Below(id) => id,
        }
    }
}

/// Action names wired to interaction events.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EventHandlers {
    pub on_click: Option<String>,
    pub on_change: Option<String>,
    pub on_submit: Option<String>,
}

impl EventHandlers {
    pub(crate) fn read(map: &Map<String, Value>) -> EventHandlers {
        let name = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        EventHandlers {
            on_click: name(&["onClick", "onclick", "on_click"]),
            on_change: name(&["onChange", "on_change"]),
            on_submit: name(&["onSubmit", "on_submit"]),
        }
    }
}

/// One decoded JSON node.
///
/// Attributes every component type shares live in typed fields; keys the
/// decoder does not consume stay in [`Component::attrs`] for the per-type
/// converters (`text`, `fontSize`, `src`, `items`, ...). Components are
/// values: immutable after decode, rebuilt wholesale on reload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub kind: String,
    pub id: Option<String>,
    pub width: SizeSpec,
    pub height: SizeSpec,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub ideal_width: Option<f64>,
    pub ideal_height: Option<f64>,
    pub aspect_width: Option<f64>,
    pub aspect_height: Option<f64>,
    pub weight: f64,
    pub padding: EdgeInsets,
    pub margin: EdgeInsets,
    pub background: Option<String>,
    pub gradient: Option<GradientSpec>,
    pub corner_radius: f64,
    pub border_width: Option<f64>,
    pub border_color: Option<String>,
    pub shadow: Option<ShadowSpec>,
    pub opacity: Option<f64>,
    pub clip_to_bounds: bool,
    pub visibility: Visibility,
    pub hidden: bool,
    pub enabled: bool,
    pub gravity: Gravity,
    pub anchors: AnchorSpec,
    pub orientation: Option<Orientation>,
    pub spacing: f64,
    pub z_order: Option<ZOrderHint>,
    pub events: EventHandlers,
    pub children: Vec<Component>,
    pub attrs: Map<String, Value>,
}

impl Component {
    /// Fresh component of the given type with every attribute defaulted.
    pub fn new(kind: &str) -> Component {
        Component {
            kind: kind.to_string(),
            id: None,
            width: SizeSpec::WrapContent,
            height: SizeSpec::WrapContent,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            ideal_width: None,
            ideal_height: None,
            aspect_width: None,
            aspect_height: None,
            weight: 0.0,
            padding: EdgeInsets::ZERO,
            margin: EdgeInsets::ZERO,
            background: None,
            gradient: None,
            corner_radius: 0.0,
            border_width: None,
            border_color: None,
            shadow: None,
            opacity: None,
            clip_to_bounds: false,
            visibility: Visibility::Visible,
            hidden: false,
            enabled: true,
            gravity: Gravity::default(),
            anchors: AnchorSpec::default(),
            orientation: None,
            spacing: 0.0,
            z_order: None,
            events: EventHandlers::default(),
            children: Vec::new(),
            attrs: Map::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// First present value among alias spellings.
    pub fn attr_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|k| self.attrs.get(*k))
    }

    pub fn attr_str(&self, keys: &[&str]) -> Option<&str> {
        self.attr_any(keys).and_then(Value::as_str)
    }

    pub fn attr_f64(&self, keys: &[&str]) -> Option<f64> {
        self.attr_any(keys).and_then(number_of)
    }

    pub fn attr_bool(&self, keys: &[&str]) -> Option<bool> {
        self.attr_any(keys).and_then(bool_of)
    }
}

/// Outcome of decoding one JSON node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decoded {
    /// A renderable component.
    Component(Component),
    /// Valid JSON that produces no view: a missing or empty `type`, a
    /// non-object child, or an include left unresolved upstream.
    NonRendering,
}

impl Decoded {
    pub fn into_component(self) -> Option<Component> {
        match self {
            Decoded::Component(c) => Some(c),
            Decoded::NonRendering => None,
        }
    }
}
