//! The render tree produced by the component builder.
//!
//! A [`RenderNode`] is renderer-agnostic: it carries layout parameters,
//! the ordered modifier chain, and a primitive kind. Backends walk the
//! arranged tree and draw; nothing in here touches a GPU.

use joist_schema::{AnchorSpec, Binding, EdgeInsets, Gravity, Visibility, ZOrderHint};

use crate::color::Rgba;
use crate::modifier::{FrameSpec, Modifier};

/// Stack axis. `Orientation` from the document maps onto this; a
/// container without an axis positions children by relative anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Parameters the parent container consumes when placing this node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutParams {
    pub weight: f64,
    pub gravity: Gravity,
    pub anchors: AnchorSpec,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub font_size: f64,
    pub color: Rgba,
    pub max_lines: Option<usize>,
}

impl TextPrimitive {
    pub fn new(text: impl Into<String>, font_size: f64) -> TextPrimitive {
        TextPrimitive { text: text.into(), font_size, color: Rgba::BLACK, max_lines: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Bundled asset referenced by name.
    Asset(String),
    /// Fetched at render time; the placeholder asset shows until then.
    Remote { url: String, placeholder: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    #[default]
    Fit,
    Fill,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    pub source: ImageSource,
    pub content_mode: ContentMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackPrimitive {
    /// `None` means children are positioned by their anchors instead of
    /// being stacked along an axis.
    pub axis: Option<Axis>,
    pub spacing: f64,
    pub tap_action: Option<String>,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPrimitive {
    pub horizontal: bool,
    pub vertical: bool,
    pub spacing: f64,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    List,
    Date,
    Time,
}

/// Interactive leaf widgets. Each carries its resolved state binding
/// (if any) so the runtime can write changes back by key.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPrimitive {
    Button {
        label: String,
        icon: Option<String>,
        action: Option<String>,
        font_size: Option<f64>,
        text_color: Option<Rgba>,
    },
    Toggle {
        binding: Option<Binding>,
        value: bool,
        on_change: Option<String>,
    },
    Checkbox {
        binding: Option<Binding>,
        value: bool,
        label: Option<String>,
        on_change: Option<String>,
    },
    Radio {
        binding: Option<Binding>,
        value: bool,
        label: Option<String>,
        group: Option<String>,
        on_change: Option<String>,
    },
    Slider {
        binding: Option<Binding>,
        value: f64,
        min: f64,
        max: f64,
        on_change: Option<String>,
    },
    Progress {
        /// `Some` is determinate progress in `0..=1`.
        value: Option<f64>,
        circular: bool,
    },
    TextField {
        binding: Option<Binding>,
        text: String,
        hint: Option<String>,
        secure: bool,
        font_size: f64,
        on_change: Option<String>,
        on_submit: Option<String>,
    },
    TextView {
        binding: Option<Binding>,
        text: String,
        hint: Option<String>,
        font_size: f64,
        on_change: Option<String>,
    },
    Select {
        binding: Option<Binding>,
        items: Vec<String>,
        selected: usize,
        mode: SelectMode,
        on_change: Option<String>,
    },
    Tab {
        binding: Option<Binding>,
        titles: Vec<String>,
        selected: usize,
    },
    Web {
        url: Option<String>,
        html: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderKind {
    Text(TextPrimitive),
    Image(ImagePrimitive),
    /// Decorative box with no content of its own.
    Shape,
    Stack(StackPrimitive),
    Scroll(ScrollPrimitive),
    Control(ControlPrimitive),
}

/// One node of the render tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: Option<String>,
    pub params: LayoutParams,
    pub modifiers: Vec<Modifier>,
    pub kind: RenderKind,
}

impl RenderNode {
    pub fn new(kind: RenderKind) -> RenderNode {
        RenderNode { id: None, params: LayoutParams::default(), modifiers: Vec::new(), kind }
    }

    pub fn with_id(mut self, id: Option<String>) -> RenderNode {
        self.id = id;
        self
    }

    /// Total internal inset from the chain.
    pub fn padding(&self) -> EdgeInsets {
        self.modifiers.iter().fold(EdgeInsets::ZERO, |acc, m| match m {
            Modifier::Padding(p) => EdgeInsets {
                top: acc.top + p.top,
                right: acc.right + p.right,
                bottom: acc.bottom + p.bottom,
                left: acc.left + p.left,
            },
            _ => acc,
        })
    }

    /// Total external outset from the chain.
    pub fn margin(&self) -> EdgeInsets {
        self.modifiers.iter().fold(EdgeInsets::ZERO, |acc, m| match m {
            Modifier::Margin(p) => EdgeInsets {
                top: acc.top + p.top,
                right: acc.right + p.right,
                bottom: acc.bottom + p.bottom,
                left: acc.left + p.left,
            },
            _ => acc,
        })
    }

    /// Last frame modifier wins when several are present.
    pub fn frame(&self) -> FrameSpec {
        self.modifiers
            .iter()
            .rev()
            .find_map(|m| match m {
                Modifier::Frame(f) => Some(*f),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Product of every opacity entry in the chain, `1.0` when none.
    pub fn opacity(&self) -> f64 {
        self.modifiers.iter().fold(1.0, |acc, m| match m {
            Modifier::Opacity(o) => acc * o,
            _ => acc,
        })
    }

    pub fn z_hint(&self) -> Option<&ZOrderHint> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::ZOrder(h) => Some(h),
            _ => None,
        })
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::AspectRatio(r) => Some(*r),
            _ => None,
        })
    }

    pub fn centers_in_parent(&self) -> bool {
        self.modifiers.iter().any(|m| matches!(m, Modifier::CenterInParent))
    }

    pub fn is_enabled(&self) -> bool {
        !self.modifiers.iter().any(|m| matches!(m, Modifier::Dimmed))
    }

    pub fn children(&self) -> &[RenderNode] {
        match &self.kind {
            RenderKind::Stack(s) => &s.children,
            RenderKind::Scroll(s) => &s.children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [RenderNode] {
        match &mut self.kind {
            RenderKind::Stack(s) => &mut s.children,
            RenderKind::Scroll(s) => &mut s.children,
            _ => &mut [],
        }
    }

    /// Depth-first search by declared id.
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    /// Visits every node in the tree, parents before children.
    pub fn walk(&self, visit: &mut dyn FnMut(&RenderNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub fn count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_| n += 1);
        n
    }
}
