//! Scene layer: render tree construction and layout.
//!
//! Consumes resolved [`joist_schema::Component`] trees and produces a
//! [`RenderNode`] tree of primitives and modifier chains, then arranges
//! it into absolute frames backends can draw. The runtime module routes
//! control events back into the state store.

#![allow(clippy::all)]

pub mod build;
pub mod color;
pub mod convert;
pub mod layout;
pub mod modifier;
pub mod node;
pub mod runtime;

pub use build::{BuildContext, build_node};
pub use color::Rgba;
pub use layout::{
    DisplayItem, DisplayList, Frame, HeuristicMeasurer, LayoutDiagnostic, LayoutResult, Rect,
    Size, TextMeasurer, display_list, layout,
};
pub use modifier::{Fill, FrameSpec, Modifier, ShadowStyle};
pub use node::{
    Axis, ContentMode, ControlPrimitive, ImagePrimitive, ImageSource, LayoutParams, RenderKind,
    RenderNode, ScrollPrimitive, SelectMode, StackPrimitive, TextPrimitive,
};
pub use runtime::{ControlEvent, dispatch_event};
