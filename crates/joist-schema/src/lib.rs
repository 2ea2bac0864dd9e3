//! Schema layer for Joist layout documents.
//!
//! Parses JSON view hierarchies into typed [`Component`] trees, expands
//! `style` and `include` references, and hosts the dynamic state store
//! that text interpolation and control bindings read from. Everything
//! here is renderer-agnostic; turning components into drawable nodes is
//! the scene crate's job.

#![allow(clippy::all)]

pub mod binding;
pub mod component;
pub mod decode;
pub mod error;
pub mod gravity;
pub mod insets;
pub mod resolve;
pub mod shadow;
pub mod size;
pub mod visibility;

pub use binding::{
    ActionHandler, Binding, BindingKind, LogActions, Section, StateStore, StateValue, interpolate,
    sections_for,
};
pub use component::{
    AnchorSpec, Component, Decoded, EventHandlers, GradientDirection, GradientSpec, Orientation,
    ZOrderHint,
};
pub use decode::{decode_node, decode_root, parse_document};
pub use error::DocumentError;
pub use gravity::{Gravity, HAlign, VAlign};
pub use insets::EdgeInsets;
pub use resolve::{DocumentSource, Resolver, StyleCache, deep_merge};
pub use shadow::ShadowSpec;
pub use size::SizeSpec;
pub use visibility::Visibility;
