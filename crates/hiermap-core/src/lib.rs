#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Core types for the Hiermap space-filling layout engine.
//!
//! This crate provides the foundation shared by the treemap and sunburst:
//! - The node arena: [`Tree`], [`Node`], [`NodeId`], [`NodeKind`]
//! - Input records: [`NodeRecord`]
//! - Geometric primitives: [`Point`], [`Rect`], [`PolarBounds`]
//! - Color parsing: [`Color`]
//! - View configuration: [`TreemapOptions`], [`SunburstOptions`]
//! - Errors: [`Error`], [`Result`]

mod color;
mod easing;
mod error;
mod geometry;
mod options;
mod record;
mod tree;

pub use color::{Color, ColorParseError};
pub use easing::Easing;
pub use error::{Error, Result};
pub use geometry::{normalize_angle, normalize_signed_angle, Point, PolarBounds, Rect};
pub use options::{
    AnimationOptions, AnimationTrigger, GroupGaps, RotationMode, SelectionMode, Sorting,
    SunburstOptions, TreemapLayoutMode, TreemapOptions, DEFAULT_MAX_DEPTH,
};
pub use record::NodeRecord;
pub use tree::{
    Node, NodeId, NodeKind, PolarGeometry, RectGeometry, Tree, TreeKind, ARTIFICIAL_ROOT_KEY,
};
