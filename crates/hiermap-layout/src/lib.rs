#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
//! Space-filling layout for Hiermap trees.
//!
//! Two families of partitioning share one arena ([`hiermap_core::Tree`]):
//!
//! - **Rectangles** ([`RectLayout`]): squarified or slice-and-dice treemaps
//!   with group gaps, header bands and pixel snapping.
//! - **Wedges** ([`PolarLayout`]): sunburst rings scaled so the deepest
//!   visible branch reaches the outer radius.
//!
//! [`HitTester`] maps screen points back to nodes for either family.

mod hit;
mod polar;
mod rect;

pub use hit::HitTester;
pub use polar::{PolarLayout, PolarSummary};
pub use rect::{Axis, LayoutSummary, Partition, RectLayout, SliceAndDice, Squarified, ZCounter};
