#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::doc_markdown)]
//! Interaction layer for Hiermap treemaps and sunbursts.
//!
//! - Animation planning: [`AnimationInterpolator`] diffs laid-out trees into
//!   an [`AnimationPlan`], sampled over time by [`Playback`]
//! - Keyboard navigation: [`NavigationGraph`] with [`RectTraversal`] or
//!   [`PolarTraversal`], plus [`Breadcrumbs`]
//! - View state: [`IsolationStack`] and [`Rotation`]
//! - Controllers: [`TreemapView`] and [`SunburstView`]
//!
//! # Example
//!
//! ```
//! use hiermap_core::{NodeRecord, Rect, TreemapOptions};
//! use hiermap_interact::{Key, Modifiers, TreemapView};
//!
//! let records = vec![NodeRecord::group(
//!     "root",
//!     vec![NodeRecord::leaf("a", 2.0), NodeRecord::leaf("b", 1.0)],
//! )];
//! let mut view = TreemapView::new(TreemapOptions::default()).unwrap();
//! view.render(&records, Rect::new(0.0, 0.0, 300.0, 200.0)).unwrap();
//!
//! let focused = view.handle_key(Key::Right, Modifiers::NONE);
//! assert_eq!(focused, view.tree().find_by_key("a"));
//! ```

mod animation;
mod input;
mod interpolator;
mod navigation;
mod state;
mod view;

pub use animation::{
    Animation, AnimationKind, AnimationMode, AnimationPlan, FanIn, Frame, ParamVector, PlanBuilder,
    Playback,
};
pub use input::{Direction, Key, Modifiers};
pub use interpolator::AnimationInterpolator;
pub use navigation::{
    Breadcrumbs, CrumbFocus, Focus, NavigationGraph, PolarTraversal, RectTraversal, Traversal,
};
pub use state::{InteractionState, IsolationStack, Layer, Rotation};
pub use view::{SunburstView, TreemapView};
