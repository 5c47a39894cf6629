//! View configuration for treemaps and sunbursts.
//!
//! Options deserialize from JSON or TOML with every field optional; missing
//! fields take the defaults below. Loading always runs [`TreemapOptions::validate`]
//! or [`SunburstOptions::validate`].

use crate::easing::Easing;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default recursion guard for layout and diff traversals.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Rectangle partitioning algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreemapLayoutMode {
    /// Squarified packing (reorders children for aspect ratio)
    #[default]
    Squarified,
    /// Slice-and-dice, first level split along x
    SliceAndDiceHorizontal,
    /// Slice-and-dice, first level split along y
    SliceAndDiceVertical,
}

/// Whether siblings are sorted by descending size before allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sorting {
    /// Sort siblings descending by size
    On,
    /// Keep insertion order
    #[default]
    Off,
}

impl Sorting {
    /// Whether sorting is enabled.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Which group (non-leaf) nodes are inset by the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupGaps {
    /// No gaps
    None,
    /// Gaps around top-level groups only
    #[default]
    Outer,
    /// Gaps around every group
    All,
}

/// When an animation plan is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationTrigger {
    /// Never animate
    #[default]
    None,
    /// Animate automatically
    Auto,
}

/// Node selection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Selection disabled
    #[default]
    None,
    /// At most one selected node
    Single,
    /// Any number of selected nodes
    Multiple,
}

/// Animation timing shared by both views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Duration of drill and data-change animations, in milliseconds
    pub duration_ms: u64,
    /// Duration of isolate/restore animations, in milliseconds
    pub isolate_duration_ms: u64,
    /// Animate when data changes
    pub on_data_change: AnimationTrigger,
    /// Animate the initial display
    pub on_display: AnimationTrigger,
    /// Easing applied when sampling
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            isolate_duration_ms: 250,
            on_data_change: AnimationTrigger::None,
            on_display: AnimationTrigger::None,
            easing: Easing::Linear,
        }
    }
}

impl AnimationOptions {
    /// Duration of drill and data-change animations.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Duration of isolate/restore animations.
    #[must_use]
    pub const fn isolate_duration(&self) -> Duration {
        Duration::from_millis(self.isolate_duration_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.duration_ms == 0 && self.on_data_change == AnimationTrigger::Auto {
            return Err(Error::InvalidOption {
                field: "animation.duration_ms",
                reason: "must be positive when data-change animation is enabled".to_string(),
            });
        }
        Ok(())
    }
}

/// Treemap view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapOptions {
    /// Partitioning algorithm
    pub layout: TreemapLayoutMode,
    /// Sibling sorting (slice-and-dice only; squarified always reorders)
    pub sorting: Sorting,
    /// Which groups get gaps
    pub group_gaps: GroupGaps,
    /// Gap between adjacent groups, in pixels
    pub gap_size: f64,
    /// Reserve a header band on group nodes
    pub group_headers: bool,
    /// Height of the header band, in pixels
    pub header_height: f64,
    /// Render the root node itself (space still flows to children)
    pub show_root: bool,
    /// Right-to-left reading direction
    pub rtl: bool,
    /// Selection behavior
    pub selection: SelectionMode,
    /// Recursion guard
    pub max_depth: usize,
    /// Animation timing
    pub animation: AnimationOptions,
}

impl Default for TreemapOptions {
    fn default() -> Self {
        Self {
            layout: TreemapLayoutMode::Squarified,
            sorting: Sorting::Off,
            group_gaps: GroupGaps::Outer,
            gap_size: 3.0,
            group_headers: true,
            header_height: 15.0,
            show_root: false,
            rtl: false,
            selection: SelectionMode::None,
            max_depth: DEFAULT_MAX_DEPTH,
            animation: AnimationOptions::default(),
        }
    }
}

impl TreemapOptions {
    /// Load options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML string.
    pub fn from_toml(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Check numeric options for sane values.
    pub fn validate(&self) -> Result<()> {
        if !(self.gap_size >= 0.0 && self.gap_size.is_finite()) {
            return Err(Error::InvalidOption {
                field: "gap_size",
                reason: format!("must be a non-negative number, got {}", self.gap_size),
            });
        }
        if !(self.header_height > 0.0 && self.header_height.is_finite()) {
            return Err(Error::InvalidOption {
                field: "header_height",
                reason: format!("must be positive, got {}", self.header_height),
            });
        }
        validate_depth(self.max_depth)?;
        self.animation.validate()
    }

    /// Gap applied around a group at `depth` below the layout root.
    #[must_use]
    pub fn gap_for(&self, depth: usize, is_group: bool) -> f64 {
        if !is_group || depth == 0 {
            return 0.0;
        }
        match self.group_gaps {
            GroupGaps::None => 0.0,
            GroupGaps::Outer if depth == 1 => self.gap_size,
            GroupGaps::Outer => 0.0,
            GroupGaps::All => self.gap_size,
        }
    }
}

/// Whether the sunburst can be rotated interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationMode {
    /// Rotation by drag and keyboard nudge
    #[default]
    On,
    /// Fixed orientation
    Off,
}

/// Sunburst view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunburstOptions {
    /// Sibling sorting
    pub sorting: Sorting,
    /// Right-to-left reading direction
    pub rtl: bool,
    /// Start angle in degrees, counter-clockwise from 3 o'clock
    pub start_angle: f64,
    /// Unit radius of the root hub relative to one ring
    pub root_node_radius: f64,
    /// Interactive rotation
    pub rotation: RotationMode,
    /// Keyboard rotation step, in degrees
    pub nudge_degrees: f64,
    /// Selection behavior
    pub selection: SelectionMode,
    /// Recursion guard
    pub max_depth: usize,
    /// Animation timing
    pub animation: AnimationOptions,
}

impl Default for SunburstOptions {
    fn default() -> Self {
        Self {
            sorting: Sorting::Off,
            rtl: false,
            start_angle: 90.0,
            root_node_radius: 1.0,
            rotation: RotationMode::On,
            nudge_degrees: 5.0,
            selection: SelectionMode::None,
            max_depth: DEFAULT_MAX_DEPTH,
            animation: AnimationOptions::default(),
        }
    }
}

impl SunburstOptions {
    /// Load options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML string.
    pub fn from_toml(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Check numeric options for sane values.
    pub fn validate(&self) -> Result<()> {
        if !self.start_angle.is_finite() {
            return Err(Error::InvalidOption {
                field: "start_angle",
                reason: "must be finite".to_string(),
            });
        }
        if !(self.root_node_radius >= 0.0 && self.root_node_radius.is_finite()) {
            return Err(Error::InvalidOption {
                field: "root_node_radius",
                reason: format!("must be non-negative, got {}", self.root_node_radius),
            });
        }
        if !(self.nudge_degrees > 0.0 && self.nudge_degrees < 360.0) {
            return Err(Error::InvalidOption {
                field: "nudge_degrees",
                reason: format!("must be in (0, 360), got {}", self.nudge_degrees),
            });
        }
        validate_depth(self.max_depth)?;
        self.animation.validate()
    }

    /// Start angle converted to screen-space radians (clockwise from 3 o'clock).
    #[must_use]
    pub fn start_angle_radians(&self) -> f64 {
        -self.start_angle.to_radians()
    }
}

fn validate_depth(max_depth: usize) -> Result<()> {
    if max_depth == 0 {
        return Err(Error::InvalidOption {
            field: "max_depth",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
