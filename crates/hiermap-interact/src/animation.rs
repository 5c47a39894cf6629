//! Animation plans and their playback.
//!
//! A plan is an immutable, ordered list of [`Animation`] steps. Each step
//! interpolates a [`ParamVector`] from a before state to an after state, so
//! treemap rectangles and sunburst wedges animate through the same numeric
//! path. Steps are ordered deletes, then updates, then inserts.

use hiermap_core::{Easing, Node, NodeId, NodeKind};
use std::f64::consts::TAU;
use std::time::Duration;

/// Numeric snapshot of a node's visual state.
///
/// `geometry` holds `[x, y, width, height]` for treemap nodes and
/// `[inner_radius, outer_radius, start_angle, angle_extent]` for sunburst
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamVector {
    /// Position and size components
    pub geometry: [f64; 4],
    /// Red, green and blue channels in `0.0..=1.0`
    pub rgb: [f64; 3],
    /// Opacity in `0.0..=1.0`
    pub alpha: f64,
    /// Repaint even when the values are unchanged
    pub force: bool,
}

impl ParamVector {
    /// Snapshot a node, or `None` when it has no layout.
    #[must_use]
    pub fn from_node(node: &Node) -> Option<Self> {
        let geometry = match &node.kind {
            NodeKind::Rect(g) => g.bounds.map(|r| [r.x, r.y, r.width, r.height]),
            NodeKind::Polar(g) => g
                .bounds
                .map(|w| [w.inner_radius, w.outer_radius, w.start_angle, w.angle_extent]),
        }?;
        let color = node.parsed_color();
        Some(Self {
            geometry,
            rgb: color.rgb_components(),
            alpha: f64::from(color.a),
            force: false,
        })
    }

    /// Same vector with a different opacity.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Same vector flagged for a forced repaint.
    #[must_use]
    pub const fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    /// Whether the numeric components match, ignoring `force`.
    #[must_use]
    pub fn same_values(&self, other: &Self) -> bool {
        self.geometry == other.geometry && self.rgb == other.rgb && self.alpha == other.alpha
    }

    /// Component-wise linear interpolation; `force` follows `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| (b - a).mul_add(t, a);
        Self {
            geometry: std::array::from_fn(|i| mix(self.geometry[i], to.geometry[i])),
            rgb: std::array::from_fn(|i| mix(self.rgb[i], to.rgb[i])),
            alpha: mix(self.alpha, to.alpha),
            force: to.force,
        }
    }
}

/// What an animation step does to its node.
///
/// The declaration order is the playback priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimationKind {
    /// Fade out and leave
    Delete,
    /// Move, resize or recolor
    Update,
    /// Fade in
    Insert,
}

/// How a plan was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationMode {
    /// The view root moved to an ancestor or descendant
    Drill,
    /// Same root, changed values or structure
    DataChange,
    /// Isolate or restore within a treemap
    Isolate,
    /// Initial appearance
    Display,
}

/// One interpolation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Node in the new tree, or in the old tree for deletes
    pub node: NodeId,
    /// Identity key of the node, when it has one
    pub key: Option<String>,
    /// Step kind
    pub kind: AnimationKind,
    /// Start state
    pub from: ParamVector,
    /// End state
    pub to: ParamVector,
    /// Step duration
    pub duration: Duration,
    /// Easing applied to progress
    pub easing: Easing,
}

impl Animation {
    /// Eased progress in `0.0..=1.0` after `elapsed`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        self.easing.apply(t)
    }

    /// Interpolated state after `elapsed`.
    #[must_use]
    pub fn value_at(&self, elapsed: Duration) -> ParamVector {
        self.from.lerp(&self.to, self.progress(elapsed))
    }

    /// Whether the step changes nothing on screen.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.to.force && self.from.same_values(&self.to)
    }
}

/// Ordered, immutable result of an animation diff.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlan {
    mode: AnimationMode,
    steps: Vec<Animation>,
    overlay: Vec<NodeId>,
    revealed: Vec<NodeId>,
}

impl AnimationPlan {
    /// Plan with no steps.
    #[must_use]
    pub const fn empty(mode: AnimationMode) -> Self {
        Self {
            mode,
            steps: Vec::new(),
            overlay: Vec::new(),
            revealed: Vec::new(),
        }
    }

    /// How the plan was produced.
    #[must_use]
    pub const fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// Steps in playback priority order.
    #[must_use]
    pub fn steps(&self) -> &[Animation] {
        &self.steps
    }

    /// Roots (in the old tree) of deleted subtrees that must stay mounted in
    /// an overlay until their fade-out finishes.
    #[must_use]
    pub fn overlay(&self) -> &[NodeId] {
        &self.overlay
    }

    /// New-tree ancestors of the old root shown immediately during a drill.
    #[must_use]
    pub fn revealed(&self) -> &[NodeId] {
        &self.revealed
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps of one kind.
    #[must_use]
    pub fn count(&self, kind: AnimationKind) -> usize {
        self.steps.iter().filter(|s| s.kind == kind).count()
    }

    /// Longest step duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| s.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// First step touching the node with `key`.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Animation> {
        self.steps.iter().find(|s| s.key.as_deref() == Some(key))
    }
}

/// Accumulates steps during a recursive diff.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    duration: Duration,
    easing: Easing,
    steps: Vec<Animation>,
    overlay: Vec<NodeId>,
    revealed: Vec<NodeId>,
}

impl PlanBuilder {
    /// Builder whose steps share one duration and easing.
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            steps: Vec::new(),
            overlay: Vec::new(),
            revealed: Vec::new(),
        }
    }

    fn push(&mut self, node: NodeId, key: Option<&str>, kind: AnimationKind, from: ParamVector, to: ParamVector) {
        self.steps.push(Animation {
            node,
            key: key.map(str::to_string),
            kind,
            from,
            to,
            duration: self.duration,
            easing: self.easing,
        });
    }

    /// Interpolate between two states.
    pub fn update(&mut self, node: NodeId, key: Option<&str>, from: ParamVector, to: ParamVector) {
        self.push(node, key, AnimationKind::Update, from, to);
    }

    /// Fade in from transparent.
    pub fn insert(&mut self, node: NodeId, key: Option<&str>, to: ParamVector) {
        self.push(node, key, AnimationKind::Insert, to.with_alpha(0.0), to);
    }

    /// Fade out to transparent.
    pub fn delete(&mut self, node: NodeId, key: Option<&str>, from: ParamVector) {
        self.push(node, key, AnimationKind::Delete, from, from.with_alpha(0.0));
    }

    /// Keep a deleted subtree mounted in the overlay.
    pub fn overlay(&mut self, old_node: NodeId) {
        self.overlay.push(old_node);
    }

    /// Show a node immediately instead of fading it in.
    pub fn reveal(&mut self, new_node: NodeId) {
        self.revealed.push(new_node);
    }

    /// Number of steps so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Finish the plan. Steps are stably ordered deletes, updates, inserts.
    #[must_use]
    pub fn build(mut self, mode: AnimationMode) -> AnimationPlan {
        self.steps.sort_by_key(|s| s.kind);
        AnimationPlan {
            mode,
            steps: self.steps,
            overlay: self.overlay,
            revealed: self.revealed,
        }
    }
}

/// Current value of one step during playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Animated node
    pub node: NodeId,
    /// Step kind
    pub kind: AnimationKind,
    /// Interpolated state
    pub value: ParamVector,
}

/// Time-driven sampling of a plan.
///
/// The host advances the clock from its frame loop. Stopping jumps every step
/// to its end state so the next layout pass starts from a consistent tree.
#[derive(Debug, Clone)]
pub struct Playback {
    plan: AnimationPlan,
    elapsed: Duration,
    stopped: bool,
}

impl Playback {
    /// Start playing a plan.
    #[must_use]
    pub const fn new(plan: AnimationPlan) -> Self {
        Self {
            plan,
            elapsed: Duration::ZERO,
            stopped: false,
        }
    }

    /// The plan being played.
    #[must_use]
    pub const fn plan(&self) -> &AnimationPlan {
        &self.plan
    }

    /// Time played so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance the clock. Returns whether playback is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.stopped {
            self.elapsed = (self.elapsed + dt).min(self.plan.duration());
        }
        !self.is_finished()
    }

    /// Whether every step reached its end state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stopped || self.elapsed >= self.plan.duration()
    }

    /// Whether playback was cancelled.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Current value of every step.
    #[must_use]
    pub fn frame(&self) -> Vec<Frame> {
        self.plan
            .steps
            .iter()
            .map(|s| Frame {
                node: s.node,
                kind: s.kind,
                value: if self.stopped {
                    s.to
                } else {
                    s.value_at(self.elapsed)
                },
            })
            .collect()
    }

    /// Cancel playback and return the terminal frame.
    pub fn stop(&mut self) -> Vec<Frame> {
        self.stopped = true;
        self.elapsed = self.plan.duration();
        self.frame()
    }
}

/// Initial sunburst reveal: the whole disc sweeps open from zero extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanIn {
    /// Sweep duration
    pub duration: Duration,
    /// Easing applied to the sweep
    pub easing: Easing,
}

impl FanIn {
    /// Angular extent of the disc after `elapsed`, from 0 to 2π.
    #[must_use]
    pub fn extent_at(&self, elapsed: Duration) -> f64 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        TAU * self.easing.apply(t)
    }

    /// Whether the sweep has finished.
    #[must_use]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}
