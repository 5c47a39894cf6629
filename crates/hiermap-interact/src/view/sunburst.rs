//! Sunburst view controller.

use super::{carry_selection, drill_key, resolve_view_root, select, toggle_selection};
use crate::animation::{AnimationMode, AnimationPlan, FanIn, Frame, Playback};
use crate::input::{Key, Modifiers};
use crate::interpolator::AnimationInterpolator;
use crate::navigation::{Breadcrumbs, CrumbFocus, NavigationGraph, PolarTraversal};
use crate::state::InteractionState;
use hiermap_core::{
    AnimationTrigger, Error, NodeId, NodeRecord, Point, Rect, Result, RotationMode, SelectionMode,
    SunburstOptions, Tree, TreeKind,
};
use hiermap_layout::{HitTester, PolarLayout, PolarSummary};
use std::f64::consts::TAU;
use std::time::Duration;
use tracing::{debug, trace};

/// Sunburst: concentric rings of wedges around a root hub.
///
/// Rotation relayouts synchronously without animation. The first display can
/// fan in, sweeping the disc open from zero extent.
#[derive(Debug, Clone)]
pub struct SunburstView {
    options: SunburstOptions,
    layout: PolarLayout,
    interpolator: AnimationInterpolator,
    tree: Tree,
    bounds: Rect,
    view_root: Option<String>,
    state: InteractionState,
    navigation: NavigationGraph<PolarTraversal>,
    breadcrumbs: Breadcrumbs,
    playback: Option<Playback>,
    fan_in: Option<(FanIn, Duration)>,
    summary: Option<PolarSummary>,
}

impl SunburstView {
    /// Create an empty view.
    pub fn new(options: SunburstOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            layout: PolarLayout::new(&options),
            interpolator: AnimationInterpolator::new(options.animation),
            options,
            tree: Tree::new(TreeKind::Polar),
            bounds: Rect::default(),
            view_root: None,
            state: InteractionState::default(),
            navigation: NavigationGraph::new(PolarTraversal),
            breadcrumbs: Breadcrumbs::default(),
            playback: None,
            fan_in: None,
            summary: None,
        })
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &SunburstOptions {
        &self.options
    }

    /// Current tree.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Rotation and other interaction state.
    #[must_use]
    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Result of the last layout pass.
    #[must_use]
    pub const fn summary(&self) -> Option<PolarSummary> {
        self.summary
    }

    /// Animation currently playing.
    #[must_use]
    pub const fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    /// Breadcrumb trail for the view root.
    #[must_use]
    pub const fn breadcrumbs(&self) -> &Breadcrumbs {
        &self.breadcrumbs
    }

    /// Focused node.
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.navigation.focused()
    }

    /// Centre of the disc.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Radius of the disc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.bounds.shorter_side().max(0.0) / 2.0
    }

    /// Screen-space angle where the first child starts, including rotation.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.options.start_angle_radians() + self.state.rotation.angle()
    }

    /// Angular extent currently laid out: below 2π only while fanning in.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.fan_in
            .map_or(TAU, |(fan, elapsed)| fan.extent_at(elapsed))
    }

    /// Whether the initial sweep is still running.
    #[must_use]
    pub const fn is_fanning_in(&self) -> bool {
        self.fan_in.is_some()
    }

    /// Root the view is drilled into (the tree root when not drilled).
    #[must_use]
    pub fn view_root(&self) -> Option<NodeId> {
        let root = self.tree.root()?;
        Some(
            self.view_root
                .as_deref()
                .and_then(|k| self.tree.find_by_key(k))
                .unwrap_or(root),
        )
    }

    /// Rebuild from `records` and lay out inside `bounds`.
    ///
    /// The first display fans in when its trigger is on; later renders return
    /// a drill or data-change plan when the data-change trigger is on.
    pub fn render(&mut self, records: &[NodeRecord], bounds: Rect) -> Result<Option<AnimationPlan>> {
        self.stop_animations();
        let old_root = self.view_root();
        let mut tree = Tree::from_records(records, TreeKind::Polar);
        carry_selection(&self.tree, &mut tree, self.options.selection);
        self.navigation.remap(&self.tree, &tree);
        let old = std::mem::replace(&mut self.tree, tree);
        self.bounds = bounds;
        resolve_view_root(&self.tree, &mut self.view_root);

        let animation = self.options.animation;
        if old_root.is_none() && animation.on_display == AnimationTrigger::Auto {
            self.fan_in = Some((self.interpolator.fan_in(), Duration::ZERO));
        }
        let Some(new_root) = self.relayout()? else {
            return Ok(None);
        };

        let plan = match old_root {
            Some(old_root) if animation.on_data_change == AnimationTrigger::Auto => {
                self.interpolator.plan_change(&old, old_root, &self.tree, new_root)
            }
            _ => return Ok(None),
        };
        Ok(Some(self.play(plan)))
    }

    fn relayout(&mut self) -> Result<Option<NodeId>> {
        let Some(root) = self.view_root() else {
            self.summary = None;
            self.breadcrumbs = Breadcrumbs::default();
            return Ok(None);
        };
        let (radius, start, extent) = (self.radius(), self.start_angle(), self.extent());
        self.summary = Some(self.layout.layout(&mut self.tree, root, radius, start, extent)?);
        self.breadcrumbs = Breadcrumbs::new(&self.tree, root);
        Ok(Some(root))
    }

    fn play(&mut self, plan: AnimationPlan) -> AnimationPlan {
        if !plan.is_empty() {
            self.playback = Some(Playback::new(plan.clone()));
        }
        plan
    }

    /// Snap any running animation to its end state. A running fan-in
    /// completes and the disc is laid out at full extent.
    pub fn finish_playback(&mut self) -> Result<Option<Vec<Frame>>> {
        let frames = self.stop_playback();
        if self.fan_in.take().is_some() {
            self.relayout()?;
        }
        Ok(frames)
    }

    fn stop_playback(&mut self) -> Option<Vec<Frame>> {
        let mut playback = self.playback.take()?;
        (!playback.is_finished()).then(|| {
            trace!(elapsed = ?playback.elapsed(), "playback stopped");
            playback.stop()
        })
    }

    // Snap running playback and drop the fan-in ahead of a relayout.
    fn stop_animations(&mut self) {
        self.stop_playback();
        if self.fan_in.take().is_some() {
            trace!("fan-in cancelled");
        }
    }

    /// Advance running animations. The fan-in relayouts at the new extent.
    /// Returns whether anything is still running.
    pub fn advance(&mut self, dt: Duration) -> Result<bool> {
        let mut running = false;
        if let Some((fan, elapsed)) = self.fan_in {
            let elapsed = elapsed.saturating_add(dt);
            if fan.is_complete(elapsed) {
                self.fan_in = None;
            } else {
                self.fan_in = Some((fan, elapsed));
                running = true;
            }
            self.relayout()?;
        }
        if let Some(playback) = self.playback.as_mut() {
            if playback.advance(dt) {
                running = true;
            } else {
                self.playback = None;
            }
        }
        Ok(running)
    }

    /// Current animation frame.
    #[must_use]
    pub fn frame(&self) -> Vec<Frame> {
        self.playback.as_ref().map(Playback::frame).unwrap_or_default()
    }

    /// Deepest wedge at `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        HitTester::polar_node_at(&self.tree, self.view_root()?, self.center(), point)
    }

    /// Apply a navigation key. Ctrl+Space toggles the focused node's
    /// selection in multiple-selection mode.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Option<NodeId> {
        let scope = self.view_root()?;
        let next = self.navigation.handle_key(&mut self.tree, scope, key, modifiers)?;
        if key == Key::Space && modifiers.command() && self.options.selection == SelectionMode::Multiple {
            if let Ok(selected) = toggle_selection(&mut self.tree, SelectionMode::Multiple, next) {
                trace!(node = ?next, selected, "selection toggled");
            }
        }
        Some(next)
    }

    /// Tab or Shift+Tab on the breadcrumb trail.
    pub fn handle_tab(&mut self, modifiers: Modifiers) -> CrumbFocus {
        self.breadcrumbs.handle_tab(modifiers)
    }

    /// Focus a node directly.
    pub fn focus(&mut self, id: NodeId) {
        if let Some(scope) = self.view_root() {
            if self.tree.get(id).is_some() {
                self.navigation.set_focus(&mut self.tree, scope, id);
            }
        }
    }

    /// Select a node according to the selection mode.
    pub fn select(&mut self, id: NodeId) -> Result<bool> {
        select(&mut self.tree, self.options.selection, id)
    }

    /// Toggle a node's selection.
    pub fn toggle_selection(&mut self, id: NodeId) -> Result<bool> {
        toggle_selection(&mut self.tree, self.options.selection, id)
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Begin a rotation drag at `point`. Returns false when rotation is off.
    pub fn start_rotation(&mut self, point: Point) -> bool {
        if self.options.rotation == RotationMode::Off {
            return false;
        }
        self.state.rotation.start(point.angle_around(&self.center()));
        true
    }

    /// Follow the pointer and relayout. Returns the new rotation angle.
    pub fn continue_rotation(&mut self, point: Point) -> Result<Option<f64>> {
        let current = point.angle_around(&self.center());
        let Some(angle) = self.state.rotation.continue_to(current) else {
            return Ok(None);
        };
        self.relayout()?;
        Ok(Some(angle))
    }

    /// Finish the rotation drag.
    pub fn end_rotation(&mut self) {
        self.state.rotation.end();
    }

    /// Rotate by `steps` keyboard nudges (positive is clockwise) and relayout.
    pub fn nudge(&mut self, steps: i32) -> Result<Option<f64>> {
        if self.options.rotation == RotationMode::Off {
            return Ok(None);
        }
        let angle = self
            .state
            .rotation
            .nudge(f64::from(steps) * self.options.nudge_degrees.to_radians());
        self.relayout()?;
        Ok(Some(angle))
    }

    // =========================================================================
    // Structure changes
    // =========================================================================

    /// Expand or collapse `id` and relayout. Returns a data-change plan when
    /// the data-change trigger is on.
    pub fn toggle_disclosure(&mut self, id: NodeId) -> Result<Option<AnimationPlan>> {
        if self.tree.get(id).is_none() {
            return Err(Error::NodeNotFound(id));
        }
        self.stop_animations();
        let Some(root) = self.view_root() else {
            return Ok(None);
        };
        let before = self.tree.clone();
        let node = &mut self.tree[id];
        node.disclosed = !node.disclosed;
        debug!(node = %node.id, disclosed = node.disclosed, "disclosure toggled");
        self.relayout()?;
        if self.options.animation.on_data_change == AnimationTrigger::None {
            return Ok(None);
        }
        let plan = self.interpolator.data_change(&before, root, &self.tree, root);
        Ok(Some(self.play(plan)))
    }

    /// Make `id` the view root.
    pub fn drill(&mut self, id: NodeId) -> Result<AnimationPlan> {
        let key = drill_key(&self.tree, id)?;
        self.stop_animations();
        let Some(old_root) = self.view_root() else {
            return Ok(AnimationPlan::empty(AnimationMode::Drill));
        };
        let old = self.tree.clone();
        self.view_root = key;
        let Some(new_root) = self.relayout()? else {
            return Ok(AnimationPlan::empty(AnimationMode::Drill));
        };
        if self.options.animation.on_data_change == AnimationTrigger::None {
            return Ok(AnimationPlan::empty(AnimationMode::Drill));
        }
        let plan = self.interpolator.drill(&old, old_root, &self.tree, new_root);
        Ok(self.play(plan))
    }
}
