//! Treemap view controller.

use super::{carry_selection, drill_key, resolve_view_root, select, toggle_selection};
use crate::animation::{AnimationMode, AnimationPlan, Frame, Playback};
use crate::input::{Key, Modifiers};
use crate::interpolator::AnimationInterpolator;
use crate::navigation::{Breadcrumbs, CrumbFocus, NavigationGraph, RectTraversal};
use crate::state::{InteractionState, Layer};
use hiermap_core::{
    AnimationTrigger, NodeId, NodeRecord, Point, Rect, Result, SelectionMode, Tree, TreeKind,
    TreemapOptions,
};
use hiermap_layout::{HitTester, LayoutSummary, RectLayout};
use std::time::Duration;
use tracing::{debug, trace};

/// Treemap: rectangles nested inside their parents.
#[derive(Debug, Clone)]
pub struct TreemapView {
    layout: RectLayout,
    interpolator: AnimationInterpolator,
    tree: Tree,
    bounds: Rect,
    view_root: Option<String>,
    state: InteractionState,
    navigation: NavigationGraph<RectTraversal>,
    breadcrumbs: Breadcrumbs,
    playback: Option<Playback>,
    summary: Option<LayoutSummary>,
}

impl TreemapView {
    /// Create an empty view.
    pub fn new(options: TreemapOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            interpolator: AnimationInterpolator::new(options.animation),
            layout: RectLayout::new(&options),
            tree: Tree::new(TreeKind::Rect),
            bounds: Rect::default(),
            view_root: None,
            state: InteractionState::default(),
            navigation: NavigationGraph::new(RectTraversal),
            breadcrumbs: Breadcrumbs::default(),
            playback: None,
            summary: None,
        })
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &TreemapOptions {
        self.layout.options()
    }

    /// Current tree.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Bounds of the last render.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Isolation stack and other interaction state.
    #[must_use]
    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Result of the last layout pass.
    #[must_use]
    pub const fn summary(&self) -> Option<LayoutSummary> {
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

    /// Root of the current layout: the innermost isolated node, else the
    /// view root.
    #[must_use]
    pub fn active_root(&self) -> Option<NodeId> {
        let view_root = self.view_root()?;
        let isolated = self
            .state
            .isolation
            .resolve(&self.tree)
            .filter(|&id| self.tree.depth_below(id, view_root).is_some());
        Some(isolated.unwrap_or(view_root))
    }

    /// Render layers for the isolation stack.
    #[must_use]
    pub fn layers(&self) -> Vec<Layer> {
        self.view_root()
            .map(|root| self.state.isolation.layers(&self.tree, root))
            .unwrap_or_default()
    }

    /// Rebuild from `records` and lay out inside `bounds`.
    ///
    /// Returns the plan for the transition from the previous render: a fade-in
    /// on first display, otherwise a drill or data-change plan, each subject to
    /// its animation trigger.
    pub fn render(&mut self, records: &[NodeRecord], bounds: Rect) -> Result<Option<AnimationPlan>> {
        self.finish_playback();
        let old_root = self.active_root();
        let mut tree = Tree::from_records(records, TreeKind::Rect);
        carry_selection(&self.tree, &mut tree, self.options().selection);
        self.navigation.remap(&self.tree, &tree);
        let old = std::mem::replace(&mut self.tree, tree);
        self.bounds = bounds;

        resolve_view_root(&self.tree, &mut self.view_root);
        let Some(new_root) = self.relayout()? else {
            return Ok(None);
        };

        let animation = &self.options().animation;
        let plan = match old_root {
            None if animation.on_display == AnimationTrigger::Auto => {
                Some(self.interpolator.display(&self.tree, new_root))
            }
            Some(old_root) if animation.on_data_change == AnimationTrigger::Auto => {
                Some(self.interpolator.plan_change(&old, old_root, &self.tree, new_root))
            }
            _ => None,
        };
        Ok(plan.map(|p| self.play(p)))
    }

    /// Lay out the active root and refresh the breadcrumbs.
    fn relayout(&mut self) -> Result<Option<NodeId>> {
        let (Some(view_root), Some(active)) = (self.view_root(), self.active_root()) else {
            self.summary = None;
            self.breadcrumbs = Breadcrumbs::default();
            return Ok(None);
        };
        let show_root = active != view_root || self.options().show_root;
        self.summary = Some(self.layout.layout(&mut self.tree, active, self.bounds, show_root)?);
        self.breadcrumbs = Breadcrumbs::new(&self.tree, view_root);
        Ok(Some(active))
    }

    fn play(&mut self, plan: AnimationPlan) -> AnimationPlan {
        if !plan.is_empty() {
            self.playback = Some(Playback::new(plan.clone()));
        }
        plan
    }

    /// Snap any running animation to its end state.
    pub fn finish_playback(&mut self) -> Option<Vec<Frame>> {
        let mut playback = self.playback.take()?;
        (!playback.is_finished()).then(|| {
            trace!(elapsed = ?playback.elapsed(), "playback stopped");
            playback.stop()
        })
    }

    /// Advance the running animation. Returns whether it is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let running = self.playback.as_mut().is_some_and(|p| p.advance(dt));
        if !running {
            self.playback = None;
        }
        running
    }

    /// Current animation frame.
    #[must_use]
    pub fn frame(&self) -> Vec<Frame> {
        self.playback.as_ref().map(Playback::frame).unwrap_or_default()
    }

    /// Deepest node at `point`, scoped to the active root.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        HitTester::rect_node_at(&self.tree, self.active_root()?, point)
    }

    /// Apply a navigation key. Ctrl+Space toggles the focused node's
    /// selection in multiple-selection mode.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Option<NodeId> {
        let scope = self.active_root()?;
        let next = self.navigation.handle_key(&mut self.tree, scope, key, modifiers)?;
        if key == Key::Space && modifiers.command() && self.options().selection == SelectionMode::Multiple {
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
        if let Some(scope) = self.active_root() {
            if self.tree.get(id).is_some() {
                self.navigation.set_focus(&mut self.tree, scope, id);
            }
        }
    }

    /// Select a node according to the selection mode.
    pub fn select(&mut self, id: NodeId) -> Result<bool> {
        let mode = self.options().selection;
        select(&mut self.tree, mode, id)
    }

    /// Toggle a node's selection.
    pub fn toggle_selection(&mut self, id: NodeId) -> Result<bool> {
        let mode = self.options().selection;
        toggle_selection(&mut self.tree, mode, id)
    }

    /// Show only the subtree under `id`, animating over the isolate duration.
    pub fn isolate(&mut self, id: NodeId) -> Result<AnimationPlan> {
        self.finish_playback();
        let before = self.tree.clone();
        self.state.isolation.push(&self.tree, id)?;
        self.isolation_changed(&before)
    }

    /// Undo the innermost isolation. Returns `None` when nothing is isolated.
    pub fn restore(&mut self) -> Result<Option<AnimationPlan>> {
        if self.state.isolation.is_empty() {
            return Ok(None);
        }
        self.finish_playback();
        let before = self.tree.clone();
        self.state.isolation.pop();
        self.isolation_changed(&before).map(Some)
    }

    fn isolation_changed(&mut self, before: &Tree) -> Result<AnimationPlan> {
        let Some(scope) = self.relayout()? else {
            return Ok(AnimationPlan::empty(AnimationMode::Isolate));
        };
        if self.navigation.focused().is_some_and(|f| self.tree.depth_below(f, scope).is_none()) {
            self.navigation.blur();
        }
        debug!(depth = self.state.isolation.len(), "isolation changed");
        let plan = self.interpolator.isolate(before, &self.tree, scope);
        Ok(self.play(plan))
    }

    /// Make `id` the view root. Clears the isolation stack.
    pub fn drill(&mut self, id: NodeId) -> Result<AnimationPlan> {
        let key = drill_key(&self.tree, id)?;
        self.finish_playback();
        let Some(old_root) = self.active_root() else {
            return Ok(AnimationPlan::empty(AnimationMode::Drill));
        };
        let old = self.tree.clone();
        self.view_root = key;
        self.state.isolation.clear();
        let Some(new_root) = self.relayout()? else {
            return Ok(AnimationPlan::empty(AnimationMode::Drill));
        };
        if self.options().animation.on_data_change == AnimationTrigger::None {
            return Ok(AnimationPlan::empty(AnimationMode::Drill));
        }
        let plan = self.interpolator.drill(&old, old_root, &self.tree, new_root);
        Ok(self.play(plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationKind;
    use hiermap_core::{AnimationOptions, GroupGaps};

    fn options() -> TreemapOptions {
        TreemapOptions {
            group_gaps: GroupGaps::None,
            group_headers: false,
            animation: AnimationOptions {
                on_display: AnimationTrigger::Auto,
                on_data_change: AnimationTrigger::Auto,
                ..AnimationOptions::default()
            },
            ..TreemapOptions::default()
        }
    }

    fn records() -> Vec<NodeRecord> {
        vec![NodeRecord::group(
            "root",
            vec![
                NodeRecord::group("a", vec![NodeRecord::leaf("a1", 2.0), NodeRecord::leaf("a2", 1.0)]),
                NodeRecord::group("b", vec![NodeRecord::leaf("b1", 3.0)]),
            ],
        )]
    }

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 300.0, 200.0);

    fn key(view: &TreemapView, k: &str) -> NodeId {
        view.tree().find_by_key(k).unwrap()
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = TreemapOptions {
            gap_size: -1.0,
            ..TreemapOptions::default()
        };
        assert!(TreemapView::new(options).is_err());
    }

    #[test]
    fn test_first_render_fades_in() {
        let mut view = TreemapView::new(options()).unwrap();
        let plan = view.render(&records(), BOUNDS).unwrap().unwrap();
        assert_eq!(plan.mode(), AnimationMode::Display);
        assert_eq!(plan.count(AnimationKind::Insert), plan.len());
        assert!(view.playback().is_some());
        assert!(view.advance(Duration::from_millis(100)));
        assert!(!view.advance(Duration::from_secs(1)));
        assert!(view.playback().is_none());
    }

    #[test]
    fn test_rerender_same_data_is_noop_update() {
        let mut view = TreemapView::new(options()).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        let plan = view.render(&records(), BOUNDS).unwrap().unwrap();
        assert_eq!(plan.mode(), AnimationMode::DataChange);
        assert_eq!(plan.count(AnimationKind::Update), plan.len());
        assert!(plan.steps().iter().all(|s| s.is_noop()));
    }

    #[test]
    fn test_no_trigger_no_plan() {
        let mut view = TreemapView::new(TreemapOptions::default()).unwrap();
        assert!(view.render(&records(), BOUNDS).unwrap().is_none());
        assert!(view.render(&records(), BOUNDS).unwrap().is_none());
        assert!(view.render(&[], BOUNDS).unwrap().is_none());
        assert_eq!(view.active_root(), None);
    }

    #[test]
    fn test_isolate_restore_stack() {
        let mut view = TreemapView::new(options()).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        let root = view.tree().root().unwrap();
        let (a, a1) = (key(&view, "a"), key(&view, "a1"));

        let plan = view.isolate(a).unwrap();
        assert_eq!(plan.mode(), AnimationMode::Isolate);
        assert_eq!(plan.duration(), Duration::from_millis(250));
        assert_eq!(view.active_root(), Some(a));
        assert_eq!(view.tree()[a].rect(), Some(BOUNDS));
        assert!(!view.tree()[key(&view, "b")].has_layout());

        view.isolate(a1).unwrap();
        assert_eq!(view.active_root(), Some(a1));
        assert_eq!(view.layers().len(), 3);

        view.restore().unwrap();
        assert_eq!(view.active_root(), Some(a));
        view.restore().unwrap();
        assert_eq!(view.active_root(), Some(root));
        assert!(view.restore().unwrap().is_none());
    }

    #[test]
    fn test_isolation_survives_rerender() {
        let mut view = TreemapView::new(options()).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        view.isolate(key(&view, "b")).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        assert_eq!(view.active_root(), Some(key(&view, "b")));
    }

    #[test]
    fn test_hit_test_scoped_to_isolation() {
        let mut view = TreemapView::new(options()).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        view.isolate(key(&view, "b")).unwrap();
        assert_eq!(view.hit_test(Point::new(10.0, 10.0)), Some(key(&view, "b1")));
    }

    #[test]
    fn test_drill_clears_isolation() {
        let mut view = TreemapView::new(options()).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        let a = key(&view, "a");
        view.isolate(a).unwrap();

        let plan = view.drill(a).unwrap();
        assert_eq!(plan.mode(), AnimationMode::Drill);
        assert!(view.state().isolation.is_empty());
        assert_eq!(view.view_root(), Some(a));
        assert_eq!(view.breadcrumbs().crumbs().len(), 2);

        let root = view.tree().root().unwrap();
        view.drill(root).unwrap();
        assert_eq!(view.view_root(), Some(root));
        assert!(view.breadcrumbs().crumbs().is_empty());
    }

    #[test]
    fn test_ctrl_space_toggles_in_multiple_mode() {
        let mut view = TreemapView::new(TreemapOptions {
            selection: SelectionMode::Multiple,
            ..options()
        })
        .unwrap();
        view.render(&records(), BOUNDS).unwrap();
        let first = view.handle_key(Key::Right, Modifiers::NONE).unwrap();
        assert_eq!(view.handle_key(Key::Space, Modifiers::CTRL), Some(first));
        assert!(view.tree()[first].selected);
        view.handle_key(Key::Space, Modifiers::CTRL);
        assert!(!view.tree()[first].selected);
    }

    #[test]
    fn test_selection_carried_across_render() {
        let mut view = TreemapView::new(TreemapOptions {
            selection: SelectionMode::Single,
            ..options()
        })
        .unwrap();
        view.render(&records(), BOUNDS).unwrap();
        view.select(key(&view, "a2")).unwrap();
        view.render(&records(), BOUNDS).unwrap();
        assert_eq!(view.tree().selected(), vec![key(&view, "a2")]);
    }
}
