//! Keyboard focus traversal over laid-out trees.
//!
//! [`NavigationGraph`] owns the focus state and delegates "where does this key
//! go" to a [`Traversal`]: [`RectTraversal`] moves spatially between treemap
//! rectangles, [`PolarTraversal`] moves radially and around sunburst rings.
//! A traversal returns `None` for keys it does not handle, so the host can
//! propagate them; a move with no target returns the current node.
//!
//! Navigation is the only component that writes `last_visited_child` on the
//! tree, so descending resumes where the user last came up from.

use crate::input::{Direction, Key, Modifiers};
use hiermap_core::{normalize_signed_angle, NodeId, Rect, Tree};
use tracing::trace;

/// Keyboard focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Nothing focused
    #[default]
    Unfocused,
    /// A node has focus
    Focused(NodeId),
}

/// Resolves the node a key press moves focus to.
pub trait Traversal {
    /// Next focus from `current` within the subtree under `scope`.
    ///
    /// `None` means the key is not handled here.
    fn next(&self, tree: &Tree, scope: NodeId, current: NodeId, key: Key, modifiers: Modifiers) -> Option<NodeId>;

    /// Node focused when navigation starts.
    fn entry(&self, tree: &Tree, scope: NodeId) -> Option<NodeId> {
        first_laid_out_child(tree, scope).or_else(|| tree[scope].has_layout().then_some(scope))
    }
}

fn first_laid_out_child(tree: &Tree, id: NodeId) -> Option<NodeId> {
    tree.children(id).iter().copied().find(|&c| tree[c].has_layout())
}

fn is_navigation_key(key: Key) -> bool {
    key.direction().is_some() || matches!(key, Key::BracketLeft | Key::BracketRight)
}

/// Descend to the remembered child, else the given fallback, else stay.
fn descend(tree: &Tree, current: NodeId, fallback: impl FnOnce() -> Option<NodeId>) -> NodeId {
    let node = &tree[current];
    if !node.disclosed || node.is_leaf() {
        return current;
    }
    node.last_visited_child()
        .filter(|&c| tree[c].has_layout())
        .or_else(fallback)
        .unwrap_or(current)
}

// =============================================================================
// Treemap
// =============================================================================

/// Spatial traversal between treemap rectangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectTraversal;

impl RectTraversal {
    fn to_parent(tree: &Tree, scope: NodeId, current: NodeId) -> NodeId {
        match tree.parent(current) {
            Some(parent) if current != scope && parent != scope => parent,
            _ => current,
        }
    }

    fn to_child(tree: &Tree, current: NodeId) -> NodeId {
        descend(tree, current, || first_laid_out_child(tree, current))
    }

    /// Nearest rectangle in `direction` among nodes at the same depth under
    /// `scope`. Rectangles overlapping on the cross axis win over those that
    /// do not; ties break on distance along the primary axis.
    #[must_use]
    pub fn nearest_in_direction(tree: &Tree, scope: NodeId, current: NodeId, direction: Direction) -> Option<NodeId> {
        let from = tree[current].rect()?;
        let depth = tree.depth_below(current, scope)?;
        let center = from.center();

        let mut best: Option<(NodeId, f64)> = None;
        for id in nodes_at_depth(tree, scope, depth) {
            if id == current {
                continue;
            }
            let Some(rect) = tree[id].rect() else {
                continue;
            };
            let other = rect.center();
            let (dx, dy) = (other.x - center.x, other.y - center.y);
            let (valid, overlaps, dist) = match direction {
                Direction::Left => (dx < -1.0, overlaps_vertically(&from, &rect), dx.abs()),
                Direction::Right => (dx > 1.0, overlaps_vertically(&from, &rect), dx.abs()),
                Direction::Up => (dy < -1.0, overlaps_horizontally(&from, &rect), dy.abs()),
                Direction::Down => (dy > 1.0, overlaps_horizontally(&from, &rect), dy.abs()),
            };
            if !valid {
                continue;
            }
            let score = if overlaps { dist } else { dist + 100_000.0 };
            if best.map_or(true, |(_, d)| score < d) {
                best = Some((id, score));
            }
        }
        best.map(|(id, _)| id)
    }
}

fn overlaps_vertically(a: &Rect, b: &Rect) -> bool {
    b.y < a.bottom() && b.bottom() > a.y
}

fn overlaps_horizontally(a: &Rect, b: &Rect) -> bool {
    b.x < a.right() && b.right() > a.x
}

/// Nodes exactly `depth` levels below `scope`, in tree order.
fn nodes_at_depth(tree: &Tree, scope: NodeId, depth: usize) -> Vec<NodeId> {
    let mut level = vec![scope];
    for _ in 0..depth {
        level = level
            .iter()
            .flat_map(|&id| tree.children(id).iter().copied())
            .collect();
    }
    level
}

impl Traversal for RectTraversal {
    fn next(&self, tree: &Tree, scope: NodeId, current: NodeId, key: Key, modifiers: Modifiers) -> Option<NodeId> {
        match key {
            Key::BracketLeft => Some(Self::to_parent(tree, scope, current)),
            Key::BracketRight => Some(Self::to_child(tree, current)),
            Key::Up if modifiers.alt => Some(Self::to_parent(tree, scope, current)),
            Key::Down if modifiers.alt => Some(Self::to_child(tree, current)),
            Key::Up | Key::Down | Key::Left | Key::Right => {
                let direction = key.direction()?;
                Some(Self::nearest_in_direction(tree, scope, current, direction).unwrap_or(current))
            }
            Key::Space if modifiers.command() => Some(current),
            Key::Space | Key::Enter | Key::Escape | Key::Tab => None,
        }
    }
}

// =============================================================================
// Sunburst
// =============================================================================

/// Radial traversal between sunburst wedges.
///
/// Up and down move outward or inward depending on whether the focused wedge
/// sits in the upper or lower half of the disc, so the arrow always points
/// the way focus travels on screen. Left and right cycle through siblings in
/// angular order, wrapping at the ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarTraversal;

impl PolarTraversal {
    /// Whether a screen-space angle lies in the upper half of the disc
    /// (`[0°, 180°)` counter-clockwise from 3 o'clock).
    #[must_use]
    pub fn in_upper_half(screen_angle: f64) -> bool {
        let ccw = (360.0 - screen_angle.to_degrees()).rem_euclid(360.0);
        ccw < 180.0
    }

    fn inward(tree: &Tree, scope: NodeId, current: NodeId) -> NodeId {
        match tree.parent(current) {
            Some(parent) if current != scope => parent,
            _ => current,
        }
    }

    fn outward(tree: &Tree, current: NodeId) -> NodeId {
        descend(tree, current, || {
            let mid = tree[current].polar()?.mid_angle();
            tree.children(current)
                .iter()
                .copied()
                .filter_map(|c| tree[c].polar().map(|w| (c, w)))
                .filter(|(_, w)| w.has_area())
                .min_by(|(_, a), (_, b)| {
                    let da = normalize_signed_angle(a.mid_angle() - mid).abs();
                    let db = normalize_signed_angle(b.mid_angle() - mid).abs();
                    da.total_cmp(&db)
                })
                .map(|(c, _)| c)
        })
    }

    fn vertical(tree: &Tree, scope: NodeId, current: NodeId, direction: Direction) -> NodeId {
        if current == scope {
            return Self::outward(tree, current);
        }
        let Some(wedge) = tree[current].polar() else {
            return current;
        };
        let upper = Self::in_upper_half(wedge.mid_angle());
        if (direction == Direction::Up) == upper {
            Self::outward(tree, current)
        } else {
            Self::inward(tree, scope, current)
        }
    }

    fn sibling(tree: &Tree, scope: NodeId, current: NodeId, step: isize) -> NodeId {
        let Some(parent) = tree.parent(current).filter(|_| current != scope) else {
            return current;
        };
        let mut ring: Vec<(NodeId, f64)> = tree
            .children(parent)
            .iter()
            .filter_map(|&c| tree[c].polar().filter(|w| w.has_area()).map(|w| (c, w.start_angle)))
            .collect();
        ring.sort_by(|a, b| a.1.total_cmp(&b.1));
        let Some(index) = ring.iter().position(|&(c, _)| c == current) else {
            return current;
        };
        let len = ring.len() as isize;
        let next = (index as isize + step).rem_euclid(len) as usize;
        ring[next].0
    }
}

impl Traversal for PolarTraversal {
    fn next(&self, tree: &Tree, scope: NodeId, current: NodeId, key: Key, modifiers: Modifiers) -> Option<NodeId> {
        match key {
            Key::BracketLeft => Some(Self::inward(tree, scope, current)),
            Key::BracketRight => Some(Self::outward(tree, current)),
            Key::Up => Some(Self::vertical(tree, scope, current, Direction::Up)),
            Key::Down => Some(Self::vertical(tree, scope, current, Direction::Down)),
            Key::Left => Some(Self::sibling(tree, scope, current, -1)),
            Key::Right => Some(Self::sibling(tree, scope, current, 1)),
            Key::Space if modifiers.command() => Some(current),
            Key::Space | Key::Enter | Key::Escape | Key::Tab => None,
        }
    }

    fn entry(&self, tree: &Tree, scope: NodeId) -> Option<NodeId> {
        tree[scope].has_layout().then_some(scope)
    }
}

// =============================================================================
// Focus state machine
// =============================================================================

/// Focus state plus the traversal that moves it.
#[derive(Debug, Clone, Default)]
pub struct NavigationGraph<T> {
    traversal: T,
    focus: Focus,
}

impl<T: Traversal> NavigationGraph<T> {
    /// Unfocused graph.
    #[must_use]
    pub const fn new(traversal: T) -> Self {
        Self {
            traversal,
            focus: Focus::Unfocused,
        }
    }

    /// Current focus state.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Focused node, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        match self.focus {
            Focus::Focused(id) => Some(id),
            Focus::Unfocused => None,
        }
    }

    /// Focus a node directly (for example after a click).
    pub fn set_focus(&mut self, tree: &mut Tree, scope: NodeId, id: NodeId) {
        remember_path(tree, scope, id);
        self.focus = Focus::Focused(id);
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.focus = Focus::Unfocused;
    }

    /// Apply a key press. Returns the newly focused node, or `None` when the
    /// key should propagate to the host.
    pub fn handle_key(&mut self, tree: &mut Tree, scope: NodeId, key: Key, modifiers: Modifiers) -> Option<NodeId> {
        if tree.get(scope).is_none() {
            return None;
        }
        let current = match self.focus {
            Focus::Focused(id)
                if tree.get(id).is_some_and(|n| n.has_layout())
                    && tree.depth_below(id, scope).is_some() =>
            {
                id
            }
            _ => {
                // First navigation key (or a stale focus) lands on the entry node.
                if !is_navigation_key(key) {
                    return None;
                }
                let entry = self.traversal.entry(tree, scope)?;
                self.set_focus(tree, scope, entry);
                return Some(entry);
            }
        };

        let next = self.traversal.next(tree, scope, current, key, modifiers)?;
        if next != current {
            trace!(from = ?tree[current].key(), to = ?tree[next].key(), ?key, "focus moved");
            self.set_focus(tree, scope, next);
        }
        Some(next)
    }

    /// Carry focus across a rebuild by identity key.
    pub fn remap(&mut self, old: &Tree, new: &Tree) {
        if let Focus::Focused(id) = self.focus {
            self.focus = old
                .get(id)
                .and_then(|n| n.key())
                .and_then(|k| new.find_by_key(k))
                .map_or(Focus::Unfocused, Focus::Focused);
        }
    }
}

/// Record the path from `scope` down to `node` as last-visited children.
fn remember_path(tree: &mut Tree, scope: NodeId, node: NodeId) {
    let mut child = node;
    while child != scope {
        let Some(parent) = tree.parent(child) else {
            break;
        };
        tree.set_last_visited_child(parent, child);
        child = parent;
    }
}

// =============================================================================
// Breadcrumbs
// =============================================================================

/// Where focus goes after a Tab press on the breadcrumb trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrumbFocus {
    /// A crumb took focus
    Crumb(NodeId),
    /// Focus moves on into the tree
    Tree,
    /// Focus leaves the component backwards
    Outside,
}

/// Linear focus traversal over the ancestor chain of a drilled view root.
///
/// Separate from [`NavigationGraph`]: Tab and Shift+Tab step through the
/// crumbs, and stepping past either end hands focus back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumbs {
    crumbs: Vec<NodeId>,
    focus: Option<usize>,
}

impl Breadcrumbs {
    /// Trail from the tree root down to `view_root`. Empty when the view root
    /// is the tree root.
    #[must_use]
    pub fn new(tree: &Tree, view_root: NodeId) -> Self {
        let mut crumbs: Vec<NodeId> = tree.ancestors(view_root).collect();
        if crumbs.is_empty() {
            return Self::default();
        }
        crumbs.reverse();
        crumbs.push(view_root);
        Self {
            crumbs,
            focus: None,
        }
    }

    /// Crumbs from the tree root to the view root.
    #[must_use]
    pub fn crumbs(&self) -> &[NodeId] {
        &self.crumbs
    }

    /// Focused crumb.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.map(|i| self.crumbs[i])
    }

    /// Handle Tab (forward) or Shift+Tab (backward).
    pub fn handle_tab(&mut self, modifiers: Modifiers) -> CrumbFocus {
        let len = self.crumbs.len();
        let next = if modifiers.shift {
            match self.focus {
                Some(0) => None,
                Some(i) => Some(i - 1),
                None if len > 0 => Some(len - 1),
                None => None,
            }
        } else {
            match self.focus {
                Some(i) if i + 1 < len => Some(i + 1),
                Some(_) => None,
                None if len > 0 => Some(0),
                None => None,
            }
        };
        self.focus = next;
        match next {
            Some(i) => CrumbFocus::Crumb(self.crumbs[i]),
            None if modifiers.shift => CrumbFocus::Outside,
            None => CrumbFocus::Tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiermap_core::{GroupGaps, NodeRecord, SunburstOptions, TreeKind, TreemapLayoutMode, TreemapOptions};
    use hiermap_layout::{PolarLayout, RectLayout};
    use std::f64::consts::TAU;

    fn grid() -> Tree {
        // Two columns of two cells each
        let records = [NodeRecord::group(
            "root",
            vec![
                NodeRecord::group("left", vec![NodeRecord::leaf("l1", 1.0), NodeRecord::leaf("l2", 1.0)]),
                NodeRecord::group("right", vec![NodeRecord::leaf("r1", 1.0), NodeRecord::leaf("r2", 1.0)]),
            ],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Rect);
        let root = tree.root().unwrap();
        let options = TreemapOptions {
            layout: TreemapLayoutMode::SliceAndDiceHorizontal,
            group_gaps: GroupGaps::None,
            group_headers: false,
            ..TreemapOptions::default()
        };
        RectLayout::new(&options)
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 200.0, 200.0), false)
            .unwrap();
        tree
    }

    fn id(tree: &Tree, key: &str) -> NodeId {
        tree.find_by_key(key).unwrap()
    }

    #[test]
    fn test_rect_arrows_move_within_depth() {
        let tree = grid();
        let root = tree.root().unwrap();
        let t = RectTraversal;
        let l1 = id(&tree, "l1");
        assert_eq!(t.next(&tree, root, l1, Key::Right, Modifiers::NONE), Some(id(&tree, "r1")));
        assert_eq!(t.next(&tree, root, l1, Key::Down, Modifiers::NONE), Some(id(&tree, "l2")));
        // Nothing to the left: stay
        assert_eq!(t.next(&tree, root, l1, Key::Left, Modifiers::NONE), Some(l1));
        let left = id(&tree, "left");
        assert_eq!(t.next(&tree, root, left, Key::Right, Modifiers::NONE), Some(id(&tree, "right")));
    }

    #[test]
    fn test_rect_brackets_change_depth() {
        let mut tree = grid();
        let root = tree.root().unwrap();
        let t = RectTraversal;
        let (left, l2) = (id(&tree, "left"), id(&tree, "l2"));
        assert_eq!(t.next(&tree, root, l2, Key::BracketLeft, Modifiers::NONE), Some(left));
        // Parent of `left` is the view root: stay
        assert_eq!(t.next(&tree, root, left, Key::BracketLeft, Modifiers::NONE), Some(left));
        assert_eq!(t.next(&tree, root, left, Key::BracketRight, Modifiers::NONE), Some(id(&tree, "l1")));
        tree.set_last_visited_child(left, l2);
        assert_eq!(t.next(&tree, root, left, Key::Down, Modifiers::ALT), Some(l2));
        assert_eq!(t.next(&tree, root, l2, Key::BracketRight, Modifiers::NONE), Some(l2));
    }

    #[test]
    fn test_rect_scope_limits_candidates() {
        let tree = grid();
        let left = id(&tree, "left");
        let l1 = id(&tree, "l1");
        assert_eq!(RectTraversal::nearest_in_direction(&tree, left, l1, Direction::Right), None);
        assert_eq!(
            RectTraversal::nearest_in_direction(&tree, left, l1, Direction::Down),
            Some(id(&tree, "l2"))
        );
    }

    #[test]
    fn test_unhandled_keys_propagate() {
        let tree = grid();
        let root = tree.root().unwrap();
        let l1 = id(&tree, "l1");
        assert_eq!(RectTraversal.next(&tree, root, l1, Key::Tab, Modifiers::NONE), None);
        assert_eq!(RectTraversal.next(&tree, root, l1, Key::Space, Modifiers::NONE), None);
        assert_eq!(RectTraversal.next(&tree, root, l1, Key::Space, Modifiers::CTRL), Some(l1));
    }

    #[test]
    fn test_graph_remembers_last_visited() {
        let mut tree = grid();
        let root = tree.root().unwrap();
        let mut nav = NavigationGraph::new(RectTraversal);
        assert_eq!(nav.focus(), Focus::Unfocused);
        assert_eq!(nav.handle_key(&mut tree, root, Key::Tab, Modifiers::NONE), None);

        let entry = nav.handle_key(&mut tree, root, Key::Down, Modifiers::NONE);
        assert_eq!(entry, Some(id(&tree, "left")));
        nav.handle_key(&mut tree, root, Key::BracketRight, Modifiers::NONE);
        nav.handle_key(&mut tree, root, Key::Down, Modifiers::NONE);
        assert_eq!(nav.focused(), Some(id(&tree, "l2")));
        nav.handle_key(&mut tree, root, Key::BracketLeft, Modifiers::NONE);
        assert_eq!(nav.focused(), Some(id(&tree, "left")));
        // Descending again resumes at l2
        nav.handle_key(&mut tree, root, Key::BracketRight, Modifiers::NONE);
        assert_eq!(nav.focused(), Some(id(&tree, "l2")));
    }

    #[test]
    fn test_graph_remap_by_key() {
        let mut old = grid();
        let root = old.root().unwrap();
        let mut nav = NavigationGraph::new(RectTraversal);
        let r2 = id(&old, "r2");
        nav.set_focus(&mut old, root, r2);

        let new = Tree::from_records(&[NodeRecord::leaf("r2", 1.0)], TreeKind::Rect);
        nav.remap(&old, &new);
        assert_eq!(nav.focused(), new.root());
        let empty = Tree::new(TreeKind::Rect);
        nav.remap(&new, &empty);
        assert_eq!(nav.focus(), Focus::Unfocused);
    }

    fn ring() -> Tree {
        let records = [NodeRecord::group(
            "root",
            vec![
                NodeRecord::group("a", vec![NodeRecord::leaf("a1", 1.0), NodeRecord::leaf("a2", 2.0)]),
                NodeRecord::leaf("b", 3.0),
                NodeRecord::leaf("c", 2.0),
            ],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Polar);
        let root = tree.root().unwrap();
        // From 3 o'clock: a spans [0, 0.75π) below the centre, b [0.75π, 1.5π), c the rest
        PolarLayout::new(&SunburstOptions::default())
            .layout(&mut tree, root, 90.0, 0.0, TAU)
            .unwrap();
        tree
    }

    #[test]
    fn test_upper_half() {
        assert!(PolarTraversal::in_upper_half(0.0));
        assert!(PolarTraversal::in_upper_half(1.5 * std::f64::consts::PI));
        assert!(!PolarTraversal::in_upper_half(0.5 * std::f64::consts::PI));
    }

    #[test]
    fn test_polar_vertical_depends_on_half() {
        let tree = ring();
        let root = tree.root().unwrap();
        let t = PolarTraversal;
        let a = id(&tree, "a");
        // a's midpoint is below the centre: Down goes outward, Up goes inward
        assert_eq!(t.next(&tree, root, a, Key::Down, Modifiers::NONE), Some(id(&tree, "a2")));
        assert_eq!(t.next(&tree, root, a, Key::Up, Modifiers::NONE), Some(root));
        // From the hub either way goes outward, to the child nearest its midpoint
        let b = id(&tree, "b");
        assert_eq!(t.next(&tree, root, root, Key::Up, Modifiers::NONE), Some(b));
        assert_eq!(t.next(&tree, root, root, Key::Down, Modifiers::NONE), Some(b));
        assert_eq!(t.next(&tree, root, root, Key::BracketLeft, Modifiers::NONE), Some(root));
    }

    #[test]
    fn test_polar_siblings_wrap() {
        let tree = ring();
        let root = tree.root().unwrap();
        let t = PolarTraversal;
        let (a, b, c) = (id(&tree, "a"), id(&tree, "b"), id(&tree, "c"));
        assert_eq!(t.next(&tree, root, a, Key::Right, Modifiers::NONE), Some(b));
        assert_eq!(t.next(&tree, root, c, Key::Right, Modifiers::NONE), Some(a));
        assert_eq!(t.next(&tree, root, a, Key::Left, Modifiers::NONE), Some(c));
        assert_eq!(t.next(&tree, root, root, Key::Left, Modifiers::NONE), Some(root));
    }

    #[test]
    fn test_polar_outward_prefers_closest_angle() {
        let tree = ring();
        let a = id(&tree, "a");
        // a's midpoint is 0.375π; a1 sits at 0.125π, a2 at 0.5π
        assert_eq!(PolarTraversal::outward(&tree, a), id(&tree, "a2"));
        let mut tree = tree;
        let a1 = id(&tree, "a1");
        tree.set_last_visited_child(a, a1);
        assert_eq!(PolarTraversal::outward(&tree, a), a1);
    }

    #[test]
    fn test_breadcrumbs_cycle() {
        let tree = grid();
        let root = tree.root().unwrap();
        assert!(Breadcrumbs::new(&tree, root).crumbs().is_empty());

        let l1 = id(&tree, "l1");
        let mut crumbs = Breadcrumbs::new(&tree, l1);
        assert_eq!(crumbs.crumbs(), [root, id(&tree, "left"), l1]);
        assert_eq!(crumbs.handle_tab(Modifiers::NONE), CrumbFocus::Crumb(root));
        assert_eq!(crumbs.handle_tab(Modifiers::NONE), CrumbFocus::Crumb(id(&tree, "left")));
        assert_eq!(crumbs.handle_tab(Modifiers::SHIFT), CrumbFocus::Crumb(root));
        assert_eq!(crumbs.handle_tab(Modifiers::SHIFT), CrumbFocus::Outside);
        assert_eq!(crumbs.focused(), None);
        assert_eq!(crumbs.handle_tab(Modifiers::SHIFT), CrumbFocus::Crumb(l1));
        assert_eq!(crumbs.handle_tab(Modifiers::NONE), CrumbFocus::Tree);
    }
}
