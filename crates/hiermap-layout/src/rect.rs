//! Rectangle partitioning for treemaps.
//!
//! A layout pass walks the tree top-down. Each visited node gets snapped
//! bounds, a paint-order z-index and (for groups) an optional header band via
//! [`RectLayout::set_node_bounds`]; the remaining content area is split among
//! its children by a [`Partition`] strategy:
//!
//! - [`Squarified`] reorders children and packs them in rows that keep the
//!   worst aspect ratio as close to 1 as possible.
//! - [`SliceAndDice`] keeps input order and alternates the split axis per
//!   depth.

use hiermap_core::{
    NodeId, NodeKind, Rect, Result, Sorting, Tree, TreemapLayoutMode, TreemapOptions,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Split axis for slice-and-dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Children are placed left to right
    Horizontal,
    /// Children are placed top to bottom
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Axis used at `depth` when the first level uses `self`.
    #[must_use]
    pub const fn at_depth(self, depth: usize) -> Self {
        if depth % 2 == 0 {
            self
        } else {
            self.flip()
        }
    }
}

/// Strategy that splits a content area among children.
///
/// `children` holds only children with a positive effective size, in input
/// order. Implementations return one rectangle per child they place; the
/// rectangles must tile `area` without overlap.
pub trait Partition {
    /// Allocate sub-rectangles of `area` to `children` of a node at `depth`.
    fn partition(&self, tree: &Tree, children: &[NodeId], area: Rect, depth: usize)
        -> Vec<(NodeId, Rect)>;
}

// =============================================================================
// Squarified
// =============================================================================

/// Squarified treemap packing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Squarified;

impl Squarified {
    /// Worst aspect ratio of a row of `areas` laid along a side of length `side`.
    ///
    /// `max(side² · max / total², total² / (side² · min))`. Degenerate rows
    /// report infinity.
    #[must_use]
    pub fn worst_ratio(areas: &[f64], side: f64) -> f64 {
        let total: f64 = areas.iter().sum();
        if total <= 0.0 || side <= 0.0 {
            return f64::INFINITY;
        }
        let max = areas.iter().copied().fold(f64::MIN, f64::max);
        let min = areas.iter().copied().fold(f64::MAX, f64::min);
        if min <= 0.0 {
            return f64::INFINITY;
        }
        let side_sq = side * side;
        let total_sq = total * total;
        (side_sq * max / total_sq).max(total_sq / (side_sq * min))
    }

    /// Place a committed row inside `rect` and return the rectangle left over.
    ///
    /// The row runs along the shorter side. When `fill` is set the row takes
    /// all of the remaining extent, which absorbs accumulated rounding error in
    /// the final row.
    fn layout_row(
        row: &[(NodeId, f64)],
        rect: Rect,
        fill: bool,
        out: &mut Vec<(NodeId, Rect)>,
    ) -> Rect {
        let total: f64 = row.iter().map(|&(_, a)| a).sum();
        let along_width = rect.width <= rect.height;
        let side = if along_width { rect.width } else { rect.height };
        let depth_avail = if along_width { rect.height } else { rect.width };
        let thickness = if fill {
            depth_avail
        } else if side > 0.0 {
            (total / side).min(depth_avail)
        } else {
            0.0
        };

        let mut offset = 0.0;
        for (i, &(id, area)) in row.iter().enumerate() {
            let length = if i + 1 == row.len() {
                side - offset
            } else if total > 0.0 {
                side * area / total
            } else {
                0.0
            };
            let child = if along_width {
                Rect::new(rect.x + offset, rect.y, length.max(0.0), thickness)
            } else {
                Rect::new(rect.x, rect.y + offset, thickness, length.max(0.0))
            };
            out.push((id, child));
            offset += length;
        }

        if along_width {
            Rect::new(rect.x, rect.y + thickness, rect.width, rect.height - thickness)
        } else {
            Rect::new(rect.x + thickness, rect.y, rect.width - thickness, rect.height)
        }
    }
}

impl Partition for Squarified {
    fn partition(
        &self,
        tree: &Tree,
        children: &[NodeId],
        area: Rect,
        _depth: usize,
    ) -> Vec<(NodeId, Rect)> {
        let total_size: f64 = children.iter().map(|&c| tree[c].effective_size()).sum();
        if children.is_empty() || total_size <= 0.0 {
            return Vec::new();
        }
        let pixel_area = area.area().max(0.0);

        // Ascending; consumed from the end so the largest child is placed first.
        let mut pending: Vec<(NodeId, f64)> = children
            .iter()
            .map(|&c| (c, tree[c].effective_size() / total_size * pixel_area))
            .collect();
        pending.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let mut out = Vec::with_capacity(pending.len());
        let mut rect = area;
        let mut row: Vec<(NodeId, f64)> = Vec::new();
        let mut row_areas: Vec<f64> = Vec::new();
        let mut worst = f64::INFINITY;

        while let Some(&next) = pending.last() {
            row_areas.push(next.1);
            let candidate = Self::worst_ratio(&row_areas, rect.shorter_side());
            if row.is_empty() || candidate <= worst {
                pending.pop();
                row.push(next);
                worst = candidate;
            } else {
                row_areas.pop();
                rect = Self::layout_row(&row, rect, false, &mut out);
                trace!(items = row.len(), worst, "committed squarified row");
                row.clear();
                row_areas.clear();
                worst = f64::INFINITY;
            }
        }
        if !row.is_empty() {
            Self::layout_row(&row, rect, true, &mut out);
        }
        out
    }
}

// =============================================================================
// Slice and dice
// =============================================================================

/// Slice-and-dice partitioning with per-depth axis alternation.
#[derive(Debug, Clone, Copy)]
pub struct SliceAndDice {
    /// Axis used by the layout root's children
    pub first_axis: Axis,
    /// Sort siblings descending by size
    pub sorting: Sorting,
    /// Mirror horizontal allocation
    pub rtl: bool,
}

impl SliceAndDice {
    /// Create a slice-and-dice strategy starting on `first_axis`.
    #[must_use]
    pub const fn new(first_axis: Axis) -> Self {
        Self {
            first_axis,
            sorting: Sorting::Off,
            rtl: false,
        }
    }
}

impl Partition for SliceAndDice {
    fn partition(
        &self,
        tree: &Tree,
        children: &[NodeId],
        area: Rect,
        depth: usize,
    ) -> Vec<(NodeId, Rect)> {
        let total: f64 = children.iter().map(|&c| tree[c].effective_size()).sum();
        if children.is_empty() || total <= 0.0 {
            return Vec::new();
        }

        let mut order: Vec<NodeId> = children.to_vec();
        if self.sorting.is_on() {
            order.sort_by(|&a, &b| {
                tree[b]
                    .effective_size()
                    .partial_cmp(&tree[a].effective_size())
                    .unwrap_or(Ordering::Equal)
            });
        }
        let axis = self.first_axis.at_depth(depth);
        if axis == Axis::Horizontal && self.rtl {
            order.reverse();
        }

        let extent = match axis {
            Axis::Horizontal => area.width,
            Axis::Vertical => area.height,
        };
        let mut out = Vec::with_capacity(order.len());
        let mut offset = 0.0;
        for (i, &id) in order.iter().enumerate() {
            let length = if i + 1 == order.len() {
                extent - offset
            } else {
                extent * tree[id].effective_size() / total
            };
            let rect = match axis {
                Axis::Horizontal => Rect::new(area.x + offset, area.y, length, area.height),
                Axis::Vertical => Rect::new(area.x, area.y + offset, area.width, length),
            };
            out.push((id, rect));
            offset += length;
        }
        out
    }
}

// =============================================================================
// Layout pass
// =============================================================================

/// Outcome of a treemap layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSummary {
    /// Node the pass started from
    pub root: NodeId,
    /// Whether the renderer should draw the root itself
    pub root_rendered: bool,
    /// Nodes that received bounds
    pub laid_out: usize,
    /// One past the highest z-index assigned
    pub next_z: u32,
}

/// Treemap layout driver.
#[derive(Debug, Clone)]
pub struct RectLayout {
    options: TreemapOptions,
}

struct Pass {
    next_z: u32,
    laid_out: usize,
}

impl RectLayout {
    /// Create a layout driver for the given options.
    #[must_use]
    pub fn new(options: &TreemapOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &TreemapOptions {
        &self.options
    }

    /// Lay out the subtree under `root` inside `bounds`.
    ///
    /// Every node's previous layout is cleared first, so nodes outside the
    /// subtree end up without layout. When `show_root` is false and the root
    /// has children, the root keeps the full bounds (for hit-testing) but takes
    /// no gap or header, and all of its space flows to the children.
    pub fn layout(
        &self,
        tree: &mut Tree,
        root: NodeId,
        bounds: Rect,
        show_root: bool,
    ) -> Result<LayoutSummary> {
        tree.check_depth(root, self.options.max_depth)?;
        tree.clear_layout();

        let mut pass = Pass {
            next_z: 0,
            laid_out: 0,
        };
        let root_rendered = show_root || tree[root].is_leaf();

        match self.options.layout {
            TreemapLayoutMode::Squarified => {
                self.layout_node(tree, &Squarified, &mut pass, root, bounds, 0, root_rendered);
            }
            TreemapLayoutMode::SliceAndDiceHorizontal | TreemapLayoutMode::SliceAndDiceVertical => {
                let first_axis = if self.options.layout == TreemapLayoutMode::SliceAndDiceHorizontal {
                    Axis::Horizontal
                } else {
                    Axis::Vertical
                };
                let strategy = SliceAndDice {
                    first_axis,
                    sorting: self.options.sorting,
                    rtl: self.options.rtl,
                };
                self.layout_node(tree, &strategy, &mut pass, root, bounds, 0, root_rendered);
            }
        }

        debug!(
            laid_out = pass.laid_out,
            nodes = tree.len(),
            mode = ?self.options.layout,
            "treemap layout pass complete"
        );
        Ok(LayoutSummary {
            root,
            root_rendered,
            laid_out: pass.laid_out,
            next_z: pass.next_z,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_node<P: Partition>(
        &self,
        tree: &mut Tree,
        strategy: &P,
        pass: &mut Pass,
        id: NodeId,
        rect: Rect,
        depth: usize,
        rendered: bool,
    ) {
        let Some(content) = self.set_node_bounds(tree, pass, id, rect, depth, rendered) else {
            trace!(node = %tree[id].id, "no space; node left without layout");
            return;
        };
        if !tree[id].disclosed || tree[id].is_leaf() {
            return;
        }

        let children: Vec<NodeId> = tree
            .children(id)
            .iter()
            .copied()
            .filter(|&c| tree[c].effective_size() > 0.0)
            .collect();
        let mut placed = strategy.partition(tree, &children, content, depth);
        // z-order follows sibling order whatever order the strategy placed in
        let rank: HashMap<NodeId, usize> = children.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        placed.sort_by_key(|(child, _)| rank.get(child).copied());
        for (child, child_rect) in placed {
            self.layout_node(tree, strategy, pass, child, child_rect, depth + 1, true);
        }
    }

    /// Record a node's bounds and return the area available to its children.
    ///
    /// Bounds are inset by the group gap for `depth`, snapped to whole
    /// pixels, and given the next z-index. A group with a header loses a band
    /// of `header_height` at the top. Returns `None` (and leaves the node
    /// without layout) when the snapped bounds have no area.
    pub fn set_node_bounds(
        &self,
        tree: &mut Tree,
        pass_z: &mut impl ZCounter,
        id: NodeId,
        rect: Rect,
        depth: usize,
        rendered: bool,
    ) -> Option<Rect> {
        let node = &tree[id];
        let is_group = node.disclosed && !node.is_leaf();
        let gap = if rendered {
            self.options.gap_for(depth, is_group)
        } else {
            0.0
        };
        let wants_header = match &node.kind {
            NodeKind::Rect(g) => g.header.unwrap_or(self.options.group_headers),
            NodeKind::Polar(_) => false,
        };

        let bounds = rect.inset(gap / 2.0).snapped();
        if !bounds.has_area() || !bounds.width.is_finite() || !bounds.height.is_finite() {
            return None;
        }

        let header_height = self.options.header_height;
        let header = (rendered && is_group && wants_header && bounds.height > header_height)
            .then(|| Rect::new(bounds.x, bounds.y, bounds.width, header_height));
        let content = header.map_or(bounds, |h| {
            Rect::new(bounds.x, h.bottom(), bounds.width, bounds.height - h.height)
        });

        let node = &mut tree[id];
        node.z_index = pass_z.next_z();
        if let NodeKind::Rect(g) = &mut node.kind {
            g.bounds = Some(bounds);
            g.header_band = header;
        }
        Some(content)
    }
}

/// Source of strictly increasing z-indices for a layout pass.
pub trait ZCounter {
    /// Take the next z-index.
    fn next_z(&mut self) -> u32;
}

impl ZCounter for Pass {
    fn next_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        self.laid_out += 1;
        z
    }
}

impl ZCounter for u32 {
    fn next_z(&mut self) -> u32 {
        let z = *self;
        *self += 1;
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiermap_core::{GroupGaps, NodeRecord, TreeKind};

    fn opts(layout: TreemapLayoutMode) -> TreemapOptions {
        TreemapOptions {
            layout,
            group_gaps: GroupGaps::None,
            group_headers: false,
            ..TreemapOptions::default()
        }
    }

    fn flat(sizes: &[f64]) -> Tree {
        let children = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| NodeRecord::leaf(&format!("c{i}"), s))
            .collect();
        Tree::from_records(&[NodeRecord::group("root", children)], TreeKind::Rect)
    }

    fn rect_of(tree: &Tree, key: &str) -> Rect {
        tree[tree.find_by_key(key).unwrap()].rect().unwrap()
    }

    #[test]
    fn test_axis_alternates() {
        assert_eq!(Axis::Horizontal.at_depth(0), Axis::Horizontal);
        assert_eq!(Axis::Horizontal.at_depth(1), Axis::Vertical);
        assert_eq!(Axis::Vertical.at_depth(2), Axis::Vertical);
    }

    #[test]
    fn test_worst_ratio() {
        // One square of area 100 along a side of 10
        assert!((Squarified::worst_ratio(&[100.0], 10.0) - 1.0).abs() < 1e-12);
        // Two of 50 along 10: each 5x10
        assert!((Squarified::worst_ratio(&[50.0, 50.0], 10.0) - 2.0).abs() < 1e-12);
        assert!(Squarified::worst_ratio(&[], 10.0).is_infinite());
        assert!(Squarified::worst_ratio(&[1.0], 0.0).is_infinite());
        assert!(Squarified::worst_ratio(&[0.0, 1.0], 3.0).is_infinite());
    }

    #[test]
    fn test_squarified_three_equal() {
        let mut tree = flat(&[1.0, 1.0, 1.0]);
        let root = tree.root().unwrap();
        let layout = RectLayout::new(&opts(TreemapLayoutMode::Squarified));
        let summary = layout
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 300.0, 300.0), false)
            .unwrap();
        assert_eq!(summary.laid_out, 4);
        assert!(!summary.root_rendered);

        let mut total = 0.0;
        for key in ["c0", "c1", "c2"] {
            let r = rect_of(&tree, key);
            assert!((r.area() - 30000.0).abs() <= 600.0, "{key}: {r:?}");
            assert!(r.aspect_ratio() <= 3.0 + 1e-9, "{key}: {r:?}");
            total += r.area();
        }
        assert_eq!(total, 90000.0);
    }

    #[test]
    fn test_squarified_single_child_fills() {
        let mut tree = flat(&[5.0]);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::Squarified))
            .layout(&mut tree, root, Rect::new(10.0, 20.0, 80.0, 40.0), false)
            .unwrap();
        assert_eq!(rect_of(&tree, "c0"), Rect::new(10.0, 20.0, 80.0, 40.0));
    }

    #[test]
    fn test_squarified_zero_area_does_not_panic() {
        let mut tree = flat(&[1.0, 2.0, 3.0]);
        let root = tree.root().unwrap();
        let summary = RectLayout::new(&opts(TreemapLayoutMode::Squarified))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 0.0, 100.0), false)
            .unwrap();
        assert_eq!(summary.laid_out, 0);
        assert!(!tree[root].has_layout());
    }

    #[test]
    fn test_squarified_partition_degenerate_row_committed() {
        let tree = flat(&[1.0, 2.0]);
        let root = tree.root().unwrap();
        let kids = tree.children(root).to_vec();
        let placed = Squarified.partition(&tree, &kids, Rect::new(0.0, 0.0, 0.0, 0.0), 0);
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|(_, r)| r.area() == 0.0));
    }

    #[test]
    fn test_slice_and_dice_horizontal_scenario() {
        let mut tree = flat(&[1.0, 1.0, 2.0]);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::SliceAndDiceHorizontal))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 50.0), false)
            .unwrap();
        assert_eq!(rect_of(&tree, "c0"), Rect::new(0.0, 0.0, 25.0, 50.0));
        assert_eq!(rect_of(&tree, "c1"), Rect::new(25.0, 0.0, 25.0, 50.0));
        assert_eq!(rect_of(&tree, "c2"), Rect::new(50.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_slice_and_dice_rtl_mirrors() {
        let mut tree = flat(&[1.0, 1.0, 2.0]);
        let root = tree.root().unwrap();
        let options = TreemapOptions {
            rtl: true,
            ..opts(TreemapLayoutMode::SliceAndDiceHorizontal)
        };
        RectLayout::new(&options)
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 50.0), false)
            .unwrap();
        assert_eq!(rect_of(&tree, "c2").x, 0.0);
        assert_eq!(rect_of(&tree, "c1").x, 50.0);
        assert_eq!(rect_of(&tree, "c0").x, 75.0);
    }

    #[test]
    fn test_slice_and_dice_sorting_descending() {
        let mut tree = flat(&[1.0, 3.0, 2.0]);
        let root = tree.root().unwrap();
        let options = TreemapOptions {
            sorting: Sorting::On,
            ..opts(TreemapLayoutMode::SliceAndDiceVertical)
        };
        RectLayout::new(&options)
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 60.0, 60.0), false)
            .unwrap();
        assert_eq!(rect_of(&tree, "c1"), Rect::new(0.0, 0.0, 60.0, 30.0));
        assert_eq!(rect_of(&tree, "c2"), Rect::new(0.0, 30.0, 60.0, 20.0));
        assert_eq!(rect_of(&tree, "c0"), Rect::new(0.0, 50.0, 60.0, 10.0));
    }

    #[test]
    fn test_slice_and_dice_alternates_per_depth() {
        let records = [NodeRecord::group(
            "root",
            vec![
                NodeRecord::group(
                    "left",
                    vec![NodeRecord::leaf("l1", 1.0), NodeRecord::leaf("l2", 1.0)],
                ),
                NodeRecord::leaf("right", 2.0),
            ],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Rect);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::SliceAndDiceHorizontal))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 100.0), false)
            .unwrap();
        assert_eq!(rect_of(&tree, "left"), Rect::new(0.0, 0.0, 50.0, 100.0));
        assert_eq!(rect_of(&tree, "l1"), Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(rect_of(&tree, "l2"), Rect::new(0.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_zero_and_negative_sizes_skipped() {
        let mut tree = flat(&[0.0, 4.0, -2.0]);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::SliceAndDiceHorizontal))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 40.0, 10.0), false)
            .unwrap();
        let c0 = tree.find_by_key("c0").unwrap();
        let c2 = tree.find_by_key("c2").unwrap();
        assert!(!tree[c0].has_layout());
        assert!(!tree[c2].has_layout());
        assert_eq!(rect_of(&tree, "c1"), Rect::new(0.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn test_z_index_preorder_strictly_increasing() {
        let records = [NodeRecord::group(
            "root",
            vec![
                NodeRecord::group(
                    "a",
                    vec![NodeRecord::leaf("a1", 1.0), NodeRecord::leaf("a2", 1.0)],
                ),
                NodeRecord::leaf("b", 2.0),
            ],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Rect);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::SliceAndDiceHorizontal))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 100.0), false)
            .unwrap();
        let z = |k: &str| tree[tree.find_by_key(k).unwrap()].z_index;
        assert!(z("root") < z("a"));
        assert!(z("a") < z("a1"));
        assert!(z("a1") < z("a2"));
        assert!(z("a2") < z("b"));
    }

    #[test]
    fn test_squarified_z_index_follows_sibling_order() {
        let records = [NodeRecord::group(
            "root",
            vec![
                NodeRecord::group(
                    "small",
                    vec![NodeRecord::leaf("s1", 1.0), NodeRecord::leaf("s2", 1.0)],
                ),
                NodeRecord::leaf("large", 6.0),
                NodeRecord::leaf("medium", 3.0),
            ],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Rect);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::Squarified))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 120.0, 80.0), false)
            .unwrap();
        let z = |k: &str| tree[tree.find_by_key(k).unwrap()].z_index;
        assert!(z("root") < z("small"));
        assert!(z("small") < z("s1"));
        assert!(z("s1") < z("s2"));
        assert!(z("s2") < z("large"));
        assert!(z("large") < z("medium"));
    }

    #[test]
    fn test_group_gap_and_header() {
        let records = [NodeRecord::group(
            "root",
            vec![NodeRecord::group(
                "g",
                vec![NodeRecord::leaf("x", 1.0)],
            )],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Rect);
        let root = tree.root().unwrap();
        let options = TreemapOptions {
            layout: TreemapLayoutMode::SliceAndDiceHorizontal,
            group_gaps: GroupGaps::Outer,
            gap_size: 4.0,
            group_headers: true,
            header_height: 10.0,
            ..TreemapOptions::default()
        };
        RectLayout::new(&options)
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 100.0), false)
            .unwrap();
        // Hidden root: no gap, no header
        assert_eq!(rect_of(&tree, "root"), Rect::new(0.0, 0.0, 100.0, 100.0));
        let g = tree.find_by_key("g").unwrap();
        assert_eq!(rect_of(&tree, "g"), Rect::new(2.0, 2.0, 96.0, 96.0));
        let NodeKind::Rect(geom) = &tree[g].kind else {
            panic!("treemap node expected");
        };
        assert_eq!(geom.header_band, Some(Rect::new(2.0, 2.0, 96.0, 10.0)));
        assert_eq!(rect_of(&tree, "x"), Rect::new(2.0, 12.0, 96.0, 86.0));
    }

    #[test]
    fn test_shown_root_leaf() {
        let mut tree = Tree::from_records(&[NodeRecord::leaf("solo", 1.0)], TreeKind::Rect);
        let root = tree.root().unwrap();
        let summary = RectLayout::new(&opts(TreemapLayoutMode::Squarified))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), false)
            .unwrap();
        assert!(summary.root_rendered);
        assert_eq!(summary.laid_out, 1);
    }

    #[test]
    fn test_collapsed_node_not_recursed() {
        let records = [NodeRecord::group(
            "root",
            vec![NodeRecord::group("g", vec![NodeRecord::leaf("x", 1.0)]).with_disclosed(false)],
        )];
        let mut tree = Tree::from_records(&records, TreeKind::Rect);
        let root = tree.root().unwrap();
        RectLayout::new(&opts(TreemapLayoutMode::Squarified))
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), false)
            .unwrap();
        assert!(tree[tree.find_by_key("g").unwrap()].has_layout());
        assert!(!tree[tree.find_by_key("x").unwrap()].has_layout());
    }

    #[test]
    fn test_depth_limit_reported() {
        let mut tree = flat(&[1.0]);
        let root = tree.root().unwrap();
        let options = TreemapOptions {
            max_depth: 1,
            ..opts(TreemapLayoutMode::Squarified)
        };
        assert!(RectLayout::new(&options)
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), false)
            .is_ok());
        let options = TreemapOptions {
            max_depth: 0,
            ..opts(TreemapLayoutMode::Squarified)
        };
        assert!(RectLayout::new(&options)
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), false)
            .is_err());
    }
}
