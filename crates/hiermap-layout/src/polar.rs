//! Radial partitioning for sunbursts.
//!
//! Every node occupies an annular wedge. A node's ring thickness is its unit
//! radius times a scale chosen so that the deepest visible branch exactly
//! reaches the available radius; its angular extent is its share of the
//! parent's extent.

use hiermap_core::{NodeId, NodeKind, PolarBounds, Result, Sorting, SunburstOptions, Tree};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Outcome of a sunburst layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarSummary {
    /// Node the pass started from
    pub root: NodeId,
    /// Sum of unit radii along the deepest visible branch
    pub longest_branch: f64,
    /// Pixels per unit of radius
    pub radius_per_unit: f64,
    /// Nodes that received bounds
    pub laid_out: usize,
}

/// Sunburst layout driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarLayout {
    /// Sort siblings descending by size
    pub sorting: Sorting,
    /// Reverse sibling order
    pub rtl: bool,
    /// Unit radius used for the layout root in place of its own
    pub root_radius: f64,
    /// Recursion limit
    pub max_depth: usize,
}

impl Default for PolarLayout {
    fn default() -> Self {
        Self::new(&SunburstOptions::default())
    }
}

impl PolarLayout {
    /// Create a layout driver for the given options.
    #[must_use]
    pub fn new(options: &SunburstOptions) -> Self {
        Self {
            sorting: options.sorting,
            rtl: options.rtl,
            root_radius: options.root_node_radius.max(0.0),
            max_depth: options.max_depth,
        }
    }

    /// Lay out the subtree under `root` as a disc of radius `total_radius`.
    ///
    /// Angles are radians in screen space. Every node's previous layout is
    /// cleared first. Collapsed nodes get a wedge but their children do not.
    pub fn layout(
        &self,
        tree: &mut Tree,
        root: NodeId,
        total_radius: f64,
        start_angle: f64,
        angle_extent: f64,
    ) -> Result<PolarSummary> {
        tree.check_depth(root, self.max_depth)?;
        tree.clear_layout();

        let longest_branch = self.longest_branch(tree, root);
        let radius_per_unit = if longest_branch > 0.0 && total_radius > 0.0 {
            total_radius / longest_branch
        } else {
            0.0
        };

        let mut laid_out = 0;
        if radius_per_unit > 0.0 && angle_extent > 0.0 {
            let mut pass = Placement {
                radius_per_unit,
                z: 0,
            };
            self.place(tree, &mut pass, root, 0.0, start_angle, angle_extent, true);
            laid_out = pass.z as usize;
        }

        debug!(
            laid_out,
            longest_branch, radius_per_unit, "sunburst layout pass complete"
        );
        Ok(PolarSummary {
            root,
            longest_branch,
            radius_per_unit,
            laid_out,
        })
    }

    /// Sum of unit radii along the deepest path from `root` that layout will
    /// visit. Collapsed nodes and zero-size children end their branch.
    #[must_use]
    pub fn longest_branch(&self, tree: &Tree, root: NodeId) -> f64 {
        let mut longest: f64 = 0.0;
        let mut stack = vec![(root, self.unit_radius(tree, root, true))];
        while let Some((id, reach)) = stack.pop() {
            longest = longest.max(reach);
            if !tree[id].disclosed {
                continue;
            }
            for &child in tree.children(id) {
                if tree[child].effective_size() > 0.0 {
                    stack.push((child, reach + self.unit_radius(tree, child, false)));
                }
            }
        }
        longest
    }

    fn unit_radius(&self, tree: &Tree, id: NodeId, is_root: bool) -> f64 {
        if is_root {
            return self.root_radius;
        }
        match &tree[id].kind {
            NodeKind::Polar(g) => g.unit_radius,
            NodeKind::Rect(_) => 1.0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn place(
        &self,
        tree: &mut Tree,
        pass: &mut Placement,
        id: NodeId,
        inner: f64,
        start: f64,
        extent: f64,
        is_root: bool,
    ) {
        let outer = inner + self.unit_radius(tree, id, is_root) * pass.radius_per_unit;
        let node = &mut tree[id];
        node.z_index = pass.z;
        pass.z += 1;
        if let NodeKind::Polar(g) = &mut node.kind {
            g.bounds = Some(PolarBounds::new(inner, outer, start, extent));
        }
        trace!(node = %node.id, inner, outer, start, extent, "placed wedge");

        if !node.disclosed || node.is_leaf() {
            return;
        }
        let total = tree.child_size_total(id);
        if total <= 0.0 {
            return;
        }

        let mut order: Vec<NodeId> = tree
            .children(id)
            .iter()
            .copied()
            .filter(|&c| tree[c].effective_size() > 0.0)
            .collect();
        if self.sorting.is_on() {
            order.sort_by(|&a, &b| {
                tree[b]
                    .effective_size()
                    .partial_cmp(&tree[a].effective_size())
                    .unwrap_or(Ordering::Equal)
            });
        }
        if self.rtl {
            order.reverse();
        }

        let mut angle = start;
        for (i, &child) in order.iter().enumerate() {
            let child_extent = if i + 1 == order.len() {
                start + extent - angle
            } else {
                extent * tree[child].effective_size() / total
            };
            self.place(tree, pass, child, outer, angle, child_extent, false);
            angle += child_extent;
        }
    }
}

struct Placement {
    radius_per_unit: f64,
    z: u32,
}
