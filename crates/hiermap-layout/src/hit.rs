//! Point-to-node resolution against the last layout.

use hiermap_core::{NodeId, Point, Tree};

/// Resolves screen points to nodes.
///
/// Both searches start at a scope root (the layout root, or the innermost
/// isolated node) and descend into the first child whose geometry contains
/// the point. Nodes without layout are never returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitTester;

impl HitTester {
    /// Deepest treemap node under `point`, starting from `scope`.
    ///
    /// Points in a group's header band or gap resolve to the group.
    #[must_use]
    pub fn rect_node_at(tree: &Tree, scope: NodeId, point: Point) -> Option<NodeId> {
        let bounds = tree.get(scope)?.rect()?;
        if !bounds.contains_point(&point) {
            return None;
        }
        let mut current = scope;
        while let Some(next) = tree.children(current).iter().copied().find(|&c| {
            tree[c]
                .rect()
                .is_some_and(|r| r.contains_point(&point))
        }) {
            current = next;
        }
        Some(current)
    }

    /// Sunburst node whose wedge contains `point`, starting from `scope`.
    ///
    /// `center` is the sunburst centre in the same coordinates as `point`.
    #[must_use]
    pub fn polar_node_at(tree: &Tree, scope: NodeId, center: Point, point: Point) -> Option<NodeId> {
        let angle = point.angle_around(&center);
        let radius = point.distance(&center);
        let mut current = scope;
        loop {
            let wedge = tree.get(current)?.polar()?;
            if wedge.contains_point(&center, &point) {
                return Some(current);
            }
            if radius < wedge.outer_radius {
                return None;
            }
            // Rings grow outward: continue into the child spanning this angle.
            current = tree.children(current).iter().copied().find(|&c| {
                tree[c]
                    .polar()
                    .is_some_and(|w| w.has_area() && w.contains_angle(angle))
            })?;
        }
    }
}
