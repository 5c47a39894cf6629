//! Diffing of laid-out trees into animation plans.
//!
//! Trees are rebuilt on every render, so nodes are matched by identity key.
//! Only nodes with layout take part: a node that gains layout fades in, one
//! that loses it fades out, and one that keeps it interpolates.

use crate::animation::{AnimationMode, AnimationPlan, FanIn, ParamVector, PlanBuilder};
use hiermap_core::{AnimationOptions, NodeId, Tree};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Produces animation plans for drill, data-change, isolate and display
/// transitions.
#[derive(Debug, Clone, Default)]
pub struct AnimationInterpolator {
    options: AnimationOptions,
}

impl AnimationInterpolator {
    /// Interpolator using the given timing.
    #[must_use]
    pub const fn new(options: AnimationOptions) -> Self {
        Self { options }
    }

    /// Timing in effect.
    #[must_use]
    pub const fn options(&self) -> &AnimationOptions {
        &self.options
    }

    fn builder(&self) -> PlanBuilder {
        PlanBuilder::new(self.options.duration(), self.options.easing)
    }

    /// Decide whether moving from `old_root` to `new_root` is a drill.
    ///
    /// A drill changes the root to an ancestor or descendant of the old root;
    /// anything else, including an unchanged root, is a data change.
    #[must_use]
    pub fn classify(old: &Tree, old_root: NodeId, new: &Tree, new_root: NodeId) -> AnimationMode {
        let (Some(old_key), Some(new_key)) = (old[old_root].key(), new[new_root].key()) else {
            return AnimationMode::DataChange;
        };
        if old_key == new_key {
            return AnimationMode::DataChange;
        }
        let related = |tree: &Tree, a: NodeId, b: NodeId| {
            tree.is_descendant_of(a, b) || tree.is_descendant_of(b, a)
        };
        if new.find_by_key(old_key).is_some_and(|o| related(new, o, new_root))
            || old.find_by_key(new_key).is_some_and(|n| related(old, n, old_root))
        {
            AnimationMode::Drill
        } else {
            AnimationMode::DataChange
        }
    }

    /// Plan the transition between two renders, classifying it first.
    #[must_use]
    pub fn plan_change(&self, old: &Tree, old_root: NodeId, new: &Tree, new_root: NodeId) -> AnimationPlan {
        match Self::classify(old, old_root, new, new_root) {
            AnimationMode::Drill => self.drill(old, old_root, new, new_root),
            _ => self.data_change(old, old_root, new, new_root),
        }
    }

    /// Plan a drill by matching the flattened old and new subtrees.
    ///
    /// Ancestors of the old root that appear in the new subtree are revealed
    /// immediately rather than faded in.
    #[must_use]
    pub fn drill(&self, old: &Tree, old_root: NodeId, new: &Tree, new_root: NodeId) -> AnimationPlan {
        let mut builder = self.builder();
        let old_nodes = old.flatten(old_root);
        let new_nodes = new.flatten(new_root);

        let new_by_key: HashMap<&str, NodeId> = new_nodes
            .iter()
            .filter_map(|&n| new[n].key().map(|k| (k, n)))
            .collect();
        let old_keys: HashSet<&str> = old_nodes.iter().filter_map(|&o| old[o].key()).collect();
        let revealed: HashSet<NodeId> = old[old_root]
            .key()
            .and_then(|k| new.find_by_key(k))
            .map(|o| new.ancestors(o).collect::<HashSet<_>>())
            .unwrap_or_default();

        let mut deleted = HashSet::new();
        for &o in &old_nodes {
            let key = old[o].key();
            let from = ParamVector::from_node(&old[o]);
            match key.and_then(|k| new_by_key.get(k)) {
                Some(&n) => match (from, ParamVector::from_node(&new[n])) {
                    (Some(from), Some(to)) => builder.update(n, key, from, to),
                    (None, Some(to)) => builder.insert(n, key, to),
                    (Some(from), None) => record_delete(&mut builder, &mut deleted, old, o, from),
                    (None, None) => {}
                },
                None => {
                    if let Some(from) = from {
                        record_delete(&mut builder, &mut deleted, old, o, from);
                    }
                }
            }
        }

        for &n in &new_nodes {
            let key = new[n].key();
            if key.is_some_and(|k| old_keys.contains(k)) {
                continue;
            }
            if revealed.contains(&n) {
                builder.reveal(n);
            } else if let Some(to) = ParamVector::from_node(&new[n]) {
                builder.insert(n, key, to);
            }
        }

        let plan = builder.build(AnimationMode::Drill);
        debug!(steps = plan.len(), revealed = plan.revealed().len(), "planned drill animation");
        plan
    }

    /// Plan a data change by matching children by key, level by level.
    ///
    /// The two roots are always paired. Every matched pair is visited, even
    /// when its values are unchanged, so diffing a tree against itself yields
    /// one no-op update per laid-out node.
    #[must_use]
    pub fn data_change(&self, old: &Tree, old_root: NodeId, new: &Tree, new_root: NodeId) -> AnimationPlan {
        let mut builder = self.builder();
        let mut deleted = HashSet::new();
        let mut pending = vec![(old_root, new_root)];

        while let Some((o, n)) = pending.pop() {
            let (before, after) = (&old[o], &new[n]);
            let key = after.key();
            match (ParamVector::from_node(before), ParamVector::from_node(after)) {
                (Some(from), Some(to)) => {
                    let to = if before.disclosed != after.disclosed || before.selected != after.selected {
                        to.forced()
                    } else {
                        to
                    };
                    builder.update(n, key, from, to);
                }
                (None, Some(to)) => builder.insert(n, key, to),
                (Some(from), None) => record_delete(&mut builder, &mut deleted, old, o, from),
                (None, None) => {}
            }

            let old_children: HashMap<&str, NodeId> = old
                .children(o)
                .iter()
                .rev()
                .filter_map(|&c| old[c].key().map(|k| (k, c)))
                .collect();
            let mut matched = HashSet::new();
            for &nc in new.children(n) {
                match new[nc].key().and_then(|k| old_children.get(k)) {
                    Some(&oc) if matched.insert(oc) => pending.push((oc, nc)),
                    _ => insert_subtree(&mut builder, new, nc),
                }
            }
            for &oc in old.children(o) {
                if !matched.contains(&oc) {
                    delete_subtree(&mut builder, &mut deleted, old, oc);
                }
            }
        }

        let plan = builder.build(AnimationMode::DataChange);
        debug!(steps = plan.len(), overlay = plan.overlay().len(), "planned data-change animation");
        plan
    }

    /// Plan an isolate or restore within one tree.
    ///
    /// `before` is a snapshot of the tree taken ahead of the relayout. Nodes
    /// under `scope` that had layout move from their old bounds; the rest fade
    /// in. Steps use the shorter isolate duration.
    #[must_use]
    pub fn isolate(&self, before: &Tree, after: &Tree, scope: NodeId) -> AnimationPlan {
        let mut builder = PlanBuilder::new(self.options.isolate_duration(), self.options.easing);
        for n in after.flatten(scope) {
            let Some(to) = ParamVector::from_node(&after[n]) else {
                continue;
            };
            let key = after[n].key();
            match before.get(n).and_then(ParamVector::from_node) {
                Some(from) => builder.update(n, key, from, to),
                None => builder.insert(n, key, to),
            }
        }
        let plan = builder.build(AnimationMode::Isolate);
        debug!(steps = plan.len(), "planned isolate animation");
        plan
    }

    /// Plan the initial appearance: every laid-out node fades in.
    #[must_use]
    pub fn display(&self, tree: &Tree, root: NodeId) -> AnimationPlan {
        insert_all(self.builder(), tree, root).build(AnimationMode::Display)
    }

    /// Sweep used for the initial sunburst appearance.
    #[must_use]
    pub const fn fan_in(&self) -> FanIn {
        FanIn {
            duration: self.options.duration(),
            easing: self.options.easing,
        }
    }
}

fn insert_all(mut builder: PlanBuilder, tree: &Tree, root: NodeId) -> PlanBuilder {
    insert_subtree(&mut builder, tree, root);
    builder
}

fn insert_subtree(builder: &mut PlanBuilder, tree: &Tree, start: NodeId) {
    for n in tree.flatten(start) {
        if let Some(to) = ParamVector::from_node(&tree[n]) {
            builder.insert(n, tree[n].key(), to);
        }
    }
}

fn delete_subtree(builder: &mut PlanBuilder, deleted: &mut HashSet<NodeId>, tree: &Tree, start: NodeId) {
    for o in tree.flatten(start) {
        if let Some(from) = ParamVector::from_node(&tree[o]) {
            record_delete(builder, deleted, tree, o, from);
        }
    }
}

// Only the topmost deleted node of a subtree goes to the overlay.
fn record_delete(
    builder: &mut PlanBuilder,
    deleted: &mut HashSet<NodeId>,
    tree: &Tree,
    node: NodeId,
    from: ParamVector,
) {
    builder.delete(node, tree[node].key(), from);
    if !tree.parent(node).is_some_and(|p| deleted.contains(&p)) {
        trace!(node = ?tree[node].key(), "deleted subtree moved to overlay");
        builder.overlay(node);
    }
    deleted.insert(node);
}
