//! View controllers that tie a render pass together.
//!
//! A view owns the current tree, its options and interaction state. Each
//! `render` rebuilds the tree from records, carries selection and focus over
//! by identity key, lays out the active root and plans the transition from
//! the previous render.

mod sunburst;
mod treemap;

pub use sunburst::SunburstView;
pub use treemap::TreemapView;

use hiermap_core::{Error, NodeId, Result, SelectionMode, Tree};
use tracing::warn;

/// Select nodes of `new` whose key was selected in `old`, under `mode`.
///
/// Carried keys go through [`select`]: single mode keeps only the last one
/// and unselectable nodes stay unselected.
pub(crate) fn carry_selection(old: &Tree, new: &mut Tree, mode: SelectionMode) {
    for id in old.selected() {
        let Some(key) = old[id].key() else {
            continue;
        };
        if let Some(matched) = new.find_by_key(key) {
            if let Err(err) = select(new, mode, matched) {
                warn!(key, %err, "selection not carried");
            }
        }
    }
}

/// Select `id` under `mode`. Single mode clears every other selection.
/// Returns whether anything changed.
pub(crate) fn select(tree: &mut Tree, mode: SelectionMode, id: NodeId) -> Result<bool> {
    let node = tree.get(id).ok_or(Error::NodeNotFound(id))?;
    if mode == SelectionMode::None || !node.selectable {
        return Ok(false);
    }
    let mut changed = !node.selected;
    if mode == SelectionMode::Single {
        for other in tree.selected() {
            if other != id {
                tree[other].selected = false;
                changed = true;
            }
        }
    }
    tree[id].selected = true;
    Ok(changed)
}

/// Flip the selection of `id`. Returns the new selection state.
pub(crate) fn toggle_selection(tree: &mut Tree, mode: SelectionMode, id: NodeId) -> Result<bool> {
    let node = tree.get(id).ok_or(Error::NodeNotFound(id))?;
    if node.selected {
        tree[id].selected = false;
        return Ok(false);
    }
    select(tree, mode, id)?;
    Ok(tree[id].selected)
}

/// Resolve the drilled view root, falling back to the tree root when the key
/// no longer exists.
pub(crate) fn resolve_view_root(tree: &Tree, key: &mut Option<String>) -> Option<NodeId> {
    let root = tree.root()?;
    let Some(wanted) = key.as_deref() else {
        return Some(root);
    };
    match tree.find_by_key(wanted) {
        Some(id) => Some(id),
        None => {
            warn!(key = wanted, "view root no longer in tree; showing the full tree");
            *key = None;
            Some(root)
        }
    }
}

/// Key to remember for a drill target; `None` for the tree root.
pub(crate) fn drill_key(tree: &Tree, id: NodeId) -> Result<Option<String>> {
    let node = tree.get(id).ok_or(Error::NodeNotFound(id))?;
    if tree.root() == Some(id) {
        return Ok(None);
    }
    node.key()
        .map(|k| Some(k.to_string()))
        .ok_or_else(|| Error::Structure("cannot drill into a node without an id or label".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiermap_core::{NodeRecord, TreeKind};

    fn tree() -> Tree {
        Tree::from_records(
            &[NodeRecord::group(
                "root",
                vec![NodeRecord::leaf("a", 1.0), NodeRecord::leaf("b", 1.0)],
            )],
            TreeKind::Rect,
        )
    }

    #[test]
    fn test_single_selection_replaces() {
        let mut tree = tree();
        let (a, b) = (tree.find_by_key("a").unwrap(), tree.find_by_key("b").unwrap());
        assert!(select(&mut tree, SelectionMode::Single, a).unwrap());
        assert!(select(&mut tree, SelectionMode::Single, b).unwrap());
        assert_eq!(tree.selected(), vec![b]);
        assert!(!select(&mut tree, SelectionMode::Single, b).unwrap());
    }

    #[test]
    fn test_multiple_selection_accumulates() {
        let mut tree = tree();
        let (a, b) = (tree.find_by_key("a").unwrap(), tree.find_by_key("b").unwrap());
        assert!(toggle_selection(&mut tree, SelectionMode::Multiple, a).unwrap());
        assert!(toggle_selection(&mut tree, SelectionMode::Multiple, b).unwrap());
        assert_eq!(tree.selected().len(), 2);
        assert!(!toggle_selection(&mut tree, SelectionMode::Multiple, a).unwrap());
        assert_eq!(tree.selected(), vec![b]);
    }

    #[test]
    fn test_selection_disabled_or_unselectable() {
        let mut tree = tree();
        let a = tree.find_by_key("a").unwrap();
        assert!(!select(&mut tree, SelectionMode::None, a).unwrap());
        tree[a].selectable = false;
        assert!(!select(&mut tree, SelectionMode::Multiple, a).unwrap());
        assert!(tree.selected().is_empty());
    }

    #[test]
    fn test_carry_selection_by_key() {
        let mut old = tree();
        let b = old.find_by_key("b").unwrap();
        old[b].selected = true;
        let mut new = Tree::from_records(
            &[NodeRecord::group("root", vec![NodeRecord::leaf("b", 5.0)])],
            TreeKind::Rect,
        );
        carry_selection(&old, &mut new, SelectionMode::Multiple);
        assert_eq!(new.selected(), vec![new.find_by_key("b").unwrap()]);
    }

    #[test]
    fn test_carry_selection_single_mode_replaces_data_selection() {
        let mut old = tree();
        let a = old.find_by_key("a").unwrap();
        old[a].selected = true;
        let mut b = NodeRecord::leaf("b", 1.0);
        b.selected = true;
        let mut new = Tree::from_records(
            &[NodeRecord::group("root", vec![NodeRecord::leaf("a", 1.0), b])],
            TreeKind::Rect,
        );
        carry_selection(&old, &mut new, SelectionMode::Single);
        assert_eq!(new.selected(), vec![new.find_by_key("a").unwrap()]);
    }

    #[test]
    fn test_carry_selection_skips_unselectable() {
        let mut old = tree();
        let a = old.find_by_key("a").unwrap();
        old[a].selected = true;
        let mut a = NodeRecord::leaf("a", 1.0);
        a.selectable = false;
        let mut new = Tree::from_records(&[NodeRecord::group("root", vec![a])], TreeKind::Rect);
        carry_selection(&old, &mut new, SelectionMode::Multiple);
        assert!(new.selected().is_empty());

        let mut none = Tree::from_records(
            &[NodeRecord::group("root", vec![NodeRecord::leaf("a", 1.0)])],
            TreeKind::Rect,
        );
        carry_selection(&old, &mut none, SelectionMode::None);
        assert!(none.selected().is_empty());
    }

    #[test]
    fn test_resolve_view_root_falls_back() {
        let tree = tree();
        let mut key = Some("a".to_string());
        assert_eq!(resolve_view_root(&tree, &mut key), tree.find_by_key("a"));
        let mut gone = Some("zzz".to_string());
        assert_eq!(resolve_view_root(&tree, &mut gone), tree.root());
        assert_eq!(gone, None);
        assert_eq!(drill_key(&tree, tree.root().unwrap()).unwrap(), None);
    }
}
