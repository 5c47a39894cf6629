//! View-level interaction state: the treemap isolation stack and sunburst
//! rotation.
//!
//! Both are owned by a single view and feed back into its next layout pass.
//! The isolation stack stores identity keys rather than node handles so it
//! survives the tree being rebuilt from fresh data.

use hiermap_core::{normalize_signed_angle, Error, NodeId, Result, Tree};
use tracing::{debug, warn};

// =============================================================================
// Isolation
// =============================================================================

/// One render layer: the base tree or an isolated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    /// Root of the layer
    pub node: NodeId,
    /// Only the innermost layer is visible
    pub visible: bool,
}

/// Stack of isolated nodes, innermost last. Empty means the normal view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsolationStack {
    keys: Vec<String>,
}

impl IsolationStack {
    /// Empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Isolate `id`. The node must have an identity key.
    pub fn push(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
        let node = tree.get(id).ok_or(Error::NodeNotFound(id))?;
        let key = node
            .key()
            .ok_or_else(|| Error::Structure("cannot isolate a node without an id or label".to_string()))?;
        debug!(key, depth = self.keys.len() + 1, "isolate");
        self.keys.push(key.to_string());
        Ok(())
    }

    /// Drop the innermost isolated node, returning its key.
    pub fn pop(&mut self) -> Option<String> {
        let key = self.keys.pop();
        if let Some(key) = &key {
            debug!(key = key.as_str(), depth = self.keys.len(), "restore");
        }
        key
    }

    /// Key of the innermost isolated node.
    #[must_use]
    pub fn top(&self) -> Option<&str> {
        self.keys.last().map(String::as_str)
    }

    /// Number of isolated layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the view shows the full tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Return to the normal view.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Isolated keys, outermost first.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Innermost isolated node present in `tree`.
    ///
    /// Keys that no longer resolve (the node disappeared from the data) are
    /// skipped with a warning; `None` means the full tree is shown.
    #[must_use]
    pub fn resolve(&self, tree: &Tree) -> Option<NodeId> {
        self.keys.iter().rev().find_map(|key| {
            let found = tree.find_by_key(key);
            if found.is_none() {
                warn!(key = key.as_str(), "isolated node no longer in tree");
            }
            found
        })
    }

    /// Render layers: the base tree at `root`, then each resolvable isolated
    /// node. Only the last layer is visible.
    #[must_use]
    pub fn layers(&self, tree: &Tree, root: NodeId) -> Vec<Layer> {
        let mut layers: Vec<Layer> = std::iter::once(root)
            .chain(self.keys.iter().filter_map(|k| tree.find_by_key(k)))
            .map(|node| Layer {
                node,
                visible: false,
            })
            .collect();
        if let Some(last) = layers.last_mut() {
            last.visible = true;
        }
        layers
    }
}

// =============================================================================
// Rotation
// =============================================================================

/// Sunburst rotation: accumulated angle plus the anchor of an active drag.
///
/// Angles are radians; the accumulated angle stays in `(-π, π]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    angle: f64,
    anchor: Option<f64>,
}

impl Rotation {
    /// Current rotation angle.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Anchor of the active gesture.
    #[must_use]
    pub const fn anchor(&self) -> Option<f64> {
        self.anchor
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_rotating(&self) -> bool {
        self.anchor.is_some()
    }

    /// Begin a drag at `anchor`.
    pub fn start(&mut self, anchor: f64) {
        self.anchor = Some(anchor);
    }

    /// Follow the pointer to `current`. Returns the new angle, or `None`
    /// when no drag is active.
    pub fn continue_to(&mut self, current: f64) -> Option<f64> {
        let anchor = self.anchor?;
        self.angle = normalize_signed_angle(self.angle + normalize_signed_angle(current - anchor));
        self.anchor = Some(current);
        Some(self.angle)
    }

    /// Finish the drag.
    pub fn end(&mut self) {
        self.anchor = None;
    }

    /// Rotate by a fixed step, independent of any drag.
    pub fn nudge(&mut self, delta: f64) -> f64 {
        self.angle = normalize_signed_angle(self.angle + delta);
        self.angle
    }

    /// Reset to no rotation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Interaction state owned by a view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    /// Treemap isolate/restore stack
    pub isolation: IsolationStack,
    /// Sunburst rotation
    pub rotation: Rotation,
}
