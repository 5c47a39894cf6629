//! Arena-backed node tree shared by the treemap and sunburst.
//!
//! Nodes live by value in a dense `Vec` and refer to each other through
//! [`NodeId`] indices. The parent link is a plain index with no ownership, so
//! the parent/child relation cannot form reference cycles.
//!
//! A tree is rebuilt from records on every render. Nodes are matched across
//! rebuilds by their identity key ([`Node::key`]), never by `NodeId`.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{PolarBounds, Rect};
use crate::record::NodeRecord;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};
use tracing::{debug, warn};

/// Identity key given to a synthesized forest root.
pub const ARTIFICIAL_ROOT_KEY: &str = "\u{0}root";

/// Handle to a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which visualization a tree is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// Treemap rectangles
    Rect,
    /// Sunburst wedges
    Polar,
}

/// Treemap-specific node payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectGeometry {
    /// Header band override; `None` follows the view option
    pub header: Option<bool>,
    /// Snapped bounds, `None` when the node has no layout
    pub bounds: Option<Rect>,
    /// Header band reserved inside `bounds`, if any
    pub header_band: Option<Rect>,
}

/// Sunburst-specific node payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarGeometry {
    /// Ring thickness in units of one depth level
    pub unit_radius: f64,
    /// Wedge, `None` when the node has no layout
    pub bounds: Option<PolarBounds>,
}

impl Default for PolarGeometry {
    fn default() -> Self {
        Self {
            unit_radius: 1.0,
            bounds: None,
        }
    }
}

/// Visualization-specific part of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Treemap node
    Rect(RectGeometry),
    /// Sunburst node
    Polar(PolarGeometry),
}

impl NodeKind {
    fn for_tree(kind: TreeKind) -> Self {
        match kind {
            TreeKind::Rect => Self::Rect(RectGeometry::default()),
            TreeKind::Polar => Self::Polar(PolarGeometry::default()),
        }
    }
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Identity key; may be empty when the input had none
    pub id: String,
    /// Display text
    pub label: Option<String>,
    /// Declared size (may be zero or negative)
    pub size: f64,
    /// Color string as supplied
    pub color: String,
    /// Whether children are laid out
    pub disclosed: bool,
    /// Selection state
    pub selected: bool,
    /// Whether the node accepts selection
    pub selectable: bool,
    /// Synthesized container for a multi-root forest
    pub artificial_root: bool,
    /// Paint order assigned by the last layout pass
    pub z_index: u32,
    /// Visualization-specific payload and layout result
    pub kind: NodeKind,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    last_visited_child: Option<NodeId>,
}

impl Node {
    /// Create a detached node of the given kind.
    #[must_use]
    pub fn new(id: &str, size: f64, kind: TreeKind) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            size,
            color: String::new(),
            disclosed: true,
            selected: false,
            selectable: true,
            artificial_root: false,
            z_index: 0,
            kind: NodeKind::for_tree(kind),
            children: Vec::new(),
            parent: None,
            last_visited_child: None,
        }
    }

    /// Set the color string.
    #[must_use]
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Identity used to match nodes across re-renders: the id, else the
    /// label, else nothing.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        if self.artificial_root {
            return Some(ARTIFICIAL_ROOT_KEY);
        }
        if !self.id.is_empty() {
            return Some(&self.id);
        }
        self.label.as_deref().filter(|l| !l.is_empty())
    }

    /// Size used for partitioning: `max(size, 0)`.
    #[must_use]
    pub fn effective_size(&self) -> f64 {
        if self.size.is_nan() {
            0.0
        } else {
            self.size.max(0.0)
        }
    }

    /// A node without children behaves as a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent back-reference.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child most recently visited by keyboard navigation.
    #[must_use]
    pub const fn last_visited_child(&self) -> Option<NodeId> {
        self.last_visited_child
    }

    /// Whether the last layout pass gave this node any geometry.
    #[must_use]
    pub fn has_layout(&self) -> bool {
        match &self.kind {
            NodeKind::Rect(g) => g.bounds.is_some(),
            NodeKind::Polar(g) => g.bounds.is_some(),
        }
    }

    /// Rectangular bounds, for treemap nodes with layout.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        match &self.kind {
            NodeKind::Rect(g) => g.bounds,
            NodeKind::Polar(_) => None,
        }
    }

    /// Wedge bounds, for sunburst nodes with layout.
    #[must_use]
    pub fn polar(&self) -> Option<PolarBounds> {
        match &self.kind {
            NodeKind::Polar(g) => g.bounds,
            NodeKind::Rect(_) => None,
        }
    }

    /// Drop any layout result.
    pub fn clear_layout(&mut self) {
        match &mut self.kind {
            NodeKind::Rect(g) => {
                g.bounds = None;
                g.header_band = None;
            }
            NodeKind::Polar(g) => g.bounds = None,
        }
    }

    /// Parsed color; unparseable strings fall back to [`Color::FALLBACK`].
    #[must_use]
    pub fn parsed_color(&self) -> Color {
        if self.color.is_empty() {
            return Color::FALLBACK;
        }
        self.color.parse().unwrap_or_else(|err| {
            warn!(node = %self.id, color = %self.color, %err, "unparseable node color");
            Color::FALLBACK
        })
    }
}

/// Arena of nodes with a single root.
#[derive(Debug, Clone)]
pub struct Tree {
    kind: TreeKind,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    keys: HashMap<String, NodeId>,
}

impl Tree {
    /// Create an empty tree.
    #[must_use]
    pub fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            root: None,
            keys: HashMap::new(),
        }
    }

    /// Build a tree from records.
    ///
    /// More than one top-level record produces an artificial root whose size
    /// is the sum of the top-level sizes. Empty input yields an empty tree.
    /// Duplicate keys are logged and only the first node is reachable through
    /// [`Tree::find_by_key`].
    #[must_use]
    pub fn from_records(records: &[NodeRecord], kind: TreeKind) -> Self {
        let mut tree = Self::new(kind);
        let mut duplicates = Vec::new();
        tree.build(records, &mut duplicates);
        for key in &duplicates {
            warn!(%key, "duplicate node key; later nodes cannot be matched across renders");
        }
        tree
    }

    /// Like [`Tree::from_records`] but rejects duplicate keys.
    pub fn from_records_strict(records: &[NodeRecord], kind: TreeKind) -> Result<Self> {
        let mut tree = Self::new(kind);
        let mut duplicates = Vec::new();
        tree.build(records, &mut duplicates);
        match duplicates.into_iter().next() {
            Some(key) => Err(Error::DuplicateKey(key)),
            None => Ok(tree),
        }
    }

    /// Build a tree from a JSON array (or single object) of records.
    pub fn from_json(json: &str, kind: TreeKind) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let records: Vec<NodeRecord> = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };
        Ok(Self::from_records(&records, kind))
    }

    fn build(&mut self, records: &[NodeRecord], duplicates: &mut Vec<String>) {
        self.nodes.reserve(records.iter().map(NodeRecord::count).sum());
        let root = match records {
            [] => return,
            [single] => self.insert_record(single, duplicates),
            many => {
                let mut root = Node::new("", 0.0, self.kind);
                root.artificial_root = true;
                root.size = many.iter().map(|r| r.size.max(0.0)).sum();
                let root = self.add_node(root);
                for record in many {
                    let child = self.insert_record(record, duplicates);
                    self.link(root, child);
                }
                root
            }
        };
        self.root = Some(root);
        debug!(nodes = self.nodes.len(), "built tree from records");
    }

    // Explicit stack: record nesting comes from external data.
    fn insert_record(&mut self, record: &NodeRecord, duplicates: &mut Vec<String>) -> NodeId {
        let top = self.node_from_record(record, duplicates);
        let mut pending: Vec<(NodeId, &NodeRecord)> = vec![(top, record)];
        while let Some((parent, rec)) = pending.pop() {
            for child_rec in &rec.children {
                let child = self.node_from_record(child_rec, duplicates);
                self.link(parent, child);
                pending.push((child, child_rec));
            }
        }
        top
    }

    fn node_from_record(&mut self, record: &NodeRecord, duplicates: &mut Vec<String>) -> NodeId {
        let mut node = Node::new(record.id.as_deref().unwrap_or(""), record.size, self.kind);
        node.label.clone_from(&record.label);
        node.color = record.color.clone().unwrap_or_default();
        node.disclosed = record.disclosed;
        node.selectable = record.selectable;
        node.selected = record.selected && record.selectable;
        match &mut node.kind {
            NodeKind::Rect(g) => g.header = record.header,
            NodeKind::Polar(g) => {
                if let Some(radius) = record.radius {
                    g.unit_radius = radius.max(0.0);
                }
            }
        }
        if node.key().is_none() {
            warn!("node has neither id nor label; it cannot be matched across renders");
        }
        let key = node.key().map(str::to_string);
        let id = self.push(node);
        if let Some(key) = key {
            if self.keys.contains_key(&key) {
                duplicates.push(key);
            } else {
                self.keys.insert(key, id);
            }
        }
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Add a detached node and return its handle. The first node added
    /// becomes the root.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let key = node.key().map(str::to_string);
        let id = self.push(node);
        if let Some(key) = key {
            self.keys.entry(key).or_insert(id);
        }
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// The child must be detached and must not be an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child || self.is_descendant_of(parent, child) || Some(child) == self.root {
            return Err(Error::Structure("attaching would create a cycle".to_string()));
        }
        if self.nodes[child.index()].parent.is_some() {
            return Err(Error::Structure("node is already attached".to_string()));
        }
        self.link(parent, child);
        Ok(())
    }

    /// Detach `child` from its parent, keeping its own subtree intact.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        self.check(child)?;
        if let Some(parent) = self.nodes[child.index()].parent.take() {
            let p = &mut self.nodes[parent.index()];
            p.children.retain(|&c| c != child);
            if p.last_visited_child == Some(child) {
                p.last_visited_child = None;
            }
        }
        Ok(())
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::NodeNotFound(id))
        }
    }

    /// Visualization kind.
    #[must_use]
    pub const fn kind(&self) -> TreeKind {
        self.kind
    }

    /// The single root, if the tree is non-empty.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Iterate over all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Ordered children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self[id].parent, move |&p| self[p].parent)
    }

    /// Number of edges between the node and the root.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Depth of `id` below `ancestor`, if it is `ancestor` or lies under it.
    #[must_use]
    pub fn depth_below(&self, id: NodeId, ancestor: NodeId) -> Option<usize> {
        if id == ancestor {
            return Some(0);
        }
        self.ancestors(id)
            .position(|a| a == ancestor)
            .map(|p| p + 1)
    }

    /// Whether `id` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Find a node by identity key.
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    /// Find a node by identity key, failing if absent.
    pub fn require_key(&self, key: &str) -> Result<NodeId> {
        self.find_by_key(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// `start` followed by all of its descendants in pre-order.
    #[must_use]
    pub fn flatten(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        out
    }

    /// Number of nodes in the subtree rooted at `start`.
    #[must_use]
    pub fn subtree_size(&self, start: NodeId) -> usize {
        self.flatten(start).len()
    }

    /// Maximum depth of any node below `start` (0 for a leaf).
    #[must_use]
    pub fn height(&self, start: NodeId) -> usize {
        let mut max = 0;
        let mut stack = vec![(start, 0usize)];
        while let Some((id, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(self[id].children.iter().map(|&c| (c, d + 1)));
        }
        max
    }

    /// Fail if the subtree nests deeper than `limit`.
    pub fn check_depth(&self, start: NodeId, limit: usize) -> Result<()> {
        if self.height(start) > limit {
            return Err(Error::DepthLimit { limit });
        }
        Ok(())
    }

    /// Sum of the effective sizes of a node's children.
    #[must_use]
    pub fn child_size_total(&self, id: NodeId) -> f64 {
        self[id]
            .children
            .iter()
            .map(|&c| self[c].effective_size())
            .sum()
    }

    /// Drop layout results and paint order from every node.
    pub fn clear_layout(&mut self) {
        for node in &mut self.nodes {
            node.clear_layout();
            node.z_index = 0;
        }
    }

    /// Record which child keyboard navigation last passed through.
    ///
    /// This is the only mutation performed on a tree after construction
    /// other than layout results and selection; it is owned by navigation.
    pub fn set_last_visited_child(&mut self, parent: NodeId, child: NodeId) {
        if self[child].parent == Some(parent) {
            self.nodes[parent.index()].last_visited_child = Some(child);
        }
    }

    /// Selected nodes in arena order.
    #[must_use]
    pub fn selected(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, n)| n.selected)
            .map(|(id, _)| id)
            .collect()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
