//! Plain node records supplied by the tree-construction collaborator.

use serde::{Deserialize, Serialize};

/// One input node, with its children nested in order.
///
/// Every field is optional in serialized form; `disclosed` and `selectable`
/// default to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    /// Identity key, unique within a rendered tree
    pub id: Option<String>,
    /// Display text, used as identity when `id` is missing
    pub label: Option<String>,
    /// Weight; values `<= 0` receive no space
    pub size: f64,
    /// Color string (`#rrggbb`, `rgb(...)`, or a basic color name)
    pub color: Option<String>,
    /// Ordered children
    pub children: Vec<NodeRecord>,
    /// Whether children are laid out
    pub disclosed: bool,
    /// Whether the node can be selected
    pub selectable: bool,
    /// Initial selection state
    pub selected: bool,
    /// Unit radius override for sunburst rings
    pub radius: Option<f64>,
    /// Header band override for treemap groups
    pub header: Option<bool>,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            id: None,
            label: None,
            size: 0.0,
            color: None,
            children: Vec::new(),
            disclosed: true,
            selectable: true,
            selected: false,
            radius: None,
            header: None,
        }
    }
}

impl NodeRecord {
    /// Create a leaf record.
    #[must_use]
    pub fn leaf(id: &str, size: f64) -> Self {
        Self {
            id: Some(id.to_string()),
            size,
            ..Self::default()
        }
    }

    /// Create a group record. Its size is the sum of its children's positive sizes.
    #[must_use]
    pub fn group(id: &str, children: Vec<Self>) -> Self {
        let size = children.iter().map(|c| c.size.max(0.0)).sum();
        Self {
            id: Some(id.to_string()),
            size,
            children,
            ..Self::default()
        }
    }

    /// Set the color string.
    #[must_use]
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Set the disclosure state.
    #[must_use]
    pub const fn with_disclosed(mut self, disclosed: bool) -> Self {
        self.disclosed = disclosed;
        self
    }

    /// Set the unit radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Number of records in this subtree, including itself.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_from_json() {
        let rec: NodeRecord = serde_json::from_str(r#"{"id": "a", "size": 3}"#).unwrap();
        assert_eq!(rec.id.as_deref(), Some("a"));
        assert_eq!(rec.size, 3.0);
        assert!(rec.disclosed);
        assert!(rec.selectable);
        assert!(rec.children.is_empty());
    }

    #[test]
    fn test_group_sums_positive_sizes() {
        let g = NodeRecord::group(
            "g",
            vec![
                NodeRecord::leaf("a", 2.0),
                NodeRecord::leaf("b", -5.0),
                NodeRecord::leaf("c", 3.0),
            ],
        );
        assert_eq!(g.size, 5.0);
        assert_eq!(g.count(), 4);
    }

    #[test]
    fn test_nested_json() {
        let rec: NodeRecord = serde_json::from_str(
            r##"{"id": "root", "children": [{"id": "x", "size": 1, "color": "#ff0000"}]}"##,
        )
        .unwrap();
        assert_eq!(rec.children.len(), 1);
        assert_eq!(rec.children[0].color.as_deref(), Some("#ff0000"));
    }
}
