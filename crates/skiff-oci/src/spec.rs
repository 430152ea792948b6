//! Generic labelled tree representing a parsed configuration document.
//!
//! The external parser produces a JSON document; [`SpecNode::from_document`]
//! flattens it into a uniform tree that the dispatch engine and the section
//! handlers walk without caring about JSON value types:
//!
//! - an object member becomes a child labelled with the member key, with the
//!   member value flattened below it
//! - a scalar becomes a leaf labelled with its string form
//! - an array contributes its elements in order; object elements become
//!   anonymous (empty-label) nodes holding their members
//!
//! So `{"vm": {"image": "/a.img"}}` becomes `"" -> vm -> image -> /a.img`,
//! and the payload of a scalar field is the label of its first child.

use serde_json::Value;

/// One node of the parsed specification document.
///
/// Read-only during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecNode {
    /// Node label: a member key, a scalar value, or empty for anonymous
    /// array-element nodes and the document root.
    pub label: String,
    /// Ordered children.
    pub children: Vec<SpecNode>,
}

impl SpecNode {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with children.
    #[must_use]
    pub fn with_children(label: impl Into<String>, children: Vec<SpecNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Build the document root from a parsed JSON value.
    #[must_use]
    pub fn from_document(value: &Value) -> Self {
        Self {
            label: String::new(),
            children: Self::from_value(value),
        }
    }

    fn from_value(value: &Value) -> Vec<SpecNode> {
        match value {
            Value::Null => Vec::new(),
            Value::Bool(b) => vec![Self::leaf(b.to_string())],
            Value::Number(n) => vec![Self::leaf(n.to_string())],
            Value::String(s) => vec![Self::leaf(s.clone())],
            Value::Array(elements) => elements
                .iter()
                .map(|element| match element {
                    Value::Object(_) | Value::Array(_) => Self {
                        label: String::new(),
                        children: Self::from_value(element),
                    },
                    Value::Null => Self::leaf(String::new()),
                    Value::Bool(b) => Self::leaf(b.to_string()),
                    Value::Number(n) => Self::leaf(n.to_string()),
                    Value::String(s) => Self::leaf(s.clone()),
                })
                .collect(),
            Value::Object(members) => members
                .iter()
                .map(|(key, member)| Self {
                    label: key.clone(),
                    children: Self::from_value(member),
                })
                .collect(),
        }
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The scalar payload of this node: its first child's label.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.children.first().map(|child| child.label.as_str())
    }

    /// First child with the given label.
    #[must_use]
    pub fn child(&self, label: &str) -> Option<&SpecNode> {
        self.children.iter().find(|child| child.label == label)
    }

    /// Scalar payload of the first child with the given label.
    #[must_use]
    pub fn child_value(&self, label: &str) -> Option<&str> {
        self.child(label).and_then(SpecNode::value)
    }

    /// Labels of all children, in order.
    ///
    /// For a node built from a JSON array of scalars this is the array
    /// contents.
    #[must_use]
    pub fn child_labels(&self) -> Vec<String> {
        self.children
            .iter()
            .map(|child| child.label.clone())
            .collect()
    }
}
