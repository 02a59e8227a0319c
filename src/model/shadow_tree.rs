//! Shadow tree: flat projection of the document into displayable nodes.
//! Stores structure and paths only; leaf labels never carry the leaf's value.

use serde_json::Value;

use crate::model::path::NodePath;

/// Fixed label shown for every leaf regardless of its content, so the
/// collapsed view never exposes secrets or blobs.
pub const LEAF_PLACEHOLDER: &str = "(...)";

/// JSON node type (decoupled from UI presentation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }

    pub fn is_leaf(self) -> bool {
        !matches!(self, NodeKind::Object | NodeKind::Array)
    }
}

#[derive(Debug, Clone)]
pub struct JsonTreeNode {
    /// Key name, or index in `[i]` form, within the parent.
    pub name: String,
    /// Back-reference into the document, used for reads and writes.
    pub path: NodePath,
    pub kind: NodeKind,
    /// Object field count / array length; 0 for leaves.
    pub children: u32,
    /// Depth in the tree (root is 0), drives indentation.
    pub depth: u32,
    /// Branch expansion flag; leaves never expand.
    pub expanded: bool,
    /// Derived from ancestor expansion; recomputed after every toggle.
    pub visible: bool,
}

impl JsonTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    /// Row label. Leaves always show the fixed placeholder.
    pub fn label(&self) -> String {
        if self.is_leaf() {
            format!("{}: {}", self.name, LEAF_PLACEHOLDER)
        } else {
            self.name.clone()
        }
    }
}

/// Build the full flat shadow index from the root value. Children appear in
/// the document's own order (insertion order for objects, index order for
/// arrays), parents always before their descendants. The root starts
/// expanded, every other branch collapsed.
pub fn build_shadow_tree(root: &Value) -> Vec<JsonTreeNode> {
    let mut out = Vec::with_capacity(1024);

    fn push_node(out: &mut Vec<JsonTreeNode>, name: String, path: NodePath, v: &Value, depth: u32) {
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        out.push(JsonTreeNode {
            name,
            path,
            kind: NodeKind::of(v),
            children,
            depth,
            expanded: depth == 0,
            visible: depth == 0,
        });
    }

    fn walk(out: &mut Vec<JsonTreeNode>, v: &Value, path: &NodePath, name: &str, depth: u32) {
        push_node(out, name.to_string(), path.clone(), v, depth);
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    walk(out, child, &path.child_key(k), k, depth + 1);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    walk(out, child, &path.child_index(idx), &format!("[{idx}]"), depth + 1);
                }
            }
            _ => {}
        }
    }

    walk(&mut out, root, &NodePath::root(), "$", 0);
    out
}
