//! AppState: document ownership and path-addressed reads/writes

use std::collections::HashSet;

use jsonpath_rust::{query::queryable::Queryable, JsonPath};
use serde_json::Value;
use thiserror::Error;

use crate::model::path::NodePath;
use crate::model::shadow_tree::{build_shadow_tree, JsonTreeNode};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSONPath error: {0}")]
    JsonPath(String),
    #[error("path not found: {0}")]
    PathNotFound(String),
    #[error("state error: {0}")]
    State(String),
}

/// Owns the parsed document and the derived shadow tree. All mutation goes
/// through [`AppState::set`]; the tree is rebuilt after every write because a
/// write may change a value's type and with it a node's branch/leaf kind.
#[derive(Debug, Default)]
pub struct AppState {
    dom: Option<Value>,
    pub tree_flat: Vec<JsonTreeNode>,
}

impl AppState {
    /// Take ownership of a parsed document and build its shadow tree.
    pub fn load_value(&mut self, dom: Value) {
        self.tree_flat = build_shadow_tree(&dom);
        self.dom = Some(dom);
        self.update_visibility_by_expansion();
        tracing::info!("document loaded: {} tree nodes", self.tree_flat.len());
    }

    fn dom_ref(&self) -> Result<&Value, AppError> {
        self.dom
            .as_ref()
            .ok_or_else(|| AppError::State("document not loaded".into()))
    }

    /// Read the value at `path`.
    pub fn get(&self, path: &NodePath) -> Result<&Value, AppError> {
        let dom = self.dom_ref()?;
        let hits: Vec<&Value> = dom
            .query(&path.to_string())
            .map_err(|e| AppError::JsonPath(e.to_string()))?;
        hits.into_iter()
            .next()
            .ok_or_else(|| AppError::PathNotFound(path.to_string()))
    }

    /// Replace the value at an existing `path`. Never creates new paths.
    /// Expansion state is carried over for paths that still exist after the
    /// rebuild, so an edit does not collapse the tree around it.
    pub fn set(&mut self, path: &NodePath, new_value: Value) -> Result<(), AppError> {
        let expr = path.to_string();
        let dom = self
            .dom
            .as_mut()
            .ok_or_else(|| AppError::State("document not loaded".into()))?;

        let paths: Vec<String> = dom
            .query_only_path(&expr)
            .map_err(|e| AppError::JsonPath(e.to_string()))?;
        let Some(concrete) = paths.into_iter().next() else {
            return Err(AppError::PathNotFound(expr));
        };

        if let Some(slot) = dom.reference_mut(&concrete) {
            *slot = new_value;
        } else {
            return Err(AppError::PathNotFound(concrete));
        }

        self.rebuild_tree();
        tracing::info!("value replaced at {expr}, tree rebuilt");
        Ok(())
    }

    /// Rebuild the shadow tree from the current document, keeping branches
    /// that survived the change expanded.
    fn rebuild_tree(&mut self) {
        let expanded: HashSet<String> = self
            .tree_flat
            .iter()
            .filter(|n| n.expanded)
            .map(|n| n.path.to_string())
            .collect();

        let Some(dom) = self.dom.as_ref() else { return };
        self.tree_flat = build_shadow_tree(dom);
        for node in &mut self.tree_flat {
            if expanded.contains(&node.path.to_string()) {
                node.expanded = true;
            }
        }
        self.update_visibility_by_expansion();
    }

    /// Flip a branch's expanded flag and refresh the visible-node set.
    pub fn toggle_expanded(&mut self, path: &NodePath) {
        if let Some(node) = self.tree_flat.iter_mut().find(|n| n.path == *path) {
            if !node.is_leaf() {
                node.expanded = !node.expanded;
            }
        }
        self.update_visibility_by_expansion();
    }

    /// Recompute `visible` from the `expanded` flags: the root is always
    /// visible, and each expanded visible branch reveals its direct children.
    /// Parents precede children in the flat vector, so one forward pass
    /// settles the whole tree.
    pub fn update_visibility_by_expansion(&mut self) {
        for (i, node) in self.tree_flat.iter_mut().enumerate() {
            node.visible = i == 0;
        }

        for i in 0..self.tree_flat.len() {
            if self.tree_flat[i].expanded && self.tree_flat[i].visible {
                let parent_depth = self.tree_flat[i].depth;
                for j in (i + 1)..self.tree_flat.len() {
                    if self.tree_flat[j].depth == parent_depth + 1 {
                        self.tree_flat[j].visible = true;
                    } else if self.tree_flat[j].depth <= parent_depth {
                        break;
                    }
                }
            }
        }
    }

    /// Indices of currently visible nodes, in display order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.tree_flat
            .iter()
            .enumerate()
            .filter(|(_, n)| n.visible)
            .map(|(i, _)| i)
            .collect()
    }

    /// Locate a node by path after a rebuild.
    pub fn position_of(&self, path: &NodePath) -> Option<usize> {
        self.tree_flat.iter().position(|n| n.path == *path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(value: Value) -> AppState {
        let mut state = AppState::default();
        state.load_value(value);
        state
    }

    #[test]
    fn load_builds_tree() {
        let state = loaded(json!({"name": "test", "value": 42}));
        assert_eq!(state.tree_flat.len(), 3);
        assert!(state.get(&NodePath::root()).is_ok());
    }

    #[test]
    fn get_resolves_nested_paths() {
        let state = loaded(json!({"user": {"name": "someone", "age": 30}}));

        let name = NodePath::root().child_key("user").child_key("name");
        assert_eq!(state.get(&name).unwrap(), &json!("someone"));

        let user = NodePath::root().child_key("user");
        assert_eq!(state.get(&user).unwrap(), &json!({"name": "someone", "age": 30}));
    }

    #[test]
    fn get_unknown_path_is_not_found() {
        let state = loaded(json!({"user": {"name": "someone"}}));
        let missing = NodePath::root().child_key("nonexistent");
        match state.get(&missing) {
            Err(AppError::PathNotFound(p)) => assert_eq!(p, "$.nonexistent"),
            other => panic!("expected PathNotFound, got {other:?}"),
        }
    }

    #[test]
    fn set_replaces_value_in_place() {
        let mut state = loaded(json!({"user": {"name": "someone", "age": 30}}));
        let name = NodePath::root().child_key("user").child_key("name");

        state.set(&name, json!("other")).unwrap();

        assert_eq!(state.get(&name).unwrap(), &json!("other"));
        let age = NodePath::root().child_key("user").child_key("age");
        assert_eq!(state.get(&age).unwrap(), &json!(30));
    }

    #[test]
    fn set_array_element() {
        let mut state = loaded(json!({"items": ["first", "second", "third"]}));
        let second = NodePath::root().child_key("items").child_index(1);

        state.set(&second, json!("updated")).unwrap();

        assert_eq!(state.get(&second).unwrap(), &json!("updated"));
        let first = NodePath::root().child_key("items").child_index(0);
        assert_eq!(state.get(&first).unwrap(), &json!("first"));
    }

    #[test]
    fn set_unknown_path_fails_without_creating_it() {
        let mut state = loaded(json!({"data": "value"}));
        let missing = NodePath::root().child_key("nonexistent").child_key("path");

        assert!(state.set(&missing, json!("x")).is_err());
        assert!(state.get(&missing).is_err());
        assert_eq!(
            state.get(&NodePath::root().child_key("data")).unwrap(),
            &json!("value")
        );
    }

    #[test]
    fn get_and_set_resolve_unusual_keys() {
        let mut state = loaded(json!({
            "2024": "year",
            "a\\b": "backslash",
            "it's": "quote",
            "key with spaces": "spaces"
        }));

        for (key, value) in [
            ("2024", "year"),
            ("a\\b", "backslash"),
            ("it's", "quote"),
            ("key with spaces", "spaces"),
        ] {
            let path = NodePath::root().child_key(key);
            assert_eq!(state.get(&path).unwrap(), &json!(value), "get {key:?}");
            state.set(&path, json!("updated")).unwrap();
            assert_eq!(state.get(&path).unwrap(), &json!("updated"), "set {key:?}");
        }
    }

    #[test]
    fn type_change_rebuilds_tree() {
        let mut state = loaded(json!({"user": {"name": "someone", "age": 30}}));
        let before = state.tree_flat.len();

        let name = NodePath::root().child_key("user").child_key("name");
        state
            .set(&name, json!({"profile": {"bio": "text", "skills": ["a", "b"]}}))
            .unwrap();

        assert_ne!(state.tree_flat.len(), before);

        // Former leaf is now a branch, and its new descendants resolve.
        let idx = state.position_of(&name).unwrap();
        assert!(!state.tree_flat[idx].is_leaf());
        let bio = name.child_key("profile").child_key("bio");
        assert_eq!(state.get(&bio).unwrap(), &json!("text"));
    }

    #[test]
    fn set_preserves_expansion_state() {
        let mut state = loaded(json!({"user": {"name": "a", "age": 1}, "other": {"x": 2}}));
        let user = NodePath::root().child_key("user");
        state.toggle_expanded(&user);
        assert!(state.tree_flat[state.position_of(&user).unwrap()].expanded);

        let name = user.child_key("name");
        state.set(&name, json!("b")).unwrap();

        let idx = state.position_of(&user).unwrap();
        assert!(state.tree_flat[idx].expanded, "expansion lost on rebuild");
        assert!(state.tree_flat[state.position_of(&name).unwrap()].visible);
    }

    #[test]
    fn visibility_follows_expansion() {
        let mut state = loaded(json!({"a": {"b": {"c": 1}}, "d": 2}));

        // Root expanded by default: root, a, d visible; b hidden.
        let visible: Vec<String> = state
            .visible_indices()
            .iter()
            .map(|&i| state.tree_flat[i].path.to_string())
            .collect();
        assert_eq!(visible, vec!["$", "$.a", "$.d"]);

        let a = NodePath::root().child_key("a");
        state.toggle_expanded(&a);
        let visible: Vec<String> = state
            .visible_indices()
            .iter()
            .map(|&i| state.tree_flat[i].path.to_string())
            .collect();
        assert_eq!(visible, vec!["$", "$.a", "$.a.b", "$.d"]);

        // Collapsing the root hides everything below it.
        state.toggle_expanded(&NodePath::root());
        let visible = state.visible_indices();
        assert_eq!(visible, vec![0]);
    }

    #[test]
    fn toggle_on_leaf_is_a_no_op() {
        let mut state = loaded(json!({"n": 5}));
        let n = NodePath::root().child_key("n");
        state.toggle_expanded(&n);
        let idx = state.position_of(&n).unwrap();
        assert!(!state.tree_flat[idx].expanded);
    }

    #[test]
    fn empty_state_reports_not_loaded() {
        let state = AppState::default();
        assert!(matches!(
            state.get(&NodePath::root()),
            Err(AppError::State(_))
        ));
    }
}
