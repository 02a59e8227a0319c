//! Interactive terminal explorer for JSON documents.
//!
//! The document lives in a path-addressed store ([`AppState`]); a flattened
//! shadow tree projects it for display, and the TUI layer drives navigation,
//! leaf previews, base64 decoding and external-editor edits on top of that.

pub mod model;
pub mod ops;
pub mod tui;
pub mod utils;

pub use model::data_core::{AppError, AppState};
pub use model::path::{NodePath, Seg};
pub use model::shadow_tree::{build_shadow_tree, JsonTreeNode, NodeKind, LEAF_PLACEHOLDER};
