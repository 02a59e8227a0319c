//! Core data model: document store, typed paths, and the shadow tree

pub mod data_core;
pub mod path;
pub mod shadow_tree;
