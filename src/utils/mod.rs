pub mod clipboard;
pub mod editor;
pub mod fs;
