//! Navigation controller: selection, expansion, overlays, key/mouse dispatch.
//!
//! The controller is pure state over [`AppState`]; the terminal itself lives
//! in the parent module. The one operation that needs the terminal released,
//! the external edit, is handed back to the event loop as an [`EditRequest`].

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use serde_json::Value;

use crate::model::data_core::AppState;
use crate::model::path::NodePath;
use crate::ops::{self, DecodedLeaf};
use crate::utils::clipboard;
use crate::utils::editor::{EditorConfig, EditorError};

/// Operations offered on a leaf, in menu order.
pub const OPS_MENU: [&str; 4] = ["Display", "Base64 decode", "Edit (in $EDITOR)", "Cancel"];

/// Modal state layered over the tree.
#[derive(Debug)]
pub enum Overlay {
    OpsMenu {
        path: NodePath,
        selected: usize,
    },
    Viewer {
        title: String,
        lines: Vec<String>,
        scroll: u16,
    },
    Decode {
        path: NodePath,
        title: String,
        decoded: DecodedLeaf,
        scroll: u16,
    },
}

/// Request for the event loop: suspend the terminal, run the external editor
/// over `initial`, then feed the outcome back via [`App::finish_edit`].
#[derive(Debug)]
pub struct EditRequest {
    pub path: NodePath,
    pub initial: String,
}

pub struct App {
    state: AppState,
    title: String,
    editor: EditorConfig,
    /// Index into `state.tree_flat`; always a visible node.
    cursor: usize,
    /// First visible-list row shown in the tree viewport.
    scroll: usize,
    /// Rows available in the tree viewport, reported by the renderer.
    tree_rows: usize,
    /// Tree viewport rectangle, for mouse hit testing.
    tree_area: Option<Rect>,
    overlay: Option<Overlay>,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(state: AppState, title: String, editor: EditorConfig) -> Self {
        Self {
            state,
            title,
            editor,
            cursor: 0,
            scroll: 0,
            tree_rows: 0,
            tree_area: None,
            overlay: None,
            message: None,
            should_quit: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Called by the renderer each frame with the tree viewport geometry.
    pub(crate) fn set_viewport(&mut self, area: Rect, rows: usize) {
        self.tree_area = Some(area);
        self.tree_rows = rows;
        let vis = self.state.visible_indices();
        if let Some(pos) = vis.iter().position(|&i| i == self.cursor) {
            self.ensure_in_view(pos);
        }
    }

    // --- input dispatch ---

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<EditRequest> {
        self.message = None;
        match self.overlay.take() {
            None => return self.handle_tree_key(key),
            Some(Overlay::OpsMenu { path, mut selected }) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Up | KeyCode::Char('k') => {
                    selected = selected.saturating_sub(1);
                    self.overlay = Some(Overlay::OpsMenu { path, selected });
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    selected = (selected + 1).min(OPS_MENU.len() - 1);
                    self.overlay = Some(Overlay::OpsMenu { path, selected });
                }
                KeyCode::Enter => return self.ops_choice(selected, path),
                _ => self.overlay = Some(Overlay::OpsMenu { path, selected }),
            },
            Some(Overlay::Viewer { title, lines, mut scroll }) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {}
                KeyCode::Char('y') => {
                    match clipboard::copy_to_clipboard(&lines.join("\n")) {
                        Ok(()) => self.message = Some("copied to clipboard".into()),
                        Err(e) => self.message = Some(e.to_string()),
                    }
                    self.overlay = Some(Overlay::Viewer { title, lines, scroll });
                }
                code => {
                    match code {
                        KeyCode::Up | KeyCode::Char('k') => scroll = scroll.saturating_sub(1),
                        KeyCode::Down | KeyCode::Char('j') => scroll = scroll.saturating_add(1),
                        _ => {}
                    }
                    self.overlay = Some(Overlay::Viewer { title, lines, scroll });
                }
            },
            Some(Overlay::Decode {
                path,
                title,
                decoded,
                mut scroll,
            }) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {}
                // Replacement only ever happens on this explicit confirmation.
                KeyCode::Char('r') | KeyCode::Enter => self.apply_set(&path, decoded.replacement()),
                code => {
                    match code {
                        KeyCode::Up | KeyCode::Char('k') => scroll = scroll.saturating_sub(1),
                        KeyCode::Down | KeyCode::Char('j') => scroll = scroll.saturating_add(1),
                        _ => {}
                    }
                    self.overlay = Some(Overlay::Decode {
                        path,
                        title,
                        decoded,
                        scroll,
                    });
                }
            },
        }
        None
    }

    fn handle_tree_key(&mut self, key: KeyEvent) -> Option<EditRequest> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('d') => {
                if let Some(path) = self.selected_leaf_path() {
                    self.open_display(&path);
                }
            }
            KeyCode::Char('o') => {
                if let Some(path) = self.selected_leaf_path() {
                    self.overlay = Some(Overlay::OpsMenu { path, selected: 0 });
                }
            }
            KeyCode::Char('e') => {
                if let Some(path) = self.selected_leaf_path() {
                    return self.request_edit(path);
                }
            }
            _ => {}
        }
        None
    }

    pub fn handle_mouse(&mut self, ev: MouseEvent) {
        if self.overlay.is_some() {
            match ev.kind {
                MouseEventKind::ScrollUp => self.scroll_overlay(-1),
                MouseEventKind::ScrollDown => self.scroll_overlay(1),
                _ => {}
            }
            return;
        }
        match ev.kind {
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::Down(MouseButton::Left) => self.click(ev.column, ev.row),
            _ => {}
        }
    }

    /// Click selects the row; clicking the already selected row activates it.
    fn click(&mut self, column: u16, row: u16) {
        let Some(area) = self.tree_area else { return };
        if !area.contains(Position { x: column, y: row }) {
            return;
        }
        let vis = self.state.visible_indices();
        let pos = self.scroll + (row - area.y) as usize;
        if let Some(&idx) = vis.get(pos) {
            if idx == self.cursor {
                self.activate();
            } else {
                self.cursor = idx;
            }
        }
    }

    // --- navigation ---

    fn move_selection(&mut self, delta: isize) {
        let vis = self.state.visible_indices();
        if vis.is_empty() {
            return;
        }
        let pos = vis.iter().position(|&i| i == self.cursor).unwrap_or(0);
        let new_pos = if delta.is_negative() {
            pos.saturating_sub(delta.unsigned_abs())
        } else {
            (pos + delta as usize).min(vis.len() - 1)
        };
        self.cursor = vis[new_pos];
        self.ensure_in_view(new_pos);
    }

    fn ensure_in_view(&mut self, pos: usize) {
        if pos < self.scroll {
            self.scroll = pos;
        } else if self.tree_rows > 0 && pos >= self.scroll + self.tree_rows {
            self.scroll = pos + 1 - self.tree_rows;
        }
    }

    /// Enter/space: toggle a branch, open the operations menu on a leaf.
    fn activate(&mut self) {
        let Some(node) = self.state.tree_flat.get(self.cursor) else {
            return;
        };
        let path = node.path.clone();
        if node.is_leaf() {
            self.overlay = Some(Overlay::OpsMenu { path, selected: 0 });
        } else {
            self.state.toggle_expanded(&path);
        }
    }

    fn selected_leaf_path(&self) -> Option<NodePath> {
        self.state
            .tree_flat
            .get(self.cursor)
            .filter(|n| n.is_leaf())
            .map(|n| n.path.clone())
    }

    fn scroll_overlay(&mut self, delta: i32) {
        let adjust = |scroll: &mut u16| {
            *scroll = if delta.is_negative() {
                scroll.saturating_sub(delta.unsigned_abs() as u16)
            } else {
                scroll.saturating_add(delta as u16)
            };
        };
        match &mut self.overlay {
            Some(Overlay::Viewer { scroll, .. }) | Some(Overlay::Decode { scroll, .. }) => {
                adjust(scroll)
            }
            _ => {}
        }
    }

    // --- leaf operations ---

    fn ops_choice(&mut self, choice: usize, path: NodePath) -> Option<EditRequest> {
        match OPS_MENU[choice.min(OPS_MENU.len() - 1)] {
            "Display" => self.open_display(&path),
            "Base64 decode" => self.open_decode(path),
            "Edit (in $EDITOR)" => return self.request_edit(path),
            _ => {} // Cancel
        }
        None
    }

    fn open_display(&mut self, path: &NodePath) {
        match self.state.get(path) {
            Ok(value) => {
                let text = ops::display_text(value);
                self.overlay = Some(Overlay::Viewer {
                    title: format!("Display {path}"),
                    lines: text.lines().map(str::to_string).collect(),
                    scroll: 0,
                });
            }
            Err(e) => {
                tracing::error!("display of {path} failed: {e}");
                self.message = Some(format!("display failed: {e}"));
            }
        }
    }

    fn open_decode(&mut self, path: NodePath) {
        let decoded = match self.state.get(&path) {
            Ok(value) => ops::decode_base64_leaf(value),
            Err(e) => {
                tracing::error!("decode of {path} failed: {e}");
                self.message = Some(format!("decode failed: {e}"));
                return;
            }
        };
        match decoded {
            Ok(decoded) => {
                self.overlay = Some(Overlay::Decode {
                    title: format!("Base64 decode of {path}"),
                    path,
                    decoded,
                    scroll: 0,
                });
            }
            Err(e) => self.message = Some(format!("decode failed: {e}")),
        }
    }

    fn request_edit(&mut self, path: NodePath) -> Option<EditRequest> {
        match self.state.get(&path) {
            Ok(value) => Some(EditRequest {
                initial: ops::edit_buffer(value),
                path,
            }),
            Err(e) => {
                tracing::error!("edit of {path} failed: {e}");
                self.message = Some(format!("edit failed: {e}"));
                None
            }
        }
    }

    /// Store the editor outcome. Abort and failure both leave the document in
    /// its last-known-good state.
    pub fn finish_edit(&mut self, path: NodePath, outcome: Result<Option<String>, EditorError>) {
        match outcome {
            Ok(Some(edited)) => {
                let old = match self.state.get(&path) {
                    Ok(v) => v.clone(),
                    Err(e) => {
                        self.message = Some(format!("edit failed: {e}"));
                        return;
                    }
                };
                let new_value = ops::edited_replacement(&old, &edited);
                self.apply_set(&path, new_value);
            }
            Ok(None) => self.message = Some("edit aborted, value unchanged".into()),
            Err(e) => {
                tracing::error!("{e}");
                self.message = Some(e.to_string());
            }
        }
    }

    /// Write through the store, then re-anchor the cursor: node indices shift
    /// whenever a write changes the tree's shape.
    fn apply_set(&mut self, path: &NodePath, value: Value) {
        match self.state.set(path, value) {
            Ok(()) => {
                self.cursor = self.state.position_of(path).unwrap_or(0);
                let visible = self
                    .state
                    .tree_flat
                    .get(self.cursor)
                    .is_some_and(|n| n.visible);
                if !visible {
                    self.cursor = 0;
                    self.scroll = 0;
                }
                self.message = Some(format!("updated {path}"));
            }
            Err(e) => {
                tracing::error!("update of {path} failed: {e}");
                self.message = Some(format!("update failed: {e}"));
            }
        }
    }
}
