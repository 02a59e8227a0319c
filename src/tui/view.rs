//! Rendering: tree pane, status line, modal overlays.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::path::NodePath;
use crate::model::shadow_tree::JsonTreeNode;
use crate::ops::DecodedLeaf;

use super::app::{App, Overlay, OPS_MENU};

const HELP_LINE: &str = " q quit · ↑/k ↓/j move · enter expand/ops · d display · e edit · o menu ";

pub(crate) fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    draw_tree(frame, app, chunks[0]);
    draw_status(frame, app, chunks[1]);

    match app.overlay() {
        Some(Overlay::OpsMenu { path, selected }) => {
            draw_ops_menu(frame, path, *selected);
        }
        Some(Overlay::Viewer { title, lines, scroll }) => {
            let lines: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            draw_text_modal(frame, title, lines, *scroll, " esc close · y copy ");
        }
        Some(Overlay::Decode { title, decoded, scroll, .. }) => {
            draw_text_modal(
                frame,
                title,
                decode_lines(decoded),
                *scroll,
                " r replace value · esc close ",
            );
        }
        None => {}
    }
}

fn draw_tree(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.set_viewport(inner, inner.height as usize);

    let vis = app.state().visible_indices();
    let rows: Vec<Line> = vis
        .iter()
        .skip(app.scroll())
        .take(inner.height as usize)
        .map(|&idx| tree_row(&app.state().tree_flat[idx], idx == app.cursor()))
        .collect();
    frame.render_widget(Paragraph::new(rows), inner);
}

fn tree_row(node: &JsonTreeNode, selected: bool) -> Line<'static> {
    let indent = "  ".repeat(node.depth as usize);
    let marker = if node.is_leaf() {
        "  "
    } else if node.expanded {
        "▾ "
    } else {
        "▸ "
    };
    let mut label = node.label();
    if !node.is_leaf() {
        label.push_str(&format!(" ({})", node.children));
    }
    let line = Line::from(vec![
        Span::raw(indent),
        Span::styled(marker, Style::default().fg(Color::Blue)),
        Span::raw(label),
    ]);
    if selected {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let line = match app.message() {
        Some(msg) => Line::from(Span::styled(
            format!(" {msg} "),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            HELP_LINE,
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_ops_menu(frame: &mut Frame<'_>, path: &NodePath, selected: usize) {
    let height = OPS_MENU.len() as u16 + 2;
    let width = (path.to_string().len() as u16 + 20).clamp(32, frame.area().width);
    let area = centered_rect(frame.area(), width, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {path} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows: Vec<Line> = OPS_MENU
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!(" {entry} "), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(rows), inner);
}

fn decode_lines(decoded: &DecodedLeaf) -> Vec<Line<'static>> {
    let heading = match decoded {
        DecodedLeaf::Text(_) => "decoded as UTF-8 text:",
        DecodedLeaf::Binary(_) => "decoded as bytes (hex):",
    };
    let mut out = vec![
        Line::from(Span::styled(heading, Style::default().fg(Color::Cyan))),
        Line::from(""),
    ];
    out.extend(
        decoded
            .preview()
            .lines()
            .map(|l| Line::from(l.to_string())),
    );
    out
}

fn draw_text_modal(
    frame: &mut Frame<'_>,
    title: &str,
    lines: Vec<Line<'_>>,
    scroll: u16,
    footer: &str,
) {
    let full = frame.area();
    let area = centered_rect(
        full,
        (full.width.saturating_mul(9) / 10).max(1),
        (full.height.saturating_mul(4) / 5).max(3),
    );
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer,
            Style::default().add_modifier(Modifier::DIM),
        ))),
        chunks[1],
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
