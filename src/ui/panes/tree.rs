//! Parse tree diagram rendering
//!
//! Draws a pre-rasterized [`Canvas`] through a scrollable viewport. The
//! viewport starts with the root centered horizontally; there is no zoom.

use crate::layout::{Canvas, CellKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Scroll state for the tree pane
#[derive(Debug, Default)]
pub struct TreeScrollState {
    pub x: usize,
    pub y: usize,
    /// Set once the initial offset has been applied for the current tree
    pub anchored: bool,
}

impl TreeScrollState {
    /// Forget the offset so the next render re-centers on the root
    pub fn reset(&mut self) {
        *self = TreeScrollState::default();
    }
}

fn cell_style(kind: CellKind) -> Style {
    match kind {
        CellKind::Label => Style::default()
            .fg(DEFAULT_THEME.function)
            .add_modifier(Modifier::BOLD),
        CellKind::Bracket => Style::default().fg(DEFAULT_THEME.comment),
        CellKind::Edge => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Cut one canvas row down to the viewport, merging runs of equal style
fn viewport_line(canvas: &Canvas, row: usize, x: usize, width: usize) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    let mut run = String::new();
    let mut run_kind: Option<CellKind> = None;

    for col in x..x + width {
        let (c, kind) = match canvas.get(row, col) {
            Some((c, kind)) => (c, Some(kind)),
            None => (' ', None),
        };
        if kind != run_kind && !run.is_empty() {
            let style = run_kind.map_or(Style::default(), cell_style);
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_kind = kind;
        run.push(c);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_kind.map_or(Style::default(), cell_style)));
    }

    Line::from(spans)
}

/// Render the parse tree pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    canvas: &Canvas,
    root_center: usize,
    is_focused: bool,
    scroll_state: &mut TreeScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Parse Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner.width.max(1) as usize;
    let visible_height = inner.height.max(1) as usize;

    if !scroll_state.anchored {
        scroll_state.x = root_center.saturating_sub(visible_width / 2);
        scroll_state.y = 0;
        scroll_state.anchored = true;
    }

    let max_x = canvas.width.saturating_sub(visible_width);
    let max_y = canvas.height.saturating_sub(visible_height);
    scroll_state.x = scroll_state.x.min(max_x);
    scroll_state.y = scroll_state.y.min(max_y);

    let lines: Vec<Line> = (scroll_state.y..canvas.height)
        .take(visible_height)
        .map(|row| viewport_line(canvas, row, scroll_state.x, visible_width))
        .collect();

    // Pad narrow trees so the root lands in the middle of the pane
    let left_pad = if canvas.width < visible_width {
        ((visible_width - canvas.width) / 2) as u16
    } else {
        0
    };
    let target = Rect {
        x: inner.x + left_pad,
        width: inner.width - left_pad,
        ..inner
    };

    frame.render_widget(Paragraph::new(lines), target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_tree;
    use crate::model::TreeNode;

    #[test]
    fn viewport_slices_columns() {
        let tree = TreeNode::with_children("+", vec![TreeNode::leaf("1"), TreeNode::leaf("2")]);
        let canvas = Canvas::draw(&layout_tree(&tree));
        let line = viewport_line(&canvas, 2, 1, 3);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "(1)");
        assert_eq!(line.spans.len(), 3);
    }
}
