//! Editor pane rendering with syntax highlighting
//!
//! Renders the [`EditorBuffer`] with line numbers, a highlighted cursor line
//! and a light keyword-based coloring. The coloring is cosmetic only: it is a
//! character scanner, not a lexer, and never feeds into the analysis.

use crate::editor::EditorBuffer;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;

/// Width of the line-number gutter
const GUTTER_WIDTH: u16 = 5;

/// Tab stops every this many columns
const TAB_WIDTH: usize = 4;

fn char_advance(c: char, column: usize) -> usize {
    match c {
        '\t' => TAB_WIDTH - column % TAB_WIDTH,
        c => c.width().unwrap_or(0),
    }
}

/// Terminal column at which the `col`-th character of `line` is drawn
pub fn display_column(line: &str, col: usize) -> usize {
    line.chars()
        .take(col)
        .fold(0, |column, c| column + char_advance(c, column))
}

/// `line` with tabs replaced by spaces up to the next tab stop
fn expand_tabs(line: &str) -> Cow<'_, str> {
    if !line.contains('\t') {
        return Cow::Borrowed(line);
    }
    let mut expanded = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.chars() {
        let advance = char_advance(c, column);
        if c == '\t' {
            expanded.extend(std::iter::repeat(' ').take(advance));
        } else {
            expanded.push(c);
        }
        column += advance;
    }
    Cow::Owned(expanded)
}

/// Simple syntax highlighting for C++ source
fn highlight_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];

        // Line comments swallow the rest of the line
        if c == '/' && chars.get(i + 1).is_some_and(|&(_, next)| next == '/') {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                &line[byte..],
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            end = (end + 1).min(chars.len());
            let end_byte = chars.get(end).map_or(line.len(), |&(b, _)| b);
            spans.push(Span::styled(
                &line[byte..end_byte],
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut spans, &mut current_word, c == '(');
            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                '+' | '-' | '*' | '/' | '=' | '&' | '|' | '!' | '<' | '>' | '%' => {
                    Style::default().fg(DEFAULT_THEME.operator)
                }
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'_>>, word: &mut String, is_call: bool) {
    if word.is_empty() {
        return;
    }
    let style = word_style(word, is_call);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "float" | "double" | "long" | "short" | "unsigned"
        | "signed" | "auto" | "const" => Style::default().fg(DEFAULT_THEME.type_name),
        "return" | "if" | "else" | "while" | "for" | "do" | "switch" | "case" | "default"
        | "break" | "continue" | "struct" | "class" | "namespace" | "using" | "template"
        | "typename" | "new" | "delete" | "public" | "private" | "protected" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "true" | "false" | "nullptr" | "NULL" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Horizontal scroll state for the editor pane
#[derive(Debug, Default)]
pub struct EditorScrollState {
    pub horizontal: usize,
}

/// Render the editor pane and place the terminal cursor when focused
pub fn render_editor_pane(
    frame: &mut Frame,
    area: Rect,
    buffer: &mut EditorBuffer,
    is_focused: bool,
    scroll_state: &mut EditorScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(GUTTER_WIDTH), Constraint::Min(1)])
        .split(inner);
    let (gutter, content) = (columns[0], columns[1]);

    let visible_height = content.height.max(1) as usize;
    let first = buffer.visible_from(visible_height);
    let (cursor_row, cursor_col) = buffer.cursor();
    let cursor_x = display_column(&buffer.lines()[cursor_row], cursor_col);

    // Keep the cursor column on screen
    let visible_width = content.width.max(1) as usize;
    if cursor_x < scroll_state.horizontal {
        scroll_state.horizontal = cursor_x;
    } else if cursor_x >= scroll_state.horizontal + visible_width {
        scroll_state.horizontal = cursor_x + 1 - visible_width;
    }

    let shown: Vec<Cow<str>> = buffer
        .lines()
        .iter()
        .skip(first)
        .take(visible_height)
        .map(|line| expand_tabs(line))
        .collect();

    let mut numbers = Vec::new();
    let mut lines = Vec::new();
    for (idx, text) in shown.iter().enumerate().map(|(i, text)| (first + i, text)) {
        let is_current = idx == cursor_row;
        let number_style = if is_current {
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };
        numbers.push(Line::from(Span::styled(
            format!("{:>4} ", idx + 1),
            number_style,
        )));

        let mut line = highlight_line(text);
        if is_current && is_focused {
            line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
        }
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(numbers), gutter);
    frame.render_widget(
        Paragraph::new(lines).scroll((0, scroll_state.horizontal as u16)),
        content,
    );

    if is_focused {
        let x = content.x + (cursor_x - scroll_state.horizontal) as u16;
        let y = content.y + (cursor_row - first) as u16;
        frame.set_cursor_position((x, y));
    }
}
