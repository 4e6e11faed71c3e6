//! Token table rendering

use crate::model::Token;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Padding, Row, Table},
    Frame,
};
use std::borrow::Cow;

/// Render the token table: a `Type`/`Value` header and one row per token,
/// in the order the tokenizer reported them.
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Tokens ({}) ", tokens.len()))
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    // Borders (2) plus the header row
    let visible_height = area.height.saturating_sub(3).max(1) as usize;

    if tokens.len() > visible_height {
        let max_scroll = tokens.len() - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let header = Row::new(vec![Cell::from("Type"), Cell::from("Value")]).style(
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = tokens
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|token| {
            Row::new(vec![
                Cell::from(escape_control(&token.kind))
                    .style(Style::default().fg(DEFAULT_THEME.token_color(token.class()))),
                Cell::from(escape_control(&token.value))
                    .style(Style::default().fg(DEFAULT_THEME.fg)),
            ])
        })
        .collect();

    let type_width = tokens
        .iter()
        .map(|token| escape_control(&token.kind).chars().count())
        .max()
        .unwrap_or(0)
        .max("Type".len()) as u16;

    let table = Table::new(rows, [Constraint::Length(type_width), Constraint::Min(5)])
        .header(header)
        .column_spacing(2)
        .block(block);
    frame.render_widget(table, area);
}

/// Spell out control characters so a token stays on its row. A string
/// literal containing a newline would otherwise break the table apart.
pub fn escape_control(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.extend(c.escape_unicode()),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_control("\"hi\""), Cow::Borrowed("\"hi\"")));
    }

    #[test]
    fn control_characters_are_spelled_out() {
        assert_eq!(escape_control("\"a\nb\""), "\"a\\nb\"");
        assert_eq!(escape_control("x\r\ty"), "x\\r\\ty");
        assert_eq!(escape_control("\u{7}"), "\\u{7}");
    }
}
