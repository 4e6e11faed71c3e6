//! Status bar rendering with keybindings and request indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows for one frame
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub is_error: bool,
    pub analyzing: bool,
    pub parsing: bool,
    pub backend_url: &'a str,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let badge = if data.is_error {
        (" ERROR ", DEFAULT_THEME.error)
    } else if data.analyzing || data.parsing {
        (" BUSY ", DEFAULT_THEME.secondary)
    } else {
        (" READY ", DEFAULT_THEME.success)
    };

    let left_spans = vec![
        Span::styled(
            badge.0,
            Style::default()
                .bg(badge.1)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", data.backend_url),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if data.is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" F5 ", key_style),
        Span::styled(" analyze ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" F6 ", key_style),
        Span::styled(" parse ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ⇥ ", key_style),
        Span::styled(" focus ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" esc ", key_style),
        Span::styled(" cancel ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ^Q ", key_style),
        Span::styled(" quit ", desc_style),
    ];

    for (active, label) in [(data.analyzing, " ⟳ ANALYZE "), (data.parsing, " ⟳ PARSE ")] {
        if active {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(
                label,
                Style::default()
                    .bg(DEFAULT_THEME.secondary)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
