//! Action bar with the Analyze and Parse buttons

use crate::session::Action;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// State of one button for a single frame
pub struct ButtonState {
    pub action: Action,
    pub hotkey: &'static str,
    pub is_focused: bool,
    pub is_pending: bool,
}

impl ButtonState {
    fn caption(&self, tick: usize) -> String {
        if self.is_pending {
            format!("{} {} Code…", SPINNER[tick % SPINNER.len()], self.action.label())
        } else {
            format!("{} Code [{}]", self.action.label(), self.hotkey)
        }
    }
}

/// Render both buttons side by side; `tick` animates the pending spinner
pub fn render_action_bar(frame: &mut Frame, area: Rect, buttons: &[ButtonState; 2], tick: usize) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (button, slot) in buttons.iter().zip(halves.iter()) {
        let (border, text) = if button.is_focused {
            (
                Style::default()
                    .fg(DEFAULT_THEME.border_focused)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .bg(DEFAULT_THEME.primary)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
        } else if button.is_pending {
            (
                Style::default().fg(DEFAULT_THEME.secondary),
                Style::default().fg(DEFAULT_THEME.secondary),
            )
        } else {
            (
                Style::default().fg(DEFAULT_THEME.border_normal),
                Style::default().fg(DEFAULT_THEME.primary),
            )
        };

        let paragraph = Paragraph::new(button.caption(tick))
            .alignment(Alignment::Center)
            .style(text)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(paragraph, *slot);
    }
}
