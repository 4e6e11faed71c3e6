//! Main TUI application state and logic

use crate::editor::{EditorBuffer, Motion};
use crate::layout::{layout_tree, Canvas};
use crate::session::dispatch::Dispatcher;
use crate::session::{Action, Applied, Completion, Session};
use crate::ui::panes::{
    render_action_bar, render_editor_pane, render_status_bar, render_tokens_pane,
    render_tree_pane, ButtonState, EditorScrollState, StatusRenderData, TreeScrollState,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::info;

/// Which pane or button has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    AnalyzeButton,
    ParseButton,
    Tokens,
    Tree,
}

/// A region of the screen that may or may not be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Editor,
    Actions,
    Tokens,
    Tree,
}

/// Sections to lay out for the current state. The token table and the
/// tree only appear once they have something to show.
pub fn visible_sections(session: &Session) -> Vec<Section> {
    let mut sections = vec![Section::Editor, Section::Actions];
    if !session.tokens().is_empty() {
        sections.push(Section::Tokens);
    }
    if session.tree().is_some() {
        sections.push(Section::Tree);
    }
    sections
}

/// Screen rectangles for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub editor: Rect,
    pub actions: Rect,
    pub tokens: Option<Rect>,
    pub tree: Option<Rect>,
    pub status: Rect,
}

/// Split `area` for the given sections.
///
/// ```text
/// ┌ editor ──────────┬ tokens ┐
/// │                  │        │
/// ├ analyze ┬ parse ─┤        │
/// ├ tree ────────────┴────────┤
/// └ status ───────────────────┘
/// ```
pub fn layout_areas(area: Rect, sections: &[Section]) -> Areas {
    let has_tokens = sections.contains(&Section::Tokens);
    let has_tree = sections.contains(&Section::Tree);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (body, status) = (main_chunks[0], main_chunks[1]);

    let (top, tree) = if has_tree {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);
        (rows[0], Some(rows[1]))
    } else {
        (body, None)
    };

    let (left, tokens) = if has_tokens {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(top);
        (columns[0], Some(columns[1]))
    } else {
        (top, None)
    };

    let left_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(left);

    Areas {
        editor: left_rows[0],
        actions: left_rows[1],
        tokens,
        tree,
        status,
    }
}

struct TreeView {
    canvas: Canvas,
    root_center: usize,
}

/// The main application state
pub struct App {
    /// Source text, tokens and parse tree
    pub session: Session,

    /// Text being edited; mirrored into the session on every change
    pub editor: EditorBuffer,

    /// Currently focused pane or button
    pub focus: Focus,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    dispatcher: Dispatcher,
    backend_url: String,

    editor_scroll: EditorScrollState,
    token_scroll: usize,
    tree_scroll: TreeScrollState,

    /// Rasterized tree, rebuilt whenever the session's tree changes
    tree_view: Option<TreeView>,

    /// Frame counter for the pending spinner
    tick: usize,
}

impl App {
    pub fn new(session: Session, dispatcher: Dispatcher, backend_url: impl Into<String>) -> Self {
        let editor = EditorBuffer::from_text(session.source());
        App {
            session,
            editor,
            focus: Focus::Editor,
            should_quit: false,
            status_message: String::from("Ready!"),
            dispatcher,
            backend_url: backend_url.into(),
            editor_scroll: EditorScrollState::default(),
            token_scroll: 0,
            tree_scroll: TreeScrollState::default(),
            tree_view: None,
            tick: 0,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.process_completions();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key)
                    }
                    Event::Paste(text) => self.paste(&text),
                    _ => {}
                }
            }
            self.tick = self.tick.wrapping_add(1);
        }

        Ok(())
    }

    /// Fire the outbound request for `action` with the current source
    pub fn trigger(&mut self, action: Action) {
        let ticket = self.session.begin(action);
        info!(?action, seq = ticket.seq, "request triggered");
        self.dispatcher.submit(ticket, self.session.source().to_string());
        self.status_message = match action {
            Action::Analyze => "Analyzing...".to_string(),
            Action::Parse => "Parsing...".to_string(),
        };
    }

    /// Apply every completion that has arrived; returns how many there were
    pub fn process_completions(&mut self) -> usize {
        let completions = self.dispatcher.drain();
        let count = completions.len();
        for completion in completions {
            self.apply_completion(completion);
        }
        count
    }

    /// Block until one completion arrives (or `timeout` passes) and apply it
    pub fn await_completion(&mut self, timeout: Duration) -> bool {
        match self.dispatcher.wait(timeout) {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        let action = completion.ticket.action;
        match self.session.apply(completion) {
            Applied::Updated => match action {
                Action::Analyze => {
                    self.token_scroll = 0;
                    self.status_message = format!("Received {} tokens", self.session.tokens().len());
                }
                Action::Parse => {
                    self.rebuild_tree_view();
                    self.status_message = match self.session.tree() {
                        Some(tree) => format!("Parse tree with {} nodes", tree.node_count()),
                        None => "Parser returned an empty tree".to_string(),
                    };
                }
            },
            Applied::Failed(message) => self.status_message = message,
            Applied::Discarded => {}
        }
        self.normalize_focus();
    }

    fn rebuild_tree_view(&mut self) {
        self.tree_scroll.reset();
        self.tree_view = self.session.tree().map(|tree| {
            let layout = layout_tree(tree);
            let root_center = layout.nodes.first().map_or(0, |root| root.center);
            TreeView {
                canvas: Canvas::draw(&layout),
                root_center,
            }
        });
    }

    /// Focus targets in Tab order for the current state
    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Editor, Focus::AnalyzeButton, Focus::ParseButton];
        for section in visible_sections(&self.session) {
            match section {
                Section::Tokens => order.push(Focus::Tokens),
                Section::Tree => order.push(Focus::Tree),
                Section::Editor | Section::Actions => {}
            }
        }
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|&f| f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Move focus back to the editor if its pane disappeared
    fn normalize_focus(&mut self) {
        if !self.focus_order().contains(&self.focus) {
            self.focus = Focus::Editor;
        }
    }

    fn editor_changed(&mut self) {
        self.session.on_editor_change(Some(self.editor.text()));
    }

    fn paste(&mut self, text: &str) {
        if self.focus == Focus::Editor {
            // Terminals send \r for newlines inside bracketed paste
            self.editor.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
            self.editor_changed();
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let sections = visible_sections(&self.session);
        let areas = layout_areas(frame.area(), &sections);

        render_editor_pane(
            frame,
            areas.editor,
            &mut self.editor,
            self.focus == Focus::Editor,
            &mut self.editor_scroll,
        );

        let buttons = [
            ButtonState {
                action: Action::Analyze,
                hotkey: "F5",
                is_focused: self.focus == Focus::AnalyzeButton,
                is_pending: self.session.is_pending(Action::Analyze),
            },
            ButtonState {
                action: Action::Parse,
                hotkey: "F6",
                is_focused: self.focus == Focus::ParseButton,
                is_pending: self.session.is_pending(Action::Parse),
            },
        ];
        render_action_bar(frame, areas.actions, &buttons, self.tick / 4);

        if let Some(area) = areas.tokens {
            render_tokens_pane(
                frame,
                area,
                self.session.tokens(),
                self.focus == Focus::Tokens,
                &mut self.token_scroll,
            );
        }

        if let (Some(area), Some(view)) = (areas.tree, &self.tree_view) {
            render_tree_pane(
                frame,
                area,
                &view.canvas,
                view.root_center,
                self.focus == Focus::Tree,
                &mut self.tree_scroll,
            );
        }

        render_status_bar(
            frame,
            areas.status,
            StatusRenderData {
                message: &self.status_message,
                is_error: self
                    .session
                    .last_error()
                    .is_some_and(|err| err == self.status_message),
                analyzing: self.session.is_pending(Action::Analyze),
                parsing: self.session.is_pending(Action::Parse),
                backend_url: &self.backend_url,
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(5) => return self.trigger(Action::Analyze),
            KeyCode::F(6) => return self.trigger(Action::Parse),
            KeyCode::Esc => {
                let cancelled = self.session.cancel_all();
                if cancelled > 0 {
                    self.status_message = format!("Cancelled {} request(s)", cancelled);
                }
                return;
            }
            KeyCode::Tab => return self.cycle_focus(true),
            KeyCode::BackTab => return self.cycle_focus(false),
            _ => {}
        }

        match self.focus {
            Focus::Editor => self.handle_editor_key(key, ctrl),
            Focus::AnalyzeButton | Focus::ParseButton => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let action = if self.focus == Focus::AnalyzeButton {
                        Action::Analyze
                    } else {
                        Action::Parse
                    };
                    self.trigger(action);
                }
            }
            Focus::Tokens => match key.code {
                KeyCode::Up => self.token_scroll = self.token_scroll.saturating_sub(1),
                KeyCode::Down => self.token_scroll = self.token_scroll.saturating_add(1),
                KeyCode::PageUp => self.token_scroll = self.token_scroll.saturating_sub(10),
                KeyCode::PageDown => self.token_scroll = self.token_scroll.saturating_add(10),
                KeyCode::Home => self.token_scroll = 0,
                // Clamped to the last page on the next render
                KeyCode::End => self.token_scroll = usize::MAX,
                _ => {}
            },
            Focus::Tree => match key.code {
                KeyCode::Up => self.tree_scroll.y = self.tree_scroll.y.saturating_sub(1),
                KeyCode::Down => self.tree_scroll.y = self.tree_scroll.y.saturating_add(1),
                KeyCode::Left => self.tree_scroll.x = self.tree_scroll.x.saturating_sub(2),
                KeyCode::Right => self.tree_scroll.x = self.tree_scroll.x.saturating_add(2),
                KeyCode::Home => self.tree_scroll.reset(),
                _ => {}
            },
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent, ctrl: bool) {
        let changed = match key.code {
            KeyCode::Char(c) if !ctrl => {
                self.editor.insert_char(c);
                true
            }
            KeyCode::Enter => {
                self.editor.insert_newline();
                true
            }
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.motion(Motion::Left),
            KeyCode::Right => self.motion(Motion::Right),
            KeyCode::Up => self.motion(Motion::Up),
            KeyCode::Down => self.motion(Motion::Down),
            KeyCode::Home => self.motion(Motion::LineStart),
            KeyCode::End => self.motion(Motion::LineEnd),
            _ => false,
        };

        if changed {
            self.editor_changed();
        }
    }

    /// Move the cursor; never a content change
    fn motion(&mut self, motion: Motion) -> bool {
        self.editor.move_cursor(motion);
        false
    }
}
