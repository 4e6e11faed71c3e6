// Request/response flow through the app with a scripted backend

mod common;

use common::{main_tokens, ScriptedBackend};
use cppvis::client::RequestError;
use cppvis::model::{Token, TreeNode};
use cppvis::session::dispatch::Dispatcher;
use cppvis::session::{Action, Session};
use cppvis::ui::app::{visible_sections, Section};
use cppvis::ui::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn app_with(backend: Arc<ScriptedBackend>, source: &str) -> App {
    App::new(
        Session::new(source),
        Dispatcher::new(backend),
        "http://backend.test",
    )
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn typed_text_reaches_session_verbatim() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut app = app_with(backend, "");

    let typed = "int x = 1;\n  if (x) { return \"é\\t\"; }  ";
    for c in typed.chars() {
        if c == '\n' {
            press(&mut app, KeyCode::Enter);
        } else {
            press(&mut app, KeyCode::Char(c));
        }
    }
    assert_eq!(app.session.source(), typed);

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.session.source(), &typed[..typed.len() - 1]);
}

#[test]
fn analyze_replaces_token_list_in_order() {
    let backend = Arc::new(ScriptedBackend::new().with_tokens(Ok(main_tokens())));
    let mut app = app_with(backend.clone(), "int main() { return 0; }");

    press(&mut app, KeyCode::F(5));
    assert!(app.session.is_pending(Action::Analyze));
    assert!(app.await_completion(WAIT));

    assert_eq!(app.session.tokens(), main_tokens().as_slice());
    assert!(!app.session.is_pending(Action::Analyze));
    assert_eq!(
        backend.received.lock().unwrap().as_slice(),
        ["int main() { return 0; }"]
    );
    assert!(visible_sections(&app.session).contains(&Section::Tokens));
}

#[test]
fn failed_analyze_keeps_previous_tokens() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_tokens(Ok(vec![Token::new("identifier", "x")]))
            .with_tokens(Err(RequestError::Status {
                code: 500,
                detail: None,
            })),
    );
    let mut app = app_with(backend, "x");

    app.trigger(Action::Analyze);
    assert!(app.await_completion(WAIT));
    app.trigger(Action::Analyze);
    assert!(app.await_completion(WAIT));

    assert_eq!(app.session.tokens(), &[Token::new("identifier", "x")]);
    assert!(app.status_message.contains("500"));
    assert_eq!(app.session.last_error(), Some(app.status_message.as_str()));
}

#[test]
fn failed_analyze_on_empty_list_stays_empty() {
    let backend = Arc::new(
        ScriptedBackend::new().with_tokens(Err(RequestError::Transport("refused".into()))),
    );
    let mut app = app_with(backend, "x");

    app.trigger(Action::Analyze);
    assert!(app.await_completion(WAIT));

    assert!(app.session.tokens().is_empty());
    assert!(!visible_sections(&app.session).contains(&Section::Tokens));
}

#[test]
fn empty_token_list_hides_table() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_tokens(Ok(main_tokens()))
            .with_tokens(Ok(Vec::new())),
    );
    let mut app = app_with(backend, "int main() { return 0; }");

    app.trigger(Action::Analyze);
    assert!(app.await_completion(WAIT));
    app.focus = cppvis::ui::app::Focus::Tokens;

    app.trigger(Action::Analyze);
    assert!(app.await_completion(WAIT));

    assert!(!visible_sections(&app.session).contains(&Section::Tokens));
    assert_eq!(app.focus, cppvis::ui::app::Focus::Editor);
}

#[test]
fn parse_tree_and_empty_tree() {
    let tree = TreeNode::with_children("+", vec![TreeNode::leaf("1"), TreeNode::leaf("2")]);
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_tree(Ok(Some(tree.clone())))
            .with_tree(Ok(None)),
    );
    let mut app = app_with(backend, "1 + 2");

    press(&mut app, KeyCode::F(6));
    assert!(app.await_completion(WAIT));
    assert_eq!(app.session.tree(), Some(&tree));
    assert!(visible_sections(&app.session).contains(&Section::Tree));

    press(&mut app, KeyCode::F(6));
    assert!(app.await_completion(WAIT));
    assert!(app.session.tree().is_none());
    assert!(!visible_sections(&app.session).contains(&Section::Tree));
}

#[test]
fn analyze_failure_does_not_touch_tree() {
    let tree = TreeNode::leaf("7");
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_tree(Ok(Some(tree.clone())))
            .with_tokens(Err(RequestError::Transport("refused".into()))),
    );
    let mut app = app_with(backend, "7");

    app.trigger(Action::Parse);
    app.trigger(Action::Analyze);
    assert!(app.await_completion(WAIT));
    assert!(app.await_completion(WAIT));

    assert_eq!(app.session.tree(), Some(&tree));
    assert!(app.session.tokens().is_empty());
}

#[test]
fn latest_request_wins_over_slow_earlier_one() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_tokens(Ok(vec![Token::new("identifier", "old")]))
            .with_tokens(Ok(vec![Token::new("identifier", "new")]))
            .with_delays(vec![Duration::from_millis(200), Duration::ZERO]),
    );
    let mut app = app_with(backend, "x");

    app.trigger(Action::Analyze);
    // Make sure the first worker has taken its response before the second starts
    std::thread::sleep(Duration::from_millis(50));
    app.trigger(Action::Analyze);

    assert!(app.await_completion(WAIT));
    assert!(app.await_completion(WAIT));
    assert_eq!(app.session.tokens(), &[Token::new("identifier", "new")]);
}

#[test]
fn escape_cancels_outstanding_requests() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_tokens(Ok(main_tokens()))
            .with_delays(vec![Duration::from_millis(100)]),
    );
    let mut app = app_with(backend, "int main() { return 0; }");

    app.trigger(Action::Analyze);
    press(&mut app, KeyCode::Esc);
    assert!(!app.session.is_pending(Action::Analyze));

    assert!(app.await_completion(WAIT));
    assert!(app.session.tokens().is_empty());
}

#[test]
fn buttons_trigger_through_focus() {
    let backend = Arc::new(ScriptedBackend::new().with_tree(Ok(Some(TreeNode::leaf("1")))));
    let mut app = app_with(backend, "1");

    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, cppvis::ui::app::Focus::ParseButton);
    press(&mut app, KeyCode::Enter);
    assert!(app.await_completion(WAIT));
    assert!(app.session.tree().is_some());

    // Typing while a button is focused does not edit the source
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.session.source(), "1");
}
