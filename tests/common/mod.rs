// Shared helpers for the integration tests

#![allow(dead_code)]

use cppvis::client::{Backend, RequestError};
use cppvis::model::{ParseTree, Token};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// Backend that replays canned responses in order
#[derive(Default)]
pub struct ScriptedBackend {
    tokens: Mutex<VecDeque<Result<Vec<Token>, RequestError>>>,
    trees: Mutex<VecDeque<Result<ParseTree, RequestError>>>,
    /// Per-call delay for tokenize, by call index
    delays: Mutex<Vec<Duration>>,
    calls: AtomicUsize,
    pub received: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(self, result: Result<Vec<Token>, RequestError>) -> Self {
        self.tokens.lock().unwrap().push_back(result);
        self
    }

    pub fn with_tree(self, result: Result<ParseTree, RequestError>) -> Self {
        self.trees.lock().unwrap().push_back(result);
        self
    }

    pub fn with_delays(self, delays: Vec<Duration>) -> Self {
        *self.delays.lock().unwrap() = delays;
        self
    }
}

fn exhausted() -> RequestError {
    RequestError::Transport("no scripted response left".to_string())
}

impl Backend for ScriptedBackend {
    fn tokenize(&self, code: &str) -> Result<Vec<Token>, RequestError> {
        self.received.lock().unwrap().push(code.to_string());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        // Take the response before sleeping so responses map to call order
        let response = self.tokens.lock().unwrap().pop_front();
        let delay = self.delays.lock().unwrap().get(call).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        response.unwrap_or_else(|| Err(exhausted()))
    }

    fn parse(&self, code: &str) -> Result<ParseTree, RequestError> {
        self.received.lock().unwrap().push(code.to_string());
        self.trees
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }
}

/// The tokens a C++ tokenizer reports for `int main() { return 0; }`
pub fn main_tokens() -> Vec<Token> {
    vec![
        Token::new("keyword", "int"),
        Token::new("identifier", "main"),
        Token::new("punctuation", "("),
        Token::new("punctuation", ")"),
        Token::new("punctuation", "{"),
        Token::new("keyword", "return"),
        Token::new("number", "0"),
        Token::new("punctuation", ";"),
        Token::new("punctuation", "}"),
    ]
}

/// Screen content of a test terminal, one string per row
pub fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}
