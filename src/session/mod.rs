//! Session state shared by every pane
//!
//! [`Session`] owns the source text, the token list and the parse tree. The
//! setter methods below are the only way to change them:
//!
//! - [`Session::on_editor_change`] replaces the source text wholesale
//! - [`Session::begin`] issues a request ticket for an action
//! - [`Session::apply`] folds a finished request back into the state
//!
//! A completion only lands if its ticket is still the latest one issued for
//! that action. Failures leave the previous data on screen.

pub mod dispatch;

use crate::client::RequestError;
use crate::model::{ParseTree, Token, TreeNode, PLACEHOLDER_SOURCE};
use tracing::{debug, error, info};

/// A user-triggered request kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Analyze,
    Parse,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Analyze => "Analyze",
            Action::Parse => "Parse",
        }
    }
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub action: Action,
    pub seq: u64,
}

/// Data a successful request produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Tokens(Vec<Token>),
    Tree(ParseTree),
}

/// A finished request, successful or not
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: RequestTicket,
    pub result: Result<Outcome, RequestError>,
}

/// What [`Session::apply`] did with a completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The display state was replaced
    Updated,
    /// The request failed; previous state kept
    Failed(String),
    /// A newer request was issued or the request was cancelled
    Discarded,
}

#[derive(Debug, Default, Clone, Copy)]
struct RequestSlot {
    issued: u64,
    in_flight: Option<u64>,
}

impl RequestSlot {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.issued
    }

    /// Claim the in-flight slot for `seq`; false if `seq` is no longer relevant
    fn settle(&mut self, seq: u64) -> bool {
        if self.in_flight == Some(seq) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }
}

/// In-memory state of one editing session
#[derive(Debug)]
pub struct Session {
    source: String,
    tokens: Vec<Token>,
    tree: ParseTree,
    analyze: RequestSlot,
    parse: RequestSlot,
    last_error: Option<String>,
}

impl Session {
    /// Start a session with the given source text
    pub fn new(source: impl Into<String>) -> Self {
        Session {
            source: source.into(),
            tokens: Vec::new(),
            tree: None,
            analyze: RequestSlot::default(),
            parse: RequestSlot::default(),
            last_error: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Message of the most recent failed request, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the source text with the editor's full content.
    ///
    /// A `None` payload keeps the previous text.
    pub fn on_editor_change(&mut self, content: Option<String>) {
        if let Some(text) = content {
            self.source = text;
        }
    }

    /// Whether a request for `action` is outstanding
    pub fn is_pending(&self, action: Action) -> bool {
        self.slot(action).in_flight.is_some()
    }

    /// Issue a new ticket for `action`. Any earlier outstanding request for
    /// the same action becomes irrelevant.
    pub fn begin(&mut self, action: Action) -> RequestTicket {
        let seq = self.slot_mut(action).issue();
        debug!(?action, seq, "request issued");
        RequestTicket { action, seq }
    }

    /// Forget every outstanding request; their completions will be discarded
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for slot in [&mut self.analyze, &mut self.parse] {
            if slot.in_flight.take().is_some() {
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            info!(cancelled, "outstanding requests cancelled");
        }
        cancelled
    }

    /// Fold a finished request into the session
    pub fn apply(&mut self, completion: Completion) -> Applied {
        let RequestTicket { action, seq } = completion.ticket;

        if !self.slot_mut(action).settle(seq) {
            debug!(?action, seq, "stale response discarded");
            return Applied::Discarded;
        }

        match (action, completion.result) {
            (Action::Analyze, Ok(Outcome::Tokens(tokens))) => {
                info!(count = tokens.len(), "token list updated");
                self.tokens = tokens;
                self.last_error = None;
                Applied::Updated
            }
            (Action::Parse, Ok(Outcome::Tree(tree))) => {
                info!(
                    nodes = tree.as_ref().map_or(0, TreeNode::node_count),
                    "parse tree updated"
                );
                self.tree = tree;
                self.last_error = None;
                Applied::Updated
            }
            (_, Ok(outcome)) => {
                error!(?action, ?outcome, "response does not match its request");
                Applied::Discarded
            }
            (_, Err(err)) => {
                error!(?action, seq, error = %err, "request failed");
                let message = format!("{} failed: {}", action.label(), err);
                self.last_error = Some(message.clone());
                Applied::Failed(message)
            }
        }
    }

    fn slot(&self, action: Action) -> &RequestSlot {
        match action {
            Action::Analyze => &self.analyze,
            Action::Parse => &self.parse,
        }
    }

    fn slot_mut(&mut self, action: Action) -> &mut RequestSlot {
        match action {
            Action::Analyze => &mut self.analyze,
            Action::Parse => &mut self.parse,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PLACEHOLDER_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_done(ticket: RequestTicket, tokens: Vec<Token>) -> Completion {
        Completion {
            ticket,
            result: Ok(Outcome::Tokens(tokens)),
        }
    }

    #[test]
    fn starts_with_placeholder_and_no_data() {
        let session = Session::default();
        assert_eq!(session.source(), PLACEHOLDER_SOURCE);
        assert!(session.tokens().is_empty());
        assert!(session.tree().is_none());
    }

    #[test]
    fn missing_change_payload_keeps_text() {
        let mut session = Session::new("int x;");
        session.on_editor_change(None);
        assert_eq!(session.source(), "int x;");
    }

    #[test]
    fn older_response_loses_to_newer_request() {
        let mut session = Session::default();
        let first = session.begin(Action::Analyze);
        let second = session.begin(Action::Analyze);

        let applied = session.apply(tokens_done(second, vec![Token::new("keyword", "int")]));
        assert_eq!(applied, Applied::Updated);

        let applied = session.apply(tokens_done(first, vec![Token::new("identifier", "x")]));
        assert_eq!(applied, Applied::Discarded);
        assert_eq!(session.tokens(), &[Token::new("keyword", "int")]);
    }

    #[test]
    fn cancelled_request_is_discarded() {
        let mut session = Session::default();
        let ticket = session.begin(Action::Parse);
        assert!(session.is_pending(Action::Parse));
        assert_eq!(session.cancel_all(), 1);
        assert!(!session.is_pending(Action::Parse));

        let applied = session.apply(Completion {
            ticket,
            result: Ok(Outcome::Tree(Some(TreeNode::leaf("1")))),
        });
        assert_eq!(applied, Applied::Discarded);
        assert!(session.tree().is_none());
    }

    #[test]
    fn actions_do_not_share_slots() {
        let mut session = Session::default();
        let analyze = session.begin(Action::Analyze);
        let parse = session.begin(Action::Parse);

        let failed = session.apply(Completion {
            ticket: parse,
            result: Err(RequestError::Transport("refused".into())),
        });
        assert!(matches!(failed, Applied::Failed(_)));
        assert!(session.is_pending(Action::Analyze));

        let applied = session.apply(tokens_done(analyze, vec![Token::new("number", "0")]));
        assert_eq!(applied, Applied::Updated);
        assert!(session.last_error().is_none());
    }
}
