//! # Introduction
//!
//! cppvis is a terminal client for a remote C++ analysis service. The user
//! types code into an editor pane and asks the service to tokenize or parse
//! it; the returned token list and parse tree are shown next to the editor.
//! All lexing and parsing happens in the service; this crate only displays
//! what comes back.
//!
//! ## Data flow
//!
//! ```text
//! Editor → Session → Dispatcher → Backend (HTTP) → Completion → Session → TUI
//! ```
//!
//! 1. [`editor`] — line buffer with a cursor; every edit is mirrored into the
//!    session as the full source text.
//! 2. [`session`] — the single owner of source text, token list and parse
//!    tree, plus request bookkeeping so only the latest response lands.
//! 3. [`client`] — the [`client::Backend`] trait and its HTTP implementation.
//! 4. [`layout`] — vertical node-link layout for the parse tree.
//! 5. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! ## Endpoints
//!
//! `POST /tokenize` and `POST /parse`, both with body `{"code": "..."}`.

pub mod client;
pub mod config;
pub mod editor;
pub mod layout;
pub mod model;
pub mod session;
pub mod ui;
