//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]** — application state, keyboard event loop, focus, request dispatch
//! - **[`panes`]** — render functions for each visible pane (editor, action bar,
//!   token table, parse tree, status bar)
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Session`] and a
//! [`Dispatcher`], then call [`App::run`] to start the event loop.
//!
//! [`Session`]: crate::session::Session
//! [`Dispatcher`]: crate::session::dispatch::Dispatcher
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
