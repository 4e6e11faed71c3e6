//! TUI pane rendering modules
//!
//! Each pane module exports a primary `render_*` function plus whatever
//! scroll state it needs between frames.
//!
//! # Pane Modules
//!
//! - [`editor`]: Source editor with line numbers and keyword coloring
//! - [`actions`]: Analyze / Parse buttons with pending indicators
//! - [`tokens`]: Token table, one row per token
//! - [`tree`]: Parse tree node-link diagram
//! - [`status`]: Status bar with keybindings and request state

pub mod actions;
pub mod editor;
pub mod status;
pub mod tokens;
pub mod tree;

// Re-export render functions for convenience
pub use actions::{render_action_bar, ButtonState};
pub use editor::{render_editor_pane, EditorScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tokens::render_tokens_pane;
pub use tree::{render_tree_pane, TreeScrollState};
