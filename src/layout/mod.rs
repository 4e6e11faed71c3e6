//! Geometry for the parse tree diagram
//!
//! - [`tree`]: assigns every node a column and a depth
//! - [`canvas`]: rasterizes a laid-out tree into character cells

pub mod canvas;
pub mod tree;

pub use canvas::{Canvas, CellKind};
pub use tree::{layout_tree, PlacedNode, TreeLayout};
