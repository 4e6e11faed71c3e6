//! Character-cell rendering of a [`TreeLayout`]
//!
//! Node labels go on even rows (`2 * depth`). The odd row below a parent
//! carries the connector: a horizontal rule spanning the parent and its
//! children, with box-drawing junctions where vertical links meet it.

use super::tree::TreeLayout;
use rustc_hash::FxHashMap;

/// What a drawn cell belongs to, so the pane can style it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Bracket,
    Label,
    Edge,
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    cells: FxHashMap<(usize, usize), (char, CellKind)>,
}

impl Canvas {
    /// Rasterize every node and link of `layout`
    pub fn draw(layout: &TreeLayout) -> Self {
        let mut canvas = Canvas {
            width: layout.width,
            height: layout.max_depth * 2 + 1,
            cells: FxHashMap::default(),
        };

        for node in &layout.nodes {
            let row = node.depth * 2;
            let start = node.label_start();
            let label = node.label();
            let last = label.chars().count().saturating_sub(1);
            for (offset, c) in label.chars().enumerate() {
                let kind = if offset == 0 || offset == last {
                    CellKind::Bracket
                } else {
                    CellKind::Label
                };
                canvas.put(row, start + offset, c, kind);
            }
        }

        let mut children: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (parent, child) in layout.edges() {
            children.entry(parent).or_default().push(child);
        }

        for (parent, kids) in &children {
            let parent = &layout.nodes[*parent];
            let row = parent.depth * 2 + 1;
            let kid_columns: Vec<usize> = kids.iter().map(|&k| layout.nodes[k].center).collect();

            let lo = kid_columns.iter().copied().fold(parent.center, usize::min);
            let hi = kid_columns.iter().copied().fold(parent.center, usize::max);

            for col in lo..=hi {
                let glyph = junction(
                    col == parent.center,
                    kid_columns.contains(&col),
                    col > lo,
                    col < hi,
                );
                canvas.put(row, col, glyph, CellKind::Edge);
            }
        }

        canvas
    }

    fn put(&mut self, row: usize, col: usize, c: char, kind: CellKind) {
        if col >= self.width {
            self.width = col + 1;
        }
        self.cells.insert((row, col), (c, kind));
    }

    pub fn get(&self, row: usize, col: usize) -> Option<(char, CellKind)> {
        self.cells.get(&(row, col)).copied()
    }

    /// One row as plain text, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        let text: String = (0..self.width)
            .map(|col| self.get(row, col).map_or(' ', |(c, _)| c))
            .collect();
        text.trim_end().to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|row| self.row_text(row)).collect()
    }
}

/// Box-drawing character joining the given directions
fn junction(up: bool, down: bool, left: bool, right: bool) -> char {
    match (up, down, left, right) {
        (true, true, true, true) => '┼',
        (true, true, false, true) => '├',
        (true, true, true, false) => '┤',
        (true, true, false, false) => '│',
        (false, true, true, true) => '┬',
        (false, true, false, true) => '┌',
        (false, true, true, false) => '┐',
        (true, false, true, true) => '┴',
        (true, false, false, true) => '└',
        (true, false, true, false) => '┘',
        (false, true, false, false) | (true, false, false, false) => '│',
        _ => '─',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_tree;
    use crate::model::TreeNode;

    #[test]
    fn draws_binary_operator() {
        let tree = TreeNode::with_children("+", vec![TreeNode::leaf("1"), TreeNode::leaf("2")]);
        let canvas = Canvas::draw(&layout_tree(&tree));
        let lines = canvas.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim(), "(+)");
        assert_eq!(lines[1].trim(), "┌─┴──┐");
        assert_eq!(lines[2].trim(), "(1)  (2)");
    }

    #[test]
    fn only_child_hangs_straight_down() {
        let tree = TreeNode::with_children("expr", vec![TreeNode::leaf("x")]);
        let canvas = Canvas::draw(&layout_tree(&tree));
        assert_eq!(canvas.lines()[1].trim(), "│");
    }

    #[test]
    fn labels_are_tagged() {
        let canvas = Canvas::draw(&layout_tree(&TreeNode::leaf("id")));
        let row = canvas.row_text(0);
        let start = row.find('(').unwrap();
        assert_eq!(canvas.get(0, start), Some(('(', CellKind::Bracket)));
        assert_eq!(canvas.get(0, start + 1), Some(('i', CellKind::Label)));
    }
}
