//! Vertical node-link layout
//!
//! Each subtree is given a horizontal span wide enough for its own label and
//! for all of its children side by side. Leaves sit in the middle of their
//! span; a parent sits halfway between its first and last child. Depth maps
//! directly to the diagram row.

use crate::model::TreeNode;

/// Blank columns kept between neighboring subtrees
const NODE_GAP: usize = 2;

/// A node after layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedNode {
    pub name: String,
    pub depth: usize,
    /// Column of the node's center
    pub center: usize,
    /// Index of the parent in [`TreeLayout::nodes`]
    pub parent: Option<usize>,
}

impl PlacedNode {
    /// Text drawn for the node
    pub fn label(&self) -> String {
        format!("({})", self.name)
    }

    /// First column of the label
    pub fn label_start(&self) -> usize {
        self.center.saturating_sub(label_width(&self.name) / 2)
    }
}

/// Every node of a tree with its position, in pre-order
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    /// Columns needed to draw the whole tree
    pub width: usize,
    /// Deepest level, the root being 0
    pub max_depth: usize,
}

impl TreeLayout {
    /// (parent, child) index pairs, one per link
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.parent.map(|parent| (parent, idx)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

fn label_width(name: &str) -> usize {
    name.chars().count() + 2
}

/// Per-node scratch data. Indices are pre-order, so every child comes after
/// its parent and a reverse pass visits children first.
struct Slot<'a> {
    node: &'a TreeNode,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    width: usize,
    left: usize,
    center: usize,
}

fn flatten(root: &TreeNode) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot> = Vec::with_capacity(root.node_count());
    let mut pending: Vec<(&TreeNode, usize, Option<usize>)> = vec![(root, 0, None)];
    while let Some((node, depth, parent)) = pending.pop() {
        let idx = slots.len();
        if let Some(parent) = parent {
            slots[parent].children.push(idx);
        }
        slots.push(Slot {
            node,
            depth,
            parent,
            children: Vec::with_capacity(node.children.len()),
            width: 0,
            left: 0,
            center: 0,
        });
        pending.extend(
            node.children
                .iter()
                .rev()
                .map(|child| (child, depth + 1, Some(idx))),
        );
    }
    slots
}

fn children_width(slots: &[Slot], idx: usize) -> usize {
    slots[idx].children.iter().map(|&c| slots[c].width).sum()
}

/// Lay out `root` and all of its descendants
pub fn layout_tree(root: &TreeNode) -> TreeLayout {
    let mut slots = flatten(root);

    // Span widths, bottom up
    for idx in (0..slots.len()).rev() {
        let own = label_width(&slots[idx].node.name) + NODE_GAP;
        slots[idx].width = own.max(children_width(&slots, idx));
    }

    // Children packed side by side in the middle of the parent's span
    for idx in 0..slots.len() {
        let mut x = slots[idx].left + (slots[idx].width - children_width(&slots, idx)) / 2;
        for k in 0..slots[idx].children.len() {
            let child = slots[idx].children[k];
            slots[child].left = x;
            x += slots[child].width;
        }
    }

    // Centers, bottom up: leaves in the middle of their span, parents halfway
    // between their outer children
    for idx in (0..slots.len()).rev() {
        let slot = &slots[idx];
        let center = match (slot.children.first(), slot.children.last()) {
            (Some(&first), Some(&last)) => {
                let mid = (slots[first].center + slots[last].center) / 2;

                // Keep the label inside this subtree's span
                let label = label_width(&slot.node.name);
                let half = label / 2;
                let lo = slot.left + half;
                let hi = (slot.left + slot.width).saturating_sub(label - half);
                if lo <= hi {
                    mid.clamp(lo, hi)
                } else {
                    mid
                }
            }
            _ => slot.left + slot.width / 2,
        };
        slots[idx].center = center;
    }

    TreeLayout {
        width: slots.first().map_or(0, |root| root.width),
        max_depth: slots.iter().map(|slot| slot.depth).max().unwrap_or(0),
        nodes: slots
            .into_iter()
            .map(|slot| PlacedNode {
                name: slot.node.name.clone(),
                depth: slot.depth,
                center: slot.center,
                parent: slot.parent,
            })
            .collect(),
    }
}
