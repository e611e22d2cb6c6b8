use hicolor_core::Color;

use crate::quantizer::Quantizer;

const MAX_DEPTH: u8 = 7;

#[derive(Debug, Clone)]
struct OctreeNode {
    children: [Option<usize>; 8],
    r_sum: u64,
    g_sum: u64,
    b_sum: u64,
    reference_count: u64,
}

impl OctreeNode {
    fn leaf() -> Self {
        OctreeNode {
            children: [None; 8],
            r_sum: 0,
            g_sum: 0,
            b_sum: 0,
            reference_count: 0,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Value-based arena of octree nodes; root is index 0 and never freed
/// (spec §9 "shared mutable octree").
struct Octree {
    nodes: Vec<OctreeNode>,
}

fn child_index(color: Color, depth: u8) -> usize {
    let shift = 7 - depth;
    let bit = |v: u8| ((v >> shift) & 1) as usize;
    (bit(color.r) << 2) | (bit(color.g) << 1) | bit(color.b)
}

impl Octree {
    fn new() -> Self {
        Octree {
            nodes: vec![OctreeNode::leaf()],
        }
    }

    fn insert(&mut self, color: Color, count: u32) {
        let mut node_idx = 0usize;
        for depth in 0..MAX_DEPTH {
            let idx = child_index(color, depth);
            let child = self.nodes[node_idx].children[idx];
            let child_idx = match child {
                Some(i) => i,
                None => {
                    self.nodes.push(OctreeNode::leaf());
                    let new_idx = self.nodes.len() - 1;
                    self.nodes[node_idx].children[idx] = Some(new_idx);
                    new_idx
                }
            };
            node_idx = child_idx;
        }
        let leaf = &mut self.nodes[node_idx];
        leaf.r_sum += color.r as u64 * count as u64;
        leaf.g_sum += color.g as u64 * count as u64;
        leaf.b_sum += color.b as u64 * count as u64;
        leaf.reference_count += count as u64;
    }

    fn leaf_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf() && n.reference_count > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// One reduction step: find the reducible node (an internal node all
    /// of whose children are leaves) with the smallest summed leaf
    /// reference count, and merge its children into it.
    fn reduce_once(&mut self) -> bool {
        let mut best: Option<(usize, u64)> = None;
        for idx in 0..self.nodes.len() {
            if self.nodes[idx].is_leaf() {
                continue;
            }
            let children: Vec<usize> = self.nodes[idx].children.iter().flatten().copied().collect();
            if !children.iter().all(|&c| self.nodes[c].is_leaf()) {
                continue;
            }
            let total: u64 = children.iter().map(|&c| self.nodes[c].reference_count).sum();
            if best.map_or(true, |(_, best_total)| total < best_total) {
                best = Some((idx, total));
            }
        }

        let Some((parent_idx, _)) = best else {
            return false;
        };

        let children: Vec<usize> = self.nodes[parent_idx].children.iter().flatten().copied().collect();
        let mut r_sum = 0u64;
        let mut g_sum = 0u64;
        let mut b_sum = 0u64;
        let mut reference_count = 0u64;
        for &c in &children {
            let node = &self.nodes[c];
            r_sum += node.r_sum;
            g_sum += node.g_sum;
            b_sum += node.b_sum;
            reference_count += node.reference_count;
        }

        let parent = &mut self.nodes[parent_idx];
        parent.children = [None; 8];
        parent.r_sum = r_sum;
        parent.g_sum = g_sum;
        parent.b_sum = b_sum;
        parent.reference_count = reference_count;
        true
    }

    fn leaf_color(&self, idx: usize) -> Color {
        let node = &self.nodes[idx];
        let total = node.reference_count.max(1);
        Color::rgb(
            (node.r_sum / total) as u8,
            (node.g_sum / total) as u8,
            (node.b_sum / total) as u8,
        )
    }
}

/// Octree merging quantizer (spec §4.C.1).
pub struct OctreeQuantizer;

impl Quantizer for OctreeQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut tree = Octree::new();
        for (color, count) in entries {
            tree.insert(*color, *count);
        }

        // Reserve indices 0-1 for black/white, per spec.
        let leaf_budget = (target as usize).saturating_sub(2).max(1);

        while tree.leaf_indices().len() > leaf_budget {
            if !tree.reduce_once() {
                break;
            }
        }

        let mut colors = vec![Color::BLACK, Color::WHITE];
        for idx in tree.leaf_indices() {
            colors.push(tree.leaf_color(idx));
        }
        colors
    }
}
