use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::engine::config::TieBreak;
use crate::engine::symbols::{FrequencyTable, Symbol};
use crate::utils::bits::{Bit, BitString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: Symbol,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: Symbol, weight: usize) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    /// `left` is the first node taken off the queue.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Child reached by following `bit`; leaves have none.
    pub fn child(&self, bit: Bit) -> Option<&HuffmanNode> {
        match (self, bit) {
            (HuffmanNode::Internal { left, .. }, Bit::Zero) => Some(left.as_ref()),
            (HuffmanNode::Internal { right, .. }, Bit::One) => Some(right.as_ref()),
            (HuffmanNode::Leaf { .. }, _) => None,
        }
    }
}

/// Merge queue entry. `rank` orders equal weights.
struct QueueEntry {
    weight: usize,
    rank: usize,
    node: HuffmanNode,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.rank == other.rank
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Greedy Huffman construction. Returns `None` for an empty table.
    pub fn build(frequencies: &FrequencyTable, tie_break: TieBreak) -> Option<Self> {
        let mut heap = BinaryHeap::with_capacity(frequencies.len());
        let mut sequence = 0usize;

        for (symbol, weight) in frequencies.iter() {
            let rank = match tie_break {
                TieBreak::Symbol => symbol as usize,
                TieBreak::Insertion => sequence,
            };
            sequence += 1;
            heap.push(QueueEntry {
                weight,
                rank,
                node: HuffmanNode::leaf(symbol, weight),
            });
        }

        let mut merges = 0usize;
        loop {
            let first = heap.pop()?;
            let Some(second) = heap.pop() else {
                debug!(
                    leaves = frequencies.len(),
                    merges,
                    weight = first.weight,
                    "huffman tree built"
                );
                return Some(Self { root: first.node });
            };

            // Subtrees are disjoint, so their smallest symbols never collide.
            let rank = match tie_break {
                TieBreak::Symbol => first.rank.min(second.rank),
                TieBreak::Insertion => sequence,
            };
            sequence += 1;
            merges += 1;

            let node = HuffmanNode::merge(first.node, second.node);
            heap.push(QueueEntry {
                weight: node.weight(),
                rank,
                node,
            });
        }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Total weight, equal to the number of symbols the tree was built from.
    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes().filter(|(node, _)| node.is_leaf()).count()
    }

    /// Depth of the leaf holding `symbol`, root at depth 0.
    #[cfg(test)]
    pub fn depth_of(&self, symbol: Symbol) -> Option<usize> {
        self.nodes()
            .find(|(node, _)| node.symbol() == Some(symbol))
            .map(|(_, depth)| depth)
    }

    /// Pre-order walk yielding each node with its depth.
    fn nodes(&self) -> impl Iterator<Item = (&HuffmanNode, usize)> {
        let mut stack = vec![(&self.root, 0usize)];
        std::iter::from_fn(move || {
            let (node, depth) = stack.pop()?;
            if let HuffmanNode::Internal { left, right, .. } = node {
                stack.push((right.as_ref(), depth + 1));
                stack.push((left.as_ref(), depth + 1));
            }
            Some((node, depth))
        })
    }
}

/// Indented dump of the tree, one node per line.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(&self.root, 0usize, "root")];

        while let Some((node, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node {
                HuffmanNode::Leaf { symbol, weight } => {
                    writeln!(
                        f,
                        "{}{} -> leaf {:?} (U+{:04X}) [weight: {}]",
                        indent, label, symbol, *symbol as u32, weight
                    )?;
                }
                HuffmanNode::Internal { weight, left, right } => {
                    writeln!(f, "{}{} -> internal [weight: {}]", indent, label, weight)?;
                    stack.push((right.as_ref(), depth + 1, "1"));
                    stack.push((left.as_ref(), depth + 1, "0"));
                }
            }
        }

        Ok(())
    }
}

/// Symbol to code mapping derived from a finished tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, BitString>,
}

impl CodeTable {
    pub fn from_tree(tree: Option<&HuffmanTree>) -> Self {
        let mut codes = BTreeMap::new();
        let Some(tree) = tree else {
            return Self { codes };
        };

        if let HuffmanNode::Leaf { symbol, .. } = tree.root() {
            // A lone leaf would otherwise get the empty code.
            codes.insert(*symbol, BitString::from(vec![Bit::Zero]));
            return Self { codes };
        }

        let mut stack = vec![(tree.root(), BitString::new())];
        while let Some((node, path)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(Bit::One);
                    stack.push((right.as_ref(), right_path));

                    let mut left_path = path;
                    left_path.push(Bit::Zero);
                    stack.push((left.as_ref(), left_path));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitString> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitString)> {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn is_prefix_free(&self) -> bool {
        self.codes.iter().all(|(a, code_a)| {
            self.codes
                .iter()
                .all(|(b, code_b)| a == b || !code_b.starts_with(code_a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn build(text: &str) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::count(text), TieBreak::Symbol).unwrap()
    }

    fn weights_conserved(node: &HuffmanNode) -> bool {
        match node {
            HuffmanNode::Leaf { .. } => true,
            HuffmanNode::Internal { weight, left, right } => {
                *weight == left.weight() + right.weight()
                    && weights_conserved(left)
                    && weights_conserved(right)
            }
        }
    }

    fn code_lengths(table: &CodeTable) -> BTreeMap<Symbol, usize> {
        table.iter().map(|(s, c)| (s, c.len())).collect()
    }

    #[test]
    fn empty_table_builds_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::count(""), TieBreak::Symbol).is_none());
        assert!(CodeTable::from_tree(None).is_empty());
    }

    #[test]
    fn single_symbol_is_leaf_root_with_one_digit_code() {
        let tree = build("aaaa");
        assert_eq!(tree.root(), &HuffmanNode::leaf('a', 4));

        let table = CodeTable::from_tree(Some(&tree));
        assert_eq!(table.get('a').map(|c| c.to_string()), Some("0".to_string()));
    }

    #[test]
    fn weights_sum_to_input_length() {
        let tree = build("abracadabra");
        assert_eq!(tree.weight(), 11);
        assert!(weights_conserved(tree.root()));
        assert_eq!(tree.leaf_count(), 5);
    }

    #[test]
    fn every_leaf_below_root_with_two_or_more_symbols() {
        let tree = build("ab");
        assert_eq!(tree.depth_of('a'), Some(1));
        assert_eq!(tree.depth_of('b'), Some(1));
        assert_eq!(tree.depth_of('z'), None);
    }

    #[test]
    fn most_frequent_symbol_gets_shortest_code() {
        let tree = build("abracadabra");
        let table = CodeTable::from_tree(Some(&tree));
        let a_len = table.get('a').unwrap().len();
        assert!(table.iter().all(|(_, code)| code.len() >= a_len));
        assert_eq!(tree.depth_of('a'), Some(a_len));
    }

    #[test]
    fn codes_are_prefix_free() {
        for text in ["abracadabra", "hello world", "aabbbccccddddd", "the quick brown fox"] {
            let table = CodeTable::from_tree(Some(&build(text)));
            assert!(table.is_prefix_free(), "codes for {:?} overlap", text);
        }
    }

    #[test]
    fn first_popped_goes_left() {
        // b(1) is popped before a(2)
        let tree = build("aab");
        let table = CodeTable::from_tree(Some(&tree));
        assert_eq!(table.get('b').unwrap().to_string(), "0");
        assert_eq!(table.get('a').unwrap().to_string(), "1");
    }

    #[test]
    fn symbol_tie_break_prefers_lower_symbol() {
        let tree = build("ba");
        let table = CodeTable::from_tree(Some(&tree));
        assert_eq!(table.get('a').unwrap().to_string(), "0");
        assert_eq!(table.get('b').unwrap().to_string(), "1");
    }

    #[test]
    fn abracadabra_code_lengths() {
        let table = CodeTable::from_tree(Some(&build("abracadabra")));
        assert_eq!(
            code_lengths(&table),
            btreemap! {'a' => 1, 'b' => 3, 'c' => 4, 'd' => 4, 'r' => 2}
        );
    }

    #[test]
    fn rebuild_is_deterministic() {
        let frequencies = FrequencyTable::count("mississippi river");
        for tie_break in [TieBreak::Symbol, TieBreak::Insertion] {
            let first = HuffmanTree::build(&frequencies, tie_break).unwrap();
            let second = HuffmanTree::build(&frequencies, tie_break).unwrap();
            assert_eq!(first, second);
            assert_eq!(
                code_lengths(&CodeTable::from_tree(Some(&first))),
                code_lengths(&CodeTable::from_tree(Some(&second)))
            );
        }
    }

    #[test]
    fn skewed_frequencies_build_deep_tree() {
        let mut counts = BTreeMap::new();
        let mut weight = 1usize;
        for symbol in 'a'..='z' {
            counts.insert(symbol, weight);
            weight *= 2;
        }
        let tree = HuffmanTree::build(&FrequencyTable::from(counts), TieBreak::Symbol).unwrap();
        let table = CodeTable::from_tree(Some(&tree));
        assert_eq!(table.get('a').unwrap().len(), 25);
        assert_eq!(table.get('z').unwrap().len(), 1);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn render_lists_every_node() {
        let rendered = build("aab").to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("root -> internal [weight: 3]"));
        assert!(lines[1].contains("leaf 'b'"));
        assert!(lines[2].contains("leaf 'a'"));
    }
}
