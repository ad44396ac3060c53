// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A multi-pattern trie with failure and output links, grounded in
//! `pystr/trie.py`.
//!
//! Nodes live in one `Vec<TrieNode>` and refer to each other by `NodeId`
//! rather than by parent/child `Rc`/`Box` pointers: a suffix link
//! genuinely can point back toward the root, which an owned tree of
//! `Box<Node>` cannot express without `unsafe` or reference counting.

use std::collections::{BTreeMap, VecDeque};

use itertools::Itertools;

/// Index into a [`Trie`]'s node arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrieNode {
    /// Identifier of the pattern ending at this node, if any.
    pub label: Option<usize>,
    pub children: BTreeMap<u8, NodeId>,
    pub parent: Option<NodeId>,
    pub failure: Option<NodeId>,
    pub output: Option<NodeId>,
}

/// A trie over byte patterns, with Aho-Corasick failure/output links.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            nodes: vec![TrieNode {
                failure: Some(ROOT),
                ..Default::default()
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    fn push_node(&mut self, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TrieNode {
            parent: Some(parent),
            ..Default::default()
        });
        id
    }

    /// Insert `pattern` with identifier `label`, walking from the root
    /// and creating nodes as needed. Duplicate patterns silently
    /// overwrite the earlier label; callers that care must dedupe.
    pub fn insert(&mut self, pattern: &[u8], label: usize) {
        let mut n = ROOT;
        for &a in pattern {
            n = match self.nodes[n].children.get(&a) {
                Some(&child) => child,
                None => {
                    let child = self.push_node(n);
                    self.nodes[n].children.insert(a, child);
                    child
                }
            };
        }
        self.nodes[n].label = Some(label);
    }

    pub fn contains(&self, pattern: &[u8]) -> bool {
        let mut n = ROOT;
        for &a in pattern {
            match self.nodes[n].children.get(&a) {
                Some(&child) => n = child,
                None => return false,
            }
        }
        self.nodes[n].label.is_some()
    }

    /// Build failure and output links for `node`, reached from `parent`
    /// via symbol `a`. `parent` must already have its own failure link
    /// set (guaranteed by breadth-first processing from the root down).
    fn set_suffix_link(&mut self, node: NodeId, a: u8) {
        let parent = self.nodes[node].parent.expect("non-root node has a parent");

        let failure = if parent == ROOT {
            ROOT
        } else {
            let mut slink = self.nodes[parent].failure.expect("parent failure link is set");
            while slink != ROOT && !self.nodes[slink].children.contains_key(&a) {
                slink = self.nodes[slink].failure.expect("failure link is set");
            }
            self.nodes[slink].children.get(&a).copied().unwrap_or(ROOT)
        };
        self.nodes[node].failure = Some(failure);

        self.nodes[node].output = if self.nodes[failure].label.is_some() {
            Some(failure)
        } else {
            self.nodes[failure].output
        };
    }

    /// Set failure/output links for every node via breadth-first
    /// traversal from the root. Used after depth-first insertion.
    fn link_breadth_first(&mut self) {
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);
        while let Some(n) = queue.pop_front() {
            let children: Vec<(u8, NodeId)> =
                self.nodes[n].children.iter().map(|(&a, &c)| (a, c)).collect();
            for (a, child) in children {
                self.set_suffix_link(child, a);
                queue.push_back(child);
            }
        }
    }

    /// Build a trie by inserting patterns one at a time, then a
    /// breadth-first pass over the finished trie to set failure/output
    /// links. Grounded in `pystr/trie.py`'s `depth_first_trie`.
    pub fn from_patterns_df<P: AsRef<[u8]>>(patterns: &[P]) -> Self {
        let mut trie = Trie::new();
        for (label, p) in patterns.iter().enumerate() {
            trie.insert(p.as_ref(), label);
        }
        trie.link_breadth_first();
        trie
    }

    /// Build a trie level-by-level: at each level, group the remaining
    /// suffixes of patterns by first symbol, create one child per group,
    /// and enqueue. Failure/output links are set as nodes are created.
    /// Grounded in `pystr/trie.py`'s `breadth_first_trie`.
    pub fn from_patterns_bf<P: AsRef<[u8]>>(patterns: &[P]) -> Self {
        let labelled: Vec<(usize, &[u8])> = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.as_ref()))
            .collect();

        let mut trie = Trie::new();
        let (root_label, root_groups) = group_by_first_symbol(&labelled);
        trie.nodes[ROOT].label = root_label;

        let mut queue: VecDeque<(NodeId, BTreeMap<u8, Vec<(usize, &[u8])>>)> = VecDeque::new();
        queue.push_back((ROOT, root_groups));

        while let Some((parent, groups)) = queue.pop_front() {
            for (edge, group) in groups {
                let (label, child_groups) = group_by_first_symbol(&group);
                let child = trie.push_node(parent);
                trie.nodes[child].label = label;
                trie.nodes[parent].children.insert(edge, child);
                trie.set_suffix_link(child, edge);
                queue.push_back((child, child_groups));
            }
        }

        trie
    }
}

/// Split `strings` into: the label of the (at most one) empty string
/// among them, and the remaining strings grouped by their first symbol
/// (with that symbol consumed).
#[allow(clippy::type_complexity)]
fn group_by_first_symbol<'a>(
    strings: &[(usize, &'a [u8])],
) -> (Option<usize>, BTreeMap<u8, Vec<(usize, &'a [u8])>>) {
    let mut label = None;
    let mut nonempty = Vec::new();
    for &(lab, s) in strings {
        if s.is_empty() {
            label = Some(lab);
        } else {
            nonempty.push((s[0], (lab, &s[1..])));
        }
    }
    let groups = nonempty.into_iter().into_group_map().into_iter().collect();
    (label, groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut t = Trie::new();
        t.insert(b"abc", 0);
        t.insert(b"a", 1);
        assert!(t.contains(b"abc"));
        assert!(t.contains(b"a"));
        assert!(!t.contains(b"ab"));
        assert!(!t.contains(b"xyz"));
    }

    #[test]
    fn depth_first_and_breadth_first_agree_on_shape() {
        let patterns = ["abc", "a", "b", ""];
        let df = Trie::from_patterns_df(&patterns);
        let bf = Trie::from_patterns_bf(&patterns);

        for p in &patterns {
            assert_eq!(df.contains(p.as_bytes()), bf.contains(p.as_bytes()));
        }
        assert_eq!(df.node(df.root()).label, Some(3));
        assert_eq!(bf.node(bf.root()).label, Some(3));
    }

    #[test]
    fn failure_link_of_root_children_is_root() {
        let trie = Trie::from_patterns_df(&["a", "b"]);
        let a = trie.node(trie.root()).children[&b'a'];
        assert_eq!(trie.node(a).failure, Some(trie.root()));
    }
}
