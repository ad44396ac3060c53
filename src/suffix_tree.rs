// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Suffix trees: naive construction, McCreight's linear-time algorithm,
//! and construction from a precomputed suffix array and LCP array.
//! Grounded in `pystr/suffixtree.py`.
//!
//! Nodes live in one arena (`Vec<Node>`, addressed by [`NodeId`]) for the
//! same reason [`crate::trie::Trie`] does: a suffix link can point back
//! toward the root, which an owned tree of `Box<Node>` cannot express
//! without `unsafe` or reference counting. Each node's edge label is
//! stored as a `(start, end)` range into one shared text buffer owned by
//! the tree, rather than as an independent slice/copy, so the arena
//! never needs self-referential borrows.

use std::collections::BTreeMap;

use crate::alphabet::Alphabet;
use crate::error::Result;

pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Node {
    edge_start: usize,
    edge_end: usize,
    parent: Option<NodeId>,
    suffix_link: Option<NodeId>,
    children: BTreeMap<u8, NodeId>,
    /// `Some(i)` for a leaf representing suffix `i`; `None` for an inner
    /// node (including the root).
    leaf_label: Option<usize>,
}

/// A suffix tree over a mapped, sentinel-terminated text.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuffixTree {
    text: Vec<u8>,
    nodes: Vec<Node>,
}

impl SuffixTree {
    fn empty(text: Vec<u8>) -> Self {
        SuffixTree {
            text,
            nodes: vec![Node {
                edge_start: 0,
                edge_end: 0,
                parent: None,
                suffix_link: None,
                children: BTreeMap::new(),
                leaf_label: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub(crate) fn edge_len(&self, id: NodeId) -> usize {
        self.nodes[id].edge_end - self.nodes[id].edge_start
    }

    /// This node's children, in edge-label order.
    pub(crate) fn children_in_order(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id].children.values().copied().collect()
    }

    pub fn edge_label(&self, id: NodeId) -> &[u8] {
        &self.text[self.nodes[id].edge_start..self.nodes[id].edge_end]
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].leaf_label.is_some()
    }

    pub fn leaf_label(&self, id: NodeId) -> Option<usize> {
        self.nodes[id].leaf_label
    }

    fn push_node(
        &mut self,
        parent: NodeId,
        edge_start: usize,
        edge_end: usize,
        leaf_label: Option<usize>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            edge_start,
            edge_end,
            parent: Some(parent),
            suffix_link: None,
            children: BTreeMap::new(),
            leaf_label,
        });
        id
    }

    /// How far `p` can be matched from `n`: the node reached, how deep
    /// into that node's own edge the match got, and the offset into `p`
    /// at which the search stopped. Returning `(n, 0, start)` means we
    /// could not leave `n` at all (no child for the next symbol).
    fn tree_search(&self, n: NodeId, p: &[u8]) -> (NodeId, usize, usize) {
        if p.is_empty() {
            return (n, 0, 0);
        }
        let mut n = n;
        let mut start = 0usize;
        loop {
            let a = p[start];
            let child = match self.nodes[n].children.get(&a) {
                Some(&c) => c,
                None => return (n, 0, start),
            };
            let edge = self.edge_label(child);
            let remaining = &p[start..];
            let i = first_mismatch(edge, remaining);
            if i == remaining.len() || i < edge.len() {
                return (child, i, start);
            }
            n = child;
            start += i;
        }
    }

    /// Like [`Self::tree_search`], but assumes a matching child always
    /// exists and skips the character-by-character comparison -- valid
    /// only when following a suffix link to a point we know is on the
    /// tree, as McCreight's construction does.
    fn tree_fastsearch(&self, n: NodeId, p: &[u8]) -> (NodeId, usize, usize) {
        if p.is_empty() {
            return (n, 0, 0);
        }
        let mut n = n;
        let mut start = 0usize;
        loop {
            let a = p[start];
            let child = self.nodes[n].children[&a];
            let edge_len = self.edge_len(child);
            let remaining_len = p.len() - start;
            let i = edge_len.min(remaining_len);
            if i == remaining_len {
                return (child, i, start);
            }
            n = child;
            start += i;
        }
    }

    /// Split the edge into `n`, `k` symbols down, inserting a new leaf
    /// labelled `leaf_label` with edge `text[z_start..z_end]`. Returns
    /// the new leaf.
    fn break_edge(&mut self, leaf_label: usize, n: NodeId, k: usize, z_start: usize, z_end: usize) -> NodeId {
        let parent = self.nodes[n].parent.expect("cannot break the edge into the root");
        let old_start = self.nodes[n].edge_start;
        let split_key = self.text[old_start];

        let new_n = self.push_node(parent, old_start, old_start + k, None);
        let new_leaf = self.push_node(new_n, z_start, z_end, Some(leaf_label));

        self.nodes[n].edge_start = old_start + k;
        self.nodes[n].parent = Some(new_n);

        let n_key = self.text[self.nodes[n].edge_start];
        self.nodes[new_n].children.insert(n_key, n);
        self.nodes[new_n].children.insert(self.text[z_start], new_leaf);
        self.nodes[parent].children.insert(split_key, new_n);

        new_leaf
    }

    fn build_naive(&mut self) {
        let n = self.text.len();
        for i in 0..n {
            let (node, depth, start) = self.tree_search(self.root(), &self.text[i..]);
            let y_start = i + start;
            if depth == 0 {
                let leaf = self.push_node(node, y_start, n, Some(i));
                self.nodes[node].children.insert(self.text[y_start], leaf);
            } else {
                debug_assert!(depth < self.edge_len(node), "a suffix can never fully match an existing edge");
                self.break_edge(i, node, depth, y_start + depth, n);
            }
        }
    }

    fn build_mccreight(&mut self) {
        let n = self.text.len();
        let leaf0 = self.push_node(ROOT, 0, n, Some(0));
        self.nodes[ROOT].children.insert(self.text[0], leaf0);
        self.nodes[ROOT].suffix_link = Some(ROOT);

        let mut v = leaf0;

        for i in 1..n {
            let p = self.nodes[v].parent.expect("a leaf always has a parent");

            let y_node;
            let (z_start, z_end);

            if let Some(p_slink) = self.nodes[p].suffix_link {
                y_node = p_slink;
                if p == ROOT {
                    z_start = i;
                    z_end = n;
                } else {
                    z_start = self.nodes[v].edge_start;
                    z_end = self.nodes[v].edge_end;
                }
            } else {
                let pp = self.nodes[p].parent.expect("p is not the root, so it has a parent");
                let pp_slink = self.nodes[pp]
                    .suffix_link
                    .expect("parent's parent must already have a suffix link");

                let (y_start, y_end) = if self.nodes[p].parent == Some(ROOT) {
                    (self.nodes[p].edge_start + 1, self.nodes[p].edge_end)
                } else {
                    (self.nodes[p].edge_start, self.nodes[p].edge_end)
                };
                let vz_start = self.nodes[v].edge_start;
                let vz_end = self.nodes[v].edge_end;

                let (y_res, j, start) = self.tree_fastsearch(pp_slink, &self.text[y_start..y_end]);
                debug_assert_eq!(start + j, y_end - y_start, "fast scan always matches fully");

                if self.edge_len(y_res) != j {
                    let new_leaf = self.break_edge(i, y_res, j, vz_start, vz_end);
                    let new_leaf_parent = self.nodes[new_leaf].parent.unwrap();
                    self.nodes[p].suffix_link = Some(new_leaf_parent);
                    v = new_leaf;
                    continue;
                }

                y_node = y_res;
                self.nodes[p].suffix_link = Some(y_node);
                z_start = vz_start;
                z_end = vz_end;
            }

            let (n2, j2, start2) = self.tree_search(y_node, &self.text[z_start..z_end]);
            if j2 == 0 {
                let leaf_start = z_start + start2;
                let leaf = self.push_node(n2, leaf_start, z_end, Some(i));
                self.nodes[n2].children.insert(self.text[leaf_start], leaf);
                v = leaf;
            } else {
                v = self.break_edge(i, n2, j2, z_start + start2 + j2, z_end);
            }
        }
    }

    fn search_up(&self, n: NodeId, length: usize) -> (NodeId, usize) {
        let mut n = n;
        let mut length = length;
        while length > 0 && self.edge_len(n) <= length {
            length -= self.edge_len(n);
            n = self.nodes[n].parent.expect("search_up ran off the root");
        }
        let depth = if length == 0 { 0 } else { self.edge_len(n) - length };
        (n, depth)
    }

    fn build_from_sa_lcp(&mut self, sa: &[usize], lcp: &[usize]) {
        let n = self.text.len();
        let leaf0 = self.push_node(ROOT, sa[0], n, Some(sa[0]));
        self.nodes[ROOT].children.insert(self.text[sa[0]], leaf0);

        let mut v = leaf0;
        for i in 1..sa.len() {
            let length = n - sa[i - 1] - lcp[i];
            let (n2, depth) = self.search_up(v, length);
            if depth == 0 {
                let start = sa[i] + lcp[i];
                let leaf = self.push_node(n2, start, n, Some(sa[i]));
                self.nodes[n2].children.insert(self.text[start], leaf);
                v = leaf;
            } else {
                v = self.break_edge(sa[i], n2, depth, sa[i] + lcp[i], n);
            }
        }
    }

    /// Does this tree contain `p` as a substring?
    pub fn contains(&self, alpha: &Alphabet, p: &[u8]) -> bool {
        let mapped = match alpha.map(p) {
            Ok(m) => m,
            Err(_) => return false,
        };
        if mapped.is_empty() {
            return true;
        }
        let (_, depth, start) = self.tree_search(self.root(), &mapped);
        start + depth == mapped.len()
    }

    /// Every starting position of `p` in the indexed text, in no
    /// particular order.
    pub fn search(&self, alpha: &Alphabet, p: &[u8]) -> Vec<usize> {
        let mapped = match alpha.map(p) {
            Ok(m) => m,
            Err(_) => return Vec::new(),
        };
        let (node, depth, start) = if mapped.is_empty() {
            (self.root(), 0, 0)
        } else {
            self.tree_search(self.root(), &mapped)
        };
        if start + depth != mapped.len() {
            return Vec::new();
        }
        let mut labels = Vec::new();
        self.collect_leaves(node, &mut labels);
        labels
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<usize>) {
        if let Some(label) = self.nodes[node].leaf_label {
            out.push(label);
            return;
        }
        for &child in self.nodes[node].children.values() {
            self.collect_leaves(child, out);
        }
    }

    /// Render the tree as Graphviz DOT source.
    pub fn to_dot(&self, alpha: &Alphabet) -> String {
        let mut lines = vec!["digraph {".to_string(), "rankdir=LR;".to_string()];
        self.to_dot_rec(self.root(), alpha, &mut lines);
        lines.push("}".to_string());
        lines.join("\n")
    }

    fn to_dot_rec(&self, node: NodeId, alpha: &Alphabet, lines: &mut Vec<String>) {
        let n = &self.nodes[node];
        if let Some(label) = n.leaf_label {
            lines.push(format!("{node} [label=\"{label}\", shape=circle];"));
        } else if node == ROOT {
            lines.push(format!("{node} [label=\"\", shape=circle, style=filled, fillcolor=grey];"));
        } else {
            lines.push(format!("{node} [label=\"\", shape=point];"));
        }
        if let Some(parent) = n.parent {
            let edge = alpha.revmap(&self.text[n.edge_start..n.edge_end]);
            let label = String::from_utf8_lossy(&edge);
            lines.push(format!("{parent} -> {node} [label=\"{label}\"];"));
        }
        if let Some(slink) = n.suffix_link {
            lines.push(format!("{node} -> {slink} [style=dashed, color=red];"));
        }
        for &child in n.children.values() {
            self.to_dot_rec(child, alpha, lines);
        }
    }
}

fn first_mismatch(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b.iter())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Build a suffix tree by inserting each suffix from the root,
/// re-searching from scratch every time: `O(n^2)` in the worst case.
pub fn naive(text: &[u8]) -> Result<(Alphabet, SuffixTree)> {
    let alpha = Alphabet::from_text(text)?;
    let mapped = alpha.map_with_sentinel(text)?;
    let mut st = SuffixTree::empty(mapped);
    st.build_naive();
    Ok((alpha, st))
}

/// Build a suffix tree in `O(n)` using suffix links to skip already-seen
/// text, per McCreight's algorithm.
pub fn mccreight(text: &[u8]) -> Result<(Alphabet, SuffixTree)> {
    let alpha = Alphabet::from_text(text)?;
    let mapped = alpha.map_with_sentinel(text)?;
    let mut st = SuffixTree::empty(mapped);
    st.build_mccreight();
    Ok((alpha, st))
}

/// Build a suffix tree directly from an already-computed suffix array
/// and LCP array of `text` (see [`crate::suffix_array`] and
/// [`crate::lcp`]), without suffix links or edge re-scanning.
pub fn from_sa_lcp(text: &[u8], sa: &[usize], lcp: &[usize]) -> Result<(Alphabet, SuffixTree)> {
    let alpha = Alphabet::from_text(text)?;
    let mapped = alpha.map_with_sentinel(text)?;
    let mut st = SuffixTree::empty(mapped);
    st.build_from_sa_lcp(sa, lcp);
    Ok((alpha, st))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcp::{lcp_from_sa, sa_lcp_from_suffix_tree};
    use crate::suffix_array::sais;

    fn reference_sa_lcp(text: &[u8]) -> (Vec<usize>, Vec<usize>) {
        let alpha = Alphabet::from_text(text).unwrap();
        let mapped = alpha.map_with_sentinel(text).unwrap();
        let sa = sais::construct(&mapped, alpha.size());
        let lcp = lcp_from_sa(&mapped, &sa);
        (sa, lcp)
    }

    #[test]
    fn naive_and_mccreight_agree_on_sa_lcp() {
        for text in [&b"mississippi"[..], b"banana", b"abracadabra", b""] {
            let (_, st_naive) = naive(text).unwrap();
            let (_, st_mcc) = mccreight(text).unwrap();
            assert_eq!(
                sa_lcp_from_suffix_tree(&st_naive),
                sa_lcp_from_suffix_tree(&st_mcc)
            );
        }
    }

    #[test]
    fn lcp_construction_matches_naive() {
        let text = b"mississippi";
        let (sa, lcp) = reference_sa_lcp(text);
        let (_, st_naive) = naive(text).unwrap();
        let (_, st_lcp) = from_sa_lcp(text, &sa, &lcp).unwrap();
        assert_eq!(
            sa_lcp_from_suffix_tree(&st_naive),
            sa_lcp_from_suffix_tree(&st_lcp)
        );
    }

    #[test]
    fn contains_and_search_agree_with_naive_matching() {
        let text = b"mississippi";
        let (alpha, st) = mccreight(text).unwrap();
        assert!(st.contains(&alpha, b"ssi"));
        assert!(!st.contains(&alpha, b"xyz"));

        let mut hits = st.search(&alpha, b"ssi");
        hits.sort_unstable();
        assert_eq!(hits, vec![2, 5]);
    }

    #[test]
    fn empty_pattern_is_contained_and_matches_every_position() {
        let text = b"banana";
        let (alpha, st) = naive(text).unwrap();
        assert!(st.contains(&alpha, b""));
        let mut hits = st.search(&alpha, b"");
        hits.sort_unstable();
        assert_eq!(hits, (0..=text.len()).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_symbol_search_yields_no_hits() {
        let text = b"acgt";
        let (alpha, st) = naive(text).unwrap();
        assert!(!st.contains(&alpha, b"n"));
        assert!(st.search(&alpha, b"n").is_empty());
    }
}
