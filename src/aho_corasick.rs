// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Multi-pattern exact search over a [`Trie`], grounded in
//! `pystr/aho_corasick.py`.

use crate::trie::{NodeId, Trie};

/// Search `text` for occurrences of `patterns`, reporting `(pattern_index,
/// start_index)` pairs in text order. Patterns must be deduplicated by
/// the caller; a repeated pattern string silently keeps only the label
/// of its last insertion.
///
/// # Example
///
/// ```
/// use strdex::aho_corasick::aho_corasick;
///
/// let patterns = ["abc", "a", "b", ""];
/// let hits: Vec<(usize, usize)> = aho_corasick(b"abcabcab", &patterns).collect();
/// assert!(hits.contains(&(1, 0))); // "a" at 0
/// assert!(hits.contains(&(0, 0))); // "abc" at 0
/// assert!(hits.contains(&(3, 0))); // the empty pattern, reported once at 0
/// ```
pub fn aho_corasick<'a, P: AsRef<[u8]>>(text: &'a [u8], patterns: &[P]) -> AhoCorasick<'a> {
    let trie = Trie::from_patterns_df(patterns);
    let lengths = patterns.iter().map(|p| p.as_ref().len()).collect();
    AhoCorasick::new(trie, lengths, text)
}

/// An explicit state machine driving Aho-Corasick search: state is
/// `(text_index, current_node, output_walk_node)`.
pub struct AhoCorasick<'a> {
    trie: Trie,
    pattern_len: Vec<usize>,
    text: &'a [u8],
    i: usize,
    node: NodeId,
    output_walk: Option<NodeId>,
    root_label_pending: bool,
}

impl<'a> AhoCorasick<'a> {
    fn new(trie: Trie, pattern_len: Vec<usize>, text: &'a [u8]) -> Self {
        let root = trie.root();
        let root_label_pending = trie.node(root).label.is_some();
        AhoCorasick {
            node: root,
            trie,
            pattern_len,
            text,
            i: 0,
            output_walk: None,
            root_label_pending,
        }
    }

    /// Find the node reached from `n` via symbol `a`, walking failure
    /// links until a usable child exists or the root is reached.
    fn find_out(&self, mut n: NodeId, a: u8) -> NodeId {
        let root = self.trie.root();
        while n != root && !self.trie.node(n).children.contains_key(&a) {
            n = self.trie.node(n).failure.expect("failure link is set");
        }
        self.trie.node(n).children.get(&a).copied().unwrap_or(root)
    }

    fn report(&self, label: usize) -> (usize, usize) {
        (label, self.i - self.pattern_len[label])
    }
}

impl<'a> Iterator for AhoCorasick<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        // Special case: an empty pattern in the trie matches once, at
        // text index 0, before any symbol of the text is consumed.
        if self.root_label_pending {
            self.root_label_pending = false;
            let root = self.trie.root();
            if let Some(label) = self.trie.node(root).label {
                return Some((label, 0));
            }
        }

        loop {
            // Walk the pending output chain at the current node first.
            if let Some(w) = self.output_walk {
                let label = self.trie.node(w).label.expect("output nodes carry a label");
                self.output_walk = self.trie.node(w).output;
                return Some(self.report(label));
            }

            if self.i >= self.text.len() {
                return None;
            }

            let a = self.text[self.i];
            self.i += 1;
            self.node = self.find_out(self.node, a);

            let node = self.trie.node(self.node);
            self.output_walk = node.output;
            if let Some(label) = node.label {
                return Some(self.report(label));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_scenario() {
        let patterns = ["abc", "a", "b", ""];
        let mut hits = aho_corasick(b"abcabcab", &patterns).collect::<Vec<_>>();
        hits.sort();

        let mut expected = vec![(3, 0)]; // empty pattern, once, at 0
        for &i in &[0usize, 3, 6] {
            expected.push((1, i)); // "a"
        }
        for &i in &[1usize, 4, 7] {
            expected.push((2, i)); // "b"
        }
        for &i in &[0usize, 3] {
            expected.push((0, i)); // "abc"
        }
        expected.sort();

        assert_eq!(hits, expected);
    }

    #[test]
    fn no_patterns_means_no_matches() {
        let patterns: [&str; 0] = [];
        assert_eq!(aho_corasick(b"anything", &patterns).count(), 0);
    }

    #[test]
    fn soundness_against_brute_force() {
        let text = b"aabaabaaab";
        let patterns = ["aab", "ab", "b", "aa"];
        let mut hits = aho_corasick(text, &patterns).collect::<Vec<_>>();
        hits.sort();

        let mut expected = Vec::new();
        for (k, p) in patterns.iter().enumerate() {
            let pb = p.as_bytes();
            for i in 0..=text.len().saturating_sub(pb.len()) {
                if &text[i..i + pb.len()] == pb {
                    expected.push((k, i));
                }
            }
        }
        expected.sort();

        assert_eq!(hits, expected);
    }
}
