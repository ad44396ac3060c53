// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The LCP array: for each rank `r`, the length of the longest common
//! prefix between the suffixes ranked `r-1` and `r` in a suffix array
//! (`lcp[0]` is `0` by convention). Grounded in `pystr/lcp.py`.

use crate::suffix_tree::{NodeId, SuffixTree};

/// The inverse of a permutation: `isa[sa[r]] == r`.
pub fn inverse_sa(sa: &[usize]) -> Vec<usize> {
    let mut isa = vec![0usize; sa.len()];
    for (r, &j) in sa.iter().enumerate() {
        isa[j] = r;
    }
    isa
}

fn compare_lcp(x: &[u8], i: usize, j: usize) -> usize {
    let m = (x.len() - i).min(x.len() - j);
    (0..m).take_while(|&k| x[i + k] == x[j + k]).count()
}

/// Kasai's algorithm: build the LCP array of `x` from its suffix array
/// `sa` in `O(|x|)`, by scanning text positions (not ranks) so the
/// running match length only ever drops by one between iterations.
pub fn lcp_from_sa(x: &[u8], sa: &[usize]) -> Vec<usize> {
    let mut lcp = vec![0usize; sa.len()];
    let isa = inverse_sa(sa);

    let mut offset = 0usize;
    for i in 0..sa.len() {
        offset = offset.saturating_sub(1);
        let r = isa[i];
        if r == 0 {
            lcp[r] = 0;
            continue;
        }
        let j = sa[r - 1];
        offset += compare_lcp(x, i + offset, j + offset);
        lcp[r] = offset;
    }
    lcp
}

/// Recover a suffix array and LCP array from a suffix tree by a
/// depth-first traversal, visiting children in edge-label order.
/// Grounded in `pystr/lcp.py`'s `sa_lcp_from_suffix_tree`.
pub fn sa_lcp_from_suffix_tree(tree: &SuffixTree) -> (Vec<usize>, Vec<usize>) {
    let mut sa = Vec::new();
    let mut lcp = Vec::new();
    traverse(tree, tree.root(), 0, 0, &mut sa, &mut lcp);
    (sa, lcp)
}

fn traverse(
    tree: &SuffixTree,
    node: NodeId,
    lcp: usize,
    depth: usize,
    sa: &mut Vec<usize>,
    lcp_arr: &mut Vec<usize>,
) {
    if let Some(label) = tree.leaf_label(node) {
        sa.push(label);
        lcp_arr.push(lcp);
        return;
    }
    let new_depth = depth + tree.edge_len(node);
    let children = tree.children_in_order(node);
    if let Some((&first, rest)) = children.split_first() {
        traverse(tree, first, lcp, new_depth, sa, lcp_arr);
        for &child in rest {
            traverse(tree, child, new_depth, new_depth, sa, lcp_arr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::suffix_array::sais;

    fn lcp_of(text: &[u8]) -> Vec<usize> {
        let alpha = Alphabet::from_text(text).unwrap();
        let mapped = alpha.map_with_sentinel(text).unwrap();
        let sa = sais::construct(&mapped, alpha.size());
        lcp_from_sa(&mapped, &sa)
    }

    #[test]
    fn inverse_is_involutive_on_a_permutation() {
        let sa = vec![2, 0, 1];
        assert_eq!(inverse_sa(&inverse_sa(&sa)), sa);
    }

    #[test]
    fn s3_mississippi() {
        assert_eq!(lcp_of(b"mississippi"), vec![0, 0, 1, 1, 4, 0, 0, 1, 0, 2, 1, 3]);
    }

    #[test]
    fn first_entry_is_always_zero() {
        assert_eq!(lcp_of(b"banana")[0], 0);
    }

    #[test]
    fn lcp_never_exceeds_the_shorter_suffix() {
        let text = b"abracadabra";
        let alpha = Alphabet::from_text(text).unwrap();
        let mapped = alpha.map_with_sentinel(text).unwrap();
        let sa = sais::construct(&mapped, alpha.size());
        let lcp = lcp_from_sa(&mapped, &sa);
        for r in 1..sa.len() {
            let longest_possible = (mapped.len() - sa[r - 1]).min(mapped.len() - sa[r]);
            assert!(lcp[r] <= longest_possible);
        }
    }
}
