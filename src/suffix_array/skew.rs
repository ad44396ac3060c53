// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The skew/DC3 suffix-array algorithm
//! (<https://www.cs.helsinki.fi/u/tpkarkka/publications/jacm05-revised.pdf>),
//! grounded in `pystr/skew_common.py` and `pystr/skew.py`.
//!
//! Recursion reduces the alphabet to integer ranks of triplets, which
//! can exceed 255 after a few levels, so the recursive string is carried
//! as `i64` rather than `u8`; only the public entry point deals in bytes.

use std::collections::HashMap;

type Triplet = (i64, i64, i64);

fn safe_idx(x: &[i64], i: usize) -> i64 {
    if i >= x.len() {
        0
    } else {
        x[i]
    }
}

fn symbcount(x: &[i64], asize: usize) -> Vec<usize> {
    let mut counts = vec![0usize; asize];
    for &c in x {
        counts[c as usize] += 1;
    }
    counts
}

fn cumsum(counts: &[usize]) -> Vec<usize> {
    let mut res = vec![0usize; counts.len()];
    let mut acc = 0;
    for (i, &k) in counts.iter().enumerate() {
        res[i] = acc;
        acc += k;
    }
    res
}

/// Stable counting sort of `idx` by `x[i + offset]` (or `0` past the end).
fn bucket_sort(x: &[i64], asize: usize, idx: &[usize], offset: usize) -> Vec<usize> {
    let sort_symbs: Vec<i64> = idx.iter().map(|&i| safe_idx(x, i + offset)).collect();
    let mut buckets = cumsum(&symbcount(&sort_symbs, asize));
    let mut out = vec![0usize; idx.len()];
    for &i in idx {
        let bucket = safe_idx(x, i + offset) as usize;
        out[buckets[bucket]] = i;
        buckets[bucket] += 1;
    }
    out
}

/// Sort `idx` by the triplet `(x[i], x[i+1], x[i+2])`, least-significant
/// symbol first.
fn radix3(x: &[i64], asize: usize, idx: Vec<usize>) -> Vec<usize> {
    let idx = bucket_sort(x, asize, &idx, 2);
    let idx = bucket_sort(x, asize, &idx, 1);
    bucket_sort(x, asize, &idx, 0)
}

fn triplet(x: &[i64], i: usize) -> Triplet {
    (safe_idx(x, i), safe_idx(x, i + 1), safe_idx(x, i + 2))
}

/// Name the distinct triplets found at the (already radix-sorted)
/// positions in `idx` with consecutive integers, in the order
/// encountered -- so the new names preserve triplet order.
fn collect_alphabet(x: &[i64], idx: &[usize]) -> HashMap<Triplet, i64> {
    let mut alpha = HashMap::new();
    alpha.insert((0, 0, 0), 0i64);
    for &i in idx {
        let trip = triplet(x, i);
        if !alpha.contains_key(&trip) {
            let next = alpha.len() as i64;
            alpha.insert(trip, next);
        }
    }
    alpha
}

fn build_u(x: &[i64], alpha: &HashMap<Triplet, i64>) -> Vec<i64> {
    let n = x.len();
    let mut u = Vec::new();
    let mut i = 1;
    while i < n {
        u.push(alpha[&triplet(x, i)]);
        i += 3;
    }
    u.push(0); // central sentinel
    let mut i = 2;
    while i < n {
        u.push(alpha[&triplet(x, i)]);
        i += 3;
    }
    u
}

fn u_idx(i: usize, m: usize) -> usize {
    if i < m {
        1 + 3 * i
    } else {
        2 + 3 * (i - m - 1)
    }
}

/// Is `x[i..]` lexicographically less than `x[j..]`, using the inverse
/// suffix array of the already-sorted class-1/2 suffixes to shortcut the
/// comparison once both positions land in that class.
fn less(x: &[i64], i: usize, j: usize, isa: &HashMap<usize, usize>) -> bool {
    let a = safe_idx(x, i);
    let b = safe_idx(x, j);
    if a < b {
        return true;
    }
    if a > b {
        return false;
    }
    if i % 3 != 0 && j % 3 != 0 {
        return isa[&i] < isa[&j];
    }
    less(x, i + 1, j + 1, isa)
}

fn merge(x: &[i64], sa12: &[usize], sa3: &[usize]) -> Vec<usize> {
    let isa: HashMap<usize, usize> = sa12.iter().enumerate().map(|(i, &s)| (s, i)).collect();
    let mut sa = Vec::with_capacity(sa12.len() + sa3.len());
    let (mut i, mut j) = (0, 0);
    while i < sa12.len() && j < sa3.len() {
        if less(x, sa12[i], sa3[j], &isa) {
            sa.push(sa12[i]);
            i += 1;
        } else {
            sa.push(sa3[j]);
            j += 1;
        }
    }
    sa.extend_from_slice(&sa12[i..]);
    sa.extend_from_slice(&sa3[j..]);
    sa
}

fn skew_rec(x: &[i64], asize: usize) -> Vec<usize> {
    let n = x.len();
    let sa12_idx: Vec<usize> = (0..n).filter(|i| i % 3 != 0).collect();
    let mut sa12 = radix3(x, asize, sa12_idx);
    let alpha = collect_alphabet(x, &sa12);

    if alpha.len() <= sa12.len() {
        let u = build_u(x, &alpha);
        let sa_u = skew_rec(&u, alpha.len());
        let m = sa_u.len() / 2;
        sa12 = sa_u
            .into_iter()
            .filter(|&i| i != m)
            .map(|i| u_idx(i, m))
            .collect();
    }

    let mut sa3: Vec<usize> = if n % 3 == 1 { vec![n - 1] } else { Vec::new() };
    sa3.extend(sa12.iter().filter(|&&i| i % 3 == 1).map(|&i| i - 1));
    let sa3 = bucket_sort(x, asize, &sa3, 0);

    merge(x, &sa12, &sa3)
}

/// Build the suffix array of `mapped` (already alphabet-mapped, sentinel
/// included) over an alphabet of size `asize`. Returns an SA of length
/// `mapped.len()` with `SA[0] == mapped.len() - 1` (the sentinel row).
pub fn construct(mapped: &[u8], asize: usize) -> Vec<usize> {
    let x: Vec<i64> = mapped.iter().map(|&b| b as i64).collect();
    skew_rec(&x, asize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::suffix_array::sais;

    fn sa_of(text: &[u8]) -> Vec<usize> {
        let alpha = Alphabet::from_text(text).unwrap();
        let mapped = alpha.map_with_sentinel(text).unwrap();
        construct(&mapped, alpha.size())
    }

    #[test]
    fn s2_mississippi() {
        assert_eq!(
            sa_of(b"mississippi"),
            vec![11, 10, 7, 4, 1, 0, 9, 8, 6, 3, 5, 2]
        );
    }

    #[test]
    fn sa_is_a_permutation() {
        let sa = sa_of(b"abracadabra");
        let mut sorted = sa.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..=11).collect::<Vec<_>>());
    }

    #[test]
    fn sa_is_lexicographically_sorted() {
        let text = b"abracadabra";
        let alpha = Alphabet::from_text(text).unwrap();
        let mapped = alpha.map_with_sentinel(text).unwrap();
        let sa = construct(&mapped, alpha.size());
        for w in sa.windows(2) {
            assert!(mapped[w[0]..] < mapped[w[1]..]);
        }
    }

    #[test]
    fn empty_text() {
        assert_eq!(sa_of(b""), vec![0]);
    }

    #[test]
    fn agrees_with_sais_on_assorted_texts() {
        for text in [
            &b"banana"[..],
            b"aaaaaaaaaa",
            b"the quick brown fox jumps over the lazy dog",
            b"gattacagattacagattaca",
        ] {
            let alpha = Alphabet::from_text(text).unwrap();
            let mapped = alpha.map_with_sentinel(text).unwrap();
            assert_eq!(
                construct(&mapped, alpha.size()),
                sais::construct(&mapped, alpha.size()),
            );
        }
    }
}
