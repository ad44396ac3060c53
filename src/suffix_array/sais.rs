// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Induced-sorting suffix-array construction, grounded in
//! `pystr/sais.py`.
//!
//! This implementation allocates a fresh `Vec` for the reduced string and
//! recursive suffix array at each recursion level, rather than aliasing
//! regions of one backing array the way the source reuses a single list
//! across the result, the LMS-compaction buffer, and the reduced string.
//! See `DESIGN.md` for the tradeoff: no `unsafe`, same `O(n)` total-work
//! bound, at the cost of the source's in-place buffer-reuse trick.

use crate::bitvector::BitVector;

const UNDEFINED: i64 = -1;

fn is_lms(is_s: &BitVector, i: usize) -> bool {
    i > 0 && is_s.get(i) && !is_s.get(i - 1)
}

/// Classify each position as S-type (`true`) or L-type (`false`).
fn classify_sl(x: &[i64]) -> BitVector {
    let n = x.len();
    let mut is_s = BitVector::new(n);
    is_s.set(n - 1, true);
    for i in (0..n - 1).rev() {
        let v = x[i] < x[i + 1] || (x[i] == x[i + 1] && is_s.get(i + 1));
        is_s.set(i, v);
    }
    is_s
}

/// Cumulative symbol counts, used to derive bucket boundaries.
struct Buckets {
    counts: Vec<usize>,
}

impl Buckets {
    fn new(x: &[i64], asize: usize) -> Self {
        let mut counts = vec![0usize; asize];
        for &a in x {
            counts[a as usize] += 1;
        }
        Buckets { counts }
    }

    /// A fresh cursor that hands out the *front* of each bucket, in
    /// increasing order, one slot at a time.
    fn fronts(&self) -> BucketCursor {
        let mut next = vec![0usize; self.counts.len()];
        let mut acc = 0;
        for (a, &c) in self.counts.iter().enumerate() {
            next[a] = acc;
            acc += c;
        }
        BucketCursor { next }
    }

    /// A fresh cursor that hands out the *end* of each bucket, in
    /// decreasing order, one slot at a time.
    fn ends(&self) -> BucketCursor {
        let mut next = vec![0usize; self.counts.len()];
        let mut acc = 0;
        for (a, &c) in self.counts.iter().enumerate() {
            acc += c;
            next[a] = acc;
        }
        BucketCursor { next }
    }
}

struct BucketCursor {
    next: Vec<usize>,
}

impl BucketCursor {
    fn take_front(&mut self, bucket: usize) -> usize {
        let slot = self.next[bucket];
        self.next[bucket] += 1;
        slot
    }

    fn take_end(&mut self, bucket: usize) -> usize {
        self.next[bucket] -= 1;
        self.next[bucket]
    }
}

fn bucket_lms(x: &[i64], sa: &mut [i64], buckets: &Buckets, is_s: &BitVector) {
    for slot in sa.iter_mut() {
        *slot = UNDEFINED;
    }
    let mut ends = buckets.ends();
    for i in 0..x.len() {
        if is_lms(is_s, i) {
            let slot = ends.take_end(x[i] as usize);
            sa[slot] = i as i64;
        }
    }
}

fn induce_l(x: &[i64], sa: &mut [i64], buckets: &Buckets, is_s: &BitVector) {
    let mut fronts = buckets.fronts();
    for i in 0..x.len() {
        let v = sa[i];
        if v == UNDEFINED || v == 0 {
            continue;
        }
        let j = (v - 1) as usize;
        if is_s.get(j) {
            continue;
        }
        let slot = fronts.take_front(x[j] as usize);
        sa[slot] = j as i64;
    }
}

fn induce_s(x: &[i64], sa: &mut [i64], buckets: &Buckets, is_s: &BitVector) {
    let mut ends = buckets.ends();
    for i in (0..x.len()).rev() {
        let v = sa[i];
        if v == UNDEFINED || v == 0 {
            continue;
        }
        let j = (v - 1) as usize;
        if !is_s.get(j) {
            continue;
        }
        let slot = ends.take_end(x[j] as usize);
        sa[slot] = j as i64;
    }
}

fn equal_lms(x: &[i64], is_s: &BitVector, i: usize, j: usize) -> bool {
    if i == j {
        return true;
    }
    let n = x.len();
    let mut k = 0usize;
    loop {
        let pi = i + k;
        let pj = j + k;
        if pi >= n || pj >= n {
            return false;
        }
        let i_lms = is_lms(is_s, pi);
        let j_lms = is_lms(is_s, pj);
        if k > 0 && i_lms && j_lms {
            return true;
        }
        if i_lms != j_lms || x[pi] != x[pj] {
            return false;
        }
        k += 1;
    }
}

/// Build the reduced string (one symbol per LMS substring, in left-to-
/// right text order) plus its alphabet size and the original text
/// position of each LMS substring (indexed the same way as the reduced
/// string). `sa` must already hold the result of L/S induction.
fn reduce_lms(x: &[i64], sa: &[i64], is_s: &BitVector) -> (Vec<i64>, usize, Vec<usize>) {
    let n = x.len();
    let lms_in_order: Vec<usize> = (0..n).filter(|&i| is_lms(is_s, i)).collect();
    let sorted_lms: Vec<usize> = sa
        .iter()
        .map(|&v| v as usize)
        .filter(|&j| is_lms(is_s, j))
        .collect();

    let mut rank_of = vec![0i64; n];
    if !sorted_lms.is_empty() {
        let mut rank = 0i64;
        rank_of[sorted_lms[0]] = 0;
        for w in 1..sorted_lms.len() {
            if !equal_lms(x, is_s, sorted_lms[w - 1], sorted_lms[w]) {
                rank += 1;
            }
            rank_of[sorted_lms[w]] = rank;
        }
        let reduced: Vec<i64> = lms_in_order.iter().map(|&p| rank_of[p]).collect();
        (reduced, (rank + 1) as usize, lms_in_order)
    } else {
        (Vec::new(), 0, lms_in_order)
    }
}

/// Place the LMS positions, now sorted via the recursive suffix array of
/// the reduced string, at the ends of their buckets.
fn reverse_reduction(
    x: &[i64],
    sa: &mut [i64],
    lms_in_order: &[usize],
    red_sa: &[i64],
    buckets: &Buckets,
) {
    for slot in sa.iter_mut() {
        *slot = UNDEFINED;
    }
    let mut ends = buckets.ends();
    for i in (0..red_sa.len()).rev() {
        let j = lms_in_order[red_sa[i] as usize] as i64;
        let slot = ends.take_end(x[j as usize] as usize);
        sa[slot] = j;
    }
}

fn sais_rec(x: &[i64], sa: &mut [i64], asize: usize) {
    let n = x.len();
    if n == asize {
        for (i, &a) in x.iter().enumerate() {
            sa[a as usize] = i as i64;
        }
        return;
    }

    let is_s = classify_sl(x);
    let buckets = Buckets::new(x, asize);

    bucket_lms(x, sa, &buckets, &is_s);
    induce_l(x, sa, &buckets, &is_s);
    induce_s(x, sa, &buckets, &is_s);

    let (reduced, red_asize, lms_in_order) = reduce_lms(x, sa, &is_s);

    let mut red_sa = vec![UNDEFINED; reduced.len()];
    sais_rec(&reduced, &mut red_sa, red_asize);

    reverse_reduction(x, sa, &lms_in_order, &red_sa, &buckets);
    induce_l(x, sa, &buckets, &is_s);
    induce_s(x, sa, &buckets, &is_s);
}

/// Build the suffix array of `mapped` (already alphabet-mapped, sentinel
/// included) over an alphabet of size `asize`. Returns an SA of length
/// `mapped.len()` with `SA[0] == mapped.len() - 1` (the sentinel row).
pub fn construct(mapped: &[u8], asize: usize) -> Vec<usize> {
    let x: Vec<i64> = mapped.iter().map(|&b| b as i64).collect();
    let mut sa = vec![UNDEFINED; x.len()];
    sais_rec(&x, &mut sa, asize);
    sa.into_iter().map(|v| v as usize).collect()
}
