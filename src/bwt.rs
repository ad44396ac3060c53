// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The Burrows-Wheeler transform and FM-index: exact search by backward
//! narrowing, and approximate search bounded by a lower-edit-distance
//! table. Grounded in `pystr/bwt.py`; the branch-and-bound pruning
//! table (`D`) used by approximate search mirrors the shape of
//! `bio::data_structures::fmindex::FMIndexable::backward_search`'s
//! interval narrowing, generalized with the reverse-complement-table
//! trick from Lam et al.'s BWA-style approximate matching.

use crate::alphabet::Alphabet;
use crate::approx::{edits_to_cigar, Edit};
use crate::error::{Error, Result};
use crate::suffix_array::sais;

/// Cumulative symbol counts: `ctab[a]` is the number of BWT symbols
/// strictly less than `a`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CTable {
    cumsum: Vec<usize>,
}

impl CTable {
    pub fn new(bwt: &[u8], asize: usize) -> Self {
        let mut counts = vec![0usize; asize];
        for &a in bwt {
            counts[a as usize] += 1;
        }
        let mut n = 0;
        for c in counts.iter_mut() {
            let count = *c;
            *c = n;
            n += count;
        }
        CTable { cumsum: counts }
    }

    pub fn get(&self, a: u8) -> usize {
        self.cumsum[a as usize]
    }
}

/// `otab.get(a, i)`: the number of occurrences of symbol `a` in
/// `bwt[..i]`. The sentinel (code `0`) is never looked up.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OTable {
    tbl: Vec<Vec<usize>>,
    asize: usize,
}

impl OTable {
    pub fn new(bwt: &[u8], asize: usize) -> Self {
        let nrow = asize - 1;
        let ncol = bwt.len();
        let mut tbl = vec![vec![0usize; ncol]; nrow];

        if ncol > 0 {
            tbl[(bwt[0] - 1) as usize][0] = 1;
            for i in 2..=ncol {
                let b = bwt[i - 1];
                for a in 1..asize {
                    let prev = tbl[a - 1][i - 2];
                    tbl[a - 1][i - 1] = prev + usize::from(a as u8 == b);
                }
            }
        }

        OTable { tbl, asize }
    }

    pub fn get(&self, a: u8, i: usize) -> usize {
        debug_assert!(a > 0, "the sentinel is never looked up in the O-table");
        debug_assert!((a as usize) < self.asize);
        if i == 0 {
            0
        } else {
            self.tbl[(a - 1) as usize][i - 1]
        }
    }
}

/// The forward BWT of `text`, its alphabet, and the suffix array it was
/// built from (reused by `CTable`/`OTable` construction and by exact and
/// approximate search).
pub fn transform(text: &[u8]) -> Result<(Vec<u8>, Alphabet, Vec<usize>)> {
    let alpha = Alphabet::from_text(text)?;
    let mapped = alpha.map_with_sentinel(text)?;
    let sa = sais::construct(&mapped, alpha.size());
    let bwt: Vec<u8> = sa.iter().map(|&j| if j == 0 { mapped[mapped.len() - 1] } else { mapped[j - 1] }).collect();
    Ok((bwt, alpha, sa))
}

/// Reverse a BWT string back to the original (mapped, sentinel-terminated)
/// text.
pub fn reverse(bwt: &[u8]) -> Vec<u8> {
    if bwt.is_empty() {
        return Vec::new();
    }
    let asize = *bwt.iter().max().unwrap() as usize + 1;
    let ctab = CTable::new(bwt, asize);
    let otab = OTable::new(bwt, asize);

    let mut x = vec![0u8; bwt.len()];
    let mut i = 0usize;
    for j in (0..bwt.len() - 1).rev() {
        let a = bwt[i];
        x[j] = a;
        i = ctab.get(a) + otab.get(a, i);
    }
    x
}

/// A preprocessed index supporting exact and approximate search.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FmIndex {
    alpha: Alphabet,
    sa: Vec<usize>,
    ctab: CTable,
    otab: OTable,
    /// C/O tables of the BWT of the *reversed* text, used only to derive
    /// the approximate-search lower-bound table `d_table`.
    rev_ctab: CTable,
    rev_otab: OTable,
}

impl FmIndex {
    pub fn new(text: &[u8]) -> Result<Self> {
        let (bwt, alpha, sa) = transform(text)?;
        let ctab = CTable::new(&bwt, alpha.size());
        let otab = OTable::new(&bwt, alpha.size());

        let mut rev_text: Vec<u8> = text.to_vec();
        rev_text.reverse();
        let (rev_bwt, _, _) = transform(&rev_text)?;
        let rev_ctab = CTable::new(&rev_bwt, alpha.size());
        let rev_otab = OTable::new(&rev_bwt, alpha.size());

        Ok(FmIndex {
            alpha,
            sa,
            ctab,
            otab,
            rev_ctab,
            rev_otab,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alpha
    }

    /// Every starting position of `p` in the indexed text, found by
    /// narrowing the suffix-array interval one pattern symbol at a time,
    /// right to left.
    pub fn search(&self, p: &[u8]) -> Vec<usize> {
        let mapped = match self.alpha.map(p) {
            Ok(m) => m,
            Err(_) => return Vec::new(),
        };

        let (mut l, mut r) = (0usize, self.sa.len());
        for &a in mapped.iter().rev() {
            l = self.ctab.get(a) + self.otab.get(a, l);
            r = self.ctab.get(a) + self.otab.get(a, r);
            if l >= r {
                return Vec::new();
            }
        }
        self.sa[l..r].to_vec()
    }

    /// A lower bound, for every pattern prefix length, on the number of
    /// edits needed to match that prefix anywhere in the text -- built
    /// by running exact backward search for `p` over the reverse text's
    /// tables and bumping the bound whenever an interval empties out.
    /// Used to prune branches of approximate search that can no longer
    /// succeed within the edit budget.
    fn d_table(&self, mapped: &[u8]) -> Vec<usize> {
        let n = mapped.len();
        let mut d = vec![0usize; n];
        let (mut l, mut r) = (0usize, self.sa.len());
        let mut min_edits = 0usize;

        for i in 0..n {
            let a = mapped[i];
            l = self.rev_ctab.get(a) + self.rev_otab.get(a, l);
            r = self.rev_ctab.get(a) + self.rev_otab.get(a, r);
            if l >= r {
                min_edits += 1;
                l = 0;
                r = self.sa.len();
            }
            d[i] = min_edits;
        }
        d
    }

    /// Every starting position of an approximate match of `p`, within
    /// `max_edits` edits, alongside the CIGAR of the edit script found.
    /// A pattern may be reported more than once, via different edit
    /// scripts reaching the same interval.
    pub fn search_approx(&self, p: &[u8], max_edits: usize) -> Result<Vec<(usize, String)>> {
        if p.is_empty() {
            return Err(Error::EmptyPattern);
        }
        let mapped = match self.alpha.map(p) {
            Ok(m) => m,
            Err(_) => return Ok(Vec::new()),
        };

        let d = self.d_table(&mapped);
        let mut edit_ops = Vec::new();
        let mut hits = Vec::new();

        let i = mapped.len() - 1;
        self.do_match(&mapped, &d, i, 0, self.sa.len(), max_edits, &mut edit_ops, &mut hits);
        self.do_insert(&mapped, &d, i, 0, self.sa.len(), max_edits, &mut edit_ops, &mut hits);

        Ok(hits)
    }

    fn lower_bound(&self, d: &[usize], i: isize) -> usize {
        if i < 0 {
            0
        } else {
            d[i as usize]
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn rec_search(
        &self,
        p: &[u8],
        d: &[usize],
        i: isize,
        l: usize,
        r: usize,
        edits: usize,
        edit_ops: &mut Vec<Edit>,
        hits: &mut Vec<(usize, String)>,
    ) {
        if edits < self.lower_bound(d, i) {
            return;
        }
        if i < 0 {
            // Backward search walks the pattern right to left, so `edit_ops`
            // was built with the rightmost pattern position's operation
            // pushed first. Reverse it to get a CIGAR that reads left to
            // right over the text, as `extract_alignment` expects.
            let forward: Vec<Edit> = edit_ops.iter().rev().copied().collect();
            let cigar = edits_to_cigar(&forward);
            for j in l..r {
                hits.push((self.sa[j], cigar.clone()));
            }
            return;
        }

        self.do_match(p, d, i as usize, l, r, edits, edit_ops, hits);
        self.do_insert(p, d, i as usize, l, r, edits, edit_ops, hits);
        self.do_delete(p, d, i as usize, l, r, edits, edit_ops, hits);
    }

    #[allow(clippy::too_many_arguments)]
    fn do_match(
        &self,
        p: &[u8],
        d: &[usize],
        i: usize,
        l: usize,
        r: usize,
        edits: usize,
        edit_ops: &mut Vec<Edit>,
        hits: &mut Vec<(usize, String)>,
    ) {
        edit_ops.push(Edit::M);
        for a in 1..self.alpha.size() {
            let a = a as u8;
            let next_l = self.ctab.get(a) + self.otab.get(a, l);
            let next_r = self.ctab.get(a) + self.otab.get(a, r);
            if next_l >= next_r {
                continue;
            }
            if a == p[i] {
                self.rec_search(p, d, i as isize - 1, next_l, next_r, edits, edit_ops, hits);
            } else if edits > 0 {
                self.rec_search(p, d, i as isize - 1, next_l, next_r, edits - 1, edit_ops, hits);
            }
        }
        edit_ops.pop();
    }

    #[allow(clippy::too_many_arguments)]
    fn do_insert(
        &self,
        p: &[u8],
        d: &[usize],
        i: usize,
        l: usize,
        r: usize,
        edits: usize,
        edit_ops: &mut Vec<Edit>,
        hits: &mut Vec<(usize, String)>,
    ) {
        if edits == 0 {
            return;
        }
        edit_ops.push(Edit::I);
        self.rec_search(p, d, i as isize - 1, l, r, edits - 1, edit_ops, hits);
        edit_ops.pop();
    }

    #[allow(clippy::too_many_arguments)]
    fn do_delete(
        &self,
        p: &[u8],
        d: &[usize],
        i: usize,
        l: usize,
        r: usize,
        edits: usize,
        edit_ops: &mut Vec<Edit>,
        hits: &mut Vec<(usize, String)>,
    ) {
        if edits == 0 {
            return;
        }
        edit_ops.push(Edit::D);
        for a in 1..self.alpha.size() {
            let a = a as u8;
            let next_l = self.ctab.get(a) + self.otab.get(a, l);
            let next_r = self.ctab.get(a) + self.otab.get(a, r);
            if next_l >= next_r {
                continue;
            }
            self.rec_search(p, d, i as isize, next_l, next_r, edits - 1, edit_ops, hits);
        }
        edit_ops.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bwt_roundtrips_through_reverse() {
        for text in [&b"mississippi"[..], b"banana", b"abracadabra"] {
            let (bwt, alpha, _) = transform(text).unwrap();
            let restored = reverse(&bwt);
            assert_eq!(alpha.revmap(&restored), *text);
        }
    }

    #[test]
    fn exact_search_agrees_with_naive_occurrences() {
        let text = b"mississippi";
        let index = FmIndex::new(text).unwrap();
        let mut hits = index.search(b"ssi");
        hits.sort_unstable();
        assert_eq!(hits, vec![2, 5]);
    }

    #[test]
    fn exact_search_reports_no_hits_for_absent_pattern() {
        let index = FmIndex::new(b"mississippi").unwrap();
        assert!(index.search(b"xyz").is_empty());
    }

    #[test]
    fn exact_search_on_unknown_symbol_is_empty_not_an_error() {
        let index = FmIndex::new(b"acgt").unwrap();
        assert!(index.search(b"n").is_empty());
    }

    #[test]
    fn approx_search_with_zero_edits_matches_exact_search() {
        let text = b"mississippi";
        let index = FmIndex::new(text).unwrap();
        let mut exact: Vec<usize> = index.search(b"ssi");
        exact.sort_unstable();

        let mut approx: Vec<usize> = index
            .search_approx(b"ssi", 0)
            .unwrap()
            .into_iter()
            .map(|(pos, _)| pos)
            .collect();
        approx.sort_unstable();
        approx.dedup();
        assert_eq!(approx, exact);
    }

    #[test]
    fn approx_search_finds_a_one_substitution_match() {
        let text = b"mississippi";
        let index = FmIndex::new(text).unwrap();
        let hits = index.search_approx(b"smi", 1).unwrap();
        assert!(hits.iter().any(|(pos, _)| *pos == 3));
    }

    #[test]
    fn approx_search_rejects_empty_pattern() {
        let index = FmIndex::new(b"banana").unwrap();
        assert!(matches!(index.search_approx(b"", 1), Err(Error::EmptyPattern)));
    }
}
