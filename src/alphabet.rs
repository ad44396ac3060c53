// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Dense symbol remapping, the substrate every construction algorithm in
//! this crate builds on.
//!
//! Grounded in `bio::alphabets::Alphabet`/`RankTransform`: like
//! `RankTransform`, codes are held in a dense map keyed by the raw byte
//! value (`vec_map::VecMap`, the same crate `bio` uses for this); like
//! `Alphabet::is_word`, membership is backed by a `bit_set::BitSet`.
//!
//! # Example
//!
//! ```
//! use strdex::alphabet::Alphabet;
//!
//! let alpha = Alphabet::from_text(b"mississippi").unwrap();
//! assert_eq!(alpha.size(), 5); // sentinel + {i, m, p, s}
//! let mapped = alpha.map(b"ssi").unwrap();
//! assert_eq!(alpha.revmap(&mapped), b"ssi");
//! ```

use bit_set::BitSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use vec_map::VecMap;

use crate::error::{Error, Result};

/// The densely-numbered symbol set derived from a text.
///
/// Code `0` is reserved for the sentinel and is never assigned to a real
/// symbol; real symbols get codes `1..=distinct_symbols`. The alphabet
/// cap is 256 codes including the sentinel.
#[derive(Clone, Debug)]
pub struct Alphabet {
    symbols: BitSet,
    code_of: VecMap<u8>,
    symbol_of: Vec<u8>, // indexed by code; symbol_of[0] is unused (sentinel)
}

impl Alphabet {
    /// Build an alphabet from the distinct symbols of `text`.
    pub fn from_text(text: &[u8]) -> Result<Self> {
        let mut symbols = BitSet::new();
        symbols.extend(text.iter().map(|&a| a as usize));

        let mut distinct: Vec<u8> = symbols.iter().map(|a| a as u8).collect();
        distinct.sort_unstable();

        if distinct.len() + 1 > 256 {
            return Err(Error::AlphabetTooLarge(distinct.len() + 1));
        }

        Ok(Self::from_distinct_sorted(distinct))
    }

    /// Rebuild an alphabet from its already-sorted, deduplicated real
    /// symbols (code `0`, the sentinel, is implicit and never part of
    /// this list). Used to reconstruct an `Alphabet` from the compact
    /// `symbol_of[1..]` representation serde round-trips.
    fn from_distinct_sorted(distinct: Vec<u8>) -> Self {
        let mut symbols = BitSet::new();
        let mut code_of = VecMap::new();
        let mut symbol_of = vec![0u8; distinct.len() + 1];
        for (i, &a) in distinct.iter().enumerate() {
            let code = (i + 1) as u8;
            symbols.insert(a as usize);
            code_of.insert(a as usize, code);
            symbol_of[code as usize] = a;
        }

        Alphabet {
            symbols,
            code_of,
            symbol_of,
        }
    }

    /// Number of distinct codes, including the sentinel: `|distinct| + 1`.
    pub fn size(&self) -> usize {
        self.symbol_of.len()
    }

    /// Is every symbol of `text` present in this alphabet?
    pub fn is_word(&self, text: &[u8]) -> bool {
        text.iter().all(|&a| self.symbols.contains(a as usize))
    }

    /// Map each symbol of `seq` to its code.
    pub fn map(&self, seq: &[u8]) -> Result<Vec<u8>> {
        seq.iter()
            .map(|&a| {
                self.code_of
                    .get(a as usize)
                    .copied()
                    .ok_or(Error::UnknownSymbol(a))
            })
            .collect()
    }

    /// Map `seq` to codes and append the sentinel (code `0`).
    pub fn map_with_sentinel(&self, seq: &[u8]) -> Result<Vec<u8>> {
        let mut mapped = self.map(seq)?;
        mapped.push(0);
        Ok(mapped)
    }

    /// Map a single code back to its source symbol. Code `0` is the
    /// sentinel and has no source symbol.
    pub fn revmap_one(&self, code: u8) -> Option<u8> {
        if code == 0 {
            None
        } else {
            self.symbol_of.get(code as usize).copied()
        }
    }

    /// Map a sequence of codes back to source symbols, dropping any
    /// sentinel codes encountered along the way.
    pub fn revmap(&self, codes: &[u8]) -> Vec<u8> {
        codes.iter().filter_map(|&c| self.revmap_one(c)).collect()
    }
}

// `BitSet`/`VecMap` don't implement `serde::{Serialize, Deserialize}`
// themselves, so these are hand-written rather than derived: the wire
// representation is just the sorted distinct-symbol list
// (`symbol_of[1..]`), which is all `from_distinct_sorted` needs to
// rebuild the other two fields.
#[cfg(feature = "serde")]
impl Serialize for Alphabet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.symbol_of[1..].serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Alphabet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let distinct = Vec::<u8>::deserialize(deserializer)?;
        Ok(Alphabet::from_distinct_sorted(distinct))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_distinct_plus_sentinel() {
        let alpha = Alphabet::from_text(b"mississippi").unwrap();
        assert_eq!(alpha.size(), 5);
    }

    #[test]
    fn roundtrip() {
        let alpha = Alphabet::from_text(b"banana").unwrap();
        let mapped = alpha.map(b"ban").unwrap();
        assert_eq!(alpha.revmap(&mapped), b"ban");
    }

    #[test]
    fn sentinel_appended_once_at_the_end() {
        let alpha = Alphabet::from_text(b"banana").unwrap();
        let mapped = alpha.map_with_sentinel(b"ban").unwrap();
        assert_eq!(mapped.last(), Some(&0));
        assert_eq!(mapped.iter().filter(|&&c| c == 0).count(), 1);
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let alpha = Alphabet::from_text(b"ban").unwrap();
        assert!(matches!(alpha.map(b"x"), Err(Error::UnknownSymbol(b'x'))));
    }

    #[test]
    fn is_word_reflects_membership() {
        let alpha = Alphabet::from_text(b"ACGT").unwrap();
        assert!(alpha.is_word(b"GATTACA"));
        assert!(!alpha.is_word(b"GATTACAN"));
    }

    #[test]
    fn codes_are_assigned_in_sorted_order() {
        let alpha = Alphabet::from_text(b"dcba").unwrap();
        let mapped = alpha.map(b"abcd").unwrap();
        assert_eq!(mapped, vec![1, 2, 3, 4]);
    }

    #[test]
    fn alphabet_too_large_is_rejected() {
        let text: Vec<u8> = (0..=255u8).collect(); // 256 distinct symbols
        assert!(matches!(
            Alphabet::from_text(&text),
            Err(Error::AlphabetTooLarge(257))
        ));
    }
}
