// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The crate's error type.
//!
//! `UnknownSymbol` is never returned from a *search* entry point (those
//! silently yield an empty result instead); it only surfaces from the
//! low-level [`crate::alphabet::Alphabet::map`] call that search
//! functions wrap. The remaining variants mark invariant violations that
//! callers are not expected to recover from.

use thiserror::Error;

/// Errors produced by this crate's construction and mapping APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A symbol in a pattern or text is not present in the alphabet it is
    /// being mapped against.
    #[error("symbol {0:?} is not part of the alphabet")]
    UnknownSymbol(u8),

    /// A [`crate::subseq::SubSeq`]/[`crate::subseq::MSubSeq`] was
    /// constructed, sliced, or indexed outside the bounds of its owner.
    #[error("index out of range: {index} not in [0, {len}]")]
    IndexOutOfRange { index: usize, len: usize },

    /// Approximate search requires a non-empty pattern.
    #[error("approximate search requires a non-empty pattern")]
    EmptyPattern,

    /// A CIGAR string did not match the `(<digits><[MID]>)*` grammar.
    #[error("invalid CIGAR string: {0:?}")]
    InvalidCigar(String),

    /// More than 256 distinct symbols (plus the sentinel) were found while
    /// building an alphabet.
    #[error("alphabet has {0} distinct symbols, exceeding the 256-symbol cap")]
    AlphabetTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
