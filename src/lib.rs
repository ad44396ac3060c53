// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! `strdex`: a string-indexing and pattern-matching library.
//!
//! Built on a dense [`alphabet::Alphabet`] and a packed [`bitvector::BitVector`],
//! the crate offers three families of exact-match index:
//!
//! - [`suffix_array`]: the skew/DC3 algorithm and SA-IS, paired with
//!   [`lcp`] for Kasai's `O(n)` LCP-array construction.
//! - [`suffix_tree`]: naive, McCreight, and SA/LCP-driven construction,
//!   with pattern search and a Graphviz export.
//! - [`bwt`]: the Burrows-Wheeler transform, FM-index backward search,
//!   and branch-and-bound approximate search ([`approx`] provides the
//!   CIGAR encoding of edit scripts and alignment extraction from them).
//!
//! Alongside these, [`exact`] offers the classical linear/quadratic
//! single-pattern matchers (naive, border-array, KMP, Boyer-Moore-Horspool),
//! and [`trie`]/[`aho_corasick`] offer multi-pattern matching.

pub mod aho_corasick;
pub mod alphabet;
pub mod approx;
pub mod bitvector;
pub mod border;
pub mod bwt;
pub mod error;
pub mod exact;
pub mod lcp;
pub mod subseq;
pub mod suffix_array;
pub mod suffix_tree;
pub mod trie;

pub use error::{Error, Result};
