// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Edit operations and CIGAR strings, the output format of approximate
//! search. Grounded in `pystr/approx.py`.

use std::fmt;

use itertools::Itertools;
use regex::Regex;

use crate::error::{Error, Result};

/// One step of an edit script: match/substitute a text symbol, insert a
/// pattern symbol with no text counterpart, or delete a text symbol with
/// no pattern counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    M,
    I,
    D,
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Edit::M => 'M',
            Edit::I => 'I',
            Edit::D => 'D',
        };
        write!(f, "{c}")
    }
}

impl TryFrom<char> for Edit {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'M' => Ok(Edit::M),
            'I' => Ok(Edit::I),
            'D' => Ok(Edit::D),
            _ => Err(Error::InvalidCigar(format!("unknown edit operation '{c}'"))),
        }
    }
}

/// Run-length encode an edit script as a CIGAR string, e.g. `[M,M,M,I,I]`
/// becomes `"3M2I"`.
pub fn edits_to_cigar(edits: &[Edit]) -> String {
    let mut out = String::new();
    for (count, edit) in edits.iter().dedup_by_with_count(|a, b| a == b) {
        out.push_str(&count.to_string());
        out.push_str(&edit.to_string());
    }
    out
}

/// Parse a CIGAR string back into an edit script, one `<digits><letter>`
/// run at a time.
pub fn cigar_to_edits(cigar: &str) -> Result<Vec<Edit>> {
    let run = Regex::new(r"([0-9]+)([^0-9])").expect("static CIGAR run pattern");

    let mut out = Vec::new();
    let mut consumed = 0;
    for caps in run.captures_iter(cigar) {
        let whole = caps.get(0).unwrap();
        if whole.start() != consumed {
            return Err(Error::InvalidCigar(format!(
                "unexpected character at byte {consumed} in {cigar:?}"
            )));
        }
        consumed = whole.end();

        let n: usize = caps[1]
            .parse()
            .map_err(|_| Error::InvalidCigar(format!("bad run length {:?}", &caps[1])))?;
        let edit = Edit::try_from(caps[2].chars().next().unwrap())?;
        out.extend(std::iter::repeat(edit).take(n));
    }
    if consumed != cigar.len() {
        return Err(Error::InvalidCigar(format!("trailing garbage in {cigar:?}")));
    }
    Ok(out)
}

/// Number of non-matching operations (insertions, deletions, and
/// substitutions) encoded by an edit script. A `M` against an identical
/// symbol still counts as zero edits -- this crate's edit scripts never
/// distinguish "matched" `M` from "substituted" `M`, since backward
/// search only records the operation kind, not whether it happened to
/// agree with the text.
pub fn edit_count(edits: &[Edit]) -> usize {
    edits.iter().filter(|e| !matches!(e, Edit::M)).count()
}

/// Two equal-length byte sequences produced by walking a CIGAR over a
/// text and a pattern, with `-` marking a gap on either side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub text: Vec<u8>,
    pub pattern: Vec<u8>,
}

const GAP: u8 = b'-';

/// Rebuild the aligned text/pattern pair a CIGAR describes for a match
/// starting at `pos` in `text`. `M`/`D` advance the text cursor, `M`/`I`
/// advance the pattern cursor; `I` and `D` each emit a gap on the other
/// side.
pub fn extract_alignment(text: &[u8], pattern: &[u8], pos: usize, cigar: &str) -> Result<Alignment> {
    let edits = cigar_to_edits(cigar)?;

    let mut aligned_text = Vec::with_capacity(edits.len());
    let mut aligned_pattern = Vec::with_capacity(edits.len());
    let mut ti = pos;
    let mut pi = 0;

    for edit in edits {
        match edit {
            Edit::M => {
                let t = *text.get(ti).ok_or(Error::IndexOutOfRange { index: ti, len: text.len() })?;
                let p = *pattern
                    .get(pi)
                    .ok_or(Error::IndexOutOfRange { index: pi, len: pattern.len() })?;
                aligned_text.push(t);
                aligned_pattern.push(p);
                ti += 1;
                pi += 1;
            }
            Edit::D => {
                let t = *text.get(ti).ok_or(Error::IndexOutOfRange { index: ti, len: text.len() })?;
                aligned_text.push(t);
                aligned_pattern.push(GAP);
                ti += 1;
            }
            Edit::I => {
                let p = *pattern
                    .get(pi)
                    .ok_or(Error::IndexOutOfRange { index: pi, len: pattern.len() })?;
                aligned_text.push(GAP);
                aligned_pattern.push(p);
                pi += 1;
            }
        }
    }

    Ok(Alignment { text: aligned_text, pattern: aligned_pattern })
}

/// Number of columns where the aligned text and pattern disagree, a gap
/// on either side counting as a disagreement.
pub fn count_edits(alignment: &Alignment) -> usize {
    alignment
        .text
        .iter()
        .zip(alignment.pattern.iter())
        .filter(|(t, p)| t != p)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_cigar() {
        let edits = vec![Edit::M, Edit::M, Edit::M, Edit::I, Edit::I, Edit::D];
        let cigar = edits_to_cigar(&edits);
        assert_eq!(cigar, "3M2I1D");
        assert_eq!(cigar_to_edits(&cigar).unwrap(), edits);
    }

    #[test]
    fn empty_script_is_empty_cigar() {
        assert_eq!(edits_to_cigar(&[]), "");
        assert_eq!(cigar_to_edits("").unwrap(), Vec::new());
    }

    #[test]
    fn malformed_cigar_is_rejected() {
        assert!(cigar_to_edits("3").is_err());
        assert!(cigar_to_edits("M3").is_err());
        assert!(cigar_to_edits("3X").is_err());
    }

    #[test]
    fn edit_count_ignores_matches() {
        let edits = cigar_to_edits("2M1I3M1D").unwrap();
        assert_eq!(edit_count(&edits), 2);
    }

    #[test]
    fn extract_alignment_handles_match_only_cigar() {
        let alignment = extract_alignment(b"mississippi", b"ssi", 2, "3M").unwrap();
        assert_eq!(alignment.text, b"ssi");
        assert_eq!(alignment.pattern, b"ssi");
        assert_eq!(count_edits(&alignment), 0);
    }

    #[test]
    fn extract_alignment_gaps_text_on_insertion() {
        // "abXcdef" aligned against "abcdef" with "X" inserted after "ab".
        let alignment = extract_alignment(b"abcdef", b"abXcdef", 0, "2M1I4M").unwrap();
        assert_eq!(alignment.text, b"ab-cdef");
        assert_eq!(alignment.pattern, b"abXcdef");
        assert_eq!(count_edits(&alignment), 1);
    }

    #[test]
    fn extract_alignment_gaps_pattern_on_deletion() {
        let alignment = extract_alignment(b"mississippi", b"isisip", 1, "1M1D5M").unwrap();
        assert_eq!(alignment.text, b"ississi");
        assert_eq!(alignment.pattern, b"i-sisip");
        assert_eq!(count_edits(&alignment), 1);
    }

    #[test]
    fn count_edits_counts_mismatched_columns() {
        let alignment = Alignment { text: b"ssi".to_vec(), pattern: b"ssa".to_vec() };
        assert_eq!(count_edits(&alignment), 1);
    }

    #[test]
    fn extract_alignment_rejects_cigar_running_past_text_or_pattern() {
        assert!(extract_alignment(b"abc", b"abc", 0, "4M").is_err());
    }
}
