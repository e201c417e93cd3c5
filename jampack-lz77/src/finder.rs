//! Shared candidate-token buffering and anti-context filtering used by the
//! hash-chain and suffix-array match finders: matches are found greedily
//! but not all of them earn a token — only the ones whose offset or match
//! length recurs more than the cyclic-hash-history model expects from
//! chance, or that are long enough to always pay for themselves.

use crate::chhm::CyclicHashHistory;
use crate::token::{write_token, DUPE_MATCH};

/// A candidate match found during the scan, not yet accepted or rejected.
pub struct Candidate {
    /// Position in the input where the match starts.
    pub position: usize,
    /// Match length.
    pub match_len: usize,
    /// Back-reference distance.
    pub offset: usize,
}

/// Build offset/match-length histograms over one batch of candidates and
/// emit a token for each one whose offset or length stands out, or whose
/// length alone clears [`DUPE_MATCH`]. `emitted_end` tracks the last
/// position already covered by an emitted token or literal run; candidates
/// that start before it (because an earlier, longer candidate in the same
/// batch already covers them) are skipped.
pub fn filter_and_emit(input: &[u8], candidates: &[Candidate], output: &mut Vec<u8>, emitted_end: &mut usize) {
    if candidates.is_empty() {
        return;
    }

    let mut offsets = CyclicHashHistory::new(candidates.len());
    let mut lengths = CyclicHashHistory::new(candidates.len());
    for c in candidates {
        offsets.update(c.offset as u32);
        lengths.update(c.match_len as u32);
    }
    offsets.build_model();
    lengths.build_model();

    for c in candidates {
        if c.position < *emitted_end {
            continue;
        }
        let worth_encoding = c.match_len >= DUPE_MATCH
            || offsets.find_peaks(c.offset as u32)
            || lengths.find_peaks(c.match_len as u32);
        if !worth_encoding {
            continue;
        }

        let literal_len = c.position - *emitted_end;
        write_token(output, c.match_len, literal_len, c.offset);
        output.extend_from_slice(&input[*emitted_end..*emitted_end + literal_len]);
        *emitted_end = c.position + c.match_len;
    }
}
