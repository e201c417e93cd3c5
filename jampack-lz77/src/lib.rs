//! Anti-context LZ77 stage.
//!
//! Finds long-distance repeats and encodes them as match/literal tokens,
//! but unlike a conventional LZ77 pass it doesn't take every match it
//! finds: candidates below a length floor are only tokenized if their
//! offset or length recurs often enough, per a cyclic hashed history
//! model, that the match is structural rather than coincidental. Three
//! match finders trade search cost for search quality; all three share the
//! same token wire format and decoder.
//!
//! # Example
//!
//! ```
//! use jampack_core::options::MatchFinder;
//! use jampack_lz77::{compress, decompress};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!".repeat(20);
//! let compressed = compress(&data, MatchFinder::HashChain);
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```

mod chhm;
mod dedupe;
mod decoder;
mod finder;
mod hashchain;
mod suffixarray;
mod token;

pub use decoder::decompress;
pub use token::{compressible, DecodedToken, DUPE_MATCH, MIN_MATCH, TOKEN_BUFFER_SIZE};

use jampack_core::options::MatchFinder;

/// Compress `data` with the given match finder.
pub fn compress(data: &[u8], mode: MatchFinder) -> Vec<u8> {
    match mode {
        MatchFinder::Dedupe => dedupe::compress(data),
        MatchFinder::HashChain => hashchain::compress(data),
        MatchFinder::SuffixArray => suffixarray::compress(data),
    }
}
