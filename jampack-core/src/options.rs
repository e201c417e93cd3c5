//! Pipeline configuration.
//!
//! `Options` is a plain record, validated once at construction rather than
//! threaded through `Result` at every call site.

use crate::error::{JampackError, Result};

/// Minimum configurable block size (1 MiB).
pub const MIN_BLOCKSIZE: usize = 1 << 20;
/// Maximum configurable block size (1000 MiB).
pub const MAX_BLOCKSIZE: usize = 1000 << 20;
/// Default block size (4 MiB).
pub const DEFAULT_BLOCKSIZE: usize = 4 << 20;

/// Independent parallel strands the BWT inverse seeds and interleaves.
pub const BWT_UNITS: usize = 120;

/// Match-finder mode for the LZ77 anti-context stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchFinder {
    /// Single hash table, long minimum match, dedupe-only.
    #[default]
    Dedupe = 0,
    /// Hash table plus chain, 32-deep walk, positional peak filtering.
    HashChain = 1,
    /// Suffix-array neighbor search, anti-context peak filtering.
    SuffixArray = 2,
}

impl MatchFinder {
    /// Parse the CLI/`u8` encoding (`0`, `1`, `2`).
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::Dedupe),
            1 => Ok(Self::HashChain),
            2 => Ok(Self::SuffixArray),
            other => Err(JampackError::corrupt_header(format!(
                "unknown match_finder mode {other}"
            ))),
        }
    }
}

/// Filter selection policy for the structural filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Filters disabled; every sub-block is stored raw.
    #[default]
    Off = 0,
    /// Entropy-estimate heuristic with stride detection and smoothing.
    Heuristic = 1,
    /// Exhaustive (type, width) search.
    BruteForce = 2,
}

impl FilterMode {
    /// Parse the CLI/`u8` encoding (`0`, `1`, `2`).
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::Off),
            1 => Ok(Self::Heuristic),
            2 => Ok(Self::BruteForce),
            other => Err(JampackError::corrupt_header(format!(
                "unknown filter mode {other}"
            ))),
        }
    }
}

/// Pipeline configuration, shared (read-only) across all workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Block size in bytes, clamped to `[MIN_BLOCKSIZE, MAX_BLOCKSIZE]`.
    pub block_size: usize,
    /// Logical worker count (`>= 1`).
    pub threads: usize,
    /// LZ77 match-finder mode.
    pub match_finder: MatchFinder,
    /// Structural filter selection policy.
    pub filters: FilterMode,
    /// When true, multiple blocks may be in flight concurrently instead of
    /// one block at a time with all threads cooperating on it.
    pub multi_block: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCKSIZE,
            threads: default_threads(),
            match_finder: MatchFinder::default(),
            filters: FilterMode::default(),
            multi_block: false,
        }
    }
}

impl Options {
    /// Validate and normalize an options record: clamps `block_size` into
    /// range and rejects a zero thread count.
    pub fn validate(mut self) -> Result<Self> {
        if self.threads == 0 {
            return Err(JampackError::corrupt_header("threads must be >= 1"));
        }
        self.block_size = self.block_size.clamp(MIN_BLOCKSIZE, MAX_BLOCKSIZE);
        Ok(self)
    }
}

/// One below the logical core count, matching the source's
/// `DEFAULT_THREADS` (leave one core for the reader/writer thread), floored
/// at 1.
fn default_threads() -> usize {
    let cores = available_parallelism();
    if cores <= 1 { 1 } else { cores - 1 }
}

/// Logical core count, memoized behind a `OnceLock` so the probe (which the
/// original source cached in a process-wide global) runs exactly once.
pub fn available_parallelism() -> usize {
    use std::sync::OnceLock;
    static CORES: OnceLock<usize> = OnceLock::new();
    *CORES.get_or_init(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or_else(|_| num_cpus::get())
    })
}
