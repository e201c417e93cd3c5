//! # Jampack pipeline driver
//!
//! Archive framing, block-stage sequencing, and the parallel execution
//! model: reads fixed-size blocks off a stream, runs each through
//! [`stages::encode_block`], and frames the result per [`archive`]. Two
//! decode configurations are supported via [`jampack_core::options::Options::multi_block`]:
//! single-block parallel, where one block at a time occupies the whole
//! thread pool (every stage's own internal `rayon` use already parallelizes
//! within a block), and multi-block, where up to `options.threads` blocks
//! are in flight at once. Either way, blocks are read, written, and appear
//! in the archive in source order.
//!
//! ## Example
//!
//! ```
//! use jampack_core::options::Options;
//!
//! let data = b"the quick brown fox jumps over the lazy dog".repeat(100);
//! let options = Options::default();
//!
//! let mut archive = Vec::new();
//! jampack_pipeline::compress(&mut &data[..], &mut archive, options).unwrap();
//!
//! let mut recovered = Vec::new();
//! jampack_pipeline::decompress(&mut &archive[..], &mut recovered, options).unwrap();
//! assert_eq!(recovered, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod stages;

use jampack_core::error::{JampackError, Result};
use jampack_core::options::Options;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::io::{Read, Write};

fn build_pool(options: &Options) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .map_err(|e| JampackError::resource(e.to_string()))
}

/// How many blocks the driver keeps in flight at once for a given config.
fn batch_size(options: &Options) -> usize {
    if options.multi_block {
        options.threads
    } else {
        1
    }
}

fn read_batch<R: Read>(reader: &mut R, options: &Options, max_blocks: usize) -> Result<Vec<Vec<u8>>> {
    let mut blocks = Vec::new();
    for _ in 0..max_blocks {
        let mut buf = vec![0u8; options.block_size];
        let mut filled = 0;
        while filled < buf.len() {
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            break;
        }
        let short_read = filled < buf.len();
        buf.truncate(filled);
        blocks.push(buf);
        if short_read {
            break;
        }
    }
    Ok(blocks)
}

/// Compress `reader`'s full contents to `writer` as a sequence of framed
/// blocks. A wholly empty input still produces one header-only block
/// (payload_len 0), rather than an empty archive, so the archive always
/// has a checksum to verify against.
pub fn compress<R: Read, W: Write>(reader: &mut R, writer: &mut W, options: Options) -> Result<()> {
    let options = options.validate()?;
    let pool = build_pool(&options)?;
    let max_blocks = batch_size(&options);

    let mut blocks = read_batch(reader, &options, max_blocks)?;
    let mut is_first_batch = true;
    loop {
        if blocks.is_empty() {
            if is_first_batch {
                blocks.push(Vec::new());
            } else {
                return Ok(());
            }
        }
        is_first_batch = false;

        let payloads: Vec<Vec<u8>> =
            pool.install(|| blocks.par_iter().map(|block| stages::encode_block(block, &options)).collect());

        for (block, payload) in blocks.iter().zip(payloads.iter()) {
            let checksum = jampack_core::checksum(block);
            archive::write_block(writer, block.len(), checksum, payload)?;
        }

        if blocks.len() == 1 && blocks[0].is_empty() {
            return Ok(());
        }
        blocks = read_batch(reader, &options, max_blocks)?;
    }
}

/// Decompress a stream produced by [`compress`] into `writer`.
pub fn decompress<R: Read, W: Write>(reader: &mut R, writer: &mut W, options: Options) -> Result<()> {
    let options = options.validate()?;
    let pool = build_pool(&options)?;
    let max_blocks = batch_size(&options);

    loop {
        let mut batch = Vec::new();
        for _ in 0..max_blocks {
            match archive::read_header(reader)? {
                None => break,
                Some(header) => {
                    let payload = archive::read_payload(reader, &header)?;
                    batch.push((header, payload));
                }
            }
        }
        if batch.is_empty() {
            return Ok(());
        }

        let decoded: Vec<Result<Vec<u8>>> = pool.install(|| {
            batch
                .par_iter()
                .map(|(header, payload)| stages::decode_block(payload, &options, header.original_len))
                .collect()
        });

        for ((header, _), result) in batch.iter().zip(decoded) {
            let block = result?;
            let computed = jampack_core::checksum(&block);
            if computed != header.checksum {
                return Err(JampackError::checksum_mismatch(header.checksum, computed));
            }
            writer.write_all(&block)?;
        }
    }
}

/// Recompress `reader`'s contents in memory and compare against the
/// original, without writing any output — the `-T` test mode.
pub fn verify<R: Read>(reader: &mut R, options: Options) -> Result<()> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let mut packed = Vec::new();
    compress(&mut &input[..], &mut packed, options)?;

    let mut recovered = Vec::new();
    decompress(&mut &packed[..], &mut recovered, options)?;

    if recovered != input {
        return Err(JampackError::invariant("pipeline", "round-trip verification produced different bytes"));
    }
    Ok(())
}
