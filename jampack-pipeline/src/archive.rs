//! Block header framing.
//!
//! ```text
//! block := magic[3] | checksum[4 BE] | payload_len[4 BE] | block_size[4 BE] | payload[payload_len]
//! ```
//! `block_size` is this block's original (pre-compression) length, not the
//! configured maximum — the last block in an archive is usually shorter.
//! `checksum` is computed over the *decoded* block, so decompression can
//! catch corruption the entropy stage's own framing wouldn't.

use jampack_core::error::{JampackError, Result};
use std::io::{Read, Write};

/// Magic bytes identifying a Jampack block.
pub const MAGIC: [u8; 3] = [0x4A, 0x41, 0x4D];
/// Fixed header size in bytes.
pub const HEADER_LEN: usize = 3 + 4 + 4 + 4;

/// Write one block's header and payload.
pub fn write_block<W: Write>(writer: &mut W, original_len: usize, checksum: u32, payload: &[u8]) -> Result<()> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(&MAGIC);
    header.extend_from_slice(&checksum.to_be_bytes());
    header.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    header.extend_from_slice(&(original_len as u32).to_be_bytes());
    writer.write_all(&header)?;
    writer.write_all(payload)?;
    Ok(())
}

/// A parsed block header.
pub struct BlockHeader {
    /// Checksum of the decoded block, as recorded by the encoder.
    pub checksum: u32,
    /// Bytes of payload following this header.
    pub payload_len: usize,
    /// Original (pre-compression) length of this block.
    pub original_len: usize,
}

/// Read one block's header. Returns `Ok(None)` at a clean end of stream
/// (zero bytes read before the magic); any other short read is an error.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Option<BlockHeader>> {
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(JampackError::buffer_underrun("archive", HEADER_LEN, filled));
        }
        filled += n;
    }

    let magic = [header[0], header[1], header[2]];
    if magic != MAGIC {
        return Err(JampackError::bad_magic(MAGIC, magic));
    }

    let checksum = u32::from_be_bytes([header[3], header[4], header[5], header[6]]);
    let payload_len = u32::from_be_bytes([header[7], header[8], header[9], header[10]]) as usize;
    let original_len = u32::from_be_bytes([header[11], header[12], header[13], header[14]]) as usize;

    Ok(Some(BlockHeader {
        checksum,
        payload_len,
        original_len,
    }))
}

/// Read exactly `header.payload_len` bytes of payload following a header
/// returned by [`read_header`].
pub fn read_payload<R: Read>(reader: &mut R, header: &BlockHeader) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; header.payload_len];
    let mut filled = 0;
    while filled < payload.len() {
        let n = reader.read(&mut payload[filled..])?;
        if n == 0 {
            return Err(JampackError::buffer_underrun("archive", payload.len(), filled));
        }
        filled += n;
    }
    Ok(payload)
}
