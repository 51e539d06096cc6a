//! gzip framing for tag-tree documents.
//!
//! Documents are compressed as a whole; the tag decoder only ever sees fully inflated buffers.

use std::io::{Read, Write};

use flate2::{read::MultiGzDecoder, write::GzEncoder, Compression};

use crate::error::{Error, Result};

/// The two magic bytes that start every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check if a buffer starts with a gzip header.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Read a gzip-framed document from `src` and inflate it. Fails if the stream isn't gzip, is
/// truncated or corrupt, or if the result would be larger than `max_size`.
pub fn decompress<R: Read>(mut src: R, max_size: usize) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    src.read_to_end(&mut raw)
        .map_err(|e| Error::FailDecompress(e.to_string()))?;
    decompress_slice(&raw, max_size)
}

/// Inflate a gzip-framed buffer already held in memory.
pub fn decompress_slice(src: &[u8], max_size: usize) -> Result<Vec<u8>> {
    if !is_gzip(src) {
        return Err(Error::FailDecompress(String::from(
            "stream is not gzip framed",
        )));
    }
    let mut decoded = Vec::new();
    // Read one byte past the limit, so an oversized document can be told apart from one that
    // is exactly at it.
    MultiGzDecoder::new(src)
        .take(max_size as u64 + 1)
        .read_to_end(&mut decoded)
        .map_err(|e| Error::FailDecompress(e.to_string()))?;
    if decoded.len() > max_size {
        return Err(Error::LengthTooLong {
            max: max_size,
            actual: decoded.len(),
        });
    }
    Ok(decoded)
}

/// gzip-frame a raw tag stream at the default compression level.
pub fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    compress_with_level(raw, Compression::default().level())
}

/// gzip-frame a raw tag stream. `level` runs from 0 (store) to 9 (best).
pub fn compress_with_level(raw: &[u8], level: u32) -> Result<Vec<u8>> {
    let fail = |e: std::io::Error| Error::BadEncode {
        offset: 0,
        msg: format!("gzip framing failed: {}", e),
    };
    let mut enc = GzEncoder::new(Vec::new(), Compression::new(level.min(9)));
    enc.write_all(raw).map_err(fail)?;
    enc.finish().map_err(fail)
}
