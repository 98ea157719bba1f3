//! Content hashing for cache keys.
//!
//! Cache keys only need a deterministic digest of the file bytes; they are
//! not integrity or security checks, so a fast 64-bit hash is enough at
//! this scale.

use std::fs::File;
use std::hash::Hasher;
use std::io::{BufReader, Read};
use std::path::Path;

use ahash::AHasher;

const CHUNK_SIZE: usize = 8192;
const KEY_HEX_WIDTH: usize = 32;

/// Hash a file's content in chunks, returning a fixed-width hex key.
///
/// Chunk boundaries are fixed at [`CHUNK_SIZE`] regardless of how the
/// underlying reads split, so the digest matches [`hash_bytes`] over the
/// same content.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = AHasher::default();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let mut filled = 0;
        while filled < CHUNK_SIZE {
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            break;
        }
        hasher.write(&buf[..filled]);
        if filled < CHUNK_SIZE {
            break;
        }
    }

    Ok(format!("{:0width$x}", hasher.finish(), width = KEY_HEX_WIDTH))
}

/// Hash an in-memory byte buffer with the same key format as [`hash_file`].
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = AHasher::default();
    for chunk in data.chunks(CHUNK_SIZE) {
        hasher.write(chunk);
    }
    format!("{:0width$x}", hasher.finish(), width = KEY_HEX_WIDTH)
}
