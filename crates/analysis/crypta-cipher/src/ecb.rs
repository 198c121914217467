//! ECB mode detection
//!
//! Under a fixed key, ECB maps equal plaintext blocks to equal ciphertext
//! blocks. Any repeated ciphertext block gives the mode away without
//! knowing the key.

use crypta_core::{Error, Result};
use std::collections::HashSet;

/// AES block size
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// True as soon as any `block_size` block repeats an earlier one
pub fn detect_ecb(ciphertext: &[u8], block_size: usize) -> Result<bool> {
    check_blocks(ciphertext.len(), block_size)?;

    let mut seen: HashSet<&[u8]> = HashSet::new();
    for (index, block) in ciphertext.chunks_exact(block_size).enumerate() {
        if !seen.insert(block) {
            tracing::debug!(block = index, block_size, "Repeated ciphertext block");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Number of blocks that repeat an earlier block
pub fn repeated_blocks(ciphertext: &[u8], block_size: usize) -> Result<usize> {
    check_blocks(ciphertext.len(), block_size)?;

    let mut seen: HashSet<&[u8]> = HashSet::new();
    Ok(ciphertext
        .chunks_exact(block_size)
        .filter(|block| !seen.insert(*block))
        .count())
}

/// Indices of every ciphertext that [`detect_ecb`] flags.
///
/// The first malformed ciphertext aborts the scan.
pub fn find_ecb_candidates<I, T>(ciphertexts: I, block_size: usize) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut found = Vec::new();
    for (index, ciphertext) in ciphertexts.into_iter().enumerate() {
        if detect_ecb(ciphertext.as_ref(), block_size)? {
            found.push(index);
        }
    }
    Ok(found)
}

fn check_blocks(len: usize, block_size: usize) -> Result<()> {
    if block_size == 0 || len % block_size != 0 {
        return Err(Error::InvalidBlockSize { len, block_size });
    }
    Ok(())
}
