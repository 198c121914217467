//! Repeating-key XOR breaking
//!
//! Bytes at positions `i, i + ks, i + 2ks, ...` were all XORed with the same
//! key byte, so each such column is a single-byte XOR problem on its own.

use crate::frequency::FrequencyModel;
use crate::single_byte::break_single_byte_xor;
use crypta_core::{Error, Result};

/// Split ciphertext into `key_size` columns.
///
/// Every column has `len / key_size` bytes; a trailing partial row is
/// dropped.
pub fn transpose(ciphertext: &[u8], key_size: usize) -> Result<Vec<Vec<u8>>> {
    check_key_size(ciphertext.len(), key_size)?;

    let rows = ciphertext.len() / key_size;
    Ok((0..key_size)
        .map(|column| {
            (0..rows)
                .map(|row| ciphertext[column + key_size * row])
                .collect()
        })
        .collect())
}

/// Recover a `key_size`-byte repeating key, one column at a time
pub fn break_repeating_key(
    ciphertext: &[u8],
    key_size: usize,
    model: &FrequencyModel,
) -> Result<Vec<u8>> {
    let key: Vec<u8> = transpose(ciphertext, key_size)?
        .iter()
        .map(|column| break_single_byte_xor(column, model).key)
        .collect();

    tracing::debug!(key_size, key = %String::from_utf8_lossy(&key), "Recovered repeating key");
    Ok(key)
}

fn check_key_size(len: usize, key_size: usize) -> Result<()> {
    if key_size == 0 {
        return Err(Error::InvalidKeySize("key size must be at least 1".into()));
    }
    if key_size > len {
        return Err(Error::InvalidKeySize(format!(
            "key size {} exceeds ciphertext length {}",
            key_size, len
        )));
    }
    Ok(())
}
