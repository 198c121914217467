//! XOR primitives
//!
//! ```text
//! FIXED      a ⊕ b                  (equal lengths only)
//! SINGLE     data[i] ⊕ k
//! REPEATING  data[i] ⊕ key[i % key.len()]
//! ```
//!
//! XOR is its own inverse: applying the same key twice returns the input.

use crate::{Error, Result};

/// XOR two byte slices of equal length
pub fn xor_fixed(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect())
}

/// XOR every byte against a single key byte
pub fn xor_with_byte(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ key).collect()
}

/// XOR `data` against `key` repeated cyclically.
///
/// Encryption and decryption are the same operation. The key must not be
/// empty.
pub fn repeating_xor(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::InvalidKeySize("key must not be empty".into()));
    }

    Ok(data
        .iter()
        .zip(key.iter().cycle())
        .map(|(d, k)| d ^ k)
        .collect())
}

/// Number of differing bits between two equal-length buffers
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u32> {
    Ok(xor_fixed(a, b)?.iter().map(|x| x.count_ones()).sum())
}
