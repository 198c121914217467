//! PKCS#7 padding
//!
//! Pad with `n` bytes of value `n`, where `n` is 1..=block_size. Input that
//! is already aligned gets a full block of padding.

use crypta_core::{Error, Result};

pub fn pad_pkcs7(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;

    let pad_len = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    Ok(padded)
}

/// Strip and validate PKCS#7 padding
pub fn unpad_pkcs7(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(Error::InvalidBlockSize {
            len: data.len(),
            block_size,
        });
    }

    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 || pad_len > block_size {
        return Err(Error::InvalidPadding(format!("pad byte {:#04x} out of range", pad_len)));
    }

    let (body, pad) = data.split_at(data.len() - pad_len);
    if pad.iter().any(|&b| b as usize != pad_len) {
        return Err(Error::InvalidPadding("inconsistent pad bytes".into()));
    }
    Ok(body.to_vec())
}

fn check_block_size(block_size: usize) -> Result<()> {
    if !(1..=255).contains(&block_size) {
        return Err(Error::InvalidPadding(format!(
            "block size {} outside 1..=255",
            block_size
        )));
    }
    Ok(())
}
