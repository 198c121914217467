//! End-to-end analysis driven by [`AnalysisConfig`]
//!
//! ```text
//! ciphertext ──► estimate key size ──► break columns ──► key ──► decrypt
//!                 (config range)        (FrequencyModel)
//! ```

use crate::ecb::find_ecb_candidates;
use crate::frequency::FrequencyModel;
use crate::keysize::estimate_key_size_sampled;
use crate::repeating::break_repeating_key;
use crypta_config::AnalysisConfig;
use crypta_core::{repeating_xor, Result};
use serde::Serialize;

/// Outcome of a full repeating-key XOR attack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatingXorCrack {
    pub key_size: usize,
    pub key: Vec<u8>,
    pub plaintext: Vec<u8>,
}

/// Estimate the key size over the configured range, recover the key and
/// decrypt.
pub fn crack_repeating_xor(
    ciphertext: &[u8],
    model: &FrequencyModel,
    config: &AnalysisConfig,
) -> Result<RepeatingXorCrack> {
    config.validate()?;

    let key_size = estimate_key_size_sampled(
        ciphertext,
        config.min_key_size,
        config.max_key_size,
        config.key_size_samples,
    )?;
    let key = break_repeating_key(ciphertext, key_size, model)?;
    let plaintext = repeating_xor(ciphertext, &key)?;

    tracing::info!(key_size, len = ciphertext.len(), "Cracked repeating-key XOR");
    Ok(RepeatingXorCrack {
        key_size,
        key,
        plaintext,
    })
}

/// Indices of the ciphertexts that look ECB-encrypted at the configured
/// block size
pub fn scan_for_ecb<I, T>(ciphertexts: I, config: &AnalysisConfig) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    config.validate()?;
    find_ecb_candidates(ciphertexts, config.block_size)
}
