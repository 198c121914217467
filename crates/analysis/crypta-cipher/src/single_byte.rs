//! Single-byte XOR breaking
//!
//! Exhaustive search over all 256 keys, scored against a [`FrequencyModel`].

use crate::frequency::FrequencyModel;
use crypta_core::xor_with_byte;
use serde::Serialize;

/// Best key found for a single-byte XOR ciphertext
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleByteXor {
    pub key: u8,
    pub plaintext: Vec<u8>,
    pub score: f64,
}

/// Try every key 0..=255 and keep the highest-scoring decryption.
///
/// Only a strictly greater score replaces the current best, so the lowest
/// key wins ties. If nothing scores above 0.0 the result is key 0 with the
/// ciphertext unchanged as plaintext.
pub fn break_single_byte_xor(ciphertext: &[u8], model: &FrequencyModel) -> SingleByteXor {
    let mut best = SingleByteXor {
        key: 0,
        plaintext: ciphertext.to_vec(),
        score: 0.0,
    };

    for key in 0..=u8::MAX {
        let candidate = xor_with_byte(ciphertext, key);
        let score = model.score(&candidate);
        if score > best.score {
            best = SingleByteXor {
                key,
                plaintext: candidate,
                score,
            };
        }
    }

    tracing::trace!(key = best.key, score = best.score, len = ciphertext.len(), "Single-byte key");
    best
}

/// Find which of several ciphertexts was single-byte XOR encrypted.
///
/// Breaks each candidate and returns the index and result of the one with
/// the strictly greatest score; the earliest wins ties. `None` when there are
/// no candidates or none scores above 0.0.
pub fn detect_single_byte_xor<I, T>(
    candidates: I,
    model: &FrequencyModel,
) -> Option<(usize, SingleByteXor)>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut best: Option<(usize, SingleByteXor)> = None;

    for (index, ciphertext) in candidates.into_iter().enumerate() {
        let result = break_single_byte_xor(ciphertext.as_ref(), model);
        let best_score = best.as_ref().map_or(0.0, |(_, b)| b.score);
        if result.score > best_score {
            best = Some((index, result));
        }
    }

    if let Some((index, result)) = &best {
        tracing::debug!(index, key = result.key, score = result.score, "Detected single-byte XOR");
    }
    best
}
