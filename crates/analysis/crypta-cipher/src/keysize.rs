//! Repeating-key length estimation
//!
//! For each candidate size `ks`, compare ciphertext blocks that sit `ks`
//! or `ks * 4` bytes apart and normalize their Hamming distance. When the
//! key cancels between the two blocks, what is left is plaintext against
//! plaintext, which has fewer differing bits than plaintext against noise.
//!
//! ```text
//!  samples = 1:  |<-- ks*4 -->|<-- ks*4 -->|
//!                |     B0     |     B1     |      d(B0,B1) / ks
//!
//!  samples = n:  |ks|ks|ks|ks| ... over the first max*4*(n+1) bytes
//!                mean of d(Ci,Ci+1) / ks over every consecutive pair
//! ```
//!
//! Blocks `ks * 4` apart cancel the key whenever the key length divides
//! `4 * ks`, so a key of 2, 4 or 8 bytes cancels at every size. Consecutive
//! `ks`-byte blocks only cancel at multiples of the key length, and those
//! multiples score about as low as the key length itself. The averaged
//! estimate therefore takes every size within [`PERIOD_TOLERANCE`] of the
//! best distance as a period and returns their greatest common divisor.

use crypta_core::{hamming_distance, Error, Result};
use serde::Serialize;

/// Relative slack above the best averaged distance within which a size still
/// counts as a period of the key
pub const PERIOD_TOLERANCE: f64 = 0.15;

/// Candidate key size and its normalized block distance (lower is better)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeySizeCandidate {
    pub key_size: usize,
    pub distance: f64,
}

/// Estimate the key size from the first two blocks of each candidate size.
///
/// Needs at least `max_size * 8` bytes. The smallest size wins ties.
pub fn estimate_key_size(ciphertext: &[u8], min_size: usize, max_size: usize) -> Result<usize> {
    estimate_key_size_sampled(ciphertext, min_size, max_size, 1)
}

/// Estimate the key size, averaging over more of the ciphertext when
/// `samples > 1`.
///
/// Needs at least `max_size * 4 * (samples + 1)` bytes. With `samples == 1`
/// this is exactly [`estimate_key_size`]. Otherwise every consecutive pair
/// of `ks`-byte blocks in that prefix is compared, and the sizes scoring
/// within [`PERIOD_TOLERANCE`] of the best are folded into their greatest
/// common divisor. If that divisor falls below `min_size` the best size is
/// returned as is.
pub fn estimate_key_size_sampled(
    ciphertext: &[u8],
    min_size: usize,
    max_size: usize,
    samples: usize,
) -> Result<usize> {
    let candidates = distances(ciphertext, min_size, max_size, samples)?;

    let mut best: Option<KeySizeCandidate> = None;
    for &candidate in &candidates {
        if best.map_or(true, |b| candidate.distance < b.distance) {
            best = Some(candidate);
        }
    }
    let best = best.ok_or_else(|| Error::InvalidKeySize("empty key size range".into()))?;

    let key_size = if samples == 1 {
        best.key_size
    } else {
        fold_periods(&candidates, best, min_size)
    };

    tracing::debug!(
        key_size,
        best_size = best.key_size,
        distance = best.distance,
        min_size,
        max_size,
        samples,
        "Estimated key size"
    );
    Ok(key_size)
}

/// Every candidate size with its distance, best first.
///
/// The sort is stable, so equal distances stay in ascending size order. With
/// `samples == 1` the head always agrees with [`estimate_key_size`]; with
/// more samples the estimate may be a divisor of the head.
pub fn rank_key_sizes(
    ciphertext: &[u8],
    min_size: usize,
    max_size: usize,
    samples: usize,
) -> Result<Vec<KeySizeCandidate>> {
    let mut ranked = distances(ciphertext, min_size, max_size, samples)?;
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(ranked)
}

fn distances(
    ciphertext: &[u8],
    min_size: usize,
    max_size: usize,
    samples: usize,
) -> Result<Vec<KeySizeCandidate>> {
    let needed = check_search(ciphertext.len(), min_size, max_size, samples)?;
    let window = &ciphertext[..needed];

    (min_size..=max_size)
        .map(|key_size| {
            normalized_distance(window, key_size, samples)
                .map(|distance| KeySizeCandidate { key_size, distance })
        })
        .collect()
}

/// Validate the search and return the number of bytes it reads
fn check_search(len: usize, min_size: usize, max_size: usize, samples: usize) -> Result<usize> {
    if min_size == 0 {
        return Err(Error::InvalidKeySize("minimum key size must be at least 1".into()));
    }
    if min_size > max_size {
        return Err(Error::InvalidKeySize(format!(
            "empty range {}..={}",
            min_size, max_size
        )));
    }
    if samples == 0 {
        return Err(Error::InvalidKeySize("at least one block pair is required".into()));
    }

    let needed = max_size
        .checked_mul(4)
        .and_then(|block| samples.checked_add(1).and_then(|pairs| block.checked_mul(pairs)))
        .unwrap_or(usize::MAX);
    if len < needed {
        return Err(Error::InsufficientInput { needed, got: len });
    }
    Ok(needed)
}

fn normalized_distance(window: &[u8], key_size: usize, samples: usize) -> Result<f64> {
    if samples == 1 {
        let block = key_size * 4;
        let distance = hamming_distance(&window[..block], &window[block..block * 2])?;
        return Ok(distance as f64 / key_size as f64);
    }

    // At least 4 * (samples + 1) blocks, so never fewer than 11 pairs
    let blocks: Vec<&[u8]> = window.chunks_exact(key_size).collect();
    let mut total = 0u64;
    for pair in blocks.windows(2) {
        total += u64::from(hamming_distance(pair[0], pair[1])?);
    }

    Ok(total as f64 / ((blocks.len() - 1) * key_size) as f64)
}

fn fold_periods(candidates: &[KeySizeCandidate], best: KeySizeCandidate, min_size: usize) -> usize {
    let limit = best.distance * (1.0 + PERIOD_TOLERANCE);
    let period = candidates
        .iter()
        .filter(|c| c.distance <= limit)
        .fold(0, |acc, c| gcd(acc, c.key_size));

    if period >= min_size {
        period
    } else {
        best.key_size
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
