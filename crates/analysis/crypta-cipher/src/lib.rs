//! Crypta Cipher: statistical cryptanalysis of XOR ciphers
//!
//! Frequency scoring, XOR key recovery and ECB-mode detection over raw
//! byte buffers. Decoding hex/base64 and reading files is left to callers.
//!
//! # Modules
//! - `frequency` - Character frequency model and candidate scoring
//! - `single_byte` - Brute-force single-byte XOR key recovery
//! - `keysize` - Repeating-key length estimation by normalized bit distance
//! - `repeating` - Repeating-key recovery by column transposition
//! - `ecb` - Repeated-block detection for ECB mode
//! - `padding` - PKCS#7 pad/unpad
//! - `pipeline` - Config-driven end-to-end attacks
//!
//! ```no_run
//! use crypta_cipher::{crack_repeating_xor, FrequencyModel};
//! use crypta_config::AnalysisConfig;
//!
//! # fn main() -> crypta_cipher::Result<()> {
//! let config = AnalysisConfig::load_or_default();
//! let model = FrequencyModel::from_config(&config)?;
//! let ciphertext = std::fs::read("secret.bin")
//!     .map_err(|e| crypta_cipher::Error::IoError(e.to_string()))?;
//! let crack = crack_repeating_xor(&ciphertext, &model, &config)?;
//! println!("{}", String::from_utf8_lossy(&crack.plaintext));
//! # Ok(())
//! # }
//! ```

pub mod ecb;
pub mod frequency;
pub mod keysize;
pub mod padding;
pub mod pipeline;
pub mod repeating;
pub mod single_byte;

pub use ecb::{detect_ecb, find_ecb_candidates, repeated_blocks, DEFAULT_BLOCK_SIZE};
pub use frequency::FrequencyModel;
pub use keysize::{
    estimate_key_size, estimate_key_size_sampled, rank_key_sizes, KeySizeCandidate, PERIOD_TOLERANCE,
};
pub use padding::{pad_pkcs7, unpad_pkcs7};
pub use pipeline::{crack_repeating_xor, scan_for_ecb, RepeatingXorCrack};
pub use repeating::{break_repeating_key, transpose};
pub use single_byte::{break_single_byte_xor, detect_single_byte_xor, SingleByteXor};

pub use crypta_core::{hamming_distance, repeating_xor, xor_fixed, xor_with_byte, Error, Result};
