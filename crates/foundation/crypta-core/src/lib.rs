//! # Crypta Core
//!
//! Byte-level foundation for the Crypta cryptanalysis toolkit.
//!
//! ```text
//! PLAINTEXT  ⊕  KEY (cycled)  =  CIPHERTEXT
//! CIPHERTEXT ⊕  KEY (cycled)  =  PLAINTEXT
//! ```
//!
//! Everything above this crate consumes and produces raw byte buffers;
//! text encodings (hex, base64) are handled by the caller.

pub mod xor;

pub use xor::{hamming_distance, repeating_xor, xor_fixed, xor_with_byte};

/// Result type for crypta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the crypta crates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Length mismatch: {left} bytes vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid block size: {len} bytes is not a whole number of {block_size}-byte blocks")]
    InvalidBlockSize { len: usize, block_size: usize },

    #[error("Insufficient input: need at least {needed} bytes, got {got}")]
    InsufficientInput { needed: usize, got: usize },

    #[error("Invalid key size: {0}")]
    InvalidKeySize(String),

    #[error("Invalid padding: {0}")]
    InvalidPadding(String),

    #[error("No reference corpus configured")]
    MissingCorpus,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}
