//! Error types for packet-layer cryptographic operations.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type.
///
/// Messages are deliberately coarse on decryption paths: a caller that can
/// distinguish a checksum failure from an algorithm mismatch can be used as
/// a decryption oracle.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown or disabled algorithm, curve, packet version, or S2K type.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Structurally invalid wire data (truncated MPI, trailing garbage,
    /// bad length fields).
    #[error("malformed data: {0}")]
    Malformed(String),

    /// The requested digest is shorter than the signature algorithm allows.
    #[error("digest too short for signature algorithm")]
    HashTooWeak,

    /// Secret-key material failed its integrity check after passphrase
    /// decryption.
    #[error("incorrect passphrase")]
    IncorrectPassphrase,

    /// Session-key decryption failed. Single opaque message for every
    /// failure cause.
    #[error("session key decryption failed")]
    Decryption,

    /// A key failed `validate()`.
    #[error("key is invalid")]
    KeyInvalid,

    /// An EdDSA signature failed its post-sign self-check; the caller may
    /// retry with the same inputs.
    #[error("signing failed, retry")]
    TransientSignature,

    /// Generic key-material read error. Replaces specific parse errors on
    /// passphrase-protected paths.
    #[error("error reading key material")]
    KeyMaterial,

    /// A primitive library reported a failure outside the classes above.
    #[error("cryptographic error: {0}")]
    Crypto(String),
}

impl Error {
    /// Creates a new unsupported-feature error.
    pub fn unsupported<T: ToString>(msg: T) -> Self {
        Self::Unsupported(msg.to_string())
    }

    /// Creates a new malformed-data error.
    pub fn malformed<T: ToString>(msg: T) -> Self {
        Self::Malformed(msg.to_string())
    }

    /// Creates a new crypto error.
    pub fn crypto<T: ToString>(msg: T) -> Self {
        Self::Crypto(msg.to_string())
    }
}
