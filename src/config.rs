//! Runtime configuration threaded through cryptographic operations.
//!
//! There is no process-global state: callers construct a [`Config`] once at
//! startup and pass it by reference. All fields are plain values, so a
//! `Config` can be shared freely across concurrent operations.

use crate::algorithms::{AeadAlgorithm, EccCurve, PublicKeyAlgorithm, SymmetricKeyAlgorithm};
use std::collections::HashSet;

/// Argon2id cost parameters for S2K generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Number of passes.
    pub passes: u8,
    /// Degree of parallelism.
    pub parallelism: u8,
    /// Memory exponent: memory use is `2^m` KiB.
    pub mem_exponent: u8,
}

impl Default for Argon2Params {
    fn default() -> Self {
        // RFC 9580 recommended uniformly-safe setting: t=1, p=4, m=2^21.
        Self {
            passes: 1,
            parallelism: 4,
            mem_exponent: 21,
        }
    }
}

/// Tunables consulted by key protection, signing, and decryption paths.
#[derive(Debug, Clone)]
pub struct Config {
    /// Protect secret keys with S2K + HKDF + AEAD instead of CFB + SHA-1.
    pub aead_protect: bool,
    /// AEAD mode chosen when `aead_protect` is set.
    pub preferred_aead_algorithm: AeadAlgorithm,
    /// Verify every fresh Ed25519 signature before returning it, to catch
    /// hardware faults that would leak the private key.
    pub check_eddsa_faulty_signatures: bool,
    /// Treat v4 keys with AEAD s2k-usage as the pre-RFC draft variant
    /// (empty associated data, no HKDF).
    pub parse_aead_encrypted_v4_keys_as_legacy: bool,
    /// Enable the random-payload fallback for RSA PKCS#1 session-key
    /// decryption instead of surfacing errors.
    pub constant_time_pkcs1_decryption: bool,
    /// Session-key cipher algorithms considered when the constant-time
    /// PKCS#1 path has to fabricate a plausible session key.
    pub constant_time_pkcs1_symmetric_algorithms: HashSet<SymmetricKeyAlgorithm>,
    /// Curves refused for any operation.
    pub rejected_curves: HashSet<EccCurve>,
    /// Public-key algorithms refused for any operation.
    pub rejected_public_key_algorithms: HashSet<PublicKeyAlgorithm>,
    /// Minimum RSA modulus size accepted for generation.
    pub min_rsa_bits: usize,
    /// Iterated-S2K count byte used when generating CFB-protected keys.
    pub s2k_iteration_count_byte: u8,
    /// Argon2id parameters used when generating AEAD-protected keys.
    pub s2k_argon2_params: Argon2Params,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aead_protect: false,
            preferred_aead_algorithm: AeadAlgorithm::Ocb,
            check_eddsa_faulty_signatures: false,
            parse_aead_encrypted_v4_keys_as_legacy: false,
            constant_time_pkcs1_decryption: false,
            constant_time_pkcs1_symmetric_algorithms: [
                SymmetricKeyAlgorithm::Aes128,
                SymmetricKeyAlgorithm::Aes192,
                SymmetricKeyAlgorithm::Aes256,
            ]
            .into_iter()
            .collect(),
            rejected_curves: HashSet::new(),
            rejected_public_key_algorithms: HashSet::new(),
            min_rsa_bits: 2048,
            s2k_iteration_count_byte: 0xE0, // ~1M octets hashed
            s2k_argon2_params: Argon2Params::default(),
        }
    }
}
