//! # pgp-crypto
//!
//! The OpenPGP message-layer cryptosystem of RFC 9580, with the
//! post-quantum extensions from draft-ietf-openpgp-pqc: asymmetric
//! encryption, signing, verification, key generation, and key packet
//! serialization across the full public-key algorithm matrix.
//!
//! ## What lives here
//!
//! - **Algorithm registries** for public-key algorithms, symmetric
//!   ciphers, hashes, AEAD modes, and curve OIDs
//! - **A single dispatch layer** (`crypto`) fanning out
//!   encrypt/decrypt/sign/verify/generate/validate to per-algorithm
//!   adapters, from RSA and DSA through Ed448 and X448 to the
//!   ML-KEM-768+X25519 and ML-DSA-65+Ed25519 composites
//! - **The PKESK packet** (tag 1), wrapping symmetric session keys with
//!   constant-time failure paths against decryption oracles
//! - **The Secret-Key packet** (tags 5/7), protecting long-term private
//!   material with passphrase-derived keys: CFB plus a SHA-1 hash, or
//!   AEAD with HKDF key separation bound to the public parameters
//!
//! Message assembly, armoring, and the symmetric data packets are out of
//! scope; primitives come from the usual Rust crypto crates.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pgp_crypto::algorithms::{PublicKeyAlgorithm, SymmetricKeyAlgorithm, Tag};
//! use pgp_crypto::config::Config;
//! use pgp_crypto::crypto::{KeyGenOptions, SessionKey};
//! use pgp_crypto::packet::{Pkesk, SecretKeyPacket};
//! use rand::rngs::OsRng;
//!
//! # fn main() -> pgp_crypto::Result<()> {
//! let config = Config::default();
//! let mut key = SecretKeyPacket::generate(
//!     &mut OsRng,
//!     &config,
//!     Tag::SecretKey,
//!     6,
//!     0,
//!     PublicKeyAlgorithm::X25519,
//!     &KeyGenOptions::default(),
//! )?;
//!
//! let session_key = SessionKey::generate(&mut OsRng, SymmetricKeyAlgorithm::Aes256);
//! let pkesk = Pkesk::encrypt(&mut OsRng, &config, 6, &key.public_key, &session_key, false)?;
//! let recovered = pkesk.decrypt(&key.public_key, key.secret_params.as_ref().unwrap(), None)?;
//! assert_eq!(recovered.data, session_key.data);
//!
//! key.encrypt(&mut OsRng, &config, b"passphrase")?;
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod config;
pub mod crypto;
pub mod error;
pub mod mpi;
pub mod packet;
pub mod s2k;

pub use error::{Error, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
