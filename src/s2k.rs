//! String-to-key (S2K) specifiers and passphrase key derivation.
//!
//! Covers the RFC 9580 set: Simple, Salted, Iterated-and-Salted, Argon2,
//! and the GNU-dummy extension used for offline/stub secret keys.

use crate::algorithms::HashAlgorithm;
use crate::config::Argon2Params;
use crate::crypto::hash::new_digest;
use crate::error::{Error, Result};
use crate::mpi::Reader;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Wire type codes.
const S2K_SIMPLE: u8 = 0;
const S2K_SALTED: u8 = 1;
const S2K_ITERATED: u8 = 3;
const S2K_ARGON2: u8 = 4;
const S2K_GNU: u8 = 101;

/// A parsed S2K specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S2k {
    /// Hash of the passphrase alone. Forbidden on v6 keys.
    Simple {
        /// Digest used for derivation.
        hash: HashAlgorithm,
    },
    /// Hash of salt then passphrase.
    Salted {
        /// Digest used for derivation.
        hash: HashAlgorithm,
        /// 8-byte salt.
        salt: [u8; 8],
    },
    /// Salt and passphrase hashed repeatedly to a byte count.
    Iterated {
        /// Digest used for derivation.
        hash: HashAlgorithm,
        /// 8-byte salt.
        salt: [u8; 8],
        /// Encoded count byte.
        count: u8,
    },
    /// Argon2id memory-hard derivation. Only valid with AEAD protection.
    Argon2 {
        /// 16-byte salt.
        salt: [u8; 16],
        /// Number of passes.
        passes: u8,
        /// Degree of parallelism.
        parallelism: u8,
        /// Memory exponent (`2^m` KiB).
        mem_exponent: u8,
    },
    /// GNU extension: no secret material present.
    GnuDummy {
        /// Extension mode (1 = dummy, 2 = divert-to-card).
        mode: u8,
    },
}

impl S2k {
    /// Creates an iterated-and-salted specifier with a fresh salt.
    pub fn new_iterated<R: CryptoRng + RngCore>(
        rng: &mut R,
        hash: HashAlgorithm,
        count: u8,
    ) -> Self {
        let mut salt = [0u8; 8];
        rng.fill_bytes(&mut salt);
        Self::Iterated { hash, salt, count }
    }

    /// Creates an Argon2 specifier with a fresh salt.
    pub fn new_argon2<R: CryptoRng + RngCore>(rng: &mut R, params: Argon2Params) -> Self {
        let mut salt = [0u8; 16];
        rng.fill_bytes(&mut salt);
        Self::Argon2 {
            salt,
            passes: params.passes,
            parallelism: params.parallelism,
            mem_exponent: params.mem_exponent,
        }
    }

    /// True for the GNU-dummy marker.
    pub fn is_dummy(&self) -> bool {
        matches!(self, Self::GnuDummy { .. })
    }

    /// Parses a specifier from the reader.
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            S2K_SIMPLE => Ok(Self::Simple {
                hash: HashAlgorithm::from_byte(reader.read_u8()?)?,
            }),
            S2K_SALTED => Ok(Self::Salted {
                hash: HashAlgorithm::from_byte(reader.read_u8()?)?,
                salt: reader.read_array()?,
            }),
            S2K_ITERATED => Ok(Self::Iterated {
                hash: HashAlgorithm::from_byte(reader.read_u8()?)?,
                salt: reader.read_array()?,
                count: reader.read_u8()?,
            }),
            S2K_ARGON2 => Ok(Self::Argon2 {
                salt: reader.read_array()?,
                passes: reader.read_u8()?,
                parallelism: reader.read_u8()?,
                mem_exponent: reader.read_u8()?,
            }),
            S2K_GNU => {
                if reader.read_exact(3)? != b"GNU" {
                    return Err(Error::malformed("bad GNU S2K marker"));
                }
                Ok(Self::GnuDummy {
                    mode: reader.read_u8()?,
                })
            }
            other => Err(Error::unsupported(format!("S2K type {other}"))),
        }
    }

    /// Appends the wire encoding to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Simple { hash } => {
                out.push(S2K_SIMPLE);
                out.push(hash.to_byte());
            }
            Self::Salted { hash, salt } => {
                out.push(S2K_SALTED);
                out.push(hash.to_byte());
                out.extend_from_slice(salt);
            }
            Self::Iterated { hash, salt, count } => {
                out.push(S2K_ITERATED);
                out.push(hash.to_byte());
                out.extend_from_slice(salt);
                out.push(*count);
            }
            Self::Argon2 {
                salt,
                passes,
                parallelism,
                mem_exponent,
            } => {
                out.push(S2K_ARGON2);
                out.extend_from_slice(salt);
                out.push(*passes);
                out.push(*parallelism);
                out.push(*mem_exponent);
            }
            Self::GnuDummy { mode } => {
                out.push(S2K_GNU);
                out.extend_from_slice(b"GNU");
                out.push(*mode);
            }
        }
    }

    /// Length of the wire encoding in bytes.
    pub fn serialized_len(&self) -> usize {
        match self {
            Self::Simple { .. } => 2,
            Self::Salted { .. } => 10,
            Self::Iterated { .. } => 11,
            Self::Argon2 { .. } => 20,
            Self::GnuDummy { .. } => 5,
        }
    }

    /// Derives `key_size` bytes from `passphrase`.
    pub fn produce_key(&self, passphrase: &[u8], key_size: usize) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            Self::Simple { hash } => digest_key(*hash, &[], passphrase, None, key_size),
            Self::Salted { hash, salt } => digest_key(*hash, salt, passphrase, None, key_size),
            Self::Iterated { hash, salt, count } => {
                digest_key(*hash, salt, passphrase, Some(decode_count(*count)), key_size)
            }
            Self::Argon2 {
                salt,
                passes,
                parallelism,
                mem_exponent,
            } => {
                let mem_kib = 1u32
                    .checked_shl(u32::from(*mem_exponent))
                    .ok_or_else(|| Error::malformed("Argon2 memory exponent out of range"))?;
                let params = argon2::Params::new(
                    mem_kib,
                    u32::from(*passes),
                    u32::from(*parallelism),
                    Some(key_size),
                )
                .map_err(Error::crypto)?;
                let argon2 = argon2::Argon2::new(
                    argon2::Algorithm::Argon2id,
                    argon2::Version::V0x13,
                    params,
                );
                let mut out = Zeroizing::new(vec![0u8; key_size]);
                argon2
                    .hash_password_into(passphrase, salt, &mut out)
                    .map_err(Error::crypto)?;
                Ok(out)
            }
            Self::GnuDummy { .. } => Err(Error::unsupported("dummy key has no secret material")),
        }
    }
}

/// Expands the iterated-S2K count byte into an octet count.
fn decode_count(count: u8) -> usize {
    (16 + (count as usize & 15)) << ((count >> 4) + 6)
}

/// Runs the RFC 9580 digest-based S2K schedule: as many contexts as needed
/// to fill `key_size`, context `i` preloaded with `i` zero octets, each fed
/// salt+passphrase once (or repeated to `iterate_to` octets).
fn digest_key(
    hash: HashAlgorithm,
    salt: &[u8],
    passphrase: &[u8],
    iterate_to: Option<usize>,
    key_size: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut out = Zeroizing::new(Vec::with_capacity(key_size));
    let unit = salt.len() + passphrase.len();
    let total = iterate_to.map_or(unit, |count| count.max(unit));

    let mut context = 0usize;
    while out.len() < key_size {
        let mut digest = new_digest(hash);
        for _ in 0..context {
            digest.update(&[0]);
        }
        let mut fed = 0usize;
        while fed + unit <= total {
            digest.update(salt);
            digest.update(passphrase);
            fed += unit;
        }
        if fed < total {
            let tail = total - fed;
            if tail <= salt.len() {
                digest.update(&salt[..tail]);
            } else {
                digest.update(salt);
                digest.update(&passphrase[..tail - salt.len()]);
            }
        }
        out.extend_from_slice(&digest.finalize());
        context += 1;
    }
    out.truncate(key_size);
    Ok(out)
}
