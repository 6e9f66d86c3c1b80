//! Cryptographic dispatch layer.
//!
//! A single set of entry points ([`generate_params`], [`sign`],
//! [`verify`], [`public_key_encrypt`], [`public_key_decrypt`],
//! [`validate_params`]) switches on the algorithm code and hands off to
//! the per-algorithm adapters. Packet code never touches an adapter
//! directly.

use crate::algorithms::{EccCurve, HashAlgorithm, PublicKeyAlgorithm, SymmetricKeyAlgorithm};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::mpi::{left_pad, Mpi};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

pub mod aead;
pub mod aes_kw;
pub mod checksum;
pub mod dsa;
pub mod ecdh;
pub mod ecdsa;
pub mod ed25519;
pub mod ed448;
pub mod elgamal;
pub mod hash;
pub mod ml_dsa65_ed25519;
pub mod ml_kem768_x25519;
pub mod params;
pub mod rsa;
pub mod slh_dsa_shake128s;
pub mod sym;
pub mod symmetric_key;
pub mod timing;
pub mod x25519;
pub mod x448;

pub use params::{
    parse_enc_session_key_params, parse_public_params, parse_secret_params,
    parse_signature_params, EncryptedSessionKeyParams, PlainSecretParams, PublicParams,
    SignatureParams,
};

/// Inputs to [`generate_params`]; unused fields may stay `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenOptions {
    /// Modulus size for RSA/DSA.
    pub bits: Option<usize>,
    /// Curve for ECDSA/ECDH.
    pub curve: Option<EccCurve>,
    /// Cipher for persistent AEAD keys.
    pub symmetric: Option<SymmetricKeyAlgorithm>,
    /// Digest for persistent HMAC keys.
    pub hash: Option<HashAlgorithm>,
}

/// Default ECDH KDF parameters for a curve.
fn ecdh_kdf_defaults(curve: EccCurve) -> (HashAlgorithm, SymmetricKeyAlgorithm) {
    match curve {
        EccCurve::P256 | EccCurve::BrainpoolP256r1 | EccCurve::Curve25519Legacy => {
            (HashAlgorithm::Sha256, SymmetricKeyAlgorithm::Aes128)
        }
        EccCurve::P384 | EccCurve::BrainpoolP384r1 => {
            (HashAlgorithm::Sha384, SymmetricKeyAlgorithm::Aes192)
        }
        EccCurve::P521 | EccCurve::BrainpoolP512r1 | EccCurve::Ed25519Legacy => {
            (HashAlgorithm::Sha512, SymmetricKeyAlgorithm::Aes256)
        }
    }
}

fn check_policy(config: &Config, algo: PublicKeyAlgorithm, curve: Option<EccCurve>) -> Result<()> {
    if config.rejected_public_key_algorithms.contains(&algo) {
        return Err(Error::unsupported(format!("{algo} is disabled")));
    }
    if let Some(curve) = curve {
        if config.rejected_curves.contains(&curve) {
            return Err(Error::unsupported(format!("{curve:?} is disabled")));
        }
    }
    Ok(())
}

/// Generates a fresh key for `algo`.
pub fn generate_params<R: CryptoRng + RngCore>(
    rng: &mut R,
    config: &Config,
    algo: PublicKeyAlgorithm,
    options: &KeyGenOptions,
) -> Result<(PublicParams, PlainSecretParams)> {
    check_policy(config, algo, options.curve)?;
    match algo {
        PublicKeyAlgorithm::Rsa => {
            let bits = options.bits.unwrap_or(4096);
            if bits < config.min_rsa_bits {
                return Err(Error::unsupported(format!(
                    "RSA below {} bits",
                    config.min_rsa_bits
                )));
            }
            let key = rsa::generate(rng, bits)?;
            Ok((
                PublicParams::Rsa { n: key.n, e: key.e },
                PlainSecretParams::Rsa {
                    d: key.d,
                    p: key.p,
                    q: key.q,
                    u: key.u,
                },
            ))
        }
        PublicKeyAlgorithm::Dsa => {
            let key = dsa::generate(rng, options.bits.unwrap_or(2048))?;
            Ok((
                PublicParams::Dsa {
                    p: key.p,
                    q: key.q,
                    g: key.g,
                    y: key.y,
                },
                PlainSecretParams::Dsa { x: key.x },
            ))
        }
        PublicKeyAlgorithm::Elgamal => {
            Err(Error::unsupported("ElGamal key generation is deprecated"))
        }
        PublicKeyAlgorithm::Ecdsa => {
            let curve = options.curve.ok_or_else(|| Error::unsupported("missing curve"))?;
            let key = ecdsa::generate(rng, curve)?;
            Ok((
                PublicParams::Ecdsa { curve, q: key.q },
                PlainSecretParams::Ecdsa { d: key.d },
            ))
        }
        PublicKeyAlgorithm::Ecdh => {
            let curve = options.curve.ok_or_else(|| Error::unsupported("missing curve"))?;
            let key = ecdh::generate(rng, curve)?;
            let (kdf_hash, kdf_cipher) = ecdh_kdf_defaults(curve);
            Ok((
                PublicParams::Ecdh {
                    curve,
                    q: key.q,
                    kdf_hash,
                    kdf_cipher,
                },
                PlainSecretParams::Ecdh { d: key.d },
            ))
        }
        PublicKeyAlgorithm::EddsaLegacy => {
            let key = ed25519::generate(rng);
            let mut q = Vec::with_capacity(33);
            q.push(0x40);
            q.extend_from_slice(&key.public);
            Ok((
                PublicParams::EddsaLegacy {
                    curve: EccCurve::Ed25519Legacy,
                    q: Mpi::from_slice(&q),
                },
                PlainSecretParams::EddsaLegacy {
                    seed: Mpi::from_slice(&key.seed),
                },
            ))
        }
        PublicKeyAlgorithm::Ed25519 => {
            let key = ed25519::generate(rng);
            Ok((
                PublicParams::Ed25519 { public: key.public },
                PlainSecretParams::Ed25519 { seed: key.seed },
            ))
        }
        PublicKeyAlgorithm::Ed448 => {
            let key = ed448::generate(rng)?;
            Ok((
                PublicParams::Ed448 { public: key.public },
                PlainSecretParams::Ed448 { seed: key.seed },
            ))
        }
        PublicKeyAlgorithm::X25519 => {
            let key = x25519::generate(rng);
            Ok((
                PublicParams::X25519 { public: key.public },
                PlainSecretParams::X25519 { secret: key.secret },
            ))
        }
        PublicKeyAlgorithm::X448 => {
            let key = x448::generate(rng);
            Ok((
                PublicParams::X448 { public: key.public },
                PlainSecretParams::X448 { secret: key.secret },
            ))
        }
        PublicKeyAlgorithm::Hmac => {
            let hash = options.hash.unwrap_or(HashAlgorithm::Sha256);
            let key = symmetric_key::generate_hmac(rng, hash);
            Ok((
                PublicParams::Hmac {
                    hash,
                    binding_digest: key.binding_digest,
                },
                PlainSecretParams::Hmac {
                    hash_seed: key.hash_seed,
                    key: key.key_material,
                },
            ))
        }
        PublicKeyAlgorithm::Aead => {
            let cipher = options.symmetric.unwrap_or(SymmetricKeyAlgorithm::Aes256);
            let key = symmetric_key::generate_aead(rng, cipher);
            Ok((
                PublicParams::Aead {
                    cipher,
                    binding_digest: key.binding_digest,
                },
                PlainSecretParams::Aead {
                    hash_seed: key.hash_seed,
                    key: key.key_material,
                },
            ))
        }
        PublicKeyAlgorithm::MlKem768X25519 => {
            let key = ml_kem768_x25519::generate(rng)?;
            Ok((
                PublicParams::MlKem768X25519 {
                    ecc_public: key.ecc_public,
                    mlkem_public: key.mlkem_public,
                },
                PlainSecretParams::MlKem768X25519 {
                    ecc_secret: key.ecc_secret,
                    mlkem_seed: key.mlkem_seed,
                },
            ))
        }
        PublicKeyAlgorithm::MlDsa65Ed25519 => {
            let key = ml_dsa65_ed25519::generate(rng)?;
            Ok((
                PublicParams::MlDsa65Ed25519 {
                    ecc_public: key.ecc_public,
                    mldsa_public: key.mldsa_public,
                },
                PlainSecretParams::MlDsa65Ed25519 {
                    ecc_secret: key.ecc_secret,
                    mldsa_seed: key.mldsa_seed,
                },
            ))
        }
        PublicKeyAlgorithm::SlhDsaShake128s => {
            let key = slh_dsa_shake128s::generate(rng)?;
            Ok((
                PublicParams::SlhDsaShake128s { public: key.public },
                PlainSecretParams::SlhDsaShake128s { secret: key.secret },
            ))
        }
        PublicKeyAlgorithm::RsaEncrypt | PublicKeyAlgorithm::RsaSign => {
            Err(Error::unsupported("deprecated RSA variants are parse-only"))
        }
    }
}

fn mismatch() -> Error {
    Error::malformed("key parameters do not match the algorithm")
}

/// Strips the 0x40 prefix from a legacy-encoded point.
fn legacy_point(q: &Mpi, len: usize) -> Result<Vec<u8>> {
    let padded = q.to_padded(len + 1)?;
    if padded[0] != 0x40 {
        return Err(Error::malformed("invalid legacy point encoding"));
    }
    Ok(padded[1..].to_vec())
}

/// Signs `digest` with the key's algorithm. The digest must already be
/// computed with `hash_algo`.
pub fn sign(
    config: &Config,
    hash_algo: HashAlgorithm,
    public: &PublicParams,
    secret: &PlainSecretParams,
    digest: &[u8],
) -> Result<SignatureParams> {
    match (public, secret) {
        (PublicParams::Rsa { n, e }, PlainSecretParams::Rsa { d, p, q, .. }) => {
            Ok(SignatureParams::Rsa {
                s: rsa::sign(hash_algo, digest, n, e, d, p, q)?,
            })
        }
        (PublicParams::Dsa { p, q, g, y }, PlainSecretParams::Dsa { x }) => {
            let (r, s) = dsa::sign(digest, p, q, g, y, x)?;
            Ok(SignatureParams::Dsa { r, s })
        }
        (PublicParams::Ecdsa { curve, .. }, PlainSecretParams::Ecdsa { d }) => {
            let (r, s) = ecdsa::sign(*curve, digest, d)?;
            Ok(SignatureParams::Ecdsa { r, s })
        }
        (PublicParams::EddsaLegacy { .. }, PlainSecretParams::EddsaLegacy { seed }) => {
            let seed: [u8; 32] = left_pad(seed.as_bytes(), 32)?.try_into().unwrap();
            let sig = ed25519::sign(config, hash_algo, digest, &seed)?;
            Ok(SignatureParams::EddsaLegacy {
                r: Mpi::from_slice(&sig[..32]),
                s: Mpi::from_slice(&sig[32..]),
            })
        }
        (PublicParams::Ed25519 { .. }, PlainSecretParams::Ed25519 { seed }) => {
            Ok(SignatureParams::Ed25519 {
                sig: ed25519::sign(config, hash_algo, digest, seed)?,
            })
        }
        (PublicParams::Ed448 { .. }, PlainSecretParams::Ed448 { seed }) => {
            Ok(SignatureParams::Ed448 {
                sig: ed448::sign(hash_algo, digest, seed)?,
            })
        }
        (PublicParams::Hmac { hash, .. }, PlainSecretParams::Hmac { key, .. }) => {
            Ok(SignatureParams::Hmac {
                mac: symmetric_key::hmac_sign(*hash, key, digest)?,
            })
        }
        (
            PublicParams::MlDsa65Ed25519 { .. },
            PlainSecretParams::MlDsa65Ed25519 {
                ecc_secret,
                mldsa_seed,
            },
        ) => {
            let sig = ml_dsa65_ed25519::sign(hash_algo, digest, ecc_secret, mldsa_seed)?;
            Ok(SignatureParams::MlDsa65Ed25519 {
                ecc_sig: sig.ecc_signature,
                mldsa_sig: sig.mldsa_signature,
            })
        }
        (PublicParams::SlhDsaShake128s { .. }, PlainSecretParams::SlhDsaShake128s { secret }) => {
            Ok(SignatureParams::SlhDsaShake128s {
                sig: slh_dsa_shake128s::sign(hash_algo, digest, secret)?,
            })
        }
        _ => Err(mismatch()),
    }
}

/// Verifies a signature over `digest`.
pub fn verify(
    hash_algo: HashAlgorithm,
    public: &PublicParams,
    signature: &SignatureParams,
    digest: &[u8],
) -> Result<bool> {
    match (public, signature) {
        (PublicParams::Rsa { n, e }, SignatureParams::Rsa { s }) => {
            rsa::verify(hash_algo, digest, s, n, e)
        }
        (PublicParams::Dsa { p, q, g, y }, SignatureParams::Dsa { r, s }) => {
            dsa::verify(digest, r, s, p, q, g, y)
        }
        (PublicParams::Ecdsa { curve, q }, SignatureParams::Ecdsa { r, s }) => {
            ecdsa::verify(*curve, digest, r, s, q)
        }
        (PublicParams::EddsaLegacy { q, .. }, SignatureParams::EddsaLegacy { r, s }) => {
            let public: [u8; 32] = legacy_point(q, 32)?.try_into().unwrap();
            let mut sig = [0u8; 64];
            sig[..32].copy_from_slice(&r.to_padded(32)?);
            sig[32..].copy_from_slice(&s.to_padded(32)?);
            ed25519::verify(hash_algo, &sig, &public, digest)
        }
        (PublicParams::Ed25519 { public }, SignatureParams::Ed25519 { sig }) => {
            ed25519::verify(hash_algo, sig, public, digest)
        }
        (PublicParams::Ed448 { public }, SignatureParams::Ed448 { sig }) => {
            ed448::verify(hash_algo, sig, public, digest)
        }
        (PublicParams::Hmac { .. }, SignatureParams::Hmac { .. }) => {
            // MAC verification needs the secret key; route through
            // `verify_hmac` instead.
            Err(Error::unsupported("HMAC verification requires the secret key"))
        }
        (
            PublicParams::MlDsa65Ed25519 {
                ecc_public,
                mldsa_public,
            },
            SignatureParams::MlDsa65Ed25519 { ecc_sig, mldsa_sig },
        ) => {
            let sig = ml_dsa65_ed25519::MlDsaEd25519Signature {
                ecc_signature: *ecc_sig,
                mldsa_signature: mldsa_sig.clone(),
            };
            ml_dsa65_ed25519::verify(hash_algo, &sig, ecc_public, mldsa_public, digest)
        }
        (PublicParams::SlhDsaShake128s { public }, SignatureParams::SlhDsaShake128s { sig }) => {
            slh_dsa_shake128s::verify(hash_algo, sig, public, digest)
        }
        _ => Err(mismatch()),
    }
}

/// Verifies an HMAC signature; persistent MAC keys are symmetric, so the
/// secret parameters are required.
pub fn verify_hmac(
    public: &PublicParams,
    secret: &PlainSecretParams,
    signature: &SignatureParams,
    digest: &[u8],
) -> Result<bool> {
    match (public, secret, signature) {
        (
            PublicParams::Hmac { hash, .. },
            PlainSecretParams::Hmac { key, .. },
            SignatureParams::Hmac { mac },
        ) => symmetric_key::hmac_verify(*hash, key, digest, mac),
        _ => Err(mismatch()),
    }
}

/// Encrypts session-key material under a recipient public key.
///
/// `fingerprint` feeds the ECDH KDF; other algorithms ignore it. The
/// cleartext cipher-algorithm byte of v3 X25519/X448/composite session
/// keys is filled in by the packet layer.
pub fn public_key_encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    config: &Config,
    public: &PublicParams,
    fingerprint: &[u8],
    data: &[u8],
) -> Result<EncryptedSessionKeyParams> {
    let curve = match public {
        PublicParams::Ecdh { curve, .. } => Some(*curve),
        _ => None,
    };
    check_policy(config, public.algorithm(), curve)?;
    match public {
        PublicParams::Rsa { n, e } => Ok(EncryptedSessionKeyParams::Rsa {
            c: rsa::encrypt(rng, data, n, e)?,
        }),
        PublicParams::Elgamal { p, g, y } => {
            let (e, c) = elgamal::encrypt(rng, data, p, g, y)?;
            Ok(EncryptedSessionKeyParams::Elgamal { e, c })
        }
        PublicParams::Ecdh {
            curve,
            q,
            kdf_hash,
            kdf_cipher,
        } => {
            let (ephemeral, wrapped) =
                ecdh::encrypt(rng, *curve, *kdf_hash, *kdf_cipher, q, fingerprint, data)?;
            Ok(EncryptedSessionKeyParams::Ecdh { ephemeral, wrapped })
        }
        PublicParams::X25519 { public } => {
            let (ephemeral, wrapped) = x25519::encrypt(rng, public, data)?;
            Ok(EncryptedSessionKeyParams::X25519 {
                ephemeral,
                sym_alg: None,
                wrapped,
            })
        }
        PublicParams::X448 { public } => {
            let (ephemeral, wrapped) = x448::encrypt(rng, public, data)?;
            Ok(EncryptedSessionKeyParams::X448 {
                ephemeral,
                sym_alg: None,
                wrapped,
            })
        }
        PublicParams::MlKem768X25519 {
            ecc_public,
            mlkem_public,
        } => {
            let ct = ml_kem768_x25519::encrypt(rng, ecc_public, mlkem_public, data)?;
            Ok(EncryptedSessionKeyParams::MlKem768X25519 {
                ecc_ciphertext: ct.ecc_ciphertext,
                mlkem_ciphertext: ct.mlkem_ciphertext,
                sym_alg: None,
                wrapped: ct.wrapped_key,
            })
        }
        _ => Err(Error::unsupported(format!(
            "session-key encryption with {}",
            public.algorithm()
        ))),
    }
}

/// Decrypts session-key material.
///
/// `random_payload` enables the constant-time failure path for the PKCS#1
/// algorithms: any decryption-related failure yields those bytes instead
/// of an error.
pub fn public_key_decrypt(
    public: &PublicParams,
    secret: &PlainSecretParams,
    encrypted: &EncryptedSessionKeyParams,
    fingerprint: &[u8],
    random_payload: Option<&[u8]>,
) -> Result<Vec<u8>> {
    match (public, secret, encrypted) {
        (
            PublicParams::Rsa { n, e },
            PlainSecretParams::Rsa { d, p, q, .. },
            EncryptedSessionKeyParams::Rsa { c },
        ) => rsa::decrypt(c, n, e, d, p, q, random_payload),
        (
            PublicParams::Elgamal { p, .. },
            PlainSecretParams::Elgamal { x },
            EncryptedSessionKeyParams::Elgamal { e, c },
        ) => elgamal::decrypt(e, c, p, x, random_payload),
        (
            PublicParams::Ecdh {
                curve,
                kdf_hash,
                kdf_cipher,
                ..
            },
            PlainSecretParams::Ecdh { d },
            EncryptedSessionKeyParams::Ecdh { ephemeral, wrapped },
        ) => ecdh::decrypt(
            *curve,
            *kdf_hash,
            *kdf_cipher,
            ephemeral,
            wrapped,
            d,
            fingerprint,
        ),
        (
            PublicParams::X25519 { public },
            PlainSecretParams::X25519 { secret },
            EncryptedSessionKeyParams::X25519 {
                ephemeral, wrapped, ..
            },
        ) => x25519::decrypt(ephemeral, public, secret, wrapped),
        (
            PublicParams::X448 { public },
            PlainSecretParams::X448 { secret },
            EncryptedSessionKeyParams::X448 {
                ephemeral, wrapped, ..
            },
        ) => x448::decrypt(ephemeral, public, secret, wrapped),
        (
            PublicParams::Aead { cipher, .. },
            PlainSecretParams::Aead { key, .. },
            EncryptedSessionKeyParams::Aead { encrypted },
        ) => symmetric_key::aead_decrypt(*cipher, key, encrypted),
        (
            PublicParams::MlKem768X25519 {
                ecc_public,
                mlkem_public,
            },
            PlainSecretParams::MlKem768X25519 {
                ecc_secret,
                mlkem_seed,
            },
            EncryptedSessionKeyParams::MlKem768X25519 {
                ecc_ciphertext,
                mlkem_ciphertext,
                wrapped,
                ..
            },
        ) => {
            let ct = ml_kem768_x25519::MlKemX25519Ciphertext {
                ecc_ciphertext: *ecc_ciphertext,
                mlkem_ciphertext: mlkem_ciphertext.clone(),
                wrapped_key: wrapped.clone(),
            };
            ml_kem768_x25519::decrypt(ecc_public, ecc_secret, mlkem_public, mlkem_seed, &ct)
        }
        _ => Err(mismatch()),
    }
}

/// Encrypts under a persistent AEAD key (symmetric, so the secret
/// parameters are required).
pub fn aead_key_encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    public: &PublicParams,
    secret: &PlainSecretParams,
    data: &[u8],
) -> Result<EncryptedSessionKeyParams> {
    match (public, secret) {
        (PublicParams::Aead { cipher, .. }, PlainSecretParams::Aead { key, .. }) => {
            Ok(EncryptedSessionKeyParams::Aead {
                encrypted: symmetric_key::aead_encrypt(rng, *cipher, key, data)?,
            })
        }
        _ => Err(mismatch()),
    }
}

/// Confirms that public and secret parameters belong together; reports
/// [`Error::KeyInvalid`] otherwise.
pub fn validate_params(public: &PublicParams, secret: &PlainSecretParams) -> Result<()> {
    let ok = match (public, secret) {
        (PublicParams::Rsa { n, e }, PlainSecretParams::Rsa { d, p, q, u }) => {
            rsa::validate_params(n, e, d, p, q, u)
        }
        (PublicParams::Dsa { p, q, g, y }, PlainSecretParams::Dsa { x }) => {
            dsa::validate_params(p, q, g, y, x)
        }
        (PublicParams::Elgamal { p, g, y }, PlainSecretParams::Elgamal { x }) => {
            elgamal::validate_params(p, g, y, x)
        }
        (PublicParams::Ecdsa { curve, q }, PlainSecretParams::Ecdsa { d }) => {
            ecdsa::validate_params(*curve, q, d)
        }
        (PublicParams::Ecdh { curve, q, .. }, PlainSecretParams::Ecdh { d }) => {
            ecdh::validate_params(*curve, q, d)
        }
        (PublicParams::EddsaLegacy { q, .. }, PlainSecretParams::EddsaLegacy { seed }) => {
            let public: [u8; 32] = legacy_point(q, 32)?.try_into().unwrap();
            let seed: [u8; 32] = left_pad(seed.as_bytes(), 32)?.try_into().unwrap();
            ed25519::validate_params(&public, &seed)
        }
        (PublicParams::Ed25519 { public }, PlainSecretParams::Ed25519 { seed }) => {
            ed25519::validate_params(public, seed)
        }
        (PublicParams::Ed448 { public }, PlainSecretParams::Ed448 { seed }) => {
            ed448::validate_params(public, seed)
        }
        (PublicParams::X25519 { public }, PlainSecretParams::X25519 { secret }) => {
            x25519::validate_params(public, secret)
        }
        (PublicParams::X448 { public }, PlainSecretParams::X448 { secret }) => {
            x448::validate_params(public, secret)
        }
        (
            PublicParams::Hmac {
                hash,
                binding_digest,
            },
            PlainSecretParams::Hmac { hash_seed, key },
        ) => symmetric_key::validate_params(
            binding_digest,
            hash_seed,
            key,
            symmetric_key::hmac_key_size(*hash),
        ),
        (
            PublicParams::Aead {
                cipher,
                binding_digest,
            },
            PlainSecretParams::Aead { hash_seed, key },
        ) => symmetric_key::validate_params(binding_digest, hash_seed, key, cipher.key_size()),
        (
            PublicParams::MlKem768X25519 {
                ecc_public,
                mlkem_public,
            },
            PlainSecretParams::MlKem768X25519 {
                ecc_secret,
                mlkem_seed,
            },
        ) => ml_kem768_x25519::validate_params(ecc_public, ecc_secret, mlkem_public, mlkem_seed),
        (
            PublicParams::MlDsa65Ed25519 {
                ecc_public,
                mldsa_public,
            },
            PlainSecretParams::MlDsa65Ed25519 {
                ecc_secret,
                mldsa_seed,
            },
        ) => ml_dsa65_ed25519::validate_params(ecc_public, ecc_secret, mldsa_public, mldsa_seed),
        (PublicParams::SlhDsaShake128s { public }, PlainSecretParams::SlhDsaShake128s { secret }) => {
            slh_dsa_shake128s::validate_params(public, secret)
        }
        _ => return Err(mismatch()),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::KeyInvalid)
    }
}

/// A session key together with its cipher algorithm.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey {
    /// Cipher the key is for; absent inside v6 envelopes.
    pub algorithm: Option<SymmetricKeyAlgorithm>,
    /// Key bytes.
    pub data: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("algorithm", &self.algorithm)
            .field("len", &self.data.len())
            .finish()
    }
}

impl SessionKey {
    /// Generates a fresh session key for `algorithm`.
    pub fn generate<R: CryptoRng + RngCore>(
        rng: &mut R,
        algorithm: SymmetricKeyAlgorithm,
    ) -> Self {
        let mut data = Zeroizing::new(vec![0u8; algorithm.key_size()]);
        rng.fill_bytes(&mut data);
        Self {
            algorithm: Some(algorithm),
            data,
        }
    }
}
