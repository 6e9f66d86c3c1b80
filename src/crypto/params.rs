//! Algorithm-tagged parameter records and their wire codecs.
//!
//! Every public-key algorithm contributes one variant per record kind:
//! public parameters, plain (decrypted) secret parameters, signature
//! values, and encrypted-session-key values. Serialization iterates the
//! fields in the order the wire format dictates; native fixed-length
//! algorithms (X/Ed25519, X/Ed448, the persistent symmetric keys, and the
//! post-quantum algorithms) bypass MPI framing entirely.

use crate::algorithms::{
    EccCurve, HashAlgorithm, PublicKeyAlgorithm, SymmetricKeyAlgorithm,
};
use crate::crypto::{
    ed25519, ed448, ml_dsa65_ed25519, ml_kem768_x25519, slh_dsa_shake128s, symmetric_key, x25519,
    x448,
};
use crate::error::{Error, Result};
use crate::mpi::{Mpi, Reader};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Public parameters for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicParams {
    /// RSA modulus and exponent.
    Rsa {
        /// Modulus.
        n: Mpi,
        /// Public exponent.
        e: Mpi,
    },
    /// DSA group and public value.
    Dsa {
        /// Prime modulus.
        p: Mpi,
        /// Group order.
        q: Mpi,
        /// Generator.
        g: Mpi,
        /// Public value.
        y: Mpi,
    },
    /// ElGamal group and public value.
    Elgamal {
        /// Prime modulus.
        p: Mpi,
        /// Generator.
        g: Mpi,
        /// Public value.
        y: Mpi,
    },
    /// ECDSA curve and point.
    Ecdsa {
        /// Curve.
        curve: EccCurve,
        /// Public point, SEC1 encoded in an MPI.
        q: Mpi,
    },
    /// ECDH curve, point, and KDF parameters.
    Ecdh {
        /// Curve.
        curve: EccCurve,
        /// Public point.
        q: Mpi,
        /// KDF digest.
        kdf_hash: HashAlgorithm,
        /// KEK cipher.
        kdf_cipher: SymmetricKeyAlgorithm,
    },
    /// EdDSA with legacy OID/MPI encoding; the curve must be Ed25519.
    EddsaLegacy {
        /// Curve (always the legacy Ed25519 OID).
        curve: EccCurve,
        /// Prefixed public point (0x40 ‖ A) in an MPI.
        q: Mpi,
    },
    /// Native Ed25519.
    Ed25519 {
        /// Public key.
        public: [u8; ed25519::KEY_LEN],
    },
    /// Native Ed448.
    Ed448 {
        /// Public key.
        public: [u8; ed448::KEY_LEN],
    },
    /// Native X25519.
    X25519 {
        /// Public key.
        public: [u8; x25519::KEY_LEN],
    },
    /// Native X448.
    X448 {
        /// Public key.
        public: [u8; x448::KEY_LEN],
    },
    /// Persistent HMAC key descriptor.
    Hmac {
        /// MAC digest algorithm.
        hash: HashAlgorithm,
        /// SHA-256 commitment to the private hash seed.
        binding_digest: [u8; symmetric_key::SEED_LEN],
    },
    /// Persistent AEAD key descriptor.
    Aead {
        /// Cipher the key belongs to.
        cipher: SymmetricKeyAlgorithm,
        /// SHA-256 commitment to the private hash seed.
        binding_digest: [u8; symmetric_key::SEED_LEN],
    },
    /// ML-KEM-768 + X25519 composite.
    MlKem768X25519 {
        /// X25519 public key.
        ecc_public: [u8; ml_kem768_x25519::ECC_LEN],
        /// ML-KEM encapsulation key.
        mlkem_public: Box<[u8; ml_kem768_x25519::MLKEM_PUBLIC_LEN]>,
    },
    /// ML-DSA-65 + Ed25519 composite.
    MlDsa65Ed25519 {
        /// Ed25519 public key.
        ecc_public: [u8; ml_dsa65_ed25519::ECC_LEN],
        /// ML-DSA public key.
        mldsa_public: Box<[u8; ml_dsa65_ed25519::MLDSA_PUBLIC_LEN]>,
    },
    /// SLH-DSA-SHAKE-128s.
    SlhDsaShake128s {
        /// Public key.
        public: [u8; slh_dsa_shake128s::PUBLIC_LEN],
    },
}

impl PublicParams {
    /// The algorithm these parameters belong to.
    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        match self {
            Self::Rsa { .. } => PublicKeyAlgorithm::Rsa,
            Self::Dsa { .. } => PublicKeyAlgorithm::Dsa,
            Self::Elgamal { .. } => PublicKeyAlgorithm::Elgamal,
            Self::Ecdsa { .. } => PublicKeyAlgorithm::Ecdsa,
            Self::Ecdh { .. } => PublicKeyAlgorithm::Ecdh,
            Self::EddsaLegacy { .. } => PublicKeyAlgorithm::EddsaLegacy,
            Self::Ed25519 { .. } => PublicKeyAlgorithm::Ed25519,
            Self::Ed448 { .. } => PublicKeyAlgorithm::Ed448,
            Self::X25519 { .. } => PublicKeyAlgorithm::X25519,
            Self::X448 { .. } => PublicKeyAlgorithm::X448,
            Self::Hmac { .. } => PublicKeyAlgorithm::Hmac,
            Self::Aead { .. } => PublicKeyAlgorithm::Aead,
            Self::MlKem768X25519 { .. } => PublicKeyAlgorithm::MlKem768X25519,
            Self::MlDsa65Ed25519 { .. } => PublicKeyAlgorithm::MlDsa65Ed25519,
            Self::SlhDsaShake128s { .. } => PublicKeyAlgorithm::SlhDsaShake128s,
        }
    }

    /// Appends the wire encoding in algorithm field order.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Rsa { n, e } => {
                n.write(out);
                e.write(out);
            }
            Self::Dsa { p, q, g, y } => {
                p.write(out);
                q.write(out);
                g.write(out);
                y.write(out);
            }
            Self::Elgamal { p, g, y } => {
                p.write(out);
                g.write(out);
                y.write(out);
            }
            Self::Ecdsa { curve, q } | Self::EddsaLegacy { curve, q } => {
                out.push(curve.oid().len() as u8);
                out.extend_from_slice(curve.oid());
                q.write(out);
            }
            Self::Ecdh {
                curve,
                q,
                kdf_hash,
                kdf_cipher,
            } => {
                out.push(curve.oid().len() as u8);
                out.extend_from_slice(curve.oid());
                q.write(out);
                out.push(3);
                out.push(1);
                out.push(kdf_hash.to_byte());
                out.push(kdf_cipher.to_byte());
            }
            Self::Ed25519 { public } => out.extend_from_slice(public),
            Self::Ed448 { public } => out.extend_from_slice(public),
            Self::X25519 { public } => out.extend_from_slice(public),
            Self::X448 { public } => out.extend_from_slice(public),
            Self::Hmac {
                hash,
                binding_digest,
            } => {
                out.push(hash.to_byte());
                out.extend_from_slice(binding_digest);
            }
            Self::Aead {
                cipher,
                binding_digest,
            } => {
                out.push(cipher.to_byte());
                out.extend_from_slice(binding_digest);
            }
            Self::MlKem768X25519 {
                ecc_public,
                mlkem_public,
            } => {
                out.extend_from_slice(ecc_public);
                out.extend_from_slice(&mlkem_public[..]);
            }
            Self::MlDsa65Ed25519 {
                ecc_public,
                mldsa_public,
            } => {
                out.extend_from_slice(ecc_public);
                out.extend_from_slice(&mldsa_public[..]);
            }
            Self::SlhDsaShake128s { public } => out.extend_from_slice(public),
        }
    }

    /// Returns the wire encoding.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

fn read_curve_oid(reader: &mut Reader<'_>) -> Result<EccCurve> {
    let len = reader.read_u8()? as usize;
    if len == 0 || len == 0xFF {
        return Err(Error::malformed("reserved curve OID length"));
    }
    EccCurve::from_oid(reader.read_exact(len)?)
}

/// Parses the public parameters for `algo` from the reader.
pub fn parse_public_params(
    algo: PublicKeyAlgorithm,
    reader: &mut Reader<'_>,
) -> Result<PublicParams> {
    match algo {
        PublicKeyAlgorithm::Rsa
        | PublicKeyAlgorithm::RsaEncrypt
        | PublicKeyAlgorithm::RsaSign => Ok(PublicParams::Rsa {
            n: reader.read_mpi()?,
            e: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Dsa => Ok(PublicParams::Dsa {
            p: reader.read_mpi()?,
            q: reader.read_mpi()?,
            g: reader.read_mpi()?,
            y: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Elgamal => Ok(PublicParams::Elgamal {
            p: reader.read_mpi()?,
            g: reader.read_mpi()?,
            y: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Ecdsa => Ok(PublicParams::Ecdsa {
            curve: read_curve_oid(reader)?,
            q: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Ecdh => {
            let curve = read_curve_oid(reader)?;
            let q = reader.read_mpi()?;
            let kdf_len = reader.read_u8()?;
            if kdf_len != 3 {
                return Err(Error::malformed("bad ECDH KDF parameter length"));
            }
            if reader.read_u8()? != 1 {
                return Err(Error::malformed("bad ECDH KDF version"));
            }
            Ok(PublicParams::Ecdh {
                curve,
                q,
                kdf_hash: HashAlgorithm::from_byte(reader.read_u8()?)?,
                kdf_cipher: SymmetricKeyAlgorithm::from_byte(reader.read_u8()?)?,
            })
        }
        PublicKeyAlgorithm::EddsaLegacy => {
            let curve = read_curve_oid(reader)?;
            if curve != EccCurve::Ed25519Legacy {
                return Err(Error::unsupported("EdDSA-legacy requires the Ed25519 OID"));
            }
            Ok(PublicParams::EddsaLegacy {
                curve,
                q: reader.read_mpi()?,
            })
        }
        PublicKeyAlgorithm::Ed25519 => Ok(PublicParams::Ed25519 {
            public: reader.read_array()?,
        }),
        PublicKeyAlgorithm::Ed448 => Ok(PublicParams::Ed448 {
            public: reader.read_array()?,
        }),
        PublicKeyAlgorithm::X25519 => Ok(PublicParams::X25519 {
            public: reader.read_array()?,
        }),
        PublicKeyAlgorithm::X448 => Ok(PublicParams::X448 {
            public: reader.read_array()?,
        }),
        PublicKeyAlgorithm::Hmac => Ok(PublicParams::Hmac {
            hash: HashAlgorithm::from_byte(reader.read_u8()?)?,
            binding_digest: reader.read_array()?,
        }),
        PublicKeyAlgorithm::Aead => Ok(PublicParams::Aead {
            cipher: SymmetricKeyAlgorithm::from_byte(reader.read_u8()?)?,
            binding_digest: reader.read_array()?,
        }),
        PublicKeyAlgorithm::MlKem768X25519 => {
            let ecc_public = reader.read_array()?;
            let mut mlkem_public = Box::new([0u8; ml_kem768_x25519::MLKEM_PUBLIC_LEN]);
            mlkem_public.copy_from_slice(
                reader.read_exact(ml_kem768_x25519::MLKEM_PUBLIC_LEN)?,
            );
            Ok(PublicParams::MlKem768X25519 {
                ecc_public,
                mlkem_public,
            })
        }
        PublicKeyAlgorithm::MlDsa65Ed25519 => {
            let ecc_public = reader.read_array()?;
            let mut mldsa_public = Box::new([0u8; ml_dsa65_ed25519::MLDSA_PUBLIC_LEN]);
            mldsa_public.copy_from_slice(
                reader.read_exact(ml_dsa65_ed25519::MLDSA_PUBLIC_LEN)?,
            );
            Ok(PublicParams::MlDsa65Ed25519 {
                ecc_public,
                mldsa_public,
            })
        }
        PublicKeyAlgorithm::SlhDsaShake128s => Ok(PublicParams::SlhDsaShake128s {
            public: reader.read_array()?,
        }),
    }
}

/// Decrypted secret parameters for one key.
///
/// The post-quantum variants store seeds only; the expanded secret keys
/// are re-derived on use and never serialized.
#[derive(Clone, PartialEq, Eq)]
pub enum PlainSecretParams {
    /// RSA secret values.
    Rsa {
        /// Private exponent.
        d: Mpi,
        /// First prime.
        p: Mpi,
        /// Second prime.
        q: Mpi,
        /// `p⁻¹ mod q`.
        u: Mpi,
    },
    /// DSA secret exponent.
    Dsa {
        /// Secret exponent.
        x: Mpi,
    },
    /// ElGamal secret exponent.
    Elgamal {
        /// Secret exponent.
        x: Mpi,
    },
    /// ECDSA secret scalar.
    Ecdsa {
        /// Secret scalar.
        d: Mpi,
    },
    /// ECDH secret scalar.
    Ecdh {
        /// Secret scalar.
        d: Mpi,
    },
    /// EdDSA-legacy seed.
    EddsaLegacy {
        /// Seed, MPI encoded on the wire.
        seed: Mpi,
    },
    /// Native Ed25519 seed.
    Ed25519 {
        /// Seed.
        seed: [u8; ed25519::KEY_LEN],
    },
    /// Native Ed448 seed.
    Ed448 {
        /// Seed.
        seed: [u8; ed448::KEY_LEN],
    },
    /// Native X25519 secret.
    X25519 {
        /// Secret scalar.
        secret: [u8; x25519::KEY_LEN],
    },
    /// Native X448 secret.
    X448 {
        /// Secret scalar.
        secret: [u8; x448::KEY_LEN],
    },
    /// Persistent HMAC key.
    Hmac {
        /// Seed the public digest commits to.
        hash_seed: [u8; symmetric_key::SEED_LEN],
        /// MAC key.
        key: Zeroizing<Vec<u8>>,
    },
    /// Persistent AEAD key.
    Aead {
        /// Seed the public digest commits to.
        hash_seed: [u8; symmetric_key::SEED_LEN],
        /// Cipher key.
        key: Zeroizing<Vec<u8>>,
    },
    /// ML-KEM-768 + X25519 secrets.
    MlKem768X25519 {
        /// X25519 secret scalar.
        ecc_secret: [u8; ml_kem768_x25519::ECC_LEN],
        /// ML-KEM seed (the expanded key is excluded from serialization).
        mlkem_seed: [u8; ml_kem768_x25519::MLKEM_SEED_LEN],
    },
    /// ML-DSA-65 + Ed25519 secrets.
    MlDsa65Ed25519 {
        /// Ed25519 seed.
        ecc_secret: [u8; ml_dsa65_ed25519::ECC_LEN],
        /// ML-DSA seed (the expanded key is excluded from serialization).
        mldsa_seed: [u8; ml_dsa65_ed25519::MLDSA_SEED_LEN],
    },
    /// SLH-DSA-SHAKE-128s secret.
    SlhDsaShake128s {
        /// Secret key.
        secret: Box<[u8; slh_dsa_shake128s::SECRET_LEN]>,
    },
}

impl fmt::Debug for PlainSecretParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rsa { .. } => "Rsa",
            Self::Dsa { .. } => "Dsa",
            Self::Elgamal { .. } => "Elgamal",
            Self::Ecdsa { .. } => "Ecdsa",
            Self::Ecdh { .. } => "Ecdh",
            Self::EddsaLegacy { .. } => "EddsaLegacy",
            Self::Ed25519 { .. } => "Ed25519",
            Self::Ed448 { .. } => "Ed448",
            Self::X25519 { .. } => "X25519",
            Self::X448 { .. } => "X448",
            Self::Hmac { .. } => "Hmac",
            Self::Aead { .. } => "Aead",
            Self::MlKem768X25519 { .. } => "MlKem768X25519",
            Self::MlDsa65Ed25519 { .. } => "MlDsa65Ed25519",
            Self::SlhDsaShake128s { .. } => "SlhDsaShake128s",
        };
        write!(f, "PlainSecretParams::{name}(..)")
    }
}

impl Zeroize for PlainSecretParams {
    fn zeroize(&mut self) {
        match self {
            Self::Rsa { d, p, q, u } => {
                d.zeroize();
                p.zeroize();
                q.zeroize();
                u.zeroize();
            }
            Self::Dsa { x } | Self::Elgamal { x } => x.zeroize(),
            Self::Ecdsa { d } | Self::Ecdh { d } => d.zeroize(),
            Self::EddsaLegacy { seed } => seed.zeroize(),
            Self::Ed25519 { seed } => seed.zeroize(),
            Self::Ed448 { seed } => seed.zeroize(),
            Self::X25519 { secret } => secret.zeroize(),
            Self::X448 { secret } => secret.zeroize(),
            Self::Hmac { hash_seed, key } | Self::Aead { hash_seed, key } => {
                hash_seed.zeroize();
                key.zeroize();
            }
            Self::MlKem768X25519 {
                ecc_secret,
                mlkem_seed,
            } => {
                ecc_secret.zeroize();
                mlkem_seed.zeroize();
            }
            Self::MlDsa65Ed25519 {
                ecc_secret,
                mldsa_seed,
            } => {
                ecc_secret.zeroize();
                mldsa_seed.zeroize();
            }
            Self::SlhDsaShake128s { secret } => secret.as_mut().zeroize(),
        }
    }
}

impl PlainSecretParams {
    /// Appends the wire encoding in algorithm field order. Expanded
    /// post-quantum secrets are never written, only their seeds.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Rsa { d, p, q, u } => {
                d.write(out);
                p.write(out);
                q.write(out);
                u.write(out);
            }
            Self::Dsa { x } | Self::Elgamal { x } => x.write(out),
            Self::Ecdsa { d } | Self::Ecdh { d } => d.write(out),
            Self::EddsaLegacy { seed } => seed.write(out),
            Self::Ed25519 { seed } => out.extend_from_slice(seed),
            Self::Ed448 { seed } => out.extend_from_slice(seed),
            Self::X25519 { secret } => out.extend_from_slice(secret),
            Self::X448 { secret } => out.extend_from_slice(secret),
            Self::Hmac { hash_seed, key } | Self::Aead { hash_seed, key } => {
                out.extend_from_slice(hash_seed);
                out.extend_from_slice(key);
            }
            Self::MlKem768X25519 {
                ecc_secret,
                mlkem_seed,
            } => {
                out.extend_from_slice(ecc_secret);
                out.extend_from_slice(mlkem_seed);
            }
            Self::MlDsa65Ed25519 {
                ecc_secret,
                mldsa_seed,
            } => {
                out.extend_from_slice(ecc_secret);
                out.extend_from_slice(mldsa_seed);
            }
            Self::SlhDsaShake128s { secret } => out.extend_from_slice(&secret[..]),
        }
    }

    /// Returns the wire encoding.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

/// Parses the secret parameters for the algorithm of `public`. The public
/// record supplies the key lengths the persistent symmetric keys need.
pub fn parse_secret_params(
    public: &PublicParams,
    reader: &mut Reader<'_>,
) -> Result<PlainSecretParams> {
    match public {
        PublicParams::Rsa { .. } => Ok(PlainSecretParams::Rsa {
            d: reader.read_mpi()?,
            p: reader.read_mpi()?,
            q: reader.read_mpi()?,
            u: reader.read_mpi()?,
        }),
        PublicParams::Dsa { .. } => Ok(PlainSecretParams::Dsa {
            x: reader.read_mpi()?,
        }),
        PublicParams::Elgamal { .. } => Ok(PlainSecretParams::Elgamal {
            x: reader.read_mpi()?,
        }),
        PublicParams::Ecdsa { .. } => Ok(PlainSecretParams::Ecdsa {
            d: reader.read_mpi()?,
        }),
        PublicParams::Ecdh { .. } => Ok(PlainSecretParams::Ecdh {
            d: reader.read_mpi()?,
        }),
        PublicParams::EddsaLegacy { .. } => Ok(PlainSecretParams::EddsaLegacy {
            seed: reader.read_mpi()?,
        }),
        PublicParams::Ed25519 { .. } => Ok(PlainSecretParams::Ed25519 {
            seed: reader.read_array()?,
        }),
        PublicParams::Ed448 { .. } => Ok(PlainSecretParams::Ed448 {
            seed: reader.read_array()?,
        }),
        PublicParams::X25519 { .. } => Ok(PlainSecretParams::X25519 {
            secret: reader.read_array()?,
        }),
        PublicParams::X448 { .. } => Ok(PlainSecretParams::X448 {
            secret: reader.read_array()?,
        }),
        PublicParams::Hmac { hash, .. } => Ok(PlainSecretParams::Hmac {
            hash_seed: reader.read_array()?,
            key: Zeroizing::new(
                reader
                    .read_exact(symmetric_key::hmac_key_size(*hash))?
                    .to_vec(),
            ),
        }),
        PublicParams::Aead { cipher, .. } => Ok(PlainSecretParams::Aead {
            hash_seed: reader.read_array()?,
            key: Zeroizing::new(reader.read_exact(cipher.key_size())?.to_vec()),
        }),
        PublicParams::MlKem768X25519 { .. } => {
            let params = PlainSecretParams::MlKem768X25519 {
                ecc_secret: reader.read_array()?,
                mlkem_seed: reader.read_array()?,
            };
            // Validate the seed by expanding it once, the way the expanded
            // key would be rebuilt on use.
            if let PlainSecretParams::MlKem768X25519 { mlkem_seed, .. } = &params {
                ml_kem768_x25519::expand_mlkem_seed(mlkem_seed)?;
            }
            Ok(params)
        }
        PublicParams::MlDsa65Ed25519 { .. } => {
            let params = PlainSecretParams::MlDsa65Ed25519 {
                ecc_secret: reader.read_array()?,
                mldsa_seed: reader.read_array()?,
            };
            if let PlainSecretParams::MlDsa65Ed25519 { mldsa_seed, .. } = &params {
                ml_dsa65_ed25519::expand_mldsa_seed(mldsa_seed)?;
            }
            Ok(params)
        }
        PublicParams::SlhDsaShake128s { .. } => {
            let mut secret = Box::new([0u8; slh_dsa_shake128s::SECRET_LEN]);
            secret.copy_from_slice(reader.read_exact(slh_dsa_shake128s::SECRET_LEN)?);
            Ok(PlainSecretParams::SlhDsaShake128s { secret })
        }
    }
}

/// Signature values for one algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParams {
    /// RSA signature value.
    Rsa {
        /// `s`.
        s: Mpi,
    },
    /// DSA signature pair.
    Dsa {
        /// `r`.
        r: Mpi,
        /// `s`.
        s: Mpi,
    },
    /// ECDSA signature pair.
    Ecdsa {
        /// `r`.
        r: Mpi,
        /// `s`.
        s: Mpi,
    },
    /// EdDSA-legacy signature halves.
    EddsaLegacy {
        /// `R`.
        r: Mpi,
        /// `S`.
        s: Mpi,
    },
    /// Native Ed25519 signature.
    Ed25519 {
        /// Signature bytes.
        sig: [u8; ed25519::SIG_LEN],
    },
    /// Native Ed448 signature.
    Ed448 {
        /// Signature bytes.
        sig: [u8; ed448::SIG_LEN],
    },
    /// HMAC value.
    Hmac {
        /// MAC bytes.
        mac: Vec<u8>,
    },
    /// Composite ML-DSA + Ed25519 signature.
    MlDsa65Ed25519 {
        /// Ed25519 component.
        ecc_sig: [u8; ml_dsa65_ed25519::ECC_SIG_LEN],
        /// ML-DSA component.
        mldsa_sig: Box<[u8; ml_dsa65_ed25519::MLDSA_SIG_LEN]>,
    },
    /// SLH-DSA signature.
    SlhDsaShake128s {
        /// Signature bytes.
        sig: Box<[u8; slh_dsa_shake128s::SIG_LEN]>,
    },
}

impl SignatureParams {
    /// Appends the wire encoding.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Rsa { s } => s.write(out),
            Self::Dsa { r, s } | Self::Ecdsa { r, s } | Self::EddsaLegacy { r, s } => {
                r.write(out);
                s.write(out);
            }
            Self::Ed25519 { sig } => out.extend_from_slice(sig),
            Self::Ed448 { sig } => out.extend_from_slice(sig),
            Self::Hmac { mac } => {
                out.push(mac.len() as u8);
                out.extend_from_slice(mac);
            }
            Self::MlDsa65Ed25519 { ecc_sig, mldsa_sig } => {
                out.extend_from_slice(ecc_sig);
                out.extend_from_slice(&mldsa_sig[..]);
            }
            Self::SlhDsaShake128s { sig } => out.extend_from_slice(&sig[..]),
        }
    }

    /// Returns the wire encoding.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

/// Parses the signature values for `algo` from the reader.
pub fn parse_signature_params(
    algo: PublicKeyAlgorithm,
    reader: &mut Reader<'_>,
) -> Result<SignatureParams> {
    match algo {
        PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaSign => Ok(SignatureParams::Rsa {
            s: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Dsa => Ok(SignatureParams::Dsa {
            r: reader.read_mpi()?,
            s: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Ecdsa => Ok(SignatureParams::Ecdsa {
            r: reader.read_mpi()?,
            s: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::EddsaLegacy => Ok(SignatureParams::EddsaLegacy {
            r: reader.read_mpi()?,
            s: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Ed25519 => Ok(SignatureParams::Ed25519 {
            sig: reader.read_array()?,
        }),
        PublicKeyAlgorithm::Ed448 => Ok(SignatureParams::Ed448 {
            sig: reader.read_array()?,
        }),
        PublicKeyAlgorithm::Hmac => {
            let len = reader.read_u8()? as usize;
            Ok(SignatureParams::Hmac {
                mac: reader.read_exact(len)?.to_vec(),
            })
        }
        PublicKeyAlgorithm::MlDsa65Ed25519 => {
            let ecc_sig = reader.read_array()?;
            let mut mldsa_sig = Box::new([0u8; ml_dsa65_ed25519::MLDSA_SIG_LEN]);
            mldsa_sig.copy_from_slice(reader.read_exact(ml_dsa65_ed25519::MLDSA_SIG_LEN)?);
            Ok(SignatureParams::MlDsa65Ed25519 { ecc_sig, mldsa_sig })
        }
        PublicKeyAlgorithm::SlhDsaShake128s => {
            let mut sig = Box::new([0u8; slh_dsa_shake128s::SIG_LEN]);
            sig.copy_from_slice(reader.read_exact(slh_dsa_shake128s::SIG_LEN)?);
            Ok(SignatureParams::SlhDsaShake128s { sig })
        }
        other => Err(Error::unsupported(format!(
            "signatures with {other}"
        ))),
    }
}

/// Encrypted session-key values carried in a PKESK packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptedSessionKeyParams {
    /// RSA ciphertext.
    Rsa {
        /// `m^e mod n`.
        c: Mpi,
    },
    /// ElGamal ciphertext pair.
    Elgamal {
        /// `g^k`.
        e: Mpi,
        /// `m · y^k`.
        c: Mpi,
    },
    /// ECDH ephemeral point and wrapped key.
    Ecdh {
        /// Ephemeral public point.
        ephemeral: Mpi,
        /// AES-KW wrapped, PKCS5 padded session key.
        wrapped: Vec<u8>,
    },
    /// X25519 ephemeral and wrapped key.
    X25519 {
        /// Ephemeral public key.
        ephemeral: [u8; x25519::KEY_LEN],
        /// Session-key cipher; v3 only, never present for v6.
        sym_alg: Option<SymmetricKeyAlgorithm>,
        /// AES-128-KW wrapped session key.
        wrapped: Vec<u8>,
    },
    /// X448 ephemeral and wrapped key.
    X448 {
        /// Ephemeral public key.
        ephemeral: [u8; x448::KEY_LEN],
        /// Session-key cipher; v3 only, never present for v6.
        sym_alg: Option<SymmetricKeyAlgorithm>,
        /// AES-256-KW wrapped session key.
        wrapped: Vec<u8>,
    },
    /// Persistent-AEAD-key ciphertext.
    Aead {
        /// iv ‖ ciphertext.
        encrypted: Vec<u8>,
    },
    /// Composite KEM ciphertext triple.
    MlKem768X25519 {
        /// X25519 ephemeral key.
        ecc_ciphertext: [u8; ml_kem768_x25519::ECC_LEN],
        /// ML-KEM ciphertext.
        mlkem_ciphertext: Box<[u8; ml_kem768_x25519::MLKEM_CIPHERTEXT_LEN]>,
        /// Session-key cipher; v3 only, never present for v6.
        sym_alg: Option<SymmetricKeyAlgorithm>,
        /// AES-256-KW wrapped session key.
        wrapped: Vec<u8>,
    },
}

impl EncryptedSessionKeyParams {
    /// True for the algorithms whose wrapped-key field carries the cipher
    /// algorithm outside the encrypted blob.
    pub fn carries_cleartext_cipher(&self) -> bool {
        matches!(
            self,
            Self::X25519 { .. } | Self::X448 { .. } | Self::MlKem768X25519 { .. }
        )
    }

    /// Appends the wire encoding for a PKESK of `version`.
    pub fn write(&self, version: u8, out: &mut Vec<u8>) -> Result<()> {
        let check_sym = |sym_alg: &Option<SymmetricKeyAlgorithm>| -> Result<()> {
            if version == 6 && sym_alg.is_some() {
                return Err(Error::malformed(
                    "v6 session keys must not carry a cipher algorithm",
                ));
            }
            if version == 3 && sym_alg.is_none() {
                return Err(Error::malformed(
                    "v3 session keys must carry a cipher algorithm",
                ));
            }
            Ok(())
        };
        match self {
            Self::Rsa { c } => c.write(out),
            Self::Elgamal { e, c } => {
                e.write(out);
                c.write(out);
            }
            Self::Ecdh { ephemeral, wrapped } => {
                ephemeral.write(out);
                out.push(wrapped.len() as u8);
                out.extend_from_slice(wrapped);
            }
            Self::X25519 {
                ephemeral,
                sym_alg,
                wrapped,
            } => {
                check_sym(sym_alg)?;
                out.extend_from_slice(ephemeral);
                let extra = usize::from(sym_alg.is_some());
                out.push((wrapped.len() + extra) as u8);
                if let Some(alg) = sym_alg {
                    out.push(alg.to_byte());
                }
                out.extend_from_slice(wrapped);
            }
            Self::X448 {
                ephemeral,
                sym_alg,
                wrapped,
            } => {
                check_sym(sym_alg)?;
                out.extend_from_slice(ephemeral);
                let extra = usize::from(sym_alg.is_some());
                out.push((wrapped.len() + extra) as u8);
                if let Some(alg) = sym_alg {
                    out.push(alg.to_byte());
                }
                out.extend_from_slice(wrapped);
            }
            Self::Aead { encrypted } => {
                out.push(encrypted.len() as u8);
                out.extend_from_slice(encrypted);
            }
            Self::MlKem768X25519 {
                ecc_ciphertext,
                mlkem_ciphertext,
                sym_alg,
                wrapped,
            } => {
                check_sym(sym_alg)?;
                out.extend_from_slice(ecc_ciphertext);
                out.extend_from_slice(&mlkem_ciphertext[..]);
                let extra = usize::from(sym_alg.is_some());
                out.push((wrapped.len() + extra) as u8);
                if let Some(alg) = sym_alg {
                    out.push(alg.to_byte());
                }
                out.extend_from_slice(wrapped);
            }
        }
        Ok(())
    }
}

fn read_prefixed_wrapped(
    reader: &mut Reader<'_>,
    version: u8,
) -> Result<(Option<SymmetricKeyAlgorithm>, Vec<u8>)> {
    let len = reader.read_u8()? as usize;
    if version == 3 {
        if len == 0 {
            return Err(Error::malformed("empty wrapped session key"));
        }
        let sym = SymmetricKeyAlgorithm::from_byte(reader.read_u8()?)?;
        Ok((Some(sym), reader.read_exact(len - 1)?.to_vec()))
    } else {
        Ok((None, reader.read_exact(len)?.to_vec()))
    }
}

/// Parses the encrypted session-key values for `algo` from a version-`version`
/// PKESK body.
pub fn parse_enc_session_key_params(
    algo: PublicKeyAlgorithm,
    reader: &mut Reader<'_>,
    version: u8,
) -> Result<EncryptedSessionKeyParams> {
    match algo {
        PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaEncrypt => {
            Ok(EncryptedSessionKeyParams::Rsa {
                c: reader.read_mpi()?,
            })
        }
        PublicKeyAlgorithm::Elgamal => Ok(EncryptedSessionKeyParams::Elgamal {
            e: reader.read_mpi()?,
            c: reader.read_mpi()?,
        }),
        PublicKeyAlgorithm::Ecdh => {
            let ephemeral = reader.read_mpi()?;
            let len = reader.read_u8()? as usize;
            Ok(EncryptedSessionKeyParams::Ecdh {
                ephemeral,
                wrapped: reader.read_exact(len)?.to_vec(),
            })
        }
        PublicKeyAlgorithm::X25519 => {
            let ephemeral = reader.read_array()?;
            let (sym_alg, wrapped) = read_prefixed_wrapped(reader, version)?;
            Ok(EncryptedSessionKeyParams::X25519 {
                ephemeral,
                sym_alg,
                wrapped,
            })
        }
        PublicKeyAlgorithm::X448 => {
            let ephemeral = reader.read_array()?;
            let (sym_alg, wrapped) = read_prefixed_wrapped(reader, version)?;
            Ok(EncryptedSessionKeyParams::X448 {
                ephemeral,
                sym_alg,
                wrapped,
            })
        }
        PublicKeyAlgorithm::Aead => {
            let len = reader.read_u8()? as usize;
            Ok(EncryptedSessionKeyParams::Aead {
                encrypted: reader.read_exact(len)?.to_vec(),
            })
        }
        PublicKeyAlgorithm::MlKem768X25519 => {
            let ecc_ciphertext = reader.read_array()?;
            let mut mlkem_ciphertext =
                Box::new([0u8; ml_kem768_x25519::MLKEM_CIPHERTEXT_LEN]);
            mlkem_ciphertext.copy_from_slice(
                reader.read_exact(ml_kem768_x25519::MLKEM_CIPHERTEXT_LEN)?,
            );
            let (sym_alg, wrapped) = read_prefixed_wrapped(reader, version)?;
            Ok(EncryptedSessionKeyParams::MlKem768X25519 {
                ecc_ciphertext,
                mlkem_ciphertext,
                sym_alg,
                wrapped,
            })
        }
        other => Err(Error::unsupported(format!(
            "session-key encryption with {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_public(params: &PublicParams) {
        let wire = params.to_vec();
        let mut reader = Reader::new(&wire);
        let parsed = parse_public_params(params.algorithm(), &mut reader).unwrap();
        assert_eq!(&parsed, params);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_public_params_roundtrip() {
        roundtrip_public(&PublicParams::Rsa {
            n: Mpi::from_slice(&[0xC3; 256]),
            e: Mpi::from_slice(&[1, 0, 1]),
        });
        roundtrip_public(&PublicParams::Ecdh {
            curve: EccCurve::P256,
            q: Mpi::from_slice(&[0x04; 65]),
            kdf_hash: HashAlgorithm::Sha256,
            kdf_cipher: SymmetricKeyAlgorithm::Aes128,
        });
        roundtrip_public(&PublicParams::Ed25519 { public: [7; 32] });
        roundtrip_public(&PublicParams::Hmac {
            hash: HashAlgorithm::Sha256,
            binding_digest: [9; 32],
        });
        roundtrip_public(&PublicParams::MlKem768X25519 {
            ecc_public: [1; 32],
            mlkem_public: Box::new([2; 1184]),
        });
    }

    #[test]
    fn test_secret_params_roundtrip() {
        let public = PublicParams::Hmac {
            hash: HashAlgorithm::Sha256,
            binding_digest: [0; 32],
        };
        let secret = PlainSecretParams::Hmac {
            hash_seed: [3; 32],
            key: Zeroizing::new(vec![4; 32]),
        };
        let wire = secret.to_vec();
        let parsed = parse_secret_params(&public, &mut Reader::new(&wire)).unwrap();
        assert_eq!(parsed, secret);
    }

    #[test]
    fn test_eddsa_legacy_requires_legacy_oid() {
        // an EdDSA-legacy key claiming P-256 must be rejected
        let mut wire = Vec::new();
        wire.push(EccCurve::P256.oid().len() as u8);
        wire.extend_from_slice(EccCurve::P256.oid());
        Mpi::from_slice(&[0x40; 33]).write(&mut wire);
        assert!(parse_public_params(
            PublicKeyAlgorithm::EddsaLegacy,
            &mut Reader::new(&wire)
        )
        .is_err());
    }

    #[test]
    fn test_session_key_params_version_rules() {
        let params = EncryptedSessionKeyParams::X25519 {
            ephemeral: [5; 32],
            sym_alg: Some(SymmetricKeyAlgorithm::Aes128),
            wrapped: vec![0; 24],
        };
        // v3 serializes the cipher byte in clear
        let mut v3 = Vec::new();
        params.write(3, &mut v3).unwrap();
        assert_eq!(v3[32], 25); // count: 1 + 24
        assert_eq!(v3[33], SymmetricKeyAlgorithm::Aes128.to_byte());

        // v6 must refuse to serialize it
        let mut v6 = Vec::new();
        assert!(params.write(6, &mut v6).is_err());

        // a v6 parse never produces a cipher algorithm
        let v6_params = EncryptedSessionKeyParams::X25519 {
            ephemeral: [5; 32],
            sym_alg: None,
            wrapped: vec![0; 24],
        };
        let mut wire = Vec::new();
        v6_params.write(6, &mut wire).unwrap();
        let parsed = parse_enc_session_key_params(
            PublicKeyAlgorithm::X25519,
            &mut Reader::new(&wire),
            6,
        )
        .unwrap();
        assert_eq!(parsed, v6_params);
    }

    #[test]
    fn test_truncated_pqc_public_rejected() {
        let wire = vec![0u8; 100];
        assert!(parse_public_params(
            PublicKeyAlgorithm::MlKem768X25519,
            &mut Reader::new(&wire)
        )
        .is_err());
    }

    #[test]
    fn test_zeroize_clears_material() {
        let mut secret = PlainSecretParams::Ed25519 { seed: [0xAB; 32] };
        secret.zeroize();
        assert!(matches!(secret, PlainSecretParams::Ed25519 { seed } if seed == [0; 32]));
    }
}
