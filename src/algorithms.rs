//! Algorithm registries: numeric code points for public-key algorithms,
//! symmetric ciphers, hashes, AEAD modes, ECC curves, and packet tags.
//!
//! Code points follow RFC 9580 section 9 with the post-quantum extensions
//! from draft-ietf-openpgp-pqc.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public-key algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA encrypt or sign
    Rsa = 1,
    /// RSA encrypt-only (deprecated, parse-only)
    RsaEncrypt = 2,
    /// RSA sign-only (deprecated, parse-only)
    RsaSign = 3,
    /// ElGamal encrypt-only (deprecated)
    Elgamal = 16,
    /// DSA
    Dsa = 17,
    /// ECDH (curve in parameters)
    Ecdh = 18,
    /// ECDSA
    Ecdsa = 19,
    /// EdDSA with legacy (MPI) encoding
    EddsaLegacy = 22,
    /// X25519 with native encoding
    X25519 = 25,
    /// X448 with native encoding
    X448 = 26,
    /// Ed25519 with native encoding
    Ed25519 = 27,
    /// Ed448 with native encoding
    Ed448 = 28,
    /// Persistent HMAC key (experimental)
    Hmac = 101,
    /// Persistent AEAD key (experimental)
    Aead = 102,
    /// ML-KEM-768 + X25519 composite KEM
    MlKem768X25519 = 105,
    /// ML-DSA-65 + Ed25519 composite signature
    MlDsa65Ed25519 = 107,
    /// SLH-DSA-SHAKE-128s signature
    SlhDsaShake128s = 108,
}

impl PublicKeyAlgorithm {
    /// Converts a wire code to an algorithm identifier.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::Rsa),
            2 => Ok(Self::RsaEncrypt),
            3 => Ok(Self::RsaSign),
            16 => Ok(Self::Elgamal),
            17 => Ok(Self::Dsa),
            18 => Ok(Self::Ecdh),
            19 => Ok(Self::Ecdsa),
            22 => Ok(Self::EddsaLegacy),
            25 => Ok(Self::X25519),
            26 => Ok(Self::X448),
            27 => Ok(Self::Ed25519),
            28 => Ok(Self::Ed448),
            101 => Ok(Self::Hmac),
            102 => Ok(Self::Aead),
            105 => Ok(Self::MlKem768X25519),
            107 => Ok(Self::MlDsa65Ed25519),
            108 => Ok(Self::SlhDsaShake128s),
            other => Err(Error::unsupported(format!(
                "public-key algorithm {other}"
            ))),
        }
    }

    /// Returns the wire code.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns true for algorithms usable to encrypt a session key.
    pub fn can_encrypt(self) -> bool {
        matches!(
            self,
            Self::Rsa
                | Self::RsaEncrypt
                | Self::Elgamal
                | Self::Ecdh
                | Self::X25519
                | Self::X448
                | Self::Aead
                | Self::MlKem768X25519
        )
    }

    /// Returns true for algorithms usable to sign.
    pub fn can_sign(self) -> bool {
        matches!(
            self,
            Self::Rsa
                | Self::RsaSign
                | Self::Dsa
                | Self::Ecdsa
                | Self::EddsaLegacy
                | Self::Ed25519
                | Self::Ed448
                | Self::Hmac
                | Self::MlDsa65Ed25519
                | Self::SlhDsaShake128s
        )
    }

    /// Algorithm name as registered.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::RsaEncrypt => "RSA (encrypt-only)",
            Self::RsaSign => "RSA (sign-only)",
            Self::Elgamal => "ElGamal",
            Self::Dsa => "DSA",
            Self::Ecdh => "ECDH",
            Self::Ecdsa => "ECDSA",
            Self::EddsaLegacy => "EdDSA (legacy)",
            Self::X25519 => "X25519",
            Self::X448 => "X448",
            Self::Ed25519 => "Ed25519",
            Self::Ed448 => "Ed448",
            Self::Hmac => "HMAC",
            Self::Aead => "AEAD",
            Self::MlKem768X25519 => "ML-KEM-768+X25519",
            Self::MlDsa65Ed25519 => "ML-DSA-65+Ed25519",
            Self::SlhDsaShake128s => "SLH-DSA-SHAKE-128s",
        }
    }
}

impl fmt::Display for PublicKeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Symmetric-key cipher identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymmetricKeyAlgorithm {
    /// Plaintext (no cipher)
    Plaintext = 0,
    /// IDEA
    Idea = 1,
    /// Triple-DES (EDE)
    TripleDes = 2,
    /// CAST5
    Cast5 = 3,
    /// Blowfish
    Blowfish = 4,
    /// AES-128
    Aes128 = 7,
    /// AES-192
    Aes192 = 8,
    /// AES-256
    Aes256 = 9,
    /// Twofish-256
    Twofish = 10,
    /// Camellia-128
    Camellia128 = 11,
    /// Camellia-192
    Camellia192 = 12,
    /// Camellia-256
    Camellia256 = 13,
}

impl SymmetricKeyAlgorithm {
    /// Converts a wire code to a cipher identifier.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Self::Plaintext),
            1 => Ok(Self::Idea),
            2 => Ok(Self::TripleDes),
            3 => Ok(Self::Cast5),
            4 => Ok(Self::Blowfish),
            7 => Ok(Self::Aes128),
            8 => Ok(Self::Aes192),
            9 => Ok(Self::Aes256),
            10 => Ok(Self::Twofish),
            11 => Ok(Self::Camellia128),
            12 => Ok(Self::Camellia192),
            13 => Ok(Self::Camellia256),
            other => Err(Error::unsupported(format!("symmetric algorithm {other}"))),
        }
    }

    /// Returns the wire code.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Key size in bytes.
    pub fn key_size(self) -> usize {
        match self {
            Self::Plaintext => 0,
            Self::Idea | Self::Cast5 | Self::Blowfish | Self::Aes128 | Self::Camellia128 => 16,
            Self::TripleDes | Self::Aes192 | Self::Camellia192 => 24,
            Self::Aes256 | Self::Twofish | Self::Camellia256 => 32,
        }
    }

    /// Cipher block size in bytes.
    pub fn block_size(self) -> usize {
        match self {
            Self::Plaintext => 0,
            Self::Idea | Self::TripleDes | Self::Cast5 | Self::Blowfish => 8,
            Self::Aes128
            | Self::Aes192
            | Self::Aes256
            | Self::Twofish
            | Self::Camellia128
            | Self::Camellia192
            | Self::Camellia256 => 16,
        }
    }
}

/// Hash algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HashAlgorithm {
    /// MD5 (deprecated)
    Md5 = 1,
    /// SHA-1 (deprecated for signatures)
    Sha1 = 2,
    /// RIPEMD-160 (deprecated)
    Ripemd160 = 3,
    /// SHA-256
    Sha256 = 8,
    /// SHA-384
    Sha384 = 9,
    /// SHA-512
    Sha512 = 10,
    /// SHA-224
    Sha224 = 11,
    /// SHA3-256
    Sha3_256 = 12,
    /// SHA3-512
    Sha3_512 = 14,
}

impl HashAlgorithm {
    /// Converts a wire code to a hash identifier.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::Md5),
            2 => Ok(Self::Sha1),
            3 => Ok(Self::Ripemd160),
            8 => Ok(Self::Sha256),
            9 => Ok(Self::Sha384),
            10 => Ok(Self::Sha512),
            11 => Ok(Self::Sha224),
            12 => Ok(Self::Sha3_256),
            14 => Ok(Self::Sha3_512),
            other => Err(Error::unsupported(format!("hash algorithm {other}"))),
        }
    }

    /// Returns the wire code.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Digest length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 | Self::Ripemd160 => 20,
            Self::Sha224 => 28,
            Self::Sha256 | Self::Sha3_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }
}

/// AEAD mode identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AeadAlgorithm {
    /// EAX mode
    Eax = 1,
    /// OCB mode
    Ocb = 2,
    /// GCM mode
    Gcm = 3,
}

impl AeadAlgorithm {
    /// Converts a wire code to an AEAD identifier.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::Eax),
            2 => Ok(Self::Ocb),
            3 => Ok(Self::Gcm),
            other => Err(Error::unsupported(format!("AEAD algorithm {other}"))),
        }
    }

    /// Returns the wire code.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Nonce length in bytes.
    pub fn iv_length(self) -> usize {
        match self {
            Self::Eax => 16,
            Self::Ocb => 15,
            Self::Gcm => 12,
        }
    }

    /// Authentication tag length in bytes.
    pub fn tag_length(self) -> usize {
        16
    }
}

/// ECC curves addressed by OID in ECDH/ECDSA/EdDSA-legacy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EccCurve {
    /// NIST P-256
    P256,
    /// NIST P-384
    P384,
    /// NIST P-521
    P521,
    /// Brainpool P-256r1 (recognized, operations unsupported)
    BrainpoolP256r1,
    /// Brainpool P-384r1 (recognized, operations unsupported)
    BrainpoolP384r1,
    /// Brainpool P-512r1 (recognized, operations unsupported)
    BrainpoolP512r1,
    /// Ed25519 in legacy (OID) form
    Ed25519Legacy,
    /// Curve25519 in legacy (OID) form, for ECDH
    Curve25519Legacy,
}

impl EccCurve {
    /// Looks up a curve by its encoded OID body (without the length byte).
    pub fn from_oid(oid: &[u8]) -> Result<Self> {
        match oid {
            [0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07] => Ok(Self::P256),
            [0x2B, 0x81, 0x04, 0x00, 0x22] => Ok(Self::P384),
            [0x2B, 0x81, 0x04, 0x00, 0x23] => Ok(Self::P521),
            [0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07] => Ok(Self::BrainpoolP256r1),
            [0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0B] => Ok(Self::BrainpoolP384r1),
            [0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0D] => Ok(Self::BrainpoolP512r1),
            [0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01] => Ok(Self::Ed25519Legacy),
            [0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01] => {
                Ok(Self::Curve25519Legacy)
            }
            _ => Err(Error::unsupported("unknown curve OID")),
        }
    }

    /// Returns the encoded OID body.
    pub fn oid(self) -> &'static [u8] {
        match self {
            Self::P256 => &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07],
            Self::P384 => &[0x2B, 0x81, 0x04, 0x00, 0x22],
            Self::P521 => &[0x2B, 0x81, 0x04, 0x00, 0x23],
            Self::BrainpoolP256r1 => &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07],
            Self::BrainpoolP384r1 => &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0B],
            Self::BrainpoolP512r1 => &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0D],
            Self::Ed25519Legacy => &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01],
            Self::Curve25519Legacy => &[0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01],
        }
    }

    /// Size of a scalar (private key) in bytes.
    pub fn scalar_size(self) -> usize {
        match self {
            Self::P256 | Self::BrainpoolP256r1 => 32,
            Self::P384 | Self::BrainpoolP384r1 => 48,
            Self::P521 => 66,
            Self::BrainpoolP512r1 => 64,
            Self::Ed25519Legacy | Self::Curve25519Legacy => 32,
        }
    }

    /// Preferred hash for signatures over this curve.
    pub fn preferred_hash(self) -> HashAlgorithm {
        match self {
            Self::P256 | Self::BrainpoolP256r1 | Self::Ed25519Legacy | Self::Curve25519Legacy => {
                HashAlgorithm::Sha256
            }
            Self::P384 | Self::BrainpoolP384r1 => HashAlgorithm::Sha384,
            Self::P521 | Self::BrainpoolP512r1 => HashAlgorithm::Sha512,
        }
    }

    /// True for the OIDs RFC 9580 forbids on v6 keys.
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::Ed25519Legacy | Self::Curve25519Legacy)
    }
}

/// Packet tags handled by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tag {
    /// Public-Key Encrypted Session Key Packet
    PublicKeyEncryptedSessionKey = 1,
    /// Secret-Key Packet
    SecretKey = 5,
    /// Public-Key Packet
    PublicKey = 6,
    /// Secret-Subkey Packet
    SecretSubkey = 7,
    /// Public-Subkey Packet
    PublicSubkey = 14,
}

impl Tag {
    /// The tag byte in new-format framing (0xC0 | tag).
    pub fn ctb(self) -> u8 {
        0xC0 | self as u8
    }
}
