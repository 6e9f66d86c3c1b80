//! Persistent symmetric "keys" (experimental algorithms 101 and 102): HMAC
//! signing keys and AEAD encryption keys carried in key packets.
//!
//! The public half is only a descriptor: the algorithm tag plus a SHA-256
//! binding digest of the private hash seed, so the secret material cannot
//! be swapped without detection.

use crate::algorithms::{HashAlgorithm, SymmetricKeyAlgorithm};
use crate::crypto::timing;
use crate::error::{Error, Result};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the private hash seed and its public binding digest.
pub const SEED_LEN: usize = 32;
/// GCM nonce length used for AEAD keys.
const GCM_IV_LEN: usize = 12;

/// Generated persistent-key material.
pub struct SymmetricKey {
    /// SHA-256 of `hash_seed`, carried publicly.
    pub binding_digest: [u8; SEED_LEN],
    /// Private seed the binding digest commits to.
    pub hash_seed: [u8; SEED_LEN],
    /// Raw MAC or cipher key.
    pub key_material: Zeroizing<Vec<u8>>,
}

/// Expected key length for an HMAC key over `hash`.
pub fn hmac_key_size(hash: HashAlgorithm) -> usize {
    hash.digest_size()
}

/// Computes the public binding digest for a seed.
pub fn binding_digest(hash_seed: &[u8; SEED_LEN]) -> [u8; SEED_LEN] {
    Sha256::digest(hash_seed).into()
}

fn generate_material<R: CryptoRng + RngCore>(rng: &mut R, key_len: usize) -> SymmetricKey {
    let mut hash_seed = [0u8; SEED_LEN];
    rng.fill_bytes(&mut hash_seed);
    let mut key_material = Zeroizing::new(vec![0u8; key_len]);
    rng.fill_bytes(&mut key_material);
    SymmetricKey {
        binding_digest: binding_digest(&hash_seed),
        hash_seed,
        key_material,
    }
}

/// Generates an HMAC key for `hash`.
pub fn generate_hmac<R: CryptoRng + RngCore>(rng: &mut R, hash: HashAlgorithm) -> SymmetricKey {
    generate_material(rng, hmac_key_size(hash))
}

/// Generates an AEAD key for `cipher`.
pub fn generate_aead<R: CryptoRng + RngCore>(
    rng: &mut R,
    cipher: SymmetricKeyAlgorithm,
) -> SymmetricKey {
    generate_material(rng, cipher.key_size())
}

/// Computes the MAC over `data`.
pub fn hmac_sign(hash: HashAlgorithm, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    macro_rules! mac {
        ($digest:ty) => {{
            let mut mac = <Hmac<$digest> as Mac>::new_from_slice(key)
                .map_err(|_| Error::KeyInvalid)?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }};
    }
    match hash {
        HashAlgorithm::Sha256 => mac!(sha2::Sha256),
        HashAlgorithm::Sha384 => mac!(sha2::Sha384),
        HashAlgorithm::Sha512 => mac!(sha2::Sha512),
        other => Err(Error::unsupported(format!("HMAC over {other:?}"))),
    }
}

/// Verifies a MAC in constant time.
pub fn hmac_verify(hash: HashAlgorithm, key: &[u8], data: &[u8], mac: &[u8]) -> Result<bool> {
    let expected = hmac_sign(hash, key, data)?;
    Ok(bool::from(timing::bytes_equal(&expected, mac)))
}

/// Encrypts `data` under an AEAD persistent key; output is iv ‖ ciphertext.
pub fn aead_encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    cipher: SymmetricKeyAlgorithm,
    key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>> {
    let mut iv = vec![0u8; GCM_IV_LEN];
    rng.fill_bytes(&mut iv);
    let ct = gcm_run(cipher, key, &iv, data, true)?;
    let mut out = iv;
    out.extend_from_slice(&ct);
    Ok(out)
}

/// Decrypts iv ‖ ciphertext produced by [`aead_encrypt`].
pub fn aead_decrypt(
    cipher: SymmetricKeyAlgorithm,
    key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>> {
    if data.len() < GCM_IV_LEN {
        return Err(Error::Decryption);
    }
    let (iv, ct) = data.split_at(GCM_IV_LEN);
    gcm_run(cipher, key, iv, ct, false)
}

fn gcm_run(
    cipher: SymmetricKeyAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    encrypt: bool,
) -> Result<Vec<u8>> {
    macro_rules! gcm {
        ($aes:ty) => {{
            type Cipher = aes_gcm::AesGcm<$aes, aes_gcm::aead::consts::U12>;
            let cipher = <Cipher>::new_from_slice(key).map_err(|_| Error::KeyInvalid)?;
            let nonce = aes_gcm::aead::Nonce::<Cipher>::from_slice(iv);
            let payload = Payload { msg: data, aad: b"" };
            if encrypt {
                cipher
                    .encrypt(nonce, payload)
                    .map_err(|_| Error::crypto("AEAD encryption failed"))
            } else {
                cipher.decrypt(nonce, payload).map_err(|_| Error::Decryption)
            }
        }};
    }
    match cipher {
        SymmetricKeyAlgorithm::Aes128 => gcm!(aes::Aes128),
        SymmetricKeyAlgorithm::Aes192 => gcm!(aes::Aes192),
        SymmetricKeyAlgorithm::Aes256 => gcm!(aes::Aes256),
        other => Err(Error::unsupported(format!("AEAD key cipher {other:?}"))),
    }
}

/// Checks the binding digest and key-material length against the public
/// descriptor.
pub fn validate_params(
    expected_digest: &[u8; SEED_LEN],
    hash_seed: &[u8; SEED_LEN],
    key_material: &[u8],
    expected_key_len: usize,
) -> bool {
    let digest_ok = bool::from(timing::bytes_equal(
        &binding_digest(hash_seed),
        expected_digest,
    ));
    digest_ok && key_material.len() == expected_key_len
}
