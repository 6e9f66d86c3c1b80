//! X448 session-key encryption (algorithm 26): one-pass DH, HKDF-SHA512
//! key derivation, AES-256 key wrap.

use crate::crypto::aes_kw;
use crate::error::{Error, Result};
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use sha2::Sha512;
use x448::{PublicKey, Secret};
use zeroize::Zeroizing;

/// Key and ephemeral length.
pub const KEY_LEN: usize = 56;
/// Derived KEK length (AES-256).
const KEK_LEN: usize = 32;
const HKDF_INFO: &[u8] = b"OpenPGP X448";

/// Generated X448 key material.
pub struct X448Key {
    /// Public key bytes.
    pub public: [u8; KEY_LEN],
    /// Secret scalar, native encoding.
    pub secret: [u8; KEY_LEN],
}

fn secret_from_bytes(bytes: &[u8; KEY_LEN]) -> Result<Secret> {
    Secret::from_bytes(bytes).ok_or(Error::KeyInvalid)
}

fn public_from_bytes(bytes: &[u8; KEY_LEN]) -> Result<PublicKey> {
    PublicKey::from_bytes(bytes).ok_or_else(|| Error::malformed("invalid X448 public key"))
}

fn random_secret<R: CryptoRng + RngCore>(rng: &mut R) -> Secret {
    let mut bytes = [0u8; KEY_LEN];
    rng.fill_bytes(&mut bytes);
    Secret::from(bytes)
}

/// Generates a key pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> X448Key {
    let secret = random_secret(rng);
    X448Key {
        public: *PublicKey::from(&secret).as_bytes(),
        secret: *secret.as_bytes(),
    }
}

fn derive_kek(
    ephemeral: &[u8; KEY_LEN],
    recipient: &[u8; KEY_LEN],
    shared: &[u8],
) -> Result<Zeroizing<[u8; KEK_LEN]>> {
    let mut ikm = Zeroizing::new(Vec::with_capacity(3 * KEY_LEN));
    ikm.extend_from_slice(ephemeral);
    ikm.extend_from_slice(recipient);
    ikm.extend_from_slice(shared);
    let hk = Hkdf::<Sha512>::new(None, &ikm);
    let mut kek = Zeroizing::new([0u8; KEK_LEN]);
    hk.expand(HKDF_INFO, kek.as_mut())
        .map_err(|e| Error::crypto(format!("HKDF expand failed: {e}")))?;
    Ok(kek)
}

/// Encrypts a session key. Returns the ephemeral public key and the
/// wrapped session key.
pub fn encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    recipient: &[u8; KEY_LEN],
    data: &[u8],
) -> Result<([u8; KEY_LEN], Vec<u8>)> {
    if data.len() % 8 != 0 {
        return Err(Error::malformed("session key length not a multiple of 8"));
    }
    let ephemeral_secret = random_secret(rng);
    let ephemeral_public = *PublicKey::from(&ephemeral_secret).as_bytes();
    let shared = ephemeral_secret
        .as_diffie_hellman(&public_from_bytes(recipient)?)
        .ok_or(Error::Decryption)?;
    let kek = derive_kek(&ephemeral_public, recipient, shared.as_bytes())?;
    let wrapped = aes_kw::wrap(kek.as_ref(), data)?;
    Ok((ephemeral_public, wrapped))
}

/// Decrypts a wrapped session key.
pub fn decrypt(
    ephemeral: &[u8; KEY_LEN],
    recipient: &[u8; KEY_LEN],
    secret: &[u8; KEY_LEN],
    wrapped: &[u8],
) -> Result<Vec<u8>> {
    let shared = secret_from_bytes(secret)?
        .as_diffie_hellman(&public_from_bytes(ephemeral)?)
        .ok_or(Error::Decryption)?;
    let kek = derive_kek(ephemeral, recipient, shared.as_bytes())?;
    aes_kw::unwrap(kek.as_ref(), wrapped)
}

/// Recomputes the public key from the secret scalar and compares.
pub fn validate_params(public: &[u8; KEY_LEN], secret: &[u8; KEY_LEN]) -> bool {
    match secret_from_bytes(secret) {
        Ok(secret) => PublicKey::from(&secret).as_bytes() == public,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_roundtrip() {
        let key = generate(&mut OsRng);
        let session = [0x99u8; 32];
        let (ephemeral, wrapped) = encrypt(&mut OsRng, &key.public, &session).unwrap();
        let out = decrypt(&ephemeral, &key.public, &key.secret, &wrapped).unwrap();
        assert_eq!(out, session);
    }

    #[test]
    fn test_validate_params() {
        let key = generate(&mut OsRng);
        assert!(validate_params(&key.public, &key.secret));
        let other = generate(&mut OsRng);
        assert!(!validate_params(&key.public, &other.secret));
    }
}
