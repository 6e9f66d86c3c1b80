//! X25519 session-key encryption (algorithm 25): one-pass DH, HKDF-SHA256
//! key derivation, AES-128 key wrap.

use crate::crypto::aes_kw;
use crate::error::{Error, Result};
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// Key and ephemeral length.
pub const KEY_LEN: usize = 32;
/// Derived KEK length (AES-128).
const KEK_LEN: usize = 16;
const HKDF_INFO: &[u8] = b"OpenPGP X25519";

/// Generated X25519 key material.
pub struct X25519Key {
    /// Public key bytes.
    pub public: [u8; KEY_LEN],
    /// Secret scalar, native encoding.
    pub secret: [u8; KEY_LEN],
}

/// Generates a key pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> X25519Key {
    let secret = StaticSecret::random_from_rng(rng);
    X25519Key {
        public: PublicKey::from(&secret).to_bytes(),
        secret: secret.to_bytes(),
    }
}

/// HKDF over ephemeral key, recipient key, and shared secret, in that
/// order, per RFC 9580.
fn derive_kek(
    ephemeral: &[u8; KEY_LEN],
    recipient: &[u8; KEY_LEN],
    shared: &[u8],
) -> Result<Zeroizing<[u8; KEK_LEN]>> {
    let mut ikm = Zeroizing::new(Vec::with_capacity(3 * KEY_LEN));
    ikm.extend_from_slice(ephemeral);
    ikm.extend_from_slice(recipient);
    ikm.extend_from_slice(shared);
    let hk = Hkdf::<Sha256>::new(None, &ikm);
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
    let ephemeral_secret = StaticSecret::random_from_rng(rng);
    let ephemeral_public = PublicKey::from(&ephemeral_secret).to_bytes();
    let shared = ephemeral_secret.diffie_hellman(&PublicKey::from(*recipient));
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
    let shared = StaticSecret::from(*secret).diffie_hellman(&PublicKey::from(*ephemeral));
    let kek = derive_kek(ephemeral, recipient, shared.as_bytes())?;
    aes_kw::unwrap(kek.as_ref(), wrapped)
}

/// Recomputes the public key from the secret scalar and compares.
pub fn validate_params(public: &[u8; KEY_LEN], secret: &[u8; KEY_LEN]) -> bool {
    PublicKey::from(&StaticSecret::from(*secret)).to_bytes() == *public
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_roundtrip() {
        let key = generate(&mut OsRng);
        let session = [0x77u8; 16];
        let (ephemeral, wrapped) = encrypt(&mut OsRng, &key.public, &session).unwrap();
        assert_eq!(ephemeral.len(), 32);
        let out = decrypt(&ephemeral, &key.public, &key.secret, &wrapped).unwrap();
        assert_eq!(out, session);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let key = generate(&mut OsRng);
        let other = generate(&mut OsRng);
        let (ephemeral, wrapped) = encrypt(&mut OsRng, &key.public, &[0x11; 16]).unwrap();
        assert!(decrypt(&ephemeral, &key.public, &other.secret, &wrapped).is_err());
    }

    #[test]
    fn test_validate_params() {
        let key = generate(&mut OsRng);
        assert!(validate_params(&key.public, &key.secret));
        let other = generate(&mut OsRng);
        assert!(!validate_params(&key.public, &other.secret));
    }
}
