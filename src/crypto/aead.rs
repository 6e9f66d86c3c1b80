//! AEAD dispatch for secret-key protection: EAX, OCB, and GCM over the AES
//! key sizes.

use crate::algorithms::{AeadAlgorithm, SymmetricKeyAlgorithm};
use crate::error::{Error, Result};
use aes_gcm::aead::consts::{U12, U15};
use aes_gcm::aead::{Aead, KeyInit, Nonce, Payload};
use aes_gcm::AesGcm;
use eax::Eax;
use ocb3::Ocb3;

type Aes128Ocb = Ocb3<aes::Aes128, U15>;
type Aes192Ocb = Ocb3<aes::Aes192, U15>;
type Aes256Ocb = Ocb3<aes::Aes256, U15>;
type Aes128Gcm = AesGcm<aes::Aes128, U12>;
type Aes192Gcm = AesGcm<aes::Aes192, U12>;
type Aes256Gcm = AesGcm<aes::Aes256, U12>;

enum Op {
    Encrypt,
    Decrypt,
}

fn run<A: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    data: &[u8],
    op: Op,
) -> Result<Vec<u8>> {
    let cipher = A::new_from_slice(key).map_err(|_| Error::malformed("bad AEAD key length"))?;
    let nonce = Nonce::<A>::from_slice(nonce);
    let payload = Payload { msg: data, aad };
    match op {
        Op::Encrypt => cipher
            .encrypt(nonce, payload)
            .map_err(|_| Error::crypto("AEAD encryption failed")),
        // Tag mismatch surfaces as a wrong-passphrase condition; the caller
        // must not learn anything more specific.
        Op::Decrypt => cipher
            .decrypt(nonce, payload)
            .map_err(|_| Error::IncorrectPassphrase),
    }
}

fn dispatch(
    sym: SymmetricKeyAlgorithm,
    aead: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    data: &[u8],
    op: Op,
) -> Result<Vec<u8>> {
    if nonce.len() != aead.iv_length() {
        return Err(Error::malformed("bad AEAD nonce length"));
    }
    match (sym, aead) {
        (SymmetricKeyAlgorithm::Aes128, AeadAlgorithm::Eax) => {
            run::<Eax<aes::Aes128>>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes192, AeadAlgorithm::Eax) => {
            run::<Eax<aes::Aes192>>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes256, AeadAlgorithm::Eax) => {
            run::<Eax<aes::Aes256>>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes128, AeadAlgorithm::Ocb) => {
            run::<Aes128Ocb>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes192, AeadAlgorithm::Ocb) => {
            run::<Aes192Ocb>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes256, AeadAlgorithm::Ocb) => {
            run::<Aes256Ocb>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes128, AeadAlgorithm::Gcm) => {
            run::<Aes128Gcm>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes192, AeadAlgorithm::Gcm) => {
            run::<Aes192Gcm>(key, nonce, aad, data, op)
        }
        (SymmetricKeyAlgorithm::Aes256, AeadAlgorithm::Gcm) => {
            run::<Aes256Gcm>(key, nonce, aad, data, op)
        }
        (sym, _) => Err(Error::unsupported(format!(
            "AEAD with cipher {sym:?}"
        ))),
    }
}

/// Encrypts and authenticates `data`, returning ciphertext with the tag
/// appended.
pub fn encrypt(
    sym: SymmetricKeyAlgorithm,
    aead: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    data: &[u8],
) -> Result<Vec<u8>> {
    dispatch(sym, aead, key, nonce, aad, data, Op::Encrypt)
}

/// Verifies and decrypts `data` (ciphertext with appended tag).
pub fn decrypt(
    sym: SymmetricKeyAlgorithm,
    aead: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    data: &[u8],
) -> Result<Vec<u8>> {
    dispatch(sym, aead, key, nonce, aad, data, Op::Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_modes() {
        for sym in [
            SymmetricKeyAlgorithm::Aes128,
            SymmetricKeyAlgorithm::Aes192,
            SymmetricKeyAlgorithm::Aes256,
        ] {
            for aead in [AeadAlgorithm::Eax, AeadAlgorithm::Ocb, AeadAlgorithm::Gcm] {
                let key = vec![0x11u8; sym.key_size()];
                let nonce = vec![0x22u8; aead.iv_length()];
                let aad = b"associated";
                let plaintext = b"attack at dawn";

                let ct = encrypt(sym, aead, &key, &nonce, aad, plaintext).unwrap();
                assert_eq!(ct.len(), plaintext.len() + aead.tag_length());
                let pt = decrypt(sym, aead, &key, &nonce, aad, &ct).unwrap();
                assert_eq!(pt, plaintext);
            }
        }
    }

    #[test]
    fn test_tampered_tag_is_wrong_passphrase() {
        let key = [0u8; 32];
        let nonce = [0u8; 15];
        let mut ct = encrypt(
            SymmetricKeyAlgorithm::Aes256,
            AeadAlgorithm::Ocb,
            &key,
            &nonce,
            b"",
            b"data",
        )
        .unwrap();
        *ct.last_mut().unwrap() ^= 1;
        let err = decrypt(
            SymmetricKeyAlgorithm::Aes256,
            AeadAlgorithm::Ocb,
            &key,
            &nonce,
            b"",
            &ct,
        )
        .unwrap_err();
        assert!(matches!(err, Error::IncorrectPassphrase));
    }

    #[test]
    fn test_wrong_aad_fails() {
        let key = [0u8; 16];
        let nonce = [0u8; 16];
        let ct = encrypt(
            SymmetricKeyAlgorithm::Aes128,
            AeadAlgorithm::Eax,
            &key,
            &nonce,
            b"aad-1",
            b"data",
        )
        .unwrap();
        assert!(decrypt(
            SymmetricKeyAlgorithm::Aes128,
            AeadAlgorithm::Eax,
            &key,
            &nonce,
            b"aad-2",
            &ct
        )
        .is_err());
    }
}
