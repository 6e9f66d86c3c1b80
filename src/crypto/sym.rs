//! CFB-mode encryption for passphrase-protected secret keys.
//!
//! Dispatches over the OpenPGP cipher table; every cipher runs in the
//! full-block CFB variant RFC 9580 specifies for key material.

use crate::algorithms::SymmetricKeyAlgorithm;
use crate::error::{Error, Result};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};

macro_rules! cfb_dispatch {
    ($alg:expr, $key:expr, $iv:expr, $data:expr, $op:ident) => {
        match $alg {
            SymmetricKeyAlgorithm::Idea => cfb_run::<idea::Idea>($key, $iv, $data, Op::$op),
            SymmetricKeyAlgorithm::TripleDes => {
                cfb_run::<des::TdesEde3>($key, $iv, $data, Op::$op)
            }
            SymmetricKeyAlgorithm::Cast5 => cfb_run::<cast5::Cast5>($key, $iv, $data, Op::$op),
            SymmetricKeyAlgorithm::Blowfish => {
                cfb_run::<blowfish::Blowfish>($key, $iv, $data, Op::$op)
            }
            SymmetricKeyAlgorithm::Aes128 => cfb_run::<aes::Aes128>($key, $iv, $data, Op::$op),
            SymmetricKeyAlgorithm::Aes192 => cfb_run::<aes::Aes192>($key, $iv, $data, Op::$op),
            SymmetricKeyAlgorithm::Aes256 => cfb_run::<aes::Aes256>($key, $iv, $data, Op::$op),
            SymmetricKeyAlgorithm::Twofish => {
                cfb_run::<twofish::Twofish>($key, $iv, $data, Op::$op)
            }
            SymmetricKeyAlgorithm::Camellia128 => {
                cfb_run::<camellia::Camellia128>($key, $iv, $data, Op::$op)
            }
            SymmetricKeyAlgorithm::Camellia192 => {
                cfb_run::<camellia::Camellia192>($key, $iv, $data, Op::$op)
            }
            SymmetricKeyAlgorithm::Camellia256 => {
                cfb_run::<camellia::Camellia256>($key, $iv, $data, Op::$op)
            }
            SymmetricKeyAlgorithm::Plaintext => {
                Err(Error::unsupported("plaintext is not a cipher"))
            }
        }
    };
}

enum Op {
    Encrypt,
    Decrypt,
}

fn cfb_run<C>(key: &[u8], iv: &[u8], data: &mut [u8], op: Op) -> Result<()>
where
    C: cfb_mode::cipher::BlockCipher + cfb_mode::cipher::BlockEncryptMut + cfb_mode::cipher::KeyInit,
{
    match op {
        Op::Encrypt => cfb_mode::Encryptor::<C>::new_from_slices(key, iv)
            .map_err(|_| Error::malformed("bad key or IV length"))?
            .encrypt(data),
        Op::Decrypt => cfb_mode::Decryptor::<C>::new_from_slices(key, iv)
            .map_err(|_| Error::malformed("bad key or IV length"))?
            .decrypt(data),
    }
    Ok(())
}

/// Encrypts `data` in place with CFB.
pub fn encrypt(
    alg: SymmetricKeyAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<()> {
    cfb_dispatch!(alg, key, iv, data, Encrypt)
}

/// Decrypts `data` in place with CFB.
pub fn decrypt(
    alg: SymmetricKeyAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<()> {
    cfb_dispatch!(alg, key, iv, data, Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfb_roundtrip_all_ciphers() {
        for alg in [
            SymmetricKeyAlgorithm::Idea,
            SymmetricKeyAlgorithm::TripleDes,
            SymmetricKeyAlgorithm::Cast5,
            SymmetricKeyAlgorithm::Blowfish,
            SymmetricKeyAlgorithm::Aes128,
            SymmetricKeyAlgorithm::Aes192,
            SymmetricKeyAlgorithm::Aes256,
            SymmetricKeyAlgorithm::Twofish,
            SymmetricKeyAlgorithm::Camellia128,
            SymmetricKeyAlgorithm::Camellia192,
            SymmetricKeyAlgorithm::Camellia256,
        ] {
            let key = vec![0x42u8; alg.key_size()];
            let iv = vec![0x24u8; alg.block_size()];
            let plaintext = b"seventeen bytes!!".to_vec();

            let mut buf = plaintext.clone();
            encrypt(alg, &key, &iv, &mut buf).unwrap();
            assert_ne!(buf, plaintext, "{alg:?} left data unchanged");
            decrypt(alg, &key, &iv, &mut buf).unwrap();
            assert_eq!(buf, plaintext, "{alg:?} failed roundtrip");
        }
    }

    #[test]
    fn test_wrong_iv_length() {
        let mut buf = [0u8; 4];
        assert!(encrypt(SymmetricKeyAlgorithm::Aes128, &[0u8; 16], &[0u8; 3], &mut buf).is_err());
    }
}
