//! Public-Key Encrypted Session Key packet (tag 1), versions 3 and 6.
//!
//! The decrypt path is hardened against decryption oracles: when the
//! caller supplies a random fallback session key, no failure is ever
//! surfaced and the output is chosen with a branchless select.

use crate::algorithms::{PublicKeyAlgorithm, SymmetricKeyAlgorithm, Tag};
use crate::config::Config;
use crate::crypto::{
    checksum, parse_enc_session_key_params, public_key_decrypt, public_key_encrypt, timing,
    EncryptedSessionKeyParams, PlainSecretParams, SessionKey,
};
use crate::error::{Error, Result};
use crate::mpi::Reader;
use crate::packet::public_key::PublicKeyPacket;
use rand::{CryptoRng, RngCore};
use subtle::Choice;
use zeroize::Zeroizing;

/// Recipient identification carried by the packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// v3: 8-byte key ID; all zeros addresses an anonymous recipient.
    KeyId([u8; 8]),
    /// v6: key version plus full fingerprint.
    Fingerprint {
        /// Version of the recipient key.
        key_version: u8,
        /// Recipient key fingerprint.
        fingerprint: Vec<u8>,
    },
    /// v6 anonymous recipient (zero-length version/fingerprint block).
    Anonymous,
}

/// A Public-Key Encrypted Session Key packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkesk {
    /// Packet version, 3 or 6.
    pub version: u8,
    /// Recipient identification.
    pub recipient: Recipient,
    /// Algorithm of the recipient key.
    pub algorithm: PublicKeyAlgorithm,
    /// Algorithm-specific encrypted session key.
    pub encrypted: EncryptedSessionKeyParams,
}

impl Pkesk {
    /// The packet tag.
    pub const TAG: Tag = Tag::PublicKeyEncryptedSessionKey;

    /// Parses a packet body.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let version = reader.read_u8()?;
        let recipient = match version {
            3 => Recipient::KeyId(reader.read_array()?),
            6 => {
                let vf_len = reader.read_u8()? as usize;
                if vf_len == 0 {
                    Recipient::Anonymous
                } else {
                    let key_version = reader.read_u8()?;
                    let fingerprint = reader.read_exact(vf_len - 1)?.to_vec();
                    let expected = if key_version == 4 { 20 } else { 32 };
                    if fingerprint.len() != expected {
                        return Err(Error::malformed("bad fingerprint length"));
                    }
                    Recipient::Fingerprint {
                        key_version,
                        fingerprint,
                    }
                }
            }
            other => return Err(Error::unsupported(format!("PKESK version {other}"))),
        };
        let algorithm = PublicKeyAlgorithm::from_byte(reader.read_u8()?)?;
        let encrypted = parse_enc_session_key_params(algorithm, &mut reader, version)?;
        if reader.remaining() != 0 {
            return Err(Error::malformed("trailing bytes after session key"));
        }
        Ok(Self {
            version,
            recipient,
            algorithm,
            encrypted,
        })
    }

    /// Serializes the packet body.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![self.version];
        match (&self.recipient, self.version) {
            (Recipient::KeyId(id), 3) => out.extend_from_slice(id),
            (Recipient::Anonymous, 6) => out.push(0),
            (
                Recipient::Fingerprint {
                    key_version,
                    fingerprint,
                },
                6,
            ) => {
                out.push((fingerprint.len() + 1) as u8);
                out.push(*key_version);
                out.extend_from_slice(fingerprint);
            }
            _ => return Err(Error::malformed("recipient does not match PKESK version")),
        }
        out.push(self.algorithm.to_byte());
        self.encrypted.write(self.version, &mut out)?;
        Ok(out)
    }

    /// Encrypts `session_key` to `recipient_key`, producing a version-3 or
    /// version-6 packet. With `anonymous`, the recipient identifier is
    /// wildcarded and decryption requires trial recipients.
    pub fn encrypt<R: CryptoRng + RngCore>(
        rng: &mut R,
        config: &Config,
        version: u8,
        recipient_key: &PublicKeyPacket,
        session_key: &SessionKey,
        anonymous: bool,
    ) -> Result<Self> {
        if version != 3 && version != 6 {
            return Err(Error::unsupported(format!("PKESK version {version}")));
        }
        let algorithm = recipient_key.algorithm;
        if !algorithm.can_encrypt() {
            return Err(Error::unsupported(format!(
                "{algorithm} cannot encrypt session keys"
            )));
        }
        let cipher_algo = match (version, session_key.algorithm) {
            (3, Some(algo)) => Some(algo),
            (3, None) => {
                return Err(Error::malformed(
                    "v3 session keys must name their cipher algorithm",
                ))
            }
            (_, _) => None,
        };

        let encoded = encode_session_key(version, algorithm, cipher_algo, &session_key.data);
        let fingerprint = recipient_key.fingerprint();
        let mut encrypted =
            public_key_encrypt(rng, config, &recipient_key.params, &fingerprint, &encoded)?;

        // X25519-family algorithms carry the cipher algorithm outside the
        // encrypted blob, as a cleartext byte, in v3 only.
        if encrypted.carries_cleartext_cipher() {
            if let (
                EncryptedSessionKeyParams::X25519 { sym_alg, .. }
                | EncryptedSessionKeyParams::X448 { sym_alg, .. }
                | EncryptedSessionKeyParams::MlKem768X25519 { sym_alg, .. },
                Some(algo),
            ) = (&mut encrypted, cipher_algo)
            {
                *sym_alg = Some(algo);
            }
        }

        let recipient = match (version, anonymous) {
            (3, true) => Recipient::KeyId([0u8; 8]),
            (3, false) => Recipient::KeyId(recipient_key.key_id()),
            (_, true) => Recipient::Anonymous,
            (_, false) => Recipient::Fingerprint {
                key_version: recipient_key.version,
                fingerprint,
            },
        };

        Ok(Self {
            version,
            recipient,
            algorithm,
            encrypted,
        })
    }

    /// Encrypts `session_key` under a persistent AEAD key (algorithm 102).
    ///
    /// These keys are symmetric: wrapping needs the secret parameters on
    /// both ends, so this is a separate entry point from [`Pkesk::encrypt`].
    pub fn encrypt_symmetric<R: CryptoRng + RngCore>(
        rng: &mut R,
        version: u8,
        recipient_key: &PublicKeyPacket,
        secret: &PlainSecretParams,
        session_key: &SessionKey,
        anonymous: bool,
    ) -> Result<Self> {
        if version != 3 && version != 6 {
            return Err(Error::unsupported(format!("PKESK version {version}")));
        }
        if recipient_key.algorithm != PublicKeyAlgorithm::Aead {
            return Err(Error::unsupported(
                "symmetric wrapping requires a persistent AEAD key",
            ));
        }
        let cipher_algo = match (version, session_key.algorithm) {
            (3, Some(algo)) => Some(algo),
            (3, None) => {
                return Err(Error::malformed(
                    "v3 session keys must name their cipher algorithm",
                ))
            }
            (_, _) => None,
        };
        let encoded = encode_session_key(
            version,
            PublicKeyAlgorithm::Aead,
            cipher_algo,
            &session_key.data,
        );
        let encrypted =
            crate::crypto::aead_key_encrypt(rng, &recipient_key.params, secret, &encoded)?;
        let recipient = match (version, anonymous) {
            (3, true) => Recipient::KeyId([0u8; 8]),
            (3, false) => Recipient::KeyId(recipient_key.key_id()),
            (_, true) => Recipient::Anonymous,
            (_, false) => Recipient::Fingerprint {
                key_version: recipient_key.version,
                fingerprint: recipient_key.fingerprint(),
            },
        };
        Ok(Self {
            version,
            recipient,
            algorithm: PublicKeyAlgorithm::Aead,
            encrypted,
        })
    }

    /// Decrypts the wrapped session key with the recipient secret key.
    ///
    /// With `random_session_key` supplied, decryption-related failures are
    /// never surfaced: the random key is returned through a constant-time
    /// select instead, so callers cannot be distinguished on failure
    /// cause or timing shape.
    pub fn decrypt(
        &self,
        recipient_key: &PublicKeyPacket,
        secret: &PlainSecretParams,
        random_session_key: Option<&SessionKey>,
    ) -> Result<SessionKey> {
        if self.algorithm != recipient_key.algorithm {
            return Err(Error::malformed("key does not match packet algorithm"));
        }

        let random_payload = random_session_key.map(|random| {
            encode_session_key(
                self.version,
                self.algorithm,
                random.algorithm,
                &random.data,
            )
        });

        let fingerprint = recipient_key.fingerprint();
        let decrypted = public_key_decrypt(
            &recipient_key.params,
            secret,
            &self.encrypted,
            &fingerprint,
            random_payload.as_deref(),
        );

        match (decrypted, random_session_key) {
            (Ok(data), _) => decode_session_key(
                self.version,
                self.algorithm,
                &self.encrypted,
                &Zeroizing::new(data),
                random_session_key,
            ),
            (Err(_), Some(random)) => Ok(random.clone()),
            (Err(_), None) => Err(Error::Decryption),
        }
    }
}

/// True for the algorithms whose encoded session key carries the cipher
/// byte and checksum inside the encrypted blob.
fn uses_inband_checksum(algo: PublicKeyAlgorithm) -> bool {
    !matches!(
        algo,
        PublicKeyAlgorithm::X25519
            | PublicKeyAlgorithm::X448
            | PublicKeyAlgorithm::MlKem768X25519
    )
}

/// Encodes a session key for public-key encryption.
///
/// Checksum algorithms get `[cipher if v3] ‖ key ‖ checksum`; the
/// X25519-family wraps the raw key and moves the cipher byte to the
/// packet layer.
pub fn encode_session_key(
    version: u8,
    algo: PublicKeyAlgorithm,
    cipher_algo: Option<SymmetricKeyAlgorithm>,
    session_key: &[u8],
) -> Vec<u8> {
    if !uses_inband_checksum(algo) {
        return session_key.to_vec();
    }
    let mut out = Vec::with_capacity(session_key.len() + 3);
    if version == 3 {
        if let Some(algo) = cipher_algo {
            out.push(algo.to_byte());
        }
    }
    out.extend_from_slice(session_key);
    out.extend_from_slice(&checksum::calculate_simple(session_key));
    out
}

/// Decodes and verifies an encoded session key.
fn decode_session_key(
    version: u8,
    algo: PublicKeyAlgorithm,
    encrypted: &EncryptedSessionKeyParams,
    decrypted: &[u8],
    random_session_key: Option<&SessionKey>,
) -> Result<SessionKey> {
    if !uses_inband_checksum(algo) {
        // Raw session key; the cipher algorithm rides in cleartext (v3).
        let sym_alg = match encrypted {
            EncryptedSessionKeyParams::X25519 { sym_alg, .. }
            | EncryptedSessionKeyParams::X448 { sym_alg, .. }
            | EncryptedSessionKeyParams::MlKem768X25519 { sym_alg, .. } => *sym_alg,
            _ => None,
        };
        if version == 3 {
            let algo = sym_alg.ok_or(Error::Decryption)?;
            if decrypted.len() != algo.key_size() {
                return match random_session_key {
                    Some(random) => Ok(random.clone()),
                    None => Err(Error::Decryption),
                };
            }
        }
        return Ok(SessionKey {
            algorithm: sym_alg,
            data: Zeroizing::new(decrypted.to_vec()),
        });
    }

    let header_len = usize::from(version == 3);
    if let Some(random) = random_session_key {
        // The decrypting adapter guarantees length equality with the
        // encoded random payload, so the layout below is fixed and every
        // check folds into one choice.
        if decrypted.len() != header_len + random.data.len() + 2 {
            return Ok(random.clone());
        }
        let key = &decrypted[header_len..decrypted.len() - 2];
        let mut ok: Choice = checksum::verify_simple_ct(key, &decrypted[decrypted.len() - 2..]);
        if version == 3 {
            let expected = random
                .algorithm
                .map(SymmetricKeyAlgorithm::to_byte)
                .unwrap_or(0);
            ok &= timing::bytes_equal(&[decrypted[0]], &[expected]);
        }
        // On mismatch the random key wins; both carry its algorithm.
        let data = timing::select_bytes(ok, key, &random.data);
        return Ok(SessionKey {
            algorithm: random.algorithm,
            data: Zeroizing::new(data),
        });
    }

    if decrypted.len() < header_len + 2 {
        return Err(Error::Decryption);
    }
    let key = &decrypted[header_len..decrypted.len() - 2];
    if !bool::from(checksum::verify_simple_ct(
        key,
        &decrypted[decrypted.len() - 2..],
    )) {
        return Err(Error::Decryption);
    }
    let algorithm = if version == 3 {
        let algo =
            SymmetricKeyAlgorithm::from_byte(decrypted[0]).map_err(|_| Error::Decryption)?;
        if key.len() != algo.key_size() {
            return Err(Error::Decryption);
        }
        Some(algo)
    } else {
        None
    };
    Ok(SessionKey {
        algorithm,
        data: Zeroizing::new(key.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{generate_params, KeyGenOptions};
    use rand::rngs::OsRng;

    fn make_key(algo: PublicKeyAlgorithm, version: u8) -> (PublicKeyPacket, PlainSecretParams) {
        let options = KeyGenOptions {
            bits: Some(2048),
            curve: Some(crate::algorithms::EccCurve::P256),
            ..Default::default()
        };
        let (public, secret) =
            generate_params(&mut OsRng, &Config::default(), algo, &options).unwrap();
        (
            PublicKeyPacket::new(version, 1_700_000_000, public).unwrap(),
            secret,
        )
    }

    #[test]
    fn test_encode_decode_session_key() {
        let sk = vec![0xAA; 16];
        let encoded = encode_session_key(
            3,
            PublicKeyAlgorithm::Rsa,
            Some(SymmetricKeyAlgorithm::Aes128),
            &sk,
        );
        assert_eq!(encoded.len(), 1 + 16 + 2);
        assert_eq!(encoded[0], 7);

        // X25519 family encodes the bare key
        let encoded = encode_session_key(
            3,
            PublicKeyAlgorithm::X25519,
            Some(SymmetricKeyAlgorithm::Aes128),
            &sk,
        );
        assert_eq!(encoded, sk);
    }

    #[test]
    fn test_v3_x25519_layout() {
        let (key, _) = make_key(PublicKeyAlgorithm::X25519, 4);
        let session_key = SessionKey {
            algorithm: Some(SymmetricKeyAlgorithm::Aes128),
            data: Zeroizing::new(vec![0xAA; 16]),
        };
        let pkesk = Pkesk::encrypt(
            &mut OsRng,
            &Config::default(),
            3,
            &key,
            &session_key,
            false,
        )
        .unwrap();
        let bytes = pkesk.to_bytes().unwrap();
        // version, key id, algorithm
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes[9], PublicKeyAlgorithm::X25519.to_byte());
        // 32-byte ephemeral, then count, then the cleartext AES-128 byte
        assert_eq!(bytes[10 + 32], 1 + 24);
        assert_eq!(bytes[10 + 33], 7);
    }

    #[test]
    fn test_roundtrip_v3_and_v6() {
        for algo in [
            PublicKeyAlgorithm::Rsa,
            PublicKeyAlgorithm::Ecdh,
            PublicKeyAlgorithm::X25519,
            PublicKeyAlgorithm::X448,
            PublicKeyAlgorithm::MlKem768X25519,
        ] {
            for version in [3u8, 6] {
                let key_version = if version == 6 { 6 } else { 4 };
                let (key, secret) = make_key(algo, key_version);
                let session_key = SessionKey {
                    algorithm: (version == 3).then_some(SymmetricKeyAlgorithm::Aes256),
                    data: Zeroizing::new(vec![0x42; 32]),
                };
                let pkesk = Pkesk::encrypt(
                    &mut OsRng,
                    &Config::default(),
                    version,
                    &key,
                    &session_key,
                    false,
                )
                .unwrap();

                let parsed = Pkesk::from_bytes(&pkesk.to_bytes().unwrap()).unwrap();
                assert_eq!(parsed, pkesk, "wire roundtrip failed for {algo} v{version}");

                let out = parsed.decrypt(&key, &secret, None).unwrap();
                assert_eq!(out.data, session_key.data, "decrypt failed for {algo} v{version}");
                assert_eq!(out.algorithm, session_key.algorithm);
            }
        }
    }

    #[test]
    fn test_anonymous_recipient() {
        let (key, secret) = make_key(PublicKeyAlgorithm::X25519, 6);
        let session_key = SessionKey {
            algorithm: None,
            data: Zeroizing::new(vec![0x41; 16]),
        };
        let pkesk = Pkesk::encrypt(
            &mut OsRng,
            &Config::default(),
            6,
            &key,
            &session_key,
            true,
        )
        .unwrap();
        assert_eq!(pkesk.recipient, Recipient::Anonymous);
        let parsed = Pkesk::from_bytes(&pkesk.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed.recipient, Recipient::Anonymous);
        let out = parsed.decrypt(&key, &secret, None).unwrap();
        assert_eq!(out.data, session_key.data);
    }

    #[test]
    fn test_random_fallback_on_malformed_ciphertext() {
        let (key, secret) = make_key(PublicKeyAlgorithm::Rsa, 4);
        let session_key = SessionKey {
            algorithm: Some(SymmetricKeyAlgorithm::Aes128),
            data: Zeroizing::new(vec![0x33; 16]),
        };
        let mut pkesk = Pkesk::encrypt(
            &mut OsRng,
            &Config::default(),
            3,
            &key,
            &session_key,
            false,
        )
        .unwrap();
        // corrupt the RSA ciphertext
        if let EncryptedSessionKeyParams::Rsa { c } = &mut pkesk.encrypted {
            let mut bytes = c.as_bytes().to_vec();
            bytes[10] ^= 0xFF;
            *c = crate::mpi::Mpi::from_slice(&bytes);
        }

        let random = SessionKey {
            algorithm: Some(SymmetricKeyAlgorithm::Aes128),
            data: Zeroizing::new(vec![0xFF; 16]),
        };
        let out = pkesk.decrypt(&key, &secret, Some(&random)).unwrap();
        assert_eq!(out.data, random.data);
        assert_eq!(out.algorithm, Some(SymmetricKeyAlgorithm::Aes128));

        // and without the fallback, a single opaque error
        assert!(matches!(
            pkesk.decrypt(&key, &secret, None),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn test_aead_persistent_key_wrapping() {
        let options = KeyGenOptions::default();
        let (public, secret) = generate_params(
            &mut OsRng,
            &Config::default(),
            PublicKeyAlgorithm::Aead,
            &options,
        )
        .unwrap();
        let key = PublicKeyPacket::new(4, 1_700_000_000, public).unwrap();
        let session_key = SessionKey {
            algorithm: Some(SymmetricKeyAlgorithm::Aes128),
            data: Zeroizing::new(vec![0x2A; 16]),
        };
        let pkesk =
            Pkesk::encrypt_symmetric(&mut OsRng, 3, &key, &secret, &session_key, false).unwrap();
        let parsed = Pkesk::from_bytes(&pkesk.to_bytes().unwrap()).unwrap();
        let out = parsed.decrypt(&key, &secret, None).unwrap();
        assert_eq!(out.data, session_key.data);
        assert_eq!(out.algorithm, session_key.algorithm);
    }

    #[test]
    fn test_wrong_version_recipient_combination() {
        let (key, _) = make_key(PublicKeyAlgorithm::X25519, 4);
        let pkesk = Pkesk {
            version: 3,
            recipient: Recipient::Anonymous,
            algorithm: key.algorithm,
            encrypted: EncryptedSessionKeyParams::X25519 {
                ephemeral: [0; 32],
                sym_alg: Some(SymmetricKeyAlgorithm::Aes128),
                wrapped: vec![0; 24],
            },
        };
        assert!(pkesk.to_bytes().is_err());
    }
}
