//! ECDH (algorithm 18) session-key encryption: one-pass Diffie-Hellman,
//! the RFC 6637 KDF, and AES key wrap of the padded session key.

use crate::algorithms::{EccCurve, HashAlgorithm, PublicKeyAlgorithm, SymmetricKeyAlgorithm};
use crate::crypto::{aes_kw, hash};
use crate::error::{Error, Result};
use crate::mpi::{left_pad, Mpi};
use elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// The constant tail of the RFC 6637 KDF parameter block.
const ANONYMOUS_SENDER: &[u8; 20] = b"Anonymous Sender    ";

/// Generated ECDH key material.
pub struct EcdhKey {
    /// Public point (SEC1 uncompressed, or 0x40-prefixed for Curve25519).
    pub q: Mpi,
    /// Secret scalar.
    pub d: Mpi,
}

fn kdf(
    hash_alg: HashAlgorithm,
    shared: &[u8],
    curve: EccCurve,
    cipher: SymmetricKeyAlgorithm,
    fingerprint: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let key_size = cipher.key_size();
    if hash_alg.digest_size() < key_size {
        return Err(Error::unsupported("KDF digest shorter than KEK"));
    }
    let mut ctx = hash::new_digest(hash_alg);
    ctx.update(&[0, 0, 0, 1]);
    ctx.update(shared);
    ctx.update(&[curve.oid().len() as u8]);
    ctx.update(curve.oid());
    ctx.update(&[PublicKeyAlgorithm::Ecdh.to_byte()]);
    ctx.update(&[0x03, 0x01, hash_alg.to_byte(), cipher.to_byte()]);
    ctx.update(ANONYMOUS_SENDER);
    ctx.update(fingerprint);
    let mut out = Zeroizing::new(ctx.finalize().to_vec());
    out.truncate(key_size);
    Ok(out)
}

/// Pads to an 8-byte granularity, each pad octet carrying the pad length.
fn pkcs5_pad(data: &[u8]) -> Zeroizing<Vec<u8>> {
    let pad = 8 - data.len() % 8;
    let mut out = Zeroizing::new(Vec::with_capacity(data.len() + pad));
    out.extend_from_slice(data);
    out.extend(std::iter::repeat(pad as u8).take(pad));
    out
}

fn pkcs5_unpad(mut data: Vec<u8>) -> Result<Vec<u8>> {
    let pad = *data.last().ok_or(Error::Decryption)? as usize;
    if pad == 0 || pad > 8 || pad > data.len() {
        return Err(Error::Decryption);
    }
    if data[data.len() - pad..].iter().any(|&b| b as usize != pad) {
        return Err(Error::Decryption);
    }
    data.truncate(data.len() - pad);
    Ok(data)
}

/// One-pass DH against a recipient public point with a fresh ephemeral key.
/// Returns the wire ephemeral point and the shared field element.
fn encaps<R: CryptoRng + RngCore>(
    rng: &mut R,
    curve: EccCurve,
    recipient_q: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
    match curve {
        EccCurve::P256 => {
            let secret = p256::SecretKey::random(rng);
            let public = p256::PublicKey::from_sec1_bytes(recipient_q)
                .map_err(|_| Error::malformed("invalid P-256 point"))?;
            let shared =
                p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
            let point = secret.public_key().to_encoded_point(false);
            Ok((
                point.as_bytes().to_vec(),
                Zeroizing::new(shared.raw_secret_bytes().to_vec()),
            ))
        }
        EccCurve::P384 => {
            let secret = p384::SecretKey::random(rng);
            let public = p384::PublicKey::from_sec1_bytes(recipient_q)
                .map_err(|_| Error::malformed("invalid P-384 point"))?;
            let shared =
                p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
            let point = secret.public_key().to_encoded_point(false);
            Ok((
                point.as_bytes().to_vec(),
                Zeroizing::new(shared.raw_secret_bytes().to_vec()),
            ))
        }
        EccCurve::P521 => {
            let secret = p521::SecretKey::random(rng);
            let public = p521::PublicKey::from_sec1_bytes(recipient_q)
                .map_err(|_| Error::malformed("invalid P-521 point"))?;
            let shared =
                p521::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
            let point = secret.public_key().to_encoded_point(false);
            Ok((
                point.as_bytes().to_vec(),
                Zeroizing::new(shared.raw_secret_bytes().to_vec()),
            ))
        }
        EccCurve::Curve25519Legacy => {
            let point: [u8; 32] = strip_native_prefix(recipient_q)?;
            let secret = x25519_dalek::StaticSecret::random_from_rng(rng);
            let shared = secret.diffie_hellman(&x25519_dalek::PublicKey::from(point));
            let mut wire = Vec::with_capacity(33);
            wire.push(0x40);
            wire.extend_from_slice(x25519_dalek::PublicKey::from(&secret).as_bytes());
            Ok((wire, Zeroizing::new(shared.as_bytes().to_vec())))
        }
        other => Err(Error::unsupported(format!("ECDH on {other:?}"))),
    }
}

/// Recomputes the shared field element from the ephemeral point.
fn decaps(curve: EccCurve, ephemeral: &[u8], d: &Mpi) -> Result<Zeroizing<Vec<u8>>> {
    match curve {
        EccCurve::P256 => {
            let secret = p256::SecretKey::from_slice(&d.to_padded(32)?)
                .map_err(|_| Error::KeyInvalid)?;
            let public = p256::PublicKey::from_sec1_bytes(ephemeral)
                .map_err(|_| Error::malformed("invalid P-256 point"))?;
            let shared =
                p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
            Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
        }
        EccCurve::P384 => {
            let secret = p384::SecretKey::from_slice(&d.to_padded(48)?)
                .map_err(|_| Error::KeyInvalid)?;
            let public = p384::PublicKey::from_sec1_bytes(ephemeral)
                .map_err(|_| Error::malformed("invalid P-384 point"))?;
            let shared =
                p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
            Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
        }
        EccCurve::P521 => {
            let secret = p521::SecretKey::from_slice(&d.to_padded(66)?)
                .map_err(|_| Error::KeyInvalid)?;
            let public = p521::PublicKey::from_sec1_bytes(ephemeral)
                .map_err(|_| Error::malformed("invalid P-521 point"))?;
            let shared =
                p521::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
            Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
        }
        EccCurve::Curve25519Legacy => {
            let point: [u8; 32] = strip_native_prefix(ephemeral)?;
            let secret = legacy_x25519_secret(d)?;
            let shared = secret.diffie_hellman(&x25519_dalek::PublicKey::from(point));
            Ok(Zeroizing::new(shared.as_bytes().to_vec()))
        }
        other => Err(Error::unsupported(format!("ECDH on {other:?}"))),
    }
}

/// Curve25519-legacy points ride in MPIs with a 0x40 prefix.
fn strip_native_prefix(point: &[u8]) -> Result<[u8; 32]> {
    match point {
        [0x40, rest @ ..] if rest.len() == 32 => Ok(rest.try_into().unwrap()),
        _ => Err(Error::malformed("invalid Curve25519 point encoding")),
    }
}

/// The legacy secret scalar is stored as a big-endian MPI; the function
/// restores the native little-endian form.
fn legacy_x25519_secret(d: &Mpi) -> Result<x25519_dalek::StaticSecret> {
    let mut bytes: [u8; 32] = left_pad(d.as_bytes(), 32)?.try_into().unwrap();
    bytes.reverse();
    Ok(x25519_dalek::StaticSecret::from(bytes))
}

/// Generates a key pair on `curve`.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R, curve: EccCurve) -> Result<EcdhKey> {
    match curve {
        EccCurve::P256 => {
            let secret = p256::SecretKey::random(rng);
            Ok(EcdhKey {
                q: Mpi::from_slice(secret.public_key().to_encoded_point(false).as_bytes()),
                d: Mpi::from_slice(&secret.to_bytes()),
            })
        }
        EccCurve::P384 => {
            let secret = p384::SecretKey::random(rng);
            Ok(EcdhKey {
                q: Mpi::from_slice(secret.public_key().to_encoded_point(false).as_bytes()),
                d: Mpi::from_slice(&secret.to_bytes()),
            })
        }
        EccCurve::P521 => {
            let secret = p521::SecretKey::random(rng);
            Ok(EcdhKey {
                q: Mpi::from_slice(secret.public_key().to_encoded_point(false).as_bytes()),
                d: Mpi::from_slice(&secret.to_bytes()),
            })
        }
        EccCurve::Curve25519Legacy => {
            let secret = x25519_dalek::StaticSecret::random_from_rng(rng);
            let mut wire = Vec::with_capacity(33);
            wire.push(0x40);
            wire.extend_from_slice(x25519_dalek::PublicKey::from(&secret).as_bytes());
            let mut d = secret.to_bytes();
            d.reverse();
            Ok(EcdhKey {
                q: Mpi::from_slice(&wire),
                d: Mpi::from_slice(&d),
            })
        }
        other => Err(Error::unsupported(format!("ECDH on {other:?}"))),
    }
}

/// Encrypts an encoded session key for the holder of `q`.
#[allow(clippy::too_many_arguments)]
pub fn encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    curve: EccCurve,
    kdf_hash: HashAlgorithm,
    kdf_cipher: SymmetricKeyAlgorithm,
    q: &Mpi,
    fingerprint: &[u8],
    data: &[u8],
) -> Result<(Mpi, Vec<u8>)> {
    let (ephemeral, shared) = encaps(rng, curve, q.as_bytes())?;
    let kek = kdf(kdf_hash, &shared, curve, kdf_cipher, fingerprint)?;
    let wrapped = aes_kw::wrap(&kek, &pkcs5_pad(data))?;
    Ok((Mpi::from_slice(&ephemeral), wrapped))
}

/// Decrypts an encoded session key.
#[allow(clippy::too_many_arguments)]
pub fn decrypt(
    curve: EccCurve,
    kdf_hash: HashAlgorithm,
    kdf_cipher: SymmetricKeyAlgorithm,
    ephemeral: &Mpi,
    wrapped: &[u8],
    d: &Mpi,
    fingerprint: &[u8],
) -> Result<Vec<u8>> {
    let shared = decaps(curve, ephemeral.as_bytes(), d)?;
    let kek = kdf(kdf_hash, &shared, curve, kdf_cipher, fingerprint)?;
    pkcs5_unpad(aes_kw::unwrap(&kek, wrapped)?)
}

/// Recomputes the public point from the secret scalar and compares.
pub fn validate_params(curve: EccCurve, q: &Mpi, d: &Mpi) -> bool {
    let derived = match curve {
        EccCurve::P256 => p256::SecretKey::from_slice(&match d.to_padded(32) {
            Ok(b) => b,
            Err(_) => return false,
        })
        .map(|sk| sk.public_key().to_encoded_point(false).as_bytes().to_vec()),
        EccCurve::P384 => p384::SecretKey::from_slice(&match d.to_padded(48) {
            Ok(b) => b,
            Err(_) => return false,
        })
        .map(|sk| sk.public_key().to_encoded_point(false).as_bytes().to_vec()),
        EccCurve::P521 => p521::SecretKey::from_slice(&match d.to_padded(66) {
            Ok(b) => b,
            Err(_) => return false,
        })
        .map(|sk| sk.public_key().to_encoded_point(false).as_bytes().to_vec()),
        EccCurve::Curve25519Legacy => {
            let secret = match legacy_x25519_secret(d) {
                Ok(s) => s,
                Err(_) => return false,
            };
            let mut wire = vec![0x40];
            wire.extend_from_slice(x25519_dalek::PublicKey::from(&secret).as_bytes());
            Ok(wire)
        }
        _ => return false,
    };
    matches!(derived, Ok(bytes) if bytes == q.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_pkcs5_padding() {
        let padded = pkcs5_pad(&[1, 2, 3]);
        assert_eq!(&padded[..], &[1, 2, 3, 5, 5, 5, 5, 5]);
        assert_eq!(pkcs5_unpad(padded.to_vec()).unwrap(), vec![1, 2, 3]);

        // full block input gains a full pad block
        let padded = pkcs5_pad(&[9; 8]);
        assert_eq!(padded.len(), 16);
        assert_eq!(pkcs5_unpad(padded.to_vec()).unwrap(), vec![9; 8]);

        assert!(pkcs5_unpad(vec![1, 2, 9]).is_err());
    }

    #[test]
    fn test_roundtrip_nist_and_legacy() {
        for curve in [EccCurve::P256, EccCurve::P384, EccCurve::P521, EccCurve::Curve25519Legacy] {
            let key = generate(&mut OsRng, curve).unwrap();
            let fingerprint = [0xAA; 20];
            let session = b"\x09session-key-data-here\x01\x02";

            let (ephemeral, wrapped) = encrypt(
                &mut OsRng,
                curve,
                curve.preferred_hash(),
                SymmetricKeyAlgorithm::Aes128,
                &key.q,
                &fingerprint,
                session,
            )
            .unwrap();
            let out = decrypt(
                curve,
                curve.preferred_hash(),
                SymmetricKeyAlgorithm::Aes128,
                &ephemeral,
                &wrapped,
                &key.d,
                &fingerprint,
            )
            .unwrap();
            assert_eq!(out, session, "roundtrip failed on {curve:?}");
        }
    }

    #[test]
    fn test_wrong_fingerprint_fails() {
        let key = generate(&mut OsRng, EccCurve::P256).unwrap();
        let (ephemeral, wrapped) = encrypt(
            &mut OsRng,
            EccCurve::P256,
            HashAlgorithm::Sha256,
            SymmetricKeyAlgorithm::Aes128,
            &key.q,
            &[0x01; 20],
            b"data1234",
        )
        .unwrap();
        assert!(decrypt(
            EccCurve::P256,
            HashAlgorithm::Sha256,
            SymmetricKeyAlgorithm::Aes128,
            &ephemeral,
            &wrapped,
            &key.d,
            &[0x02; 20],
        )
        .is_err());
    }

    #[test]
    fn test_validate_params() {
        for curve in [EccCurve::P256, EccCurve::Curve25519Legacy] {
            let key = generate(&mut OsRng, curve).unwrap();
            assert!(validate_params(curve, &key.q, &key.d));
            let other = generate(&mut OsRng, curve).unwrap();
            assert!(!validate_params(curve, &key.q, &other.d));
        }
    }

    #[test]
    fn test_brainpool_unsupported() {
        assert!(generate(&mut OsRng, EccCurve::BrainpoolP256r1).is_err());
    }
}
