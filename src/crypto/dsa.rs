//! DSA adapter with RFC 6979 deterministic nonces.

use crate::error::{Error, Result};
use crate::mpi::Mpi;
use dsa::{Components, KeySize, Signature, SigningKey, VerifyingKey};
use num_bigint_dig::BigUint;
use rand::{CryptoRng, RngCore};
use signature::hazmat::{PrehashSigner, PrehashVerifier};

/// Generated DSA key material.
pub struct DsaKey {
    /// Prime modulus.
    pub p: Mpi,
    /// Group order.
    pub q: Mpi,
    /// Generator.
    pub g: Mpi,
    /// Public key value.
    pub y: Mpi,
    /// Private key value.
    pub x: Mpi,
}

fn verifying_key(p: &Mpi, q: &Mpi, g: &Mpi, y: &Mpi) -> Result<VerifyingKey> {
    let components = Components::from_components(
        BigUint::from_bytes_be(p.as_bytes()),
        BigUint::from_bytes_be(q.as_bytes()),
        BigUint::from_bytes_be(g.as_bytes()),
    )
    .map_err(|_| Error::KeyInvalid)?;
    VerifyingKey::from_components(components, BigUint::from_bytes_be(y.as_bytes()))
        .map_err(|_| Error::KeyInvalid)
}

fn signing_key(p: &Mpi, q: &Mpi, g: &Mpi, y: &Mpi, x: &Mpi) -> Result<SigningKey> {
    SigningKey::from_components(
        verifying_key(p, q, g, y)?,
        BigUint::from_bytes_be(x.as_bytes()),
    )
    .map_err(|_| Error::KeyInvalid)
}

/// Generates a DSA key. `bits` selects the (L, N) parameter pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> Result<DsaKey> {
    let key_size = match bits {
        0..=1024 => KeySize::DSA_1024_160,
        1025..=2048 => KeySize::DSA_2048_256,
        _ => KeySize::DSA_3072_256,
    };
    let components = Components::generate(rng, key_size);
    let signing = SigningKey::generate(rng, components);
    let verifying = signing.verifying_key();
    Ok(DsaKey {
        p: Mpi::from_slice(&verifying.components().p().to_bytes_be()),
        q: Mpi::from_slice(&verifying.components().q().to_bytes_be()),
        g: Mpi::from_slice(&verifying.components().g().to_bytes_be()),
        y: Mpi::from_slice(&verifying.y().to_bytes_be()),
        x: Mpi::from_slice(&signing.x().to_bytes_be()),
    })
}

/// Signs a digest, returning `(r, s)`.
pub fn sign(digest: &[u8], p: &Mpi, q: &Mpi, g: &Mpi, y: &Mpi, x: &Mpi) -> Result<(Mpi, Mpi)> {
    let key = signing_key(p, q, g, y, x)?;
    let sig = key.sign_prehash(digest).map_err(Error::crypto)?;
    Ok((
        Mpi::from_slice(&sig.r().to_bytes_be()),
        Mpi::from_slice(&sig.s().to_bytes_be()),
    ))
}

/// Verifies `(r, s)` over a digest.
pub fn verify(
    digest: &[u8],
    r: &Mpi,
    s: &Mpi,
    p: &Mpi,
    q: &Mpi,
    g: &Mpi,
    y: &Mpi,
) -> Result<bool> {
    let key = verifying_key(p, q, g, y)?;
    let sig = Signature::from_components(
        BigUint::from_bytes_be(r.as_bytes()),
        BigUint::from_bytes_be(s.as_bytes()),
    )
    .map_err(|_| Error::malformed("invalid DSA signature values"))?;
    Ok(key.verify_prehash(digest, &sig).is_ok())
}

/// Confirms that `y = g^x mod p` and the group parameters are coherent.
pub fn validate_params(p: &Mpi, q: &Mpi, g: &Mpi, y: &Mpi, x: &Mpi) -> bool {
    let p = BigUint::from_bytes_be(p.as_bytes());
    let q = BigUint::from_bytes_be(q.as_bytes());
    let g = BigUint::from_bytes_be(g.as_bytes());
    let y = BigUint::from_bytes_be(y.as_bytes());
    let x = BigUint::from_bytes_be(x.as_bytes());
    let one = BigUint::from(1u8);

    if g <= one || g >= p || x.bits() == 0 || x >= q {
        return false;
    }
    // g generates the order-q subgroup and y is g^x
    if g.modpow(&q, &p) != one {
        return false;
    }
    g.modpow(&x, &p) == y
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = generate(&mut OsRng, 2048).unwrap();
        let digest = Sha256::digest(b"signed data");
        let (r, s) = sign(&digest, &key.p, &key.q, &key.g, &key.y, &key.x).unwrap();
        assert!(verify(&digest, &r, &s, &key.p, &key.q, &key.g, &key.y).unwrap());

        let wrong = Sha256::digest(b"tampered data");
        assert!(!verify(&wrong, &r, &s, &key.p, &key.q, &key.g, &key.y).unwrap());
    }

    #[test]
    fn test_validate_params() {
        let key = generate(&mut OsRng, 2048).unwrap();
        assert!(validate_params(&key.p, &key.q, &key.g, &key.y, &key.x));
        // public value not matching the secret
        let bad_y = Mpi::from_slice(&[0x02]);
        assert!(!validate_params(&key.p, &key.q, &key.g, &bad_y, &key.x));
    }
}
