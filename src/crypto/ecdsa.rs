//! ECDSA adapter over the NIST curves.

use crate::algorithms::EccCurve;
use crate::error::{Error, Result};
use crate::mpi::Mpi;
use elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use signature::Keypair;

/// Generated ECDSA key material.
pub struct EcdsaKey {
    /// Public point (SEC1 uncompressed).
    pub q: Mpi,
    /// Secret scalar.
    pub d: Mpi,
}

macro_rules! with_curve {
    ($curve:expr, $krate:ident, $size:expr, $body:tt) => {{
        #[allow(unused_imports)]
        use $krate::ecdsa::{Signature, SigningKey, VerifyingKey};
        #[allow(dead_code)]
        const SCALAR: usize = $size;
        $body
    }};
}

macro_rules! dispatch_curve {
    ($curve:expr, $body:tt) => {
        match $curve {
            EccCurve::P256 => with_curve!($curve, p256, 32, $body),
            EccCurve::P384 => with_curve!($curve, p384, 48, $body),
            EccCurve::P521 => with_curve!($curve, p521, 66, $body),
            other => Err(Error::unsupported(format!("ECDSA on {other:?}"))),
        }
    };
}

/// Generates a key pair on `curve`.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R, curve: EccCurve) -> Result<EcdsaKey> {
    dispatch_curve!(curve, {
        let secret = SigningKey::random(rng);
        let point = secret.verifying_key().to_encoded_point(false);
        Ok(EcdsaKey {
            q: Mpi::from_slice(point.as_bytes()),
            d: Mpi::from_slice(&secret.to_bytes()),
        })
    })
}

/// Signs a digest, returning `(r, s)`.
pub fn sign(curve: EccCurve, digest: &[u8], d: &Mpi) -> Result<(Mpi, Mpi)> {
    dispatch_curve!(curve, {
        let key = SigningKey::from_slice(&d.to_padded(SCALAR)?).map_err(|_| Error::KeyInvalid)?;
        let sig: Signature = key.sign_prehash(digest).map_err(Error::crypto)?;
        let (r, s) = sig.split_bytes();
        Ok((Mpi::from_slice(&r), Mpi::from_slice(&s)))
    })
}

/// Verifies `(r, s)` over a digest. Both values are restored to the curve
/// width before reconstruction.
pub fn verify(curve: EccCurve, digest: &[u8], r: &Mpi, s: &Mpi, q: &Mpi) -> Result<bool> {
    dispatch_curve!(curve, {
        let key = VerifyingKey::from_sec1_bytes(q.as_bytes())
            .map_err(|_| Error::malformed("invalid public point"))?;
        let mut scalars = [0u8; SCALAR * 2];
        scalars[..SCALAR].copy_from_slice(&r.to_padded(SCALAR)?);
        scalars[SCALAR..].copy_from_slice(&s.to_padded(SCALAR)?);
        let sig = Signature::from_slice(&scalars)
            .map_err(|_| Error::malformed("invalid signature values"))?;
        Ok(key.verify_prehash(digest, &sig).is_ok())
    })
}

/// Recomputes the public point from the secret scalar and compares.
pub fn validate_params(curve: EccCurve, q: &Mpi, d: &Mpi) -> bool {
    fn check(curve: EccCurve, q: &Mpi, d: &Mpi) -> Result<bool> {
        dispatch_curve!(curve, {
            let key =
                SigningKey::from_slice(&d.to_padded(SCALAR)?).map_err(|_| Error::KeyInvalid)?;
            let point = key.verifying_key().to_encoded_point(false);
            Ok(point.as_bytes() == q.as_bytes())
        })
    }
    check(curve, q, d).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sha2::{Digest, Sha256, Sha512};

    #[test]
    fn test_sign_verify_all_curves() {
        for curve in [EccCurve::P256, EccCurve::P384, EccCurve::P521] {
            let key = generate(&mut OsRng, curve).unwrap();
            let digest = Sha512::digest(b"message to sign");
            let (r, s) = sign(curve, &digest, &key.d).unwrap();
            assert!(verify(curve, &digest, &r, &s, &key.q).unwrap());

            let wrong = Sha512::digest(b"a different message");
            assert!(!verify(curve, &wrong, &r, &s, &key.q).unwrap());
        }
    }

    #[test]
    fn test_short_scalars_are_left_padded() {
        // Sign repeatedly; stripped leading zeros in r or s must not break
        // verification.
        let key = generate(&mut OsRng, EccCurve::P256).unwrap();
        for i in 0..8u8 {
            let digest = Sha256::digest([i]);
            let (r, s) = sign(EccCurve::P256, &digest, &key.d).unwrap();
            assert!(verify(EccCurve::P256, &digest, &r, &s, &key.q).unwrap());
        }
    }

    #[test]
    fn test_validate_params() {
        let key = generate(&mut OsRng, EccCurve::P384).unwrap();
        assert!(validate_params(EccCurve::P384, &key.q, &key.d));
        let other = generate(&mut OsRng, EccCurve::P384).unwrap();
        assert!(!validate_params(EccCurve::P384, &key.q, &other.d));
    }
}
