//! Ed25519 signatures, in native (algorithm 27) and legacy MPI-encoded
//! (algorithm 22) form. Both share the same primitive; only the wire
//! encoding of keys and signatures differs.

use crate::algorithms::HashAlgorithm;
use crate::config::Config;
use crate::error::{Error, Result};
use ed25519_dalek::{Signer, Verifier};
use rand::{CryptoRng, RngCore};

/// Seed and public key length.
pub const KEY_LEN: usize = 32;
/// Signature length.
pub const SIG_LEN: usize = 64;

/// Generated Ed25519 key material.
pub struct Ed25519Key {
    /// Public key bytes.
    pub public: [u8; KEY_LEN],
    /// Private seed.
    pub seed: [u8; KEY_LEN],
}

/// Signatures must carry at least the strength of the curve's preferred
/// hash (SHA-256).
pub fn check_hash_strength(hash: HashAlgorithm) -> Result<()> {
    if hash.digest_size() < HashAlgorithm::Sha256.digest_size() {
        return Err(Error::HashTooWeak);
    }
    Ok(())
}

/// Generates a key pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Ed25519Key {
    let mut seed = [0u8; KEY_LEN];
    rng.fill_bytes(&mut seed);
    let signing = ed25519_dalek::SigningKey::from_bytes(&seed);
    Ed25519Key {
        public: signing.verifying_key().to_bytes(),
        seed,
    }
}

/// Signs a digest.
///
/// With `check_eddsa_faulty_signatures` set, the fresh signature is
/// verified before being returned; a mismatch reports
/// [`Error::TransientSignature`] so the caller can retry. Signing the same
/// digest twice through a faulting implementation would otherwise reveal
/// the private scalar.
pub fn sign(
    config: &Config,
    hash: HashAlgorithm,
    digest: &[u8],
    seed: &[u8; KEY_LEN],
) -> Result<[u8; SIG_LEN]> {
    check_hash_strength(hash)?;
    let signing = ed25519_dalek::SigningKey::from_bytes(seed);
    let signature = signing.sign(digest);
    if config.check_eddsa_faulty_signatures
        && signing
            .verifying_key()
            .verify(digest, &signature)
            .is_err()
    {
        return Err(Error::TransientSignature);
    }
    Ok(signature.to_bytes())
}

/// Verifies a signature over a digest.
pub fn verify(
    hash: HashAlgorithm,
    signature: &[u8; SIG_LEN],
    public: &[u8; KEY_LEN],
    digest: &[u8],
) -> Result<bool> {
    check_hash_strength(hash)?;
    let verifying = ed25519_dalek::VerifyingKey::from_bytes(public)
        .map_err(|_| Error::malformed("invalid Ed25519 public key"))?;
    let signature = ed25519_dalek::Signature::from_bytes(signature);
    Ok(verifying.verify(digest, &signature).is_ok())
}

/// Recomputes the public key from the seed and compares.
pub fn validate_params(public: &[u8; KEY_LEN], seed: &[u8; KEY_LEN]) -> bool {
    let signing = ed25519_dalek::SigningKey::from_bytes(seed);
    signing.verifying_key().to_bytes() == *public
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_sign_verify_and_bitflip() {
        let key = generate(&mut OsRng);
        let digest = Sha256::digest(b"test");
        let config = Config::default();
        let sig = sign(&config, HashAlgorithm::Sha256, &digest, &key.seed).unwrap();
        assert!(verify(HashAlgorithm::Sha256, &sig, &key.public, &digest).unwrap());

        let mut bad = sig;
        bad[3] ^= 0x10;
        assert!(!verify(HashAlgorithm::Sha256, &bad, &key.public, &digest).unwrap());
    }

    #[test]
    fn test_weak_hash_rejected() {
        let key = generate(&mut OsRng);
        let digest = [0u8; 20];
        let err = sign(&Config::default(), HashAlgorithm::Sha1, &digest, &key.seed).unwrap_err();
        assert!(matches!(err, Error::HashTooWeak));
        assert!(matches!(
            verify(HashAlgorithm::Ripemd160, &[0u8; 64], &key.public, &digest),
            Err(Error::HashTooWeak)
        ));
    }

    #[test]
    fn test_self_check_passes_for_healthy_impl() {
        let mut config = Config::default();
        config.check_eddsa_faulty_signatures = true;
        let key = generate(&mut OsRng);
        let digest = Sha256::digest(b"checked");
        assert!(sign(&config, HashAlgorithm::Sha256, &digest, &key.seed).is_ok());
    }

    #[test]
    fn test_validate_params() {
        let key = generate(&mut OsRng);
        assert!(validate_params(&key.public, &key.seed));
        let other = generate(&mut OsRng);
        assert!(!validate_params(&key.public, &other.seed));
    }
}
