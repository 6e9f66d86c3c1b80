//! Ed448 signatures (algorithm 28).

use crate::algorithms::HashAlgorithm;
use crate::error::{Error, Result};
use ed448_goldilocks::{SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use signature::{Signer, Verifier};

/// Seed and public key length.
pub const KEY_LEN: usize = 57;
/// Signature length.
pub const SIG_LEN: usize = 114;

/// Generated Ed448 key material.
pub struct Ed448Key {
    /// Public key bytes.
    pub public: [u8; KEY_LEN],
    /// Private seed.
    pub seed: [u8; KEY_LEN],
}

/// Ed448 signatures require at least SHA-512 strength digests.
pub fn check_hash_strength(hash: HashAlgorithm) -> Result<()> {
    if hash.digest_size() < HashAlgorithm::Sha512.digest_size() {
        return Err(Error::HashTooWeak);
    }
    Ok(())
}

fn signing_key(seed: &[u8; KEY_LEN]) -> Result<SigningKey> {
    SigningKey::try_from(&seed[..]).map_err(|_| Error::KeyInvalid)
}

/// Generates a key pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Ed448Key> {
    let mut seed = [0u8; KEY_LEN];
    rng.fill_bytes(&mut seed);
    let signing = signing_key(&seed)?;
    let mut public = [0u8; KEY_LEN];
    public.copy_from_slice(&signing.verifying_key().to_bytes());
    Ok(Ed448Key { public, seed })
}

/// Signs a digest.
pub fn sign(hash: HashAlgorithm, digest: &[u8], seed: &[u8; KEY_LEN]) -> Result<[u8; SIG_LEN]> {
    check_hash_strength(hash)?;
    let signing = signing_key(seed)?;
    let signature = signing.sign(digest);
    let mut out = [0u8; SIG_LEN];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

/// Verifies a signature over a digest.
pub fn verify(
    hash: HashAlgorithm,
    signature: &[u8; SIG_LEN],
    public: &[u8; KEY_LEN],
    digest: &[u8],
) -> Result<bool> {
    check_hash_strength(hash)?;
    let verifying = VerifyingKey::try_from(&public[..])
        .map_err(|_| Error::malformed("invalid Ed448 public key"))?;
    let signature = match ed448_goldilocks::Signature::try_from(&signature[..]) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };
    Ok(verifying.verify(digest, &signature).is_ok())
}

/// Recomputes the public key from the seed and compares.
pub fn validate_params(public: &[u8; KEY_LEN], seed: &[u8; KEY_LEN]) -> bool {
    match signing_key(seed) {
        Ok(signing) => signing.verifying_key().to_bytes()[..] == public[..],
        Err(_) => false,
    }
}
