//! SLH-DSA-SHAKE-128s signatures (algorithm 108).

use crate::algorithms::HashAlgorithm;
use crate::error::{Error, Result};
use rand::{CryptoRng, RngCore};
use signature::{Keypair, Signer, Verifier};
use slh_dsa::Shake128s;

/// Public key length (FIPS 205, SLH-DSA-SHAKE-128s).
pub const PUBLIC_LEN: usize = 32;
/// Secret key length.
pub const SECRET_LEN: usize = 64;
/// Signature length.
pub const SIG_LEN: usize = 7856;

/// Generated SLH-DSA key material.
pub struct SlhDsaKey {
    /// Public key bytes.
    pub public: [u8; PUBLIC_LEN],
    /// Secret key bytes.
    pub secret: Box<[u8; SECRET_LEN]>,
}

/// The parameter set fixes its digest: SHA3-256 for the 128-bit small
/// variant. Anything else is refused outright.
pub fn check_hash(hash: HashAlgorithm) -> Result<()> {
    if hash != HashAlgorithm::Sha3_256 {
        return Err(Error::HashTooWeak);
    }
    Ok(())
}

fn signing_key(secret: &[u8; SECRET_LEN]) -> Result<slh_dsa::SigningKey<Shake128s>> {
    slh_dsa::SigningKey::try_from(&secret[..]).map_err(|_| Error::KeyInvalid)
}

/// Generates a key pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<SlhDsaKey> {
    let signing = slh_dsa::SigningKey::<Shake128s>::new(rng);
    let verifying = signing.verifying_key();

    let mut public = [0u8; PUBLIC_LEN];
    public.copy_from_slice(&verifying.to_bytes());
    let mut secret = Box::new([0u8; SECRET_LEN]);
    secret.copy_from_slice(&signing.to_bytes());
    Ok(SlhDsaKey { public, secret })
}

/// Signs a digest.
pub fn sign(
    hash: HashAlgorithm,
    digest: &[u8],
    secret: &[u8; SECRET_LEN],
) -> Result<Box<[u8; SIG_LEN]>> {
    check_hash(hash)?;
    let signing = signing_key(secret)?;
    let signature = signing.sign(digest);
    let mut out = Box::new([0u8; SIG_LEN]);
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

/// Verifies a signature over a digest.
pub fn verify(
    hash: HashAlgorithm,
    signature: &[u8; SIG_LEN],
    public: &[u8; PUBLIC_LEN],
    digest: &[u8],
) -> Result<bool> {
    check_hash(hash)?;
    let verifying = slh_dsa::VerifyingKey::<Shake128s>::try_from(&public[..])
        .map_err(|_| Error::malformed("invalid SLH-DSA public key"))?;
    let signature = match slh_dsa::Signature::<Shake128s>::try_from(&signature[..]) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };
    Ok(verifying.verify(digest, &signature).is_ok())
}

/// Recomputes the public key from the secret and compares.
pub fn validate_params(public: &[u8; PUBLIC_LEN], secret: &[u8; SECRET_LEN]) -> bool {
    match signing_key(secret) {
        Ok(signing) => signing.verifying_key().to_bytes()[..] == public[..],
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sha3::{Digest, Sha3_256};

    #[test]
    fn test_sign_verify() {
        let key = generate(&mut OsRng).unwrap();
        let digest = Sha3_256::digest(b"slh-dsa message");
        let sig = sign(HashAlgorithm::Sha3_256, &digest, &key.secret).unwrap();
        assert!(verify(HashAlgorithm::Sha3_256, &sig, &key.public, &digest).unwrap());

        let mut bad = sig.clone();
        bad[17] ^= 1;
        assert!(!verify(HashAlgorithm::Sha3_256, &bad, &key.public, &digest).unwrap());
    }

    #[test]
    fn test_digest_must_match_parameter_set() {
        let key = generate(&mut OsRng).unwrap();
        let digest = [0u8; 32];
        assert!(matches!(
            sign(HashAlgorithm::Sha256, &digest, &key.secret),
            Err(Error::HashTooWeak)
        ));
    }

    #[test]
    fn test_validate_params() {
        let key = generate(&mut OsRng).unwrap();
        assert!(validate_params(&key.public, &key.secret));
    }
}
