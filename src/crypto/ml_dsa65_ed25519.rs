//! ML-DSA-65 + Ed25519 composite signatures (algorithm 107).
//!
//! Both components sign the same digest; verification accepts only if both
//! component signatures verify.

use crate::algorithms::HashAlgorithm;
use crate::error::{Error, Result};
use ed25519_dalek::{Signer, Verifier};
use ml_dsa::{KeyGen, MlDsa65};
use rand::{CryptoRng, RngCore};

/// Ed25519 component key length.
pub const ECC_LEN: usize = 32;
/// Ed25519 signature length.
pub const ECC_SIG_LEN: usize = 64;
/// ML-DSA-65 public key length.
pub const MLDSA_PUBLIC_LEN: usize = 1952;
/// ML-DSA-65 signature length.
pub const MLDSA_SIG_LEN: usize = 3309;
/// ML-DSA private seed length.
pub const MLDSA_SEED_LEN: usize = 32;

/// Generated composite key material.
pub struct MlDsaEd25519Key {
    /// Ed25519 public key.
    pub ecc_public: [u8; ECC_LEN],
    /// Ed25519 private seed.
    pub ecc_secret: [u8; ECC_LEN],
    /// ML-DSA-65 public key.
    pub mldsa_public: Box<[u8; MLDSA_PUBLIC_LEN]>,
    /// ML-DSA-65 seed; the expanded key is re-derived from it.
    pub mldsa_seed: [u8; MLDSA_SEED_LEN],
}

/// Composite signature pair.
pub struct MlDsaEd25519Signature {
    /// Ed25519 component.
    pub ecc_signature: [u8; ECC_SIG_LEN],
    /// ML-DSA-65 component.
    pub mldsa_signature: Box<[u8; MLDSA_SIG_LEN]>,
}

/// Digests shorter than 256 bits are refused for the composite.
pub fn check_hash_strength(hash: HashAlgorithm) -> Result<()> {
    if hash.digest_size() < 32 {
        return Err(Error::HashTooWeak);
    }
    Ok(())
}

/// Expands the ML-DSA key pair from its stored seed.
pub fn expand_mldsa_seed(seed: &[u8; MLDSA_SEED_LEN]) -> Result<ml_dsa::KeyPair<MlDsa65>> {
    let xi = ml_dsa::B32::try_from(&seed[..]).map_err(|_| Error::KeyInvalid)?;
    Ok(MlDsa65::key_gen_internal(&xi))
}

/// Generates a composite key pair from fresh random seeds.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<MlDsaEd25519Key> {
    let mut ecc_secret = [0u8; ECC_LEN];
    rng.fill_bytes(&mut ecc_secret);
    let ecc_public = ed25519_dalek::SigningKey::from_bytes(&ecc_secret)
        .verifying_key()
        .to_bytes();

    let mut mldsa_seed = [0u8; MLDSA_SEED_LEN];
    rng.fill_bytes(&mut mldsa_seed);
    let key_pair = expand_mldsa_seed(&mldsa_seed)?;
    let mut mldsa_public = Box::new([0u8; MLDSA_PUBLIC_LEN]);
    mldsa_public.copy_from_slice(key_pair.verifying_key().encode().as_slice());

    Ok(MlDsaEd25519Key {
        ecc_public,
        ecc_secret,
        mldsa_public,
        mldsa_seed,
    })
}

/// Signs a digest with both components.
pub fn sign(
    hash: HashAlgorithm,
    digest: &[u8],
    ecc_secret: &[u8; ECC_LEN],
    mldsa_seed: &[u8; MLDSA_SEED_LEN],
) -> Result<MlDsaEd25519Signature> {
    check_hash_strength(hash)?;

    let ecc_signature = ed25519_dalek::SigningKey::from_bytes(ecc_secret)
        .sign(digest)
        .to_bytes();

    let key_pair = expand_mldsa_seed(mldsa_seed)?;
    let signature = key_pair
        .signing_key()
        .sign_deterministic(digest, &[])
        .map_err(|_| Error::crypto("ML-DSA signing failed"))?;
    let mut mldsa_signature = Box::new([0u8; MLDSA_SIG_LEN]);
    mldsa_signature.copy_from_slice(signature.encode().as_slice());

    Ok(MlDsaEd25519Signature {
        ecc_signature,
        mldsa_signature,
    })
}

/// Verifies both components; the composite verifies only if both do.
pub fn verify(
    hash: HashAlgorithm,
    signature: &MlDsaEd25519Signature,
    ecc_public: &[u8; ECC_LEN],
    mldsa_public: &[u8; MLDSA_PUBLIC_LEN],
    digest: &[u8],
) -> Result<bool> {
    check_hash_strength(hash)?;

    let ecc_ok = match ed25519_dalek::VerifyingKey::from_bytes(ecc_public) {
        Ok(vk) => vk
            .verify(
                digest,
                &ed25519_dalek::Signature::from_bytes(&signature.ecc_signature),
            )
            .is_ok(),
        Err(_) => false,
    };

    let encoded = ml_dsa::EncodedVerifyingKey::<MlDsa65>::try_from(&mldsa_public[..])
        .map_err(|_| Error::malformed("bad ML-DSA public key length"))?;
    let vk = ml_dsa::VerifyingKey::<MlDsa65>::decode(&encoded);
    let mldsa_ok = match ml_dsa::EncodedSignature::<MlDsa65>::try_from(
        &signature.mldsa_signature[..],
    ) {
        Ok(sig_encoded) => match ml_dsa::Signature::<MlDsa65>::decode(&sig_encoded) {
            Some(sig) => vk.verify_with_context(digest, &[], &sig),
            None => false,
        },
        Err(_) => false,
    };

    Ok(ecc_ok && mldsa_ok)
}

/// Recomputes both public halves from the secrets and compares.
pub fn validate_params(
    ecc_public: &[u8; ECC_LEN],
    ecc_secret: &[u8; ECC_LEN],
    mldsa_public: &[u8; MLDSA_PUBLIC_LEN],
    mldsa_seed: &[u8; MLDSA_SEED_LEN],
) -> bool {
    let derived = ed25519_dalek::SigningKey::from_bytes(ecc_secret)
        .verifying_key()
        .to_bytes();
    if derived != *ecc_public {
        return false;
    }
    match expand_mldsa_seed(mldsa_seed) {
        Ok(kp) => kp.verifying_key().encode().as_slice() == &mldsa_public[..],
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = generate(&mut OsRng).unwrap();
        let digest = Sha256::digest(b"composite message");
        let sig = sign(HashAlgorithm::Sha256, &digest, &key.ecc_secret, &key.mldsa_seed).unwrap();
        assert!(verify(
            HashAlgorithm::Sha256,
            &sig,
            &key.ecc_public,
            &key.mldsa_public,
            &digest
        )
        .unwrap());
    }

    #[test]
    fn test_either_component_failing_rejects() {
        let key = generate(&mut OsRng).unwrap();
        let digest = Sha256::digest(b"composite message");
        let sig = sign(HashAlgorithm::Sha256, &digest, &key.ecc_secret, &key.mldsa_seed).unwrap();

        let mut ecc_bad = MlDsaEd25519Signature {
            ecc_signature: sig.ecc_signature,
            mldsa_signature: sig.mldsa_signature.clone(),
        };
        ecc_bad.ecc_signature[0] ^= 1;
        assert!(!verify(
            HashAlgorithm::Sha256,
            &ecc_bad,
            &key.ecc_public,
            &key.mldsa_public,
            &digest
        )
        .unwrap());

        let mut mldsa_bad = MlDsaEd25519Signature {
            ecc_signature: sig.ecc_signature,
            mldsa_signature: sig.mldsa_signature.clone(),
        };
        mldsa_bad.mldsa_signature[100] ^= 1;
        assert!(!verify(
            HashAlgorithm::Sha256,
            &mldsa_bad,
            &key.ecc_public,
            &key.mldsa_public,
            &digest
        )
        .unwrap());
    }

    #[test]
    fn test_sha224_rejected() {
        let key = generate(&mut OsRng).unwrap();
        let digest = [0u8; 28];
        assert!(matches!(
            sign(HashAlgorithm::Sha224, &digest, &key.ecc_secret, &key.mldsa_seed),
            Err(Error::HashTooWeak)
        ));
    }

    #[test]
    fn test_seed_expansion_is_stable() {
        let key = generate(&mut OsRng).unwrap();
        let a = expand_mldsa_seed(&key.mldsa_seed).unwrap();
        let b = expand_mldsa_seed(&key.mldsa_seed).unwrap();
        assert_eq!(
            a.verifying_key().encode().as_slice(),
            b.verifying_key().encode().as_slice()
        );
    }
}
