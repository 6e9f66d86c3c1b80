//! ML-KEM-768 + X25519 composite KEM (algorithm 105).
//!
//! Both component KEMs run independently; their shares are bound together
//! with a single domain-separated SHA3-256 and the result keys an AES-256
//! key wrap of the session key. Breaking the construction requires
//! breaking both components.

use crate::algorithms::PublicKeyAlgorithm;
use crate::crypto::aes_kw;
use crate::error::{Error, Result};
use ml_kem::kem::{Decapsulate, KeyExport};
use ml_kem::{DecapsulationKey, EncapsulationKey, MlKem768};
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// X25519 component key/ciphertext length.
pub const ECC_LEN: usize = 32;
/// ML-KEM-768 encapsulation key length.
pub const MLKEM_PUBLIC_LEN: usize = 1184;
/// ML-KEM-768 ciphertext length.
pub const MLKEM_CIPHERTEXT_LEN: usize = 1088;
/// ML-KEM private seed length (d ‖ z).
pub const MLKEM_SEED_LEN: usize = 64;

const DOMAIN_SEPARATOR: &[u8] = b"OpenPGPCompositeKDFv1";

/// Generated composite key material.
pub struct MlKemX25519Key {
    /// X25519 public key.
    pub ecc_public: [u8; ECC_LEN],
    /// X25519 secret scalar.
    pub ecc_secret: [u8; ECC_LEN],
    /// ML-KEM-768 encapsulation key.
    pub mlkem_public: Box<[u8; MLKEM_PUBLIC_LEN]>,
    /// ML-KEM-768 seed; the expanded key is re-derived from it.
    pub mlkem_seed: [u8; MLKEM_SEED_LEN],
}

/// Ciphertext triple produced by [`encrypt`].
pub struct MlKemX25519Ciphertext {
    /// X25519 ephemeral public key.
    pub ecc_ciphertext: [u8; ECC_LEN],
    /// ML-KEM-768 ciphertext.
    pub mlkem_ciphertext: Box<[u8; MLKEM_CIPHERTEXT_LEN]>,
    /// AES-256-KW wrapped session key.
    pub wrapped_key: Vec<u8>,
}

/// Expands an ML-KEM decapsulation key from its stored seed.
pub fn expand_mlkem_seed(seed: &[u8; MLKEM_SEED_LEN]) -> Result<DecapsulationKey<MlKem768>> {
    let seed = ml_kem::Seed::try_from(&seed[..]).map_err(|_| Error::KeyInvalid)?;
    Ok(DecapsulationKey::<MlKem768>::from_seed(seed))
}

fn mlkem_encapsulation_key(public: &[u8; MLKEM_PUBLIC_LEN]) -> Result<EncapsulationKey<MlKem768>> {
    let encoded = ml_kem::array::Array::try_from(&public[..])
        .map_err(|_| Error::malformed("bad ML-KEM public key length"))?;
    EncapsulationKey::<MlKem768>::new(&encoded)
        .map_err(|_| Error::malformed("invalid ML-KEM public key"))
}

/// The X25519 component share: the raw DH output bound to the ciphertext
/// and recipient key with SHA3-256, per the composite KEM definition.
fn ecdh_key_share(
    shared: &[u8],
    ecc_ciphertext: &[u8; ECC_LEN],
    ecc_public: &[u8; ECC_LEN],
) -> Zeroizing<[u8; 32]> {
    let mut hasher = Sha3_256::new();
    hasher.update(shared);
    hasher.update(ecc_ciphertext);
    hasher.update(ecc_public);
    Zeroizing::new(hasher.finalize().into())
}

/// Binds both component shares into the KEK.
///
/// The exact concatenation order and the one-shot SHA3-256 are normative:
/// counter, ECC share/ciphertext/key, ML-KEM share/ciphertext/key, the
/// algorithm id, and the domain separator.
#[allow(clippy::too_many_arguments)]
pub fn multi_key_combine(
    algorithm: PublicKeyAlgorithm,
    ecc_share: &[u8],
    ecc_ciphertext: &[u8],
    ecc_public: &[u8],
    mlkem_share: &[u8],
    mlkem_ciphertext: &[u8],
    mlkem_public: &[u8],
) -> Zeroizing<[u8; 32]> {
    let mut hasher = Sha3_256::new();
    hasher.update([0, 0, 0, 1]);
    hasher.update(ecc_share);
    hasher.update(ecc_ciphertext);
    hasher.update(ecc_public);
    hasher.update(mlkem_share);
    hasher.update(mlkem_ciphertext);
    hasher.update(mlkem_public);
    hasher.update([algorithm.to_byte()]);
    hasher.update(DOMAIN_SEPARATOR);
    Zeroizing::new(hasher.finalize().into())
}

/// Generates a composite key pair.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<MlKemX25519Key> {
    let ecc_secret = StaticSecret::random_from_rng(&mut *rng);
    let mut mlkem_seed = [0u8; MLKEM_SEED_LEN];
    rng.fill_bytes(&mut mlkem_seed);
    let dk = expand_mlkem_seed(&mlkem_seed)?;
    let mut mlkem_public = Box::new([0u8; MLKEM_PUBLIC_LEN]);
    mlkem_public.copy_from_slice(dk.encapsulation_key().to_bytes().as_slice());
    Ok(MlKemX25519Key {
        ecc_public: PublicKey::from(&ecc_secret).to_bytes(),
        ecc_secret: ecc_secret.to_bytes(),
        mlkem_public,
        mlkem_seed,
    })
}

/// Encapsulates to both component keys and wraps `session_key_data`.
pub fn encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    ecc_public: &[u8; ECC_LEN],
    mlkem_public: &[u8; MLKEM_PUBLIC_LEN],
    session_key_data: &[u8],
) -> Result<MlKemX25519Ciphertext> {
    // X25519 component
    let ephemeral = StaticSecret::random_from_rng(&mut *rng);
    let ecc_ciphertext = PublicKey::from(&ephemeral).to_bytes();
    let shared = ephemeral.diffie_hellman(&PublicKey::from(*ecc_public));
    let ecc_share = ecdh_key_share(shared.as_bytes(), &ecc_ciphertext, ecc_public);

    // ML-KEM component
    let ek = mlkem_encapsulation_key(mlkem_public)?;
    let mut m_bytes = [0u8; 32];
    rng.fill_bytes(&mut m_bytes);
    let (mlkem_ciphertext, mlkem_share) = ek.encapsulate_deterministic(&m_bytes.into());
    let mut mlkem_ct = Box::new([0u8; MLKEM_CIPHERTEXT_LEN]);
    mlkem_ct.copy_from_slice(mlkem_ciphertext.as_slice());

    let kek = multi_key_combine(
        PublicKeyAlgorithm::MlKem768X25519,
        ecc_share.as_ref(),
        &ecc_ciphertext,
        ecc_public,
        mlkem_share.as_slice(),
        mlkem_ct.as_ref(),
        mlkem_public,
    );
    let wrapped_key = aes_kw::wrap(kek.as_ref(), session_key_data)?;
    Ok(MlKemX25519Ciphertext {
        ecc_ciphertext,
        mlkem_ciphertext: mlkem_ct,
        wrapped_key,
    })
}

/// Decapsulates both components and unwraps the session key.
pub fn decrypt(
    ecc_public: &[u8; ECC_LEN],
    ecc_secret: &[u8; ECC_LEN],
    mlkem_public: &[u8; MLKEM_PUBLIC_LEN],
    mlkem_seed: &[u8; MLKEM_SEED_LEN],
    ciphertext: &MlKemX25519Ciphertext,
) -> Result<Vec<u8>> {
    let shared = StaticSecret::from(*ecc_secret)
        .diffie_hellman(&PublicKey::from(ciphertext.ecc_ciphertext));
    let ecc_share = ecdh_key_share(shared.as_bytes(), &ciphertext.ecc_ciphertext, ecc_public);

    let dk = expand_mlkem_seed(mlkem_seed)?;
    let ct = ml_kem::Ciphertext::<MlKem768>::try_from(&ciphertext.mlkem_ciphertext[..])
        .map_err(|_| Error::malformed("bad ML-KEM ciphertext length"))?;
    let mlkem_share = dk.decapsulate(&ct);

    let kek = multi_key_combine(
        PublicKeyAlgorithm::MlKem768X25519,
        ecc_share.as_ref(),
        &ciphertext.ecc_ciphertext,
        ecc_public,
        mlkem_share.as_slice(),
        ciphertext.mlkem_ciphertext.as_ref(),
        mlkem_public,
    );
    aes_kw::unwrap(kek.as_ref(), &ciphertext.wrapped_key)
}

/// Recomputes both public halves from the secrets and compares.
pub fn validate_params(
    ecc_public: &[u8; ECC_LEN],
    ecc_secret: &[u8; ECC_LEN],
    mlkem_public: &[u8; MLKEM_PUBLIC_LEN],
    mlkem_seed: &[u8; MLKEM_SEED_LEN],
) -> bool {
    if PublicKey::from(&StaticSecret::from(*ecc_secret)).to_bytes() != *ecc_public {
        return false;
    }
    match expand_mlkem_seed(mlkem_seed) {
        Ok(dk) => dk.encapsulation_key().to_bytes().as_slice() == &mlkem_public[..],
        Err(_) => false,
    }
}
