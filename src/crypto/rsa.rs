//! RSA adapter: PKCS#1 v1.5 signatures and session-key encryption.

use crate::algorithms::HashAlgorithm;
use crate::error::{Error, Result};
use crate::mpi::{left_pad, Mpi};
use num_bigint_dig::ModInverse;
use rand::{CryptoRng, RngCore};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};

/// Generated RSA key material in OpenPGP order.
pub struct RsaKey {
    /// Modulus.
    pub n: Mpi,
    /// Public exponent.
    pub e: Mpi,
    /// Private exponent.
    pub d: Mpi,
    /// First prime.
    pub p: Mpi,
    /// Second prime.
    pub q: Mpi,
    /// Multiplicative inverse of `p` modulo `q`.
    pub u: Mpi,
}

/// EMSA-PKCS1-v1_5 DigestInfo prefix for the hash.
fn pkcs1_prefix(hash: HashAlgorithm) -> &'static [u8] {
    match hash {
        HashAlgorithm::Md5 => &[
            0x30, 0x20, 0x30, 0x0C, 0x06, 0x08, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x02, 0x05,
            0x05, 0x00, 0x04, 0x10,
        ],
        HashAlgorithm::Sha1 => &[
            0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2B, 0x0E, 0x03, 0x02, 0x1A, 0x05, 0x00, 0x04,
            0x14,
        ],
        HashAlgorithm::Ripemd160 => &[
            0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2B, 0x24, 0x03, 0x02, 0x01, 0x05, 0x00, 0x04,
            0x14,
        ],
        HashAlgorithm::Sha256 => &[
            0x30, 0x31, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x01, 0x05, 0x00, 0x04, 0x20,
        ],
        HashAlgorithm::Sha384 => &[
            0x30, 0x41, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x02, 0x05, 0x00, 0x04, 0x30,
        ],
        HashAlgorithm::Sha512 => &[
            0x30, 0x51, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x03, 0x05, 0x00, 0x04, 0x40,
        ],
        HashAlgorithm::Sha224 => &[
            0x30, 0x2D, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x04, 0x05, 0x00, 0x04, 0x1C,
        ],
        HashAlgorithm::Sha3_256 => &[
            0x30, 0x31, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x08, 0x05, 0x00, 0x04, 0x20,
        ],
        HashAlgorithm::Sha3_512 => &[
            0x30, 0x51, 0x30, 0x0D, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x0A, 0x05, 0x00, 0x04, 0x40,
        ],
    }
}

fn signature_scheme(hash: HashAlgorithm) -> Pkcs1v15Sign {
    Pkcs1v15Sign {
        hash_len: Some(hash.digest_size()),
        prefix: pkcs1_prefix(hash).into(),
    }
}

fn public_key(n: &Mpi, e: &Mpi) -> Result<RsaPublicKey> {
    RsaPublicKey::new(
        BigUint::from_bytes_be(n.as_bytes()),
        BigUint::from_bytes_be(e.as_bytes()),
    )
    .map_err(|_| Error::KeyInvalid)
}

fn private_key(n: &Mpi, e: &Mpi, d: &Mpi, p: &Mpi, q: &Mpi) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n.as_bytes()),
        BigUint::from_bytes_be(e.as_bytes()),
        BigUint::from_bytes_be(d.as_bytes()),
        vec![
            BigUint::from_bytes_be(p.as_bytes()),
            BigUint::from_bytes_be(q.as_bytes()),
        ],
    )
    .map_err(|_| Error::KeyInvalid)
}

/// Generates an RSA key of `bits` with e = 65537.
pub fn generate<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> Result<RsaKey> {
    let key = RsaPrivateKey::new(rng, bits).map_err(Error::crypto)?;
    let primes = key.primes();
    let (p, q) = (&primes[0], &primes[1]);
    let u = p
        .clone()
        .mod_inverse(q)
        .and_then(|inv| inv.to_biguint())
        .ok_or(Error::KeyInvalid)?;
    Ok(RsaKey {
        n: Mpi::from_slice(&key.n().to_bytes_be()),
        e: Mpi::from_slice(&key.e().to_bytes_be()),
        d: Mpi::from_slice(&key.d().to_bytes_be()),
        p: Mpi::from_slice(&p.to_bytes_be()),
        q: Mpi::from_slice(&q.to_bytes_be()),
        u: Mpi::from_slice(&u.to_bytes_be()),
    })
}

/// Signs an already-computed digest.
pub fn sign(
    hash: HashAlgorithm,
    digest: &[u8],
    n: &Mpi,
    e: &Mpi,
    d: &Mpi,
    p: &Mpi,
    q: &Mpi,
) -> Result<Mpi> {
    let key = private_key(n, e, d, p, q)?;
    let sig = key
        .sign(signature_scheme(hash), digest)
        .map_err(Error::crypto)?;
    Ok(Mpi::from_slice(&sig))
}

/// Verifies a signature over an already-computed digest.
pub fn verify(hash: HashAlgorithm, digest: &[u8], sig: &Mpi, n: &Mpi, e: &Mpi) -> Result<bool> {
    let key = public_key(n, e)?;
    // The signature MPI may be shorter than the modulus after zero
    // stripping; restore the full width first.
    let padded = left_pad(sig.as_bytes(), n.len())?;
    Ok(key.verify(signature_scheme(hash), digest, &padded).is_ok())
}

/// Encrypts a session key with PKCS#1 v1.5 padding.
pub fn encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    data: &[u8],
    n: &Mpi,
    e: &Mpi,
) -> Result<Mpi> {
    let key = public_key(n, e)?;
    let ct = key
        .encrypt(rng, Pkcs1v15Encrypt, data)
        .map_err(Error::crypto)?;
    Ok(Mpi::from_slice(&ct))
}

/// Decrypts a session key.
///
/// With `random_payload` set, any failure returns those bytes instead of an
/// error, so callers cannot be used as a padding oracle.
pub fn decrypt(
    ciphertext: &Mpi,
    n: &Mpi,
    e: &Mpi,
    d: &Mpi,
    p: &Mpi,
    q: &Mpi,
    random_payload: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let key = private_key(n, e, d, p, q)?;
    let ct = left_pad(ciphertext.as_bytes(), n.len())?;
    match (key.decrypt(Pkcs1v15Encrypt, &ct), random_payload) {
        (Ok(pt), None) => Ok(pt),
        (Ok(pt), Some(random)) => {
            // Wrong-length results are as suspect as padding failures.
            if pt.len() == random.len() {
                Ok(pt)
            } else {
                Ok(random.to_vec())
            }
        }
        (Err(_), Some(random)) => Ok(random.to_vec()),
        (Err(_), None) => Err(Error::Decryption),
    }
}

/// Confirms that the private parameters belong to the public ones.
pub fn validate_params(n: &Mpi, e: &Mpi, d: &Mpi, p: &Mpi, q: &Mpi, u: &Mpi) -> bool {
    let n = BigUint::from_bytes_be(n.as_bytes());
    let e = BigUint::from_bytes_be(e.as_bytes());
    let d = BigUint::from_bytes_be(d.as_bytes());
    let p = BigUint::from_bytes_be(p.as_bytes());
    let q = BigUint::from_bytes_be(q.as_bytes());
    let u = BigUint::from_bytes_be(u.as_bytes());
    let one = BigUint::from(1u8);

    if &p * &q != n {
        return false;
    }
    // e d ≡ 1 mod (p-1) and mod (q-1)
    let ed = &e * &d;
    if &ed % (&p - &one) != one || &ed % (&q - &one) != one {
        return false;
    }
    // u p ≡ 1 mod q
    (&u * &p) % &q == one
}
