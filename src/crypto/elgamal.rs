//! ElGamal session-key encryption for keys that still carry it.
//!
//! RFC 9580 deprecates the algorithm, so generation is refused; decryption
//! and encryption remain for interoperability with existing key material.

use crate::error::{Error, Result};
use crate::mpi::Mpi;
use num_bigint_dig::{BigUint, RandBigInt};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// EME-PKCS1-v1_5 encode: 00 02 <nonzero random> 00 <message>.
fn eme_pkcs1_encode<R: CryptoRng + RngCore>(rng: &mut R, data: &[u8], k: usize) -> Result<Vec<u8>> {
    if data.len() > k.saturating_sub(11) {
        return Err(Error::malformed("message too long for ElGamal modulus"));
    }
    let mut out = vec![0u8; k];
    out[1] = 0x02;
    for byte in &mut out[2..k - data.len() - 1] {
        loop {
            let candidate = (rng.next_u32() & 0xFF) as u8;
            if candidate != 0 {
                *byte = candidate;
                break;
            }
        }
    }
    out[k - data.len()..].copy_from_slice(data);
    Ok(out)
}

/// EME-PKCS1-v1_5 decode; errors are indistinguishable by message.
fn eme_pkcs1_decode(block: &[u8]) -> Result<Vec<u8>> {
    if block.len() < 11 || block[0] != 0x00 || block[1] != 0x02 {
        return Err(Error::Decryption);
    }
    let sep = block[2..]
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::Decryption)?;
    if sep < 8 {
        return Err(Error::Decryption);
    }
    Ok(block[2 + sep + 1..].to_vec())
}

/// Encrypts a session key, returning the `(g^k, m·y^k)` pair.
pub fn encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    data: &[u8],
    p: &Mpi,
    g: &Mpi,
    y: &Mpi,
) -> Result<(Mpi, Mpi)> {
    let p = BigUint::from_bytes_be(p.as_bytes());
    let g = BigUint::from_bytes_be(g.as_bytes());
    let y = BigUint::from_bytes_be(y.as_bytes());
    let k_len = (p.bits() + 7) / 8;

    let padded = eme_pkcs1_encode(rng, data, k_len)?;
    let m = BigUint::from_bytes_be(&padded);

    // Ephemeral exponent; full width of p is fine for correctness here.
    let k = rng.gen_biguint_below(&p);
    let e = g.modpow(&k, &p);
    let c = (m * y.modpow(&k, &p)) % &p;
    Ok((Mpi::from_slice(&e.to_bytes_be()), Mpi::from_slice(&c.to_bytes_be())))
}

/// Decrypts an `(e, c)` pair.
///
/// With `random_payload` set, failures return those bytes instead of an
/// error.
pub fn decrypt(
    e: &Mpi,
    c: &Mpi,
    p: &Mpi,
    x: &Mpi,
    random_payload: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let p = BigUint::from_bytes_be(p.as_bytes());
    let x = BigUint::from_bytes_be(x.as_bytes());
    let e = BigUint::from_bytes_be(e.as_bytes());
    let c = BigUint::from_bytes_be(c.as_bytes());
    let k_len = (p.bits() + 7) / 8;

    // m = c * (e^x)^-1 mod p
    let s = e.modpow(&x, &p);
    let s_inv = match num_bigint_dig::ModInverse::mod_inverse(s, &p).and_then(|v| v.to_biguint()) {
        Some(inv) => inv,
        None => {
            return match random_payload {
                Some(random) => Ok(random.to_vec()),
                None => Err(Error::Decryption),
            }
        }
    };
    let m = (c * s_inv) % &p;
    let block = Zeroizing::new({
        let bytes = m.to_bytes_be();
        let mut padded = vec![0u8; k_len - bytes.len()];
        padded.extend_from_slice(&bytes);
        padded
    });

    match (eme_pkcs1_decode(&block), random_payload) {
        (Ok(pt), None) => Ok(pt),
        (Ok(pt), Some(random)) => {
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

/// Confirms `y = g^x mod p`.
pub fn validate_params(p: &Mpi, g: &Mpi, y: &Mpi, x: &Mpi) -> bool {
    let p = BigUint::from_bytes_be(p.as_bytes());
    let g = BigUint::from_bytes_be(g.as_bytes());
    let y = BigUint::from_bytes_be(y.as_bytes());
    let x = BigUint::from_bytes_be(x.as_bytes());
    let one = BigUint::from(1u8);
    if g <= one || g >= p {
        return false;
    }
    g.modpow(&x, &p) == y
}
