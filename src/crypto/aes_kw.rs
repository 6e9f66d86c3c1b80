//! RFC 3394 AES key wrap, dispatched by KEK length.

use crate::error::{Error, Result};
use aes_kw::{KekAes128, KekAes192, KekAes256};

/// Wraps `data` (a multiple of 8 bytes) under `kek`.
pub fn wrap(kek: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 8 != 0 || data.is_empty() {
        return Err(Error::malformed(
            "key wrap input must be a multiple of 8 bytes",
        ));
    }
    let bad_kek = || Error::malformed("bad KEK length");
    let wrapped = match kek.len() {
        16 => KekAes128::try_from(kek).map_err(|_| bad_kek())?.wrap_vec(data),
        24 => KekAes192::try_from(kek).map_err(|_| bad_kek())?.wrap_vec(data),
        32 => KekAes256::try_from(kek).map_err(|_| bad_kek())?.wrap_vec(data),
        other => return Err(Error::unsupported(format!("KEK length {other}"))),
    };
    wrapped.map_err(|_| Error::crypto("key wrap failed"))
}

/// Unwraps `data`, verifying the RFC 3394 integrity value.
pub fn unwrap(kek: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 8 != 0 || data.len() < 16 {
        return Err(Error::Decryption);
    }
    let bad_kek = || Error::malformed("bad KEK length");
    let unwrapped = match kek.len() {
        16 => KekAes128::try_from(kek).map_err(|_| bad_kek())?.unwrap_vec(data),
        24 => KekAes192::try_from(kek).map_err(|_| bad_kek())?.unwrap_vec(data),
        32 => KekAes256::try_from(kek).map_err(|_| bad_kek())?.unwrap_vec(data),
        other => return Err(Error::unsupported(format!("KEK length {other}"))),
    };
    unwrapped.map_err(|_| Error::Decryption)
}
