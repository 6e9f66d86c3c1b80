//! Integrity checksums over secret-key and session-key material.

use crate::crypto::timing;
use crate::error::{Error, Result};
use sha1::{Digest, Sha1};
use subtle::Choice;

/// 2-byte big-endian sum of all bytes, mod 65536.
pub fn calculate_simple(data: &[u8]) -> [u8; 2] {
    let sum = data
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
    sum.to_be_bytes()
}

/// Verifies the 2-byte checksum without branching on the outcome.
pub fn verify_simple_ct(data: &[u8], expected: &[u8]) -> Choice {
    timing::bytes_equal(&calculate_simple(data), expected)
}

/// SHA-1 over secret-key plaintext, appended before CFB encryption.
pub fn calculate_sha1(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

/// Verifies the trailing SHA-1 key checksum; mismatch means the passphrase
/// was wrong.
pub fn verify_sha1(data: &[u8], expected: &[u8]) -> Result<()> {
    if bool::from(timing::bytes_equal(&calculate_sha1(data), expected)) {
        Ok(())
    } else {
        Err(Error::IncorrectPassphrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_checksum() {
        assert_eq!(calculate_simple(&[]), [0, 0]);
        assert_eq!(calculate_simple(&[1, 2, 3]), [0, 6]);
        // wraps mod 65536
        assert_eq!(calculate_simple(&[0xFF; 257]), ((257u32 * 255) as u16).to_be_bytes());
    }

    #[test]
    fn test_simple_checksum_ct() {
        let data = [5u8, 6, 7];
        let sum = calculate_simple(&data);
        assert!(bool::from(verify_simple_ct(&data, &sum)));
        assert!(!bool::from(verify_simple_ct(&data, &[0, 0])));
    }

    #[test]
    fn test_sha1_checksum() {
        let data = b"secret key material";
        let sum = calculate_sha1(data);
        assert!(verify_sha1(data, &sum).is_ok());
        assert!(matches!(
            verify_sha1(data, &[0u8; 20]),
            Err(Error::IncorrectPassphrase)
        ));
    }
}
