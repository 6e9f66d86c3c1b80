//! Packet types and framing.
//!
//! The two protected-material packets live here: the Public-Key Encrypted
//! Session Key packet (tag 1) and the Secret-Key packet (tags 5 and 7),
//! together with the public-key prefix both build on.

use crate::algorithms::Tag;
use crate::error::{Error, Result};

pub mod pkesk;
pub mod public_key;
pub mod secret_key;

pub use pkesk::{Pkesk, Recipient};
pub use public_key::PublicKeyPacket;
pub use secret_key::SecretKeyPacket;

/// Frames a packet body with a new-format header.
pub fn frame(tag: Tag, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 6);
    out.push(tag.ctb());
    let len = body.len();
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let encoded = len - 192;
        out.push(192 + (encoded >> 8) as u8);
        out.push((encoded & 0xFF) as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
    out.extend_from_slice(body);
    out
}

/// Splits a new-format framed packet into its tag and body.
pub fn unframe(data: &[u8]) -> Result<(Tag, &[u8])> {
    if data.len() < 2 {
        return Err(Error::malformed("truncated packet header"));
    }
    let ctb = data[0];
    if ctb & 0xC0 != 0xC0 {
        return Err(Error::unsupported("legacy packet framing"));
    }
    let tag = match ctb & 0x3F {
        1 => Tag::PublicKeyEncryptedSessionKey,
        5 => Tag::SecretKey,
        6 => Tag::PublicKey,
        7 => Tag::SecretSubkey,
        14 => Tag::PublicSubkey,
        other => return Err(Error::unsupported(format!("packet tag {other}"))),
    };
    let (len, header) = match data[1] {
        first @ 0..=191 => (first as usize, 2),
        first @ 192..=223 => {
            if data.len() < 3 {
                return Err(Error::malformed("truncated packet length"));
            }
            ((((first as usize) - 192) << 8) + data[2] as usize + 192, 3)
        }
        255 => {
            if data.len() < 6 {
                return Err(Error::malformed("truncated packet length"));
            }
            (
                u32::from_be_bytes([data[2], data[3], data[4], data[5]]) as usize,
                6,
            )
        }
        _ => return Err(Error::unsupported("partial body lengths")),
    };
    let body = data
        .get(header..header + len)
        .ok_or_else(|| Error::malformed("truncated packet body"))?;
    Ok((tag, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_roundtrip() {
        for len in [0usize, 100, 200, 8383, 10_000] {
            let body = vec![0xABu8; len];
            let framed = frame(Tag::SecretKey, &body);
            let (tag, parsed) = unframe(&framed).unwrap();
            assert_eq!(tag, Tag::SecretKey);
            assert_eq!(parsed, &body[..]);
        }
    }

    #[test]
    fn test_unframe_rejects_legacy_format() {
        assert!(unframe(&[0x85, 0x01, 0x00]).is_err());
    }

    #[test]
    fn test_unframe_rejects_truncation() {
        let framed = frame(Tag::PublicKeyEncryptedSessionKey, &[1, 2, 3]);
        assert!(unframe(&framed[..framed.len() - 1]).is_err());
    }
}
