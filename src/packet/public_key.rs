//! Public-key packet body (tag 6/14), also embedded as the prefix of every
//! secret-key packet.

use crate::algorithms::PublicKeyAlgorithm;
use crate::crypto::{parse_public_params, PublicParams};
use crate::error::{Error, Result};
use crate::mpi::Reader;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// A parsed public-key packet body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyPacket {
    /// Key version (4, 5, or 6).
    pub version: u8,
    /// Creation time, seconds since the epoch.
    pub created: u32,
    /// Public-key algorithm.
    pub algorithm: PublicKeyAlgorithm,
    /// Algorithm parameters.
    pub params: PublicParams,
}

impl PublicKeyPacket {
    /// Builds a packet for freshly generated parameters.
    pub fn new(version: u8, created: u32, params: PublicParams) -> Result<Self> {
        check_version(version)?;
        check_curve_policy(version, &params)?;
        Ok(Self {
            version,
            created,
            algorithm: params.algorithm(),
            params,
        })
    }

    /// Parses a packet body.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let packet = Self::parse(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(Error::malformed("trailing bytes after public key"));
        }
        Ok(packet)
    }

    /// Parses a packet from a reader, leaving any trailing bytes (the
    /// secret-key packet continues after the public prefix).
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let version = reader.read_u8()?;
        check_version(version)?;
        let created = reader.read_u32()?;
        let algorithm = PublicKeyAlgorithm::from_byte(reader.read_u8()?)?;

        let params = if version >= 5 {
            let material_len = reader.read_u32()? as usize;
            let material = reader.read_exact(material_len)?;
            let mut material_reader = Reader::new(material);
            let params = parse_public_params(algorithm, &mut material_reader)?;
            if material_reader.remaining() != 0 {
                return Err(Error::malformed("trailing bytes in key material"));
            }
            params
        } else {
            parse_public_params(algorithm, reader)?
        };

        check_curve_policy(version, &params)?;

        Ok(Self {
            version,
            created,
            algorithm,
            params,
        })
    }

    /// Serializes the packet body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(self.version);
        out.extend_from_slice(&self.created.to_be_bytes());
        out.push(self.algorithm.to_byte());
        let material = self.params.to_vec();
        if self.version >= 5 {
            out.extend_from_slice(&(material.len() as u32).to_be_bytes());
        }
        out.extend_from_slice(&material);
        out
    }

    /// Computes the key fingerprint: SHA-1 over a 0x99-framed body for v4,
    /// SHA-256 over a 0x9A/0x9B-framed body for v5/v6.
    pub fn fingerprint(&self) -> Vec<u8> {
        let body = self.to_bytes();
        match self.version {
            4 => {
                let mut hasher = Sha1::new();
                hasher.update([0x99]);
                hasher.update((body.len() as u16).to_be_bytes());
                hasher.update(&body);
                hasher.finalize().to_vec()
            }
            5 => {
                let mut hasher = Sha256::new();
                hasher.update([0x9A]);
                hasher.update((body.len() as u32).to_be_bytes());
                hasher.update(&body);
                hasher.finalize().to_vec()
            }
            _ => {
                let mut hasher = Sha256::new();
                hasher.update([0x9B]);
                hasher.update((body.len() as u32).to_be_bytes());
                hasher.update(&body);
                hasher.finalize().to_vec()
            }
        }
    }

    /// The 8-byte key ID: trailing fingerprint bytes for v4, leading for
    /// v5/v6.
    pub fn key_id(&self) -> [u8; 8] {
        let fp = self.fingerprint();
        let mut id = [0u8; 8];
        match self.version {
            4 => id.copy_from_slice(&fp[fp.len() - 8..]),
            _ => id.copy_from_slice(&fp[..8]),
        }
        id
    }
}

fn check_version(version: u8) -> Result<()> {
    match version {
        4 | 5 | 6 => Ok(()),
        other => Err(Error::unsupported(format!("key version {other}"))),
    }
}

/// v6 keys must not use the deprecated Curve25519/Ed25519 OIDs.
fn check_curve_policy(version: u8, params: &PublicParams) -> Result<()> {
    if version == 6 {
        if let PublicParams::Ecdh { curve, .. }
        | PublicParams::Ecdsa { curve, .. }
        | PublicParams::EddsaLegacy { curve, .. } = params
        {
            if curve.is_legacy() {
                tracing::debug!(?curve, "rejecting legacy curve on v6 key");
                return Err(Error::unsupported("legacy curve OID on a v6 key"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::crypto::{generate_params, KeyGenOptions};
    use rand::rngs::OsRng;

    fn test_packet(version: u8) -> PublicKeyPacket {
        let (public, _) = generate_params(
            &mut OsRng,
            &Config::default(),
            PublicKeyAlgorithm::Ed25519,
            &KeyGenOptions::default(),
        )
        .unwrap();
        PublicKeyPacket::new(version, 1_700_000_000, public).unwrap()
    }

    #[test]
    fn test_roundtrip_all_versions() {
        for version in [4u8, 5, 6] {
            let packet = test_packet(version);
            let parsed = PublicKeyPacket::from_bytes(&packet.to_bytes()).unwrap();
            assert_eq!(parsed, packet);
        }
    }

    #[test]
    fn test_fingerprint_lengths() {
        assert_eq!(test_packet(4).fingerprint().len(), 20);
        assert_eq!(test_packet(5).fingerprint().len(), 32);
        assert_eq!(test_packet(6).fingerprint().len(), 32);
    }

    #[test]
    fn test_key_id_derivation() {
        let v4 = test_packet(4);
        let fp = v4.fingerprint();
        assert_eq!(v4.key_id(), fp[12..20]);

        let v6 = test_packet(6);
        let fp = v6.fingerprint();
        assert_eq!(v6.key_id(), fp[..8]);
    }

    #[test]
    fn test_unknown_version_rejected() {
        assert!(PublicKeyPacket::from_bytes(&[3, 0, 0, 0, 0, 1]).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = test_packet(4).to_bytes();
        bytes.push(0);
        assert!(PublicKeyPacket::from_bytes(&bytes).is_err());
    }
}
