//! Secret-Key packet (tag 5/7), versions 4, 5, and 6.
//!
//! Secret material is protected with a passphrase-derived key: either the
//! legacy CFB mode with a trailing SHA-1 hash, or AEAD with an
//! HKDF-separated key whose associated data binds the public parameters.
//! Keys whose protection fields cannot be parsed keep their raw material
//! and stay usable for public-key operations.

use crate::algorithms::{AeadAlgorithm, EccCurve, PublicKeyAlgorithm, SymmetricKeyAlgorithm, Tag};
use crate::config::Config;
use crate::crypto::{
    aead, checksum, parse_secret_params, sym, validate_params, KeyGenOptions, PlainSecretParams,
};
use crate::error::{Error, Result};
use crate::mpi::Reader;
use crate::packet::public_key::PublicKeyPacket;
use crate::s2k::S2k;
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

/// S2K usage octet: secret material is unencrypted.
pub const S2K_USAGE_PLAINTEXT: u8 = 0;
/// S2K usage octet: AEAD protection.
pub const S2K_USAGE_AEAD: u8 = 253;
/// S2K usage octet: CFB with SHA-1 integrity.
pub const S2K_USAGE_CFB_SHA1: u8 = 254;
/// S2K usage octet: CFB with 2-byte checksum (read-only legacy).
pub const S2K_USAGE_MALLEABLE_CFB: u8 = 255;

/// A Secret-Key or Secret-Subkey packet.
#[derive(Debug, Clone)]
pub struct SecretKeyPacket {
    /// Packet tag (SecretKey or SecretSubkey); feeds the AEAD associated
    /// data.
    pub tag: Tag,
    /// Embedded public-key prefix.
    pub public_key: PublicKeyPacket,
    /// S2K usage octet.
    pub s2k_usage: u8,
    /// Protection cipher, when encrypted.
    pub symmetric: Option<SymmetricKeyAlgorithm>,
    /// AEAD mode, when usage is 253.
    pub aead: Option<AeadAlgorithm>,
    /// S2K specifier, when encrypted.
    pub s2k: Option<S2k>,
    /// CFB IV or AEAD nonce.
    pub iv: Vec<u8>,
    /// Encrypted secret material (empty while decrypted).
    pub key_material: Vec<u8>,
    /// Decrypted secret parameters; `None` exactly when encrypted.
    pub secret_params: Option<PlainSecretParams>,
    /// Pre-RFC AEAD layout: empty associated data, no HKDF step.
    pub is_legacy_aead: bool,
    /// Integrity was confirmed by an AEAD tag bound to the public key;
    /// `validate()` has nothing left to prove.
    pub used_modern_aead: bool,
    /// Raw secret section kept verbatim when its fields cannot be parsed.
    pub unparseable_key_material: Option<Vec<u8>>,
}

impl SecretKeyPacket {
    /// Generates a fresh, unprotected secret key.
    pub fn generate<R: CryptoRng + RngCore>(
        rng: &mut R,
        config: &Config,
        tag: Tag,
        version: u8,
        created: u32,
        algo: PublicKeyAlgorithm,
        options: &KeyGenOptions,
    ) -> Result<Self> {
        if version == 6 {
            if algo == PublicKeyAlgorithm::EddsaLegacy {
                return Err(Error::unsupported("v6 keys cannot use legacy EdDSA"));
            }
            if algo == PublicKeyAlgorithm::Ecdh
                && options.curve == Some(EccCurve::Curve25519Legacy)
            {
                return Err(Error::unsupported("v6 keys cannot use legacy Curve25519"));
            }
        }
        if version < 6 && algo == PublicKeyAlgorithm::MlDsa65Ed25519 {
            return Err(Error::unsupported(
                "composite ML-DSA keys require v6 packets",
            ));
        }
        let (public, secret) = crate::crypto::generate_params(rng, config, algo, options)?;
        Ok(Self {
            tag,
            public_key: PublicKeyPacket::new(version, created, public)?,
            s2k_usage: S2K_USAGE_PLAINTEXT,
            symmetric: None,
            aead: None,
            s2k: None,
            iv: Vec::new(),
            key_material: Vec::new(),
            secret_params: Some(secret),
            is_legacy_aead: false,
            used_modern_aead: false,
            unparseable_key_material: None,
        })
    }

    /// True when the secret material is present only in encrypted form.
    pub fn is_encrypted(&self) -> bool {
        self.secret_params.is_none() && !self.is_dummy()
    }

    /// True for GNU-dummy keys without secret material.
    pub fn is_dummy(&self) -> bool {
        matches!(self.s2k, Some(ref s2k) if s2k.is_dummy())
    }

    /// Parses a packet body.
    pub fn from_bytes(tag: Tag, config: &Config, data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let public_key = PublicKeyPacket::parse(&mut reader)?;
        let secret_section = reader.rest();
        let version = public_key.version;

        match parse_secret_fields(version, config, secret_section) {
            Ok(fields) => {
                let mut packet = Self {
                    tag,
                    public_key,
                    s2k_usage: fields.s2k_usage,
                    symmetric: fields.symmetric,
                    aead: fields.aead,
                    s2k: fields.s2k,
                    iv: fields.iv,
                    key_material: fields.key_material,
                    secret_params: None,
                    is_legacy_aead: fields.is_legacy_aead,
                    used_modern_aead: false,
                    unparseable_key_material: None,
                };
                if packet.s2k_usage == S2K_USAGE_PLAINTEXT {
                    let material = std::mem::take(&mut packet.key_material);
                    packet.read_cleartext(&material)?;
                }
                Ok(packet)
            }
            Err(err) => {
                let s2k_usage = *secret_section.first().ok_or(Error::KeyMaterial)?;
                if s2k_usage == S2K_USAGE_PLAINTEXT {
                    return Err(err);
                }
                // Encrypted material behind an unknown S2K or cipher: keep
                // the bytes so the key still serves public operations and
                // re-serializes unchanged.
                warn!(
                    version,
                    s2k_usage, "keeping unparseable secret-key material"
                );
                Ok(Self {
                    tag,
                    public_key,
                    s2k_usage,
                    symmetric: None,
                    aead: None,
                    s2k: None,
                    iv: Vec::new(),
                    key_material: Vec::new(),
                    secret_params: None,
                    is_legacy_aead: false,
                    used_modern_aead: false,
                    unparseable_key_material: Some(secret_section.to_vec()),
                })
            }
        }
    }

    /// Serializes the packet body.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.public_key.to_bytes();
        if let Some(raw) = &self.unparseable_key_material {
            out.extend_from_slice(raw);
            return Ok(out);
        }
        let version = self.public_key.version;
        out.push(self.s2k_usage);

        let mut optional = Vec::new();
        if self.s2k_usage != S2K_USAGE_PLAINTEXT {
            match self.s2k_usage {
                S2K_USAGE_AEAD | S2K_USAGE_CFB_SHA1 | S2K_USAGE_MALLEABLE_CFB => {
                    let symmetric = self
                        .symmetric
                        .ok_or_else(|| Error::malformed("missing protection cipher"))?;
                    optional.push(symmetric.to_byte());
                    if self.s2k_usage == S2K_USAGE_AEAD {
                        let aead = self
                            .aead
                            .ok_or_else(|| Error::malformed("missing AEAD mode"))?;
                        optional.push(aead.to_byte());
                    }
                    let s2k = self
                        .s2k
                        .as_ref()
                        .ok_or_else(|| Error::malformed("missing S2K specifier"))?;
                    if version == 6 {
                        optional.push(s2k.serialized_len() as u8);
                    }
                    s2k.write(&mut optional);
                }
                // Legacy mode: the usage octet itself is the cipher code
                // and the material follows the IV directly.
                _ => {}
            }
        }

        match version {
            5 => {
                // v5 counts the protection fields, excluding the IV.
                out.push(optional.len() as u8);
                out.extend_from_slice(&optional);
                out.extend_from_slice(&self.iv);
            }
            6 if self.s2k_usage != S2K_USAGE_PLAINTEXT => {
                // v6 counts everything up to and including the IV.
                out.push((optional.len() + self.iv.len()) as u8);
                out.extend_from_slice(&optional);
                out.extend_from_slice(&self.iv);
            }
            _ => {
                out.extend_from_slice(&optional);
                out.extend_from_slice(&self.iv);
            }
        }

        let material = match (&self.secret_params, self.is_dummy()) {
            (_, true) => Vec::new(),
            (Some(params), _) => {
                let mut cleartext = params.to_vec();
                if version < 6 {
                    let sum = checksum::calculate_simple(&cleartext);
                    cleartext.extend_from_slice(&sum);
                }
                cleartext
            }
            (None, _) => self.key_material.clone(),
        };
        if version == 5 {
            out.extend_from_slice(&(material.len() as u32).to_be_bytes());
        }
        out.extend_from_slice(&material);
        Ok(out)
    }

    fn read_cleartext(&mut self, material: &[u8]) -> Result<()> {
        let version = self.public_key.version;
        let body = if version < 6 {
            if material.len() < 2 {
                return Err(Error::KeyMaterial);
            }
            let (body, sum) = material.split_at(material.len() - 2);
            if checksum::calculate_simple(body) != [sum[0], sum[1]] {
                return Err(Error::KeyMaterial);
            }
            body
        } else {
            material
        };
        let mut reader = Reader::new(body);
        let params =
            parse_secret_params(&self.public_key.params, &mut reader).map_err(|_| Error::KeyMaterial)?;
        if reader.rest().iter().any(|&b| b != 0) {
            return Err(Error::KeyMaterial);
        }
        self.secret_params = Some(params);
        Ok(())
    }

    /// AEAD associated data for modern protection: the framed tag byte and
    /// the serialized public prefix.
    fn aead_associated_data(&self) -> Vec<u8> {
        let mut aad = vec![self.tag.ctb()];
        aad.extend_from_slice(&self.public_key.to_bytes());
        aad
    }

    /// Derives the protection key from a passphrase.
    ///
    /// Modern AEAD (v4/v6, non-legacy) separates the S2K output through
    /// HKDF-SHA256 with the packet tag, key version, cipher, and mode in
    /// the info string; every other path uses the S2K output directly.
    fn produce_encryption_key(&self, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let version = self.public_key.version;
        let s2k = self
            .s2k
            .as_ref()
            .ok_or_else(|| Error::malformed("missing S2K specifier"))?;
        let symmetric = self
            .symmetric
            .ok_or_else(|| Error::malformed("missing protection cipher"))?;

        if matches!(s2k, S2k::Argon2 { .. }) && self.s2k_usage != S2K_USAGE_AEAD {
            return Err(Error::unsupported("Argon2 requires AEAD protection"));
        }
        if matches!(s2k, S2k::Simple { .. }) && version == 6 {
            return Err(Error::unsupported("simple S2K is not allowed on v6 keys"));
        }

        let derived = s2k.produce_key(passphrase, symmetric.key_size())?;
        let use_hkdf =
            self.s2k_usage == S2K_USAGE_AEAD && version != 5 && !self.is_legacy_aead;
        if !use_hkdf {
            return Ok(derived);
        }

        let aead_mode = self
            .aead
            .ok_or_else(|| Error::malformed("missing AEAD mode"))?;
        let info = [
            self.tag.ctb(),
            version,
            symmetric.to_byte(),
            aead_mode.to_byte(),
        ];
        let hk = Hkdf::<Sha256>::new(None, &derived);
        let mut key = Zeroizing::new(vec![0u8; symmetric.key_size()]);
        hk.expand(&info, &mut key)
            .map_err(|e| Error::crypto(format!("HKDF expand failed: {e}")))?;
        Ok(key)
    }

    /// Protects the secret parameters with a passphrase.
    ///
    /// Chooses AEAD (usage 253, HKDF-separated key, Argon2 S2K) when
    /// `config.aead_protect` is set, CFB with a SHA-1 hash (usage 254)
    /// otherwise. The plaintext parameters are zeroized afterwards.
    pub fn encrypt<R: CryptoRng + RngCore>(
        &mut self,
        rng: &mut R,
        config: &Config,
        passphrase: &[u8],
    ) -> Result<()> {
        if self.is_dummy() {
            return Ok(());
        }
        let params = self
            .secret_params
            .as_ref()
            .ok_or_else(|| Error::malformed("key is already encrypted"))?;
        if passphrase.is_empty() {
            return Err(Error::malformed("empty passphrase"));
        }
        let version = self.public_key.version;
        let cleartext = Zeroizing::new(params.to_vec());
        let symmetric = SymmetricKeyAlgorithm::Aes256;
        self.symmetric = Some(symmetric);

        if config.aead_protect {
            let aead_mode = config.preferred_aead_algorithm;
            self.s2k_usage = S2K_USAGE_AEAD;
            self.aead = Some(aead_mode);
            self.is_legacy_aead = version == 5;
            self.s2k = Some(S2k::new_argon2(rng, config.s2k_argon2_params));

            let iv_len = if self.is_legacy_aead {
                symmetric.block_size()
            } else {
                aead_mode.iv_length()
            };
            let mut iv = vec![0u8; iv_len];
            rng.fill_bytes(&mut iv);
            self.iv = iv;

            let key = self.produce_encryption_key(passphrase)?;
            let aad = if self.is_legacy_aead {
                Vec::new()
            } else {
                self.aead_associated_data()
            };
            self.key_material = aead::encrypt(
                symmetric,
                aead_mode,
                &key,
                &self.iv[..aead_mode.iv_length().min(self.iv.len())],
                &aad,
                &cleartext,
            )?;
            self.used_modern_aead = !self.is_legacy_aead;
        } else {
            self.s2k_usage = S2K_USAGE_CFB_SHA1;
            self.aead = None;
            self.s2k = Some(S2k::new_iterated(
                rng,
                crate::algorithms::HashAlgorithm::Sha256,
                config.s2k_iteration_count_byte,
            ));
            let mut iv = vec![0u8; symmetric.block_size()];
            rng.fill_bytes(&mut iv);
            self.iv = iv.clone();

            let key = self.produce_encryption_key(passphrase)?;
            let mut buf = cleartext.to_vec();
            buf.extend_from_slice(&checksum::calculate_sha1(&cleartext));
            sym::encrypt(symmetric, &key, &iv, &mut buf)?;
            self.key_material = buf;
            self.used_modern_aead = false;
        }

        self.clear_private_params();
        Ok(())
    }

    /// Recovers the secret parameters with a passphrase.
    pub fn decrypt(&mut self, passphrase: &[u8]) -> Result<()> {
        if self.is_dummy() {
            return Err(Error::unsupported("dummy key has no secret material"));
        }
        if self.unparseable_key_material.is_some() {
            return Err(Error::unsupported("secret key material is unparseable"));
        }
        if !self.is_encrypted() {
            return Err(Error::malformed("key is not encrypted"));
        }

        let cleartext = match self.s2k_usage {
            S2K_USAGE_AEAD => {
                let symmetric = self
                    .symmetric
                    .ok_or_else(|| Error::malformed("missing protection cipher"))?;
                let aead_mode = self
                    .aead
                    .ok_or_else(|| Error::malformed("missing AEAD mode"))?;
                let key = self.produce_encryption_key(passphrase)?;
                let aad = if self.is_legacy_aead {
                    Vec::new()
                } else {
                    self.aead_associated_data()
                };
                let iv_len = aead_mode.iv_length().min(self.iv.len());
                let cleartext = aead::decrypt(
                    symmetric,
                    aead_mode,
                    &key,
                    &self.iv[..iv_len],
                    &aad,
                    &self.key_material,
                )?;
                self.used_modern_aead = !self.is_legacy_aead;
                Zeroizing::new(cleartext)
            }
            S2K_USAGE_CFB_SHA1 => {
                let symmetric = self
                    .symmetric
                    .ok_or_else(|| Error::malformed("missing protection cipher"))?;
                let key = self.produce_encryption_key(passphrase)?;
                let mut buf = self.key_material.clone();
                sym::decrypt(symmetric, &key, &self.iv, &mut buf)?;
                let buf = Zeroizing::new(buf);
                if buf.len() < 20 {
                    return Err(Error::IncorrectPassphrase);
                }
                let (body, hash) = buf.split_at(buf.len() - 20);
                checksum::verify_sha1(body, hash)?;
                Zeroizing::new(body.to_vec())
            }
            // 255 and bare cipher codes authenticate nothing and are
            // trivially malleable.
            _ => {
                return Err(Error::unsupported(
                    "malleable CFB secret keys are refused",
                ))
            }
        };

        let mut reader = Reader::new(&cleartext);
        let params = parse_secret_params(&self.public_key.params, &mut reader)
            .map_err(|_| Error::KeyMaterial)?;
        if reader.rest().iter().any(|&b| b != 0) {
            return Err(Error::KeyMaterial);
        }
        self.secret_params = Some(params);
        // Back to the unprotected state; re-encrypting draws fresh salts
        // and IVs.
        self.s2k_usage = S2K_USAGE_PLAINTEXT;
        self.symmetric = None;
        self.aead = None;
        self.s2k = None;
        self.iv.clear();
        self.key_material.clear();
        self.is_legacy_aead = false;
        Ok(())
    }

    /// Confirms that the secret parameters belong to the public ones.
    ///
    /// Dummy keys have nothing to check; modern-AEAD keys were already
    /// bound to their public parameters by the authentication tag.
    pub fn validate(&self) -> Result<()> {
        if self.is_dummy() || self.used_modern_aead {
            return Ok(());
        }
        let params = self
            .secret_params
            .as_ref()
            .ok_or_else(|| Error::malformed("key must be decrypted before validation"))?;
        validate_params(&self.public_key.params, params).map_err(|_| Error::KeyInvalid)
    }

    /// Replaces the secret material with a GNU-dummy marker. The packet
    /// stays serializable and the public half stays usable.
    pub fn make_dummy(&mut self) {
        self.clear_private_params();
        self.s2k_usage = S2K_USAGE_CFB_SHA1;
        self.symmetric = Some(SymmetricKeyAlgorithm::Aes256);
        self.aead = None;
        self.s2k = Some(S2k::GnuDummy { mode: 1 });
        self.iv.clear();
        self.key_material.clear();
        self.unparseable_key_material = None;
        self.is_legacy_aead = false;
        self.used_modern_aead = false;
    }

    /// Zeroizes and drops the decrypted secret parameters.
    pub fn clear_private_params(&mut self) {
        if let Some(mut params) = self.secret_params.take() {
            params.zeroize();
        }
    }
}

struct SecretFields {
    s2k_usage: u8,
    symmetric: Option<SymmetricKeyAlgorithm>,
    aead: Option<AeadAlgorithm>,
    s2k: Option<S2k>,
    iv: Vec<u8>,
    key_material: Vec<u8>,
    is_legacy_aead: bool,
}

fn parse_secret_fields(version: u8, config: &Config, data: &[u8]) -> Result<SecretFields> {
    let mut reader = Reader::new(data);
    let s2k_usage = reader.read_u8()?;

    let optional_len = if version == 5 || (version == 6 && s2k_usage != S2K_USAGE_PLAINTEXT) {
        Some(reader.read_u8()? as usize)
    } else {
        None
    };
    let optional_start = reader.position();

    let mut symmetric = None;
    let mut aead = None;
    let mut s2k = None;
    match s2k_usage {
        S2K_USAGE_PLAINTEXT => {}
        S2K_USAGE_AEAD | S2K_USAGE_CFB_SHA1 | S2K_USAGE_MALLEABLE_CFB => {
            symmetric = Some(SymmetricKeyAlgorithm::from_byte(reader.read_u8()?)?);
            if s2k_usage == S2K_USAGE_AEAD {
                aead = Some(AeadAlgorithm::from_byte(reader.read_u8()?)?);
            }
            let spec = if version == 6 {
                let s2k_len = reader.read_u8()? as usize;
                let bytes = reader.read_exact(s2k_len)?;
                let mut s2k_reader = Reader::new(bytes);
                let spec = S2k::parse(&mut s2k_reader)?;
                if s2k_reader.remaining() != 0 {
                    return Err(Error::malformed("trailing bytes in S2K specifier"));
                }
                spec
            } else {
                S2k::parse(&mut reader)?
            };
            s2k = Some(spec);
        }
        // A bare cipher code: ancient keys derive the key from the
        // passphrase with MD5 and no salt; kept parseable, refused on
        // decrypt.
        code => {
            symmetric = Some(SymmetricKeyAlgorithm::from_byte(code)?);
        }
    }

    // v5 counts the fields before the IV.
    if version == 5 {
        if let Some(expected) = optional_len {
            if reader.position() - optional_start != expected {
                return Err(Error::malformed("inconsistent protection-field count"));
            }
        }
    }

    let is_legacy_aead = s2k_usage == S2K_USAGE_AEAD
        && (version == 5 || (version == 4 && config.parse_aead_encrypted_v4_keys_as_legacy));

    let is_dummy = matches!(s2k, Some(ref spec) if spec.is_dummy());
    let iv = if s2k_usage != S2K_USAGE_PLAINTEXT && !is_dummy {
        let symmetric = symmetric.ok_or(Error::KeyMaterial)?;
        let iv_len = match (s2k_usage, aead) {
            (S2K_USAGE_AEAD, Some(mode)) if !is_legacy_aead => mode.iv_length(),
            (S2K_USAGE_AEAD, _) if is_legacy_aead => symmetric.block_size(),
            _ => symmetric.block_size(),
        };
        reader.read_exact(iv_len)?.to_vec()
    } else {
        Vec::new()
    };

    // v6 counts everything up to and including the IV.
    if version == 6 {
        if let Some(expected) = optional_len {
            if reader.position() - optional_start != expected {
                return Err(Error::malformed("inconsistent protection-field count"));
            }
        }
    }

    let key_material = if version == 5 {
        let len = reader.read_u32()? as usize;
        reader.read_exact(len)?.to_vec()
    } else {
        reader.rest().to_vec()
    };

    Ok(SecretFields {
        s2k_usage,
        symmetric,
        aead,
        s2k,
        iv,
        key_material,
        is_legacy_aead,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn generate(version: u8, algo: PublicKeyAlgorithm) -> SecretKeyPacket {
        SecretKeyPacket::generate(
            &mut OsRng,
            &Config::default(),
            Tag::SecretKey,
            version,
            1_700_000_000,
            algo,
            &KeyGenOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_plaintext_roundtrip() {
        for version in [4u8, 5, 6] {
            let packet = generate(version, PublicKeyAlgorithm::Ed25519);
            let bytes = packet.to_bytes().unwrap();
            let parsed =
                SecretKeyPacket::from_bytes(Tag::SecretKey, &Config::default(), &bytes).unwrap();
            assert!(!parsed.is_encrypted());
            assert_eq!(parsed.secret_params, packet.secret_params);
            assert_eq!(parsed.public_key, packet.public_key);
        }
    }

    #[test]
    fn test_cfb_passphrase_roundtrip() {
        let mut packet = generate(4, PublicKeyAlgorithm::Ed25519);
        let original = packet.secret_params.clone().unwrap();
        packet
            .encrypt(&mut OsRng, &Config::default(), b"correct horse")
            .unwrap();
        assert!(packet.is_encrypted());
        assert_eq!(packet.s2k_usage, S2K_USAGE_CFB_SHA1);

        let bytes = packet.to_bytes().unwrap();
        let mut parsed =
            SecretKeyPacket::from_bytes(Tag::SecretKey, &Config::default(), &bytes).unwrap();
        assert!(parsed.is_encrypted());

        assert!(matches!(
            parsed.clone().decrypt(b"battery staple"),
            Err(Error::IncorrectPassphrase)
        ));
        parsed.decrypt(b"correct horse").unwrap();
        assert_eq!(parsed.secret_params.unwrap(), original);
    }

    #[test]
    fn test_aead_v6_argon2_roundtrip() {
        let mut config = Config::default();
        config.aead_protect = true;
        config.preferred_aead_algorithm = AeadAlgorithm::Ocb;
        // keep the unit test fast
        config.s2k_argon2_params.mem_exponent = 12;

        let mut packet = generate(6, PublicKeyAlgorithm::Ed25519);
        let original = packet.secret_params.clone().unwrap();
        packet.encrypt(&mut OsRng, &config, b"pw").unwrap();
        assert_eq!(packet.s2k_usage, S2K_USAGE_AEAD);
        assert!(matches!(packet.s2k, Some(S2k::Argon2 { .. })));

        let bytes = packet.to_bytes().unwrap();
        let mut parsed = SecretKeyPacket::from_bytes(Tag::SecretKey, &config, &bytes).unwrap();
        assert!(matches!(
            parsed.clone().decrypt(b"wrong"),
            Err(Error::IncorrectPassphrase)
        ));
        parsed.decrypt(b"pw").unwrap();
        assert_eq!(parsed.secret_params.unwrap(), original);
        assert!(parsed.used_modern_aead);
    }

    #[test]
    fn test_modern_aead_skips_validate() {
        let mut config = Config::default();
        config.aead_protect = true;
        config.s2k_argon2_params.mem_exponent = 12;

        let mut packet = generate(4, PublicKeyAlgorithm::Ed25519);
        packet.encrypt(&mut OsRng, &config, b"pw").unwrap();
        let bytes = packet.to_bytes().unwrap();
        let mut parsed = SecretKeyPacket::from_bytes(Tag::SecretKey, &config, &bytes).unwrap();
        parsed.decrypt(b"pw").unwrap();
        assert!(parsed.used_modern_aead);
        parsed.validate().unwrap();
    }

    #[test]
    fn test_validate_detects_mismatch() {
        let mut packet = generate(4, PublicKeyAlgorithm::Ed25519);
        let other = generate(4, PublicKeyAlgorithm::Ed25519);
        packet.secret_params = other.secret_params.clone();
        assert!(matches!(packet.validate(), Err(Error::KeyInvalid)));
    }

    #[test]
    fn test_dummy_key() {
        let mut packet = generate(4, PublicKeyAlgorithm::Ed25519);
        packet.make_dummy();
        assert!(packet.is_dummy());
        assert!(!packet.is_encrypted());
        packet.validate().unwrap();
        assert!(packet.decrypt(b"pw").is_err());

        let bytes = packet.to_bytes().unwrap();
        let parsed =
            SecretKeyPacket::from_bytes(Tag::SecretKey, &Config::default(), &bytes).unwrap();
        assert!(parsed.is_dummy());
    }

    #[test]
    fn test_unparseable_material_preserved() {
        let packet = generate(4, PublicKeyAlgorithm::Ed25519);
        let mut bytes = packet.public_key.to_bytes();
        // usage 254 followed by an unknown cipher code
        bytes.push(S2K_USAGE_CFB_SHA1);
        bytes.push(0xEE);
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let parsed =
            SecretKeyPacket::from_bytes(Tag::SecretKey, &Config::default(), &bytes).unwrap();
        assert!(parsed.is_encrypted());
        assert!(parsed.unparseable_key_material.is_some());
        assert_eq!(parsed.to_bytes().unwrap(), bytes);

        let mut clone = parsed.clone();
        assert!(clone.decrypt(b"pw").is_err());
    }

    #[test]
    fn test_malleable_cfb_refused_on_decrypt() {
        let mut packet = generate(4, PublicKeyAlgorithm::Ed25519);
        packet
            .encrypt(&mut OsRng, &Config::default(), b"pw")
            .unwrap();
        packet.s2k_usage = S2K_USAGE_MALLEABLE_CFB;
        let bytes = packet.to_bytes().unwrap();
        let mut parsed =
            SecretKeyPacket::from_bytes(Tag::SecretKey, &Config::default(), &bytes).unwrap();
        assert!(matches!(parsed.decrypt(b"pw"), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_v6_field_count_is_validated() {
        let mut packet = generate(6, PublicKeyAlgorithm::Ed25519);
        packet
            .encrypt(&mut OsRng, &Config::default(), b"pw")
            .unwrap();
        let bytes = packet.to_bytes().unwrap();
        // find the count byte right after the public prefix + usage octet
        let prefix_len = packet.public_key.to_bytes().len();
        let mut corrupted = bytes.clone();
        corrupted[prefix_len + 1] ^= 0x01;
        // a wrong count must not parse into a usable encrypted key
        let parsed =
            SecretKeyPacket::from_bytes(Tag::SecretKey, &Config::default(), &corrupted).unwrap();
        assert!(parsed.unparseable_key_material.is_some());
    }

    #[test]
    fn test_clear_private_params_zeroizes() {
        let mut packet = generate(4, PublicKeyAlgorithm::Ed25519);
        packet.clear_private_params();
        assert!(packet.secret_params.is_none());
    }

    #[test]
    fn test_version_policy_on_generate() {
        assert!(SecretKeyPacket::generate(
            &mut OsRng,
            &Config::default(),
            Tag::SecretKey,
            6,
            0,
            PublicKeyAlgorithm::EddsaLegacy,
            &KeyGenOptions::default(),
        )
        .is_err());
        assert!(SecretKeyPacket::generate(
            &mut OsRng,
            &Config::default(),
            Tag::SecretKey,
            4,
            0,
            PublicKeyAlgorithm::MlDsa65Ed25519,
            &KeyGenOptions::default(),
        )
        .is_err());
        assert!(SecretKeyPacket::generate(
            &mut OsRng,
            &Config::default(),
            Tag::SecretKey,
            6,
            0,
            PublicKeyAlgorithm::Ecdh,
            &KeyGenOptions {
                curve: Some(EccCurve::Curve25519Legacy),
                ..Default::default()
            },
        )
        .is_err());
    }
}
