//! Property-style round-trip coverage across the supported algorithm
//! matrix: parameter serialization, sign/verify, and encrypt/decrypt.

use pgp_crypto::algorithms::{EccCurve, HashAlgorithm, PublicKeyAlgorithm};
use pgp_crypto::config::Config;
use pgp_crypto::crypto::{
    generate_params, parse_public_params, parse_secret_params, public_key_decrypt,
    public_key_encrypt, sign, verify, verify_hmac, KeyGenOptions, PlainSecretParams, PublicParams,
};
use pgp_crypto::mpi::Reader;
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};

fn options_for(algo: PublicKeyAlgorithm) -> KeyGenOptions {
    match algo {
        PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::Dsa => KeyGenOptions {
            bits: Some(2048),
            ..Default::default()
        },
        PublicKeyAlgorithm::Ecdsa | PublicKeyAlgorithm::Ecdh => KeyGenOptions {
            curve: Some(EccCurve::P256),
            ..Default::default()
        },
        _ => KeyGenOptions::default(),
    }
}

fn generate(algo: PublicKeyAlgorithm) -> (PublicParams, PlainSecretParams) {
    generate_params(&mut OsRng, &Config::default(), algo, &options_for(algo)).unwrap()
}

/// Every generated parameter record survives serialize → parse, public
/// and secret alike (secrets modulo the excluded expanded material, which
/// is never part of the record).
#[test]
fn test_parameter_serialization_roundtrip() {
    let algos = [
        PublicKeyAlgorithm::Rsa,
        PublicKeyAlgorithm::Dsa,
        PublicKeyAlgorithm::Ecdsa,
        PublicKeyAlgorithm::Ecdh,
        PublicKeyAlgorithm::EddsaLegacy,
        PublicKeyAlgorithm::Ed25519,
        PublicKeyAlgorithm::Ed448,
        PublicKeyAlgorithm::X25519,
        PublicKeyAlgorithm::X448,
        PublicKeyAlgorithm::Hmac,
        PublicKeyAlgorithm::Aead,
        PublicKeyAlgorithm::MlKem768X25519,
        PublicKeyAlgorithm::MlDsa65Ed25519,
        PublicKeyAlgorithm::SlhDsaShake128s,
    ];
    for algo in algos {
        let (public, secret) = generate(algo);

        let wire = public.to_vec();
        let mut reader = Reader::new(&wire);
        let parsed = parse_public_params(algo, &mut reader).unwrap();
        assert_eq!(parsed, public, "public roundtrip failed for {algo}");
        assert_eq!(reader.remaining(), 0, "public trailing bytes for {algo}");

        let wire = secret.to_vec();
        let mut reader = Reader::new(&wire);
        let parsed = parse_secret_params(&public, &mut reader).unwrap();
        assert_eq!(parsed, secret, "secret roundtrip failed for {algo}");
        assert_eq!(reader.remaining(), 0, "secret trailing bytes for {algo}");
    }
}

/// sign ∘ verify is the identity on valid inputs, and a flipped digest
/// fails, for every signing algorithm.
#[test]
fn test_sign_verify_all_algorithms() {
    let config = Config::default();
    let cases = [
        (PublicKeyAlgorithm::Rsa, HashAlgorithm::Sha256),
        (PublicKeyAlgorithm::Dsa, HashAlgorithm::Sha256),
        (PublicKeyAlgorithm::Ecdsa, HashAlgorithm::Sha256),
        (PublicKeyAlgorithm::EddsaLegacy, HashAlgorithm::Sha256),
        (PublicKeyAlgorithm::Ed25519, HashAlgorithm::Sha256),
        (PublicKeyAlgorithm::Ed448, HashAlgorithm::Sha512),
        (PublicKeyAlgorithm::MlDsa65Ed25519, HashAlgorithm::Sha256),
        (PublicKeyAlgorithm::SlhDsaShake128s, HashAlgorithm::Sha3_256),
    ];
    for (algo, hash) in cases {
        let (public, secret) = generate(algo);
        let digest = pgp_crypto::crypto::hash::digest(hash, b"signed message");
        let sig = sign(&config, hash, &public, &secret, &digest).unwrap();
        assert!(
            verify(hash, &public, &sig, &digest).unwrap(),
            "verification failed for {algo}"
        );

        let wrong = pgp_crypto::crypto::hash::digest(hash, b"another message");
        assert!(
            !verify(hash, &public, &sig, &wrong).unwrap(),
            "forged digest accepted for {algo}"
        );
    }
}

/// HMAC keys verify through the symmetric path.
#[test]
fn test_hmac_sign_verify() {
    let config = Config::default();
    let (public, secret) = generate(PublicKeyAlgorithm::Hmac);
    let digest = Sha512::digest(b"mac input");
    let sig = sign(&config, HashAlgorithm::Sha256, &public, &secret, &digest).unwrap();
    assert!(verify_hmac(&public, &secret, &sig, &digest).unwrap());
    assert!(!verify_hmac(&public, &secret, &sig, &Sha512::digest(b"other")).unwrap());
}

/// publicKeyDecrypt ∘ publicKeyEncrypt is the identity on session keys
/// for every encryption-capable algorithm.
#[test]
fn test_encrypt_decrypt_all_algorithms() {
    let config = Config::default();
    let algos = [
        PublicKeyAlgorithm::Rsa,
        PublicKeyAlgorithm::Ecdh,
        PublicKeyAlgorithm::X25519,
        PublicKeyAlgorithm::X448,
        PublicKeyAlgorithm::MlKem768X25519,
    ];
    let fingerprint = [0x0Fu8; 20];
    for algo in algos {
        let (public, secret) = generate(algo);
        let session_key = vec![0x5Au8; 32];
        let encrypted =
            public_key_encrypt(&mut OsRng, &config, &public, &fingerprint, &session_key).unwrap();
        let decrypted =
            public_key_decrypt(&public, &secret, &encrypted, &fingerprint, None).unwrap();
        assert_eq!(decrypted, session_key, "roundtrip failed for {algo}");
    }
}

/// ElGamal keys cannot be generated any more, but existing parameters
/// still encrypt and decrypt.
#[test]
fn test_elgamal_parse_and_roundtrip() {
    use num_bigint_dig::BigUint;
    use pgp_crypto::mpi::Mpi;
    // RFC 3526 group 5, generator 2
    let p_hex = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
                 020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
                 4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
                 EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
                 98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
                 9ED529077096966D670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF";
    let p = hex::decode(p_hex).unwrap();
    let x = b"\x1B\x2C\x3D\x4E\x5F\x60\x71\x82\x93\xA4\xB5\xC6\xD7\xE8\xF9\x0A";
    let y = BigUint::from(2u8)
        .modpow(
            &BigUint::from_bytes_be(x),
            &BigUint::from_bytes_be(&p),
        )
        .to_bytes_be();

    let mut wire = Vec::new();
    Mpi::from_slice(&p).write(&mut wire);
    Mpi::from_slice(&[2]).write(&mut wire);
    Mpi::from_slice(&y).write(&mut wire);
    let public = parse_public_params(PublicKeyAlgorithm::Elgamal, &mut Reader::new(&wire)).unwrap();
    let secret_wire = Mpi::from_slice(x).to_vec();
    let secret = parse_secret_params(&public, &mut Reader::new(&secret_wire)).unwrap();

    let session_key = vec![0x77u8; 16];
    let encrypted = public_key_encrypt(
        &mut OsRng,
        &Config::default(),
        &public,
        &[],
        &session_key,
    )
    .unwrap();
    let decrypted = public_key_decrypt(&public, &secret, &encrypted, &[], None).unwrap();
    assert_eq!(decrypted, session_key);
}

/// validate_params accepts matching pairs and rejects mixed ones.
#[test]
fn test_validate_params_matrix() {
    use pgp_crypto::crypto::validate_params;
    let algos = [
        PublicKeyAlgorithm::Ecdsa,
        PublicKeyAlgorithm::Ed25519,
        PublicKeyAlgorithm::X448,
        PublicKeyAlgorithm::Hmac,
        PublicKeyAlgorithm::MlKem768X25519,
        PublicKeyAlgorithm::MlDsa65Ed25519,
        PublicKeyAlgorithm::SlhDsaShake128s,
    ];
    for algo in algos {
        let (public, secret) = generate(algo);
        validate_params(&public, &secret).unwrap();

        let (_, other_secret) = generate(algo);
        assert!(
            validate_params(&public, &other_secret).is_err(),
            "foreign secret accepted for {algo}"
        );
    }
}
