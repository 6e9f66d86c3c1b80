//! Known-answer tests for the primitive compositions this crate relies
//! on: RFC 3394 key wrap, HMAC, the composite KEM combiner, and the
//! digest-strength gates.

use pgp_crypto::algorithms::{HashAlgorithm, PublicKeyAlgorithm};
use pgp_crypto::config::Config;
use pgp_crypto::crypto::{
    aes_kw, generate_params, ml_kem768_x25519, sign, symmetric_key, KeyGenOptions,
};
use pgp_crypto::Error;
use rand::rngs::OsRng;
use sha3::{Digest, Sha3_256};

/// The six RFC 3394 section 4 vectors.
#[test]
fn test_aes_kw_rfc3394_vectors() {
    let cases = [
        (
            16,
            "00112233445566778899AABBCCDDEEFF",
            "1FA68B0A8112B447AEF34BD8FB5A7B829D3E862371D2CFE5",
        ),
        (
            24,
            "00112233445566778899AABBCCDDEEFF",
            "96778B25AE6CA435F92B5B97C050AED2468AB8A17AD84E5D",
        ),
        (
            32,
            "00112233445566778899AABBCCDDEEFF",
            "64E8C3F9CE0F5BA263E9777905818A2A93C8191E7D6E8AE7",
        ),
        (
            24,
            "00112233445566778899AABBCCDDEEFF0001020304050607",
            "031D33264E15D33268F24EC260743EDCE1C6C7DDEE725A936BA814915C6762D2",
        ),
        (
            32,
            "00112233445566778899AABBCCDDEEFF0001020304050607",
            "A8F9BC1612C68B3FF6E6F4FBE30E71E4769C8B80A32CB8958CD5D17D6B254DA1",
        ),
        (
            32,
            "00112233445566778899AABBCCDDEEFF000102030405060708090A0B0C0D0E0F",
            "28C9F404C4B810F4CBCCB35CFB87F8263F5786E2D80ED326CBC7F0E71A99F43BFB988B9B7A02DD21",
        ),
    ];

    for (kek_len, key_data_hex, expected_hex) in cases {
        let kek: Vec<u8> = (0..kek_len as u8).collect();
        let key_data = hex::decode(key_data_hex).unwrap();
        let wrapped = aes_kw::wrap(&kek, &key_data).unwrap();
        assert_eq!(
            hex::encode_upper(&wrapped),
            expected_hex,
            "wrap vector failed for {kek_len}-byte KEK"
        );
        assert_eq!(aes_kw::unwrap(&kek, &wrapped).unwrap(), key_data);
    }
}

#[test]
fn test_hmac_sha256_quick_brown_fox() {
    let mac = symmetric_key::hmac_sign(
        HashAlgorithm::Sha256,
        b"key",
        b"The quick brown fox jumps over the lazy dog",
    )
    .unwrap();
    assert_eq!(
        hex::encode(mac),
        "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
    );
}

/// The combiner is a one-shot SHA3-256 over a fixed concatenation; the
/// same inputs must produce the same 32 bytes, bit for bit.
#[test]
fn test_multi_key_combine_is_bit_exact() {
    let ecc_share = [0x11u8; 32];
    let ecc_ct = [0x22u8; 32];
    let ecc_pub = [0x33u8; 32];
    let mlkem_share = [0x44u8; 32];
    let mlkem_ct = vec![0x55u8; 1088];
    let mlkem_pub = vec![0x66u8; 1184];

    let kek = ml_kem768_x25519::multi_key_combine(
        PublicKeyAlgorithm::MlKem768X25519,
        &ecc_share,
        &ecc_ct,
        &ecc_pub,
        &mlkem_share,
        &mlkem_ct,
        &mlkem_pub,
    );

    let mut expected = Sha3_256::new();
    expected.update([0u8, 0, 0, 1]);
    expected.update(ecc_share);
    expected.update(ecc_ct);
    expected.update(ecc_pub);
    expected.update(&mlkem_share);
    expected.update(&mlkem_ct);
    expected.update(&mlkem_pub);
    expected.update([105u8]);
    expected.update(b"OpenPGPCompositeKDFv1");
    let expected: [u8; 32] = expected.finalize().into();

    assert_eq!(kek.as_ref(), &expected);
    // and stable across invocations
    let again = ml_kem768_x25519::multi_key_combine(
        PublicKeyAlgorithm::MlKem768X25519,
        &ecc_share,
        &ecc_ct,
        &ecc_pub,
        &mlkem_share,
        &mlkem_ct,
        &mlkem_pub,
    );
    assert_eq!(kek.as_ref(), again.as_ref());
}

#[test]
fn test_hash_strength_gates() {
    let config = Config::default();

    let (public, secret) = generate_params(
        &mut OsRng,
        &config,
        PublicKeyAlgorithm::Ed25519,
        &KeyGenOptions::default(),
    )
    .unwrap();
    let digest = [0u8; 20];
    assert!(matches!(
        sign(&config, HashAlgorithm::Sha1, &public, &secret, &digest),
        Err(Error::HashTooWeak)
    ));

    let (public, secret) = generate_params(
        &mut OsRng,
        &config,
        PublicKeyAlgorithm::MlDsa65Ed25519,
        &KeyGenOptions::default(),
    )
    .unwrap();
    let digest = [0u8; 28];
    assert!(matches!(
        sign(&config, HashAlgorithm::Sha224, &public, &secret, &digest),
        Err(Error::HashTooWeak)
    ));
}
