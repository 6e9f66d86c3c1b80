//! Dynamic digest construction keyed by [`HashAlgorithm`].

use crate::algorithms::HashAlgorithm;
use digest::DynDigest;

/// Returns a fresh digest context for `hash`.
pub fn new_digest(hash: HashAlgorithm) -> Box<dyn DynDigest> {
    match hash {
        HashAlgorithm::Md5 => Box::new(md5::Md5::default()),
        HashAlgorithm::Sha1 => Box::new(sha1::Sha1::default()),
        HashAlgorithm::Ripemd160 => Box::new(ripemd::Ripemd160::default()),
        HashAlgorithm::Sha256 => Box::new(sha2::Sha256::default()),
        HashAlgorithm::Sha384 => Box::new(sha2::Sha384::default()),
        HashAlgorithm::Sha512 => Box::new(sha2::Sha512::default()),
        HashAlgorithm::Sha224 => Box::new(sha2::Sha224::default()),
        HashAlgorithm::Sha3_256 => Box::new(sha3::Sha3_256::default()),
        HashAlgorithm::Sha3_512 => Box::new(sha3::Sha3_512::default()),
    }
}

/// One-shot digest of `data`.
pub fn digest(hash: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut ctx = new_digest(hash);
    ctx.update(data);
    ctx.finalize().to_vec()
}
