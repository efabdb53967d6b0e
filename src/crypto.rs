use {
    hmac::{Hmac, Mac},
    sha2::{Digest, Sha256},
};

/// Length of a SHA-256 digest (and of an HMAC-SHA256 tag) in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Wrapper function to form a HMAC-SHA256 operation.
#[inline(always)]
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(value);
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(&mac.finalize().into_bytes());
    result
}

#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(&Sha256::digest(value));
    result
}

#[inline(always)]
pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(sha256(value))
}
