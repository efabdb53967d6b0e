//! The SigV4 signing key ladder.
//!
//! Each rung is the HMAC-SHA256 of the previous rung's bytes over one component of the credential scope:
//! `kSecret` → date → `kDate` → region → `kRegion` → service → `kService` → `aws4_request` → `kSigning`.
//! None of the key types print their bytes through `Debug` or `Display`.

use {
    crate::{
        constants::{AWS4_REQUEST, AWS4_SECRET_PREFIX, ISO8601_DATE_FORMAT},
        crypto::{hmac_sha256, SHA256_OUTPUT_LEN},
    },
    chrono::NaiveDate,
    std::fmt::{Debug, Display, Formatter, Result as FmtResult},
};

macro_rules! opaque_fmt {
    ($key:ident) => {
        impl Debug for $key {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(stringify!($key))
            }
        }

        impl Display for $key {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(stringify!($key))
            }
        }
    };
}

macro_rules! derived_key {
    ($(#[$doc:meta])* $key:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq)]
        pub struct $key([u8; SHA256_OUTPUT_LEN]);

        impl AsRef<[u8; SHA256_OUTPUT_LEN]> for $key {
            fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
                &self.0
            }
        }

        opaque_fmt!($key);
    };
}

/// The secret access key, stored with its `AWS4` prefix so it can key the first HMAC directly.
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey(Vec<u8>);

opaque_fmt!(KSecretKey);

/// The secret without its `AWS4` prefix.
impl AsRef<[u8]> for KSecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0[AWS4_SECRET_PREFIX.len()..]
    }
}

derived_key!(
    /// `kDate`: the secret hashed with the `YYYYMMDD` request date.
    KDateKey
);

derived_key!(
    /// `kRegion`: `kDate` hashed with the region name.
    KRegionKey
);

derived_key!(
    /// `kService`: `kRegion` hashed with the service name.
    KServiceKey
);

derived_key!(
    /// `kSigning`: `kService` hashed with `aws4_request`. Only valid for one date, region, and service.
    KSigningKey
);

impl KSecretKey {
    /// Wrap a secret access key. Secrets of any length are accepted.
    pub fn new(secret_access_key: &str) -> Self {
        let mut prefixed = Vec::with_capacity(AWS4_SECRET_PREFIX.len() + secret_access_key.len());
        prefixed.extend_from_slice(AWS4_SECRET_PREFIX);
        prefixed.extend_from_slice(secret_access_key.as_bytes());
        Self(prefixed)
    }

    /// Derive `kDate` for `date`.
    pub fn to_kdate(&self, date: NaiveDate) -> KDateKey {
        let date = date.format(ISO8601_DATE_FORMAT).to_string();
        KDateKey(hmac_sha256(&self.0, date.as_bytes()))
    }

    /// Walk the whole ladder down to `kSigning`.
    pub fn to_ksigning(&self, date: NaiveDate, region: &str, service: &str) -> KSigningKey {
        self.to_kdate(date).to_kregion(region).to_kservice(service).to_ksigning()
    }
}

impl KDateKey {
    /// Derive `kRegion` for `region`.
    pub fn to_kregion(&self, region: &str) -> KRegionKey {
        KRegionKey(hmac_sha256(&self.0, region.as_bytes()))
    }
}

impl KRegionKey {
    /// Derive `kService` for `service`.
    pub fn to_kservice(&self, service: &str) -> KServiceKey {
        KServiceKey(hmac_sha256(&self.0, service.as_bytes()))
    }
}

impl KServiceKey {
    /// Derive `kSigning`.
    pub fn to_ksigning(&self) -> KSigningKey {
        KSigningKey(hmac_sha256(&self.0, AWS4_REQUEST.as_bytes()))
    }
}

impl KSigningKey {
    /// Sign a string to sign with this key, returning the lowercase hex signature.
    pub fn sign(&self, string_to_sign: &[u8]) -> String {
        hex::encode(hmac_sha256(&self.0, string_to_sign))
    }
}

/// Derive the signing key (`kSigning` from the
/// [AWS documentation](https://docs.aws.amazon.com/general/latest/gr/sigv4-calculate-signature.html)) for a secret
/// key, date, region, and service.
///
/// The key is a pure function of its inputs and is valid for a single day and credential scope.
pub fn derive_signing_key(secret_access_key: &str, date: NaiveDate, region: &str, service: &str) -> KSigningKey {
    KSecretKey::new(secret_access_key).to_ksigning(date, region, service)
}

#[cfg(test)]
mod tests {
    use {
        crate::{derive_signing_key, KSecretKey},
        chrono::NaiveDate,
        hmac::{Hmac, Mac},
        sha2::Sha256,
    };

    const AWS_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn hex_of<K: AsRef<[u8; 32]>>(key: &K) -> String {
        hex::encode(key.as_ref())
    }

    #[test_log::test]
    fn ladder_rungs() {
        let date = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap();
        let secret = KSecretKey::new(AWS_SECRET);
        assert_eq!(secret.as_ref(), AWS_SECRET.as_bytes());
        assert_eq!(secret, secret.clone());
        assert_ne!(secret, KSecretKey::new("wJalrXUtnFEMI/K7MDENG+bPxRfiCZEXAMPLEKEY"));

        let kdate = secret.to_kdate(date);
        assert_eq!(hex_of(&kdate), "0138c7a6cbd60aa727b2f653a522567439dfb9f3e72b21f9b25941a42f04a7cd");

        let kregion = kdate.to_kregion("us-east-1");
        assert_eq!(hex_of(&kregion), "f33d5808504bf34812e5fade63308b424b244c59189be2a591dd2282c7cb563f");

        let kservice = kregion.to_kservice("example");
        assert_eq!(hex_of(&kservice), "c60cc4b1d034c757348f2c673004c18908bba9a46fa1db87a98350f27e7b2df6");

        let ksigning = kservice.to_ksigning();
        assert_eq!(hex_of(&ksigning), "431cc9ef5876287dbb925d4ba4629f459002ad1d26b7c751601bb204e11718b8");

        assert_eq!(secret.to_ksigning(date, "us-east-1", "example"), ksigning);
        assert_eq!(derive_signing_key(AWS_SECRET, date, "us-east-1", "example"), ksigning);
    }

    #[test_log::test]
    fn key_material_is_not_printed() {
        let date = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap();
        let secret = KSecretKey::new(AWS_SECRET);
        let kdate = secret.to_kdate(date);
        let kregion = kdate.to_kregion("us-east-1");
        let kservice = kregion.to_kservice("s3");
        let ksigning = kservice.to_ksigning();

        assert_eq!(format!("{:?} {}", secret, secret), "KSecretKey KSecretKey");
        assert_eq!(format!("{:?} {}", kdate, kdate), "KDateKey KDateKey");
        assert_eq!(format!("{:?} {}", kregion, kregion), "KRegionKey KRegionKey");
        assert_eq!(format!("{:?} {}", kservice, kservice), "KServiceKey KServiceKey");
        assert_eq!(format!("{:?} {}", ksigning, ksigning), "KSigningKey KSigningKey");
    }

    #[test_log::test]
    fn aws_published_iam_vector() {
        let date = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap();
        let key = derive_signing_key(AWS_SECRET, date, "us-east-1", "iam");
        assert_eq!(hex_of(&key), "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9");
    }

    #[test_log::test]
    fn matches_independent_hmac_chain() {
        fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap();
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }

        let k_date = hmac(b"AWS4adminsecretkey12345678", b"20240101");
        let k_region = hmac(&k_date, b"us-east-1");
        let k_service = hmac(&k_region, b"s3");
        let k_signing = hmac(&k_service, b"aws4_request");

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let key = derive_signing_key("adminsecretkey12345678", date, "us-east-1", "s3");
        assert_eq!(hex_of(&key), hex::encode(k_signing));

        // Changing any one input changes the key.
        assert_ne!(derive_signing_key("adminsecretkey12345679", date, "us-east-1", "s3"), key);
        assert_ne!(derive_signing_key("adminsecretkey12345678", date.succ_opt().unwrap(), "us-east-1", "s3"), key);
        assert_ne!(derive_signing_key("adminsecretkey12345678", date, "us-east-2", "s3"), key);
        assert_ne!(derive_signing_key("adminsecretkey12345678", date, "us-east-1", "s4"), key);
    }

    #[test_log::test]
    fn empty_secret() {
        let secret = KSecretKey::new("");
        assert!(secret.as_ref().is_empty());
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_ne!(secret.to_ksigning(date, "us-east-1", "s3"), derive_signing_key("x", date, "us-east-1", "s3"));
    }
}
