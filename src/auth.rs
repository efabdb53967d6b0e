//! AWS API request signature verification routines.
//!
//! This implements the server side of the AWS [SigV4](http://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
//! algorithm once the canonical request has been generated: credential scope checks, the string to sign, signing
//! key derivation, and the signature comparison.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.

use {
    crate::{
        constants::*,
        crypto::SHA256_OUTPUT_LEN,
        signing_key::KSecretKey,
        AuthError, Credential, Credentials,
    },
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    log::{debug, trace},
    qualifier_attr::qualifiers,
    std::fmt::{Debug, Formatter, Result as FmtResult},
    subtle::ConstantTimeEq,
};

/// Low-level structure for performing AWS SigV4 authentication after a canonical request has been generated.
#[derive(Builder, Clone)]
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[builder(derive(Debug))]
pub struct SigV4Authenticator {
    /// The SHA-256 hash of the canonical request.
    canonical_request_sha256: [u8; SHA256_OUTPUT_LEN],

    /// The credential passed into the request, in the form of `keyid/date/region/service/aws4_request`.
    credential: Credential,

    /// The signature passed into the request.
    #[builder(setter(into))]
    signature: String,

    /// The timestamp of the request, from the `x-amz-date` header or the server clock.
    request_timestamp: DateTime<Utc>,
}

impl SigV4Authenticator {
    /// Create a builder for `SigV4Authenticator`.
    #[inline(always)]
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn builder() -> SigV4AuthenticatorBuilder {
        SigV4AuthenticatorBuilder::default()
    }

    /// Retrieve the credential passed into the request.
    #[inline(always)]
    pub(crate) fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Retrieve the signature passed into the request.
    #[inline(always)]
    pub(crate) fn signature(&self) -> &str {
        &self.signature
    }

    /// Retrieve the timestamp of the request.
    #[inline(always)]
    pub(crate) fn request_timestamp(&self) -> DateTime<Utc> {
        self.request_timestamp
    }

    /// Verify the credential belongs to the configured identity and is scoped to this server's region and service
    /// on the day of the request timestamp. This must succeed before calling
    /// [validate_signature][Self::validate_signature].
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn prevalidate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let access_key_id = self.credential().access_key_id();
        if access_key_id != credentials.access_key_id() {
            debug!("prevalidate: unknown access key id '{}'", access_key_id);
            return Err(AuthError::IdentityMismatch(format!(
                "The AWS access key Id you provided does not exist in our records: '{}'.",
                access_key_id
            )));
        }

        let cscope = self.credential().scope();
        let mut cscope_errors = Vec::new();

        if cscope.region() != credentials.region() {
            trace!(
                "prevalidate: credential region '{}' does not match expected region '{}'",
                cscope.region(),
                credentials.region()
            );
            cscope_errors.push(format!("Credential should be scoped to a valid region, not '{}'.", cscope.region()));
        }

        if cscope.service() != credentials.service() {
            trace!(
                "prevalidate: credential service '{}' does not match expected service '{}'",
                cscope.service(),
                credentials.service()
            );
            cscope_errors.push(format!("Credential should be scoped to correct service: '{}'.", credentials.service()));
        }

        if cscope.terminator() != AWS4_REQUEST {
            trace!(
                "prevalidate: credential terminator '{}' does not match expected terminator '{}'",
                cscope.terminator(),
                AWS4_REQUEST
            );
            cscope_errors.push(format!(
                "Credential should be scoped with a valid terminator: 'aws4_request', not '{}'.",
                cscope.terminator()
            ));
        }

        let req_ts = self.request_timestamp();
        let expected_cscope_date = req_ts.format(ISO8601_DATE_FORMAT).to_string();
        if cscope.date() != expected_cscope_date {
            trace!(
                "prevalidate: credential date '{}' does not match expected date '{}'",
                cscope.date(),
                expected_cscope_date
            );
            cscope_errors.push(format!(
                "Date in Credential scope does not match YYYYMMDD from ISO-8601 version of date from HTTP: '{}' != '{}', from '{}'.",
                cscope.date(),
                expected_cscope_date,
                req_ts.format(ISO8601_COMPACT_FORMAT)
            ));
        }

        if !cscope_errors.is_empty() {
            debug!("prevalidate: credential scope rejected: {}", cscope_errors.join(" "));
            return Err(AuthError::SignatureMismatch(Some(cscope_errors.join(" "))));
        }

        Ok(())
    }

    /// Return the string to sign for the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn get_string_to_sign(&self) -> Vec<u8> {
        string_to_sign(
            &self.canonical_request_sha256,
            self.request_timestamp(),
            &self.credential().scope().to_string(),
        )
    }

    /// Validate the request signature against the configured credentials.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn validate_signature(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.prevalidate(credentials)?;
        let string_to_sign = self.get_string_to_sign();
        trace!("String to sign:\n{}", String::from_utf8_lossy(string_to_sign.as_ref()));

        let signing_key = KSecretKey::new(credentials.secret_access_key()).to_ksigning(
            self.request_timestamp().date_naive(),
            credentials.region(),
            credentials.service(),
        );
        let expected_signature = signing_key.sign(&string_to_sign);
        let is_equal: bool = self.signature().as_bytes().ct_eq(expected_signature.as_bytes()).into();
        if !is_equal {
            debug!("validate_signature: signature mismatch for access key id '{}'", self.credential().access_key_id());
            Err(AuthError::SignatureMismatch(Some(MSG_REQUEST_SIGNATURE_MISMATCH.to_string())))
        } else {
            Ok(())
        }
    }
}

impl Debug for SigV4Authenticator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SigV4Authenticator")
            .field("canonical_request_sha256", &hex::encode(self.canonical_request_sha256))
            .field("credential", &self.credential().to_string())
            .field("signature", &self.signature())
            .field("request_timestamp", &self.request_timestamp())
            .finish()
    }
}

/// Build the string to sign: the algorithm, the `YYYYMMDDTHHMMSSZ` timestamp, the credential scope, and the hex
/// SHA-256 of the canonical request, separated by newlines.
pub fn string_to_sign(
    canonical_request_sha256: &[u8; SHA256_OUTPUT_LEN],
    timestamp: DateTime<Utc>,
    credential_scope: &str,
) -> Vec<u8> {
    let mut result = Vec::with_capacity(
        AWS4_HMAC_SHA256.len() + 1 + ISO8601_UTC_LENGTH + 1 + credential_scope.len() + 1 + SHA256_HEX_LENGTH,
    );

    result.extend(AWS4_HMAC_SHA256.as_bytes());
    result.push(b'\n');
    result.extend(timestamp.format(ISO8601_COMPACT_FORMAT).to_string().as_bytes());
    result.push(b'\n');
    result.extend(credential_scope.as_bytes());
    result.push(b'\n');
    result.extend(hex::encode(canonical_request_sha256).as_bytes());
    result
}
