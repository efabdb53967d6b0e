//! Common constants used throughout the crate.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically.

/// Algorithm for AWS SigV4
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";

/// Prefix an `Authorization` header must start with: the algorithm followed by a single space.
pub(crate) const AWS4_HMAC_SHA256_PREFIX: &str = "AWS4-HMAC-SHA256 ";

/// String included at the end of the AWS SigV4 credential scope
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Prefix applied to the raw secret key before deriving `kDate`.
pub(crate) const AWS4_SECRET_PREFIX: &[u8] = b"AWS4";

/// Authorization header parameter carrying the credential.
pub(crate) const CREDENTIAL: &str = "Credential";

/// Region used when none is configured.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";

/// Service used when none is configured.
pub(crate) const DEFAULT_SERVICE: &str = "s3";

/// Largest streamed body [`LimitedBody`](crate::LimitedBody) reads by default: 50 MiB.
pub(crate) const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Environment variable holding the access key id.
pub(crate) const ENV_ACCESS_KEY_ID: &str = "ACCESS_KEY_ID";

/// Environment variable holding the region.
pub(crate) const ENV_REGION: &str = "REGION";

/// Environment variable holding the secret access key.
pub(crate) const ENV_SECRET_ACCESS_KEY: &str = "SECRET_ACCESS_KEY";

/// Environment variable holding the service name.
pub(crate) const ENV_SERVICE: &str = "SERVICE";

/// Error code: IdentityMismatch
pub(crate) const ERR_CODE_IDENTITY_MISMATCH: &str = "InvalidAccessKeyId";

/// Error code: MalformedHeader
pub(crate) const ERR_CODE_MALFORMED_HEADER: &str = "AuthorizationHeaderMalformed";

/// Error code: MissingHeader
pub(crate) const ERR_CODE_MISSING_HEADER: &str = "MissingSecurityHeader";

/// Error code: SignatureMismatch
pub(crate) const ERR_CODE_SIGNATURE_MISMATCH: &str = "SignatureDoesNotMatch";

/// Header for `authorization`
pub(crate) const HDR_AUTHORIZATION: &str = "authorization";

/// Header for delivering the request timestamp
pub(crate) const HDR_X_AMZ_DATE: &str = "x-amz-date";

/// Compact ISO8601 format used for the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Short date format
pub(crate) const ISO8601_DATE_FORMAT: &str = "%Y%m%d";

/// Length of an ISO8601 date string in the UTC time zone.
pub(crate) const ISO8601_UTC_LENGTH: usize = 16;

/// Error message: `"Authorization header contains characters other than visible ASCII."`
pub(crate) const MSG_AUTH_HEADER_NOT_ASCII: &str = "Authorization header contains characters other than visible ASCII.";

/// Error message: `"Authorization header requires 'Credential' parameter."`
pub(crate) const MSG_AUTH_HEADER_REQ_CREDENTIAL: &str = "Authorization header requires 'Credential' parameter.";

/// Error message: `"Authorization header requires 'Signature' parameter."`
pub(crate) const MSG_AUTH_HEADER_REQ_SIGNATURE: &str = "Authorization header requires 'Signature' parameter.";

/// Error message: `"Authorization header requires 'SignedHeaders' parameter."`
pub(crate) const MSG_AUTH_HEADER_REQ_SIGNED_HEADERS: &str = "Authorization header requires 'SignedHeaders' parameter.";

/// Error message: `"Credential must have exactly 5 slash-delimited elements, e.g. keyid/date/region/service/term,"`
pub(crate) const MSG_CREDENTIAL_MUST_HAVE_FIVE_PARTS: &str =
    "Credential must have exactly 5 slash-delimited elements, e.g. keyid/date/region/service/term,";

/// Error message: `"Authorization header is empty."`
pub(crate) const MSG_EMPTY_AUTH_HEADER: &str = "Authorization header is empty.";

/// Error message: `"The request signature we calculated does not match the signature you provided. Check your AWS Secret Access Key and signing method. Consult the service documentation for details."`
pub(crate) const MSG_REQUEST_SIGNATURE_MISMATCH: &str = "The request signature we calculated does not match the signature you provided. Check your AWS Secret Access Key and signing method. Consult the service documentation for details.";

/// Error message: `"Unsupported AWS 'algorithm': "`
pub(crate) const MSG_UNSUPPORTED_ALGORITHM: &str = "Unsupported AWS 'algorithm': ";

/// Authorization header parameter carrying the signature.
pub(crate) const SIGNATURE: &str = "Signature";

/// Authorization header parameter carrying the signed header list.
pub(crate) const SIGNED_HEADERS: &str = "SignedHeaders";

/// SHA-256 of an empty string.
pub(crate) const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Length of a SHA-256 hex string.
pub(crate) const SHA256_HEX_LENGTH: usize = SHA256_EMPTY.len();

/// Body returned with a `401 Unauthorized` response.
pub(crate) const UNAUTHORIZED_BODY: &str = "Unauthorized\n";
