//! Parsing of the SigV4 `Authorization` header.
//!
//! The header has the form:
//! ```text
//! AWS4-HMAC-SHA256 Credential=AKID/20130524/us-east-1/s3/aws4_request,
//!   SignedHeaders=host;x-amz-content-sha256;x-amz-date,
//!   Signature=<hex-signature>
//! ```

use {
    crate::{constants::*, AuthError},
    log::trace,
    std::{
        collections::HashMap,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// The credential scope of a request: `date/region/service/aws4_request`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CredentialScope {
    date: String,
    region: String,
    service: String,
    terminator: String,
}

impl CredentialScope {
    /// The `YYYYMMDD` date the request claims to be signed for.
    #[inline]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The region the request was signed for.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The service the request was signed for.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The scope terminator; always `aws4_request` for a valid request.
    #[inline]
    pub fn terminator(&self) -> &str {
        &self.terminator
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}/{}/{}", self.date, self.region, self.service, self.terminator)
    }
}

/// The `Credential` parameter: an access key id followed by the credential scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credential {
    access_key_id: String,
    scope: CredentialScope,
}

impl Credential {
    /// Split a `keyid/date/region/service/term` credential into its parts.
    pub fn parse(credential: &str) -> Result<Self, AuthError> {
        let parts = credential.split('/').collect::<Vec<&str>>();
        if parts.len() != 5 {
            trace!("Credential has {} parts, expected 5", parts.len());
            return Err(AuthError::MalformedHeader(format!(
                "{} got '{}'",
                MSG_CREDENTIAL_MUST_HAVE_FIVE_PARTS, credential
            )));
        }

        Ok(Self {
            access_key_id: parts[0].to_string(),
            scope: CredentialScope {
                date: parts[1].to_string(),
                region: parts[2].to_string(),
                service: parts[3].to_string(),
                terminator: parts[4].to_string(),
            },
        })
    }

    /// The access key id that signed the request.
    #[inline]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The credential scope.
    #[inline]
    pub fn scope(&self) -> &CredentialScope {
        &self.scope
    }
}

impl Display for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.access_key_id, self.scope)
    }
}

/// A parsed `Authorization` header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorizationHeader {
    algorithm: String,
    credential: Credential,
    signed_headers: Vec<String>,
    signature: String,
}

impl AuthorizationHeader {
    /// Parse the value of an `Authorization` header.
    ///
    /// Parameters are comma-separated `key=value` pairs. Unknown keys are ignored; when a key is repeated, only its
    /// first value is used. `Credential`, `SignedHeaders`, and `Signature` are required.
    ///
    /// Signed header names are lower-cased but otherwise kept in the order the client declared them.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        if raw.is_empty() {
            return Err(AuthError::MalformedHeader(MSG_EMPTY_AUTH_HEADER.to_string()));
        }

        let Some(parameters) = raw.strip_prefix(AWS4_HMAC_SHA256_PREFIX) else {
            let algorithm = raw.split(' ').next().unwrap_or_default();
            trace!("Authorization header does not start with {}", AWS4_HMAC_SHA256_PREFIX);
            return Err(AuthError::MalformedHeader(format!("{}'{}'.", MSG_UNSUPPORTED_ALGORITHM, algorithm)));
        };

        // Split the parameters by commas; trim each one; then split into key=value pairs.
        let mut parameter_map = HashMap::<&str, Vec<&str>>::new();
        for parameter in parameters.split(',') {
            let parameter = parameter.trim();

            // A trailing comma (or no parameters at all) leaves an empty element.
            if parameter.is_empty() {
                continue;
            }

            let Some((key, value)) = parameter.split_once('=') else {
                return Err(AuthError::MalformedHeader(format!(
                    "'{}' not a valid key=value pair (missing equal-sign) in Authorization header: '{}'",
                    parameter, raw
                )));
            };

            parameter_map.entry(key).or_default().push(value);
        }

        let first = |key: &str| parameter_map.get(key).and_then(|values| values.first().copied());

        let mut missing_messages = Vec::new();
        let credential = first(CREDENTIAL);
        if credential.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_CREDENTIAL);
        }

        let signature = first(SIGNATURE).filter(|s| !s.is_empty());
        if signature.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_SIGNATURE);
        }

        let signed_headers = first(SIGNED_HEADERS).filter(|s| !s.is_empty());
        if signed_headers.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_SIGNED_HEADERS);
        }

        let (Some(credential), Some(signature), Some(signed_headers)) = (credential, signature, signed_headers) else {
            return Err(AuthError::MalformedHeader(format!(
                "{} Authorization={}",
                missing_messages.join(" "),
                AWS4_HMAC_SHA256
            )));
        };

        Ok(Self {
            algorithm: AWS4_HMAC_SHA256.to_string(),
            credential: Credential::parse(credential)?,
            signed_headers: signed_headers.split(';').map(|h| h.to_ascii_lowercase()).collect(),
            signature: signature.to_string(),
        })
    }

    /// The signing algorithm; always `AWS4-HMAC-SHA256`.
    #[inline]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The credential the request was signed with.
    #[inline]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The signed header names, lower-cased, in the client's order.
    #[inline]
    pub fn signed_headers(&self) -> &[String] {
        &self.signed_headers
    }

    /// The hex signature provided by the client.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

#[cfg(test)]
mod tests {
    use crate::{AuthError, AuthorizationHeader, Credential};

    macro_rules! expect_err {
        ($test:expr, $expected:ident) => {
            match $test {
                Ok(ref v) => panic!("Expected Err({}); got Ok({:?})", stringify!($expected), v),
                Err(ref e) => match e {
                    AuthError::$expected(_) => e.to_string(),
                    _ => panic!("Expected {}; got {:#?}: {}", stringify!($expected), &e, &e),
                },
            }
        };
    }

    #[test_log::test]
    fn parse_valid() {
        let header = AuthorizationHeader::parse(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request, \
             SignedHeaders=host;x-amz-date, Signature=abcdef0123",
        )
        .unwrap();

        assert_eq!(header.algorithm(), "AWS4-HMAC-SHA256");
        assert_eq!(header.credential().access_key_id(), "AKIDEXAMPLE");
        assert_eq!(header.credential().scope().date(), "20150830");
        assert_eq!(header.credential().scope().region(), "us-east-1");
        assert_eq!(header.credential().scope().service(), "s3");
        assert_eq!(header.credential().scope().terminator(), "aws4_request");
        assert_eq!(header.credential().scope().to_string(), "20150830/us-east-1/s3/aws4_request");
        assert_eq!(header.credential().to_string(), "AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request");
        assert_eq!(header.signed_headers(), &["host".to_string(), "x-amz-date".to_string()]);
        assert_eq!(header.signature(), "abcdef0123");
    }

    #[test_log::test]
    fn parse_without_spaces_and_trailing_comma() {
        let header = AuthorizationHeader::parse(
            "AWS4-HMAC-SHA256 Credential=AK/20150830/us-east-1/s3/aws4_request,SignedHeaders=host,Signature=00,",
        )
        .unwrap();
        assert_eq!(header.signed_headers(), &["host".to_string()]);
        assert_eq!(header.signature(), "00");
    }

    #[test_log::test]
    fn signed_headers_keep_client_order_and_lowercase() {
        let header = AuthorizationHeader::parse(
            "AWS4-HMAC-SHA256 Credential=AK/20150830/us-east-1/s3/aws4_request, \
             SignedHeaders=X-Amz-Date;Host;Content-Type, Signature=00",
        )
        .unwrap();
        assert_eq!(
            header.signed_headers(),
            &["x-amz-date".to_string(), "host".to_string(), "content-type".to_string()]
        );
    }

    #[test_log::test]
    fn first_duplicate_wins_and_unknown_ignored() {
        let header = AuthorizationHeader::parse(
            "AWS4-HMAC-SHA256 Foo=Bar, Credential=AK1/20150830/us-east-1/s3/aws4_request, \
             Credential=AK2/20150830/us-east-1/s3/aws4_request, SignedHeaders=host, Signature=11, Signature=22",
        )
        .unwrap();
        assert_eq!(header.credential().access_key_id(), "AK1");
        assert_eq!(header.signature(), "11");
    }

    #[test_log::test]
    fn signature_value_may_contain_equals() {
        let header = AuthorizationHeader::parse(
            "AWS4-HMAC-SHA256 Credential=AK/20150830/us-east-1/s3/aws4_request, SignedHeaders=host, Signature=a=b",
        )
        .unwrap();
        assert_eq!(header.signature(), "a=b");
    }

    #[test_log::test]
    fn empty_header() {
        assert_eq!(expect_err!(AuthorizationHeader::parse(""), MalformedHeader), "Authorization header is empty.");
    }

    #[test_log::test]
    fn wrong_algorithm() {
        assert_eq!(
            expect_err!(AuthorizationHeader::parse("AWS3-ZZZ Credential=12345"), MalformedHeader),
            "Unsupported AWS 'algorithm': 'AWS3-ZZZ'."
        );
        // The algorithm must be followed by a space.
        assert_eq!(
            expect_err!(AuthorizationHeader::parse("AWS4-HMAC-SHA256"), MalformedHeader),
            "Unsupported AWS 'algorithm': 'AWS4-HMAC-SHA256'."
        );
        // The prefix is case-sensitive.
        expect_err!(
            AuthorizationHeader::parse("aws4-hmac-sha256 Credential=AK/20150830/us-east-1/s3/aws4_request"),
            MalformedHeader
        );
    }

    #[test_log::test]
    fn missing_equal_sign() {
        assert_eq!(
            expect_err!(AuthorizationHeader::parse("AWS4-HMAC-SHA256 FooBar, BazBurp"), MalformedHeader),
            "'FooBar' not a valid key=value pair (missing equal-sign) in Authorization header: 'AWS4-HMAC-SHA256 FooBar, BazBurp'"
        );
    }

    #[test_log::test]
    fn missing_parameters() {
        assert_eq!(
            expect_err!(AuthorizationHeader::parse("AWS4-HMAC-SHA256 Foo=Bar, Baz=Burp"), MalformedHeader),
            "Authorization header requires 'Credential' parameter. Authorization header requires 'Signature' parameter. Authorization header requires 'SignedHeaders' parameter. Authorization=AWS4-HMAC-SHA256"
        );
        assert_eq!(
            expect_err!(AuthorizationHeader::parse("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE"), MalformedHeader),
            "Authorization header requires 'Signature' parameter. Authorization header requires 'SignedHeaders' parameter. Authorization=AWS4-HMAC-SHA256"
        );
        assert_eq!(
            expect_err!(
                AuthorizationHeader::parse("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE, Signature=ABCDEF"),
                MalformedHeader
            ),
            "Authorization header requires 'SignedHeaders' parameter. Authorization=AWS4-HMAC-SHA256"
        );
        assert_eq!(
            expect_err!(
                AuthorizationHeader::parse(
                    "AWS4-HMAC-SHA256 Credential=AK/20150830/us-east-1/s3/aws4_request, SignedHeaders=host, Signature="
                ),
                MalformedHeader
            ),
            "Authorization header requires 'Signature' parameter. Authorization=AWS4-HMAC-SHA256"
        );
    }

    #[test_log::test]
    fn credential_needs_five_parts() {
        assert_eq!(
            expect_err!(
                AuthorizationHeader::parse(
                    "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE, Signature=ABCDEF, SignedHeaders=host;x-amz-date"
                ),
                MalformedHeader
            ),
            "Credential must have exactly 5 slash-delimited elements, e.g. keyid/date/region/service/term, got 'AKIDEXAMPLE'"
        );
        expect_err!(Credential::parse("AK/20150830/us-east-1/s3/aws4_request/extra"), MalformedHeader);
    }
}
