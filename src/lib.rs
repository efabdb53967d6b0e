//! The `scratchstack_s3_sigv4_auth` crate authenticates requests to an S3-compatible object store that are signed
//! with AWS Signature Version 4 (SigV4) in the `Authorization` header.
//!
//! This *is not* the library you want if you need to sign requests as a client. It verifies requests on the server
//! side against a single, statically configured access key id and secret access key; there is no credential store,
//! no key rotation, and no support for presigned URLs or chunked (`STREAMING-AWS4-HMAC-SHA256`) payloads.
//!
//! # Workflow
//! Verification needs the complete request, including the body, since the payload hash is part of the signature.
//! The typical workflow is:
//! 1. Build a [`Credentials`] with [`Credentials::builder`] or load it with [`Credentials::from_env`].
//! 2. Either wrap your handlers in a [`SigV4AuthLayer`], which answers `401 Unauthorized` to any request that fails
//!    verification, or call [`sigv4_verify_request`] yourself.
//! 3. Use [`verify_signature`] when you need to know *why* a request was rejected, e.g. in tests.
//!
//! ## Example
//! ```rust
//! use chrono::{DateTime, NaiveDate, Utc};
//! use http::Request;
//! use scratchstack_s3_sigv4_auth::{sigv4_verify_request, Credentials};
//!
//! // The time at which the request was received.
//! let server_timestamp: DateTime<Utc> = DateTime::from_naive_utc_and_offset(
//!     NaiveDate::from_ymd_opt(2015, 8, 30).unwrap().and_hms_opt(12, 36, 0).unwrap(),
//!     Utc,
//! );
//!
//! let credentials = Credentials::builder()
//!     .access_key_id("AKIDEXAMPLE")
//!     .secret_access_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
//!     .region("us-east-1")
//!     .service("service")
//!     .build()
//!     .unwrap();
//!
//! # tokio_test::block_on(async {
//! // Normally this would come from your web framework.
//! let req = Request::get("https://example.amazonaws.com/")
//!     .header("Host", "example.amazonaws.com")
//!     .header("X-Amz-Date", "20150830T123600Z")
//!     .header("Authorization", "AWS4-HMAC-SHA256 \
//! Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
//! SignedHeaders=host;x-amz-date, \
//! Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31")
//!     .body(())
//!     .unwrap();
//!
//! let (req, authorized) = sigv4_verify_request(req, &credentials, server_timestamp).await.unwrap();
//! assert!(authorized);
//!
//! // The body has been buffered and is still available to the handler.
//! assert!(req.body().is_empty());
//! # });
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

mod auth;
mod authorization;
mod body;
mod canonical;
mod chronoutil;
mod config;
mod constants;
mod crypto;
mod error;
mod service;
mod signature;
mod signing_key;

pub use {
    auth::string_to_sign,
    authorization::{AuthorizationHeader, Credential, CredentialScope},
    body::{IntoRequestBytes, LimitedBody},
    canonical::{
        canonical_headers, canonicalize_query_string, canonicalize_uri_path, escape_path_segment, CanonicalRequest,
    },
    config::{Credentials, CredentialsBuilder, CredentialsBuilderError},
    error::{AuthError, ConfigError},
    service::{SigV4AuthLayer, SigV4AuthService},
    signature::{is_authorized, sigv4_verify_request, verify_signature},
    signing_key::{derive_signing_key, KDateKey, KRegionKey, KSecretKey, KServiceKey, KSigningKey},
};

#[cfg(any(doc, feature = "unstable"))]
pub use {
    auth::{SigV4Authenticator, SigV4AuthenticatorBuilder},
    canonical::{latin1_to_string, normalize_header_value},
};
