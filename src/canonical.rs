//! Canonicalization functionality for signature validation.
//!
//! This includes the URI, query string, and header canonicalization functions, as well as the ability to
//! create an AWS SigV4 canonical request.
//!
//! The rules here follow what the object store's clients sign, which is narrower than full SigV4 in two places:
//! path segments only have spaces and slashes escaped, and the query string is sorted as whole `key=value` strings
//! without decoding.

use {
    crate::{
        constants::HDR_AUTHORIZATION,
        crypto::{sha256, sha256_hex, SHA256_OUTPUT_LEN},
    },
    http::{header::HeaderMap, request::Parts},
    log::trace,
    qualifier_attr::qualifiers,
    std::fmt::{Debug, Formatter, Result as FmtResult},
};

/// A canonicalized request for AWS SigV4.
///
/// This holds everything about the request that does not depend on the `Authorization` header. The canonical
/// request itself is produced by [`canonical_request`][Self::canonical_request] once the signed header list is
/// known.
#[derive(Clone)]
pub struct CanonicalRequest {
    /// The HTTP method for the request (e.g., "GET", "POST", etc.)
    request_method: String,

    /// The canonicalized path from the HTTP request.
    canonical_path: String,

    /// The canonicalized query string.
    canonical_query_string: String,

    /// Headers from the HTTP request.
    headers: HeaderMap,

    /// The SHA-256 hash of the body.
    body_sha256: String,
}

impl CanonicalRequest {
    /// Create a CanonicalRequest from HTTP request [Parts] and the request body.
    pub fn from_request_parts(parts: &Parts, body: &[u8]) -> Self {
        CanonicalRequest {
            request_method: parts.method.to_string(),
            canonical_path: canonicalize_uri_path(parts.uri.path()),
            canonical_query_string: canonicalize_query_string(parts.uri.query().unwrap_or("")),
            headers: parts.headers.clone(),
            body_sha256: sha256_hex(body),
        }
    }

    /// Retrieve the HTTP request method.
    #[inline(always)]
    pub fn request_method(&self) -> &str {
        &self.request_method
    }

    /// Retrieve the canonicalized URI path from the request.
    #[inline(always)]
    pub fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Retrieve the canonical query string.
    #[inline(always)]
    pub fn canonical_query_string(&self) -> &str {
        &self.canonical_query_string
    }

    /// Retrieve the SHA-256 hash of the request body.
    #[inline(always)]
    pub fn body_sha256(&self) -> &str {
        &self.body_sha256
    }

    /// Get the [canonical request to hash](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
    /// for the request.
    ///
    /// `signed_headers` is used in the order given; it is not re-sorted.
    pub fn canonical_request(&self, signed_headers: &[String]) -> Vec<u8> {
        let mut result = Vec::with_capacity(1024);
        result.extend(self.request_method().as_bytes());
        result.push(b'\n');
        result.extend(self.canonical_path().as_bytes());
        result.push(b'\n');
        result.extend(self.canonical_query_string().as_bytes());
        result.push(b'\n');
        result.extend(canonical_headers(&self.headers, signed_headers));
        result.push(b'\n');
        result.extend(signed_headers.join(";").as_bytes());
        result.push(b'\n');
        result.extend(self.body_sha256().as_bytes());

        trace!("Canonical request:\n{}", String::from_utf8_lossy(&result));

        result
    }

    /// Get the SHA-256 hash of the [canonical request](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html).
    pub fn canonical_request_sha256(&self, signed_headers: &[String]) -> [u8; SHA256_OUTPUT_LEN] {
        sha256(&self.canonical_request(signed_headers))
    }
}

impl Debug for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CanonicalRequest")
            .field("request_method", &self.request_method)
            .field("canonical_path", &self.canonical_path)
            .field("canonical_query_string", &self.canonical_query_string)
            .field("headers", &debug_headers(&self.headers))
            .field("body_sha256", &self.body_sha256)
            .finish()
    }
}

/// Canonicalize the URI path. An empty path becomes `/`; otherwise each `/`-separated segment is escaped with
/// [`escape_path_segment`].
///
/// The path is used as it arrived on the wire, already percent-encoded by the client; it is never decoded first.
/// A request URI cannot carry a literal space, and splitting on `/` leaves none inside a segment, so for real
/// requests the escaping changes nothing and the canonical path is the raw path.
pub fn canonicalize_uri_path(uri_path: &str) -> String {
    if uri_path.is_empty() {
        return "/".to_string();
    }

    uri_path.split('/').map(escape_path_segment).collect::<Vec<String>>().join("/")
}

/// Escape a single path segment: spaces become `%20` and slashes become `%2F`. Nothing else is touched.
pub fn escape_path_segment(segment: &str) -> String {
    segment.replace(' ', "%20").replace('/', "%2F")
}

/// Canonicalize a raw query string by sorting its `&`-separated `key=value` elements lexicographically, as whole
/// strings. Elements are neither decoded nor re-encoded.
pub fn canonicalize_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut parameters = query.split('&').collect::<Vec<&str>>();
    parameters.sort_unstable();
    parameters.join("&")
}

/// Build the canonical headers block: one `name:value\n` line per signed header, in the order given.
///
/// Header names are matched case-insensitively. Multiple values for a header are joined with `,` before
/// whitespace is normalized. A signed header that is not present in the request is skipped.
pub fn canonical_headers(headers: &HeaderMap, signed_headers: &[String]) -> Vec<u8> {
    let mut result = Vec::with_capacity(256);

    for header in signed_headers {
        let header = header.to_ascii_lowercase();
        let mut values = headers.get_all(header.as_str()).iter().peekable();
        if values.peek().is_none() {
            trace!("Signed header '{}' is not present in the request; skipping", header);
            continue;
        }

        let mut joined = Vec::new();
        for (i, value) in values.enumerate() {
            if i > 0 {
                joined.push(b',');
            }
            joined.extend(value.as_bytes());
        }

        result.extend(header.as_bytes());
        result.push(b':');
        result.extend(normalize_header_value(&joined));
        result.push(b'\n');
    }

    result
}

/// Normalizes a header value by trimming whitespace and converting runs of whitespace to a single space.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn normalize_header_value(value: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(value.len());

    // Remove leading whitespace and reduce runs of whitespace to a single space.
    let mut last_was_space = true;

    for c in value {
        if c.is_ascii_whitespace() {
            if !last_was_space {
                result.push(b' ');
                last_was_space = true;
            }
        } else {
            result.push(*c);
            last_was_space = false;
        }
    }

    // Remove the trailing space, if any.
    if last_was_space {
        result.pop();
    }

    result
}

/// Convert a Latin-1 slice of bytes to a UTF-8 string.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Render headers for debugging; values of `authorization` are elided.
fn debug_headers(headers: &HeaderMap) -> String {
    let mut names = headers.keys().map(|k| k.as_str()).collect::<Vec<&str>>();
    names.sort_unstable();

    let mut result = String::new();
    for name in names {
        for value in headers.get_all(name) {
            if !result.is_empty() {
                result.push_str(", ");
            }
            result.push_str(name);
            result.push_str(": ");
            if name == HDR_AUTHORIZATION {
                result.push_str("...");
            } else {
                result.push_str(&latin1_to_string(value.as_bytes()));
            }
        }
    }

    result
}
