use {
    crate::{
        auth::SigV4Authenticator, canonical::CanonicalRequest, chronoutil::parse_amz_date, constants::*,
        AuthError, AuthorizationHeader, Credentials, IntoRequestBytes,
    },
    bytes::Bytes,
    chrono::{DateTime, Utc},
    http::{
        header::AUTHORIZATION,
        request::{Parts, Request},
    },
    log::{debug, trace},
    tower::BoxError,
};

/// Verify an AWS SigV4 request.
///
/// This reads the body of the HTTP [`Request`] into memory, checks the signature in its `Authorization` header
/// against `credentials`, and returns:
/// * The request, with its body replaced by the buffered [`Bytes`]. The buffer is returned whether or not the
///   signature was accepted, so the caller can still use it.
/// * `true` if the request is authentic, `false` otherwise.
///
/// # Parameters
/// * `request` - The HTTP [`Request`] to verify.
/// * `credentials` - The identity the request must be signed with.
/// * `server_timestamp` - The timestamp of the server when the request was received. This is used as the request
///   timestamp when the request has no valid `x-amz-date` header. Usually this is the current time, `Utc::now()`.
///
/// # Errors
/// A rejected signature is not an error. Errors are returned only if the body could not be read, in which case no
/// verification took place.
pub async fn sigv4_verify_request<B>(
    request: Request<B>,
    credentials: &Credentials,
    server_timestamp: DateTime<Utc>,
) -> Result<(Request<Bytes>, bool), BoxError>
where
    B: IntoRequestBytes,
{
    let (parts, body) = request.into_parts();
    let body = body.into_request_bytes().await?;
    let authorized = is_authorized(&parts, &body, credentials, server_timestamp);
    Ok((Request::from_parts(parts, body), authorized))
}

/// Verify an AWS SigV4 request that has already been split into [`Parts`] and a buffered body, returning `true`
/// if it is authentic.
///
/// The reason for a rejection is logged at `debug` level but otherwise discarded; use [`verify_signature`] to
/// retrieve it.
pub fn is_authorized(parts: &Parts, body: &[u8], credentials: &Credentials, server_timestamp: DateTime<Utc>) -> bool {
    match verify_signature(parts, body, credentials, server_timestamp) {
        Ok(()) => true,
        Err(e) => {
            debug!("Rejecting {} {}: {:?}", parts.method, parts.uri.path(), e);
            false
        }
    }
}

/// Verify an AWS SigV4 request that has already been split into [`Parts`] and a buffered body.
///
/// # Errors
/// Returns the [`AuthError`] describing the first check the request failed. These are meant for logs and tests;
/// clients should only ever see a generic rejection.
pub fn verify_signature(
    parts: &Parts,
    body: &[u8],
    credentials: &Credentials,
    server_timestamp: DateTime<Utc>,
) -> Result<(), AuthError> {
    // Only the first Authorization header is considered.
    // An empty value counts as no header at all.
    let Some(auth_value) = parts.headers.get(AUTHORIZATION).filter(|value| !value.is_empty()) else {
        debug!("verify_signature: no Authorization header");
        return Err(AuthError::MissingHeader);
    };

    let Ok(auth_value) = auth_value.to_str() else {
        debug!("verify_signature: Authorization header is not visible ASCII");
        return Err(AuthError::MalformedHeader(MSG_AUTH_HEADER_NOT_ASCII.to_string()));
    };

    let header = AuthorizationHeader::parse(auth_value)?;
    trace!("Parsed Authorization header: {:?}", header);

    let request_timestamp = request_timestamp(parts).unwrap_or(server_timestamp);

    let canonical_request = CanonicalRequest::from_request_parts(parts, body);
    trace!("Created canonical request: {:?}", canonical_request);

    let auth = SigV4Authenticator::builder()
        .canonical_request_sha256(canonical_request.canonical_request_sha256(header.signed_headers()))
        .credential(header.credential().clone())
        .signature(header.signature())
        .request_timestamp(request_timestamp)
        .build()
        .map_err(|e| AuthError::MalformedHeader(e.to_string()))?;
    trace!("Created authenticator: {:?}", auth);

    auth.validate_signature(credentials)
}

/// Return the timestamp from the `x-amz-date` header, if present and in `YYYYMMDDTHHMMSSZ` form.
fn request_timestamp(parts: &Parts) -> Option<DateTime<Utc>> {
    let value = parts.headers.get(HDR_X_AMZ_DATE)?;
    let Ok(value) = value.to_str() else {
        trace!("request_timestamp: x-amz-date is not visible ASCII");
        return None;
    };

    let result = parse_amz_date(value);
    if result.is_none() {
        trace!("request_timestamp: ignoring unparseable x-amz-date '{}'", value);
    }
    result
}
