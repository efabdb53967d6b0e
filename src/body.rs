//! Request body buffering.
//!
//! The payload hash in the canonical request covers the whole body, so verification reads it into memory first.
//! The same buffer is handed back to the caller whether the request is accepted or rejected.
//!
//! Streaming bodies, such as the incoming body of a server request, are read through [`LimitedBody`].
use {
    crate::constants::DEFAULT_MAX_BODY_SIZE,
    bytes::Bytes,
    http_body::Body,
    http_body_util::{BodyExt, Limited},
    std::future::Future,
    tower::BoxError,
};

/// A body type that can be read completely into a [`Bytes`] buffer.
pub trait IntoRequestBytes {
    /// Read this body into a [`Bytes`] buffer.
    fn into_request_bytes(self) -> impl Future<Output = Result<Bytes, BoxError>> + Send + Sync;
}

/// An absent body is an empty buffer.
impl IntoRequestBytes for () {
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::new())
    }
}

impl IntoRequestBytes for Vec<u8> {
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::from(self))
    }
}

/// The UTF-8 encoding of the string is the body.
impl IntoRequestBytes for String {
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::from(self))
    }
}

impl IntoRequestBytes for &'static str {
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(Bytes::from_static(self.as_bytes()))
    }
}

/// Identity transformation: the buffer is returned as-is.
impl IntoRequestBytes for Bytes {
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        Ok(self)
    }
}

/// A streaming [`Body`] that is read into memory, frame by frame, up to a size limit.
///
/// Servers hand out request bodies as streams; wrap them with `request.map(LimitedBody::new)` before verification.
/// A body longer than the limit fails with [`LengthLimitError`](http_body_util::LengthLimitError) once the limit
/// is crossed, without the rest of it being read.
#[derive(Clone, Debug)]
pub struct LimitedBody<B> {
    body: B,
    limit: usize,
}

impl<B> LimitedBody<B> {
    /// Wrap `body` with the default limit of 50 MiB.
    pub fn new(body: B) -> Self {
        Self::with_limit(body, DEFAULT_MAX_BODY_SIZE)
    }

    /// Wrap `body`, refusing to read more than `limit` bytes of it.
    pub fn with_limit(body: B, limit: usize) -> Self {
        Self {
            body,
            limit,
        }
    }

    /// The number of bytes that may be read.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Unwrap the body without reading it.
    pub fn into_inner(self) -> B {
        self.body
    }
}

impl<B> IntoRequestBytes for LimitedBody<B>
where
    B: Body<Data = Bytes> + Send + Sync,
    B::Error: Into<BoxError>,
{
    async fn into_request_bytes(self) -> Result<Bytes, BoxError> {
        let collected = Limited::new(self.body, self.limit).collect().await?;
        Ok(collected.to_bytes())
    }
}
