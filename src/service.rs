//! [`tower`] middleware that puts AWS SigV4 authentication in front of another service.

use {
    crate::{constants::UNAUTHORIZED_BODY, sigv4_verify_request, Credentials, IntoRequestBytes},
    bytes::Bytes,
    chrono::Utc,
    http::{header::CONTENT_TYPE, Request, Response, StatusCode},
    log::debug,
    std::{
        any::type_name,
        fmt::{Debug, Formatter, Result as FmtResult},
        future::Future,
        pin::Pin,
        sync::Arc,
        task::{Context, Poll},
    },
    tower::{BoxError, Layer, Service, ServiceExt},
};

/// [`Layer`] that wraps services in a [`SigV4AuthService`].
#[derive(Clone, Debug)]
pub struct SigV4AuthLayer {
    credentials: Arc<Credentials>,
}

impl SigV4AuthLayer {
    /// Create a layer that verifies requests against `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        Self::from_arc(Arc::new(credentials))
    }

    /// Create a layer that verifies requests against credentials shared with other parts of the server.
    pub fn from_arc(credentials: Arc<Credentials>) -> Self {
        Self {
            credentials,
        }
    }
}

impl<S> Layer<S> for SigV4AuthLayer {
    type Service = SigV4AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SigV4AuthService::from_arc(self.credentials.clone(), inner)
    }
}

/// SigV4AuthService authenticates each request against the AWS SigV4 signing protocol before passing it on.
///
/// Authentic requests are forwarded to the inner service with their body buffered into [`Bytes`]. Every other
/// request is answered with `401 Unauthorized` and a plain-text body, without calling the inner service. The
/// response does not say why the request was rejected; the reason is logged at `debug` level.
#[derive(Clone)]
pub struct SigV4AuthService<S> {
    credentials: Arc<Credentials>,
    inner: S,
}

impl<S> SigV4AuthService<S> {
    /// Wrap `inner`, verifying requests against `credentials`.
    pub fn new(credentials: Credentials, inner: S) -> Self {
        Self::from_arc(Arc::new(credentials), inner)
    }

    /// Wrap `inner`, verifying requests against credentials shared with other parts of the server.
    pub fn from_arc(credentials: Arc<Credentials>, inner: S) -> Self {
        Self {
            credentials,
            inner,
        }
    }

    /// Retrieve the credentials requests are verified against.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl<S> Debug for SigV4AuthService<S> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.debug_struct("SigV4AuthService")
            .field("credentials", &self.credentials)
            .field("inner", &type_name::<S>())
            .finish()
    }
}

impl<S, B, R> Service<Request<B>> for SigV4AuthService<S>
where
    B: IntoRequestBytes + Send + 'static,
    S: Service<Request<Bytes>, Response = Response<R>, Error = BoxError> + Clone + Send + 'static,
    S::Future: Send,
    R: From<&'static str> + Send + 'static,
{
    type Response = Response<R>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<R>, BoxError>> + Send>>;

    fn poll_ready(&mut self, c: &mut Context) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(c)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let credentials = self.credentials.clone();
        let inner = self.inner.clone();

        Box::pin(handle_call(req, credentials, inner))
    }
}

async fn handle_call<S, B, R>(req: Request<B>, credentials: Arc<Credentials>, inner: S) -> Result<Response<R>, BoxError>
where
    B: IntoRequestBytes,
    S: Service<Request<Bytes>, Response = Response<R>, Error = BoxError>,
    R: From<&'static str>,
{
    let (req, authorized) = sigv4_verify_request(req, &credentials, Utc::now()).await?;

    if authorized {
        inner.oneshot(req).await
    } else {
        debug!("Responding 401 to {} {}", req.method(), req.uri().path());
        Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(R::from(UNAUTHORIZED_BODY))
            .map_err(Into::into)
    }
}
