//! The request/response seam between Meridian and a transport.

use bytes::Bytes;
use http::{Request, Response};

/// Something that answers HTTP requests synchronously.
///
/// The application implements this; transports and the in-memory test
/// client drive it.
pub trait Service: Send + Sync {
    /// Handles one request.
    fn call(&self, request: Request<Bytes>) -> Response<Bytes>;
}

impl<S: Service + ?Sized> Service for std::sync::Arc<S> {
    fn call(&self, request: Request<Bytes>) -> Response<Bytes> {
        (**self).call(request)
    }
}

impl<S: Service + ?Sized> Service for &S {
    fn call(&self, request: Request<Bytes>) -> Response<Bytes> {
        (**self).call(request)
    }
}
