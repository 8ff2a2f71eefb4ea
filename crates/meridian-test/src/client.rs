//! In-memory test client.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response};
use meridian_core::Service;
use serde::Serialize;

use crate::error::TestError;
use crate::request::TestRequestBuilder;
use crate::response::TestResponse;

struct FnService<F>(F);

impl<F> Service for FnService<F>
where
    F: Fn(Request<Bytes>) -> Response<Bytes> + Send + Sync,
{
    fn call(&self, request: Request<Bytes>) -> Response<Bytes> {
        (self.0)(request)
    }
}

/// A client that drives a [`Service`] without any network.
///
/// ```ignore
/// use meridian_test::TestClient;
///
/// let client = TestClient::new(app);
/// client.get("/api/person").query("limit", 5).send().assert_status(StatusCode::OK);
/// ```
#[must_use]
#[derive(Clone)]
pub struct TestClient {
    service: Arc<dyn Service>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client for `service`.
    pub fn new(service: impl Service + 'static) -> Self {
        Self {
            service: Arc::new(service),
            default_headers: Vec::new(),
        }
    }

    /// Creates a client from a plain function.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(Request<Bytes>) -> Response<Bytes> + Send + Sync + 'static,
    {
        Self::new(FnService(handler))
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Creates a PATCH request builder.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Creates a request builder with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let mut builder = TestRequestBuilder::new(method, uri);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        TestClientRequest {
            client: self,
            builder,
        }
    }
}

impl std::fmt::Debug for TestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestClient")
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

/// A request builder bound to a [`TestClient`].
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Appends a query-string parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(name, value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built.
    pub fn send(self) -> TestResponse {
        self.try_send().expect("request should build")
    }

    /// Sends the request, returning build errors.
    pub fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        Ok(TestResponse::from(self.client.service.call(request)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;

    fn echo() -> TestClient {
        TestClient::from_fn(|request| {
            let body = json!({
                "method": request.method().as_str(),
                "path": request.uri().path(),
                "query": request.uri().query(),
                "tag": request.headers().get("x-tag").and_then(|v| v.to_str().ok()),
                "body": String::from_utf8_lossy(request.body()),
            });
            Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "application/json")
                .body(Bytes::from(body.to_string()))
                .unwrap()
        })
    }

    #[test]
    fn test_all_methods() {
        let client = echo();
        for (response, method) in [
            (client.get("/x").send(), "GET"),
            (client.post("/x").send(), "POST"),
            (client.put("/x").send(), "PUT"),
            (client.patch("/x").send(), "PATCH"),
            (client.delete("/x").send(), "DELETE"),
        ] {
            response.assert_json_field("method", &json!(method));
        }
    }

    #[test]
    fn test_query_and_body() {
        let response = echo()
            .post("/api/person")
            .query("offset", 0)
            .json(&json!({"a": 1}))
            .send();
        response
            .assert_status(StatusCode::OK)
            .assert_json_field("query", &json!("offset=0"))
            .assert_json_field("body", &json!(r#"{"a":1}"#));
    }

    #[test]
    fn test_default_headers() {
        let client = echo().with_default_header("X-Tag", "default");
        client.get("/").send().assert_json_field("tag", &json!("default"));
        client
            .get("/")
            .header("X-Tag", "override")
            .send()
            .assert_json_field("tag", &json!("override"));
    }

    #[test]
    fn test_try_send_reports_build_errors() {
        let result = echo().get("/").header("bad header", "x").try_send();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }
}
