//! In-memory testing for Meridian services.
//!
//! [`TestClient`] drives any [`Service`](meridian_core::Service) directly:
//! no sockets, no runtime. Requests are built fluently and responses come
//! back as [`TestResponse`] with JSON and assertion helpers.
//!
//! ```ignore
//! use http::StatusCode;
//! use meridian_test::TestClient;
//! use serde_json::json;
//!
//! let client = TestClient::new(app);
//! client
//!     .post("/api/person")
//!     .json(&json!({"firstName": "Alice", "lastName": "Smith"}))
//!     .send()
//!     .assert_status(StatusCode::CREATED)
//!     .assert_json_field("firstName", &json!("Alice"));
//! ```

#![doc(html_root_url = "https://docs.rs/meridian-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
