//! Response construction.

use bytes::Bytes;
use http::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use http::{Method, Response, StatusCode};
use meridian_core::MeridianError;
use serde_json::Value;

const JSON: &str = "application/json";

/// A JSON response with `status`.
#[must_use]
pub fn json_response(status: StatusCode, body: &Value) -> Response<Bytes> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = Response::new(Bytes::from(bytes));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    response
}

/// A bodiless response with `status`.
#[must_use]
pub fn empty_response(status: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}

/// The `{code, message, retryable, context}` envelope for `error`.
///
/// Internal errors keep their detail out of the body.
#[must_use]
pub fn error_response(error: &MeridianError) -> Response<Bytes> {
    let mut envelope = error.to_envelope();
    if error.is_fatal() {
        envelope.message = "Internal Server Error".to_string();
    }
    let body = serde_json::to_value(&envelope).unwrap_or_default();
    json_response(error.status_code(), &body)
}

/// A 405 envelope with an `Allow` header listing `allowed`.
#[must_use]
pub fn method_not_allowed(method: &Method, allowed: &[Method]) -> Response<Bytes> {
    let mut response = error_response(&MeridianError::MethodNotAllowed {
        method: method.to_string(),
    });
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::SubError;
    use serde_json::json;

    fn body(response: &Response<Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_json_response() {
        let response = json_response(StatusCode::CREATED, &json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON);
        assert_eq!(body(&response), json!({"id": 1}));
    }

    #[test]
    fn test_validation_envelope() {
        let error = MeridianError::validation(vec![SubError::for_field(
            "firstName",
            vec!["Missing data for required field.".to_string()],
        )]);
        let response = error_response(&error);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let envelope = body(&response);
        assert_eq!(envelope["code"], 422);
        assert_eq!(envelope["retryable"], false);
        assert_eq!(envelope["context"]["errors"][0]["field"], "firstName");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let response = error_response(&MeridianError::internal("database password leaked"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&response)["message"], "Internal Server Error");
    }

    #[test]
    fn test_method_not_allowed() {
        let response = method_not_allowed(&Method::PUT, &[Method::GET, Method::POST]);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, POST");
    }

    #[test]
    fn test_empty_response() {
        let response = empty_response(StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }
}
