//! Request metrics.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `meridian_requests_total` | Counter | `endpoint`, `method`, `status` |
//! | `meridian_request_duration_seconds` | Histogram | `endpoint`, `method` |
//! | `meridian_in_flight_requests` | Gauge | - |
//!
//! Values go through the `metrics` facade and are dropped until the host
//! installs a recorder.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

/// Name of the request counter.
pub const REQUESTS_TOTAL: &str = "meridian_requests_total";

/// Name of the request latency histogram.
pub const REQUEST_DURATION_SECONDS: &str = "meridian_request_duration_seconds";

/// Name of the in-flight gauge.
pub const IN_FLIGHT_REQUESTS: &str = "meridian_in_flight_requests";

/// Label used for requests that matched no route.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Registers descriptions for the standard metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of requests dispatched");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Request handling time in seconds"
    );
    describe_gauge!(IN_FLIGHT_REQUESTS, "Requests currently being handled");
}

/// Records a completed request.
pub fn record_request(endpoint: &str, method: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION_SECONDS,
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Increments the in-flight requests gauge.
pub fn increment_in_flight() {
    gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
}

/// Decrements the in-flight requests gauge.
pub fn decrement_in_flight() {
    gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        describe_metrics();
        increment_in_flight();
        record_request("person.create.v1", "POST", 201, Duration::from_millis(3));
        record_request(UNMATCHED_ENDPOINT, "GET", 404, Duration::from_micros(40));
        decrement_in_flight();
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(REQUESTS_TOTAL, "meridian_requests_total");
        assert_eq!(REQUEST_DURATION_SECONDS, "meridian_request_duration_seconds");
    }
}
