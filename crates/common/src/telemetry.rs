//! Request counters shared by the auth and query crates
//!
//! - `mal_api_requests_total` (counter): labels `endpoint`, `status`
//! - `mal_token_refresh_total` (counter): label `outcome`
//! - `mal_field_rejections_total` (counter): no labels, since rejected names are
//!   arbitrary caller input
//!
//! Without an installed recorder these calls are no-ops.

/// Record a completed provider call. `status` is 0 when no response arrived.
pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!("mal_api_requests_total", "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
}

/// Record the outcome of a refresh-token exchange (`success`, `rejected`, `error`).
pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("mal_token_refresh_total", "outcome" => outcome).increment(1);
}

/// Record a caller-supplied field dropped by the allow-list.
pub fn record_field_rejection() {
    metrics::counter!("mal_field_rejections_total").increment(1);
}
