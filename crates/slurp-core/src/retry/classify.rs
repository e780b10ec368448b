//! Classify HTTP status and curl errors into failure categories.

use super::error::{StreamError, TransferStats};
use super::FailureCategory;

/// Statuses the endpoint documents as not worth reconnecting for.
const TERMINAL_STATUSES: [u32; 6] = [401, 403, 404, 406, 413, 416];

/// True for the documented terminal statuses; other terminal statuses are "unexpected".
pub fn is_documented_terminal(code: u32) -> bool {
    TERMINAL_STATUSES.contains(&code)
}

/// Classify an HTTP status code. Anything not explicitly retryable is terminal.
pub fn classify_http_status(code: u32) -> FailureCategory {
    match code {
        503 => FailureCategory::HttpRetryable,
        420 => FailureCategory::RateLimited,
        _ => FailureCategory::HttpTerminal,
    }
}

/// Classify a curl error. Every curl failure is a transport fault; a failing
/// HTTP status is classified by its code instead (see `classify`).
pub fn classify_curl_error(e: &curl::Error) -> FailureCategory {
    if e.is_operation_timedout() || e.is_aborted_by_callback() {
        tracing::debug!("transport stalled: {}", e);
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
    {
        tracing::debug!("transport could not connect: {}", e);
    } else if e.is_recv_error()
        || e.is_send_error()
        || e.is_read_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        tracing::debug!("transport dropped mid-stream: {}", e);
    } else {
        tracing::debug!("unclassified transport error: {}", e);
    }
    FailureCategory::TransportError
}

/// Classify the outcome of one attempt. Total: every outcome maps to one category.
pub fn classify(outcome: &Result<TransferStats, StreamError>) -> FailureCategory {
    match outcome {
        Ok(_) => FailureCategory::GracefulClose,
        Err(StreamError::Http(code)) => classify_http_status(*code),
        Err(StreamError::IdleTimeout { .. }) => FailureCategory::TransportError,
        Err(StreamError::Curl(e)) => classify_curl_error(e),
        Err(StreamError::Sink(_)) => FailureCategory::SinkFailure,
    }
}
