use std::error::Error as StdError;
use std::sync::Arc;

use crate::data::{RequestDescriptor, ResponseDescriptor};

/// Sink for exchange events.
///
/// On the unknown-length path [`response_received`](Self::response_received)
/// runs inline with whatever code reads the response body, so
/// implementations must return quickly.
pub trait EventReporter: Send + Sync {
    /// A response arrived and its size is known, either declared by the
    /// server or measured at end-of-stream.
    fn response_received(&self, request: &RequestDescriptor, response: &ResponseDescriptor);

    /// The response body's byte stream could not be obtained.
    fn response_input_stream_error(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
        error: &(dyn StdError + 'static),
    );

    /// The exchange failed before any response was produced.
    fn http_exchange_error(&self, request: &RequestDescriptor, error: &(dyn StdError + 'static));
}

impl<R: EventReporter + ?Sized> EventReporter for Arc<R> {
    fn response_received(&self, request: &RequestDescriptor, response: &ResponseDescriptor) {
        (**self).response_received(request, response);
    }

    fn response_input_stream_error(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
        error: &(dyn StdError + 'static),
    ) {
        (**self).response_input_stream_error(request, response, error);
    }

    fn http_exchange_error(&self, request: &RequestDescriptor, error: &(dyn StdError + 'static)) {
        (**self).http_exchange_error(request, error);
    }
}

/// Reporter that emits every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl EventReporter for TracingReporter {
    fn response_received(&self, request: &RequestDescriptor, response: &ResponseDescriptor) {
        tracing::info!(
            request_id = request.id(),
            method = request.method(),
            url = request.url(),
            status = response.status_code(),
            bytes = response.measured_size(),
            elapsed_ms = response.time().duration_ms(),
            "response received"
        );
    }

    fn response_input_stream_error(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
        error: &(dyn StdError + 'static),
    ) {
        tracing::warn!(
            request_id = request.id(),
            url = request.url(),
            status = response.status_code(),
            error = %error,
            "response stream unavailable"
        );
    }

    fn http_exchange_error(&self, request: &RequestDescriptor, error: &(dyn StdError + 'static)) {
        tracing::warn!(
            request_id = request.id(),
            method = request.method(),
            url = request.url(),
            error = %error,
            "HTTP exchange failed"
        );
    }
}
