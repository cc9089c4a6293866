use std::error::Error as StdError;
use std::sync::Arc;

use http::{Request, Response};

use crate::core::{CompletionHandler, headers};
use crate::data::{RequestDescriptor, ResponseDescriptor, TimeInterval};
use crate::effects::body::ResponseBody;
use crate::effects::counting::CountingStream;
use crate::effects::reporter::EventReporter;
use crate::error::{Error, Result};

/// Turns one intercepted exchange into reporter events.
///
/// Responses that declare a `Content-Length` are reported at once and
/// returned untouched. Anything else gets its body wrapped in a
/// [`CountingStream`]; the report is deferred until the consumer reads the
/// body to its end, and never happens if the body is dropped first.
pub struct ExchangeInterpreter<R> {
    reporter: Arc<R>,
}

impl<R> Clone for ExchangeInterpreter<R> {
    fn clone(&self) -> Self {
        Self {
            reporter: Arc::clone(&self.reporter),
        }
    }
}

impl<R: EventReporter + 'static> ExchangeInterpreter<R> {
    pub fn new(reporter: Arc<R>) -> Self { Self { reporter } }

    pub fn reporter(&self) -> &Arc<R> { &self.reporter }

    pub fn on_response<B>(
        &self,
        request_id: u32,
        time: TimeInterval,
        request: &Request<B>,
        response: Response<ResponseBody>,
    ) -> Result<Response<ResponseBody>> {
        let request_descriptor = RequestDescriptor::from_request(request_id, request);
        let mut response_descriptor = ResponseDescriptor::new(
            request_id,
            response.status().as_u16(),
            headers::declared_length(response.headers()),
            time,
        );

        if headers::has_declared_length(response.headers()) {
            self.reporter
                .response_received(&request_descriptor, &response_descriptor);
            return Ok(response);
        }

        let (parts, mut body) = response.into_parts();
        let metadata = body.metadata().clone();

        let stream = match body.acquire() {
            Ok(stream) => stream,
            Err(e) => {
                tracing::debug!(request_id, error = %e, "failed to acquire response stream");
                self.reporter.response_input_stream_error(
                    &request_descriptor,
                    &response_descriptor,
                    &*e,
                );
                return Err(Error::StreamAcquisition(e));
            }
        };

        let reporter = Arc::clone(&self.reporter);
        let handler = CompletionHandler::new(move |bytes_read| {
            response_descriptor.set_measured_size(bytes_read);
            reporter.response_received(&request_descriptor, &response_descriptor);
        });

        let counted = CountingStream::new(stream, handler);
        let body = ResponseBody::forwarding(metadata, Box::pin(counted));
        Ok(Response::from_parts(parts, body))
    }

    pub fn on_failure<B>(
        &self,
        request_id: u32,
        time: TimeInterval,
        request: &Request<B>,
        error: &(dyn StdError + 'static),
    ) {
        tracing::debug!(
            request_id,
            elapsed_ms = time.duration_ms(),
            error = %error,
            "HTTP exchange failed"
        );
        let request_descriptor = RequestDescriptor::from_request(request_id, request);
        self.reporter.http_exchange_error(&request_descriptor, error);
    }
}
