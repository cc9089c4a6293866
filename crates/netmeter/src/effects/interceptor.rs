use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;
use http::{Request, Response};

use crate::data::{InterceptorOptions, TimeInterval};
use crate::effects::body::ResponseBody;
use crate::effects::client::HttpClient;
use crate::effects::interpreter::ExchangeInterpreter;
use crate::effects::reporter::EventReporter;
use crate::error::{Error, Result};

/// An [`HttpClient`] that measures every exchange of the client it wraps.
///
/// Each exchange gets the next request id, is timed from just before the
/// inner call until its response head (or error) arrives, and is handed to
/// an [`ExchangeInterpreter`]. Transport errors are reported and then
/// returned as [`Error::Transport`].
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use bytes::Bytes;
/// use netmeter::{HttpClient, MeteredClient, ReqwestClient, TracingReporter};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let client = MeteredClient::new(ReqwestClient::new()?, Arc::new(TracingReporter));
/// let request = http::Request::get("https://example.com/").body(Bytes::new())?;
/// let _body = client.execute(request).await?.into_body().bytes().await?;
/// # Ok(())
/// # }
/// ```
pub struct MeteredClient<C, R> {
    inner:       C,
    interpreter: ExchangeInterpreter<R>,
    options:     InterceptorOptions,
    next_id:     AtomicU32,
}

impl<C: HttpClient, R: EventReporter + 'static> MeteredClient<C, R> {
    pub fn new(inner: C, reporter: Arc<R>) -> Self {
        let options = InterceptorOptions::default();
        Self {
            inner,
            interpreter: ExchangeInterpreter::new(reporter),
            next_id: AtomicU32::new(options.first_request_id),
            options,
        }
    }

    pub fn with_options(mut self, options: InterceptorOptions) -> Self {
        self.next_id = AtomicU32::new(options.first_request_id);
        self.options = options;
        self
    }

    pub fn inner(&self) -> &C { &self.inner }

    pub fn options(&self) -> &InterceptorOptions { &self.options }

    fn next_request_id(&self) -> u32 { self.next_id.fetch_add(1, Ordering::Relaxed) }
}

impl<C: HttpClient, R: EventReporter + 'static> HttpClient for MeteredClient<C, R> {
    type Error = Error;

    async fn execute(&self, request: Request<Bytes>) -> Result<Response<ResponseBody>> {
        if !self.options.enabled {
            return self
                .inner
                .execute(request)
                .await
                .map_err(|e| Error::Transport(Box::new(e)));
        }

        let request_id = self.next_request_id();
        let head = request_head(&request);
        tracing::trace!(request_id, method = %head.method(), uri = %head.uri(), "intercepting exchange");

        let start_time = TimeInterval::now_millis();
        let outcome = self.inner.execute(request).await;
        let time = TimeInterval::new(start_time, TimeInterval::now_millis());

        match outcome {
            Ok(response) => self
                .interpreter
                .on_response(request_id, time, &head, response),
            Err(e) => {
                self.interpreter.on_failure(request_id, time, &head, &e);
                Err(Error::Transport(Box::new(e)))
            }
        }
    }
}

/// Copy of the request line and headers, kept for describing the exchange
/// after the request itself has been handed to the inner client.
fn request_head<B>(request: &Request<B>) -> Request<()> {
    let mut head = Request::new(());
    *head.method_mut() = request.method().clone();
    *head.uri_mut() = request.uri().clone();
    *head.version_mut() = request.version();
    *head.headers_mut() = request.headers().clone();
    head
}
