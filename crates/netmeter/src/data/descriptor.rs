use http::Request;
use serde::{Deserialize, Serialize};

use crate::core::headers;
use crate::data::TimeInterval;

/// Snapshot of an outgoing request, taken when the exchange is intercepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    id:              u32,
    url:             String,
    method:          String,
    declared_length: Option<u64>,
    host:            Option<String>,
}

impl RequestDescriptor {
    pub fn new(
        id: u32,
        url: impl Into<String>,
        method: impl Into<String>,
        declared_length: Option<u64>,
        host: Option<String>,
    ) -> Self {
        Self {
            id,
            url: url.into(),
            method: method.into(),
            declared_length,
            host,
        }
    }

    /// Describe `request` under the given exchange id.
    ///
    /// The declared length comes from `Content-Length` and the host from the
    /// `Host` header; neither is derived from the URI.
    pub fn from_request<B>(id: u32, request: &Request<B>) -> Self {
        let headers = request.headers();
        Self::new(
            id,
            request.uri().to_string(),
            request.method().as_str(),
            headers::declared_length(headers),
            headers::host(headers),
        )
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn url(&self) -> &str { &self.url }

    pub fn method(&self) -> &str { &self.method }

    /// Request body size advertised by the caller, if any.
    pub fn declared_length(&self) -> Option<u64> { self.declared_length }

    pub fn host(&self) -> Option<&str> { self.host.as_deref() }
}

/// Outcome of one exchange as delivered to reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    request_id:      u32,
    status_code:     u16,
    declared_length: Option<u64>,
    start_time:      i64,
    end_time:        i64,
    measured_size:   u64,
}

impl ResponseDescriptor {
    /// The measured size starts at the declared length, or zero when the
    /// response did not declare one.
    pub fn new(
        request_id: u32,
        status_code: u16,
        declared_length: Option<u64>,
        time: TimeInterval,
    ) -> Self {
        Self {
            request_id,
            status_code,
            declared_length,
            start_time: time.start_time,
            end_time: time.end_time,
            measured_size: declared_length.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn with_measured_size(mut self, measured_size: u64) -> Self {
        self.measured_size = measured_size;
        self
    }

    pub(crate) fn set_measured_size(&mut self, measured_size: u64) {
        self.measured_size = measured_size;
    }

    pub fn request_id(&self) -> u32 { self.request_id }

    pub fn status_code(&self) -> u16 { self.status_code }

    pub fn declared_length(&self) -> Option<u64> { self.declared_length }

    pub fn start_time(&self) -> i64 { self.start_time }

    pub fn end_time(&self) -> i64 { self.end_time }

    pub fn time(&self) -> TimeInterval { TimeInterval::new(self.start_time, self.end_time) }

    /// Response size in bytes: the declared length when the server sent one,
    /// otherwise the number of body bytes actually read.
    pub fn measured_size(&self) -> u64 { self.measured_size }
}
