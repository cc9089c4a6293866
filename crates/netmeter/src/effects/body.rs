use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, TryStreamExt, stream};
use http::HeaderMap;

use crate::core::headers;
use crate::error::{BoxError, Error, Result};

/// A boxed stream type for response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// The byte source of a [`ResponseBody`].
pub type ByteStream = BoxStream<'static, std::result::Result<Bytes, BoxError>>;

type Opener = Box<dyn FnOnce() -> std::result::Result<ByteStream, BoxError> + Send>;

/// Content metadata a body advertises independently of its byte source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyMetadata {
    pub content_type:   Option<String>,
    pub content_length: Option<u64>,
}

impl BodyMetadata {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            content_type:   headers::content_type(headers),
            content_length: headers::declared_length(headers),
        }
    }
}

enum Source {
    Stream(ByteStream),
    Lazy(Opener),
    Consumed,
}

/// Single-consumer HTTP response body.
///
/// The byte source is handed out once through [`into_stream`](Self::into_stream);
/// a lazily opened source may fail at that point.
pub struct ResponseBody {
    metadata: BodyMetadata,
    source:   Source,
}

impl ResponseBody {
    pub fn from_stream<S, E>(metadata: BodyMetadata, stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            metadata,
            source: Source::Stream(Box::pin(stream.map_err(Into::<BoxError>::into))),
        }
    }

    /// An in-memory body whose content length is its exact size.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let metadata = BodyMetadata {
            content_type:   None,
            content_length: Some(bytes.len() as u64),
        };
        let chunks = stream::iter([Ok::<_, BoxError>(bytes)]);
        Self {
            metadata,
            source: Source::Stream(Box::pin(chunks)),
        }
    }

    pub fn empty() -> Self { Self::from_bytes(Bytes::new()) }

    /// A body whose byte source is opened on first acquisition.
    pub fn lazy(
        metadata: BodyMetadata,
        opener: impl FnOnce() -> std::result::Result<ByteStream, BoxError> + Send + 'static,
    ) -> Self {
        Self {
            metadata,
            source: Source::Lazy(Box::new(opener)),
        }
    }

    /// Expose `source` as a body that keeps the content type and declared
    /// length of the body it replaces.
    pub fn forwarding(metadata: BodyMetadata, source: ByteStream) -> Self {
        Self {
            metadata,
            source: Source::Stream(source),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.metadata.content_type = Some(content_type.into());
        self
    }

    pub fn metadata(&self) -> &BodyMetadata { &self.metadata }

    pub fn content_type(&self) -> Option<&str> { self.metadata.content_type.as_deref() }

    pub fn content_length(&self) -> Option<u64> { self.metadata.content_length }

    /// Take the byte source, opening it if it is lazy. Leaves the body
    /// consumed whatever the outcome.
    pub(crate) fn acquire(&mut self) -> std::result::Result<ByteStream, BoxError> {
        match std::mem::replace(&mut self.source, Source::Consumed) {
            Source::Stream(stream) => Ok(stream),
            Source::Lazy(open) => open(),
            Source::Consumed => Err(Box::new(Error::BodyConsumed)),
        }
    }

    pub fn into_stream(mut self) -> Result<ByteStream> {
        self.acquire().map_err(Error::StreamAcquisition)
    }

    /// Drain the body into a single buffer.
    pub async fn bytes(self) -> Result<Bytes> {
        let mut stream = self.into_stream()?;
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.try_next().await.map_err(Error::Body)? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            Source::Stream(_) => "stream",
            Source::Lazy(_) => "lazy",
            Source::Consumed => "consumed",
        };
        f.debug_struct("ResponseBody")
            .field("metadata", &self.metadata)
            .field("source", &source)
            .finish()
    }
}
