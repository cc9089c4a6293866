//! Byte-counting decorators for response bodies.
//!
//! Both decorators forward data untouched, keep a running byte count, and
//! hand the final count to a [`CompletionHandler`] the first time the inner
//! source reports end-of-stream. Dropping a decorator early never completes
//! it, so an abandoned body produces no report.

use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use futures_util::stream::FusedStream;

use crate::core::CompletionHandler;

/// A stream that counts the bytes of every chunk it yields.
pub struct CountingStream<S> {
    inner:      S,
    handler:    CompletionHandler,
    bytes_read: u64,
    finished:   bool,
}

impl<S> CountingStream<S> {
    pub fn new(inner: S, handler: CompletionHandler) -> Self {
        Self {
            inner,
            handler,
            bytes_read: 0,
            finished: false,
        }
    }

    /// Bytes yielded so far.
    pub fn bytes_read(&self) -> u64 { self.bytes_read }

    /// Whether the inner stream has reached its end.
    pub fn is_finished(&self) -> bool { self.finished }
}

impl<S, E> Stream for CountingStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // The inner stream is not polled again once it has ended.
        if this.finished {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_read += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => {
                this.finished = true;
                tracing::trace!(bytes = this.bytes_read, "counted stream reached end");
                this.handler.complete(this.bytes_read);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}

impl<S, E> FusedStream for CountingStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    fn is_terminated(&self) -> bool { self.finished }
}

/// Blocking counterpart of [`CountingStream`] for [`Read`] sources.
///
/// A `read` returning `Ok(0)` for a non-empty buffer is end-of-stream.
pub struct CountingReader<R> {
    inner:      R,
    handler:    CompletionHandler,
    bytes_read: u64,
    finished:   bool,
}

impl<R> CountingReader<R> {
    pub fn new(inner: R, handler: CompletionHandler) -> Self {
        Self {
            inner,
            handler,
            bytes_read: 0,
            finished: false,
        }
    }

    pub fn bytes_read(&self) -> u64 { self.bytes_read }

    pub fn is_finished(&self) -> bool { self.finished }

    /// Release the inner reader. The handler is dropped without firing when
    /// end-of-stream was not reached.
    pub fn into_inner(self) -> R { self.inner }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished {
            return Ok(0);
        }

        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.finished = true;
            self.handler.complete(self.bytes_read);
        } else {
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}
