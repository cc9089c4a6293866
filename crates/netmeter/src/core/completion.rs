use std::fmt;

type Callback = Box<dyn FnOnce(u64) + Send>;

/// One-shot end-of-stream notification.
///
/// Holds the callback until the first [`complete`](Self::complete) call
/// consumes it; every later call is a no-op. Counting decorators call it on
/// every end-of-stream observation and rely on this to fire at most once.
pub struct CompletionHandler {
    callback: Option<Callback>,
}

impl CompletionHandler {
    pub fn new(callback: impl FnOnce(u64) + Send + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A handler that never reports anything.
    pub fn noop() -> Self { Self { callback: None } }

    /// Deliver the final byte count. Returns `true` only on the call that
    /// actually invoked the callback.
    pub fn complete(&mut self, bytes_read: u64) -> bool {
        match self.callback.take() {
            Some(callback) => {
                callback(bytes_read);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool { self.callback.is_some() }
}

impl fmt::Debug for CompletionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandler")
            .field("pending", &self.is_pending())
            .finish()
    }
}
