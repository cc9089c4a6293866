//! HTTP exchange timing and byte counting without buffering bodies.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - `data` - Immutable descriptors and options
//! - `core` - Header interpretation and one-shot completion
//! - `effects` - Body decorators, interpreter, reporters and the client seam
//!
//! # Key Features
//!
//! - **Streaming measurement**: bodies without `Content-Length` are counted
//!   chunk by chunk as the consumer reads them, never buffered
//! - **Single report**: each exchange produces at most one
//!   [`EventReporter::response_received`] call, at end-of-stream for
//!   measured bodies
//! - **Composable**: [`MeteredClient`] is itself an [`HttpClient`], wrapping
//!   any other implementation
//! - **Mechanism-only**: what happens to the numbers is up to the reporter

mod core;
mod data;
mod effects;
mod error;

pub use self::core::CompletionHandler;
pub use self::data::{InterceptorOptions, RequestDescriptor, ResponseDescriptor, TimeInterval};
pub use self::effects::{
    BodyMetadata, BoxStream, ByteStream, CountingReader, CountingStream, EventReporter,
    ExchangeInterpreter, HttpClient, MeteredClient, ResponseBody, TracingReporter,
};

#[cfg(feature = "reqwest")]
pub use self::effects::ReqwestClient;

pub use self::error::{BoxError, Error, Result};
