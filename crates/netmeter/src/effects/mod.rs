//! I/O-facing pieces: body decorators, the interpreter, reporters and the
//! HTTP client seam.

pub mod body;
pub mod client;
pub mod counting;
pub mod interceptor;
pub mod interpreter;
pub mod reporter;

pub use body::{BodyMetadata, BoxStream, ByteStream, ResponseBody};
pub use client::HttpClient;
#[cfg(feature = "reqwest")]
pub use client::ReqwestClient;
pub use counting::{CountingReader, CountingStream};
pub use interceptor::MeteredClient;
pub use interpreter::ExchangeInterpreter;
pub use reporter::{EventReporter, TracingReporter};
