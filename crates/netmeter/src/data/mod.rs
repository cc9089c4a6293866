//! Immutable data types describing intercepted exchanges.
//!
//! Descriptors are built once per exchange at interception time and handed
//! to [`EventReporter`](crate::EventReporter) implementations. Only
//! [`ResponseDescriptor::measured_size`] is written after construction, and
//! only by the completion of a counted body.

pub mod descriptor;
pub mod options;
pub mod time;

pub use descriptor::{RequestDescriptor, ResponseDescriptor};
pub use options::InterceptorOptions;
pub use time::TimeInterval;
