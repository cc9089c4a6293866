//! Pure helpers: header interpretation and one-shot completion.

pub mod completion;
pub mod headers;

pub use completion::CompletionHandler;
