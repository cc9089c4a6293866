//! Average network speed bookkeeping fed by `netmeter` exchange events.
//!
//! A [`SpeedStore`] maps a network type label (for example `"wifi"` or
//! `"4g"`) to the running average download speed seen on it, in bytes per
//! second. [`SpeedReporter`] plugs into a `netmeter` client as its event
//! reporter and keeps the store up to date.

pub use self::error::{Error, Result};
pub use self::reporter::{SpeedReporter, SpeedReporterOptions};
pub use self::store::{FileSpeedStore, MemorySpeedStore, SpeedStore};

mod error;
mod reporter;
mod store;
