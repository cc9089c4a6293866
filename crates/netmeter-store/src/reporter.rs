use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use netmeter::{EventReporter, RequestDescriptor, ResponseDescriptor};

use crate::store::SpeedStore;

type NetworkTypeFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Configuration for [`SpeedReporter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedReporterOptions {
    /// Weight of a new sample in the exponential moving average, in `0..=1`.
    /// The first sample for a network type is stored as is.
    ///
    /// Default: 0.5
    pub smoothing: f32,

    /// Responses smaller than this are ignored; tiny bodies mostly measure
    /// latency rather than throughput.
    ///
    /// Default: 1
    pub min_bytes: u64,
}

impl Default for SpeedReporterOptions {
    fn default() -> Self {
        Self {
            smoothing: 0.5,
            min_bytes: 1,
        }
    }
}

impl SpeedReporterOptions {
    #[must_use]
    pub fn smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn min_bytes(mut self, min_bytes: u64) -> Self {
        self.min_bytes = min_bytes;
        self
    }
}

/// Event reporter that folds every measured response into the average speed
/// of the current network type.
///
/// Speed is `measured_size` over the response interval, in bytes per second.
/// Responses with a zero-length interval are skipped. Error events are only
/// logged.
pub struct SpeedReporter<S> {
    store:        S,
    network_type: NetworkTypeFn,
    options:      SpeedReporterOptions,
}

impl<S: SpeedStore> SpeedReporter<S> {
    /// Reporter that files every sample under a fixed network type.
    pub fn new(store: S, network_type: impl Into<String>) -> Self {
        let network_type = network_type.into();
        Self::with_network_type_fn(store, move || network_type.clone())
    }

    /// Reporter that asks `network_type` for the current label on every
    /// sample, for hosts that switch networks.
    pub fn with_network_type_fn(
        store: S,
        network_type: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            network_type: Arc::new(network_type),
            options: SpeedReporterOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SpeedReporterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &S { &self.store }

    /// Fold one response into the store. Returns the new average, or `None`
    /// when the response was not usable as a sample.
    pub fn record(&self, response: &ResponseDescriptor) -> Option<f32> {
        let bytes = response.measured_size();
        let elapsed_ms = response.time().duration_ms();
        if bytes < self.options.min_bytes || elapsed_ms == 0 {
            tracing::trace!(
                request_id = response.request_id(),
                bytes,
                elapsed_ms,
                "skipping speed sample"
            );
            return None;
        }

        let sample = (bytes as f64 * 1000.0 / elapsed_ms as f64) as f32;
        let network_type = (self.network_type)();
        let smoothing = self.options.smoothing;
        let mut fold = |previous: Option<f32>| match previous {
            Some(previous) => previous + smoothing * (sample - previous),
            None => sample,
        };
        let average = match self.store.update_average_speed(&network_type, &mut fold) {
            Ok(average) => average,
            Err(e) => {
                tracing::warn!(network_type = %network_type, error = %e, "failed to store average speed");
                return None;
            }
        };

        tracing::debug!(
            network_type = %network_type,
            sample_bps = sample,
            average_bps = average,
            "updated average speed"
        );
        Some(average)
    }
}

impl<S> fmt::Debug for SpeedReporter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeedReporter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: SpeedStore> EventReporter for SpeedReporter<S> {
    fn response_received(&self, _request: &RequestDescriptor, response: &ResponseDescriptor) {
        self.record(response);
    }

    fn response_input_stream_error(
        &self,
        request: &RequestDescriptor,
        _response: &ResponseDescriptor,
        error: &(dyn StdError + 'static),
    ) {
        tracing::debug!(request_id = request.id(), error = %error, "no speed sample: stream unavailable");
    }

    fn http_exchange_error(&self, request: &RequestDescriptor, error: &(dyn StdError + 'static)) {
        tracing::debug!(request_id = request.id(), error = %error, "no speed sample: exchange failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySpeedStore;
    use crate::error::Result;
    use netmeter::TimeInterval;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    /// Store that stalls inside every update to widen any race window.
    #[derive(Default)]
    struct SlowStore(MemorySpeedStore);

    impl SpeedStore for SlowStore {
        fn has_average_speed(&self, network_type: &str) -> bool { self.0.has_average_speed(network_type) }

        fn average_speed(&self, network_type: &str) -> f32 {
            thread::sleep(Duration::from_millis(20));
            self.0.average_speed(network_type)
        }

        fn set_average_speed(&self, network_type: &str, speed: f32) -> Result<()> {
            self.0.set_average_speed(network_type, speed)
        }

        fn update_average_speed(
            &self,
            network_type: &str,
            fold: &mut dyn FnMut(Option<f32>) -> f32,
        ) -> Result<f32> {
            self.0.update_average_speed(network_type, &mut |previous| {
                thread::sleep(Duration::from_millis(20));
                fold(previous)
            })
        }
    }

    fn response(bytes: u64, start: i64, end: i64) -> ResponseDescriptor {
        ResponseDescriptor::new(1, 200, None, TimeInterval::new(start, end)).with_measured_size(bytes)
    }

    #[test]
    fn test_first_sample_is_stored_as_is() {
        let reporter = SpeedReporter::new(MemorySpeedStore::new(), "wifi");

        assert_eq!(reporter.record(&response(2_000, 0, 1_000)), Some(2_000.0));
        assert_eq!(reporter.store().average_speed("wifi"), 2_000.0);
    }

    #[test]
    fn test_samples_are_smoothed() {
        let reporter = SpeedReporter::new(MemorySpeedStore::new(), "wifi");

        reporter.record(&response(1_000, 0, 1_000));
        let average = reporter.record(&response(3_000, 0, 1_000));

        assert_eq!(average, Some(2_000.0));
    }

    #[test]
    fn test_custom_smoothing() {
        let reporter = SpeedReporter::new(MemorySpeedStore::new(), "4g")
            .with_options(SpeedReporterOptions::default().smoothing(0.25));

        reporter.record(&response(1_000, 0, 1_000));
        let average = reporter.record(&response(5_000, 0, 1_000));

        assert_eq!(average, Some(2_000.0));
    }

    #[test]
    fn test_unusable_samples_are_skipped() {
        let reporter = SpeedReporter::new(MemorySpeedStore::new(), "wifi");

        assert_eq!(reporter.record(&response(0, 0, 1_000)), None);
        assert_eq!(reporter.record(&response(500, 100, 100)), None);
        assert!(!reporter.store().has_average_speed("wifi"));
    }

    #[test]
    fn test_network_type_fn_is_consulted_per_sample() {
        let current = Arc::new(Mutex::new("wifi".to_string()));
        let label = Arc::clone(&current);
        let reporter = SpeedReporter::with_network_type_fn(MemorySpeedStore::new(), move || {
            label.lock().unwrap().clone()
        });

        reporter.record(&response(1_000, 0, 500));
        *current.lock().unwrap() = "3g".to_string();
        reporter.record(&response(100, 0, 1_000));

        assert_eq!(reporter.store().average_speed("wifi"), 2_000.0);
        assert_eq!(reporter.store().average_speed("3g"), 100.0);
    }

    #[test]
    fn test_response_received_updates_store() {
        let reporter = SpeedReporter::new(MemorySpeedStore::new(), "wifi");
        let request = RequestDescriptor::new(1, "https://example.com/", "GET", None, None);

        reporter.response_received(&request, &response(4_096, 0, 2_000));

        assert_eq!(reporter.store().average_speed("wifi"), 2_048.0);
    }

    #[test]
    fn test_concurrent_samples_are_all_folded() {
        let reporter = SpeedReporter::new(SlowStore::default(), "wifi");
        reporter.store().set_average_speed("wifi", 0.0).unwrap();

        thread::scope(|scope| {
            scope.spawn(|| reporter.record(&response(1_000, 0, 1_000)));
            scope.spawn(|| reporter.record(&response(3_000, 0, 1_000)));
        });

        // 0 -> 500 -> 1750, or 0 -> 1500 -> 1250. A lost update leaves 500 or 1500.
        let average = reporter.store().average_speed("wifi");
        assert!(average == 1_750.0 || average == 1_250.0, "lost a sample: {average}");
    }
}
