/// Configuration for [`MeteredClient`](crate::MeteredClient).
///
/// # Examples
///
/// ```
/// use netmeter::InterceptorOptions;
///
/// let options = InterceptorOptions::default()
///     .enabled(true)
///     .first_request_id(100);
/// assert_eq!(options.first_request_id, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptorOptions {
    /// When `false`, requests pass straight through to the inner client and
    /// no events are reported.
    ///
    /// Default: true
    pub enabled: bool,

    /// Id assigned to the first intercepted exchange; later exchanges count
    /// up from here.
    ///
    /// Default: 1
    pub first_request_id: u32,
}

impl Default for InterceptorOptions {
    fn default() -> Self {
        Self {
            enabled:          true,
            first_request_id: 1,
        }
    }
}

impl InterceptorOptions {
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn first_request_id(mut self, first_request_id: u32) -> Self {
        self.first_request_id = first_request_id;
        self
    }
}
