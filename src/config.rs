//! Reader configuration.

/// What a packet iterator does when one record fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Yield the error once, then end the sequence.
    #[default]
    Stop,
    /// Log the error, drop the record and keep going.
    Skip,
}

/// Configuration for reading capture files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Capacity of the buffered reader wrapped around the source (bytes).
    pub buffer_size: usize,
    /// Handling of per-record decode failures.
    ///
    /// A truncated record always ends the sequence, since nothing after it
    /// can be framed.
    pub on_decode_error: ErrorPolicy,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64 KB
            on_decode_error: ErrorPolicy::Stop,
        }
    }
}

impl ReaderConfig {
    /// Create with the defaults: a 64 KB buffer and [`ErrorPolicy::Stop`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read buffer capacity in bytes.
    ///
    /// Values below the reader's minimum are raised to it, and the buffer
    /// still grows on demand for records larger than the capacity.
    ///
    /// ```
    /// use pcapdecode::ReaderConfig;
    ///
    /// let config = ReaderConfig::new().with_buffer_size(4096);
    /// assert_eq!(config.buffer_size, 4096);
    /// ```
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Choose what a packet iterator does when a record fails to decode.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_decode_error = policy;
        self
    }

    /// Shorthand for [`ErrorPolicy::Skip`].
    pub fn skip_errors(self) -> Self {
        self.with_error_policy(ErrorPolicy::Skip)
    }
}
