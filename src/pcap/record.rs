//! Raw capture record representation.

use std::time::Duration;

use bytes::Bytes;

/// Unit of a record's sub-second timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampResolution {
    Microsecond,
    Nanosecond,
}

impl TimestampResolution {
    /// Fraction units per second.
    pub fn units_per_second(&self) -> u32 {
        match self {
            TimestampResolution::Microsecond => 1_000_000,
            TimestampResolution::Nanosecond => 1_000_000_000,
        }
    }
}

/// Capture timestamp, relative to the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub seconds: u32,
    /// Sub-second part in `resolution` units.
    pub fraction: u32,
    pub resolution: TimestampResolution,
}

impl Timestamp {
    pub fn new(seconds: u32, fraction: u32, resolution: TimestampResolution) -> Self {
        Self {
            seconds,
            fraction,
            resolution,
        }
    }

    /// Nanoseconds since the epoch.
    pub fn as_nanos(&self) -> u64 {
        let frac_nanos = match self.resolution {
            TimestampResolution::Microsecond => self.fraction as u64 * 1_000,
            TimestampResolution::Nanosecond => self.fraction as u64,
        };
        self.seconds as u64 * 1_000_000_000 + frac_nanos
    }

    /// Microseconds since the epoch; nanosecond stamps are truncated.
    pub fn as_micros(&self) -> u64 {
        self.as_nanos() / 1_000
    }

    pub fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.as_nanos())
    }
}

/// A raw record from a PCAP file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Frame number (1-indexed).
    pub frame_number: u64,

    pub timestamp: Timestamp,

    /// Bytes stored in the file for this record.
    pub captured_len: u32,

    /// Original length on the wire.
    pub original_len: u32,

    /// Link layer type from the global header (e.g., 1 = Ethernet).
    pub link_type: u32,

    /// Record body, exactly `captured_len` bytes.
    pub data: Bytes,
}

impl RawRecord {
    /// Check if the packet was cut short during capture.
    pub fn is_truncated(&self) -> bool {
        self.captured_len < self.original_len
    }
}
