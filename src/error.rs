//! Error types for pcapdecode.
//!
//! This module provides structured error types for all decoding operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`PcapError`] - Errors from PCAP container reading
//! - [`ProtocolError`] - Errors from header decoding
//!
//! A protocol that is well-formed but not supported (an unknown EtherType, an
//! IP protocol other than TCP/UDP) is never an error; it shows up as an absent
//! layer on [`ParsedPacket`](crate::ParsedPacket) instead.

use thiserror::Error;

/// Main error type for pcapdecode operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or framing the PCAP container
    #[error("PCAP error: {0}")]
    Pcap(#[from] PcapError),

    /// Error decoding a single packet buffer
    #[error("Protocol parse error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Decode failure of one record inside a capture file
    #[error("Frame {frame}: {source}")]
    Frame {
        /// 1-based frame number within the capture
        frame: u64,
        #[source]
        source: ProtocolError,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The file could not be opened or read.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Pcap(PcapError::FileNotFound { .. }))
    }

    /// The bytes violate a format's own structural rules.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::Protocol(_)
                | Error::Frame { .. }
                | Error::Pcap(PcapError::UnknownMagic { .. })
                | Error::Pcap(PcapError::InvalidFormat { .. })
        )
    }

    /// A PCAP record claims more bytes than the file (or snaplen) allows.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Error::Pcap(PcapError::TruncatedRecord { .. })
                | Error::Pcap(PcapError::SnaplenExceeded { .. })
        )
    }

    /// The underlying protocol error, if this is a decode failure.
    pub fn protocol_error(&self) -> Option<&ProtocolError> {
        match self {
            Error::Protocol(e) | Error::Frame { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Errors related to PCAP file reading.
#[derive(Error, Debug)]
pub enum PcapError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Magic number matches none of the accepted PCAP variants
    #[error("Unknown PCAP magic: 0x{magic:08x}")]
    UnknownMagic { magic: u32 },

    /// Invalid PCAP format
    #[error("Invalid PCAP format: {reason}")]
    InvalidFormat { reason: String },

    /// Record body shorter than its declared captured length
    #[error("Truncated record at frame {frame}: expected {expected} bytes, got {actual}")]
    TruncatedRecord {
        frame: u64,
        expected: usize,
        actual: usize,
    },

    /// Record captured length larger than the file's snapshot length
    #[error("Record at frame {frame} captured {captured} bytes, exceeding snaplen {snaplen}")]
    SnaplenExceeded {
        frame: u64,
        captured: u32,
        snaplen: u32,
    },
}

/// Errors related to header decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet too short for protocol header
    #[error("{protocol}: packet too short (need {needed} bytes, have {have})")]
    PacketTooShort {
        protocol: &'static str,
        needed: usize,
        have: usize,
    },

    /// Fixed version field holds the wrong value
    #[error("{protocol}: wrong version {actual} (expected {expected})")]
    InvalidVersion {
        protocol: &'static str,
        expected: u8,
        actual: u8,
    },

    /// Header length field below the format minimum (in 32-bit words)
    #[error("{protocol}: header length {words} below minimum {minimum}")]
    HeaderLengthTooSmall {
        protocol: &'static str,
        words: u8,
        minimum: u8,
    },

    /// A declared length field points past the end of the buffer
    #[error("{protocol}: {field} {declared} exceeds available {available} bytes")]
    LengthExceedsBuffer {
        protocol: &'static str,
        field: &'static str,
        declared: usize,
        available: usize,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
