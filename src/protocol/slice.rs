//! Mapping from etherparse slice errors onto [`ProtocolError`].
//!
//! The header decoders borrow their bytes through etherparse's
//! `*HeaderSlice` types; this keeps the crate's error taxonomy independent
//! of etherparse's layered error enums.

use etherparse::err::LenError;

use crate::error::ProtocolError;

/// A header (or its declared length) ran past the end of the buffer.
pub fn too_short(protocol: &'static str, error: LenError) -> ProtocolError {
    ProtocolError::PacketTooShort {
        protocol,
        needed: error.required_len,
        have: error.len,
    }
}

pub fn ipv4(error: etherparse::err::ipv4::HeaderSliceError) -> ProtocolError {
    use etherparse::err::ipv4::{HeaderError, HeaderSliceError};

    match error {
        HeaderSliceError::Len(e) => too_short("IPv4", e),
        HeaderSliceError::Content(HeaderError::UnexpectedVersion { version_number }) => {
            ProtocolError::InvalidVersion {
                protocol: "IPv4",
                expected: 4,
                actual: version_number,
            }
        }
        HeaderSliceError::Content(HeaderError::HeaderLengthSmallerThanHeader { ihl }) => {
            ProtocolError::HeaderLengthTooSmall {
                protocol: "IPv4",
                words: ihl,
                minimum: super::ipv4::MIN_IHL,
            }
        }
    }
}

pub fn ipv6(error: etherparse::err::ipv6::HeaderSliceError) -> ProtocolError {
    use etherparse::err::ipv6::{HeaderError, HeaderSliceError};

    match error {
        HeaderSliceError::Len(e) => too_short("IPv6", e),
        HeaderSliceError::Content(HeaderError::UnexpectedVersion { version_number }) => {
            ProtocolError::InvalidVersion {
                protocol: "IPv6",
                expected: 6,
                actual: version_number,
            }
        }
    }
}

pub fn tcp(error: etherparse::err::tcp::HeaderSliceError) -> ProtocolError {
    use etherparse::err::tcp::{HeaderError, HeaderSliceError};

    match error {
        HeaderSliceError::Len(e) => too_short("TCP", e),
        HeaderSliceError::Content(HeaderError::DataOffsetTooSmall { data_offset }) => {
            ProtocolError::HeaderLengthTooSmall {
                protocol: "TCP",
                words: data_offset,
                minimum: super::tcp::MIN_DATA_OFFSET,
            }
        }
    }
}
