//! IPv6 fixed header decoder.
//!
//! Only the 40-byte base header is decoded. The next-header value feeds
//! transport dispatch directly when it names TCP or UDP; extension headers
//! are not unrolled.

use std::net::Ipv6Addr;

use etherparse::{IpNumber, Ipv6FlowLabel, Ipv6HeaderSlice};

use super::slice;
use crate::error::ProtocolError;

/// Link type for captures holding bare IPv6 packets.
pub const LINKTYPE_IPV6: u32 = 229;

/// Fixed IPv6 header length.
pub const HEADER_LEN: usize = 40;

/// IPv6 Next Header values.
pub mod next_header {
    pub const HOP_BY_HOP: u8 = 0;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const ESP: u8 = 50;
    pub const AH: u8 = 51;
    pub const ICMPV6: u8 = 58;
    pub const NO_NEXT_HEADER: u8 = 59;
    pub const DESTINATION: u8 = 60;
    pub const MOBILITY: u8 = 135;
}

/// Check if a next header value is an extension header.
pub fn is_extension_header(nh: u8) -> bool {
    matches!(
        nh,
        next_header::HOP_BY_HOP
            | next_header::ROUTING
            | next_header::FRAGMENT
            | next_header::DESTINATION
            | next_header::AH
            | next_header::MOBILITY
    )
}

/// Decoded IPv6 base header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Header {
    pub version: u8,
    pub traffic_class: u8,
    /// 20-bit flow label.
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
}

impl Ipv6Header {
    pub fn new(source: [u8; 16], destination: [u8; 16], hop_limit: u8, next_header: u8) -> Self {
        Self {
            version: 6,
            traffic_class: 0,
            flow_label: 0,
            payload_length: 0,
            next_header,
            hop_limit,
            source: Ipv6Addr::from(source),
            destination: Ipv6Addr::from(destination),
        }
    }

    /// Decode the base header at the start of `data`.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let ip = Ipv6HeaderSlice::from_slice(data).map_err(slice::ipv6)?;

        Ok(Self {
            version: 6,
            traffic_class: ip.traffic_class(),
            flow_label: ip.flow_label().value(),
            payload_length: ip.payload_length(),
            next_header: ip.next_header().0,
            hop_limit: ip.hop_limit(),
            source: ip.source_addr(),
            destination: ip.destination_addr(),
        })
    }

    pub fn header_len(&self) -> usize {
        HEADER_LEN
    }

    /// End of the IPv6 payload within a buffer of `available` bytes.
    ///
    /// A zero payload length (jumbogram) or one that overruns the capture
    /// keeps the remainder.
    pub fn payload_end(&self, available: usize) -> usize {
        let end = HEADER_LEN + self.payload_length as usize;
        if self.payload_length != 0 && end <= available {
            end
        } else {
            available
        }
    }

    pub fn set_payload_len(&mut self, len: usize) {
        self.payload_length = len as u16;
    }

    /// The equivalent etherparse header; an out-of-range flow label is written as zero.
    pub fn to_etherparse(&self) -> etherparse::Ipv6Header {
        etherparse::Ipv6Header {
            traffic_class: self.traffic_class,
            flow_label: Ipv6FlowLabel::try_new(self.flow_label).unwrap_or(Ipv6FlowLabel::ZERO),
            payload_length: self.payload_length,
            next_header: IpNumber(self.next_header),
            hop_limit: self.hop_limit,
            source: self.source.octets(),
            destination: self.destination.octets(),
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_etherparse().to_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        self.write_to(&mut out);
        out
    }
}
