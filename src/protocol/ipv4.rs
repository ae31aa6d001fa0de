//! IPv4 header decoder.

use std::net::Ipv4Addr;

use etherparse::{IpFragOffset, IpNumber, Ipv4Dscp, Ipv4Ecn, Ipv4HeaderSlice, Ipv4Options};

use super::slice;
use crate::error::ProtocolError;

/// Link type for captures holding bare IPv4 packets.
pub const LINKTYPE_IPV4: u32 = 228;

/// Fixed portion of the header (IHL 5).
pub const MIN_HEADER_LEN: usize = 20;

/// Smallest legal IHL value, in 32-bit words.
pub const MIN_IHL: u8 = 5;

/// Decoded IPv4 header. Options are skipped, not decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Header {
    pub version: u8,
    /// Header length in 32-bit words.
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub dont_fragment: bool,
    pub more_fragments: bool,
    /// Fragment offset in 8-byte units (13 bits).
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    /// Whether `checksum` matches the header bytes it was decoded from.
    pub checksum_valid: bool,
}

impl Ipv4Header {
    /// Build an option-less header carrying no payload yet.
    ///
    /// The checksum is filled in; call [`Ipv4Header::set_payload_len`] once
    /// the payload size is known.
    pub fn new(source: [u8; 4], destination: [u8; 4], ttl: u8, protocol: u8) -> Self {
        let mut header = Self {
            version: 4,
            ihl: MIN_IHL,
            dscp: 0,
            ecn: 0,
            total_length: MIN_HEADER_LEN as u16,
            identification: 0,
            dont_fragment: false,
            more_fragments: false,
            fragment_offset: 0,
            ttl,
            protocol,
            checksum: 0,
            source: Ipv4Addr::from(source),
            destination: Ipv4Addr::from(destination),
            checksum_valid: true,
        };
        header.checksum = header.compute_checksum();
        header
    }

    /// Decode the header at the start of `data`.
    ///
    /// Fails on a version other than 4, an IHL below 5, or a buffer shorter
    /// than the declared header length. The total length field is not
    /// checked here; see [`Ipv4Header::payload_end`].
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let ip = Ipv4HeaderSlice::from_slice(data).map_err(slice::ipv4)?;
        let checksum = ip.header_checksum();

        Ok(Self {
            version: ip.version(),
            ihl: ip.ihl(),
            dscp: ip.dcp().value(),
            ecn: ip.ecn().value(),
            total_length: ip.total_len(),
            identification: ip.identification(),
            dont_fragment: ip.dont_fragment(),
            more_fragments: ip.more_fragments(),
            fragment_offset: ip.fragments_offset().value(),
            ttl: ip.ttl(),
            protocol: ip.protocol().0,
            checksum,
            source: ip.source_addr(),
            destination: ip.destination_addr(),
            checksum_valid: ip.to_header().calc_header_checksum() == checksum,
        })
    }

    /// Header length in bytes, options included.
    pub fn header_len(&self) -> usize {
        self.ihl as usize * 4
    }

    /// True for any piece of a fragmented datagram, first piece included.
    pub fn is_fragmented(&self) -> bool {
        self.more_fragments || self.fragment_offset != 0
    }

    /// End of the IP payload within a buffer of `available` bytes.
    ///
    /// Trims link-layer padding when the total length is consistent;
    /// otherwise keeps everything that was captured.
    pub fn payload_end(&self, available: usize) -> usize {
        let total = self.total_length as usize;
        if total >= self.header_len() && total <= available {
            total
        } else {
            available
        }
    }

    /// Update the total length for a payload of `len` bytes and refresh the checksum.
    pub fn set_payload_len(&mut self, len: usize) {
        self.total_length = (self.header_len() + len) as u16;
        self.checksum = self.compute_checksum();
        self.checksum_valid = true;
    }

    /// Checksum over the serialized header with the checksum field zeroed.
    pub fn compute_checksum(&self) -> u16 {
        self.to_etherparse().calc_header_checksum()
    }

    /// The equivalent etherparse header; option space is zero-filled and
    /// out-of-range field values are written as zero.
    pub fn to_etherparse(&self) -> etherparse::Ipv4Header {
        let options_len = self.header_len().saturating_sub(MIN_HEADER_LEN);

        etherparse::Ipv4Header {
            dscp: Ipv4Dscp::try_new(self.dscp).unwrap_or(Ipv4Dscp::ZERO),
            ecn: Ipv4Ecn::try_new(self.ecn).unwrap_or(Ipv4Ecn::ZERO),
            total_len: self.total_length,
            identification: self.identification,
            dont_fragment: self.dont_fragment,
            more_fragments: self.more_fragments,
            fragment_offset: IpFragOffset::try_new(self.fragment_offset)
                .unwrap_or(IpFragOffset::ZERO),
            time_to_live: self.ttl,
            protocol: IpNumber(self.protocol),
            header_checksum: self.checksum,
            source: self.source.octets(),
            destination: self.destination.octets(),
            options: Ipv4Options::try_from(&[0u8; 40][..options_len.min(40)])
                .unwrap_or_default(),
        }
    }

    /// Serialize the header as is, stored checksum included.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_etherparse().to_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len());
        self.write_to(&mut out);
        out
    }
}
