//! UDP header decoder.

use etherparse::err::ValueTooBigError;
use etherparse::UdpHeaderSlice;

use super::slice;
use crate::error::ProtocolError;

/// IP protocol number for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// UDP header is always 8 bytes.
pub const HEADER_LEN: usize = 8;

/// Decoded UDP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UdpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    /// Header plus payload, in bytes.
    pub length: u16,
    pub checksum: u16,
}

impl UdpHeader {
    pub fn new(source_port: u16, destination_port: u16, length: u16, checksum: u16) -> Self {
        Self {
            source_port,
            destination_port,
            length,
            checksum,
        }
    }

    /// Decode the header at the start of `data`.
    ///
    /// Fails when fewer than 8 bytes are present or the length field claims
    /// more bytes than the buffer holds.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let udp = UdpHeaderSlice::from_slice(data).map_err(|e| slice::too_short("UDP", e))?;

        let length = udp.length();
        if length as usize > data.len() {
            return Err(ProtocolError::LengthExceedsBuffer {
                protocol: "UDP",
                field: "length",
                declared: length as usize,
                available: data.len(),
            });
        }

        Ok(Self {
            source_port: udp.source_port(),
            destination_port: udp.destination_port(),
            length,
            checksum: udp.checksum(),
        })
    }

    pub fn header_len(&self) -> usize {
        HEADER_LEN
    }

    /// Payload size implied by the length field.
    pub fn payload_len(&self) -> u16 {
        self.length.saturating_sub(HEADER_LEN as u16)
    }

    /// End of the datagram within a buffer of `available` bytes.
    pub fn payload_end(&self, available: usize) -> usize {
        let length = self.length as usize;
        if length >= HEADER_LEN && length <= available {
            length
        } else {
            available
        }
    }

    /// Compute and store the checksum for an IPv4 datagram (RFC 768).
    ///
    /// The length field must already describe `payload`. Fails when the
    /// payload cannot fit a UDP length field.
    pub fn calc_checksum_ipv4(
        &mut self,
        source: [u8; 4],
        destination: [u8; 4],
        payload: &[u8],
    ) -> Result<(), ValueTooBigError<usize>> {
        self.checksum = self
            .to_etherparse()
            .calc_checksum_ipv4_raw(source, destination, payload)?;
        Ok(())
    }

    pub fn to_etherparse(&self) -> etherparse::UdpHeader {
        etherparse::UdpHeader {
            source_port: self.source_port,
            destination_port: self.destination_port,
            length: self.length,
            checksum: self.checksum,
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
