//! Protocol decoding module.
//!
//! This module provides:
//! - Header decoders for Ethernet II, IPv4, IPv6, TCP and UDP
//! - [`ParsedPacket`] and the layer unions it is assembled from
//! - [`decode_frame`], the Ethernet → IP → TCP/UDP dispatch chain
//! - [`decode_ip`] and [`decode_link`] for captures without an Ethernet header
//!
//! Each layer either advances to the next, stops gracefully when it carries
//! something without a decoder, or fails with a [`ProtocolError`] when its
//! bytes break the format's own rules. A failure anywhere discards the whole
//! packet; no partially decoded result is ever returned.

pub mod ethernet;
pub mod ipv4;
pub mod ipv6;
pub mod packet;
pub mod slice;
pub mod tcp;
pub mod udp;

// Test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;

use bytes::Bytes;

use crate::error::ProtocolError;

pub use ethernet::{EtherType, EthernetHeader, LINKTYPE_ETHERNET};
pub use ipv4::{Ipv4Header, LINKTYPE_IPV4};
pub use ipv6::{Ipv6Header, LINKTYPE_IPV6};
pub use packet::{IpNextProtocol, NetworkHeader, ParsedPacket, TransportHeader};
pub use tcp::{TcpFlags, TcpHeader};
pub use udp::UdpHeader;

/// Link type for raw IP; the version nibble selects IPv4 or IPv6.
pub const LINKTYPE_RAW: u32 = 101;

/// Decode one record according to its capture's link type.
///
/// Link types without a decoder yield a packet with no layers whose payload
/// is the whole record.
pub fn decode_link(link_type: u32, data: Bytes) -> Result<ParsedPacket, ProtocolError> {
    match link_type {
        LINKTYPE_ETHERNET => decode_frame(data),
        LINKTYPE_RAW => decode_ip(data),
        LINKTYPE_IPV4 => decode_ipv4(None, data),
        LINKTYPE_IPV6 => decode_ipv6(None, data),
        other => {
            tracing::debug!("No decoder for link type {}", other);
            Ok(assemble(None, None, None, data))
        }
    }
}

/// Decode one Ethernet frame held in `data`.
///
/// The returned payload is a slice of `data`, so no bytes are copied.
pub fn decode_frame(data: Bytes) -> Result<ParsedPacket, ProtocolError> {
    let link = EthernetHeader::decode(&data)?;
    let payload = data.slice(link.header_len()..);

    // A bare header carries no network layer whatever its EtherType says
    if payload.is_empty() {
        return Ok(assemble(Some(link), None, None, payload));
    }

    match link.kind() {
        EtherType::Ipv4 => decode_ipv4(Some(link), payload),
        EtherType::Ipv6 => decode_ipv6(Some(link), payload),
        EtherType::Length(len) => {
            tracing::debug!("802.3 length field {}, stopping at link layer", len);
            Ok(assemble(Some(link), None, None, payload))
        }
        EtherType::Other(ether_type) => {
            tracing::debug!("No decoder for EtherType 0x{:04x}", ether_type);
            Ok(assemble(Some(link), None, None, payload))
        }
    }
}

/// Decode one IP packet that has no link-layer header.
///
/// The version nibble of the first byte picks IPv4 or IPv6; the packet's
/// `link` is always `None`.
pub fn decode_ip(data: Bytes) -> Result<ParsedPacket, ProtocolError> {
    let first = *data.first().ok_or(ProtocolError::PacketTooShort {
        protocol: "IP",
        needed: ipv4::MIN_HEADER_LEN,
        have: 0,
    })?;

    match first >> 4 {
        4 => decode_ipv4(None, data),
        6 => decode_ipv6(None, data),
        actual => Err(ProtocolError::InvalidVersion {
            protocol: "IP",
            expected: 4,
            actual,
        }),
    }
}

/// Decode one Ethernet frame, copying it out of a borrowed buffer.
pub fn parse_packet(data: &[u8]) -> Result<ParsedPacket, ProtocolError> {
    decode_frame(Bytes::copy_from_slice(data))
}

fn decode_ipv4(link: Option<EthernetHeader>, data: Bytes) -> Result<ParsedPacket, ProtocolError> {
    let header = Ipv4Header::decode(&data)?;
    let end = header.payload_end(data.len());
    let payload = data.slice(header.header_len()..end);
    let network = NetworkHeader::Ipv4(header);

    // Only the first fragment carries a transport header, and never a whole datagram
    if header.is_fragmented() {
        tracing::debug!(
            "IPv4 fragment (id {}, offset {}), skipping transport layer",
            header.identification,
            header.fragment_offset
        );
        return Ok(assemble(link, Some(network), None, payload));
    }

    decode_transport(link, network, payload)
}

fn decode_ipv6(link: Option<EthernetHeader>, data: Bytes) -> Result<ParsedPacket, ProtocolError> {
    let header = Ipv6Header::decode(&data)?;
    let end = header.payload_end(data.len());
    let payload = data.slice(header.header_len()..end);

    decode_transport(link, NetworkHeader::Ipv6(header), payload)
}

fn decode_transport(
    link: Option<EthernetHeader>,
    network: NetworkHeader,
    payload: Bytes,
) -> Result<ParsedPacket, ProtocolError> {
    let (transport, payload) = match network.next_protocol() {
        IpNextProtocol::Tcp => {
            let tcp = TcpHeader::decode(&payload)?;
            let rest = payload.slice(tcp.header_len()..);
            (Some(TransportHeader::Tcp(tcp)), rest)
        }
        IpNextProtocol::Udp => {
            let udp = UdpHeader::decode(&payload)?;
            let end = udp.payload_end(payload.len());
            let rest = payload.slice(udp.header_len()..end);
            (Some(TransportHeader::Udp(udp)), rest)
        }
        IpNextProtocol::Other(protocol) => {
            if matches!(network, NetworkHeader::Ipv6(_)) && ipv6::is_extension_header(protocol) {
                tracing::debug!("IPv6 extension header {} not unrolled", protocol);
            } else {
                tracing::debug!("No decoder for IP protocol {}", protocol);
            }
            (None, payload)
        }
    };

    Ok(assemble(link, Some(network), transport, payload))
}

fn assemble(
    link: Option<EthernetHeader>,
    network: Option<NetworkHeader>,
    transport: Option<TransportHeader>,
    raw_payload: Bytes,
) -> ParsedPacket {
    ParsedPacket {
        link,
        network,
        transport,
        raw_payload,
    }
}
