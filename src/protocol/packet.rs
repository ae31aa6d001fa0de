//! Decoded packet value and the layer unions it is assembled from.

use std::net::IpAddr;

use bytes::Bytes;

use super::ethernet::EthernetHeader;
use super::ipv4::Ipv4Header;
use super::ipv6::Ipv6Header;
use super::tcp::{TcpHeader, IP_PROTO_TCP};
use super::udp::{UdpHeader, IP_PROTO_UDP};

/// Transport protocol selected by an IPv4 protocol or IPv6 next-header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpNextProtocol {
    Tcp,
    Udp,
    /// No transport decoder; the packet stops at the network layer.
    Other(u8),
}

impl IpNextProtocol {
    pub fn classify(value: u8) -> Self {
        match value {
            IP_PROTO_TCP => IpNextProtocol::Tcp,
            IP_PROTO_UDP => IpNextProtocol::Udp,
            other => IpNextProtocol::Other(other),
        }
    }
}

/// Network layer of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkHeader {
    Ipv4(Ipv4Header),
    Ipv6(Ipv6Header),
}

impl NetworkHeader {
    pub fn source(&self) -> IpAddr {
        match self {
            NetworkHeader::Ipv4(h) => IpAddr::V4(h.source),
            NetworkHeader::Ipv6(h) => IpAddr::V6(h.source),
        }
    }

    pub fn destination(&self) -> IpAddr {
        match self {
            NetworkHeader::Ipv4(h) => IpAddr::V4(h.destination),
            NetworkHeader::Ipv6(h) => IpAddr::V6(h.destination),
        }
    }

    /// IPv4 protocol number or IPv6 next-header value.
    pub fn protocol(&self) -> u8 {
        match self {
            NetworkHeader::Ipv4(h) => h.protocol,
            NetworkHeader::Ipv6(h) => h.next_header,
        }
    }

    pub fn next_protocol(&self) -> IpNextProtocol {
        IpNextProtocol::classify(self.protocol())
    }

    pub fn header_len(&self) -> usize {
        match self {
            NetworkHeader::Ipv4(h) => h.header_len(),
            NetworkHeader::Ipv6(h) => h.header_len(),
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            NetworkHeader::Ipv4(_) => 4,
            NetworkHeader::Ipv6(_) => 6,
        }
    }
}

/// Transport layer of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportHeader {
    Tcp(TcpHeader),
    Udp(UdpHeader),
}

impl TransportHeader {
    pub fn source_port(&self) -> u16 {
        match self {
            TransportHeader::Tcp(h) => h.source_port,
            TransportHeader::Udp(h) => h.source_port,
        }
    }

    pub fn destination_port(&self) -> u16 {
        match self {
            TransportHeader::Tcp(h) => h.destination_port,
            TransportHeader::Udp(h) => h.destination_port,
        }
    }

    pub fn header_len(&self) -> usize {
        match self {
            TransportHeader::Tcp(h) => h.header_len(),
            TransportHeader::Udp(h) => h.header_len(),
        }
    }
}

/// One decoded packet.
///
/// `network` and `transport` are `None` when decoding stopped before reaching
/// them because the layer below carried something without a decoder (ARP,
/// ICMP, an 802.3 frame). `link` is `None` for captures whose link type has
/// no Ethernet header, such as raw IP. `raw_payload` is whatever follows the
/// deepest decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPacket {
    pub link: Option<EthernetHeader>,
    pub network: Option<NetworkHeader>,
    pub transport: Option<TransportHeader>,
    pub raw_payload: Bytes,
}

impl ParsedPacket {
    pub fn ip(&self) -> Option<&NetworkHeader> {
        self.network.as_ref()
    }

    pub fn ipv4(&self) -> Option<&Ipv4Header> {
        match &self.network {
            Some(NetworkHeader::Ipv4(h)) => Some(h),
            _ => None,
        }
    }

    pub fn ipv6(&self) -> Option<&Ipv6Header> {
        match &self.network {
            Some(NetworkHeader::Ipv6(h)) => Some(h),
            _ => None,
        }
    }

    pub fn tcp(&self) -> Option<&TcpHeader> {
        match &self.transport {
            Some(TransportHeader::Tcp(h)) => Some(h),
            _ => None,
        }
    }

    pub fn udp(&self) -> Option<&UdpHeader> {
        match &self.transport {
            Some(TransportHeader::Udp(h)) => Some(h),
            _ => None,
        }
    }

    pub fn has_ipv4(&self) -> bool {
        self.ipv4().is_some()
    }

    pub fn has_ipv6(&self) -> bool {
        self.ipv6().is_some()
    }

    pub fn has_tcp(&self) -> bool {
        self.tcp().is_some()
    }

    pub fn has_udp(&self) -> bool {
        self.udp().is_some()
    }

    /// 4 or 6, or 0 when there is no network layer.
    pub fn ip_version(&self) -> u8 {
        self.network.as_ref().map_or(0, NetworkHeader::version)
    }

    pub fn payload(&self) -> &[u8] {
        &self.raw_payload
    }

    pub fn payload_len(&self) -> usize {
        self.raw_payload.len()
    }
}
