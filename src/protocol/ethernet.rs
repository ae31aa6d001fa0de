//! Ethernet II link layer decoder.

use etherparse::{Ethernet2Header, Ethernet2HeaderSlice};

use super::slice;
use crate::error::ProtocolError;
use crate::format::MacAddr;

/// Link type constant for Ethernet (PCAP `network` field).
pub const LINKTYPE_ETHERNET: u32 = 1;

/// Fixed Ethernet II header length (no VLAN tag, no FCS).
pub const HEADER_LEN: usize = 14;

/// Largest value of the type/length field that is an IEEE 802.3 length.
pub const MAX_802_3_LENGTH: u16 = 1500;

/// Smallest value of the type/length field that is an EtherType.
pub const MIN_ETHERTYPE: u16 = 0x0600;

/// Well-known EtherType values (IEEE 802).
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const WAKE_ON_LAN: u16 = 0x0842;
    pub const RARP: u16 = 0x8035;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const MPLS: u16 = 0x8847;
    pub const PPPOE_DISCOVERY: u16 = 0x8863;
    pub const PPPOE_SESSION: u16 = 0x8864;
    pub const EAP_OVER_LAN: u16 = 0x888E;
    pub const QINQ: u16 = 0x88A8;
    pub const LLDP: u16 = 0x88CC;
}

/// Meaning of the 16-bit type/length field.
///
/// Only IPv4 and IPv6 have a network decoder; everything else ends the
/// decode at the link layer without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtherType {
    Ipv4,
    Ipv6,
    /// IEEE 802.3 frame; the field is the LLC payload length.
    Length(u16),
    /// Any other EtherType, including the undefined 1501..=1535 range.
    Other(u16),
}

impl EtherType {
    pub fn classify(value: u16) -> Self {
        match value {
            0..=MAX_802_3_LENGTH => EtherType::Length(value),
            ethertype::IPV4 => EtherType::Ipv4,
            ethertype::IPV6 => EtherType::Ipv6,
            other => EtherType::Other(other),
        }
    }
}

/// Decoded Ethernet II header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthernetHeader {
    pub destination: MacAddr,
    pub source: MacAddr,
    /// Raw type/length field; see [`EthernetHeader::kind`].
    pub ether_type: u16,
}

impl EthernetHeader {
    pub fn new(source: [u8; 6], destination: [u8; 6], ether_type: u16) -> Self {
        Self {
            destination: MacAddr(destination),
            source: MacAddr(source),
            ether_type,
        }
    }

    /// Decode the header at the start of `data`.
    ///
    /// Fails only when fewer than 14 bytes are available. The payload
    /// starts at [`HEADER_LEN`].
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let eth =
            Ethernet2HeaderSlice::from_slice(data).map_err(|e| slice::too_short("Ethernet", e))?;

        Ok(Self {
            destination: MacAddr(eth.destination()),
            source: MacAddr(eth.source()),
            ether_type: eth.ether_type().0,
        })
    }

    pub fn kind(&self) -> EtherType {
        EtherType::classify(self.ether_type)
    }

    /// Offset of the first payload byte.
    pub fn header_len(&self) -> usize {
        HEADER_LEN
    }

    pub fn to_etherparse(&self) -> Ethernet2Header {
        Ethernet2Header {
            source: self.source.0,
            destination: self.destination.0,
            ether_type: etherparse::EtherType(self.ether_type),
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
