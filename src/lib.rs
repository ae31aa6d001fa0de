//! pcapdecode - Decode Ethernet frames and PCAP captures into typed headers.
//!
//! This library decodes raw frames through an Ethernet → IPv4/IPv6 → TCP/UDP
//! chain and reads classic PCAP files lazily, one record at a time.
//!
//! # Example
//!
//! ```no_run
//! use pcapdecode::parse_pcap_file;
//!
//! fn main() -> pcapdecode::Result<()> {
//!     for packet in parse_pcap_file("capture.pcap")? {
//!         let packet = packet?;
//!         if let (Some(ip), Some(transport)) = (packet.ip(), packet.transport) {
//!             println!(
//!                 "{}:{} -> {}:{}",
//!                 ip.source(),
//!                 transport.source_port(),
//!                 ip.destination(),
//!                 transport.destination_port()
//!             );
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod pcap;
pub mod protocol;

use std::fs::File;
use std::path::{Path, PathBuf};

pub use config::{ErrorPolicy, ReaderConfig};
pub use error::{Error, PcapError, ProtocolError, Result};
pub use format::MacAddr;
pub use pcap::{decode_record, PacketIter, PcapHeader, PcapReader, RawRecord, Timestamp};
pub use protocol::{
    EtherType, EthernetHeader, IpNextProtocol, Ipv4Header, Ipv6Header, NetworkHeader,
    ParsedPacket, TcpFlags, TcpHeader, TransportHeader, UdpHeader,
};

/// Decode a single Ethernet frame.
///
/// Fails if any layer is structurally invalid; a protocol without a decoder
/// just leaves the deeper layers empty.
///
/// ```
/// let frame = [
///     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55,
///     0x08, 0x06, // ARP
/// ];
/// let packet = pcapdecode::parse_packet(&frame).unwrap();
/// assert!(packet.link.is_some());
/// assert!(packet.network.is_none());
/// ```
pub fn parse_packet(data: &[u8]) -> Result<ParsedPacket> {
    Ok(protocol::parse_packet(data)?)
}

/// Open a PCAP file and decode its records lazily.
///
/// The global header is read before returning, so an unreadable file or an
/// unknown magic number fails here rather than on the first iteration.
pub fn parse_pcap_file<P: AsRef<Path>>(path: P) -> Result<PacketIter<File>> {
    parse_pcap_file_with(path, &ReaderConfig::default())
}

/// Like [`parse_pcap_file`], with an explicit configuration.
pub fn parse_pcap_file_with<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
) -> Result<PacketIter<File>> {
    let reader = PcapReader::open_with(path, config)?;
    Ok(PacketIter::new(reader, config))
}

/// Input accepted by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseInput {
    /// Path to a PCAP file.
    Path(PathBuf),
    /// One raw Ethernet frame.
    Bytes(Vec<u8>),
}

impl From<&str> for ParseInput {
    fn from(path: &str) -> Self {
        ParseInput::Path(PathBuf::from(path))
    }
}

impl From<&Path> for ParseInput {
    fn from(path: &Path) -> Self {
        ParseInput::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ParseInput {
    fn from(path: PathBuf) -> Self {
        ParseInput::Path(path)
    }
}

impl From<&[u8]> for ParseInput {
    fn from(data: &[u8]) -> Self {
        ParseInput::Bytes(data.to_vec())
    }
}

impl From<Vec<u8>> for ParseInput {
    fn from(data: Vec<u8>) -> Self {
        ParseInput::Bytes(data)
    }
}

/// Result of [`parse`].
pub enum Parsed {
    Packets(PacketIter<File>),
    Packet(ParsedPacket),
}

impl std::fmt::Debug for Parsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parsed::Packets(iter) => f
                .debug_struct("Packets")
                .field("frames_read", &iter.frame_count())
                .finish(),
            Parsed::Packet(packet) => f.debug_tuple("Packet").field(packet).finish(),
        }
    }
}

/// Decode a file path as a capture and a byte buffer as one frame.
pub fn parse(input: impl Into<ParseInput>) -> Result<Parsed> {
    match input.into() {
        ParseInput::Path(path) => parse_pcap_file(path).map(Parsed::Packets),
        ParseInput::Bytes(data) => {
            protocol::decode_frame(data.into()).map(Parsed::Packet).map_err(Error::from)
        }
    }
}
