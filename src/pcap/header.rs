//! PCAP global header.

use pcap_parser::PcapHeader as LegacyPcapHeader;

use super::record::TimestampResolution;

/// Global header length.
pub const GLOBAL_HEADER_LEN: usize = 24;

/// Per-record header length.
pub const RECORD_HEADER_LEN: usize = 16;

/// Byte order of every integer in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Container variant selected by the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcapFormat {
    pub byte_order: ByteOrder,
    pub resolution: TimestampResolution,
}

impl PcapFormat {
    /// Match the first four bytes of a file against the accepted magics.
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        let (byte_order, resolution) = match magic {
            // PCAP magic (little endian)
            [0xd4, 0xc3, 0xb2, 0xa1] => (ByteOrder::Little, TimestampResolution::Microsecond),
            // PCAP magic (big endian)
            [0xa1, 0xb2, 0xc3, 0xd4] => (ByteOrder::Big, TimestampResolution::Microsecond),
            // PCAP nanosecond (little endian)
            [0x4d, 0x3c, 0xb2, 0xa1] => (ByteOrder::Little, TimestampResolution::Nanosecond),
            // PCAP nanosecond (big endian)
            [0xa1, 0xb2, 0x3c, 0x4d] => (ByteOrder::Big, TimestampResolution::Nanosecond),
            _ => return None,
        };
        Some(Self {
            byte_order,
            resolution,
        })
    }
}

/// Decoded 24-byte global header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcapHeader {
    pub format: PcapFormat,
    pub version_major: u16,
    pub version_minor: u16,
    /// GMT offset in seconds; in practice always 0.
    pub thiszone: i32,
    pub sigfigs: u32,
    /// Maximum captured length per record; 0 means unlimited.
    pub snaplen: u32,
    /// Link-layer type of every record (1 = Ethernet, 101 = raw IP).
    pub link_type: u32,
}

impl PcapHeader {
    /// Combine the format chosen from the magic with the parsed header fields.
    pub fn from_legacy(format: PcapFormat, header: &LegacyPcapHeader) -> Self {
        Self {
            format,
            version_major: header.version_major,
            version_minor: header.version_minor,
            thiszone: header.thiszone,
            sigfigs: header.sigfigs,
            snaplen: header.snaplen,
            link_type: header.network.0 as u32,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.format.byte_order
    }

    pub fn resolution(&self) -> TimestampResolution {
        self.format.resolution
    }

    /// Whether `captured` bytes fit under the snapshot length.
    pub fn within_snaplen(&self, captured: u32) -> bool {
        self.snaplen == 0 || captured <= self.snaplen
    }
}
