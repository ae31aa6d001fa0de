//! PCAP file reading module.
//!
//! This module handles reading classic PCAP files (microsecond and
//! nanosecond variants, either byte order) through `pcap-parser` and
//! exposing raw records and decoded packets. PCAPNG is not supported.

mod header;
mod packets;
mod reader;
mod record;

pub use header::{ByteOrder, PcapFormat, PcapHeader, GLOBAL_HEADER_LEN, RECORD_HEADER_LEN};
pub use packets::{decode_record, PacketIter};
pub use reader::PcapReader;
pub use record::{RawRecord, Timestamp, TimestampResolution};
