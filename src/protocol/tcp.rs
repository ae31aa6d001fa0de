//! TCP header decoder.

use std::fmt;

use etherparse::{TcpHeaderSlice, TcpOptions};

use super::slice;
use crate::error::ProtocolError;

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;

/// Fixed portion of the header (data offset 5).
pub const MIN_HEADER_LEN: usize = 20;

/// Smallest legal data offset, in 32-bit words.
pub const MIN_DATA_OFFSET: u8 = 5;

/// TCP flag bits as they sit in the low 9 bits of bytes 12-13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TcpFlags(pub u16);

impl TcpFlags {
    pub const FIN: u16 = 0x001;
    pub const SYN: u16 = 0x002;
    pub const RST: u16 = 0x004;
    pub const PSH: u16 = 0x008;
    pub const ACK: u16 = 0x010;
    pub const URG: u16 = 0x020;
    pub const ECE: u16 = 0x040;
    pub const CWR: u16 = 0x080;
    pub const NS: u16 = 0x100;

    #[inline]
    pub fn contains(&self, bits: u16) -> bool {
        self.0 & bits == bits
    }

    pub fn set(&mut self, bits: u16, value: bool) {
        if value {
            self.0 |= bits;
        } else {
            self.0 &= !bits;
        }
    }

    pub fn bits(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TcpFlags {
    /// Wireshark-style flag list, e.g. `SYN,ACK`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u16, &str); 9] = [
            (TcpFlags::NS, "NS"),
            (TcpFlags::CWR, "CWR"),
            (TcpFlags::ECE, "ECE"),
            (TcpFlags::URG, "URG"),
            (TcpFlags::ACK, "ACK"),
            (TcpFlags::PSH, "PSH"),
            (TcpFlags::RST, "RST"),
            (TcpFlags::SYN, "SYN"),
            (TcpFlags::FIN, "FIN"),
        ];
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Decoded TCP header. Options are skipped, not decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TcpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    /// Header length in 32-bit words.
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

impl TcpHeader {
    pub fn new(
        source_port: u16,
        destination_port: u16,
        sequence_number: u32,
        acknowledgment_number: u32,
        window_size: u16,
    ) -> Self {
        Self {
            source_port,
            destination_port,
            sequence_number,
            acknowledgment_number,
            data_offset: MIN_DATA_OFFSET,
            flags: TcpFlags::default(),
            window_size,
            checksum: 0,
            urgent_pointer: 0,
        }
    }

    /// Decode the header at the start of `data`.
    ///
    /// Fails when the fixed 20 bytes are missing, the data offset is below 5,
    /// or the declared header (options included) overruns the buffer.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let tcp = TcpHeaderSlice::from_slice(data).map_err(slice::tcp)?;

        let mut flags = TcpFlags::default();
        flags.set(TcpFlags::FIN, tcp.fin());
        flags.set(TcpFlags::SYN, tcp.syn());
        flags.set(TcpFlags::RST, tcp.rst());
        flags.set(TcpFlags::PSH, tcp.psh());
        flags.set(TcpFlags::ACK, tcp.ack());
        flags.set(TcpFlags::URG, tcp.urg());
        flags.set(TcpFlags::ECE, tcp.ece());
        flags.set(TcpFlags::CWR, tcp.cwr());
        flags.set(TcpFlags::NS, tcp.ns());

        Ok(Self {
            source_port: tcp.source_port(),
            destination_port: tcp.destination_port(),
            sequence_number: tcp.sequence_number(),
            acknowledgment_number: tcp.acknowledgment_number(),
            data_offset: tcp.data_offset(),
            flags,
            window_size: tcp.window_size(),
            checksum: tcp.checksum(),
            urgent_pointer: tcp.urgent_pointer(),
        })
    }

    /// Header length in bytes, options included.
    pub fn header_len(&self) -> usize {
        self.data_offset as usize * 4
    }

    pub fn fin(&self) -> bool {
        self.flags.contains(TcpFlags::FIN)
    }

    pub fn syn(&self) -> bool {
        self.flags.contains(TcpFlags::SYN)
    }

    pub fn rst(&self) -> bool {
        self.flags.contains(TcpFlags::RST)
    }

    pub fn psh(&self) -> bool {
        self.flags.contains(TcpFlags::PSH)
    }

    pub fn ack(&self) -> bool {
        self.flags.contains(TcpFlags::ACK)
    }

    pub fn urg(&self) -> bool {
        self.flags.contains(TcpFlags::URG)
    }

    pub fn ece(&self) -> bool {
        self.flags.contains(TcpFlags::ECE)
    }

    pub fn cwr(&self) -> bool {
        self.flags.contains(TcpFlags::CWR)
    }

    pub fn ns(&self) -> bool {
        self.flags.contains(TcpFlags::NS)
    }

    /// The equivalent etherparse header with zero-filled option space.
    pub fn to_etherparse(&self) -> etherparse::TcpHeader {
        let options_len = self.header_len().saturating_sub(MIN_HEADER_LEN).min(40);

        etherparse::TcpHeader {
            source_port: self.source_port,
            destination_port: self.destination_port,
            sequence_number: self.sequence_number,
            acknowledgment_number: self.acknowledgment_number,
            ns: self.ns(),
            fin: self.fin(),
            syn: self.syn(),
            rst: self.rst(),
            psh: self.psh(),
            ack: self.ack(),
            urg: self.urg(),
            ece: self.ece(),
            cwr: self.cwr(),
            window_size: self.window_size,
            checksum: self.checksum,
            urgent_pointer: self.urgent_pointer,
            options: TcpOptions::try_from_slice(&[0u8; 40][..options_len]).unwrap_or_default(),
        }
    }

    /// Serialize the header; option space is zero-filled.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_etherparse().to_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len());
        self.write_to(&mut out);
        out
    }
}
