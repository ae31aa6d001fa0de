//! Decoded packet sequence over a capture file.

use std::io::Read;
use std::iter::FusedIterator;

use super::header::PcapHeader;
use super::reader::PcapReader;
use super::record::RawRecord;
use crate::config::{ErrorPolicy, ReaderConfig};
use crate::error::Error;
use crate::protocol::{decode_link, ParsedPacket};

/// Decode one record's bytes by its link type, tagging a failure with its
/// frame number.
pub fn decode_record(record: &RawRecord) -> Result<ParsedPacket, Error> {
    decode_link(record.link_type, record.data.clone()).map_err(|source| Error::Frame {
        frame: record.frame_number,
        source,
    })
}

/// Iterator of decoded packets, one per record.
///
/// Owns the underlying reader; dropping the iterator closes the source.
/// Once an error ends the sequence it stays ended, and every packet
/// already yielded remains valid.
pub struct PacketIter<R: Read> {
    reader: PcapReader<R>,
    policy: ErrorPolicy,
    done: bool,
}

impl<R: Read> PacketIter<R> {
    pub fn new(reader: PcapReader<R>, config: &ReaderConfig) -> Self {
        Self {
            reader,
            policy: config.on_decode_error,
            done: false,
        }
    }

    pub fn header(&self) -> &PcapHeader {
        self.reader.header()
    }

    /// Number of records read so far, skipped ones included.
    pub fn frame_count(&self) -> u64 {
        self.reader.frame_count()
    }

    /// Give back the record reader.
    pub fn into_inner(self) -> PcapReader<R> {
        self.reader
    }
}

impl<R: Read> Iterator for PacketIter<R> {
    type Item = Result<ParsedPacket, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let record = match self.reader.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    if e.is_truncation() {
                        tracing::warn!("Stopping at truncated record: {}", e);
                    }
                    self.done = true;
                    return Some(Err(e));
                }
            };

            match decode_record(&record) {
                Ok(packet) => return Some(Ok(packet)),
                Err(e) => match self.policy {
                    ErrorPolicy::Stop => {
                        self.done = true;
                        return Some(Err(e));
                    }
                    ErrorPolicy::Skip => {
                        tracing::warn!("Skipping undecodable record: {}", e);
                    }
                },
            }
        }
        None
    }
}

impl<R: Read> FusedIterator for PacketIter<R> {}
