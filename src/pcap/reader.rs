//! PCAP file reader.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use bytes::Bytes;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError as PcapParserError};

use super::header::{PcapFormat, PcapHeader, GLOBAL_HEADER_LEN, RECORD_HEADER_LEN};
use super::record::{RawRecord, Timestamp};
use crate::config::ReaderConfig;
use crate::error::{Error, PcapError};
use crate::protocol::{LINKTYPE_ETHERNET, LINKTYPE_IPV4, LINKTYPE_IPV6, LINKTYPE_RAW};

/// Smallest buffer the reader runs with; room for the global header and a
/// record header.
const MIN_BUFFER_SIZE: usize = 2 * (GLOBAL_HEADER_LEN + RECORD_HEADER_LEN);

/// Lazy reader over the records of a classic PCAP stream.
///
/// The global header is read on construction. Records are then pulled one
/// at a time; only the buffered window of the file is held in memory, and
/// the buffer grows when a record does not fit. After end of input or the
/// first error the reader yields nothing more.
pub struct PcapReader<R: Read> {
    inner: LegacyPcapReader<BufReader<R>>,
    header: PcapHeader,
    capacity: usize,
    frame_number: u64,
    finished: bool,
}

/// Outcome of one pull from the block parser, detached from its buffer.
enum Step {
    Record {
        offset: usize,
        ts_sec: u32,
        ts_frac: u32,
        captured_len: u32,
        original_len: u32,
        data: Bytes,
    },
    Skip(usize),
    End,
    Refill,
    Grow,
    Failed(String),
}

impl PcapReader<File> {
    /// Open a PCAP file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::open_with(path, &ReaderConfig::default())
    }

    /// Open a PCAP file with an explicit configuration.
    pub fn open_with<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Pcap(PcapError::FileNotFound {
                path: path.display().to_string(),
            }),
            _ => Error::Io(e),
        })?;

        tracing::debug!("Opened {}", path.display());
        Self::with_config(file, config)
    }
}

impl<R: Read> PcapReader<R> {
    /// Wrap a byte source and read its global header.
    pub fn new(reader: R) -> Result<Self, Error> {
        Self::with_config(reader, &ReaderConfig::default())
    }

    pub fn with_config(reader: R, config: &ReaderConfig) -> Result<Self, Error> {
        let capacity = config.buffer_size.max(MIN_BUFFER_SIZE);
        let mut buf_reader = BufReader::with_capacity(capacity, reader);

        // Peek at magic number to determine PCAP format
        let peeked = buf_reader.fill_buf()?;
        let magic: [u8; 4] = peeked
            .get(0..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| invalid_format("File too short to read magic number".to_string()))?;
        let format = PcapFormat::from_magic(magic).ok_or(PcapError::UnknownMagic {
            magic: u32::from_be_bytes(magic),
        })?;

        let mut inner = LegacyPcapReader::new(capacity, buf_reader)
            .map_err(|e| invalid_format(format!("Failed to parse PCAP header: {e}")))?;

        let (offset, header) = match inner.next() {
            Ok((offset, PcapBlockOwned::LegacyHeader(legacy))) => {
                (offset, PcapHeader::from_legacy(format, &legacy))
            }
            Ok(_) => return Err(invalid_format("Missing PCAP global header".to_string())),
            Err(e) => return Err(invalid_format(format!("Failed to parse PCAP header: {e}"))),
        };
        inner.consume(offset);

        tracing::debug!(
            "PCAP v{}.{} {:?}, snaplen {}, link type {}",
            header.version_major,
            header.version_minor,
            header.format,
            header.snaplen,
            header.link_type
        );
        match header.link_type {
            LINKTYPE_ETHERNET | LINKTYPE_RAW | LINKTYPE_IPV4 | LINKTYPE_IPV6 => {}
            other => tracing::warn!(
                "No decoder for link type {}, packets will carry only their raw bytes",
                other
            ),
        }

        Ok(Self {
            inner,
            header,
            capacity,
            frame_number: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> &PcapHeader {
        &self.header
    }

    /// Get the link type of the capture.
    pub fn link_type(&self) -> u32 {
        self.header.link_type
    }

    /// Number of records read so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    /// Read the next record, or `None` at a clean end of input.
    ///
    /// A record whose header or body is cut short, or whose captured length
    /// exceeds the snapshot length, fails with a truncation error and ends
    /// the sequence.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, Error> {
        if self.finished {
            return Ok(None);
        }

        let result = self.read_record();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn read_record(&mut self) -> Result<Option<RawRecord>, Error> {
        let frame = self.frame_number + 1;

        loop {
            let step = match self.inner.next() {
                Ok((offset, PcapBlockOwned::Legacy(block))) => Step::Record {
                    offset,
                    ts_sec: block.ts_sec,
                    ts_frac: block.ts_usec,
                    captured_len: block.caplen,
                    original_len: block.origlen,
                    data: Bytes::copy_from_slice(block.data),
                },
                Ok((offset, _)) => Step::Skip(offset),
                Err(PcapParserError::Eof) => Step::End,
                Err(PcapParserError::Incomplete(_)) => Step::Refill,
                Err(PcapParserError::BufferTooSmall) => Step::Grow,
                Err(e) => Step::Failed(e.to_string()),
            };

            match step {
                Step::Record {
                    offset,
                    ts_sec,
                    ts_frac,
                    captured_len,
                    original_len,
                    data,
                } => {
                    if !self.header.within_snaplen(captured_len) {
                        return Err(self.snaplen_exceeded(frame, captured_len));
                    }
                    self.inner.consume(offset);
                    self.frame_number = frame;
                    tracing::trace!("Frame {}: {} of {} bytes", frame, captured_len, original_len);

                    return Ok(Some(RawRecord {
                        frame_number: frame,
                        timestamp: Timestamp::new(ts_sec, ts_frac, self.header.resolution()),
                        captured_len,
                        original_len,
                        link_type: self.header.link_type,
                        data,
                    }));
                }
                Step::Skip(offset) => self.inner.consume(offset),
                Step::End => return Ok(None),
                Step::Refill => {
                    if self.inner.reader_exhausted() {
                        return Err(self.truncated(frame));
                    }
                    self.refill()?;
                }
                Step::Grow => {
                    if self.inner.reader_exhausted() {
                        return Err(self.truncated(frame));
                    }
                    if let Some(captured) = self.pending_captured_len() {
                        if !self.header.within_snaplen(captured) {
                            return Err(self.snaplen_exceeded(frame, captured));
                        }
                    }
                    // Grow only once the current window is full of real bytes
                    if self.inner.data().len() < self.capacity {
                        self.refill()?;
                    } else {
                        self.capacity *= 2;
                        if !self.inner.grow(self.capacity) {
                            return Err(invalid_format(format!(
                                "Cannot grow read buffer to {} bytes",
                                self.capacity
                            )));
                        }
                        tracing::debug!("Read buffer grown to {} bytes", self.capacity);
                    }
                }
                Step::Failed(reason) => {
                    if self.inner.reader_exhausted() {
                        return Err(self.truncated(frame));
                    }
                    return Err(invalid_format(format!("Parse error: {reason}")));
                }
            }
        }
    }

    fn refill(&mut self) -> Result<(), Error> {
        self.inner
            .refill()
            .map_err(|e| invalid_format(format!("Refill error: {e}")))
    }

    /// Captured length declared by the record header waiting in the buffer.
    fn pending_captured_len(&self) -> Option<u32> {
        let field = self.inner.data().get(8..12)?;
        let bytes: [u8; 4] = field.try_into().ok()?;
        Some(self.header.byte_order().read_u32(bytes))
    }

    /// Error for a record the input ended inside of.
    fn truncated(&self, frame: u64) -> Error {
        let pending = self.inner.data().len();
        let error = match self.pending_captured_len() {
            Some(captured) if pending >= RECORD_HEADER_LEN => {
                if !self.header.within_snaplen(captured) {
                    return self.snaplen_exceeded(frame, captured);
                }
                PcapError::TruncatedRecord {
                    frame,
                    expected: captured as usize,
                    actual: pending - RECORD_HEADER_LEN,
                }
            }
            _ => PcapError::TruncatedRecord {
                frame,
                expected: RECORD_HEADER_LEN,
                actual: pending,
            },
        };
        error.into()
    }

    fn snaplen_exceeded(&self, frame: u64, captured: u32) -> Error {
        PcapError::SnaplenExceeded {
            frame,
            captured,
            snaplen: self.header.snaplen,
        }
        .into()
    }
}

fn invalid_format(reason: String) -> Error {
    Error::Pcap(PcapError::InvalidFormat { reason })
}

/// Iterator adapter for PcapReader.
impl<R: Read> Iterator for PcapReader<R> {
    type Item = Result<RawRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for PcapReader<R> {}
