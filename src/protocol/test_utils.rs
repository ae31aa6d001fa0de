//! Test utilities for packet decoding.
//!
//! Provides builders for constructing test frames and capture files.

use etherparse::Ipv4HeaderSlice;

/// Decode a hex string, ignoring whitespace.
pub fn hex(s: &str) -> Vec<u8> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    assert!(digits.len() % 2 == 0, "odd number of hex digits");
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).unwrap();
            u8::from_str_radix(text, 16).unwrap()
        })
        .collect()
}

/// Builder for constructing Ethernet frames.
#[derive(Debug, Clone)]
pub struct EthernetBuilder {
    src_mac: [u8; 6],
    dst_mac: [u8; 6],
    ethertype: u16,
    payload: Vec<u8>,
}

impl Default for EthernetBuilder {
    fn default() -> Self {
        Self {
            src_mac: [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
            dst_mac: [0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
            ethertype: 0x0800, // IPv4
            payload: Vec::new(),
        }
    }
}

impl EthernetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_mac(mut self, mac: [u8; 6]) -> Self {
        self.src_mac = mac;
        self
    }

    pub fn dst_mac(mut self, mac: [u8; 6]) -> Self {
        self.dst_mac = mac;
        self
    }

    pub fn ethertype(mut self, ethertype: u16) -> Self {
        self.ethertype = ethertype;
        self
    }

    pub fn ipv4(self) -> Self {
        self.ethertype(0x0800)
    }

    pub fn ipv6(self) -> Self {
        self.ethertype(0x86DD)
    }

    pub fn arp(self) -> Self {
        self.ethertype(0x0806)
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(14 + self.payload.len());
        frame.extend_from_slice(&self.dst_mac);
        frame.extend_from_slice(&self.src_mac);
        frame.extend_from_slice(&self.ethertype.to_be_bytes());
        frame.extend_from_slice(&self.payload);
        frame
    }
}

/// Builder for constructing IPv4 packets. The header checksum is filled in.
#[derive(Debug, Clone)]
pub struct Ipv4Builder {
    version_ihl: u8,
    dscp_ecn: u8,
    total_length: Option<u16>,
    identification: u16,
    flags_fragment: u16,
    ttl: u8,
    protocol: u8,
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    options: Vec<u8>,
    payload: Vec<u8>,
}

impl Default for Ipv4Builder {
    fn default() -> Self {
        Self {
            version_ihl: 0x45, // Version 4, IHL 5 (20 bytes)
            dscp_ecn: 0x00,
            total_length: None, // Derived on build
            identification: 0x0001,
            flags_fragment: 0x0000,
            ttl: 64,
            protocol: 6, // TCP
            src_ip: [192, 168, 1, 1],
            dst_ip: [192, 168, 1, 2],
            options: Vec::new(),
            payload: Vec::new(),
        }
    }
}

impl Ipv4Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the version/IHL byte verbatim.
    pub fn version_ihl(mut self, value: u8) -> Self {
        self.version_ihl = value;
        self
    }

    pub fn ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn tcp(self) -> Self {
        self.protocol(6)
    }

    pub fn udp(self) -> Self {
        self.protocol(17)
    }

    pub fn icmp(self) -> Self {
        self.protocol(1)
    }

    pub fn identification(mut self, id: u16) -> Self {
        self.identification = id;
        self
    }

    /// Raw flags (3 bits) and fragment offset (13 bits).
    pub fn flags_fragment(mut self, value: u16) -> Self {
        self.flags_fragment = value;
        self
    }

    pub fn total_length(mut self, len: u16) -> Self {
        self.total_length = Some(len);
        self
    }

    /// Append option bytes and bump the IHL to cover them (pad to 4 bytes).
    pub fn options(mut self, options: Vec<u8>) -> Self {
        let mut options = options;
        while options.len() % 4 != 0 {
            options.push(0);
        }
        let ihl = 5 + (options.len() / 4) as u8;
        self.version_ihl = (self.version_ihl & 0xf0) | ihl;
        self.options = options;
        self
    }

    pub fn src_ip(mut self, ip: [u8; 4]) -> Self {
        self.src_ip = ip;
        self
    }

    pub fn dst_ip(mut self, ip: [u8; 4]) -> Self {
        self.dst_ip = ip;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let header_len = 20 + self.options.len();
        let total_length = self
            .total_length
            .unwrap_or((header_len + self.payload.len()) as u16);
        let mut header = Vec::with_capacity(header_len + self.payload.len());

        header.push(self.version_ihl);
        header.push(self.dscp_ecn);
        header.extend_from_slice(&total_length.to_be_bytes());
        header.extend_from_slice(&self.identification.to_be_bytes());
        header.extend_from_slice(&self.flags_fragment.to_be_bytes());
        header.push(self.ttl);
        header.push(self.protocol);
        header.extend_from_slice(&[0x00, 0x00]); // Checksum, patched below
        header.extend_from_slice(&self.src_ip);
        header.extend_from_slice(&self.dst_ip);
        header.extend_from_slice(&self.options);

        // Malformed headers keep a zero checksum
        let checksum = Ipv4HeaderSlice::from_slice(&header)
            .map(|ip| ip.to_header().calc_header_checksum())
            .unwrap_or(0);
        header[10..12].copy_from_slice(&checksum.to_be_bytes());

        header.extend_from_slice(&self.payload);
        header
    }
}

/// Builder for constructing IPv6 packets.
#[derive(Debug, Clone)]
pub struct Ipv6Builder {
    traffic_class: u8,
    flow_label: u32,
    payload_length: Option<u16>,
    next_header: u8,
    hop_limit: u8,
    src_ip: [u8; 16],
    dst_ip: [u8; 16],
    payload: Vec<u8>,
}

impl Default for Ipv6Builder {
    fn default() -> Self {
        let mut src_ip = [0u8; 16];
        src_ip[..4].copy_from_slice(&[0xfe, 0x80, 0x00, 0x00]);
        src_ip[15] = 1;
        let mut dst_ip = src_ip;
        dst_ip[15] = 2;

        Self {
            traffic_class: 0,
            flow_label: 0,
            payload_length: None, // Derived on build
            next_header: 6,       // TCP
            hop_limit: 64,
            src_ip,
            dst_ip,
            payload: Vec::new(),
        }
    }
}

impl Ipv6Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_header(mut self, next_header: u8) -> Self {
        self.next_header = next_header;
        self
    }

    pub fn tcp(self) -> Self {
        self.next_header(6)
    }

    pub fn udp(self) -> Self {
        self.next_header(17)
    }

    pub fn icmpv6(self) -> Self {
        self.next_header(58)
    }

    pub fn hop_limit(mut self, hop_limit: u8) -> Self {
        self.hop_limit = hop_limit;
        self
    }

    pub fn traffic_class(mut self, tc: u8) -> Self {
        self.traffic_class = tc;
        self
    }

    pub fn flow_label(mut self, label: u32) -> Self {
        self.flow_label = label;
        self
    }

    pub fn payload_length(mut self, len: u16) -> Self {
        self.payload_length = Some(len);
        self
    }

    pub fn src_ip(mut self, ip: [u8; 16]) -> Self {
        self.src_ip = ip;
        self
    }

    pub fn dst_ip(mut self, ip: [u8; 16]) -> Self {
        self.dst_ip = ip;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let payload_length = self.payload_length.unwrap_or(self.payload.len() as u16);
        let mut packet = Vec::with_capacity(40 + self.payload.len());

        let word: u32 =
            (6 << 28) | ((self.traffic_class as u32) << 20) | (self.flow_label & 0x000f_ffff);
        packet.extend_from_slice(&word.to_be_bytes());
        packet.extend_from_slice(&payload_length.to_be_bytes());
        packet.push(self.next_header);
        packet.push(self.hop_limit);
        packet.extend_from_slice(&self.src_ip);
        packet.extend_from_slice(&self.dst_ip);
        packet.extend_from_slice(&self.payload);

        packet
    }
}

/// Builder for constructing TCP segments.
#[derive(Debug, Clone)]
pub struct TcpBuilder {
    src_port: u16,
    dst_port: u16,
    seq: u32,
    ack: u32,
    data_offset: u8,
    flags: u8,
    window: u16,
    options: Vec<u8>,
    payload: Vec<u8>,
}

impl Default for TcpBuilder {
    fn default() -> Self {
        Self {
            src_port: 12345,
            dst_port: 80,
            seq: 1,
            ack: 0,
            data_offset: 5, // 20 bytes
            flags: 0x02,    // SYN
            window: 65535,
            options: Vec::new(),
            payload: Vec::new(),
        }
    }
}

impl TcpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_port(mut self, port: u16) -> Self {
        self.src_port = port;
        self
    }

    pub fn dst_port(mut self, port: u16) -> Self {
        self.dst_port = port;
        self
    }

    pub fn seq(mut self, seq: u32) -> Self {
        self.seq = seq;
        self
    }

    pub fn ack_num(mut self, ack: u32) -> Self {
        self.ack = ack;
        self
    }

    /// Override the data offset nibble verbatim.
    pub fn data_offset(mut self, words: u8) -> Self {
        self.data_offset = words;
        self
    }

    pub fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn syn(self) -> Self {
        self.flags(0x02)
    }

    pub fn syn_ack(self) -> Self {
        self.flags(0x12)
    }

    pub fn ack(self) -> Self {
        self.flags(0x10)
    }

    pub fn psh_ack(self) -> Self {
        self.flags(0x18)
    }

    pub fn window(mut self, window: u16) -> Self {
        self.window = window;
        self
    }

    /// Append option bytes and bump the data offset to cover them.
    pub fn options(mut self, options: Vec<u8>) -> Self {
        let mut options = options;
        while options.len() % 4 != 0 {
            options.push(0x01); // NOP
        }
        self.data_offset = 5 + (options.len() / 4) as u8;
        self.options = options;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut header = Vec::with_capacity(20 + self.options.len() + self.payload.len());

        header.extend_from_slice(&self.src_port.to_be_bytes());
        header.extend_from_slice(&self.dst_port.to_be_bytes());
        header.extend_from_slice(&self.seq.to_be_bytes());
        header.extend_from_slice(&self.ack.to_be_bytes());
        header.push(self.data_offset << 4); // Data offset + reserved
        header.push(self.flags);
        header.extend_from_slice(&self.window.to_be_bytes());
        header.extend_from_slice(&[0x00, 0x00]); // Checksum
        header.extend_from_slice(&[0x00, 0x00]); // Urgent pointer
        header.extend_from_slice(&self.options);
        header.extend_from_slice(&self.payload);

        header
    }
}

/// Builder for constructing UDP datagrams.
#[derive(Debug, Clone)]
pub struct UdpBuilder {
    src_port: u16,
    dst_port: u16,
    length: Option<u16>,
    payload: Vec<u8>,
}

impl Default for UdpBuilder {
    fn default() -> Self {
        Self {
            src_port: 12345,
            dst_port: 53,
            length: None, // Derived on build
            payload: Vec::new(),
        }
    }
}

impl UdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_port(mut self, port: u16) -> Self {
        self.src_port = port;
        self
    }

    pub fn dst_port(mut self, port: u16) -> Self {
        self.dst_port = port;
        self
    }

    pub fn dns(self) -> Self {
        self.dst_port(53)
    }

    /// Override the length field verbatim.
    pub fn length(mut self, length: u16) -> Self {
        self.length = Some(length);
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let length = self.length.unwrap_or(8 + self.payload.len() as u16);
        let mut header = Vec::with_capacity(8 + self.payload.len());

        header.extend_from_slice(&self.src_port.to_be_bytes());
        header.extend_from_slice(&self.dst_port.to_be_bytes());
        header.extend_from_slice(&length.to_be_bytes());
        header.extend_from_slice(&[0x00, 0x00]); // Checksum
        header.extend_from_slice(&self.payload);

        header
    }
}

/// Builder for constructing classic PCAP files in memory.
#[derive(Debug, Clone)]
pub struct PcapFileBuilder {
    big_endian: bool,
    nanosecond: bool,
    snaplen: u32,
    link_type: u32,
    body: Vec<u8>,
}

impl Default for PcapFileBuilder {
    fn default() -> Self {
        Self {
            big_endian: false,
            nanosecond: false,
            snaplen: 65535,
            link_type: 1, // Ethernet
            body: Vec::new(),
        }
    }
}

impl PcapFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn nanosecond(mut self) -> Self {
        self.nanosecond = true;
        self
    }

    pub fn snaplen(mut self, snaplen: u32) -> Self {
        self.snaplen = snaplen;
        self
    }

    pub fn link_type(mut self, link_type: u32) -> Self {
        self.link_type = link_type;
        self
    }

    /// Append a record whose captured and original lengths match `data`.
    pub fn record(self, ts_sec: u32, ts_frac: u32, data: &[u8]) -> Self {
        let len = data.len() as u32;
        self.record_with_lengths(ts_sec, ts_frac, len, len, data)
    }

    /// Append a record with explicit length fields; `data` is written as is.
    pub fn record_with_lengths(
        mut self,
        ts_sec: u32,
        ts_frac: u32,
        captured_len: u32,
        original_len: u32,
        data: &[u8],
    ) -> Self {
        for value in [ts_sec, ts_frac, captured_len, original_len] {
            let bytes = self.encode_u32(value);
            self.body.extend_from_slice(&bytes);
        }
        self.body.extend_from_slice(data);
        self
    }

    /// Append raw bytes after the last record.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let magic: u32 = if self.nanosecond {
            0xa1b2_3c4d
        } else {
            0xa1b2_c3d4
        };

        let mut file = Vec::with_capacity(24 + self.body.len());
        file.extend_from_slice(&self.encode_u32(magic));
        file.extend_from_slice(&self.encode_u16(2));
        file.extend_from_slice(&self.encode_u16(4));
        file.extend_from_slice(&self.encode_u32(0)); // thiszone
        file.extend_from_slice(&self.encode_u32(0)); // sigfigs
        file.extend_from_slice(&self.encode_u32(self.snaplen));
        file.extend_from_slice(&self.encode_u32(self.link_type));
        file.extend_from_slice(&self.body);
        file
    }

    fn encode_u16(&self, value: u16) -> [u8; 2] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }

    fn encode_u32(&self, value: u32) -> [u8; 4] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }
}

/// Build a complete Ethernet/IPv4/TCP packet.
pub fn build_tcp_packet(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    flags: u8,
) -> Vec<u8> {
    let tcp = TcpBuilder::new()
        .src_port(src_port)
        .dst_port(dst_port)
        .flags(flags)
        .build();

    let ipv4 = Ipv4Builder::new()
        .src_ip(src_ip)
        .dst_ip(dst_ip)
        .tcp()
        .payload(tcp)
        .build();

    EthernetBuilder::new().ipv4().payload(ipv4).build()
}

/// Build a complete Ethernet/IPv4/UDP packet.
pub fn build_udp_packet(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: Vec<u8>,
) -> Vec<u8> {
    let udp = UdpBuilder::new()
        .src_port(src_port)
        .dst_port(dst_port)
        .payload(payload)
        .build();

    let ipv4 = Ipv4Builder::new()
        .src_ip(src_ip)
        .dst_ip(dst_ip)
        .udp()
        .payload(udp)
        .build();

    EthernetBuilder::new().ipv4().payload(ipv4).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex("00ff 10\nab"), vec![0x00, 0xff, 0x10, 0xab]);
        assert!(hex("").is_empty());
    }

    #[test]
    fn test_ethernet_builder() {
        let frame = EthernetBuilder::new()
            .src_mac([0x11, 0x22, 0x33, 0x44, 0x55, 0x66])
            .dst_mac([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff])
            .ethertype(0x0800)
            .payload(vec![0x45, 0x00])
            .build();

        assert_eq!(frame.len(), 16); // 14 header + 2 payload
        assert_eq!(&frame[0..6], &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]); // dst
        assert_eq!(&frame[6..12], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]); // src
        assert_eq!(&frame[12..14], &[0x08, 0x00]); // ethertype
    }

    #[test]
    fn test_ipv4_builder() {
        let packet = Ipv4Builder::new()
            .src_ip([10, 0, 0, 1])
            .dst_ip([10, 0, 0, 2])
            .ttl(128)
            .tcp()
            .build();

        assert_eq!(packet.len(), 20);
        assert_eq!(packet[0], 0x45); // Version + IHL
        assert_eq!(packet[8], 128); // TTL
        assert_eq!(packet[9], 6); // Protocol (TCP)
        assert!(
            crate::protocol::ipv4::Ipv4Header::decode(&packet)
                .unwrap()
                .checksum_valid
        );
    }

    #[test]
    fn test_ipv4_builder_options() {
        let packet = Ipv4Builder::new().options(vec![0x94, 0x04, 0x00]).build();

        assert_eq!(packet.len(), 24);
        assert_eq!(packet[0], 0x46);
        assert_eq!(&packet[2..4], &[0x00, 24]);
    }

    #[test]
    fn test_ipv6_builder() {
        let packet = Ipv6Builder::new()
            .udp()
            .traffic_class(0xb8)
            .flow_label(0x12345)
            .payload(vec![0; 8])
            .build();

        assert_eq!(packet.len(), 48);
        assert_eq!(&packet[0..4], &[0x6b, 0x81, 0x23, 0x45]);
        assert_eq!(&packet[4..6], &[0x00, 0x08]);
        assert_eq!(packet[6], 17);
    }

    #[test]
    fn test_tcp_builder() {
        let segment = TcpBuilder::new()
            .src_port(443)
            .dst_port(54321)
            .syn()
            .build();

        assert_eq!(segment.len(), 20);
        assert_eq!(&segment[0..2], &443u16.to_be_bytes());
        assert_eq!(&segment[2..4], &54321u16.to_be_bytes());
        assert_eq!(segment[13], 0x02); // SYN flag
    }

    #[test]
    fn test_pcap_file_builder_layout() {
        let file = PcapFileBuilder::new().record(1, 2, &[0xaa, 0xbb]).build();

        assert_eq!(file.len(), 24 + 16 + 2);
        assert_eq!(&file[0..4], &[0xd4, 0xc3, 0xb2, 0xa1]);
        assert_eq!(&file[20..24], &[1, 0, 0, 0]); // Link type
        assert_eq!(&file[32..36], &[2, 0, 0, 0]); // Captured length
        assert_eq!(&file[40..], &[0xaa, 0xbb]);

        let big = PcapFileBuilder::new().big_endian().nanosecond().build();
        assert_eq!(&big[0..4], &[0xa1, 0xb2, 0x3c, 0x4d]);
    }
}
