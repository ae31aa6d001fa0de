//! Value formatting utilities for network addresses.
//!
//! Provides formatting functions for displaying network addresses in human-readable form:
//! - IPv4 addresses (4 bytes -> dotted-decimal string)
//! - IPv6 addresses (16 bytes -> RFC 5952 string)
//! - MAC addresses (6 bytes -> colon-separated hex)

mod address;

pub use address::{format_ipv4, format_ipv6, format_mac, MacAddr};
