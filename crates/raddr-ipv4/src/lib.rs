//! IPv4 addresses with prefix-aware explanations
//!
//! Provides an address plus prefix length that can be:
//! - Generated randomly or parsed from dotted decimal ("10.0.0.1/8")
//! - Split into network and host parts
//! - Classified (loopback, private, broadcast, multicast, ...)
//! - Rendered as ASCII-art diagrams over its decimal and binary forms
//!
//! # Examples
//!
//! ```
//! use raddr_ipv4::Ipv4Address;
//!
//! let mut ip = Ipv4Address::parse("192.168.1.10").unwrap();
//! assert_eq!(ip.prefix_len(), 0);
//!
//! ip.set_prefix_length(24).unwrap();
//! assert_eq!(ip.network(), "192.168.1.0");
//! assert_eq!(ip.host(), "0.0.0.10");
//! assert_eq!(ip.address_type(), "private unicast");
//! ```

use raddr_core::art::{self, Part};
use raddr_core::bits::{self, Side};
use raddr_core::{entropy, parse_prefix_len, AddrError, Explain, Field, Result, BITS_PER_BYTE};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::debug;

/// Number of bytes in an IPv4 address
pub const IPV4_LEN: usize = 4;

/// Number of bits in an IPv4 address
pub const IPV4_BITS: usize = IPV4_LEN * BITS_PER_BYTE;

/// IPv4 address with an associated prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipv4Address {
    octets: [u8; IPV4_LEN],
    /// Prefix length (0-32)
    prefix_len: u8,
}

impl Ipv4Address {
    /// Random address with prefix length 0
    pub fn random() -> Result<Self> {
        let ip = Self {
            octets: entropy::random_bytes()?,
            prefix_len: 0,
        };
        debug!(ip = %ip, "generated random IPv4 address");
        Ok(ip)
    }

    /// Parse "a.b.c.d" or "a.b.c.d/n"
    ///
    /// # Examples
    ///
    /// ```
    /// use raddr_ipv4::Ipv4Address;
    ///
    /// let ip = Ipv4Address::parse("127.0.0.1/8").unwrap();
    /// assert_eq!(ip.prefix(), "127.0.0.1/8");
    /// assert!(Ipv4Address::parse("127.0.0.1/33").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let ip = if text.contains('/') {
            let (addr, prefix_len) = parse_prefix(text)?;
            Self {
                octets: addr.octets(),
                prefix_len,
            }
        } else {
            Self::from(parse_addr(text)?)
        };
        debug!(input = text, prefix_len = ip.prefix_len, "parsed IPv4 address");
        Ok(ip)
    }

    /// Apply the network prefix in `prefix` ("a.b.c.d/n")
    ///
    /// The first `n` bits are taken from the prefix, the remaining bits
    /// are kept, and the prefix length becomes `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use raddr_ipv4::Ipv4Address;
    ///
    /// let mut ip = Ipv4Address::parse("192.168.1.10").unwrap();
    /// ip.set_prefix("10.0.0.0/8").unwrap();
    /// assert_eq!(ip.to_string(), "10.168.1.10");
    /// assert_eq!(ip.prefix_len(), 8);
    /// ```
    pub fn set_prefix(&mut self, prefix: &str) -> Result<()> {
        let (addr, prefix_len) = parse_prefix(prefix)?;
        bits::overwrite_prefix(&mut self.octets, &addr.octets(), prefix_len as usize);
        self.prefix_len = prefix_len;
        debug!(prefix, ip = %self, "applied IPv4 prefix");
        Ok(())
    }

    /// Change only the prefix length
    pub fn set_prefix_length(&mut self, prefix_len: usize) -> Result<()> {
        if prefix_len > IPV4_BITS {
            return Err(AddrError::PrefixLengthOutOfRange {
                len: prefix_len,
                max: IPV4_BITS,
            });
        }
        self.prefix_len = prefix_len as u8;
        Ok(())
    }

    /// Address as a std address
    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.octets)
    }

    /// Raw bytes
    pub fn octets(&self) -> [u8; IPV4_LEN] {
        self.octets
    }

    /// Prefix length in bits
    pub fn prefix_len(&self) -> usize {
        self.prefix_len as usize
    }

    /// Unmasked address with prefix length ("a.b.c.d/n")
    pub fn prefix(&self) -> String {
        format!("{}/{}", self.addr(), self.prefix_len)
    }

    /// Dotted decimal
    pub fn decimal(&self) -> String {
        self.addr().to_string()
    }

    /// Dot-separated `%08b` bytes
    pub fn binary(&self) -> String {
        bits::binary(&self.octets, 1, '.')
    }

    /// Network part, host bits zeroed
    pub fn network(&self) -> String {
        Ipv4Addr::from(bits::field(&self.octets, 0, self.prefix_len())).to_string()
    }

    /// Host part, network bits zeroed
    pub fn host(&self) -> String {
        Ipv4Addr::from(bits::field(&self.octets, self.prefix_len(), IPV4_BITS)).to_string()
    }

    /// 127.0.0.0/8
    pub fn loopback(&self) -> bool {
        self.addr().is_loopback()
    }

    /// 10.0.0.0/8, 172.16.0.0/12 or 192.168.0.0/16
    pub fn private(&self) -> bool {
        self.addr().is_private()
    }

    /// 0.0.0.0
    pub fn unspecified(&self) -> bool {
        self.addr().is_unspecified()
    }

    /// 224.0.0.0/4
    pub fn multicast(&self) -> bool {
        self.addr().is_multicast()
    }

    /// Every bit after the prefix is set
    pub fn broadcast(&self) -> bool {
        bits::all_ones(&self.octets, self.prefix_len(), IPV4_BITS)
    }

    /// Neither multicast nor broadcast
    pub fn unicast(&self) -> bool {
        !self.multicast() && !self.broadcast()
    }

    /// Classification such as "loopback" or "private broadcast"
    pub fn address_type(&self) -> String {
        if self.loopback() {
            return "loopback".to_string();
        }
        if self.unspecified() {
            return "unspecified".to_string();
        }

        let scope = if self.private() { "private" } else { "public" };
        let mut role = "unicast";
        if self.broadcast() {
            role = "broadcast";
        }
        if self.multicast() {
            role = "multicast";
        }
        format!("{} {}", scope, role)
    }

    fn octet_role(&self, index: usize) -> &'static str {
        let start = index * BITS_PER_BYTE;
        match bits::side(start, start + BITS_PER_BYTE, self.prefix_len()) {
            Side::Prefix => "network",
            Side::Suffix => "host",
            Side::Both => "mixed",
        }
    }

    /// Network/host brackets over the binary row
    pub fn explain_bin(&self) -> String {
        let (network, skip, host) = art::split_widths(self.prefix_len(), IPV4_BITS, BITS_PER_BYTE);
        let parts = [
            Part::field(network, "network"),
            Part::gap(skip),
            Part::field(host, "host"),
        ];
        art::annotate(&parts, &self.binary())
    }

    /// Per-octet network/host brackets over the dotted decimal row
    ///
    /// An octet that holds both network and host bits is labelled "mixed".
    pub fn explain_decimal(&self) -> String {
        let texts: Vec<String> = self.octets.iter().map(|o| o.to_string()).collect();
        let segments: Vec<(usize, &str)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (t.len(), self.octet_role(i)))
            .collect();
        art::annotate(&art::group_segments(&segments), &self.decimal())
    }
}

impl Explain for Ipv4Address {
    fn family(&self) -> &'static str {
        "IPv4"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("Address", self.decimal()),
            Field::new("Prefix", self.prefix()),
            Field::new("Type", self.address_type()),
            Field::new("Network", self.network()),
            Field::new("Host", self.host()),
            Field::new("Binary", self.binary()),
        ]
    }

    fn explain(&self) -> String {
        format!("{}\n\n{}", self.explain_decimal(), self.explain_bin())
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr())
    }
}

impl FromStr for Ipv4Address {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self {
            octets: addr.octets(),
            prefix_len: 0,
        }
    }
}

fn parse_addr(text: &str) -> Result<Ipv4Addr> {
    text.parse()
        .map_err(|_| AddrError::InvalidAddress(text.to_string()))
}

/// Parse "a.b.c.d/n"
fn parse_prefix(text: &str) -> Result<(Ipv4Addr, u8)> {
    let (addr, len) = text
        .split_once('/')
        .ok_or_else(|| AddrError::InvalidPrefix(text.to_string()))?;
    Ok((parse_addr(addr)?, parse_prefix_len(len, IPV4_BITS)?))
}
