//! IPv6 addresses with prefix-aware explanations
//!
//! Provides an address plus prefix length that can be:
//! - Generated randomly or parsed from colon-hex ("fe80::1/64")
//! - Split into network, subnet and interface identifier
//! - Classified (global unicast, link-local, IPv4-mapped, ...)
//! - Rendered as ASCII-art diagrams over its hex and binary forms
//!
//! The interface identifier is always the last 64 bits. The subnet is
//! whatever lies between the prefix and bit 64, so it is empty for
//! prefixes of 64 bits or more.
//!
//! # Examples
//!
//! ```
//! use raddr_ipv6::Ipv6Address;
//!
//! let ip = Ipv6Address::parse("2001:db8:1234:5678::1/48").unwrap();
//! assert_eq!(ip.network(), "2001:db8:1234::");
//! assert_eq!(ip.subnet(), "0:0:0:5678::");
//! assert_eq!(ip.iid(), "::1");
//! assert_eq!(ip.address_type(), "global unicast");
//! ```

use raddr_core::art::{self, Part};
use raddr_core::bits::{self, Side};
use raddr_core::{entropy, parse_prefix_len, AddrError, Explain, Field, Result, BITS_PER_BYTE};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::debug;

/// Number of bytes in an IPv6 address
pub const IPV6_LEN: usize = 16;

/// Number of bits in an IPv6 address
pub const IPV6_BITS: usize = IPV6_LEN * BITS_PER_BYTE;

/// First bit of the interface identifier
pub const IID_START: usize = 64;

/// Bits per colon-separated group
const GROUP_BITS: usize = 16;

/// Bytes per colon-separated group
const GROUP_BYTES: usize = GROUP_BITS / BITS_PER_BYTE;

/// IPv6 address with an associated prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipv6Address {
    octets: [u8; IPV6_LEN],
    /// Prefix length (0-128)
    prefix_len: u8,
}

impl Ipv6Address {
    /// Random address with prefix length 0
    pub fn random() -> Result<Self> {
        let ip = Self {
            octets: entropy::random_bytes()?,
            prefix_len: 0,
        };
        debug!(ip = %ip, "generated random IPv6 address");
        Ok(ip)
    }

    /// Parse "x:x::x" or "x:x::x/n"
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
        debug!(input = text, prefix_len = ip.prefix_len, "parsed IPv6 address");
        Ok(ip)
    }

    /// Apply the network prefix in `prefix` ("x:x::/n")
    ///
    /// # Examples
    ///
    /// ```
    /// use raddr_ipv6::Ipv6Address;
    ///
    /// let mut ip = Ipv6Address::parse("2001:db8::42").unwrap();
    /// ip.set_prefix("fe80::/64").unwrap();
    /// assert_eq!(ip.to_string(), "fe80::42");
    /// assert_eq!(ip.network(), "fe80::");
    /// ```
    pub fn set_prefix(&mut self, prefix: &str) -> Result<()> {
        let (addr, prefix_len) = parse_prefix(prefix)?;
        bits::overwrite_prefix(&mut self.octets, &addr.octets(), prefix_len as usize);
        self.prefix_len = prefix_len;
        debug!(prefix, ip = %self, "applied IPv6 prefix");
        Ok(())
    }

    /// Change only the prefix length
    pub fn set_prefix_length(&mut self, prefix_len: usize) -> Result<()> {
        if prefix_len > IPV6_BITS {
            return Err(AddrError::PrefixLengthOutOfRange {
                len: prefix_len,
                max: IPV6_BITS,
            });
        }
        self.prefix_len = prefix_len as u8;
        Ok(())
    }

    /// Address as a std address
    pub fn addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.octets)
    }

    /// Raw bytes
    pub fn octets(&self) -> [u8; IPV6_LEN] {
        self.octets
    }

    /// Prefix length in bits
    pub fn prefix_len(&self) -> usize {
        self.prefix_len as usize
    }

    /// Unmasked address with prefix length ("x::x/n")
    pub fn prefix(&self) -> String {
        format!("{}/{}", self.addr(), self.prefix_len)
    }

    /// Conventional compressed colon-hex
    pub fn hex(&self) -> String {
        self.addr().to_string()
    }

    /// Eight four-digit groups, nothing compressed
    pub fn expanded(&self) -> String {
        self.addr()
            .segments()
            .iter()
            .map(|s| format!("{:04x}", s))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Colon-separated 16-bit groups of binary digits
    pub fn binary(&self) -> String {
        bits::binary(&self.octets, GROUP_BYTES, ':')
    }

    /// Network part, all other bits zeroed
    pub fn network(&self) -> String {
        self.field(0, self.prefix_len())
    }

    /// Bits between the prefix and the interface identifier
    ///
    /// Empty when the prefix reaches into the interface identifier.
    pub fn subnet(&self) -> String {
        if self.prefix_len() >= IID_START {
            return String::new();
        }
        self.field(self.prefix_len(), IID_START)
    }

    /// Interface identifier, the last 64 bits
    pub fn iid(&self) -> String {
        self.field(IID_START, IPV6_BITS)
    }

    fn field(&self, start: usize, end: usize) -> String {
        Ipv6Addr::from(bits::field(&self.octets, start, end)).to_string()
    }

    fn mapped(&self) -> Option<Ipv4Addr> {
        self.addr().to_ipv4_mapped()
    }

    /// ::1, or a mapped IPv4 loopback
    pub fn loopback(&self) -> bool {
        match self.mapped() {
            Some(v4) => v4.is_loopback(),
            None => self.addr().is_loopback(),
        }
    }

    /// ::
    pub fn unspecified(&self) -> bool {
        self.addr().is_unspecified()
    }

    /// ff00::/8, or a mapped IPv4 multicast address
    pub fn multicast(&self) -> bool {
        match self.mapped() {
            Some(v4) => v4.is_multicast(),
            None => self.octets[0] == 0xff,
        }
    }

    /// Not multicast
    pub fn unicast(&self) -> bool {
        !self.multicast()
    }

    /// ff02::/16, or mapped 224.0.0.0/24
    pub fn link_local_multicast(&self) -> bool {
        match self.mapped() {
            Some(v4) => matches!(v4.octets(), [224, 0, 0, _]),
            None => self.octets[0] == 0xff && self.octets[1] & 0x0f == 0x02,
        }
    }

    /// fe80::/10, or mapped 169.254.0.0/16
    pub fn link_local_unicast(&self) -> bool {
        match self.mapped() {
            Some(v4) => v4.is_link_local(),
            None => self.octets[0] == 0xfe && self.octets[1] & 0xc0 == 0x80,
        }
    }

    /// fc00::/7, or a mapped IPv4 private address
    pub fn private(&self) -> bool {
        match self.mapped() {
            Some(v4) => v4.is_private(),
            None => self.octets[0] & 0xfe == 0xfc,
        }
    }

    /// ::ffff:0:0/96
    pub fn ipv4_mapped(&self) -> bool {
        self.mapped().is_some()
    }

    /// Unicast outside the unspecified, loopback and link-local ranges
    ///
    /// Private (unique local) addresses count as global unicast.
    pub fn global_unicast(&self) -> bool {
        if let Some(v4) = self.mapped() {
            if v4.is_unspecified() || v4.is_broadcast() {
                return false;
            }
        }
        !self.unspecified() && !self.loopback() && !self.multicast() && !self.link_local_unicast()
    }

    /// Classification such as "global unicast" or "link-local multicast"
    ///
    /// The ranges overlap, the first match in this order wins: loopback,
    /// unspecified, global unicast, link-local multicast, link-local
    /// unicast, IPv4-mapped, then "{public|private} {unicast|multicast}".
    pub fn address_type(&self) -> String {
        let fixed = if self.loopback() {
            Some("loopback")
        } else if self.unspecified() {
            Some("unspecified")
        } else if self.global_unicast() {
            Some("global unicast")
        } else if self.link_local_multicast() {
            Some("link-local multicast")
        } else if self.link_local_unicast() {
            Some("link-local unicast")
        } else if self.ipv4_mapped() {
            Some("ipv4-mapped")
        } else {
            None
        };
        if let Some(name) = fixed {
            return name.to_string();
        }

        let scope = if self.private() { "private" } else { "public" };
        let role = if self.multicast() { "multicast" } else { "unicast" };
        format!("{} {}", scope, role)
    }

    fn group_role(&self, index: usize) -> &'static str {
        let start = index * GROUP_BITS;
        if start >= IID_START {
            return "IID";
        }
        match bits::side(start, start + GROUP_BITS, self.prefix_len()) {
            Side::Prefix => "network",
            Side::Suffix => "subnet",
            Side::Both => "mixed",
        }
    }

    /// Network/subnet and interface identifier brackets over the binary row
    ///
    /// The prefix only splits the first 64 bits; a longer prefix is drawn
    /// as a network covering all of them.
    pub fn explain_bin(&self) -> String {
        let upper = self.prefix_len().min(IID_START);
        let (network, skip, subnet) = art::split_widths(upper, IID_START, GROUP_BITS);
        let (_, _, iid) = art::split_widths(0, IPV6_BITS - IID_START, GROUP_BITS);
        let parts = [
            Part::field(network, "network"),
            Part::gap(skip),
            Part::field(subnet, "subnet"),
            Part::gap(1),
            Part::field(iid, "interface identifier"),
        ];
        art::annotate(&parts, &self.binary())
    }

    /// Per-group brackets over the expanded hex row
    ///
    /// A group that holds both network and subnet bits is labelled "mixed".
    pub fn explain_hex(&self) -> String {
        let expanded = self.expanded();
        let segments: Vec<(usize, &str)> = expanded
            .split(':')
            .enumerate()
            .map(|(i, group)| (group.len(), self.group_role(i)))
            .collect();
        art::annotate(&art::group_segments(&segments), &expanded)
    }
}

impl Explain for Ipv6Address {
    fn family(&self) -> &'static str {
        "IPv6"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("Address", self.hex()),
            Field::new("Prefix", self.prefix()),
            Field::new("Type", self.address_type()),
            Field::new("Network", self.network()),
            Field::new("Subnet", self.subnet()),
            Field::new("IID", self.iid()),
            Field::new("Binary", self.binary()),
        ]
    }

    fn explain(&self) -> String {
        format!("{}\n\n{}", self.explain_hex(), self.explain_bin())
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr())
    }
}

impl FromStr for Ipv6Address {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Self {
            octets: addr.octets(),
            prefix_len: 0,
        }
    }
}

impl From<[u8; IPV6_LEN]> for Ipv6Address {
    fn from(octets: [u8; IPV6_LEN]) -> Self {
        Self {
            octets,
            prefix_len: 0,
        }
    }
}

fn parse_addr(text: &str) -> Result<Ipv6Addr> {
    text.parse()
        .map_err(|_| AddrError::InvalidAddress(text.to_string()))
}

/// Parse "x:x::x/n"
fn parse_prefix(text: &str) -> Result<(Ipv6Addr, u8)> {
    let (addr, len) = text
        .split_once('/')
        .ok_or_else(|| AddrError::InvalidPrefix(text.to_string()))?;
    Ok((parse_addr(addr)?, parse_prefix_len(len, IPV6_BITS)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(text: &str) -> Ipv6Address {
        Ipv6Address::parse(text).unwrap()
    }

    #[test]
    fn test_hex() {
        let mut ip = Ipv6Address::default();
        assert_eq!(ip.hex(), "::");

        ip = Ipv6Address::from([0xff; IPV6_LEN]);
        assert_eq!(ip.hex(), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn test_expanded() {
        assert_eq!(
            ip("2001:db8::1").expanded(),
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_binary() {
        let want = [
            "0000000000000000:0000000000000000:",
            "0000000000000000:0000000000000000:",
            "0000000000000000:0000000000000000:",
            "0000000000000000:0000000000000000",
        ]
        .concat();
        assert_eq!(Ipv6Address::default().binary(), want);
    }

    #[test]
    fn test_random() {
        let ip = Ipv6Address::random().unwrap();
        assert_eq!(ip.prefix_len(), 0);
        assert_eq!(Ipv6Address::parse(&ip.to_string()).unwrap(), ip);
    }

    #[test]
    fn test_parse() {
        assert_eq!(ip("fe80::1").addr().to_string(), "fe80::1");
        assert_eq!(ip("fe80::1/64").prefix(), "fe80::1/64");
        assert_eq!(ip("FE80::1").to_string(), "fe80::1");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Ipv6Address::parse("fe80::1::2"),
            Err(AddrError::InvalidAddress(_))
        ));
        assert!(Ipv6Address::parse("1.2.3.4").is_err());
        assert!(Ipv6Address::parse("fe80::1%eth0").is_err());
        assert!(Ipv6Address::parse("fe80::/").is_err());
        assert!(matches!(
            Ipv6Address::parse("fe80::/129"),
            Err(AddrError::PrefixLengthOutOfRange { len: 129, max: 128 })
        ));
    }

    #[test]
    fn test_set_prefix() {
        let mut ip = Ipv6Address::random().unwrap();
        ip.set_prefix("fe80::/64").unwrap();
        assert_eq!(ip.network(), "fe80::");
        assert_eq!(ip.prefix_len(), 64);
    }

    #[test]
    fn test_set_prefix_partial_byte() {
        let mut ip = ip("ffff:ffff::");
        ip.set_prefix("2001:db8::/20").unwrap();
        // 0db8 -> high nibble 0 from the prefix, low bits kept
        assert_eq!(ip.to_string(), "2001:fff::");
        assert_eq!(ip.network(), "2001::");
    }

    #[test]
    fn test_set_prefix_invalid() {
        let mut ip = ip("fe80::1");
        assert!(matches!(
            ip.set_prefix("fe80::"),
            Err(AddrError::InvalidPrefix(_))
        ));
        assert_eq!(ip.prefix_len(), 0);
    }

    #[test]
    fn test_set_prefix_length() {
        let mut ip = ip("fe80::1");
        ip.set_prefix_length(64).unwrap();
        assert_eq!(ip.network(), "fe80::");
        assert_eq!(ip.to_string(), "fe80::1");
        assert!(ip.set_prefix_length(129).is_err());
    }

    #[test]
    fn test_subnet_iid() {
        let ip = ip("2001:db8:1234:5678:9abc:def0:1234:5678/48");
        assert_eq!(ip.network(), "2001:db8:1234::");
        assert_eq!(ip.subnet(), "0:0:0:5678::");
        assert_eq!(ip.iid(), "::9abc:def0:1234:5678");

        let ip = Ipv6Address::parse("2001:db8:1234:5678:9abc:def0:1234:5678/64").unwrap();
        assert_eq!(ip.subnet(), "");
        assert_eq!(ip.iid(), "::9abc:def0:1234:5678");

        let ip = Ipv6Address::parse("2001:db8:1234:5678:9abc:def0:1234:5678/96").unwrap();
        assert_eq!(ip.subnet(), "");
        assert_eq!(ip.network(), "2001:db8:1234:5678:9abc:def0::");
        assert_eq!(ip.iid(), "::9abc:def0:1234:5678");
    }

    #[test]
    fn test_predicates() {
        assert!(ip("::ffff:10.0.0.1").private());
        assert!(ip("fd00::1").private());
        assert!(!ip("2001:db8::1").private());
        assert!(ip("ff02::1").link_local_multicast());
        assert!(!ip("ff05::1").link_local_multicast());
        assert!(ip("fe80::1").link_local_unicast());
        assert!(ip("febf::1").link_local_unicast());
        assert!(!ip("fec0::1").link_local_unicast());
        assert!(ip("::ffff:1.2.3.4").ipv4_mapped());
        assert!(ip("ff05::1").multicast() && !ip("ff05::1").unicast());
        assert!(ip("fd00::1").global_unicast());
        assert!(!ip("::ffff:255.255.255.255").global_unicast());
    }

    #[test]
    fn test_address_type() {
        let cases = [
            ("::1", "loopback"),
            ("::ffff:127.0.0.1", "loopback"),
            ("::", "unspecified"),
            ("2001:db8::1", "global unicast"),
            ("fd00::1", "global unicast"),
            ("::ffff:1.2.3.4", "global unicast"),
            ("ff02::1", "link-local multicast"),
            ("::ffff:224.0.0.1", "link-local multicast"),
            ("fe80::1", "link-local unicast"),
            ("::ffff:169.254.1.1", "link-local unicast"),
            ("::ffff:0.0.0.0", "ipv4-mapped"),
            ("::ffff:239.1.1.1", "ipv4-mapped"),
            ("ff05::2", "public multicast"),
        ];
        for (input, want) in cases {
            assert_eq!(ip(input).address_type(), want, "type of {}", input);
        }
    }

    #[test]
    fn test_explain_hex() {
        let ip = ip("2001:db8:1234:5678::1/48");
        let top = format!(
            " _____/\\_____   /\\   {}/\\{} ",
            "_".repeat(7),
            "_".repeat(8)
        );
        let want = [
            "    network   subnet        IID".to_string(),
            top.trim_end().to_string(),
            format!("|{}| |  | |{}|", " ".repeat(12), " ".repeat(17)),
            "2001:0db8:1234:5678:0000:0000:0000:0001".to_string(),
        ]
        .join("\n");
        assert_eq!(ip.explain_hex(), want);
    }

    #[test]
    fn test_explain_hex_mixed() {
        let explain = ip("2001:db8::1/20").explain_hex();
        let labels = explain.lines().next().unwrap();
        assert!(labels.contains("network"));
        assert!(labels.contains("mixed"));
        assert!(labels.contains("subnet"));
        assert!(labels.contains("IID"));
    }

    #[test]
    fn test_explain_bin() {
        let explain = ip("2001:db8:1234:5678::1/48").explain_bin();
        let lines: Vec<&str> = explain.lines().collect();
        assert_eq!(lines.len(), 4);
        let want = format!(
            "|{}| |{}| |{}|",
            " ".repeat(48),
            " ".repeat(14),
            " ".repeat(65)
        );
        assert_eq!(lines[2], want);
        assert_eq!(lines[2].len(), lines[3].len());
    }

    #[test]
    fn test_explain_bin_long_prefix() {
        let explain = ip("fe80::1/64").explain_bin();
        let lines: Vec<&str> = explain.lines().collect();
        let want = format!("|{}| |{}|", " ".repeat(65), " ".repeat(65));
        assert_eq!(lines[2], want);
        assert!(!lines[0].contains("subnet"));

        let explain = ip("fe80::1/100").explain_bin();
        assert_eq!(explain.lines().nth(2), Some(want.as_str()));
    }

    #[test]
    fn test_explain_bin_unaligned() {
        let explain = ip("2001:db8::1/20").explain_bin();
        let lines: Vec<&str> = explain.lines().collect();
        let want = format!(
            "|{}||{}| |{}|",
            " ".repeat(19),
            " ".repeat(44),
            " ".repeat(65)
        );
        assert_eq!(lines[2], want);
    }

    #[test]
    fn test_table() {
        let table = ip("2001:db8:1234:5678::1/48").table();
        assert!(table.contains("| Type    | global unicast"));
        assert!(table.contains("| Subnet  | 0:0:0:5678::"));
        assert!(table.contains("| IID     | ::1"));
    }
}
