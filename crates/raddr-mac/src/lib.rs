//! MAC addresses with bit-level explanations
//!
//! Provides a 6-byte link-layer address type that can be:
//! - Generated randomly (locally administered, unicast)
//! - Parsed from colon- or dash-separated hex
//! - Split into OUI and NIC-specific halves
//! - Rendered as an ASCII-art diagram of its control bits
//!
//! # Examples
//!
//! ```
//! use raddr_mac::MacAddress;
//!
//! let mac = MacAddress::parse("00-00-5e-00-53-01").unwrap();
//! assert_eq!(mac.to_string(), "00:00:5e:00:53:01");
//! assert_eq!(mac.oui(), "00:00:5e");
//! assert!(mac.universal() && mac.unicast());
//!
//! let random = MacAddress::random().unwrap();
//! assert!(random.local() && random.individual());
//! ```

use raddr_core::art::{self, Part};
use raddr_core::{bits, entropy, AddrError, Explain, Field, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Number of bytes in a MAC address
pub const MAC_LEN: usize = 6;

/// Number of bytes in each half (OUI, NIC)
pub const HALF_LEN: usize = 3;

/// U/L bit of the first byte, set for locally administered addresses
pub const UL_BIT: u8 = 0b0000_0010;

/// I/G bit of the first byte, set for group addresses
pub const IG_BIT: u8 = 0b0000_0001;

/// Column of the U/L bit in the binary rendering
const UL_COLUMN: usize = 6;

/// Width of one half in the hex rendering ("xx:xx:xx")
const HEX_HALF_WIDTH: usize = 8;

/// Width of one half in the binary rendering
const BIN_HALF_WIDTH: usize = 26;

/// 48-bit link-layer address
///
/// # Examples
///
/// ```
/// use raddr_mac::MacAddress;
///
/// let mut mac = MacAddress::from([0x02, 0, 0, 0, 0, 1]);
/// assert!(mac.local());
/// mac.set_ul(true);
/// assert!(mac.universal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress {
    octets: [u8; MAC_LEN],
}

impl MacAddress {
    /// Random locally administered unicast address
    pub fn random() -> Result<Self> {
        Self::random_with(false, true)
    }

    /// Random address with the given U/L and I/G bits
    ///
    /// # Arguments
    ///
    /// * `universal` - clear the U/L bit instead of setting it
    /// * `individual` - clear the I/G bit instead of setting it
    pub fn random_with(universal: bool, individual: bool) -> Result<Self> {
        let mut mac = Self {
            octets: entropy::random_bytes()?,
        };
        mac.set_ul(universal);
        mac.set_ig(individual);
        debug!(mac = %mac, "generated random MAC address");
        Ok(mac)
    }

    /// Parse "xx:xx:xx:xx:xx:xx" or "xx-xx-xx-xx-xx-xx"
    ///
    /// # Examples
    ///
    /// ```
    /// use raddr_mac::MacAddress;
    ///
    /// assert!(MacAddress::parse("00:00:5E:00:53:01").is_ok());
    /// assert!(MacAddress::parse("00:00:5e-00:53:01").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let octets = parse_groups::<MAC_LEN>(text)?;
        debug!(input = text, "parsed MAC address");
        Ok(Self { octets })
    }

    /// Parse a three-group half such as an OUI ("xx:xx:xx")
    pub fn parse_half(text: &str) -> Result<[u8; HALF_LEN]> {
        parse_groups::<HALF_LEN>(text)
    }

    /// Raw bytes
    pub fn octets(&self) -> [u8; MAC_LEN] {
        self.octets
    }

    /// Colon-separated hex
    pub fn hex(&self) -> String {
        hex_groups(&self.octets)
    }

    /// Colon-separated `%08b` bytes
    pub fn binary(&self) -> String {
        bits::binary(&self.octets, 1, ':')
    }

    /// Organizationally unique identifier (first half)
    pub fn oui(&self) -> String {
        hex_groups(&self.octets[..HALF_LEN])
    }

    /// NIC-specific part (second half)
    pub fn nic(&self) -> String {
        hex_groups(&self.octets[HALF_LEN..])
    }

    /// Vendor-assigned address (U/L bit cleared)
    pub fn universal(&self) -> bool {
        self.octets[0] & UL_BIT == 0
    }

    /// Administratively assigned address (U/L bit set)
    pub fn local(&self) -> bool {
        !self.universal()
    }

    /// Single-station address (I/G bit cleared)
    pub fn individual(&self) -> bool {
        self.octets[0] & IG_BIT == 0
    }

    /// Group address (I/G bit set)
    pub fn group(&self) -> bool {
        !self.individual()
    }

    /// Same as [`individual`](Self::individual)
    pub fn unicast(&self) -> bool {
        self.individual()
    }

    /// Same as [`group`](Self::group)
    pub fn multicast(&self) -> bool {
        self.group()
    }

    /// Set or clear the U/L bit
    pub fn set_ul(&mut self, universal: bool) {
        if universal {
            self.octets[0] &= !UL_BIT;
        } else {
            self.octets[0] |= UL_BIT;
        }
    }

    /// Set or clear the I/G bit
    pub fn set_ig(&mut self, individual: bool) {
        if individual {
            self.octets[0] &= !IG_BIT;
        } else {
            self.octets[0] |= IG_BIT;
        }
    }

    /// Overwrite the first half
    ///
    /// This also overwrites the U/L and I/G bits.
    pub fn set_oui(&mut self, oui: [u8; HALF_LEN]) {
        self.octets[..HALF_LEN].copy_from_slice(&oui);
    }

    /// Overwrite the second half
    pub fn set_nic(&mut self, nic: [u8; HALF_LEN]) {
        self.octets[HALF_LEN..].copy_from_slice(&nic);
    }

    fn ul_text(&self) -> &'static str {
        if self.universal() {
            "universal (vendor assigned)"
        } else {
            "local (administratively assigned)"
        }
    }

    fn ig_text(&self) -> &'static str {
        if self.individual() {
            "individual (unicast)"
        } else {
            "group (multicast)"
        }
    }

    /// OUI/NIC brackets over the hex row
    pub fn explain_hex(&self) -> String {
        let parts = [
            Part::field(HEX_HALF_WIDTH, "OUI"),
            Part::gap(1),
            Part::field(HEX_HALF_WIDTH, "NIC"),
        ];
        art::annotate(&parts, &self.hex())
    }

    /// OUI/NIC brackets over the binary row with U/L and I/G call-outs
    pub fn explain_binary(&self) -> String {
        let parts = [
            Part::field(BIN_HALF_WIDTH, "OUI"),
            Part::gap(1),
            Part::field(BIN_HALF_WIDTH, "NIC"),
        ];
        let indent = " ".repeat(UL_COLUMN);
        let ul = (self.octets[0] & UL_BIT != 0) as u8;
        let ig = (self.octets[0] & IG_BIT != 0) as u8;

        [
            art::annotate(&parts, &self.binary()),
            format!("{}||", indent),
            format!("{}|+-- I/G bit: {} = {}", indent, ig, self.ig_text()),
            format!("{}+--- U/L bit: {} = {}", indent, ul, self.ul_text()),
        ]
        .join("\n")
    }
}

impl Explain for MacAddress {
    fn family(&self) -> &'static str {
        "MAC"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("Hex", self.hex()),
            Field::new("OUI", self.oui()),
            Field::new("NIC", self.nic()),
            Field::new("Binary", self.binary()),
            Field::new("U/L", self.ul_text()),
            Field::new("I/G", self.ig_text()),
        ]
    }

    fn explain(&self) -> String {
        format!("{}\n\n{}", self.explain_hex(), self.explain_binary())
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl FromStr for MacAddress {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_LEN]) -> Self {
        Self { octets }
    }
}

fn hex_groups(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse `N` two-digit hex groups joined by a single ':' or '-'
fn parse_groups<const N: usize>(text: &str) -> Result<[u8; N]> {
    let invalid = || AddrError::InvalidMac(text.to_string());

    let separator = if text.contains(':') { ':' } else { '-' };
    let groups: Vec<&str> = text.split(separator).collect();
    if groups.len() != N {
        return Err(invalid());
    }

    let mut octets = [0u8; N];
    for (octet, group) in octets.iter_mut().zip(groups) {
        if group.len() != 2 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        *octet = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
    }
    Ok(octets)
}
