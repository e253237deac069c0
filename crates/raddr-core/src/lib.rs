//! Core types and traits for random-addr
//!
//! This crate provides the pieces shared by the address crates:
//! - [`AddrError`] - Error types
//! - [`Explain`] - Rendering trait implemented by every address type
//! - [`Summary`] - Serializable view of an explained address
//! - [`bits`] - Bit-field helpers over fixed byte arrays
//! - [`art`] - ASCII-art brackets, annotated rows and tables
//! - [`entropy`] - Random bytes from the operating system
//!
//! ```
//! use raddr_core::art;
//!
//! assert_eq!(art::bracket_top(8), " __/\\__ ");
//! assert_eq!(art::bracket_bottom(8), "|      |");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod art;
pub mod bits;
pub mod entropy;

/// Number of bits in a byte
pub const BITS_PER_BYTE: usize = 8;

/// Error types for address operations
#[derive(Error, Debug)]
pub enum AddrError {
    /// Malformed MAC address text
    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),

    /// Malformed IP address text
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    /// Malformed prefix text
    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Prefix length larger than the address
    #[error("Invalid prefix length: {len} (must be 0-{max})")]
    PrefixLengthOutOfRange { len: usize, max: usize },

    /// Random source failure
    #[error("Random source failed: {0}")]
    Entropy(String),
}

/// Result type alias for address operations
pub type Result<T> = std::result::Result<T, AddrError>;

/// Parse the decimal prefix length that follows a '/'
///
/// Only plain decimal digits without leading zeros are accepted.
///
/// # Examples
///
/// ```
/// use raddr_core::parse_prefix_len;
///
/// assert_eq!(parse_prefix_len("24", 32).unwrap(), 24);
/// assert!(parse_prefix_len("024", 32).is_err());
/// assert!(parse_prefix_len("33", 32).is_err());
/// ```
pub fn parse_prefix_len(text: &str, max: usize) -> Result<u8> {
    let invalid = || AddrError::InvalidPrefix(text.to_string());

    if text.is_empty()
        || !text.bytes().all(|b| b.is_ascii_digit())
        || (text.len() > 1 && text.starts_with('0'))
    {
        return Err(invalid());
    }

    let len: usize = text.parse().map_err(|_| invalid())?;
    if len > max {
        return Err(AddrError::PrefixLengthOutOfRange { len, max });
    }

    u8::try_from(len).map_err(|_| invalid())
}

/// A single named value of an explained address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (e.g., "OUI", "Network")
    pub name: String,
    /// Rendered value
    pub value: String,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Serializable summary of an address
///
/// # Examples
///
/// ```
/// use raddr_core::{Field, Summary};
///
/// let summary = Summary {
///     family: "MAC".to_string(),
///     address: "00:00:5e:00:53:01".to_string(),
///     fields: vec![Field::new("OUI", "00:00:5e")],
/// };
/// assert_eq!(summary.get("OUI"), Some("00:00:5e"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Address family ("MAC", "IPv4", "IPv6")
    pub family: String,
    /// Canonical textual form of the address
    pub address: String,
    /// Named fields in display order
    pub fields: Vec<Field>,
}

impl Summary {
    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Human-readable rendering of an address
///
/// Implemented by every address type so callers can render any of them
/// through a trait object.
pub trait Explain: fmt::Display {
    /// Address family name used in headings
    fn family(&self) -> &'static str;

    /// Named fields shown in tables and summaries
    fn fields(&self) -> Vec<Field>;

    /// Full ASCII-art explanation
    fn explain(&self) -> String;

    /// Fixed-width table of all fields
    fn table(&self) -> String {
        art::table(&self.fields())
    }

    /// Serializable summary of all fields
    fn summary(&self) -> Summary {
        Summary {
            family: self.family().to_string(),
            address: self.to_string(),
            fields: self.fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl fmt::Display for Dummy {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "dummy")
        }
    }

    impl Explain for Dummy {
        fn family(&self) -> &'static str {
            "Dummy"
        }

        fn fields(&self) -> Vec<Field> {
            vec![Field::new("Name", "dummy"), Field::new("Bits", "0101")]
        }

        fn explain(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_error_display() {
        let err = AddrError::InvalidMac("zz:00".to_string());
        assert_eq!(format!("{}", err), "Invalid MAC address: zz:00");

        let err = AddrError::PrefixLengthOutOfRange { len: 33, max: 32 };
        assert_eq!(format!("{}", err), "Invalid prefix length: 33 (must be 0-32)");
    }

    #[test]
    fn test_parse_prefix_len() {
        assert_eq!(parse_prefix_len("0", 32).unwrap(), 0);
        assert_eq!(parse_prefix_len("128", 128).unwrap(), 128);
        assert!(matches!(
            parse_prefix_len("129", 128),
            Err(AddrError::PrefixLengthOutOfRange { len: 129, max: 128 })
        ));
        assert!(parse_prefix_len("", 32).is_err());
        assert!(parse_prefix_len("+8", 32).is_err());
        assert!(parse_prefix_len("08", 32).is_err());
        assert!(parse_prefix_len("99999999999999999999999", 32).is_err());
    }

    #[test]
    fn test_summary_from_trait() {
        let summary = Dummy.summary();
        assert_eq!(summary.family, "Dummy");
        assert_eq!(summary.address, "dummy");
        assert_eq!(summary.get("Bits"), Some("0101"));
        assert_eq!(summary.get("Missing"), None);
    }

    #[test]
    fn test_table_from_trait() {
        let table = Dummy.table();
        assert!(table.contains("| Name | dummy |"));
        assert!(table.contains("| Bits | 0101  |"));
    }

    #[test]
    fn test_summary_serialization() {
        let summary = Dummy.summary();
        let json = serde_json::to_string(&summary).expect("serialization failed");
        assert_eq!(
            json,
            r#"{"family":"Dummy","address":"dummy","fields":[{"name":"Name","value":"dummy"},{"name":"Bits","value":"0101"}]}"#
        );
    }

    #[test]
    fn test_summary_deserialization() {
        let json = r#"{"family":"IPv4","address":"10.0.0.1","fields":[{"name":"Type","value":"private unicast"}]}"#;
        let summary: Summary = serde_json::from_str(json).expect("deserialization failed");
        assert_eq!(summary.family, "IPv4");
        assert_eq!(summary.get("Type"), Some("private unicast"));
    }

    #[test]
    fn test_result_type() {
        fn returns_error() -> Result<()> {
            Err(AddrError::Entropy("unavailable".to_string()))
        }

        assert!(returns_error().is_err());
    }
}
