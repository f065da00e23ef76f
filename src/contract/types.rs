//! Contract value types
//!
//! Addresses and the raw tuples returned by the fund contract's
//! multi-value accessors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::fixed_point::FixedPoint;

/// 20-byte account or contract address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Abbreviated form for display, e.g. `0xabcd…1234`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Errors parsing an address string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x")]
    MissingPrefix,

    #[error("Address must have 40 hex digits, got {0}")]
    Length(usize),

    #[error("Address contains non-hex character")]
    InvalidHex,
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses `0x`-prefixed hex; case is ignored (checksums are not verified)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if hex.len() != 40 {
            return Err(AddressError::Length(hex.len()));
        }
        if !hex.is_ascii() {
            return Err(AddressError::InvalidHex);
        }

        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| AddressError::InvalidHex)?;
        }

        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

/// One entry of the on-chain NAV history, as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    /// Unix seconds
    pub timestamp: u64,
    pub nav: FixedPoint,
}

/// Result of `positionInfo(address)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionInfo {
    pub initial_investment: FixedPoint,
    /// Unix seconds
    pub investment_date: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let addr: Address = "0xABCDef0000000000000000000000000000001234".parse().unwrap();
        assert_eq!(addr.to_string(), "0xabcdef0000000000000000000000000000001234");
        assert_eq!(addr.short(), "0xabcd…1234");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abcd".parse::<Address>().unwrap_err(),
            AddressError::MissingPrefix
        );
        assert_eq!("0x1234".parse::<Address>().unwrap_err(), AddressError::Length(4));
        assert_eq!(
            "0xzz00000000000000000000000000000000000000"
                .parse::<Address>()
                .unwrap_err(),
            AddressError::InvalidHex
        );
    }

    #[test]
    fn test_zero() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(
            Address::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_serde_as_string() {
        let addr: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x00000000000000000000000000000000000000ff\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
