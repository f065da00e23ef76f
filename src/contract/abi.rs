//! Minimal ABI codec for the fund contract
//!
//! Only what the read accessors need: 4-byte selectors, static 32-byte
//! words (`uint256`, `int256`, `bool`, `address`) and dynamic `string`.

use super::error::{RpcError, RpcResult};
use super::fixed_point::FixedPoint;
use super::types::{Address, NavEntry, PositionInfo};

const WORD: usize = 32;

/// Precomputed function selectors (first 4 bytes of keccak256 of the signature)
pub mod selector {
    /// `name()`
    pub const NAME: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
    /// `description()`
    pub const DESCRIPTION: [u8; 4] = [0x72, 0x84, 0xe4, 0x16];
    /// `currentNav()`
    pub const CURRENT_NAV: [u8; 4] = [0xc5, 0xc2, 0x52, 0x16];
    /// `totalSupply()`
    pub const TOTAL_SUPPLY: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];
    /// `inceptionDate()`
    pub const INCEPTION_DATE: [u8; 4] = [0xed, 0x7c, 0x73, 0x4a];
    /// `navHistoryLength()`
    pub const NAV_HISTORY_LENGTH: [u8; 4] = [0xcd, 0x5c, 0xa0, 0xf6];
    /// `navHistory(uint256)`
    pub const NAV_HISTORY: [u8; 4] = [0xbe, 0x3c, 0x36, 0x53];
    /// `whitelist(address)`
    pub const WHITELIST: [u8; 4] = [0x9b, 0x19, 0x25, 0x1a];
    /// `balanceOf(address)`
    pub const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
    /// `valueOf(address)`
    pub const VALUE_OF: [u8; 4] = [0xa4, 0x80, 0x28, 0xaa];
    /// `returnOf(address)`
    pub const RETURN_OF: [u8; 4] = [0xc2, 0xc2, 0x66, 0xc6];
    /// `positionInfo(address)`
    pub const POSITION_INFO: [u8; 4] = [0x3c, 0xc9, 0x63, 0xdc];
}

/// Calldata for a zero-argument accessor
pub fn encode_call(selector: [u8; 4]) -> Vec<u8> {
    selector.to_vec()
}

/// Calldata for an accessor taking one `address`
pub fn encode_call_address(selector: [u8; 4], address: &Address) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(address.as_bytes());
    data
}

/// Calldata for an accessor taking one `uint256`
pub fn encode_call_uint(selector: [u8; 4], value: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&[0u8; 24]);
    data.extend_from_slice(&value.to_be_bytes());
    data
}

/// `0x`-prefixed lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Parse `0x`-prefixed hex returned by the node
pub fn from_hex(s: &str) -> RpcResult<Vec<u8>> {
    let hex = s
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Malformed(format!("expected 0x-prefixed hex, got {:?}", s)))?;

    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(RpcError::Malformed("odd-length or non-ascii hex".to_string()));
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| RpcError::Malformed(format!("invalid hex at offset {}", i)))
        })
        .collect()
}

/// Borrow the `index`-th 32-byte word
fn word(data: &[u8], index: usize) -> RpcResult<&[u8]> {
    index
        .checked_mul(WORD)
        .and_then(|start| Some(start..start.checked_add(WORD)?))
        .and_then(|range| data.get(range))
        .ok_or_else(|| {
            RpcError::Malformed(format!(
                "word {} out of range ({} bytes returned)",
                index,
                data.len()
            ))
        })
}

/// Decode a `uint256` word that must fit in `u128`
pub fn decode_u128(data: &[u8], index: usize) -> RpcResult<u128> {
    let w = word(data, index)?;
    if w[..16].iter().any(|b| *b != 0) {
        return Err(RpcError::Malformed(format!(
            "uint256 in word {} exceeds 128 bits",
            index
        )));
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&w[16..]);
    Ok(u128::from_be_bytes(buf))
}

/// Decode a `uint256` word that must fit in `u64` (timestamps, lengths)
pub fn decode_u64(data: &[u8], index: usize) -> RpcResult<u64> {
    let value = decode_u128(data, index)?;
    u64::try_from(value)
        .map_err(|_| RpcError::Malformed(format!("uint256 in word {} exceeds 64 bits", index)))
}

/// Decode an `int256` word that must fit in `i128`
pub fn decode_i128(data: &[u8], index: usize) -> RpcResult<i128> {
    let w = word(data, index)?;
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&w[16..]);
    let value = i128::from_be_bytes(buf);

    // Upper half must be pure sign extension
    let ext = if value < 0 { 0xff } else { 0x00 };
    if w[..16].iter().any(|b| *b != ext) {
        return Err(RpcError::Malformed(format!(
            "int256 in word {} exceeds 128 bits",
            index
        )));
    }
    Ok(value)
}

pub fn decode_fixed(data: &[u8], index: usize) -> RpcResult<FixedPoint> {
    decode_u128(data, index).map(FixedPoint::from_raw)
}

/// Decode a `bool` word; anything other than 0 or 1 is rejected
pub fn decode_bool(data: &[u8], index: usize) -> RpcResult<bool> {
    match decode_u128(data, index)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RpcError::Malformed(format!(
            "non-canonical bool {} in word {}",
            other, index
        ))),
    }
}

/// Decode a single dynamic `string` return value
pub fn decode_string(data: &[u8]) -> RpcResult<String> {
    let offset = decode_u64(data, 0)? as usize;
    if offset % WORD != 0 {
        return Err(RpcError::Malformed(format!("unaligned string offset {}", offset)));
    }
    let len = decode_u64(data, offset / WORD)? as usize;
    let bytes = offset
        .checked_add(WORD)
        .and_then(|start| Some(start..start.checked_add(len)?))
        .and_then(|range| data.get(range))
        .ok_or_else(|| {
            RpcError::Malformed(format!(
                "string of {} bytes overruns {} byte response",
                len,
                data.len()
            ))
        })?;

    String::from_utf8(bytes.to_vec())
        .map_err(|e| RpcError::Malformed(format!("string is not utf-8: {}", e)))
}

/// Decode `navHistory(uint256)` -> `(uint256 timestamp, uint256 nav)`
pub fn decode_nav_entry(data: &[u8]) -> RpcResult<NavEntry> {
    Ok(NavEntry {
        timestamp: decode_u64(data, 0)?,
        nav: decode_fixed(data, 1)?,
    })
}

/// Decode `positionInfo(address)` -> `(uint256 initialInvestment, uint256 investmentDate)`
pub fn decode_position_info(data: &[u8]) -> RpcResult<PositionInfo> {
    Ok(PositionInfo {
        initial_investment: decode_fixed(data, 0)?,
        investment_date: decode_u64(data, 1)?,
    })
}

#[cfg(test)]
pub(crate) mod encode {
    //! Return-data encoders used by tests to stand in for a node

    use super::WORD;

    pub fn uint(value: u128) -> Vec<u8> {
        let mut w = vec![0u8; 16];
        w.extend_from_slice(&value.to_be_bytes());
        w
    }

    pub fn int(value: i128) -> Vec<u8> {
        let ext = if value < 0 { 0xff } else { 0x00 };
        let mut w = vec![ext; 16];
        w.extend_from_slice(&value.to_be_bytes());
        w
    }

    pub fn boolean(value: bool) -> Vec<u8> {
        uint(value as u128)
    }

    pub fn string(value: &str) -> Vec<u8> {
        let mut out = uint(WORD as u128);
        out.extend(uint(value.len() as u128));
        let mut bytes = value.as_bytes().to_vec();
        let padded = (bytes.len() + WORD - 1) / WORD * WORD;
        bytes.resize(padded, 0);
        out.extend(bytes);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_address_call() {
        let addr: Address = "0xabcd000000000000000000000000000000001234".parse().unwrap();
        let data = encode_call_address(selector::BALANCE_OF, &addr);
        assert_eq!(data.len(), 36);
        assert_eq!(
            to_hex(&data),
            "0x70a08231000000000000000000000000abcd000000000000000000000000000000001234"
        );
    }

    #[test]
    fn test_encode_uint_call() {
        let data = encode_call_uint(selector::NAV_HISTORY, 5);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &selector::NAV_HISTORY);
        assert_eq!(data[35], 5);
        assert!(data[4..35].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_hex_roundtrip_and_errors() {
        assert_eq!(from_hex("0x00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
        assert_eq!(from_hex("0x").unwrap(), Vec::<u8>::new());
        assert!(matches!(from_hex("00ff"), Err(RpcError::Malformed(_))));
        assert!(matches!(from_hex("0xabc"), Err(RpcError::Malformed(_))));
        assert!(matches!(from_hex("0xgg"), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_uint_and_overflow() {
        let data = encode::uint(1_040_000_000_000_000_000);
        assert_eq!(decode_u128(&data, 0).unwrap(), 1_040_000_000_000_000_000);

        let mut big = vec![0u8; 32];
        big[0] = 1;
        assert!(matches!(decode_u128(&big, 0), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_short_response() {
        assert!(matches!(decode_u128(&[0u8; 10], 0), Err(RpcError::Malformed(_))));
        assert!(matches!(decode_u128(&[], 0), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_signed() {
        assert_eq!(decode_i128(&encode::int(-250), 0).unwrap(), -250);
        assert_eq!(decode_i128(&encode::int(400), 0).unwrap(), 400);

        // Negative low half without sign extension
        let mut bad = encode::int(-1);
        bad[0] = 0;
        assert!(matches!(decode_i128(&bad, 0), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_bool() {
        assert!(decode_bool(&encode::boolean(true), 0).unwrap());
        assert!(!decode_bool(&encode::boolean(false), 0).unwrap());
        assert!(matches!(
            decode_bool(&encode::uint(2), 0),
            Err(RpcError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_string() {
        let data = encode::string("Meridian Growth Fund");
        assert_eq!(data.len(), 96);
        assert_eq!(decode_string(&data).unwrap(), "Meridian Growth Fund");
        assert_eq!(decode_string(&encode::string("")).unwrap(), "");
    }

    #[test]
    fn test_decode_string_overrun() {
        let mut data = encode::uint(32);
        data.extend(encode::uint(100));
        data.extend(vec![b'a'; 32]);
        assert!(matches!(decode_string(&data), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_string_huge_offset() {
        let data = encode::uint(u64::MAX as u128 - 31);
        assert!(matches!(decode_string(&data), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_string_huge_length() {
        let mut data = encode::uint(32);
        data.extend(encode::uint(u64::MAX as u128));
        assert!(matches!(decode_string(&data), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_word_index_past_address_space() {
        let data = encode::uint(1);
        assert!(matches!(decode_u128(&data, usize::MAX), Err(RpcError::Malformed(_))));
    }

    #[test]
    fn test_decode_tuples() {
        let mut data = encode::uint(1_700_000_000);
        data.extend(encode::uint(1_020_000_000_000_000_000));
        let entry = decode_nav_entry(&data).unwrap();
        assert_eq!(entry.timestamp, 1_700_000_000);
        assert_eq!(entry.nav.to_display(), 1.02);

        let mut data = encode::uint(5_000 * 1_000_000_000_000_000_000);
        data.extend(encode::uint(1_690_000_000));
        let info = decode_position_info(&data).unwrap();
        assert_eq!(info.initial_investment.to_display(), 5_000.0);
        assert_eq!(info.investment_date, 1_690_000_000);
    }
}
