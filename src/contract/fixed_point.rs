//! Fixed-point conversions
//!
//! The fund contract reports every monetary and share quantity as an
//! integer scaled by 10^18. [`FixedPoint`] wraps that raw integer; the only
//! way out of it is [`FixedPoint::to_display`], which yields a plain `f64`.
//! A display value therefore cannot be scaled a second time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 10^18, the implied scale of every fixed-point value
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Basis points per percent (return rates arrive as bps)
pub const BPS_PER_PERCENT: f64 = 100.0;

/// Raw 18-decimal fixed-point integer as returned by the contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedPoint(u128);

impl FixedPoint {
    pub const ZERO: Self = Self(0);

    /// One whole unit (1.0 in display form)
    pub const ONE: Self = Self(WAD);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Convert to a display decimal: `raw / 10^18`
    ///
    /// Integer and fractional parts are converted separately so large
    /// balances keep their fractional digits.
    pub fn to_display(self) -> f64 {
        let whole = (self.0 / WAD) as f64;
        let frac = (self.0 % WAD) as f64 / WAD as f64;
        whole + frac
    }
}

impl From<u128> for FixedPoint {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FixedPoint {
    /// Exact decimal rendering with trailing zeros trimmed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WAD;
        let frac = self.0 % WAD;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

/// Scale a raw fixed-point integer to its display value
pub fn scale(raw: u128) -> f64 {
    FixedPoint::from_raw(raw).to_display()
}

/// Convert a basis-point integer to a signed percentage
pub fn bps_to_percent(bps: i128) -> f64 {
    bps as f64 / BPS_PER_PERCENT
}
