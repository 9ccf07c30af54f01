// 1e18 fixed-point helpers
//
// All ratios and rates cross the chain boundary as integers scaled by 1e18
// ("mantissas"). Parsing goes through decimal strings, never through floats,
// so a value like 0.9 maps to exactly 900000000000000000.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed-point scale: 10^18
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

const DECIMALS: usize = 18;

/// Errors from decimal-string fixed-point parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("empty decimal string")]
    Empty,

    #[error("invalid character {0:?} in decimal string")]
    InvalidChar(char),

    #[error("fractional part has {0} digits, at most 18 are representable")]
    TooManyDecimals(usize),

    #[error("value does not fit in 256 bits")]
    Overflow,

    #[error("ratio must be at most 1")]
    AboveOne,
}

/// Parse a non-negative decimal string into a 1e18-scaled mantissa.
///
/// `"1"` -> 10^18, `"0.1"` -> 10^17, `"1.08"` -> 1_080_000_000_000_000_000.
/// Signs, exponents, and more than 18 fractional digits are rejected.
pub fn parse_ether(s: &str) -> Result<U256, FixedPointError> {
    if s.is_empty() {
        return Err(FixedPointError::Empty);
    }
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(FixedPointError::Empty);
    }
    // A second '.' lands in frac_part and fails the digit check here.
    if let Some(c) = int_part
        .chars()
        .chain(frac_part.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(FixedPointError::InvalidChar(c));
    }
    if frac_part.len() > DECIMALS {
        return Err(FixedPointError::TooManyDecimals(frac_part.len()));
    }

    let int = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).map_err(|_| FixedPointError::Overflow)?
    };
    let frac = if frac_part.is_empty() {
        U256::ZERO
    } else {
        let digits = U256::from_str_radix(frac_part, 10).map_err(|_| FixedPointError::Overflow)?;
        let scale = U256::from(10).pow(U256::from(DECIMALS - frac_part.len()));
        digits * scale
    };

    int.checked_mul(WAD)
        .and_then(|scaled| scaled.checked_add(frac))
        .ok_or(FixedPointError::Overflow)
}

/// A validated fraction in [0, 1], stored as a 1e18 mantissa.
///
/// Collateral factors, reserve factors, and admin fees are all `Ratio`s;
/// construction enforces the range so a config holding one never needs a
/// separate range check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Ratio(U256);

impl Ratio {
    pub const ZERO: Ratio = Ratio(U256::ZERO);
    pub const ONE: Ratio = Ratio(WAD);

    /// Build a ratio from an already-scaled mantissa.
    pub fn from_mantissa(mantissa: U256) -> Result<Self, FixedPointError> {
        if mantissa > WAD {
            return Err(FixedPointError::AboveOne);
        }
        Ok(Ratio(mantissa))
    }

    /// The 1e18-scaled value, as submitted on-chain.
    pub fn mantissa(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Ratio {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ratio::from_mantissa(parse_ether(s)?)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / WAD;
        let frac = self.0 % WAD;
        if frac.is_zero() {
            return write!(f, "{}", int);
        }
        let digits = format!("{:0>18}", frac.to_string());
        write!(f, "{}.{}", int, digits.trim_end_matches('0'))
    }
}
