use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ethnum::I256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Signed fixed-point number with 18 fractional digits.
///
/// The value is an integer scaled by 10^18 that must fit in 192 bits. It is
/// held in an `I256` so intermediate products can be range-checked, and is
/// always within `[Decimal::MIN, Decimal::MAX]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(I256);

const SCALE: I256 = I256::new(1_000_000_000_000_000_000);
const RAW_MAX: I256 = I256::from_words(i64::MAX as i128, -1);
const RAW_MIN: I256 = I256::from_words(i64::MIN as i128, 0);

impl Decimal {
    /// Number of fractional digits.
    pub const SCALE: u32 = 18;
    /// Width of the little-endian byte form.
    pub const BYTES: usize = 24;

    pub const ZERO: Self = Self(I256::ZERO);
    pub const ONE: Self = Self(SCALE);
    pub const MAX: Self = Self(RAW_MAX);
    pub const MIN: Self = Self(RAW_MIN);

    fn checked_from_raw(raw: I256) -> Option<Self> {
        (RAW_MIN..=RAW_MAX).contains(&raw).then_some(Self(raw))
    }

    /// Build from the raw scaled integer, failing outside the 192-bit range.
    pub fn from_raw(raw: I256) -> Result<Self, TypeError> {
        Self::checked_from_raw(raw).ok_or(TypeError::DecimalOverflow)
    }

    /// The raw scaled integer (`value * 10^18`).
    pub fn raw(&self) -> I256 {
        self.0
    }

    /// Decode the 24-byte little-endian two's-complement form.
    pub fn from_le_bytes(bytes: &[u8; Self::BYTES]) -> Self {
        let fill = if bytes[Self::BYTES - 1] & 0x80 != 0 { 0xff } else { 0x00 };
        let mut wide = [fill; 32];
        wide[..Self::BYTES].copy_from_slice(bytes);
        Self(I256::from_le_bytes(wide))
    }

    /// Decode from a slice, checking its length.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; Self::BYTES] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: Self::BYTES,
            actual: bytes.len(),
        })?;
        Ok(Self::from_le_bytes(&arr))
    }

    /// The 24-byte little-endian two's-complement form.
    pub fn to_le_bytes(&self) -> [u8; Self::BYTES] {
        let wide = self.0.to_le_bytes();
        let mut out = [0u8; Self::BYTES];
        out.copy_from_slice(&wide[..Self::BYTES]);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0 == I256::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < I256::ZERO
    }

    pub fn is_positive(&self) -> bool {
        self.0 > I256::ZERO
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).and_then(Self::checked_from_raw)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).and_then(Self::checked_from_raw)
    }

    pub fn checked_mul(self, other: Self) -> Option<Self> {
        // An I256 overflow already implies a result outside 192 bits.
        let product = self.0.checked_mul(other.0)?;
        Self::checked_from_raw(product / SCALE)
    }

    pub fn checked_div(self, other: Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let numerator = self.0.checked_mul(SCALE)?;
        Self::checked_from_raw(numerator / other.0)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().and_then(Self::checked_from_raw)
    }

    pub fn checked_abs(self) -> Option<Self> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Some(self)
        }
    }

    /// Largest integral value not greater than `self`.
    pub fn checked_floor(self) -> Option<Self> {
        let whole = self.0 / SCALE;
        let whole = if self.0 % SCALE < I256::ZERO {
            whole - I256::ONE
        } else {
            whole
        };
        whole.checked_mul(SCALE).and_then(Self::checked_from_raw)
    }

    /// Smallest integral value not less than `self`.
    pub fn checked_ceiling(self) -> Option<Self> {
        let whole = self.0 / SCALE;
        let whole = if self.0 % SCALE > I256::ZERO {
            whole + I256::ONE
        } else {
            whole
        };
        whole.checked_mul(SCALE).and_then(Self::checked_from_raw)
    }

    fn parse_digits(digits: &str, input: &str) -> Result<I256, TypeError> {
        digits.bytes().try_fold(I256::ZERO, |acc, b| {
            if !b.is_ascii_digit() {
                return Err(TypeError::InvalidDecimal(input.to_string()));
            }
            acc.checked_mul(I256::new(10))
                .and_then(|v| v.checked_add(I256::new(i128::from(b - b'0'))))
                .ok_or(TypeError::DecimalOverflow)
        })
    }
}

impl FromStr for Decimal {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidDecimal(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, fraction) = match body.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (body, ""),
        };
        if whole.is_empty() || (body.contains('.') && fraction.is_empty()) {
            return Err(invalid());
        }
        if fraction.len() > Self::SCALE as usize {
            return Err(TypeError::DecimalScale {
                digits: fraction.len(),
            });
        }

        let whole = Self::parse_digits(whole, s)?;
        let mut fraction_raw = Self::parse_digits(fraction, s)?;
        for _ in fraction.len()..Self::SCALE as usize {
            fraction_raw *= I256::new(10);
        }

        let magnitude = whole
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction_raw))
            .ok_or(TypeError::DecimalOverflow)?;
        let raw = if negative { -magnitude } else { magnitude };
        Self::from_raw(raw)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        let whole = magnitude / SCALE;
        let fraction = (magnitude % SCALE).as_i128();
        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{whole}")?;
        if fraction != 0 {
            let digits = format!("{fraction:018}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self(I256::new(i128::from(value)) * SCALE)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self(I256::new(i128::from(value)) * SCALE)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl PartialEq<i64> for Decimal {
    fn eq(&self, other: &i64) -> bool {
        *self == Self::from(*other)
    }
}

impl PartialOrd<i64> for Decimal {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.partial_cmp(&Self::from(*other))
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
