//! Address ranges and the `deny_ip` / `nat_ip` payload grammar.

use std::fmt;

use thiserror::Error;

use super::address::{AddressFamily, BinaryAddress};

/// Why an address-range payload produced no entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeSpecError {
    /// An address did not parse.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The two ends of an explicit range are in different families.
    #[error("range '{low}-{high}' mixes address families")]
    MixedFamily {
        /// Low end as written.
        low: String,
        /// High end as written.
        high: String,
    },

    /// Prefix length is not a number or is wider than the family.
    #[error("invalid prefix length '{0}'")]
    InvalidPrefix(String),
}

/// An inclusive range of addresses of a single family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    low: BinaryAddress,
    high: BinaryAddress,
}

impl AddressRange {
    /// Create a range from its ends.
    ///
    /// Returns `None` if the ends belong to different families. The ends
    /// are not reordered: a range with `low > high` contains nothing.
    #[must_use]
    pub fn new(low: BinaryAddress, high: BinaryAddress) -> Option<Self> {
        (low.family() == high.family()).then_some(Self { low, high })
    }

    /// Create the range covered by `addr/bits`.
    ///
    /// Returns `None` if `bits` exceeds the family width.
    #[must_use]
    pub fn from_cidr(addr: BinaryAddress, bits: u8) -> Option<Self> {
        let family = addr.family();
        let max_bits = family.max_bits();
        if bits > max_bits {
            return None;
        }
        let low = addr.and(&BinaryAddress::left_mask(family, bits));
        let high = low.or(&BinaryAddress::right_mask(family, max_bits - bits));
        Some(Self { low, high })
    }

    /// Parse a range payload.
    ///
    /// Accepted forms:
    /// - `A-B`: explicit range, split at the last `-`
    /// - `A/bits`: CIDR block
    /// - `A`: a single host (`/32` for IPv4, `/128` for IPv6)
    ///
    /// # Errors
    ///
    /// Returns a [`RangeSpecError`] when an address or prefix is malformed,
    /// or when the ends of an explicit range differ in family.
    pub fn parse_spec(spec: &str) -> Result<Self, RangeSpecError> {
        if let Some((low, high)) = spec.rsplit_once('-') {
            let (low, high) = (low.trim(), high.trim());
            let lo = parse_address(low)?;
            let hi = parse_address(high)?;
            return Self::new(lo, hi).ok_or_else(|| RangeSpecError::MixedFamily {
                low: low.to_string(),
                high: high.to_string(),
            });
        }

        let (text, bits) = match spec.rsplit_once('/') {
            Some((text, bits)) => (text.trim(), Some(bits.trim())),
            None => (spec.trim(), None),
        };
        let addr = parse_address(text)?;
        let bits = match bits {
            Some(bits) => bits
                .parse::<u8>()
                .map_err(|_| RangeSpecError::InvalidPrefix(bits.to_string()))?,
            None => addr.family().max_bits(),
        };
        Self::from_cidr(addr, bits).ok_or_else(|| RangeSpecError::InvalidPrefix(bits.to_string()))
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn low(&self) -> &BinaryAddress {
        &self.low
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn high(&self) -> &BinaryAddress {
        &self.high
    }

    /// Address family of both ends.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        self.low.family()
    }

    /// Whether `addr` lies within the range.
    ///
    /// Always false for an address of the other family.
    #[must_use]
    pub fn contains(&self, addr: &BinaryAddress) -> bool {
        addr.family() == self.family() && self.low <= *addr && *addr <= self.high
    }
}

fn parse_address(text: &str) -> Result<BinaryAddress, RangeSpecError> {
    text.parse()
        .map_err(|_| RangeSpecError::InvalidAddress(text.to_string()))
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}
