//! Fixed-width binary form of IPv4 and IPv6 addresses.
//!
//! Addresses are stored big-endian so that byte-wise lexicographic order
//! equals numeric order of the address as an unsigned 32 or 128 bit integer.

use std::cmp::Ordering;
use std::fmt;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family of a [`BinaryAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4, 4 bytes.
    V4,
    /// IPv6, 16 bytes.
    V6,
}

impl AddressFamily {
    /// Width of an address in bits.
    #[must_use]
    pub const fn max_bits(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    /// Width of an address in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::V4 => 4,
            Self::V6 => 16,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// An address in fixed-width big-endian form.
///
/// IPv4 addresses occupy the first four bytes; the rest stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryAddress {
    family: AddressFamily,
    bytes: [u8; 16],
}

impl BinaryAddress {
    /// Build an IPv4 address from its octets.
    #[must_use]
    pub fn v4(octets: [u8; 4]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..4].copy_from_slice(&octets);
        Self {
            family: AddressFamily::V4,
            bytes,
        }
    }

    /// Build an IPv6 address from its octets.
    #[must_use]
    pub const fn v6(octets: [u8; 16]) -> Self {
        Self {
            family: AddressFamily::V6,
            bytes: octets,
        }
    }

    /// Address family.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        self.family
    }

    /// The significant bytes, big-endian.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.family.width()]
    }

    /// Mask with the top `bits` bits set.
    ///
    /// `bits` is clamped to the family width.
    #[must_use]
    pub fn left_mask(family: AddressFamily, bits: u8) -> Self {
        let bits = bits.min(family.max_bits()) as usize;
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().take(family.width()).enumerate() {
            let set = bits.saturating_sub(i * 8).min(8);
            *byte = (0xFF00u16 >> set) as u8;
        }
        Self { family, bytes }
    }

    /// Mask with the bottom `bits` bits set.
    ///
    /// `bits` is clamped to the family width.
    #[must_use]
    pub fn right_mask(family: AddressFamily, bits: u8) -> Self {
        let bits = bits.min(family.max_bits());
        Self::left_mask(family, family.max_bits() - bits).not()
    }

    /// Bitwise AND. Both operands must share a family.
    #[must_use]
    pub fn and(&self, mask: &Self) -> Self {
        debug_assert_eq!(self.family, mask.family);
        self.zip_with(mask, |a, b| a & b)
    }

    /// Bitwise OR. Both operands must share a family.
    #[must_use]
    pub fn or(&self, mask: &Self) -> Self {
        debug_assert_eq!(self.family, mask.family);
        self.zip_with(mask, |a, b| a | b)
    }

    fn not(&self) -> Self {
        let mut out = *self;
        for byte in out.bytes.iter_mut().take(self.family.width()) {
            *byte = !*byte;
        }
        out
    }

    fn zip_with(&self, other: &Self, op: impl Fn(u8, u8) -> u8) -> Self {
        let mut out = *self;
        for (dst, src) in out.bytes.iter_mut().zip(other.bytes.iter()) {
            *dst = op(*dst, *src);
        }
        out
    }

    /// Convert back to a standard library address.
    #[must_use]
    pub fn to_ip_addr(&self) -> IpAddr {
        match self.family {
            AddressFamily::V4 => IpAddr::V4(Ipv4Addr::new(
                self.bytes[0],
                self.bytes[1],
                self.bytes[2],
                self.bytes[3],
            )),
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::from(self.bytes)),
        }
    }
}

/// Ordering is only defined between addresses of the same family.
impl PartialOrd for BinaryAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.family != other.family {
            return None;
        }
        Some(self.as_bytes().cmp(other.as_bytes()))
    }
}

impl From<IpAddr> for BinaryAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Self::v4(v4.octets()),
            IpAddr::V6(v6) => Self::v6(v6.octets()),
        }
    }
}

impl FromStr for BinaryAddress {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpAddr>().map(Self::from)
    }
}

impl fmt::Display for BinaryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ip_addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> BinaryAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_v4() {
        let a = addr("192.168.1.1");
        assert_eq!(a.family(), AddressFamily::V4);
        assert_eq!(a.as_bytes(), &[192, 168, 1, 1]);
    }

    #[test]
    fn test_parse_v6() {
        let a = addr("2001:db8::1");
        assert_eq!(a.family(), AddressFamily::V6);
        assert_eq!(a.as_bytes().len(), 16);
        assert_eq!(a.as_bytes()[0], 0x20);
        assert_eq!(a.as_bytes()[15], 0x01);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("192.168.1".parse::<BinaryAddress>().is_err());
        assert!("256.0.0.1".parse::<BinaryAddress>().is_err());
        assert!("not-an-ip".parse::<BinaryAddress>().is_err());
        assert!("".parse::<BinaryAddress>().is_err());
    }

    #[test]
    fn test_left_mask() {
        assert_eq!(
            BinaryAddress::left_mask(AddressFamily::V4, 24).as_bytes(),
            &[255, 255, 255, 0]
        );
        assert_eq!(
            BinaryAddress::left_mask(AddressFamily::V4, 12).as_bytes(),
            &[255, 240, 0, 0]
        );
        assert_eq!(
            BinaryAddress::left_mask(AddressFamily::V4, 0).as_bytes(),
            &[0, 0, 0, 0]
        );
        assert_eq!(
            BinaryAddress::left_mask(AddressFamily::V4, 32).as_bytes(),
            &[255, 255, 255, 255]
        );

        let v6 = BinaryAddress::left_mask(AddressFamily::V6, 65);
        assert!(v6.as_bytes()[..8].iter().all(|b| *b == 0xFF));
        assert_eq!(v6.as_bytes()[8], 0x80);
        assert!(v6.as_bytes()[9..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_right_mask() {
        assert_eq!(
            BinaryAddress::right_mask(AddressFamily::V4, 8).as_bytes(),
            &[0, 0, 0, 255]
        );
        assert_eq!(
            BinaryAddress::right_mask(AddressFamily::V4, 20).as_bytes(),
            &[0, 15, 255, 255]
        );
        assert_eq!(
            BinaryAddress::right_mask(AddressFamily::V4, 0).as_bytes(),
            &[0, 0, 0, 0]
        );
    }

    #[test]
    fn test_mask_apply() {
        let a = addr("192.168.1.2");
        let low = a.and(&BinaryAddress::left_mask(AddressFamily::V4, 24));
        let high = low.or(&BinaryAddress::right_mask(AddressFamily::V4, 8));
        assert_eq!(low, addr("192.168.1.0"));
        assert_eq!(high, addr("192.168.1.255"));
    }

    #[test]
    fn test_ordering() {
        assert!(addr("10.0.0.1") < addr("10.0.0.2"));
        assert!(addr("9.255.255.255") < addr("10.0.0.0"));
        assert!(addr("::1") < addr("::2"));
        assert_eq!(addr("10.0.0.1").partial_cmp(&addr("::1")), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(addr("10.0.0.1").to_string(), "10.0.0.1");
        assert_eq!(addr("2001:0db8:0000::0001").to_string(), "2001:db8::1");
    }
}
