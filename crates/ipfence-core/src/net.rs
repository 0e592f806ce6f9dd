//! Canonical network representation
//!
//! A [`Network`] is the identity under which a CIDR range is stored:
//! (family, masked base address, prefix length). Two CIDR strings that
//! denote the same range, host-bit literals included, normalize to the
//! same `Network`, which is what makes exact-match removal work no matter
//! how the original text was written.

use crate::error::{Error, Result};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of an address or network entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Bit width of addresses in this family
    pub fn width(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Family of the given address, determined by its literal form
    pub fn of(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

/// A network in canonical form: masked base address plus prefix length
///
/// The base address always has all bits beyond the prefix zeroed, so
/// equality on `Network` is equality of the denoted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Network {
    base: IpAddr,
    prefix_len: u8,
}

impl Network {
    /// Parse CIDR-notation text (`address/prefix`) into canonical form
    ///
    /// The family is determined by the address literal; the prefix must
    /// not exceed the family's bit width. Host bits in the literal are
    /// masked away.
    ///
    /// # Returns
    ///
    /// - `Ok(Network)`: the canonical network
    /// - `Err(Error::InvalidNetwork)`: the text is not `address/prefix`,
    ///   the address does not parse, or the prefix is out of range
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (addr_part, prefix_part) = s
            .split_once('/')
            .ok_or_else(|| Error::invalid_network(format!("'{s}' is not in CIDR notation")))?;
        if prefix_part.contains('/') {
            return Err(Error::invalid_network(format!(
                "'{s}' has more than one '/'"
            )));
        }

        let addr = addr_part
            .parse::<IpAddr>()
            .map_err(|e| Error::invalid_network(format!("bad address in '{s}': {e}")))?;
        let prefix_len = prefix_part
            .parse::<u8>()
            .map_err(|e| Error::invalid_network(format!("bad prefix in '{s}': {e}")))?;

        let width = Family::of(addr).width();
        if prefix_len > width {
            return Err(Error::invalid_network(format!(
                "prefix /{prefix_len} out of range for {addr} (max /{width})"
            )));
        }

        Ok(Self {
            base: mask_addr(addr, prefix_len),
            prefix_len,
        })
    }

    /// The masked base address
    pub fn base(&self) -> IpAddr {
        self.base
    }

    /// The prefix length
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The address family
    pub fn family(&self) -> Family {
        Family::of(self.base)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix_len)
    }
}

/// Zero all bits of `addr` beyond the first `prefix_len`
fn mask_addr(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(ip) => {
            let mask = if prefix_len == 0 {
                0
            } else {
                u32::MAX << (32 - prefix_len as u32)
            };
            IpAddr::V4(Ipv4Addr::from(u32::from(ip) & mask))
        }
        IpAddr::V6(ip) => {
            let mask = if prefix_len == 0 {
                0
            } else {
                u128::MAX << (128 - prefix_len as u32)
            };
            IpAddr::V6(Ipv6Addr::from(u128::from(ip) & mask))
        }
    }
}
