// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The client subnet option, [RFC 7871](https://tools.ietf.org/html/rfc7871)

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use ipnet::IpNet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

/// Address family of an IPv4 subnet, from the IANA address family numbers
pub const FAMILY_IPV4: u16 = 1;

/// Address family of an IPv6 subnet
pub const FAMILY_IPV6: u16 = 2;

/// The network a query originates from, so that an authority can tailor its answer
///
/// ```text
///                 +0 (MSB)                            +1 (LSB)
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   0: |                          OPTION-CODE                          |
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   2: |                         OPTION-LENGTH                         |
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   4: |                            FAMILY                             |
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   6: |     SOURCE PREFIX-LENGTH      |     SCOPE PREFIX-LENGTH       |
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   8: |                           ADDRESS...                          /
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// Only the first `ceil(source_prefix / 8)` bytes of the address are written, with the bits past
///  the source prefix cleared.
///
/// The family and prefixes are written as set, they are not derived again from the address. An
///  IPv4 address may be sent under family 2 as an IPv4-mapped address, and an IPv4-mapped IPv6
///  address under family 1.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ClientSubnet {
    family: u16,
    source_prefix: u8,
    scope_prefix: u8,
    address: IpAddr,
}

impl ClientSubnet {
    /// Construct a new client subnet, the family is taken from the address
    ///
    /// ```
    /// use std::net::{IpAddr, Ipv4Addr};
    /// use hickory_edns::rr::rdata::opt::ClientSubnet;
    ///
    /// let subnet = ClientSubnet::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 0)), 24, 0);
    /// assert_eq!(subnet.family(), 1);
    /// assert_eq!(subnet.to_string(), "192.0.2.0/24/0");
    /// ```
    pub fn new(address: IpAddr, source_prefix: u8, scope_prefix: u8) -> Self {
        let family = match address {
            IpAddr::V4(_) => FAMILY_IPV4,
            IpAddr::V6(_) => FAMILY_IPV6,
        };

        Self {
            family,
            source_prefix,
            scope_prefix,
            address,
        }
    }

    /// The address family, 1 for IPv4 and 2 for IPv6
    pub fn family(&self) -> u16 {
        self.family
    }

    /// Overrides the family derived from the address
    pub fn set_family(&mut self, family: u16) -> &mut Self {
        self.family = family;
        self
    }

    /// Leftmost number of significant bits of the address, set by the client
    pub fn source_prefix(&self) -> u8 {
        self.source_prefix
    }

    /// Set the source prefix
    pub fn set_source_prefix(&mut self, source_prefix: u8) -> &mut Self {
        self.source_prefix = source_prefix;
        self
    }

    /// Leftmost number of bits of the address the response covers, set by the server
    pub fn scope_prefix(&self) -> u8 {
        self.scope_prefix
    }

    /// Set the scope prefix
    pub fn set_scope_prefix(&mut self, scope_prefix: u8) -> &mut Self {
        self.scope_prefix = scope_prefix;
        self
    }

    /// The address of the subnet
    pub fn addr(&self) -> IpAddr {
        self.address
    }

    /// Set the address, the family is left as is
    pub fn set_addr(&mut self, address: IpAddr) -> &mut Self {
        self.address = address;
        self
    }

    /// The address octets in the width of the declared family
    fn family_octets(&self) -> ProtoResult<Vec<u8>> {
        let octets = match (self.family, self.address) {
            (FAMILY_IPV4, IpAddr::V4(addr)) => addr.octets().to_vec(),
            (FAMILY_IPV4, IpAddr::V6(addr)) => addr
                .to_ipv4_mapped()
                .ok_or(ProtoErrorKind::SubnetAddressMismatch {
                    family: self.family,
                    address: self.address,
                })?
                .octets()
                .to_vec(),
            (FAMILY_IPV6, IpAddr::V4(addr)) => addr.to_ipv6_mapped().octets().to_vec(),
            (FAMILY_IPV6, IpAddr::V6(addr)) => addr.octets().to_vec(),
            (family, _) => return Err(ProtoErrorKind::UnknownSubnetFamily(family).into()),
        };

        Ok(octets)
    }
}

/// Number of address bytes needed to hold `prefix` bits
fn prefix_bytes(prefix: u8) -> usize {
    (usize::from(prefix) + 7) / 8
}

/// Clears every bit after the first `prefix` bits
fn mask_to_prefix(octets: &mut [u8], prefix: u8) {
    let prefix = usize::from(prefix);
    for (i, octet) in octets.iter_mut().enumerate() {
        let bits = prefix.saturating_sub(i * 8);
        *octet &= match bits {
            0 => 0,
            1..=7 => 0xFF << (8 - bits),
            _ => 0xFF,
        };
    }
}

impl EdnsOptionData for ClientSubnet {
    fn len(&self) -> usize {
        4 + prefix_bytes(self.source_prefix)
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        if data.len() < 4 {
            return Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::Subnet.into(),
                len: data.len(),
            }
            .into());
        }

        let mut decoder = BinDecoder::new(data);
        let family = decoder.read_u16()?.unverified(/*checked below*/);
        let width = match family {
            FAMILY_IPV4 => 4,
            FAMILY_IPV6 => 16,
            _ => return Err(DecodeError::UnknownSubnetFamily(family).into()),
        };

        let fits = |prefix: &u8| usize::from(*prefix) <= width * 8;
        let source_prefix = decoder
            .read_u8()?
            .verify_unwrap(fits)
            .map_err(|prefix| DecodeError::SubnetPrefixTooLong { family, prefix })?;
        let scope_prefix = decoder
            .read_u8()?
            .verify_unwrap(fits)
            .map_err(|prefix| DecodeError::SubnetPrefixTooLong { family, prefix })?;

        let truncated = decoder.read_slice(decoder.len())?.unverified(/*length checked below*/);
        if truncated.len() > width {
            return Err(DecodeError::SubnetAddressTooLong {
                family,
                len: truncated.len(),
            }
            .into());
        }

        let mut octets = [0_u8; 16];
        octets[..truncated.len()].copy_from_slice(truncated);

        let mut masked = octets;
        mask_to_prefix(&mut masked, source_prefix);
        if masked != octets {
            warn!("client subnet address has bits set beyond source prefix {source_prefix}");
        }

        let address = if family == FAMILY_IPV4 {
            IpAddr::V4(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
        } else {
            IpAddr::V6(Ipv6Addr::from(octets))
        };

        Ok(Self {
            family,
            source_prefix,
            scope_prefix,
            address,
        })
    }
}

impl BinEncodable for ClientSubnet {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        let mut octets = self.family_octets()?;
        if usize::from(self.source_prefix) > octets.len() * 8 {
            return Err(ProtoErrorKind::SubnetPrefixTooLong {
                family: self.family,
                prefix: self.source_prefix,
            }
            .into());
        }

        mask_to_prefix(&mut octets, self.source_prefix);
        octets.truncate(prefix_bytes(self.source_prefix));

        encoder.emit_u16(self.family)?;
        encoder.emit_u8(self.source_prefix)?;
        encoder.emit_u8(self.scope_prefix)?;
        encoder.emit_vec(&octets)
    }
}

impl From<IpNet> for ClientSubnet {
    fn from(net: IpNet) -> Self {
        Self::new(net.addr(), net.prefix_len(), 0)
    }
}

impl FromStr for ClientSubnet {
    type Err = ipnet::AddrParseError;

    /// Parses a subnet such as `192.0.2.0/24`, the scope prefix is 0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpNet::from_str(s).map(Self::from)
    }
}

impl fmt::Display for ClientSubnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.address, self.source_prefix, self.scope_prefix
        )
    }
}
