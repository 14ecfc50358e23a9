// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The repurposed TTL field of the OPT record

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::*;
use crate::serialize::binary::*;

const RCODE_HIGH_MASK: u32 = 0xFF00_0000;
const VERSION_MASK: u32 = 0x00FF_0000;
const DNSSEC_OK_MASK: u32 = 0x0000_8000;
const Z_MASK: u32 = 0x0000_7FFF;

/// The TTL field of an OPT record, which carries the extended RCODE, the EDNS version and the
///  flags instead of a time to live.
///
/// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6.1.3)
///
/// ```text
///                +0 (MSB)                            +1 (LSB)
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  0: |         EXTENDED-RCODE        |            VERSION            |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  2: | DO|                           Z                               |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// The four fields are kept in the single wire word. Each `with_*` function replaces the bits of
///  its own field and leaves every other bit as it was.
///
/// ```
/// use hickory_edns::op::ExtendedTtl;
///
/// let ttl = ExtendedTtl::default()
///     .with_version(8)
///     .with_dnssec_ok(true)
///     .with_z(0xFFFF);
///
/// assert_eq!(u32::from(ttl), 0x0008_FFFF);
/// assert_eq!(ttl.z(), 0x7FFF);
/// assert!(ttl.dnssec_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(transparent))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Copy, Clone)]
pub struct ExtendedTtl(u32);

impl ExtendedTtl {
    /// Wraps the TTL field as read from the wire
    pub const fn new(ttl: u32) -> Self {
        Self(ttl)
    }

    /// The high 8 bits of the 12 bit response code, as stored in the top byte
    pub const fn rcode_high(self) -> u8 {
        ((self.0 & RCODE_HIGH_MASK) >> 24) as u8
    }

    /// Replaces the top byte with the high 8 bits of the response code
    pub const fn with_rcode_high(self, rcode_high: u8) -> Self {
        Self((self.0 & !RCODE_HIGH_MASK) | ((rcode_high as u32) << 24))
    }

    /// The extended part of the response code, in response code position.
    ///
    /// The low 4 bits are always zero, they belong to the message header.
    pub const fn extended_rcode(self) -> u16 {
        (self.rcode_high() as u16) << 4
    }

    /// Stores the extended part of a full 12 bit response code.
    ///
    /// The low 4 bits of `rcode` are dropped, they are carried in the message header. An
    ///  unextended code (0 through 15) therefore resets the field to 0. Response codes are 12 bits,
    ///  bits above that are dropped as well, so `0x1010` is stored as `0x010`.
    pub const fn with_extended_rcode(self, rcode: u16) -> Self {
        self.with_rcode_high((rcode >> 4) as u8)
    }

    /// The EDNS version
    pub const fn version(self) -> u8 {
        ((self.0 & VERSION_MASK) >> 16) as u8
    }

    /// Replaces the EDNS version
    pub const fn with_version(self, version: u8) -> Self {
        Self((self.0 & !VERSION_MASK) | ((version as u32) << 16))
    }

    /// The DNSSEC OK flag, [RFC 3225](https://tools.ietf.org/html/rfc3225)
    pub const fn dnssec_ok(self) -> bool {
        self.0 & DNSSEC_OK_MASK == DNSSEC_OK_MASK
    }

    /// Sets the DNSSEC OK flag to exactly `dnssec_ok`
    pub const fn with_dnssec_ok(self, dnssec_ok: bool) -> Self {
        if dnssec_ok {
            Self(self.0 | DNSSEC_OK_MASK)
        } else {
            Self(self.0 & !DNSSEC_OK_MASK)
        }
    }

    /// The 15 Z bits below the DNSSEC OK flag
    pub const fn z(self) -> u16 {
        (self.0 & Z_MASK) as u16
    }

    /// Replaces the Z bits, the high bit of `z` is ignored as that position is the DNSSEC OK flag
    pub const fn with_z(self, z: u16) -> Self {
        Self((self.0 & !Z_MASK) | (z as u32 & Z_MASK))
    }

    /// The low 16 bits: the DNSSEC OK flag and Z
    pub const fn flags(self) -> u16 {
        (self.0 & (DNSSEC_OK_MASK | Z_MASK)) as u16
    }
}

impl From<u32> for ExtendedTtl {
    fn from(ttl: u32) -> Self {
        Self(ttl)
    }
}

impl From<ExtendedTtl> for u32 {
    fn from(ttl: ExtendedTtl) -> Self {
        ttl.0
    }
}

impl BinEncodable for ExtendedTtl {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u32(self.0)
    }
}

impl<'r> BinDecodable<'r> for ExtendedTtl {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        // every bit pattern is a valid set of fields
        Ok(Self(decoder.read_u32()?.unverified()))
    }
}

impl fmt::Display for ExtendedTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rcode_high: {} version: {} dnssec_ok: {} z: 0x{:04x}",
            self.rcode_high(),
            self.version(),
            self.dnssec_ok(),
            self.z()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fields(ttl: ExtendedTtl, rcode_high: u8, version: u8, dnssec_ok: bool, z: u16) {
        assert_eq!(ttl.rcode_high(), rcode_high, "rcode_high of {ttl:?}");
        assert_eq!(ttl.version(), version, "version of {ttl:?}");
        assert_eq!(ttl.dnssec_ok(), dnssec_ok, "dnssec_ok of {ttl:?}");
        assert_eq!(ttl.z(), z, "z of {ttl:?}");
    }

    #[test]
    fn test_layout() {
        let ttl = ExtendedTtl::new(0x1234_D678);
        assert_fields(ttl, 0x12, 0x34, true, 0x5678);
        assert_eq!(ttl.flags(), 0xD678);
        assert_eq!(ttl.extended_rcode(), 0x120);
    }

    #[test]
    fn test_setters_are_isolated() {
        let mut ttl = ExtendedTtl::default();
        assert_fields(ttl, 0, 0, false, 0);

        ttl = ttl.with_dnssec_ok(true);
        assert_fields(ttl, 0, 0, true, 0);

        ttl = ttl.with_version(0xFF);
        assert_fields(ttl, 0, 0xFF, true, 0);

        ttl = ttl.with_extended_rcode(0x0FF0);
        assert_fields(ttl, 0xFF, 0xFF, true, 0);

        ttl = ttl.with_z(0x1234);
        assert_fields(ttl, 0xFF, 0xFF, true, 0x1234);

        ttl = ttl.with_dnssec_ok(false);
        assert_fields(ttl, 0xFF, 0xFF, false, 0x1234);

        // the DO position of the input is discarded
        ttl = ttl.with_z(0xFFFF);
        assert_fields(ttl, 0xFF, 0xFF, false, 0x7FFF);

        ttl = ttl.with_version(0);
        assert_fields(ttl, 0xFF, 0, false, 0x7FFF);

        ttl = ttl.with_extended_rcode(9);
        assert_fields(ttl, 0, 0, false, 0x7FFF);

        ttl = ttl.with_z(0);
        assert_eq!(u32::from(ttl), 0);
    }

    #[test]
    fn test_dnssec_ok_idempotent() {
        let ttl = ExtendedTtl::new(0x0108_0005);

        let set = ttl.with_dnssec_ok(true);
        assert_eq!(set.with_dnssec_ok(true), set);
        assert_eq!(u32::from(set), 0x0108_8005);

        let cleared = set.with_dnssec_ok(false);
        assert_eq!(cleared.with_dnssec_ok(false), cleared);
        assert_eq!(cleared, ttl);
    }

    #[test]
    fn test_extended_rcode() {
        let ttl = ExtendedTtl::default().with_version(42);

        let ttl = ttl.with_extended_rcode(42);
        assert_eq!(ttl.extended_rcode(), 42 & 0xFFF0);
        assert_eq!(ttl.rcode_high(), 2);

        // BADVERS
        let ttl = ttl.with_extended_rcode(16);
        assert_eq!(ttl.extended_rcode(), 16);
        assert_eq!(ttl.version(), 42);

        // wider than 12 bits
        let ttl = ttl.with_extended_rcode(0x1010);
        assert_eq!(ttl.extended_rcode(), 0x010);
        assert_eq!(ttl.version(), 42);
    }

    #[test]
    fn test_wire() {
        let ttl = ExtendedTtl::default()
            .with_extended_rcode(0x0170)
            .with_version(1)
            .with_dnssec_ok(true)
            .with_z(3);

        let bytes = ttl.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x17, 0x01, 0x80, 0x03]);
        assert_eq!(ExtendedTtl::from_bytes(&bytes).unwrap(), ttl);
    }
}
