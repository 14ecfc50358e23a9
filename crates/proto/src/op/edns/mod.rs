// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Extended DNS options

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::*,
    op::ResponseCode,
    rr::{
        rdata::{
            opt::{self, EdnsCode, EdnsOption},
            OPT,
        },
        RecordType,
    },
    serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, DecodeError, Restrict},
};

mod ttl;

pub use self::ttl::ExtendedTtl;

/// The payload size advertised when none is configured, as recommended by DNS Flag Day 2020.
pub const DEFAULT_MAX_PAYLOAD: u16 = 1232;

/// Payload sizes below this are treated as this value, [RFC 6891](https://tools.ietf.org/html/rfc6891#section-6.2.3)
pub const MIN_MAX_PAYLOAD: u16 = 512;

/// Edns implements the higher level concepts for working with extended dns as it is used to create or be
/// created from OPT record data.
///
/// The record owner is always the root and the type always OPT, so only the repurposed CLASS
///  (payload size) and TTL fields are stored, along with the option list.
///
/// ```text
///     +------------+--------------+------------------------------+
///     | Field Name | Field Type   | Description                  |
///     +------------+--------------+------------------------------+
///     | NAME       | domain name  | MUST be 0 (root domain)      |
///     | TYPE       | u_int16_t    | OPT (41)                     |
///     | CLASS      | u_int16_t    | requestor's UDP payload size |
///     | TTL        | u_int32_t    | extended RCODE and flags     |
///     | RDLEN      | u_int16_t    | length of all RDATA          |
///     | RDATA      | octet stream | {attribute,value} pairs      |
///     +------------+--------------+------------------------------+
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Edns {
    // requestor's UDP payload size (from RR CLASS)
    max_payload: u16,
    // high bits of the rcode, version, DNSSEC OK and Z (from RR TTL)
    ttl: ExtendedTtl,
    options: OPT,
}

impl Default for Edns {
    fn default() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
            ttl: ExtendedTtl::default(),
            options: OPT::default(),
        }
    }
}

impl Edns {
    /// Creates a new extended DNS object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the EDNS object from the CLASS, TTL and RDATA of an OPT record
    pub fn from_parts(max_payload: u16, ttl: u32, options: OPT) -> Self {
        Self {
            max_payload,
            ttl: ExtendedTtl::new(ttl),
            options,
        }
    }

    /// The high order bytes for the response code in the DNS Message
    pub fn rcode_high(&self) -> u8 {
        self.ttl.rcode_high()
    }

    /// The extended part of the response code, with the low 4 bits (owned by the header) zeroed
    pub fn extended_rcode(&self) -> u16 {
        self.ttl.extended_rcode()
    }

    /// Combines the extended bits with the 4 bits from the message header
    pub fn response_code(&self, header_rcode_low: u8) -> ResponseCode {
        ResponseCode::from(self.rcode_high(), header_rcode_low)
    }

    /// Returns the EDNS version
    pub fn version(&self) -> u8 {
        self.ttl.version()
    }

    /// Specifies that DNSSEC is supported for this Client or Server
    pub fn dnssec_ok(&self) -> bool {
        self.ttl.dnssec_ok()
    }

    /// Returns the Z flags.
    /// Should be ignored by receivers.
    /// Only the low 15 bits are significant.
    /// The high bit is always returned as zero.
    pub fn z_flags(&self) -> u16 {
        self.ttl.z()
    }

    /// The TTL field as it is written on the wire
    pub fn ttl(&self) -> ExtendedTtl {
        self.ttl
    }

    /// Maximum supported size of the DNS payload, exactly as set or received
    pub fn max_payload(&self) -> u16 {
        self.max_payload
    }

    /// Maximum supported size of the DNS payload, with values lower than 512 treated as 512
    pub fn effective_max_payload(&self) -> u16 {
        self.max_payload.max(MIN_MAX_PAYLOAD)
    }

    /// Returns the first Option associated with the code
    pub fn option(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options.get(code)
    }

    /// Returns the options portion of EDNS
    pub fn options(&self) -> &OPT {
        &self.options
    }

    /// Returns a mutable options portion of EDNS
    pub fn options_mut(&mut self) -> &mut OPT {
        &mut self.options
    }

    /// Set the high order bits for the result code.
    pub fn set_rcode_high(&mut self, rcode_high: u8) -> &mut Self {
        self.ttl = self.ttl.with_rcode_high(rcode_high);
        self
    }

    /// Set the extended response code from a full 12 bit code, the low 4 bits are ignored
    pub fn set_extended_rcode(&mut self, rcode: u16) -> &mut Self {
        self.ttl = self.ttl.with_extended_rcode(rcode);
        self
    }

    /// Stores the high bits of `response_code`, the low bits must be written to the header
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.set_rcode_high(response_code.high())
    }

    /// Set the EDNS version
    pub fn set_version(&mut self, version: u8) -> &mut Self {
        self.ttl = self.ttl.with_version(version);
        self
    }

    /// Set to true if DNSSEC is supported
    pub fn set_dnssec_ok(&mut self, dnssec_ok: bool) -> &mut Self {
        self.ttl = self.ttl.with_dnssec_ok(dnssec_ok);
        self
    }

    /// Sets the DNSSEC OK flag
    pub fn enable_dnssec_ok(&mut self) -> &mut Self {
        self.set_dnssec_ok(true)
    }

    /// Set the Z flags.
    /// Should be set to zero by senders.
    /// Only the low 15 bits are significant.
    /// The high bit is ignored.
    pub fn set_z_flags(&mut self, z: u16) -> &mut Self {
        self.ttl = self.ttl.with_z(z);
        self
    }

    /// Set the maximum payload which can be supported
    ///
    /// The value is stored as is, so that a received record is re-encoded unchanged; see
    ///  [`Self::effective_max_payload`].
    pub fn set_max_payload(&mut self, max_payload: u16) -> &mut Self {
        self.max_payload = max_payload;
        self
    }

    /// Reads the RDATA of an OPT record whose fixed fields were already read by the caller
    ///
    /// # Arguments
    ///
    /// * `decoder` - positioned at the start of the RDATA
    /// * `max_payload` - the CLASS field of the record
    /// * `ttl` - the TTL field of the record
    /// * `rdata_length` - the RDLENGTH field of the record
    pub fn read_rdata(
        decoder: &mut BinDecoder<'_>,
        max_payload: u16,
        ttl: u32,
        rdata_length: Restrict<u16>,
    ) -> ProtoResult<Self> {
        let options = opt::read(decoder, rdata_length)?;
        Ok(Self::from_parts(max_payload, ttl, options))
    }
}

impl BinEncodable for Edns {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit(0)?; // Name::root
        RecordType::OPT.emit(encoder)?;
        encoder.emit_u16(self.max_payload)?;
        self.ttl.emit(encoder)?;

        // write the opts as rdata...
        let place = encoder.place::<u16>()?;
        self.options.emit(encoder)?;
        let len = encoder.len_since_place(&place);
        // the encoder refuses to grow past u16::MAX
        debug_assert!(len <= u16::MAX as usize);

        place.replace(encoder, len as u16)
    }
}

impl<'r> BinDecodable<'r> for Edns {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let label = decoder.read_u8()?.unverified(/*verified as the root label below*/);
        if label != 0 {
            return Err(DecodeError::EdnsNameNotRoot(label).into());
        }

        let record_type = RecordType::read(decoder)?;
        if record_type != RecordType::OPT {
            return Err(DecodeError::NotOptRecordType(record_type.into()).into());
        }

        let max_payload = decoder.read_u16()?.unverified(/*any payload size is kept as is*/);
        let ttl = ExtendedTtl::read(decoder)?;
        let rdata_length = decoder.read_u16()?;

        Self::read_rdata(decoder, max_payload, ttl.into(), rdata_length)
    }
}

impl fmt::Display for Edns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "version: {version} dnssec_ok: {dnssec_ok} z_flags: 0x{z_flags:04x} max_payload: {max_payload} opts: {opts_len}",
            version = self.version(),
            dnssec_ok = self.dnssec_ok(),
            z_flags = self.z_flags(),
            max_payload = self.max_payload,
            opts_len = self.options.len(),
        )?;

        for option in self.options.iter() {
            write!(f, "; {option}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::rr::rdata::opt::{ClientSubnet, UpdateLease};

    #[test]
    fn test_opt_ttl() {
        let mut edns = Edns::new();

        // verify the default setting of DO=0
        assert!(!edns.dnssec_ok());

        // starting with DO=0, set without a value
        edns.enable_dnssec_ok();
        assert!(edns.dnssec_ok());
        // starting with DO=1, set to true
        edns.set_dnssec_ok(true);
        assert!(edns.dnssec_ok());
        // starting with DO=1, set to false
        edns.set_dnssec_ok(false);
        assert!(!edns.dnssec_ok());
        // starting with DO=0, set to false
        edns.set_dnssec_ok(false);
        assert!(!edns.dnssec_ok());
        // starting with DO=0, set to true
        edns.set_dnssec_ok(true);
        assert!(edns.dnssec_ok());
        // starting with DO=1, set without a value
        edns.enable_dnssec_ok();
        assert!(edns.dnssec_ok());

        assert_eq!(edns.version(), 0);

        edns.set_version(42);
        assert_eq!(edns.version(), 42);

        edns.set_extended_rcode(42);
        // the low 4 bits belong to the header
        assert_eq!(edns.extended_rcode(), 42 & 0xFFF0);

        // setting a non-extended rcode resets the upper 8 bits
        edns.set_extended_rcode(u16::from(ResponseCode::NotAuth));
        assert_eq!(edns.extended_rcode(), 0);

        assert_eq!(edns.version(), 42);
        assert!(edns.dnssec_ok());
        assert_eq!(edns.z_flags(), 0);
    }

    #[test]
    fn test_z() {
        let mut edns = Edns::new();
        edns.set_version(8).enable_dnssec_ok();
        assert_eq!(edns.z_flags(), 0);

        edns.set_z_flags(5);
        assert_eq!(edns.z_flags(), 5);

        edns.set_z_flags(0xFFFF);
        assert_eq!(edns.z_flags(), 0x7FFF);

        assert_eq!(edns.version(), 8);
        assert!(edns.dnssec_ok());
    }

    #[test]
    fn test_response_code() {
        let mut edns = Edns::new();
        edns.set_response_code(ResponseCode::BADVERS);
        assert_eq!(edns.rcode_high(), 1);

        // the header would carry the low bits of BADVERS
        assert_eq!(
            edns.response_code(ResponseCode::BADVERS.low()),
            ResponseCode::BADVERS
        );
        assert_eq!(edns.response_code(7), ResponseCode::BADCOOKIE);
    }

    #[test]
    fn test_emit_layout() {
        let mut edns = Edns::new();
        edns.set_max_payload(4096).enable_dnssec_ok();
        edns.options_mut()
            .insert(EdnsOption::UpdateLease(UpdateLease::new(3600)));

        let bytes = edns.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, // root
                0x00, 0x29, // OPT
                0x10, 0x00, // 4096
                0x00, 0x00, 0x80, 0x00, // DO
                0x00, 0x08, // rdlength
                0x00, 0x02, 0x00, 0x04, // UL, 4 bytes
                0x00, 0x00, 0x0e, 0x10, // 3600
            ]
        );
    }

    #[test]
    fn test_encode_decode() {
        let mut edns = Edns::new();

        edns.set_dnssec_ok(true);
        edns.set_z_flags(0x4001);
        edns.set_max_payload(0x8008);
        edns.set_version(0x40);
        edns.set_rcode_high(0x01);
        edns.options_mut()
            .insert(EdnsOption::Subnet(ClientSubnet::new(
                IpAddr::V4(Ipv4Addr::new(192, 0, 2, 0)),
                24,
                0,
            )));
        edns.options_mut().insert(EdnsOption::Nsid(vec![]));

        let bytes = edns.to_bytes().unwrap();
        let edns_decode = Edns::from_bytes(&bytes).unwrap();

        assert_eq!(edns.dnssec_ok(), edns_decode.dnssec_ok());
        assert_eq!(edns.z_flags(), edns_decode.z_flags());
        assert_eq!(edns.max_payload(), edns_decode.max_payload());
        assert_eq!(edns.version(), edns_decode.version());
        assert_eq!(edns.rcode_high(), edns_decode.rcode_high());
        assert_eq!(edns.options(), edns_decode.options());
        assert_eq!(edns, edns_decode);

        // re-encoding is stable
        assert_eq!(edns_decode.to_bytes().unwrap(), bytes);

        edns.options_mut().remove(EdnsCode::Subnet);
        assert!(edns.option(EdnsCode::Subnet).is_none());
        assert!(edns.option(EdnsCode::NSID).is_some());
    }

    #[test]
    fn test_max_payload() {
        let mut edns = Edns::new();
        assert_eq!(edns.max_payload(), DEFAULT_MAX_PAYLOAD);

        edns.set_max_payload(100);
        assert_eq!(edns.max_payload(), 100);
        assert_eq!(edns.effective_max_payload(), 512);
    }

    #[test]
    fn test_read_not_root() {
        let bytes = [
            0x01, b'a', 0x00, 0x00, 0x29, 0x02, 0x00, 0, 0, 0, 0, 0x00, 0x00,
        ];
        let err = Edns::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err.as_decode(),
            Some(DecodeError::EdnsNameNotRoot(0x01))
        ));
    }

    #[test]
    fn test_read_not_opt() {
        // an A record
        let bytes = [0x00, 0x00, 0x01, 0x00, 0x01, 0, 0, 0, 0, 0x00, 0x00];
        let err = Edns::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err.as_decode(),
            Some(DecodeError::NotOptRecordType(1))
        ));
    }

    #[test]
    fn test_read_rdata() {
        // the enclosing message codec has consumed NAME, TYPE, CLASS, TTL and RDLENGTH
        let rdata = [0x00, 0x0b, 0x00, 0x02, 0x00, 0x64];
        let mut decoder = BinDecoder::new(&rdata);
        let edns =
            Edns::read_rdata(&mut decoder, 1232, 0x0000_8000, Restrict::new(rdata.len() as u16))
                .unwrap();

        assert!(edns.dnssec_ok());
        assert_eq!(edns.max_payload(), 1232);
        assert_eq!(edns.options().len(), 1);
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_display() {
        let mut edns = Edns::new();
        edns.enable_dnssec_ok();
        edns.options_mut()
            .insert(EdnsOption::UpdateLease(UpdateLease::new(60)));

        assert_eq!(
            edns.to_string(),
            "version: 0 dnssec_ok: true z_flags: 0x0000 max_payload: 1232 opts: 1; UL: lease 60s"
        );
    }
}
