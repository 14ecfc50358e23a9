/*
 * Copyright (C) 2015 Benjamin Fry <benjaminfry@me.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! option record for passing protocol options between the client and server
#![allow(clippy::use_self)]

use std::fmt;

use data_encoding::HEXLOWER;
use enum_as_inner::EnumAsInner;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::*;
use crate::serialize::binary::*;

mod cookie;
mod ede;
mod expire;
mod keepalive;
mod llq;
mod subnet;
mod update_lease;

pub use self::cookie::Cookie;
pub use self::ede::ExtendedError;
pub use self::expire::Expire;
pub use self::keepalive::Keepalive;
pub use self::llq::LongLivedQuery;
pub use self::subnet::{ClientSubnet, FAMILY_IPV4, FAMILY_IPV6};
pub use self::update_lease::UpdateLease;

/// The OPT record type is used for ExtendedDNS records.
///
/// These allow for additional information to be associated with the DNS request that otherwise
/// would require changes to the DNS protocol.
///
/// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6)
///
/// ```text
///    The variable part of an OPT RR may contain zero or more options in
///    the RDATA.  Each option MUST be treated as a bit field.  Each option
///    is encoded as:
///
///                   +0 (MSB)                            +1 (LSB)
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     0: |                          OPTION-CODE                          |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     2: |                         OPTION-LENGTH                         |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     4: |                                                               |
///        /                          OPTION-DATA                          /
///        /                                                               /
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///
///    OPTION-CODE
///       Assigned by the Expert Review process as defined by the DNSEXT
///       working group and the IESG.
///
///    OPTION-LENGTH
///       Size (in octets) of OPTION-DATA.
///
///    OPTION-DATA
///       Varies per OPTION-CODE.  MUST be treated as a bit field.
///
///    The order of appearance of option tuples is not defined.  If one
///    option modifies the behaviour of another or multiple options are
///    related to one another in some way, they have the same effect
///    regardless of ordering in the RDATA wire encoding.
///
///    Any OPTION-CODE values not understood by a responder or requestor
///    MUST be ignored.
/// ```
///
/// The options are kept in the order they were read or added, and the same code may appear more
///  than once, so that a decoded record is written back out unchanged.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct OPT {
    options: Vec<EdnsOption>,
}

impl OPT {
    /// Creates a new OPT record data.
    ///
    /// # Arguments
    ///
    /// * `options` - The options, in wire order
    ///
    /// # Return value
    ///
    /// The newly created OPT data
    pub fn new(options: Vec<EdnsOption>) -> Self {
        Self { options }
    }

    /// Get the first option with the code
    pub fn get(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options.iter().find(|option| option.code() == code)
    }

    /// Get every option with the code, in wire order
    pub fn get_all(&self, code: EdnsCode) -> impl Iterator<Item = &EdnsOption> + '_ {
        self.options
            .iter()
            .filter(move |option| option.code() == code)
    }

    /// Insert a new option, replacing the first option with the same code if there is one
    pub fn insert(&mut self, option: EdnsOption) {
        let code = option.code();
        match self.options.iter_mut().find(|o| o.code() == code) {
            Some(existing) => *existing = option,
            None => self.options.push(option),
        }
    }

    /// Append an option, even if one with the same code is already present
    pub fn push(&mut self, option: EdnsOption) {
        self.options.push(option);
    }

    /// Remove all options with the code
    pub fn remove(&mut self, code: EdnsCode) {
        self.options.retain(|option| option.code() != code);
    }

    /// Iterate over the options in wire order
    pub fn iter(&self) -> std::slice::Iter<'_, EdnsOption> {
        self.options.iter()
    }

    /// The number of options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if there are no options
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl AsMut<Vec<EdnsOption>> for OPT {
    fn as_mut(&mut self) -> &mut Vec<EdnsOption> {
        &mut self.options
    }
}

impl AsRef<[EdnsOption]> for OPT {
    fn as_ref(&self) -> &[EdnsOption] {
        &self.options
    }
}

impl FromIterator<EdnsOption> for OPT {
    fn from_iter<I: IntoIterator<Item = EdnsOption>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for OPT {
    type Item = EdnsOption;
    type IntoIter = std::vec::IntoIter<EdnsOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

impl<'a> IntoIterator for &'a OPT {
    type Item = &'a EdnsOption;
    type IntoIter = std::slice::Iter<'a, EdnsOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

impl BinEncodable for OPT {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        emit(encoder, self)
    }
}

/// Read the RData from the given Decoder
///
/// Every option envelope must lie within `rdata_length`, a length that runs past it is reported
///  as [`DecodeError::InsufficientBytes`].
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<OPT> {
    // There is no unsafe direct use of the rdata length after this point
    let rdata_length = rdata_length.map(usize::from).unverified(/*bounded by read_slice*/);
    let rdata = decoder.read_slice(rdata_length)?.unverified(/*parsed as options below*/);

    let mut decoder = BinDecoder::new(rdata);
    let mut options = Vec::new();
    while !decoder.is_empty() {
        let code = EdnsCode::from(decoder.read_u16()?.unverified(/*EdnsCode is verified as safe*/));
        let length = decoder.read_u16()?.map(usize::from).unverified(/*bounded by read_slice*/);
        let data = decoder.read_slice(length)?.unverified(/*verified by each option*/);

        trace!("read edns option: {code} length: {length}");
        options.push(EdnsOption::read(code, data)?);
    }

    Ok(OPT::new(options))
}

/// Write the RData to the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, opt: &OPT) -> ProtoResult<()> {
    for option in opt.iter() {
        let code = u16::from(option.code());
        encoder.emit_u16(code)?;

        let place = encoder.place::<u16>()?;
        option.emit(encoder)?;
        let len = encoder.len_since_place(&place);
        debug_assert!(len <= u16::MAX as usize);

        place.replace(encoder, len as u16)?;
    }
    Ok(())
}

/// The first code of the range reserved for local or experimental use, [RFC 6891](https://tools.ietf.org/html/rfc6891#section-9)
pub const LOCAL_CODE_START: u16 = 65001;

/// The last code of the range reserved for local or experimental use
pub const LOCAL_CODE_END: u16 = 65534;

/// The code of the EDNS data option
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Hash, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum EdnsCode {
    /// [RFC 6891, Reserved](https://tools.ietf.org/html/rfc6891)
    Zero,

    /// [RFC 8764l, Apple's Long-Lived Queries, Optional](https://tools.ietf.org/html/rfc8764)
    LLQ,

    /// [UL On-hold](http://files.dns-sd.org/draft-sekar-dns-ul.txt)
    UL,

    /// [RFC 5001, NSID](https://tools.ietf.org/html/rfc5001)
    NSID,
    // 4 Reserved [draft-cheshire-edns0-owner-option] -EXPIRED-
    /// [RFC 6975, DNSSEC Algorithm Understood](https://tools.ietf.org/html/rfc6975)
    DAU,

    /// [RFC 6975, DS Hash Understood](https://tools.ietf.org/html/rfc6975)
    DHU,

    /// [RFC 6975, NSEC3 Hash Understood](https://tools.ietf.org/html/rfc6975)
    N3U,

    /// [RFC 7871, Client Subnet, Optional](https://tools.ietf.org/html/rfc7871)
    Subnet,

    /// [RFC 7314, EDNS EXPIRE, Optional](https://tools.ietf.org/html/rfc7314)
    Expire,

    /// [RFC 7873, DNS Cookies](https://tools.ietf.org/html/rfc7873)
    Cookie,

    /// [RFC 7828, edns-tcp-keepalive](https://tools.ietf.org/html/rfc7828)
    Keepalive,

    /// [RFC 7830, The EDNS(0) Padding](https://tools.ietf.org/html/rfc7830)
    Padding,

    /// [RFC 7901, CHAIN Query Requests in DNS, Optional](https://tools.ietf.org/html/rfc7901)
    Chain,

    /// [RFC 8145, edns-key-tag](https://tools.ietf.org/html/rfc8145)
    KeyTag,

    /// [RFC 8914, Extended DNS Errors](https://tools.ietf.org/html/rfc8914)
    ExtendedError,

    /// Local or experimental use, codes 65001 through 65534
    Local(u16),

    /// Unknown, used to deal with unknown or unsupported codes
    Unknown(u16),
}

impl EdnsCode {
    /// Returns `true` if the code is in the range reserved for local or experimental use
    pub fn is_local(self) -> bool {
        (LOCAL_CODE_START..=LOCAL_CODE_END).contains(&u16::from(self))
    }
}

impl From<u16> for EdnsCode {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Zero,
            1 => Self::LLQ,
            2 => Self::UL,
            3 => Self::NSID,
            // 4 Reserved [draft-cheshire-edns0-owner-option] -EXPIRED-
            5 => Self::DAU,
            6 => Self::DHU,
            7 => Self::N3U,
            8 => Self::Subnet,
            9 => Self::Expire,
            10 => Self::Cookie,
            11 => Self::Keepalive,
            12 => Self::Padding,
            13 => Self::Chain,
            14 => Self::KeyTag,
            15 => Self::ExtendedError,
            LOCAL_CODE_START..=LOCAL_CODE_END => Self::Local(value),
            _ => Self::Unknown(value),
        }
    }
}

impl From<EdnsCode> for u16 {
    fn from(value: EdnsCode) -> Self {
        match value {
            EdnsCode::Zero => 0,
            EdnsCode::LLQ => 1,
            EdnsCode::UL => 2,
            EdnsCode::NSID => 3,
            // 4 Reserved [draft-cheshire-edns0-owner-option] -EXPIRED-
            EdnsCode::DAU => 5,
            EdnsCode::DHU => 6,
            EdnsCode::N3U => 7,
            EdnsCode::Subnet => 8,
            EdnsCode::Expire => 9,
            EdnsCode::Cookie => 10,
            EdnsCode::Keepalive => 11,
            EdnsCode::Padding => 12,
            EdnsCode::Chain => 13,
            EdnsCode::KeyTag => 14,
            EdnsCode::ExtendedError => 15,
            EdnsCode::Local(value) | EdnsCode::Unknown(value) => value,
        }
    }
}

impl fmt::Display for EdnsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("Reserved"),
            Self::LLQ => f.write_str("LLQ"),
            Self::UL => f.write_str("UL"),
            Self::NSID => f.write_str("NSID"),
            Self::DAU => f.write_str("DAU"),
            Self::DHU => f.write_str("DHU"),
            Self::N3U => f.write_str("N3U"),
            Self::Subnet => f.write_str("CLIENT-SUBNET"),
            Self::Expire => f.write_str("EXPIRE"),
            Self::Cookie => f.write_str("COOKIE"),
            Self::Keepalive => f.write_str("TCP-KEEPALIVE"),
            Self::Padding => f.write_str("PADDING"),
            Self::Chain => f.write_str("CHAIN"),
            Self::KeyTag => f.write_str("KEY-TAG"),
            Self::ExtendedError => f.write_str("EDE"),
            Self::Local(code) => write!(f, "LOCAL{code}"),
            Self::Unknown(code) => write!(f, "OPT{code}"),
        }
    }
}

/// The value of an EDNS option which has structure beyond a plain byte string
pub trait EdnsOptionData: BinEncodable + Sized {
    /// Length in bytes of the option value, without the code and length envelope
    fn len(&self) -> usize;

    /// Returns `true` if the option value is empty on the wire
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses the option value, `data` is exactly the OPTION-DATA of the envelope
    fn read_data(data: &[u8]) -> ProtoResult<Self>;
}

/// options used to pass information about capabilities between client and server
///
/// Codes without a dedicated variant are kept as [`EdnsOption::Local`] or
///  [`EdnsOption::Unknown`], and are written back out byte for byte.
///
/// <http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-11>
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Hash, EnumAsInner)]
#[non_exhaustive]
pub enum EdnsOption {
    /// [RFC 8764, Apple's Long-Lived Queries](https://tools.ietf.org/html/rfc8764)
    Llq(LongLivedQuery),

    /// [UL On-hold](http://files.dns-sd.org/draft-sekar-dns-ul.txt)
    UpdateLease(UpdateLease),

    /// [RFC 5001, NSID](https://tools.ietf.org/html/rfc5001)
    Nsid(Vec<u8>),

    /// [RFC 6975, DNSSEC Algorithm Understood](https://tools.ietf.org/html/rfc6975)
    Dau(Vec<u8>),

    /// [RFC 6975, DS Hash Understood](https://tools.ietf.org/html/rfc6975)
    Dhu(Vec<u8>),

    /// [RFC 6975, NSEC3 Hash Understood](https://tools.ietf.org/html/rfc6975)
    N3u(Vec<u8>),

    /// [RFC 7871, Client Subnet](https://tools.ietf.org/html/rfc7871)
    Subnet(ClientSubnet),

    /// [RFC 7314, EDNS EXPIRE](https://tools.ietf.org/html/rfc7314)
    Expire(Expire),

    /// [RFC 7873, DNS Cookies](https://tools.ietf.org/html/rfc7873)
    Cookie(Cookie),

    /// [RFC 7828, edns-tcp-keepalive](https://tools.ietf.org/html/rfc7828)
    Keepalive(Keepalive),

    /// [RFC 7830, The EDNS(0) Padding](https://tools.ietf.org/html/rfc7830)
    Padding(Vec<u8>),

    /// [RFC 8914, Extended DNS Errors](https://tools.ietf.org/html/rfc8914)
    ExtendedError(ExtendedError),

    /// Local or experimental use, the value is opaque
    ///
    /// The code must lie in [`LOCAL_CODE_START`]`..=`[`LOCAL_CODE_END`].
    Local(u16, Vec<u8>),

    /// Unknown, used to deal with unknown or unsupported codes
    ///
    /// The value is written as is, without the checks of a typed option, so the code should not be
    ///  one of the codes above. [`EdnsOption::read`] builds the typed option from a code and its
    ///  raw value.
    Unknown(u16, Vec<u8>),
}

impl EdnsOption {
    /// Parses the value of an option with the given code
    ///
    /// Codes which are not understood become [`EdnsOption::Unknown`], and are never an error.
    pub fn read(code: EdnsCode, data: &[u8]) -> ProtoResult<Self> {
        let option = match code {
            EdnsCode::LLQ => Self::Llq(LongLivedQuery::read_data(data)?),
            EdnsCode::UL => Self::UpdateLease(UpdateLease::read_data(data)?),
            EdnsCode::NSID => Self::Nsid(data.to_vec()),
            EdnsCode::DAU => Self::Dau(data.to_vec()),
            EdnsCode::DHU => Self::Dhu(data.to_vec()),
            EdnsCode::N3U => Self::N3u(data.to_vec()),
            EdnsCode::Subnet => Self::Subnet(ClientSubnet::read_data(data)?),
            EdnsCode::Expire => Self::Expire(Expire::read_data(data)?),
            EdnsCode::Cookie => Self::Cookie(Cookie::read_data(data)?),
            EdnsCode::Keepalive => Self::Keepalive(Keepalive::read_data(data)?),
            EdnsCode::Padding => Self::Padding(data.to_vec()),
            EdnsCode::ExtendedError => Self::ExtendedError(ExtendedError::read_data(data)?),
            EdnsCode::Local(code) => Self::Local(code, data.to_vec()),
            _ => {
                debug!("unsupported edns option: {code}, keeping {} bytes", data.len());
                Self::Unknown(code.into(), data.to_vec())
            }
        };

        Ok(option)
    }

    /// The code this option is written with
    pub fn code(&self) -> EdnsCode {
        EdnsCode::from(self)
    }

    /// Returns the length in bytes of the option value
    pub fn len(&self) -> usize {
        match self {
            Self::Llq(llq) => llq.len(),
            Self::UpdateLease(lease) => lease.len(),
            Self::Subnet(subnet) => subnet.len(),
            Self::Expire(expire) => expire.len(),
            Self::Cookie(cookie) => cookie.len(),
            Self::Keepalive(keepalive) => keepalive.len(),
            Self::ExtendedError(error) => error.len(),
            Self::Nsid(data)
            | Self::Dau(data)
            | Self::Dhu(data)
            | Self::N3u(data)
            | Self::Padding(data)
            | Self::Local(_, data)
            | Self::Unknown(_, data) => data.len(),
        }
    }

    /// Returns `true` if the length in bytes of the option value is 0
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BinEncodable for EdnsOption {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self {
            Self::Llq(llq) => llq.emit(encoder),
            Self::UpdateLease(lease) => lease.emit(encoder),
            Self::Subnet(subnet) => subnet.emit(encoder),
            Self::Expire(expire) => expire.emit(encoder),
            Self::Cookie(cookie) => cookie.emit(encoder),
            Self::Keepalive(keepalive) => keepalive.emit(encoder),
            Self::ExtendedError(error) => error.emit(encoder),
            Self::Nsid(data)
            | Self::Dau(data)
            | Self::Dhu(data)
            | Self::N3u(data)
            | Self::Padding(data)
            | Self::Local(_, data)
            | Self::Unknown(_, data) => encoder.emit_vec(data),
        }
    }
}

impl<'a> From<&'a EdnsOption> for EdnsCode {
    fn from(value: &'a EdnsOption) -> Self {
        match *value {
            EdnsOption::Llq(..) => Self::LLQ,
            EdnsOption::UpdateLease(..) => Self::UL,
            EdnsOption::Nsid(..) => Self::NSID,
            EdnsOption::Dau(..) => Self::DAU,
            EdnsOption::Dhu(..) => Self::DHU,
            EdnsOption::N3u(..) => Self::N3U,
            EdnsOption::Subnet(..) => Self::Subnet,
            EdnsOption::Expire(..) => Self::Expire,
            EdnsOption::Cookie(..) => Self::Cookie,
            EdnsOption::Keepalive(..) => Self::Keepalive,
            EdnsOption::Padding(..) => Self::Padding,
            EdnsOption::ExtendedError(..) => Self::ExtendedError,
            EdnsOption::Local(code, _) | EdnsOption::Unknown(code, _) => code.into(),
        }
    }
}

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.code())?;
        match self {
            Self::Llq(llq) => write!(f, "{llq}"),
            Self::UpdateLease(lease) => write!(f, "{lease}"),
            Self::Subnet(subnet) => write!(f, "{subnet}"),
            Self::Expire(expire) => write!(f, "{expire}"),
            Self::Cookie(cookie) => write!(f, "{cookie}"),
            Self::Keepalive(keepalive) => write!(f, "{keepalive}"),
            Self::ExtendedError(error) => write!(f, "{error}"),
            Self::Dau(algorithms) | Self::Dhu(algorithms) | Self::N3u(algorithms) => {
                let mut algorithms = algorithms.iter();
                if let Some(first) = algorithms.next() {
                    write!(f, "{first}")?;
                }
                for algorithm in algorithms {
                    write!(f, " {algorithm}")?;
                }
                Ok(())
            }
            Self::Padding(data) => write!(f, "({} bytes)", data.len()),
            Self::Nsid(data) | Self::Local(_, data) | Self::Unknown(_, data) => {
                f.write_str(&HEXLOWER.encode(data))
            }
        }
    }
}
