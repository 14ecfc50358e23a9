// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record type definitions

use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::*;
use crate::serialize::binary::*;

/// The type of the resource record.
///
/// Only the OPT pseudo-type is interpreted here, anything else is carried as its numeric value so
///  that a record which is not OPT can be reported.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[non_exhaustive]
pub enum RecordType {
    /// [RFC 6891](https://tools.ietf.org/html/rfc6891) Option
    OPT,
    /// Any other type
    Unknown(u16),
}

/// Convert from `u16` to `RecordType`
///
/// ```
/// use hickory_edns::rr::record_type::RecordType;
///
/// let var: RecordType = 41.into();
/// assert_eq!(RecordType::OPT, var);
/// ```
impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            41 => Self::OPT,
            _ => Self::Unknown(value),
        }
    }
}

/// Convert from `RecordType` to `u16`
///
/// ```
/// use hickory_edns::rr::record_type::RecordType;
///
/// let var: u16 = RecordType::OPT.into();
/// assert_eq!(41, var);
/// ```
impl From<RecordType> for u16 {
    fn from(rt: RecordType) -> Self {
        match rt {
            RecordType::OPT => 41,
            RecordType::Unknown(code) => code,
        }
    }
}

impl BinEncodable for RecordType {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16((*self).into())
    }
}

impl<'r> BinDecodable<'r> for RecordType {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(decoder
            .read_u16()
            .map(Restrict::unverified)
            .map(Self::from)?)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::OPT => f.write_str("OPT"),
            Self::Unknown(code) => write!(f, "TYPE{code}"),
        }
    }
}
