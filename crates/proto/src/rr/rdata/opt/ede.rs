// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The Extended DNS Errors option, [RFC 8914](https://tools.ietf.org/html/rfc8914#section-2)

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

/// Additional information about the cause of an error, next to the response code
///
/// ```text
///                                               1   1   1   1   1   1
///       0   1   2   3   4   5   6   7   8   9   0   1   2   3   4   5
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  0: |                            OPTION-CODE                        |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  2: |                           OPTION-LENGTH                       |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  4: | INFO-CODE                                                     |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  6: / EXTRA-TEXT ...                                                /
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ExtendedError {
    info_code: u16,
    extra_text: String,
}

impl ExtendedError {
    /// Construct a new extended error
    pub fn new(info_code: u16, extra_text: impl Into<String>) -> Self {
        Self {
            info_code,
            extra_text: extra_text.into(),
        }
    }

    /// The INFO-CODE from the IANA Extended DNS Error Codes registry
    pub fn info_code(&self) -> u16 {
        self.info_code
    }

    /// Free form text for a human, may be empty
    pub fn extra_text(&self) -> &str {
        &self.extra_text
    }

    /// The registered purpose of the info code
    pub fn purpose(&self) -> Option<&'static str> {
        let purpose = match self.info_code {
            0 => "Other Error",
            1 => "Unsupported DNSKEY Algorithm",
            2 => "Unsupported DS Digest Type",
            3 => "Stale Answer",
            4 => "Forged Answer",
            5 => "DNSSEC Indeterminate",
            6 => "DNSSEC Bogus",
            7 => "Signature Expired",
            8 => "Signature Not Yet Valid",
            9 => "DNSKEY Missing",
            10 => "RRSIGs Missing",
            11 => "No Zone Key Bit Set",
            12 => "NSEC Missing",
            13 => "Cached Error",
            14 => "Not Ready",
            15 => "Blocked",
            16 => "Censored",
            17 => "Filtered",
            18 => "Prohibited",
            19 => "Stale NXDomain Answer",
            20 => "Not Authoritative",
            21 => "Not Supported",
            22 => "No Reachable Authority",
            23 => "Network Error",
            24 => "Invalid Data",
            _ => return None,
        };

        Some(purpose)
    }
}

impl EdnsOptionData for ExtendedError {
    fn len(&self) -> usize {
        2 + self.extra_text.len()
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        if data.len() < 2 {
            return Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::ExtendedError.into(),
                len: data.len(),
            }
            .into());
        }

        let mut decoder = BinDecoder::new(data);
        let info_code = decoder.read_u16()?.unverified();
        let text = decoder.read_slice(decoder.len())?.unverified(/*verified as utf8*/);
        let extra_text = std::str::from_utf8(text).map_err(DecodeError::from)?;

        Ok(Self::new(info_code, extra_text))
    }
}

impl BinEncodable for ExtendedError {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.info_code)?;
        encoder.emit_vec(self.extra_text.as_bytes())
    }
}

impl fmt::Display for ExtendedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.purpose() {
            Some(purpose) => write!(f, "{} ({purpose})", self.info_code)?,
            None => write!(f, "{}", self.info_code)?,
        }

        if !self.extra_text.is_empty() {
            write!(f, ": {}", self.extra_text)?;
        }

        Ok(())
    }
}
