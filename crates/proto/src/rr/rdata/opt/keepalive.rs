// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The edns-tcp-keepalive option, [RFC 7828](https://tools.ietf.org/html/rfc7828)

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

/// The idle timeout of a TCP connection, in units of 100 milliseconds
///
/// Clients send the option without a value, servers may answer with a timeout.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Keepalive(Option<u16>);

impl Keepalive {
    /// Wraps the timeout, in units of 100 milliseconds
    pub fn new(timeout: Option<u16>) -> Self {
        Self(timeout)
    }

    /// The raw timeout, in units of 100 milliseconds
    pub fn timeout(&self) -> Option<u16> {
        self.0
    }

    /// The timeout as a duration
    pub fn duration(&self) -> Option<Duration> {
        self.0
            .map(|timeout| Duration::from_millis(u64::from(timeout) * 100))
    }
}

impl EdnsOptionData for Keepalive {
    fn len(&self) -> usize {
        self.0.map_or(0, |_| 2)
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        let mut decoder = BinDecoder::new(data);
        match data.len() {
            0 => Ok(Self(None)),
            2 => Ok(Self(Some(decoder.read_u16()?.unverified()))),
            len => Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::Keepalive.into(),
                len,
            }
            .into()),
        }
    }
}

impl BinEncodable for Keepalive {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self.0 {
            Some(timeout) => encoder.emit_u16(timeout),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Keepalive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.duration() {
            Some(duration) => write!(f, "{}ms", duration.as_millis()),
            None => f.write_str("(empty)"),
        }
    }
}
