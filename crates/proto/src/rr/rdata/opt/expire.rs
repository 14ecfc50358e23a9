// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The EDNS EXPIRE option, [RFC 7314](https://tools.ietf.org/html/rfc7314)

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

/// The remaining expire time of a zone, as known to the responding server
///
/// Queries carry the option without a value, responses carry the 4 byte timer in seconds.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Expire(Option<u32>);

impl Expire {
    /// Wraps the expire timer, `None` for a query
    pub fn new(expire: Option<u32>) -> Self {
        Self(expire)
    }

    /// The expire timer in seconds
    pub fn expire(&self) -> Option<u32> {
        self.0
    }
}

impl EdnsOptionData for Expire {
    fn len(&self) -> usize {
        self.0.map_or(0, |_| 4)
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        let mut decoder = BinDecoder::new(data);
        match data.len() {
            0 => Ok(Self(None)),
            4 => Ok(Self(Some(decoder.read_u32()?.unverified()))),
            len => Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::Expire.into(),
                len,
            }
            .into()),
        }
    }
}

impl BinEncodable for Expire {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self.0 {
            Some(expire) => encoder.emit_u32(expire),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Expire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(expire) => write!(f, "{expire}s"),
            None => f.write_str("(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_and_response() {
        let query = Expire::new(None);
        assert!(query.to_bytes().unwrap().is_empty());
        assert_eq!(Expire::read_data(&[]).unwrap(), query);

        let response = Expire::new(Some(86400));
        let bytes = response.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x00, 0x01, 0x51, 0x80]);
        assert_eq!(Expire::read_data(&bytes).unwrap().expire(), Some(86400));

        assert!(Expire::read_data(&[0, 1]).is_err());
    }
}
