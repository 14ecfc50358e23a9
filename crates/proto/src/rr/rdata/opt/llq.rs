// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The long-lived query option, [RFC 8764](https://tools.ietf.org/html/rfc8764#section-3.2)

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

const LLQ_LEN: usize = 18;

/// Setup, refresh and event acknowledgement of a long-lived query
///
/// ```text
///    Field Name        Field Type     Description
///    ---------------------------------------------------------------------
///    LLQ-VERSION       u_int16_t      Version of LLQ protocol implemented
///    LLQ-OPCODE        u_int16_t      Identifies LLQ operation
///    LLQ-ERROR         u_int16_t      Identifies LLQ errors
///    LLQ-ID            u_int64_t      Identifier for an LLQ
///    LLQ-LEASE         u_int32_t      Requested or granted life of LLQ, in seconds
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct LongLivedQuery {
    /// Version of the LLQ protocol
    pub version: u16,
    /// Setup (1), refresh (2) or event (3)
    pub opcode: u16,
    /// Error code, 0 when there is none
    pub error: u16,
    /// Identifier chosen by the server
    pub id: u64,
    /// Life of the query in seconds
    pub lease: u32,
}

impl EdnsOptionData for LongLivedQuery {
    fn len(&self) -> usize {
        LLQ_LEN
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        if data.len() != LLQ_LEN {
            return Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::LLQ.into(),
                len: data.len(),
            }
            .into());
        }

        let mut decoder = BinDecoder::new(data);
        Ok(Self {
            version: decoder.read_u16()?.unverified(),
            opcode: decoder.read_u16()?.unverified(),
            error: decoder.read_u16()?.unverified(),
            id: decoder.read_u64()?.unverified(),
            lease: decoder.read_u32()?.unverified(),
        })
    }
}

impl BinEncodable for LongLivedQuery {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.version)?;
        encoder.emit_u16(self.opcode)?;
        encoder.emit_u16(self.error)?;
        encoder.emit_u64(self.id)?;
        encoder.emit_u32(self.lease)
    }
}

impl fmt::Display for LongLivedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{} op {} error {} id {} lease {}s",
            self.version, self.opcode, self.error, self.id, self.lease
        )
    }
}
