// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The update lease option, [draft-sekar-dns-ul](http://files.dns-sd.org/draft-sekar-dns-ul.txt)

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

/// The lease requested for, or granted to, the records of a dynamic update
///
/// ```text
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   0: |                             LEASE                             |
///      |                                                               |
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///   4: |                           KEY-LEASE                           |
///      |                           (optional)                          |
///      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// Both are in seconds. The key lease is present exactly when the option is 8 bytes long.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct UpdateLease {
    lease: u32,
    key_lease: Option<u32>,
}

impl UpdateLease {
    /// A lease without a separate key lease
    pub fn new(lease: u32) -> Self {
        Self {
            lease,
            key_lease: None,
        }
    }

    /// A lease with a separate lease for the KEY records of the update
    pub fn with_key_lease(lease: u32, key_lease: u32) -> Self {
        Self {
            lease,
            key_lease: Some(key_lease),
        }
    }

    /// The lease of the updated records, in seconds
    pub fn lease(&self) -> u32 {
        self.lease
    }

    /// The lease of the KEY records, in seconds
    pub fn key_lease(&self) -> Option<u32> {
        self.key_lease
    }
}

impl EdnsOptionData for UpdateLease {
    fn len(&self) -> usize {
        match self.key_lease {
            Some(_) => 8,
            None => 4,
        }
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        let mut decoder = BinDecoder::new(data);
        match data.len() {
            4 => Ok(Self::new(decoder.read_u32()?.unverified())),
            8 => Ok(Self::with_key_lease(
                decoder.read_u32()?.unverified(),
                decoder.read_u32()?.unverified(),
            )),
            len => Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::UL.into(),
                len,
            }
            .into()),
        }
    }
}

impl BinEncodable for UpdateLease {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u32(self.lease)?;
        if let Some(key_lease) = self.key_lease {
            encoder.emit_u32(key_lease)?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lease {}s", self.lease)?;
        if let Some(key_lease) = self.key_lease {
            write!(f, " key-lease {key_lease}s")?;
        }
        Ok(())
    }
}
