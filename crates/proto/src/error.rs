// Copyright 2015-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

#![deny(missing_docs)]

use std::fmt;
use std::net::IpAddr;

use thiserror::Error;

use crate::serialize::binary::DecodeError;

/// An alias for results returned by functions of this crate
pub type ProtoResult<T> = ::std::result::Result<T, ProtoError>;

/// The error type for errors that get returned in the crate
#[derive(Error, Clone, Debug)]
#[non_exhaustive]
pub struct ProtoError {
    /// Kind of error that occurred
    pub kind: ProtoErrorKind,
}

impl ProtoError {
    /// Get the kind of the error
    #[inline]
    pub fn kind(&self) -> &ProtoErrorKind {
        &self.kind
    }

    /// Returns the decoding error, if this error happened while reading from the wire
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match &self.kind {
            ProtoErrorKind::Decode(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if a read ran past the end of the available input
    pub fn is_insufficient_bytes(&self) -> bool {
        matches!(
            self.kind,
            ProtoErrorKind::Decode(DecodeError::InsufficientBytes)
        )
    }
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl<E: Into<ProtoErrorKind>> From<E> for ProtoError {
    fn from(error: E) -> Self {
        Self { kind: error.into() }
    }
}

/// The error kind for errors that get returned in the crate
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ProtoErrorKind {
    /// Message decoding error
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// The maximum buffer size was exceeded
    #[error("maximum buffer size exceeded: {0}")]
    MaxBufferSizeExceeded(usize),

    /// A server cookie must be 8 to 32 bytes long
    #[error("server cookie must be 8 to 32 bytes: {0}")]
    ServerCookieLength(usize),

    /// The address of a client subnet option can not be written in the declared family
    #[non_exhaustive]
    #[error("client subnet address {address} is not representable in family {family}")]
    SubnetAddressMismatch {
        /// Declared address family
        family: u16,
        /// Address of the option
        address: IpAddr,
    },

    /// The source prefix of a client subnet option is wider than its address family
    #[non_exhaustive]
    #[error("client subnet source prefix {prefix} too long for family {family}")]
    SubnetPrefixTooLong {
        /// Declared address family
        family: u16,
        /// Declared source prefix length
        prefix: u8,
    },

    /// The family of a client subnet option is not IPv4 (1) or IPv6 (2)
    #[error("client subnet family unknown: {0}")]
    UnknownSubnetFamily(u16),
}
