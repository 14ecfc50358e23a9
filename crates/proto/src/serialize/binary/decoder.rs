// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use thiserror::Error;

use crate::serialize::binary::Restrict;

/// Reads DNS wire data from a borrowed buffer.
///
/// Reads never copy unless an owned value is requested, and every read checks the remaining
///  length, so running off the end of the buffer is reported as
///  [`DecodeError::InsufficientBytes`] rather than a panic.
pub struct BinDecoder<'a> {
    buffer: &'a [u8],    // The entire original buffer
    remaining: &'a [u8], // The unread section of the original buffer, so that reads do not cause a bounds check at the current seek offset
}

pub(crate) type DecodeResult<T> = Result<T, DecodeError>;

/// An error that can occur deep in a decoder
/// This type is kept very small so that function that use it inline often
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// EDNS resource record label is not the root label, although required
    #[error("edns resource record label must be the root label (.), found label byte: {0:#04x}")]
    EdnsNameNotRoot(u8),

    /// The record type read is not OPT
    #[error("record type must be OPT (41): {0}")]
    NotOptRecordType(u16),

    /// Insufficient data in the buffer for a read operation
    #[error("unexpected end of input reached")]
    InsufficientBytes,

    /// The value length of an EDNS option is not valid for its code
    #[non_exhaustive]
    #[error("invalid length for edns option {code}: {len}")]
    InvalidEdnsOptionLength {
        /// Option code
        code: u16,
        /// Length of the option value
        len: usize,
    },

    /// The address of a client subnet option is longer than its family allows
    #[non_exhaustive]
    #[error("client subnet address of {len} bytes too long for family {family}")]
    SubnetAddressTooLong {
        /// Declared address family
        family: u16,
        /// Number of address bytes present
        len: usize,
    },

    /// The source or scope prefix of a client subnet option is wider than its family
    #[non_exhaustive]
    #[error("client subnet prefix {prefix} too long for family {family}")]
    SubnetPrefixTooLong {
        /// Declared address family
        family: u16,
        /// The offending prefix length
        prefix: u8,
    },

    /// The family of a client subnet option is not IPv4 (1) or IPv6 (2)
    #[error("client subnet family unknown: {0}")]
    UnknownSubnetFamily(u16),

    /// Text in an option was not valid UTF-8
    #[error("error parsing utf8 string: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl DecodeError {
    /// Returns true if the input held a field outside of its valid domain, as opposed to simply
    ///  running out of bytes
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::InsufficientBytes)
    }
}

impl<'a> BinDecoder<'a> {
    /// Creates a new BinDecoder
    ///
    /// # Arguments
    ///
    /// * `buffer` - buffer from which all data will be read
    pub fn new(buffer: &'a [u8]) -> Self {
        BinDecoder {
            buffer,
            remaining: buffer,
        }
    }

    /// Pop one byte from the buffer
    pub fn pop(&mut self) -> DecodeResult<Restrict<u8>> {
        if let Some((first, remaining)) = self.remaining.split_first() {
            self.remaining = remaining;
            return Ok(Restrict::new(*first));
        }
        Err(DecodeError::InsufficientBytes)
    }

    /// Returns the number of bytes in the buffer
    ///
    /// ```
    /// use hickory_edns::serialize::binary::BinDecoder;
    ///
    /// let deadbeef = b"deadbeef";
    /// let mut decoder = BinDecoder::new(deadbeef);
    /// assert_eq!(decoder.len(), 8);
    /// decoder.read_slice(7).unwrap();
    /// assert_eq!(decoder.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Returns `true` if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current index in the buffer
    pub fn index(&self) -> usize {
        self.buffer.len() - self.remaining.len()
    }

    /// Reads a slice out of the buffer, without allocating
    ///
    /// # Arguments
    ///
    /// * `len` - number of bytes to read from the buffer
    ///
    /// # Returns
    ///
    /// The slice of the specified length, otherwise an error
    pub fn read_slice(&mut self, len: usize) -> DecodeResult<Restrict<&'a [u8]>> {
        if len > self.remaining.len() {
            return Err(DecodeError::InsufficientBytes);
        }
        let (read, remaining) = self.remaining.split_at(len);
        self.remaining = remaining;
        Ok(Restrict::new(read))
    }

    /// Reads a byte from the buffer, equivalent to `Self::pop()`
    pub fn read_u8(&mut self) -> DecodeResult<Restrict<u8>> {
        self.pop()
    }

    /// Reads the next 2 bytes into u16
    ///
    /// This performs a byte-by-byte manipulation, there
    ///  which means endianness is implicitly handled (i.e. no network to little endian (intel), issues)
    ///
    /// # Return
    ///
    /// Return the u16 from the buffer
    pub fn read_u16(&mut self) -> DecodeResult<Restrict<u16>> {
        Ok(self
            .read_slice(2)?
            .map(|s| u16::from_be_bytes([s[0], s[1]])))
    }

    /// Reads the next four bytes into u32.
    ///
    /// # Return
    ///
    /// Return the u32 from the buffer
    pub fn read_u32(&mut self) -> DecodeResult<Restrict<u32>> {
        Ok(self
            .read_slice(4)?
            .map(|s| u32::from_be_bytes([s[0], s[1], s[2], s[3]])))
    }

    /// Reads the next eight bytes into u64.
    ///
    /// # Return
    ///
    /// Return the u64 from the buffer
    pub fn read_u64(&mut self) -> DecodeResult<Restrict<u64>> {
        Ok(self.read_slice(8)?.map(|s| {
            let mut be = [0_u8; 8];
            be.copy_from_slice(s);
            u64::from_be_bytes(be)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_slice() {
        let deadbeef = b"deadbeef";
        let mut decoder = BinDecoder::new(deadbeef);

        let read = decoder.read_slice(4).expect("failed to read dead");
        assert_eq!(&read.unverified(), b"dead");

        let read = decoder.read_slice(2).expect("failed to read be");
        assert_eq!(&read.unverified(), b"be");

        let read = decoder.read_slice(0).expect("failed to read nothing");
        assert_eq!(&read.unverified(), b"");
        assert_eq!(decoder.index(), 6);

        // this should fail
        assert!(matches!(
            decoder.read_slice(3),
            Err(DecodeError::InsufficientBytes)
        ));
        // and leave the position untouched
        assert_eq!(decoder.len(), 2);
    }

    #[test]
    fn test_pop_exhausted() {
        let mut decoder = BinDecoder::new(&[0x29]);
        assert_eq!(decoder.pop().unwrap().unverified(), 0x29);
        assert!(decoder.is_empty());
        assert!(decoder.pop().is_err());
        assert!(decoder.read_u16().is_err());
    }

    #[test]
    fn test_is_malformed() {
        assert!(!DecodeError::InsufficientBytes.is_malformed());
        assert!(DecodeError::UnknownSubnetFamily(3).is_malformed());
        assert!(DecodeError::InvalidEdnsOptionLength { code: 2, len: 5 }.is_malformed());
    }
}
