// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The DNS cookie option, [RFC 7873](https://tools.ietf.org/html/rfc7873#section-4)

use std::fmt;

use data_encoding::HEXLOWER;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{EdnsCode, EdnsOptionData};
use crate::error::*;
use crate::serialize::binary::*;

const CLIENT_COOKIE_LEN: usize = 8;
const SERVER_COOKIE_MIN: usize = 8;
const SERVER_COOKIE_MAX: usize = 32;

/// A client cookie, and the server cookie once one was received
///
/// ```text
///      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///      |                                                               |
///      +-+-     Client Cookie (fixed size, 8 bytes)              -+-+-+-+
///      |                                                               |
///      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///      |                                                               |
///      /       Server Cookie  (variable size, 8 to 32 bytes)           /
///      /                                                               /
///      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Cookie {
    client: [u8; CLIENT_COOKIE_LEN],
    server: Option<Vec<u8>>,
}

impl Cookie {
    /// A cookie with only the client part, as sent before the server is known
    pub fn new(client: [u8; CLIENT_COOKIE_LEN]) -> Self {
        Self {
            client,
            server: None,
        }
    }

    /// A cookie with both parts, the server cookie must be 8 to 32 bytes
    pub fn with_server(client: [u8; CLIENT_COOKIE_LEN], server: Vec<u8>) -> ProtoResult<Self> {
        check_server_len(&server)?;
        Ok(Self {
            client,
            server: Some(server),
        })
    }

    /// The client cookie
    pub fn client(&self) -> &[u8; CLIENT_COOKIE_LEN] {
        &self.client
    }

    /// The server cookie
    pub fn server(&self) -> Option<&[u8]> {
        self.server.as_deref()
    }
}

fn check_server_len(server: &[u8]) -> ProtoResult<()> {
    if !(SERVER_COOKIE_MIN..=SERVER_COOKIE_MAX).contains(&server.len()) {
        return Err(ProtoErrorKind::ServerCookieLength(server.len()).into());
    }

    Ok(())
}

impl EdnsOptionData for Cookie {
    fn len(&self) -> usize {
        CLIENT_COOKIE_LEN + self.server.as_ref().map_or(0, Vec::len)
    }

    fn read_data(data: &[u8]) -> ProtoResult<Self> {
        let len = data.len();
        let server_len = len.saturating_sub(CLIENT_COOKIE_LEN);
        if len < CLIENT_COOKIE_LEN
            || (server_len != 0
                && !(SERVER_COOKIE_MIN..=SERVER_COOKIE_MAX).contains(&server_len))
        {
            return Err(DecodeError::InvalidEdnsOptionLength {
                code: EdnsCode::Cookie.into(),
                len,
            }
            .into());
        }

        let (client_bytes, server) = data.split_at(CLIENT_COOKIE_LEN);
        let mut client = [0_u8; CLIENT_COOKIE_LEN];
        client.copy_from_slice(client_bytes);

        Ok(Self {
            client,
            server: (!server.is_empty()).then(|| server.to_vec()),
        })
    }
}

impl BinEncodable for Cookie {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        // a deserialized cookie has not been through `with_server`
        if let Some(server) = &self.server {
            check_server_len(server)?;
        }

        encoder.emit_vec(&self.client)?;
        if let Some(server) = &self.server {
            encoder.emit_vec(server)?;
        }
        Ok(())
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&HEXLOWER.encode(&self.client))?;
        if let Some(server) = &self.server {
            f.write_str(&HEXLOWER.encode(server))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_only() {
        let bytes = [0x0b, 0x64, 0xb4, 0xdc, 0xd7, 0xb0, 0xcc, 0x8f];
        let cookie = Cookie::read_data(&bytes).unwrap();
        assert_eq!(cookie.client(), &bytes);
        assert_eq!(cookie.server(), None);
        assert_eq!(cookie.to_bytes().unwrap(), bytes.to_vec());
        assert_eq!(cookie.to_string(), "0b64b4dcd7b0cc8f");
    }

    #[test]
    fn test_with_server() {
        let cookie = Cookie::with_server([1; 8], vec![2; 16]).unwrap();
        let bytes = cookie.to_bytes().unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(cookie.len(), 24);
        assert_eq!(Cookie::read_data(&bytes).unwrap(), cookie);

        for len in [7, 33] {
            let err = Cookie::with_server([1; 8], vec![2; len]).unwrap_err();
            assert!(matches!(err.kind(), ProtoErrorKind::ServerCookieLength(l) if *l == len));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_short_server_not_emitted() {
        let cookie: Cookie = toml::from_str(
            "client = [1, 2, 3, 4, 5, 6, 7, 8]\nserver = [9, 9, 9]",
        )
        .expect("failed to deserialize cookie");
        assert_eq!(cookie.server(), Some(&[9, 9, 9][..]));

        let err = cookie.to_bytes().unwrap_err();
        assert!(matches!(err.kind(), ProtoErrorKind::ServerCookieLength(3)));

        let cookie: Cookie = toml::from_str(
            "client = [1, 2, 3, 4, 5, 6, 7, 8]\nserver = [9, 9, 9, 9, 9, 9, 9, 9]",
        )
        .expect("failed to deserialize cookie");
        let bytes = cookie.to_bytes().unwrap();
        assert_eq!(Cookie::read_data(&bytes).unwrap(), cookie);
    }

    #[test]
    fn test_bad_length() {
        for len in [0, 7, 9, 15, 41] {
            let err = Cookie::read_data(&vec![0; len]).unwrap_err();
            assert!(
                matches!(
                    err.as_decode(),
                    Some(DecodeError::InvalidEdnsOptionLength { code: 10, .. })
                ),
                "length {len}: {err:?}"
            );
        }

        assert!(Cookie::read_data(&[0; 40]).is_ok());
    }
}
