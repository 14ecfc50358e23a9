// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#![warn(clippy::print_stdout, missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Hickory DNS EDNS(0) library
//!
//! Encoding and decoding of the OPT pseudo-record, [RFC 6891](https://tools.ietf.org/html/rfc6891),
//! and of the options carried in its RDATA.
//!
//! The entry point is [`op::Edns`], which owns the repurposed CLASS and TTL fields of the OPT
//! record and an ordered [`rr::rdata::OPT`] option list. Both implement
//! [`serialize::binary::BinEncodable`] and [`serialize::binary::BinDecodable`].

mod error;
pub use error::{ProtoError, ProtoErrorKind, ProtoResult};

pub mod op;
pub mod rr;
pub mod serialize;
