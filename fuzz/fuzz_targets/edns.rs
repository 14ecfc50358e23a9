#![no_main]

//! This fuzzer checks that, if an OPT record can be decoded, it can be re-encoded, and that the
//! re-encoded form is stable. The first encoding may differ from the input: client subnet
//! addresses are masked to their source prefix and bytes past RDLENGTH are dropped. A record
//! longer than 65535 bytes decodes but is refused by the encoder.

use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

use hickory_edns::{
    op::Edns,
    serialize::binary::{BinDecodable, BinEncodable},
    ProtoErrorKind,
};

fuzz_target!(|data: &[u8]| {
    let Ok(edns) = Edns::from_bytes(data) else {
        return;
    };

    let reencoded = match edns.to_bytes() {
        Ok(reencoded) => reencoded,
        Err(error) if matches!(error.kind(), ProtoErrorKind::MaxBufferSizeExceeded(_)) => return,
        Err(error) => panic!("decoded OPT record could not be encoded: {error}\n{edns:?}"),
    };

    let reparsed = match Edns::from_bytes(&reencoded) {
        Ok(reparsed) => reparsed,
        Err(error) => {
            println!("Original:   {:02x?}", data);
            println!("Re-encoded: {:02x?}", reencoded);
            panic!("re-encoded OPT record could not be decoded: {error}");
        }
    };

    assert_eq!(reparsed.max_payload(), edns.max_payload());
    assert_eq!(reparsed.ttl(), edns.ttl());
    assert_eq!(reparsed.options().len(), edns.options().len());
    assert_eq!(reparsed.to_bytes().unwrap(), reencoded);
});
