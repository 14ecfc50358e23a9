use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use hickory_edns::op::{Edns, ResponseCode};
use hickory_edns::rr::rdata::opt::{
    ClientSubnet, Cookie, EdnsCode, EdnsOption, ExtendedError, UpdateLease,
};
use hickory_edns::serialize::binary::{
    BinDecodable, BinDecoder, BinEncodable, BinEncoder, DecodeError, Restrict,
};
use hickory_edns::ProtoErrorKind;
use test_support::{capture_logs, subscribe};

/// An OPT record as sent by a resolver: 1232 byte payload, DO set, a cookie and a client subnet
const QUERY_OPT: &[u8] = &[
    0x00, // root
    0x00, 0x29, // OPT
    0x04, 0xd0, // 1232
    0x00, 0x00, 0x80, 0x00, // DO
    0x00, 0x17, // rdlength 23
    0x00, 0x0a, 0x00, 0x08, 0x0b, 0x64, 0xb4, 0xdc, 0xd7, 0xb0, 0xcc, 0x8f, // COOKIE
    0x00, 0x08, 0x00, 0x07, 0x00, 0x01, 0x18, 0x00, 0xc0, 0x00, 0x02, // CLIENT-SUBNET
];

#[test]
fn test_read_query_opt() {
    subscribe();

    let edns = Edns::from_bytes(QUERY_OPT).expect("failed to read OPT");

    assert_eq!(edns.max_payload(), 1232);
    assert!(edns.dnssec_ok());
    assert_eq!(edns.version(), 0);
    assert_eq!(edns.options().len(), 2);

    let Some(EdnsOption::Subnet(subnet)) = edns.option(EdnsCode::Subnet) else {
        panic!("missing subnet: {edns}");
    };
    assert_eq!(subnet.addr(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 0)));
    assert_eq!(subnet.source_prefix(), 24);
    assert_eq!(subnet.scope_prefix(), 0);

    let cookie = edns
        .option(EdnsCode::Cookie)
        .and_then(EdnsOption::as_cookie)
        .expect("missing cookie");
    assert_eq!(cookie.server(), None);

    // written back out byte for byte
    assert_eq!(edns.to_bytes().unwrap(), QUERY_OPT);
}

#[test]
fn test_subnet_round_trips() {
    subscribe();

    let subnets = [
        ClientSubnet::new(IpAddr::V4(Ipv4Addr::from(0xDEAD_BEEF)), 32, 0),
        ClientSubnet::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 32, 0),
        ClientSubnet::new(
            IpAddr::V6(Ipv6Addr::new(0x2001, 0x0db8, 0, 0, 0, 0, 0, 0x0068)),
            128,
            0,
        ),
    ];

    for subnet in subnets {
        let mut edns = Edns::new();
        edns.options_mut().insert(EdnsOption::Subnet(subnet));

        let bytes = edns.to_bytes().unwrap();
        let read = Edns::from_bytes(&bytes).unwrap();
        assert_eq!(
            read.option(EdnsCode::Subnet),
            Some(&EdnsOption::Subnet(subnet)),
            "{subnet}"
        );
    }
}

#[test]
fn test_update_lease_round_trips() {
    subscribe();

    for lease in [
        UpdateLease::new(0x0123_4567),
        UpdateLease::with_key_lease(0x7654_3210, 0xFEDC_BA98),
    ] {
        let mut edns = Edns::new();
        edns.options_mut().insert(EdnsOption::UpdateLease(lease));

        let read = Edns::from_bytes(&edns.to_bytes().unwrap()).unwrap();
        let read_lease = read
            .option(EdnsCode::UL)
            .and_then(EdnsOption::as_update_lease)
            .expect("missing lease");
        assert_eq!(read_lease.lease(), lease.lease());
        assert_eq!(read_lease.key_lease(), lease.key_lease());
    }
}

#[test]
fn test_malformed_options() {
    subscribe();

    // UL of 5 bytes
    let mut bytes = vec![0x00, 0x00, 0x29, 0x04, 0xd0, 0, 0, 0, 0, 0x00, 0x09];
    bytes.extend_from_slice(&[0x00, 0x02, 0x00, 0x05, 1, 2, 3, 4, 5]);
    let err = Edns::from_bytes(&bytes).unwrap_err();
    assert!(err.as_decode().map_or(false, DecodeError::is_malformed));

    // CLIENT-SUBNET of family 3
    let mut bytes = vec![0x00, 0x00, 0x29, 0x04, 0xd0, 0, 0, 0, 0, 0x00, 0x08];
    bytes.extend_from_slice(&[0x00, 0x08, 0x00, 0x04, 0x00, 0x03, 0x00, 0x00]);
    let err = Edns::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err.as_decode(),
        Some(DecodeError::UnknownSubnetFamily(3))
    ));
}

#[test]
fn test_option_length_overrun() {
    subscribe();

    // NSID claims 16 bytes, the rdata has 2 left
    let bytes = [
        0x00, 0x00, 0x29, 0x04, 0xd0, 0, 0, 0, 0, 0x00, 0x06, 0x00, 0x03, 0x00, 0x10, 0xAB, 0xCD,
    ];
    let err = Edns::from_bytes(&bytes).unwrap_err();
    assert!(err.is_insufficient_bytes(), "{err}");
    assert!(!err.as_decode().map_or(true, DecodeError::is_malformed));
}

#[test]
fn test_record_past_encoder_limit() {
    subscribe();

    // rdlength 0xFFFF: one unknown option carrying 65531 bytes
    let mut bytes = vec![
        0x00, 0x00, 0x29, 0x04, 0xd0, 0, 0, 0, 0, 0xFF, 0xFF, 0x12, 0x34, 0xFF, 0xFB,
    ];
    bytes.resize(11 + 0xFFFF, 0xAB);

    let edns = Edns::from_bytes(&bytes).expect("failed to read OPT");
    assert_eq!(edns.options().len(), 1);
    assert_eq!(edns.options().iter().next().map(EdnsOption::len), Some(65531));

    let err = edns.to_bytes().unwrap_err();
    assert!(
        matches!(err.kind(), ProtoErrorKind::MaxBufferSizeExceeded(65535)),
        "{err}"
    );
}

#[test]
fn test_unknown_and_duplicate_options_survive() {
    subscribe();

    let mut edns = Edns::new();
    edns.options_mut()
        .push(EdnsOption::Unknown(0x4242, vec![1, 2, 3]));
    edns.options_mut().push(EdnsOption::Nsid(vec![]));
    edns.options_mut()
        .push(EdnsOption::Unknown(0x4242, vec![4]));
    edns.options_mut().push(EdnsOption::Local(65001, vec![5, 6]));

    let bytes = edns.to_bytes().unwrap();
    let read = Edns::from_bytes(&bytes).unwrap();

    assert_eq!(read, edns);
    assert_eq!(
        read.options().get_all(EdnsCode::Unknown(0x4242)).count(),
        2
    );
    assert_eq!(read.to_bytes().unwrap(), bytes);
}

#[test]
fn test_response_with_extended_rcode() {
    subscribe();

    let mut edns = Edns::new();
    edns.set_version(0)
        .set_response_code(ResponseCode::BADCOOKIE)
        .set_dnssec_ok(true);
    edns.options_mut().insert(EdnsOption::Cookie(
        Cookie::with_server([7; 8], vec![9; 16]).unwrap(),
    ));
    edns.options_mut()
        .insert(EdnsOption::ExtendedError(ExtendedError::new(
            23,
            "upstream unreachable",
        )));

    let read = Edns::from_bytes(&edns.to_bytes().unwrap()).unwrap();
    assert_eq!(
        read.response_code(ResponseCode::BADCOOKIE.low()),
        ResponseCode::BADCOOKIE
    );
    assert_eq!(read.extended_rcode(), 16);
    assert_eq!(read, edns);
}

#[test]
fn test_appended_to_message() {
    subscribe();

    let mut edns = Edns::new();
    edns.set_max_payload(4096)
        .options_mut()
        .insert(EdnsOption::Padding(vec![0; 8]));

    // a twelve byte message header was written by the enclosing codec
    let mut buf = vec![0xAA; 12];
    {
        let mut encoder = BinEncoder::with_offset(&mut buf, 12);
        edns.emit(&mut encoder).unwrap();
    }
    assert_eq!(&buf[..12], &[0xAA; 12]);

    // the enclosing codec reads the fixed part of the record itself
    let mut decoder = BinDecoder::new(&buf[12..]);
    assert_eq!(decoder.read_u8().unwrap().unverified(), 0);
    assert_eq!(decoder.read_u16().unwrap().unverified(), 41);
    let class = decoder.read_u16().unwrap().unverified();
    let ttl = decoder.read_u32().unwrap().unverified();
    let rdata_length = decoder.read_u16().unwrap();

    let read = Edns::read_rdata(&mut decoder, class, ttl, rdata_length).unwrap();
    assert_eq!(read, edns);
    assert!(decoder.is_empty());
}

#[test]
fn test_read_rdata_restricts_length() {
    let mut decoder = BinDecoder::new(&[0x00, 0x0c, 0x00]);
    let err = Edns::read_rdata(&mut decoder, 512, 0, Restrict::new(3)).unwrap_err();
    assert!(err.is_insufficient_bytes());
}

#[test]
fn test_subnet_host_bits_are_logged() {
    // source prefix 16, but the third byte is not zero
    let bytes = [
        0x00, 0x00, 0x29, 0x04, 0xd0, 0, 0, 0, 0, 0x00, 0x0b, 0x00, 0x08, 0x00, 0x07, 0x00, 0x01,
        0x10, 0x00, 0x0a, 0x01, 0x02,
    ];

    let (read, logs) = capture_logs(|| Edns::from_bytes(&bytes));
    let read = read.expect("host bits are not an error");

    assert!(
        logs.contains("beyond source prefix 16"),
        "logs: {}",
        logs.logs()
    );
    let subnet = read
        .option(EdnsCode::Subnet)
        .and_then(EdnsOption::as_subnet)
        .expect("missing subnet");
    assert_eq!(subnet.addr(), IpAddr::V4(Ipv4Addr::new(10, 1, 2, 0)));
}

#[test]
fn test_unknown_option_is_logged() {
    let bytes = [
        0x00, 0x00, 0x29, 0x04, 0xd0, 0, 0, 0, 0, 0x00, 0x05, 0x12, 0x34, 0x00, 0x01, 0xFF,
    ];

    let (read, logs) = capture_logs(|| Edns::from_bytes(&bytes));
    assert!(read.is_ok());
    assert!(logs.contains("unsupported edns option: OPT4660"), "logs: {}", logs.logs());
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_config() {
    #[derive(serde::Deserialize)]
    struct Config {
        edns: Edns,
    }

    let mut edns = Edns::new();
    edns.set_max_payload(1400).enable_dnssec_ok();
    edns.options_mut()
        .insert(EdnsOption::Subnet("198.51.100.0/24".parse().unwrap()));

    #[derive(serde::Serialize)]
    struct ConfigRef<'a> {
        edns: &'a Edns,
    }

    let text = toml::to_string(&ConfigRef { edns: &edns }).unwrap();
    let config: Config = toml::from_str(&text).unwrap();
    assert_eq!(config.edns, edns);
}
