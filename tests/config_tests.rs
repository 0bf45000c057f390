use ipnet::IpNet;
use net_warden::config::{StorageBackend, parse_allow_nets};
use net_warden::error::AppError;
use std::str::FromStr;

fn ipnet(s: &str) -> IpNet {
    match IpNet::from_str(s) {
        Ok(net) => net,
        Err(e) => panic!("invalid network {s}: {e}"),
    }
}

#[test]
fn parse_allow_nets_accepts_mixed_separators() {
    // カンマ・空白・改行が混在しても拾える。裸のアドレスはホスト網になる
    let raw = "10.0.0.0/8, 203.0.113.5\n2001:db8::/32";
    let nets = parse_allow_nets(raw).unwrap_or_else(|e| panic!("parse: {e}"));
    assert_eq!(
        nets,
        vec![
            ipnet("10.0.0.0/8"),
            ipnet("203.0.113.5/32"),
            ipnet("2001:db8::/32"),
        ]
    );
}

#[test]
fn parse_allow_nets_rejects_invalid_entry() {
    let result = parse_allow_nets("10.0.0.0/8, not-an-ip");
    match result {
        Err(AppError::InvalidAddress(s)) => assert_eq!(s, "not-an-ip"),
        other => panic!("expected InvalidAddress, got {other:?}"),
    }
}

#[test]
fn parse_allow_nets_empty_input_yields_nothing() {
    let nets = parse_allow_nets("").unwrap_or_else(|e| panic!("parse: {e}"));
    assert!(nets.is_empty());

    let nets = parse_allow_nets(" , ,\n").unwrap_or_else(|e| panic!("parse: {e}"));
    assert!(nets.is_empty());
}

#[test]
fn storage_backend_parse_ignores_case_and_rejects_unknown() {
    assert_eq!(
        StorageBackend::from_str("http").unwrap(),
        StorageBackend::Http
    );
    assert_eq!(StorageBackend::from_str("FS").unwrap(), StorageBackend::Fs);

    match StorageBackend::from_str("s3") {
        Err(AppError::Config(msg)) => assert!(msg.contains("s3")),
        other => panic!("expected Config error, got {other:?}"),
    }
}
