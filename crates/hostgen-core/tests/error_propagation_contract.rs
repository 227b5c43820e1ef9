//! Contract Test: Error Propagation
//!
//! Verifies that every failure aborts the run with a located error.
//!
//! Constraints verified:
//! - The first failing entry aborts the run; no partial records
//! - Item and resolution errors name the selector and hostname
//! - Input errors and runtime errors are told apart
//! - One host cannot take two MACs on the same interface

mod common;

use common::*;
use hostgen_core::{Error, HostgenEngine, StaticNetworkSource};

fn run(yaml: &str) -> Error {
    HostgenEngine::new(Box::new(StaticNetworkSource::new(home_lab_snapshot())))
        .generate(&config(yaml))
        .expect_err("generation fails")
}

#[test]
fn unsupported_items_are_rejected() {
    for item in ["true", "-1", "1.5", "~", "[1]", "{a: 1, b: 2}", "{ipx: 1}", "{ip4: -2}"] {
        let err = run(&format!("eth0:\n  h: [{}]\n", item));
        assert!(
            matches!(err, Error::UnsupportedItem { .. }),
            "{} gave {:?}",
            item,
            err
        );
        assert_eq!(err.location().map(|l| l.hostname.as_str()), Some("h"));
    }
}

#[test]
fn malformed_literals_are_rejected() {
    for item in ["\"not-an-address\"", "\"aa:bb:cc\"", "{ip4: \"::1\"}", "{mac: \"10.0.0.1\"}"] {
        let err = run(&format!("eth0:\n  h: [1, {}]\n", item));
        assert!(
            matches!(err, Error::MalformedLiteral { .. }),
            "{} gave {:?}",
            item,
            err
        );
    }
}

#[test]
fn second_bare_seed_is_rejected() {
    assert!(matches!(run("eth0:\n  h: [1, 2]\n"), Error::UnsupportedItem { .. }));
}

#[test]
fn field_assigned_twice_is_rejected() {
    let err = run("eth0:\n  h: [1, \"0.0.0.5\", {ip4: 6}]\n");
    assert!(matches!(err, Error::UnsupportedItem { .. }));
}

#[test]
fn missing_field_is_rejected() {
    let err = run("eth0:\n  h: [\"aa:bb:cc:dd:ee:ff\", {ip4: 7}]\n");
    match err {
        Error::MissingIdentity { location, field } => {
            assert_eq!(field, "ip6");
            assert_eq!(location.selector, "eth0");
        }
        other => panic!("expected missing identity, got {:?}", other),
    }
}

#[test]
fn shape_errors_are_rejected() {
    assert!(matches!(run("eth0: [1, 2]\n"), Error::ConfigShape { .. }));
    assert!(matches!(run("eth0:\n  h: 1\n"), Error::ConfigShape { .. }));
    assert!(matches!(run("eth0:\n  ? [a]\n  : [1]\n"), Error::ConfigShape { .. }));
}

#[test]
fn late_error_discards_earlier_hosts() {
    let yaml = "eth0:\n  good: [1]\nmissing0:\n  bad: [2]\n";
    let result = HostgenEngine::new(Box::new(StaticNetworkSource::new(home_lab_snapshot())))
        .generate(&config(yaml));
    assert!(result.is_err());
}

#[test]
fn snapshot_failure_is_runtime_error() {
    let err = HostgenEngine::new(Box::new(FailingNetworkSource))
        .generate(&config("eth0:\n  h: [1]\n"))
        .unwrap_err();

    assert!(matches!(err, Error::Snapshot(_)));
    assert!(!err.is_input_error());
}

#[test]
fn conflicting_mac_on_same_interface_is_rejected() {
    let err = run("eth0:\n  nas: [1]\n192.168.0.0/16:\n  nas: [2]\n");

    match &err {
        Error::UnsupportedItem { location, .. } => {
            assert_eq!(location.selector, "192.168.0.0/16");
            assert_eq!(location.hostname, "nas");
        }
        other => panic!("expected item error, got {:?}", other),
    }
    assert!(err.is_input_error());
}

#[test]
fn iface_on_interface_without_mac_is_rejected() {
    let err = run("wlan0:\n  ap: [iface]\n");
    assert!(matches!(err, Error::UnsupportedItem { .. }), "{:?}", err);
    assert_eq!(err.location().map(|l| l.selector.as_str()), Some("wlan0"));
}
