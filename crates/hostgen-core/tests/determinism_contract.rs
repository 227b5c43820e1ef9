//! Contract Test: Determinism
//!
//! Verifies that a run is a pure function of configuration and snapshot.
//!
//! Constraints verified:
//! - The network source is consulted exactly once per run
//! - Identical inputs produce identical records
//! - Records follow declaration order, not address or name order

mod common;

use common::*;
use hostgen_core::HostgenEngine;

const LAB: &str = "\
eth0:
  router: [1]
  nas: [10, {ip6: ~}]
\"wl*\":
  laptop: [\"aa:bb:cc:dd:ee:ff\", {ip4: 42}, {ip6: 42}]
192.168.0.0/16:
  printer: [20, \"0.0.0.250\"]
";

#[test]
fn snapshot_is_taken_once_per_run() {
    let source = CountingNetworkSource::new(home_lab_snapshot());
    let engine = HostgenEngine::new(Box::new(source.clone()));

    engine.generate(&config(LAB)).unwrap();
    assert_eq!(source.call_count(), 1);

    engine.generate(&config(LAB)).unwrap();
    assert_eq!(source.call_count(), 2);
}

#[test]
fn identical_inputs_give_identical_records() {
    let first = HostgenEngine::new(Box::new(CountingNetworkSource::new(home_lab_snapshot())))
        .generate(&config(LAB))
        .unwrap();
    let second = HostgenEngine::new(Box::new(CountingNetworkSource::new(home_lab_snapshot())))
        .generate(&config(LAB))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
}

#[test]
fn records_follow_declaration_order() {
    let records = HostgenEngine::new(Box::new(CountingNetworkSource::new(home_lab_snapshot())))
        .generate(&config(LAB))
        .unwrap();

    let hosts: Vec<&str> = records.zone.iter().map(|z| z.hostname.as_str()).collect();
    assert_eq!(hosts, vec!["router", "nas", "laptop", "printer"]);

    let printer: Vec<String> = records.zone[3].ipv4.iter().map(|a| a.to_string()).collect();
    assert_eq!(printer, vec!["192.168.1.250", "192.168.2.250"]);
}

#[test]
fn invalid_config_is_rejected_before_snapshot() {
    let source = CountingNetworkSource::new(home_lab_snapshot());
    let engine = HostgenEngine::new(Box::new(source.clone()));

    assert!(engine.generate(&config("eth0:\n  h: [true]\n")).is_err());
    assert_eq!(source.call_count(), 0);
}
