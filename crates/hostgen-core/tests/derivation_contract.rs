//! Contract Test: Identity Derivation
//!
//! Verifies the address rules end to end, from YAML to records.
//!
//! Constraints verified:
//! - Seeds only ever fill host bits; network bits come from the local network
//! - Synthesized MACs are locally administered unicast; literal MACs are exact
//! - IPv6 falls back to EUI-64 of the host's MAC
//! - Skipped fields never reach the records
//! - `iface` takes the interface's own MAC and addresses

mod common;

use common::*;
use hostgen_core::derive::address::{is_locally_administered, is_multicast};
use hostgen_core::{HostgenEngine, MacAddr, RecordSet, StaticNetworkSource};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

fn generate(yaml: &str) -> RecordSet {
    let engine = HostgenEngine::new(Box::new(StaticNetworkSource::new(home_lab_snapshot())));
    engine.generate(&config(yaml)).expect("generation succeeds")
}

fn v4(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn v6(s: &str) -> Ipv6Addr {
    s.parse().unwrap()
}

#[test]
fn seed_fills_host_bits_on_every_network() {
    let records = generate("eth0:\n  nas: [267]\n");

    let zone = &records.zone[0];
    assert_eq!(zone.hostname, "nas");
    assert_eq!(zone.ipv4, vec![v4("192.168.1.11")]);

    let reservation = &records.reservations[0];
    assert_eq!(reservation.interface, "eth0");
    assert_eq!(reservation.mac.to_string(), "02:00:00:00:01:0b");
}

#[test]
fn default_seed_ipv6_is_eui64_of_mac() {
    let records = generate("eth0:\n  nas: [10]\n");

    assert_eq!(records.reservations[0].mac.to_string(), "02:00:00:00:00:0a");
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::ff:fe00:a")]);
    assert_eq!(
        records.reservations[0].addresses,
        vec![
            IpAddr::V4(v4("192.168.1.10")),
            IpAddr::V6(v6("2001:db8::ff:fe00:a")),
        ]
    );
}

#[test]
fn eui64_follows_literal_mac() {
    let records = generate("eth0:\n  nas: [10, \"02:00:00:00:00:0b\"]\n");

    assert_eq!(records.reservations[0].mac, MacAddr::new(2, 0, 0, 0, 0, 0x0b));
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.10")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::ff:fe00:b")]);
}

#[test]
fn literal_mac_is_not_modified() {
    // multicast, universally administered: kept as given
    let records = generate("eth0:\n  odd: [1, \"01:00:5E:00:00:FB\"]\n");
    let mac = records.reservations[0].mac;
    assert_eq!(mac.to_string(), "01:00:5e:00:00:fb");
    assert!(is_multicast(mac));
}

#[test]
fn synthesized_macs_are_local_unicast() {
    for seed in [0u64, 1, 255, 0x0100_0000_0000, u64::MAX] {
        let records = generate(&format!("eth1:\n  h: [{}]\n", seed));
        let mac = records.reservations[0].mac;
        assert!(is_locally_administered(mac), "seed {} gave {}", seed, mac);
        assert!(!is_multicast(mac), "seed {} gave {}", seed, mac);
    }
}

#[test]
fn literal_overrides_keep_only_host_bits() {
    let records = generate("eth0:\n  printer: [20, \"10.9.8.5\", \"::5\"]\n");
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.5")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::5")]);

    let records = generate("eth0:\n  printer: [20, \"0.0.0.5\"]\n");
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.5")]);
}

#[test]
fn tagged_literals_keep_only_host_bits() {
    let records = generate("eth0:\n  printer: [20, {ip4: \"10.9.8.7\"}, {ip6: \"fd00::9\"}]\n");
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.7")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::9")]);
    assert_eq!(records.reservations[0].mac.to_string(), "02:00:00:00:00:14");

    let records = generate("eth0:\n  printer: [20, {ip: \"::9\"}]\n");
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.20")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::9")]);
}

#[test]
fn tagged_seeds_win_over_default() {
    let records = generate("eth0:\n  h: [{ip6: 32}, 10, {IPv4: 300}]\n");
    // 300 mod 256 = 44
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.44")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::20")]);
    assert_eq!(records.reservations[0].mac.to_string(), "02:00:00:00:00:0a");
}

#[test]
fn skipped_ipv6_produces_no_ipv6_record() {
    let records = generate("eth0:\n  h: [10, {ip6: ~}]\n");
    assert!(records.zone[0].ipv6.is_empty());
    assert!(records.reservations[0].addresses.iter().all(|a| a.is_ipv4()));
}

#[test]
fn skipped_mac_drops_reservation_but_keeps_eui64() {
    let records = generate("eth0:\n  h: [10, {mac: null}]\n");
    assert!(records.reservations.is_empty());
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.10")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::ff:fe00:a")]);
}

#[test]
fn explicit_fields_without_default_seed() {
    let records = generate("eth0:\n  h: [\"aa:bb:cc:dd:ee:ff\", {ip4: 7}, {ip6: ~}]\n");
    assert_eq!(records.reservations[0].mac.to_string(), "aa:bb:cc:dd:ee:ff");
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.7")]);
    assert!(records.zone[0].ipv6.is_empty());
}

#[test]
fn host_on_several_interfaces_shares_one_mac() {
    let records = generate("eth*:\n  h: [5]\n");

    assert_eq!(records.reservations.len(), 2);
    assert_eq!(records.reservations[0].mac, records.reservations[1].mac);
    assert_eq!(records.zone.len(), 1);
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.5"), v4("10.20.0.5")]);
}

#[test]
fn network_bits_always_match_local_network() {
    let records = generate("eth1:\n  h: [4294967295]\n");
    assert_eq!(records.zone[0].ipv4, vec![v4("10.20.255.255")]);
}

#[test]
fn iface_reuses_interface_identity() {
    let records = generate("eth0:\n  gateway: [iface]\n");

    assert_eq!(records.reservations[0].mac, ETH0_MAC);
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.1")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::1")]);
}

#[test]
fn iface_mac_differs_per_interface() {
    let records = generate("eth*:\n  gateway: [{mac: iface}, 1]\n");

    assert_eq!(records.reservations.len(), 2);
    assert_eq!(records.reservations[0].mac, ETH0_MAC);
    assert_eq!(records.reservations[1].mac, ETH1_MAC);
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.1"), v4("10.20.0.1")]);
    // EUI-64 of the hardware address 52:54:00:00:00:02
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::5054:ff:fe00:2")]);
}

#[test]
fn ip_tag_sets_both_families() {
    let records = generate("eth0:\n  h: [10, {ip: 33}]\n");

    assert_eq!(records.reservations[0].mac.to_string(), "02:00:00:00:00:0a");
    assert_eq!(records.zone[0].ipv4, vec![v4("192.168.1.33")]);
    assert_eq!(records.zone[0].ipv6, vec![v6("2001:db8::21")]);
}
