//! Test doubles and common utilities for contract tests
//!
//! Fixtures model a small home lab: a wired LAN with both families, a
//! second wired network, a Wi-Fi network and an interface with no
//! addresses.

#![allow(dead_code)]

use hostgen_core::error::{Error, Result};
use hostgen_core::{HostConfig, InterfaceSnapshot, MacAddr, NetworkSnapshot, NetworkSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The default fixture snapshot
///
/// Wired interfaces have hardware addresses; `dummy0` has neither a MAC
/// nor any network.
pub fn home_lab_snapshot() -> NetworkSnapshot {
    NetworkSnapshot::new(vec![
        InterfaceSnapshot::new("eth0")
            .with_index(2)
            .with_mac(ETH0_MAC)
            .with_ipv4("192.168.1.1".parse().unwrap(), 24)
            .with_ipv6("2001:db8::1".parse().unwrap(), 64),
        InterfaceSnapshot::new("eth1")
            .with_index(3)
            .with_mac(ETH1_MAC)
            .with_ipv4("10.20.0.1".parse().unwrap(), 16),
        InterfaceSnapshot::new("wlan0")
            .with_index(4)
            .with_ipv4("192.168.2.1".parse().unwrap(), 24)
            .with_ipv6("fd00:2::1".parse().unwrap(), 64),
        InterfaceSnapshot::new("dummy0").with_index(5),
    ])
}

pub const ETH0_MAC: MacAddr = MacAddr(0x52, 0x54, 0x00, 0x00, 0x00, 0x02);
pub const ETH1_MAC: MacAddr = MacAddr(0x52, 0x54, 0x00, 0x00, 0x00, 0x03);

/// Parse a YAML config, panicking on failure
pub fn config(yaml: &str) -> HostConfig {
    HostConfig::from_yaml_str(yaml).expect("fixture config parses")
}

/// A network source that counts how often it is asked for a snapshot
#[derive(Clone)]
pub struct CountingNetworkSource {
    snapshot: NetworkSnapshot,
    calls: Arc<AtomicUsize>,
}

impl CountingNetworkSource {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            snapshot,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times snapshot() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NetworkSource for CountingNetworkSource {
    fn snapshot(&self) -> Result<NetworkSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

/// A network source that always fails
pub struct FailingNetworkSource;

impl NetworkSource for FailingNetworkSource {
    fn snapshot(&self) -> Result<NetworkSnapshot> {
        Err(Error::snapshot("interfaces unavailable"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}
