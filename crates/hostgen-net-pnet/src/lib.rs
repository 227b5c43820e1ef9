// # pnet Network Source
//
// This crate provides the live `NetworkSource` for hostgen, reading the
// system's interfaces through `pnet::datalink`.
//
// ## Filtering
//
// Only networks a host could be given an address on are reported:
//
// - IPv4: private (10/8, 172.16/12, 192.168/16) or globally routable
// - IPv6: unique local (fc00::/7) or global unicast (2000::/3)
//
// Loopback, link-local, unspecified, multicast, broadcast and
// documentation ranges are dropped. Interfaces are kept even when every
// network on them is dropped, so an interface selector still matches.
//
// Each interface also carries its OS index and, unless it is all zeros,
// its hardware address.
//
// ## Platform Support
//
// Anywhere `pnet::datalink::interfaces()` works (Linux, macOS, BSDs,
// Windows with Npcap).

use hostgen_core::resolver::InterfaceMatcher;
use hostgen_core::{InterfaceSnapshot, NetworkSnapshot, NetworkSource, Result};
use pnet::datalink::{self, MacAddr, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Network source reading live interfaces
#[derive(Debug, Clone, Default)]
pub struct PnetNetworkSource {
    interface_filter: Option<String>,
}

impl PnetNetworkSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report interfaces whose name matches `pattern` (exact or glob)
    pub fn with_interface_filter(mut self, pattern: impl Into<String>) -> Self {
        self.interface_filter = Some(pattern.into());
        self
    }

    /// Build a snapshot from already enumerated interfaces
    pub fn snapshot_from(&self, interfaces: &[NetworkInterface]) -> NetworkSnapshot {
        let matcher = self.interface_filter.as_deref().map(InterfaceMatcher::new);

        let interfaces = interfaces
            .iter()
            .filter(|iface| matcher.as_ref().is_none_or(|m| m.is_match(&iface.name)))
            .map(interface_snapshot)
            .collect();

        NetworkSnapshot::new(interfaces)
    }
}

impl NetworkSource for PnetNetworkSource {
    fn snapshot(&self) -> Result<NetworkSnapshot> {
        let interfaces = datalink::interfaces();
        tracing::debug!("pnet reported {} interface(s)", interfaces.len());

        let snapshot = self.snapshot_from(&interfaces);
        for iface in &snapshot.interfaces {
            tracing::trace!(
                "{}: {} IPv4 and {} IPv6 network(s)",
                iface.name,
                iface.ipv4.len(),
                iface.ipv6.len()
            );
        }

        Ok(snapshot)
    }

    fn source_name(&self) -> &'static str {
        "pnet"
    }
}

fn interface_snapshot(iface: &NetworkInterface) -> InterfaceSnapshot {
    let mut snapshot = InterfaceSnapshot::new(iface.name.clone()).with_index(iface.index);
    if let Some(mac) = iface.mac.filter(|mac| *mac != MacAddr::zero()) {
        snapshot = snapshot.with_mac(mac);
    }

    for network in iface.ips.iter().filter(|n| is_real_network(n)) {
        match network {
            IpNetwork::V4(v4) => snapshot = snapshot.with_ipv4(v4.ip(), v4.prefix()),
            IpNetwork::V6(v6) => snapshot = snapshot.with_ipv6(v6.ip(), v6.prefix()),
        }
    }

    snapshot
}

/// Whether a configured network is one hosts can be placed on
pub fn is_real_network(network: &IpNetwork) -> bool {
    match network {
        IpNetwork::V4(v4) => is_real_ipv4(v4.ip()),
        IpNetwork::V6(v6) => is_real_ipv6(v6.ip()),
    }
}

fn is_real_ipv4(addr: Ipv4Addr) -> bool {
    if addr.is_private() {
        return true;
    }

    let [a, b, c, _] = addr.octets();
    let shared = a == 100 && (b & 0xc0) == 64;
    let protocol_assignments = a == 192 && b == 0 && c == 0;
    let benchmarking = a == 198 && (b & 0xfe) == 18;
    let reserved = a >= 240;

    !(addr.is_unspecified()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_multicast()
        || addr.is_broadcast()
        || addr.is_documentation()
        || a == 0
        || shared
        || protocol_assignments
        || benchmarking
        || reserved)
}

fn is_real_ipv6(addr: Ipv6Addr) -> bool {
    let segments = addr.segments();
    let unique_local = (segments[0] & 0xfe00) == 0xfc00;
    let global_unicast = (segments[0] & 0xe000) == 0x2000;
    let documentation = segments[0] == 0x2001 && segments[1] == 0x0db8;

    unique_local || (global_unicast && !documentation)
}
