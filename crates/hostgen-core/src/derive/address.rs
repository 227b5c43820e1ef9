//! Address arithmetic
//!
//! All addresses are handled as unsigned integers of their family's width
//! (32 or 128 bits). The network part of a result always comes from the
//! local network; callers only supply host bits.

use crate::network::IpVersion;
use pnet_base::MacAddr;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Locally administered bit of a MAC's first octet
pub const LOCALLY_ADMINISTERED: u8 = 0b0000_0010;

/// Multicast (group) bit of a MAC's first octet
pub const MULTICAST: u8 = 0b0000_0001;

/// Whether the locally administered bit of `mac` is set
pub fn is_locally_administered(mac: MacAddr) -> bool {
    mac.0 & LOCALLY_ADMINISTERED != 0
}

/// Whether the multicast bit of `mac` is set
pub fn is_multicast(mac: MacAddr) -> bool {
    mac.0 & MULTICAST != 0
}

/// Mask covering the host bits of a `width`-bit address with `prefix` network bits
pub fn host_mask(width: u8, prefix: u8) -> u128 {
    match width.saturating_sub(prefix) {
        0 => 0,
        bits if bits >= 128 => u128::MAX,
        bits => (1u128 << bits) - 1,
    }
}

/// Replace the host bits of `network` with the low host bits of `host`
///
/// Equivalent to `(network & netmask) | (host mod 2^(width - prefix))`.
pub fn with_host_bits(network: u128, width: u8, prefix: u8, host: u128) -> u128 {
    let mask = host_mask(width, prefix);
    let netmask = !mask & host_mask(width, 0);
    (network & netmask) | (host & mask)
}

/// Place `host` into the host bits of an IPv4 network
pub fn ipv4_in_network(network: Ipv4Addr, prefix: u8, host: u128) -> Ipv4Addr {
    let width = IpVersion::V4.width();
    let bits = with_host_bits(u128::from(u32::from(network)), width, prefix, host);
    Ipv4Addr::from(bits as u32)
}

/// Place `host` into the host bits of an IPv6 network
pub fn ipv6_in_network(network: Ipv6Addr, prefix: u8, host: u128) -> Ipv6Addr {
    let width = IpVersion::V6.width();
    Ipv6Addr::from(with_host_bits(u128::from(network), width, prefix, host))
}

/// Synthesize a MAC from a seed
///
/// Takes the low 48 bits of the seed, then sets the locally administered
/// bit and clears the multicast bit.
pub fn synthesize_mac(seed: u64) -> MacAddr {
    let [_, _, a, b, c, d, e, f] = seed.to_be_bytes();
    MacAddr((a | LOCALLY_ADMINISTERED) & !MULTICAST, b, c, d, e, f)
}

/// Modified EUI-64 interface identifier for a MAC
///
/// Flips the universal/local bit and inserts `ff:fe` between the two
/// halves of the MAC.
pub fn eui64_interface_id(mac: MacAddr) -> u64 {
    let MacAddr(a, b, c, d, e, f) = mac;
    u64::from_be_bytes([a ^ LOCALLY_ADMINISTERED, b, c, 0xff, 0xfe, d, e, f])
}
