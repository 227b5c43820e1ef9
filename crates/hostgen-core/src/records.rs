//! Record emission
//!
//! Reshapes derived identities into the records consumed by writers. No
//! formatting happens here; writers decide the textual syntax.

use crate::derive::DerivedIdentity;
use crate::error::{Error, Location, Result};
use pnet_base::MacAddr;
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A DHCP reservation for one host on one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRecord {
    pub hostname: String,
    pub interface: String,
    pub mac: MacAddr,
    /// IPv4 addresses first, then IPv6
    pub addresses: Vec<IpAddr>,
}

/// The DNS addresses of one host across all its networks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneRecord {
    pub hostname: String,
    pub ipv4: Vec<Ipv4Addr>,
    pub ipv6: Vec<Ipv6Addr>,
}

impl ZoneRecord {
    /// All addresses, IPv4 first
    pub fn addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.ipv4
            .iter()
            .copied()
            .map(IpAddr::V4)
            .chain(self.ipv6.iter().copied().map(IpAddr::V6))
    }

    /// Whether the host ended up with no address at all
    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}

/// Everything one run produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    pub reservations: Vec<ReservationRecord>,
    pub zone: Vec<ZoneRecord>,
}

impl RecordSet {
    /// Whether the run produced no records
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty() && self.zone.is_empty()
    }

    /// Whether `hostname` has at least one reservation
    pub fn has_reservation(&self, hostname: &str) -> bool {
        self.reservations.iter().any(|r| r.hostname == hostname)
    }
}

/// Collects identities across all hosts into a [`RecordSet`]
///
/// Records keep the order in which hosts and interfaces first appear.
#[derive(Debug, Default)]
pub struct RecordEmitter {
    records: RecordSet,
    /// MAC (or its absence) first seen per (hostname, interface)
    macs: BTreeMap<(String, String), Option<MacAddr>>,
}

impl RecordEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one identity
    ///
    /// A host seen again on the same interface (e.g. under a second
    /// selector) is merged into its existing reservation.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedItem`] at `location` if the host was already
    /// given a different MAC (or none) on that interface.
    pub fn push(&mut self, identity: DerivedIdentity, location: &Location) -> Result<()> {
        let key = (identity.hostname.clone(), identity.interface.clone());
        match self.macs.get(&key) {
            Some(first) if *first != identity.mac => {
                return Err(Error::unsupported_item(
                    location,
                    format!(
                        "host `{}` already has MAC {} on {}, this entry gives it {}",
                        identity.hostname,
                        describe_mac(*first),
                        identity.interface,
                        describe_mac(identity.mac)
                    ),
                ));
            }
            Some(_) => {}
            None => {
                self.macs.insert(key, identity.mac);
            }
        }

        if let Some(mac) = identity.mac {
            self.push_reservation(&identity, mac);
        }
        self.push_zone(&identity);
        Ok(())
    }

    fn push_reservation(&mut self, identity: &DerivedIdentity, mac: MacAddr) {
        let existing = self
            .records
            .reservations
            .iter_mut()
            .find(|r| r.hostname == identity.hostname && r.interface == identity.interface);

        match existing {
            Some(reservation) => {
                for address in identity.addresses() {
                    push_unique(&mut reservation.addresses, address);
                }
                // keep v4 ahead of v6 after merging
                reservation.addresses.sort_by_key(|a| a.is_ipv6());
            }
            None => {
                let mut addresses = Vec::new();
                for address in identity.addresses() {
                    push_unique(&mut addresses, address);
                }
                self.records.reservations.push(ReservationRecord {
                    hostname: identity.hostname.clone(),
                    interface: identity.interface.clone(),
                    mac,
                    addresses,
                });
            }
        }
    }

    fn push_zone(&mut self, identity: &DerivedIdentity) {
        let index = match self
            .records
            .zone
            .iter()
            .position(|z| z.hostname == identity.hostname)
        {
            Some(index) => index,
            None => {
                self.records.zone.push(ZoneRecord {
                    hostname: identity.hostname.clone(),
                    ipv4: Vec::new(),
                    ipv6: Vec::new(),
                });
                self.records.zone.len() - 1
            }
        };

        let zone = &mut self.records.zone[index];
        for v4 in &identity.ipv4 {
            push_unique(&mut zone.ipv4, *v4);
        }
        for v6 in &identity.ipv6 {
            push_unique(&mut zone.ipv6, *v6);
        }
    }

    /// Finish and return the collected records
    pub fn finish(self) -> RecordSet {
        self.records
    }
}

fn describe_mac(mac: Option<MacAddr>) -> String {
    match mac {
        Some(mac) => mac.to_string(),
        None => "none".to_string(),
    }
}

fn push_unique<T: PartialEq>(out: &mut Vec<T>, value: T) {
    if !out.contains(&value) {
        out.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(
        host: &str,
        iface: &str,
        mac: Option<MacAddr>,
        v4: &[&str],
        v6: &[&str],
    ) -> DerivedIdentity {
        DerivedIdentity {
            hostname: host.to_string(),
            interface: iface.to_string(),
            mac,
            ipv4: v4.iter().map(|a| a.parse().unwrap()).collect(),
            ipv6: v6.iter().map(|a| a.parse().unwrap()).collect(),
        }
    }

    fn loc() -> Location {
        Location::new("eth0", "a")
    }

    #[test]
    fn test_reservation_and_zone_per_host() {
        let mac = MacAddr::new(2, 0, 0, 0, 0, 1);
        let mut emitter = RecordEmitter::new();
        let a0 = identity("a", "eth0", Some(mac), &["192.168.1.1"], &["2001:db8::1"]);
        emitter.push(a0, &loc()).unwrap();
        let a1 = identity("a", "eth1", Some(mac), &["10.0.0.1"], &[]);
        emitter.push(a1, &loc()).unwrap();
        let b0 = identity("b", "eth0", None, &["192.168.1.2"], &[]);
        emitter.push(b0, &loc()).unwrap();
        let records = emitter.finish();

        assert_eq!(records.reservations.len(), 2);
        assert_eq!(records.reservations[0].addresses.len(), 2);
        assert!(!records.has_reservation("b"));

        assert_eq!(records.zone.len(), 2);
        assert_eq!(records.zone[0].hostname, "a");
        assert_eq!(records.zone[0].ipv4.len(), 2);
        assert_eq!(records.zone[1].hostname, "b");
    }

    #[test]
    fn test_repeated_pair_merges() {
        let mac = MacAddr::new(2, 0, 0, 0, 0, 1);
        let mut emitter = RecordEmitter::new();
        for (v4, v6) in [
            (&["192.168.1.1"][..], &[][..]),
            (&["192.168.1.1"][..], &["2001:db8::1"][..]),
            (&["192.168.2.1"][..], &[][..]),
        ] {
            emitter
                .push(identity("a", "eth0", Some(mac), v4, v6), &loc())
                .unwrap();
        }
        let records = emitter.finish();

        assert_eq!(records.reservations.len(), 1);
        assert_eq!(
            records.reservations[0].addresses,
            vec![
                "192.168.1.1".parse::<IpAddr>().unwrap(),
                "192.168.2.1".parse().unwrap(),
                "2001:db8::1".parse().unwrap(),
            ]
        );
        assert_eq!(records.zone[0].ipv4.len(), 2);
    }

    #[test]
    fn test_conflicting_mac_on_same_interface_is_rejected() {
        let first = MacAddr::new(2, 0, 0, 0, 0, 1);
        let second = MacAddr::new(2, 0, 0, 0, 0, 2);
        let mut emitter = RecordEmitter::new();
        emitter
            .push(identity("a", "eth0", Some(first), &["192.168.1.1"], &[]), &loc())
            .unwrap();

        let later = Location::new("192.168.0.0/16", "a");
        let err = emitter
            .push(identity("a", "eth0", Some(second), &["192.168.1.2"], &[]), &later)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedItem { .. }));
        assert_eq!(err.location(), Some(&later));
        let msg = err.to_string();
        assert!(msg.contains("02:00:00:00:00:01"), "{msg}");
        assert!(msg.contains("02:00:00:00:00:02"), "{msg}");

        // a skipped MAC conflicts with a generated one too
        let err = emitter
            .push(identity("a", "eth0", None, &["192.168.1.3"], &[]), &later)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedItem { .. }));

        // other interfaces may carry other MACs
        emitter
            .push(identity("a", "wlan0", Some(second), &["192.168.2.2"], &[]), &later)
            .unwrap();
    }
}
