//! Local network snapshot types
//!
//! A [`NetworkSnapshot`] is the single view of live interfaces a run works
//! from. It is taken once, before any host is resolved, and never
//! refreshed mid-run.

use crate::error::{Error, Result};
use ipnetwork::IpNetwork;
use pnet_base::MacAddr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// IP version (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Address width in bits
    pub fn width(self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("v4"),
            IpVersion::V6 => f.write_str("v6"),
        }
    }
}

/// A subnet configured on an interface: an address plus prefix length
///
/// The address may be a host address; it is masked down to the network
/// address when turned into a [`LocalNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet<A> {
    pub address: A,
    pub prefix_len: u8,
}

impl<A> Subnet<A> {
    pub fn new(address: A, prefix_len: u8) -> Self {
        Self {
            address,
            prefix_len,
        }
    }
}

/// One interface as reported by a network source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSnapshot {
    /// Interface name (e.g. "eth0")
    pub name: String,

    /// OS interface index, if the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Hardware address, if the interface has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<MacAddr>,

    /// IPv4 subnets configured on the interface
    #[serde(default)]
    pub ipv4: Vec<Subnet<Ipv4Addr>>,

    /// IPv6 subnets configured on the interface
    #[serde(default)]
    pub ipv6: Vec<Subnet<Ipv6Addr>>,
}

impl InterfaceSnapshot {
    /// Create an interface with no subnets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            mac: None,
            ipv4: Vec::new(),
            ipv6: Vec::new(),
        }
    }

    /// Set the OS interface index
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the hardware address
    pub fn with_mac(mut self, mac: MacAddr) -> Self {
        self.mac = Some(mac);
        self
    }

    /// Add an IPv4 subnet
    pub fn with_ipv4(mut self, address: Ipv4Addr, prefix_len: u8) -> Self {
        self.ipv4.push(Subnet::new(address, prefix_len));
        self
    }

    /// Add an IPv6 subnet
    pub fn with_ipv6(mut self, address: Ipv6Addr, prefix_len: u8) -> Self {
        self.ipv6.push(Subnet::new(address, prefix_len));
        self
    }

    /// The local networks on this interface, IPv4 first, in reported order
    pub fn local_networks(&self) -> Result<Vec<LocalNetwork>> {
        let v4 = self
            .ipv4
            .iter()
            .map(|s| (IpAddr::V4(s.address), s.prefix_len));
        let v6 = self
            .ipv6
            .iter()
            .map(|s| (IpAddr::V6(s.address), s.prefix_len));

        v4.chain(v6)
            .map(|(address, prefix_len)| {
                let network = LocalNetwork::new(&self.name, address, prefix_len)?;
                Ok(LocalNetwork {
                    index: self.index,
                    interface_mac: self.mac,
                    ..network
                })
            })
            .collect()
    }
}

/// Immutable view of every interface and its subnets for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub interfaces: Vec<InterfaceSnapshot>,
}

impl NetworkSnapshot {
    /// Create a snapshot from a list of interfaces
    pub fn new(interfaces: Vec<InterfaceSnapshot>) -> Self {
        Self { interfaces }
    }

    /// Every local network in the snapshot, in interface order
    pub fn local_networks(&self) -> Result<Vec<LocalNetwork>> {
        let mut networks = Vec::new();
        for iface in &self.interfaces {
            networks.extend(iface.local_networks()?);
        }
        Ok(networks)
    }

    /// Whether the snapshot has no interfaces
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

/// A subnet configured on a live interface
///
/// The network address is normalized on construction. Two `LocalNetwork`s
/// compare equal exactly when they name the same subnet on the same
/// interface; the interface's own address, index and MAC do not take part.
#[derive(Debug, Clone)]
pub struct LocalNetwork {
    interface: String,
    network: IpNetwork,
    address: IpAddr,
    index: Option<u32>,
    interface_mac: Option<MacAddr>,
}

impl PartialEq for LocalNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.interface == other.interface && self.network == other.network
    }
}

impl Eq for LocalNetwork {}

impl Hash for LocalNetwork {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interface.hash(state);
        self.network.hash(state);
    }
}

impl LocalNetwork {
    /// Create a local network, masking `address` down to its network address
    ///
    /// # Errors
    ///
    /// Returns [`Error::Snapshot`] if the prefix length exceeds the address width.
    pub fn new(interface: impl Into<String>, address: IpAddr, prefix_len: u8) -> Result<Self> {
        let interface = interface.into();
        let network = IpNetwork::new(address, prefix_len)
            .and_then(|n| IpNetwork::new(n.network(), prefix_len))
            .map_err(|e| {
                Error::snapshot(format!(
                    "invalid subnet {}/{} on {}: {}",
                    address, prefix_len, interface, e
                ))
            })?;

        Ok(Self {
            interface,
            network,
            address,
            index: None,
            interface_mac: None,
        })
    }

    /// Name of the interface carrying this network
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The network, normalized to its network address
    pub fn network(&self) -> IpNetwork {
        self.network
    }

    /// The interface's own address on this network
    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// OS index of the interface, if known
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Hardware address of the interface, if it has one
    pub fn interface_mac(&self) -> Option<MacAddr> {
        self.interface_mac
    }

    /// The network address
    pub fn network_address(&self) -> IpAddr {
        self.network.network()
    }

    /// Prefix length
    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// Address family
    pub fn version(&self) -> IpVersion {
        match self.network {
            IpNetwork::V4(_) => IpVersion::V4,
            IpNetwork::V6(_) => IpVersion::V6,
        }
    }
}

impl fmt::Display for LocalNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.network, self.interface)
    }
}
