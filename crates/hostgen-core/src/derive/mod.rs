//! Identity derivation
//!
//! Derivation runs in two steps:
//!
//! 1. [`HostPlan::classify`] turns a host's items into one
//!    [`DerivedField`] per field (mac, ip4, ip6). This happens once per
//!    host and is where conflicting or missing items are rejected.
//! 2. [`HostPlan::derive`] applies the plan to each resolved local network,
//!    producing one [`DerivedIdentity`] per interface.
//!
//! ## Rules
//!
//! - The first bare seed (or bare `iface`) is the default for all three
//!   fields. A second one is rejected.
//! - Literals and tags are explicit assignments and always win over the
//!   default. Two explicit assignments to one field are rejected. An `ip`
//!   tag assigns both ip4 and ip6.
//! - Seeds contribute `seed mod 2^H` host bits; overrides contribute their
//!   own host bits. Network bits always come from the local network.
//! - `iface` takes the interface's hardware MAC, and the interface's own
//!   address on each network.
//! - An ip6 field that falls back to the default seed uses the EUI-64
//!   identifier of the host's MAC instead of the seed.

pub mod address;

use crate::config::{Field, Item, Literal, TagValue};
use crate::error::{Error, Location, Result};
use crate::network::LocalNetwork;
use address::{eui64_interface_id, ipv4_in_network, ipv6_in_network, synthesize_mac};
use pnet_base::MacAddr;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// How one field of a host's identity is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedField<L> {
    /// Derived from the host's default seed
    Auto(u64),
    /// Derived from a seed given under the field's tag
    Seeded(u64),
    /// Explicit literal
    Override(L),
    /// Taken from the interface the network is on
    Interface,
    /// Not generated
    Skip,
}

/// Classified identity fields of one host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlan {
    pub mac: DerivedField<MacAddr>,
    pub ip4: DerivedField<Ipv4Addr>,
    pub ip6: DerivedField<Ipv6Addr>,
}

/// A host's identity on one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
    pub hostname: String,
    pub interface: String,
    /// Shared by every network on the interface; `None` when skipped
    pub mac: Option<MacAddr>,
    /// One per matching IPv4 network
    pub ipv4: Vec<Ipv4Addr>,
    /// One per matching IPv6 network
    pub ipv6: Vec<Ipv6Addr>,
}

impl DerivedIdentity {
    /// All addresses, IPv4 first
    pub fn addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.ipv4
            .iter()
            .copied()
            .map(IpAddr::V4)
            .chain(self.ipv6.iter().copied().map(IpAddr::V6))
    }
}

/// Untagged item every field falls back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultSource {
    Seed(u64),
    Interface,
}

impl DefaultSource {
    fn describe(self) -> String {
        match self {
            DefaultSource::Seed(seed) => format!("seed {}", seed),
            DefaultSource::Interface => "`iface`".to_string(),
        }
    }
}

#[derive(Default)]
struct Explicit {
    mac: Option<DerivedField<MacAddr>>,
    ip4: Option<DerivedField<Ipv4Addr>>,
    ip6: Option<DerivedField<Ipv6Addr>>,
}

impl Explicit {
    /// Apply a tagged item to `field`
    ///
    /// A literal always lands on the field of its own kind.
    fn tag(&mut self, field: Field, value: TagValue, location: &Location) -> Result<()> {
        match (field, value) {
            (_, TagValue::Literal(Literal::Mac(mac))) => {
                assign(&mut self.mac, DerivedField::Override(mac), Field::Mac, location)
            }
            (_, TagValue::Literal(Literal::Ipv4(v4))) => {
                assign(&mut self.ip4, DerivedField::Override(v4), Field::Ip4, location)
            }
            (_, TagValue::Literal(Literal::Ipv6(v6))) => {
                assign(&mut self.ip6, DerivedField::Override(v6), Field::Ip6, location)
            }
            (Field::Mac, TagValue::Seed(s)) => {
                assign(&mut self.mac, DerivedField::Seeded(s), field, location)
            }
            (Field::Mac, TagValue::Iface) => {
                assign(&mut self.mac, DerivedField::Interface, field, location)
            }
            (Field::Mac, TagValue::Skip) => {
                assign(&mut self.mac, DerivedField::Skip, field, location)
            }
            (Field::Ip4, TagValue::Seed(s)) => {
                assign(&mut self.ip4, DerivedField::Seeded(s), field, location)
            }
            (Field::Ip4, TagValue::Iface) => {
                assign(&mut self.ip4, DerivedField::Interface, field, location)
            }
            (Field::Ip4, TagValue::Skip) => {
                assign(&mut self.ip4, DerivedField::Skip, field, location)
            }
            (Field::Ip6, TagValue::Seed(s)) => {
                assign(&mut self.ip6, DerivedField::Seeded(s), field, location)
            }
            (Field::Ip6, TagValue::Iface) => {
                assign(&mut self.ip6, DerivedField::Interface, field, location)
            }
            (Field::Ip6, TagValue::Skip) => {
                assign(&mut self.ip6, DerivedField::Skip, field, location)
            }
        }
    }
}

fn assign<L>(
    slot: &mut Option<DerivedField<L>>,
    value: DerivedField<L>,
    field: Field,
    location: &Location,
) -> Result<()> {
    if slot.is_some() {
        return Err(Error::unsupported_item(
            location,
            format!("`{}` is assigned more than once", field),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn resolve_field<L>(
    explicit: Option<DerivedField<L>>,
    default: Option<DefaultSource>,
    field: Field,
    location: &Location,
) -> Result<DerivedField<L>> {
    match (explicit, default) {
        (Some(value), _) => Ok(value),
        (None, Some(DefaultSource::Seed(seed))) => Ok(DerivedField::Auto(seed)),
        (None, Some(DefaultSource::Interface)) => Ok(DerivedField::Interface),
        (None, None) => Err(Error::missing_identity(location, field.as_str())),
    }
}

impl HostPlan {
    /// Classify a host's items
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedItem`] for a second bare seed or `iface`, or a
    ///   field assigned twice
    /// - [`Error::MissingIdentity`] for a field with no item and no
    ///   default
    pub fn classify(items: &[Item], location: &Location) -> Result<Self> {
        let mut default: Option<DefaultSource> = None;
        let mut explicit = Explicit::default();

        for item in items {
            let source = match *item {
                Item::Seed(seed) => DefaultSource::Seed(seed),
                Item::Iface => DefaultSource::Interface,
                Item::MacLiteral(mac) => {
                    explicit.tag(Field::Mac, TagValue::Literal(Literal::Mac(mac)), location)?;
                    continue;
                }
                Item::Ipv4Literal(v4) => {
                    explicit.tag(Field::Ip4, TagValue::Literal(Literal::Ipv4(v4)), location)?;
                    continue;
                }
                Item::Ipv6Literal(v6) => {
                    explicit.tag(Field::Ip6, TagValue::Literal(Literal::Ipv6(v6)), location)?;
                    continue;
                }
                Item::Tagged { field, value } => {
                    explicit.tag(field, value, location)?;
                    continue;
                }
                Item::TaggedIp(value @ TagValue::Literal(_)) => {
                    explicit.tag(Field::Ip4, value, location)?;
                    continue;
                }
                Item::TaggedIp(value) => {
                    explicit.tag(Field::Ip4, value, location)?;
                    explicit.tag(Field::Ip6, value, location)?;
                    continue;
                }
            };

            if let Some(first) = default {
                return Err(Error::unsupported_item(
                    location,
                    format!(
                        "second untagged {} (default is {})",
                        source.describe(),
                        first.describe()
                    ),
                ));
            }
            default = Some(source);
        }

        Ok(Self {
            mac: resolve_field(explicit.mac, default, Field::Mac, location)?,
            ip4: resolve_field(explicit.ip4, default, Field::Ip4, location)?,
            ip6: resolve_field(explicit.ip6, default, Field::Ip6, location)?,
        })
    }

    /// The host's MAC on the interface carrying `network`
    ///
    /// `None` if the field is skipped, or taken from an interface without a
    /// hardware address.
    pub fn mac_on(&self, network: &LocalNetwork) -> Option<MacAddr> {
        match self.mac {
            DerivedField::Auto(seed) | DerivedField::Seeded(seed) => Some(synthesize_mac(seed)),
            DerivedField::Override(mac) => Some(mac),
            DerivedField::Interface => network.interface_mac(),
            DerivedField::Skip => None,
        }
    }

    /// The host's IPv4 address on `network`
    ///
    /// `None` if the field is skipped or `network` is not IPv4.
    pub fn ipv4_on(&self, network: &LocalNetwork) -> Option<Ipv4Addr> {
        let (IpAddr::V4(base), prefix) = (network.network_address(), network.prefix()) else {
            return None;
        };

        let host = match self.ip4 {
            DerivedField::Auto(seed) | DerivedField::Seeded(seed) => u128::from(seed),
            DerivedField::Override(v4) => u128::from(u32::from(v4)),
            DerivedField::Interface => match network.address() {
                IpAddr::V4(own) => u128::from(u32::from(own)),
                IpAddr::V6(_) => return None,
            },
            DerivedField::Skip => return None,
        };

        Some(ipv4_in_network(base, prefix, host))
    }

    /// The host's IPv6 address on `network`
    ///
    /// `None` if the field is skipped or `network` is not IPv6.
    pub fn ipv6_on(&self, network: &LocalNetwork) -> Option<Ipv6Addr> {
        let (IpAddr::V6(base), prefix) = (network.network_address(), network.prefix()) else {
            return None;
        };

        let host = match self.ip6 {
            DerivedField::Auto(seed) => {
                // A skipped MAC still has an identity for EUI-64: the one the
                // default seed would have produced.
                let mac = self.mac_on(network).unwrap_or_else(|| synthesize_mac(seed));
                u128::from(eui64_interface_id(mac))
            }
            DerivedField::Seeded(seed) => u128::from(seed),
            DerivedField::Override(v6) => u128::from(v6),
            DerivedField::Interface => match network.address() {
                IpAddr::V6(own) => u128::from(own),
                IpAddr::V4(_) => return None,
            },
            DerivedField::Skip => return None,
        };

        Some(ipv6_in_network(base, prefix, host))
    }

    /// Derive the host's identities on the given networks
    ///
    /// Networks are grouped by interface in first-appearance order; each
    /// interface yields one [`DerivedIdentity`].
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedItem`] if the MAC is taken from an interface that
    /// has no hardware address.
    pub fn derive(
        &self,
        hostname: &str,
        networks: &[LocalNetwork],
        location: &Location,
    ) -> Result<Vec<DerivedIdentity>> {
        let mut identities: Vec<DerivedIdentity> = Vec::new();

        for network in networks {
            let position = identities
                .iter()
                .position(|i| i.interface == network.interface());

            let index = match position {
                Some(index) => index,
                None => {
                    let mac = self.mac_on(network);
                    if self.mac == DerivedField::Interface && mac.is_none() {
                        return Err(Error::unsupported_item(
                            location,
                            format!(
                                "`iface` MAC requested but {} has no hardware address",
                                network.interface()
                            ),
                        ));
                    }

                    identities.push(DerivedIdentity {
                        hostname: hostname.to_string(),
                        interface: network.interface().to_string(),
                        mac,
                        ipv4: Vec::new(),
                        ipv6: Vec::new(),
                    });
                    identities.len() - 1
                }
            };

            let identity = &mut identities[index];
            if let Some(v4) = self.ipv4_on(network) {
                identity.ipv4.push(v4);
            }
            if let Some(v6) = self.ipv6_on(network) {
                identity.ipv6.push(v6);
            }
        }

        Ok(identities)
    }
}
