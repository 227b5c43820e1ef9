//! Selector resolution
//!
//! Expands a [`Selector`] against a [`NetworkSnapshot`] into the local
//! networks a host block is generated on.
//!
//! - `InterfaceName`: every network (both families) on each interface whose
//!   name matches exactly or as a glob
//! - `InterfaceIndex`: every network on the interface with that OS index
//! - `Family`: every network of that address family
//! - `SelectorList`: union of each member in order, duplicates dropped
//! - `ContainingNetwork`: every local network of the same family that lies
//!   entirely inside the selector's network
//! - `Filtered`: the filter selector applied to only what the base selector
//!   resolved to
//!
//! A selector (or list member) that matches nothing is an error. The one
//! exception is an interface selector that matches an interface carrying no
//! networks, which resolves to an empty list.

pub mod glob;

pub use glob::{InterfaceMatcher, matches};

use crate::config::Selector;
use crate::error::{Error, Location, Result};
use crate::network::{LocalNetwork, NetworkSnapshot};
use ipnetwork::IpNetwork;

/// Resolve a selector into an ordered, duplicate-free list of local networks
///
/// # Parameters
///
/// - `selector`: the parsed selector
/// - `snapshot`: the run's network snapshot
/// - `location`: attached to resolution errors
///
/// # Errors
///
/// [`Error::SelectorResolution`] if the selector, or any member of a list,
/// matches no interface or contains no local network.
pub fn resolve(
    selector: &Selector,
    snapshot: &NetworkSnapshot,
    location: &Location,
) -> Result<Vec<LocalNetwork>> {
    let scope = Scope::from_snapshot(snapshot)?;
    let resolved = scope.resolve(selector, location)?;

    tracing::debug!(
        "{} resolved to {} network(s)",
        location,
        resolved.networks.len()
    );

    Ok(resolved.networks)
}

/// An interface as seen by resolution
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScopedInterface {
    name: String,
    index: Option<u32>,
}

/// The interfaces and networks a selector is resolved against
///
/// The whole snapshot at the top level; a `Filtered` selector resolves its
/// filter against the scope its base produced.
#[derive(Debug, Clone, Default)]
struct Scope {
    interfaces: Vec<ScopedInterface>,
    networks: Vec<LocalNetwork>,
}

impl Scope {
    fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Self> {
        let interfaces = snapshot
            .interfaces
            .iter()
            .map(|i| ScopedInterface {
                name: i.name.clone(),
                index: i.index,
            })
            .collect();

        Ok(Self {
            interfaces,
            networks: snapshot.local_networks()?,
        })
    }

    fn resolve(&self, selector: &Selector, location: &Location) -> Result<Scope> {
        match selector {
            Selector::InterfaceName(pattern) => {
                let matcher = InterfaceMatcher::new(pattern);
                self.interfaces_where(|i| matcher.is_match(&i.name))
                    .ok_or_else(|| {
                        Error::selector_resolution(
                            location,
                            format!("no interface matches `{}`", pattern),
                        )
                    })
            }

            Selector::InterfaceIndex(index) => self
                .interfaces_where(|i| i.index == Some(*index))
                .ok_or_else(|| {
                    Error::selector_resolution(
                        location,
                        format!("no interface has index {}", index),
                    )
                }),

            Selector::Family(version) => self
                .networks_where(|n| n.version() == *version)
                .ok_or_else(|| {
                    Error::selector_resolution(location, format!("no {} network", version))
                }),

            Selector::ContainingNetwork(outer) => self
                .networks_where(|n| contains(outer, n))
                .ok_or_else(|| {
                    Error::selector_resolution(
                        location,
                        format!("no local network lies within {}", outer),
                    )
                }),

            Selector::SelectorList(members) => {
                let mut union = Scope::default();
                for member in members {
                    union.merge(self.resolve(member, location)?);
                }
                Ok(union)
            }

            Selector::Filtered { base, filter } => {
                let narrowed = self.resolve(base, location)?;
                narrowed.resolve(filter, location)
            }
        }
    }

    /// Matched interfaces with all their networks; `None` if none matched
    fn interfaces_where(&self, mut pred: impl FnMut(&ScopedInterface) -> bool) -> Option<Scope> {
        let interfaces: Vec<ScopedInterface> =
            self.interfaces.iter().filter(|i| pred(i)).cloned().collect();
        if interfaces.is_empty() {
            return None;
        }

        let networks = self
            .networks
            .iter()
            .filter(|n| interfaces.iter().any(|i| i.name == n.interface()))
            .cloned()
            .collect();

        Some(Scope {
            interfaces,
            networks,
        })
    }

    /// Matched networks with their interfaces; `None` if none matched
    fn networks_where(&self, mut pred: impl FnMut(&LocalNetwork) -> bool) -> Option<Scope> {
        let networks: Vec<LocalNetwork> =
            self.networks.iter().filter(|n| pred(n)).cloned().collect();
        if networks.is_empty() {
            return None;
        }

        let interfaces = self
            .interfaces
            .iter()
            .filter(|i| networks.iter().any(|n| n.interface() == i.name))
            .cloned()
            .collect();

        Some(Scope {
            interfaces,
            networks,
        })
    }

    fn merge(&mut self, other: Scope) {
        for iface in other.interfaces {
            if !self.interfaces.contains(&iface) {
                self.interfaces.push(iface);
            }
        }
        for network in other.networks {
            push_unique(&mut self.networks, network);
        }
    }
}

/// Whether `inner` lies entirely within `outer`
///
/// Families must match and `inner` must be at least as specific as `outer`.
pub fn contains(outer: &IpNetwork, inner: &LocalNetwork) -> bool {
    match (outer, inner.network()) {
        (IpNetwork::V4(c), IpNetwork::V4(n)) => {
            n.prefix() >= c.prefix()
                && u32::from(n.network()) & u32::from(c.mask()) == u32::from(c.network())
        }
        (IpNetwork::V6(c), IpNetwork::V6(n)) => {
            n.prefix() >= c.prefix()
                && u128::from(n.network()) & u128::from(c.mask()) == u128::from(c.network())
        }
        _ => false,
    }
}

fn push_unique(out: &mut Vec<LocalNetwork>, network: LocalNetwork) {
    if !out.contains(&network) {
        out.push(network);
    }
}
