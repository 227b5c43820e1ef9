//! Selector keys
//!
//! A selector names which local networks a block of hosts is generated
//! on. It is parsed once from the configuration key:
//!
//! | YAML key            | Selector                               |
//! |---------------------|----------------------------------------|
//! | `eth0`, `wl*`       | `InterfaceName`                        |
//! | `3`                 | `InterfaceIndex(3)`                    |
//! | `v4`, `ip6`, `IPv6` | `Family`                               |
//! | `192.168.0.0/16`    | `ContainingNetwork`                    |
//! | `[eth0, wlan0]`     | `SelectorList`                         |
//! | `{eth*: v6}`        | `Filtered { base: eth*, filter: v6 }`  |

use crate::error::{Error, Result};
use crate::network::IpVersion;
use ipnetwork::IpNetwork;
use serde_yaml::Value;
use std::fmt;

/// Which local networks a host block applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// An interface name, possibly containing glob wildcards
    InterfaceName(String),

    /// The interface with this OS index
    InterfaceIndex(u32),

    /// Every local network of one address family
    Family(IpVersion),

    /// Union of several selectors, resolved in order
    SelectorList(Vec<Selector>),

    /// Every local network contained in this network
    ///
    /// The network itself is never a generation target.
    ContainingNetwork(IpNetwork),

    /// The networks of `base` narrowed down by `filter`
    Filtered {
        base: Box<Selector>,
        filter: Box<Selector>,
    },
}

impl Selector {
    /// Parse a single selector string
    ///
    /// Family keywords (`v4`, `ip4`, `ipv4`, `v6`, `ip6`, `ipv6`, any case)
    /// come first. Anything that parses as an IP network becomes a
    /// containment selector; everything else is an interface name or glob.
    pub fn parse_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "v4" | "ip4" | "ipv4" => return Selector::Family(IpVersion::V4),
            "v6" | "ip6" | "ipv6" => return Selector::Family(IpVersion::V6),
            _ => {}
        }

        match s.parse::<IpNetwork>() {
            Ok(net) => match IpNetwork::new(net.network(), net.prefix()) {
                Ok(normalized) => Selector::ContainingNetwork(normalized),
                Err(_) => Selector::ContainingNetwork(net),
            },
            Err(_) => Selector::InterfaceName(s.to_string()),
        }
    }

    /// Parse a selector from a configuration key
    ///
    /// Strings are parsed with [`Selector::parse_str`], non-negative
    /// integers become an [`Selector::InterfaceIndex`], sequences become a
    /// [`Selector::SelectorList`] and mappings become
    /// [`Selector::Filtered`] (a list of them for several entries).
    /// Nesting is allowed everywhere.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigShape`] for any other YAML node, an integer that is
    /// not a valid interface index, or an empty list or mapping.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::parse_str(s)),
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| u32::try_from(i).ok())
                .map(Selector::InterfaceIndex)
                .ok_or_else(|| {
                    Error::config_shape(
                        format!("selector `{}`", n),
                        "numeric selector must be an interface index",
                    )
                }),
            Value::Sequence(seq) => {
                if seq.is_empty() {
                    return Err(Error::config_shape(
                        "selector `[]`",
                        "selector list must not be empty",
                    ));
                }
                seq.iter()
                    .map(Self::from_value)
                    .collect::<Result<Vec<_>>>()
                    .map(Selector::SelectorList)
            }
            Value::Mapping(map) => {
                let mut filtered = map
                    .iter()
                    .map(|(base, filter)| {
                        Ok(Selector::Filtered {
                            base: Box::new(Self::from_value(base)?),
                            filter: Box::new(Self::from_value(filter)?),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                match filtered.len() {
                    0 => Err(Error::config_shape(
                        "selector `{}`",
                        "selector mapping must not be empty",
                    )),
                    1 => Ok(filtered.remove(0)),
                    _ => Ok(Selector::SelectorList(filtered)),
                }
            }
            other => Err(Error::config_shape(
                format!("selector {:?}", other),
                "selector key must be an interface name, index, glob, family, CIDR, \
                 or a list or mapping of those",
            )),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::InterfaceName(name) => f.write_str(name),
            Selector::InterfaceIndex(index) => write!(f, "{}", index),
            Selector::Family(version) => write!(f, "{}", version),
            Selector::ContainingNetwork(net) => write!(f, "{}", net),
            Selector::SelectorList(list) => {
                f.write_str("[")?;
                for (i, s) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", s)?;
                }
                f.write_str("]")
            }
            Selector::Filtered { base, filter } => write!(f, "{{{}: {}}}", base, filter),
        }
    }
}
