//! Host items
//!
//! Each host in the configuration lists items that describe its identity.
//! Items are classified by shape when the configuration is walked, so a
//! bad item is rejected before any address is derived:
//!
//! | YAML                 | Item                              |
//! |----------------------|-----------------------------------|
//! | `10`                 | `Seed(10)`                        |
//! | `"02:00:00:00:00:0a"`| `MacLiteral`                      |
//! | `"0.0.0.5"`          | `Ipv4Literal`                     |
//! | `"::5"`              | `Ipv6Literal`                     |
//! | `{ip4: 7}`           | `Tagged { Ip4, Seed(7) }`         |
//! | `{ip6: "::9"}`       | `Tagged { Ip6, Literal(..) }`     |
//! | `{ip6: ~}`           | `Tagged { Ip6, Skip }`            |
//! | `iface`              | `Iface`                           |
//! | `{mac: iface}`       | `Tagged { Mac, Iface }`           |
//! | `{ip: 7}`            | `TaggedIp(Seed(7))`               |

use crate::error::{Error, Location, Result};
use pnet_base::MacAddr;
use serde_yaml::Value;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One of the three identity fields of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mac,
    Ip4,
    Ip6,
}

impl Field {
    /// Canonical tag name
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Mac => "mac",
            Field::Ip4 => "ip4",
            Field::Ip6 => "ip6",
        }
    }

    /// Parse a tag key, accepting the long `ipv4`/`ipv6` spellings
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "mac" => Some(Field::Mac),
            "ip4" | "ipv4" => Some(Field::Ip4),
            "ip6" | "ipv6" => Some(Field::Ip6),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicit MAC or address literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Mac(MacAddr),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
}

impl Literal {
    /// The field this literal overrides
    pub fn field(&self) -> Field {
        match self {
            Literal::Mac(_) => Field::Mac,
            Literal::Ipv4(_) => Field::Ip4,
            Literal::Ipv6(_) => Field::Ip6,
        }
    }

    /// Parse a MAC, IPv4 or IPv6 literal, in that order
    ///
    /// MACs may be written with colons or dashes.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(mac) = s.replace('-', ":").parse::<MacAddr>() {
            return Some(Literal::Mac(mac));
        }
        if let Ok(v4) = s.parse::<Ipv4Addr>() {
            return Some(Literal::Ipv4(v4));
        }
        if let Ok(v6) = s.parse::<Ipv6Addr>() {
            return Some(Literal::Ipv6(v6));
        }
        None
    }
}

/// Value of a field-tagged item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValue {
    Seed(u64),
    Literal(Literal),
    /// Taken from the interface itself
    Iface,
    /// Explicit null: the field is not generated
    Skip,
}

/// A single host item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Seed(u64),
    MacLiteral(MacAddr),
    Ipv4Literal(Ipv4Addr),
    Ipv6Literal(Ipv6Addr),
    /// Use the interface's own MAC and addresses
    Iface,
    Tagged { field: Field, value: TagValue },
    /// `{ip: value}`, applying to both address fields
    TaggedIp(TagValue),
}

const IFACE: &str = "iface";

impl From<Literal> for Item {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Mac(mac) => Item::MacLiteral(mac),
            Literal::Ipv4(v4) => Item::Ipv4Literal(v4),
            Literal::Ipv6(v6) => Item::Ipv6Literal(v6),
        }
    }
}

impl Item {
    /// Classify a YAML node as an item
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedLiteral`] for a string that is neither an integer
    ///   nor a MAC/IPv4/IPv6 literal nor `iface`, or a tagged literal of
    ///   the wrong kind
    /// - [`Error::UnsupportedItem`] for any other shape
    pub fn from_value(value: &Value, location: &Location) -> Result<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Item::Seed).ok_or_else(|| {
                Error::unsupported_item(
                    location,
                    format!("seed must be a non-negative integer, got {}", n),
                )
            }),
            Value::String(s) => {
                if let Ok(seed) = s.trim().parse::<u64>() {
                    return Ok(Item::Seed(seed));
                }
                if s.trim().eq_ignore_ascii_case(IFACE) {
                    return Ok(Item::Iface);
                }
                Literal::parse(s).map(Item::from).ok_or_else(|| {
                    Error::malformed_literal(location, s, "not a MAC, IPv4 or IPv6 address")
                })
            }
            Value::Mapping(map) => {
                let mut entries = map.iter();
                let (key, tagged) = match (entries.next(), entries.next()) {
                    (Some(entry), None) => entry,
                    _ => {
                        return Err(Error::unsupported_item(
                            location,
                            format!("tagged item must have exactly one key, got {}", map.len()),
                        ));
                    }
                };

                if key.as_str().is_some_and(|k| k.eq_ignore_ascii_case("ip")) {
                    return Self::ip_tag_value(tagged, location).map(Item::TaggedIp);
                }

                let field = key.as_str().and_then(Field::from_tag).ok_or_else(|| {
                    Error::unsupported_item(
                        location,
                        format!("unknown tag {}, expected mac, ip, ip4 or ip6", describe(key)),
                    )
                })?;

                let value = Self::tag_value(field, tagged, location)?;
                Ok(Item::Tagged { field, value })
            }
            other => Err(Error::unsupported_item(
                location,
                format!("unsupported item {}", describe(other)),
            )),
        }
    }

    fn tag_value(field: Field, value: &Value, location: &Location) -> Result<TagValue> {
        match value {
            Value::Null => Ok(TagValue::Skip),
            Value::Number(n) => n.as_u64().map(TagValue::Seed).ok_or_else(|| {
                Error::unsupported_item(
                    location,
                    format!("{} seed must be a non-negative integer, got {}", field, n),
                )
            }),
            Value::String(s) => {
                if let Ok(seed) = s.trim().parse::<u64>() {
                    return Ok(TagValue::Seed(seed));
                }
                if s.trim().eq_ignore_ascii_case(IFACE) {
                    return Ok(TagValue::Iface);
                }
                match Literal::parse(s) {
                    Some(literal) if literal.field() == field => Ok(TagValue::Literal(literal)),
                    Some(literal) => Err(Error::malformed_literal(
                        location,
                        s,
                        format!("a {} literal cannot be tagged {}", literal.field(), field),
                    )),
                    None => Err(Error::malformed_literal(
                        location,
                        s,
                        format!("not a valid {} literal", field),
                    )),
                }
            }
            other => Err(Error::unsupported_item(
                location,
                format!("unsupported {} value {}", field, describe(other)),
            )),
        }
    }

    /// Value under an `ip` tag: like `ip4`/`ip6`, but a literal may be of
    /// either family
    fn ip_tag_value(value: &Value, location: &Location) -> Result<TagValue> {
        if let Value::String(s) = value {
            if let Some(literal @ (Literal::Ipv4(_) | Literal::Ipv6(_))) = Literal::parse(s) {
                return Ok(TagValue::Literal(literal));
            }
        }

        match Self::tag_value(Field::Ip4, value, location) {
            Err(Error::MalformedLiteral { literal, .. }) => Err(Error::malformed_literal(
                location,
                literal,
                "not a valid ip literal",
            )),
            other => other,
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{}`", b),
        Value::Number(n) => format!("number `{}`", n),
        Value::String(s) => format!("`{}`", s),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(t) => format!("tagged value `{}`", t.tag),
    }
}
