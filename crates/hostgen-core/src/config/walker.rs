//! Config tree walker
//!
//! Flattens `selector -> {hostname -> [item, ...]}` into an ordered list of
//! entries. Declaration order of both selector keys and hostname keys is
//! preserved so generated files are stable across reruns.

use super::item::Item;
use super::selector::Selector;
use crate::error::{Error, Location, Result};
use serde_yaml::{Mapping, Value};

/// A host and its items as declared under one selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    pub hostname: String,
    pub items: Vec<Item>,
}

/// One (selector, host) pair from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Parsed selector
    pub selector: Selector,
    /// The selector key as written, for diagnostics
    pub selector_key: String,
    /// The host block
    pub host: HostBlock,
}

impl ConfigEntry {
    /// Location of this entry for error reporting
    pub fn location(&self) -> Location {
        Location::new(&self.selector_key, &self.host.hostname)
    }
}

/// Walk a configuration tree into ordered entries
///
/// # Errors
///
/// - [`Error::ConfigShape`] if a selector's value is not a mapping, a
///   hostname is not a string, or a host's value is not a sequence
/// - item errors from [`Item::from_value`], tagged with their location
pub fn walk(tree: &Mapping) -> Result<Vec<ConfigEntry>> {
    let mut entries = Vec::new();

    for (key, hosts) in tree {
        let selector = Selector::from_value(key)?;
        let selector_key = match key {
            Value::String(s) => s.clone(),
            _ => selector.to_string(),
        };

        let hosts = hosts.as_mapping().ok_or_else(|| {
            Error::config_shape(
                format!("selector `{}`", selector_key),
                "value must be a mapping of hostname to item list",
            )
        })?;

        for (name, items) in hosts {
            let hostname = name.as_str().ok_or_else(|| {
                Error::config_shape(
                    format!("selector `{}`", selector_key),
                    format!("hostname must be a string, got {:?}", name),
                )
            })?;

            let location = Location::new(&selector_key, hostname);
            let items = items.as_sequence().ok_or_else(|| {
                Error::config_shape(
                    format!("selector `{}`, host `{}`", selector_key, hostname),
                    "host value must be a sequence of items",
                )
            })?;

            let items = items
                .iter()
                .map(|v| Item::from_value(v, &location))
                .collect::<Result<Vec<_>>>()?;

            tracing::trace!(
                selector = %selector_key,
                hostname,
                items = items.len(),
                "walked host entry"
            );

            entries.push(ConfigEntry {
                selector: selector.clone(),
                selector_key: selector_key.clone(),
                host: HostBlock {
                    hostname: hostname.to_string(),
                    items,
                },
            });
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_walk_preserves_declaration_order() {
        let entries = walk(&tree(
            r#"
wlan0:
  zeta: [3]
  alpha: [1]
eth0:
  mid: [2]
"#,
        ))
        .unwrap();

        let order: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.selector_key.as_str(), e.host.hostname.as_str()))
            .collect();
        assert_eq!(order, vec![("wlan0", "zeta"), ("wlan0", "alpha"), ("eth0", "mid")]);
    }

    #[test]
    fn test_list_selector_key() {
        let entries = walk(&tree("? [eth0, eth1]\n: {nas: [4]}\n")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].selector_key, "[eth0, eth1]");
        assert!(matches!(entries[0].selector, Selector::SelectorList(_)));
    }

    #[test]
    fn test_index_and_filtered_selector_keys() {
        let yaml = "2:\n  gw: [iface]\n? {'br*': v6}\n: {media: [30]}\n";
        let entries = walk(&tree(yaml)).unwrap();
        assert_eq!(entries[0].selector, Selector::InterfaceIndex(2));
        assert_eq!(entries[0].selector_key, "2");
        assert_eq!(entries[0].host.items, vec![Item::Iface]);
        assert!(matches!(entries[1].selector, Selector::Filtered { .. }));
        assert_eq!(entries[1].selector_key, "{br*: v6}");
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            walk(&tree("eth0: [1, 2]")),
            Err(Error::ConfigShape { .. })
        ));
        assert!(matches!(
            walk(&tree("eth0: {host: 5}")),
            Err(Error::ConfigShape { .. })
        ));
        assert!(matches!(
            walk(&tree("eth0: {42: [5]}")),
            Err(Error::ConfigShape { .. })
        ));
    }

    #[test]
    fn test_item_errors_carry_location() {
        let err = walk(&tree("lan*: {printer: [bogus]}")).unwrap_err();
        assert_eq!(err.location(), Some(&Location::new("lan*", "printer")));
    }
}
