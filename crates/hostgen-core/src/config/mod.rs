//! Host configuration
//!
//! The configuration is a YAML mapping of selector to hosts:
//!
//! ```yaml
//! eth0:
//!   router: [1]
//!   nas: [10, {ip6: ~}]
//! "wl*":
//!   laptop: ["aa:bb:cc:dd:ee:ff", {ip4: 42}]
//! 192.168.0.0/16:
//!   printer: [20, "0.0.0.250"]
//! 2:
//!   gateway: [iface]
//! ? {"br*": v6}
//! : media: [{ip: 30}, 30]
//! ```
//!
//! [`HostConfig`] keeps the parsed tree as an order-preserving
//! [`serde_yaml::Mapping`]; [`walker::walk`] turns it into entries.

pub mod item;
pub mod selector;
pub mod walker;

pub use item::{Field, Item, Literal, TagValue};
pub use selector::Selector;
pub use walker::{ConfigEntry, HostBlock, walk};

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::io::Read;
use std::path::Path;

/// Parsed host configuration tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostConfig {
    tree: Mapping,
}

impl HostConfig {
    /// Wrap an already parsed tree
    pub fn new(tree: Mapping) -> Self {
        Self { tree }
    }

    /// Parse a configuration from YAML text
    ///
    /// An empty document is an empty configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] on invalid YAML, [`Error::ConfigShape`] if the root
    /// is not a mapping.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(s)?;
        Self::from_value(value)
    }

    /// Parse a configuration from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_yaml::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Load a configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::config(format!("Failed to open config {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loading host configuration from {}", path.display());
        let mut text = String::new();
        std::io::BufReader::new(file).read_to_string(&mut text)?;
        Self::from_yaml_str(&text)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(tree) => Ok(Self { tree }),
            other => Err(Error::config_shape(
                "root",
                format!(
                    "configuration must be a mapping of selectors, got {}",
                    match other {
                        Value::Sequence(_) => "a sequence",
                        _ => "a scalar",
                    }
                ),
            )),
        }
    }

    /// The raw tree
    pub fn tree(&self) -> &Mapping {
        &self.tree
    }

    /// Walk the tree into ordered entries
    pub fn entries(&self) -> Result<Vec<ConfigEntry>> {
        walk(&self.tree)
    }

    /// Validate the configuration's shape and items
    ///
    /// This does not resolve selectors, which needs a network snapshot.
    pub fn validate(&self) -> Result<()> {
        self.entries().map(|_| ())
    }

    /// Number of selector keys
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the configuration has no selectors
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
