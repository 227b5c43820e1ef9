//! Plugin-based writer registry
//!
//! Output modes are looked up by name instead of matched in the binary,
//! so a new format only needs a crate that registers itself.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hostgen_core::WriterRegistry;
//!
//! let mut registry = WriterRegistry::new();
//! hostgen_writers::register(&mut registry);
//!
//! let writer = registry.writer("dnsmasq")?;
//! writer.write(&records, &mut std::io::stdout())?;
//! ```
//!
//! ## Registration
//!
//! Writer crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &mut WriterRegistry) {
//!     registry.register_writer("dnsmasq", Box::new(DnsmasqWriter::new()));
//! }
//! ```

use crate::error::{Error, Result};
use crate::traits::RecordWriter;
use std::collections::BTreeMap;

/// Registry of output writers keyed by mode name
#[derive(Default)]
pub struct WriterRegistry {
    writers: BTreeMap<String, Box<dyn RecordWriter>>,
}

impl WriterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a writer
    ///
    /// # Parameters
    ///
    /// - `name`: Output mode name (e.g., "dnsmasq", "zone")
    /// - `writer`: The writer; replaces any writer already under `name`
    pub fn register_writer(&mut self, name: impl Into<String>, writer: Box<dyn RecordWriter>) {
        let name = name.into();
        if self.writers.insert(name.clone(), writer).is_some() {
            tracing::debug!("Replaced writer for mode {}", name);
        }
    }

    /// Look up the writer for an output mode
    ///
    /// # Returns
    ///
    /// - `Ok(&dyn RecordWriter)`: the registered writer
    /// - `Err(Error::Config)`: if no writer is registered under `name`
    pub fn writer(&self, name: &str) -> Result<&dyn RecordWriter> {
        self.writers.get(name).map(|w| w.as_ref()).ok_or_else(|| {
            Error::config(format!(
                "Unknown output mode: {} (available: {})",
                name,
                self.writer_names().join(", ")
            ))
        })
    }

    /// Registered mode names, sorted
    pub fn writer_names(&self) -> Vec<String> {
        self.writers.keys().cloned().collect()
    }

    /// Check if a mode is registered
    pub fn has_writer(&self, name: &str) -> bool {
        self.writers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordSet;
    use std::io;

    struct CountWriter;

    impl RecordWriter for CountWriter {
        fn write(&self, records: &RecordSet, out: &mut dyn io::Write) -> Result<()> {
            writeln!(out, "{}", records.zone.len())?;
            Ok(())
        }

        fn writer_name(&self) -> &'static str {
            "count"
        }
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = WriterRegistry::new();

        // Initially empty
        assert!(!registry.has_writer("count"));

        registry.register_writer("count", Box::new(CountWriter));
        registry.register_writer("another", Box::new(CountWriter));

        assert!(registry.has_writer("count"));
        assert_eq!(registry.writer_names(), vec!["another", "count"]);
        assert_eq!(
            registry.writer("count").unwrap().render(&RecordSet::default()).unwrap(),
            "0\n"
        );
    }

    #[test]
    fn test_unknown_writer_is_config_error() {
        let registry = WriterRegistry::new();
        assert!(matches!(registry.writer("bind"), Err(Error::Config(_))));
    }
}
