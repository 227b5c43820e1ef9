// # File Network Source
//
// Reads a network snapshot from a JSON file, for generating records for
// another machine or reproducing a run.
//
// ## File Format
//
// ```json
// {
//   "interfaces": [
//     {
//       "name": "eth0",
//       "index": 2,
//       "mac": "52:54:00:ab:cd:ef",
//       "ipv4": [{ "address": "192.168.1.1", "prefix_len": 24 }],
//       "ipv6": [{ "address": "2001:db8::1", "prefix_len": 64 }]
//     }
//   ]
// }
// ```
//
// `index`, `mac`, `ipv4` and `ipv6` may be omitted.

use crate::error::{Error, Result};
use crate::network::NetworkSnapshot;
use crate::traits::NetworkSource;
use std::path::{Path, PathBuf};

/// JSON snapshot file source
///
/// The file is read when [`snapshot`](NetworkSource::snapshot) is called,
/// not when the source is created.
#[derive(Debug, Clone)]
pub struct FileNetworkSource {
    path: PathBuf,
}

impl FileNetworkSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a snapshot from JSON text
    pub fn parse(content: &str) -> Result<NetworkSnapshot> {
        let snapshot: NetworkSnapshot = serde_json::from_str(content)?;
        // reject bad prefixes here rather than halfway through a run
        snapshot.local_networks()?;
        Ok(snapshot)
    }
}

impl NetworkSource for FileNetworkSource {
    fn snapshot(&self) -> Result<NetworkSnapshot> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::snapshot(format!(
                "Failed to read snapshot file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let snapshot = Self::parse(&content).map_err(|e| {
            Error::snapshot(format!(
                "Failed to parse snapshot file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            "Loaded snapshot from {}: {} interface(s)",
            self.path.display(),
            snapshot.interfaces.len()
        );

        Ok(snapshot)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
