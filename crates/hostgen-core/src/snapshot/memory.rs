// # Static Network Source
//
// Serves a snapshot held in memory. Used for tests and for embedding the
// library where the caller already knows its networks.

use crate::error::Result;
use crate::network::NetworkSnapshot;
use crate::traits::NetworkSource;

/// In-memory network source
///
/// # Example
///
/// ```rust
/// use hostgen_core::{InterfaceSnapshot, NetworkSnapshot, NetworkSource, StaticNetworkSource};
///
/// let source = StaticNetworkSource::new(NetworkSnapshot::new(vec![
///     InterfaceSnapshot::new("eth0").with_ipv4("192.168.1.1".parse().unwrap(), 24),
/// ]));
/// assert_eq!(source.snapshot().unwrap().interfaces.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticNetworkSource {
    snapshot: NetworkSnapshot,
}

impl StaticNetworkSource {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self { snapshot }
    }
}

impl NetworkSource for StaticNetworkSource {
    fn snapshot(&self) -> Result<NetworkSnapshot> {
        Ok(self.snapshot.clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
