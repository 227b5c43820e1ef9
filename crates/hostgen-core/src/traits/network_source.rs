// # Network Source Trait
//
// Defines the interface for reading the local network snapshot.
//
// ## Implementations
//
// - Live interfaces via pnet: `hostgen-net-pnet` crate
// - In-memory: [`StaticNetworkSource`](crate::snapshot::StaticNetworkSource)
// - JSON snapshot file: [`FileNetworkSource`](crate::snapshot::FileNetworkSource)
//
// ## Usage
//
// ```rust,ignore
// use hostgen_core::NetworkSource;
//
// fn main() -> hostgen_core::Result<()> {
//     let source = /* NetworkSource implementation */;
//     let snapshot = source.snapshot()?;
//
//     for iface in &snapshot.interfaces {
//         println!("{}: {} v4, {} v6", iface.name, iface.ipv4.len(), iface.ipv6.len());
//     }
//
//     Ok(())
// }
// ```

use crate::network::NetworkSnapshot;

/// Trait for network source implementations
///
/// A source is asked for a snapshot exactly once per run. It reports what
/// is configured and nothing else: no selector matching, no filtering by
/// host configuration.
pub trait NetworkSource: Send + Sync {
    /// Read the current interfaces and their subnets
    ///
    /// # Returns
    ///
    /// - `Ok(NetworkSnapshot)`: interfaces in a stable order
    /// - `Err(Error)`: if the interfaces could not be read
    fn snapshot(&self) -> Result<NetworkSnapshot, crate::Error>;

    /// Short name used in logs (e.g. "pnet", "file")
    fn source_name(&self) -> &'static str;
}
