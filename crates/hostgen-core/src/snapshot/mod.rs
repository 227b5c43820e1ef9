// # Snapshot Sources
//
// [`NetworkSource`](crate::traits::NetworkSource) implementations that do
// not touch the operating system.

pub mod file;
pub mod memory;

pub use file::FileNetworkSource;
pub use memory::StaticNetworkSource;
