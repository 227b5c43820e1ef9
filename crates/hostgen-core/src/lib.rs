// # hostgen-core
//
// Core library for deterministic host address generation.
//
// ## Architecture Overview
//
// This library turns a declarative host list into MAC, IPv4 and IPv6
// addresses for every local network a host is placed on:
// - **HostConfig**: YAML tree of `selector -> hostname -> [items]`
// - **NetworkSource**: Trait for reading the local network snapshot
// - **resolver**: Expands selectors into local networks
// - **HostPlan**: Seed/literal/tag rules applied per network
// - **RecordEmitter**: Collects identities into reservation and zone records
// - **RecordWriter**: Trait for rendering records as text
// - **HostgenEngine**: Drives a run from snapshot to records
// - **WriterRegistry**: Plugin-based registry for output modes
//
// ## Design Principles
//
// 1. **Deterministic**: Same configuration and snapshot, same output
// 2. **All or nothing**: The first error aborts the run
// 3. **Plugin-Based**: Network sources and writers live in their own crates
// 4. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod derive;
pub mod engine;
pub mod error;
pub mod network;
pub mod records;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod traits;

// Re-export core types for convenience
pub use config::{HostConfig, Item, Selector};
pub use derive::{DerivedField, DerivedIdentity, HostPlan};
pub use engine::{EngineEvent, HostgenEngine};
pub use error::{Error, Location, Result};
pub use pnet_base::MacAddr;
pub use network::{InterfaceSnapshot, IpVersion, LocalNetwork, NetworkSnapshot, Subnet};
pub use records::{RecordEmitter, RecordSet, ReservationRecord, ZoneRecord};
pub use registry::WriterRegistry;
pub use snapshot::{FileNetworkSource, StaticNetworkSource};
pub use traits::{NetworkSource, RecordWriter};
