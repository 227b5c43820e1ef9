//! Core hostgen engine
//!
//! The HostgenEngine is responsible for:
//! - Taking exactly one network snapshot per run
//! - Walking the host configuration in declaration order
//! - Resolving each entry's selector against the snapshot
//! - Deriving identities and collecting them into records
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ NetworkSource │─── NetworkSnapshot ───┐
//! └───────────────┘                       │
//!                                         ▼
//! ┌───────────────┐              ┌────────────────┐
//! │  HostConfig   │── entries ──▶│ HostgenEngine  │
//! └───────────────┘              └────────────────┘
//!                                         │
//!              ┌──────────────────────────┼──────────────────────────┐
//!              ▼                          ▼                          ▼
//!      ┌──────────────┐          ┌──────────────┐          ┌──────────────┐
//!      │   resolve    │          │   HostPlan   │          │RecordEmitter │
//!      │  (selector)  │          │   (derive)   │          │  (collect)   │
//!      └──────────────┘          └──────────────┘          └──────────────┘
//! ```
//!
//! ## Run Semantics
//!
//! A run either yields a complete [`RecordSet`] or an error; the first
//! failing entry aborts it and no partial records are returned.

use crate::config::{ConfigEntry, HostConfig};
use crate::derive::HostPlan;
use crate::error::Result;
use crate::network::NetworkSnapshot;
use crate::records::{RecordEmitter, RecordSet};
use crate::resolver::resolve;
use crate::traits::NetworkSource;
use std::sync::mpsc;
use tracing::{debug, info, warn};

/// Events emitted by the HostgenEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Snapshot taken from the network source
    SnapshotTaken {
        source: &'static str,
        interfaces: usize,
    },

    /// A host entry resolved and derived
    HostDerived {
        selector: String,
        hostname: String,
        interfaces: usize,
        networks: usize,
    },

    /// A host entry resolved to interfaces without any network
    HostWithoutNetworks {
        selector: String,
        hostname: String,
    },

    /// Run finished
    Finished {
        reservations: usize,
        zone_records: usize,
    },
}

/// Core hostgen engine
///
/// ## Lifecycle
///
/// 1. Create with [`HostgenEngine::new()`]
/// 2. Optionally subscribe to events with [`HostgenEngine::with_events()`]
/// 3. Call [`HostgenEngine::generate()`] once per run
///
/// The engine keeps no state between runs.
pub struct HostgenEngine {
    /// Source of the run's network snapshot
    source: Box<dyn NetworkSource>,

    /// Event sender for external monitoring
    event_tx: Option<mpsc::SyncSender<EngineEvent>>,
}

impl HostgenEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `source`: Network source consulted once per [`generate`](Self::generate)
    pub fn new(source: Box<dyn NetworkSource>) -> Self {
        Self {
            source,
            event_tx: None,
        }
    }

    /// Emit engine events on a bounded channel
    ///
    /// # Parameters
    ///
    /// - `capacity`: Channel capacity; events beyond it are dropped
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver)
    pub fn with_events(mut self, capacity: usize) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        self.event_tx = Some(tx);
        (self, rx)
    }

    /// Name of the underlying network source
    pub fn source_name(&self) -> &'static str {
        self.source.source_name()
    }

    /// Generate records from the live network snapshot
    ///
    /// # Parameters
    ///
    /// - `config`: Host configuration
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSet)`: Records for every host, in declaration order
    /// - `Err(Error)`: The first configuration, resolution or snapshot error
    pub fn generate(&self, config: &HostConfig) -> Result<RecordSet> {
        // Validate the whole tree before touching the system
        let entries = config.entries()?;

        let snapshot = self.source.snapshot()?;
        info!(
            "Snapshot from {}: {} interface(s)",
            self.source.source_name(),
            snapshot.interfaces.len()
        );
        self.emit_event(EngineEvent::SnapshotTaken {
            source: self.source.source_name(),
            interfaces: snapshot.interfaces.len(),
        });

        self.generate_entries(&entries, &snapshot)
    }

    /// Generate records against a given snapshot
    ///
    /// Pure function of `config` and `snapshot`; the engine's own source is
    /// not consulted.
    pub fn generate_with_snapshot(
        &self,
        config: &HostConfig,
        snapshot: &NetworkSnapshot,
    ) -> Result<RecordSet> {
        let entries = config.entries()?;
        self.generate_entries(&entries, snapshot)
    }

    fn generate_entries(
        &self,
        entries: &[ConfigEntry],
        snapshot: &NetworkSnapshot,
    ) -> Result<RecordSet> {
        let mut emitter = RecordEmitter::new();

        for entry in entries {
            let location = entry.location();
            let plan = HostPlan::classify(&entry.host.items, &location)?;
            let networks = resolve(&entry.selector, snapshot, &location)?;

            if networks.is_empty() {
                warn!("{} matched only interfaces without networks", location);
                self.emit_event(EngineEvent::HostWithoutNetworks {
                    selector: entry.selector_key.clone(),
                    hostname: entry.host.hostname.clone(),
                });
                continue;
            }

            let identities = plan.derive(&entry.host.hostname, &networks, &location)?;
            debug!(
                "{}: {} interface(s), {} network(s)",
                location,
                identities.len(),
                networks.len()
            );
            self.emit_event(EngineEvent::HostDerived {
                selector: entry.selector_key.clone(),
                hostname: entry.host.hostname.clone(),
                interfaces: identities.len(),
                networks: networks.len(),
            });

            for identity in identities {
                emitter.push(identity, &location)?;
            }
        }

        let records = emitter.finish();
        info!(
            "Generated {} reservation(s) and {} zone record(s) from {} entr{}",
            records.reservations.len(),
            records.zone.len(),
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" }
        );
        self.emit_event(EngineEvent::Finished {
            reservations: records.reservations.len(),
            zone_records: records.zone.len(),
        });

        Ok(records)
    }

    /// Emit an engine event
    ///
    /// # Parameters
    ///
    /// - `event`: The event to emit
    fn emit_event(&self, event: EngineEvent) {
        let Some(tx) = &self.event_tx else {
            return;
        };

        match tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::TrySendError::Full(_)) => {
                warn!(
                    "Event channel full, dropping event. \
                    Consider increasing the event channel capacity."
                );
            }
            // receiver dropped; nobody is listening
            Err(mpsc::TrySendError::Disconnected(_)) => {}
        }
    }
}
