//! Minimal embedding example for hostgen-core
//!
//! This example demonstrates using hostgen-core as a library in a custom
//! application: a hand-built network source, a custom writer registered
//! next to the stock ones, and engine events for progress reporting.

use hostgen_core::{
    EngineEvent, HostConfig, HostgenEngine, InterfaceSnapshot, NetworkSnapshot, NetworkSource,
    RecordSet, RecordWriter, Result, WriterRegistry,
};
use std::io;
use std::net::Ipv6Addr;

/// Network source for a router whose interfaces are known up front
struct RouterNetworkSource;

impl NetworkSource for RouterNetworkSource {
    fn snapshot(&self) -> Result<NetworkSnapshot> {
        Ok(NetworkSnapshot::new(vec![
            InterfaceSnapshot::new("lan0")
                .with_ipv4([192, 168, 10, 1].into(), 24)
                .with_ipv6(Ipv6Addr::new(0xfd10, 0, 0, 0, 0, 0, 0, 1), 64),
            InterfaceSnapshot::new("iot0").with_ipv4([10, 77, 0, 1].into(), 16),
        ]))
    }

    fn source_name(&self) -> &'static str {
        "router"
    }
}

/// Writes records as JSON
struct JsonWriter;

impl RecordWriter for JsonWriter {
    fn write(&self, records: &RecordSet, out: &mut dyn io::Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
        Ok(())
    }

    fn writer_name(&self) -> &'static str {
        "json"
    }
}

const HOSTS: &str = r#"
lan0:
  gateway: [1]
  nas: [10, {ip6: 16}]
iot0:
  thermostat: [200, {ip6: ~}]
? [lan0, iot0]
:
  laptop: ["aa:bb:cc:00:11:22", {ip4: 50}, {ip6: 50}]
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    println!("=== Embedded hostgen-core Example ===\n");

    let mut registry = WriterRegistry::new();
    hostgen_writers::register(&mut registry);
    registry.register_writer("json", Box::new(JsonWriter));
    println!("Output modes: {}\n", registry.writer_names().join(", "));

    let config = HostConfig::from_yaml_str(HOSTS)?;
    let (engine, events) = HostgenEngine::new(Box::new(RouterNetworkSource)).with_events(64);

    let records = engine.generate(&config)?;

    for event in events.try_iter() {
        if let EngineEvent::HostDerived { hostname, interfaces, networks, .. } = event {
            println!(
                "[Embedded] {}: {} interface(s), {} network(s)",
                hostname, interfaces, networks
            );
        }
    }

    for mode in ["dnsmasq", "zone", "json"] {
        println!("\n--- {} ---", mode);
        registry.writer(mode)?.write(&records, &mut io::stdout().lock())?;
    }

    Ok(())
}
