// # hostgen Writers
//
// This crate provides the output formats for hostgen. Each writer turns a
// [`RecordSet`](hostgen_core::RecordSet) into text and nothing more: no
// derivation, filtering or reordering happens here.
//
// ## Formats
//
// | Mode | Writer | Line |
// |---|---|---|
// | `dnsmasq` | [`DnsmasqWriter`] | `02:00:00:00:00:0a,192.168.1.10,[2001:db8::ff:fe00:a],nas` |
// | `zone` | [`ZoneWriter`] | `nas  A  192.168.1.10` (tab-aligned) |
// | `env` | [`EnvWriter`] | `NAS_V4=192.168.1.10` |
//
// ## Registration
//
// ```rust,ignore
// let mut registry = WriterRegistry::new();
// hostgen_writers::register(&mut registry);
// ```

mod dnsmasq;
mod env;
mod zone;

pub use dnsmasq::DnsmasqWriter;
pub use env::{EnvWriter, env_var_name};
pub use zone::ZoneWriter;

use hostgen_core::WriterRegistry;

/// Register all writers with a registry
pub fn register(registry: &mut WriterRegistry) {
    registry.register_writer("dnsmasq", Box::new(DnsmasqWriter::new()));
    registry.register_writer("zone", Box::new(ZoneWriter::new()));
    registry.register_writer("env", Box::new(EnvWriter::new()));
    tracing::debug!("Registered writers: dnsmasq, zone, env");
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_modes() {
        let mut registry = WriterRegistry::new();
        register(&mut registry);

        assert_eq!(registry.writer_names(), vec!["dnsmasq", "env", "zone"]);
        for name in registry.writer_names() {
            assert_eq!(registry.writer(&name).unwrap().writer_name(), name);
        }
    }

    #[test]
    fn test_every_writer_output_is_byte_identical_across_runs() {
        use hostgen_core::{
            HostConfig, HostgenEngine, InterfaceSnapshot, MacAddr, NetworkSnapshot,
            StaticNetworkSource,
        };

        let snapshot = NetworkSnapshot::new(vec![
            InterfaceSnapshot::new("eth0")
                .with_index(2)
                .with_mac(MacAddr::new(0x52, 0x54, 0, 0, 0, 2))
                .with_ipv4("192.168.1.1".parse().unwrap(), 24)
                .with_ipv6("2001:db8::1".parse().unwrap(), 64),
            InterfaceSnapshot::new("wlan0")
                .with_index(3)
                .with_ipv4("192.168.2.1".parse().unwrap(), 24),
        ]);
        let yaml = "eth0:\n  nas: [10]\n  gw: [iface]\n  \"printer.lan\": [250, {mac: ~}]\n\
                    v4:\n  media: [30, {ip6: \"::30\"}]\n";

        let run = || {
            let engine = HostgenEngine::new(Box::new(StaticNetworkSource::new(snapshot.clone())));
            engine.generate(&HostConfig::from_yaml_str(yaml).unwrap()).unwrap()
        };
        let (first, second) = (run(), run());

        let mut registry = WriterRegistry::new();
        register(&mut registry);
        for name in registry.writer_names() {
            let writer = registry.writer(&name).unwrap();
            let a = writer.render(&first).unwrap();
            let b = writer.render(&second).unwrap();
            assert!(!a.is_empty(), "{} rendered nothing", name);
            assert_eq!(a.as_bytes(), b.as_bytes(), "{} output differs between runs", name);
        }
    }
}
