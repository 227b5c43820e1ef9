//! Shell variable assignments

use hostgen_core::{RecordSet, RecordWriter, Result};
use std::io;
use std::net::IpAddr;

/// Writes `HOSTNAME_V4=address` / `HOSTNAME_V6=address` lines
///
/// A host with several addresses of one family gets one line per address;
/// when sourced, the last one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvWriter;

impl EnvWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Variable name prefix for a hostname: upper-cased, `.` and `-` become `_`
pub fn env_var_name(hostname: &str) -> String {
    hostname.replace(['.', '-'], "_").to_uppercase()
}

impl RecordWriter for EnvWriter {
    fn write(&self, records: &RecordSet, out: &mut dyn io::Write) -> Result<()> {
        for zone in &records.zone {
            let name = env_var_name(&zone.hostname);
            for address in zone.addresses() {
                let family = match address {
                    IpAddr::V4(_) => "V4",
                    IpAddr::V6(_) => "V6",
                };
                writeln!(out, "{}_{}={}", name, family, address)?;
            }
        }
        Ok(())
    }

    fn writer_name(&self) -> &'static str {
        "env"
    }
}
