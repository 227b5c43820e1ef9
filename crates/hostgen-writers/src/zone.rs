//! DNS zone records

use hostgen_core::{RecordSet, RecordWriter, Result};
use std::io::{self, Write};
use std::net::IpAddr;
use tabwriter::TabWriter;

/// Writes `hostname A|AAAA address` records, column aligned
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneWriter;

impl ZoneWriter {
    pub fn new() -> Self {
        Self
    }
}

impl RecordWriter for ZoneWriter {
    fn write(&self, records: &RecordSet, out: &mut dyn io::Write) -> Result<()> {
        let mut tw = TabWriter::new(out);

        for zone in &records.zone {
            for address in zone.addresses() {
                let kind = match address {
                    IpAddr::V4(_) => "A",
                    IpAddr::V6(_) => "AAAA",
                };
                writeln!(tw, "{}\t{}\t{}", zone.hostname, kind, address)?;
            }
        }

        tw.flush()?;
        Ok(())
    }

    fn writer_name(&self) -> &'static str {
        "zone"
    }
}
