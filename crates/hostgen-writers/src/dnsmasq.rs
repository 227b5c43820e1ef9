//! dnsmasq `dhcp-host` lines

use hostgen_core::{RecordSet, RecordWriter, Result};
use std::io;
use std::net::IpAddr;

/// Writes one `dhcp-host` value per reservation
///
/// Format: `mac,ipv4,...,[ipv6],...,hostname`. Hosts whose MAC is skipped
/// have no reservation; they get a line without a MAC so dnsmasq still
/// knows their addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsmasqWriter;

impl DnsmasqWriter {
    pub fn new() -> Self {
        Self
    }
}

fn push_address(fields: &mut Vec<String>, address: IpAddr) {
    match address {
        IpAddr::V4(v4) => fields.push(v4.to_string()),
        IpAddr::V6(v6) => fields.push(format!("[{}]", v6)),
    }
}

impl RecordWriter for DnsmasqWriter {
    fn write(&self, records: &RecordSet, out: &mut dyn io::Write) -> Result<()> {
        for reservation in &records.reservations {
            let mut fields = vec![reservation.mac.to_string()];
            for address in &reservation.addresses {
                push_address(&mut fields, *address);
            }
            fields.push(reservation.hostname.clone());
            writeln!(out, "{}", fields.join(","))?;
        }

        for zone in records
            .zone
            .iter()
            .filter(|z| !z.is_empty() && !records.has_reservation(&z.hostname))
        {
            let mut fields = Vec::new();
            for address in zone.addresses() {
                push_address(&mut fields, address);
            }
            fields.push(zone.hostname.clone());
            writeln!(out, "{}", fields.join(","))?;
        }

        Ok(())
    }

    fn writer_name(&self) -> &'static str {
        "dnsmasq"
    }
}
