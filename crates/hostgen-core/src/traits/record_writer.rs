// # Record Writer Trait
//
// Defines the interface for rendering generated records as text.
//
// ## Implementations
//
// - dnsmasq host lines, zone records, shell variables: `hostgen-writers` crate

use crate::records::RecordSet;
use std::io;

/// Trait for output format implementations
///
/// Writers only format. Every record they receive has already been
/// validated and derived; a writer must not drop, reorder or invent
/// records.
pub trait RecordWriter: Send + Sync {
    /// Render `records` into `out`
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) if `out` fails, or
    /// [`Error::Writer`](crate::Error::Writer) if the records cannot be
    /// expressed in this format.
    fn write(&self, records: &RecordSet, out: &mut dyn io::Write) -> Result<(), crate::Error>;

    /// Output mode name this writer is registered under
    fn writer_name(&self) -> &'static str;

    /// Render `records` into a string
    fn render(&self, records: &RecordSet) -> Result<String, crate::Error> {
        let mut buf = Vec::new();
        self.write(records, &mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            crate::Error::writer(format!("{} produced invalid UTF-8: {}", self.writer_name(), e))
        })
    }
}
