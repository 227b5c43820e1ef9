//! Core traits for hostgen
//!
//! The two seams between the core and the outside world:
//!
//! - [`NetworkSource`]: where the run's network snapshot comes from
//! - [`RecordWriter`]: how a [`RecordSet`](crate::RecordSet) becomes text

pub mod network_source;
pub mod record_writer;

pub use network_source::NetworkSource;
pub use record_writer::RecordWriter;
