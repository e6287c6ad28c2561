//! Artifact export
//!
//! Cache-stamped JSON envelopes, the CSV rendering and the writer that
//! persists them.

pub mod envelope;
pub mod table;
pub mod writer;

pub use envelope::Envelope;
pub use table::{render_csv, CSV_HEADER};
pub use writer::{ExportReport, Exporter, WriteOutcome};
