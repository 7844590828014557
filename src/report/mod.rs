//! Report normalization and delivery.

pub mod draft;
pub mod reporter;
pub mod sink;

pub use draft::{ExtraPayload, ReportDraft};
pub use reporter::Reporter;
pub use sink::{CollectingSink, ConsoleSink, ReportSink, SinkError};
