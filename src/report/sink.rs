//! Report delivery seam.
//!
//! A sink receives a named event channel and a flat payload; how the
//! report leaves the device is entirely the sink's concern. The crate
//! ships a stdout placeholder and an in-memory collector; production
//! hosts implement [`ReportSink`] over their upload channel.

use std::io::{self, Write};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use thiserror::Error;

/// What can go wrong while handing a report to the outside world.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// External delivery mechanism for normalized reports.
pub trait ReportSink: Send + Sync {
    fn deliver(&self, channel: &str, payload: &Map<String, Value>) -> Result<(), SinkError>;
}

/// Placeholder transport that formats each report to stdout, one key per
/// line with nested maps indented.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn deliver(&self, channel: &str, payload: &Map<String, Value>) -> Result<(), SinkError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "🚀🚀🚀 {channel}:")?;
        for (key, value) in payload {
            match value {
                Value::Object(map) => {
                    writeln!(out, "  {key}: {{")?;
                    for (name, nested) in map {
                        writeln!(out, "    {name}: {nested},")?;
                    }
                    writeln!(out, "  }},")?;
                }
                Value::Array(items) => {
                    writeln!(out, "  {key}: [")?;
                    for item in items {
                        writeln!(out, "    {item},")?;
                    }
                    writeln!(out, "  ],")?;
                }
                scalar => writeln!(out, "  {key}: {scalar},")?,
            }
        }
        writeln!(out, "🚀🚀🚀 end")?;
        Ok(())
    }
}

/// Buffers every delivered report in memory. Used by the test suites and
/// by capture-and-inspect hosts.
#[derive(Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(channel, payload)` pair delivered so far.
    pub fn reports(&self) -> Vec<(String, Map<String, Value>)> {
        self.reports.lock().clone()
    }

    /// Payloads delivered on one channel.
    pub fn on_channel(&self, channel: &str) -> Vec<Map<String, Value>> {
        self.reports
            .lock()
            .iter()
            .filter(|(name, _)| name == channel)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl ReportSink for CollectingSink {
    fn deliver(&self, channel: &str, payload: &Map<String, Value>) -> Result<(), SinkError> {
        self.reports
            .lock()
            .push((channel.to_string(), payload.clone()));
        Ok(())
    }
}
