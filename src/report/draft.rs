//! Partial reports as produced by the emitters, before normalization.

use serde_json::{Map, Value};

/// A partial fault report. Empty fields are filled by the normalizer:
/// the message gets a fixed placeholder, the location hint a static
/// positional tag, and the URL the current page address.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    /// Human-readable summary of the fault.
    pub warn_info: String,
    /// Coarse location marker, usually a line number.
    pub class_func_line: String,
    /// Raw stack text when the fault exposed one.
    pub stack: String,
    /// Variant-specific structured detail.
    pub extra: ExtraPayload,
    /// Page address; overrides the host's current URL when set.
    pub url: String,
}

/// Variant-specific detail attached to a draft. External callers may
/// hand it over as already structured data or as a serialized JSON
/// document; either way it normalizes into a map.
#[derive(Debug, Clone)]
pub enum ExtraPayload {
    Map(Map<String, Value>),
    Raw(String),
}

impl Default for ExtraPayload {
    fn default() -> Self {
        ExtraPayload::Map(Map::new())
    }
}

impl ExtraPayload {
    /// Wrap a loose value: objects stay structured, strings are treated
    /// as serialized payloads, anything else is discarded.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => ExtraPayload::Map(map),
            Value::String(raw) => ExtraPayload::Raw(raw),
            _ => ExtraPayload::default(),
        }
    }

    /// Coerce into a structured map. Malformed serialized input yields
    /// an empty map, never an error.
    pub fn into_map(self) -> Map<String, Value> {
        match self {
            ExtraPayload::Map(map) => map,
            ExtraPayload::Raw(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => Map::new(),
            },
        }
    }
}
