//! Fault shape vocabulary.
//!
//! Incoming faults are classified into a closed set of variants before
//! any report is built; the capture engine then branches on the tag.
//! Host glue constructs the variant that matches what its runtime
//! delivered, or uses [`FaultShape::from_value`] for untyped payloads.

use serde::Serialize;
use serde_json::{Map, Value};

/// Detail carried by a language-level error object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorDetails {
    /// Symbolic error name, e.g. `TypeError`. Empty means unnamed.
    pub name: String,
    pub message: String,
    /// Raw stack text, empty when the fault exposed none.
    pub stack: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Script the fault originated from, empty when unknown.
    pub filename: String,
}

/// An uncaught fault as delivered by the host's global error hook.
#[derive(Debug, Clone, Default)]
pub struct GlobalFault {
    pub message: String,
    /// URL of the script the fault came from.
    pub source: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    /// The underlying error object, when the host had one.
    pub error: Option<ErrorDetails>,
}

/// The closed set of fault shapes the capture engine recognizes.
///
/// Anything that does not fit one of these variants is not reportable
/// and must be dropped by the caller, mirroring the engine's own no-op
/// behavior for an [`ErrorEvent`](FaultShape::ErrorEvent) without a
/// nested error.
#[derive(Debug, Clone)]
pub enum FaultShape {
    /// A browser-level fault event, possibly carrying the underlying
    /// error object.
    ErrorEvent {
        message: String,
        line: Option<u32>,
        column: Option<u32>,
        filename: String,
        error: Option<ErrorDetails>,
    },
    /// A platform/DOM-originated exception with a symbolic name.
    DomException { name: String, message: String },
    /// A generic language-level error.
    Error(ErrorDetails),
    /// An unhandled-rejection wrapper with the rejection reason attached.
    PromiseRejection { reason: Value },
    /// A plain key/value payload with no specialized shape.
    Plain(Map<String, Value>),
}

impl FaultShape {
    /// Structural classification for untyped payloads: only a generic
    /// key/value container qualifies. Scalars, arrays and null have no
    /// recognizable fault shape and yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(FaultShape::Plain(map)),
            _ => None,
        }
    }
}
