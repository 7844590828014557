//! Fault capture engine.
//!
//! Installs interceptors for the host's global error and rejection
//! hooks, classifies each fault by its shape tag, and forwards a
//! normalized draft to the reporter. Unrecognized shapes are dropped
//! silently; a fault inside the engine itself is contained by the
//! dispatcher and never reaches the page.

use std::sync::Arc;

use serde_json::{json, Map};

use crate::exception::shape::{ErrorDetails, FaultShape, GlobalFault};
use crate::host::hooks::HookDispatcher;
use crate::report::draft::{ExtraPayload, ReportDraft};
use crate::report::reporter::Reporter;

/// Shape tag recorded when the classified variant set none.
const DEFAULT_FAULT_TYPE: &str = "Unknow";

/// Capture origin recorded when the emitting path set none.
const DEFAULT_TRIGGER: &str = "onunhandledrejection";

/// Substring the host substitutes for faults from a foreign origin
/// without CORS metadata; such faults carry no usable position.
const CROSS_ORIGIN_MARKER: &str = "script error";
const CROSS_ORIGIN_MESSAGE: &str = "crossorigin: Script Error";

pub struct ExceptionMonitor {
    reporter: Arc<Reporter>,
}

impl ExceptionMonitor {
    pub fn new(reporter: Arc<Reporter>) -> Self {
        Self { reporter }
    }

    /// Register this engine on the dispatcher's error and rejection
    /// chains. Interceptors registered by the host beforehand keep
    /// running first.
    pub fn install(self: Arc<Self>, dispatcher: &HookDispatcher) {
        let engine = Arc::clone(&self);
        dispatcher.on_error(move |fault| engine.handle_global_fault(fault));
        dispatcher.on_rejection(move |fault| self.capture_exception(fault));
        log::debug!("fault hooks installed");
    }

    /// Entry point for the host's global error hook.
    pub fn handle_global_fault(&self, fault: &GlobalFault) {
        self.send(global_fault_draft(fault));
    }

    /// Classify a captured exception and report it. Unrecognized shapes
    /// (including an error event without a nested error) emit nothing.
    pub fn capture_exception(&self, fault: &FaultShape) {
        if let Some(draft) = classify(fault) {
            self.send(draft);
        }
    }

    /// Component-level error callback for UI framework integration.
    /// A `None` error is a no-op.
    pub fn component_error_handler(&self, error: Option<&ErrorDetails>) {
        let Some(err) = error else { return };
        let mut extra = Map::new();
        extra.insert("type".to_string(), json!("Error"));
        extra.insert("triggerType".to_string(), json!("FrameworkErrorHandler"));
        extra.insert("errObj".to_string(), json!(error_json(err)));
        self.send(ReportDraft {
            warn_info: err.message.clone(),
            stack: err.stack.clone(),
            extra: ExtraPayload::Map(extra),
            ..ReportDraft::default()
        });
    }

    fn send(&self, draft: ReportDraft) {
        let ReportDraft {
            warn_info,
            class_func_line,
            stack,
            extra,
            url,
        } = draft;
        let mut extra = extra.into_map();
        extra
            .entry("type")
            .or_insert_with(|| json!(DEFAULT_FAULT_TYPE));
        extra
            .entry("triggerType")
            .or_insert_with(|| json!(DEFAULT_TRIGGER));
        self.reporter.report_exception(ReportDraft {
            warn_info,
            class_func_line,
            stack,
            extra: ExtraPayload::Map(extra),
            url,
        });
    }
}

/// Build the draft for an uncaught global fault, special-casing the
/// cross-origin placeholder message, which carries no trustworthy
/// position data.
pub fn global_fault_draft(fault: &GlobalFault) -> ReportDraft {
    if fault.message.to_lowercase().contains(CROSS_ORIGIN_MARKER) {
        let mut extra = Map::new();
        extra.insert("type".to_string(), json!("Error"));
        extra.insert("triggerType".to_string(), json!("onerror"));
        extra.insert("message".to_string(), json!(fault.message));
        extra.insert(
            "errObj".to_string(),
            json!(fault.error.as_ref().map(error_json).unwrap_or_default()),
        );
        return ReportDraft {
            warn_info: CROSS_ORIGIN_MESSAGE.to_string(),
            extra: ExtraPayload::Map(extra),
            ..ReportDraft::default()
        };
    }

    let mut extra = Map::new();
    extra.insert("type".to_string(), json!("Error"));
    if !fault.source.is_empty() {
        extra.insert("url".to_string(), json!(fault.source));
    }
    if let Some(column) = fault.column {
        extra.insert("colNo".to_string(), json!(column));
    }
    extra.insert("triggerType".to_string(), json!("onerror"));
    extra.insert(
        "errObj".to_string(),
        json!(fault.error.as_ref().map(error_json).unwrap_or_default()),
    );
    ReportDraft {
        warn_info: fault.message.clone(),
        class_func_line: fault.line.map(|l| l.to_string()).unwrap_or_default(),
        stack: fault
            .error
            .as_ref()
            .map(|err| err.stack.clone())
            .unwrap_or_default(),
        extra: ExtraPayload::Map(extra),
        ..ReportDraft::default()
    }
}

/// Classification dispatch over the closed fault-shape set. Returns
/// `None` for shapes that produce no report.
pub fn classify(fault: &FaultShape) -> Option<ReportDraft> {
    match fault {
        FaultShape::ErrorEvent { error: None, .. } => None,
        FaultShape::ErrorEvent {
            message,
            line,
            column,
            filename,
            error: Some(err),
        } => {
            let mut extra = Map::new();
            extra.insert("type".to_string(), json!("ErrorEvent"));
            if let Some(column) = column {
                extra.insert("colNo".to_string(), json!(column));
            }
            if !filename.is_empty() {
                extra.insert("fileName".to_string(), json!(filename));
            }
            extra.insert("errObj".to_string(), json!(error_json(err)));
            Some(ReportDraft {
                warn_info: if message.is_empty() {
                    "ErrorEvent".to_string()
                } else {
                    message.clone()
                },
                class_func_line: line.map(|l| l.to_string()).unwrap_or_default(),
                stack: err.stack.clone(),
                extra: ExtraPayload::Map(extra),
                ..ReportDraft::default()
            })
        }
        FaultShape::DomException { name, message } => {
            let name = if name.is_empty() {
                "DOMException"
            } else {
                name.as_str()
            };
            let mut extra = Map::new();
            extra.insert("type".to_string(), json!(name));
            Some(ReportDraft {
                warn_info: named_message(name, message),
                extra: ExtraPayload::Map(extra),
                ..ReportDraft::default()
            })
        }
        FaultShape::Error(err) => {
            let name = if err.name.is_empty() {
                "Error"
            } else {
                err.name.as_str()
            };
            let mut extra = Map::new();
            extra.insert("type".to_string(), json!(name));
            if let Some(column) = err.column {
                extra.insert("colNo".to_string(), json!(column));
            }
            if !err.filename.is_empty() {
                extra.insert("fileName".to_string(), json!(err.filename));
            }
            Some(ReportDraft {
                warn_info: named_message(name, &err.message),
                class_func_line: err.line.map(|l| l.to_string()).unwrap_or_default(),
                stack: err.stack.clone(),
                extra: ExtraPayload::Map(extra),
                ..ReportDraft::default()
            })
        }
        FaultShape::PromiseRejection { reason } => {
            let mut extra = Map::new();
            extra.insert("type".to_string(), json!("PromiseRejection"));
            Some(ReportDraft {
                warn_info: format!(
                    "PromiseRejection: {}",
                    serde_json::to_string(reason).unwrap_or_default()
                ),
                extra: ExtraPayload::Map(extra),
                ..ReportDraft::default()
            })
        }
        FaultShape::Plain(payload) => {
            let mut keys: Vec<&String> = payload.keys().collect();
            keys.sort();
            let mut extra = Map::new();
            extra.insert("type".to_string(), json!("ErrorEvent"));
            extra.insert(
                "errObj".to_string(),
                json!(serde_json::to_string(payload).unwrap_or_default()),
            );
            Some(ReportDraft {
                warn_info: format!(
                    "Non-Error exception captured with keys:{}",
                    serde_json::to_string(&keys).unwrap_or_default()
                ),
                extra: ExtraPayload::Map(extra),
                ..ReportDraft::default()
            })
        }
    }
}

fn named_message(name: &str, message: &str) -> String {
    if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}:{message}")
    }
}

fn error_json(err: &ErrorDetails) -> String {
    serde_json::to_string(err).unwrap_or_default()
}
