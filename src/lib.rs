//! # pagepulse
//!
//! Embeddable telemetry for page-rendering hosts.
//!
//! ## Features
//!
//! - Fault capture: global error/rejection interception with shape-tagged
//!   classification and a framework component-error hook
//! - Frame-rate degradation detection over a sliding per-second window,
//!   throttled to one stutter report per ten minutes
//! - Page-load performance aggregation (navigation timing, heap
//!   counters, resource entries) emitted once after load
//! - Pluggable delivery through a narrow [`ReportSink`] trait
//! - Fail-silent by design: the agent never becomes a fault source of
//!   the page it observes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pagepulse::{
//!     ConsoleSink, HookDispatcher, MonitorConfig, PageHost, PageMonitor,
//! };
//!
//! // Host glue: forward the platform's url/timers/frames.
//! struct Browser;
//!
//! impl PageHost for Browser {
//!     fn page_url(&self) -> String {
//!         "https://example.com/app".to_string()
//!     }
//!     fn set_timeout(&self, _delay: Duration, _callback: Box<dyn FnOnce() + Send>) {}
//!     fn request_frame(&self, _callback: Box<dyn FnOnce(f64) + Send>) -> bool {
//!         false
//!     }
//! }
//!
//! let dispatcher = HookDispatcher::new();
//! let _monitor = PageMonitor::install(
//!     Arc::new(Browser),
//!     Arc::new(ConsoleSink),
//!     &dispatcher,
//!     MonitorConfig::default().with_fps_min(25.0),
//! );
//!
//! // The host fires this when the page finishes loading.
//! dispatcher.dispatch_load();
//! ```

pub mod api;
pub mod exception;
pub mod fps;
pub mod host;
pub mod perf;
pub mod report;

mod util;

// Re-export the public surface at the crate root for convenience
pub use api::agent::PageMonitor;
pub use api::config::MonitorConfig;

pub use exception::monitor::ExceptionMonitor;
pub use exception::shape::{ErrorDetails, FaultShape, GlobalFault};

pub use fps::FpsMonitor;
pub use perf::{PerformanceMonitor, PerformanceSnapshot};

pub use host::hooks::HookDispatcher;
pub use host::{
    FrameCallback, InitiatorType, LargestRender, LargestRenderCallback, MemoryInfo,
    NavigationTiming, PageHost, ResourceEntry, TimerCallback,
};

pub use report::draft::{ExtraPayload, ReportDraft};
pub use report::reporter::Reporter;
pub use report::sink::{CollectingSink, ConsoleSink, ReportSink, SinkError};
