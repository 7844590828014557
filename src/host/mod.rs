//! Host platform abstraction.
//!
//! The agent never touches platform globals directly; everything it needs
//! from the surrounding page runtime — the current URL, timers, the
//! animation scheduler, and the raw metric sources — comes through the
//! [`PageHost`] trait injected at installation. Metric sources are
//! optional: a host that lacks one returns `None` and the matching
//! collector is skipped, never an error.

pub mod hooks;

use std::time::Duration;

/// One-shot timer callback.
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Animation-frame callback; receives the host's monotonic timestamp in
/// milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64) + Send>;

/// One-shot largest-render observer callback.
pub type LargestRenderCallback = Box<dyn FnOnce(LargestRender) + Send>;

/// The platform surface the agent runs against.
pub trait PageHost: Send + Sync {
    /// Current page address, stamped onto every report that does not
    /// carry its own.
    fn page_url(&self) -> String;

    /// Schedule `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: TimerCallback);

    /// Schedule `callback` for the next animation frame. Returns `false`
    /// when the host has no frame scheduler, in which case the caller
    /// must not expect the callback to ever run.
    fn request_frame(&self, callback: FrameCallback) -> bool;

    /// Raw navigation timing, if the platform records it.
    fn navigation_timing(&self) -> Option<NavigationTiming> {
        None
    }

    /// Heap memory counters, if the platform exposes them.
    fn memory_info(&self) -> Option<MemoryInfo> {
        None
    }

    /// All recorded resource timing entries, if the platform records them.
    fn resource_entries(&self) -> Option<Vec<ResourceEntry>> {
        None
    }

    /// Register a one-shot observer for the largest rendered content
    /// entry. Returns `false` when the capability is absent; the callback
    /// may fire well after registration.
    fn observe_largest_render(&self, callback: LargestRenderCallback) -> bool {
        let _ = callback;
        false
    }
}

/// Raw page-load milestones, all in milliseconds on the host's wall
/// clock. Interval durations are derived from these, not reported raw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationTiming {
    pub navigation_start: u64,
    pub redirect_start: u64,
    pub redirect_end: u64,
    pub domain_lookup_start: u64,
    pub domain_lookup_end: u64,
    pub connect_start: u64,
    pub connect_end: u64,
    pub request_start: u64,
    pub response_end: u64,
    pub dom_loading: u64,
    pub dom_interactive: u64,
    pub dom_complete: u64,
}

/// Heap counters, all in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Maximum heap size available to the context.
    pub js_heap_size_limit: u64,
    /// Heap currently reserved from the system.
    pub total_js_heap_size: u64,
    /// Live heap. Exceeding the reserved total suggests a leak.
    pub used_js_heap_size: u64,
}

/// What kind of element initiated a resource load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiatorType {
    /// Stylesheet or other `<link>`-initiated fetch.
    Link,
    /// Script fetch.
    Script,
    /// Image fetch.
    Img,
    /// Anything else the platform records.
    Other,
}

/// One recorded resource load.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    /// Resource URL.
    pub name: String,
    pub initiator: InitiatorType,
    /// Load duration in milliseconds.
    pub duration: f64,
    /// Transferred bytes. Zero means served from cache or an opaque
    /// cross-origin response.
    pub transfer_size: u64,
}

/// The largest-contentful-render observation, used as a proxy for when
/// the page's main content became visible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LargestRender {
    /// Render completion time in milliseconds; zero when unavailable.
    pub render_time: f64,
    /// Load completion time in milliseconds, the fallback.
    pub load_time: f64,
}

impl LargestRender {
    /// The reported timestamp: render time when present, load time
    /// otherwise.
    pub fn timestamp(&self) -> f64 {
        if self.render_time > 0.0 {
            self.render_time
        } else {
            self.load_time
        }
    }
}
