//! Page-load performance aggregation.
//!
//! Three independent collectors fill one snapshot: derived navigation
//! intervals, heap counters, and resource-entry summaries. The snapshot
//! is emitted as a single report a fixed settle delay after page load,
//! giving the asynchronous largest-render observer time to land its
//! timestamp. Sources the host does not expose simply leave their
//! sub-map empty.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use crate::host::{InitiatorType, NavigationTiming, PageHost, ResourceEntry};
use crate::report::reporter::Reporter;

/// Settle delay between collection and the single emission.
const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// A script/stylesheet load slower than this is flagged.
const SLOW_RESOURCE_MS: f64 = 5000.0;

/// A transfer larger than this is flagged.
const LARGE_TRANSFER_BYTES: u64 = 2_000_000;

const SLOW_RESOURCE_LABEL: &str = "资源加载时间超限duration>5000";
const LARGE_TRANSFER_LABEL: &str = "资源加载大小超限transferSize>2000000";

/// Accumulated metric snapshot. The sub-maps are populated
/// independently and whichever of them stayed empty ships empty.
#[derive(Debug, Clone, Default)]
pub struct PerformanceSnapshot {
    pub timing: Map<String, Value>,
    pub memory: Map<String, Value>,
    pub entries: Map<String, Value>,
}

pub struct PerformanceMonitor {
    host: Arc<dyn PageHost>,
    reporter: Arc<Reporter>,
    snapshot: Arc<Mutex<PerformanceSnapshot>>,
    started: AtomicBool,
}

impl PerformanceMonitor {
    pub fn new(host: Arc<dyn PageHost>, reporter: Arc<Reporter>) -> Self {
        Self {
            host,
            reporter,
            snapshot: Arc::new(Mutex::new(PerformanceSnapshot::default())),
            started: AtomicBool::new(false),
        }
    }

    /// Fire the collectors and schedule the one deferred emission.
    /// Subsequent calls are no-ops; the snapshot goes out once per page
    /// load.
    pub fn run(self: Arc<Self>) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        self.collect_timing();
        self.collect_memory();
        self.collect_entries();

        let host = Arc::clone(&self.host);
        host.set_timeout(SETTLE_DELAY, Box::new(move || self.emit()));
    }

    fn collect_timing(&self) {
        let Some(timing) = self.host.navigation_timing() else {
            log::debug!("navigation timing unavailable");
            return;
        };
        self.snapshot.lock().timing.extend(derive_intervals(&timing));

        // the largest-render timestamp arrives asynchronously, possibly
        // after this collection pass; emission waits out the settle delay
        let snapshot = Arc::clone(&self.snapshot);
        let observed = self.host.observe_largest_render(Box::new(move |entry| {
            snapshot
                .lock()
                .timing
                .insert("lcp".to_string(), json!(entry.timestamp()));
        }));
        if !observed {
            log::debug!("largest-render observer unavailable");
        }
    }

    fn collect_memory(&self) {
        let Some(memory) = self.host.memory_info() else {
            log::debug!("heap counters unavailable");
            return;
        };
        let mut snapshot = self.snapshot.lock();
        snapshot
            .memory
            .insert("jsHeapSizeLimit".to_string(), json!(memory.js_heap_size_limit));
        snapshot
            .memory
            .insert("totalJSHeapSize".to_string(), json!(memory.total_js_heap_size));
        snapshot
            .memory
            .insert("usedJSHeapSize".to_string(), json!(memory.used_js_heap_size));
    }

    fn collect_entries(&self) {
        let Some(entries) = self.host.resource_entries() else {
            log::debug!("resource entries unavailable");
            return;
        };
        self.snapshot
            .lock()
            .entries
            .extend(summarize_resources(&entries));
    }

    fn emit(&self) {
        let snapshot = self.snapshot.lock().clone();
        let mut payload = Map::new();
        payload.insert("timing".to_string(), Value::Object(snapshot.timing));
        payload.insert("memory".to_string(), Value::Object(snapshot.memory));
        payload.insert("entries".to_string(), Value::Object(snapshot.entries));
        self.reporter.report_performance(payload);
    }
}

/// Derive the named interval durations from raw navigation milestones.
pub fn derive_intervals(t: &NavigationTiming) -> Map<String, Value> {
    let diff = |end: u64, start: u64| json!(end as i64 - start as i64);
    let mut map = Map::new();
    map.insert("redirect_time".to_string(), diff(t.redirect_end, t.redirect_start));
    map.insert(
        "domain_lookup".to_string(),
        diff(t.domain_lookup_end, t.domain_lookup_start),
    );
    map.insert("tcp_connect".to_string(), diff(t.connect_end, t.connect_start));
    map.insert("assert_request".to_string(), diff(t.response_end, t.request_start));
    map.insert("dom_resolve".to_string(), diff(t.dom_interactive, t.dom_loading));
    map.insert("dom_complete".to_string(), diff(t.dom_complete, t.dom_interactive));
    map.insert("load".to_string(), diff(t.dom_complete, t.response_end));
    // full-load formula kept under its historical name
    map.insert("white".to_string(), diff(t.dom_complete, t.navigation_start));
    map
}

/// Flag over-threshold script/stylesheet loads and tally per-type
/// resource counts. The counts cover every entry, not just the
/// filtered subset.
pub fn summarize_resources(entries: &[ResourceEntry]) -> Map<String, Value> {
    let mut map = Map::new();

    let mut slow = Vec::new();
    let mut large = Vec::new();
    for entry in entries
        .iter()
        .filter(|e| matches!(e.initiator, InitiatorType::Link | InitiatorType::Script))
    {
        if entry.duration > SLOW_RESOURCE_MS {
            slow.push(format!("name: {}, duration: {}", entry.name, entry.duration));
        }
        // zero transfer_size means cache or opaque cross-origin, never large
        if entry.transfer_size > LARGE_TRANSFER_BYTES {
            large.push(format!(
                "name: {}, transferSize: {}",
                entry.name, entry.transfer_size
            ));
        }
    }
    if !slow.is_empty() {
        map.insert(SLOW_RESOURCE_LABEL.to_string(), json!(slow.join("; ")));
    }
    if !large.is_empty() {
        map.insert(LARGE_TRANSFER_LABEL.to_string(), json!(large.join("; ")));
    }

    let mut img_count = 0u64;
    let mut js_count = 0u64;
    let mut css_count = 0u64;
    for entry in entries {
        match entry.initiator {
            InitiatorType::Img => img_count += 1,
            InitiatorType::Script => js_count += 1,
            InitiatorType::Link if entry.name.ends_with(".css") => css_count += 1,
            _ => {}
        }
    }
    if img_count > 0 {
        map.insert("img_count".to_string(), json!(img_count));
    }
    if js_count > 0 {
        map.insert("js_count".to_string(), json!(js_count));
    }
    if css_count > 0 {
        map.insert("css_count".to_string(), json!(css_count));
    }
    map
}
