//! Walkthrough: install the agent against a simulated host and print
//! every report through the console sink.
//!
//! Run with: cargo run --example console_report

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagepulse::{
    ConsoleSink, ErrorDetails, FaultShape, FrameCallback, GlobalFault, HookDispatcher,
    InitiatorType, MemoryInfo, MonitorConfig, NavigationTiming, PageHost, PageMonitor,
    ResourceEntry, TimerCallback,
};
use serde_json::json;

/// A tiny single-threaded page runtime: a clock, a timer queue and a
/// frame queue the demo pumps by hand.
#[derive(Default)]
struct SimulatedHost {
    now: Mutex<f64>,
    timers: Mutex<Vec<(f64, TimerCallback)>>,
    frames: Mutex<Vec<FrameCallback>>,
}

impl SimulatedHost {
    fn advance(&self, ms: f64) {
        let target = *self.now.lock().unwrap() + ms;
        loop {
            let next = {
                let mut timers = self.timers.lock().unwrap();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _))| *at <= target)
                    .min_by(|(_, (a, _)), (_, (b, _))| a.partial_cmp(b).unwrap())
                    .map(|(index, _)| index);
                due.map(|index| timers.remove(index))
            };
            match next {
                Some((at, callback)) => {
                    *self.now.lock().unwrap() = at;
                    callback();
                }
                None => break,
            }
        }
        *self.now.lock().unwrap() = target;
    }

    fn run_frames(&self, count: usize, delta: f64) {
        for _ in 0..count {
            let now = {
                let mut clock = self.now.lock().unwrap();
                *clock += delta;
                *clock
            };
            let pending: Vec<FrameCallback> = self.frames.lock().unwrap().drain(..).collect();
            for callback in pending {
                callback(now);
            }
        }
    }
}

impl PageHost for SimulatedHost {
    fn page_url(&self) -> String {
        "https://example.com/checkout".to_string()
    }

    fn set_timeout(&self, delay: Duration, callback: TimerCallback) {
        let at = *self.now.lock().unwrap() + delay.as_millis() as f64;
        self.timers.lock().unwrap().push((at, callback));
    }

    fn request_frame(&self, callback: FrameCallback) -> bool {
        self.frames.lock().unwrap().push(callback);
        true
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        Some(NavigationTiming {
            navigation_start: 0,
            redirect_start: 0,
            redirect_end: 0,
            domain_lookup_start: 10,
            domain_lookup_end: 45,
            connect_start: 45,
            connect_end: 130,
            request_start: 130,
            response_end: 690,
            dom_loading: 700,
            dom_interactive: 1_450,
            dom_complete: 2_300,
        })
    }

    fn memory_info(&self) -> Option<MemoryInfo> {
        Some(MemoryInfo {
            js_heap_size_limit: 4_294_705_152,
            total_js_heap_size: 38_200_000,
            used_js_heap_size: 21_700_000,
        })
    }

    fn resource_entries(&self) -> Option<Vec<ResourceEntry>> {
        Some(vec![
            ResourceEntry {
                name: "https://example.com/static/vendor.js".to_string(),
                initiator: InitiatorType::Script,
                duration: 5_600.0,
                transfer_size: 2_400_000,
            },
            ResourceEntry {
                name: "https://example.com/static/site.css".to_string(),
                initiator: InitiatorType::Link,
                duration: 120.0,
                transfer_size: 14_000,
            },
            ResourceEntry {
                name: "https://example.com/static/hero.png".to_string(),
                initiator: InitiatorType::Img,
                duration: 300.0,
                transfer_size: 180_000,
            },
        ])
    }
}

fn main() {
    let host = Arc::new(SimulatedHost::default());
    let dispatcher = HookDispatcher::new();
    let monitor = PageMonitor::install(
        Arc::clone(&host) as Arc<dyn PageHost>,
        Arc::new(ConsoleSink),
        &dispatcher,
        MonitorConfig::default(),
    );

    // an early uncaught fault, before the page even finished loading
    dispatcher.dispatch_error(&GlobalFault {
        message: "cart is undefined".to_string(),
        source: "https://example.com/static/app.js".to_string(),
        line: Some(88),
        column: Some(13),
        error: Some(ErrorDetails {
            name: "ReferenceError".to_string(),
            message: "cart is undefined".to_string(),
            stack: "ReferenceError: cart is undefined\n    at app.js:88:13".to_string(),
            line: Some(88),
            column: Some(13),
            filename: "https://example.com/static/app.js".to_string(),
        }),
    });

    // a rejected promise nobody handled
    dispatcher.dispatch_rejection(&FaultShape::PromiseRejection {
        reason: json!({"status": 502, "endpoint": "/api/cart"}),
    });

    // an error surfaced by the UI framework's component boundary
    monitor.component_error_handler(Some(&ErrorDetails {
        name: "Error".to_string(),
        message: "render failed: missing prop `items`".to_string(),
        stack: String::new(),
        line: None,
        column: None,
        filename: String::new(),
    }));

    // page load: the performance snapshot emits one second later
    dispatcher.dispatch_load();
    host.advance(1_000.0);

    // frame loop starts after the settle delay, then stutters
    host.advance(9_000.0);
    host.run_frames(1, 0.0);
    host.run_frames(50, 100.0);
}
