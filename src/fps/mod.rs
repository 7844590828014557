//! Frame-rate degradation detection.
//!
//! The detector rides the host's animation scheduler: every frame
//! callback advances a one-second bucket, each closed bucket pushes one
//! per-second fps sample into a three-sample window, and a window whose
//! samples all sit below the configured floor counts as a stutter
//! episode. Episodes are throttled to one report per ten minutes; the
//! window rebuilds from empty after every detection either way.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::api::config::MonitorConfig;
use crate::host::PageHost;
use crate::report::reporter::Reporter;

/// Settle delay before sampling starts, so the page's own startup
/// frames are not counted as stutter.
const LOOP_START_DELAY: Duration = Duration::from_secs(10);

/// Minimum gap between stutter reports.
const STUTTER_COOLDOWN_MS: f64 = 600_000.0;

/// Per-second samples held in the sliding window.
const WINDOW_SIZE: usize = 3;

/// Width of one sampling bucket.
const BUCKET_MS: f64 = 1000.0;

pub struct FpsMonitor {
    fps_enable: bool,
    fps_min: f64,
    host: Arc<dyn PageHost>,
    reporter: Arc<Reporter>,
    state: Mutex<LoopState>,
}

#[derive(Default)]
struct LoopState {
    running: bool,
    primed: bool,
    last_frame: f64,
    bucket_start: f64,
    frame_count: u32,
    window: VecDeque<u32>,
    last_report: Option<f64>,
}

impl FpsMonitor {
    pub fn new(host: Arc<dyn PageHost>, reporter: Arc<Reporter>, config: &MonitorConfig) -> Self {
        Self {
            fps_enable: config.fps_enable,
            fps_min: config.fps_min,
            host,
            reporter,
            state: Mutex::new(LoopState::default()),
        }
    }

    /// Arm the detector. No-op when disabled or already running; the
    /// sampling loop itself starts after the settle delay.
    pub fn start(self: Arc<Self>) {
        {
            let mut state = self.state.lock();
            if !self.fps_enable || state.running {
                return;
            }
            state.running = true;
        }
        let host = Arc::clone(&self.host);
        host.set_timeout(LOOP_START_DELAY, Box::new(move || self.begin_loop()));
    }

    fn begin_loop(self: Arc<Self>) {
        if !self.schedule() {
            log::debug!("no animation scheduler, fps monitoring skipped");
        }
    }

    fn schedule(self: Arc<Self>) -> bool {
        let host = Arc::clone(&self.host);
        host.request_frame(Box::new(move |now| {
            self.on_frame(now);
            let _ = Arc::clone(&self).schedule();
        }))
    }

    fn on_frame(&self, now: f64) {
        let mut state = self.state.lock();
        if !state.primed {
            state.primed = true;
            state.last_frame = now;
            state.bucket_start = now;
            return;
        }

        let delta = now - state.last_frame;
        state.last_frame = now;
        if delta > 0.0 {
            log::trace!("instantaneous fps {}", (BUCKET_MS / delta).round());
        }
        state.frame_count += 1;
        if now <= state.bucket_start + BUCKET_MS {
            return;
        }

        // bucket closed: one per-second sample enters the window
        let elapsed = now - state.bucket_start;
        let fps = (f64::from(state.frame_count) * BUCKET_MS / elapsed).round() as u32;
        state.frame_count = 0;
        state.bucket_start = now;
        state.window.push_back(fps);
        while state.window.len() > WINDOW_SIZE {
            state.window.pop_front();
        }

        let Some(mean) = low_run_mean(&state.window, self.fps_min, WINDOW_SIZE) else {
            return;
        };
        state.window.clear();
        let due = state
            .last_report
            .map_or(true, |at| now - at >= STUTTER_COOLDOWN_MS);
        if !due {
            // episode swallowed; the cleared window still rebuilds
            return;
        }
        state.last_report = Some(now);
        drop(state);

        let mut payload = Map::new();
        payload.insert("fps".to_string(), Value::from(mean));
        self.reporter.report_performance(payload);
    }
}

/// Scan `samples` for a run of `run` consecutive values below `floor`;
/// any value at or above the floor resets the run. Returns the rounded
/// mean of the qualifying run.
pub fn low_run_mean(samples: &VecDeque<u32>, floor: f64, run: usize) -> Option<u32> {
    if samples.len() < run {
        return None;
    }
    let mut count = 0usize;
    let mut total = 0u64;
    for &fps in samples {
        if f64::from(fps) < floor {
            total += u64::from(fps);
            count += 1;
        } else {
            total = 0;
            count = 0;
        }
        if count >= run {
            return Some((total as f64 / count as f64).round() as u32);
        }
    }
    None
}
