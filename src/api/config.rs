//! Agent configuration.

/// Bounds applied to `fps_min`.
const FPS_MIN_FLOOR: f64 = 0.0;
const FPS_MIN_CEILING: f64 = 60.0;

/// Configuration for the telemetry agent.
///
/// Created once at installation and read-only afterwards; every
/// subsystem sees the same sanitized value.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Event channel carrying fault reports.
    pub exception_event_name: String,

    /// Event channel carrying performance and fps reports.
    pub performance_event_name: String,

    /// Master switch; `false` disables fault, performance and fps
    /// monitoring entirely.
    pub enable_monitor: bool,

    /// Whether the frame-rate detector runs at all.
    pub fps_enable: bool,

    /// Frame rates below this count toward a stutter episode.
    /// Clamped into [0, 60] when the agent is installed.
    pub fps_min: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            exception_event_name: "异常数据".to_string(),
            performance_event_name: "性能数据".to_string(),
            enable_monitor: true,
            fps_enable: true,
            fps_min: 20.0,
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: override the fault report channel.
    pub fn with_exception_event_name(mut self, name: impl Into<String>) -> Self {
        self.exception_event_name = name.into();
        self
    }

    /// Builder pattern: override the performance report channel.
    pub fn with_performance_event_name(mut self, name: impl Into<String>) -> Self {
        self.performance_event_name = name.into();
        self
    }

    /// Builder pattern: enable or disable all monitoring.
    pub fn with_monitor_enabled(mut self, enable: bool) -> Self {
        self.enable_monitor = enable;
        self
    }

    /// Builder pattern: enable or disable frame-rate monitoring.
    pub fn with_fps_enabled(mut self, enable: bool) -> Self {
        self.fps_enable = enable;
        self
    }

    /// Builder pattern: set the stutter floor. Out-of-range values are
    /// clamped.
    pub fn with_fps_min(mut self, fps: f64) -> Self {
        self.fps_min = clamp_fps_min(fps);
        self
    }

    /// Normalize directly-assigned fields into their documented ranges.
    pub fn sanitized(mut self) -> Self {
        self.fps_min = clamp_fps_min(self.fps_min);
        self
    }
}

fn clamp_fps_min(fps: f64) -> f64 {
    if fps.is_finite() {
        fps.clamp(FPS_MIN_FLOOR, FPS_MIN_CEILING)
    } else {
        MonitorConfig::default().fps_min
    }
}
