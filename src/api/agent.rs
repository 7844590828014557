//! Installation entry point wiring the subsystems together.

use std::sync::Arc;

use crate::api::config::MonitorConfig;
use crate::exception::monitor::ExceptionMonitor;
use crate::exception::shape::ErrorDetails;
use crate::fps::FpsMonitor;
use crate::host::hooks::HookDispatcher;
use crate::host::PageHost;
use crate::perf::PerformanceMonitor;
use crate::report::reporter::Reporter;
use crate::report::sink::ReportSink;

/// The installed telemetry agent.
///
/// Install as early in the page's life as possible so the fault hooks
/// observe the earliest errors; the frame-rate and performance monitors
/// only start once the dispatcher's load chain fires, after whatever
/// load handlers the host registered first.
pub struct PageMonitor {
    config: MonitorConfig,
    exceptions: Arc<ExceptionMonitor>,
    fps: Arc<FpsMonitor>,
    perf: Arc<PerformanceMonitor>,
}

impl PageMonitor {
    /// Wire the agent into `dispatcher` and return the installed handle.
    ///
    /// With `enable_monitor` off nothing is registered at all; the
    /// returned handle is inert.
    pub fn install(
        host: Arc<dyn PageHost>,
        sink: Arc<dyn ReportSink>,
        dispatcher: &HookDispatcher,
        config: MonitorConfig,
    ) -> Arc<Self> {
        let config = config.sanitized();
        let reporter = Arc::new(Reporter::new(Arc::clone(&host), sink, &config));
        let exceptions = Arc::new(ExceptionMonitor::new(Arc::clone(&reporter)));
        let fps = Arc::new(FpsMonitor::new(
            Arc::clone(&host),
            Arc::clone(&reporter),
            &config,
        ));
        let perf = Arc::new(PerformanceMonitor::new(host, reporter));

        let monitor = Arc::new(Self {
            config,
            exceptions,
            fps,
            perf,
        });
        if monitor.config.enable_monitor {
            Arc::clone(&monitor.exceptions).install(dispatcher);
            let fps = Arc::clone(&monitor.fps);
            let perf = Arc::clone(&monitor.perf);
            dispatcher.on_load(move || {
                Arc::clone(&perf).run();
                Arc::clone(&fps).start();
            });
            log::debug!("page monitor installed");
        } else {
            log::debug!("monitoring disabled by config");
        }
        monitor
    }

    /// Component-level error callback for UI framework integration;
    /// hand the framework's captured error straight through.
    pub fn component_error_handler(&self, error: Option<&ErrorDetails>) {
        self.exceptions.component_error_handler(error);
    }

    /// Direct access to the capture engine, e.g. to classify an
    /// exception application code caught itself.
    pub fn exceptions(&self) -> &Arc<ExceptionMonitor> {
        &self.exceptions
    }

    /// The effective (sanitized) configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}
