//! Hook dispatcher for host-level fault and lifecycle events.
//!
//! Instead of each subsystem mutating shared host callback slots, the
//! host glue owns one [`HookDispatcher`] and forwards its global error
//! hook, rejection hook and load event into it. Interceptors run in
//! registration order, so a handler registered before the agent is
//! always invoked before the agent's own, and a failing interceptor
//! never prevents the rest of the chain from running.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::exception::shape::{FaultShape, GlobalFault};

type ErrorInterceptor = Arc<dyn Fn(&GlobalFault) + Send + Sync>;
type RejectionInterceptor = Arc<dyn Fn(&FaultShape) + Send + Sync>;
type LoadInterceptor = Arc<dyn Fn() + Send + Sync>;

/// Ordered interceptor lists for the three host hook points.
#[derive(Default)]
pub struct HookDispatcher {
    error: Mutex<Vec<ErrorInterceptor>>,
    rejection: Mutex<Vec<RejectionInterceptor>>,
    load: Mutex<Vec<LoadInterceptor>>,
}

impl HookDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interceptor for uncaught synchronous faults.
    pub fn on_error<F>(&self, interceptor: F)
    where
        F: Fn(&GlobalFault) + Send + Sync + 'static,
    {
        self.error.lock().push(Arc::new(interceptor));
    }

    /// Register an interceptor for unhandled rejection faults.
    pub fn on_rejection<F>(&self, interceptor: F)
    where
        F: Fn(&FaultShape) + Send + Sync + 'static,
    {
        self.rejection.lock().push(Arc::new(interceptor));
    }

    /// Register an interceptor for the page's load-completion event.
    pub fn on_load<F>(&self, interceptor: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.load.lock().push(Arc::new(interceptor));
    }

    /// Feed an uncaught fault through the error chain.
    pub fn dispatch_error(&self, fault: &GlobalFault) {
        let chain: Vec<ErrorInterceptor> = self.error.lock().clone();
        for interceptor in chain {
            if catch_unwind(AssertUnwindSafe(|| interceptor(fault))).is_err() {
                log::warn!("error interceptor panicked; chain continues");
            }
        }
    }

    /// Feed an unhandled rejection through the rejection chain.
    pub fn dispatch_rejection(&self, fault: &FaultShape) {
        let chain: Vec<RejectionInterceptor> = self.rejection.lock().clone();
        for interceptor in chain {
            if catch_unwind(AssertUnwindSafe(|| interceptor(fault))).is_err() {
                log::warn!("rejection interceptor panicked; chain continues");
            }
        }
    }

    /// Announce load completion to the load chain.
    pub fn dispatch_load(&self) {
        let chain: Vec<LoadInterceptor> = self.load.lock().clone();
        for interceptor in chain {
            if catch_unwind(AssertUnwindSafe(|| interceptor())).is_err() {
                log::warn!("load interceptor panicked; chain continues");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fault() -> GlobalFault {
        GlobalFault {
            message: "boom".to_string(),
            ..GlobalFault::default()
        }
    }

    #[test]
    fn test_interceptors_run_in_registration_order() {
        let dispatcher = HookDispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            dispatcher.on_error(move |_| order.lock().push(tag));
        }

        dispatcher.dispatch_error(&fault());
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_panicking_interceptor_does_not_break_the_chain() {
        let dispatcher = HookDispatcher::new();
        let reached = Arc::new(AtomicUsize::new(0));

        dispatcher.on_error(|_| panic!("host handler gone wrong"));
        let reached_clone = Arc::clone(&reached);
        dispatcher.on_error(move |_| {
            reached_clone.fetch_add(1, Ordering::Relaxed);
        });

        dispatcher.dispatch_error(&fault());
        assert_eq!(reached.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_load_chain_fires_every_interceptor() {
        let dispatcher = HookDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            dispatcher.on_load(move || {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }

        dispatcher.dispatch_load();
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }
}
