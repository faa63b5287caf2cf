use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tracing::{debug, info};

/// Receives progress information from long-running work.
///
/// All methods take `&self` so one handler can be shared by the threads of a
/// host; implementations use interior mutability.
pub trait StatusHandler {
    /// Enters a new phase described by `status`.
    fn push_status(&self, status: &str);

    /// Leaves the current phase and returns to the enclosing one.
    fn pop_status(&self);

    /// Reports the progress of the current phase, from `0` to `100`.
    fn set_percentage(&self, percent: f64);

    /// The current phase and its progress. The phase is empty when none was
    /// pushed.
    fn status(&self) -> (String, f64);

    /// Asks the worker to stop.
    fn set_terminate(&self);

    /// Withdraws a stop request.
    fn unset_terminate(&self);

    /// Returns `true` if the worker should stop at the next opportunity.
    fn should_terminate(&self) -> bool;
}

/// A [`StatusHandler`] that keeps its state in memory and logs every change
/// through `tracing`.
///
/// # Example
/// ```
/// use evalfunc::status::{StatusHandler, TracingStatusHandler};
///
/// let status = TracingStatusHandler::default();
/// status.push_status("sampling");
/// status.set_percentage(50.0);
/// assert_eq!(status.status(), ("sampling".to_string(), 50.0));
///
/// status.pop_status();
/// assert_eq!(status.status().0, "");
///
/// status.set_terminate();
/// assert!(status.should_terminate());
/// ```
#[derive(Debug, Default)]
pub struct TracingStatusHandler {
    phases:    Mutex<Vec<String>>,
    percent:   AtomicU64,
    terminate: AtomicBool,
}

impl TracingStatusHandler {
    fn phases(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.phases.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusHandler for TracingStatusHandler {
    fn push_status(&self, status: &str) {
        info!(status, "phase started");
        self.phases().push(status.to_string());
        self.percent.store(0f64.to_bits(), Ordering::Relaxed);
    }

    fn pop_status(&self) {
        if let Some(status) = self.phases().pop() {
            info!(status, "phase finished");
        }
    }

    fn set_percentage(&self, percent: f64) {
        debug!(percent, "progress");
        self.percent.store(percent.to_bits(), Ordering::Relaxed);
    }

    fn status(&self) -> (String, f64) {
        let phase = self.phases().last().cloned().unwrap_or_default();
        (phase, f64::from_bits(self.percent.load(Ordering::Relaxed)))
    }

    fn set_terminate(&self) {
        info!("termination requested");
        self.terminate.store(true, Ordering::Relaxed);
    }

    fn unset_terminate(&self) {
        self.terminate.store(false, Ordering::Relaxed);
    }

    fn should_terminate(&self) -> bool {
        self.terminate.load(Ordering::Relaxed)
    }
}
