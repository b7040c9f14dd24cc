//! Process-wide progress reporting.
//!
//! Runners racing in separate threads report through a single shared
//! [`Reporter`], which serialises output and maps thread identities to
//! short labels (`#0`, `#1`, ...). Reporting is off unless enabled with
//! [`Reporter::set_report`] or the `FPSEMI_VERBOSE` environment variable.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread::ThreadId;

pub struct Reporter {
    enabled: AtomicBool,
    labels: Mutex<HashMap<ThreadId, usize>>,
}

impl Reporter {
    fn new() -> Self {
        let from_env = std::env::var("FPSEMI_VERBOSE")
            .map(|v| v != "0" && !v.is_empty())
            .unwrap_or(false);
        Self {
            enabled: AtomicBool::new(from_env),
            labels: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_report(&self, on: bool) {
        self.enabled.store(on, Ordering::Release);
    }

    pub fn report(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Short label for the calling thread, assigned on first use.
    pub fn thread_label(&self) -> usize {
        let mut labels = self.labels.lock();
        let next = labels.len();
        *labels.entry(std::thread::current().id()).or_insert(next)
    }

    /// Emit one progress line on behalf of `who`. The label table lock
    /// doubles as the serialisation point for output.
    pub fn emit(&self, who: &str, msg: &str) {
        if !self.report() {
            return;
        }
        let label = self.thread_label();
        eprintln!("#{} ({}): {}", label, who, msg);
    }
}

/// The process-wide reporter.
pub fn reporter() -> &'static Reporter {
    static REPORTER: OnceLock<Reporter> = OnceLock::new();
    REPORTER.get_or_init(Reporter::new)
}
