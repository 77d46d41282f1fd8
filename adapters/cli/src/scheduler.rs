//! Cancellable fixed-period ticker driving the headless session loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Background ticker emitting fixed-period deltas over a channel.
///
/// The handle owns the worker thread: [`Ticker::cancel`] stops it and joins
/// exactly once, cancelling twice or cancelling a finished ticker is a no-op,
/// and dropping the handle cancels implicitly.
#[derive(Debug)]
pub(crate) struct Ticker {
    cancelled: Arc<AtomicBool>,
    ticks: Receiver<Duration>,
    worker: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns a worker that emits one tick per period until cancelled.
    pub(crate) fn start(period: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (sender, ticks) = mpsc::channel();
        let flag = Arc::clone(&cancelled);

        let worker = thread::spawn(move || loop {
            if flag.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep(period);
            if flag.load(Ordering::Relaxed) || sender.send(period).is_err() {
                break;
            }
        });

        Self {
            cancelled,
            ticks,
            worker: Some(worker),
        }
    }

    /// Blocks until the next tick, or `None` once the ticker is cancelled.
    pub(crate) fn wait(&self) -> Option<Duration> {
        self.ticks.recv().ok()
    }

    /// Stops the worker; repeated cancellation is a no-op.
    pub(crate) fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
