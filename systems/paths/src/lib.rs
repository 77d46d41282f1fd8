#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic scheduler for deferred path recomputation.

use nqueens_core::{Command, Event, PathReport};

/// Pure system that defers path recomputation off the interaction path.
///
/// Board mutations raise `Event::BoardChanged`; the scheduler coalesces those
/// requests and executes at most one recomputation per observed tick, so a
/// burst of drag updates costs a single engine run. The resulting report is
/// published back as a command and the world decides whether it is stale.
#[derive(Debug, Default)]
pub struct PathScheduler {
    last_report: Option<PathReport>,
    pending: Option<u64>,
}

impl PathScheduler {
    /// Creates a scheduler with no pending requests and an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last report produced by the scheduler, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&PathReport> {
        self.last_report.as_ref()
    }

    /// Board revision of the pending recompute request, if one is queued.
    #[must_use]
    pub fn pending_revision(&self) -> Option<u64> {
        self.pending
    }

    /// Consumes world events to schedule and publish recomputation.
    ///
    /// The provided `recompute` closure runs the path engine over the current
    /// snapshot. It is invoked at most once per call and only when a request
    /// is pending *and* a tick (`Event::TimeAdvanced`) has been observed.
    pub fn handle<F>(&mut self, events: &[Event], mut recompute: F, out: &mut Vec<Command>)
    where
        F: FnMut() -> PathReport,
    {
        let mut tick_observed = false;

        for event in events {
            match event {
                Event::BoardChanged { revision } => {
                    // The newest request supersedes anything queued earlier.
                    self.pending = Some(*revision);
                }
                Event::TimeAdvanced { .. } => {
                    tick_observed = true;
                }
                _ => {}
            }
        }

        if !tick_observed || self.pending.take().is_none() {
            return;
        }

        let report = recompute();
        self.last_report = Some(report.clone());
        out.push(Command::PublishPathReport { report });
    }
}
