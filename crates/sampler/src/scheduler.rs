//! Periodic task runner.
//!
//! A registered callback runs to completion before its next run may start:
//! every task is one tokio task that calls the callback inline between
//! `interval.tick()` awaits. A run that overshoots the period delays the
//! following run rather than triggering a catch-up burst.

use dash_core::{DashError, Result};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Handle to one registered periodic task.
#[derive(Debug)]
pub struct TaskHandle {
    name:   String,
    runs:   Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Completed runs so far.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Acquire)
    }

    /// Stop the task. A run in progress finishes; no further run starts.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// `true` once the task was cancelled or its callback asked to stop.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Owns every periodic task it registered and stops them all on drop.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<TaskHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` now and then every `interval` until it returns
    /// [`ControlFlow::Break`] or the task is cancelled.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn register_periodic_task<F>(
        &mut self,
        name: impl Into<String>,
        interval: Duration,
        mut callback: F,
    ) -> Result<&TaskHandle>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(DashError::Scheduler("interval must be greater than zero".into()));
        }

        let name = name.into();
        let runs = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&runs);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let flow = callback();
                counter.fetch_add(1, Ordering::AcqRel);
                if flow.is_break() {
                    debug!("Periodic task '{task_name}' stopped itself");
                    break;
                }
            }
        });

        info!("Registered periodic task '{name}' every {interval:?}");
        self.tasks.push(TaskHandle { name, runs, handle });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn tasks(&self) -> &[TaskHandle] {
        &self.tasks
    }

    /// Cancel every task.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.cancel();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn first_run_is_immediate_then_periodic() {
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();
        let sink = Arc::clone(&stamps);

        let mut scheduler = Scheduler::new();
        scheduler
            .register_periodic_task("sample", Duration::from_secs(5), move || {
                sink.lock().unwrap().push(start.elapsed());
                ControlFlow::Continue(())
            })
            .unwrap();

        time::sleep(Duration::from_millis(12_500)).await;

        // The paused clock advances in whole timer-wheel ticks; compare seconds.
        let secs: Vec<u64> = stamps
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.as_secs_f64().round() as u64)
            .collect();
        assert_eq!(secs, vec![0, 5, 10]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_runs() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler
            .register_periodic_task("sample", Duration::from_secs(1), || ControlFlow::Continue(()))
            .unwrap();

        time::sleep(Duration::from_millis(2_500)).await;
        handle.cancel();
        let before = handle.runs();
        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(before, 3);
        assert_eq!(handle.runs(), before);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn break_ends_the_task() {
        let mut left = 2;
        let mut scheduler = Scheduler::new();
        let handle = scheduler
            .register_periodic_task("countdown", Duration::from_secs(1), move || {
                left -= 1;
                if left == 0 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
            })
            .unwrap();

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.runs(), 2);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let mut scheduler = Scheduler::new();
        let err = scheduler
            .register_periodic_task("bad", Duration::ZERO, || ControlFlow::Continue(()))
            .unwrap_err();
        assert!(matches!(err, DashError::Scheduler(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_runs_never_overlap() {
        let busy = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let (b, o) = (Arc::clone(&busy), Arc::clone(&overlapped));

        let mut scheduler = Scheduler::new();
        let handle = scheduler
            .register_periodic_task("slow", Duration::from_millis(5), move || {
                if b.swap(true, Ordering::SeqCst) {
                    o.store(true, Ordering::SeqCst);
                }
                // Longer than the period.
                std::thread::sleep(Duration::from_millis(15));
                b.store(false, Ordering::SeqCst);
                ControlFlow::Continue(())
            })
            .unwrap();

        time::sleep(Duration::from_millis(120)).await;
        assert!(handle.runs() >= 2);
        assert!(!overlapped.load(Ordering::SeqCst));
    }
}
