//! Ingestion queue: buffers producer calls and runs them in bounded chunks.
//!
//! Producers never touch overlay state directly. Every call becomes a task
//! that is appended here and executed in FIFO order on a later tick, at most
//! `chunk_size` tasks per tick so a large backlog cannot stall the host loop.

use super::schedule::Debounce;
use crate::model::TaskError;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default number of tasks executed per drain.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// A deferred unit of work against context `C`.
pub type Task<C> = Box<dyn FnOnce(&mut C) -> Result<(), TaskError>>;

/// Result of one drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Tasks taken off the queue and run (including failed ones).
    pub executed: usize,
    /// Tasks that returned an error and were discarded.
    pub failed: usize,
    /// Tasks still waiting after this drain.
    pub remaining: usize,
}

/// Debounced, chunked FIFO of tasks.
///
/// # Invariants
/// - Tasks execute strictly in enqueue order, across chunk boundaries.
/// - A failing or panicking task is removed like any other; the rest of the
///   chunk runs.
/// - While tasks remain, a drain is always scheduled.
pub struct IngestionQueue<C> {
    pending: VecDeque<Task<C>>,
    chunk_size: usize,
    schedule: Debounce,
}

impl<C> IngestionQueue<C> {
    /// Create a queue draining `chunk_size` tasks per run, `delay` after the
    /// first enqueue of an idle period.
    pub fn new(chunk_size: usize, delay: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            chunk_size: chunk_size.max(1),
            schedule: Debounce::new(delay),
        }
    }

    /// Append a task and make sure a drain is scheduled.
    pub fn enqueue<F>(&mut self, now: Instant, task: F)
    where
        F: FnOnce(&mut C) -> Result<(), TaskError> + 'static,
    {
        self.pending.push_back(Box::new(task));
        self.schedule.request(now);
    }

    /// Run a chunk if the scheduled drain is due.
    pub fn poll(&mut self, ctx: &mut C, now: Instant) -> Option<DrainReport> {
        if !self.schedule.poll(now) {
            return None;
        }
        Some(self.drain(ctx, now))
    }

    /// Run up to `chunk_size` of the oldest tasks unconditionally.
    ///
    /// If tasks remain afterwards the next drain is scheduled for `now`
    /// without another debounce delay.
    pub fn drain(&mut self, ctx: &mut C, now: Instant) -> DrainReport {
        let take = self.chunk_size.min(self.pending.len());
        let mut report = DrainReport::default();

        for task in self.pending.drain(..take) {
            report.executed += 1;
            if let Err(err) = run_isolated(task, ctx) {
                report.failed += 1;
                warn!(error = %err, "Console task failed; discarding");
            }
        }

        report.remaining = self.pending.len();
        if report.remaining > 0 {
            self.schedule.request_immediate(now);
        }

        debug!(
            executed = report.executed,
            failed = report.failed,
            remaining = report.remaining,
            "Drained ingestion chunk"
        );
        report
    }

    /// Number of tasks waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no tasks are waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// When the next drain is due, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.schedule.deadline()
    }

    /// Tasks executed per drain.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

/// Run one task, turning a panic into [`TaskError::Panicked`].
fn run_isolated<C>(task: Task<C>, ctx: &mut C) -> Result<(), TaskError> {
    match panic::catch_unwind(AssertUnwindSafe(|| task(ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(TaskError::Panicked(message))
        }
    }
}

impl<C> fmt::Debug for IngestionQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionQueue")
            .field("pending", &self.pending.len())
            .field("chunk_size", &self.chunk_size)
            .field("schedule", &self.schedule)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(queue: &mut IngestionQueue<Vec<u32>>, now: Instant, value: u32) {
        queue.enqueue(now, move |log: &mut Vec<u32>| {
            log.push(value);
            Ok(())
        });
    }

    #[test]
    fn nothing_runs_before_drain_is_due() {
        let t0 = Instant::now();
        let mut queue = IngestionQueue::new(10, Duration::from_millis(5));
        let mut log = Vec::new();
        push(&mut queue, t0, 1);

        assert_eq!(queue.poll(&mut log, t0), None);
        assert!(log.is_empty());

        let report = queue.poll(&mut log, t0 + Duration::from_millis(5)).unwrap();
        assert_eq!(report.executed, 1);
        assert_eq!(log, vec![1]);
    }

    #[test]
    fn tasks_run_in_enqueue_order() {
        let t0 = Instant::now();
        let mut queue = IngestionQueue::new(DEFAULT_CHUNK_SIZE, Duration::ZERO);
        let mut log = Vec::new();
        for i in 0..5 {
            push(&mut queue, t0, i);
        }

        queue.poll(&mut log, t0).unwrap();
        assert_eq!(log, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn failing_task_does_not_block_the_rest() {
        let t0 = Instant::now();
        let mut queue = IngestionQueue::new(10, Duration::ZERO);
        let mut log = Vec::new();
        push(&mut queue, t0, 1);
        queue.enqueue(t0, |_: &mut Vec<u32>| {
            Err(TaskError::Failed("bad producer call".to_string()))
        });
        push(&mut queue, t0, 2);

        let report = queue.poll(&mut log, t0).unwrap();
        assert_eq!(report.executed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(log, vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn panicking_task_is_discarded() {
        let t0 = Instant::now();
        let mut queue = IngestionQueue::new(10, Duration::ZERO);
        let mut log = Vec::new();
        push(&mut queue, t0, 1);
        queue.enqueue(t0, |_: &mut Vec<u32>| panic!("entry constructor exploded"));
        push(&mut queue, t0, 2);

        let report = queue.poll(&mut log, t0).unwrap();
        assert_eq!(report.executed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    fn panic_message_is_kept() {
        let mut log: Vec<u32> = Vec::new();
        let task: Task<Vec<u32>> = Box::new(|_: &mut Vec<u32>| -> Result<(), TaskError> {
            panic!("bad {}", "args")
        });
        assert_eq!(
            run_isolated(task, &mut log),
            Err(TaskError::Panicked("bad args".to_string()))
        );
    }

    #[test]
    fn backlog_drains_one_chunk_per_tick() {
        let t0 = Instant::now();
        let mut queue = IngestionQueue::new(3, Duration::from_millis(50));
        let mut log = Vec::new();
        for i in 0..7 {
            push(&mut queue, t0, i);
        }

        let t1 = t0 + Duration::from_millis(50);
        let first = queue.poll(&mut log, t1).unwrap();
        assert_eq!(first.remaining, 4);
        assert_eq!(log, vec![0, 1, 2]);

        // Follow-up drain is immediate, not re-debounced
        let second = queue.poll(&mut log, t1).unwrap();
        assert_eq!(second.remaining, 1);
        let third = queue.poll(&mut log, t1).unwrap();
        assert_eq!(third.remaining, 0);
        assert_eq!(log, (0..7).collect::<Vec<_>>());

        assert_eq!(queue.poll(&mut log, t1 + Duration::from_secs(1)), None);
    }

    #[test]
    fn enqueue_during_pending_drain_does_not_delay_it() {
        let t0 = Instant::now();
        let mut queue = IngestionQueue::new(10, Duration::from_millis(10));
        let mut log = Vec::new();
        push(&mut queue, t0, 1);
        push(&mut queue, t0 + Duration::from_millis(9), 2);

        let report = queue
            .poll(&mut log, t0 + Duration::from_millis(10))
            .unwrap();
        assert_eq!(report.executed, 2);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let queue: IngestionQueue<()> = IngestionQueue::new(0, Duration::ZERO);
        assert_eq!(queue.chunk_size(), 1);
    }
}
