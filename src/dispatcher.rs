//! Batch scheduling over a set of work items.
//!
//! The dispatcher runs an opaque per-file transcription operation once per
//! [`WorkItem`], either strictly in order on the calling thread (`workers == 1`)
//! or on a fixed-size pool of OS threads (`workers > 1`), and collects exactly
//! one [`Outcome`] per item.
//!
//! Failure model:
//! - Per-item errors (and panics) are caught at the item boundary and become
//!   failed outcomes; they never cancel or block sibling items.
//! - The only way `run` itself fails is a configuration error (`workers == 0`).
//!
//! There is no retry, no per-item timeout, and no cancellation: once submitted,
//! every item runs to completion or individual failure, and `run` joins all
//! workers before returning.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, mpsc};
use std::time::Instant;

use tracing::{info, warn};

use crate::outcome::{Outcome, RunSummary};
use crate::work::WorkItem;
use crate::{Error, Result};

/// The per-file transcription operation the dispatcher fans out over.
///
/// Implementations perform the actual model inference and artifact writing as a
/// side effect; the dispatcher never inspects those artifacts. Any non-error
/// return is treated as success.
///
/// `Sync` is required because pool workers share one operation instance by
/// reference. All per-call mutable state (Whisper inference state, buffers)
/// belongs inside `transcribe`.
pub trait Transcriber: Sync {
    /// Process a single work item.
    fn transcribe(&self, item: &WorkItem) -> Result<()>;
}

impl<T: Transcriber> Transcriber for &T {
    fn transcribe(&self, item: &WorkItem) -> Result<()> {
        (*self).transcribe(item)
    }
}

/// Run the operation once per work item and summarize the results.
///
/// Scheduling:
/// - `workers == 1`: items run synchronously, in input order, on the calling
///   thread. The outcome order matches the input order.
/// - `workers > 1`: exactly `workers` threads pull items from a shared queue.
///   Completion order is unspecified; callers needing deterministic reporting
///   get it from [`RunSummary`], which sorts its failure list by path.
///
/// Invariant: `work_items.len()` outcomes are always collected, regardless of
/// how many items fail.
pub fn run<T: Transcriber>(
    op: &T,
    work_items: Vec<WorkItem>,
    workers: usize,
) -> Result<RunSummary> {
    if workers == 0 {
        return Err(Error::config("worker count must be at least 1"));
    }

    let started = Instant::now();
    let total = work_items.len();

    let outcomes = if workers == 1 {
        run_sequential(op, work_items)
    } else {
        run_pool(op, work_items, workers)
    };

    debug_assert_eq!(outcomes.len(), total);

    Ok(RunSummary::from_outcomes(&outcomes, started.elapsed()))
}

/// Sequential mode: strictly in input order, on the calling thread.
fn run_sequential<T: Transcriber>(op: &T, work_items: Vec<WorkItem>) -> Vec<Outcome> {
    work_items.iter().map(|item| run_one(op, item)).collect()
}

/// Pool mode: a fixed number of worker threads draining a shared queue.
///
/// We use scoped threads so workers can borrow the operation and the queue
/// without `Arc`, and an mpsc channel to return outcomes to the coordinating
/// thread. Dropping the coordinator's sender means the receive loop ends
/// exactly when the last worker finishes its last item.
fn run_pool<T: Transcriber>(op: &T, work_items: Vec<WorkItem>, workers: usize) -> Vec<Outcome> {
    let total = work_items.len();
    let queue = Mutex::new(VecDeque::from(work_items));
    let (tx, rx) = mpsc::channel::<Outcome>();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;

            scope.spawn(move || {
                loop {
                    // Hold the lock only long enough to take the next item.
                    let Some(item) = next_item(queue) else {
                        break;
                    };

                    let outcome = run_one(op, &item);

                    // The receiver outlives the scope, so a send failure here
                    // would mean the coordinator is gone; nothing to do but stop.
                    if tx.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }

        // Drop the coordinator's sender so `rx` disconnects once workers finish.
        drop(tx);

        rx.iter().take(total).collect()
    })
}

fn next_item(queue: &Mutex<VecDeque<WorkItem>>) -> Option<WorkItem> {
    match queue.lock() {
        Ok(mut q) => q.pop_front(),
        // A poisoned queue means a sibling panicked while holding the lock.
        // `next_item` only pops, so the data is still consistent; keep draining.
        Err(poisoned) => poisoned.into_inner().pop_front(),
    }
}

/// Execute one item and convert the result into an outcome.
///
/// This is the single failure-handling path shared by the sequential and pool
/// modes. Panics inside the operation are caught and recorded as failures so
/// a misbehaving item can never take down the batch or drop its outcome.
fn run_one<T: Transcriber>(op: &T, item: &WorkItem) -> Outcome {
    info!(file = %item.file_path.display(), "processing");

    let result = catch_unwind(AssertUnwindSafe(|| op.transcribe(item)));

    match result {
        Ok(Ok(())) => {
            info!(file = %item.file_path.display(), "completed");
            Outcome::success(&item.file_path)
        }
        Ok(Err(err)) => {
            warn!(file = %item.file_path.display(), error = %err, "failed");
            Outcome::failure(&item.file_path, err.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!(file = %item.file_path.display(), error = %message, "panicked");
            Outcome::failure(&item.file_path, message)
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "transcription panicked".to_owned()
    }
}
