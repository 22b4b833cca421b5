//! Partitioned task executor.
//!
//! Tasks are bound to a world position and run on the worker thread that
//! owns the containing region. Submission is non-blocking; tasks submitted
//! from one thread to one region run in submission order (one channel per
//! worker, per-sender FIFO). No ordering holds across regions or across
//! submitting threads.
//!
//! ```text
//! submit(pos, task)
//!   └─> region = pos.chunk().region()
//!         └─> worker = stable_hash(region) % workers   (fixed for lifetime)
//!               └─> channel ──> worker thread runs task
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use loot_spatial::{Position, RegionPos};
use tracing::{debug, error};

/// A unit of work bound to a partition.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Task),
    /// Flush marker; the worker acks once everything queued before it ran.
    Barrier(Sender<()>),
}

struct Worker {
    tx: Sender<Message>,
    handle: Option<JoinHandle<()>>,
}

/// Executor with one task queue per worker thread and a stable
/// region-to-worker assignment.
pub struct PartitionedExecutor {
    workers: Vec<Worker>,
}

impl PartitionedExecutor {
    /// Spawn an executor with the given number of worker threads.
    ///
    /// A count of zero is clamped to one.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        let count = worker_count.max(1);
        let mut workers = Vec::with_capacity(count);

        for index in 0..count {
            let (tx, rx) = crossbeam_channel::unbounded::<Message>();
            let handle = std::thread::spawn(move || worker_loop(index, &rx));
            workers.push(Worker {
                tx,
                handle: Some(handle),
            });
        }

        debug!(count, "partition workers started");
        Self { workers }
    }

    /// Submit a task bound to a world position. Non-blocking.
    ///
    /// The task runs on the worker thread owning the position's region.
    pub fn submit<F>(&self, at: Position, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_to_region(at.chunk().region(), task);
    }

    /// Submit a task bound to a region directly.
    pub fn submit_to_region<F>(&self, region: RegionPos, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let worker = &self.workers[self.worker_index(region)];
        if worker.tx.send(Message::Run(Box::new(task))).is_err() {
            error!(?region, "partition worker is gone, task dropped");
        }
    }

    /// Block until every task submitted before this call has run.
    ///
    /// Submission paths never block; this exists for orderly shutdown and
    /// for tests that need to observe the effects of queued tasks.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(self.workers.len());

        let mut expected = 0;
        for worker in &self.workers {
            if worker.tx.send(Message::Barrier(ack_tx.clone())).is_ok() {
                expected += 1;
            }
        }
        drop(ack_tx);

        for _ in 0..expected {
            let _ = ack_rx.recv();
        }
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stable worker assignment for a region.
    fn worker_index(&self, region: RegionPos) -> usize {
        let mixed = i64::from(region.x).wrapping_mul(73_856_093)
            ^ i64::from(region.z).wrapping_mul(19_349_663);
        mixed.rem_euclid(self.workers.len() as i64) as usize
    }
}

impl Drop for PartitionedExecutor {
    fn drop(&mut self) {
        // Closing the channels lets the workers drain and exit.
        for worker in &mut self.workers {
            let (closed, _) = crossbeam_channel::bounded(0);
            worker.tx = closed;
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

fn worker_loop(index: usize, rx: &Receiver<Message>) {
    while let Ok(message) = rx.recv() {
        match message {
            Message::Run(task) => {
                // A panicking task must not take the worker down with it;
                // every other task queued for this partition still runs.
                if catch_unwind(AssertUnwindSafe(task)).is_err() {
                    error!(worker = index, "partition task panicked");
                }
            }
            Message::Barrier(ack) => {
                let _ = ack.send(());
            }
        }
    }
}
