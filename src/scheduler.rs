//! Deferral of work to the next turn of the UI loop.
//!
//! Anything the native map reports back is written into the declarative state through here,
//! never directly from the notification. That keeps the two write directions on different call
//! stacks: a declarative update may trigger a native notification, but the resulting
//! write-back runs only after the update has returned.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce() + Send>;

/// A handle for deferring jobs to the next turn.
#[derive(Clone)]
pub struct Scheduler {
    sender: Sender<Job>,
}

impl Scheduler {
    /// Defers a job to the next turn.
    ///
    /// If the queue is gone the job is dropped; there's nobody left to observe its effects.
    pub fn defer(&self, job: impl FnOnce() + Send + 'static) {
        if self.sender.send(Box::new(job)).is_err() {
            tracing::trace!("turn queue is gone; dropping deferred job");
        }
    }
}

/// The queue of deferred jobs; drive it from the UI loop.
pub struct TurnQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
}

impl TurnQueue {
    pub fn new() -> TurnQueue {
        let (sender, receiver) = channel::unbounded();
        TurnQueue { sender, receiver }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler {
            sender: self.sender.clone(),
        }
    }

    /// Number of jobs waiting for the next turn.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Runs one turn: every job that was queued before this call.
    ///
    /// Jobs deferred while the turn runs wait for the next one. Returns the number of jobs run.
    pub fn run_turn(&self) -> usize {
        let queued = self.receiver.len();
        let mut ran = 0;
        while ran < queued {
            match self.receiver.try_recv() {
                Ok(job) => {
                    job();
                    ran += 1;
                }
                Err(TryRecvError::Empty) => break,
                // we hold a sender ourselves
                Err(TryRecvError::Disconnected) => unreachable!("turn queue sender dropped"),
            }
        }
        ran
    }

    /// Runs turns until no jobs are left, up to `max_turns`. Returns the number of jobs run.
    pub fn run_until_idle(&self, max_turns: usize) -> usize {
        let mut ran = 0;
        for _ in 0..max_turns {
            if self.receiver.is_empty() {
                break;
            }
            ran += self.run_turn();
        }
        ran
    }
}

impl Default for TurnQueue {
    fn default() -> TurnQueue {
        TurnQueue::new()
    }
}
