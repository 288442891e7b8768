//! In-process job queue backed by an unbounded channel.

use events::{JobDescriptor, JobQueue};
use log::*;
use tokio::sync::mpsc;

/// The sending half of the job queue. Handed to the dispatcher as its
/// `JobQueue` collaborator; the matching receiver is drained by
/// [`crate::JobWorker::run`].
pub struct InProcessQueue {
    sender: mpsc::UnboundedSender<JobDescriptor>,
}

impl InProcessQueue {
    /// Create the queue and the receiving end the worker drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<JobDescriptor>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl JobQueue for InProcessQueue {
    /// Submit a job without blocking. Submission failures only occur when
    /// the worker side has shut down; the job is logged and dropped rather
    /// than surfaced to the dispatcher.
    fn enqueue(&self, job: JobDescriptor) {
        if let Err(err) = self.sender.send(job) {
            error!("Dropping job, the worker is no longer running: {err}");
        }
    }
}
