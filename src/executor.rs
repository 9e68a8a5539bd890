//! Running configuration jobs on a designated thread and waiting for them.

use crate::error::{CloningError, ErrorCode};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle, ThreadId};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait OwningThread: Send + Sync {
    /// Hands `job` to the owning thread. Returns once the job is queued or,
    /// when already on the owning thread, once it has run.
    fn dispatch(&self, job: Job) -> Result<(), CloningError>;
}

/// Runs `job` on the owning thread and blocks until its result is back.
pub fn run_and_wait<T, F>(owner: &dyn OwningThread, job: F) -> Result<T, CloningError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    owner.dispatch(Box::new(move || {
        let _ = tx.send(job());
    }))?;
    rx.recv().map_err(|_| {
        CloningError::new(
            ErrorCode::Internal,
            "Owning thread dropped a configuration job without a result",
        )
    })
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl OwningThread for InlineExecutor {
    fn dispatch(&self, job: Job) -> Result<(), CloningError> {
        job();
        Ok(())
    }
}

/// A dedicated background thread fed through a channel. Jobs dispatched from
/// that thread itself run inline. Dropping it drains the queue and joins.
pub struct DesignatedThread {
    tx: Option<Sender<Job>>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl DesignatedThread {
    pub fn spawn(name: &str) -> Result<Self, CloningError> {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            thread_id: handle.thread().id(),
            handle: Some(handle),
        })
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}

impl OwningThread for DesignatedThread {
    fn dispatch(&self, job: Job) -> Result<(), CloningError> {
        if self.is_current() {
            job();
            return Ok(());
        }
        let tx = self.tx.as_ref().ok_or_else(|| {
            CloningError::new(ErrorCode::Internal, "Owning thread has shut down")
        })?;
        tx.send(job).map_err(|_| {
            CloningError::new(ErrorCode::Internal, "Owning thread is no longer running")
        })
    }
}

impl Drop for DesignatedThread {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
