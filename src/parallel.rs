//! Bounded parallel execution of fallible tasks.
//!
//! [`ParallelRun`] starts each submitted task on its own thread while keeping
//! at most `limit` of them in flight. The first error reported by any task is
//! kept and returned from [`ParallelRun::wait`]; later errors are dropped.

use std::panic;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::debug;

/// Runs fallible tasks concurrently with a hard cap on in-flight tasks.
///
/// Once any task has failed, tasks that are still running are left to finish
/// but further submissions are dropped without being started.
pub struct ParallelRun<E> {
    limit: usize,
    shared: Arc<Shared<E>>,
    handles: Vec<JoinHandle<()>>,
}

struct Shared<E> {
    state: Mutex<RunState<E>>,
    slot_freed: Condvar,
}

struct RunState<E> {
    running: usize,
    first_error: Option<E>,
}

impl<E> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, RunState<E>> {
        // The lock is never held while a task body runs, so a poisoned
        // mutex still guards consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a task's slot when dropped, including when the task panics.
struct Slot<E> {
    shared: Arc<Shared<E>>,
    error: Option<E>,
}

impl<E> Drop for Slot<E> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.running -= 1;
        if let Some(err) = self.error.take() {
            if state.first_error.is_none() {
                state.first_error = Some(err);
            }
        }
        drop(state);
        self.shared.slot_freed.notify_all();
    }
}

impl<E: Send + 'static> ParallelRun<E> {
    /// Creates a runner that keeps at most `limit` tasks in flight.
    ///
    /// A `limit` of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            shared: Arc::new(Shared {
                state: Mutex::new(RunState {
                    running: 0,
                    first_error: None,
                }),
                slot_freed: Condvar::new(),
            }),
            handles: Vec::new(),
        }
    }

    /// Returns the maximum number of tasks that may run at once.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Starts `task` on a new thread, blocking while the runner is saturated.
    ///
    /// If a previously submitted task has already failed, `task` is dropped
    /// without running.
    pub fn submit<F>(&mut self, task: F)
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
    {
        {
            let mut state = self.shared.lock();
            while state.running >= self.limit {
                state = self
                    .shared
                    .slot_freed
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if state.first_error.is_some() {
                debug!("skipping task after an earlier failure");
                return;
            }
            state.running += 1;
        }

        let shared = Arc::clone(&self.shared);
        self.handles.push(thread::spawn(move || {
            let mut slot = Slot {
                shared,
                error: None,
            };
            slot.error = task().err();
        }));
    }

    /// Blocks until every started task has finished.
    ///
    /// Returns the first error any task reported, or `Ok(())` if all of them
    /// succeeded. A panic inside a task is resumed on the calling thread.
    pub fn wait(self) -> Result<(), E> {
        let mut task_panic = None;
        for handle in self.handles {
            if let Err(payload) = handle.join() {
                task_panic.get_or_insert(payload);
            }
        }
        if let Some(payload) = task_panic {
            panic::resume_unwind(payload);
        }

        match self.shared.lock().first_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
