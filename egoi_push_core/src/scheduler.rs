/**
 * Callback scheduling onto the host's designated context.
 *
 * Results from the network path are never handed to the caller on the
 * worker thread. `PushReportingClient` posts each callback through a
 * `MainScheduler`, and the host decides where that runs:
 *
 * - `MainQueue`: tasks pile up until the host drains them from its own
 *   main/UI loop with `run_pending()`.
 * - `CallbackThread`: a dedicated `egoi-push-callbacks` thread runs tasks
 *   in posting order. This is the default.
 * - Anything else: implement `MainScheduler` for the host's event loop.
 */
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::error::InitError;

/// A unit of work posted to the main context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks on the host's designated callback context.
///
/// `post` must not run the task inline on the calling thread.
pub trait MainScheduler: Send + Sync {
    fn post(&self, task: Task);
}

// ---------------------------------------------------------------------------
// MainQueue
// ---------------------------------------------------------------------------

/**
 * A queue drained by the host.
 *
 * Share it as `Arc<MainQueue>`: one clone goes into `Options::scheduler`,
 * the other stays with the host's main loop.
 */
pub struct MainQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
}

impl MainQueue {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Runs every task queued so far on the calling thread. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /**
     * Waits up to `timeout` for one task and runs it.
     *
     * Returns `false` if nothing arrived in time.
     */
    pub fn run_next_timeout(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MainScheduler for MainQueue {
    fn post(&self, task: Task) {
        /*
         * Cannot fail: the queue owns its own receiver for as long as the
         * sender is reachable.
         */
        let _ = self.sender.send(task);
    }
}

// ---------------------------------------------------------------------------
// CallbackThread
// ---------------------------------------------------------------------------

/**
 * A single background thread that runs posted tasks in order.
 *
 * The thread exits once the `CallbackThread` is dropped and every task posted
 * before that has run. A panicking task is contained so later callbacks
 * still fire.
 */
pub struct CallbackThread {
    sender: Sender<Task>,
}

impl CallbackThread {
    pub fn spawn() -> Result<Self, InitError> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Task>();

        thread::Builder::new()
            .name("egoi-push-callbacks".into())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)).is_err() {
                        log::warn!(
                            target: crate::logger::LOG_TARGET,
                            "A completion callback panicked"
                        );
                    }
                }
            })
            .map_err(|source| InitError::ThreadSpawn {
                thread: "callback",
                source,
            })?;

        Ok(Self { sender })
    }
}

impl MainScheduler for CallbackThread {
    fn post(&self, task: Task) {
        if self.sender.send(task).is_err() {
            log::warn!(
                target: crate::logger::LOG_TARGET,
                "Callback thread has shut down, dropping callback"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_main_queue_defers_until_drained() {
        let queue = MainQueue::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = calls.clone();
            queue.post(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.run_pending(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_main_queue_run_next_timeout() {
        let queue = MainQueue::new();
        assert!(!queue.run_next_timeout(Duration::from_millis(5)));

        queue.post(Box::new(|| {}));
        assert!(queue.run_next_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn test_callback_thread_runs_tasks_in_order_off_caller_thread() {
        let scheduler = CallbackThread::spawn().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let caller = thread::current().id();

        for i in 0..3 {
            let tx = tx.clone();
            scheduler.post(Box::new(move || {
                assert_ne!(thread::current().id(), caller);
                tx.send(i).unwrap();
            }));
        }

        let received: Vec<i32> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();
        assert_eq!(received, vec![0, 1, 2]);
    }

    #[test]
    fn test_callback_thread_survives_panicking_task() {
        let scheduler = CallbackThread::spawn().unwrap();
        let (tx, rx) = crossbeam_channel::bounded(1);

        scheduler.post(Box::new(|| panic!("boom")));
        scheduler.post(Box::new(move || tx.send(()).unwrap()));

        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }
}
