/**
 * Exactly-once asynchronous boolean result.
 *
 * Every dispatched request produces a `(Completer, Completion)` pair. The
 * completer travels with the request to the worker thread; the completion
 * goes back to whoever issued it.
 *
 * ```text
 *  caller ──► Completion ◄─── shared state ───► Completer ──► worker thread
 *             wait / on_resolved                complete(bool)
 * ```
 *
 * Guarantees:
 * - `Completer::complete` consumes the completer, so a result is set once.
 * - Dropping a completer that never completed resolves `false`; a request
 *   lost to a full queue or a dead worker still gets an answer.
 * - A continuation registered with `on_resolved` runs exactly once.
 *
 * `Client::flush` rides on the same pair: the worker completes a flush
 * completer once everything queued before it has resolved.
 */
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type Continuation = Box<dyn FnOnce(bool) + Send + 'static>;

enum State {
    Pending(Option<Continuation>),
    Resolved(bool),
}

struct Shared {
    state: Mutex<State>,
    condvar: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, result: bool) {
        let continuation = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, State::Resolved(result)) {
                State::Pending(continuation) => continuation,
                State::Resolved(previous) => {
                    *state = State::Resolved(previous);
                    return;
                }
            }
        };

        self.condvar.notify_all();

        /*
         * Run outside the lock so the continuation may freely call back into
         * anything, including `wait` on another handle.
         */
        if let Some(continuation) = continuation {
            continuation(result);
        }
    }
}

/// Creates a linked pending pair.
pub fn pair() -> (Completer, Completion) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State::Pending(None)),
        condvar: Condvar::new(),
    });

    (
        Completer {
            shared: Some(shared.clone()),
        },
        Completion { shared },
    )
}

// ---------------------------------------------------------------------------
// Completer: the write side
// ---------------------------------------------------------------------------

/// Write side of a completion. Resolves `false` if dropped unused.
pub struct Completer {
    shared: Option<Arc<Shared>>,
}

impl Completer {
    pub fn complete(mut self, result: bool) {
        if let Some(shared) = self.shared.take() {
            shared.resolve(result);
        }
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.resolve(false);
        }
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Completion: the read side
// ---------------------------------------------------------------------------

/**
 * Read side of a request's outcome.
 *
 * Not `Clone`: there is one owner, and at most one continuation.
 */
pub struct Completion {
    shared: Arc<Shared>,
}

impl Completion {
    /// A completion that is already resolved with `result`.
    pub fn resolved(result: bool) -> Self {
        let (completer, completion) = pair();
        completer.complete(result);
        completion
    }

    /// The result if already resolved, without blocking.
    pub fn try_result(&self) -> Option<bool> {
        match *self.shared.lock() {
            State::Resolved(result) => Some(result),
            State::Pending(_) => None,
        }
    }

    /// Blocks until the request resolves.
    pub fn wait(&self) -> bool {
        let mut state = self.shared.lock();
        loop {
            if let State::Resolved(result) = *state {
                return result;
            }
            state = self
                .shared
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /**
     * Blocks until the request resolves or `timeout` elapses.
     *
     * Returns `None` on timeout; the request keeps going and can still be
     * observed later.
     */
    pub fn wait_timeout(&self, timeout: Duration) -> Option<bool> {
        let state = self.shared.lock();
        let (state, _) = self
            .shared
            .condvar
            .wait_timeout_while(state, timeout, |state| matches!(state, State::Pending(_)))
            .unwrap_or_else(PoisonError::into_inner);

        match *state {
            State::Resolved(result) => Some(result),
            State::Pending(_) => None,
        }
    }

    /**
     * Registers the continuation to run with the result.
     *
     * If the completion is still pending, `f` runs later on the thread that
     * resolves it (normally the worker thread). If it is already resolved,
     * `f` runs immediately on the calling thread.
     */
    pub fn on_resolved<F>(self, f: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let mut state = self.shared.lock();
        let result = match &mut *state {
            State::Pending(slot) => {
                *slot = Some(Box::new(f));
                return;
            }
            State::Resolved(result) => *result,
        };
        drop(state);
        f(result);
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("result", &self.try_result())
            .finish()
    }
}
