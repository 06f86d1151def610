use std::fmt;
use std::future::{Future, IntoFuture};
use std::mem;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::errors::{ClientTimeoutError, Elapsed, Error, ErrorKind};
use crate::errors::InterfaceError;
use crate::executor::Executor;
use crate::latch::Latch;

type Callback<T> = Box<dyn FnOnce(Result<T, Error>) + Send + 'static>;

/// Outcome of a single asynchronous operation.
///
/// Completed at most once, either with a value or with an [`Error`]. The
/// outcome can be consumed by registering callbacks, by chaining with
/// [`map`](QueryResult::map) and friends, by blocking with
/// [`wait`](QueryResult::wait) or by `.await`-ing the result.
///
/// Cloning is cheap, all clones refer to the same outcome.
pub struct QueryResult<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    latch: Latch,
}

enum State<T> {
    Pending(Vec<Callback<T>>),
    Completed(Result<T, Error>),
}

impl<T> Clone for QueryResult<T> {
    fn clone(&self) -> Self {
        QueryResult { inner: self.inner.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &*self.inner.state.lock() {
            State::Pending(callbacks) => f.debug_struct("QueryResult")
                .field("pending_callbacks", &callbacks.len())
                .finish(),
            State::Completed(result) => f.debug_struct("QueryResult")
                .field("result", result)
                .finish(),
        }
    }
}

impl<T: Clone + Send + 'static> Default for QueryResult<T> {
    fn default() -> Self {
        QueryResult::new()
    }
}

impl<T: Clone + Send + 'static> QueryResult<T> {
    /// Creates a pending result.
    pub fn new() -> QueryResult<T> {
        QueryResult {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Pending(Vec::new())),
                latch: Latch::new(),
            }),
        }
    }

    /// Creates a result that already holds `value`.
    pub fn successful(value: T) -> QueryResult<T> {
        let result = QueryResult::new();
        result.succeed(value);
        result
    }

    /// Creates a result that already holds `error`.
    pub fn failed(error: Error) -> QueryResult<T> {
        let result = QueryResult::new();
        result.fail(error);
        result
    }

    /// Stores the outcome and fires every registered callback.
    ///
    /// # Panics
    ///
    /// When the result is already completed.
    pub fn complete(&self, outcome: Result<T, Error>) {
        let callbacks = {
            let mut state = self.inner.state.lock();
            if let State::Completed(_) = &*state {
                drop(state);
                panic!("QueryResult is completed twice");
            }
            let previous = mem::replace(
                &mut *state, State::Completed(outcome.clone()));
            match previous {
                State::Pending(callbacks) => callbacks,
                State::Completed(_) => Vec::new(),
            }
        };
        self.inner.latch.release();
        for callback in callbacks {
            callback(outcome.clone());
        }
    }

    pub fn succeed(&self, value: T) {
        self.complete(Ok(value))
    }

    pub fn fail(&self, error: Error) {
        self.complete(Err(error))
    }

    pub fn is_completed(&self) -> bool {
        matches!(&*self.inner.state.lock(), State::Completed(_))
    }

    /// The outcome, if the result is completed. Never blocks.
    pub fn peek(&self) -> Option<Result<T, Error>> {
        match &*self.inner.state.lock() {
            State::Pending(_) => None,
            State::Completed(outcome) => Some(outcome.clone()),
        }
    }

    /// Calls `callback` with the outcome once it is available.
    ///
    /// When the result is already completed the callback fires right away.
    /// With an `executor` the callback is run by it, otherwise it runs on
    /// the thread that completes the result (or the calling thread, if the
    /// result is already completed).
    pub fn on_complete<F>(&self, executor: Option<Arc<dyn Executor>>,
                          callback: F)
        where F: FnOnce(Result<T, Error>) + Send + 'static,
    {
        let callback: Callback<T> = match executor {
            Some(executor) => Box::new(move |outcome| {
                executor.execute(Box::new(move || callback(outcome)))
            }),
            None => Box::new(callback),
        };
        let outcome = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Pending(callbacks) => {
                    callbacks.push(callback);
                    return;
                }
                State::Completed(outcome) => outcome.clone(),
            }
        };
        callback(outcome);
    }

    /// Transforms a successful value, errors pass through unchanged.
    pub fn map<U, F>(&self, f: F) -> QueryResult<U>
        where F: FnOnce(T) -> U + Send + 'static,
              U: Clone + Send + 'static,
    {
        let next = QueryResult::new();
        let target = next.clone();
        self.on_complete(None, move |outcome| target.complete(outcome.map(f)));
        next
    }

    /// Chains another asynchronous operation on a successful value.
    pub fn flat_map<U, F>(&self, f: F) -> QueryResult<U>
        where F: FnOnce(T) -> QueryResult<U> + Send + 'static,
              U: Clone + Send + 'static,
    {
        let next = QueryResult::new();
        let target = next.clone();
        self.on_complete(None, move |outcome| match outcome {
            Ok(value) => {
                f(value).on_complete(None, move |res| target.complete(res))
            }
            Err(e) => target.complete(Err(e)),
        });
        next
    }

    /// Handles an error, successful values pass through unchanged.
    ///
    /// `f` may recover by returning `Ok` or replace the error.
    pub fn map_err<F>(&self, f: F) -> QueryResult<T>
        where F: FnOnce(Error) -> Result<T, Error> + Send + 'static,
    {
        let next = QueryResult::new();
        let target = next.clone();
        self.on_complete(None, move |outcome| {
            target.complete(outcome.or_else(f))
        });
        next
    }

    /// Handles an error with another asynchronous operation.
    pub fn flat_map_err<F>(&self, f: F) -> QueryResult<T>
        where F: FnOnce(Error) -> QueryResult<T> + Send + 'static,
    {
        let next = QueryResult::new();
        let target = next.clone();
        self.on_complete(None, move |outcome| match outcome {
            Ok(value) => target.complete(Ok(value)),
            Err(e) => {
                f(e).on_complete(None, move |res| target.complete(res))
            }
        });
        next
    }

    /// Blocks the current thread until the result is completed.
    ///
    /// Fails with [`ClientTimeoutError`] if nothing arrives within
    /// `timeout`, its source is an [`Elapsed`] holding the time waited.
    /// The operation itself is not cancelled and may complete
    /// later.
    ///
    /// Must not be called from within an asynchronous task, use `.await`
    /// there instead.
    pub fn wait(&self, timeout: Duration) -> Result<T, Error> {
        let start = Instant::now();
        if !self.inner.latch.wait_for(timeout) {
            return Err(ClientTimeoutError::with_source(
                Elapsed::new(start.elapsed())));
        }
        match self.peek() {
            Some(outcome) => outcome,
            None => Err(InterfaceError::with_message(
                "latch released before completion")),
        }
    }
}

impl<T: Clone + Send + 'static> IntoFuture for QueryResult<T> {
    type Output = Result<T, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<T, Error>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        let (tx, rx) = oneshot::channel();
        self.on_complete(None, move |outcome| {
            // receiver is gone when the future was dropped
            let _ = tx.send(outcome);
        });
        Box::pin(async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(InterfaceError::with_message(
                    "query result dropped before completion")),
            }
        })
    }
}
