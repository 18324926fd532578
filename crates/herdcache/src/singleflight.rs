//! Request coalescing
//!
//! [`FlightGroup`] makes sure only one execution of a piece of work is in
//! flight per key. The first caller (the leader) runs the work on its own
//! thread; callers arriving while it runs block until it finishes and get a
//! clone of its result. Once the leader returns, the key is free again and
//! the next caller starts a fresh execution.
//!
//! If the leader unwinds before producing a result, the waiters are woken
//! and retry, so one of them becomes the new leader.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::{Condvar, Mutex};

enum State<T> {
    Pending,
    Done(T),
    Abandoned,
}

/// One in-flight execution and the callers parked on it
struct Call<T> {
    state: Mutex<State<T>>,
    done: Condvar,
}

impl<T: Clone> Call<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(State::Pending),
            done: Condvar::new(),
        }
    }

    /// Block until the leader settles; `None` if it unwound
    fn wait(&self) -> Option<T> {
        let mut state = self.state.lock();
        while matches!(*state, State::Pending) {
            self.done.wait(&mut state);
        }

        match &*state {
            State::Done(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn settle(&self, state: State<T>) {
        *self.state.lock() = state;
        self.done.notify_all();
    }
}

/// Duplicate suppression for keyed work
pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, Arc<Call<T>>, RandomState>>,
}

impl<T> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::with_hasher(RandomState::new())),
        }
    }
}

impl<T: Clone> FlightGroup<T> {
    /// Create an empty flight group
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `func` for `key` unless a run is already in flight, in which case
    /// wait for it and return its result instead
    pub fn work<F>(&self, key: &str, func: F) -> T
    where
        F: FnOnce() -> T,
    {
        loop {
            let (call, leader) = {
                let mut calls = self.calls.lock();
                if let Some(call) = calls.get(key) {
                    (Arc::clone(call), false)
                } else {
                    let call = Arc::new(Call::new());
                    calls.insert(key.to_owned(), Arc::clone(&call));
                    (call, true)
                }
            };

            if leader {
                return self.lead(key, call, func);
            }

            if let Some(value) = call.wait() {
                return value;
            }
        }
    }

    /// Number of keys with work in flight
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    fn lead<F>(&self, key: &str, call: Arc<Call<T>>, func: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut guard = Leader {
            flight: self,
            key,
            call,
            settled: false,
        };

        let value = func();
        guard.call.settle(State::Done(value.clone()));
        guard.settled = true;
        guard.deregister();
        value
    }
}

impl<T> fmt::Debug for FlightGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightGroup")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

/// Leader's hold on a call; releases the waiters if the work unwinds
struct Leader<'a, T: Clone> {
    flight: &'a FlightGroup<T>,
    key: &'a str,
    call: Arc<Call<T>>,
    settled: bool,
}

impl<T: Clone> Leader<'_, T> {
    fn deregister(&self) {
        let mut calls = self.flight.calls.lock();
        if calls
            .get(self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &self.call))
        {
            calls.remove(self.key);
        }
    }
}

impl<T: Clone> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.deregister();
            self.call.settle(State::Abandoned);
        }
    }
}
