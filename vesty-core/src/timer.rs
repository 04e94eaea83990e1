//! Deadline scheduler.
//!
//! Every scheduled task gets a `TimerHandle`. A handle can be cancelled at
//! any time before it fires; firing and cancelling are both one-shot.
//! Tasks sharing a deadline fire in the order they were scheduled.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    next_handle: u64,
    queue: BTreeMap<(DateTime<Utc>, u64), T>,
    deadlines: HashMap<u64, DateTime<Utc>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `task` to fire once `at` is reached.
    pub fn schedule(&mut self, at: DateTime<Utc>, task: T) -> TimerHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.queue.insert((at, handle), task);
        self.deadlines.insert(handle, at);
        TimerHandle(handle)
    }

    /// Cancel a pending task. Returns the task if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let at = self.deadlines.remove(&handle.0)?;
        self.queue.remove(&(at, handle.0))
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return every task whose deadline is `<= now`, earliest first.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<(TimerHandle, T)> {
        let mut fired = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            let (at, handle) = *entry.key();
            if at > now {
                break;
            }
            let task = entry.remove();
            self.deadlines.remove(&handle);
            fired.push((TimerHandle(handle), task));
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
