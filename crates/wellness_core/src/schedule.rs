//! Deferred one-shot tasks polled from the host event loop.
//!
//! # Responsibility
//! - Hold payloads until their deadline passes.
//! - Hand out cancellation handles.
//!
//! # Invariants
//! - The queue owns no timer or thread; nothing fires until `drain_due`.
//! - Due payloads come out ordered by deadline, then by scheduling order.
//! - A cancelled or drained task never fires again.

use chrono::{DateTime, FixedOffset};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use uuid::Uuid;

/// Longest delay the queue honors; longer delays are clamped to it.
pub const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Cancellation handle for one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct ScheduledTask<T> {
    id: TaskId,
    due_at: DateTime<FixedOffset>,
    seq: u64,
    payload: T,
}

#[derive(Debug)]
pub struct DeferredQueue<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_seq: u64,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedules `payload` to become due `delay` after `now`.
    ///
    /// Delays too large to represent are clamped to one day.
    pub fn schedule(&mut self, now: DateTime<FixedOffset>, delay: Duration, payload: T) -> TaskId {
        let max_delay = chrono::Duration::milliseconds(MAX_DELAY_MS as i64);
        let delay = chrono::Duration::from_std(delay)
            .unwrap_or(max_delay)
            .min(max_delay);
        let due_at = now.checked_add_signed(delay).unwrap_or(now);

        let id = TaskId::generate();
        self.tasks.push(ScheduledTask {
            id,
            due_at,
            seq: self.next_seq,
            payload,
        });
        self.next_seq += 1;
        id
    }

    /// Drops a pending task. Returns `false` when it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|task| task.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns every payload due at or before `now`.
    pub fn drain_due(&mut self, now: DateTime<FixedOffset>) -> Vec<T> {
        let (mut ready, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.due_at <= now);
        self.tasks = pending;

        ready.sort_by(|left, right| {
            left.due_at
                .cmp(&right.due_at)
                .then(left.seq.cmp(&right.seq))
        });
        ready.into_iter().map(|task| task.payload).collect()
    }

    /// Earliest pending deadline, for hosts that sleep until the next task.
    pub fn next_due(&self) -> Option<DateTime<FixedOffset>> {
        self.tasks.iter().map(|task| task.due_at).min()
    }

    /// Deadline of a pending task.
    pub fn due_at(&self, id: TaskId) -> Option<DateTime<FixedOffset>> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.due_at)
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
