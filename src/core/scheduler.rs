//! Per-actor deferred actions.
//!
//! Every actor owns a [`Scheduler`] holding the actions it wants to run
//! later (attack windups, stun recovery, cooldown resets). The owner
//! advances its clock once per frame after its own state update and then
//! drains whatever came due, so work scheduled during a frame never runs
//! before that frame's update has finished.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Handle to a scheduled action, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<A> {
    fire_at: f32,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    // Reversed so the max-heap pops the earliest entry, FIFO on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of `(fire time, action)` pairs on a local clock.
#[derive(Debug)]
pub struct Scheduler<A> {
    clock: f32,
    next_seq: u64,
    queue: BinaryHeap<Entry<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            clock: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local time in seconds since the scheduler was created.
    pub fn now(&self) -> f32 {
        self.clock
    }

    /// Schedule `action` to fire `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, action: A) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            fire_at: self.clock + delay.max(0.0),
            seq,
            action,
        });
        TimerHandle(seq)
    }

    /// Cancel a single entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.seq != handle.0);
        self.queue.len() != before
    }

    /// Cancel every pending entry whose action matches `predicate`.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&A) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|entry| !predicate(&entry.action));
        before - self.queue.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue.iter().any(|entry| entry.seq == handle.0)
    }

    /// Whether any pending entry matches `predicate`.
    pub fn any_pending(&self, mut predicate: impl FnMut(&A) -> bool) -> bool {
        self.queue.iter().any(|entry| predicate(&entry.action))
    }

    /// Seconds until the entry fires, if it is still pending.
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.queue
            .iter()
            .find(|entry| entry.seq == handle.0)
            .map(|entry| (entry.fire_at - self.clock).max(0.0))
    }

    /// Move the local clock forward.
    pub fn advance(&mut self, dt: f32) {
        self.clock += dt.max(0.0);
    }

    /// Pop the earliest entry that is due at the current clock.
    pub fn pop_due(&mut self) -> Option<A> {
        if self.queue.peek()?.fire_at > self.clock {
            return None;
        }
        self.queue.pop().map(|entry| entry.action)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<A: PartialEq> Scheduler<A> {
    /// Schedule `action`, replacing any pending entry with the same action.
    pub fn reschedule(&mut self, delay: f32, action: A) -> TimerHandle {
        self.cancel_where(|pending| *pending == action);
        self.schedule(delay, action)
    }

    pub fn is_scheduled(&self, action: &A) -> bool {
        self.any_pending(|pending| pending == action)
    }
}
