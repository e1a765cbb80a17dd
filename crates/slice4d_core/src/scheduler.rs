//! Fixed-tick event scheduler
//!
//! Timed delays are queued events rather than threads. Each call to
//! [`Scheduler::advance`] moves the clock forward and hands back every event
//! whose time has come, ordered by fire time and then by scheduling order.
//! Cancelled events are skipped lazily when they reach the front of the queue.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key to a pending scheduled event
    ///
    /// Stays invalid once the event fired or was cancelled, so a stale key
    /// can never cancel a newer event.
    pub struct TimerKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    fire_at: Duration,
    seq: u64,
    key: TimerKey,
}

/// Priority queue of cancellable timed events
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    pending: SlotMap<TimerKey, E>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            queue: BinaryHeap::new(),
            pending: SlotMap::with_key(),
        }
    }

    /// Time elapsed since creation
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of events still waiting to fire
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(key)
    }

    /// Queue `event` to fire `delay` from now
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerKey {
        let key = self.pending.insert(event);
        self.queue.push(Reverse(QueueEntry {
            fire_at: self.now.saturating_add(delay),
            seq: self.seq,
            key,
        }));
        self.seq += 1;
        key
    }

    /// Cancel a pending event, returning it if it had not fired yet
    pub fn cancel(&mut self, key: TimerKey) -> Option<E> {
        self.pending.remove(key)
    }

    /// Cancel whatever `slot` refers to, then schedule `event` into it
    ///
    /// Requesting the same delayed action twice leaves exactly one pending.
    pub fn reschedule(&mut self, slot: &mut Option<TimerKey>, delay: Duration, event: E) -> TimerKey {
        if let Some(old) = slot.take() {
            self.cancel(old);
        }
        let key = self.schedule(delay, event);
        *slot = Some(key);
        key
    }

    /// Advance the clock and collect the events that are due
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        self.now = self.now.saturating_add(dt);
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek().copied() {
            if entry.fire_at > self.now {
                break;
            }
            self.queue.pop();
            if let Some(event) = self.pending.remove(entry.key) {
                due.push(event);
            }
        }
        due
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn test_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(secs(2.0), "hide");
        assert!(scheduler.advance(secs(1.0)).is_empty());
        assert!(scheduler.advance(secs(0.5)).is_empty());
        assert_eq!(scheduler.advance(secs(0.5)), vec!["hide"]);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.advance(secs(10.0)).is_empty());
    }

    #[test]
    fn test_order_by_time_then_insertion() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(secs(2.0), 'c');
        scheduler.schedule(secs(1.0), 'a');
        scheduler.schedule(secs(1.0), 'b');
        assert_eq!(scheduler.advance(secs(5.0)), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let key = scheduler.schedule(secs(1.0), 1);
        scheduler.schedule(secs(1.0), 2);
        assert_eq!(scheduler.cancel(key), Some(1));
        assert!(!scheduler.is_pending(key));
        assert_eq!(scheduler.cancel(key), None);
        assert_eq!(scheduler.advance(secs(1.0)), vec![2]);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut scheduler = Scheduler::new();
        let mut slot = None;
        scheduler.reschedule(&mut slot, secs(2.0), "first");
        scheduler.advance(secs(1.5));
        scheduler.reschedule(&mut slot, secs(2.0), "second");
        assert_eq!(scheduler.pending_count(), 1);

        // the first would have fired at 2.0
        assert!(scheduler.advance(secs(1.0)).is_empty());
        assert_eq!(scheduler.advance(secs(1.0)), vec!["second"]);
    }

    #[test]
    fn test_stale_key_does_not_cancel_newer_event() {
        let mut scheduler = Scheduler::new();
        let old = scheduler.schedule(secs(0.1), 1);
        assert_eq!(scheduler.advance(secs(0.1)), vec![1]);
        let new = scheduler.schedule(secs(0.1), 2);
        assert_eq!(scheduler.cancel(old), None);
        assert!(scheduler.is_pending(new));
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::ZERO, "now");
        assert_eq!(scheduler.advance(Duration::ZERO), vec!["now"]);
    }

    #[test]
    fn test_huge_delays_saturate() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(secs(1.0));
        scheduler.schedule(Duration::MAX, "never");
        assert!(scheduler.advance(secs(1.0)).is_empty());
        assert_eq!(scheduler.advance(Duration::MAX), vec!["never"]);
        assert_eq!(scheduler.now(), Duration::MAX);
    }
}
