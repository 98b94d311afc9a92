#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic single-timeline task queue.
//!
//! [`Timeline`] stores one-shot and periodic tasks keyed by their due time and
//! the order in which they were scheduled. The owner drains due tasks with
//! [`Timeline::pop_due`] while advancing the clock, which makes every delayed
//! action resume in timestamp order with ties broken by scheduling order.

use std::{collections::BTreeMap, time::Duration};

use lane_blast_core::{Scheduler, TaskHandle};

const MIN_PERIOD: Duration = Duration::from_nanos(1);

type QueueKey = (Duration, u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    handle: TaskHandle,
    task: T,
    period: Option<Duration>,
}

/// Cancellable task queue driven by an externally advanced clock.
#[derive(Clone, Debug)]
pub struct Timeline<T> {
    now: Duration,
    next_handle: u64,
    next_sequence: u64,
    queue: BTreeMap<QueueKey, Entry<T>>,
    index: BTreeMap<TaskHandle, QueueKey>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            next_sequence: 0,
            queue: BTreeMap::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<T> Timeline<T> {
    /// Creates an empty timeline positioned at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position of the clock.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether no task is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Reports whether the handle refers to a task that has not fired or been cancelled.
    ///
    /// Periodic tasks stay scheduled until cancelled.
    #[must_use]
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.index.contains_key(&handle)
    }

    /// Due time of the earliest scheduled task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Drops every scheduled task without firing it. The clock keeps its position.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.index.clear();
    }

    /// Moves the clock forward to `until` once every due task was drained.
    ///
    /// The clock never moves backwards.
    pub fn advance_to(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }

    fn push(&mut self, due: Duration, entry: Entry<T>) {
        let key = (due, self.next_sequence);
        self.next_sequence = self.next_sequence.wrapping_add(1);
        let _ = self.index.insert(entry.handle, key);
        let _ = self.queue.insert(key, entry);
    }

    fn allocate_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        handle
    }

    fn schedule(&mut self, delay: Duration, period: Option<Duration>, task: T) -> TaskHandle {
        let handle = self.allocate_handle();
        let due = self.now.saturating_add(delay);
        self.push(
            due,
            Entry {
                handle,
                task,
                period,
            },
        );
        handle
    }
}

impl<T: Clone> Timeline<T> {
    /// Removes and returns the earliest task due at or before `until`.
    ///
    /// The clock moves to the task's due time. Periodic tasks are rescheduled
    /// one period later under the same handle before being returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, T)> {
        let (&key, _) = self.queue.iter().next()?;
        let (due, _) = key;
        if due > until {
            return None;
        }

        let entry = self.queue.remove(&key)?;
        let _ = self.index.remove(&entry.handle);
        self.advance_to(due);

        let fired = (entry.handle, entry.task.clone());
        if let Some(period) = entry.period {
            self.push(due.saturating_add(period), entry);
        }
        Some(fired)
    }
}

impl<T: Clone> Scheduler<T> for Timeline<T> {
    fn now(&self) -> Duration {
        self.now
    }

    fn after(&mut self, delay: Duration, task: T) -> TaskHandle {
        self.schedule(delay, None, task)
    }

    fn every(&mut self, interval: Duration, task: T) -> TaskHandle {
        let period = interval.max(MIN_PERIOD);
        self.schedule(period, Some(period), task)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.index.remove(&handle) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lane_blast_core::Scheduler;

    use super::Timeline;

    fn drain(timeline: &mut Timeline<&'static str>, until: Duration) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some((_, task)) = timeline.pop_due(until) {
            fired.push(task);
        }
        timeline.advance_to(until);
        fired
    }

    #[test]
    fn tasks_fire_in_due_order_with_ties_in_schedule_order() {
        let mut timeline = Timeline::new();
        let _ = timeline.after(Duration::from_millis(30), "late");
        let _ = timeline.after(Duration::from_millis(10), "first");
        let _ = timeline.after(Duration::from_millis(10), "second");

        assert_eq!(
            drain(&mut timeline, Duration::from_millis(30)),
            vec!["first", "second", "late"]
        );
        assert_eq!(timeline.now(), Duration::from_millis(30));
        assert!(timeline.is_empty());
    }

    #[test]
    fn tasks_beyond_the_horizon_stay_scheduled() {
        let mut timeline = Timeline::new();
        let handle = timeline.after(Duration::from_millis(50), "pending");

        assert!(drain(&mut timeline, Duration::from_millis(49)).is_empty());
        assert!(timeline.is_scheduled(handle));
        assert_eq!(timeline.next_due(), Some(Duration::from_millis(50)));
        assert_eq!(drain(&mut timeline, Duration::from_millis(1)), Vec::<&str>::new());
    }

    #[test]
    fn delays_are_relative_to_the_current_clock() {
        let mut timeline = Timeline::new();
        timeline.advance_to(Duration::from_millis(100));
        let _ = timeline.after(Duration::from_millis(5), "relative");

        assert_eq!(timeline.next_due(), Some(Duration::from_millis(105)));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut timeline = Timeline::new();
        let cancelled = timeline.after(Duration::from_millis(10), "cancelled");
        let _ = timeline.after(Duration::from_millis(20), "kept");

        assert!(timeline.cancel(cancelled));
        assert!(!timeline.cancel(cancelled), "second cancel reports unknown handle");
        assert_eq!(drain(&mut timeline, Duration::from_secs(1)), vec!["kept"]);
    }

    #[test]
    fn periodic_tasks_repeat_until_cancelled() {
        let mut timeline = Timeline::new();
        let handle = timeline.every(Duration::from_millis(300), "poll");

        assert!(drain(&mut timeline, Duration::from_millis(299)).is_empty());
        assert_eq!(
            drain(&mut timeline, Duration::from_millis(900)),
            vec!["poll", "poll", "poll"]
        );
        assert!(timeline.is_scheduled(handle));

        assert!(timeline.cancel(handle));
        assert!(drain(&mut timeline, Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn task_scheduled_while_draining_fires_in_the_same_pass() {
        let mut timeline = Timeline::new();
        let _ = timeline.after(Duration::from_millis(10), "parent");

        let mut fired = Vec::new();
        while let Some((_, task)) = timeline.pop_due(Duration::from_millis(50)) {
            if task == "parent" {
                let _ = timeline.after(Duration::from_millis(15), "child");
            }
            fired.push(task);
        }

        assert_eq!(fired, vec!["parent", "child"]);
        assert_eq!(timeline.now(), Duration::from_millis(25));
    }

    #[test]
    fn clear_keeps_the_clock() {
        let mut timeline = Timeline::new();
        let _ = timeline.after(Duration::from_millis(10), "dropped");
        timeline.advance_to(Duration::from_millis(5));
        timeline.clear();

        assert!(timeline.is_empty());
        assert_eq!(timeline.now(), Duration::from_millis(5));
        timeline.advance_to(Duration::from_millis(1));
        assert_eq!(timeline.now(), Duration::from_millis(5), "clock never rewinds");
    }
}
