//! Per-key settle timers with cancel-and-replace semantics.
//!
//! Each key owns at most one pending entry. Scheduling a key again replaces
//! its entry and hands out a fresh [`Ticket`]; older tickets for that key can
//! no longer fire. Time is a caller-supplied `Duration` measured from any
//! fixed origin, so the scheduler runs the same under a real clock, a test
//! clock, or a JavaScript timestamp.
//!
//! # Example
//!
//! ```
//! use card_input::debounce::Debouncer;
//! use std::time::Duration;
//!
//! let delay = Duration::from_millis(300);
//! let mut debouncer = Debouncer::new();
//!
//! let first = debouncer.schedule("number", Duration::ZERO, delay);
//! let second = debouncer.schedule("number", Duration::from_millis(100), delay);
//!
//! assert!(debouncer.due(Duration::from_millis(350)).is_empty());
//! assert_eq!(debouncer.due(Duration::from_millis(400)), vec!["number"]);
//! assert!(!debouncer.fire("number", first));
//! assert!(!debouncer.fire("number", second));
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Identifies one scheduled settle; only the latest ticket of a key can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Duration,
    ticket: Ticket,
}

/// Pending settle timers keyed by `K`.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    pending: HashMap<K, Pending>,
    next_ticket: u64,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> Debouncer<K> {
    /// Creates an empty debouncer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `key` to settle `delay` after `now`, replacing any pending entry.
    pub fn schedule(&mut self, key: K, now: Duration, delay: Duration) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.pending.insert(
            key,
            Pending {
                deadline: now.saturating_add(delay),
                ticket,
            },
        );
        ticket
    }

    /// Cancels the pending entry for `key`. Returns true if one existed.
    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Cancels every pending entry.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Returns true if `key` has a pending entry.
    #[inline]
    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    /// Returns true if nothing is pending.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Removes and returns every key whose deadline is at or before `now`,
    /// ordered by deadline (ties broken by key order).
    pub fn due(&mut self, now: Duration) -> Vec<K> {
        let mut expired: Vec<(Duration, K)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(&k, p)| (p.deadline, k))
            .collect();
        expired.sort();

        for (_, key) in &expired {
            self.pending.remove(key);
        }
        expired.into_iter().map(|(_, k)| k).collect()
    }

    /// Consumes `key`'s pending entry if `ticket` is its current ticket.
    ///
    /// External timer drivers call this when their timer elapses; a stale
    /// ticket returns false and leaves the newer entry in place.
    pub fn fire(&mut self, key: K, ticket: Ticket) -> bool {
        match self.pending.get(&key) {
            Some(p) if p.ticket == ticket => {
                self.pending.remove(&key);
                true
            }
            _ => false,
        }
    }
}
