#![forbid(unsafe_code)]

//! Host-driven task scheduler.
//!
//! The host (a `requestAnimationFrame` loop in the browser, a loop of fixed
//! timestamps in tests) owns real time and pushes it in through
//! [`Scheduler::advance_to`]. Components register tasks and get a [`TaskId`]
//! back; they never hand closures to the scheduler. Each call to
//! `advance_to` returns the [`Wakeup`]s that became due, and the owner routes
//! each one to whichever component holds that id.
//!
//! # Invariants
//!
//! 1. The clock is monotonic: timestamps earlier than the current time are
//!    clamped to it.
//! 2. A frame task fires exactly once, on the first `advance_to` after it
//!    was requested (the `requestAnimationFrame` contract).
//! 3. A timeout fires exactly once, on the first `advance_to` at or past
//!    its due time.
//! 4. An interval fires once per elapsed period, stamped with the period's
//!    due time, until cancelled. Catch-up after a long stall is bounded by
//!    [`MAX_INTERVAL_CATCH_UP`]; later periods are skipped, not queued.
//! 5. Wakeups are ordered by due time; at equal times timers precede frames,
//!    then registration order.
//! 6. After [`Scheduler::cancel`] no further wakeup is produced for that id.

use std::collections::BTreeMap;
use std::time::Duration;

/// Upper bound on interval wakeups produced for one task in one advance.
pub const MAX_INTERVAL_CATCH_UP: u32 = 64;

/// Shortest interval period accepted; shorter requests are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Raw numeric id (stable for the scheduler's lifetime).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What kind of task produced a wakeup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Next display repaint.
    Frame,
    /// One-shot timer.
    Timeout,
    /// Repeating timer.
    Interval,
}

impl TaskKind {
    const fn order(self) -> u8 {
        match self {
            Self::Timeout | Self::Interval => 0,
            Self::Frame => 1,
        }
    }
}

/// A due task handed back to the host for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Time the task was due. For frames this is the frame timestamp.
    pub at: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    kind: TaskKind,
    due: Duration,
    period: Duration,
}

/// Deterministic scheduler for frame callbacks and coarse timers.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    frame_idx: u64,
    tasks: BTreeMap<TaskId, Task>,
}

impl Scheduler {
    /// Create a scheduler whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler whose clock starts at `now`.
    #[must_use]
    pub fn starting_at(now: Duration) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of `advance_to` calls so far.
    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    fn insert(&mut self, kind: TaskKind, due: Duration, period: Duration) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.insert(id, Task { kind, due, period });
        id
    }

    /// Ask for a wakeup on the next repaint.
    pub fn request_frame(&mut self) -> TaskId {
        self.insert(TaskKind::Frame, self.now, Duration::ZERO)
    }

    /// Fire once, `delay` from now.
    pub fn set_timeout(&mut self, delay: Duration) -> TaskId {
        self.insert(TaskKind::Timeout, self.now.saturating_add(delay), Duration::ZERO)
    }

    /// Fire every `period`, first at `now + period`.
    pub fn set_interval(&mut self, period: Duration) -> TaskId {
        let period = period.max(MIN_INTERVAL);
        self.insert(TaskKind::Interval, self.now.saturating_add(period), period)
    }

    /// Cancel a task. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Whether `id` is still registered.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Move the clock to `now` and collect every task that became due.
    pub fn advance_to(&mut self, now: Duration) -> Vec<Wakeup> {
        self.now = self.now.max(now);
        self.frame_idx += 1;
        let now = self.now;

        let mut due = Vec::new();
        let mut finished = Vec::new();

        for (&id, task) in &mut self.tasks {
            match task.kind {
                TaskKind::Frame => {
                    due.push(Wakeup {
                        id,
                        kind: TaskKind::Frame,
                        at: now,
                    });
                    finished.push(id);
                }
                TaskKind::Timeout => {
                    if task.due <= now {
                        due.push(Wakeup {
                            id,
                            kind: TaskKind::Timeout,
                            at: task.due,
                        });
                        finished.push(id);
                    }
                }
                TaskKind::Interval => {
                    let mut fired = 0;
                    while task.due <= now && fired < MAX_INTERVAL_CATCH_UP {
                        due.push(Wakeup {
                            id,
                            kind: TaskKind::Interval,
                            at: task.due,
                        });
                        task.due = task.due.saturating_add(task.period);
                        fired += 1;
                    }
                    if task.due <= now {
                        // Stalled far past the cap: realign to the next
                        // period boundary after `now`.
                        let behind = now.saturating_sub(task.due).as_nanos();
                        let period = task.period.as_nanos().max(1);
                        let skip = (behind / period + 1) as u32;
                        task.due = task.due.saturating_add(task.period.saturating_mul(skip));
                        tracing::debug!(
                            task = id.get(),
                            skipped = skip,
                            "interval catch-up capped"
                        );
                    }
                }
            }
        }

        for id in finished {
            self.tasks.remove(&id);
        }

        due.sort_by(|a, b| {
            a.at.cmp(&b.at)
                .then(a.kind.order().cmp(&b.kind.order()))
                .then(a.id.cmp(&b.id))
        });
        due
    }
}
