//! Cooperative single-shot timer queue.
//!
//! Nothing here runs by itself: the host advances the clock and the game
//! dispatches whatever became due.  Repeating behaviour is a task re-arming
//! itself.  There is no way to dequeue a task; owners invalidate armed
//! tasks by bumping the [`Generation`] the task captured.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Token captured by a task when it is armed.  A task whose token no longer
/// equals its owner's current token must do nothing and must not re-arm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Raw counter, for assertions in tests.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Everything that can be scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// The fixed-cadence update loop.  Never cancelled.
    Tick,
    /// Ship movement step while a direction key is held.
    ShipStep,
    /// Auto-fire while the fire key is held.
    ShootRepeat { generation: Generation },
    SwarmMove { generation: Generation },
    SwarmShoot { generation: Generation },
    BossMove { generation: Generation },
    BossAppearance,
    /// End of the "LEVEL n" pause.
    ResumeLevel { session: Generation },
    /// End of the "PLAYER 2 TURN" pause.
    StartSecondTurn { session: Generation },
    /// Take down the "1UP" marker.
    ClearBonusLife { generation: Generation },
}

#[derive(Debug)]
struct Armed {
    due_ms: u64,
    seq: u64,
    task: Task,
}

impl PartialEq for Armed {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Armed {}

impl PartialOrd for Armed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Armed {
    // Reversed so the max-heap pops the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due_ms, other.seq).cmp(&(self.due_ms, self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Armed>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm `task` to fire `delay_ms` after the current clock.
    pub fn after(&mut self, delay_ms: u64, task: Task) {
        let armed = Armed {
            due_ms: self.now_ms + delay_ms,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(armed);
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock
    /// to its due time.  Tasks due at the same instant pop in arm order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Task> {
        match self.queue.peek() {
            Some(next) if next.due_ms <= until_ms => {}
            _ => return None,
        }
        let armed = self.queue.pop()?;
        self.now_ms = self.now_ms.max(armed.due_ms);
        Some(armed.task)
    }

    /// Move the clock forward once every due task has been taken.
    pub fn settle(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Number of armed tasks, stale ones included.  Mostly useful in tests.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of armed tasks equal to `task`.  Mostly useful in tests.
    pub fn count(&self, task: Task) -> usize {
        self.queue.iter().filter(|a| a.task == task).count()
    }

    /// Whether any armed task matches `pred`.  Mostly useful in tests.
    pub fn contains(&self, pred: impl Fn(&Task) -> bool) -> bool {
        self.queue.iter().any(|a| pred(&a.task))
    }
}
