//! Deferred work.
//!
//! The player never sleeps or spawns. When it needs something to happen
//! later (restarting after a loop intermission) it queues a
//! [`ScheduledTask`]; the host takes it with `Player::take_scheduled`, waits
//! `delay_ms` on its own clock and hands it back to `Player::run_scheduled`.
//! The generation stamp lets the player drop tasks that outlived a reload or
//! destroy.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Task {
    /// Restart playback after a loop boundary.
    Resume,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub delay_ms: u32,
    pub task: Task,
    pub generation: u64,
}

/// Virtual clock for hosts without an event loop of their own, and tests.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    pending: Vec<(u64, u64, ScheduledTask)>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn push(&mut self, task: ScheduledTask) {
        let due = self.now_ms + u64::from(task.delay_ms);
        self.pending.push((due, self.seq, task));
        self.seq += 1;
    }

    pub fn extend(&mut self, tasks: impl IntoIterator<Item = ScheduledTask>) {
        for task in tasks {
            self.push(task);
        }
    }

    /// Move the clock forward and return every task now due, earliest first.
    pub fn advance(&mut self, ms: u64) -> Vec<ScheduledTask> {
        self.now_ms += ms;
        let now = self.now_ms;
        let mut due: Vec<_> = Vec::new();
        self.pending.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, task)| task).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
