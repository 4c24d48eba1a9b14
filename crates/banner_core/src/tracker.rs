//! Per-key status slots for generation tasks.
//!
//! Every started task receives a ticket carrying a generation number drawn
//! from one monotonic counter. Completions and revert timers present their
//! ticket; anything that no longer matches the slot is stale and ignored.

use std::collections::HashMap;

use shared::domain::{TaskKey, TaskStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTicket {
    pub key: TaskKey,
    pub generation: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("a {0} task is already running")]
    AlreadyRunning(TaskKey),
}

#[derive(Debug, Clone, Copy)]
struct TaskSlot {
    status: TaskStatus,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct GenerationTracker {
    slots: HashMap<TaskKey, TaskSlot>,
    last_generation: u64,
}

impl GenerationTracker {
    pub fn status(&self, key: &TaskKey) -> TaskStatus {
        self.slots
            .get(key)
            .map(|slot| slot.status)
            .unwrap_or_default()
    }

    /// Start a task for `key`. A task still running for the same key is not
    /// superseded; the new invocation is rejected instead.
    pub fn begin(&mut self, key: TaskKey) -> Result<TaskTicket, TrackerError> {
        if self.status(&key) == TaskStatus::Running {
            return Err(TrackerError::AlreadyRunning(key));
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        self.slots.insert(
            key.clone(),
            TaskSlot {
                status: TaskStatus::Running,
                generation,
            },
        );
        Ok(TaskTicket { key, generation })
    }

    pub fn is_current(&self, ticket: &TaskTicket) -> bool {
        self.slots
            .get(&ticket.key)
            .is_some_and(|slot| slot.generation == ticket.generation)
    }

    /// Record a terminal status. Returns `false` for stale tickets or tasks
    /// that are not running.
    pub fn finish(&mut self, ticket: &TaskTicket, status: TaskStatus) -> bool {
        debug_assert!(status.is_terminal());
        match self.slots.get_mut(&ticket.key) {
            Some(slot)
                if slot.generation == ticket.generation && slot.status == TaskStatus::Running =>
            {
                slot.status = status;
                true
            }
            _ => false,
        }
    }

    /// Return a terminal slot to idle, dropping it from the map.
    pub fn revert(&mut self, ticket: &TaskTicket) -> bool {
        let matches = self.slots.get(&ticket.key).is_some_and(|slot| {
            slot.generation == ticket.generation && slot.status.is_terminal()
        });
        if matches {
            self.slots.remove(&ticket.key);
        }
        matches
    }

    /// All non-idle slots.
    pub fn active(&self) -> Vec<(TaskKey, TaskStatus)> {
        let mut active: Vec<_> = self
            .slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.status))
            .collect();
        active.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));
        active
    }
}
