//! Authoritative in-memory task collection for one open board.

use crate::board::domain::{Task, TaskId};
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of the board's tasks at one revision.
///
/// Cloning is cheap; the task list is shared until the next mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    tasks: Arc<Vec<Task>>,
    revision: u64,
}

impl BoardSnapshot {
    /// Returns the tasks in board order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the task with `id`, if present.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns whether a task with `id` is present.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the revision, incremented by every effective mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Single source of truth for a board's tasks.
///
/// All mutations go through one [`watch`] channel, so they are serialized
/// and every effective mutation wakes the receivers returned by
/// [`BoardStore::subscribe`]. Mutations that would not change the snapshot
/// leave the revision alone and wake nobody. Cloning yields another handle
/// to the same store.
#[derive(Debug, Clone)]
pub struct BoardStore {
    state: Arc<watch::Sender<BoardSnapshot>>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(BoardSnapshot::default());
        Self {
            state: Arc::new(sender),
        }
    }

    /// Replaces the whole collection. Later duplicates of an id are
    /// dropped.
    pub fn load(&self, tasks: impl IntoIterator<Item = Task>) {
        let mut loaded: Vec<Task> = Vec::new();
        for task in tasks {
            if !loaded.iter().any(|existing| existing.id() == task.id()) {
                loaded.push(task);
            }
        }
        self.state.send_modify(|snapshot| {
            snapshot.tasks = Arc::new(loaded);
            snapshot.revision += 1;
        });
    }

    /// Appends `task` unless its id is already present.
    ///
    /// Returns whether the snapshot changed.
    pub fn insert(&self, task: Task) -> bool {
        self.state.send_if_modified(|snapshot| {
            if snapshot.contains(task.id()) {
                return false;
            }
            Arc::make_mut(&mut snapshot.tasks).push(task);
            snapshot.revision += 1;
            true
        })
    }

    /// Upserts by id: appends when absent, replaces the whole record in
    /// place when present.
    ///
    /// Returns whether the snapshot changed.
    pub fn replace(&self, task: Task) -> bool {
        self.state.send_if_modified(|snapshot| {
            let existing = snapshot.tasks.iter().position(|stored| stored.id() == task.id());
            match existing {
                Some(index) if snapshot.tasks.get(index) == Some(&task) => false,
                Some(index) => {
                    if let Some(slot) = Arc::make_mut(&mut snapshot.tasks).get_mut(index) {
                        *slot = task;
                    }
                    snapshot.revision += 1;
                    true
                }
                None => {
                    Arc::make_mut(&mut snapshot.tasks).push(task);
                    snapshot.revision += 1;
                    true
                }
            }
        })
    }

    /// Replaces the stored record for `task`'s id, which must already be
    /// on the board.
    ///
    /// Returns the snapshot taken just before the write and the revision
    /// just after it, both read under the same lock. Returns `None`, and
    /// writes nothing, when the task is absent.
    pub fn stage(&self, task: Task) -> Option<(BoardSnapshot, u64)> {
        let mut staged = None;
        self.state.send_if_modified(|snapshot| {
            let Some(index) = snapshot.tasks.iter().position(|stored| stored.id() == task.id())
            else {
                return false;
            };
            let previous = snapshot.clone();
            let changed = snapshot.tasks.get(index) != Some(&task);
            if changed {
                if let Some(slot) = Arc::make_mut(&mut snapshot.tasks).get_mut(index) {
                    *slot = task;
                }
                snapshot.revision += 1;
            }
            staged = Some((previous, snapshot.revision));
            changed
        });
        staged
    }

    /// Puts `previous`'s tasks back, but only while the store is still at
    /// `revision`.
    ///
    /// Returns whether the tasks were restored.
    pub fn restore(&self, previous: &BoardSnapshot, revision: u64) -> bool {
        self.state.send_if_modified(|snapshot| {
            if snapshot.revision != revision {
                return false;
            }
            snapshot.tasks = Arc::clone(&previous.tasks);
            snapshot.revision += 1;
            true
        })
    }

    /// Replaces the stored record with `task` only while it still equals
    /// `expected`.
    ///
    /// Returns whether the snapshot changed.
    pub fn replace_if_unchanged(&self, expected: &Task, task: Task) -> bool {
        self.state.send_if_modified(|snapshot| {
            let Some(index) = snapshot.tasks.iter().position(|stored| stored == expected) else {
                return false;
            };
            if expected == &task {
                return false;
            }
            if let Some(slot) = Arc::make_mut(&mut snapshot.tasks).get_mut(index) {
                *slot = task;
            }
            snapshot.revision += 1;
            true
        })
    }

    /// Removes the task with `id`. Absent ids are a no-op.
    ///
    /// Returns whether the snapshot changed.
    pub fn remove(&self, id: TaskId) -> bool {
        self.state.send_if_modified(|snapshot| {
            if !snapshot.contains(id) {
                return false;
            }
            Arc::make_mut(&mut snapshot.tasks).retain(|task| task.id() != id);
            snapshot.revision += 1;
            true
        })
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.borrow().clone()
    }

    /// Returns a copy of the task with `id`, if present.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.state.borrow().get(id).cloned()
    }

    /// Returns a receiver that is notified after every effective mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.state.subscribe()
    }
}
