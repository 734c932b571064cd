use tracing::{debug, info, warn};
use crate::clock::{Clock, SystemClock};
use crate::models::{Task, TaskDraft};
use crate::pomodoro::{PomodoroCompletion, PomodoroObserver};
use crate::recurrence::next_due_date;
use crate::storage::{self, KeyValueStore, StorageError};

/// Outcome of flipping a task's completion flag.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle {
    /// The task is now complete. `successor` is the next occurrence of a recurring task.
    Completed { task: Task, successor: Option<Task> },
    /// The task went back to pending.
    Reopened { task: Task },
}

impl Toggle {
    pub fn task(&self) -> &Task {
        match self {
            Toggle::Completed { task, .. } | Toggle::Reopened { task } => task,
        }
    }
}

/// The ordered task collection, mirrored to a [`KeyValueStore`].
///
/// Every mutation updates the in-memory list first and then rewrites the
/// whole collection. Operations on an unknown id do nothing and return `None`.
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    storage: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Hydrates the collection from `storage`, using the wall clock for ids.
    pub fn load(storage: S) -> TaskStore<S> {
        TaskStore::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: S, clock: Box<dyn Clock>) -> TaskStore<S> {
        let tasks = storage::load_tasks(&storage);
        debug!(count = tasks.len(), "task store hydrated");
        TaskStore { tasks, storage, clock }
    }

    /// All tasks in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Current time in ms, bumped past every existing id.
    ///
    /// If a stored id already sits at `u64::MAX`, falls back to the first
    /// free id at or after the current time, wrapping around to 0.
    fn next_id(&self) -> u64 {
        let now = self.clock.now_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            None => now,
            Some(max) => match max.checked_add(1) {
                Some(next) => now.max(next),
                None => {
                    warn!("task id space exhausted above the clock, reusing a free id");
                    (now..=u64::MAX)
                        .chain(0..now)
                        .find(|id| self.position(*id).is_none())
                        .unwrap_or(now)
                }
            },
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        storage::save_tasks(&mut self.storage, &self.tasks)
    }

    /// Appends a new pending task. Returns `None` if the title is blank.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Option<Task>, StorageError> {
        if draft.title.trim().is_empty() {
            debug!("rejected task with blank title");
            return Ok(None);
        }
        let task = Task::from_draft(self.next_id(), draft);
        self.tasks.push(task.clone());
        self.persist()?;
        info!(id = task.id, "task added");
        Ok(Some(task))
    }

    /// Replaces the editable fields of a task, keeping its id, completion and pomodoro count.
    pub fn update(&mut self, id: u64, draft: TaskDraft) -> Result<Option<Task>, StorageError> {
        let Some(idx) = self.position(id) else {
            debug!(id, "update of unknown task ignored");
            return Ok(None);
        };
        self.tasks[idx].apply(draft);
        let task = self.tasks[idx].clone();
        self.persist()?;
        info!(id, "task updated");
        Ok(Some(task))
    }

    /// Removes a task and returns it.
    pub fn delete(&mut self, id: u64) -> Result<Option<Task>, StorageError> {
        let Some(idx) = self.position(id) else {
            debug!(id, "delete of unknown task ignored");
            return Ok(None);
        };
        let removed = self.tasks.remove(idx);
        self.persist()?;
        info!(id, "task deleted");
        Ok(Some(removed))
    }

    /// Flips a task's completion flag.
    ///
    /// Completing a recurring task inserts its next occurrence right after it.
    /// If the next due date cannot be computed, the task is still completed
    /// and no successor is created.
    pub fn toggle_complete(&mut self, id: u64) -> Result<Option<Toggle>, StorageError> {
        let Some(idx) = self.position(id) else {
            debug!(id, "toggle of unknown task ignored");
            return Ok(None);
        };
        self.tasks[idx].completed = !self.tasks[idx].completed;
        let task = self.tasks[idx].clone();

        if !task.completed {
            self.persist()?;
            info!(id, "task reopened");
            return Ok(Some(Toggle::Reopened { task }));
        }

        let mut successor = None;
        if task.recurrence.is_recurring() {
            match next_due_date(task.due_date, task.recurrence) {
                Some(due) => {
                    let next = Task {
                        id: self.next_id(),
                        due_date: Some(due),
                        completed: false,
                        ..task.clone()
                    };
                    self.tasks.insert(idx + 1, next.clone());
                    info!(id, successor = next.id, due = %due, "recurring task rolled over");
                    successor = Some(next);
                }
                None => warn!(id, "recurring task has no usable due date, no successor created"),
            }
        }

        self.persist()?;
        info!(id, "task completed");
        Ok(Some(Toggle::Completed { task, successor }))
    }

    /// Appends a pending copy of a task with " (Copy)" added to its title.
    pub fn clone_task(&mut self, id: u64) -> Result<Option<Task>, StorageError> {
        let Some(source) = self.get(id).cloned() else {
            debug!(id, "clone of unknown task ignored");
            return Ok(None);
        };
        let copy = Task {
            id: self.next_id(),
            title: format!("{} (Copy)", source.title),
            completed: false,
            ..source
        };
        self.tasks.push(copy.clone());
        self.persist()?;
        info!(id, copy = copy.id, "task cloned");
        Ok(Some(copy))
    }

    /// Removes every completed task and returns how many went.
    pub fn clear_completed(&mut self) -> Result<usize, StorageError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        self.persist()?;
        info!(removed, "completed tasks cleared");
        Ok(removed)
    }

    /// Bumps the pomodoro counter of a task.
    pub fn record_pomodoro(&mut self, id: u64) -> Result<Option<Task>, StorageError> {
        let Some(idx) = self.position(id) else {
            debug!(id, "pomodoro for unknown task ignored");
            return Ok(None);
        };
        self.tasks[idx].pomodoro_count += 1;
        let task = self.tasks[idx].clone();
        self.persist()?;
        info!(id, count = task.pomodoro_count, "pomodoro recorded");
        Ok(Some(task))
    }

    /// Moves the task at `from` to position `to`, shifting the ones in between.
    ///
    /// Returns `false` without touching anything if either index is out of
    /// range or they are equal.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, StorageError> {
        let len = self.tasks.len();
        if from >= len || to >= len || from == to {
            debug!(from, to, len, "reorder ignored");
            return Ok(false);
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        self.persist()?;
        debug!(from, to, "task moved");
        Ok(true)
    }

    /// Moves task `active` to where task `over` currently sits.
    pub fn reorder_by_id(&mut self, active: u64, over: u64) -> Result<bool, StorageError> {
        match (self.position(active), self.position(over)) {
            (Some(from), Some(to)) => self.reorder(from, to),
            _ => Ok(false),
        }
    }

    pub fn dark_mode(&self) -> bool {
        storage::load_dark_mode(&self.storage)
    }

    pub fn set_dark_mode(&mut self, dark: bool) -> Result<(), StorageError> {
        storage::save_dark_mode(&mut self.storage, dark)
    }

    /// Drops every task and stored preference.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.tasks.clear();
        storage::delete_database(&mut self.storage)?;
        info!("store reset");
        Ok(())
    }
}

impl<S: KeyValueStore> PomodoroObserver for TaskStore<S> {
    type Error = StorageError;

    fn pomodoro_completed(&mut self, completion: &PomodoroCompletion) -> Result<(), StorageError> {
        self.record_pomodoro(completion.task_id).map(|_| ())
    }
}
