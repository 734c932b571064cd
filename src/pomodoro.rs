//! Single-slot focus timer bound to one task.
//!
//! The session does not schedule anything itself: its host calls
//! [`PomodoroSession::tick`] once per elapsed second while
//! [`PomodoroSession::is_ticking`] holds, and stops calling it otherwise.

use crate::models::Task;

/// Length of one focus session.
pub const POMODORO_SECONDS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Transient: held only while the observer is notified, then back to `Idle`.
    Completed,
}

/// The task a session is running against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTask {
    pub id: u64,
    pub title: String,
}

/// Emitted when a session runs out naturally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroCompletion {
    pub task_id: u64,
    pub title: String,
}

/// Receives natural session completions. Cancelled sessions are never reported.
pub trait PomodoroObserver {
    type Error;

    fn pomodoro_completed(&mut self, completion: &PomodoroCompletion) -> Result<(), Self::Error>;
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing happened.
    Inactive,
    /// One second elapsed, this many remain.
    Running { remaining: u32 },
    /// The session finished and the observer was told.
    Completed(PomodoroCompletion),
}

#[derive(Debug, Clone)]
pub struct PomodoroSession {
    state: SessionState,
    remaining: u32,
    bound: Option<BoundTask>,
}

impl Default for PomodoroSession {
    fn default() -> Self {
        PomodoroSession {
            state: SessionState::Idle,
            remaining: POMODORO_SECONDS,
            bound: None,
        }
    }
}

impl PomodoroSession {
    pub fn new() -> PomodoroSession {
        PomodoroSession::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn bound_task(&self) -> Option<&BoundTask> {
        self.bound.as_ref()
    }

    /// Whether the host should keep its one-second tick scheduled.
    pub fn is_ticking(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Binds the session to `task` and starts a full countdown, replacing any
    /// previous binding.
    pub fn start(&mut self, task: &Task) {
        if let Some(previous) = &self.bound {
            tracing::debug!(previous = previous.id, next = task.id, "replacing pomodoro binding");
        }
        self.bound = Some(BoundTask { id: task.id, title: task.title.clone() });
        self.remaining = POMODORO_SECONDS;
        self.state = SessionState::Running;
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.state = SessionState::Running;
        true
    }

    /// Cancels the session without crediting the task. Returns the binding
    /// that was dropped, if any.
    pub fn stop(&mut self) -> Option<BoundTask> {
        let bound = self.bound.take();
        self.reset();
        bound
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.remaining = POMODORO_SECONDS;
        self.bound = None;
    }

    /// Advances the countdown by one second.
    ///
    /// On reaching zero the observer is credited and the session returns to
    /// `Idle` with no binding, whether or not the observer succeeded.
    pub fn tick<O: PomodoroObserver>(&mut self, observer: &mut O) -> Result<Tick, O::Error> {
        if self.state != SessionState::Running {
            return Ok(Tick::Inactive);
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Ok(Tick::Running { remaining: self.remaining });
        }

        self.state = SessionState::Completed;
        let Some(bound) = self.bound.take() else {
            self.reset();
            return Ok(Tick::Inactive);
        };
        let completion = PomodoroCompletion { task_id: bound.id, title: bound.title };
        let credited = observer.pomodoro_completed(&completion);
        self.reset();
        credited?;
        Ok(Tick::Completed(completion))
    }

    /// Remaining time as `m:ss`.
    pub fn clock_face(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
