use crate::store::Toggle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A short confirmation shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Notification {
        Notification { kind: NotificationKind::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Notification {
        Notification { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Notification {
        Notification { kind: NotificationKind::Error, message: message.into() }
    }

    pub fn task_added(title: &str) -> Notification {
        Notification::success(format!("Task \"{}\" added successfully", title))
    }

    pub fn task_updated(title: &str) -> Notification {
        Notification::success(format!("Task \"{}\" updated successfully", title))
    }

    pub fn task_deleted(title: &str) -> Notification {
        Notification::success(format!("Task \"{}\" deleted successfully", title))
    }

    pub fn task_cloned(title: &str) -> Notification {
        Notification::success(format!("Task \"{}\" cloned successfully", title))
    }

    pub fn task_toggled(toggle: &Toggle) -> Notification {
        match toggle {
            Toggle::Completed { task, successor: Some(_) } => {
                Notification::success(format!("Task \"{}\" completed and next task created", task.title))
            }
            Toggle::Completed { task, successor: None } => {
                Notification::success(format!("Task \"{}\" completed", task.title))
            }
            Toggle::Reopened { task } => {
                Notification::success(format!("Task \"{}\" marked as incomplete", task.title))
            }
        }
    }

    pub fn completed_cleared(count: usize) -> Notification {
        Notification::success(format!("{} completed tasks cleared", count))
    }

    pub fn pomodoro_started(title: &str) -> Notification {
        Notification::info(format!("Starting Pomodoro for \"{}\"", title))
    }

    pub fn pomodoro_completed(title: &str) -> Notification {
        Notification::success(format!("Pomodoro completed for \"{}\"", title))
    }

    pub fn pomodoro_stopped(title: &str) -> Notification {
        Notification::info(format!("Pomodoro for \"{}\" stopped", title))
    }
}
