use chrono::{DateTime, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// How urgent a task is.
///
/// Declaration order is urgency order, so the derived `Ord` puts `High` first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Recurrence rule applied when a task is completed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn label(self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }
}

/// Represents a single task in the task manager.
///
/// Field names are camelCase on disk so the stored layout stays
/// `{ id, title, description, category, dueDate, priority, recurrence, completed, pomodoroCount }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, the creation timestamp in milliseconds.
    pub id: u64,
    /// Short title shown in every listing.
    pub title: String,
    /// Optional longer description.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional free-form category, used for analytics grouping.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Calendar due date, if any.
    #[serde(default, deserialize_with = "lenient_due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub completed: bool,
    /// Number of focus sessions run to completion on this task.
    #[serde(default)]
    pub pomodoro_count: u32,
}

impl Task {
    /// Builds a fresh, pending task from a draft.
    pub fn from_draft(id: u64, draft: TaskDraft) -> Task {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            due_date: draft.due_date,
            priority: draft.priority,
            recurrence: draft.recurrence,
            completed: false,
            pomodoro_count: 0,
        }
    }

    /// Overwrites the editable fields, leaving id, completion and pomodoro count alone.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.category = draft.category;
        self.due_date = draft.due_date;
        self.priority = draft.priority;
        self.recurrence = draft.recurrence;
    }

    /// The editable fields of this task, as a draft.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            due_date: self.due_date,
            priority: self.priority,
            recurrence: self.recurrence,
        }
    }
}

/// User-supplied fields for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub recurrence: Recurrence,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            ..TaskDraft::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> TaskDraft {
        self.description = non_blank(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> TaskDraft {
        self.category = non_blank(category.into());
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> TaskDraft {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> TaskDraft {
        self.priority = priority;
        self
    }

    pub fn recurrence(mut self, recurrence: Recurrence) -> TaskDraft {
        self.recurrence = recurrence;
        self
    }
}

/// Parses a due date as entered by a user or found on disk.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (keeping their calendar date).
/// Blank or unparseable input yields `None`.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Returns `None` for strings that are empty after trimming.
pub fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(non_blank))
}

fn lenient_due_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let parsed = parse_due_date(&raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        tracing::warn!(value = %raw, "discarding unparseable due date");
    }
    Ok(parsed)
}
