use std::collections::BTreeMap;
use chrono::NaiveDate;
use clap::ValueEnum;
use crate::models::{Priority, Task};

/// How many tasks the focus ranking keeps.
pub const TOP_FOCUS_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    #[default]
    All,
    Pending,
    Completed,
}

impl FilterMode {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Pending => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }

    /// The next mode in All -> Pending -> Completed order.
    pub fn cycle(self) -> FilterMode {
        match self {
            FilterMode::All => FilterMode::Pending,
            FilterMode::Pending => FilterMode::Completed,
            FilterMode::Completed => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Pending => "Pending",
            FilterMode::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Earliest due date first; tasks without one count as 1970-01-01.
    #[default]
    #[value(name = "due")]
    DueDate,
    /// High, then medium, then low.
    Priority,
    /// Newest first.
    Created,
    /// Store order, as arranged by manual reordering.
    Manual,
}

impl SortKey {
    pub fn cycle(self) -> SortKey {
        match self {
            SortKey::DueDate => SortKey::Priority,
            SortKey::Priority => SortKey::Created,
            SortKey::Created => SortKey::Manual,
            SortKey::Manual => SortKey::DueDate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::DueDate => "Due Date",
            SortKey::Priority => "Priority",
            SortKey::Created => "Creation Date",
            SortKey::Manual => "Manual",
        }
    }
}

pub fn filter(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|t| mode.matches(t)).collect()
}

/// Sorts in place. The sort is stable, so equal keys keep their current order.
pub fn sort(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::DueDate => tasks.sort_by_key(|t| due_or_epoch(t)),
        SortKey::Priority => tasks.sort_by_key(|t| t.priority),
        SortKey::Created => tasks.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::Manual => {}
    }
}

/// Filtered and sorted view of `tasks`.
pub fn view(tasks: &[Task], mode: FilterMode, key: SortKey) -> Vec<&Task> {
    let mut visible = filter(tasks, mode);
    sort(&mut visible, key);
    visible
}

fn due_or_epoch(task: &Task) -> NaiveDate {
    // NaiveDate's default is 1970-01-01.
    task.due_date.unwrap_or_default()
}

/// Completed-task counts per priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// A task's place in the focus ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEntry {
    pub id: u64,
    pub title: String,
    pub pomodoros: u32,
}

/// Aggregates for the analytics dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total: usize,
    pub completed: usize,
    /// Percentage of tasks completed, `0.0` for an empty collection.
    pub completion_rate: f64,
    pub completed_by_priority: PriorityCounts,
    /// Completed tasks per category; uncategorized tasks are left out.
    pub completed_by_category: BTreeMap<String, usize>,
    pub total_pomodoros: u32,
    /// Up to [`TOP_FOCUS_LIMIT`] tasks with at least one pomodoro, most first.
    pub top_focus: Vec<FocusEntry>,
}

pub fn analytics(tasks: &[Task]) -> Analytics {
    let mut completed = 0;
    let mut completed_by_priority = PriorityCounts::default();
    let mut completed_by_category = BTreeMap::new();
    for t in tasks.iter().filter(|t| t.completed) {
        completed += 1;
        completed_by_priority.bump(t.priority);
        if let Some(category) = &t.category {
            *completed_by_category.entry(category.clone()).or_insert(0) += 1;
        }
    }

    let total = tasks.len();
    let completion_rate = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    let mut top_focus: Vec<FocusEntry> = tasks
        .iter()
        .filter(|t| t.pomodoro_count > 0)
        .map(|t| FocusEntry { id: t.id, title: t.title.clone(), pomodoros: t.pomodoro_count })
        .collect();
    top_focus.sort_by(|a, b| b.pomodoros.cmp(&a.pomodoros));
    top_focus.truncate(TOP_FOCUS_LIMIT);

    Analytics {
        total,
        completed,
        completion_rate,
        completed_by_priority,
        completed_by_category,
        total_pomodoros: tasks.iter().map(|t| t.pomodoro_count).sum(),
        top_focus,
    }
}
