use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::error::{Error, Result};
use crate::models::{parse_due_date, Priority, Recurrence, Task, TaskDraft};
use crate::notification::Notification;
use crate::pomodoro::{PomodoroSession, Tick};
use crate::projection::{analytics, view, FilterMode, SortKey};
use crate::storage::KeyValueStore;
use crate::store::TaskStore;

/// Optional field overrides for `edit`.
#[derive(Debug, Default, Clone)]
pub struct EditArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due: Option<NaiveDate>,
    pub clear_due: bool,
    pub priority: Option<Priority>,
    pub recurrence: Option<Recurrence>,
}

/// Theme change requested by `theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
    Toggle,
}

/// Parses a `--due` argument.
pub fn parse_due_arg(raw: &str) -> Result<NaiveDate> {
    parse_due_date(raw).ok_or_else(|| Error::InvalidDate(raw.to_string()))
}

fn announce(notification: Notification, silent: bool) {
    if !silent {
        println!("{}", notification.message);
    }
}

fn not_found(id: u64, silent: bool) {
    if !silent {
        eprintln!("Task {} not found.", id);
    }
}

/// Adds a new task. Blank titles are refused.
pub fn cmd_add<S: KeyValueStore>(store: &mut TaskStore<S>, draft: TaskDraft, silent: bool) -> Result<Option<u64>> {
    match store.add(draft)? {
        Some(task) => {
            announce(Notification::task_added(&task.title), silent);
            if !silent {
                println!("Task added (id = {})", task.id);
            }
            Ok(Some(task.id))
        }
        None => {
            if !silent {
                eprintln!("Task title cannot be empty.");
            }
            Ok(None)
        }
    }
}

/// Edits an existing task's details, keeping fields that were not given.
pub fn cmd_edit<S: KeyValueStore>(store: &mut TaskStore<S>, id: u64, args: EditArgs, silent: bool) -> Result<()> {
    let Some(current) = store.get(id) else {
        not_found(id, silent);
        return Ok(());
    };
    let mut draft = current.to_draft();
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft = draft.description(description);
    }
    if let Some(category) = args.category {
        draft = draft.category(category);
    }
    if let Some(due) = args.due {
        draft.due_date = Some(due);
    }
    if args.clear_due {
        draft.due_date = None;
    }
    if let Some(priority) = args.priority {
        draft.priority = priority;
    }
    if let Some(recurrence) = args.recurrence {
        draft.recurrence = recurrence;
    }
    if let Some(task) = store.update(id, draft)? {
        announce(Notification::task_updated(&task.title), silent);
    }
    Ok(())
}

/// Toggles a task between done and pending.
///
/// Completing a recurring task schedules its next occurrence.
pub fn cmd_toggle<S: KeyValueStore>(store: &mut TaskStore<S>, id: u64, silent: bool) -> Result<()> {
    match store.toggle_complete(id)? {
        Some(toggle) => {
            announce(Notification::task_toggled(&toggle), silent);
            if let crate::store::Toggle::Completed { successor: Some(next), .. } = &toggle {
                if !silent {
                    println!("Next occurrence (id = {}) due on {}", next.id, format_due(next));
                }
            }
        }
        None => not_found(id, silent),
    }
    Ok(())
}

/// Removes a task by ID.
pub fn cmd_remove<S: KeyValueStore>(store: &mut TaskStore<S>, id: u64, silent: bool) -> Result<()> {
    match store.delete(id)? {
        Some(task) => announce(Notification::task_deleted(&task.title), silent),
        None => not_found(id, silent),
    }
    Ok(())
}

pub fn cmd_clone<S: KeyValueStore>(store: &mut TaskStore<S>, id: u64, silent: bool) -> Result<Option<u64>> {
    match store.get(id).map(|t| t.title.clone()) {
        Some(title) => {
            let copy = store.clone_task(id)?;
            announce(Notification::task_cloned(&title), silent);
            Ok(copy.map(|t| t.id))
        }
        None => {
            not_found(id, silent);
            Ok(None)
        }
    }
}

/// Removes all completed tasks.
pub fn cmd_clear<S: KeyValueStore>(store: &mut TaskStore<S>, silent: bool) -> Result<usize> {
    let removed = store.clear_completed()?;
    announce(Notification::completed_cleared(removed), silent);
    Ok(removed)
}

/// Moves task `id` to the position currently held by `target`.
pub fn cmd_move<S: KeyValueStore>(store: &mut TaskStore<S>, id: u64, target: u64, silent: bool) -> Result<()> {
    if store.reorder_by_id(id, target)? {
        if !silent {
            println!("Task {} moved to the position of task {}.", id, target);
        }
    } else if !silent {
        eprintln!("Nothing to move: check both ids.");
    }
    Ok(())
}

/// Runs a focus session on a task in the foreground, one tick per `interval`.
///
/// Interrupting the process cancels the session without crediting the task.
pub fn cmd_focus<S: KeyValueStore>(store: &mut TaskStore<S>, id: u64, interval: Duration, silent: bool) -> Result<()> {
    let Some(task) = store.get(id).cloned() else {
        not_found(id, silent);
        return Ok(());
    };
    let mut session = PomodoroSession::new();
    session.start(&task);
    announce(Notification::pomodoro_started(&task.title), silent);

    while session.is_ticking() {
        thread::sleep(interval);
        match session.tick(store)? {
            Tick::Running { .. } => {
                if !silent {
                    print!("\r{} ", session.clock_face());
                    io::stdout().flush()?;
                }
            }
            Tick::Completed(done) => {
                if !silent {
                    println!();
                }
                announce(Notification::pomodoro_completed(&done.title), silent);
            }
            Tick::Inactive => break,
        }
    }
    Ok(())
}

fn format_due(task: &Task) -> String {
    task.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

/// Lists tasks in a formatted table.
pub fn cmd_list<S: KeyValueStore>(store: &TaskStore<S>, filter: FilterMode, sort: SortKey) {
    let tasks = view(store.tasks(), filter, sort);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Repeats").add_attribute(Attribute::Bold),
            Cell::new("Pomodoros").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let today = Local::now().date_naive();

    for t in tasks {
        let overdue = !t.completed && t.due_date.is_some_and(|d| d < today);
        let status = if t.completed { "Done" } else { "Pending" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };
        let repeats = if t.recurrence.is_recurring() { t.recurrence.label() } else { "" };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.category.clone().unwrap_or_default()),
            Cell::new(t.priority.label()).fg(priority_color(t.priority)),
            Cell::new(format_due(t)).fg(if overdue { Color::Red } else { Color::Reset }),
            Cell::new(repeats),
            Cell::new(t.pomodoro_count),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Prints the analytics dashboard.
pub fn cmd_stats<S: KeyValueStore>(store: &TaskStore<S>) {
    let stats = analytics(store.tasks());
    println!(
        "{} of {} tasks completed ({:.1}%) - {} pomodoros in total",
        stats.completed, stats.total, stats.completion_rate, stats.total_pomodoros
    );

    let mut by_priority = Table::new();
    by_priority.load_preset(UTF8_FULL).set_header(vec!["Priority", "Completed"]);
    for p in [Priority::Low, Priority::Medium, Priority::High] {
        by_priority.add_row(vec![
            Cell::new(p.label()).fg(priority_color(p)),
            Cell::new(stats.completed_by_priority.get(p)),
        ]);
    }
    println!("{by_priority}");

    if !stats.completed_by_category.is_empty() {
        let mut by_category = Table::new();
        by_category.load_preset(UTF8_FULL).set_header(vec!["Category", "Completed"]);
        for (category, count) in &stats.completed_by_category {
            by_category.add_row(vec![Cell::new(category), Cell::new(count)]);
        }
        println!("{by_category}");
    }

    if !stats.top_focus.is_empty() {
        let mut focus = Table::new();
        focus.load_preset(UTF8_FULL).set_header(vec!["Task", "Pomodoros"]);
        for entry in &stats.top_focus {
            focus.add_row(vec![Cell::new(&entry.title), Cell::new(entry.pomodoros)]);
        }
        println!("{focus}");
    }
}

/// Shows or changes the dark-mode preference. Returns the resulting setting.
pub fn cmd_theme<S: KeyValueStore>(store: &mut TaskStore<S>, choice: Option<ThemeChoice>, silent: bool) -> Result<bool> {
    let dark = match choice {
        None => store.dark_mode(),
        Some(ThemeChoice::Dark) => true,
        Some(ThemeChoice::Light) => false,
        Some(ThemeChoice::Toggle) => !store.dark_mode(),
    };
    if choice.is_some() {
        store.set_dark_mode(dark)?;
    }
    if !silent {
        println!("Theme: {}", if dark { "dark" } else { "light" });
    }
    Ok(dark)
}

/// Deletes all tasks and preferences, asking first unless `force` is set.
pub fn cmd_reset<S: KeyValueStore>(store: &mut TaskStore<S>, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    store.reset()?;
    println!("Database reset successfully.");
    Ok(())
}
