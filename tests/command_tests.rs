use std::time::Duration;
use tasklane::clock::FixedClock;
use tasklane::commands::*;
use tasklane::error::Error;
use tasklane::models::{Priority, Recurrence, TaskDraft};
use tasklane::storage::MemoryStore;
use tasklane::store::TaskStore;
use chrono::NaiveDate;

fn with_test_store<F>(f: F)
where
    F: FnOnce(&mut TaskStore<MemoryStore>),
{
    let mut store = TaskStore::with_clock(MemoryStore::new(), Box::new(FixedClock::new(1_000)));
    f(&mut store);
}

fn due(s: &str) -> NaiveDate {
    parse_due_arg(s).unwrap()
}

#[test]
fn test_add_and_list() {
    with_test_store(|store| {
        let draft = TaskDraft::new("Test Task").category("Project").due(due("2025-12-01"));
        let id = cmd_add(store, draft, true).unwrap();

        assert_eq!(id, Some(1_000));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].title, "Test Task");
        assert_eq!(store.tasks()[0].category, Some("Project".into()));
    });
}

#[test]
fn test_add_blank_title() {
    with_test_store(|store| {
        assert_eq!(cmd_add(store, TaskDraft::new(""), true).unwrap(), None);
        assert!(store.tasks().is_empty());
    });
}

#[test]
fn test_parse_due_arg() {
    assert_eq!(due("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert!(matches!(parse_due_arg("2023-02-29"), Err(Error::InvalidDate(_))));
    assert!(matches!(parse_due_arg("soon"), Err(Error::InvalidDate(_))));
}

#[test]
fn test_complete_task() {
    with_test_store(|store| {
        let id = cmd_add(store, TaskDraft::new("Task to complete"), true).unwrap().unwrap();
        cmd_toggle(store, id, true).unwrap();
        assert!(store.tasks()[0].completed);

        // Toggling again reopens it
        cmd_toggle(store, id, true).unwrap();
        assert!(!store.tasks()[0].completed);
    });
}

#[test]
fn test_recurrence() {
    with_test_store(|store| {
        let draft = TaskDraft::new("Pay rent").due(due("2024-01-31")).recurrence(Recurrence::Monthly);
        let id = cmd_add(store, draft, true).unwrap().unwrap();

        cmd_toggle(store, id, true).unwrap();

        // Should have 2 tasks: one completed, one new
        assert_eq!(store.tasks().len(), 2);
        let completed = store.tasks().iter().find(|t| t.completed).unwrap();
        let new_task = store.tasks().iter().find(|t| !t.completed).unwrap();

        assert_eq!(completed.title, "Pay rent");
        assert_eq!(new_task.title, "Pay rent");
        assert_ne!(completed.id, new_task.id);
        assert_eq!(new_task.due_date, Some(due("2024-02-29")));
    });
}

#[test]
fn test_edit_keeps_unspecified_fields() {
    with_test_store(|store| {
        let draft = TaskDraft::new("Draft").category("Work").due(due("2024-05-01")).priority(Priority::Low);
        let id = cmd_add(store, draft, true).unwrap().unwrap();

        let args = EditArgs { title: Some("Final".into()), priority: Some(Priority::High), ..EditArgs::default() };
        cmd_edit(store, id, args, true).unwrap();

        let t = store.get(id).unwrap();
        assert_eq!(t.title, "Final");
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.category.as_deref(), Some("Work"));
        assert_eq!(t.due_date, Some(due("2024-05-01")));

        cmd_edit(store, id, EditArgs { clear_due: true, ..EditArgs::default() }, true).unwrap();
        assert_eq!(store.get(id).unwrap().due_date, None);
    });
}

#[test]
fn test_missing_ids_are_reported_not_failed() {
    with_test_store(|store| {
        assert!(cmd_toggle(store, 9, true).is_ok());
        assert!(cmd_remove(store, 9, true).is_ok());
        assert_eq!(cmd_clone(store, 9, true).unwrap(), None);
        assert!(cmd_edit(store, 9, EditArgs::default(), true).is_ok());
        assert!(cmd_focus(store, 9, Duration::ZERO, true).is_ok());
        assert!(store.tasks().is_empty());
    });
}

#[test]
fn test_clone_remove_and_clear() {
    with_test_store(|store| {
        let id = cmd_add(store, TaskDraft::new("Review"), true).unwrap().unwrap();
        let copy = cmd_clone(store, id, true).unwrap().unwrap();
        assert_eq!(store.get(copy).unwrap().title, "Review (Copy)");

        cmd_toggle(store, id, true).unwrap();
        assert_eq!(cmd_clear(store, true).unwrap(), 1);
        assert_eq!(store.tasks().len(), 1);

        cmd_remove(store, copy, true).unwrap();
        assert!(store.tasks().is_empty());
    });
}

#[test]
fn test_move() {
    with_test_store(|store| {
        let a = cmd_add(store, TaskDraft::new("a"), true).unwrap().unwrap();
        let _b = cmd_add(store, TaskDraft::new("b"), true).unwrap().unwrap();
        let c = cmd_add(store, TaskDraft::new("c"), true).unwrap().unwrap();

        cmd_move(store, c, a, true).unwrap();
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    });
}

#[test]
fn test_focus_runs_to_completion() {
    with_test_store(|store| {
        let id = cmd_add(store, TaskDraft::new("Deep work"), true).unwrap().unwrap();
        cmd_focus(store, id, Duration::ZERO, true).unwrap();
        assert_eq!(store.get(id).unwrap().pomodoro_count, 1);
    });
}

#[test]
fn test_theme() {
    with_test_store(|store| {
        assert!(!cmd_theme(store, None, true).unwrap());
        assert!(cmd_theme(store, Some(ThemeChoice::Toggle), true).unwrap());
        assert!(store.dark_mode());
        assert!(!cmd_theme(store, Some(ThemeChoice::Light), true).unwrap());
        assert!(cmd_theme(store, Some(ThemeChoice::Dark), true).unwrap());
    });
}
