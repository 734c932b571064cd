use tasklane::clock::FixedClock;
use tasklane::models::{Priority, Recurrence, TaskDraft};
use tasklane::storage::*;
use tasklane::store::TaskStore;
use chrono::NaiveDate;
use std::fs;

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStore::open(dir.path().join("nested")).unwrap();
    assert_eq!(storage.get(TASKS_KEY).unwrap(), None);

    storage.set(TASKS_KEY, "[]").unwrap();
    assert_eq!(storage.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
    assert!(storage.slot_path(TASKS_KEY).ends_with("tasks.json"));

    storage.remove(TASKS_KEY).unwrap();
    storage.remove(TASKS_KEY).unwrap();
    assert_eq!(storage.get(TASKS_KEY).unwrap(), None);
}

#[test]
fn test_file_store_replaces_slot_whole() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStore::open(dir.path()).unwrap();
    storage.set(TASKS_KEY, "[1, 2, 3, 4, 5]").unwrap();
    storage.set(TASKS_KEY, "[]").unwrap();

    assert_eq!(fs::read_to_string(storage.slot_path(TASKS_KEY)).unwrap(), "[]");
    assert!(!dir.path().join("tasks.json.tmp").exists());
    let names: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(names, vec![std::ffi::OsString::from("tasks.json")]);
}

#[test]
fn test_store_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let storage = FileStore::open(dir.path()).unwrap();
        let mut store = TaskStore::with_clock(storage, Box::new(FixedClock::new(5)));
        store.add(TaskDraft::new("Persist me").recurrence(Recurrence::Weekly)).unwrap();
        store.set_dark_mode(true).unwrap();
    }

    let raw = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    assert!(raw.contains("\"pomodoroCount\": 0"));
    assert!(raw.contains("\"recurrence\": \"weekly\""));
    assert_eq!(fs::read_to_string(dir.path().join("darkMode.json")).unwrap(), "true");

    let store = TaskStore::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "Persist me");
    assert!(store.dark_mode());
}

#[test]
fn test_malformed_data_loads_empty() {
    let storage = MemoryStore::new().with_slot(TASKS_KEY, "{ not json");
    assert!(load_tasks(&storage).is_empty());

    let storage = MemoryStore::new().with_slot(TASKS_KEY, "{\"id\": 1}");
    assert!(load_tasks(&storage).is_empty());
}

#[test]
fn test_bad_records_are_skipped() {
    let raw = r#"[
        {"id": 1, "title": "keep me"},
        {"id": 2, "title": "bad", "priority": "urgent"},
        {"id": 3, "title": "null count", "pomodoroCount": null},
        {"id": "4", "title": "string id"},
        {"id": 5, "title": "keep me too", "completed": true}
    ]"#;
    let seeded = MemoryStore::new().with_slot(TASKS_KEY, raw);
    let mut store = TaskStore::with_clock(seeded, Box::new(FixedClock::new(10)));
    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["keep me", "keep me too"]);

    store.add(TaskDraft::new("new")).unwrap();
    let saved = load_tasks(store.storage());
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[0].title, "keep me");
    assert_eq!(saved[2].title, "new");
}

#[test]
fn test_lenient_fields() {
    let raw = r#"[
        {"id": 1700000000000, "title": "Legacy", "description": "", "category": "",
         "dueDate": "", "priority": "high", "recurrence": "daily", "completed": false, "pomodoroCount": 2},
        {"id": 1700000000001, "title": "Bare"},
        {"id": 1700000000002, "title": "Timestamp", "dueDate": "2024-03-05T00:00:00.000Z"},
        {"id": 1700000000003, "title": "Garbage", "dueDate": "next tuesday"}
    ]"#;
    let tasks = load_tasks(&MemoryStore::new().with_slot(TASKS_KEY, raw));
    assert_eq!(tasks.len(), 4);

    assert_eq!(tasks[0].description, None);
    assert_eq!(tasks[0].category, None);
    assert_eq!(tasks[0].due_date, None);
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].recurrence, Recurrence::Daily);
    assert_eq!(tasks[0].pomodoro_count, 2);

    assert_eq!(tasks[1].priority, Priority::Medium);
    assert_eq!(tasks[1].recurrence, Recurrence::None);
    assert!(!tasks[1].completed);
    assert_eq!(tasks[1].pomodoro_count, 0);

    assert_eq!(tasks[2].due_date, NaiveDate::from_ymd_opt(2024, 3, 5));
    assert_eq!(tasks[3].due_date, None);
}

#[test]
fn test_due_date_written_as_plain_date() {
    let mut storage = MemoryStore::new();
    let mut store_tasks = Vec::new();
    let task = tasklane::models::Task::from_draft(1, TaskDraft::new("x").due(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
    store_tasks.push(task);
    save_tasks(&mut storage, &store_tasks).unwrap();
    let raw = storage.get(TASKS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"dueDate\": \"2024-01-31\""));
}

#[test]
fn test_dark_mode_flag() {
    let mut storage = MemoryStore::new();
    assert!(!load_dark_mode(&storage));
    save_dark_mode(&mut storage, true).unwrap();
    assert!(load_dark_mode(&storage));
    assert!(!load_dark_mode(&MemoryStore::new().with_slot(DARK_MODE_KEY, "yes")));

    delete_database(&mut storage).unwrap();
    assert!(!load_dark_mode(&storage));
}
