use std::time::{Duration, Instant};
use tasklane::clock::FixedClock;
use tasklane::models::{Recurrence, TaskDraft};
use tasklane::pomodoro::POMODORO_SECONDS;
use tasklane::projection::SortKey;
use tasklane::storage::MemoryStore;
use tasklane::store::TaskStore;
use tasklane::tui::app::{App, InputField, InputMode};

fn app_with(titles: &[&str]) -> App<MemoryStore> {
    let mut store = TaskStore::with_clock(MemoryStore::new(), Box::new(FixedClock::new(100)));
    for title in titles {
        store.add(TaskDraft::new(*title)).unwrap();
    }
    App::new(store)
}

fn visible_titles(app: &App<MemoryStore>) -> Vec<String> {
    app.visible_tasks().iter().map(|t| t.title.clone()).collect()
}

#[test]
fn test_pomodoro_ticks_through_frames() {
    let mut app = app_with(&["Focus"]);
    app.start_pomodoro();
    assert!(app.ticker.is_armed());

    let later = Instant::now() + Duration::from_secs(u64::from(POMODORO_SECONDS) + 5);
    app.on_frame(later);

    assert_eq!(app.store.tasks()[0].pomodoro_count, 1);
    assert!(!app.ticker.is_armed());
    assert!(app.session.bound_task().is_none());
    let toast = app.toast.as_ref().unwrap();
    assert_eq!(toast.notification.message, "Pomodoro completed for \"Focus\"");
}

#[test]
fn test_paused_session_stops_ticking() {
    let mut app = app_with(&["Focus"]);
    app.start_pomodoro();
    app.pause_or_resume_pomodoro();
    assert!(!app.ticker.is_armed());

    app.on_frame(Instant::now() + Duration::from_secs(3600));
    assert_eq!(app.store.tasks()[0].pomodoro_count, 0);
    assert_eq!(app.session.remaining(), POMODORO_SECONDS);

    app.stop_pomodoro();
    assert!(app.session.bound_task().is_none());
    assert_eq!(app.store.tasks()[0].pomodoro_count, 0);
}

#[test]
fn test_reorder_needs_manual_sort() {
    let mut app = app_with(&["a", "b", "c"]);
    app.move_selected(true);
    assert_eq!(visible_titles(&app), vec!["a", "b", "c"]);

    while app.sort != SortKey::Manual {
        app.cycle_sort();
    }
    app.state.select(Some(0));
    app.move_selected(true);
    assert_eq!(visible_titles(&app), vec!["b", "a", "c"]);
    assert_eq!(app.state.selected(), Some(1));
}

#[test]
fn test_toggle_recurring_shows_successor() {
    let mut store = TaskStore::with_clock(MemoryStore::new(), Box::new(FixedClock::new(100)));
    let due = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    store.add(TaskDraft::new("Standup").due(due).recurrence(Recurrence::Daily)).unwrap();
    let mut app = App::new(store);

    app.toggle_selected();
    assert_eq!(app.visible.len(), 2);
    assert_eq!(
        app.toast.as_ref().unwrap().notification.message,
        "Task \"Standup\" completed and next task created"
    );

    app.clear_completed();
    assert_eq!(app.visible.len(), 1);
}

#[test]
fn test_add_wizard() {
    let mut app = app_with(&[]);
    app.start_add();
    for answer in ["Plan trip", "Book flights and hotel", "2024-07-01", "high", "Travel", "weekly"] {
        app.input_buffer = answer.to_string();
        app.handle_input();
    }
    assert_eq!(app.input_mode, InputMode::Normal);
    let task = &app.store.tasks()[0];
    assert_eq!(task.title, "Plan trip");
    assert_eq!(task.description.as_deref(), Some("Book flights and hotel"));
    assert_eq!(task.category.as_deref(), Some("Travel"));
    assert_eq!(task.recurrence, Recurrence::Weekly);
}

#[test]
fn test_add_wizard_rejects_bad_date() {
    let mut app = app_with(&[]);
    app.start_add();
    app.input_buffer = "Plan trip".into();
    app.handle_input();
    app.input_buffer = String::new();
    app.handle_input();
    app.input_buffer = "someday".into();
    app.handle_input();
    assert_eq!(app.add_state.step, 2);
    assert_eq!(app.add_state.draft.description, None);
    assert_eq!(app.input_mode, InputMode::Adding);
}

#[test]
fn test_dark_mode_toggle_persists() {
    let mut app = app_with(&[]);
    assert!(!app.dark_mode);
    app.toggle_dark_mode();
    assert!(app.dark_mode);
    assert!(app.store.dark_mode());
}

#[test]
fn test_edit_description() {
    let mut app = app_with(&["Report"]);
    app.start_edit(InputField::Description);
    assert_eq!(app.input_buffer, "");
    app.input_buffer = "Quarterly numbers".into();
    app.handle_input();
    assert_eq!(app.store.tasks()[0].description.as_deref(), Some("Quarterly numbers"));
    assert_eq!(app.selected_task().unwrap().description.as_deref(), Some("Quarterly numbers"));

    app.start_edit(InputField::Description);
    assert_eq!(app.input_buffer, "Quarterly numbers");
    app.input_buffer = "   ".into();
    app.handle_input();
    assert_eq!(app.store.tasks()[0].description, None);
    assert_eq!(app.input_mode, InputMode::Normal);
}
