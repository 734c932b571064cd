use std::time::{Duration, Instant};
use ratatui::widgets::TableState;
use crate::models::{parse_due_date, Priority, Recurrence, Task, TaskDraft};
use crate::notification::Notification;
use crate::pomodoro::{PomodoroSession, Tick};
use crate::projection::{view, FilterMode, SortKey};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::TaskStore;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);
const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Tasks,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    None,
    Title,
    Description,
    Due,
    Priority,
    Category,
    Recur,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub draft: TaskDraft,
    pub step: usize, // 0: Title, 1: Description, 2: Due, 3: Priority, 4: Category, 5: Recur
}

/// A notification with the moment it appeared.
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Schedules pomodoro ticks once per second while armed.
#[derive(Default)]
pub struct Ticker {
    next: Option<Instant>,
}

impl Ticker {
    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    fn arm(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + TICK_INTERVAL);
        }
    }

    fn disarm(&mut self) {
        self.next = None;
    }

    /// Number of ticks due at `now`, advancing the schedule past them.
    fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut count = 0;
        while next <= now {
            count += 1;
            next += TICK_INTERVAL;
        }
        self.next = Some(next);
        count
    }

    fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next.map(|n| n.saturating_duration_since(now))
    }
}

pub struct App<S: KeyValueStore> {
    pub store: TaskStore<S>,
    /// Ids of the visible tasks, in display order.
    pub visible: Vec<u64>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub add_state: AddState,
    pub filter: FilterMode,
    pub sort: SortKey,
    pub session: PomodoroSession,
    pub ticker: Ticker,
    pub toast: Option<Toast>,
    pub dark_mode: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Creates a new App over an already hydrated store.
    pub fn new(store: TaskStore<S>) -> App<S> {
        let dark_mode = store.dark_mode();
        let mut app = App {
            store,
            visible: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            filter: FilterMode::All,
            sort: SortKey::DueDate,
            session: PomodoroSession::new(),
            ticker: Ticker::default(),
            toast: None,
            dark_mode,
        };
        app.reload();
        app
    }

    /// Tasks in display order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible.iter().filter_map(|id| self.store.get(*id)).collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let i = self.state.selected()?;
        self.store.get(*self.visible.get(i)?)
    }

    fn selected_id(&self) -> Option<u64> {
        self.selected_task().map(|t| t.id)
    }

    /// Recomputes the visible list and keeps the selection in range.
    pub fn reload(&mut self) {
        self.visible = view(self.store.tasks(), self.filter, self.sort).iter().map(|t| t.id).collect();
        if self.visible.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible.len() {
                self.state.select(Some(self.visible.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    fn select_id(&mut self, id: u64) {
        if let Some(i) = self.visible.iter().position(|v| *v == id) {
            self.state.select(Some(i));
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notify_at(notification, Instant::now());
    }

    fn notify_at(&mut self, notification: Notification, now: Instant) {
        self.toast = Some(Toast { notification, shown_at: now });
    }

    /// Shows the result of a store write, or the write error.
    fn report<T>(&mut self, result: Result<T, StorageError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(error = %e, "saving tasks failed");
                self.notify(Notification::error(format!("Could not save tasks: {}", e)));
                None
            }
        }
    }

    /// Selects the next visible task.
    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous visible task.
    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let result = self.store.toggle_complete(id);
        if let Some(Some(toggle)) = self.report(result) {
            self.notify(Notification::task_toggled(&toggle));
        }
        self.reload();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let result = self.store.delete(id);
        if let Some(Some(task)) = self.report(result) {
            self.notify(Notification::task_deleted(&task.title));
        }
        self.reload();
    }

    pub fn clone_selected(&mut self) {
        let Some(task) = self.selected_task().cloned() else { return };
        let result = self.store.clone_task(task.id);
        if let Some(Some(copy)) = self.report(result) {
            self.notify(Notification::task_cloned(&task.title));
            self.reload();
            self.select_id(copy.id);
        }
    }

    pub fn clear_completed(&mut self) {
        let result = self.store.clear_completed();
        if let Some(count) = self.report(result) {
            self.notify(Notification::completed_cleared(count));
        }
        self.reload();
    }

    /// Whether manual moves are possible with the current sort.
    pub fn can_reorder(&self) -> bool {
        self.sort == SortKey::Manual
    }

    /// Swaps the selected task with its visible neighbour, `down` or up.
    pub fn move_selected(&mut self, down: bool) {
        if !self.can_reorder() {
            self.notify(Notification::info("Switch to manual sort (s) to reorder tasks"));
            return;
        }
        let Some(i) = self.state.selected() else { return };
        let j = if down { i + 1 } else { i.wrapping_sub(1) };
        let (Some(&active), Some(&over)) = (self.visible.get(i), self.visible.get(j)) else {
            return;
        };
        let result = self.store.reorder_by_id(active, over);
        self.report(result);
        self.reload();
        self.select_id(active);
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
        self.reload();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.cycle();
        self.reload();
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Tasks => ViewMode::Analytics,
            ViewMode::Analytics => ViewMode::Tasks,
        };
    }

    pub fn toggle_dark_mode(&mut self) {
        let dark = !self.dark_mode;
        let result = self.store.set_dark_mode(dark);
        if self.report(result).is_some() {
            self.dark_mode = dark;
        }
    }

    /// Starts a pomodoro on the selected task, replacing any running one.
    pub fn start_pomodoro(&mut self) {
        let Some(task) = self.selected_task().cloned() else { return };
        self.session.start(&task);
        self.notify(Notification::pomodoro_started(&task.title));
        self.sync_ticker(Instant::now());
    }

    pub fn pause_or_resume_pomodoro(&mut self) {
        if !self.session.pause() {
            self.session.resume();
        }
        self.sync_ticker(Instant::now());
    }

    pub fn stop_pomodoro(&mut self) {
        if let Some(bound) = self.session.stop() {
            self.notify(Notification::pomodoro_stopped(&bound.title));
        }
        self.sync_ticker(Instant::now());
    }

    /// Arms the ticker while the session runs and clears it otherwise.
    fn sync_ticker(&mut self, now: Instant) {
        if self.session.is_ticking() {
            self.ticker.arm(now);
        } else {
            self.ticker.disarm();
        }
    }

    /// Runs due pomodoro ticks and expires the toast. Called once per loop turn.
    pub fn on_frame(&mut self, now: Instant) {
        for _ in 0..self.ticker.due(now) {
            match self.session.tick(&mut self.store) {
                Ok(Tick::Completed(done)) => {
                    self.notify_at(Notification::pomodoro_completed(&done.title), now);
                    self.reload();
                }
                Ok(_) => {}
                Err(e) => {
                    self.report::<()>(Err(e));
                }
            }
            if !self.session.is_ticking() {
                break;
            }
        }
        self.sync_ticker(now);

        if self.toast.as_ref().is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_DURATION) {
            self.toast = None;
        }
    }

    /// How long the event loop may block before the next tick is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let idle = Duration::from_millis(250);
        self.ticker.until_next(now).map_or(idle, |d| d.min(idle))
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(t) = self.selected_task().cloned() else { return };
        self.target_id = Some(t.id);
        self.input_mode = InputMode::Editing;
        self.input_field = field;

        // Pre-fill buffer for editing
        self.input_buffer = match field {
            InputField::Title => t.title,
            InputField::Description => t.description.unwrap_or_default(),
            InputField::Due => t.due_date.map(|d| d.to_string()).unwrap_or_default(),
            InputField::Priority => t.priority.label().to_string(),
            InputField::Category => t.category.unwrap_or_default(),
            InputField::Recur => t.recurrence.label().to_string(),
            InputField::None => String::new(),
        };
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Normal => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => { // Title
                if input.is_empty() {
                    return;
                }
                self.add_state.draft.title = input;
            }
            1 => { // Description
                self.add_state.draft = std::mem::take(&mut self.add_state.draft).description(input);
            }
            2 => { // Due
                if !input.is_empty() {
                    match parse_due_date(&input) {
                        Some(d) => self.add_state.draft.due_date = Some(d),
                        None => {
                            self.notify(Notification::error(format!("Invalid due date '{}'. Use YYYY-MM-DD.", input)));
                            return;
                        }
                    }
                }
            }
            3 => { // Priority
                match parse_choice::<Priority>(&input) {
                    Some(p) => self.add_state.draft.priority = p,
                    None => return self.invalid_choice(&input),
                }
            }
            4 => { // Category
                self.add_state.draft = std::mem::take(&mut self.add_state.draft).category(input);
            }
            5 => { // Recur
                match parse_choice::<Recurrence>(&input) {
                    Some(r) => self.add_state.draft.recurrence = r,
                    None => return self.invalid_choice(&input),
                }
                let draft = std::mem::take(&mut self.add_state.draft);
                let result = self.store.add(draft);
                if let Some(Some(task)) = self.report(result) {
                    self.notify(Notification::task_added(&task.title));
                    self.reload();
                    self.select_id(task.id);
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                return;
            }
            _ => {}
        }
        self.add_state.step += 1;
        self.input_buffer.clear();
    }

    /// Handles input for the "Edit Task" mode.
    fn handle_editing_input(&mut self) {
        let Some(id) = self.target_id else { return };
        let Some(mut draft) = self.store.get(id).map(Task::to_draft) else {
            self.cancel_input();
            return;
        };
        let input = self.input_buffer.trim().to_string();
        match self.input_field {
            InputField::Title => {
                if input.is_empty() {
                    return;
                }
                draft.title = input;
            }
            InputField::Description => draft = draft.description(input),
            InputField::Due => {
                if input.is_empty() {
                    draft.due_date = None;
                } else {
                    match parse_due_date(&input) {
                        Some(d) => draft.due_date = Some(d),
                        None => {
                            self.notify(Notification::error(format!("Invalid due date '{}'. Use YYYY-MM-DD.", input)));
                            return;
                        }
                    }
                }
            }
            InputField::Priority => match parse_choice::<Priority>(&input) {
                Some(p) => draft.priority = p,
                None => return self.invalid_choice(&input),
            },
            InputField::Category => draft = draft.category(input),
            InputField::Recur => match parse_choice::<Recurrence>(&input) {
                Some(r) => draft.recurrence = r,
                None => return self.invalid_choice(&input),
            },
            InputField::None => {}
        }
        let result = self.store.update(id, draft);
        if let Some(Some(task)) = self.report(result) {
            self.notify(Notification::task_updated(&task.title));
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.reload();
    }

    fn invalid_choice(&mut self, input: &str) {
        self.notify(Notification::error(format!("Unknown value '{}'", input)));
    }
}

/// Parses a wizard answer for a value enum; blank means the default.
fn parse_choice<T: clap::ValueEnum + Default>(input: &str) -> Option<T> {
    if input.is_empty() {
        return Some(T::default());
    }
    T::from_str(input, true).ok()
}
