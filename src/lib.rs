//! # Tasklane
//!
//! A terminal task manager with recurring tasks, a pomodoro focus timer and
//! a small analytics dashboard. A fast CLI covers scripting and quick entry;
//! a TUI (Terminal User Interface) covers interactive management.
//!
//! ## Features
//!
//! *   **Filtering and sorting**: all / pending / completed, by due date, priority, creation or manual order.
//! *   **Recurrence**: completing a daily, weekly or monthly task schedules its next occurrence.
//! *   **Pomodoro**: 25 minute focus sessions credited to a task on natural completion.
//! *   **Analytics**: completion rate, completions by priority and category, most focused tasks.
//! *   **Data Persistence**: the whole task list is rewritten as JSON after every change.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive mode
//! tasklane
//!
//! # Recurring task
//! tasklane add "Pay rent" --due 2024-01-31 --recur monthly --category Home
//!
//! # Pending tasks, most urgent first
//! tasklane list --filter pending --sort priority
//!
//! # Complete (or reopen) a task
//! tasklane done <ID>
//!
//! # Focus on a task for one pomodoro
//! tasklane focus <ID>
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task
//! *   `Space`: Toggle done
//! *   `e` / `t` / `p` / `g` / `r`: Edit title / due date / priority / category / recurrence
//! *   `y`: Clone, `d`: Delete, `x`: Clear completed
//! *   `f`: Cycle filter, `s`: Cycle sort
//! *   `J` / `K`: Move task down / up (manual sort only)
//! *   `Enter`: Start pomodoro, `P`: Pause / resume, `S`: Stop
//! *   `v`: Analytics view, `T`: Toggle dark mode
//!
//! ## Data Storage
//!
//! Tasks live in `tasks.json` and the theme in `darkMode.json` under the local
//! data directory (`~/.local/share/tasklane` on Linux). Set `TASKLANE_DATA_DIR`
//! to use another directory and `RUST_LOG` to change the log level.

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notification;
pub mod pomodoro;
pub mod projection;
pub mod recurrence;
pub mod storage;
pub mod store;
pub mod tui;
