pub mod app;
pub mod ui;

use std::io;
use std::time::Instant;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use app::{App, InputField, InputMode, ViewMode};
use ui::ui;

pub fn run_tui<S: KeyValueStore>(store: TaskStore<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // A session still running here is dropped with the view, uncredited.
    if let Some(bound) = app.session.stop() {
        tracing::info!(id = bound.id, "pomodoro abandoned on exit");
    }

    res.map_err(Into::into)
}

fn run_app<B: Backend, S: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<S>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('v') => app.toggle_view(),
                        KeyCode::Char('T') => app.toggle_dark_mode(),
                        _ if app.view_mode == ViewMode::Analytics => {}
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Char('J') => app.move_selected(true),
                        KeyCode::Char('K') => app.move_selected(false),
                        KeyCode::Char(' ') => app.toggle_selected(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        KeyCode::Char('y') => app.clone_selected(),
                        KeyCode::Char('x') => app.clear_completed(),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('e') => app.start_edit(InputField::Title),
                        KeyCode::Char('D') => app.start_edit(InputField::Description),
                        KeyCode::Char('t') => app.start_edit(InputField::Due),
                        KeyCode::Char('p') => app.start_edit(InputField::Priority),
                        KeyCode::Char('g') => app.start_edit(InputField::Category),
                        KeyCode::Char('r') => app.start_edit(InputField::Recur),
                        KeyCode::Char('f') => app.cycle_filter(),
                        KeyCode::Char('s') => app.cycle_sort(),
                        KeyCode::Enter => app.start_pomodoro(),
                        KeyCode::Char('P') => app.pause_or_resume_pomodoro(),
                        KeyCode::Char('S') => app.stop_pomodoro(),
                        _ => {}
                    },
                    InputMode::Editing | InputMode::Adding => match key.code {
                        KeyCode::Enter => app.handle_input(),
                        KeyCode::Esc => app.cancel_input(),
                        KeyCode::Char(c) => {
                            app.input_buffer.push(c);
                        }
                        KeyCode::Backspace => {
                            app.input_buffer.pop();
                        }
                        _ => {}
                    }
                }
            }
        }

        app.on_frame(Instant::now());
    }
}
