use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use chrono::Local;
use crate::models::Priority;
use crate::notification::NotificationKind;
use crate::pomodoro::SessionState;
use crate::projection::analytics;
use crate::storage::KeyValueStore;
use super::app::{App, InputField, InputMode, ViewMode};

struct Palette {
    base: Style,
    header: Style,
    muted: Style,
    highlight: Style,
}

fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            base: Style::default().fg(Color::White).bg(Color::Black),
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::Gray),
            highlight: Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray),
        }
    } else {
        Palette {
            base: Style::default().fg(Color::Black).bg(Color::White),
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            highlight: Style::default().add_modifier(Modifier::BOLD).bg(Color::Gray),
        }
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let colors = palette(app.dark_mode);
    f.render_widget(Block::default().style(colors.base), f.area());

    let timer_height = if app.session.bound_task().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(timer_height), // Pomodoro
            Constraint::Min(0),               // Body
            Constraint::Length(3),            // Help / toast
        ].as_ref())
        .split(f.area());

    if let Some(bound) = app.session.bound_task() {
        let status = match app.session.state() {
            SessionState::Paused => " (paused)",
            _ => "",
        };
        let timer = Paragraph::new(format!("{}  {}{}", app.session.clock_face(), bound.title, status))
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title("Pomodoro"));
        f.render_widget(timer, chunks[0]);
    }

    match app.view_mode {
        ViewMode::Tasks => render_tasks(f, app, chunks[1], &colors),
        ViewMode::Analytics => render_analytics(f, app, chunks[1], &colors),
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | a: Add | e/D/t/p/g/r: Edit | Space: Done | y: Clone | d: Del | x: Clear Done | f: Filter | s: Sort | J/K: Move | Enter: Pomodoro | P: Pause | S: Stop | v: Stats | T: Theme",
            ViewMode::Analytics => "q: Quit | v: View Tasks | T: Theme",
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let footer = match &app.toast {
        Some(toast) => {
            let color = match toast.notification.kind {
                NotificationKind::Success => Color::Green,
                NotificationKind::Info => Color::Cyan,
                NotificationKind::Error => Color::Red,
            };
            Paragraph::new(toast.notification.message.as_str()).style(Style::default().fg(color))
        }
        None => Paragraph::new(help_text).style(colors.muted),
    };
    f.render_widget(footer.block(Block::default().borders(Borders::ALL)), chunks[2]);

    // Render Input Box if needed
    if let InputMode::Editing | InputMode::Adding = app.input_mode {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Task: Enter Title",
                1 => "Add Task: Enter Description (optional)",
                2 => "Add Task: Enter Due Date (YYYY-MM-DD, optional)",
                3 => "Add Task: Enter Priority (low/medium/high)",
                4 => "Add Task: Enter Category (optional)",
                5 => "Add Task: Enter Recurrence (none/daily/weekly/monthly)",
                _ => "Add Task",
            },
            _ => match app.input_field {
                InputField::Title => "Edit Title",
                InputField::Description => "Edit Description (empty to clear)",
                InputField::Due => "Edit Due Date (YYYY-MM-DD, empty to clear)",
                InputField::Priority => "Edit Priority (low/medium/high)",
                InputField::Category => "Edit Category",
                InputField::Recur => "Edit Recurrence (none/daily/weekly/monthly)",
                InputField::None => "Edit",
            },
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

fn render_tasks<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, area: Rect, colors: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);

    let details = match app.selected_task().and_then(|t| t.description.as_deref()) {
        Some(description) => Paragraph::new(description),
        None => Paragraph::new("No description").style(colors.muted),
    };
    f.render_widget(
        details.wrap(Wrap { trim: true }).block(Block::default().borders(Borders::ALL).title("Description")),
        chunks[1],
    );

    let today = Local::now().date_naive();
    let bound_id = app.session.bound_task().map(|b| b.id);

    let rows: Vec<Row> = app
        .visible_tasks()
        .into_iter()
        .map(|t| {
            let due = match t.due_date {
                Some(d) if !t.completed && d < today => format!("{} (overdue)", d),
                Some(d) => d.to_string(),
                None => String::new(),
            };
            let mut style = Style::default();
            if t.completed {
                style = style.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
            }
            let marker = if Some(t.id) == bound_id { "*" } else { "" };

            Row::new(vec![
                Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                Cell::from(format!("{}{}", marker, t.title)),
                Cell::from(t.priority.label()).style(Style::default().fg(priority_color(t.priority))),
                Cell::from(t.category.clone().unwrap_or_default()),
                Cell::from(due),
                Cell::from(if t.recurrence.is_recurring() { t.recurrence.label() } else { "" }),
                Cell::from(t.pomodoro_count.to_string()),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(20),
        Constraint::Length(8),
        Constraint::Length(5),
    ];

    let title = format!(
        "Tasklane - {} | Sort: {}{}",
        app.filter.label(),
        app.sort.label(),
        if app.can_reorder() { " (J/K to move)" } else { "" }
    );
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Title", "Priority", "Category", "Due", "Repeats", "Pomo"])
            .style(colors.header)
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(colors.highlight)
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);
}

fn render_analytics<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect, colors: &Palette) {
    let stats = analytics(app.store.tasks());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((stats.completion_rate / 100.0).clamp(0.0, 1.0))
        .label(format!("{} of {} tasks completed ({:.0}%)", stats.completed, stats.total, stats.completion_rate));
    f.render_widget(gauge, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(33), Constraint::Percentage(34)].as_ref())
        .split(chunks[1]);

    let mut priority_lines = Vec::new();
    for p in [Priority::Low, Priority::Medium, Priority::High] {
        priority_lines.push(Line::styled(
            format!("{:<8} {}", p.label(), stats.completed_by_priority.get(p)),
            Style::default().fg(priority_color(p)),
        ));
    }
    f.render_widget(
        Paragraph::new(priority_lines).block(Block::default().borders(Borders::ALL).title("Completed by Priority")),
        columns[0],
    );

    let category_lines: Vec<Line> = if stats.completed_by_category.is_empty() {
        vec![Line::styled("No categorized tasks completed", colors.muted)]
    } else {
        stats.completed_by_category
            .iter()
            .map(|(category, count)| Line::from(format!("{}: {}", category, count)))
            .collect()
    };
    f.render_widget(
        Paragraph::new(category_lines).block(Block::default().borders(Borders::ALL).title("Completed by Category")),
        columns[1],
    );

    let mut focus_lines = vec![Line::styled(format!("Total pomodoros: {}", stats.total_pomodoros), colors.header)];
    for entry in &stats.top_focus {
        focus_lines.push(Line::from(format!("{}: {}", entry.title, entry.pomodoros)));
    }
    f.render_widget(
        Paragraph::new(focus_lines).block(Block::default().borders(Borders::ALL).title("Focus")),
        columns[2],
    );
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
