use std::io;
use std::process::ExitCode;
use std::time::Duration;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tasklane::commands::*;
use tasklane::config;
use tasklane::error::Result;
use tasklane::logging::{self, LogTarget};
use tasklane::models::{Priority, Recurrence, TaskDraft};
use tasklane::projection::{FilterMode, SortKey};
use tasklane::storage::FileStore;
use tasklane::store::TaskStore;
use tasklane::tui::run_tui;

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(about = "Terminal task manager with recurring tasks and a pomodoro timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Longer description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Category, used to group analytics
        #[arg(short, long)]
        category: Option<String>,
        /// Due date in YYYY-MM-DD
        #[arg(short, long, value_parser = parse_due_arg)]
        due: Option<NaiveDate>,
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Repeat the task when it is completed
        #[arg(short, long, value_enum, default_value_t = Recurrence::None)]
        recur: Recurrence,
    },
    /// List tasks
    List {
        #[arg(short, long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
        #[arg(short, long, value_enum, default_value_t = SortKey::DueDate)]
        sort: SortKey,
    },
    /// Toggle a task between done and pending
    Done {
        id: u64,
    },
    /// Edit a task
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New due date
        #[arg(short, long, value_parser = parse_due_arg, conflicts_with = "no_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        no_due: bool,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        #[arg(short, long, value_enum)]
        recur: Option<Recurrence>,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Duplicate a task
    #[command(name = "clone")]
    Duplicate {
        id: u64,
    },
    /// Remove every completed task
    Clear,
    /// Move a task to the position of another one (see `list --sort manual`)
    Move {
        id: u64,
        target: u64,
    },
    /// Run a 25 minute pomodoro on a task
    Focus {
        id: u64,
    },
    /// Show completion and focus statistics
    Stats,
    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },
    /// Reset the database (delete all tasks and preferences)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn open_store() -> Result<TaskStore<FileStore>> {
    Ok(TaskStore::load(FileStore::open(config::data_dir())?))
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Add { title, description, category, due, priority, recur } => {
            let mut draft = TaskDraft::new(title).priority(priority).recurrence(recur);
            draft.due_date = due;
            if let Some(d) = description {
                draft = draft.description(d);
            }
            if let Some(c) = category {
                draft = draft.category(c);
            }
            cmd_add(&mut open_store()?, draft, false).map(|_| ())
        }
        Commands::List { filter, sort } => {
            cmd_list(&open_store()?, filter, sort);
            Ok(())
        }
        Commands::Done { id } => cmd_toggle(&mut open_store()?, id, false),
        Commands::Edit { id, title, description, category, due, no_due, priority, recur } => {
            let args = EditArgs { title, description, category, due, clear_due: no_due, priority, recurrence: recur };
            cmd_edit(&mut open_store()?, id, args, false)
        }
        Commands::Remove { id } => cmd_remove(&mut open_store()?, id, false),
        Commands::Duplicate { id } => cmd_clone(&mut open_store()?, id, false).map(|_| ()),
        Commands::Clear => cmd_clear(&mut open_store()?, false).map(|_| ()),
        Commands::Move { id, target } => cmd_move(&mut open_store()?, id, target, false),
        Commands::Focus { id } => cmd_focus(&mut open_store()?, id, Duration::from_secs(1), false),
        Commands::Stats => {
            cmd_stats(&open_store()?);
            Ok(())
        }
        Commands::Theme { choice } => cmd_theme(&mut open_store()?, choice, false).map(|_| ()),
        Commands::Reset { force } => cmd_reset(&mut open_store()?, force),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tasklane", &mut io::stdout());
            Ok(())
        }
        Commands::Ui => run_tui(open_store()?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);
    logging::init(if matches!(command, Commands::Ui) { LogTarget::File } else { LogTarget::Stderr });

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
