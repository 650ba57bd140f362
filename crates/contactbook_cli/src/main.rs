//! Command-line shell for the contact book.
//!
//! # Responsibility
//! - Map command-line flags onto `ContactBookConfig`.
//! - Act as the presentation layer: print the last rendered frame and ask
//!   for delete confirmation on stdin.

use clap::{Parser, Subcommand, ValueEnum};
use contactbook_core::config::DEFAULT_STORAGE_KEY;
use contactbook_core::{
    init_logging, probe_store, ConfirmPrompt, Contact, ContactBook, ContactBookConfig,
    ContactField, ContactStore, FormMode, RenderFrame, RenderSink, StatusKind, SystemClock,
    ValidationMode,
};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contactbook", version, about = "Keep a paginated list of contacts")]
struct Cli {
    /// Directory holding the storage file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Key the collection is stored under.
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,
    /// Cap the storage file at this many SQLite pages.
    #[arg(long, global = true)]
    quota_pages: Option<u32>,
    /// Keep contacts in memory only (nothing is written to disk).
    #[arg(long, global = true)]
    memory: bool,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show one page of contacts, sorted by name.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add a contact.
    Add { name: String, email: String },
    /// Replace the name and email of a contact.
    Edit {
        id: String,
        name: String,
        email: String,
    },
    /// Delete a contact.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Validate a single field value without saving anything.
    Check {
        field: FieldArg,
        value: String,
        /// Use live-typing rules (empty values are not reported).
        #[arg(long)]
        realtime: bool,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Check { .. } => "check",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldArg {
    Name,
    Email,
}

impl From<FieldArg> for ContactField {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Name => ContactField::Name,
            FieldArg::Email => ContactField::Email,
        }
    }
}

/// Keeps only the most recent frame; the shell prints once per command.
#[derive(Default)]
struct LatestFrame {
    frame: Option<RenderFrame>,
}

impl RenderSink for LatestFrame {
    fn render(&mut self, frame: &RenderFrame) {
        self.frame = Some(frame.clone());
    }
}

/// Reads `y/N` from stdin unless confirmation was given up front.
struct StdinPrompt {
    assume_yes: bool,
}

impl ConfirmPrompt for StdinPrompt {
    fn confirm_delete(&mut self, contact: &Contact) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("Delete {} <{}>? [y/N] ", contact.name(), contact.email());
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);

    if let Err(err) = config.validate() {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    if let Command::Check {
        field,
        value,
        realtime,
    } = &cli.command
    {
        return run_check(*field, value, *realtime);
    }

    let probed = probe_store(&config);
    if let Some(reason) = &probed.fallback_reason {
        eprintln!("warning: using in-memory storage, changes will not persist ({reason})");
    }
    info!(
        "event=cli_start module=cli status=ok medium={} command={}",
        probed.medium,
        cli.command.name()
    );

    let store = ContactStore::new(probed.store, config.storage_key.clone());
    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let mut book = ContactBook::open(
        store,
        SystemClock,
        LatestFrame::default(),
        StdinPrompt { assume_yes },
    );

    let result = match &cli.command {
        Command::List { page } => {
            book.go_to_page(*page);
            Ok(())
        }
        Command::Add { name, email } => book.submit(name, email).map(|_| ()),
        Command::Edit { id, name, email } => book
            .begin_edit(id)
            .and_then(|()| book.submit(name, email))
            .map(|_| ()),
        Command::Delete { id, .. } => book.delete(id).map(|_| ()),
        Command::Check { .. } => Ok(()),
    };

    if let Some(frame) = &book.sink().frame {
        print_frame(frame);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> ContactBookConfig {
    let defaults = ContactBookConfig::default();
    ContactBookConfig {
        data_dir: cli.data_dir.clone().unwrap_or(defaults.data_dir),
        storage_key: cli.storage_key.clone(),
        storage_quota_pages: cli.quota_pages,
        force_memory: cli.memory,
        log_level: cli.log_level.clone().unwrap_or(defaults.log_level),
        log_dir: cli.log_dir.clone(),
        ..defaults
    }
}

fn run_check(field: FieldArg, value: &str, realtime: bool) -> ExitCode {
    let mode = if realtime {
        ValidationMode::Realtime
    } else {
        ValidationMode::Strict
    };
    let errors = contactbook_core::validate_field(field.into(), value, mode);
    if errors.is_empty() {
        println!("ok");
        return ExitCode::SUCCESS;
    }
    for error in &errors {
        println!("{}: {error}", error.field());
    }
    ExitCode::FAILURE
}

fn print_frame(frame: &RenderFrame) {
    if let FormMode::Edit(id) = &frame.form_mode {
        println!("Editing {id}");
    }

    println!("{}", frame.view.summary());
    let offset = frame.view.range.map_or(0, |range| range.start);
    for (index, contact) in frame.view.items.iter().enumerate() {
        println!(
            "{:>4}. {} <{}>  [{}]",
            offset + index,
            contact.name(),
            contact.email(),
            contact.id()
        );
    }
    if frame.view.show_controls() {
        println!("Page {} of {}", frame.view.page, frame.view.total_pages);
    }

    for error in &frame.field_errors {
        println!("  {}: {error}", error.field());
    }
    for message in &frame.messages {
        let tag = match message.kind {
            StatusKind::Success => "ok",
            StatusKind::Warning => "warning",
            StatusKind::Error => "error",
        };
        println!("[{tag}] {}", message.text);
    }
}
