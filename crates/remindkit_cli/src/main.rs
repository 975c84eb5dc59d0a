//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load reminder snapshots from a JSON file into an in-memory store.
//! - Print the sectioned list the way a list screen would group it.
//!
//! Logging is enabled only when `REMINDKIT_LOG_DIR` is set.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use remindkit_core::{
    end_summary, format, init_logging, preset_for_rule, rule_summary, DayBucket,
    InMemoryReminderStore, ListOptions, LocalCalendar, Reminder, ReminderListController,
    RepeatPreset, SystemCalendar,
};
use std::path::{Path, PathBuf};

const LOG_LEVEL_ENV: &str = "REMINDKIT_LOG_LEVEL";
const LOG_DIR_ENV: &str = "REMINDKIT_LOG_DIR";

#[derive(Parser)]
#[command(name = "remindkit")]
#[command(about = "Reminder list and repeat-rule smoke tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print reminders grouped by day
    List {
        /// JSON file holding an array of reminders
        file: PathBuf,

        /// Include reminders without a due date or past the look-ahead
        #[arg(long)]
        all: bool,

        /// Include completed reminders
        #[arg(long)]
        completed: bool,
    },
    /// Print linkage info
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging_from_env()?;

    match cli.command {
        Commands::Ping => {
            println!("remindkit_core ping={}", remindkit_core::ping());
            println!("remindkit_core version={}", remindkit_core::core_version());
        }
        Commands::List {
            file,
            all,
            completed,
        } => {
            let calendar = SystemCalendar;
            let reminders = load_reminders(&file)?;
            let options = ListOptions {
                show_completed: completed,
                show_undated: all,
                ..ListOptions::default()
            };
            for line in render_list(reminders, options, &calendar)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn init_logging_from_env() -> Result<()> {
    let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
        return Ok(());
    };
    let level = std::env::var(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| remindkit_core::default_log_level().to_string());
    init_logging(&level, &log_dir).map_err(anyhow::Error::msg)
}

fn load_reminders(path: &Path) -> Result<Vec<Reminder>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let reminders: Vec<Reminder> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse reminders in {}", path.display()))?;
    info!(
        "event=cli_load module=cli status=ok reminders={}",
        reminders.len()
    );
    Ok(reminders)
}

fn render_list<C: LocalCalendar>(
    reminders: Vec<Reminder>,
    options: ListOptions,
    calendar: &C,
) -> Result<Vec<String>> {
    let store = InMemoryReminderStore::with_reminders(calendar, reminders)
        .context("reminder snapshot failed validation")?;
    let mut controller = ReminderListController::new(options);
    controller
        .refresh(&store, calendar)
        .context("failed to refresh reminder list")?;

    let mut lines = Vec::new();
    for (index, bucket) in controller.buckets().iter().enumerate() {
        if let Some(header) = controller.header(index, calendar) {
            lines.push(format!("== {header} =="));
        }
        render_bucket(bucket, &mut lines);
    }
    Ok(lines)
}

fn render_bucket(bucket: &DayBucket, lines: &mut Vec<String>) {
    for reminder in &bucket.items {
        let check = if reminder.completed { "[x]" } else { "[ ]" };
        let marks = format::priority_marks(reminder.priority.level());
        let mut line = match marks {
            "" => format!("{check} {}", reminder.title),
            marks => format!("{check} {marks} {}", reminder.title),
        };
        if let Some(due) = reminder.due.as_ref().and_then(format::due_text) {
            line.push_str(&format!(" @ {due}"));
        }
        if let Some(rule) = reminder.recurrence.as_ref() {
            let repeat = match preset_for_rule(Some(rule)) {
                RepeatPreset::Custom => rule_summary(Some(rule)),
                preset => preset.label().to_string(),
            };
            line.push_str(&format!(" | repeat: {repeat}"));
            if !rule.end().is_never() {
                line.push_str(&format!(" | ends: {}", end_summary(rule.end())));
            }
        }
        if let Some(alarm) = reminder.location_alarm.as_ref() {
            line.push_str(&format!(
                " | at: {} ({})",
                alarm.location.title,
                format::radius_label(alarm.location.radius_m)
            ));
        }
        lines.push(line);
    }
}
