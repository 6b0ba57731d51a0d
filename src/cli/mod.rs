//! Command-line surface: every command loads the data file, applies one
//! household operation, and saves when something changed.

mod commands;

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveTime, Weekday};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::validators::{parse_date, validate_time_of_day};
use crate::domain::{parse_weekday, RecurrenceType, ValidationPolicy};
use crate::error::AppError;
use crate::storage::{Dataset, HouseholdStore, JsonFileStore};
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "teapoio",
    about = "Keep guardian, child, routine and calendar records for children with support needs",
    version
)]
pub struct Cli {
    /// Override the configured JSON data file
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,
    /// Evaluate ages and schedules as of this date (DD/MM/YYYY). Defaults to today.
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register and inspect guardians
    Guardian {
        #[command(subcommand)]
        command: GuardianCommand,
    },
    /// Register, inspect and remove children
    Child {
        #[command(subcommand)]
        command: ChildCommand,
    },
    /// Manage routines and their ordered steps
    Routine {
        #[command(subcommand)]
        command: RoutineCommand,
    },
    /// Manage dated calendar events
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
    /// Show routines and events day by day
    Agenda(AgendaArgs),
}

#[derive(Subcommand, Debug)]
pub enum GuardianCommand {
    /// Register a new guardian
    Add(GuardianAddArgs),
    /// List every guardian
    List,
    /// Show one guardian and their children
    Show { id: String },
}

#[derive(Args, Debug)]
pub struct GuardianAddArgs {
    #[arg(long)]
    pub name: String,
    /// Birth date (DD/MM/YYYY)
    #[arg(long)]
    pub birth_date: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: Option<String>,
    /// Relationship to the children, e.g. mother, father, grandparent
    #[arg(long, default_value = "guardian")]
    pub guardian_type: String,
    #[arg(long)]
    pub address: Option<String>,
    /// 11-digit national id number
    #[arg(long)]
    pub national_id: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub max_children: u32,
    /// Explicit id; a random one is generated otherwise
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ChildCommand {
    /// Register a child under an existing guardian
    Add(ChildAddArgs),
    /// List children, optionally for one guardian
    List {
        #[arg(long)]
        guardian: Option<String>,
    },
    /// Remove a child with its routines and events
    Remove { id: String },
    /// Replace or clear a child's sensory profile
    Sensory(SensoryArgs),
}

#[derive(Args, Debug)]
pub struct ChildAddArgs {
    #[arg(long)]
    pub guardian: String,
    #[arg(long)]
    pub name: String,
    /// Birth date (DD/MM/YYYY)
    #[arg(long)]
    pub birth_date: String,
    /// low, moderate or high (1, 2, 3 also accepted)
    #[arg(long)]
    pub support_level: String,
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct SensoryArgs {
    pub id: String,
    #[arg(long, default_value = "")]
    pub tactile_sensitivities: String,
    #[arg(long, default_value = "")]
    pub tactile_preferences: String,
    #[arg(long, default_value = "")]
    pub auditory_sensitivities: String,
    #[arg(long, default_value = "")]
    pub auditory_preferences: String,
    #[arg(long, default_value = "")]
    pub visual_sensitivities: String,
    #[arg(long, default_value = "")]
    pub visual_preferences: String,
    /// Remove the profile instead of replacing it
    #[arg(long)]
    pub clear: bool,
}

#[derive(Subcommand, Debug)]
pub enum RoutineCommand {
    /// Create a routine for a child
    Add(RoutineAddArgs),
    /// Show a routine with its ordered steps
    Show { id: String },
    /// List routines, optionally for one child
    List {
        #[arg(long)]
        child: Option<String>,
    },
    /// Print the suggested routine names
    Templates,
    /// Tell whether a routine applies on a date
    Check {
        id: String,
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
    },
    /// Add, move or remove routine steps
    Item {
        #[command(subcommand)]
        command: ItemCommand,
    },
    /// Log a completed run of a routine
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RoutineAddArgs {
    #[arg(long)]
    pub child: String,
    #[arg(long, conflicts_with = "template")]
    pub name: Option<String>,
    /// Use a suggested name by its 1-based position in `routine templates`
    #[arg(long)]
    pub template: Option<usize>,
    /// SINGLE_DATE, EVERY_DAY or SPECIFIC_WEEKDAYS
    #[arg(long, value_parser = parse_recurrence_arg, default_value = "EVERY_DAY")]
    pub recurrence: RecurrenceType,
    /// Date for SINGLE_DATE routines (DD/MM/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Weekdays for SPECIFIC_WEEKDAYS routines, comma separated
    #[arg(long, value_parser = parse_weekday_arg, value_delimiter = ',')]
    pub weekdays: Vec<Weekday>,
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add a step; without --order it is appended at the end
    Add(ItemAddArgs),
    /// Move a step to a new 1-based position
    Move {
        routine: String,
        item: String,
        #[arg(long, allow_negative_numbers = true)]
        order: i64,
    },
    /// Remove a step
    Remove { routine: String, item: String },
}

#[derive(Args, Debug)]
pub struct ItemAddArgs {
    pub routine: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Start time (HH:MM)
    #[arg(long, value_parser = parse_time_arg)]
    pub start: Option<NaiveTime>,
    /// End time (HH:MM)
    #[arg(long, value_parser = parse_time_arg)]
    pub end: Option<NaiveTime>,
    /// 1-based position; must not collide with an existing step
    #[arg(long, allow_negative_numbers = true)]
    pub order: Option<i64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    pub routine: String,
    /// Day of the run (DD/MM/YYYY). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Completed step ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub items: Vec<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Add a calendar event for a child
    Add(EventAddArgs),
    /// List events, optionally filtered
    List {
        #[arg(long)]
        child: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Remove an event
    Remove { id: String },
}

#[derive(Args, Debug)]
pub struct EventAddArgs {
    #[arg(long)]
    pub child: String,
    #[arg(long)]
    pub title: String,
    #[arg(long, value_parser = parse_date_arg)]
    pub date: NaiveDate,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct AgendaArgs {
    /// First day (DD/MM/YYYY). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,
    /// Last day, inclusive (DD/MM/YYYY). Defaults to --from.
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
    /// Also write the agenda to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Entry point used by the binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let data_file = cli
        .data_file
        .clone()
        .unwrap_or_else(|| config.storage.data_file.clone());
    let store = JsonFileStore::new(data_file);
    let today = Local::now().date_naive();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(cli, &store, config.validation, today, &mut out)
}

/// Load, execute one command, and persist when the household changed.
pub fn run_with<S: HouseholdStore + ?Sized>(
    cli: Cli,
    store: &S,
    policy: ValidationPolicy,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let today = cli.today.unwrap_or(today);
    let mut household = store.load()?.into_household(policy, today)?;

    let changed = commands::execute(cli.command, &mut household, today, out)?;
    if changed {
        store.save(&Dataset::from_household(&household))?;
    }
    Ok(())
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).map_err(|err| err.to_string())
}

fn parse_time_arg(raw: &str) -> Result<NaiveTime, String> {
    validate_time_of_day(raw).map_err(|err| err.to_string())
}

fn parse_weekday_arg(raw: &str) -> Result<Weekday, String> {
    parse_weekday(raw).map_err(|err| err.to_string())
}

fn parse_recurrence_arg(raw: &str) -> Result<RecurrenceType, String> {
    raw.parse::<RecurrenceType>().map_err(|err| err.to_string())
}
