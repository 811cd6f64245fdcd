use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use dailytasks_core::{
    DayKey, InputKind, ReminderDecision, Task, TaskDataController, evaluate_reminder,
    next_check_at,
};
use std::path::PathBuf;

mod config;
mod logging;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "dailytasks", version, about = "Daily habit tracker")]
struct Cli {
    /// Task data file (overrides config storage.data_file)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every task in the catalog
    Tasks,

    /// Show each task's value and status for a day
    Show {
        /// YYYY-MM-DD or DDMMYYYY (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a value for a task
    Set {
        /// Task id, e.g. meditate or eat_healthy
        task: String,
        value: i64,
        #[arg(long)]
        date: Option<String>,
    },

    /// Tick (or untick with --off) a checkbox task
    Check {
        task: String,
        #[arg(long, default_value_t = false)]
        off: bool,
        #[arg(long)]
        date: Option<String>,
    },

    /// Decide whether a reminder is warranted
    Remind {
        #[arg(long)]
        date: Option<String>,
    },

    /// Drop empty day records (today's is kept)
    Prune,

    /// Passing tasks per day for recent days
    History {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config to ~/.dailytasks/config.toml
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init_logging(&cfg.logging.level);

    match cli.command {
        Command::Tasks => {
            for line in render::catalog_lines() {
                println!("{line}");
            }
        }

        Command::Show { date } => {
            let mut c = open_controller(&cfg, cli.data_file)?;
            let day = resolve_day(&cfg, date.as_deref())?;
            c.record_for(day)
                .with_context(|| format!("open record for {}", day.iso()))?;

            println!("# {}\n", day.iso());
            for task in c.primary_tasks() {
                for line in render::task_lines(&c, task, day, 0) {
                    println!("{line}");
                }
            }
            let summary = c.summary_for(day);
            println!("\n{}/{} passing", summary.passing, summary.total);
        }

        Command::Set { task, value, date } => {
            let mut c = open_controller(&cfg, cli.data_file)?;
            let day = resolve_day(&cfg, date.as_deref())?;
            let task: Task = task.parse()?;
            if task.input() == InputKind::None {
                bail!(
                    "{} has no input of its own; set one of its sub-tasks instead",
                    task.display_name()
                );
            }
            c.set_value(task, value, day)
                .with_context(|| format!("record {} for {}", task, day.iso()))?;
            println!(
                "{} = {} on {} ({})",
                task.display_name(),
                value,
                day.iso(),
                c.status_of(task, day).label()
            );
        }

        Command::Check { task, off, date } => {
            let mut c = open_controller(&cfg, cli.data_file)?;
            let day = resolve_day(&cfg, date.as_deref())?;
            let task: Task = task.parse()?;
            if task.input() != InputKind::Checkbox {
                bail!("{} is not a checkbox task; use `set`", task.display_name());
            }
            c.set_value(task, if off { 0 } else { 1 }, day)
                .with_context(|| format!("record {} for {}", task, day.iso()))?;
            println!(
                "{} {} on {}",
                task.display_name(),
                if off { "unchecked" } else { "checked" },
                day.iso()
            );
        }

        Command::Remind { date } => {
            let c = open_controller(&cfg, cli.data_file)?;
            let day = resolve_day(&cfg, date.as_deref())?;
            let policy = cfg.reminder_policy();

            match evaluate_reminder(&c, day, &policy) {
                ReminderDecision::Notify(r) => {
                    println!("{}: {}", r.title, r.body);
                    for task in &r.pending {
                        println!("- {}", task.display_name());
                    }
                }
                ReminderDecision::Clear => println!("Nothing to remind: all tasks done."),
            }
            match next_check_at(&Local::now(), &policy) {
                Some(next) => println!("Next check: {}", next.format("%Y-%m-%d %H:%M")),
                None => println!(
                    "Next check: never (interval of {} hours is out of range)",
                    policy.interval_hours
                ),
            }
        }

        Command::Prune => {
            let mut c = open_controller(&cfg, cli.data_file)?;
            let today = cfg.today(Utc::now())?;
            let dropped = c.prune(Some(today)).context("prune task data")?;
            println!("Dropped {dropped} empty day record(s)");
        }

        Command::History { days } => {
            let c = open_controller(&cfg, cli.data_file)?;
            let mut day = Some(cfg.today(Utc::now())?);
            for _ in 0..days {
                let Some(d) = day else { break };
                let s = c.summary_for(d);
                println!(
                    "{}  {:>2}/{:<2} {}",
                    d.iso(),
                    s.passing,
                    s.total,
                    "#".repeat(s.passing)
                );
                day = d.pred();
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let p = config::init_config()?;
                println!("Wrote {}", p.display());
            }
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}\n{}", config::config_path()?.display(), s);
            }
        },
    }

    Ok(())
}

fn open_controller(cfg: &Config, data_file: Option<PathBuf>) -> Result<TaskDataController> {
    let path = match data_file {
        Some(p) => p,
        None => cfg.data_path()?,
    };
    tracing::debug!(path = %path.display(), "opening task data");
    TaskDataController::open(&path).with_context(|| format!("open task data {}", path.display()))
}

fn resolve_day(cfg: &Config, date: Option<&str>) -> Result<DayKey> {
    let day = match date {
        Some(s) => DayKey::parse_flexible(s)?,
        None => cfg.today(Utc::now())?,
    };
    tracing::debug!(%day, requested = ?date, "resolved day");
    Ok(day)
}
