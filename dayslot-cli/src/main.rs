use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dayslot_core::{Scheduler, Task, format_clock, parse_clock};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod demo;
mod loader;
mod render;
mod state;

use config::{Config, OutputFormat};
use render::Printer;

#[derive(Parser, Debug)]
#[command(
    name = "dayslot",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DAYSLOT_BUILD_SHA"), ")"),
    about = "Single-day task scheduler with dependencies and multitasking"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schedule the tasks in a .json or .csv file
    Run {
        /// Task file
        path: PathBuf,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// Schedule the bundled sample day
    Demo {
        #[command(flatten)]
        opts: RunOptions,
    },

    /// Manage ~/.dayslot/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct RunOptions {
    /// Starting time, e.g. 8:00am or 14:30 (default from config: 8:00am)
    #[arg(long)]
    start: Option<String>,

    /// Output format (default from config: text)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging(&cfg.output.log_filter);

    match cli.command {
        Command::Run { path, opts } => {
            let tasks = loader::load_tasks(&path)?;
            run_plan(tasks, &opts, &cfg)?;
        }

        Command::Demo { opts } => {
            run_plan(demo::sample_day()?, &opts, &cfg)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}\n", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_plan(tasks: Vec<Task>, opts: &RunOptions, cfg: &Config) -> Result<()> {
    let starting_time = match &opts.start {
        Some(s) => parse_clock(s)?,
        None => cfg.schedule.starting_time,
    };
    let format = opts.format.unwrap_or(cfg.output.format);

    let task_count = tasks.len();
    let mut scheduler = Scheduler::new(tasks).context("invalid task set")?;

    if format == OutputFormat::Text {
        println!(
            "# Plan for {} tasks starting at {}\n",
            task_count,
            format_clock(starting_time)
        );
    }

    let mut printer = Printer::new(format);
    scheduler
        .run(starting_time, &mut printer)
        .context("scheduling failed")?;

    Ok(())
}
