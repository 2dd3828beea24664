use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tj_cli::commands::{day, log, month, prefs, remind, status, util};
use tj_cli::{Cli, Commands, Config, PrefsAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(tj_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = tj_db::Database::open(&config.database_path).with_context(|| {
        format!("failed to open {}", config.database_path.display())
    })?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let now = Local::now().naive_local();
    let mut stdout = std::io::stdout().lock();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;

    match command {
        Commands::Day { date, json } => {
            let date = match date {
                Some(date) => util::parse_date(date, now.date())?,
                None => now.date(),
            };
            day::run(&mut stdout, &db, date, now, config.wants_json(*json))?;
        }
        Commands::Month { month: period, json } => {
            let (year, month_number) = match period {
                Some(period) => util::parse_month(period)?,
                None => (now.year(), now.month()),
            };
            month::run(&mut stdout, &db, year, month_number, config.wants_json(*json))?;
        }
        Commands::Log(args) => log::run(&mut stdout, &mut db, args, now)?,
        Commands::Delete { id } => log::delete(&mut stdout, &mut db, *id)?,
        Commands::Prefs(PrefsAction::Show { json }) => {
            prefs::show(&mut stdout, &db, config.wants_json(*json))?;
        }
        Commands::Prefs(PrefsAction::Set(args)) => prefs::set(&mut stdout, &mut db, args, now)?,
        Commands::Schedule => remind::schedule(&mut stdout, &mut db, now)?,
        Commands::Remind { due, json } => {
            remind::list(&mut stdout, &db, *due, now, config.wants_json(*json))?;
        }
        Commands::Status => status::run(&mut stdout, &db, &config.database_path, now)?,
    }

    Ok(())
}
