//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::log::LogArgs;
use crate::commands::prefs::PrefsSetArgs;

/// Interval time journal.
///
/// Splits the waking day into fixed-length slots and prompts for a short
/// note, mood and activity tags at the end of each one.
#[derive(Debug, Parser)]
#[command(name = "tj", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the slots of a day with their entries.
    Day {
        /// Date to show: YYYY-MM-DD, today, yesterday, tomorrow or "N days ago".
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show monthly insights.
    Month {
        /// Month to summarize (YYYY-MM). Defaults to the current month.
        month: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record or update the entry for a slot.
    Log(LogArgs),

    /// Delete an entry by ID.
    Delete {
        /// Entry ID as shown by `tj day --json`.
        id: i64,
    },

    /// Show or change preferences.
    #[command(subcommand)]
    Prefs(PrefsAction),

    /// Reschedule reminders for the rest of today.
    Schedule,

    /// List pending reminders.
    Remind {
        /// Only show reminders whose time has passed.
        #[arg(long)]
        due: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the current slot and next check-in.
    Status,
}

/// Preference subcommands.
#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    /// Print current preferences.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Update one or more preferences.
    Set(PrefsSetArgs),
}
