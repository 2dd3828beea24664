//! CLI subcommand implementations.

pub mod day;
pub mod log;
pub mod month;
pub mod prefs;
pub mod remind;
pub mod status;
pub mod util;
