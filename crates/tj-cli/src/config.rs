//! Journal settings resolved from defaults, TOML files and `TJ_*` variables.
//!
//! Schedule preferences (wake, sleep, interval) live in the database so every
//! command sees the same slots. This file only covers where the journal is
//! stored and how output is printed.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "tj";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "tj.db";
const ENV_PREFIX: &str = "TJ_";

/// Settings for the `tj` binary.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Journal database file.
    pub database_path: PathBuf,
    /// Print JSON instead of text for commands that support `--json`.
    pub json: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path.display())
            .field("json", &self.json)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join(DATABASE_FILE),
            json: false,
        }
    }
}

impl Config {
    /// Resolves settings. Sources merge in this order, later ones winning:
    /// defaults, `<config_dir>/tj/config.toml`, `explicit`, then `TJ_*`.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, figment::Error> {
        let user_file = dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE));

        [user_file.as_deref(), explicit]
            .into_iter()
            .flatten()
            .fold(Figment::from(Serialized::defaults(Self::default())), |figment, file| {
                figment.merge(Toml::file(file))
            })
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }

    /// Whether a command should print JSON, given its own `--json` flag.
    pub const fn wants_json(&self, flag: bool) -> bool {
        flag || self.json
    }
}

/// Default directory for the journal database, `~/.local/share/tj` on Linux.
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}
