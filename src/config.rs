//! Command-line and environment configuration. The store path is the only
//! value the persistence layer sees; the rest configures logging and the
//! reference policy.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::db::ReferencePolicy;
use crate::logging::{default_log_level, normalize_level};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".event-planner";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "event_planner.db";
/// Log folder inside the application data directory.
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Parser)]
#[command(name = "event-planner", version, about = "Record events, venues, and tasks")]
pub struct Cli {
    /// Path to the SQLite store. Created if it does not exist.
    #[arg(long, env = "EVENT_PLANNER_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Directory for rotating log files.
    #[arg(long, env = "EVENT_PLANNER_LOG_DIR", value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// trace, debug, info, warn, or error.
    #[arg(long, env = "EVENT_PLANNER_LOG", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Reject tasks and events that reference missing rows.
    #[arg(long)]
    pub enforce_references: bool,
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
    pub reference_policy: ReferencePolicy,
}

impl Config {
    /// Fill in defaults under `~/.event-planner` for anything not given.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let db_path = match cli.db {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match cli.log_dir {
            Some(path) => path,
            None => data_dir()?.join(LOG_DIR_NAME),
        };

        let log_level = match cli.log_level.as_deref() {
            Some(level) => normalize_level(level)?,
            None => default_log_level(),
        };

        let reference_policy = if cli.enforce_references {
            ReferencePolicy::Enforced
        } else {
            ReferencePolicy::Permissive
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
            reference_policy,
        })
    }
}

/// Resolve `~/.event-planner`.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
