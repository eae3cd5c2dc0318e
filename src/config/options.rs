// src/config/options.rs
use std::path::PathBuf;

use chrono::NaiveDate;

use super::consts::*;
use crate::nutrition::UnitPolicy;

/// Process-wide settings, built once by the CLI and passed down explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct AppOptions {
    pub config_dir: PathBuf,
    pub debug: bool,
    pub unit_policy: UnitPolicy,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            debug: false,
            unit_policy: UnitPolicy::Lenient,
        }
    }
}

impl AppOptions {
    pub fn credentials_path(&self) -> PathBuf {
        self.config_dir.join(CREDENTIALS_FILE)
    }
}

/// `~/.config/foodcli` on Linux; falls back to a relative dir when no home is known.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryOptions {
    pub start: NaiveDate,
    pub weights_out: PathBuf,
    pub nutrition_out: PathBuf,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            start: default_history_start(),
            weights_out: PathBuf::from(DEFAULT_WEIGHTS_FILE),
            nutrition_out: PathBuf::from(DEFAULT_NUTRITION_FILE),
        }
    }
}

pub fn default_history_start() -> NaiveDate {
    DEFAULT_HISTORY_START
        .parse()
        .unwrap_or(NaiveDate::MIN)
}
