//! Configuration for choreboard.
//!
//! Settings live in `config.json` inside the platform data directory (see
//! [`DataStorage`]). Each section is optional; a missing file or section means
//! defaults, so the tool works without ever running `choreboard init`.
//!
//! ```json
//! {
//!   "scheduler": { "interval_secs": 3600, "startup_delay_secs": 5, "debounce_hours": 23 },
//!   "database": { "path": null, "busy_timeout_ms": 5000 }
//! }
//! ```
//!
//! ```rust,no_run
//! use choreboard::libs::config::Config;
//!
//! let config = Config::read()?;
//! let scheduler = config.scheduler.unwrap_or_default();
//! println!("sweeping every {}s", scheduler.interval_secs);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::generator::DEFAULT_DEBOUNCE_HOURS;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// A section offered by the `init` wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Periodic generator timing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between sweeps.
    pub interval_secs: u64,

    /// Seconds to wait after start before the first sweep.
    pub startup_delay_secs: u64,

    /// A definition generated less than this many hours ago is not examined.
    pub debounce_hours: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            interval_secs: 3600,
            startup_delay_secs: 5,
            debounce_hours: DEFAULT_DEBOUNCE_HOURS as u64,
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    /// Saturates at `chrono::Duration::MAX` for values chrono cannot represent.
    pub fn debounce(&self) -> chrono::Duration {
        i64::try_from(self.debounce_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; the data directory's `choreboard.db` when unset.
    pub path: Option<String>,

    /// How long a connection waits for a competing writer before failing.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: None,
            busy_timeout_ms: 5000,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Reads the configuration, or defaults when no file exists yet.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns whether one existed.
    pub fn delete() -> Result<bool> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    /// Interactive wizard, prefilled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            ConfigModule {
                key: "scheduler".to_string(),
                name: "Scheduler".to_string(),
            },
            ConfigModule {
                key: "database".to_string(),
                name: "Database".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "scheduler" => {
                    let default = config.scheduler.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleScheduler);
                    config.scheduler = Some(SchedulerConfig {
                        interval_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSchedulerInterval.to_string())
                            .default(default.interval_secs)
                            .interact_text()?,
                        startup_delay_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSchedulerStartupDelay.to_string())
                            .default(default.startup_delay_secs)
                            .interact_text()?,
                        debounce_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDebounceHours.to_string())
                            .default(default.debounce_hours)
                            .interact_text()?,
                    });
                }
                "database" => {
                    let default = config.database.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleDatabase);
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(default.path.clone().unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.database = Some(DatabaseConfig {
                        path: Some(path.trim().to_string()).filter(|p| !p.is_empty()),
                        busy_timeout_ms: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBusyTimeout.to_string())
                            .default(default.busy_timeout_ms)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
