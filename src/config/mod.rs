use crate::core::engine::{DEFAULT_RELOCATION_HORIZON_DAYS, EngineSettings};
use crate::core::fairness::DEFAULT_WINDOW_DAYS;
use crate::core::trigger::TriggerSchedule;
use crate::errors::{AppError, AppResult};
use crate::utils::time::require_time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_window")]
    pub fairness_window_days: u32,
    #[serde(default = "default_horizon")]
    pub relocation_horizon_days: u32,
    #[serde(default)]
    pub include_admins_in_fair_draw: bool,
    #[serde(default = "default_assign_time")]
    pub assign_time: String,
    #[serde(default = "default_complete_time")]
    pub complete_time: String,
    /// Civil date forced from the command line.
    #[serde(skip)]
    pub today: Option<NaiveDate>,
}

fn default_window() -> u32 {
    DEFAULT_WINDOW_DAYS
}
fn default_horizon() -> u32 {
    DEFAULT_RELOCATION_HORIZON_DAYS
}
fn default_assign_time() -> String {
    "11:00".to_string()
}
fn default_complete_time() -> String {
    "21:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            fairness_window_days: default_window(),
            relocation_horizon_days: default_horizon(),
            include_admins_in_fair_draw: false,
            assign_time: default_assign_time(),
            complete_time: default_complete_time(),
            today: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dutyroster")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".dutyroster")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("dutyroster.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("dutyroster.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let cfg = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Config::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.fairness_window_days == 0 {
            return Err(AppError::Config("fairness_window_days must be at least 1".into()));
        }
        if self.relocation_horizon_days == 0 {
            return Err(AppError::Config(
                "relocation_horizon_days must be at least 1".into(),
            ));
        }
        self.trigger_schedule()?;
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fairness_window_days: self.fairness_window_days,
            relocation_horizon_days: self.relocation_horizon_days,
            include_admins_in_fair_draw: self.include_admins_in_fair_draw,
        }
    }

    pub fn trigger_schedule(&self) -> AppResult<TriggerSchedule> {
        Ok(TriggerSchedule {
            assign_at: require_time(&self.assign_time)?,
            complete_at: require_time(&self.complete_time)?,
        })
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files; returns the database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => crate::utils::path::expand_tilde(&name),
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            fs::write(Self::config_file(), config.to_yaml()?)?;
        }

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
