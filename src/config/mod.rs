use crate::core::registry::DEFAULT_CODE_PREFIX;
use crate::core::scheduler::{IntervalRule, default_interval_rules};
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::ui::messages::{success, warning};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Role used when `--role` is not given.
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_code_prefix")]
    pub customer_code_prefix: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_business_name")]
    pub business_name: String,
    #[serde(default)]
    pub business_phone: String,
    /// Where attached bills are copied. Empty = next to the database.
    #[serde(default)]
    pub attachments_dir: String,
    /// Ordered keyword → km table used by the follow-up scheduler.
    #[serde(default = "default_interval_rules")]
    pub service_intervals: Vec<IntervalRule>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_code_prefix() -> String {
    DEFAULT_CODE_PREFIX.to_string()
}
fn default_currency() -> String {
    "Rs".to_string()
}
fn default_business_name() -> String {
    "our workshop".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            role: Role::Owner,
            customer_code_prefix: default_code_prefix(),
            currency: default_currency(),
            business_name: default_business_name(),
            business_phone: String::new(),
            attachments_dir: String::new(),
            service_intervals: default_interval_rules(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("garageledger")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".garageledger")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("garageledger.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("garageledger.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// A broken file is reported and replaced by defaults for this run.
    pub fn load() -> Self {
        let path = Self::config_file();

        if !path.exists() {
            return Config::default();
        }

        match Self::read_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warning(format!(
                    "Ignoring configuration file {}: {}",
                    path.display(),
                    e
                ));
                Config::default()
            }
        }
    }

    fn read_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Directory holding attached bill files.
    pub fn attachments_path(&self) -> PathBuf {
        if !self.attachments_dir.trim().is_empty() {
            return expand_tilde(self.attachments_dir.trim());
        }

        Path::new(&self.database)
            .parent()
            .map(|p| p.join("attachments"))
            .unwrap_or_else(|| Self::config_dir().join("attachments"))
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was set up.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        success(format!("Database:    {}", db_path.display()));

        Ok(db_path)
    }
}
