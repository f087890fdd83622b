use crate::error::{DeskError, Result};
use crate::listing::TabContext;
use crate::profile::DEFAULT_PROFILE_KEY;
use crate::store::validate_free_key;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PAGE_SIZE: usize = 12;
const DEFAULT_AUTOSAVE_MS: u64 = 2000;
const MAX_RECENT_DAYS: i64 = 36_500;

/// Configuration for deskview, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskConfig {
    /// Rows per page for every list view
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Window for the "Recent" tabs, in days
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,

    /// Quiet period before the settings form saves itself
    #[serde(default = "default_autosave_ms")]
    pub autosave_delay_ms: u64,

    /// Store key holding the cached admin profile
    #[serde(default = "default_profile_key")]
    pub profile_key: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_recent_days() -> i64 {
    TabContext::DEFAULT_RECENT_DAYS
}

fn default_autosave_ms() -> u64 {
    DEFAULT_AUTOSAVE_MS
}

fn default_profile_key() -> String {
    DEFAULT_PROFILE_KEY.to_string()
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            recent_days: TabContext::DEFAULT_RECENT_DAYS,
            autosave_delay_ms: DEFAULT_AUTOSAVE_MS,
            profile_key: default_profile_key(),
        }
    }
}

impl DeskConfig {
    pub const KEYS: &'static [&'static str] =
        &["page-size", "recent-days", "autosave-delay-ms", "profile-key"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DeskError::Io)?;
        let config: DeskConfig =
            serde_json::from_str(&content).map_err(DeskError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants `set` enforces, for values that came from disk.
    pub fn validate(&self) -> Result<()> {
        check_page_size(self.page_size)?;
        check_recent_days(self.recent_days)?;
        validate_free_key(&self.profile_key)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DeskError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DeskError::Serialization)?;
        fs::write(config_path, content).map_err(DeskError::Io)?;
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Value of a key as shown by `deskview config`.
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize(key).as_str() {
            "page-size" => Some(self.page_size.to_string()),
            "recent-days" => Some(self.recent_days.to_string()),
            "autosave-delay-ms" => Some(self.autosave_delay_ms.to_string()),
            "profile-key" => Some(self.profile_key.clone()),
            _ => None,
        }
    }

    /// Parses and sets a key. The config is left untouched on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match normalize(key).as_str() {
            "page-size" => {
                let size: usize = parse_number(key, value)?;
                check_page_size(size)?;
                self.page_size = size;
            }
            "recent-days" => {
                let days: i64 = parse_number(key, value)?;
                check_recent_days(days)?;
                self.recent_days = days;
            }
            "autosave-delay-ms" => self.autosave_delay_ms = parse_number(key, value)?,
            "profile-key" => {
                validate_free_key(value)?;
                self.profile_key = value.to_string();
            }
            _ => {
                return Err(DeskError::Validation(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('_', "-")
}

fn check_page_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(DeskError::Validation(
            "page-size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn check_recent_days(days: i64) -> Result<()> {
    if !(0..=MAX_RECENT_DAYS).contains(&days) {
        return Err(DeskError::Validation(format!(
            "recent-days must be between 0 and {}",
            MAX_RECENT_DAYS
        )));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| DeskError::Validation(format!("Invalid value for {}: '{}'", key, value)))
}
