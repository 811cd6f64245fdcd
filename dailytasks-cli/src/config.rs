use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use dailytasks_core::{DayKey, ReminderPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{dailytasks_home, default_data_path, ensure_dailytasks_home};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub clock: ClockSection,
    #[serde(default)]
    pub reminders: RemindersSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Overrides ~/.dailytasks/TaskData.json
    pub data_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockSection {
    /// IANA zone used to decide what "today" is (system local time if unset)
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersSection {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_interval_hours() -> u32 {
    ReminderPolicy::default().interval_hours
}

fn default_title() -> String {
    ReminderPolicy::default().title
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
            title: default_title(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.storage.data_file {
            Some(p) => Ok(PathBuf::from(p)),
            None => default_data_path(),
        }
    }

    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.clock
            .timezone
            .as_deref()
            .map(|tz| {
                tz.parse::<Tz>()
                    .map_err(|_| anyhow::anyhow!("invalid timezone in config: {tz}"))
            })
            .transpose()
    }

    /// Calendar day of `now` in the configured zone.
    pub fn today(&self, now: DateTime<Utc>) -> Result<DayKey> {
        let day = match self.timezone()? {
            Some(tz) => DayKey::of(&now.with_timezone(&tz))?,
            None => DayKey::of(&now.with_timezone(&Local))?,
        };
        Ok(day)
    }

    pub fn reminder_policy(&self) -> ReminderPolicy {
        ReminderPolicy {
            interval_hours: self.reminders.interval_hours,
            title: self.reminders.title.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dailytasks_home()?.join(CONFIG_FILE))
}

/// Loads the user's config without touching the filesystem beyond reading it.
/// Without a home directory there is no config file, so defaults apply.
pub fn load_config() -> Result<Config> {
    load_config_in(dailytasks_home().ok().as_deref())
}

fn load_config_in(home: Option<&Path>) -> Result<Config> {
    match home {
        Some(dir) => load_config_from(&dir.join(CONFIG_FILE)),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<PathBuf> {
    let p = ensure_dailytasks_home()?.join(CONFIG_FILE);
    if p.exists() {
        bail!("config already exists: {}", p.display());
    }
    save_config(&p, &Config::default())?;
    Ok(p)
}
