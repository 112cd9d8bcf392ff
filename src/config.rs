//! TOML configuration of the fishing script

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::anti_afk::AntiAfkSettings;
use crate::error::{FishingError, Result};
use crate::input::Control;
use crate::methods::{find_factory, method_names};

fn default_fish_limit() -> f64 {
    50.0
}

fn default_true() -> bool {
    true
}

fn default_action_period() -> u64 {
    120
}

fn default_no_cast_threshold() -> u64 {
    150
}

fn default_interact_key() -> String {
    "e".to_string()
}

fn default_delay_after_catch() -> f64 {
    3.3
}

fn default_cast_duration() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Catches before the script stops fishing; `inf` for no limit
    #[serde(default = "default_fish_limit")]
    pub fish_limit: f64,
    #[serde(default = "default_true")]
    pub do_initial_cast: bool,
    #[serde(default = "default_true")]
    pub enable_anti_afk: bool,
    #[serde(default, rename = "anti-afk")]
    pub anti_afk: AntiAfkConfig,
    #[serde(rename = "fishing-method")]
    pub fishing_method: FishingMethodConfig,

    /// Directory of the file this was loaded from
    #[serde(skip)]
    source_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AntiAfkConfig {
    #[serde(default = "default_action_period")]
    pub action_period: u64,
    #[serde(default = "default_no_cast_threshold")]
    pub no_cast_threshold: u64,
}

impl Default for AntiAfkConfig {
    fn default() -> Self {
        Self {
            action_period: default_action_period(),
            no_cast_threshold: default_no_cast_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FishingMethodConfig {
    pub method_name: String,
    #[serde(default = "default_interact_key")]
    pub interact_key: String,
    #[serde(default)]
    pub is_mouse_button: bool,
    #[serde(default = "default_delay_after_catch")]
    pub delay_after_catch: f64,
    #[serde(default = "default_cast_duration")]
    pub cast_duration: f64,
    #[serde(default)]
    pub log_directory_path: String,
    /// Per-method tables such as `[fishing-method.image]`
    #[serde(flatten)]
    pub methods: toml::Table,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FishingError::Config(format!("Cannot read config file {:?}: {}", path, e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.source_dir = path.parent().map(Path::to_path_buf);
        tracing::info!("[CONFIG] Loaded {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fish_limit.is_nan() || self.fish_limit <= 0.0 {
            return Err(FishingError::Config(format!(
                "fish_limit must be positive, got {}",
                self.fish_limit
            )));
        }

        for (name, value) in [
            ("delay_after_catch", self.fishing_method.delay_after_catch),
            ("cast_duration", self.fishing_method.cast_duration),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FishingError::Config(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, value
                )));
            }
        }

        self.anti_afk_settings()?;

        if find_factory(&self.fishing_method.method_name).is_none() {
            return Err(FishingError::Config(format!(
                "Unknown fishing method {:?}. Possible values: {}",
                self.fishing_method.method_name,
                method_names().join(", ")
            )));
        }

        self.interact_control()?;
        Ok(())
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    /// Catch limit rounded up, `None` when unbounded
    pub fn fish_limit(&self) -> Option<u64> {
        if self.fish_limit.is_infinite() {
            None
        } else {
            Some(self.fish_limit.ceil() as u64)
        }
    }

    pub fn interact_control(&self) -> Result<Control> {
        Control::from_config(
            &self.fishing_method.interact_key,
            self.fishing_method.is_mouse_button,
        )
    }

    /// Anti-AFK timings, `None` when disabled
    pub fn anti_afk_settings(&self) -> Result<Option<AntiAfkSettings>> {
        if !self.enable_anti_afk {
            return Ok(None);
        }
        AntiAfkSettings::from_secs(self.anti_afk.action_period, self.anti_afk.no_cast_threshold)
            .map(Some)
    }

    /// Parameter table of the selected method
    pub fn method_params(&self) -> Option<&toml::Value> {
        self.fishing_method
            .methods
            .get(&self.fishing_method.method_name)
    }

    pub fn cast_duration(&self) -> Duration {
        Duration::from_secs_f64(self.fishing_method.cast_duration)
    }

    pub fn delay_after_catch(&self) -> Duration {
        Duration::from_secs_f64(self.fishing_method.delay_after_catch)
    }

    /// Poll log directory, `None` when disabled
    pub fn log_directory(&self) -> Option<&Path> {
        match self.fishing_method.log_directory_path.as_str() {
            "" => None,
            path => Some(Path::new(path)),
        }
    }
}
