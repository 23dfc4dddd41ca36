//! Configuration file support for Gainz.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gainz/config.toml`.

use crate::{Error, ExerciseLibrary, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Streak multiplier input used until real streak tracking exists
pub const DEFAULT_STREAK: u32 = 10;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub rewards: RewardConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Reward formula inputs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Fixed streak value fed to the points formula. Not derived from any
    /// tracked streak yet.
    #[serde(default = "default_streak")]
    pub streak: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            streak: default_streak(),
        }
    }
}

/// Workout defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default = "default_workout_name")]
    pub default_name: String,

    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            default_name: default_workout_name(),
            default_duration_minutes: default_duration_minutes(),
        }
    }
}

/// Exercise library source
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    /// JSON exercise library; the built-in library is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("gainz")
}

fn default_streak() -> u32 {
    DEFAULT_STREAK
}

fn default_workout_name() -> String {
    "Workout Session".into()
}

fn default_duration_minutes() -> u32 {
    30
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("gainz").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.workout.default_name.trim().is_empty() {
            return Err(Error::Config("workout.default_name must not be empty".into()));
        }
        Ok(())
    }

    /// Exercise library named by the config, or the built-in one
    pub fn exercise_library(&self) -> Result<ExerciseLibrary> {
        match &self.library.path {
            Some(path) => ExerciseLibrary::load_from(path),
            None => Ok(ExerciseLibrary::builtin().clone()),
        }
    }
}
