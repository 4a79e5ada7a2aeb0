//! Configuration loaded from `config/eternity.json5`.
//!
//! The file is JSON5 so it can carry comments. Missing sections and fields
//! fall back to their defaults; a missing file is created from the bundled
//! template.

use std::path::Path;
use std::sync::LazyLock;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::footstep::{FootstepNotify, SurfaceData, SurfaceType};
use crate::hud::CrosshairHud;
use crate::status::{StatusError, StatusFlag, StatusFlags};

/// Path used when `ETERNITY_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/eternity.json5";

/// Environment variable overriding the config path.
pub const CONFIG_PATH_ENV: &str = "ETERNITY_CONFIG";

/// Template written when no config file exists.
pub const DEFAULT_CONFIG: &str = include_str!("../default_config.json5");

/// The process wide configuration, loaded on first access.
///
/// Load failures are logged and replaced by the defaults.
pub static ETERNITY_CONFIG: LazyLock<EternityConfig> = LazyLock::new(|| {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    match EternityConfig::load_or_create(Path::new(&path)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config from {path}: {e}. Using defaults");
            EternityConfig::default()
        }
    }
});

/// An error that can occur while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON5 or does not match the schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// An initial status flag name is unknown.
    #[error("Invalid status flag in config: {0}")]
    InvalidFlag(#[from] StatusError),
    /// A numeric field is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Crosshair overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosshairConfig {
    /// Half length of the outer cross arms, in pixels.
    pub size: f32,
    /// Line thickness, in pixels.
    pub thickness: f32,
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            size: CrosshairHud::DEFAULT_SIZE,
            thickness: CrosshairHud::DEFAULT_THICKNESS,
        }
    }
}

/// Footstep notify settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    /// Socket the downward trace starts from.
    pub foot_socket: String,
    /// Trace length below the socket.
    pub trace_distance: f32,
    /// Surface lookup table, searched front to back.
    pub surfaces: Vec<SurfaceData>,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            foot_socket: FootstepNotify::DEFAULT_SOCKET.to_owned(),
            trace_distance: FootstepNotify::DEFAULT_TRACE_DISTANCE,
            surfaces: Vec::new(),
        }
    }
}

/// Status component settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Flags set on a character when it spawns, by name.
    pub initial_flags: Vec<String>,
    /// Duration of the timed flag in the demo scenario, in seconds.
    pub demo_timed_seconds: f32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            initial_flags: Vec::new(),
            demo_timed_seconds: 2.0,
        }
    }
}

/// Top level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EternityConfig {
    /// Crosshair overlay settings.
    pub crosshair: CrosshairConfig,
    /// Footstep notify settings.
    pub footstep: FootstepConfig,
    /// Status component settings.
    pub status: StatusConfig,
}

impl EternityConfig {
    /// Parses and validates a JSON5 document.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Loads the config at `path`, writing the default template there first if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            log::info!("Wrote default config to {}", path.display());
        }
        Self::load(path)
    }

    /// Checks value ranges and flag names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("crosshair.size", self.crosshair.size)?;
        positive("crosshair.thickness", self.crosshair.thickness)?;
        positive("footstep.trace_distance", self.footstep.trace_distance)?;
        positive("status.demo_timed_seconds", self.status.demo_timed_seconds)?;

        if let Some(row) = self
            .footstep
            .surfaces
            .iter()
            .find(|row| row.surface_type.0 > SurfaceType::MAX.0)
        {
            return Err(ConfigError::InvalidValue {
                field: "footstep.surfaces",
                reason: format!("surface type {} is out of range", row.surface_type.0),
            });
        }

        self.initial_flags()?;
        Ok(())
    }

    /// The configured initial flags as a mask.
    pub fn initial_flags(&self) -> Result<StatusFlags, ConfigError> {
        self.status
            .initial_flags
            .iter()
            .try_fold(StatusFlags::empty(), |mask, name| {
                let flag: StatusFlag = name.parse()?;
                Ok(mask | flag)
            })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}
