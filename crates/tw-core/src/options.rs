//! World options
//!
//! Options come from an rc-style file (`OPTIONS=key:value,flag,!flag`
//! lines) or from a JSON document. Anything not mentioned keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_SAVE_FILE, DEFAULT_TIME_LIMIT, MAX_TIME_LIMIT};
use crate::player::PlayerLimits;

/// Settings applied when a world is created or loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldOptions {
    /// Save file read at start-up and written by `save` without an argument
    pub file: PathBuf,
    /// Seconds the player has to reach the end room
    pub time_limit: i64,
    /// Capacity for a fresh player
    pub limits: PlayerLimits,
    /// Start in edit mode
    pub edit: bool,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_SAVE_FILE),
            time_limit: DEFAULT_TIME_LIMIT,
            limits: PlayerLimits::default(),
            edit: false,
        }
    }
}

impl WorldOptions {
    /// Load options from a file, JSON when it ends in `.json` or looks like
    /// an object, rc format otherwise
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path)?;

        let is_json = path.extension().is_some_and(|ext| ext == "json")
            || contents.trim_start().starts_with('{');
        if is_json {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::parse_config(&contents)
        }
    }

    /// Parse options from an rc-format string
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.strip_prefix("OPTIONS=") {
                Some(opts) => {
                    for opt in opts.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                        options.parse_option(opt)?;
                    }
                }
                None => {
                    return Err(OptionsError::Parse(format!(
                        "line {}: expected OPTIONS=",
                        index + 1
                    )));
                }
            }
        }

        Ok(options)
    }

    fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        let (negated, name) = match opt.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, opt),
        };

        if let Some((key, value)) = name.split_once(':').or_else(|| name.split_once('=')) {
            return self.set_option(key.trim(), value.trim());
        }
        self.set_bool_option(name, !negated)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<(), OptionsError> {
        match name {
            "edit" => self.edit = value,
            "timelimit" | "file" | "maxweight" | "maxsize" | "maxquantity" => {
                return Err(OptionsError::MissingValue(name.to_string()));
            }
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionsError> {
        let invalid = || OptionsError::InvalidValue(name.to_string(), value.to_string());
        let positive = || -> Result<u32, OptionsError> {
            value.parse::<u32>().ok().filter(|v| *v > 0).ok_or_else(invalid)
        };

        match name {
            "file" => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.file = PathBuf::from(value);
            }
            "timelimit" => {
                self.time_limit = value
                    .parse::<i64>()
                    .ok()
                    .filter(|v| (1..=MAX_TIME_LIMIT).contains(v))
                    .ok_or_else(invalid)?;
            }
            "maxweight" => self.limits.max_weight = positive()?,
            "maxsize" => self.limits.max_size = positive()?,
            "maxquantity" => self.limits.max_quantity = positive()?,
            "edit" => {
                self.edit = match value {
                    "1" | "on" | "true" | "yes" => true,
                    "0" | "off" | "false" | "no" => false,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Render the options in rc format
    pub fn to_config_string(&self) -> String {
        format!(
            "# textworld options\nOPTIONS=file:{},timelimit:{}\nOPTIONS=maxweight:{},maxsize:{},maxquantity:{}\nOPTIONS={}edit\n",
            self.file.display(),
            self.time_limit,
            self.limits.max_weight,
            self.limits.max_size,
            self.limits.max_quantity,
            if self.edit { "" } else { "!" },
        )
    }

    /// Write the options in rc format, ready for `load_from_file`
    pub fn save_to_file(&self, path: &Path) -> Result<(), OptionsError> {
        std::fs::write(path, self.to_config_string())?;
        Ok(())
    }
}

/// Errors raised while reading options
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),

    #[error("Missing value for option '{0}'")]
    MissingValue(String),
}
