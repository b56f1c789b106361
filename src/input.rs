use crate::extract::{ExtractOptions, InvalidSeriesPolicy, NamingRule};
use serde::Deserialize;
use serde_json;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT_PATH: &str = "/Results/Unsteady/Output/Output Blocks/\
DSS Profile Output/Unsteady Time Series/SA 2D Area Conn";
pub const DEFAULT_MARKER: &str = "Culvert Groups";

fn default_root_path() -> String {
    DEFAULT_ROOT_PATH.to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "invalid config file: {}", e),
            ConfigError::Invalid(reason) => {
                write!(f, "invalid configuration: {}", reason)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub minutes_per_step: f64,
    #[serde(default = "default_root_path")]
    pub root_path: String,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default)]
    pub naming: NamingRule,
    #[serde(default)]
    pub on_invalid_series: InvalidSeriesPolicy,
    #[serde(default)]
    pub summary_path: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("input_path is empty".into()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_path is empty".into()));
        }
        if let Some(summary) = &self.summary_path {
            if summary.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("summary_path is empty".into()));
            }
        }
        if !self.minutes_per_step.is_finite() || self.minutes_per_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "minutes_per_step must be positive, got {}",
                self.minutes_per_step
            )));
        }
        if self.marker.is_empty() {
            return Err(ConfigError::Invalid("marker is empty".into()));
        }
        if self.output_path == self.input_path {
            return Err(ConfigError::Invalid(
                "output_path would overwrite input_path".into(),
            ));
        }
        if let Some(summary) = &self.summary_path {
            if summary == &self.input_path {
                return Err(ConfigError::Invalid(
                    "summary_path would overwrite input_path".into(),
                ));
            }
            if summary == &self.output_path {
                return Err(ConfigError::Invalid(
                    "summary_path would overwrite output_path".into(),
                ));
            }
        }
        if self.naming == NamingRule::AncestorDepth(0) {
            return Err(ConfigError::Invalid(
                "ancestor_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            marker: self.marker.clone(),
            naming: self.naming,
            on_invalid_series: self.on_invalid_series,
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.input_path = base.join(&self.input_path);
        self.output_path = base.join(&self.output_path);
        if let Some(summary) = self.summary_path.take() {
            self.summary_path = Some(base.join(summary));
        }
    }
}

/// Reads and validates the run configuration. Relative paths inside it are
/// taken from the directory holding the file.
pub fn read_config_input(filepath: &Path) -> Result<Config, ConfigError> {
    let contents =
        fs::read_to_string(filepath).map_err(|source| ConfigError::Io {
            path: filepath.to_path_buf(),
            source,
        })?;
    let mut config: Config =
        serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
    if let Some(base) = filepath.parent() {
        config.resolve_paths(base);
    }
    config.validate()?;
    Ok(config)
}
