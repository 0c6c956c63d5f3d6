//! Optional TOML configuration for `pddlasp`.
//!
//! Read from `--config <path>`, or from `pddlasp.toml` in the working
//! directory when that file exists. Command-line flags override every value.
//!
//! # Example
//!
//! ```toml
//! parsing_mode = "compatibility"
//! warnings_as_errors = false
//! log_priority = "warning"
//! color = "never"
//!
//! [normalization]
//! derived_predicate_prefix = "dp-"
//! ```

use std::path::Path;

use pddlasp_core::Options;
use serde::Deserialize;

/// File looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "pddlasp.toml";

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogPriority {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogPriority {
    pub(crate) fn level_filter(self) -> log::LevelFilter {
        match self {
            LogPriority::Debug => log::LevelFilter::Debug,
            LogPriority::Info => log::LevelFilter::Info,
            LogPriority::Warning => log::LevelFilter::Warn,
            LogPriority::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ColorPolicy {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorPolicy {
    pub(crate) fn write_style(self) -> env_logger::WriteStyle {
        match self {
            ColorPolicy::Auto => env_logger::WriteStyle::Auto,
            ColorPolicy::Always => env_logger::WriteStyle::Always,
            ColorPolicy::Never => env_logger::WriteStyle::Never,
        }
    }
}

/// Core options plus the settings only the binary cares about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    #[serde(flatten)]
    pub options: Options,
    pub log_priority: LogPriority,
    pub color: ColorPolicy,
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Reads `path`, or the default file if present, or falls back to defaults.
///
/// Returns a human-readable error string on failure.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => read_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                read_config(default)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub(crate) fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
