use crate::error::{Error, Location, Result};
use crate::language::Language;
use crate::tokenizer::Tokenizer;
use serde::Deserialize;
use std::fmt;

/// How strictly legacy and nonstandard input is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Strict,
    Compatibility,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strict => write!(f, "strict"),
            Mode::Compatibility => write!(f, "compatibility"),
        }
    }
}

pub type WarningCallback = Box<dyn FnMut(&Location, &str)>;

/// Settings for the normalization pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Prefix of the names given to synthesized derived predicates.
    pub derived_predicate_prefix: String,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        NormalizationConfig {
            derived_predicate_prefix: "derived-predicate-".to_owned(),
        }
    }
}

/// Run options, loadable from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub parsing_mode: Mode,
    pub language: Language,
    pub warnings_as_errors: bool,
    pub normalization: NormalizationConfig,
}

/// State shared by every parser production: the token stream, the parsing
/// mode and the warning sink.
pub struct Context {
    pub tokenizer: Tokenizer,
    pub mode: Mode,
    pub warnings_as_errors: bool,
    warning_callback: WarningCallback,
}

impl Context {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Context {
            tokenizer,
            mode: Mode::default(),
            warnings_as_errors: false,
            warning_callback: Box::new(|location, message| {
                log::warn!("{} {}", location, message);
            }),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    pub fn with_warning_callback(mut self, callback: impl FnMut(&Location, &str) + 'static) -> Self {
        self.warning_callback = Box::new(callback);
        self
    }

    pub fn is_compatibility(&self) -> bool {
        self.mode == Mode::Compatibility
    }

    /// Emits a warning at `location`, or fails if warnings are errors.
    pub fn warn(&mut self, location: Location, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        if self.warnings_as_errors {
            return Err(Error::Warning { location, message });
        }
        (self.warning_callback)(&location, &message);
        Ok(())
    }

    /// Emits a warning at the current tokenizer position.
    pub fn warn_here(&mut self, message: impl Into<String>) -> Result<()> {
        let location = self.tokenizer.location();
        self.warn(location, message)
    }

    /// Builds a parser error at the current tokenizer position.
    pub fn error_here(&self, message: impl Into<String>) -> Error {
        Error::parser(self.tokenizer.location(), message)
    }
}
