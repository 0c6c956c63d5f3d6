use serde::Serialize;
use std::fmt;

/// A resolved position inside one of the sections read into a tokenizer.
///
/// Rows and columns are 1-based. Locations are only produced when a
/// diagnostic has to be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub section: String,
    pub row_start: usize,
    pub row_end: usize,
    pub column_start: usize,
    pub column_end: usize,
}

impl Location {
    pub fn new(section: impl Into<String>, row: usize, column: usize) -> Self {
        Location {
            section: section.into(),
            row_start: row,
            row_end: row,
            column_start: column,
            column_end: column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.section, self.row_start, self.column_start
        )
    }
}

const UNKNOWN_LANGUAGE: &str = "could not detect input language";

/// Every fatal condition raised by the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{location} {message}")]
    Tokenizer { location: Location, message: String },

    #[error("{location} {message}")]
    Parser { location: Location, message: String },

    /// A warning promoted to an error by `warnings_as_errors`.
    #[error("{location} {message}")]
    Warning { location: Location, message: String },

    #[error("{}", with_location(.location.as_ref(), .message))]
    Normalization {
        location: Option<Location>,
        message: String,
    },

    #[error("{message}")]
    Translator { message: String },

    #[error("{path}: {message}")]
    Io { path: String, message: String },

    /// Input in a language without a front end, or in none at all.
    #[error("{message}")]
    Language { message: String },
}

fn with_location(location: Option<&Location>, message: &str) -> String {
    match location {
        Some(location) => format!("{} {}", location, message),
        None => message.to_owned(),
    }
}

impl Error {
    pub fn tokenizer(location: Location, message: impl Into<String>) -> Self {
        Error::Tokenizer {
            location,
            message: message.into(),
        }
    }

    pub fn parser(location: Location, message: impl Into<String>) -> Self {
        Error::Parser {
            location,
            message: message.into(),
        }
    }

    pub fn normalization(message: impl Into<String>) -> Self {
        Error::Normalization {
            location: None,
            message: message.into(),
        }
    }

    pub fn translator(message: impl Into<String>) -> Self {
        Error::Translator {
            message: message.into(),
        }
    }

    pub fn language(message: impl Into<String>) -> Self {
        Error::Language {
            message: message.into(),
        }
    }

    pub fn unknown_language() -> Self {
        Error::language(UNKNOWN_LANGUAGE)
    }

    /// True when no input language could be detected, as opposed to a
    /// detected but unsupported one.
    pub fn is_unknown_language(&self) -> bool {
        matches!(self, Error::Language { message } if message == UNKNOWN_LANGUAGE)
    }

    /// Short machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Tokenizer { .. } => "tokenizer",
            Error::Parser { .. } => "parser",
            Error::Warning { .. } => "warning",
            Error::Normalization { .. } => "normalization",
            Error::Translator { .. } => "translator",
            Error::Io { .. } => "io",
            Error::Language { .. } => "language",
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::Tokenizer { location, .. }
            | Error::Parser { location, .. }
            | Error::Warning { location, .. } => Some(location),
            Error::Normalization { location, .. } => location.as_ref(),
            Error::Translator { .. } | Error::Io { .. } | Error::Language { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::Tokenizer { message, .. }
            | Error::Parser { message, .. }
            | Error::Warning { message, .. }
            | Error::Normalization { message, .. }
            | Error::Translator { message }
            | Error::Io { message, .. }
            | Error::Language { message } => message,
        }
    }

    /// True for errors raised while reading the input text, i.e. the ones a
    /// more lenient parsing mode might avoid.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::Tokenizer { .. } | Error::Parser { .. })
    }

    /// JSON representation used by `--output json`.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "kind": self.kind(),
            "message": self.message(),
        });
        if let Some(location) = self.location() {
            value["location"] = serde_json::to_value(location).unwrap_or_default();
        }
        if let Error::Io { path, .. } = self {
            value["path"] = serde_json::Value::String(path.clone());
        }
        value
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::translator("could not write translator output")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
