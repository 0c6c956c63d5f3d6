use crate::tokenizer::Tokenizer;
use serde::Deserialize;
use std::fmt;

/// Input languages the front end can recognize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Not yet known; resolved by [`detect_language`].
    #[default]
    #[serde(rename = "auto", alias = "unknown")]
    Unknown,
    Pddl,
    Sas,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Unknown => write!(f, "unknown"),
            Language::Pddl => write!(f, "PDDL"),
            Language::Sas => write!(f, "SAS"),
        }
    }
}

/// Guesses the language from the first non-comment tokens.
///
/// The cursor is left where it was.
pub fn detect_language(tokenizer: &mut Tokenizer) -> Language {
    let start = tokenizer.position();
    let language = detect(tokenizer);
    tokenizer.seek(start);
    language
}

fn detect(tokenizer: &mut Tokenizer) -> Language {
    tokenizer.skip_white_space();

    // SAS files start with "begin_version"
    if tokenizer.test_and_return("begin") {
        return Language::Sas;
    }

    while !tokenizer.at_end() && tokenizer.test_and_return(";") {
        tokenizer.skip_line();
        tokenizer.skip_white_space();
    }

    if tokenizer.test_and_skip("(")
        && (tokenizer.test_identifier_and_return("define")
            || tokenizer.test_identifier_and_return("in-package"))
    {
        return Language::Pddl;
    }

    Language::Unknown
}
