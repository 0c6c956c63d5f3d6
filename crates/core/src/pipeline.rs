//! Pipeline orchestration: sources → tokenizer → parser → normalizer →
//! translator.
//!
//! Each entry point runs the stages it needs in order and stops at the
//! first error.

use crate::ast;
use crate::context::{Context, Options};
use crate::error::{Error, Result};
use crate::language::{detect_language, Language};
use crate::normalize::normalize;
use crate::normalized;
use crate::output::{print_description, print_normalized_description};
use crate::parser::parse_description;
use crate::source::Source;
use crate::tokenizer::Tokenizer;
use crate::translate::translate;

/// Reads every source into one tokenizer, one section per source.
pub fn tokenizer(sources: &[Source]) -> Tokenizer {
    let mut tokenizer = Tokenizer::new();
    for source in sources {
        tokenizer.read(source.name.as_str(), &source.content);
    }
    tokenizer
}

/// Builds a parsing context over `sources` with the given options.
pub fn context(sources: &[Source], options: &Options) -> Context {
    Context::new(tokenizer(sources))
        .with_mode(options.parsing_mode)
        .with_warnings_as_errors(options.warnings_as_errors)
}

/// The configured language, or the detected one when set to auto.
pub fn resolve_language(context: &mut Context, options: &Options) -> Language {
    match options.language {
        Language::Unknown => {
            let language = detect_language(&mut context.tokenizer);
            log::debug!("detected input language: {}", language);
            language
        }
        language => language,
    }
}

/// Builds the context and makes sure the input is PDDL.
fn prepare(sources: &[Source], options: &Options) -> Result<Context> {
    let mut context = context(sources, options);
    match resolve_language(&mut context, options) {
        Language::Pddl => Ok(context),
        Language::Sas => Err(Error::language(
            "SAS input is not supported, only PDDL descriptions can be processed",
        )),
        Language::Unknown => Err(Error::unknown_language()),
    }
}

pub fn parse(context: &mut Context) -> Result<ast::Description> {
    log::debug!("parsing PDDL description");
    let description = parse_description(context)?;
    log::debug!(
        "parsed domain “{}” with {} actions",
        description.domain.name,
        description.domain.actions.len()
    );
    Ok(description)
}

pub fn parse_and_normalize(context: &mut Context, options: &Options) -> Result<normalized::Description> {
    let description = parse(context)?;
    log::debug!("normalizing PDDL description");
    normalize(description, &options.normalization)
}

/// Full translation to ASP facts and rules.
pub fn translate_sources(sources: &[Source], options: &Options) -> Result<String> {
    let mut context = prepare(sources, options)?;
    let description = parse_and_normalize(&mut context, options)?;
    log::debug!("translating to ASP");
    translate(&description)
}

/// Parses and normalizes, then prints the result as PDDL.
pub fn normalize_sources(sources: &[Source], options: &Options) -> Result<String> {
    let mut context = prepare(sources, options)?;
    let description = parse_and_normalize(&mut context, options)?;
    print_normalized_description(&description)
}

/// Parses only, reporting the first syntax error.
pub fn check_syntax(sources: &[Source], options: &Options) -> Result<()> {
    let mut context = prepare(sources, options)?;
    parse(&mut context).map(|_| ())
}

/// Parses and prints the description back as indented PDDL.
pub fn beautify_sources(sources: &[Source], options: &Options) -> Result<String> {
    let mut context = prepare(sources, options)?;
    let description = parse(&mut context)?;
    print_description(&description)
}
