#![allow(clippy::result_large_err)]
//! pddlasp-core: PDDL front end and ASP translator.
//!
//! Reads PDDL domains and problems, normalizes their logical structure and
//! emits the description as answer set programming facts and rules.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`translate_sources()`] -- parse, normalize and translate to ASP
//! - [`normalize_sources()`] / [`beautify_sources()`] -- print PDDL back out
//! - [`check_syntax()`] -- parse only
//! - [`Options`] -- run options, loadable from TOML
//! - [`Error`] -- every fatal diagnostic, with [`Location`]
//! - [`Source`] / [`load_sources()`] -- input text
//!
//! The individual stages ([`parse_description()`], [`normalize()`],
//! [`translate()`]) are public for selective pipeline execution.

pub mod ast;
pub mod context;
pub mod error;
pub mod escape;
pub mod language;
pub mod normalize;
pub mod normalized;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod requirements;
pub mod scope;
pub mod signature;
pub mod source;
pub mod tokenizer;
pub mod translate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use context::{Context, Mode, NormalizationConfig, Options};
pub use error::{Error, Location, Result};
pub use language::Language;
pub use source::{FileSystemProvider, InMemoryProvider, Source, SourceProvider};
pub use tokenizer::Tokenizer;

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use language::detect_language;
pub use normalize::normalize;
pub use parser::parse_description;
pub use pipeline::{beautify_sources, check_syntax, normalize_sources, translate_sources};
pub use source::load_sources;
pub use translate::translate;
